//! Keyword scoring for FAQ search and duplicate detection.
//!
//! Weights: a keyword hit counts 1 for search and 1.5 for similarity, a
//! substring hit in the question counts 2, and similarity adds the overlap
//! ratio times 10.

/// Minimum score for a FAQ to be reported as similar
pub const SIMILARITY_THRESHOLD: u32 = 2;

/// Lowercase words longer than two characters, first occurrence order.
///
/// Characters other than ASCII letters, digits, `_` and whitespace are
/// removed before splitting, so `fee?` becomes `fee` and `e-mail` becomes
/// `email`.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut tokens: Vec<String> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() > 2 && !tokens.iter().any(|t| t == word) {
            tokens.push(word.to_string());
        }
    }
    tokens
}

fn keyword_matches(keywords: &[String], tokens: &[String]) -> usize {
    keywords.iter().filter(|k| tokens.contains(k)).count()
}

fn substring_matches(question: &str, tokens: &[String]) -> usize {
    let question = question.to_lowercase();
    tokens.iter().filter(|t| question.contains(t.as_str())).count()
}

/// Relevance of a FAQ for a search query
pub fn search_score(keywords: &[String], question: &str, tokens: &[String]) -> u32 {
    (keyword_matches(keywords, tokens) + substring_matches(question, tokens) * 2) as u32
}

/// How close a FAQ is to a newly asked question
pub fn similarity_score(keywords: &[String], question: &str, tokens: &[String]) -> u32 {
    if tokens.is_empty() {
        return 0;
    }

    let km = keyword_matches(keywords, tokens) as f64;
    let dm = substring_matches(question, tokens) as f64;
    let ratio = km / keywords.len().max(tokens.len()) as f64;

    (km * 1.5 + dm * 2.0 + ratio * 10.0).round() as u32
}

/// Candidates sharing a keyword with the query or containing every query token
fn is_candidate(keywords: &[String], question: &str, tokens: &[String]) -> bool {
    keyword_matches(keywords, tokens) > 0 || substring_matches(question, tokens) == tokens.len()
}

/// Score `items`, keep those above [`SIMILARITY_THRESHOLD`] and sort by score
/// descending. Ties keep their input order.
pub fn rank_similar<T, F>(items: Vec<T>, tokens: &[String], fields: F) -> Vec<(T, u32)>
where
    F: Fn(&T) -> (&[String], &str),
{
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(T, u32)> = items
        .into_iter()
        .filter_map(|item| {
            let (keywords, question) = fields(&item);
            if !is_candidate(keywords, question, tokens) {
                return None;
            }
            let score = similarity_score(keywords, question, tokens);
            (score > SIMILARITY_THRESHOLD).then_some((item, score))
        })
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_short_words_and_punctuation() {
        assert_eq!(
            tokenize("What is the due date for fee?"),
            words(&["what", "the", "due", "date", "for", "fee"])
        );
    }

    #[test]
    fn test_tokenize_deduplicates_in_order() {
        assert_eq!(
            tokenize("Fee fee FEE refund, fee!"),
            words(&["fee", "refund"])
        );
        assert!(tokenize("a b an of").is_empty());
    }

    #[test]
    fn test_search_score_weights_substrings_double() {
        let keywords = words(&["hostel", "fee", "refund"]);
        let question = "How do I get a hostel fee refund?";

        assert_eq!(search_score(&keywords, question, &words(&["refund"])), 3);
        // "ref" is not a keyword but is part of the question
        assert_eq!(search_score(&keywords, question, &words(&["ref"])), 2);
        assert_eq!(search_score(&keywords, question, &words(&["library"])), 0);
    }

    #[test]
    fn test_similarity_score() {
        let keywords = words(&["when", "library", "open"]);
        let question = "When is the library open?";
        let tokens = tokenize("Is the library open on sunday?");
        // tokens: the, library, open, sunday
        // keyword hits 2 => 3.0, substring hits 3 => 6.0, ratio 2/4 => 5.0
        assert_eq!(similarity_score(&keywords, question, &tokens), 14);
    }

    #[test]
    fn test_similarity_score_without_tokens_is_zero() {
        assert_eq!(similarity_score(&words(&["fee"]), "fee?", &[]), 0);
    }

    #[test]
    fn test_rank_similar_filters_and_orders() {
        let faqs = vec![
            (words(&["mess", "menu"]), "Where is the mess menu?".to_string()),
            (words(&["library", "timings"]), "What are library timings?".to_string()),
            (
                words(&["library", "open", "sunday"]),
                "Is the library open on sunday?".to_string(),
            ),
        ];
        let tokens = tokenize("library open sunday");

        let ranked = rank_similar(faqs, &tokens, |(k, q)| (k.as_slice(), q.as_str()));

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0 .1, "Is the library open on sunday?");
        assert!(ranked[0].1 > ranked[1].1);
        assert!(ranked.iter().all(|(_, score)| *score > SIMILARITY_THRESHOLD));
    }

    #[test]
    fn test_rank_similar_is_stable_for_ties() {
        let faqs = vec![
            (words(&["fee"]), "first fee".to_string()),
            (words(&["fee"]), "second fee".to_string()),
        ];
        let ranked = rank_similar(faqs, &words(&["fee"]), |(k, q)| (k.as_slice(), q.as_str()));

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0 .1, "first fee");
        assert_eq!(ranked[1].0 .1, "second fee");
    }

    #[test]
    fn test_rank_similar_with_empty_query_is_empty() {
        let faqs = vec![(words(&["fee"]), "fee".to_string())];
        assert!(rank_similar(faqs, &[], |(k, q)| (k.as_slice(), q.as_str())).is_empty());
    }
}
