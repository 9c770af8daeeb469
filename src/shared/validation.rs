use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

lazy_static! {
    /// Regex for portal and quick link URLs
    /// - Valid: "https://erp.example.edu", "http://lib.example.edu/path", "chrome://settings"
    /// - Invalid: "ftp://x.org", "https://", "example.edu"
    pub static ref PORTAL_URL_REGEX: Regex =
        Regex::new(r"^(https?|chrome)://[^\s$.?#].[^\s]*$").unwrap();

    /// Regex for user email addresses
    /// - Valid: "john.doe@example.edu", "a-b@mail.co"
    /// - Invalid: "john@", "@example.edu", "john doe@example.edu"
    pub static ref EMAIL_REGEX: Regex =
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").unwrap();
}

/// Serde helper trimming a string field before validation sees it
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// Optional variant of [`trimmed`]; pair it with `#[serde(default)]`
pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Padded {
        #[serde(deserialize_with = "trimmed")]
        title: String,
        #[serde(default, deserialize_with = "trimmed_opt")]
        note: Option<String>,
    }

    #[test]
    fn test_trimmed_fields() {
        let padded: Padded = serde_json::from_str(r#"{"title": "  ERP  ", "note": " x "}"#).unwrap();
        assert_eq!(padded.title, "ERP");
        assert_eq!(padded.note.as_deref(), Some("x"));

        let padded: Padded = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert_eq!(padded.title, "");
        assert_eq!(padded.note, None);

        let padded: Padded = serde_json::from_str(r#"{"title": "a", "note": null}"#).unwrap();
        assert_eq!(padded.note, None);
    }

    #[test]
    fn test_portal_url_regex_valid() {
        assert!(PORTAL_URL_REGEX.is_match("https://erp.example.edu"));
        assert!(PORTAL_URL_REGEX.is_match("http://lib.example.edu/catalog?q=1"));
        assert!(PORTAL_URL_REGEX.is_match("chrome://settings"));
    }

    #[test]
    fn test_portal_url_regex_invalid() {
        assert!(!PORTAL_URL_REGEX.is_match("ftp://files.example.edu")); // scheme
        assert!(!PORTAL_URL_REGEX.is_match("https://")); // no host
        assert!(!PORTAL_URL_REGEX.is_match("example.edu")); // no scheme
        assert!(!PORTAL_URL_REGEX.is_match("https://exa mple.edu")); // space
        assert!(!PORTAL_URL_REGEX.is_match("https://.example.edu")); // leading dot
    }

    #[test]
    fn test_email_regex_valid() {
        assert!(EMAIL_REGEX.is_match("john.doe@example.edu"));
        assert!(EMAIL_REGEX.is_match("a-b@mail.co"));
        assert!(EMAIL_REGEX.is_match("registrar@iitx.ac.in"));
    }

    #[test]
    fn test_email_regex_invalid() {
        assert!(!EMAIL_REGEX.is_match("john@"));
        assert!(!EMAIL_REGEX.is_match("@example.edu"));
        assert!(!EMAIL_REGEX.is_match("john doe@example.edu"));
        assert!(!EMAIL_REGEX.is_match("john@example.toolong"));
    }
}
