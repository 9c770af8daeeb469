use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Action, Resource};
use crate::features::faqs::dtos::{CreateFaqDto, FaqResponseDto, ScoredFaqDto, UpdateFaqDto};
use crate::features::faqs::keyword_search::{rank_similar, search_score, tokenize};
use crate::features::faqs::models::Faq;
use crate::features::offices::models::Office;
use crate::shared::cache::TtlCache;

const FAQ_COLUMNS: &str =
    "id, question, answer, office, keywords, update_count, created_at, last_updated";

/// Cache of FAQ listings per office
pub type FaqCache = TtlCache<Office, Vec<FaqResponseDto>>;

fn required(value: &str, message: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(value.to_string())
}

pub struct FaqService {
    pool: PgPool,
    cache: FaqCache,
}

impl FaqService {
    pub fn new(pool: PgPool, cache: FaqCache) -> Self {
        Self { pool, cache }
    }

    async fn find(&self, id: Uuid) -> Result<Faq> {
        sqlx::query_as::<_, Faq>(&format!("SELECT {FAQ_COLUMNS} FROM faqs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch FAQ: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("FAQ not found".to_string()))
    }

    async fn fetch(&self, office: Option<Office>) -> Result<Vec<Faq>> {
        let sql = match office {
            Some(_) => format!(
                "SELECT {FAQ_COLUMNS} FROM faqs WHERE office = $1 ORDER BY created_at DESC"
            ),
            None => format!("SELECT {FAQ_COLUMNS} FROM faqs ORDER BY created_at DESC"),
        };

        let mut query = sqlx::query_as::<_, Faq>(&sql);
        if let Some(office) = office {
            query = query.bind(office);
        }

        query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to list FAQs: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn list_all(&self) -> Result<Vec<FaqResponseDto>> {
        Ok(self.fetch(None).await?.into_iter().map(Into::into).collect())
    }

    /// FAQs of one office, served from the cache while fresh
    pub async fn list_by_office(&self, office: Office) -> Result<Vec<FaqResponseDto>> {
        if let Some(cached) = self.cache.get(&office).await {
            return Ok(cached);
        }

        let faqs: Vec<FaqResponseDto> = self
            .fetch(Some(office))
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        self.cache.insert(office, faqs.clone()).await;
        Ok(faqs)
    }

    /// FAQs matching a keyword, best first
    pub async fn search(&self, keyword: &str) -> Result<Vec<ScoredFaqDto>> {
        let mut tokens = tokenize(keyword);
        if tokens.is_empty() {
            // Short terms such as "id" still match as substrings
            tokens.push(keyword.trim().to_lowercase());
        }

        let mut scored: Vec<ScoredFaqDto> = self
            .fetch(None)
            .await?
            .into_iter()
            .filter_map(|faq| {
                let score = search_score(&faq.keywords, &faq.question, &tokens);
                (score > 0).then(|| ScoredFaqDto {
                    faq: faq.into(),
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(scored)
    }

    /// Existing FAQs of `office` that look like `question`
    pub async fn find_similar(&self, question: &str, office: Office) -> Result<Vec<ScoredFaqDto>> {
        let tokens = tokenize(question);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.fetch(Some(office)).await?;
        Ok(
            rank_similar(candidates, &tokens, |faq| {
                (faq.keywords.as_slice(), faq.question.as_str())
            })
            .into_iter()
            .map(|(faq, score)| ScoredFaqDto {
                faq: faq.into(),
                score,
            })
            .collect(),
        )
    }

    pub async fn create(&self, actor: &AuthenticatedUser, dto: CreateFaqDto) -> Result<FaqResponseDto> {
        authorize(Some(actor), Action::Create, &Resource::in_office(dto.office))?;

        let question = required(&dto.question, "Please add a question")?;
        let answer = required(&dto.answer, "Please add an answer")?;
        let keywords = tokenize(&question);

        let faq = sqlx::query_as::<_, Faq>(&format!(
            r#"
            INSERT INTO faqs (id, question, answer, office, keywords)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {FAQ_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&question)
        .bind(&answer)
        .bind(dto.office)
        .bind(&keywords)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create FAQ: {:?}", e);
            AppError::Database(e)
        })?;

        self.cache.invalidate(&faq.office).await;
        info!(faq_id = %faq.id, office = %faq.office, "FAQ created by {}", actor.id);
        Ok(faq.into())
    }

    /// Edit a FAQ. A changed question regenerates the keywords and counts as an update.
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateFaqDto,
    ) -> Result<FaqResponseDto> {
        let current = self.find(id).await?;
        authorize(Some(actor), Action::Update, &Resource::in_office(current.office))?;

        let office = dto.office.unwrap_or(current.office);
        if office != current.office {
            authorize(Some(actor), Action::Update, &Resource::in_office(office))?;
        }

        let question = dto
            .question
            .as_deref()
            .map(|q| required(q, "Please add a question"))
            .transpose()?
            .filter(|q| *q != current.question);
        let answer = dto
            .answer
            .as_deref()
            .map(|a| required(a, "Please add an answer"))
            .transpose()?;

        let keywords = question.as_deref().map(tokenize);
        let question_changed = question.is_some();

        let faq = sqlx::query_as::<_, Faq>(&format!(
            r#"
            UPDATE faqs
            SET question = COALESCE($2, question),
                answer = COALESCE($3, answer),
                office = $4,
                keywords = COALESCE($5, keywords),
                update_count = update_count + CASE WHEN $6 THEN 1 ELSE 0 END,
                last_updated = CASE WHEN $6 THEN NOW() ELSE last_updated END
            WHERE id = $1
            RETURNING {FAQ_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(question)
        .bind(answer)
        .bind(office)
        .bind(keywords)
        .bind(question_changed)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update FAQ: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("FAQ not found".to_string()))?;

        self.cache.invalidate(&current.office).await;
        self.cache.invalidate(&faq.office).await;
        info!(faq_id = %id, "FAQ updated by {}", actor.id);
        Ok(faq.into())
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let faq = self.find(id).await?;
        authorize(Some(actor), Action::Delete, &Resource::in_office(faq.office))?;

        sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete FAQ: {:?}", e);
                AppError::Database(e)
            })?;

        self.cache.invalidate(&faq.office).await;
        info!(faq_id = %id, "FAQ deleted by {}", actor.id);
        Ok(())
    }
}
