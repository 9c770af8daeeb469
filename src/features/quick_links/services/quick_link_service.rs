use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Action, Resource};
use crate::features::moderation::models::{ModerationAction, ModerationEntity, ModerationStatus};
use crate::features::moderation::ModerationService;
use crate::features::quick_links::dtos::{
    CreateQuickLinkDto, QuickLinkResponseDto, UpdateQuickLinkDto,
};
use crate::features::quick_links::models::QuickLink;

const QUICK_LINK_SELECT: &str = r#"
    SELECT q.id, q.title, q.url, q.office, q.author_id, u.name AS author_name,
           q.pinned, q.status, q.created_at, q.updated_at
    FROM quick_links q
    LEFT JOIN users u ON u.id = q.author_id
"#;

/// Service for quick links
pub struct QuickLinkService {
    pool: PgPool,
    moderation: Arc<ModerationService>,
}

impl QuickLinkService {
    pub fn new(pool: PgPool, moderation: Arc<ModerationService>) -> Self {
        Self { pool, moderation }
    }

    async fn find(&self, id: Uuid) -> Result<QuickLink> {
        sqlx::query_as::<_, QuickLink>(&format!("{QUICK_LINK_SELECT} WHERE q.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch quick link: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Quick link not found".to_string()))
    }

    async fn get_dto(&self, id: Uuid) -> Result<QuickLinkResponseDto> {
        let link = self.find(id).await?;
        let comments = self
            .moderation
            .comments_for(ModerationEntity::QuickLink, id)
            .await?;
        Ok(QuickLinkResponseDto::new(link, comments))
    }

    async fn list(&self, filter: &str, author: Option<Uuid>) -> Result<Vec<QuickLinkResponseDto>> {
        let sql = format!("{QUICK_LINK_SELECT} WHERE {filter} ORDER BY q.created_at DESC");
        let mut query = sqlx::query_as::<_, QuickLink>(&sql);
        if let Some(author_id) = author {
            query = query.bind(author_id);
        }

        let links = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to list quick links: {:?}", e);
            AppError::Database(e)
        })?;

        let ids: Vec<Uuid> = links.iter().map(|l| l.id).collect();
        let mut comments = self
            .moderation
            .comments_for_many(ModerationEntity::QuickLink, &ids)
            .await?;

        Ok(links
            .into_iter()
            .map(|link| {
                let comments = comments.remove(&link.id).unwrap_or_default();
                QuickLinkResponseDto::new(link, comments)
            })
            .collect())
    }

    pub async fn list_approved(&self) -> Result<Vec<QuickLinkResponseDto>> {
        self.list("q.status = 'approved'", None).await
    }

    pub async fn list_pinned(&self) -> Result<Vec<QuickLinkResponseDto>> {
        self.list("q.status = 'approved' AND q.pinned", None).await
    }

    pub async fn list_unapproved(&self) -> Result<Vec<QuickLinkResponseDto>> {
        self.list("q.status <> 'approved'", None).await
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<QuickLinkResponseDto>> {
        self.list("q.author_id = $1", Some(author_id)).await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        dto: CreateQuickLinkDto,
    ) -> Result<QuickLinkResponseDto> {
        authorize(Some(actor), Action::Create, &Resource::in_office(dto.office))?;

        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO quick_links (id, title, url, office, author_id, pinned, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.url)
        .bind(dto.office)
        .bind(actor.id)
        .bind(dto.pinned.unwrap_or(true))
        .bind(ModerationStatus::Pending)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quick link: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(quick_link_id = %id, office = %dto.office, "Quick link created by {}", actor.id);
        self.get_dto(id).await
    }

    /// Edit a link; any edit sends it back to review
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateQuickLinkDto,
    ) -> Result<QuickLinkResponseDto> {
        let link = self.find(id).await?;
        authorize(Some(actor), Action::Update, &link.resource())?;
        if let Some(office) = dto.office.filter(|o| *o != link.office) {
            authorize(Some(actor), Action::Update, &Resource::in_office(office))?;
        }

        sqlx::query(
            r#"
            UPDATE quick_links
            SET title = COALESCE($2, title),
                url = COALESCE($3, url),
                office = COALESCE($4, office),
                status = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.title)
        .bind(dto.url)
        .bind(dto.office)
        .bind(link.status.reopen())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update quick link: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(quick_link_id = %id, "Quick link edited by {}, back to review", actor.id);
        self.get_dto(id).await
    }

    pub async fn set_pinned(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        pinned: bool,
    ) -> Result<QuickLinkResponseDto> {
        let link = self.find(id).await?;
        authorize(Some(actor), Action::Pin, &link.resource())?;

        sqlx::query("UPDATE quick_links SET pinned = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(pinned)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to pin quick link: {:?}", e);
                AppError::Database(e)
            })?;

        self.get_dto(id).await
    }

    pub async fn review(
        &self,
        reviewer: &AuthenticatedUser,
        id: Uuid,
        action: &ModerationAction,
    ) -> Result<QuickLinkResponseDto> {
        authorize(Some(reviewer), Action::Moderate, &Resource::global())?;
        self.moderation
            .review(ModerationEntity::QuickLink, id, reviewer.id, action)
            .await?;
        self.get_dto(id).await
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let link = self.find(id).await?;
        authorize(Some(actor), Action::Delete, &link.resource())?;

        let mut tx = self.pool.begin().await?;
        ModerationService::delete_comments(&mut *tx, ModerationEntity::QuickLink, id).await?;
        sqlx::query("DELETE FROM quick_links WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(quick_link_id = %id, "Quick link deleted by {}", actor.id);
        Ok(())
    }
}
