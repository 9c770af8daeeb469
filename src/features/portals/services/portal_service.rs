use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Action, Resource};
use crate::features::moderation::models::{ModerationAction, ModerationEntity, ModerationStatus};
use crate::features::moderation::ModerationService;
use crate::features::portals::dtos::{CreatePortalDto, PortalResponseDto, UpdatePortalDto};
use crate::features::portals::models::Portal;

const PORTAL_SELECT: &str = r#"
    SELECT p.id, p.title, p.url, p.icon, p.office, p.author_id, u.name AS author_name,
           p.pinned, p.status, p.created_at, p.updated_at
    FROM portals p
    LEFT JOIN users u ON u.id = p.author_id
"#;

pub struct PortalService {
    pool: PgPool,
    moderation: Arc<ModerationService>,
}

impl PortalService {
    pub fn new(pool: PgPool, moderation: Arc<ModerationService>) -> Self {
        Self { pool, moderation }
    }

    async fn find(&self, id: Uuid) -> Result<Portal> {
        sqlx::query_as::<_, Portal>(&format!("{PORTAL_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch portal: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("No portal found".to_string()))
    }

    async fn get_dto(&self, id: Uuid) -> Result<PortalResponseDto> {
        let portal = self.find(id).await?;
        let comments = self
            .moderation
            .comments_for(ModerationEntity::Portal, id)
            .await?;
        Ok(PortalResponseDto::new(portal, comments))
    }

    async fn list(&self, filter: &str) -> Result<Vec<PortalResponseDto>> {
        let sql = format!("{PORTAL_SELECT} WHERE {filter} ORDER BY p.created_at DESC");
        let portals = sqlx::query_as::<_, Portal>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list portals: {:?}", e);
                AppError::Database(e)
            })?;

        let ids: Vec<Uuid> = portals.iter().map(|p| p.id).collect();
        let mut comments = self
            .moderation
            .comments_for_many(ModerationEntity::Portal, &ids)
            .await?;

        Ok(portals
            .into_iter()
            .map(|portal| {
                let comments = comments.remove(&portal.id).unwrap_or_default();
                PortalResponseDto::new(portal, comments)
            })
            .collect())
    }

    /// Approved portals, newest first
    pub async fn list_approved(&self) -> Result<Vec<PortalResponseDto>> {
        self.list("p.status = 'approved'").await
    }

    pub async fn list_pinned(&self) -> Result<Vec<PortalResponseDto>> {
        self.list("p.status = 'approved' AND p.pinned").await
    }

    pub async fn list_unapproved(&self) -> Result<Vec<PortalResponseDto>> {
        self.list("p.status <> 'approved'").await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        dto: CreatePortalDto,
    ) -> Result<PortalResponseDto> {
        authorize(Some(actor), Action::Create, &Resource::in_office(dto.office))?;

        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO portals (id, title, url, icon, office, author_id, pinned, status)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
            "#,
        )
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.url)
        .bind(dto.icon_or_default())
        .bind(dto.office)
        .bind(actor.id)
        .bind(ModerationStatus::Pending)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create portal: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(portal_id = %id, office = %dto.office, "Portal created by {}", actor.id);
        self.get_dto(id).await
    }

    /// Edit a portal; any edit sends it back to review
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: UpdatePortalDto,
    ) -> Result<PortalResponseDto> {
        let portal = self.find(id).await?;
        authorize(Some(actor), Action::Update, &portal.resource())?;
        if let Some(office) = dto.office.filter(|o| *o != portal.office) {
            authorize(Some(actor), Action::Update, &Resource::in_office(office))?;
        }

        let icon = dto
            .icon
            .map(|icon| icon.trim().to_string())
            .filter(|icon| !icon.is_empty());

        sqlx::query(
            r#"
            UPDATE portals
            SET title = COALESCE($2, title),
                url = COALESCE($3, url),
                icon = COALESCE($4, icon),
                office = COALESCE($5, office),
                status = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.title)
        .bind(dto.url)
        .bind(icon)
        .bind(dto.office)
        .bind(portal.status.reopen())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update portal: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(portal_id = %id, "Portal edited by {}, back to review", actor.id);
        self.get_dto(id).await
    }

    pub async fn toggle_pin(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<PortalResponseDto> {
        let portal = self.find(id).await?;
        authorize(Some(actor), Action::Pin, &portal.resource())?;

        sqlx::query("UPDATE portals SET pinned = NOT pinned, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to toggle portal pin: {:?}", e);
                AppError::Database(e)
            })?;

        self.get_dto(id).await
    }

    pub async fn review(
        &self,
        reviewer: &AuthenticatedUser,
        id: Uuid,
        action: &ModerationAction,
    ) -> Result<PortalResponseDto> {
        authorize(Some(reviewer), Action::Moderate, &Resource::global())?;
        self.moderation
            .review(ModerationEntity::Portal, id, reviewer.id, action)
            .await?;
        self.get_dto(id).await
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let portal = self.find(id).await?;
        authorize(Some(actor), Action::Delete, &portal.resource())?;

        let mut tx = self.pool.begin().await?;
        ModerationService::delete_comments(&mut *tx, ModerationEntity::Portal, id).await?;
        sqlx::query("DELETE FROM portals WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(portal_id = %id, "Portal deleted by {}", actor.id);
        Ok(())
    }
}
