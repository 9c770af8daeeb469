use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::moderation::models::{
    Comment, CommentDto, ModerationAction, ModerationEntity, ModerationStatus,
};

/// Status transitions and reviewer comments for every moderated entity
pub struct ModerationService {
    pool: PgPool,
}

impl ModerationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply an approve/reject decision to a pending entity.
    ///
    /// The status row is locked for the duration of the transaction and the
    /// rejection comment is written in the same transaction.
    pub async fn review(
        &self,
        entity: ModerationEntity,
        id: Uuid,
        reviewer_id: Uuid,
        action: &ModerationAction,
    ) -> Result<ModerationStatus> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT status FROM {} WHERE id = $1 FOR UPDATE", entity.table());
        let current = sqlx::query_scalar::<_, ModerationStatus>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load {} status: {:?}", entity.table(), e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", entity.label())))?;

        let next = current.transition(action)?;

        let update = format!(
            "UPDATE {} SET status = $2, updated_at = NOW() WHERE id = $1",
            entity.table()
        );
        sqlx::query(&update)
            .bind(id)
            .bind(next)
            .execute(&mut *tx)
            .await?;

        if let Some(comment) = action.comment() {
            Self::insert_comment(&mut *tx, entity, id, reviewer_id, comment).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "{} {} moved from {} to {} by {}",
            entity.label(),
            id,
            current,
            next,
            reviewer_id
        );

        Ok(next)
    }

    /// Comments for one entity, oldest first
    pub async fn comments_for(
        &self,
        entity: ModerationEntity,
        id: Uuid,
    ) -> Result<Vec<CommentDto>> {
        let mut grouped = self.comments_for_many(entity, &[id]).await?;
        Ok(grouped.remove(&id).unwrap_or_default())
    }

    /// Comments for a batch of entities keyed by entity id
    pub async fn comments_for_many(
        &self,
        entity: ModerationEntity,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<CommentDto>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.entity_id, c.author_id, u.name AS author_name, c.content, c.created_at
            FROM moderation_comments c
            LEFT JOIN users u ON u.id = c.author_id
            WHERE c.entity_kind = $1 AND c.entity_id = ANY($2)
            ORDER BY c.created_at
            "#,
        )
        .bind(entity)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments: {:?}", e);
            AppError::Database(e)
        })?;

        let mut grouped: HashMap<Uuid, Vec<CommentDto>> = HashMap::new();
        for row in rows {
            grouped.entry(row.entity_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    pub async fn insert_comment(
        conn: &mut PgConnection,
        entity: ModerationEntity,
        entity_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO moderation_comments (entity_kind, entity_id, author_id, content)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entity)
        .bind(entity_id)
        .bind(author_id)
        .bind(content)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Remove every comment of an entity (used when the entity is deleted)
    pub async fn delete_comments(
        conn: &mut PgConnection,
        entity: ModerationEntity,
        entity_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM moderation_comments WHERE entity_kind = $1 AND entity_id = $2",
        )
        .bind(entity)
        .bind(entity_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
