use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::announcements::dtos::AnnouncementResponseDto;
use crate::features::announcements::models::Announcement;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Action, Resource};
use crate::features::moderation::models::{ModerationAction, ModerationEntity, ModerationStatus};
use crate::features::moderation::ModerationService;
use crate::features::offices::models::Office;
use crate::modules::storage::LocalStorage;
use crate::shared::cache::TtlCache;
use crate::shared::constants::{DEFAULT_ANNOUNCEMENT_LINK, LATEST_ANNOUNCEMENTS_LIMIT};
use crate::shared::multipart::UploadedFile;

const ANNOUNCEMENT_SELECT: &str = r#"
    SELECT a.id, a.title, a.office, a.author_id, u.name AS author_name,
           a.image, a.link, a.status, a.created_at, a.updated_at
    FROM announcements a
    LEFT JOIN users u ON u.id = a.author_id
"#;

/// Storage sub-directory for announcement images
const IMAGES_DIR: &str = "announcements";

const LATEST_KEY: &str = "latest";

/// Cache for the latest announcements feed
pub type AnnouncementCache = TtlCache<&'static str, Vec<AnnouncementResponseDto>>;

#[derive(Debug)]
pub struct NewAnnouncement {
    pub title: String,
    pub office: Office,
    pub link: Option<String>,
    pub image: Option<UploadedFile>,
}

/// Fields of an edit; absent fields keep their value
#[derive(Debug, Default)]
pub struct AnnouncementChanges {
    pub title: Option<String>,
    pub office: Option<Office>,
    pub link: Option<String>,
    pub image: Option<UploadedFile>,
}

pub struct AnnouncementService {
    pool: PgPool,
    storage: Arc<LocalStorage>,
    moderation: Arc<ModerationService>,
    cache: AnnouncementCache,
}

impl AnnouncementService {
    pub fn new(
        pool: PgPool,
        storage: Arc<LocalStorage>,
        moderation: Arc<ModerationService>,
        cache: AnnouncementCache,
    ) -> Self {
        Self {
            pool,
            storage,
            moderation,
            cache,
        }
    }

    async fn save_image(&self, image: Option<UploadedFile>) -> Result<Option<String>> {
        match image {
            Some(image) => {
                let path = self
                    .storage
                    .save(IMAGES_DIR, &image.file_name, &image.data)
                    .await?;
                Ok(Some(format!("/{}", path)))
            }
            None => Ok(None),
        }
    }

    async fn discard_image(&self, path: &str) {
        if let Err(e) = self.storage.delete(path).await {
            warn!("Failed to remove announcement image {}: {}", path, e);
        }
    }

    async fn find(&self, id: Uuid) -> Result<Announcement> {
        sqlx::query_as::<_, Announcement>(&format!("{ANNOUNCEMENT_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch announcement: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
    }

    async fn get_dto(&self, id: Uuid) -> Result<AnnouncementResponseDto> {
        let announcement = self.find(id).await?;
        let comments = self
            .moderation
            .comments_for(ModerationEntity::Announcement, id)
            .await?;
        Ok(AnnouncementResponseDto::new(announcement, comments))
    }

    async fn list(
        &self,
        filter: &str,
        author: Option<Uuid>,
        limit: Option<i64>,
    ) -> Result<Vec<AnnouncementResponseDto>> {
        let mut sql = format!("{ANNOUNCEMENT_SELECT} WHERE {filter} ORDER BY a.created_at DESC");
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut query = sqlx::query_as::<_, Announcement>(&sql);
        if let Some(author_id) = author {
            query = query.bind(author_id);
        }

        let announcements = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to list announcements: {:?}", e);
            AppError::Database(e)
        })?;

        let ids: Vec<Uuid> = announcements.iter().map(|a| a.id).collect();
        let mut comments = self
            .moderation
            .comments_for_many(ModerationEntity::Announcement, &ids)
            .await?;

        Ok(announcements
            .into_iter()
            .map(|announcement| {
                let comments = comments.remove(&announcement.id).unwrap_or_default();
                AnnouncementResponseDto::new(announcement, comments)
            })
            .collect())
    }

    pub async fn list_approved(&self) -> Result<Vec<AnnouncementResponseDto>> {
        self.list("a.status = 'approved'", None, None).await
    }

    /// Newest approved announcements, served from the cache while fresh
    pub async fn latest(&self) -> Result<Vec<AnnouncementResponseDto>> {
        if let Some(cached) = self.cache.get(&LATEST_KEY).await {
            return Ok(cached);
        }

        let latest = self
            .list("a.status = 'approved'", None, Some(LATEST_ANNOUNCEMENTS_LIMIT))
            .await?;
        self.cache.insert(LATEST_KEY, latest.clone()).await;
        Ok(latest)
    }

    pub async fn list_pending(&self) -> Result<Vec<AnnouncementResponseDto>> {
        self.list("a.status = 'pending'", None, None).await
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<AnnouncementResponseDto>> {
        self.list("a.author_id = $1", Some(author_id), None).await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        input: NewAnnouncement,
    ) -> Result<AnnouncementResponseDto> {
        authorize(Some(actor), Action::Create, &Resource::in_office(input.office))?;

        let uploaded = self.save_image(input.image).await?;
        let image = uploaded
            .clone()
            .unwrap_or_else(|| Announcement::default_image(input.office));
        let link = input
            .link
            .unwrap_or_else(|| DEFAULT_ANNOUNCEMENT_LINK.to_string());
        let id = Uuid::now_v7();

        let inserted = sqlx::query(
            r#"
            INSERT INTO announcements (id, title, office, author_id, image, link, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(input.office)
        .bind(actor.id)
        .bind(&image)
        .bind(&link)
        .bind(ModerationStatus::Pending)
        .execute(&self.pool)
        .await;

        if let Err(e) = inserted {
            tracing::error!("Failed to create announcement: {:?}", e);
            if let Some(path) = uploaded {
                self.discard_image(&path).await;
            }
            return Err(AppError::Database(e));
        }

        info!(announcement_id = %id, office = %input.office, "Announcement created by {}", actor.id);
        self.get_dto(id).await
    }

    /// Edit an announcement. It returns to review and the editor becomes the author.
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        changes: AnnouncementChanges,
    ) -> Result<AnnouncementResponseDto> {
        let current = self.find(id).await?;
        authorize(Some(actor), Action::Update, &current.resource())?;
        let office = changes.office.unwrap_or(current.office);
        if office != current.office {
            authorize(Some(actor), Action::Update, &Resource::in_office(office))?;
        }

        let uploaded = self.save_image(changes.image).await?;
        let image = match &uploaded {
            Some(path) => path.clone(),
            None if current.has_uploaded_image() => current.image.clone(),
            // Stock backgrounds follow the office
            None => Announcement::default_image(office),
        };

        let updated = sqlx::query(
            r#"
            UPDATE announcements
            SET title = COALESCE($2, title),
                office = $3,
                link = COALESCE($4, link),
                image = $5,
                author_id = $6,
                status = $7,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(office)
        .bind(changes.link)
        .bind(&image)
        .bind(actor.id)
        .bind(current.status.reopen())
        .execute(&self.pool)
        .await;

        if let Err(e) = updated {
            tracing::error!("Failed to update announcement: {:?}", e);
            if let Some(path) = uploaded {
                self.discard_image(&path).await;
            }
            return Err(AppError::Database(e));
        }

        if uploaded.is_some() && current.has_uploaded_image() {
            self.discard_image(&current.image).await;
        }

        self.cache.invalidate(&LATEST_KEY).await;
        info!(announcement_id = %id, "Announcement edited by {}, back to review", actor.id);
        self.get_dto(id).await
    }

    pub async fn review(
        &self,
        reviewer: &AuthenticatedUser,
        id: Uuid,
        action: &ModerationAction,
    ) -> Result<AnnouncementResponseDto> {
        authorize(Some(reviewer), Action::Moderate, &Resource::global())?;
        self.moderation
            .review(ModerationEntity::Announcement, id, reviewer.id, action)
            .await?;
        self.cache.invalidate(&LATEST_KEY).await;
        self.get_dto(id).await
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let announcement = self.find(id).await?;
        authorize(Some(actor), Action::Delete, &announcement.resource())?;

        let mut tx = self.pool.begin().await?;
        ModerationService::delete_comments(&mut *tx, ModerationEntity::Announcement, id).await?;
        sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        if announcement.has_uploaded_image() {
            self.discard_image(&announcement.image).await;
        }

        self.cache.invalidate(&LATEST_KEY).await;
        info!(announcement_id = %id, "Announcement deleted by {}", actor.id);
        Ok(())
    }
}
