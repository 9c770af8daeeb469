use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Action, Resource};
use crate::features::files::dtos::{FileResponseDto, UpdateFileDto};
use crate::features::files::models::{File, FileSource, FileVersion};
use crate::features::moderation::models::{ModerationAction, ModerationEntity};
use crate::features::moderation::ModerationService;
use crate::features::offices::models::Office;
use crate::modules::storage::{content_type_for, LocalStorage};
use crate::shared::multipart::UploadedFile;

const FILE_SELECT: &str = r#"
    SELECT f.id, f.name, f.office, f.category, f.status, f.author_id,
           u.name AS author_name, f.url, f.file_path, f.replaced_paths,
           f.created_at, f.updated_at
    FROM files f
    LEFT JOIN users u ON u.id = f.author_id
"#;

/// Storage sub-directory for file uploads
const FILES_DIR: &str = "files";

/// Validated input for a new file
#[derive(Debug)]
pub struct NewFile {
    pub name: String,
    pub office: Office,
    pub category: String,
    pub url: Option<String>,
    pub upload: Option<UploadedFile>,
}

/// What a download request resolves to
#[derive(Debug)]
pub enum Download {
    Redirect(String),
    Content {
        file_name: String,
        content_type: &'static str,
        data: Vec<u8>,
    },
}

/// Service for the file archive
pub struct FileService {
    pool: PgPool,
    storage: Arc<LocalStorage>,
    moderation: Arc<ModerationService>,
}

impl FileService {
    pub fn new(pool: PgPool, storage: Arc<LocalStorage>, moderation: Arc<ModerationService>) -> Self {
        Self {
            pool,
            storage,
            moderation,
        }
    }

    pub fn max_upload_size(&self) -> usize {
        self.storage.max_upload_size()
    }

    /// Write the upload to disk or take the link; the upload wins when both are given
    async fn store_source(
        &self,
        name: &str,
        url: Option<String>,
        upload: Option<UploadedFile>,
    ) -> Result<FileSource> {
        match (upload, url) {
            (Some(upload), _) => {
                let original = if upload.file_name.trim().is_empty() {
                    name
                } else {
                    upload.file_name.as_str()
                };
                let path = self.storage.save(FILES_DIR, original, &upload.data).await?;
                Ok(FileSource::Stored(path))
            }
            (None, Some(url)) => Ok(FileSource::Link(url)),
            (None, None) => Err(AppError::BadRequest(
                "Please upload a file or provide a URL".to_string(),
            )),
        }
    }

    /// Remove a freshly written upload after the database write failed
    async fn discard_source(&self, source: &FileSource) {
        if let FileSource::Stored(path) = source {
            if let Err(e) = self.storage.delete(path).await {
                warn!("Failed to remove orphaned upload {}: {}", path, e);
            }
        }
    }

    pub async fn upload(&self, actor: &AuthenticatedUser, input: NewFile) -> Result<FileResponseDto> {
        authorize(Some(actor), Action::Create, &Resource::in_office(input.office))?;

        let source = self.store_source(&input.name, input.url, input.upload).await?;
        let id = Uuid::now_v7();

        let inserted = sqlx::query(
            r#"
            INSERT INTO files (id, name, office, category, status, author_id, url, file_path)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.office)
        .bind(&input.category)
        .bind(actor.id)
        .bind(source.url())
        .bind(source.file_path())
        .execute(&self.pool)
        .await;

        if let Err(e) = inserted {
            tracing::error!("Failed to create file: {:?}", e);
            self.discard_source(&source).await;
            return Err(AppError::Database(e));
        }

        info!(file_id = %id, office = %input.office, "File uploaded by {}", actor.id);
        self.get_dto(id).await
    }

    pub async fn find(&self, id: Uuid) -> Result<File> {
        sqlx::query_as::<_, File>(&format!("{FILE_SELECT} WHERE f.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch file: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    async fn get_dto(&self, id: Uuid) -> Result<FileResponseDto> {
        let file = self.find(id).await?;
        let mut hydrated = self.hydrate(vec![file]).await?;
        hydrated
            .pop()
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// A single file, visible per the read policy
    pub async fn get(&self, actor: Option<&AuthenticatedUser>, id: Uuid) -> Result<FileResponseDto> {
        let file = self.find(id).await?;
        authorize(actor, Action::Read, &file.resource())?;

        let mut hydrated = self.hydrate(vec![file]).await?;
        hydrated
            .pop()
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    async fn fetch_versions(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<FileVersion>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, FileVersion>(
            r#"
            SELECT id, file_id, position, name, url, file_path, created_at
            FROM file_versions
            WHERE file_id = ANY($1)
            ORDER BY file_id, position
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch file versions: {:?}", e);
            AppError::Database(e)
        })?;

        let mut grouped: HashMap<Uuid, Vec<FileVersion>> = HashMap::new();
        for row in rows {
            grouped.entry(row.file_id).or_default().push(row);
        }
        Ok(grouped)
    }

    /// Attach versions and comments, preserving the order of `files`
    async fn hydrate(&self, files: Vec<File>) -> Result<Vec<FileResponseDto>> {
        let ids: Vec<Uuid> = files.iter().map(|f| f.id).collect();
        let mut versions = self.fetch_versions(&ids).await?;
        let mut comments = self
            .moderation
            .comments_for_many(ModerationEntity::File, &ids)
            .await?;

        Ok(files
            .into_iter()
            .map(|file| {
                let id = file.id;
                FileResponseDto::new(
                    file,
                    versions.remove(&id).unwrap_or_default(),
                    comments.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn list(&self, filter: &str, binds: ListBinds) -> Result<Vec<FileResponseDto>> {
        let sql = format!("{FILE_SELECT} WHERE {filter} ORDER BY f.created_at DESC");
        let mut query = sqlx::query_as::<_, File>(&sql);
        query = match binds {
            ListBinds::None => query,
            ListBinds::Office(office) => query.bind(office),
            ListBinds::Author(author_id) => query.bind(author_id),
        };

        let files = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to list files: {:?}", e);
            AppError::Database(e)
        })?;

        self.hydrate(files).await
    }

    pub async fn list_approved(&self) -> Result<Vec<FileResponseDto>> {
        self.list("f.status = 'approved'", ListBinds::None).await
    }

    /// Files awaiting or failing review; admins only see their own office
    pub async fn list_unapproved(&self, actor: &AuthenticatedUser) -> Result<Vec<FileResponseDto>> {
        if actor.is_super_admin() {
            return self.list("f.status <> 'approved'", ListBinds::None).await;
        }

        match actor.office {
            Some(office) => {
                self.list(
                    "f.status <> 'approved' AND f.office = $1",
                    ListBinds::Office(office),
                )
                .await
            }
            None => Ok(Vec::new()),
        }
    }

    pub async fn list_pending(&self) -> Result<Vec<FileResponseDto>> {
        self.list("f.status = 'pending'", ListBinds::None).await
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<FileResponseDto>> {
        self.list("f.author_id = $1", ListBinds::Author(author_id))
            .await
    }

    pub async fn list_by_office(
        &self,
        office: Office,
        approved_only: bool,
    ) -> Result<Vec<FileResponseDto>> {
        let filter = if approved_only {
            "f.office = $1 AND f.status = 'approved'"
        } else {
            "f.office = $1"
        };
        self.list(filter, ListBinds::Office(office)).await
    }

    /// Edit name and category; the moderation status is left as is
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateFileDto,
    ) -> Result<FileResponseDto> {
        let file = self.find(id).await?;
        authorize(Some(actor), Action::Update, &file.resource())?;

        sqlx::query(
            r#"
            UPDATE files
            SET name = COALESCE($2, name),
                category = COALESCE($3, category),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.name)
        .bind(dto.category)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update file: {:?}", e);
            AppError::Database(e)
        })?;

        info!(file_id = %id, "File metadata updated by {}", actor.id);
        self.get_dto(id).await
    }

    pub async fn review(
        &self,
        reviewer: &AuthenticatedUser,
        id: Uuid,
        action: &ModerationAction,
    ) -> Result<FileResponseDto> {
        authorize(Some(reviewer), Action::Moderate, &Resource::global())?;
        self.moderation
            .review(ModerationEntity::File, id, reviewer.id, action)
            .await?;
        self.get_dto(id).await
    }

    /// Append a version and make it current; the file goes back to review
    pub async fn add_version(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        name: Option<String>,
        url: Option<String>,
        upload: Option<UploadedFile>,
    ) -> Result<FileResponseDto> {
        let file = self.find(id).await?;
        authorize(Some(actor), Action::Update, &file.resource())?;

        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| file.name.clone());
        let source = self.store_source(&name, url, upload).await?;

        match self.persist_version(id, name, source.clone()).await {
            Ok(previous_path) => {
                if let Some(path) = previous_path {
                    info!(file_id = %id, "Previous file kept on disk as history: {}", path);
                }
                info!(file_id = %id, "File version added by {}", actor.id);
                self.get_dto(id).await
            }
            Err(e) => {
                self.discard_source(&source).await;
                Err(e)
            }
        }
    }

    /// Returns the stored path that stopped being current, if any
    async fn persist_version(
        &self,
        id: Uuid,
        name: String,
        source: FileSource,
    ) -> Result<Option<String>> {
        let mut tx = self.pool.begin().await?;

        let mut file = sqlx::query_as::<_, File>(&format!(
            "{FILE_SELECT} WHERE f.id = $1 FOR UPDATE OF f"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let position = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM file_versions WHERE file_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let previous_path = file.file_path.clone();
        let version = file.apply_version(name, source, position as i32);

        sqlx::query(
            r#"
            INSERT INTO file_versions (id, file_id, position, name, url, file_path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(version.id)
        .bind(version.file_id)
        .bind(version.position)
        .bind(&version.name)
        .bind(&version.url)
        .bind(&version.file_path)
        .bind(version.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE files
            SET name = $2, url = $3, file_path = $4, status = $5, updated_at = $6,
                replaced_paths = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&file.name)
        .bind(&file.url)
        .bind(&file.file_path)
        .bind(file.status)
        .bind(file.updated_at)
        .bind(&file.replaced_paths)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(previous_path.filter(|p| Some(p) != file.file_path.as_ref()))
    }

    /// Delete the record with its history, then the current file on disk.
    ///
    /// Files of earlier versions stay on disk.
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        let file = self.find(id).await?;
        authorize(Some(actor), Action::Delete, &file.resource())?;

        let versions = self
            .fetch_versions(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM file_versions WHERE file_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        ModerationService::delete_comments(&mut *tx, ModerationEntity::File, id).await?;
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        tx.commit().await?;

        info!(file_id = %id, "File record deleted by {}", actor.id);

        remove_current_file(&self.storage, &file, &versions).await;

        Ok(())
    }

    pub async fn download(&self, actor: Option<&AuthenticatedUser>, id: Uuid) -> Result<Download> {
        let file = self.find(id).await?;
        authorize(actor, Action::Read, &file.resource())?;

        if let Some(url) = file.url {
            return Ok(Download::Redirect(url));
        }

        let path = file
            .file_path
            .ok_or_else(|| AppError::NotFound("No file path found".to_string()))?;
        let data = self.storage.read(&path).await?;
        let file_name = path.rsplit('/').next().unwrap_or(path.as_str()).to_string();

        Ok(Download::Content {
            content_type: content_type_for(&path),
            file_name,
            data,
        })
    }

    /// Categories used by files of the office plus registered ones, sorted
    pub async fn categories(&self, office: Office) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT category FROM files WHERE office = $1
            UNION
            SELECT category FROM office_categories WHERE office = $1
            ORDER BY category
            "#,
        )
        .bind(office)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list office categories: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn add_category(
        &self,
        actor: &AuthenticatedUser,
        office: Office,
        category: &str,
    ) -> Result<Vec<String>> {
        authorize(Some(actor), Action::Create, &Resource::in_office(office))?;

        let category = category.trim();
        let existing = self.categories(office).await?;
        if existing.iter().any(|c| c == category) {
            return Err(AppError::BadRequest(
                "Category already exists for this office".to_string(),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO office_categories (office, category, created_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (office, category) DO NOTHING
            "#,
        )
        .bind(office)
        .bind(category)
        .bind(actor.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add office category: {:?}", e);
            AppError::Database(e)
        })?;

        info!(office = %office, "Category '{}' added by {}", category, actor.id);
        self.categories(office).await
    }
}

enum ListBinds {
    None,
    Office(Office),
    Author(Uuid),
}

/// Remove the current file of a deleted record from disk.
///
/// Earlier uploads stay on disk and are returned after being logged.
async fn remove_current_file<'a>(
    storage: &LocalStorage,
    file: &'a File,
    versions: &'a [FileVersion],
) -> Vec<&'a str> {
    if let Some(path) = file.file_path.as_deref() {
        match storage.delete(path).await {
            Ok(true) => info!("File deleted from disk: {}", path),
            Ok(false) => warn!("File already missing from disk: {}", path),
            Err(e) => warn!("Failed to delete {} from disk: {}", path, e),
        }
    }

    let retained = file.retained_paths(versions);
    for path in &retained {
        warn!(file_id = %file.id, "Version file retained on disk: {}", path);
    }
    retained
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::features::moderation::models::ModerationStatus;

    fn stored_file(path: String) -> File {
        File {
            id: Uuid::now_v7(),
            name: "Timetable".to_string(),
            office: Office::ExaminationsOffice,
            category: "Schedules".to_string(),
            status: ModerationStatus::Approved,
            author_id: None,
            author_name: None,
            url: None,
            file_path: Some(path),
            replaced_paths: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_current_file_and_keeps_versions() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_root(dir.path().join("uploads"), 1024);

        let original = storage.save(FILES_DIR, "timetable.pdf", b"v0").await.unwrap();
        let second = storage.save(FILES_DIR, "timetable-2.pdf", b"v1").await.unwrap();
        let current = storage.save(FILES_DIR, "timetable-3.pdf", b"v2").await.unwrap();

        let mut file = stored_file(original.clone());
        let versions = vec![
            file.apply_version(
                "Timetable 2".to_string(),
                FileSource::Stored(second.clone()),
                0,
            ),
            file.apply_version(
                "Timetable 3".to_string(),
                FileSource::Stored(current.clone()),
                1,
            ),
        ];

        let retained = remove_current_file(&storage, &file, &versions).await;

        let mut expected = vec![original.as_str(), second.as_str()];
        expected.sort_unstable();
        assert_eq!(retained, expected);

        assert!(matches!(storage.read(&current).await, Err(AppError::NotFound(_))));
        assert_eq!(storage.read(&original).await.unwrap(), b"v0");
        assert_eq!(storage.read(&second).await.unwrap(), b"v1");
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_current_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_root(dir.path().join("uploads"), 1024);
        let file = stored_file("uploads/files/1-gone.pdf".to_string());

        assert!(remove_current_file(&storage, &file, &[]).await.is_empty());
    }
}
