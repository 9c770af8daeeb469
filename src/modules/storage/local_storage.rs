use chrono::Utc;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

/// Local disk storage for uploads.
///
/// Stored paths are relative and start with the upload directory name,
/// e.g. `uploads/files/1712345678901-Fee_Notice.pdf`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    prefix: String,
    max_upload_size: usize,
}

impl LocalStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_root(config.upload_dir.clone(), config.max_upload_size)
    }

    pub fn with_root(root: PathBuf, max_upload_size: usize) -> Self {
        let prefix = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "uploads".to_string());
        Self {
            root,
            prefix,
            max_upload_size,
        }
    }

    /// Largest accepted upload in bytes
    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    /// Create the root directory
    pub async fn ensure_root(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        info!("Upload directory ready at {:?}", self.root);
        Ok(())
    }

    /// Write `bytes` under `subdir` and return the stored relative path
    pub async fn save(
        &self,
        subdir: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        let stamp = Utc::now().timestamp_millis();
        let clean_name = sanitize_file_name(original_name);
        let subdir = subdir.trim_matches('/');

        // Same name in the same millisecond gets a counter instead of overwriting
        let mut attempt: u32 = 0;
        loop {
            let file_name = if attempt == 0 {
                format!("{}-{}", stamp, clean_name)
            } else {
                format!("{}-{}-{}", stamp, attempt, clean_name)
            };
            let relative = format!("{}/{}/{}", self.prefix, subdir, file_name);
            let full_path = self.resolve(&relative)?;

            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&full_path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(AppError::Storage(e)),
            };
            file.write_all(bytes).await?;
            file.flush().await?;

            debug!("Saved {} bytes to {:?}", bytes.len(), full_path);
            return Ok(relative);
        }
    }

    /// Remove a stored file; `Ok(false)` when it was already gone
    pub async fn delete(&self, relative: &str) -> Result<bool, AppError> {
        let full_path = self.resolve(relative)?;

        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!("Deleted file {:?}", full_path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, AppError> {
        let full_path = self.resolve(relative)?;

        fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound("File not found on server".to_string())
            } else {
                AppError::Storage(e)
            }
        })
    }

    /// Map a stored path onto the root, refusing anything that escapes it
    fn resolve(&self, relative: &str) -> Result<PathBuf, AppError> {
        let invalid = || AppError::BadRequest("Invalid file path".to_string());

        let trimmed = relative.trim_start_matches('/');
        let rest = trimmed
            .strip_prefix(self.prefix.as_str())
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(invalid)?;

        let rest = Path::new(rest);
        if rest.as_os_str().is_empty()
            || !rest.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(invalid());
        }

        Ok(self.root.join(rest))
    }
}

/// Collapse whitespace runs to `_` and drop path separators
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_start_matches('.')
        .to_string();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Content type by file extension
pub fn content_type_for(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> LocalStorage {
        LocalStorage::with_root(dir.path().join("uploads"), 1024)
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Fee  Notice 2024.pdf"), "Fee_Notice_2024.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\report.docx"), "report.docx");
        assert_eq!(sanitize_file_name("   "), "file");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("uploads/files/a.PDF"), "application/pdf");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.xlsx"), content_type_for("b.xlsx"));
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_save_read_delete() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let path = storage.save("files", "Fee Notice.pdf", b"%PDF").await.unwrap();
        assert!(path.starts_with("uploads/files/"));
        assert!(path.ends_with("-Fee_Notice.pdf"));

        assert_eq!(storage.read(&path).await.unwrap(), b"%PDF");
        assert!(storage.delete(&path).await.unwrap());
        assert!(!storage.delete(&path).await.unwrap());
        assert!(matches!(
            storage.read(&path).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_same_name_saves_do_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let mut paths = Vec::new();
        for i in 0..5u8 {
            paths.push(storage.save("files", "report.pdf", &[i]).await.unwrap());
        }

        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), paths.len());

        for (i, path) in paths.iter().enumerate() {
            assert!(path.ends_with("-report.pdf"));
            assert_eq!(storage.read(path).await.unwrap(), vec![i as u8]);
        }
    }

    #[tokio::test]
    async fn test_leading_slash_paths_resolve() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let path = storage.save("announcements", "bg.png", b"png").await.unwrap();
        assert_eq!(storage.read(&format!("/{}", path)).await.unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_rejects_paths_outside_root() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        for path in [
            "uploads/../secret.txt",
            "uploads/files/../../secret.txt",
            "other/files/a.pdf",
            "uploads/",
        ] {
            assert!(
                matches!(storage.delete(path).await, Err(AppError::BadRequest(_))),
                "{path} should be rejected"
            );
        }
    }
}
