use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::policy::Resource;
use crate::features::moderation::models::ModerationStatus;
use crate::features::offices::models::Office;

/// Database model for files, joined with the author's name
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: Uuid,
    pub name: String,
    pub office: Office,
    pub category: String,
    pub status: ModerationStatus,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub url: Option<String>,
    pub file_path: Option<String>,
    /// Stored paths that were current before a version replaced them
    pub replaced_paths: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Historical snapshot of a file's name and location
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileVersion {
    pub id: Uuid,
    pub file_id: Uuid,
    pub position: i32,
    pub name: String,
    pub url: Option<String>,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Where the content of a file or version lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Stored on local disk under the upload directory
    Stored(String),
    /// External link
    Link(String),
}

impl FileSource {
    pub fn url(&self) -> Option<String> {
        match self {
            FileSource::Link(url) => Some(url.clone()),
            FileSource::Stored(_) => None,
        }
    }

    pub fn file_path(&self) -> Option<String> {
        match self {
            FileSource::Stored(path) => Some(path.clone()),
            FileSource::Link(_) => None,
        }
    }
}

impl File {
    pub fn resource(&self) -> Resource {
        Resource::new(self.office, self.status)
    }

    /// Make a new version current.
    ///
    /// The returned version is appended to the history at `position`; the
    /// file's own name and location now equal it and review starts over.
    pub fn apply_version(&mut self, name: String, source: FileSource, position: i32) -> FileVersion {
        let now = Utc::now();
        let version = FileVersion {
            id: Uuid::now_v7(),
            file_id: self.id,
            position,
            name,
            url: source.url(),
            file_path: source.file_path(),
            created_at: now,
        };

        if let Some(previous) = self.file_path.take() {
            if !self.replaced_paths.contains(&previous) {
                self.replaced_paths.push(previous);
            }
        }

        self.name = version.name.clone();
        self.url = version.url.clone();
        self.file_path = version.file_path.clone();
        self.status = self.status.reopen();
        self.updated_at = now;

        version
    }

    /// Stored paths of the original upload and earlier versions that are
    /// no longer the current file
    pub fn retained_paths<'a>(&'a self, versions: &'a [FileVersion]) -> Vec<&'a str> {
        let mut paths: Vec<&str> = self
            .replaced_paths
            .iter()
            .map(String::as_str)
            .chain(versions.iter().filter_map(|v| v.file_path.as_deref()))
            .filter(|p| Some(*p) != self.file_path.as_deref())
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> File {
        File {
            id: Uuid::now_v7(),
            name: "Fee Notice".to_string(),
            office: Office::AccountsOffice,
            category: "Notices".to_string(),
            status: ModerationStatus::Approved,
            author_id: None,
            author_name: None,
            url: None,
            file_path: Some("uploads/files/1-Fee_Notice.pdf".to_string()),
            replaced_paths: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_n_versions_stack_and_last_is_current() {
        let mut file = sample_file();
        let mut versions = Vec::new();

        for n in 0..4 {
            let source = if n % 2 == 0 {
                FileSource::Stored(format!("uploads/files/{n}-v.pdf"))
            } else {
                FileSource::Link(format!("https://docs.example.edu/v{n}"))
            };
            let version = file.apply_version(format!("Fee Notice v{n}"), source, n);
            versions.push(version);
        }

        assert_eq!(versions.len(), 4);
        let last = versions.last().unwrap();
        assert_eq!(file.name, last.name);
        assert_eq!(file.url, last.url);
        assert_eq!(file.file_path, last.file_path);
        assert_eq!(file.url.as_deref(), Some("https://docs.example.edu/v3"));
        assert_eq!(file.file_path, None);
        assert!(versions.iter().all(|v| v.file_id == file.id));
        assert_eq!(
            versions.iter().map(|v| v.position).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_new_version_resets_review() {
        let mut file = sample_file();
        file.apply_version(
            "Fee Notice 2".to_string(),
            FileSource::Link("https://x.example.edu".to_string()),
            0,
        );
        assert_eq!(file.status, ModerationStatus::Pending);
    }

    #[test]
    fn test_source_fields_are_exclusive() {
        let stored = FileSource::Stored("uploads/files/a.pdf".to_string());
        assert_eq!(stored.url(), None);
        assert_eq!(stored.file_path().as_deref(), Some("uploads/files/a.pdf"));

        let link = FileSource::Link("https://a.example.edu".to_string());
        assert_eq!(link.file_path(), None);
    }

    #[test]
    fn test_retained_paths_exclude_current() {
        let mut file = sample_file();
        let versions = vec![
            file.apply_version(
                "v1".to_string(),
                FileSource::Stored("uploads/files/1-v1.pdf".to_string()),
                0,
            ),
            file.apply_version(
                "v2".to_string(),
                FileSource::Stored("uploads/files/2-v2.pdf".to_string()),
                1,
            ),
        ];

        assert_eq!(
            file.retained_paths(&versions),
            vec!["uploads/files/1-Fee_Notice.pdf", "uploads/files/1-v1.pdf"]
        );
    }

    #[test]
    fn test_original_upload_is_retained_after_first_version() {
        let mut file = sample_file();
        let versions = vec![file.apply_version(
            "Fee Notice 2".to_string(),
            FileSource::Link("https://docs.example.edu/fee".to_string()),
            0,
        )];

        assert_eq!(file.file_path, None);
        assert_eq!(file.replaced_paths, vec!["uploads/files/1-Fee_Notice.pdf"]);
        assert_eq!(
            file.retained_paths(&versions),
            vec!["uploads/files/1-Fee_Notice.pdf"]
        );
    }

    #[test]
    fn test_reverting_to_a_path_does_not_retain_it() {
        let mut file = sample_file();
        let versions = vec![
            file.apply_version(
                "v1".to_string(),
                FileSource::Stored("uploads/files/2-v1.pdf".to_string()),
                0,
            ),
            file.apply_version(
                "v2".to_string(),
                FileSource::Stored("uploads/files/1-Fee_Notice.pdf".to_string()),
                1,
            ),
        ];

        assert_eq!(file.retained_paths(&versions), vec!["uploads/files/2-v1.pdf"]);
    }
}
