use axum::extract::Multipart;
use std::collections::HashMap;
use tracing::debug;

use crate::core::error::{AppError, Result};

/// A file part of a multipart form
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Lowercased extension of the client-side name
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Multipart form collected into text fields and file parts
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Read every part, refusing files larger than `max_file_size` bytes
    pub async fn read(mut multipart: Multipart, max_file_size: usize) -> Result<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                if data.len() > max_file_size {
                    return Err(AppError::BadRequest(format!(
                        "File too large. Maximum size is {} bytes ({} MB)",
                        max_file_size,
                        max_file_size / 1024 / 1024
                    )));
                }

                // Browsers send an empty part when no file was picked
                if data.is_empty() && file_name.is_empty() {
                    continue;
                }

                form.files.insert(
                    field_name,
                    UploadedFile {
                        file_name,
                        data: data.to_vec(),
                    },
                );
            } else {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
                })?;
                form.fields.insert(field_name, text);
            }
        }

        Ok(form)
    }

    /// Trimmed text value; blank counts as absent
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub fn with_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_trims_and_drops_blank() {
        let form = MultipartForm::with_fields(&[("name", "  Fee Notice "), ("url", "   ")]);
        assert_eq!(form.text("name").as_deref(), Some("Fee Notice"));
        assert_eq!(form.text("url"), None);
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn test_uploaded_file_extension() {
        let file = UploadedFile {
            file_name: "Banner.JPG".to_string(),
            data: vec![],
        };
        assert_eq!(file.extension().as_deref(), Some("jpg"));

        let file = UploadedFile {
            file_name: "README".to_string(),
            data: vec![],
        };
        assert_eq!(file.extension(), None);
    }
}
