//! Local-disk storage service for job artifacts.
//!
//! Every job owns one directory under the files root; artifact keys are
//! `<job_id>/<label>_<millis><ext>` relative to that root. Deleting a job
//! removes the whole directory.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AppError, AppResult};

/// Filesystem storage rooted at the configured files directory.
#[derive(Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Create the storage service, ensuring the root directory exists.
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();

        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create files directory: {}", e)))?;

        info!("File storage initialized: root={}", root.display());

        Ok(Self { root })
    }

    /// Get the content type for a file based on its extension.
    pub fn content_type_for_extension(ext: &str) -> &'static str {
        match ext.to_lowercase().as_str() {
            "html" | "htm" => "text/html",
            "pdf" => "application/pdf",
            "txt" | "log" | "inp" | "msh" => "text/plain",
            "csv" => "text/csv",
            "json" => "application/json",
            "xml" => "application/xml",
            "stl" => "model/stl",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "svg" => "image/svg+xml",
            "zip" => "application/zip",
            _ => "application/octet-stream",
        }
    }

    /// Infer the content type from a storage key or filename.
    pub fn content_type_for_key(key: &str) -> &'static str {
        let ext = key.rsplit('.').next().unwrap_or("");
        Self::content_type_for_extension(ext)
    }

    /// Build the storage key for a job artifact, keeping the original
    /// extension: `<job_id>/<label>_<millis><ext>`.
    pub fn job_file_key(job_id: i32, label: &str, original_name: &str, millis: i64) -> String {
        let ext = Path::new(original_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        format!("{}/{}_{}{}", job_id, label, millis, ext)
    }

    /// Reject keys that would escape the files root.
    fn validate_key(key: &str) -> AppResult<()> {
        if key.is_empty() {
            return Err(AppError::InvalidInput("Empty file path".to_string()));
        }
        if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
            return Err(AppError::InvalidInput(
                "Path traversal not allowed".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.root.join(key))
    }

    /// Write an artifact to disk, creating the job directory as needed.
    pub async fn put(&self, key: &str, data: &[u8]) -> AppResult<()> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create artifact directory: {}", e))
            })?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write artifact: {}", e)))?;

        Ok(())
    }

    /// Read an artifact from disk.
    pub async fn get(&self, key: &str) -> AppResult<Vec<u8>> {
        let path = self.resolve(key)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File {}", key)))
            }
            Err(e) => Err(AppError::Storage(format!("Failed to read artifact: {}", e))),
        }
    }

    /// Remove a single artifact. A missing file is not an error.
    pub async fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove artifact: {}",
                e
            ))),
        }
    }

    /// Remove a job's entire artifact directory. A missing directory is not
    /// an error.
    pub async fn remove_job_dir(&self, job_id: i32) -> AppResult<()> {
        let dir = self.root.join(job_id.to_string());

        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove job directory: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_file_key_keeps_extension() {
        assert_eq!(
            Storage::job_file_key(7, "mesh", "fork.stl", 1700000000000),
            "7/mesh_1700000000000.stl"
        );
        assert_eq!(
            Storage::job_file_key(7, "general", "README", 1700000000000),
            "7/general_1700000000000"
        );
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(Storage::validate_key("7/mesh_1.stl").is_ok());
        assert!(Storage::validate_key("").is_err());
        assert!(Storage::validate_key("/etc/passwd").is_err());
        assert!(Storage::validate_key("7/../../etc/passwd").is_err());
        assert!(Storage::validate_key("..").is_err());
    }

    #[test]
    fn test_content_type_inference() {
        assert_eq!(Storage::content_type_for_extension("html"), "text/html");
        assert_eq!(Storage::content_type_for_extension("HTML"), "text/html");
        assert_eq!(Storage::content_type_for_extension("pdf"), "application/pdf");
        assert_eq!(Storage::content_type_for_extension("inp"), "text/plain");
        assert_eq!(
            Storage::content_type_for_extension("bin"),
            "application/octet-stream"
        );
        assert_eq!(
            Storage::content_type_for_key("7/report_1700000000000.html"),
            "text/html"
        );
    }

    #[tokio::test]
    async fn test_put_get_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path()).await.unwrap();

        storage.put("7/mesh_1.stl", b"solid fork").await.unwrap();
        assert_eq!(storage.get("7/mesh_1.stl").await.unwrap(), b"solid fork");

        storage.remove("7/mesh_1.stl").await.unwrap();
        assert!(matches!(
            storage.get("7/mesh_1.stl").await,
            Err(crate::error::AppError::NotFound(_))
        ));

        // Removing again is fine
        storage.remove("7/mesh_1.stl").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_job_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path()).await.unwrap();

        storage.put("7/mesh_1.stl", b"a").await.unwrap();
        storage.put("7/report_2.html", b"b").await.unwrap();

        storage.remove_job_dir(7).await.unwrap();
        assert!(matches!(
            storage.get("7/mesh_1.stl").await,
            Err(crate::error::AppError::NotFound(_))
        ));

        // Missing directory is not an error
        storage.remove_job_dir(7).await.unwrap();
    }
}
