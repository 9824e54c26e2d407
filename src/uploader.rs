use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Handle to a successfully uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    /// Destination-specific locator: a filesystem path or a remote URL.
    pub location: String,
}

/// Error returned by an upload destination.
///
/// Uploads are single-shot: a failure is reported to the caller and never
/// retried, since the acceptance decision has already completed.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("destination rejected the upload: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Trait for upload destinations of accepted photos.
pub trait Uploader {
    /// Store `image_bytes` at the destination under `destination_name`.
    fn upload(&self, image_bytes: &[u8], destination_name: &str) -> Result<FileHandle, UploadError>;
}

/// Uploader that copies accepted photos into a local folder.
///
/// Stands in for a cloud storage folder; the folder is created on
/// construction if it does not exist.
pub struct FolderUploader {
    folder: PathBuf,
}

impl FolderUploader {
    pub fn new(folder: impl AsRef<Path>) -> Result<Self, UploadError> {
        let folder = folder.as_ref().to_owned();
        fs::create_dir_all(&folder).map_err(|source| UploadError::Io {
            path: folder.display().to_string(),
            source,
        })?;
        Ok(Self { folder })
    }
}

impl Uploader for FolderUploader {
    fn upload(&self, image_bytes: &[u8], destination_name: &str) -> Result<FileHandle, UploadError> {
        let path = self.folder.join(destination_name);
        fs::write(&path, image_bytes).map_err(|source| UploadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(FileHandle {
            location: path.display().to_string(),
        })
    }
}

/// Uploader that PUTs accepted photos to a remote HTTP endpoint.
///
/// The destination name is appended to the endpoint URL; an optional
/// bearer token authenticates the request.
pub struct HttpUploader {
    endpoint: String,
    token: Option<String>,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
        }
    }
}

impl Uploader for HttpUploader {
    fn upload(&self, image_bytes: &[u8], destination_name: &str) -> Result<FileHandle, UploadError> {
        let url = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            destination_name
        );

        let mut request = ureq::put(&url).set("Content-Type", "image/jpeg");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        match request.send_bytes(image_bytes) {
            Ok(_) => Ok(FileHandle { location: url }),
            Err(ureq::Error::Status(code, _)) => {
                Err(UploadError::Rejected(format!("HTTP status {code}")))
            }
            Err(err) => Err(UploadError::Transport(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_uploader_writes_bytes_under_destination_name() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = FolderUploader::new(dir.path()).unwrap();

        let handle = uploader.upload(b"jpeg bytes", "s123456.jpg").unwrap();

        let expected = dir.path().join("s123456.jpg");
        assert_eq!(handle.location, expected.display().to_string());
        assert_eq!(fs::read(expected).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn folder_uploader_creates_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("accepted").join("photos");

        let uploader = FolderUploader::new(&nested).unwrap();
        uploader.upload(b"x", "a.jpg").unwrap();

        assert!(nested.join("a.jpg").exists());
    }

    #[test]
    fn folder_uploader_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = FolderUploader::new(dir.path()).unwrap();

        // Destination name pointing into a non-existent subdirectory
        let err = uploader.upload(b"x", "missing/a.jpg").unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }

    #[test]
    fn http_uploader_joins_endpoint_and_name() {
        // Unroutable endpoint: we only assert the failure mode, not success
        let uploader = HttpUploader::new("http://127.0.0.1:1/photos/", None);
        let err = uploader.upload(b"x", "a.jpg").unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)));
    }
}
