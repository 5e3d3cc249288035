//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid JSON file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input for confirmed results: {token:?} is not an integer")]
    Validation { token: String },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record index {index} out of range (document has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Image error: {0}")]
    Image(String),

    #[error("Unrecognized image data")]
    UnrecognizedImage,

    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Save queue is closed")]
    SaveQueueClosed,

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors a user fixes by editing the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// True when a search found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_parse_names_path() {
        let source = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        let error = Error::Parse {
            path: PathBuf::from("data/records.json"),
            source,
        };
        let display = format!("{}", error);
        assert!(display.starts_with("Invalid JSON file data/records.json"));
    }

    #[test]
    fn test_error_display_validation() {
        let error = Error::Validation { token: "a".to_string() };
        assert_eq!(
            error.to_string(),
            "Invalid input for confirmed results: \"a\" is not an integer"
        );
        assert!(error.is_validation());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_error_display_index() {
        let error = Error::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(
            error.to_string(),
            "Record index 5 out of range (document has 2 records)"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_not_found() {
        let error = Error::NotFound("A1".to_string());
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Record not found: A1");
    }
}
