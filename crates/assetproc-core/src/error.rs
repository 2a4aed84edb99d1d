//! Error types for assetproc.

use thiserror::Error;

/// Result type alias using assetproc's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for assetproc operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced asset does not exist in the remote store
    #[error("Asset with ID {0} not found")]
    AssetNotFound(String),

    /// Asset declares a file type with no processing path
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Text content is not valid UTF-8
    #[error("Decode error: {0}")]
    Decode(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Remote API answered with a non-success status
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// External media command (ffmpeg/ffprobe) failed
    #[error("Media error: {0}")]
    Media(String),

    /// Transcription backend failed or returned inconsistent output
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`], used for logging and for deciding
/// how a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UnsupportedContentType,
    Decode,
    TransientIo,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnsupportedContentType => "unsupported_content_type",
            ErrorKind::Decode => "decode",
            ErrorKind::TransientIo => "transient_io",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AssetNotFound(_) => ErrorKind::NotFound,
            Error::UnsupportedContentType(_) => ErrorKind::UnsupportedContentType,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Request(_)
            | Error::Api { .. }
            | Error::Media(_)
            | Error::Transcription(_)
            | Error::Io(_) => ErrorKind::TransientIo,
            Error::Serialization(_) | Error::Config(_) | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Error::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_asset_not_found() {
        let err = Error::AssetNotFound("asset-42".to_string());
        assert_eq!(err.to_string(), "Asset with ID asset-42 not found");
    }

    #[test]
    fn test_error_display_unsupported_content_type() {
        let err = Error::UnsupportedContentType("image".to_string());
        assert_eq!(err.to_string(), "Unsupported content type: image");
    }

    #[test]
    fn test_error_display_api() {
        let err = Error::Api {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error (503): unavailable");
    }

    #[test]
    fn test_error_display_media() {
        let err = Error::Media("ffmpeg exited with 1".to_string());
        assert_eq!(err.to_string(), "Media error: ffmpeg exited with 1");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe, 0xfd]).unwrap_err();
        let err: Error = utf8_err.into();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => {
                assert!(!msg.is_empty());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::AssetNotFound("a".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::UnsupportedContentType("image".into()).kind(),
            ErrorKind::UnsupportedContentType
        );
        assert_eq!(Error::Request("reset".into()).kind(), ErrorKind::TransientIo);
        assert_eq!(
            Error::Api {
                status: 500,
                body: String::new()
            }
            .kind(),
            ErrorKind::TransientIo
        );
        assert_eq!(Error::Media("x".into()).kind(), ErrorKind::TransientIo);
        assert_eq!(
            Error::Transcription("x".into()).kind(),
            ErrorKind::TransientIo
        );
        assert_eq!(Error::Config("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
        assert_eq!(ErrorKind::TransientIo.as_str(), "transient_io");
    }
}
