//! Error types for card generation.

use std::path::PathBuf;
use thiserror::Error;

use crate::field::FieldName;

/// Result type alias using CardError.
pub type CardResult<T> = Result<T, CardError>;

/// Primary error type for card generation.
#[derive(Debug, Error)]
pub enum CardError {
    // === Configuration Errors ===
    #[error("Invalid color format: '{0}'")]
    InvalidColorFormat(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // === Request Errors ===
    #[error("Unknown template key: {0}")]
    UnknownTemplate(String),

    #[error("Missing value for field {field} (template '{template}')")]
    MissingFieldValue { template: String, field: FieldName },

    // === Asset Errors ===
    #[error("Base template not found: {} ({reason})", path.display())]
    BaseImageMissing { path: PathBuf, reason: String },

    #[error("Overlay file not found: {} ({reason})", path.display())]
    OverlayNotFound { path: PathBuf, reason: String },

    // === Output Errors ===
    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CardError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CardError::InvalidColorFormat(_) => "InvalidColorFormat",
            CardError::Config(_) => "InvalidConfiguration",
            CardError::UnknownTemplate(_) => "UnknownTemplate",
            CardError::MissingFieldValue { .. } => "MissingFieldValue",
            CardError::BaseImageMissing { .. } => "BaseImageMissing",
            CardError::OverlayNotFound { .. } => "OverlayNotFound",
            CardError::Encode(_) => "EncodeFailed",
            CardError::Internal(_) => "InternalError",
        }
    }

    /// Whether the caller can fix this error by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CardError::UnknownTemplate(_) | CardError::MissingFieldValue { .. }
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for CardError {
    fn from(err: std::io::Error) -> Self {
        CardError::Internal(err.to_string())
    }
}

impl From<serde_yaml::Error> for CardError {
    fn from(err: serde_yaml::Error) -> Self {
        CardError::Config(format!("YAML error: {}", err))
    }
}

impl From<image::ImageError> for CardError {
    fn from(err: image::ImageError) -> Self {
        CardError::Encode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CardError::UnknownTemplate("v9".into()).code(), "UnknownTemplate");
        assert_eq!(
            CardError::MissingFieldValue {
                template: "v1".into(),
                field: FieldName::Account,
            }
            .code(),
            "MissingFieldValue"
        );
        assert_eq!(CardError::InvalidColorFormat("#12".into()).code(), "InvalidColorFormat");
    }

    #[test]
    fn test_client_errors() {
        assert!(CardError::UnknownTemplate("x".into()).is_client_error());
        assert!(!CardError::OverlayNotFound {
            path: PathBuf::from("a.png"),
            reason: "missing".into(),
        }
        .is_client_error());
        assert!(!CardError::Encode("boom".into()).is_client_error());
    }

    #[test]
    fn test_display_mentions_path() {
        let err = CardError::BaseImageMissing {
            path: PathBuf::from("templates/v1.png"),
            reason: "file does not exist".into(),
        };
        assert!(err.to_string().contains("templates/v1.png"));
    }
}
