//! Domain error types

use crate::value_objects::{GroupId, MessageId, StorePathError};

/// Domain-level errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    // === Device ===
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // === Store ===
    #[error("Store write failed: {0}")]
    StoreWrite(String),

    #[error("Store read failed: {0}")]
    StoreRead(String),

    #[error("Invalid record at {path}: {reason}")]
    InvalidRecord { path: String, reason: String },

    #[error("Invalid store path: {0}")]
    InvalidPath(#[from] StorePathError),

    // === Storage ===
    #[error("Upload failed: {0}")]
    Upload(String),

    // === Rendering ===
    #[error("Unknown message kind: {0}")]
    UnknownMessageKind(String),

    // === Not Found ===
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    // === Session ===
    #[error("Not authenticated")]
    NotAuthenticated,

    // === Validation ===
    #[error("Validation error: {0}")]
    ValidationError(String),

    // === Internal ===
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for notices and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::StoreWrite(_) => "STORE_WRITE_ERROR",
            Self::StoreRead(_) => "STORE_READ_ERROR",
            Self::InvalidRecord { .. } => "INVALID_RECORD",
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::Upload(_) => "UPLOAD_ERROR",
            Self::UnknownMessageKind(_) => "UNKNOWN_MESSAGE_KIND",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::GroupNotFound(_) => "UNKNOWN_GROUP",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MessageNotFound(_) | Self::GroupNotFound(_))
    }

    /// Check if the user refused a device capability
    pub fn is_permission(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Check if this came from the realtime store
    pub fn is_store(&self) -> bool {
        matches!(
            self,
            Self::StoreWrite(_) | Self::StoreRead(_) | Self::InvalidRecord { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidPath(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::PermissionDenied("camera".to_string()).code(),
            "PERMISSION_DENIED"
        );
        assert_eq!(DomainError::Upload("timeout".to_string()).code(), "UPLOAD_ERROR");
        assert_eq!(DomainError::NotAuthenticated.code(), "NOT_AUTHENTICATED");
    }

    #[test]
    fn test_categories() {
        assert!(DomainError::StoreWrite("offline".to_string()).is_store());
        assert!(DomainError::StoreRead("offline".to_string()).is_store());
        assert!(!DomainError::Upload("offline".to_string()).is_store());
        assert!(DomainError::GroupNotFound(GroupId::from("g")).is_not_found());
        assert!(DomainError::PermissionDenied("location".to_string()).is_permission());
        assert!(DomainError::InvalidPath(StorePathError::EmptySegment).is_validation());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::MessageNotFound(MessageId::from("-Nx1"));
        assert_eq!(err.to_string(), "Message not found: -Nx1");

        let err = DomainError::UnknownMessageKind("sticker".to_string());
        assert_eq!(err.to_string(), "Unknown message kind: sticker");
    }
}
