//! Application error types
//!
//! Unified error handling for the client core. Every failure ends up as a
//! [`Notice`] shown to the participant; none of them is fatal.

use chat_core::DomainError;
use serde::Serialize;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Session errors
    #[error("Not signed in")]
    NotAuthenticated,

    // Device errors
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    // Collaborator errors
    #[error("Store error: {0}")]
    Store(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get error code for notices and logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
            Self::Upload(_) => "UPLOAD_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Whether the participant can fix the cause (grant a permission, fill a field, sign in)
    #[must_use]
    pub fn is_user_actionable(&self) -> bool {
        match self {
            Self::NotAuthenticated | Self::PermissionDenied(_) | Self::Validation(_) => true,
            Self::Domain(e) => {
                e.is_permission()
                    || e.is_validation()
                    || matches!(e, DomainError::NotAuthenticated)
            }
            _ => false,
        }
    }

    /// Alert shown to the participant
    #[must_use]
    pub fn notice(&self) -> Notice {
        let title = match self {
            Self::NotAuthenticated => "Not signed in",
            Self::PermissionDenied(_) => "Permission required",
            Self::Validation(_) => "Input Error",
            Self::Upload(_) => "Upload Failed",
            Self::Domain(e) if e.is_permission() => "Permission required",
            Self::Domain(e) if e.is_validation() => "Input Error",
            Self::Domain(DomainError::Upload(_)) => "Upload Failed",
            Self::Domain(DomainError::NotAuthenticated) => "Not signed in",
            _ => "Error",
        };

        let message = match self {
            Self::PermissionDenied(capability)
            | Self::Domain(DomainError::PermissionDenied(capability)) => {
                format!("Sorry, we need {capability} permission to make this work!")
            }
            Self::Internal(_) | Self::Config(_) => "Something went wrong.".to_string(),
            other => other.to_string(),
        };

        Notice {
            code: self.error_code().to_string(),
            title: title.to_string(),
            message,
        }
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// User-visible alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: String,
    pub title: String,
    pub message: String,
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        err.notice()
    }
}

impl From<AppError> for Notice {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
