//! Error handling utilities for repositories

use chat_core::error::DomainError;
use chat_core::value_objects::{MessageId, StorePath};

/// Convert a serialization failure while preparing a write
pub fn map_encode_error(e: serde_json::Error) -> DomainError {
    DomainError::InternalError(format!("failed to encode record: {e}"))
}

/// Convert a decoding failure of a single record read by key
pub fn invalid_record(path: &StorePath, e: serde_json::Error) -> DomainError {
    DomainError::InvalidRecord {
        path: path.to_string(),
        reason: e.to_string(),
    }
}

/// Create a "message not found" error
pub fn message_not_found(id: &MessageId) -> DomainError {
    DomainError::MessageNotFound(id.clone())
}
