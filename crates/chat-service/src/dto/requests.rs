//! Request DTOs for service operations
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

use chat_core::value_objects::ParticipantId;

// ============================================================================
// Group Requests
// ============================================================================

/// Create group request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1-100 characters"))]
    pub name: String,

    /// Invited participants; the creator is added automatically
    #[serde(default)]
    pub members: Vec<ParticipantId>,
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Save profile request (every field is required)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Pseudo is required"))]
    pub pseudo: String,

    #[validate(length(min = 1, max = 20, message = "Telephone is required"))]
    pub telephone: String,
}
