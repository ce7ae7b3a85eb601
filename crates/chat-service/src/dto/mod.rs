//! Data transfer objects for service requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for user input
//! - Response DTOs for lists rendered by the UI

pub mod requests;
pub mod responses;

pub use requests::{CreateGroupRequest, UpdateProfileRequest};
pub use responses::{ContactResponse, ConversationPreview, EMPTY_CONVERSATION_PREVIEW};
