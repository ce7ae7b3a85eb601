//! # chat-store
//!
//! Store layer implementing repository traits on top of a realtime keyed store.
//!
//! ## Overview
//!
//! This crate provides the adapters between the domain (`chat-core`) and the
//! hierarchical realtime store. It handles:
//!
//! - The store layout (where conversations, groups and profiles live)
//! - Wire models matching the persisted record shapes
//! - Entity ↔ Model mappers, including lenient decoding of older records
//! - Repository implementations with live subscriptions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chat_common::AppConfig;
//! use chat_store::{RealtimeMessageRepository, StoreLayout};
//!
//! let config = AppConfig::from_env()?;
//! let layout = StoreLayout::new(&config.store);
//! let messages = RealtimeMessageRepository::new(store.clone(), layout.clone());
//! ```

pub mod layout;
pub mod mappers;
pub mod models;
pub mod repositories;

// Re-export commonly used types
pub use layout::StoreLayout;
pub use repositories::{
    RealtimeGroupRepository, RealtimeMessageRepository, RealtimeProfileRepository,
    RealtimeTypingRepository,
};
