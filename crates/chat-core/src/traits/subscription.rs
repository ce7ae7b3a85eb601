//! Live subscription handles
//!
//! A subscription is an owned resource: the listener stays attached until the
//! handle is released, either explicitly with [`Subscription::unsubscribe`] or
//! by dropping it. Release runs exactly once.

use std::fmt;
use std::sync::Arc;

/// Callback invoked with every new snapshot
pub type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Handle to a live listener registration
#[must_use = "dropping a subscription detaches its listener"]
pub struct Subscription {
    label: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a release action
    pub fn new(label: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            label: label.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Bundle several subscriptions into one handle
    pub fn merge(label: impl Into<String>, parts: Vec<Subscription>) -> Self {
        Self::new(label, move || drop(parts))
    }

    /// What this subscription listens to
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check if the listener is still attached
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Detach the listener
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}
