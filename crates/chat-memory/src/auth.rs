//! In-memory authentication provider

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::info;

use chat_core::traits::{AuthProvider, Listener, RepoResult, Subscription};
use chat_core::value_objects::ParticipantId;

/// In-memory authentication provider
#[derive(Clone, Default)]
pub struct MemoryAuthProvider {
    inner: Arc<AuthState>,
}

#[derive(Default)]
struct AuthState {
    current: RwLock<Option<ParticipantId>>,
    listeners: DashMap<u64, Listener<Option<ParticipantId>>>,
    next_listener: AtomicU64,
}

impl MemoryAuthProvider {
    /// Provider with nobody signed in
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with `participant` already signed in
    pub fn signed_in(participant: ParticipantId) -> Self {
        let provider = Self::new();
        *provider.inner.current.write() = Some(participant);
        provider
    }

    /// Sign `participant` in and notify listeners
    pub fn sign_in(&self, participant: ParticipantId) {
        info!(participant = %participant, "Signed in");
        *self.inner.current.write() = Some(participant);
        self.notify();
    }

    fn notify(&self) {
        let current = self.inner.current.read().clone();
        let listeners: Vec<_> = self
            .inner
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for listener in listeners {
            listener(current.clone());
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    fn current_user(&self) -> Option<ParticipantId> {
        self.inner.current.read().clone()
    }

    fn on_auth_state_changed(&self, listener: Listener<Option<ParticipantId>>) -> Subscription {
        let id = self.inner.next_listener.fetch_add(1, Ordering::SeqCst);
        self.inner.listeners.insert(id, Arc::clone(&listener));

        listener(self.current_user());

        let state = Arc::downgrade(&self.inner);
        Subscription::new("auth-state", move || {
            if let Some(state) = state.upgrade() {
                state.listeners.remove(&id);
            }
        })
    }

    async fn sign_out(&self) -> RepoResult<()> {
        let previous = self.inner.current.write().take();
        if let Some(participant) = previous {
            info!(participant = %participant, "Signed out");
            self.notify();
        }
        Ok(())
    }
}
