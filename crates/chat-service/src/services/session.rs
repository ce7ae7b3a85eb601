//! Session service
//!
//! Thin layer over the authentication provider that keeps the presence
//! flag in step with the session.

use tracing::{info, instrument};

use chat_common::AppError;
use chat_core::traits::{Listener, Subscription};
use chat_core::value_objects::ParticipantId;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::profile::ProfileService;

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Signed-in participant
    pub fn current_user(&self) -> ServiceResult<ParticipantId> {
        self.ctx
            .auth()
            .current_user()
            .ok_or_else(|| AppError::NotAuthenticated.into())
    }

    /// Listen to sign-in / sign-out transitions
    pub fn on_auth_state_changed(&self, listener: Listener<Option<ParticipantId>>) -> Subscription {
        self.ctx.auth().on_auth_state_changed(listener)
    }

    /// Sign in bookkeeping: mark the participant online
    #[instrument(skip(self))]
    pub async fn go_online(&self) -> ServiceResult<ParticipantId> {
        let participant = self.current_user()?;
        ProfileService::new(self.ctx).set_connected(&participant, true).await?;
        Ok(participant)
    }

    /// Mark the participant offline, then end the session
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> ServiceResult<()> {
        let participant = self.current_user()?;
        ProfileService::new(self.ctx).set_connected(&participant, false).await?;
        self.ctx.auth().sign_out().await?;

        info!(participant = %participant, "Signed out");
        Ok(())
    }
}
