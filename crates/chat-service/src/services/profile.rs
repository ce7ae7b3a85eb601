//! Profile service
//!
//! Handles the participant's own profile, presence and the shared directory.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, instrument};
use validator::Validate;

use chat_core::entities::{Profile, ProfilePatch};
use chat_core::traits::{Subscription, UploadOptions};
use chat_core::value_objects::ParticipantId;

use crate::directory::ProfileDirectory;
use crate::dto::{ContactResponse, UpdateProfileRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Content type of uploaded avatars
const AVATAR_CONTENT_TYPE: &str = "image/jpeg";

/// Live profile directory
///
/// Dropping the watch releases the underlying subscription.
pub struct DirectoryWatch {
    receiver: watch::Receiver<ProfileDirectory>,
    _subscription: Subscription,
}

impl DirectoryWatch {
    /// Latest directory snapshot
    pub fn current(&self) -> ProfileDirectory {
        self.receiver.borrow().clone()
    }

    pub fn receiver(&self) -> watch::Receiver<ProfileDirectory> {
        self.receiver.clone()
    }

    /// Wait for the next change
    pub async fn changed(&mut self) -> ServiceResult<ProfileDirectory> {
        self.receiver
            .changed()
            .await
            .map_err(|_| ServiceError::internal("directory watch closed"))?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a profile by participant ID
    #[instrument(skip(self))]
    pub async fn find(&self, participant: &ParticipantId) -> ServiceResult<Profile> {
        self.ctx
            .profile_repo()
            .find_by_id(participant)
            .await?
            .ok_or_else(|| ServiceError::not_found("Profile", participant.to_string()))
    }

    /// Save name, pseudo and telephone
    #[instrument(skip(self, request))]
    pub async fn save_profile(
        &self,
        participant: &ParticipantId,
        request: UpdateProfileRequest,
    ) -> ServiceResult<()> {
        request.validate()?;

        let patch = ProfilePatch {
            name: Some(request.name.trim().to_string()),
            pseudo: Some(request.pseudo.trim().to_string()),
            telephone: Some(request.telephone.trim().to_string()),
            ..ProfilePatch::default()
        };
        self.ctx.profile_repo().update(participant, &patch).await?;

        info!("Profile saved");
        Ok(())
    }

    /// Upload a new avatar and point the profile at it
    ///
    /// Returns the avatar's public URL.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn update_avatar(&self, participant: &ParticipantId, bytes: Vec<u8>) -> ServiceResult<String> {
        if bytes.is_empty() {
            return Err(ServiceError::validation("Avatar image is empty"));
        }

        let bucket = &self.ctx.config().storage.image_bucket;
        let path = format!("{participant}-{}.jpg", self.ctx.generate_key());
        let stored = self
            .ctx
            .storage()
            .upload(
                bucket,
                &path,
                bytes,
                UploadOptions {
                    content_type: Some(AVATAR_CONTENT_TYPE.to_string()),
                },
            )
            .await?;

        let url = self.ctx.storage().public_url(&stored.full_path);
        let patch = ProfilePatch {
            avatar_url: Some(url.clone()),
            ..ProfilePatch::default()
        };
        self.ctx.profile_repo().update(participant, &patch).await?;

        info!(full_path = %stored.full_path, "Avatar updated");
        Ok(url)
    }

    /// Publish the participant's presence flag
    #[instrument(skip(self))]
    pub async fn set_connected(&self, participant: &ParticipantId, connected: bool) -> ServiceResult<()> {
        let patch = ProfilePatch {
            is_connected: Some(connected),
            ..ProfilePatch::default()
        };
        self.ctx.profile_repo().update(participant, &patch).await?;

        debug!("Presence updated");
        Ok(())
    }

    /// One-off directory snapshot
    pub async fn directory(&self) -> ServiceResult<ProfileDirectory> {
        let profiles = self.ctx.profile_repo().find_all().await?;
        Ok(ProfileDirectory::new(profiles))
    }

    /// Directory kept current by a profile subscription
    #[instrument(skip(self))]
    pub fn watch_directory(&self) -> ServiceResult<DirectoryWatch> {
        let (sender, receiver) = watch::channel(ProfileDirectory::default());

        let subscription = self.ctx.profile_repo().subscribe(Arc::new(move |profiles: Vec<Profile>| {
            let directory = ProfileDirectory::new(profiles);
            sender.send_if_modified(|current| {
                if *current == directory {
                    return false;
                }
                *current = directory;
                true
            });
        }))?;

        Ok(DirectoryWatch {
            receiver,
            _subscription: subscription,
        })
    }

    /// Everyone but `viewer` whose name or pseudo matches `query`
    pub async fn contacts(&self, viewer: &ParticipantId, query: &str) -> ServiceResult<Vec<ContactResponse>> {
        let directory = self.directory().await?;
        Ok(directory
            .contacts(viewer, query)
            .into_iter()
            .map(ContactResponse::from)
            .collect())
    }
}
