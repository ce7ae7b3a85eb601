//! Response DTOs handed to the UI layer

use chrono::{DateTime, Utc};
use serde::Serialize;

use chat_core::entities::Profile;
use chat_core::value_objects::{ConversationId, ParticipantId};

/// Preview text shown for a conversation without messages
pub const EMPTY_CONVERSATION_PREVIEW: &str = "No messages yet";

/// One row of the conversation list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationPreview {
    pub contact: ContactResponse,
    pub conversation_id: ConversationId,
    pub preview: String,
    pub last_sent_at: Option<DateTime<Utc>>,
}

/// Directory entry as shown in contact lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResponse {
    pub id: ParticipantId,
    pub display_name: String,
    pub pseudo: Option<String>,
    pub avatar_url: Option<String>,
    pub is_online: bool,
}

impl From<&Profile> for ContactResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            display_name: profile.display_name().to_string(),
            pseudo: profile.pseudo.clone(),
            avatar_url: profile.avatar_url.clone(),
            is_online: profile.is_connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_from_profile() {
        let profile = Profile {
            pseudo: Some("ami".to_string()),
            is_connected: true,
            ..Profile::new(ParticipantId::from("u1"))
        };

        let contact = ContactResponse::from(&profile);
        assert_eq!(contact.display_name, "ami");
        assert!(contact.is_online);

        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["id"], "u1");
    }
}
