//! Profile entity - participant directory record

use crate::value_objects::ParticipantId;

/// Profile entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ParticipantId,
    pub name: Option<String>,
    pub pseudo: Option<String>,
    pub telephone: Option<String>,
    pub avatar_url: Option<String>,
    /// Presence flag maintained by the participant's own client
    pub is_connected: bool,
}

impl Profile {
    /// Create an empty profile for a participant
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            name: None,
            pseudo: None,
            telephone: None,
            avatar_url: None,
            is_connected: false,
        }
    }

    /// Name shown next to messages: name, else pseudo, else the raw id
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.pseudo.as_deref().filter(|p| !p.is_empty()))
            .unwrap_or_else(|| self.id.as_str())
    }

    /// Case-insensitive search over name and pseudo
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [self.name.as_deref(), self.pseudo.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Partial profile update (unset fields are left untouched)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub pseudo: Option<String>,
    pub telephone: Option<String>,
    pub avatar_url: Option<String>,
    pub is_connected: Option<bool>,
}

impl ProfilePatch {
    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.pseudo.is_none()
            && self.telephone.is_none()
            && self.avatar_url.is_none()
            && self.is_connected.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            name: Some("Amira".to_string()),
            pseudo: Some("ami".to_string()),
            ..Profile::new(ParticipantId::from("u1"))
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(profile().display_name(), "Amira");

        let pseudo_only = Profile {
            pseudo: Some("ghost".to_string()),
            ..Profile::new(ParticipantId::from("u2"))
        };
        assert_eq!(pseudo_only.display_name(), "ghost");

        assert_eq!(Profile::new(ParticipantId::from("u3")).display_name(), "u3");
    }

    #[test]
    fn test_matches() {
        assert!(profile().matches("AMI"));
        assert!(profile().matches("mir"));
        assert!(!profile().matches("zed"));
        assert!(!Profile::new(ParticipantId::from("u3")).matches("u3"));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProfilePatch::default().is_empty());
        assert!(!ProfilePatch {
            is_connected: Some(true),
            ..ProfilePatch::default()
        }
        .is_empty());
    }
}
