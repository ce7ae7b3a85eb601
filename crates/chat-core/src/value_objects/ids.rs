//! Opaque string identifiers
//!
//! Every key in the realtime store is a string, so identifiers stay strings
//! end to end. The newtypes only exist so a participant id cannot be passed
//! where a message id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Unwrap into the raw identifier
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Participant (authenticated user) identifier issued by the auth provider
    ParticipantId
);

string_id!(
    /// Message key within a conversation partition
    MessageId
);

string_id!(
    /// Group record key
    GroupId
);

string_id!(
    /// Conversation partition key
    ///
    /// Direct conversations have no record of their own: the id is derived from
    /// the two participants and doubles as the storage partition key.
    ConversationId
);

impl ConversationId {
    /// Deterministic id of the one-to-one conversation between `a` and `b`.
    ///
    /// The greater id comes first, so the result does not depend on argument order.
    pub fn direct(a: &ParticipantId, b: &ParticipantId) -> Self {
        let (first, second) = if a > b { (a, b) } else { (b, a) };
        Self(format!("{first}{second}"))
    }

    /// Conversation id of a group (the group id itself)
    pub fn group(group_id: &GroupId) -> Self {
        Self(group_id.as_str().to_string())
    }
}
