//! Branded ID newtypes.
//!
//! All IDs are strings on the wire. Newtypes keep them from being mixed up
//! at call sites: a [`CorrelationToken`] can never be passed where an
//! [`ItemId`] is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a new ID with the type's prefix and a UUID v7 suffix.
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "_{}"), Uuid::now_v7()))
            }

            /// Wrap an existing string (e.g. a server-assigned identifier).
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

branded_id!(
    /// One live conversational session.
    SessionId,
    "sess"
);

branded_id!(
    /// A persisted item. Assigned by the persistence collaborator; Reed
    /// never invents one locally.
    ItemId,
    "item"
);

branded_id!(
    /// Correlates a remote tool invocation with its acknowledgment.
    /// Issued by the remote session, echoed back exactly once.
    CorrelationToken,
    "tok"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_uses_prefix() {
        assert!(SessionId::generate().as_str().starts_with("sess_"));
        assert!(ItemId::generate().as_str().starts_with("item_"));
        assert!(CorrelationToken::generate().as_str().starts_with("tok_"));
    }

    #[test]
    fn generate_is_unique() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn from_preserves_value() {
        let id = ItemId::from("7");
        assert_eq!(id.as_str(), "7");
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn serde_is_transparent() {
        let id = ItemId::from("item_x");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"item_x\"");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
