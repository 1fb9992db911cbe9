//! Contact record for conversation membership
//!
//! A [`Contact`] identifies one participant of a conversation. The core only
//! needs identity and display information; presence, trust and profile data
//! live with the account collaborator.

use serde::{Deserialize, Serialize};

use crate::types::Uri;

/// One participant of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// The contact's identity URI
    pub uri: Uri,
    /// Display name, if one is known
    pub display_name: Option<String>,
    /// Whether this entry is the local account itself (relevant in groups,
    /// where the member list includes the local user)
    pub is_user: bool,
}

impl Contact {
    /// Create a contact for a remote peer.
    pub fn new(uri: Uri) -> Self {
        Self {
            uri,
            display_name: None,
            is_user: false,
        }
    }

    /// Create a contact with a known display name.
    pub fn with_name(uri: Uri, display_name: impl Into<String>) -> Self {
        Self {
            uri,
            display_name: Some(display_name.into()),
            is_user: false,
        }
    }

    /// Create the local account's own member entry.
    pub fn user(uri: Uri) -> Self {
        Self {
            uri,
            display_name: None,
            is_user: true,
        }
    }

    /// Case-insensitive search over display name and identity URI.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if let Some(name) = &self.display_name {
            if name.to_lowercase().contains(&query) {
                return true;
            }
        }
        self.uri.as_str().to_lowercase().contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_display_name() {
        let contact = Contact::with_name(Uri::from_string("ring:abc123"), "Alice");
        assert!(contact.matches("ali"));
        assert!(contact.matches("ALICE"));
        assert!(!contact.matches("bob"));
    }

    #[test]
    fn test_matches_uri() {
        let contact = Contact::new(Uri::from_string("ring:abc123"));
        assert!(contact.matches("abc"));
        assert!(contact.matches("ring:abc123"));
        assert!(!contact.matches("xyz"));
    }

    #[test]
    fn test_user_flag() {
        let me = Contact::user(Uri::from_string("ring:me"));
        assert!(me.is_user);
        let peer = Contact::new(Uri::from_string("ring:peer"));
        assert!(!peer.is_user);
    }
}
