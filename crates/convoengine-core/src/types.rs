//! Core types for Conversation Engine

use serde::{Deserialize, Serialize};

pub mod contact;

/// URI scheme marking a swarm (group, DAG-replicated) conversation
pub const SWARM_SCHEME: &str = "swarm";

/// Identity of a peer or a conversation.
///
/// The scheme encodes the replication mode: a `swarm:` URI identifies a
/// DAG-replicated group conversation, any other scheme (or no scheme at all)
/// identifies a legacy linear peer-to-peer history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uri(String);

impl Uri {
    /// Create a Uri from its string form
    pub fn from_string(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The scheme part, if one is present
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once(':').map(|(scheme, _)| scheme)
    }

    /// Whether this URI identifies a swarm conversation
    pub fn is_swarm(&self) -> bool {
        self.scheme() == Some(SWARM_SCHEME)
    }

    /// The full string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Replication/membership mode of a conversation.
///
/// Modes are set by the protocol collaborator in response to daemon events;
/// the core stores and republishes the current mode but drives no
/// transitions itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Swarm conversation restricted to two members
    OneToOne,
    /// Swarm group where only admins may invite
    AdminInvitesOnly,
    /// Swarm group where any member may invite
    InvitesOnly,
    /// Swarm conversation still being fetched from other devices
    Syncing,
    /// Publicly joinable swarm group
    Public,
    /// Non-swarm linear history
    Legacy,
    /// Incoming invitation not yet accepted
    Request,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::OneToOne => "OneToOne",
            Mode::AdminInvitesOnly => "AdminInvitesOnly",
            Mode::InvitesOnly => "InvitesOnly",
            Mode::Syncing => "Syncing",
            Mode::Public => "Public",
            Mode::Legacy => "Legacy",
            Mode::Request => "Request",
        };
        write!(f, "{}", name)
    }
}

/// Composing (typing) state of the remote peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComposingStatus {
    /// Nobody is composing
    #[default]
    Idle,
    /// The peer is composing a message
    Active,
}
