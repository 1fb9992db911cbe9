//! Timeline event types
//!
//! This module provides the [`Interaction`] struct, the single unit of a
//! conversation timeline: a text message, a call record, a contact event or
//! a file transfer. One message delivered by the sync collaborator becomes
//! one interaction.

use serde::{Deserialize, Serialize};

use crate::types::contact::Contact;
use crate::types::Uri;

/// What kind of timeline event an interaction represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    /// A text message
    Text,
    /// A call record (incoming, outgoing, missed)
    Call,
    /// A contact lifecycle event (added, invited, ...)
    Contact,
    /// A file transfer
    DataTransfer,
    /// Placeholder for an interaction that could not be decoded; kept in the
    /// timeline so the causal chain stays connected, skipped by "last event"
    /// derivations
    Invalid,
}

/// Delivery/display state of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionStatus {
    /// No status reported yet
    #[default]
    Unknown,
    /// Handed to the transport, not yet acknowledged
    Sending,
    /// Acknowledged by the transport
    Sent,
    /// Transport gave up on delivery
    Failure,
    /// The recipient displayed the interaction
    Displayed,
}

/// A single timeline event.
///
/// Identity is dual-mode: legacy conversations key interactions by the
/// numeric `id`, swarm conversations by the string `message_id`. In swarm
/// mode `parent_id` names the immediate causal predecessor; the timeline
/// keeps every interaction after its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Numeric identity (legacy mode ordering tie-break and lookup key)
    pub id: i64,
    /// Swarm message identity
    pub message_id: Option<String>,
    /// Swarm causal predecessor; `None` for a DAG root
    pub parent_id: Option<String>,
    /// Event kind
    pub kind: InteractionKind,
    /// Delivery/display status
    pub status: InteractionStatus,
    /// Wall-clock millis; the legacy ordering key
    pub timestamp: i64,
    /// Author identity URI; `None` when authored by the local account
    pub author: Option<Uri>,
    /// Owning account, set by the conversation on ingest
    pub account_id: Option<String>,
    /// Resolved author contact, set lazily by the conversation
    pub contact: Option<Contact>,
    /// Message body / transfer file name / call summary
    pub body: Option<String>,
    /// Whether the local user has read this interaction
    pub is_read: bool,
    /// Whether a notification was shown for this interaction
    pub is_notified: bool,
}

impl Interaction {
    /// Create a legacy text message.
    pub fn text(id: i64, body: impl Into<String>, author: Option<Uri>, timestamp: i64) -> Self {
        Self {
            id,
            message_id: None,
            parent_id: None,
            kind: InteractionKind::Text,
            status: InteractionStatus::default(),
            timestamp,
            author,
            account_id: None,
            contact: None,
            body: Some(body.into()),
            is_read: false,
            is_notified: false,
        }
    }

    /// Create a swarm interaction of the given kind.
    pub fn swarm(
        kind: InteractionKind,
        message_id: impl Into<String>,
        parent_id: Option<String>,
        body: Option<String>,
        author: Option<Uri>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: 0,
            message_id: Some(message_id.into()),
            parent_id,
            kind,
            status: InteractionStatus::default(),
            timestamp,
            author,
            account_id: None,
            contact: None,
            body,
            is_read: false,
            is_notified: false,
        }
    }

    /// Create a swarm text message.
    pub fn swarm_text(
        message_id: impl Into<String>,
        parent_id: Option<String>,
        body: impl Into<String>,
        author: Option<Uri>,
        timestamp: i64,
    ) -> Self {
        Self::swarm(
            InteractionKind::Text,
            message_id,
            parent_id,
            Some(body.into()),
            author,
            timestamp,
        )
    }

    /// Create an unreadable-interaction placeholder.
    pub fn invalid(message_id: impl Into<String>, parent_id: Option<String>, timestamp: i64) -> Self {
        Self::swarm(InteractionKind::Invalid, message_id, parent_id, None, None, timestamp)
    }

    /// Create a legacy call record.
    pub fn call(id: i64, author: Option<Uri>, timestamp: i64) -> Self {
        Self {
            id,
            message_id: None,
            parent_id: None,
            kind: InteractionKind::Call,
            status: InteractionStatus::default(),
            timestamp,
            author,
            account_id: None,
            contact: None,
            body: None,
            is_read: false,
            is_notified: false,
        }
    }

    /// Create a contact event for the given contact, stamped now.
    pub fn contact_event(contact: Contact) -> Self {
        Self {
            id: 0,
            message_id: None,
            parent_id: None,
            kind: InteractionKind::Contact,
            status: InteractionStatus::default(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            author: Some(contact.uri.clone()),
            account_id: None,
            contact: Some(contact),
            body: None,
            is_read: false,
            is_notified: false,
        }
    }

    /// Create a legacy file transfer record.
    pub fn data_transfer(
        id: i64,
        file_name: impl Into<String>,
        author: Option<Uri>,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            message_id: None,
            parent_id: None,
            kind: InteractionKind::DataTransfer,
            status: InteractionStatus::default(),
            timestamp,
            author,
            account_id: None,
            contact: None,
            body: Some(file_name.into()),
            is_read: false,
            is_notified: false,
        }
    }

    /// Builder-style status override.
    pub fn with_status(mut self, status: InteractionStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the interaction as read.
    pub fn read(&mut self) {
        self.is_read = true;
    }

    /// An interaction is incoming when it has a remote author.
    pub fn is_incoming(&self) -> bool {
        self.author.is_some()
    }
}
