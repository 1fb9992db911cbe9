//! Active call state
//!
//! The call/media pipeline is a collaborator; the core only tracks which
//! conferences are currently attached to a conversation so it can publish
//! them on the active-calls channel.

use serde::{Deserialize, Serialize};

/// A live call or conference attached to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    /// Conference identity assigned by the call pipeline
    pub id: String,
    /// Ids of the individual calls folded into this conference
    pub call_ids: Vec<String>,
    /// Whether media is currently flowing
    pub ongoing: bool,
}

impl Conference {
    /// Create a conference wrapping a single call.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            call_ids: vec![id.clone()],
            id,
            ongoing: false,
        }
    }

    /// Whether this conference contains the given call id.
    pub fn has_call(&self, call_id: &str) -> bool {
        self.call_ids.iter().any(|c| c == call_id)
    }
}
