//! Conversation timeline engine
//!
//! This module is the core of the crate: a per-conversation event log that
//! merges out-of-order message arrivals into a causally-consistent ordered
//! view and fans incremental change events out to subscribers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Conversation (aggregate root)                                  │
//! │  - ingest entry points for the sync collaborator                │
//! │  - contacts, active calls, visibility, loading handshake        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Timeline (store + projection)                                  │
//! │  - legacy: ordered map keyed by (timestamp, id)                 │
//! │  - swarm: message map + linearized DAG + pending roots          │
//! │  - read/displayed/notified watermarks                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ConversationEvents (fan-out)                                   │
//! │  - broadcast channels for element/cleared/contact events        │
//! │  - watch channels replaying the latest derived state            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Message Flow
//!
//! **Swarm ingest:**
//! 1. `add_swarm_element()` dedups by message id and updates pending roots
//! 2. The timeline places the message relative to its parent chain
//!    (tail append, root splice, or mid-sequence insert)
//! 3. Messages whose parent chain is unreachable wait in the detached set
//!    and are placed automatically once a later arrival connects them
//! 4. Every placement is published as an Add on the element channel
//!
//! **Legacy ingest:**
//! 1. `add_text_message()`/`add_call()`/... key the interaction by
//!    `(timestamp, id)` in the ordered history
//! 2. The display order is the map's iteration order; no separate sort pass

mod call;
mod conversation;
mod events;
mod interaction;
mod timeline;

pub use call::Conference;
pub use conversation::Conversation;
pub use events::{ElementEvent, ElementStatus};
pub use interaction::{Interaction, InteractionKind, InteractionStatus};
