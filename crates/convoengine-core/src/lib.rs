//! Conversation Engine Core Library
//!
//! Dual-mode conversation timeline engine for a peer-to-peer communication
//! platform. Each conversation is an event log of interactions (text
//! messages, call records, contact events, file transfers) kept in one of
//! two representations:
//!
//! - **Legacy**: a linear history ordered by timestamp
//! - **Swarm**: a DAG of messages linked by parent ids, merged from multiple
//!   devices, projected into a causally-consistent linear view
//!
//! The engine ingests interactions from a sync collaborator (in any arrival
//! order), deduplicates them, tracks read/displayed/notified watermarks and
//! publishes incremental change events to any number of subscribers. It does
//! no I/O: transport, persistence and rendering are collaborators.
//!
//! ## Quick Start
//!
//! ```ignore
//! use convoengine_core::{Conversation, Interaction, Mode, Uri};
//!
//! let conversation = Conversation::with_mode(
//!     "account-1",
//!     Uri::from_string("swarm:1a2b3c"),
//!     Mode::Syncing,
//! );
//!
//! // Subscribe before feeding history
//! let mut elements = conversation.subscribe_elements();
//! let last_event = conversation.watch_last_event();
//!
//! // Messages may arrive out of order; the timeline reorders them
//! conversation.add_swarm_element(Interaction::swarm_text(
//!     "m1", None, "hello", None, 1_700_000_000_000,
//! ));
//! conversation.add_swarm_element(Interaction::swarm_text(
//!     "m2", Some("m1".into()), "world", None, 1_700_000_000_001,
//! ));
//!
//! assert!(conversation.is_loaded());
//! ```

pub mod chat;
pub mod error;
pub mod types;

// Re-exports
pub use chat::{
    Conference, Conversation, ElementEvent, ElementStatus, Interaction, InteractionKind,
    InteractionStatus,
};
pub use error::{ConvoError, ConvoResult};
pub use types::contact::Contact;
pub use types::{ComposingStatus, Mode, Uri, SWARM_SCHEME};
