//! Conversation event fan-out
//!
//! This module provides the multicast notification layer between one
//! conversation and its subscribers (UI adapters, notification counters,
//! badge counters). The store and the projector never know who is listening.
//!
//! ## Channels
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ConversationEvents                                             │
//! │  ├── broadcast (fire-and-forget, FIFO)                          │
//! │  │   ├── elements: (Interaction, Add|Update|Remove)             │
//! │  │   ├── cleared:  remaining interactions after a clear         │
//! │  │   └── contacts: full contact list after a change             │
//! │  └── watch (replay latest value to new subscribers)             │
//! │      ├── last_displayed, last_event: Option<Interaction>        │
//! │      ├── calls: Vec<Conference>        (starts empty)           │
//! │      ├── composing: ComposingStatus    (starts Idle)            │
//! │      ├── visible: bool                                          │
//! │      └── mode: Mode                                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every payload is a snapshot; subscribers never see the live containers.

use tokio::sync::{broadcast, watch};

use crate::chat::call::Conference;
use crate::chat::interaction::Interaction;
use crate::types::contact::Contact;
use crate::types::{ComposingStatus, Mode};

/// Buffer size for the broadcast channels.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How an interaction changed on the element channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementStatus {
    /// The interaction entered the timeline
    Add,
    /// An in-place mutation (status, read state)
    Update,
    /// The interaction left the timeline
    Remove,
}

/// One entry on the element-changes channel.
#[derive(Debug, Clone)]
pub struct ElementEvent {
    /// Snapshot of the interaction after the change
    pub interaction: Interaction,
    /// What happened to it
    pub status: ElementStatus,
}

/// Multicast channel set for one conversation.
///
/// Broadcast channels drop events for subscribers that are not yet attached;
/// watch channels cache the latest value and replay it on subscribe.
pub(crate) struct ConversationEvents {
    elements_tx: broadcast::Sender<ElementEvent>,
    cleared_tx: broadcast::Sender<Vec<Interaction>>,
    contacts_tx: broadcast::Sender<Vec<Contact>>,
    last_displayed_tx: watch::Sender<Option<Interaction>>,
    last_event_tx: watch::Sender<Option<Interaction>>,
    calls_tx: watch::Sender<Vec<Conference>>,
    composing_tx: watch::Sender<ComposingStatus>,
    visible_tx: watch::Sender<bool>,
    mode_tx: watch::Sender<Mode>,
}

impl ConversationEvents {
    pub(crate) fn new(mode: Mode) -> Self {
        let (elements_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (cleared_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (contacts_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (last_displayed_tx, _) = watch::channel(None);
        let (last_event_tx, _) = watch::channel(None);
        let (calls_tx, _) = watch::channel(Vec::new());
        let (composing_tx, _) = watch::channel(ComposingStatus::Idle);
        let (visible_tx, _) = watch::channel(false);
        let (mode_tx, _) = watch::channel(mode);
        Self {
            elements_tx,
            cleared_tx,
            contacts_tx,
            last_displayed_tx,
            last_event_tx,
            calls_tx,
            composing_tx,
            visible_tx,
            mode_tx,
        }
    }

    // -- publishing ---------------------------------------------------------

    pub(crate) fn publish_element(&self, interaction: Interaction, status: ElementStatus) {
        // send only fails when no subscriber is attached
        let _ = self.elements_tx.send(ElementEvent { interaction, status });
    }

    pub(crate) fn publish_cleared(&self, remaining: Vec<Interaction>) {
        let _ = self.cleared_tx.send(remaining);
    }

    pub(crate) fn publish_contacts(&self, contacts: Vec<Contact>) {
        let _ = self.contacts_tx.send(contacts);
    }

    pub(crate) fn set_last_displayed(&self, interaction: Interaction) {
        self.last_displayed_tx.send_replace(Some(interaction));
    }

    pub(crate) fn set_last_event(&self, interaction: Interaction) {
        self.last_event_tx.send_replace(Some(interaction));
    }

    pub(crate) fn set_calls(&self, calls: Vec<Conference>) {
        self.calls_tx.send_replace(calls);
    }

    pub(crate) fn set_composing(&self, status: ComposingStatus) {
        self.composing_tx.send_replace(status);
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible_tx.send_replace(visible);
    }

    pub(crate) fn visible(&self) -> bool {
        *self.visible_tx.borrow()
    }

    pub(crate) fn set_mode(&self, mode: Mode) {
        self.mode_tx.send_replace(mode);
    }

    pub(crate) fn mode(&self) -> Mode {
        *self.mode_tx.borrow()
    }

    // -- subscribing --------------------------------------------------------

    pub(crate) fn subscribe_elements(&self) -> broadcast::Receiver<ElementEvent> {
        self.elements_tx.subscribe()
    }

    pub(crate) fn subscribe_cleared(&self) -> broadcast::Receiver<Vec<Interaction>> {
        self.cleared_tx.subscribe()
    }

    pub(crate) fn subscribe_contacts(&self) -> broadcast::Receiver<Vec<Contact>> {
        self.contacts_tx.subscribe()
    }

    pub(crate) fn watch_last_displayed(&self) -> watch::Receiver<Option<Interaction>> {
        self.last_displayed_tx.subscribe()
    }

    pub(crate) fn watch_last_event(&self) -> watch::Receiver<Option<Interaction>> {
        self.last_event_tx.subscribe()
    }

    pub(crate) fn watch_calls(&self) -> watch::Receiver<Vec<Conference>> {
        self.calls_tx.subscribe()
    }

    pub(crate) fn watch_composing(&self) -> watch::Receiver<ComposingStatus> {
        self.composing_tx.subscribe()
    }

    pub(crate) fn watch_visible(&self) -> watch::Receiver<bool> {
        self.visible_tx.subscribe()
    }

    pub(crate) fn watch_mode(&self) -> watch::Receiver<Mode> {
        self.mode_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::interaction::InteractionKind;

    fn events() -> ConversationEvents {
        ConversationEvents::new(Mode::Legacy)
    }

    #[test]
    fn test_broadcast_has_no_replay() {
        let ev = events();
        ev.publish_element(
            Interaction::text(1, "before subscribe", None, 1),
            ElementStatus::Add,
        );

        // A subscriber attached after the fact sees nothing
        let mut rx = ev.subscribe_elements();
        assert!(rx.try_recv().is_err());

        ev.publish_element(
            Interaction::text(2, "after subscribe", None, 2),
            ElementStatus::Add,
        );
        let got = rx.try_recv().expect("event after subscribing");
        assert_eq!(got.interaction.id, 2);
        assert_eq!(got.status, ElementStatus::Add);
    }

    #[test]
    fn test_broadcast_preserves_order() {
        let ev = events();
        let mut rx = ev.subscribe_elements();
        for id in 1..=5 {
            ev.publish_element(Interaction::text(id, "m", None, id), ElementStatus::Add);
        }
        for id in 1..=5 {
            assert_eq!(rx.try_recv().unwrap().interaction.id, id);
        }
    }

    #[test]
    fn test_watch_replays_latest_on_subscribe() {
        let ev = events();
        ev.set_last_event(Interaction::text(9, "tail", None, 9));

        // Late subscriber still observes the cached value
        let rx = ev.watch_last_event();
        let current = rx.borrow();
        assert_eq!(current.as_ref().unwrap().id, 9);
    }

    #[test]
    fn test_watch_initial_values() {
        let ev = events();
        assert!(ev.watch_last_displayed().borrow().is_none());
        assert!(ev.watch_calls().borrow().is_empty());
        assert_eq!(*ev.watch_composing().borrow(), ComposingStatus::Idle);
        assert!(!*ev.watch_visible().borrow());
        assert_eq!(*ev.watch_mode().borrow(), Mode::Legacy);
    }

    #[test]
    fn test_multiple_subscribers_all_receive() {
        let ev = events();
        let mut a = ev.subscribe_elements();
        let mut b = ev.subscribe_elements();
        ev.publish_element(Interaction::text(1, "m", None, 1), ElementStatus::Update);
        assert_eq!(a.try_recv().unwrap().status, ElementStatus::Update);
        assert_eq!(b.try_recv().unwrap().status, ElementStatus::Update);
    }

    #[tokio::test]
    async fn test_watch_notifies_changes() {
        let ev = events();
        let mut rx = ev.watch_last_event();
        ev.set_last_event(Interaction::swarm(
            InteractionKind::Text,
            "m1",
            None,
            Some("hello".into()),
            None,
            1,
        ));
        rx.changed().await.expect("sender alive");
        assert_eq!(
            rx.borrow().as_ref().unwrap().message_id.as_deref(),
            Some("m1")
        );
    }
}
