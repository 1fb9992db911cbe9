//! Conversation aggregate
//!
//! A [`Conversation`] composes the timeline (store + projection), the event
//! fan-out and the membership/call/visibility state for one peer or group.
//! The sync collaborator feeds interactions in; UI and notification
//! collaborators observe the channels and call the synchronous getters.

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, oneshot, watch};
use tracing::{debug, warn};

use crate::chat::call::Conference;
use crate::chat::events::{ConversationEvents, ElementEvent, ElementStatus};
use crate::chat::interaction::{Interaction, InteractionKind, InteractionStatus};
use crate::chat::timeline::{SwarmIngest, Timeline};
use crate::error::{ConvoError, ConvoResult};
use crate::types::contact::Contact;
use crate::types::{ComposingStatus, Mode, Uri};

/// One conversation: a peer-to-peer history or a swarm group.
///
/// Created once per peer/group and kept for the whole session; history can be
/// cleared or discarded without destroying the instance. All methods take
/// `&self`, so a conversation is usually shared as `Arc<Conversation>`
/// between the sync pipeline and the UI.
///
/// # Example
///
/// ```ignore
/// use convoengine_core::{Contact, Conversation, Interaction, Mode, Uri};
///
/// let conversation = Conversation::with_mode(
///     "account-1",
///     Uri::from_string("swarm:1a2b3c"),
///     Mode::Syncing,
/// );
/// let mut elements = conversation.subscribe_elements();
///
/// conversation.add_swarm_element(Interaction::swarm_text(
///     "m1", None, "hello", None, 1_700_000_000_000,
/// ));
/// assert!(conversation.is_loaded());
/// ```
pub struct Conversation {
    account_id: String,
    uri: Uri,
    contacts: RwLock<Vec<Contact>>,
    calls: RwLock<Vec<Conference>>,
    timeline: Mutex<Timeline>,
    events: ConversationEvents,
    loading: Mutex<Option<oneshot::Sender<ConvoResult<()>>>>,
}

impl Conversation {
    /// Create a legacy one-to-one conversation with a single contact.
    pub fn new(account_id: impl Into<String>, contact: Contact) -> Self {
        let uri = contact.uri.clone();
        let conversation = Self {
            account_id: account_id.into(),
            timeline: Mutex::new(Timeline::new(uri.is_swarm())),
            uri,
            contacts: RwLock::new(vec![contact]),
            calls: RwLock::new(Vec::new()),
            events: ConversationEvents::new(Mode::Legacy),
            loading: Mutex::new(None),
        };
        conversation
            .events
            .publish_contacts(conversation.contacts.read().clone());
        conversation
    }

    /// Create a conversation for the given URI in the given mode.
    pub fn with_mode(account_id: impl Into<String>, uri: Uri, mode: Mode) -> Self {
        Self {
            account_id: account_id.into(),
            timeline: Mutex::new(Timeline::new(uri.is_swarm())),
            uri,
            contacts: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            events: ConversationEvents::new(mode),
            loading: Mutex::new(None),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Whether this conversation replicates as a swarm DAG.
    pub fn is_swarm(&self) -> bool {
        self.uri.is_swarm()
    }

    // -- ingestion ----------------------------------------------------------

    /// Ingest a swarm interaction.
    ///
    /// Returns whether the interaction was appended at the tail of the known
    /// causal chain (a new leaf). Duplicates are silent no-ops. While the
    /// conversation is visible, new leaves are marked read immediately and
    /// the read watermark advances.
    pub fn add_swarm_element(&self, mut interaction: Interaction) -> bool {
        if !self.is_swarm() {
            warn!(uri = %self.uri, "ignoring swarm element on a legacy conversation");
            return false;
        }
        self.set_interaction_properties(&mut interaction);
        let visible = self.events.visible();
        let mut timeline = self.timeline.lock();
        match timeline.ingest_swarm(interaction, visible) {
            SwarmIngest::Duplicate => false,
            SwarmIngest::Ingested { new_leaf, arrivals } => {
                let mut tail_changed = false;
                for arrival in &arrivals {
                    self.events
                        .publish_element(arrival.interaction.clone(), ElementStatus::Add);
                    if arrival.is_leaf && arrival.interaction.kind != InteractionKind::Invalid {
                        tail_changed = true;
                    }
                }
                if tail_changed {
                    if let Some(last) = timeline.last_event() {
                        self.events.set_last_event(last);
                    }
                }
                new_leaf
            }
        }
    }

    /// Ingest a legacy text message. While the conversation is visible the
    /// message is marked read immediately.
    pub fn add_text_message(&self, mut txt: Interaction) {
        if self.is_swarm() {
            self.route_to_swarm(txt);
            return;
        }
        if self.events.visible() {
            txt.read();
        }
        self.set_interaction_properties(&mut txt);
        self.add_legacy(txt, false);
    }

    /// Ingest a call record. Already-known calls are ignored.
    pub fn add_call(&self, mut call: Interaction) {
        if self.is_swarm() {
            self.route_to_swarm(call);
            return;
        }
        self.set_interaction_properties(&mut call);
        self.add_legacy(call, true);
    }

    /// Ingest a contact event for the given contact, stamped now.
    pub fn add_contact_event(&self, contact: Contact) {
        self.add_contact_interaction(Interaction::contact_event(contact));
    }

    /// Ingest a file transfer record. Already-known transfers are ignored.
    pub fn add_file_transfer(&self, mut transfer: Interaction) {
        if self.is_swarm() {
            self.route_to_swarm(transfer);
            return;
        }
        self.set_interaction_properties(&mut transfer);
        self.add_legacy(transfer, true);
    }

    /// Ingest an interaction, dispatching on its kind.
    pub fn add_element(&self, interaction: Interaction) {
        match interaction.kind {
            InteractionKind::Text => self.add_text_message(interaction),
            InteractionKind::Call => self.add_call(interaction),
            InteractionKind::Contact => self.add_contact_interaction(interaction),
            InteractionKind::DataTransfer => self.add_file_transfer(interaction),
            InteractionKind::Invalid => {}
        }
    }

    /// Bulk initial load. No per-element events are published; the displayed
    /// watermark is seeded from the most recent outgoing displayed element
    /// and the last event is derived once at the end.
    pub fn set_history(&self, interactions: Vec<Interaction>) {
        let mut prepared = Vec::with_capacity(interactions.len());
        for mut interaction in interactions {
            self.set_interaction_properties(&mut interaction);
            prepared.push(interaction);
        }
        let mut timeline = self.timeline.lock();
        let mut last_displayed: Option<Interaction> = None;
        for interaction in prepared {
            if !interaction.is_incoming() && interaction.status == InteractionStatus::Displayed {
                last_displayed = Some(interaction.clone());
            }
            if self.is_swarm() {
                timeline.ingest_swarm(interaction, false);
            } else {
                timeline.insert_legacy(interaction);
            }
        }
        if let Some(displayed) = last_displayed {
            timeline.set_last_displayed(displayed.clone());
            self.events.set_last_displayed(displayed);
        }
        if let Some(last) = timeline.last_event() {
            self.events.set_last_event(last);
        }
    }

    fn add_contact_interaction(&self, mut event: Interaction) {
        if self.is_swarm() {
            self.route_to_swarm(event);
            return;
        }
        self.set_interaction_properties(&mut event);
        self.add_legacy(event, false);
    }

    fn add_legacy(&self, interaction: Interaction, dedup: bool) {
        let mut timeline = self.timeline.lock();
        if dedup && timeline.contains_legacy(interaction.timestamp, interaction.id) {
            return;
        }
        timeline.insert_legacy(interaction.clone());
        self.events
            .publish_element(interaction.clone(), ElementStatus::Add);
        if let Some(last) = timeline.last_event() {
            if last.timestamp == interaction.timestamp && last.id == interaction.id {
                self.events.set_last_event(last);
            }
        }
    }

    fn route_to_swarm(&self, interaction: Interaction) {
        if interaction.message_id.is_some() {
            self.add_swarm_element(interaction);
        } else {
            warn!(
                kind = ?interaction.kind,
                "dropping interaction without message id on a swarm conversation"
            );
        }
    }

    // -- updates and removal ------------------------------------------------

    /// Copy the status of `element` onto the stored interaction with the
    /// same identity. The stored instance is mutated in place, never
    /// replaced. Advances the displayed watermark when the new status is
    /// `Displayed` and the element is after the current watermark. A missing
    /// target is a logged no-op.
    pub fn update_interaction(&self, element: Interaction) {
        debug!(
            message_id = ?element.message_id,
            status = ?element.status,
            "update interaction"
        );
        if self.is_swarm() {
            let Some(message_id) = element.message_id.clone() else {
                warn!("cannot update swarm interaction without message id");
                return;
            };
            let mut timeline = self.timeline.lock();
            match timeline.update_swarm(&message_id, element.status) {
                Some(updated) => self.finish_update(&mut timeline, updated),
                None => warn!(%message_id, "cannot find swarm interaction to update"),
            }
        } else {
            let mut element = element;
            self.set_interaction_properties(&mut element);
            let mut timeline = self.timeline.lock();
            match timeline.update_legacy(element.id, element.timestamp, element.status) {
                Some(updated) => self.finish_update(&mut timeline, updated),
                None => warn!(id = element.id, "cannot find interaction to update"),
            }
        }
    }

    fn finish_update(&self, timeline: &mut Timeline, updated: Interaction) {
        self.events
            .publish_element(updated.clone(), ElementStatus::Update);
        if updated.status == InteractionStatus::Displayed && timeline.advance_displayed(&updated) {
            self.events.set_last_displayed(updated);
        }
    }

    /// Update the status of a file transfer record.
    pub fn update_file_transfer(&self, transfer: &Interaction, status: InteractionStatus) {
        let mut timeline = self.timeline.lock();
        let updated = if self.is_swarm() {
            transfer
                .message_id
                .as_deref()
                .and_then(|id| timeline.update_swarm(id, status))
        } else {
            timeline.update_legacy_transfer(transfer.id, status)
        };
        match updated {
            Some(updated) => self.events.publish_element(updated, ElementStatus::Update),
            None => warn!(id = transfer.id, "cannot find file transfer to update"),
        }
    }

    /// Remove an interaction (e.g. a retraction). Removing something already
    /// absent is a no-op and publishes nothing.
    pub fn remove_interaction(&self, interaction: &Interaction) {
        let mut timeline = self.timeline.lock();
        let removed = if self.is_swarm() {
            match interaction.message_id.as_deref() {
                Some(id) => timeline.remove_swarm(id).is_some(),
                None => {
                    warn!("cannot remove swarm interaction without message id");
                    false
                }
            }
        } else {
            timeline.remove_legacy(interaction.id).is_some()
        };
        if removed {
            self.events
                .publish_element(interaction.clone(), ElementStatus::Remove);
        }
    }

    // -- read state ---------------------------------------------------------

    /// Mark the unread tail as read and return the newly-read interactions,
    /// most recent first, for the caller to persist/sync.
    pub fn read_messages(&self) -> Vec<Interaction> {
        let mut timeline = self.timeline.lock();
        let read = timeline.read_sweep();
        // The tail may have just been read; republish it as the last event
        if let Some(first) = read.iter().find(|i| i.kind != InteractionKind::Invalid) {
            self.events.set_last_event(first.clone());
        }
        read
    }

    /// Point lookup by swarm message id.
    pub fn get_message(&self, message_id: &str) -> Option<Interaction> {
        self.timeline.lock().get(message_id)
    }

    /// Trailing unread, un-notified text messages, oldest first.
    pub fn unread_text_messages(&self) -> Vec<Interaction> {
        self.timeline.lock().unread_text_messages()
    }

    /// Restore the read watermark (e.g. from persisted state).
    pub fn set_last_message_read(&self, message_id: Option<String>) {
        self.timeline.lock().set_last_read(message_id);
    }

    pub fn last_read(&self) -> Option<String> {
        self.timeline.lock().last_read()
    }

    /// Restore the notified watermark.
    pub fn set_last_message_notified(&self, message_id: Option<String>) {
        self.timeline.lock().set_last_notified(message_id);
    }

    pub fn last_notified(&self) -> Option<String> {
        self.timeline.lock().last_notified()
    }

    // -- history ------------------------------------------------------------

    /// Snapshot of the ordered history.
    pub fn sorted_history(&self) -> Vec<Interaction> {
        self.timeline.lock().aggregate()
    }

    /// Most recent element that is not an Invalid placeholder.
    pub fn last_event(&self) -> Option<Interaction> {
        self.timeline.lock().last_event()
    }

    /// Whether the fetched history is fully connected: something is stored
    /// and no message still waits for an unknown parent.
    pub fn is_loaded(&self) -> bool {
        self.timeline.lock().is_loaded()
    }

    /// Snapshot of the pending-root set.
    pub fn swarm_roots(&self) -> Vec<String> {
        self.timeline.lock().roots()
    }

    /// Empty the history.
    ///
    /// With `delete == false` and exactly one contact, a synthetic contact
    /// event is re-seeded so the conversation still renders. Publishes the
    /// remaining interactions on the cleared channel.
    pub fn clear_history(&self, delete: bool) {
        let seed = {
            let contacts = self.contacts.read();
            if !delete && contacts.len() == 1 {
                Some(Interaction::contact_event(contacts[0].clone()))
            } else {
                None
            }
        };
        let remaining = self.timeline.lock().clear(seed);
        self.events.publish_cleared(remaining);
    }

    /// Discard history and active calls without publishing; the caller is
    /// tearing the conversation down.
    pub fn remove_all(&self) {
        self.timeline.lock().clear(None);
        self.calls.write().clear();
    }

    // -- contacts -----------------------------------------------------------

    /// Snapshot of the member list.
    pub fn contacts(&self) -> Vec<Contact> {
        self.contacts.read().clone()
    }

    /// Add (or refresh) a member and republish the contact list.
    pub fn add_contact(&self, contact: Contact) {
        let snapshot = {
            let mut contacts = self.contacts.write();
            match contacts.iter().position(|c| c.uri == contact.uri) {
                Some(pos) => contacts[pos] = contact,
                None => contacts.push(contact),
            }
            contacts.clone()
        };
        self.events.publish_contacts(snapshot);
    }

    /// Remove a member and republish the contact list.
    pub fn remove_contact(&self, uri: &Uri) {
        let snapshot = {
            let mut contacts = self.contacts.write();
            contacts.retain(|c| &c.uri != uri);
            contacts.clone()
        };
        self.events.publish_contacts(snapshot);
    }

    pub fn find_contact(&self, uri: &Uri) -> Option<Contact> {
        self.contacts.read().iter().find(|c| &c.uri == uri).cloned()
    }

    /// The single remote peer of this conversation.
    ///
    /// # Panics
    ///
    /// Panics when called on a swarm group with more than two members; that
    /// is caller misuse, not transient state.
    pub fn contact(&self) -> Option<Contact> {
        let contacts = self.contacts.read();
        if contacts.len() == 1 {
            return Some(contacts[0].clone());
        }
        if self.is_swarm() {
            assert!(
                contacts.len() <= 2,
                "contact() called for group conversation of size {}",
                contacts.len()
            );
        }
        contacts.iter().find(|c| !c.is_user).cloned()
    }

    /// Case-insensitive search over the member list.
    pub fn matches(&self, query: &str) -> bool {
        self.contacts.read().iter().any(|c| c.matches(query))
    }

    fn set_interaction_properties(&self, interaction: &mut Interaction) {
        interaction.account_id = Some(self.account_id.clone());
        if interaction.contact.is_none() {
            let contacts = self.contacts.read();
            if contacts.len() == 1 {
                interaction.contact = Some(contacts[0].clone());
            } else if let Some(author) = &interaction.author {
                interaction.contact = contacts.iter().find(|c| &c.uri == author).cloned();
            } else {
                warn!(
                    kind = ?interaction.kind,
                    id = interaction.id,
                    "cannot resolve interaction contact: no author"
                );
            }
        }
    }

    // -- calls --------------------------------------------------------------

    /// Attach a conference, replacing any existing one with the same id, and
    /// republish the active-call list.
    pub fn add_conference(&self, conference: Conference) {
        let snapshot = {
            let mut calls = self.calls.write();
            match calls.iter().position(|c| c.id == conference.id) {
                Some(pos) => calls[pos] = conference,
                None => calls.push(conference),
            }
            calls.clone()
        };
        self.events.set_calls(snapshot);
    }

    /// Detach a conference and republish the active-call list.
    pub fn remove_conference(&self, conference_id: &str) {
        let snapshot = {
            let mut calls = self.calls.write();
            calls.retain(|c| c.id != conference_id);
            calls.clone()
        };
        self.events.set_calls(snapshot);
    }

    /// Find an attached conference by its id or by a nested call id.
    pub fn get_conference(&self, id: &str) -> Option<Conference> {
        self.calls
            .read()
            .iter()
            .find(|c| c.id == id || c.has_call(id))
            .cloned()
    }

    /// The first active conference, if any.
    pub fn current_call(&self) -> Option<Conference> {
        self.calls.read().first().cloned()
    }

    // -- presence/state -----------------------------------------------------

    /// Record whether the user is currently viewing this conversation.
    /// While visible, arriving leaves are auto-read.
    pub fn set_visible(&self, visible: bool) {
        self.events.set_visible(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.events.visible()
    }

    /// Store and republish the conversation mode. Transitions are driven by
    /// the protocol collaborator, never by the core.
    pub fn set_mode(&self, mode: Mode) {
        self.events.set_mode(mode);
    }

    pub fn mode(&self) -> Mode {
        self.events.mode()
    }

    /// Relay a composing (typing) notification from the given contact.
    pub fn composing_status_changed(&self, _contact: &Contact, status: ComposingStatus) {
        self.events.set_composing(status);
    }

    // -- loading handshake --------------------------------------------------

    /// Install a new in-flight initial-load handle.
    ///
    /// At most one load may be pending per conversation: an outstanding
    /// handle is failed with [`ConvoError::LoadingSuperseded`] before the new
    /// one is installed.
    pub fn begin_loading(&self) -> oneshot::Receiver<ConvoResult<()>> {
        let (tx, rx) = oneshot::channel();
        let mut slot = self.loading.lock();
        if let Some(superseded) = slot.take() {
            let _ = superseded.send(Err(ConvoError::LoadingSuperseded));
        }
        *slot = Some(tx);
        rx
    }

    /// Resolve the in-flight load, if any. Returns whether one was pending.
    pub fn stop_loading(&self) -> bool {
        match self.loading.lock().take() {
            Some(pending) => {
                let _ = pending.send(Ok(()));
                true
            }
            None => false,
        }
    }

    // -- channels -----------------------------------------------------------

    /// Per-interaction add/update/remove events, in application order.
    pub fn subscribe_elements(&self) -> broadcast::Receiver<ElementEvent> {
        self.events.subscribe_elements()
    }

    /// Remaining interactions after each history clear.
    pub fn subscribe_cleared(&self) -> broadcast::Receiver<Vec<Interaction>> {
        self.events.subscribe_cleared()
    }

    /// Contact list after each membership change.
    pub fn subscribe_contacts(&self) -> broadcast::Receiver<Vec<Contact>> {
        self.events.subscribe_contacts()
    }

    /// Displayed watermark; replays the latest value.
    pub fn watch_last_displayed(&self) -> watch::Receiver<Option<Interaction>> {
        self.events.watch_last_displayed()
    }

    /// Most recent non-placeholder element; replays the latest value.
    pub fn watch_last_event(&self) -> watch::Receiver<Option<Interaction>> {
        self.events.watch_last_event()
    }

    /// Active conferences; replays the latest value, starts empty.
    pub fn watch_calls(&self) -> watch::Receiver<Vec<Conference>> {
        self.events.watch_calls()
    }

    /// Composing status; replays the latest value, starts Idle.
    pub fn watch_composing(&self) -> watch::Receiver<ComposingStatus> {
        self.events.watch_composing()
    }

    /// Visibility flag; replays the latest value.
    pub fn watch_visible(&self) -> watch::Receiver<bool> {
        self.events.watch_visible()
    }

    /// Conversation mode; replays the latest value.
    pub fn watch_mode(&self) -> watch::Receiver<Mode> {
        self.events.watch_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swarm_conversation() -> Conversation {
        Conversation::with_mode("acc", Uri::from_string("swarm:group"), Mode::Syncing)
    }

    fn legacy_conversation() -> Conversation {
        Conversation::new("acc", Contact::new(Uri::from_string("ring:peer")))
    }

    fn msg(id: &str, parent: Option<&str>, ts: i64) -> Interaction {
        Interaction::swarm_text(id, parent.map(String::from), format!("body {id}"), None, ts)
    }

    #[test]
    fn test_visible_conversation_auto_reads_leaves() {
        let conversation = swarm_conversation();
        conversation.set_visible(true);
        assert!(conversation.add_swarm_element(msg("m1", None, 1)));
        let m1 = conversation.get_message("m1").unwrap();
        assert!(m1.is_read);
        assert_eq!(conversation.last_read().as_deref(), Some("m1"));
    }

    #[test]
    fn test_hidden_conversation_leaves_stay_unread() {
        let conversation = swarm_conversation();
        conversation.add_swarm_element(msg("m1", None, 1));
        assert!(!conversation.get_message("m1").unwrap().is_read);
        assert_eq!(conversation.last_read(), None);
    }

    #[test]
    fn test_update_missing_interaction_is_noop() {
        let conversation = swarm_conversation();
        let mut watch = conversation.watch_last_displayed();
        conversation
            .update_interaction(msg("ghost", None, 1).with_status(InteractionStatus::Displayed));
        assert!(watch.borrow_and_update().is_none());
    }

    #[test]
    fn test_single_contact_resolves_interaction_properties() {
        let conversation = legacy_conversation();
        conversation.add_text_message(Interaction::text(
            1,
            "hi",
            Some(Uri::from_string("ring:peer")),
            1000,
        ));
        let history = conversation.sorted_history();
        assert_eq!(history[0].account_id.as_deref(), Some("acc"));
        assert_eq!(
            history[0].contact.as_ref().unwrap().uri,
            Uri::from_string("ring:peer")
        );
    }

    #[test]
    fn test_loading_handshake_supersede() {
        let conversation = swarm_conversation();
        let mut first = conversation.begin_loading();
        let mut second = conversation.begin_loading();

        assert_eq!(first.try_recv().unwrap(), Err(ConvoError::LoadingSuperseded));
        assert!(conversation.stop_loading());
        assert_eq!(second.try_recv().unwrap(), Ok(()));
        assert!(!conversation.stop_loading());
    }

    #[test]
    fn test_contact_accessor_one_to_one() {
        let conversation = legacy_conversation();
        assert_eq!(
            conversation.contact().unwrap().uri,
            Uri::from_string("ring:peer")
        );
    }

    #[test]
    fn test_contact_accessor_pair_skips_user() {
        let conversation = swarm_conversation();
        conversation.add_contact(Contact::user(Uri::from_string("ring:me")));
        conversation.add_contact(Contact::new(Uri::from_string("ring:them")));
        assert_eq!(
            conversation.contact().unwrap().uri,
            Uri::from_string("ring:them")
        );
    }

    #[test]
    #[should_panic(expected = "group conversation")]
    fn test_contact_accessor_panics_on_group() {
        let conversation = swarm_conversation();
        conversation.add_contact(Contact::user(Uri::from_string("ring:me")));
        conversation.add_contact(Contact::new(Uri::from_string("ring:a")));
        conversation.add_contact(Contact::new(Uri::from_string("ring:b")));
        let _ = conversation.contact();
    }

    #[test]
    fn test_conference_lookup_by_call_id() {
        let conversation = legacy_conversation();
        let mut conference = Conference::new("conf-1");
        conference.call_ids.push("call-7".into());
        conversation.add_conference(conference);

        assert!(conversation.get_conference("conf-1").is_some());
        assert!(conversation.get_conference("call-7").is_some());
        assert!(conversation.get_conference("other").is_none());
        assert_eq!(conversation.current_call().unwrap().id, "conf-1");

        conversation.remove_conference("conf-1");
        assert!(conversation.current_call().is_none());
    }

    #[test]
    fn test_mode_stored_and_republished() {
        let conversation = swarm_conversation();
        assert_eq!(conversation.mode(), Mode::Syncing);
        let rx = conversation.watch_mode();
        conversation.set_mode(Mode::InvitesOnly);
        assert_eq!(conversation.mode(), Mode::InvitesOnly);
        assert_eq!(*rx.borrow(), Mode::InvitesOnly);
    }

    #[test]
    fn test_composing_status_relay() {
        let conversation = legacy_conversation();
        let contact = conversation.contact().unwrap();
        let rx = conversation.watch_composing();
        assert_eq!(*rx.borrow(), ComposingStatus::Idle);
        conversation.composing_status_changed(&contact, ComposingStatus::Active);
        assert_eq!(*rx.borrow(), ComposingStatus::Active);
    }
}
