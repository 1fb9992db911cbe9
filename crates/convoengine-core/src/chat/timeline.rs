//! Conversation timeline: interaction store and ordered projection
//!
//! One [`Timeline`] holds the authoritative interaction set of a single
//! conversation and keeps a linearized view of it at all times. The backing
//! structure depends on the replication mode:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Timeline                                                       │
//! │  ├── Legacy: BTreeMap<(timestamp, id), Interaction>             │
//! │  │   └── iteration order IS the display order                   │
//! │  ├── Swarm:                                                     │
//! │  │   ├── order: Vec<Interaction>      linearized DAG            │
//! │  │   ├── index: message id → position in order                  │
//! │  │   ├── detached: ingested, parent chain not yet reachable     │
//! │  │   └── roots: parent ids referenced but not ingested          │
//! │  └── watermarks: last_read / last_notified / last_displayed     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The swarm projection maintains the causal invariant: whenever a message
//! and its parent are both placed, the parent precedes it. Messages whose
//! parent chain is not reachable yet stay in `detached` and are re-placed
//! automatically once a later arrival connects them.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use crate::chat::interaction::{Interaction, InteractionKind, InteractionStatus};

/// One interaction that entered the linearized sequence.
#[derive(Debug, Clone)]
pub(crate) struct SwarmArrival {
    /// Snapshot after ingest side effects (read marking, watermarks)
    pub interaction: Interaction,
    /// Whether it was appended at the true tail
    pub is_leaf: bool,
}

/// Result of a swarm ingest.
#[derive(Debug)]
pub(crate) enum SwarmIngest {
    /// The message id was already known; nothing changed
    Duplicate,
    /// The message was stored. `arrivals` lists everything that entered the
    /// sequence, in placement order: the ingested message (unless its parent
    /// chain is unreachable and it went to the detached set) plus any
    /// previously detached messages it unblocked.
    Ingested {
        /// The ingested message itself landed at the tail
        new_leaf: bool,
        /// Placements performed by this ingest
        arrivals: Vec<SwarmArrival>,
    },
}

/// Legacy linear history, keyed by `(timestamp, id)`.
///
/// The composite key keeps interactions with identical timestamps distinct
/// and gives them a stable order, so the map is the single authoritative
/// ordered structure and the display sequence is just its iteration order.
#[derive(Debug, Default)]
struct LegacyLog {
    raw: BTreeMap<(i64, i64), Interaction>,
}

/// Swarm DAG store plus its linearization.
#[derive(Debug, Default)]
struct SwarmLog {
    /// Linearized projection, always a valid topological order
    order: Vec<Interaction>,
    /// message id → position in `order`
    index: HashMap<String, usize>,
    /// Ingested messages whose parent chain is not reachable yet
    detached: HashMap<String, Interaction>,
    /// Parent ids referenced by stored messages but not themselves stored
    roots: HashSet<String>,
}

impl SwarmLog {
    /// Whether the id is stored at all (placed or detached).
    fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id) || self.detached.contains_key(id)
    }

    fn lookup(&self, id: &str) -> Option<&Interaction> {
        if let Some(&pos) = self.index.get(id) {
            return self.order.get(pos);
        }
        self.detached.get(id)
    }

    fn lookup_mut(&mut self, id: &str) -> Option<&mut Interaction> {
        if let Some(&pos) = self.index.get(id) {
            return self.order.get_mut(pos);
        }
        self.detached.get_mut(id)
    }

    /// Find where an interaction belongs in the sequence.
    ///
    /// Returns the insertion position and whether it is the true tail, or
    /// `None` when neither the parent nor any child is reachable yet.
    fn find_slot(&self, interaction: &Interaction) -> Option<(usize, bool)> {
        if self.order.is_empty() {
            return Some((0, true));
        }
        let parent = interaction.parent_id.as_deref();
        // Fast path: continuing the chain at the tail
        if self.order.last().map(|t| t.message_id.as_deref()) == Some(parent) {
            return Some((self.order.len(), true));
        }
        // The interaction is somebody's missing parent: splice it in right
        // before its first child to keep the existing order stable
        if let Some(my_id) = interaction.message_id.as_deref() {
            if let Some(pos) = self
                .order
                .iter()
                .position(|e| e.parent_id.as_deref() == Some(my_id))
            {
                return Some((pos, false));
            }
        }
        // The parent sits somewhere in the middle: insert right after it
        if let Some(parent) = parent {
            if let Some(pos) = self
                .order
                .iter()
                .rposition(|e| e.message_id.as_deref() == Some(parent))
            {
                return Some((pos + 1, pos + 1 == self.order.len()));
            }
        }
        None
    }

    fn insert_at(&mut self, pos: usize, interaction: Interaction) {
        for p in self.index.values_mut() {
            if *p >= pos {
                *p += 1;
            }
        }
        if let Some(id) = interaction.message_id.clone() {
            self.index.insert(id, pos);
        }
        self.order.insert(pos, interaction);
    }

    fn remove(&mut self, id: &str) -> Option<Interaction> {
        if let Some(pos) = self.index.remove(id) {
            let removed = self.order.remove(pos);
            for p in self.index.values_mut() {
                if *p > pos {
                    *p -= 1;
                }
            }
            Some(removed)
        } else {
            self.detached.remove(id)
        }
    }
}

#[derive(Debug)]
enum Backend {
    Legacy(LegacyLog),
    Swarm(SwarmLog),
}

/// Interaction store and ordered projection for one conversation.
#[derive(Debug)]
pub(crate) struct Timeline {
    backend: Backend,
    last_read: Option<String>,
    last_notified: Option<String>,
    last_displayed: Option<Interaction>,
}

impl Timeline {
    pub(crate) fn new(swarm: bool) -> Self {
        let backend = if swarm {
            Backend::Swarm(SwarmLog::default())
        } else {
            Backend::Legacy(LegacyLog::default())
        };
        Self {
            backend,
            last_read: None,
            last_notified: None,
            last_displayed: None,
        }
    }

    // -- swarm ingestion ----------------------------------------------------

    /// Store a swarm interaction and place it in the sequence.
    ///
    /// Duplicate ids are a silent no-op. An interaction whose parent chain is
    /// unreachable is kept in the detached set and placed later; either way
    /// the pending-root set is updated. When `visible` is set, placements at
    /// the tail are marked read and advance the read watermark.
    pub(crate) fn ingest_swarm(&mut self, mut interaction: Interaction, visible: bool) -> SwarmIngest {
        let Backend::Swarm(log) = &mut self.backend else {
            warn!("ignoring swarm ingest on a legacy timeline");
            return SwarmIngest::Duplicate;
        };
        let message_id = interaction
            .message_id
            .clone()
            .expect("swarm interaction without message id");
        if log.contains(&message_id) {
            return SwarmIngest::Duplicate;
        }

        log.roots.remove(&message_id);
        if let Some(parent) = interaction.parent_id.clone() {
            if !log.contains(&parent) {
                log.roots.insert(parent);
            }
        }

        // Watermarks restored from the collaborator apply on arrival
        if self.last_read.as_deref() == Some(message_id.as_str()) {
            interaction.read();
        }
        if self.last_notified.as_deref() == Some(message_id.as_str()) {
            interaction.is_notified = true;
        }

        let mut arrivals = Vec::new();
        let new_leaf = match log.find_slot(&interaction) {
            Some((pos, leaf)) => {
                if leaf && visible {
                    interaction.read();
                    self.last_read = Some(message_id);
                }
                log.insert_at(pos, interaction.clone());
                arrivals.push(SwarmArrival {
                    interaction,
                    is_leaf: leaf,
                });

                // A successful placement can make detached messages
                // reachable; keep placing until a full pass makes no progress
                loop {
                    let mut progressed = false;
                    let pending: Vec<String> = log.detached.keys().cloned().collect();
                    for id in pending {
                        let slot = match log.detached.get(&id) {
                            Some(detached) => log.find_slot(detached),
                            None => None,
                        };
                        let Some((pos, leaf)) = slot else {
                            continue;
                        };
                        let Some(mut freed) = log.detached.remove(&id) else {
                            continue;
                        };
                        if leaf && visible {
                            freed.read();
                            self.last_read = freed.message_id.clone();
                        }
                        log.insert_at(pos, freed.clone());
                        arrivals.push(SwarmArrival {
                            interaction: freed,
                            is_leaf: leaf,
                        });
                        progressed = true;
                    }
                    if !progressed {
                        break;
                    }
                }
                leaf
            }
            None => {
                warn!(
                    message_id = %message_id,
                    parent_id = ?interaction.parent_id,
                    "cannot attach interaction yet, keeping it detached"
                );
                log.detached.insert(message_id, interaction);
                false
            }
        };
        SwarmIngest::Ingested { new_leaf, arrivals }
    }

    // -- legacy ingestion ---------------------------------------------------

    /// Insert a legacy interaction. Returns false when the `(timestamp, id)`
    /// slot was already occupied (the new value replaces the old one).
    pub(crate) fn insert_legacy(&mut self, interaction: Interaction) -> bool {
        let Backend::Legacy(log) = &mut self.backend else {
            warn!("ignoring legacy insert on a swarm timeline");
            return false;
        };
        log.raw
            .insert((interaction.timestamp, interaction.id), interaction)
            .is_none()
    }

    /// Whether a legacy interaction occupies the `(timestamp, id)` slot.
    pub(crate) fn contains_legacy(&self, timestamp: i64, id: i64) -> bool {
        match &self.backend {
            Backend::Legacy(log) => log.raw.contains_key(&(timestamp, id)),
            Backend::Swarm(_) => false,
        }
    }

    // -- point updates ------------------------------------------------------

    /// Copy a new status onto the stored swarm interaction, preserving the
    /// stored instance. Returns a snapshot of the updated interaction.
    pub(crate) fn update_swarm(
        &mut self,
        message_id: &str,
        status: InteractionStatus,
    ) -> Option<Interaction> {
        let Backend::Swarm(log) = &mut self.backend else {
            return None;
        };
        let target = log.lookup_mut(message_id)?;
        target.status = status;
        Some(target.clone())
    }

    /// Copy a new status onto the stored legacy interaction found by its
    /// timestamp bucket and id.
    pub(crate) fn update_legacy(
        &mut self,
        id: i64,
        timestamp: i64,
        status: InteractionStatus,
    ) -> Option<Interaction> {
        let Backend::Legacy(log) = &mut self.backend else {
            return None;
        };
        for (_, stored) in log
            .raw
            .range_mut((timestamp, i64::MIN)..=(timestamp, i64::MAX))
        {
            if stored.id == id {
                stored.status = status;
                return Some(stored.clone());
            }
        }
        None
    }

    /// Update the status of a legacy file transfer found by its transfer id.
    pub(crate) fn update_legacy_transfer(
        &mut self,
        transfer_id: i64,
        status: InteractionStatus,
    ) -> Option<Interaction> {
        let Backend::Legacy(log) = &mut self.backend else {
            return None;
        };
        for stored in log.raw.values_mut() {
            if stored.kind == InteractionKind::DataTransfer && stored.id == transfer_id {
                stored.status = status;
                return Some(stored.clone());
            }
        }
        None
    }

    // -- removal ------------------------------------------------------------

    pub(crate) fn remove_swarm(&mut self, message_id: &str) -> Option<Interaction> {
        let Backend::Swarm(log) = &mut self.backend else {
            return None;
        };
        log.remove(message_id)
    }

    /// Remove a legacy interaction by numeric id (linear scan).
    pub(crate) fn remove_legacy(&mut self, id: i64) -> Option<Interaction> {
        let Backend::Legacy(log) = &mut self.backend else {
            return None;
        };
        let key = log
            .raw
            .iter()
            .find(|(_, v)| v.id == id)
            .map(|(k, _)| *k)?;
        log.raw.remove(&key)
    }

    // -- queries ------------------------------------------------------------

    /// Point lookup by swarm message id. Returns a snapshot.
    pub(crate) fn get(&self, message_id: &str) -> Option<Interaction> {
        match &self.backend {
            Backend::Swarm(log) => log.lookup(message_id).cloned(),
            Backend::Legacy(_) => None,
        }
    }

    /// Snapshot of the ordered sequence.
    pub(crate) fn aggregate(&self) -> Vec<Interaction> {
        match &self.backend {
            Backend::Legacy(log) => log.raw.values().cloned().collect(),
            Backend::Swarm(log) => log.order.clone(),
        }
    }

    /// Most recent element that is not an Invalid placeholder.
    pub(crate) fn last_event(&self) -> Option<Interaction> {
        match &self.backend {
            Backend::Legacy(log) => log
                .raw
                .values()
                .rev()
                .find(|i| i.kind != InteractionKind::Invalid)
                .cloned(),
            Backend::Swarm(log) => log
                .order
                .iter()
                .rev()
                .find(|i| i.kind != InteractionKind::Invalid)
                .cloned(),
        }
    }

    /// The DAG is fully connected from the fetched frontier: something is
    /// stored and nothing still waits for an unknown parent.
    pub(crate) fn is_loaded(&self) -> bool {
        match &self.backend {
            Backend::Swarm(log) => {
                (!log.index.is_empty() || !log.detached.is_empty()) && log.roots.is_empty()
            }
            Backend::Legacy(_) => false,
        }
    }

    /// Snapshot of the pending-root set.
    pub(crate) fn roots(&self) -> Vec<String> {
        match &self.backend {
            Backend::Swarm(log) => log.roots.iter().cloned().collect(),
            Backend::Legacy(_) => Vec::new(),
        }
    }

    // -- read sweep ---------------------------------------------------------

    /// Mark the unread tail as read, most recent first.
    ///
    /// Swarm: walks backward from the tail, marking unread elements, and
    /// keeps walking only while the examined element is an Invalid
    /// placeholder. Legacy: walks text messages in descending timestamp
    /// order and stops at the first already-read one.
    pub(crate) fn read_sweep(&mut self) -> Vec<Interaction> {
        let mut collected = Vec::new();
        match &mut self.backend {
            Backend::Swarm(log) => {
                let mut n = log.order.len();
                loop {
                    if n == 0 {
                        break;
                    }
                    n -= 1;
                    let examined = &mut log.order[n];
                    if !examined.is_read {
                        examined.read();
                        collected.push(examined.clone());
                        self.last_read = examined.message_id.clone();
                    }
                    if examined.kind != InteractionKind::Invalid {
                        break;
                    }
                }
            }
            Backend::Legacy(log) => {
                for stored in log.raw.values_mut().rev() {
                    if stored.kind != InteractionKind::Text {
                        continue;
                    }
                    if stored.is_read {
                        break;
                    }
                    stored.read();
                    collected.push(stored.clone());
                }
            }
        }
        collected
    }

    /// Trailing text messages that are neither read nor notified, oldest
    /// first.
    pub(crate) fn unread_text_messages(&self) -> Vec<Interaction> {
        let mut texts = Vec::new();
        match &self.backend {
            Backend::Swarm(log) => {
                for i in log.order.iter().rev() {
                    if i.kind != InteractionKind::Text {
                        continue;
                    }
                    if i.is_read || i.is_notified {
                        break;
                    }
                    texts.push(i.clone());
                }
            }
            Backend::Legacy(log) => {
                for i in log.raw.values().rev() {
                    if i.kind != InteractionKind::Text {
                        continue;
                    }
                    if i.is_read || i.is_notified {
                        break;
                    }
                    texts.push(i.clone());
                }
            }
        }
        texts.reverse();
        texts
    }

    // -- clearing -----------------------------------------------------------

    /// Empty every backing structure, optionally re-seeding one synthetic
    /// interaction. Returns a snapshot of what remains.
    pub(crate) fn clear(&mut self, seed: Option<Interaction>) -> Vec<Interaction> {
        match &mut self.backend {
            Backend::Legacy(log) => {
                log.raw.clear();
                if let Some(seed) = seed {
                    log.raw.insert((seed.timestamp, seed.id), seed);
                }
            }
            Backend::Swarm(log) => {
                log.order.clear();
                log.index.clear();
                log.detached.clear();
                log.roots.clear();
                if let Some(seed) = seed {
                    log.order.push(seed);
                }
            }
        }
        self.aggregate()
    }

    // -- watermarks ---------------------------------------------------------

    pub(crate) fn last_read(&self) -> Option<String> {
        self.last_read.clone()
    }

    pub(crate) fn set_last_read(&mut self, message_id: Option<String>) {
        self.last_read = message_id;
    }

    pub(crate) fn last_notified(&self) -> Option<String> {
        self.last_notified.clone()
    }

    pub(crate) fn set_last_notified(&mut self, message_id: Option<String>) {
        self.last_notified = message_id;
    }

    pub(crate) fn set_last_displayed(&mut self, interaction: Interaction) {
        self.last_displayed = Some(interaction);
    }

    /// Move the displayed watermark to `candidate` if it is causally (swarm)
    /// or temporally (legacy) after the current one. Returns whether it
    /// moved.
    pub(crate) fn advance_displayed(&mut self, candidate: &Interaction) -> bool {
        let advanced = match &self.last_displayed {
            None => true,
            Some(previous) => self.is_after(previous, candidate),
        };
        if advanced {
            self.last_displayed = Some(candidate.clone());
        }
        advanced
    }

    /// Whether `query` comes after `previous`: reachability over the parent
    /// chain in swarm mode, timestamp comparison in legacy mode.
    fn is_after(&self, previous: &Interaction, query: &Interaction) -> bool {
        match &self.backend {
            Backend::Swarm(log) => {
                let mut cursor = query.parent_id.clone();
                while let Some(parent) = cursor {
                    if Some(parent.as_str()) == previous.message_id.as_deref() {
                        return true;
                    }
                    cursor = log.lookup(&parent).and_then(|i| i.parent_id.clone());
                }
                false
            }
            Backend::Legacy(_) => previous.timestamp < query.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swarm_msg(id: &str, parent: Option<&str>, ts: i64) -> Interaction {
        Interaction::swarm_text(id, parent.map(String::from), format!("body {id}"), None, ts)
    }

    fn ids(timeline: &Timeline) -> Vec<String> {
        timeline
            .aggregate()
            .iter()
            .map(|i| i.message_id.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_fast_path_append() {
        let mut t = Timeline::new(true);
        let r1 = t.ingest_swarm(swarm_msg("m1", None, 1), false);
        assert!(matches!(r1, SwarmIngest::Ingested { new_leaf: true, .. }));
        let r2 = t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        assert!(matches!(r2, SwarmIngest::Ingested { new_leaf: true, .. }));
        assert_eq!(ids(&t), ["m1", "m2"]);
        assert!(t.is_loaded());
    }

    #[test]
    fn test_duplicate_ingest_is_noop() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        let r = t.ingest_swarm(swarm_msg("m1", None, 1), false);
        assert!(matches!(r, SwarmIngest::Duplicate));
        assert_eq!(t.aggregate().len(), 1);
    }

    #[test]
    fn test_new_root_spliced_before_child() {
        let mut t = Timeline::new(true);
        // Loading backward: the newest messages arrive first
        t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        t.ingest_swarm(swarm_msg("m3", Some("m2"), 3), false);
        assert_eq!(t.roots(), vec!["m1".to_string()]);

        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        assert_eq!(ids(&t), ["m1", "m2", "m3"]);
        assert!(t.roots().is_empty());
        assert!(t.is_loaded());
    }

    #[test]
    fn test_mid_sequence_parent_insert_after() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        t.ingest_swarm(swarm_msg("m3", Some("m2"), 3), false);
        // A sibling branch off m1 lands right after its parent
        let r = t.ingest_swarm(swarm_msg("b1", Some("m1"), 4), false);
        match r {
            SwarmIngest::Ingested { new_leaf, .. } => assert!(!new_leaf),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(ids(&t), ["m1", "b1", "m2", "m3"]);
    }

    #[test]
    fn test_detached_message_attaches_when_parent_arrives() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        // m3's parent m2 is unknown: stored but not placed
        let r = t.ingest_swarm(swarm_msg("m3", Some("m2"), 3), false);
        match r {
            SwarmIngest::Ingested { new_leaf, arrivals } => {
                assert!(!new_leaf);
                assert!(arrivals.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(ids(&t), ["m1"]);
        assert_eq!(t.roots(), vec!["m2".to_string()]);
        assert!(!t.is_loaded());

        // The missing parent connects everything
        let r = t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        match r {
            SwarmIngest::Ingested { new_leaf, arrivals } => {
                assert!(new_leaf);
                assert_eq!(arrivals.len(), 2);
                assert!(arrivals[1].is_leaf);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(ids(&t), ["m1", "m2", "m3"]);
        assert!(t.roots().is_empty());
        assert!(t.is_loaded());
    }

    #[test]
    fn test_detached_root_attaches_when_child_arrives() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m3", Some("m2"), 3), false);
        // m1 can reach neither its (nonexistent) parent nor a child yet
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        assert_eq!(ids(&t), ["m3"]);

        t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        assert_eq!(ids(&t), ["m1", "m2", "m3"]);
        assert!(t.is_loaded());
    }

    #[test]
    fn test_visible_leaf_marked_read_and_advances_watermark() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), true);
        let SwarmIngest::Ingested { arrivals, .. } = t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), true)
        else {
            panic!("expected ingest");
        };
        assert!(arrivals[0].interaction.is_read);
        assert_eq!(t.last_read().as_deref(), Some("m2"));
    }

    #[test]
    fn test_restored_watermarks_apply_on_arrival() {
        let mut t = Timeline::new(true);
        t.set_last_read(Some("m1".into()));
        t.set_last_notified(Some("m1".into()));
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        let stored = t.get("m1").unwrap();
        assert!(stored.is_read);
        assert!(stored.is_notified);
    }

    #[test]
    fn test_remove_swarm_keeps_index_consistent() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        t.ingest_swarm(swarm_msg("m3", Some("m2"), 3), false);

        assert!(t.remove_swarm("m2").is_some());
        assert_eq!(ids(&t), ["m1", "m3"]);
        // Remaining entries still resolve through the index
        assert_eq!(t.get("m3").unwrap().message_id.as_deref(), Some("m3"));
        assert!(t.remove_swarm("m2").is_none());
    }

    #[test]
    fn test_legacy_identical_timestamps_coexist() {
        let mut t = Timeline::new(false);
        assert!(t.insert_legacy(Interaction::text(1, "a", None, 1000)));
        assert!(t.insert_legacy(Interaction::text(2, "b", None, 1000)));
        let history = t.aggregate();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, 1);
        assert_eq!(history[1].id, 2);
    }

    #[test]
    fn test_legacy_ordering_by_timestamp() {
        let mut t = Timeline::new(false);
        t.insert_legacy(Interaction::text(3, "third", None, 3000));
        t.insert_legacy(Interaction::text(1, "first", None, 1000));
        t.insert_legacy(Interaction::text(2, "second", None, 2000));
        let bodies: Vec<_> = t
            .aggregate()
            .iter()
            .map(|i| i.body.clone().unwrap())
            .collect();
        assert_eq!(bodies, ["first", "second", "third"]);
    }

    #[test]
    fn test_legacy_update_by_timestamp_bucket_and_id() {
        let mut t = Timeline::new(false);
        t.insert_legacy(Interaction::text(1, "a", None, 1000));
        t.insert_legacy(Interaction::text(2, "b", None, 1000));
        let updated = t.update_legacy(2, 1000, InteractionStatus::Displayed).unwrap();
        assert_eq!(updated.id, 2);
        assert_eq!(updated.status, InteractionStatus::Displayed);
        // The sibling with the same timestamp is untouched
        let a = t.aggregate().into_iter().find(|i| i.id == 1).unwrap();
        assert_eq!(a.status, InteractionStatus::Unknown);
    }

    #[test]
    fn test_last_event_skips_invalid() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        t.ingest_swarm(Interaction::invalid("m2", Some("m1".into()), 2), false);
        let last = t.last_event().unwrap();
        assert_eq!(last.message_id.as_deref(), Some("m1"));
    }

    #[test]
    fn test_swarm_read_sweep_invalid_run() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        t.ingest_swarm(Interaction::invalid("m3", Some("m2".into()), 3), false);

        // The sweep consumes the trailing Invalid run plus the first real
        // message, then stops
        let read = t.read_sweep();
        let read_ids: Vec<_> = read
            .iter()
            .map(|i| i.message_id.clone().unwrap())
            .collect();
        assert_eq!(read_ids, ["m3", "m2"]);
        let m1 = t.get("m1").unwrap();
        assert!(!m1.is_read);
    }

    #[test]
    fn test_advance_displayed_parent_chain() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        t.ingest_swarm(swarm_msg("m3", Some("m2"), 3), false);

        let m3 = t.get("m3").unwrap();
        assert!(t.advance_displayed(&m3));
        // Ancestors can no longer advance the watermark
        let m1 = t.get("m1").unwrap();
        assert!(!t.advance_displayed(&m1));
        let m2 = t.get("m2").unwrap();
        assert!(!t.advance_displayed(&m2));
        // A descendant of the watermark still can
        t.ingest_swarm(swarm_msg("m4", Some("m3"), 4), false);
        let m4 = t.get("m4").unwrap();
        assert!(t.advance_displayed(&m4));
    }

    #[test]
    fn test_clear_with_seed() {
        let mut t = Timeline::new(true);
        t.ingest_swarm(swarm_msg("m1", None, 1), false);
        t.ingest_swarm(swarm_msg("m2", Some("m1"), 2), false);
        let seed = Interaction::contact_event(crate::types::contact::Contact::new(
            crate::types::Uri::from_string("ring:peer"),
        ));
        let remaining = t.clear(Some(seed));
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kind, InteractionKind::Contact);
        assert!(t.roots().is_empty());
        assert!(!t.is_loaded());
    }
}
