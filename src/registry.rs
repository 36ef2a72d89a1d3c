//! At-most-one attachment per surface for the surface's lifetime.
//!
//! Entries are keyed by node identity and hold only a weak reference, so a
//! surface discarded by the page is reclaimed without an explicit detach;
//! [`prune`](AttachmentRegistry::prune) sweeps the dead entries. A node id
//! can be reused by the allocator after its node is dropped, which is why
//! attach replaces entries whose weak reference no longer upgrades.

use crate::debounce::Debouncer;
use crate::page::{node_id, NodeId, NodeRef, WeakNodeRef};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Per-surface monitoring state
#[derive(Debug)]
pub struct AttachmentEntry {
    surface: WeakNodeRef,
    /// Quiet-period timer for this surface alone
    pub debouncer: Debouncer,
    seq: u64,
}

impl AttachmentEntry {
    /// The surface, if the page still holds it
    pub fn surface(&self) -> Option<NodeRef> {
        self.surface.upgrade()
    }

    /// Allocate the next sequence number, at request submit time.
    /// Strictly increasing per surface.
    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// The most recently allocated sequence number
    pub fn current_seq(&self) -> u64 {
        self.seq
    }
}

/// Identity-keyed registry of monitored surfaces
#[derive(Debug)]
pub struct AttachmentRegistry {
    quiet_period: Duration,
    entries: HashMap<NodeId, AttachmentEntry>,
}

impl AttachmentRegistry {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            entries: HashMap::new(),
        }
    }

    /// Attach monitoring to a surface. Idempotent: returns `false` without
    /// touching the entry when the surface is already attached.
    pub fn attach(&mut self, surface: &NodeRef) -> bool {
        let id = node_id(surface);
        if let Some(entry) = self.entries.get(&id) {
            if entry.surface().is_some() {
                return false;
            }
        }
        self.entries.insert(
            id,
            AttachmentEntry {
                surface: Arc::downgrade(surface),
                debouncer: Debouncer::new(self.quiet_period),
                seq: 0,
            },
        );
        true
    }

    pub fn is_attached(&self, surface: &NodeRef) -> bool {
        self.entries
            .get(&node_id(surface))
            .is_some_and(|e| e.surface().is_some())
    }

    pub fn get(&self, id: NodeId) -> Option<&AttachmentEntry> {
        self.entries.get(&id)
    }

    pub fn entry_mut(&mut self, id: NodeId) -> Option<&mut AttachmentEntry> {
        self.entries.get_mut(&id)
    }

    /// Drop entries whose surface the page no longer holds
    pub fn prune(&mut self) {
        self.entries.retain(|_, entry| entry.surface().is_some());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageTree;

    fn registry() -> AttachmentRegistry {
        AttachmentRegistry::new(Duration::from_millis(300))
    }

    #[test]
    fn attach_is_idempotent() {
        let (tree, _rx) = PageTree::new();
        let surface = tree.create_element("div");
        let mut registry = registry();

        assert!(registry.attach(&surface));
        assert!(!registry.attach(&surface));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn identical_text_tracked_independently() {
        let (tree, _rx) = PageTree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        a.set_text("same draft");
        b.set_text("same draft");
        let mut registry = registry();

        assert!(registry.attach(&a));
        assert!(registry.attach(&b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn sequence_numbers_strictly_increase() {
        let (tree, _rx) = PageTree::new();
        let surface = tree.create_element("div");
        let mut registry = registry();
        registry.attach(&surface);

        let entry = registry.entry_mut(node_id(&surface)).unwrap();
        assert_eq!(entry.next_seq(), 1);
        assert_eq!(entry.next_seq(), 2);
        assert_eq!(entry.current_seq(), 2);
    }

    #[test]
    fn prune_drops_dead_surfaces() {
        let (tree, _rx) = PageTree::new();
        let kept = tree.create_element("div");
        let mut registry = registry();
        registry.attach(&kept);
        {
            let dropped = tree.create_element("div");
            registry.attach(&dropped);
        }
        assert_eq!(registry.len(), 2);

        registry.prune();
        assert_eq!(registry.len(), 1);
        assert!(registry.is_attached(&kept));
    }
}
