//! The singleton warning banner.
//!
//! A two-state machine, HIDDEN or VISIBLE(score), backing exactly one
//! overlay node in the tree. The node is created on first show and reused
//! for score updates; hiding removes it and removal is idempotent. Each
//! transition applies immediately - the latest transition wins. Callers
//! are responsible for feeding only sequence-current outcomes.

use crate::page::{NodeRef, PageTree};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Id attribute carried by the overlay node
pub const BANNER_ID: &str = "intent-guard-banner";

const BANNER_STYLE: &str =
    "position:fixed;top:12px;left:50%;transform:translateX(-50%);pointer-events:none";

/// Banner state, observable through [`BannerController::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Hidden,
    /// Visible with the displayed (rounded) score
    Visible { score: i64 },
}

fn banner_message(score: i64) -> String {
    format!(
        "⚠️ Heads up: Your draft may be harmful (Intent score: {}). Please reconsider.",
        score
    )
}

/// Owns the overlay node and the visible/hidden state
pub struct BannerController {
    tree: PageTree,
    node: Option<NodeRef>,
    state: watch::Sender<BannerState>,
}

impl BannerController {
    pub fn new(tree: PageTree) -> Self {
        let (state, _) = watch::channel(BannerState::Hidden);
        Self {
            tree,
            node: None,
            state,
        }
    }

    /// Watch state transitions; notified only on actual changes
    pub fn subscribe(&self) -> watch::Receiver<BannerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> BannerState {
        *self.state.borrow()
    }

    /// Show the banner with the given raw score, rounded for display.
    /// Re-showing replaces the displayed score on the same node.
    pub fn show(&mut self, score: f64) {
        let rounded = score.round() as i64;
        let node = self.ensure_node();
        node.set_text(&banner_message(rounded));
        let changed = self.state.send_if_modified(|state| {
            let next = BannerState::Visible { score: rounded };
            if *state != next {
                *state = next;
                true
            } else {
                false
            }
        });
        if changed {
            info!(score = rounded, "warning banner shown");
        }
    }

    /// Hide and remove the banner. A no-op when already hidden.
    pub fn hide(&mut self) {
        if let Some(node) = self.node.take() {
            if let Some(parent) = node.parent() {
                self.tree.remove_child(&parent, &node);
            }
            debug!("warning banner removed");
        }
        self.state.send_if_modified(|state| {
            if *state != BannerState::Hidden {
                *state = BannerState::Hidden;
                true
            } else {
                false
            }
        });
    }

    fn ensure_node(&mut self) -> NodeRef {
        if let Some(node) = &self.node {
            return Arc::clone(node);
        }
        let node = self.tree.create_element("div");
        node.set_attr("id", BANNER_ID);
        node.set_attr("role", "status");
        node.set_attr("style", BANNER_STYLE);
        let root = Arc::clone(self.tree.root());
        self.tree.append_child(&root, &node);
        self.node = Some(Arc::clone(&node));
        node
    }
}
