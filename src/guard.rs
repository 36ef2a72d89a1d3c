//! The guard event loop.
//!
//! A single task owns the registry and the banner, so every mutation of
//! shared state happens in one place and in arrival order. Tree events,
//! debounce expirations, and classification completions all land here over
//! channels; the only suspension point is the relay round-trip, which runs
//! in spawned tasks tagged with a per-surface sequence number. An outcome
//! is applied only while its sequence number is still the highest submitted
//! for its surface - last request wins, not last response.

use crate::banner::{BannerController, BannerState};
use crate::classifier::ClassificationClient;
use crate::config::GuardConfig;
use crate::matcher::SurfaceMatcher;
use crate::page::{node_id, NodeId, NodeRef, PageEvent, PageTree};
use crate::registry::AttachmentRegistry;
use crate::relay::Relay;
use crate::text::read_text;
use crate::types::ClassifyOutcome;
use crate::watcher::MutationWatcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, trace, warn};

pub struct IntentGuard {
    threshold: f64,
    tree: PageTree,
    watcher: MutationWatcher,
    registry: AttachmentRegistry,
    banner: BannerController,
    client: Arc<ClassificationClient>,
    analyze_tx: mpsc::UnboundedSender<NodeId>,
    analyze_rx: Option<mpsc::UnboundedReceiver<NodeId>>,
    outcome_tx: mpsc::UnboundedSender<ClassifyOutcome>,
    outcome_rx: Option<mpsc::UnboundedReceiver<ClassifyOutcome>>,
}

impl IntentGuard {
    pub fn new(config: &GuardConfig, tree: PageTree, relay: Arc<dyn Relay>) -> Self {
        let (analyze_tx, analyze_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let quiet_period = Duration::from_millis(config.detection.debounce_ms);

        Self {
            threshold: config.detection.threshold,
            banner: BannerController::new(tree.clone()),
            tree,
            watcher: MutationWatcher::new(SurfaceMatcher::with_defaults()),
            registry: AttachmentRegistry::new(quiet_period),
            client: Arc::new(ClassificationClient::new(relay)),
            analyze_tx,
            analyze_rx: Some(analyze_rx),
            outcome_tx,
            outcome_rx: Some(outcome_rx),
        }
    }

    /// Watch banner transitions. Must be called before [`run`](Self::run).
    pub fn banner_states(&self) -> watch::Receiver<BannerState> {
        self.banner.subscribe()
    }

    /// Run until the page unloads or its event feed closes
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<PageEvent>) {
        let (mut analyze_rx, mut outcome_rx) =
            match (self.analyze_rx.take(), self.outcome_rx.take()) {
                (Some(analyze_rx), Some(outcome_rx)) => (analyze_rx, outcome_rx),
                _ => {
                    error!("guard event loop started twice");
                    return;
                }
            };

        info!(threshold = self.threshold, "intent guard started");

        // Composers already on the page are attached before the feed is
        // consumed, so a pre-existing draft is checked without an edit.
        let root = Arc::clone(self.tree.root());
        self.scan_and_attach(&root);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(PageEvent::Inserted(node)) => self.scan_and_attach(&node),
                    Some(PageEvent::Input(node)) => self.on_input(&node),
                    Some(PageEvent::Blur(node)) => self.on_blur(&node),
                    Some(PageEvent::Unload) | None => break,
                },
                Some(id) = analyze_rx.recv() => self.start_analysis(id),
                Some(outcome) = outcome_rx.recv() => self.apply_outcome(outcome),
            }
        }

        self.banner.hide();
        info!("intent guard stopped");
    }

    fn scan_and_attach(&mut self, subtree: &NodeRef) {
        let surfaces = self.watcher.discover(subtree);
        if !surfaces.is_empty() {
            debug!(count = surfaces.len(), "composers discovered");
        }
        for surface in surfaces {
            let id = node_id(&surface);
            if self.registry.attach(&surface) {
                debug!(surface = id, tag = surface.tag(), "attached to composer");
                // First analysis pass covers an already-populated draft
                self.queue_analysis(id);
            }
        }
    }

    /// Focus loss on an attached surface always lowers the warning,
    /// regardless of in-flight requests
    fn on_blur(&mut self, node: &NodeRef) {
        if self.registry.get(node_id(node)).is_some() {
            self.banner.hide();
        }
    }

    fn on_input(&mut self, node: &NodeRef) {
        let id = node_id(node);
        if self.registry.get(id).is_some() {
            self.queue_analysis(id);
        }
    }

    /// Arm (or re-arm) the surface's quiet-period timer
    fn queue_analysis(&mut self, id: NodeId) {
        let tx = self.analyze_tx.clone();
        let Some(entry) = self.registry.entry_mut(id) else {
            return;
        };
        entry.debouncer.trigger(move || {
            let _ = tx.send(id);
        });
    }

    /// The quiet period elapsed: snapshot the text and submit a request
    fn start_analysis(&mut self, id: NodeId) {
        let Some(entry) = self.registry.entry_mut(id) else {
            return;
        };
        let Some(surface) = entry.surface() else {
            // The composer left the page while its timer was pending
            self.registry.prune();
            return;
        };

        let text = read_text(Some(&surface));
        if text.trim().is_empty() {
            // Nothing to classify; no network call
            self.banner.hide();
            return;
        }

        let seq = entry.next_seq();
        trace!(surface = id, seq, chars = text.len(), "classification submitted");

        let client = Arc::clone(&self.client);
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = client.classify(&text).await;
            let _ = outcome_tx.send(ClassifyOutcome {
                surface: id,
                seq,
                result,
            });
        });
    }

    fn apply_outcome(&mut self, outcome: ClassifyOutcome) {
        let Some(entry) = self.registry.get(outcome.surface) else {
            trace!(surface = outcome.surface, "outcome for unknown surface discarded");
            return;
        };
        if outcome.seq != entry.current_seq() {
            // Superseded by a later request; expected, not an error
            trace!(
                surface = outcome.surface,
                seq = outcome.seq,
                current = entry.current_seq(),
                "stale response discarded"
            );
            return;
        }
        if entry.surface().is_none() {
            trace!(surface = outcome.surface, "surface removed; outcome discarded");
            self.registry.prune();
            return;
        }

        match outcome.result {
            Ok(classification) if classification.score > self.threshold => {
                self.banner.show(classification.score);
            }
            Ok(classification) => {
                debug!(score = classification.score, "draft below threshold");
                self.banner.hide();
            }
            Err(e) => {
                warn!(error = %e, "classification failed");
                self.banner.hide();
            }
        }
    }
}
