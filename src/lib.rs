//! Intent Guard - Draft-text monitoring core
//!
//! This crate watches a live element tree for text-composition surfaces
//! (reply boxes, DM composers), debounces edits per surface, classifies the
//! draft through a privileged relay, and drives a single warning banner:
//!
//! - **Surface discovery**: structural role/attribute patterns matched over
//!   the tree, continuously re-run as subtrees are inserted
//! - **Debounced analysis**: one classification per quiet period per surface
//! - **Race resolution**: per-surface sequence numbers discard late responses
//!   ("last request wins", not "last response wins")
//! - **Banner**: one overlay node, shown only for the current winner
//!
//! # Architecture
//!
//! The guard runs as a single event-loop task. Tree events (insertions,
//! edits, focus loss) and classification completions arrive over channels
//! and are applied in order; the only suspension point is the relay
//! round-trip, which runs in spawned tasks.

pub mod banner;
pub mod classifier;
pub mod config;
pub mod debounce;
pub mod guard;
pub mod matcher;
pub mod page;
pub mod registry;
pub mod relay;
pub mod text;
pub mod types;
pub mod watcher;

// Re-export commonly used types
pub use banner::{BannerController, BannerState};
pub use classifier::ClassificationClient;
pub use config::GuardConfig;
pub use debounce::Debouncer;
pub use guard::IntentGuard;
pub use matcher::{AttrOp, SurfaceMatcher, SurfacePattern};
pub use page::{node_id, NodeId, NodeRef, PageEvent, PageTree};
pub use registry::AttachmentRegistry;
pub use relay::{HttpRelay, PredictRequest, Relay, RelayReply};
pub use text::read_text;
pub use types::{Classification, ClassifyError, ClassifyOutcome};
pub use watcher::MutationWatcher;
