//! Intent Guard - interactive entry point
//!
//! Runs the monitoring core over a demo page holding one composer and
//! feeds it from stdin, so the full pipeline (debounce, relay, banner) can
//! be exercised against a live classifier:
//!
//! - each line typed becomes the composer's current draft
//! - `:blur` makes the composer lose focus
//! - `:quit` unloads the page and exits

use intent_guard::{GuardConfig, HttpRelay, IntentGuard, PageTree};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GuardConfig::load();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.general.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Intent Guard");
    info!(
        threshold = config.detection.threshold,
        debounce_ms = config.detection.debounce_ms,
        endpoint = %config.relay.endpoint,
        "Configuration loaded"
    );

    let (tree, events) = PageTree::new();
    let composer = tree.create_element("div");
    composer.set_attr("role", "textbox");
    composer.set_attr("contenteditable", "true");
    let root = Arc::clone(tree.root());
    tree.append_child(&root, &composer);

    let relay = Arc::new(HttpRelay::new(config.relay.endpoint.clone()));
    let guard = IntentGuard::new(&config, tree.clone(), relay);
    let guard_handle = tokio::spawn(guard.run(events));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match line.trim() {
            ":quit" => break,
            ":blur" => tree.blur(&composer),
            draft => tree.edit_text(&composer, draft),
        }
    }

    tree.unload();
    let _ = guard_handle.await;

    Ok(())
}
