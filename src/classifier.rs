//! Classification of draft text through the relay.

use crate::relay::{PredictRequest, Relay};
use crate::types::{Classification, ClassifyError};
use std::sync::Arc;
use tracing::trace;

/// Asynchronous client for the external classifier. All transport and
/// protocol failures surface as [`ClassifyError`]; nothing panics and
/// nothing retries - the next debounced edit is the retry.
pub struct ClassificationClient {
    relay: Arc<dyn Relay>,
}

impl ClassificationClient {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        Self { relay }
    }

    pub async fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        let reply = self.relay.predict(PredictRequest::new(text)).await;

        if !reply.ok {
            return Err(ClassifyError::Relay(
                reply.error.unwrap_or_else(|| "no error detail".to_string()),
            ));
        }

        let data = reply.data.ok_or(ClassifyError::MalformedResponse)?;
        let score = data
            .get("intent_score")
            .and_then(|v| v.as_f64())
            .ok_or(ClassifyError::MalformedResponse)?;

        trace!(score, "classification succeeded");
        Ok(Classification { score })
    }
}
