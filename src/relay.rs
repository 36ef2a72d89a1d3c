//! Privileged relay that performs network calls on behalf of the core.
//!
//! The monitoring core never touches the network directly; it hands a
//! `PREDICT` message to a [`Relay`] and receives a reply that is either
//! `{ok: true, data}` or `{ok: false, error}`. The production relay
//! forwards the draft to the classifier service over HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default classifier endpoint the relay posts to
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";

/// Message from the core to the relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub text: String,
}

impl PredictRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            msg_type: "PREDICT".to_string(),
            text: text.into(),
        }
    }
}

/// Reply from the relay. Failures travel as `ok: false` with a reason;
/// the relay never raises to its caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayReply {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// The proxy collaborator that owns the network call
#[async_trait]
pub trait Relay: Send + Sync {
    async fn predict(&self, request: PredictRequest) -> RelayReply;
}

/// Body posted to the classifier service
#[derive(Serialize)]
struct ClassifierRequest<'a> {
    text: &'a str,
}

/// HTTP pass-through to the classifier service.
///
/// Non-2xx statuses become `{ok: false, error: "HTTP <status>"}`;
/// transport and body-decode failures carry the underlying error string.
pub struct HttpRelay {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn predict(&self, request: PredictRequest) -> RelayReply {
        let response = match self
            .client
            .post(&self.endpoint)
            .json(&ClassifierRequest {
                text: &request.text,
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "relay transport failure");
                return RelayReply::failure(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            return RelayReply::failure(format!("HTTP {}", status.as_u16()));
        }

        match response.json::<serde_json::Value>().await {
            Ok(data) => RelayReply::success(data),
            Err(e) => RelayReply::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn predict_request_wire_shape() {
        let request = PredictRequest::new("draft text");
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire, json!({"type": "PREDICT", "text": "draft text"}));
    }

    #[test]
    fn reply_parses_success() {
        let reply: RelayReply =
            serde_json::from_str(r#"{"ok": true, "data": {"intent_score": 92.0}}"#).unwrap();
        assert!(reply.ok);
        assert_eq!(reply.data.unwrap()["intent_score"], json!(92.0));
        assert!(reply.error.is_none());
    }

    #[test]
    fn reply_parses_failure() {
        let reply: RelayReply =
            serde_json::from_str(r#"{"ok": false, "error": "HTTP 500"}"#).unwrap();
        assert!(!reply.ok);
        assert!(reply.data.is_none());
        assert_eq!(reply.error.as_deref(), Some("HTTP 500"));
    }
}
