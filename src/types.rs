//! Core types for classification outcomes and their errors.

use crate::page::NodeId;

/// A successful classification of a draft
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Raw intent score as returned by the classifier
    pub score: f64,
}

/// Failures absorbed at the classification boundary. None of these
/// propagate further than "hide the banner".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// The relay was unreachable or reported a failure
    #[error("relay error: {0}")]
    Relay(String),

    /// The response carried no numeric `intent_score`
    #[error("classifier response missing a numeric intent_score")]
    MalformedResponse,
}

/// A completed classification request, tagged with the surface it was
/// submitted for and its sequence number at submit time.
#[derive(Debug, Clone)]
pub struct ClassifyOutcome {
    pub surface: NodeId,
    pub seq: u64,
    pub result: Result<Classification, ClassifyError>,
}
