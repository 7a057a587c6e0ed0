//! Typed errors for the extraction protocol.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Two tiers exist (see [`crate::collector`] for the first):
//!
//! 1. **Per-item** errors: produced while parsing one entry out of a batch,
//!    collected as [`crate::types::ErrorDetail`] values, never fatal.
//! 2. **Call-level** errors: any `ExtractorError` that escapes a dispatch is
//!    caught at the orchestrator boundary and classified into a stable,
//!    caller-facing code via [`classify`].

use thiserror::Error;

/// Errors that can occur while driving an extraction job.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// No registered service matches the target URL
    #[error("unsupported URL: {url}")]
    UnsupportedUrl { url: String },

    /// No registered service carries this identifier
    #[error("unknown service id: {id}")]
    UnknownService { id: String },

    /// A URL-routed job kind arrived without a target URL
    #[error("job kind {kind} requires a target URL")]
    MissingUrl { kind: String },

    /// A service-routed job kind arrived without a service id
    #[error("job kind {kind} requires a service id")]
    MissingServiceId { kind: String },

    /// A continuation call named a session but carried no state
    #[error("session {session_id} provided but no state in request")]
    MissingState { session_id: String },

    /// A step expected a task result that the client did not return
    #[error("no usable result for task '{task_id}'")]
    MissingTaskResult { task_id: String },

    /// An operation received a state value it does not recognize.
    ///
    /// Always a defect in the caller or the extractor, never a data error.
    #[error("unexpected continuation state at step {step}")]
    UnexpectedState { step: u32 },

    /// A capability was invoked on an extractor that does not implement it.
    ///
    /// Programming error: the router asked a resource kind for an operation
    /// it never supports.
    #[error("operation '{operation}' is not supported by this extractor")]
    UnsupportedOperation { operation: &'static str },

    /// A payload could not be parsed into the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// The batch collector gave up after its failure ceiling.
    ///
    /// The Display text carries the literal classification signature; see
    /// [`PARSE_EXHAUSTION_SIGNATURE`].
    #[error("Too many failed commits ({failed} of {attempted})")]
    TooManyFailedCommits { failed: u32, attempted: u32 },

    /// The service does not expose the requested sub-extractor
    #[error("service {id} has no {what} extractor")]
    MissingSubExtractor { id: String, what: &'static str },

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Stable, caller-facing error codes.
///
/// Codes are the contract; the diagnostic text attached to them is not.
pub mod codes {
    /// A continuation call (session id present) arrived without the results
    /// of the previously issued client tasks.
    pub const EMPTY_CLIENT_RESULT: &str = "NET_002";

    /// The batch collector exhausted its failure ceiling while parsing.
    pub const PARSE_EXHAUSTED: &str = "PARSE_002";

    /// A single item in a batch failed to parse (non-fatal, per-item).
    pub const ITEM_PARSE_FAILED: &str = "PARSE_001";

    /// Catch-all for any other failure caught at the dispatch boundary.
    pub const UNKNOWN: &str = "UNKNOWN_001";
}

/// Literal substring that marks a parse-exhaustion failure.
pub const PARSE_EXHAUSTION_SIGNATURE: &str = "Too many failed commits";

/// Ordered classification rules applied to the diagnostic text of a failure
/// caught at the dispatch boundary.
///
/// First matching signature wins; anything that matches nothing maps to
/// [`codes::UNKNOWN`]. Kept as a finite table so the mapping stays testable.
const CLASSIFICATION_RULES: &[(&str, &str)] =
    &[(PARSE_EXHAUSTION_SIGNATURE, codes::PARSE_EXHAUSTED)];

/// Classify an uncaught failure into a stable error code.
///
/// [`codes::EMPTY_CLIENT_RESULT`] is never produced here: it is reserved for
/// the missing-results precondition checked before dispatch.
pub fn classify(diagnostic: &str) -> &'static str {
    CLASSIFICATION_RULES
        .iter()
        .find(|(signature, _)| diagnostic.contains(signature))
        .map(|(_, code)| *code)
        .unwrap_or(codes::UNKNOWN)
}
