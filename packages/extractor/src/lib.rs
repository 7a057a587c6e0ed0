//! Resumable, Stateless Extraction Job Protocol
//!
//! Extracts structured metadata (channels, streams, search results, paged
//! feeds) from third-party content platforms without performing any network
//! I/O itself: the HTTP fetches are executed by a separate, untrusted
//! client, while this crate supplies the request plan, interprets the
//! results and decides what to fetch next.
//!
//! # Design Philosophy
//!
//! **"The server never remembers"**
//!
//! - Every call carries an opaque continuation state; there is no in-memory
//!   session store, so any server instance can answer any call
//! - Suspension is "return `Continue` and wait for the next call", never an
//!   in-process blocking primitive
//! - Per-item parse failures are collected, not fatal
//! - The library handles the protocol mechanics; services handle the
//!   per-site semantics
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use extractor::{JobKind, JobRequest, JobStatus, Orchestrator, ServiceRegistry};
//!
//! let mut registry = ServiceRegistry::new();
//! registry.register(Arc::new(MyService));
//! let orchestrator = Orchestrator::new(Arc::new(registry));
//!
//! // First round trip: the response asks the client to fetch.
//! let response = orchestrator.execute(&JobRequest::new(
//!     JobKind::FetchInfo,
//!     "https://site/user/42",
//! ));
//! assert_eq!(response.status, JobStatus::Continue);
//!
//! // The client executes response.tasks, then calls back with the same
//! // session id, the returned state, and the task results.
//! ```
//!
//! # Modules
//!
//! - [`types`] - Wire types: requests, tasks, results, states, info objects
//! - [`traits`] - The extractor and service seams
//! - [`collector`] - Partial-failure-tolerant batch collection
//! - [`registry`] - The ordered service table
//! - [`router`] - Job-kind dispatch
//! - [`session`] - The stateless orchestrator entry point
//! - [`segments`] - Segment-annotation sub-protocol
//! - [`urls`] - Locator and pagination helpers
//! - [`testing`] - Mock service for protocol-level tests

pub mod collector;
pub mod error;
pub mod registry;
pub mod router;
pub mod segments;
pub mod session;
pub mod testing;
pub mod traits;
pub mod types;
pub mod urls;

// Re-export core types at crate root
pub use error::{classify, codes, ExtractorError, Result, PARSE_EXHAUSTION_SIGNATURE};
pub use types::{
    ChannelInfo, ChannelTabInfo, ChannelTabType, ClientTask, ErrorDetail, ExtractResult, InfoItem,
    JobKind, JobRequest, JobResponse, JobStatus, JobStepResult, PagedData, RequestDescriptor,
    RequestMethod, SegmentInfo, ServiceInfo, State, StreamInfo, TaskResult, DEFAULT_TASK_ID,
};

pub use collector::{ItemCollector, DEFAULT_MAX_FAILED_COMMITS};
pub use registry::ServiceRegistry;
pub use router::Router;
pub use segments::{SegmentApiSettings, SegmentExtractor};
pub use session::Orchestrator;
pub use traits::{CredentialRefresher, Extractor, Service, StepInput};
