//! Wire types of the job protocol: requests, client tasks, task results and
//! responses.
//!
//! Every call is a pure function of (request, continuation state, task
//! results); nothing here outlives a single call and nothing is mutated
//! after being returned.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::result::ExtractResult;
use super::state::State;

/// Task id used when an operation issues exactly one client task.
pub const DEFAULT_TASK_ID: &str = "default";

/// The kind of work a job request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    /// Load an info object (channel, stream) plus its first batch of items
    FetchInfo,
    /// Load the first page of a listing resource
    FetchFirstPage,
    /// Load the page addressed by an opaque locator URL
    FetchGivenPage,
    /// Search suggestions (currently a trivial completion)
    GetSuggestion,
    /// Refresh service credentials; routed by service id, not URL
    RefreshCredentials,
    /// List every registered service; needs no extractor
    ListSupportedServices,
    /// Fetch annotated segments for a video
    FetchSegmentList,
    /// Submit a new annotated segment
    SubmitSegment,
    /// Vote on an existing annotated segment
    VoteSegment,
}

impl JobKind {
    /// Name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::FetchInfo => "FETCH_INFO",
            JobKind::FetchFirstPage => "FETCH_FIRST_PAGE",
            JobKind::FetchGivenPage => "FETCH_GIVEN_PAGE",
            JobKind::GetSuggestion => "GET_SUGGESTION",
            JobKind::RefreshCredentials => "REFRESH_CREDENTIALS",
            JobKind::ListSupportedServices => "LIST_SUPPORTED_SERVICES",
            JobKind::FetchSegmentList => "FETCH_SEGMENT_LIST",
            JobKind::SubmitSegment => "SUBMIT_SEGMENT",
            JobKind::VoteSegment => "VOTE_SEGMENT",
        }
    }
}

/// HTTP method of a client task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestMethod {
    Get,
    Post,
}

/// Request descriptor the client executes on the core's behalf.
///
/// Headers keep insertion order; some upstream endpoints are sensitive to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub method: RequestMethod,
    pub url: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// A GET request with no headers or body.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Get,
            url: url.into(),
            headers: IndexMap::new(),
            body: None,
        }
    }

    /// A POST request with the given body.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Post,
            url: url.into(),
            headers: IndexMap::new(),
            body: Some(body.into()),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// One unit of work the core asks the client to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTask {
    /// Identifies this task within one round trip; [`DEFAULT_TASK_ID`] when
    /// the operation issues only one task.
    pub task_id: String,

    /// The request the client should perform
    pub request: RequestDescriptor,
}

impl ClientTask {
    /// A task with an explicit id.
    pub fn new(task_id: impl Into<String>, request: RequestDescriptor) -> Self {
        Self {
            task_id: task_id.into(),
            request,
        }
    }

    /// The sole task of a round trip, using the default id.
    pub fn single(request: RequestDescriptor) -> Self {
        Self::new(DEFAULT_TASK_ID, request)
    }
}

/// The client's answer to one [`ClientTask`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Id of the task this result answers
    pub task_id: String,

    /// Raw fetched payload; `None` when the fetch failed on the client side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl TaskResult {
    pub fn new(task_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            payload: Some(payload.into()),
        }
    }

    /// A result for a task the client failed to execute.
    pub fn failed(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            payload: None,
        }
    }

    /// Whether this result answers the default task.
    pub fn is_default_task(&self) -> bool {
        self.task_id == DEFAULT_TASK_ID
    }
}

/// A single call into the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// What to do
    pub kind: JobKind,

    /// Target URL; required for URL-routed kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Service identifier; required for service-routed kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    /// Absent means "start a new session"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Continuation state from the previous round trip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,

    /// Results of the client tasks issued in the previous round trip.
    /// Must accompany `session_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<TaskResult>>,

    /// Authentication/cookie token passed through to extractors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl JobRequest {
    /// A fresh request for a URL-routed job kind.
    pub fn new(kind: JobKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: Some(url.into()),
            service_id: None,
            session_id: None,
            state: None,
            results: None,
            cookie: None,
        }
    }

    /// A fresh request for a service-routed job kind.
    pub fn for_service(kind: JobKind, service_id: impl Into<String>) -> Self {
        Self {
            kind,
            url: None,
            service_id: Some(service_id.into()),
            session_id: None,
            state: None,
            results: None,
            cookie: None,
        }
    }

    /// Thread a session id (continuation call).
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Thread continuation state.
    pub fn with_state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    /// Attach the previous round's task results.
    pub fn with_results(mut self, results: Vec<TaskResult>) -> Self {
        self.results = Some(results);
        self
    }

    /// Attach a credential token.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }
}

/// Status of a job response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// The caller must execute the attached tasks and call back
    Continue,
    /// The job finished; the result is attached
    Complete,
    /// The job failed fatally; the result wraps the error
    Failed,
}

/// The protocol's answer to one [`JobRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    /// Session this response belongs to (minted on the first call)
    pub session_id: String,

    pub status: JobStatus,

    /// Tasks to execute before the next call (CONTINUE only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<ClientTask>>,

    /// Extraction result (COMPLETE and FAILED)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ExtractResult>,

    /// State the caller must send back verbatim on the next call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
}
