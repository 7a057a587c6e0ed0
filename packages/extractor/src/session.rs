//! The top-level entry point: session identity, input validation,
//! dispatch, and exception-to-error-code translation.
//!
//! [`Orchestrator::execute`] never fails at the signature level — every
//! failure is caught at this boundary, classified into a stable code and
//! returned as a FAILED response. The orchestrator keeps no memory between
//! calls: each invocation is a pure function of (request, continuation
//! state, task results).

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{classify, codes};
use crate::registry::ServiceRegistry;
use crate::router::Router;
use crate::types::{
    ErrorDetail, ExtractResult, JobRequest, JobResponse, JobStatus, JobStepResult, State,
};

/// Stateless session orchestrator.
pub struct Orchestrator {
    router: Router,
}

impl Orchestrator {
    /// An orchestrator over the given registry.
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self {
            router: Router::new(registry),
        }
    }

    /// The router this orchestrator dispatches through.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Run one round trip of a job.
    pub fn execute(&self, request: &JobRequest) -> JobResponse {
        // A continuation call must supply what it is continuing with. Checked
        // before any handler logic runs.
        if let Some(session_id) = &request.session_id {
            if request.results.is_none() {
                return failed(
                    session_id.clone(),
                    ErrorDetail::new(codes::EMPTY_CLIENT_RESULT, "Empty client result received"),
                );
            }
        }

        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        match self.try_execute(request, &session_id) {
            Ok(response) => response,
            Err(err) => {
                let diagnostic = err.to_string();
                let code = classify(&diagnostic);
                tracing::warn!(code, error = %diagnostic, session_id = %session_id, "job failed");
                failed(session_id, ErrorDetail::new(code, diagnostic))
            }
        }
    }

    fn try_execute(
        &self,
        request: &JobRequest,
        session_id: &str,
    ) -> crate::error::Result<JobResponse> {
        // New sessions may prime the first call with initial state;
        // continuation calls must carry the state they were handed.
        let state: Option<&State> = if request.session_id.is_some() {
            Some(request.state.as_ref().ok_or_else(|| {
                crate::error::ExtractorError::MissingState {
                    session_id: session_id.to_string(),
                }
            })?)
        } else {
            request.state.as_ref()
        };

        let response = match self.router.dispatch(request, session_id, state)? {
            JobStepResult::Continue { tasks, state } => JobResponse {
                session_id: session_id.to_string(),
                status: JobStatus::Continue,
                tasks: Some(tasks),
                result: None,
                // The caller must cache this and send it back verbatim.
                state: Some(state),
            },
            JobStepResult::Complete { result, state } => {
                for error in &result.errors {
                    tracing::warn!(code = %error.code, detail = %error.detail, "collected item error");
                }
                JobResponse {
                    session_id: session_id.to_string(),
                    status: JobStatus::Complete,
                    tasks: None,
                    result: Some(result),
                    state,
                }
            }
            JobStepResult::Fail { error } => failed(session_id.to_string(), error),
        };
        Ok(response)
    }
}

fn failed(session_id: String, error: ErrorDetail) -> JobResponse {
    JobResponse {
        session_id,
        status: JobStatus::Failed,
        tasks: None,
        result: Some(ExtractResult::fatal(error)),
        state: None,
    }
}
