//! The per-resource extractor contract.
//!
//! One concrete extractor exists per (service, resource kind) and
//! encapsulates the multi-round-trip dance needed to obtain one unit of
//! information. Operations are plain synchronous functions: "waiting for the
//! client" is modeled by returning [`JobStepResult::Continue`] and resuming
//! on the next, independent invocation — never by blocking in-process.

use crate::error::{ExtractorError, Result};
use crate::types::{JobStepResult, State, TaskResult};

/// Everything one step invocation receives.
///
/// `state` is either absent ("this is step 0") or the exact value the same
/// operation returned on the previous round; `results` answer the tasks that
/// round issued.
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    pub session_id: &'a str,
    pub state: Option<&'a State>,
    pub results: Option<&'a [TaskResult]>,
    pub cookie: Option<&'a str>,
}

impl<'a> StepInput<'a> {
    /// Input for the first call of a step sequence.
    pub fn initial(session_id: &'a str) -> Self {
        Self {
            session_id,
            state: None,
            results: None,
            cookie: None,
        }
    }

    /// The current step tag, if any state is present.
    pub fn step(&self) -> Option<u32> {
        self.state.map(State::step)
    }

    /// The payload of the named task's result.
    ///
    /// Fails when the client never returned the task or returned it without
    /// a payload (client-side fetch failure).
    pub fn require_result(&self, task_id: &str) -> Result<&'a str> {
        self.results
            .and_then(|results| results.iter().find(|r| r.task_id == task_id))
            .and_then(|r| r.payload.as_deref())
            .ok_or_else(|| ExtractorError::MissingTaskResult {
                task_id: task_id.to_string(),
            })
    }

    /// The payload of the default task's result.
    pub fn require_default_result(&self) -> Result<&'a str> {
        self.require_result(crate::types::DEFAULT_TASK_ID)
    }

    /// Signal that this operation received a state it does not recognize.
    ///
    /// An out-of-range step tag is a defect, never something to guess
    /// around.
    pub fn unexpected_state(&self) -> ExtractorError {
        ExtractorError::UnexpectedState {
            step: self.step().unwrap_or(u32::MAX),
        }
    }
}

/// The polymorphic per-resource state machine.
///
/// A concrete extractor implements whichever capabilities are meaningful for
/// its resource kind; the defaults make an unimplemented capability a
/// programming error surfaced as
/// [`ExtractorError::UnsupportedOperation`].
pub trait Extractor: Send + Sync {
    /// The URL this extractor was routed for.
    fn url(&self) -> &str;

    /// Fetch the primary info object (and, typically, its first batch of
    /// child items).
    fn fetch_info(&self, _input: &StepInput<'_>) -> Result<JobStepResult> {
        Err(ExtractorError::UnsupportedOperation {
            operation: "fetch_info",
        })
    }

    /// Fetch the first page of a listing resource.
    fn fetch_first_page(&self, _input: &StepInput<'_>) -> Result<JobStepResult> {
        Err(ExtractorError::UnsupportedOperation {
            operation: "fetch_first_page",
        })
    }

    /// Fetch the page addressed by an opaque locator.
    ///
    /// The locator embeds whatever addressing the site's pagination needs (a
    /// page number, a continuation token); only this extractor decodes it.
    fn fetch_given_page(&self, _page_url: &str, _input: &StepInput<'_>) -> Result<JobStepResult> {
        Err(ExtractorError::UnsupportedOperation {
            operation: "fetch_given_page",
        })
    }
}
