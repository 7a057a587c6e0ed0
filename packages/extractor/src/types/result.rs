//! Step outcomes: what a single extractor invocation hands back to the
//! orchestrator, and the paged/error payloads it carries.

use serde::{Deserialize, Serialize};

use super::info::InfoItem;
use super::job::ClientTask;
use super::state::State;
use crate::error::ExtractorError;

/// Stable machine-readable code plus non-contractual diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Caller-facing contract; see [`crate::error::codes`]
    pub code: String,

    /// Human-readable diagnostic (message, context), not part of the contract
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }

    /// Wrap an error's Display text under the given code.
    pub fn from_error(code: &str, err: &ExtractorError) -> Self {
        Self::new(code, err.to_string())
    }
}

/// Ordered items collected in one step plus the locator of the next page.
///
/// `next_page = None` terminates pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedData {
    pub items: Vec<InfoItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}

impl PagedData {
    pub fn new(items: Vec<InfoItem>, next_page: Option<String>) -> Self {
        Self { items, next_page }
    }

    /// Whether this page ends pagination.
    pub fn is_last_page(&self) -> bool {
        self.next_page.is_none()
    }
}

/// Everything one completed (or failed) job step extracted.
///
/// `fatal` is mutually exclusive with success data: a result either carries
/// info/paged data plus any non-fatal per-item errors, or a fatal error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResult {
    /// Primary info object; absent for pure listing operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoItem>,

    /// Items collected this step plus the next-page locator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paged: Option<PagedData>,

    /// Non-fatal per-item errors collected during this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,

    /// Fatal error; set only on FAILED responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal: Option<ErrorDetail>,
}

impl ExtractResult {
    /// An empty result (trivial completions).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A result wrapping a fatal error.
    pub fn fatal(error: ErrorDetail) -> Self {
        Self {
            fatal: Some(error),
            ..Self::default()
        }
    }

    /// Set the primary info object.
    pub fn with_info(mut self, info: InfoItem) -> Self {
        self.info = Some(info);
        self
    }

    /// Set the paged data.
    pub fn with_paged(mut self, paged: PagedData) -> Self {
        self.paged = Some(paged);
        self
    }

    /// Attach collected per-item errors.
    pub fn with_errors(mut self, errors: Vec<ErrorDetail>) -> Self {
        self.errors = errors;
        self
    }
}

/// Outcome of one extractor invocation.
///
/// Not serialized: this is the internal contract between extractors and the
/// orchestrator, which translates it into a [`crate::types::JobResponse`].
#[derive(Debug, Clone, PartialEq)]
pub enum JobStepResult {
    /// More round trips remain: the client must execute `tasks` and call
    /// back with `state` plus the task results.
    Continue {
        tasks: Vec<ClientTask>,
        state: State,
    },

    /// The job finished. `state` carries residual state when the handler
    /// wants the caller to keep something (usually `None`).
    Complete {
        result: ExtractResult,
        state: Option<State>,
    },

    /// A recognized, unrecoverable domain condition.
    Fail { error: ErrorDetail },
}

impl JobStepResult {
    /// Continue with the given tasks at the given state.
    pub fn continue_with(tasks: Vec<ClientTask>, state: State) -> Self {
        JobStepResult::Continue { tasks, state }
    }

    /// Complete with the given result and no residual state.
    pub fn complete_with(result: ExtractResult) -> Self {
        JobStepResult::Complete {
            result,
            state: None,
        }
    }

    /// Fail with the given error detail.
    pub fn fail_with(error: ErrorDetail) -> Self {
        JobStepResult::Fail { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;
    use crate::types::info::StreamInfo;

    #[test]
    fn test_paged_data_termination() {
        let last = PagedData::new(Vec::new(), None);
        assert!(last.is_last_page());

        let more = PagedData::new(Vec::new(), Some("https://site/feed?page=2".into()));
        assert!(!more.is_last_page());
    }

    #[test]
    fn test_fatal_result_carries_no_success_data() {
        let result = ExtractResult::fatal(ErrorDetail::new(codes::UNKNOWN, "boom"));
        assert!(result.info.is_none());
        assert!(result.paged.is_none());
        assert!(result.fatal.is_some());
    }

    #[test]
    fn test_extract_result_serde_skips_empty_fields() {
        let result = ExtractResult::empty()
            .with_info(InfoItem::Stream(StreamInfo::new("u", "t", "MOCKTUBE")));
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("errors").is_none());
        assert!(json.get("fatal").is_none());
        assert!(json.get("info").is_some());
    }
}
