//! Data model of the job protocol.
//!
//! - [`job`] — wire types: requests, client tasks, task results, responses
//! - [`state`] — the opaque continuation checkpoint
//! - [`result`] — step outcomes, paged data and error details
//! - [`info`] — typed domain info objects

pub mod info;
pub mod job;
pub mod result;
pub mod state;

pub use info::{
    ChannelInfo, ChannelTabInfo, ChannelTabType, InfoItem, SegmentInfo, ServiceInfo, StreamInfo,
};
pub use job::{
    ClientTask, JobKind, JobRequest, JobResponse, JobStatus, RequestDescriptor, RequestMethod,
    TaskResult, DEFAULT_TASK_ID,
};
pub use result::{ErrorDetail, ExtractResult, JobStepResult, PagedData};
pub use state::State;
