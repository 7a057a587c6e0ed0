//! Job-kind dispatch: picks the extractor for a request and invokes the
//! matching operation.

use std::sync::Arc;

use crate::error::{ExtractorError, Result};
use crate::registry::ServiceRegistry;
use crate::segments::SegmentExtractor;
use crate::traits::StepInput;
use crate::types::{ExtractResult, InfoItem, JobKind, JobRequest, JobStepResult, PagedData, State};

/// Dispatches a job to the correct handler.
///
/// Holds only a shared, read-only view of the registry; every call is an
/// independent computation.
pub struct Router {
    registry: Arc<ServiceRegistry>,
}

impl Router {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this router consults.
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Invoke the operation matching the request's job kind.
    ///
    /// URL-routed kinds go through the registry's URL matcher;
    /// `RefreshCredentials` resolves by service id; kinds that need no
    /// extractor synthesize a trivial completion.
    pub fn dispatch(
        &self,
        request: &JobRequest,
        session_id: &str,
        state: Option<&State>,
    ) -> Result<JobStepResult> {
        let input = StepInput {
            session_id,
            state,
            results: request.results.as_deref(),
            cookie: request.cookie.as_deref(),
        };
        tracing::debug!(kind = request.kind.as_str(), session_id, "dispatching job");

        match request.kind {
            JobKind::FetchInfo => {
                let url = self.target_url(request)?;
                self.registry.select(url)?.fetch_info(&input)
            }
            JobKind::FetchFirstPage => {
                let url = self.target_url(request)?;
                self.registry.select(url)?.fetch_first_page(&input)
            }
            JobKind::FetchGivenPage => {
                let url = self.target_url(request)?;
                self.registry.select(url)?.fetch_given_page(url, &input)
            }
            JobKind::GetSuggestion => {
                Ok(JobStepResult::complete_with(ExtractResult::empty()))
            }
            JobKind::RefreshCredentials => {
                let id = self.target_service_id(request)?;
                let service = self.registry.select_by_id(id)?;
                let refresher = service.credential_extractor().ok_or_else(|| {
                    ExtractorError::MissingSubExtractor {
                        id: id.to_string(),
                        what: "credential",
                    }
                })?;
                refresher.refresh(&input)
            }
            JobKind::ListSupportedServices => {
                let items = self
                    .registry
                    .service_infos()
                    .into_iter()
                    .map(InfoItem::Service)
                    .collect();
                Ok(JobStepResult::complete_with(
                    ExtractResult::empty().with_paged(PagedData::new(items, None)),
                ))
            }
            JobKind::FetchSegmentList => self.segment_extractor(request)?.fetch(&input),
            JobKind::SubmitSegment => self.segment_extractor(request)?.submit(&input),
            JobKind::VoteSegment => self.segment_extractor(request)?.vote(&input),
        }
    }

    /// Build the segment extractor for a request, applying the owning
    /// service's segment API settings when the target URL belongs to a
    /// registered service that exposes them. URLs no service claims fall
    /// back to the origin-derived default.
    fn segment_extractor(&self, request: &JobRequest) -> Result<SegmentExtractor> {
        let url = self.target_url(request)?;
        let mut extractor = SegmentExtractor::new(url);
        if let Some(settings) = self
            .registry
            .owner_of(url)
            .and_then(|service| service.segment_api())
        {
            extractor = extractor.with_settings(settings);
        }
        Ok(extractor)
    }

    fn target_url<'a>(&self, request: &'a JobRequest) -> Result<&'a str> {
        request
            .url
            .as_deref()
            .ok_or_else(|| ExtractorError::MissingUrl {
                kind: request.kind.as_str().to_string(),
            })
    }

    fn target_service_id<'a>(&self, request: &'a JobRequest) -> Result<&'a str> {
        request
            .service_id
            .as_deref()
            .ok_or_else(|| ExtractorError::MissingServiceId {
                kind: request.kind.as_str().to_string(),
            })
    }
}
