//! Testing utilities including a mock service.
//!
//! Useful for exercising the job protocol without any real per-site parser:
//! the mock speaks a tiny JSON dialect for channel and feed payloads, but
//! walks the exact same step-indexed continuation contract a real service
//! would.

use std::sync::Arc;

use crate::collector::ItemCollector;
use crate::error::{ExtractorError, Result};
use crate::registry::ServiceRegistry;
use crate::segments::SegmentApiSettings;
use crate::traits::{CredentialRefresher, Extractor, Service, StepInput};
use crate::types::{
    ChannelInfo, ChannelTabInfo, ChannelTabType, ClientTask, ExtractResult, InfoItem,
    JobStepResult, RequestDescriptor, ServiceInfo, State, StreamInfo,
};
use crate::urls::increment_query_param;

/// Stable id of the mock service.
pub const MOCK_SERVICE_ID: &str = "MOCKTUBE";

/// URL prefix the mock service claims.
pub const MOCK_BASE_URL: &str = "https://site/";

/// A mock platform service covering channel info, feed pagination and
/// credential refresh.
pub struct MockService;

impl Service for MockService {
    fn info(&self) -> ServiceInfo {
        ServiceInfo::new(MOCK_SERVICE_ID, "MockTube")
    }

    fn route(&self, url: &str) -> Option<Box<dyn Extractor>> {
        url.starts_with(MOCK_BASE_URL)
            .then(|| Box::new(MockChannelExtractor::new(url)) as Box<dyn Extractor>)
    }

    fn credential_extractor(&self) -> Option<Box<dyn CredentialRefresher>> {
        Some(Box::new(MockCredentialRefresher))
    }

    fn segment_api(&self) -> Option<SegmentApiSettings> {
        Some(SegmentApiSettings::new("https://segments.example/api"))
    }
}

/// A registry holding only the mock service.
pub fn mock_registry() -> Arc<ServiceRegistry> {
    Arc::new(ServiceRegistry::new().with_service(Arc::new(MockService)))
}

/// Channel extractor for the mock service.
///
/// `fetch_info` needs one round trip with two parallel tasks (`info` for the
/// user page, `videos` for the first feed page); `fetch_given_page` walks
/// page-numbered feed locators.
pub struct MockChannelExtractor {
    url: String,
}

impl MockChannelExtractor {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn complete_feed_page(
        &self,
        page_url: &str,
        payload: &str,
        info: Option<InfoItem>,
    ) -> Result<JobStepResult> {
        let feed: serde_json::Value = serde_json::from_str(payload)?;
        let items = feed
            .get("items")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ExtractorError::Parse("feed has no items array".into()))?;
        let has_more = feed.get("hasMore").and_then(|v| v.as_bool()).unwrap_or(false);

        let mut collector = ItemCollector::new();
        for raw in items {
            collector.commit(|| parse_feed_item(raw))?;
        }

        let next_page = if has_more && !collector.is_empty() {
            Some(increment_query_param(page_url, "page")?)
        } else {
            None
        };
        let (paged, errors) = collector.into_paged(next_page);

        let mut result = ExtractResult::empty().with_paged(paged).with_errors(errors);
        if let Some(info) = info {
            result = result.with_info(info);
        }
        Ok(JobStepResult::complete_with(result))
    }
}

impl Extractor for MockChannelExtractor {
    fn url(&self) -> &str {
        &self.url
    }

    fn fetch_info(&self, input: &StepInput<'_>) -> Result<JobStepResult> {
        match input.step() {
            None => {
                let first_page = format!("{}/video?page=1", self.url);
                Ok(JobStepResult::continue_with(
                    vec![
                        ClientTask::new("info", RequestDescriptor::get(&self.url)),
                        ClientTask::new("videos", RequestDescriptor::get(first_page)),
                    ],
                    State::plain(1),
                ))
            }
            Some(1) => {
                let info: serde_json::Value = serde_json::from_str(input.require_result("info")?)?;
                let name = require_str(&info, "name")?;
                let id = require_str(&info, "id")?;

                let mut channel = ChannelInfo::new(&self.url, &name, MOCK_SERVICE_ID)
                    .with_tab(ChannelTabInfo::new(
                        format!("tab://site?id={id}&type=videos"),
                        ChannelTabType::Videos,
                    ));
                if let Some(description) = info.get("description").and_then(|v| v.as_str()) {
                    channel = channel.with_description(description);
                }
                if let Some(subscribers) = info.get("subscribers").and_then(|v| v.as_u64()) {
                    channel = channel.with_subscriber_count(subscribers);
                }

                let first_page = format!("{}/video?page=1", self.url);
                self.complete_feed_page(
                    &first_page,
                    input.require_result("videos")?,
                    Some(InfoItem::Channel(channel)),
                )
            }
            Some(_) => Err(input.unexpected_state()),
        }
    }

    fn fetch_first_page(&self, input: &StepInput<'_>) -> Result<JobStepResult> {
        self.fetch_given_page(&self.url, input)
    }

    fn fetch_given_page(&self, page_url: &str, input: &StepInput<'_>) -> Result<JobStepResult> {
        match input.step() {
            None => Ok(JobStepResult::continue_with(
                vec![ClientTask::single(RequestDescriptor::get(page_url))],
                State::plain(1),
            )),
            Some(1) => self.complete_feed_page(page_url, input.require_default_result()?, None),
            Some(_) => Err(input.unexpected_state()),
        }
    }
}

/// Credential refresher for the mock service: one POST round trip.
pub struct MockCredentialRefresher;

impl CredentialRefresher for MockCredentialRefresher {
    fn refresh(&self, input: &StepInput<'_>) -> Result<JobStepResult> {
        match input.step() {
            None => Ok(JobStepResult::continue_with(
                vec![ClientTask::single(RequestDescriptor::post(
                    format!("{MOCK_BASE_URL}login"),
                    "{}",
                ))],
                State::plain(1),
            )),
            Some(1) => {
                input.require_default_result()?;
                Ok(JobStepResult::complete_with(ExtractResult::empty()))
            }
            Some(_) => Err(input.unexpected_state()),
        }
    }
}

fn require_str(value: &serde_json::Value, key: &str) -> Result<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ExtractorError::Parse(format!("field '{key}' missing")))
}

/// Parse one raw feed entry; the per-site parser collaborator of the mock.
fn parse_feed_item(raw: &serde_json::Value) -> Result<InfoItem> {
    let url = require_str(raw, "url")?;
    let title = require_str(raw, "title")?;
    let mut stream = StreamInfo::new(url, title, MOCK_SERVICE_ID);
    if let Some(views) = raw.get("views").and_then(|v| v.as_u64()) {
        stream = stream.with_view_count(views);
    }
    if let Some(uploader) = raw.get("uploader").and_then(|v| v.as_str()) {
        stream = stream.with_uploader(uploader);
    }
    Ok(InfoItem::Stream(stream))
}

/// Canned user-page payload.
pub fn channel_payload(id: &str, name: &str) -> String {
    serde_json::json!({
        "id": id,
        "name": name,
        "description": format!("All videos by {name}"),
        "subscribers": 1200
    })
    .to_string()
}

/// Canned feed payload with `count` well-formed entries.
pub fn feed_payload(count: usize, has_more: bool) -> String {
    feed_payload_with_bad(count, &[], has_more)
}

/// Canned feed payload where the entries at `bad_indices` are malformed
/// (missing their title) and fail per-item parsing.
pub fn feed_payload_with_bad(count: usize, bad_indices: &[usize], has_more: bool) -> String {
    let items: Vec<serde_json::Value> = (0..count)
        .map(|n| {
            if bad_indices.contains(&n) {
                serde_json::json!({ "url": format!("{MOCK_BASE_URL}v/{n}") })
            } else {
                serde_json::json!({
                    "url": format!("{MOCK_BASE_URL}v/{n}"),
                    "title": format!("Video {n}"),
                    "views": (n as u64 + 1) * 100
                })
            }
        })
        .collect();
    serde_json::json!({ "items": items, "hasMore": has_more }).to_string()
}
