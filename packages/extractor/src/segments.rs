//! Segment-annotation sub-protocol: fetch, submit and vote on third-party
//! crowd-sourced segment annotations for a video.
//!
//! Lookups use the privacy-preserving hash-prefix scheme: the request
//! addresses the first four hex characters of the video id's SHA-256, the
//! response over-returns every video sharing that prefix, and the exact
//! video id filters the result locally.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::collector::ItemCollector;
use crate::error::{ExtractorError, Result};
use crate::traits::StepInput;
use crate::types::{
    ClientTask, ExtractResult, InfoItem, JobStepResult, RequestDescriptor, SegmentInfo, State,
};
use crate::urls::{query_value, replace_query_value};

const USER_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const USER_ID_LEN: usize = 32;

/// Settings for a segment-annotation API endpoint: the base URL plus which
/// segment categories to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentApiSettings {
    /// API base URL, without a trailing slash
    pub api_url: String,

    pub include_sponsor: bool,
    pub include_intro: bool,
    pub include_outro: bool,
    pub include_interaction: bool,
    pub include_highlight: bool,
    pub include_self_promo: bool,
    pub include_music_offtopic: bool,
    pub include_preview: bool,
    pub include_filler: bool,
}

impl SegmentApiSettings {
    /// Settings for the given API base URL with every category enabled.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            include_sponsor: true,
            include_intro: true,
            include_outro: true,
            include_interaction: true,
            include_highlight: true,
            include_self_promo: true,
            include_music_offtopic: true,
            include_preview: true,
            include_filler: true,
        }
    }

    /// Disable every category (then re-enable selectively).
    pub fn without_categories(mut self) -> Self {
        self.include_sponsor = false;
        self.include_intro = false;
        self.include_outro = false;
        self.include_interaction = false;
        self.include_highlight = false;
        self.include_self_promo = false;
        self.include_music_offtopic = false;
        self.include_preview = false;
        self.include_filler = false;
        self
    }

    /// Enable the sponsor category.
    pub fn with_sponsor(mut self) -> Self {
        self.include_sponsor = true;
        self
    }

    /// API names of the enabled categories, in a fixed order.
    pub fn category_params(&self) -> Vec<&'static str> {
        let flags = [
            (self.include_sponsor, "sponsor"),
            (self.include_intro, "intro"),
            (self.include_outro, "outro"),
            (self.include_interaction, "interaction"),
            (self.include_highlight, "poi_highlight"),
            (self.include_self_promo, "selfpromo"),
            (self.include_music_offtopic, "music_offtopic"),
            (self.include_preview, "preview"),
            (self.include_filler, "filler"),
        ];
        flags
            .into_iter()
            .filter_map(|(enabled, name)| enabled.then_some(name))
            .collect()
    }
}

/// Mint a random local user id for anonymous submissions.
pub fn random_user_id() -> String {
    let mut rng = rand::thread_rng();
    (0..USER_ID_LEN)
        .map(|_| USER_ID_ALPHABET[rng.gen_range(0..USER_ID_ALPHABET.len())] as char)
        .collect()
}

/// First four hex characters of the video id's SHA-256.
fn video_id_hash_prefix(video_id: &str) -> String {
    let digest = Sha256::digest(video_id.as_bytes());
    hex::encode(digest)[..4].to_string()
}

/// The segment-annotation extractor.
///
/// Constructed directly from the target URL: the URL's query carries the
/// parameters of the requested operation (`videoID` for lookups; the full
/// prepared API call for votes and submissions).
pub struct SegmentExtractor {
    url: String,
    settings: SegmentApiSettings,
}

impl SegmentExtractor {
    /// An extractor for the given target URL, deriving the API base from the
    /// URL's origin.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let api_url = url
            .split_once("://")
            .map(|(scheme, rest)| {
                let host = rest.split(['/', '?']).next().unwrap_or(rest);
                format!("{scheme}://{host}/api")
            })
            .unwrap_or_else(|| url.clone());
        Self {
            url,
            settings: SegmentApiSettings::new(api_url),
        }
    }

    /// Override the API settings.
    pub fn with_settings(mut self, settings: SegmentApiSettings) -> Self {
        self.settings = settings;
        self
    }

    fn video_id(&self) -> Result<String> {
        query_value(&self.url, "videoID")
            .ok_or_else(|| ExtractorError::Parse(format!("no videoID in {}", self.url)))
    }

    /// Fetch the segment list for the video named by the target URL.
    pub fn fetch(&self, input: &StepInput<'_>) -> Result<JobStepResult> {
        match input.step() {
            None => {
                let video_id = self.video_id()?;
                let categories = serde_json::to_string(&self.settings.category_params())?;
                let categories: String =
                    url::form_urlencoded::byte_serialize(categories.as_bytes()).collect();
                let actions: String =
                    url::form_urlencoded::byte_serialize(br#"["skip","poi"]"#).collect();
                let lookup = format!(
                    "{}/skipSegments/{}?categories={}&actionTypes={}",
                    self.settings.api_url,
                    video_id_hash_prefix(&video_id),
                    categories,
                    actions,
                );
                Ok(JobStepResult::continue_with(
                    vec![ClientTask::single(RequestDescriptor::get(lookup))],
                    State::plain(1),
                ))
            }
            Some(1) => {
                let video_id = self.video_id()?;
                let payload = input.require_default_result()?;
                let entries: Vec<serde_json::Value> = serde_json::from_str(payload)?;

                let mut collector = ItemCollector::new();
                for entry in &entries {
                    // Hash-prefix lookups over-return; keep exact matches only.
                    if entry.get("videoID").and_then(|v| v.as_str()) != Some(video_id.as_str()) {
                        continue;
                    }
                    for segment in entry
                        .get("segments")
                        .and_then(|s| s.as_array())
                        .map(Vec::as_slice)
                        .unwrap_or_default()
                    {
                        collector.commit(|| parse_segment(segment, &video_id))?;
                    }
                }

                let (paged, errors) = collector.into_paged(None);
                Ok(JobStepResult::complete_with(
                    ExtractResult::empty().with_paged(paged).with_errors(errors),
                ))
            }
            Some(_) => Err(input.unexpected_state()),
        }
    }

    /// Vote on an existing segment; the target URL is the prepared API call.
    pub fn vote(&self, input: &StepInput<'_>) -> Result<JobStepResult> {
        self.post_and_complete(input)
    }

    /// Submit a new segment; the target URL is the prepared API call.
    pub fn submit(&self, input: &StepInput<'_>) -> Result<JobStepResult> {
        self.post_and_complete(input)
    }

    /// Shared two-step shape of vote and submit: POST once, then complete
    /// empty without inspecting the response body.
    fn post_and_complete(&self, input: &StepInput<'_>) -> Result<JobStepResult> {
        match input.step() {
            None => {
                let target = if query_value(&self.url, "userID").is_some() {
                    self.url.clone()
                } else {
                    replace_query_value(&self.url, "userID", &random_user_id())?
                };
                Ok(JobStepResult::continue_with(
                    vec![ClientTask::single(RequestDescriptor::post(target, ""))],
                    State::plain(1),
                ))
            }
            Some(1) => Ok(JobStepResult::complete_with(ExtractResult::empty())),
            Some(_) => Err(input.unexpected_state()),
        }
    }
}

/// Parse one raw segment entry into a [`SegmentInfo`] item.
fn parse_segment(value: &serde_json::Value, video_id: &str) -> Result<InfoItem> {
    let bounds = value
        .get("segment")
        .and_then(|s| s.as_array())
        .filter(|s| s.len() == 2)
        .ok_or_else(|| ExtractorError::Parse("segment bounds missing".into()))?;

    let field = |key: &str| -> Result<String> {
        value
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ExtractorError::Parse(format!("segment field '{key}' missing")))
    };

    Ok(InfoItem::Segment(SegmentInfo {
        uuid: field("UUID")?,
        video_id: video_id.to_string(),
        category: field("category")?,
        action: field("actionType")?,
        start_secs: bounds[0].as_f64().unwrap_or(0.0),
        end_secs: bounds[1].as_f64().unwrap_or(0.0),
        votes: value.get("votes").and_then(|v| v.as_i64()).unwrap_or(0),
    }))
}
