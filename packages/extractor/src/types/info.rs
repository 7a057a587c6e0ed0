//! Domain info objects produced by extractor operations.
//!
//! These are the typed results the protocol hands back to the caller once a
//! job completes. The set is closed: per-site parsers (collaborators outside
//! this crate) map raw payloads into one of these shapes.

use serde::{Deserialize, Serialize};

/// A single extracted item.
///
/// Closed union over every item kind the protocol can return; paged feeds
/// mix kinds freely (a search page may interleave channels and streams).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InfoItem {
    Channel(ChannelInfo),
    Stream(StreamInfo),
    ChannelTab(ChannelTabInfo),
    Service(ServiceInfo),
    Segment(SegmentInfo),
}

/// Channel-level metadata (uploader page, user page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    /// Canonical channel URL
    pub url: String,

    /// Display name
    pub name: String,

    /// Stable identifier of the owning service
    pub service_id: String,

    /// Avatar image URL if available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Banner image URL if available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,

    /// Channel description text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Subscriber/follower count when the source exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_count: Option<u64>,

    /// Whether the source marks the channel as verified
    #[serde(default)]
    pub is_verified: bool,

    /// Sub-tabs of this channel (videos, lives, playlists, ...)
    #[serde(default)]
    pub tabs: Vec<ChannelTabInfo>,
}

impl ChannelInfo {
    /// Create channel info with the mandatory fields.
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        service_id: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            service_id: service_id.into(),
            thumbnail_url: None,
            banner_url: None,
            description: None,
            subscriber_count: None,
            is_verified: false,
            tabs: Vec::new(),
        }
    }

    /// Set the avatar URL.
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the subscriber count.
    pub fn with_subscriber_count(mut self, count: u64) -> Self {
        self.subscriber_count = Some(count);
        self
    }

    /// Add a channel tab.
    pub fn with_tab(mut self, tab: ChannelTabInfo) -> Self {
        self.tabs.push(tab);
        self
    }
}

/// Stream/video-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    /// Canonical watch URL
    pub url: String,

    /// Title
    pub title: String,

    /// Stable identifier of the owning service
    pub service_id: String,

    /// Uploader display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader_name: Option<String>,

    /// Uploader channel URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader_url: Option<String>,

    /// Thumbnail URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Duration in seconds, absent for live content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,

    /// View count when the source exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,

    /// Upload date as the source reports it (unparsed; time-string parsing
    /// is a collaborator concern)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
}

impl StreamInfo {
    /// Create stream info with the mandatory fields.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        service_id: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            service_id: service_id.into(),
            uploader_name: None,
            uploader_url: None,
            thumbnail_url: None,
            duration_secs: None,
            view_count: None,
            upload_date: None,
        }
    }

    /// Set the uploader name.
    pub fn with_uploader(mut self, name: impl Into<String>) -> Self {
        self.uploader_name = Some(name.into());
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Set the view count.
    pub fn with_view_count(mut self, count: u64) -> Self {
        self.view_count = Some(count);
        self
    }
}

/// The kind of a channel sub-tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelTabType {
    Videos,
    Lives,
    Playlists,
    Albums,
}

/// A channel sub-tab, addressed by an opaque locator URL.
///
/// The locator embeds whatever routing parameters the owning service needs
/// (channel id, tab type, carried channel name); only that service's
/// extractor decodes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelTabInfo {
    /// Opaque tab locator
    pub url: String,

    /// Tab kind
    pub tab: ChannelTabType,
}

impl ChannelTabInfo {
    pub fn new(url: impl Into<String>, tab: ChannelTabType) -> Self {
        Self {
            url: url.into(),
            tab,
        }
    }
}

/// Descriptor of a registered service, as listed by the
/// list-supported-services job kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    /// Stable service identifier (e.g. `"MOCKTUBE"`)
    pub id: String,

    /// Human-readable service name
    pub name: String,
}

impl ServiceInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One annotated segment returned by the segment-annotation sub-protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentInfo {
    /// Segment identifier assigned by the annotation service
    pub uuid: String,

    /// Video the segment belongs to
    pub video_id: String,

    /// Segment category (sponsor, intro, outro, ...)
    pub category: String,

    /// Action type (skip, poi, ...)
    pub action: String,

    /// Segment start, seconds into the video
    pub start_secs: f64,

    /// Segment end, seconds into the video
    pub end_secs: f64,

    /// Net vote score
    pub votes: i64,
}
