use rustc_hash::FxHashMap;

use super::stream_info::StreamInfo;
use serde::{Deserialize, Serialize};

/// Result of a platform extraction.
///
/// Carries the resolved stream variants together with the metadata the site
/// exposes (title, artist/channel name, category). Extractors that find no
/// playable stream (channel offline, private content, unresolvable page)
/// return a `MediaInfo` with an empty `streams` vector rather than an error;
/// hard failures surface as `ExtractorError` instead.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MediaInfo {
    // Site of the media platform
    pub site_url: String,
    pub title: String,
    pub artist: String,
    pub category: Option<String>,
    pub is_live: bool,
    pub streams: Vec<StreamInfo>,
    pub headers: Option<FxHashMap<String, String>>,
    pub extras: Option<FxHashMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct MediaInfoBuilder {
    site_url: String,
    title: String,
    artist: String,
    category: Option<String>,
    is_live: bool,
    streams: Vec<StreamInfo>,
    headers: Option<FxHashMap<String, String>>,
    extras: Option<FxHashMap<String, String>>,
}

impl MediaInfo {
    pub fn builder(
        site_url: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> MediaInfoBuilder {
        MediaInfoBuilder::new(site_url, title, artist)
    }

    /// A media info with no metadata and no streams, used when a page could
    /// not be classified at all.
    pub fn empty(site_url: impl Into<String>) -> Self {
        MediaInfoBuilder::new(site_url, "", "").build()
    }

    /// Whether the extraction produced at least one playable variant.
    pub fn has_streams(&self) -> bool {
        !self.streams.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl MediaInfoBuilder {
    pub fn new(
        site_url: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            site_url: site_url.into(),
            title: title.into(),
            artist: artist.into(),
            category: None,
            is_live: false,
            streams: Vec::new(),
            headers: None,
            extras: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn category_opt(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn is_live(mut self, is_live: bool) -> Self {
        self.is_live = is_live;
        self
    }

    pub fn streams(mut self, streams: Vec<StreamInfo>) -> Self {
        self.streams = streams;
        self
    }

    pub fn headers(mut self, headers: FxHashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras
            .get_or_insert_with(FxHashMap::default)
            .insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> MediaInfo {
        MediaInfo {
            site_url: self.site_url,
            title: self.title,
            artist: self.artist,
            category: self.category,
            is_live: self.is_live,
            streams: self.streams,
            headers: self.headers,
            extras: self.extras,
        }
    }
}
