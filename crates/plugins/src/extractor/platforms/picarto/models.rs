#![allow(unused)]
use serde::Deserialize;

/// `api/channel/detail/{username}` response. Both top-level objects come back
/// as JSON `null` for unknown channels, hence the `Option`s.
#[derive(Debug, Deserialize)]
pub struct ChannelDetailResponse {
    pub channel: Option<Channel>,
    #[serde(rename = "getMultiStreams")]
    pub get_multi_streams: Option<MultiStreams>,
}

#[derive(Debug, Deserialize)]
pub struct Channel {
    pub stream_name: String,
    pub title: String,
    pub online: bool,
    pub private: bool,
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct Category {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct MultiStreams {
    pub multistream: bool,
    pub streams: Vec<MultiStreamEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MultiStreamEntry {
    pub name: String,
    pub online: bool,
}

/// `ptvapi` GraphQL response for the VOD query.
#[derive(Debug, Deserialize)]
pub struct VodResponse {
    pub data: VodData,
}

#[derive(Debug, Deserialize)]
pub struct VodData {
    pub video: Option<VodVideo>,
}

#[derive(Debug, Deserialize)]
pub struct VodVideo {
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub video_recording_image_url: String,
    pub channel: VodChannel,
}

#[derive(Debug, Deserialize)]
pub struct VodChannel {
    pub name: String,
}
