use crate::media::{MediaFormat, StreamFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StreamInfo {
    // Url of the stream
    pub url: String,
    // Delivery protocol, e.g. HLS
    pub stream_format: StreamFormat,
    // Container the variant downloads into
    pub media_format: MediaFormat,
    // Quality of the stream, e.g., "1920x1080"
    pub quality: String,
    // Bitrate of the stream in kbps
    pub bitrate: u64,
    pub priority: u32,
    pub codec: String,
    pub fps: f64,
    pub is_headers_needed: bool,
    pub extras: Option<serde_json::Value>,
}

impl StreamInfo {
    pub fn builder(
        url: impl Into<String>,
        stream_format: StreamFormat,
        media_format: MediaFormat,
    ) -> StreamInfoBuilder {
        StreamInfoBuilder::new(url, stream_format, media_format)
    }
}

#[derive(Debug, Clone)]
pub struct StreamInfoBuilder {
    url: String,
    stream_format: StreamFormat,
    media_format: MediaFormat,
    quality: String,
    bitrate: u64,
    priority: u32,
    codec: String,
    fps: f64,
    is_headers_needed: bool,
    extras: Option<serde_json::Value>,
}

impl StreamInfoBuilder {
    pub fn new(
        url: impl Into<String>,
        stream_format: StreamFormat,
        media_format: MediaFormat,
    ) -> Self {
        Self {
            url: url.into(),
            stream_format,
            media_format,
            quality: String::new(),
            bitrate: 0,
            priority: 0,
            codec: String::new(),
            fps: 0.0,
            is_headers_needed: false,
            extras: None,
        }
    }

    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn bitrate(mut self, bitrate: u64) -> Self {
        self.bitrate = bitrate;
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = codec.into();
        self
    }

    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn is_headers_needed(mut self, is_headers_needed: bool) -> Self {
        self.is_headers_needed = is_headers_needed;
        self
    }

    pub fn extras(mut self, extras: serde_json::Value) -> Self {
        self.extras = Some(extras);
        self
    }

    pub fn extras_opt(mut self, extras: Option<serde_json::Value>) -> Self {
        self.extras = extras;
        self
    }

    pub fn build(self) -> StreamInfo {
        StreamInfo {
            url: self.url,
            stream_format: self.stream_format,
            media_format: self.media_format,
            quality: self.quality,
            bitrate: self.bitrate,
            priority: self.priority,
            codec: self.codec,
            fps: self.fps,
            is_headers_needed: self.is_headers_needed,
            extras: self.extras,
        }
    }
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bitrate > 0 {
            write!(
                f,
                "{} - {} ({} kbps)",
                self.stream_format.as_str(),
                self.quality,
                self.bitrate
            )
        } else {
            write!(f, "{} - {}", self.stream_format.as_str(), self.quality)
        }
    }
}
