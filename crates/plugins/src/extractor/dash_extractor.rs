use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::error::ExtractorError;
use crate::media::{MediaFormat, StreamFormat, stream_info::StreamInfo};

// Minimal MPD model, attributes only as deep as variant selection needs.
#[derive(Debug, Deserialize)]
struct Mpd {
    #[serde(rename = "Period", default)]
    periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
struct Period {
    #[serde(rename = "AdaptationSet", default)]
    adaptation_sets: Vec<AdaptationSet>,
}

#[derive(Debug, Deserialize)]
struct AdaptationSet {
    #[serde(rename = "@contentType")]
    content_type: Option<String>,
    #[serde(rename = "@mimeType")]
    mime_type: Option<String>,
    #[serde(rename = "Representation", default)]
    representations: Vec<Representation>,
}

#[derive(Debug, Deserialize)]
struct Representation {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@bandwidth")]
    bandwidth: Option<u64>,
    #[serde(rename = "@width")]
    width: Option<u32>,
    #[serde(rename = "@height")]
    height: Option<u32>,
    #[serde(rename = "@codecs")]
    codecs: Option<String>,
    #[serde(rename = "@frameRate")]
    frame_rate: Option<String>,
    #[serde(rename = "@mimeType")]
    mime_type: Option<String>,
}

impl AdaptationSet {
    fn is_video(&self) -> bool {
        if self.content_type.as_deref() == Some("video") {
            return true;
        }
        if self
            .mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("video/"))
        {
            return true;
        }
        self.representations.iter().any(|r| {
            r.height.is_some()
                || r.width.is_some()
                || r.mime_type.as_deref().is_some_and(|m| m.starts_with("video/"))
        })
    }
}

// MPD @frameRate is either "30" or a ratio like "30000/1001".
fn parse_frame_rate(value: &str) -> f64 {
    if let Some((num, den)) = value.split_once('/') {
        let num: f64 = num.parse().unwrap_or(0.0);
        let den: f64 = den.parse().unwrap_or(1.0);
        if den != 0.0 { num / den } else { 0.0 }
    } else {
        value.parse().unwrap_or(0.0)
    }
}

/// Parse an MPD document into one `StreamInfo` per video representation.
///
/// The returned stream URLs are the manifest URL itself; segment templating
/// is the downloader's concern, the selected representation id travels in
/// `extras`.
fn parse_mpd(body: &str, mpd_url: &str) -> Result<Vec<StreamInfo>, ExtractorError> {
    let mpd: Mpd = quick_xml::de::from_str(body)
        .map_err(|e| ExtractorError::DashManifestError(e.to_string()))?;

    let mut streams = Vec::new();
    for period in &mpd.periods {
        for set in period.adaptation_sets.iter().filter(|s| s.is_video()) {
            for rep in &set.representations {
                let quality = match (rep.width, rep.height) {
                    (Some(w), Some(h)) => format!("{w}x{h}"),
                    _ => String::new(),
                };
                let extras = rep
                    .id
                    .as_deref()
                    .map(|id| serde_json::json!({ "representation_id": id }));
                streams.push(
                    StreamInfo::builder(mpd_url, StreamFormat::Dash, MediaFormat::Mp4)
                        .quality(quality)
                        .bitrate(rep.bandwidth.unwrap_or(0) / 1000)
                        .codec(rep.codecs.clone().unwrap_or_default())
                        .fps(rep.frame_rate.as_deref().map(parse_frame_rate).unwrap_or(0.0))
                        .extras_opt(extras)
                        .build(),
                );
            }
        }
    }

    if streams.is_empty() {
        return Err(ExtractorError::DashManifestError(
            "no video representations in manifest".to_string(),
        ));
    }

    Ok(streams)
}

#[async_trait]
pub trait DashExtractor {
    async fn extract_dash_stream(
        &self,
        client: &Client,
        headers: Option<reqwest::header::HeaderMap>,
        mpd_url: &str,
    ) -> Result<Vec<StreamInfo>, ExtractorError> {
        let body = client
            .get(mpd_url)
            .headers(headers.unwrap_or_default())
            .send()
            .await?
            .text()
            .await?;

        parse_mpd(&body, mpd_url)
    }
}
