use serde::Deserialize;

use crate::extractor::error::ExtractorError;
use crate::media::StreamFormat;

/// `edgescape.json` geolocation response.
#[derive(Debug, Deserialize)]
pub struct GeoResponse {
    pub reponse: GeoReponse,
}

#[derive(Debug, Deserialize)]
pub struct GeoReponse {
    pub geo_info: GeoInfo,
}

#[derive(Debug, Deserialize)]
pub struct GeoInfo {
    pub country_code: String,
}

/// First array entry of the `window.FTVPlayerVideos` page global.
#[derive(Debug, Deserialize)]
pub struct FtvPlayerVideo {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

/// Player API response for a video id.
#[derive(Debug, Deserialize)]
pub struct VideoApiResponse {
    pub video: VideoSection,
    pub meta: MetaSection,
}

#[derive(Debug, Deserialize)]
pub struct VideoSection {
    pub workflow: Option<String>,
    pub format: Option<String>,
    pub token: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetaSection {
    pub title: String,
}

/// Token-exchange response: the final playable URL.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub url: String,
}

/// Validated shape of the player API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVideo {
    pub format: StreamFormat,
    pub token_url: String,
    pub source_url: String,
    pub title: String,
}

const TOKEN_WORKFLOW: &str = "token-akamai";

/// Parse and validate the player API body. Every shape mismatch is a hard
/// `ValidationError`; only the token-akamai workflow is supported.
pub fn parse_video_api(body: &str) -> Result<ResolvedVideo, ExtractorError> {
    let response: VideoApiResponse = serde_json::from_str(body)
        .map_err(|e| ExtractorError::ValidationError(format!("malformed video response: {e}")))?;

    let video = response.video;

    match video.workflow.as_deref() {
        Some(TOKEN_WORKFLOW) => {}
        other => {
            return Err(ExtractorError::ValidationError(format!(
                "unsupported workflow: {other:?}"
            )));
        }
    }

    let format = video
        .format
        .as_deref()
        .and_then(StreamFormat::from_str)
        .ok_or_else(|| {
            ExtractorError::ValidationError(format!("unsupported format: {:?}", video.format))
        })?;

    let token_url = require_url(video.token.as_deref(), "token")?;
    let source_url = require_url(video.url.as_deref(), "url")?;

    Ok(ResolvedVideo {
        format,
        token_url,
        source_url,
        title: response.meta.title,
    })
}

fn require_url(value: Option<&str>, field: &str) -> Result<String, ExtractorError> {
    let value =
        value.ok_or_else(|| ExtractorError::ValidationError(format!("missing video {field}")))?;
    url::Url::parse(value)
        .map_err(|_| ExtractorError::ValidationError(format!("video {field} is not a url")))?;
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_body(workflow: &str, format: &str) -> String {
        format!(
            r#"{{
              "video": {{
                "workflow": "{workflow}",
                "format": "{format}",
                "token": "https://hdfauth.ftven.fr/esi/TA",
                "url": "https://cdn.example/video/master.mpd"
              }},
              "meta": {{ "title": "Le 20h" }}
            }}"#
        )
    }

    #[test]
    fn test_parse_video_api_dash() {
        let resolved = parse_video_api(&api_body("token-akamai", "dash")).unwrap();
        assert_eq!(resolved.format, StreamFormat::Dash);
        assert_eq!(resolved.token_url, "https://hdfauth.ftven.fr/esi/TA");
        assert_eq!(resolved.source_url, "https://cdn.example/video/master.mpd");
        assert_eq!(resolved.title, "Le 20h");
    }

    #[test]
    fn test_parse_video_api_rejects_unknown_workflow() {
        let err = parse_video_api(&api_body("drm-widevine", "dash")).unwrap_err();
        assert!(matches!(err, ExtractorError::ValidationError(_)));
    }

    #[test]
    fn test_parse_video_api_rejects_unknown_format() {
        let err = parse_video_api(&api_body("token-akamai", "mp4")).unwrap_err();
        assert!(matches!(err, ExtractorError::ValidationError(_)));
    }

    #[test]
    fn test_parse_video_api_rejects_missing_token() {
        let body = r#"{
          "video": {
            "workflow": "token-akamai",
            "format": "hls",
            "url": "https://cdn.example/video/master.m3u8"
          },
          "meta": { "title": "Le 20h" }
        }"#;
        let err = parse_video_api(body).unwrap_err();
        assert!(matches!(err, ExtractorError::ValidationError(_)));
    }

    #[test]
    fn test_parse_video_api_rejects_non_url_token() {
        let body = r#"{
          "video": {
            "workflow": "token-akamai",
            "format": "hls",
            "token": "not a url",
            "url": "https://cdn.example/video/master.m3u8"
          },
          "meta": { "title": "Le 20h" }
        }"#;
        let err = parse_video_api(body).unwrap_err();
        assert!(matches!(err, ExtractorError::ValidationError(_)));
    }

    #[test]
    fn test_geo_response_deserializes() {
        let json = r#"{"reponse": {"geo_info": {"country_code": "FR"}}}"#;
        let geo: GeoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(geo.reponse.geo_info.country_code, "FR");
    }
}
