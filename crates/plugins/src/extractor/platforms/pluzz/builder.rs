use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::Local;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::{
    extractor::{
        dash_extractor::DashExtractor,
        default::DEFAULT_UA,
        error::ExtractorError,
        hls_extractor::HlsExtractor,
        platform_extractor::{Extractor, PlatformExtractor},
        platforms::pluzz::models::{FtvPlayerVideo, GeoResponse, TokenResponse, parse_video_api},
        utils,
    },
    media::{MediaInfo, StreamFormat},
};

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:(?:www\.)?france\.tv/|(?:.+\.)?francetvinfo\.fr/)").unwrap()
});

static FTV_PLAYER_VIDEOS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\.FTVPlayerVideos\s*=\s*(?P<json>\[\{.+?\}\])\s*;\s*(?:$|var)").unwrap()
});

// `player.load({src: '...'});` with either quote style (the regex crate has
// no backreferences).
static PLAYER_LOAD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"player\.load\s*\(\s*\{\s*src\s*:\s*(?:'(?P<sq>[^']+)'|"(?P<dq>[^"]+)")\s*\}\s*\)\s*;"#,
    )
    .unwrap()
});

static CHROME_VERSION: LazyLock<&'static str> = LazyLock::new(|| {
    static RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Chrome/(\d+)").unwrap());
    utils::capture_group_1(&RE, DEFAULT_UA).unwrap_or("126")
});

#[derive(Debug)]
pub struct Pluzz {
    extractor: Extractor,
}

impl Pluzz {
    const PLAYER_VERSION: &str = "5.51.35";
    const GEO_URL: &str = "https://geoftv-a.akamaihd.net/ws/edgescape.json";
    const API_URL: &str = "https://player.webservices.francetelevisions.fr/v1/videos";

    pub fn new(url: String, client: Client, _extras: Option<serde_json::Value>) -> Self {
        // The default extractor headers already carry the Chrome UA every
        // request here must present.
        Self {
            extractor: Extractor::new("Pluzz", url, client),
        }
    }

    // Video-id extraction strategies, tried in order; first hit wins.
    const VIDEO_ID_STRATEGIES: &[fn(&Html) -> Option<String>] = &[
        Self::id_from_player_videos,
        Self::id_from_player_load,
        Self::id_from_player_wrapper,
        Self::id_from_magneto,
    ];

    fn find_video_id(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        Self::VIDEO_ID_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(&document))
    }

    fn script_text_containing(document: &Html, marker: &str) -> Option<String> {
        let selector = Selector::parse("script").ok()?;
        document
            .select(&selector)
            .map(|script| script.text().collect::<String>())
            .find(|text| text.contains(marker))
    }

    /// `window.FTVPlayerVideos = [{...}];` page global, first entry's videoId.
    fn id_from_player_videos(document: &Html) -> Option<String> {
        let text = Self::script_text_containing(document, "window.FTVPlayerVideos")?;
        let json = utils::capture_name(&FTV_PLAYER_VIDEOS_REGEX, &text, "json")?;
        let videos: Vec<FtvPlayerVideo> = serde_json::from_str(json).ok()?;
        videos.into_iter().next().map(|v| v.video_id)
    }

    /// `new Magnetoscope(...); player.load({src: "..."});` init call.
    fn id_from_player_load(document: &Html) -> Option<String> {
        let text = Self::script_text_containing(document, "new Magnetoscope")?;
        let caps = PLAYER_LOAD_REGEX.captures(&text)?;
        caps.name("sq")
            .or_else(|| caps.name("dq"))
            .map(|m| m.as_str().to_owned())
    }

    /// `id` attribute of the player wrapper element.
    fn id_from_player_wrapper(document: &Html) -> Option<String> {
        let selector = Selector::parse(r#"[id][class*="francetv-player-wrapper"]"#).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("id"))
            .map(ToOwned::to_owned)
    }

    /// `data-id` attribute of the first element whose class attribute is
    /// exactly "magneto".
    fn id_from_magneto(document: &Html) -> Option<String> {
        let selector = Selector::parse(r#"[data-id][class="magneto"]"#).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("data-id"))
            .map(ToOwned::to_owned)
    }

    /// Local UTC offset at call time, `±HHMM`.
    fn local_gmt_offset() -> String {
        Local::now().format("%z").to_string()
    }

    fn build_api_url(
        &self,
        video_id: &str,
        country_code: &str,
        gmt: &str,
    ) -> Result<String, ExtractorError> {
        let domain = utils::netloc(&self.extractor.url).unwrap_or_default();
        utils::update_query_params(
            &format!("{}/{}", Self::API_URL, video_id),
            &[
                ("country_code", country_code),
                ("w", "1920"),
                ("h", "1080"),
                ("player_version", Self::PLAYER_VERSION),
                ("domain", &domain),
                ("device_type", "mobile"),
                ("browser", "chrome"),
                ("browser_version", *CHROME_VERSION),
                ("os", "ios"),
                ("gmt", gmt),
            ],
        )
    }

    async fn fetch_country_code(&self) -> Result<String, ExtractorError> {
        let body = self
            .extractor
            .get(Self::GEO_URL)
            .send()
            .await?
            .text()
            .await?;
        let geo: GeoResponse = serde_json::from_str(&body)?;
        Ok(geo.reponse.geo_info.country_code)
    }

    /// An error status on the page fetch counts as "no video id"; only
    /// transport-level failures propagate.
    async fn fetch_video_id(&self) -> Result<Option<String>, ExtractorError> {
        let response = self.extractor.get(&self.extractor.url).send().await?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "Page fetch failed; no video id");
            return Ok(None);
        }
        let body = response.text().await?;
        Ok(Self::find_video_id(&body))
    }

    async fn fetch_playable_url(
        &self,
        token_url: &str,
        source_url: &str,
    ) -> Result<String, ExtractorError> {
        let data_url = utils::update_query_params(token_url, &[("url", source_url)])?;
        let body = self.extractor.get(&data_url).send().await?.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ExtractorError::ValidationError(format!("malformed token response: {e}")))?;
        url::Url::parse(&token.url).map_err(|_| {
            ExtractorError::ValidationError("token response url is not a url".to_string())
        })?;
        Ok(token.url)
    }
}

impl HlsExtractor for Pluzz {}
impl DashExtractor for Pluzz {}

#[async_trait]
impl PlatformExtractor for Pluzz {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn extract(&self) -> Result<MediaInfo, ExtractorError> {
        let site_url = self.extractor.url.clone();

        let country_code = self.fetch_country_code().await?;
        debug!("Country: {country_code}");

        let Some(video_id) = self.fetch_video_id().await? else {
            return Ok(MediaInfo::empty(site_url));
        };
        debug!("Video ID: {video_id}");

        let api_url = self.build_api_url(&video_id, &country_code, &Self::local_gmt_offset())?;
        let body = self.extractor.get(&api_url).send().await?.text().await?;
        let resolved = parse_video_api(&body)?;

        let video_url = self
            .fetch_playable_url(&resolved.token_url, &resolved.source_url)
            .await?;

        let headers = self.extractor.get_platform_headers().clone();
        let streams = match resolved.format {
            StreamFormat::Dash => {
                self.extract_dash_stream(&self.extractor.client, Some(headers), &video_url)
                    .await?
            }
            StreamFormat::Hls => {
                self.extract_hls_stream(&self.extractor.client, Some(headers), &video_url, None)
                    .await?
            }
        };

        Ok(MediaInfo::builder(site_url, resolved.title, "")
            .streams(streams)
            .headers(self.extractor.get_platform_headers_map())
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_regex_matches_both_domain_families() {
        assert!(URL_REGEX.is_match("https://www.france.tv/france-2/direct.html"));
        assert!(URL_REGEX.is_match("https://france.tv/france-3/une-emission.html"));
        assert!(URL_REGEX.is_match("https://la1ere.francetvinfo.fr/programme-video/direct"));
        assert!(!URL_REGEX.is_match("https://francetvinfo.example/page"));
        assert!(!URL_REGEX.is_match("https://example.com/france.tv/"));
    }

    #[test]
    fn test_id_from_player_videos() {
        let html = r#"<html><body><script>
            window.FTVPlayerVideos = [{"videoId":"006194ea-117d-4bcf-94a9-153d999c59ae","contentId":1}];var other = 1;
        </script></body></html>"#;
        assert_eq!(
            Pluzz::find_video_id(html),
            Some("006194ea-117d-4bcf-94a9-153d999c59ae".into())
        );
    }

    #[test]
    fn test_id_from_player_load() {
        let html = r#"<html><body><script>
            var player = new Magnetoscope(container);
            player.load({src: 'b2bd5d0e-fa08-4b4f-94f9-8f4e9d76b6c7'});
        </script></body></html>"#;
        assert_eq!(
            Pluzz::find_video_id(html),
            Some("b2bd5d0e-fa08-4b4f-94f9-8f4e9d76b6c7".into())
        );
    }

    #[test]
    fn test_id_from_player_wrapper() {
        let html = r#"<html><body>
            <div class="main francetv-player-wrapper" id="1234-abcd"></div>
        </body></html>"#;
        assert_eq!(Pluzz::find_video_id(html), Some("1234-abcd".into()));
    }

    #[test]
    fn test_id_from_magneto() {
        let html = r#"<html><body>
            <div class="magneto" data-id="5678-efgh"></div>
        </body></html>"#;
        assert_eq!(Pluzz::find_video_id(html), Some("5678-efgh".into()));
        // class must be exactly "magneto"
        let html = r#"<div class="magneto large" data-id="5678-efgh"></div>"#;
        assert_eq!(Pluzz::find_video_id(html), None);
    }

    #[test]
    fn test_strategy_order_prefers_player_videos() {
        let html = r#"<html><body>
            <script>window.FTVPlayerVideos = [{"videoId":"first"}];</script>
            <div class="magneto" data-id="last"></div>
        </body></html>"#;
        assert_eq!(Pluzz::find_video_id(html), Some("first".into()));
    }

    #[test]
    fn test_no_strategy_matches() {
        assert_eq!(Pluzz::find_video_id("<html><body>rien</body></html>"), None);
    }

    #[test]
    fn test_local_gmt_offset_format() {
        let gmt = Pluzz::local_gmt_offset();
        let re = Regex::new(r"^[+-]\d{4}$").unwrap();
        assert!(re.is_match(&gmt), "unexpected offset: {gmt}");
    }

    #[test]
    fn test_build_api_url() {
        let pluzz = Pluzz::new(
            "https://www.france.tv/france-2/direct.html".to_string(),
            crate::extractor::default::default_client(),
            None,
        );
        let url = pluzz
            .build_api_url("006194ea-117d-4bcf-94a9-153d999c59ae", "FR", "+0200")
            .unwrap();
        assert!(url.starts_with(
            "https://player.webservices.francetelevisions.fr/v1/videos/006194ea-117d-4bcf-94a9-153d999c59ae?"
        ));
        assert!(url.contains("country_code=FR"));
        assert!(url.contains("w=1920"));
        assert!(url.contains("h=1080"));
        assert!(url.contains("player_version=5.51.35"));
        assert!(url.contains("domain=www.france.tv"));
        assert!(url.contains("device_type=mobile"));
        assert!(url.contains("browser=chrome"));
        assert!(url.contains("browser_version=126"));
        assert!(url.contains("os=ios"));
        assert!(url.contains("gmt=%2B0200"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_extract() {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();

        let pluzz = Pluzz::new(
            "https://www.france.tv/france-2/direct.html".to_string(),
            crate::extractor::default_client(),
            None,
        );
        let media_info = pluzz.extract().await;
        println!("{media_info:?}");
    }
}
