use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, error, info};

use crate::{
    extractor::{
        error::ExtractorError,
        hls_extractor::HlsExtractor,
        platform_extractor::{Extractor, PlatformExtractor},
        platforms::picarto::models::{Channel, ChannelDetailResponse, VodResponse},
        utils,
    },
    media::MediaInfo,
};

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?picarto\.tv/(?:(?P<po>streampopout|videopopout)/)?(?P<user>[^&?/]+)(?:\?tab=videos&id=(?P<vod_id>\d+))?",
    )
    .unwrap()
});

/// How a Picarto page URL classifies, decided once from the URL alone.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Live { username: String },
    Vod { vod_id: String },
}

#[derive(Debug)]
pub struct Picarto {
    extractor: Extractor,
}

impl Picarto {
    const API_URL_LIVE: &str = "https://ptvintern.picarto.tv/api/channel/detail";
    const API_URL_VOD: &str = "https://ptvintern.picarto.tv/ptvapi";

    const VOD_QUERY: &str = "query ($videoId: ID!) {\n  video(id: $videoId) {\n    id\n    title\n    file_name\n    video_recording_image_url\n    channel {\n      name\n      }  }\n}\n";

    pub fn new(url: String, client: Client, _extras: Option<serde_json::Value>) -> Self {
        Self {
            extractor: Extractor::new("Picarto", url, client),
        }
    }

    /// Live vs. VOD, with the exact precedence of the upstream site rules:
    /// the live branch requires `vod_id` to be absent, so a channel URL with
    /// a `?tab=videos&id=` suffix always falls through to VOD.
    fn classify(url: &str) -> Option<Target> {
        let caps = URL_REGEX.captures(url)?;
        let po = caps.name("po").map(|m| m.as_str());
        let user = caps.name("user").map(|m| m.as_str());
        let vod_id = caps.name("vod_id").map(|m| m.as_str());

        if (po.is_none() || po == Some("streampopout"))
            && user.is_some_and(|u| !u.is_empty())
            && vod_id.is_none()
        {
            return Some(Target::Live {
                username: user.unwrap_or_default().to_owned(),
            });
        }

        if po == Some("videopopout") || (user.is_some() && vod_id.is_some()) {
            let id = vod_id.or(user)?;
            return Some(Target::Vod {
                vod_id: id.to_owned(),
            });
        }

        None
    }

    /// Netloc of the `src` of the first `<script>` pointing at the stream
    /// player. The attribute is usually scheme-relative (`//edge.example/...`).
    fn player_netloc(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(r#"script[src*="/stream/player.js"]"#).ok()?;
        let src = document.select(&selector).next()?.value().attr("src")?;
        Self::src_netloc(src)
    }

    fn src_netloc(src: &str) -> Option<String> {
        if let Some(rest) = src.strip_prefix("//") {
            return utils::netloc(&format!("https://{rest}"));
        }
        utils::netloc(src)
    }

    fn build_hls_url(netloc: &str, file_name: &str) -> String {
        format!("https://{netloc}/stream/hls/{file_name}/index.m3u8")
    }

    /// Offline channels and private streams end the extraction without a
    /// playlist fetch: the returned `MediaInfo` carries the channel metadata
    /// but no streams. `None` means the channel is playable.
    fn offline_or_private(site_url: &str, username: &str, channel: &Channel) -> Option<MediaInfo> {
        let category = channel.categories.first().map(|c| c.label.clone());

        if !channel.online {
            error!("User is not online");
            return Some(
                MediaInfo::builder(site_url, channel.title.clone(), username)
                    .category_opt(category)
                    .is_live(false)
                    .build(),
            );
        }

        if channel.private {
            info!("This is a private stream");
            return Some(
                MediaInfo::builder(site_url, channel.title.clone(), username)
                    .category_opt(category)
                    .is_live(true)
                    .extra("private", "true")
                    .build(),
            );
        }

        None
    }

    async fn get_live(&self, username: &str) -> Result<MediaInfo, ExtractorError> {
        let site_url = self.extractor.url.clone();

        let page = self
            .extractor
            .get(&self.extractor.url)
            .send()
            .await?
            .text()
            .await?;
        let Some(netloc) = Self::player_netloc(&page) else {
            error!("Could not find server netloc");
            return Ok(MediaInfo::empty(site_url));
        };
        debug!(netloc = %netloc, "resolved edge server");

        let api_url = format!("{}/{username}", Self::API_URL_LIVE);
        let body = self.extractor.get(&api_url).send().await?.text().await?;
        let detail: ChannelDetailResponse = serde_json::from_str(&body)?;

        let (Some(channel), Some(multistreams)) = (detail.channel, detail.get_multi_streams)
        else {
            debug!("Missing channel or streaming data");
            return Ok(MediaInfo::empty(site_url));
        };
        debug!(
            multistream = multistreams.multistream,
            streams = multistreams.streams.len(),
            "channel detail fetched"
        );

        if let Some(info) = Self::offline_or_private(&site_url, username, &channel) {
            return Ok(info);
        }
        let category = channel.categories.first().map(|c| c.label.clone());

        let hls_url = Self::build_hls_url(&netloc, &channel.stream_name);
        let streams = self
            .extract_hls_stream(
                &self.extractor.client,
                Some(self.extractor.get_platform_headers().clone()),
                &hls_url,
                None,
            )
            .await?;

        Ok(MediaInfo::builder(site_url, channel.title, username)
            .category_opt(category)
            .is_live(true)
            .streams(streams)
            .headers(self.extractor.get_platform_headers_map())
            .build())
    }

    async fn get_vod(&self, vod_id: &str) -> Result<MediaInfo, ExtractorError> {
        let site_url = self.extractor.url.clone();

        let query = serde_json::json!({
            "query": Self::VOD_QUERY,
            "variables": { "videoId": vod_id },
        });
        let body = self
            .extractor
            .post(Self::API_URL_VOD)
            .json(&query)
            .send()
            .await?
            .text()
            .await?;
        let response: VodResponse = serde_json::from_str(&body)?;

        let Some(video) = response.data.video else {
            debug!("Missing video data");
            return Ok(MediaInfo::empty(site_url));
        };

        let Some(netloc) = utils::netloc(&video.video_recording_image_url) else {
            debug!(
                url = %video.video_recording_image_url,
                "Recording image URL has no netloc"
            );
            return Ok(MediaInfo::empty(site_url));
        };

        let hls_url = Self::build_hls_url(&netloc, &video.file_name);
        let streams = self
            .extract_hls_stream(
                &self.extractor.client,
                Some(self.extractor.get_platform_headers().clone()),
                &hls_url,
                None,
            )
            .await?;

        Ok(MediaInfo::builder(site_url, video.title, video.channel.name)
            .category("VOD")
            .is_live(false)
            .streams(streams)
            .headers(self.extractor.get_platform_headers_map())
            .build())
    }
}

impl HlsExtractor for Picarto {}

#[async_trait]
impl PlatformExtractor for Picarto {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn extract(&self) -> Result<MediaInfo, ExtractorError> {
        match Self::classify(&self.extractor.url) {
            Some(Target::Live { username }) => {
                debug!("Type=Live");
                self.get_live(&username).await
            }
            Some(Target::Vod { vod_id }) => {
                debug!("Type=VOD");
                self.get_vod(&vod_id).await
            }
            None => Ok(MediaInfo::empty(self.extractor.url.clone())),
        }
    }
}
