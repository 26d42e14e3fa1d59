use async_trait::async_trait;
use m3u8_rs::{MasterPlaylist, Playlist};
use reqwest::Client;
use url::Url;

use super::error::ExtractorError;
use crate::media::{MediaFormat, StreamFormat, stream_info::StreamInfo};

#[async_trait]
pub trait HlsExtractor {
    async fn extract_hls_stream(
        &self,
        client: &Client,
        headers: Option<reqwest::header::HeaderMap>,
        m3u8_url: &str,
        extras: Option<serde_json::Value>,
    ) -> Result<Vec<StreamInfo>, ExtractorError> {
        let base_url =
            Url::parse(m3u8_url).map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

        let response = client
            .get(m3u8_url)
            .headers(headers.unwrap_or_default())
            .send()
            .await?
            .bytes()
            .await?;
        let playlist = m3u8_rs::parse_playlist_res(&response)
            .map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

        let streams = match playlist {
            Playlist::MasterPlaylist(pl) => process_master_playlist(pl, &base_url, extras),
            Playlist::MediaPlaylist(_) => vec![
                StreamInfo::builder(m3u8_url, StreamFormat::Hls, MediaFormat::Ts)
                    .quality("source")
                    .extras_opt(extras)
                    .build(),
            ],
        };

        Ok(streams)
    }
}

fn process_master_playlist(
    playlist: MasterPlaylist,
    base_url: &Url,
    extras: Option<serde_json::Value>,
) -> Vec<StreamInfo> {
    playlist
        .variants
        .into_iter()
        .filter_map(|variant| {
            let stream_url = base_url.join(&variant.uri).ok()?;
            Some(
                StreamInfo::builder(stream_url.to_string(), StreamFormat::Hls, MediaFormat::Ts)
                    .quality(
                        variant
                            .resolution
                            .map(|r| format!("{}x{}", r.width, r.height))
                            .unwrap_or_default(),
                    )
                    .bitrate(variant.bandwidth / 1000)
                    .codec(variant.codecs.unwrap_or_default())
                    .fps(variant.frame_rate.unwrap_or(0.0))
                    .extras_opt(extras.clone())
                    .build(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U\n\
#EXT-X-STREAM-INF:BANDWIDTH=2996000,RESOLUTION=1280x720,CODECS=\"avc1.64001f,mp4a.40.2\",FRAME-RATE=30.000\n\
720p/index.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=960000,RESOLUTION=852x480\n\
480p/index.m3u8\n";

    #[test]
    fn test_master_playlist_variants() {
        let playlist = match m3u8_rs::parse_playlist_res(MASTER.as_bytes()).unwrap() {
            Playlist::MasterPlaylist(pl) => pl,
            _ => panic!("expected master playlist"),
        };
        let base = Url::parse("https://cdn.example/stream/hls/abc/index.m3u8").unwrap();
        let streams = process_master_playlist(playlist, &base, None);

        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].quality, "1280x720");
        assert_eq!(streams[0].bitrate, 2996);
        assert_eq!(streams[0].codec, "avc1.64001f,mp4a.40.2");
        assert_eq!(
            streams[0].url,
            "https://cdn.example/stream/hls/abc/720p/index.m3u8"
        );
        assert_eq!(streams[1].quality, "852x480");
        assert_eq!(streams[1].stream_format, StreamFormat::Hls);
        assert_eq!(streams[1].media_format, MediaFormat::Ts);
    }
}
