use regex::Regex;
use url::Url;

use crate::extractor::error::ExtractorError;

#[inline]
pub fn capture_group_1<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[inline]
pub fn capture_name<'a>(re: &Regex, input: &'a str, name: &str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.name(name))
        .map(|m| m.as_str())
}

/// The network-location component (`host[:port]`) of a URL, or `None` when
/// the input does not parse as an absolute URL with a host.
pub fn netloc(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host.to_owned()),
    }
}

/// Merge/override query parameters on a URL, preserving parameters that are
/// not overridden. Pair order follows existing params first, then new ones.
pub fn update_query_params(url: &str, params: &[(&str, &str)]) -> Result<String, ExtractorError> {
    let mut parsed = Url::parse(url).map_err(|_| ExtractorError::InvalidUrl(url.to_string()))?;

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !params.iter().any(|(nk, _)| nk == k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut qs = parsed.query_pairs_mut();
        qs.clear();
        for (k, v) in &kept {
            qs.append_pair(k, v);
        }
        for (k, v) in params {
            qs.append_pair(k, v);
        }
    }

    if parsed.query() == Some("") {
        parsed.set_query(None);
    }

    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_name() {
        let re = Regex::new(r"id=(?P<id>\d+)").unwrap();
        assert_eq!(capture_name(&re, "x?id=42", "id"), Some("42"));
        assert_eq!(capture_name(&re, "x?id=", "id"), None);
    }

    #[test]
    fn test_netloc_keeps_port() {
        assert_eq!(netloc("https://cdn.example/stream"), Some("cdn.example".into()));
        assert_eq!(
            netloc("http://cdn.example:8080/stream"),
            Some("cdn.example:8080".into())
        );
        assert_eq!(netloc("/relative/path"), None);
    }

    #[test]
    fn test_update_query_params_merges_and_overrides() {
        let url = update_query_params(
            "https://api.example/v1/videos/123?keep=1&w=640",
            &[("w", "1920"), ("h", "1080")],
        )
        .unwrap();
        assert_eq!(url, "https://api.example/v1/videos/123?keep=1&w=1920&h=1080");
    }

    #[test]
    fn test_update_query_params_encodes_values() {
        let url = update_query_params(
            "https://token.example/akamai",
            &[("url", "https://cdn.example/master.m3u8?a=b")],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://token.example/akamai?url=https%3A%2F%2Fcdn.example%2Fmaster.m3u8%3Fa%3Db"
        );
    }

    #[test]
    fn test_update_query_params_rejects_relative_urls() {
        assert!(matches!(
            update_query_params("not a url", &[("a", "b")]),
            Err(ExtractorError::InvalidUrl(_))
        ));
    }
}
