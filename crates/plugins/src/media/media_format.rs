use serde::{Deserialize, Serialize};

/// Delivery protocol of a stream variant.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamFormat {
    Hls,
    Dash,
}

impl StreamFormat {
    pub fn as_str(&self) -> &str {
        match self {
            StreamFormat::Hls => "hls",
            StreamFormat::Dash => "dash",
        }
    }

    pub fn from_str(format: &str) -> Option<Self> {
        match format.to_lowercase().as_str() {
            "hls" => Some(StreamFormat::Hls),
            "dash" => Some(StreamFormat::Dash),
            _ => None,
        }
    }
}

/// Container the downloader ends up writing for a given delivery protocol.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    Ts,
    Mp4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(StreamFormat::from_str("HLS"), Some(StreamFormat::Hls));
        assert_eq!(StreamFormat::from_str("dash"), Some(StreamFormat::Dash));
        assert_eq!(StreamFormat::from_str("flv"), None);
    }
}
