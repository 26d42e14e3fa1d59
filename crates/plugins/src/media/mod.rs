pub mod media_format;
pub mod media_info;
pub mod stream_info;

pub use media_format::{MediaFormat, StreamFormat};
pub use media_info::MediaInfo;
pub use stream_info::StreamInfo;
