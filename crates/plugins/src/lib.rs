//! Site-specific stream extractors.
//!
//! Each platform module pairs a URL pattern with a short fixed sequence of
//! page/API requests and resolves a playable HLS or DASH manifest plus the
//! usual metadata (title, artist, category).

pub mod extractor;
pub mod media;
