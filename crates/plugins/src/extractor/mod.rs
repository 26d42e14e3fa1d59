pub mod dash_extractor;
pub mod error;
pub mod factory;
pub mod hls_extractor;
pub mod platform_extractor;
pub mod platforms;
pub mod utils;
mod default;

pub use default::{default_client, default_factory};
