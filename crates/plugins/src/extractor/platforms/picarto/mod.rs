mod builder;
mod models;

pub use builder::Picarto;
pub use builder::URL_REGEX;
