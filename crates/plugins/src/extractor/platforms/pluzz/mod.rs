mod builder;
mod models;

pub use builder::Pluzz;
pub use builder::URL_REGEX;
