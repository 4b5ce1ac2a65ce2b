//! Request extractors that reject with the API error body.

mod json;
mod path;

pub use json::ApiJson;
pub use path::ApiPath;
