mod api;
mod http;

pub use api::*;
pub use http::*;
