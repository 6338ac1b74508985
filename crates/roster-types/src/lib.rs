mod draft;
mod user;
mod view;

pub use draft::*;
pub use user::*;
pub use view::*;

pub const DEFAULT_API_URL: &str = "http://localhost:4040";
