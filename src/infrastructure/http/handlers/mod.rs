//! HTTP Handlers

mod conversion;
mod ping;

pub use conversion::*;
pub use ping::*;
