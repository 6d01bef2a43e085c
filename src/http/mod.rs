//! HTTP transport with response normalization.
//!
//! Every request carries `Authorization: Bearer <credential>` and the same
//! fixed timeout. Successful responses become an [`Outcome`]; everything else is
//! an [`ApiError`]. No retries happen here (see [`crate::retry`]).

mod client;
mod error;
mod outcome;
mod params;
mod path;

pub use client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TodoistClient};
pub use error::ApiError;
pub use outcome::Outcome;
pub use params::Params;
pub use path::path_segment;
