//! visiongrid - batched AI image-variant generation
//!
//! Takes one generation-settings snapshot (prompt, negative prompt, aspect
//! ratio, style, optional seed), fans it out into four concurrent requests to
//! the Gemini image API, and aggregates whichever subset succeeds.

pub mod ai;
pub mod batch;
pub mod error;
pub mod models;
pub mod presets;
pub mod prompt;

pub use error::{Error, Result};
