//! Format converters
//!
//! This module contains converters from document formats into the page model.

pub mod mei;

// Re-export for convenience
pub use mei::{parse_mei, MeiResult};
