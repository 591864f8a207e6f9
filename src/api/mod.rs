//! Neume Editor WASM API
//!
//! This module provides the JavaScript-facing API for the neume editor.
//! It includes shared utilities for serialization, validation, and error handling,
//! as well as the API functions organized by functional domain.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, argument parsing, error handling, and logging
//! - `types`: Summary and classification results handed back to JavaScript
//! - `core`: Page storage, snapshots, events and stateless pitch/classification helpers
//! - `edits`: One function per page edit (clefs, neumes, divisions, custos)

pub mod helpers;
pub mod types;
pub mod core;
pub mod edits;

// Re-export all public functions from modules to maintain the current public API
pub use core::*;
pub use edits::*;
