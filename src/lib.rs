//! Neume Editor WASM Module
//!
//! Pitch and staff-position mapping under clefs, neume classification for
//! square-note and cheironomic notation, and the staff and page model that
//! keeps pitches consistent while clefs, neumes and custodes are edited.

pub mod errors;
pub mod config;
pub mod models;
pub mod classify;
pub mod sync;
pub mod converters;
pub mod api;

// Re-export commonly used types
pub use config::EditorConfig;
pub use errors::{ImportError, ModelError};
pub use classify::NotationStyle;
pub use models::*;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Debug) {
            web_sys::console::warn_1(&format!("logger already initialized: {}", e).into());
        }
    }

    log::info!("Neume Editor WASM module initialized");
}
