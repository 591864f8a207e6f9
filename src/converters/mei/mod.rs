//! MEI to page converter
//!
//! Loads Music Encoding Initiative documents written by the neume editor's
//! backend into the in-memory [`Page`](crate::models::Page).
//!
//! # Architecture
//!
//! ```text
//! MEI String
//!   ↓ [Parse with roxmltree]
//! XML DOM + facsimile zones
//!   ↓ [Split at <sb>, mount clefs, neumes, divisions, custos]
//! Page (staves of pitched elements)
//! ```

pub mod parser;

pub use parser::{parse_mei, MeiResult};
