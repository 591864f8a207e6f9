//! Models module for the neume editor
//!
//! Pitches and clefs, the notated elements, staves with their clef-driven
//! pitch bookkeeping, and the page that orchestrates edits across staves.

pub mod pitch;
pub mod clef;
pub mod elements;
pub mod neume;
pub mod events;
pub mod staff;
pub mod page;

// Re-export commonly used types
pub use pitch::{position_to_pitch, pitch_to_position, Pitch, PitchName};
pub use clef::{Clef, ClefShape};
pub use elements::*;
pub use neume::{neume_from_data, Classification, Neume, NeumeComponent, NoteData};
pub use events::{ElementKind, EventQueue, ModelEvent, PageEvent};
pub use staff::{Staff, StaffElement};
pub use page::{EditOutcome, Page};
