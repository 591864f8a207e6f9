//! Error types for the neume editor core
//!
//! Invalid input is rejected where it enters the model (parsing a pitch name,
//! building a bounding box, retyping a clef). Structural violations such as
//! mounting a neume on a staff with no clef are reported the same way and
//! leave the model untouched. A neume that does not match any entry of the
//! classification tree is not an error.

use thiserror::Error;

/// Errors raised by the in-memory model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid pitch name: '{0}' (expected one of a-g)")]
    InvalidPitchName(String),

    #[error("unknown clef shape: '{0}' (expected c or f)")]
    InvalidClefShape(String),

    #[error("undefined head shape: '{0}'")]
    InvalidHeadShape(String),

    #[error("head shape '{shape}' is not available in {style} notation")]
    HeadShapeNotInStyle { shape: String, style: String },

    #[error("undefined ornament type: '{0}'")]
    InvalidOrnament(String),

    #[error("undefined division type: '{0}'")]
    InvalidDivision(String),

    #[error("undefined liquescence modifier: '{0}'")]
    InvalidLiquescence(String),

    #[error("invalid {what}: '{value}'")]
    InvalidValue { what: String, value: String },

    #[error("invalid bounding box [{ulx}, {uly}, {lrx}, {lry}]")]
    InvalidBoundingBox { ulx: f64, uly: f64, lrx: f64, lry: f64 },

    /// A pitched element was mounted left of every clef on the staff
    #[error("no clef governs the element's position")]
    NoGoverningClef,

    #[error("the first clef on a staff cannot be deleted")]
    FirstClefDeletion,

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("staff {0} not found")]
    StaffNotFound(usize),

    /// Square-note components need a pitch before they can be mounted
    #[error("neume component has no pitch")]
    MissingPitch,

    #[error("neumify needs at least 2 neumes on one staff, got {0}")]
    NeumifyTooFew(usize),
}

/// Errors raised while importing an MEI document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("XML parsing failed: {0}")]
    Xml(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("invalid value '{value}' for {element}@{attribute}")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, ModelError>;
