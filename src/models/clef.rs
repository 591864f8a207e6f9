//! Clefs
//!
//! A clef fixes which letter sits on one staff position. Every pitched
//! element to its right, up to the next clef, is read against it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::elements::BoundingBox;
use super::pitch::PitchName;
use crate::errors::ModelError;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClefShape {
    /// Doh clef, marks c4
    C,
    /// Fah clef, marks f3
    F,
}

impl ClefShape {
    /// Letter sitting on the clef's staff position
    pub fn anchor_letter(self) -> PitchName {
        match self {
            ClefShape::C => PitchName::C,
            ClefShape::F => PitchName::F,
        }
    }

    /// Octave of the anchor letter
    pub fn base_octave(self) -> i32 {
        match self {
            ClefShape::C => 4,
            ClefShape::F => 3,
        }
    }

    /// Default staff position (Liber Usualis p. 17)
    pub fn default_staff_pos(self) -> i32 {
        match self {
            ClefShape::C => 0,
            ClefShape::F => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ClefShape::C => "Doh Clef",
            ClefShape::F => "Fah Clef",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClefShape::C => "c",
            ClefShape::F => "f",
        }
    }
}

impl FromStr for ClefShape {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" => Ok(ClefShape::C),
            "f" => Ok(ClefShape::F),
            _ => Err(ModelError::InvalidClefShape(s.to_string())),
        }
    }
}

impl fmt::Display for ClefShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clef mounted (or about to be mounted) on a staff
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clef {
    pub id: Option<String>,
    pub shape: ClefShape,
    /// Staff position of the clef's anchor letter
    pub staff_pos: i32,
    pub zone: BoundingBox,
}

impl Clef {
    /// Create a clef, using the shape's default staff position when none is given
    pub fn new(shape: ClefShape, staff_pos: Option<i32>) -> Self {
        Self {
            id: None,
            shape,
            staff_pos: staff_pos.unwrap_or_else(|| shape.default_staff_pos()),
            zone: BoundingBox::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_zone(mut self, zone: BoundingBox) -> Self {
        self.zone = zone;
        self
    }

    pub fn name(&self) -> &'static str {
        self.shape.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_positions() {
        assert_eq!(Clef::new(ClefShape::C, None).staff_pos, 0);
        assert_eq!(Clef::new(ClefShape::F, None).staff_pos, 2);
        assert_eq!(Clef::new(ClefShape::F, Some(-4)).staff_pos, -4);
    }

    #[test]
    fn test_parse_shape() {
        assert_eq!("C".parse::<ClefShape>().unwrap(), ClefShape::C);
        assert_eq!("f".parse::<ClefShape>().unwrap(), ClefShape::F);
        assert!(matches!("g".parse::<ClefShape>(), Err(ModelError::InvalidClefShape(_))));
    }

    #[test]
    fn test_names() {
        assert_eq!(Clef::new(ClefShape::C, None).name(), "Doh Clef");
        assert_eq!(Clef::new(ClefShape::F, None).name(), "Fah Clef");
    }
}
