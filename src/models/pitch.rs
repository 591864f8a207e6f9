//! Pitch representation and staff-position mapping
//!
//! Staff positions are clef-relative integers counted in half-line steps:
//! +1 moves from a line to the space above it, +2 moves up a full line.
//! Pitch names cycle through the seven-letter chroma `a..g`, and octaves
//! change at `c` as usual.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::clef::Clef;
use crate::errors::ModelError;

/// Number of letters in the neumatic chroma
pub const CHROMA_LEN: i32 = 7;

/// Diatonic pitch name, ordered as the chroma `[a, b, c, d, e, f, g]`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PitchName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl PitchName {
    pub const CHROMA: [PitchName; 7] = [
        PitchName::A,
        PitchName::B,
        PitchName::C,
        PitchName::D,
        PitchName::E,
        PitchName::F,
        PitchName::G,
    ];

    /// Index of this letter in the chroma
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Letter at a chroma index, wrapping in both directions
    pub fn from_index(index: i32) -> PitchName {
        Self::CHROMA[index.rem_euclid(CHROMA_LEN) as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PitchName::A => "a",
            PitchName::B => "b",
            PitchName::C => "c",
            PitchName::D => "d",
            PitchName::E => "e",
            PitchName::F => "f",
            PitchName::G => "g",
        }
    }
}

impl FromStr for PitchName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(PitchName::A),
            "b" => Ok(PitchName::B),
            "c" => Ok(PitchName::C),
            "d" => Ok(PitchName::D),
            "e" => Ok(PitchName::E),
            "f" => Ok(PitchName::F),
            "g" => Ok(PitchName::G),
            _ => Err(ModelError::InvalidPitchName(s.to_string())),
        }
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute pitch: letter name plus octave (c4 is middle c)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub pname: PitchName,
    pub oct: i32,
}

impl Pitch {
    pub fn new(pname: PitchName, oct: i32) -> Self {
        Self { pname, oct }
    }

    /// Parse a pitch from its MEI attribute strings
    pub fn parse(pname: &str, oct: i32) -> Result<Self, ModelError> {
        Ok(Self::new(pname.parse()?, oct))
    }

    /// Diatonic steps above c0. Differences between two pitches equal their
    /// staff-position difference under any clef.
    pub fn diatonic_steps(&self) -> i32 {
        let from_c = (self.pname.index() - PitchName::C.index()).rem_euclid(CHROMA_LEN);
        CHROMA_LEN * self.oct + from_c
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pname, self.oct)
    }
}

/// Pitch sounding at `staff_pos` under the acting clef
///
/// The octave overflow is the quotient truncated toward zero, then corrected
/// by one when the walk from the clef letter crosses a `c` boundary that the
/// quotient does not account for.
pub fn position_to_pitch(staff_pos: i32, clef: &Clef) -> Pitch {
    let y_step = staff_pos - clef.staff_pos;

    let i_clef = clef.shape.anchor_letter().index();
    let i_pitch = (i_clef + y_step).rem_euclid(CHROMA_LEN);
    let pname = PitchName::from_index(i_pitch);

    let c_ind = PitchName::C.index();
    // integer division truncates toward zero
    let mut oct_over = y_step / CHROMA_LEN;
    if y_step > 0 && i_pitch >= c_ind && i_pitch < i_clef {
        oct_over += 1;
    } else if y_step < 0 && (i_pitch < c_ind || i_pitch > i_clef) {
        oct_over -= 1;
    }

    Pitch::new(pname, clef.shape.base_octave() + oct_over)
}

/// Staff position of `pitch` under the acting clef; inverse of [`position_to_pitch`]
pub fn pitch_to_position(pitch: Pitch, clef: &Clef) -> i32 {
    let i_clef = clef.shape.anchor_letter().index();
    let i_pitch = pitch.pname.index();
    let c_ind = PitchName::C.index();

    let mut clef_diff = i_pitch - i_clef + CHROMA_LEN * (pitch.oct - clef.shape.base_octave());
    if i_pitch < c_ind {
        clef_diff += CHROMA_LEN;
    }

    clef.staff_pos + clef_diff
}
