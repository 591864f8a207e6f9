//! Element types for neume notation
//!
//! Bounding boxes, note-head shapes, ornaments, divisions and the custos.
//! Clefs and neumes live in their own modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::clef::Clef;
use super::pitch::{self, Pitch};
use crate::errors::ModelError;

/// Axis-aligned box in page pixels: upper-left and lower-right corners
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub ulx: i32,
    pub uly: i32,
    pub lrx: i32,
    pub lry: i32,
}

impl BoundingBox {
    /// Validate and round a box given as `[ulx, uly, lrx, lry]`
    pub fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Result<Self, ModelError> {
        let finite = [ulx, uly, lrx, lry].iter().all(|v| v.is_finite());
        if !finite || ulx > lrx || uly > lry {
            return Err(ModelError::InvalidBoundingBox { ulx, uly, lrx, lry });
        }

        Ok(Self {
            ulx: ulx.round() as i32,
            uly: uly.round() as i32,
            lrx: lrx.round() as i32,
            lry: lry.round() as i32,
        })
    }

    pub fn from_array(bb: [f64; 4]) -> Result<Self, ModelError> {
        Self::new(bb[0], bb[1], bb[2], bb[3])
    }

    pub fn to_array(&self) -> [i32; 4] {
        [self.ulx, self.uly, self.lrx, self.lry]
    }

    pub fn width(&self) -> i32 {
        self.lrx - self.ulx
    }

    pub fn height(&self) -> i32 {
        self.lry - self.uly
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            ulx: self.ulx.min(other.ulx),
            uly: self.uly.min(other.uly),
            lrx: self.lrx.max(other.lrx),
            lry: self.lry.max(other.lry),
        }
    }
}

/// Visual variant of a note head
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HeadShape {
    Punctum,
    Virga,
    Cavum,
    PunctumInclinatum,
    PunctumInclinatumParvum,
    Quilisma,
    Tractulus,
    Gravis,
    Oriscus,
    Stropha,
}

impl HeadShape {
    pub fn name(self) -> &'static str {
        match self {
            HeadShape::Punctum => "Punctum",
            HeadShape::Virga => "Virga",
            HeadShape::Cavum => "Cavum",
            HeadShape::PunctumInclinatum => "Punctum Inclinatum",
            HeadShape::PunctumInclinatumParvum => "Punctum Inclinatum Parva",
            HeadShape::Quilisma => "Quilisma",
            HeadShape::Tractulus => "Tractulus",
            HeadShape::Gravis => "Gravis",
            HeadShape::Oriscus => "Oriscus",
            HeadShape::Stropha => "Stropha",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeadShape::Punctum => "punctum",
            HeadShape::Virga => "virga",
            HeadShape::Cavum => "cavum",
            HeadShape::PunctumInclinatum => "punctum_inclinatum",
            HeadShape::PunctumInclinatumParvum => "punctum_inclinatum_parvum",
            HeadShape::Quilisma => "quilisma",
            HeadShape::Tractulus => "tractulus",
            HeadShape::Gravis => "gravis",
            HeadShape::Oriscus => "oriscus",
            HeadShape::Stropha => "stropha",
        }
    }
}

impl FromStr for HeadShape {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "punctum" => Ok(HeadShape::Punctum),
            "virga" => Ok(HeadShape::Virga),
            "cavum" => Ok(HeadShape::Cavum),
            "punctum_inclinatum" => Ok(HeadShape::PunctumInclinatum),
            "punctum_inclinatum_parvum" => Ok(HeadShape::PunctumInclinatumParvum),
            "quilisma" => Ok(HeadShape::Quilisma),
            "tractulus" => Ok(HeadShape::Tractulus),
            "gravis" => Ok(HeadShape::Gravis),
            "oriscus" => Ok(HeadShape::Oriscus),
            "stropha" => Ok(HeadShape::Stropha),
            _ => Err(ModelError::InvalidHeadShape(s.to_string())),
        }
    }
}

impl fmt::Display for HeadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrnamentKind {
    Dot,
    Episema,
}

impl OrnamentKind {
    pub fn default_form(self) -> &'static str {
        match self {
            OrnamentKind::Dot => "aug",
            OrnamentKind::Episema => "horizontal",
        }
    }
}

impl FromStr for OrnamentKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dot" => Ok(OrnamentKind::Dot),
            "episema" => Ok(OrnamentKind::Episema),
            _ => Err(ModelError::InvalidOrnament(s.to_string())),
        }
    }
}

/// Ornament attached to a single note head
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Ornament {
    pub kind: OrnamentKind,
    pub form: String,
}

impl Ornament {
    pub fn new(kind: OrnamentKind, form: Option<&str>) -> Self {
        Self {
            kind,
            form: form.unwrap_or_else(|| kind.default_form()).to_string(),
        }
    }

    pub fn dot(form: Option<&str>) -> Self {
        Self::new(OrnamentKind::Dot, form)
    }
}

/// Liquescent variant of a neume
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Liquescence {
    Plain,
    Aug,
    Dim,
}

impl FromStr for Liquescence {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            // "alt" is the editor's keyboard modifier for liquescence
            "plain" | "alt" | "liquescence" => Ok(Liquescence::Plain),
            "aug" => Ok(Liquescence::Aug),
            "dim" => Ok(Liquescence::Dim),
            _ => Err(ModelError::InvalidLiquescence(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DivisionKind {
    Small,
    Minor,
    Major,
    Final,
}

impl DivisionKind {
    pub fn name(self) -> &'static str {
        match self {
            DivisionKind::Small => "Small Division",
            DivisionKind::Minor => "Minor Division",
            DivisionKind::Major => "Major Division",
            DivisionKind::Final => "Final Division",
        }
    }
}

impl FromStr for DivisionKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.strip_prefix("div_").unwrap_or(&key) {
            "small" => Ok(DivisionKind::Small),
            "minor" => Ok(DivisionKind::Minor),
            "major" => Ok(DivisionKind::Major),
            "final" => Ok(DivisionKind::Final),
            _ => Err(ModelError::InvalidDivision(s.to_string())),
        }
    }
}

/// Division (breath mark) between neumes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub id: Option<String>,
    pub kind: DivisionKind,
    pub zone: BoundingBox,
}

impl Division {
    pub fn new(kind: DivisionKind, zone: BoundingBox) -> Self {
        Self { id: None, kind, zone }
    }
}

/// Guide note at the end of a staff showing the first pitch of the next staff
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Custos {
    pub id: Option<String>,
    pub pitch: Pitch,
    /// Staff position under the acting clef, set once mounted
    pub root_staff_pos: Option<i32>,
    pub zone: BoundingBox,
}

impl Custos {
    pub fn new(pitch: Pitch, zone: BoundingBox) -> Self {
        Self {
            id: None,
            pitch,
            root_staff_pos: None,
            zone,
        }
    }

    pub fn set_root_note(&mut self, pitch: Pitch) {
        self.pitch = pitch;
    }

    /// Move the custos to `staff_pos` and re-read its pitch under `clef`
    pub fn set_root_staff_pos(&mut self, staff_pos: i32, clef: &Clef) {
        self.root_staff_pos = Some(staff_pos);
        self.pitch = pitch::position_to_pitch(staff_pos, clef);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clef::ClefShape;
    use crate::models::pitch::PitchName;

    #[test]
    fn test_bounding_box_validation() {
        assert!(BoundingBox::new(100.0, 100.0, 0.0, 0.0).is_err());
        assert!(BoundingBox::new(0.0, f64::NAN, 1.0, 1.0).is_err());

        let bb = BoundingBox::new(190.4, 302.6, 1450.0, 406.0).unwrap();
        assert_eq!(bb.to_array(), [190, 303, 1450, 406]);
        assert_eq!(bb.width(), 1260);
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(10.0, 10.0, 20.0, 20.0).unwrap();
        let b = BoundingBox::new(15.0, 5.0, 40.0, 18.0).unwrap();
        assert_eq!(a.union(&b).to_array(), [10, 5, 40, 20]);
    }

    #[test]
    fn test_head_shape_parse() {
        assert_eq!("punctum_inclinatum".parse::<HeadShape>().unwrap(), HeadShape::PunctumInclinatum);
        assert_eq!("Virga".parse::<HeadShape>().unwrap(), HeadShape::Virga);
        assert!(matches!("blob".parse::<HeadShape>(), Err(ModelError::InvalidHeadShape(_))));
    }

    #[test]
    fn test_ornament_default_forms() {
        assert_eq!(Ornament::dot(None).form, "aug");
        assert_eq!(Ornament::new(OrnamentKind::Episema, None).form, "horizontal");
        assert_eq!(Ornament::new(OrnamentKind::Episema, Some("vertical")).form, "vertical");
        assert!("trill".parse::<OrnamentKind>().is_err());
    }

    #[test]
    fn test_division_kind_accepts_prefixed_keys() {
        assert_eq!("div_final".parse::<DivisionKind>().unwrap(), DivisionKind::Final);
        assert_eq!("small".parse::<DivisionKind>().unwrap(), DivisionKind::Small);
        assert!("huge".parse::<DivisionKind>().is_err());
    }

    #[test]
    fn test_custos_staff_pos_sets_pitch() {
        let clef = Clef::new(ClefShape::C, Some(0));
        let mut custos = Custos::new(Pitch::new(PitchName::A, 3), BoundingBox::default());
        custos.set_root_staff_pos(1, &clef);
        assert_eq!(custos.root_staff_pos, Some(1));
        assert_eq!(custos.pitch, Pitch::new(PitchName::D, 4));
    }
}
