//! Neumes and neume components
//!
//! A neume is an ordered list of note heads drawn as one ligature. On a
//! staffed page every component stores its pitch plus its staff-position
//! offset from the first (root) component; on a staffless page components
//! only carry their movement relative to the previous note.

use serde::{Deserialize, Serialize};

use super::clef::Clef;
use super::elements::{BoundingBox, HeadShape, Liquescence, Ornament, OrnamentKind};
use super::pitch::{self, Pitch};
use crate::classify::{NeumeClassifier, NotationStyle};
use crate::errors::{ModelError, Result};

/// Outcome of naming a neume
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// `None` only for a neume without components
    pub typeid: Option<String>,
    pub name: String,
    /// Deepest partial match when the neume is a compound
    pub neume_prefix: Option<String>,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            typeid: None,
            name: "unknown".to_string(),
            neume_prefix: None,
        }
    }

    pub fn matched(typeid: &str, name: &str) -> Self {
        Self {
            typeid: Some(typeid.to_string()),
            name: name.to_string(),
            neume_prefix: None,
        }
    }

    pub fn is_compound(&self) -> bool {
        self.neume_prefix.is_some()
    }
}

/// One note head
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NeumeComponent {
    pub pitch: Option<Pitch>,
    pub head_shape: HeadShape,
    #[serde(default)]
    pub ornaments: Vec<Ornament>,
    /// Staff-position offset from the root component, set once mounted
    pub pitch_diff: Option<i32>,
    /// Movement from the previous component (staffless notation)
    pub relative_pitch: Option<i32>,
}

impl NeumeComponent {
    pub fn new(head_shape: HeadShape) -> Self {
        Self {
            pitch: None,
            head_shape,
            ornaments: Vec::new(),
            pitch_diff: None,
            relative_pitch: None,
        }
    }

    pub fn pitched(pitch: Pitch, head_shape: HeadShape) -> Self {
        Self {
            pitch: Some(pitch),
            ..Self::new(head_shape)
        }
    }

    pub fn has_ornament(&self, kind: OrnamentKind) -> bool {
        self.ornaments.iter().any(|o| o.kind == kind)
    }

    /// Attach an ornament; a second ornament of the same kind is ignored
    pub fn add_ornament(&mut self, ornament: Ornament) -> bool {
        if self.has_ornament(ornament.kind) {
            return false;
        }
        self.ornaments.push(ornament);
        true
    }

    pub fn remove_ornament(&mut self, kind: OrnamentKind) -> bool {
        let before = self.ornaments.len();
        self.ornaments.retain(|o| o.kind != kind);
        self.ornaments.len() != before
    }
}

/// Note data handed over by an import or an insertion from the editor
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteData {
    pub pname: Option<String>,
    pub oct: Option<i32>,
    pub head_shape: Option<String>,
    pub ornaments: Vec<Ornament>,
    pub relative_pitch: Option<i32>,
}

impl NoteData {
    pub fn pitched(pname: &str, oct: i32) -> Self {
        Self {
            pname: Some(pname.to_string()),
            oct: Some(oct),
            ..Self::default()
        }
    }

    pub fn with_head_shape(mut self, shape: &str) -> Self {
        self.head_shape = Some(shape.to_string());
        self
    }

    fn pitch(&self) -> Result<Option<Pitch>> {
        match (&self.pname, self.oct) {
            (Some(pname), Some(oct)) => Ok(Some(Pitch::parse(pname, oct)?)),
            (None, None) => Ok(None),
            _ => Err(ModelError::MissingPitch),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Neume {
    pub id: Option<String>,
    pub components: Vec<NeumeComponent>,
    /// Staff position of the root component, set once mounted
    pub root_staff_pos: Option<i32>,
    pub typeid: Option<String>,
    pub name: Option<String>,
    pub neume_prefix: Option<String>,
    pub modifier: Option<Liquescence>,
    pub zone: BoundingBox,
    pub style: NotationStyle,
}

impl Neume {
    pub fn new(style: NotationStyle) -> Self {
        Self {
            id: None,
            components: Vec::new(),
            root_staff_pos: None,
            typeid: None,
            name: None,
            neume_prefix: None,
            modifier: None,
            zone: BoundingBox::default(),
            style,
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

    pub fn with_modifier(mut self, modifier: Option<Liquescence>) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn add_component(&mut self, nc: NeumeComponent) {
        self.components.push(nc);
    }

    pub fn root_pitch(&self) -> Option<Pitch> {
        self.components.first().and_then(|nc| nc.pitch)
    }

    pub fn pitches(&self) -> Vec<Option<Pitch>> {
        self.components.iter().map(|nc| nc.pitch).collect()
    }

    /// Offsets of every component after the root
    pub fn differences(&self) -> Vec<i32> {
        self.components
            .iter()
            .skip(1)
            .map(|nc| nc.pitch_diff.unwrap_or(0))
            .collect()
    }

    /// Recompute offsets from the stored pitches, without a clef
    pub fn compute_differences(&mut self) -> Result<()> {
        let root = self.root_pitch().ok_or(ModelError::MissingPitch)?;
        let root_steps = root.diatonic_steps();

        if self.components.iter().any(|nc| nc.pitch.is_none()) {
            return Err(ModelError::MissingPitch);
        }

        for nc in &mut self.components {
            if let Some(p) = nc.pitch {
                nc.pitch_diff = Some(p.diatonic_steps() - root_steps);
            }
        }
        Ok(())
    }

    /// Place the neume under `clef`: root staff position from the root pitch,
    /// then every offset from its own pitch
    pub fn mount_under(&mut self, clef: &Clef) -> Result<()> {
        let root = self.root_pitch().ok_or(ModelError::MissingPitch)?;
        if self.components.iter().any(|nc| nc.pitch.is_none()) {
            return Err(ModelError::MissingPitch);
        }

        let root_pos = pitch::pitch_to_position(root, clef);
        self.root_staff_pos = Some(root_pos);
        for nc in &mut self.components {
            if let Some(p) = nc.pitch {
                nc.pitch_diff = Some(pitch::pitch_to_position(p, clef) - root_pos);
            }
        }
        Ok(())
    }

    /// Re-read every component's pitch under `clef` from its stored position.
    /// Returns true when any pitch changed.
    pub fn rederive_pitches(&mut self, clef: &Clef) -> bool {
        let root_pos = match self.root_staff_pos {
            Some(pos) => pos,
            None => return false,
        };

        let mut changed = false;
        for nc in &mut self.components {
            let staff_pos = root_pos + nc.pitch_diff.unwrap_or(0);
            let pitch = Some(pitch::position_to_pitch(staff_pos, clef));
            if nc.pitch != pitch {
                nc.pitch = pitch;
                changed = true;
            }
        }
        changed
    }

    /// Shift the whole neume to a new root position under `clef`
    pub fn set_root_staff_pos(&mut self, staff_pos: i32, clef: &Clef) -> bool {
        if self.root_staff_pos == Some(staff_pos) {
            return false;
        }
        self.root_staff_pos = Some(staff_pos);
        self.rederive_pitches(clef);
        true
    }

    /// Name the neume with its style's classifier and store the result.
    pub fn derive_name(&mut self, enforce_head_shapes: bool) -> Classification {
        let classifier = self.style.classifier();
        let classification = classifier.classify(self);

        self.typeid = classification.typeid.clone();
        self.name = Some(classification.name.clone());
        self.neume_prefix = classification.neume_prefix.clone();

        if enforce_head_shapes {
            classifier.enforce_head_shapes(self);
        }

        classification
    }

    pub fn ulx(&self) -> i32 {
        self.zone.ulx
    }
}

/// Build a classified neume from raw note data.
///
/// Square-note neumes need a pitch on every note; their offsets are filled
/// from the pitches so the name is known before the neume is mounted.
pub fn neume_from_data(
    style: NotationStyle,
    notes: &[NoteData],
    zone: BoundingBox,
    modifier: Option<Liquescence>,
) -> Result<Neume> {
    let mut neume = Neume::new(style).with_zone(zone).with_modifier(modifier);

    for (i, note) in notes.iter().enumerate() {
        let head_shape = match &note.head_shape {
            Some(shape) => shape.parse()?,
            None => HeadShape::Punctum,
        };
        style.check_head_shape(head_shape)?;

        let pitch = note.pitch()?;
        if pitch.is_none() && !style.is_staffless() {
            return Err(ModelError::MissingPitch);
        }

        let mut nc = NeumeComponent::new(head_shape);
        nc.pitch = pitch;
        if style.is_staffless() {
            nc.relative_pitch = Some(if i == 0 { 0 } else { note.relative_pitch.unwrap_or(0) });
        }
        for ornament in &note.ornaments {
            nc.add_ornament(ornament.clone());
        }
        neume.add_component(nc);
    }

    if !style.is_staffless() && !neume.components.is_empty() {
        neume.compute_differences()?;
    }
    neume.derive_name(true);

    Ok(neume)
}
