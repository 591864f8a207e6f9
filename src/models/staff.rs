//! Staff model
//!
//! A staff (system) owns its elements in horizontal reading order and keeps
//! every pitched element consistent with the clef acting on it. Clef edits
//! re-read the sounding pitch of the elements they govern; notated positions
//! never move because of a clef change.

use serde::{Deserialize, Serialize};

use super::clef::{Clef, ClefShape};
use super::elements::{BoundingBox, Custos, Division};
use super::events::{ElementKind, EventQueue, ModelEvent};
use super::neume::Neume;
use super::pitch::{self, Pitch};
use crate::errors::{ModelError, Result};

/// Anything mounted on a staff
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StaffElement {
    Clef(Clef),
    Neume(Neume),
    Division(Division),
    Custos(Custos),
}

impl StaffElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            StaffElement::Clef(_) => ElementKind::Clef,
            StaffElement::Neume(_) => ElementKind::Neume,
            StaffElement::Division(_) => ElementKind::Division,
            StaffElement::Custos(_) => ElementKind::Custos,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            StaffElement::Clef(c) => c.id.as_deref(),
            StaffElement::Neume(n) => n.id.as_deref(),
            StaffElement::Division(d) => d.id.as_deref(),
            StaffElement::Custos(c) => c.id.as_deref(),
        }
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            StaffElement::Clef(c) => c.id = Some(id),
            StaffElement::Neume(n) => n.id = Some(id),
            StaffElement::Division(d) => d.id = Some(id),
            StaffElement::Custos(c) => c.id = Some(id),
        }
    }

    pub fn zone(&self) -> &BoundingBox {
        match self {
            StaffElement::Clef(c) => &c.zone,
            StaffElement::Neume(n) => &n.zone,
            StaffElement::Division(d) => &d.zone,
            StaffElement::Custos(c) => &c.zone,
        }
    }

    pub fn set_zone(&mut self, zone: BoundingBox) {
        match self {
            StaffElement::Clef(c) => c.zone = zone,
            StaffElement::Neume(n) => n.zone = zone,
            StaffElement::Division(d) => d.zone = zone,
            StaffElement::Custos(c) => c.zone = zone,
        }
    }

    pub fn ulx(&self) -> i32 {
        self.zone().ulx
    }

    pub fn as_clef(&self) -> Option<&Clef> {
        match self {
            StaffElement::Clef(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_neume(&self) -> Option<&Neume> {
        match self {
            StaffElement::Neume(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_neume_mut(&mut self) -> Option<&mut Neume> {
        match self {
            StaffElement::Neume(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_custos(&self) -> Option<&Custos> {
        match self {
            StaffElement::Custos(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_clef(&self) -> bool {
        matches!(self, StaffElement::Clef(_))
    }

    pub fn is_neume(&self) -> bool {
        matches!(self, StaffElement::Neume(_))
    }

    pub fn is_custos(&self) -> bool {
        matches!(self, StaffElement::Custos(_))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Option<String>,
    pub order_number: Option<u32>,
    pub zone: BoundingBox,
    /// 0 for staffless notation
    pub num_lines: u32,
    /// Pixels between adjacent staff lines
    pub delta_y: Option<f64>,
    pub elements: Vec<StaffElement>,
    #[serde(skip)]
    events: EventQueue,
}

impl Staff {
    pub fn new(zone: BoundingBox, num_lines: u32) -> Self {
        let mut staff = Self {
            id: None,
            order_number: None,
            zone,
            num_lines,
            delta_y: None,
            elements: Vec::new(),
            events: EventQueue::new(),
        };
        staff.refresh_delta_y();
        staff
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn set_bounding_box(&mut self, bb: [f64; 4]) -> Result<()> {
        self.zone = BoundingBox::from_array(bb)?;
        self.refresh_delta_y();
        Ok(())
    }

    fn refresh_delta_y(&mut self) {
        self.delta_y = if self.num_lines > 1 {
            Some(f64::from((self.zone.lry - self.zone.uly).abs()) / f64::from(self.num_lines - 1))
        } else {
            None
        };
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Staff position of a y coordinate already snapped to a line or space
    pub fn staff_pos_from_y(&self, y: f64) -> Option<i32> {
        let delta_y = self.delta_y?;
        Some(((f64::from(self.zone.uly) - y) / (delta_y / 2.0)).round() as i32)
    }

    pub fn y_from_staff_pos(&self, staff_pos: i32) -> Option<f64> {
        let delta_y = self.delta_y?;
        Some(f64::from(self.zone.uly) - f64::from(staff_pos) * delta_y / 2.0)
    }

    /// Clef staff position for an MEI staff line (1 is the bottom line)
    pub fn staff_pos_from_line(&self, line: i32) -> i32 {
        -(self.num_lines as i32 - line) * 2
    }

    pub fn line_from_staff_pos(&self, staff_pos: i32) -> i32 {
        self.num_lines as i32 + staff_pos / 2
    }

    pub fn width(&self) -> i32 {
        self.zone.width()
    }

    // ------------------------------------------------------------------
    // Element list
    // ------------------------------------------------------------------

    /// Insert keeping reading order; the custos always stays last
    pub fn insert_element(&mut self, element: StaffElement) -> usize {
        let ulx = element.ulx();
        let mut at = self
            .elements
            .iter()
            .position(|e| ulx <= e.ulx())
            .unwrap_or(self.elements.len());

        if !element.is_custos() && self.elements.last().map_or(false, StaffElement::is_custos) {
            at = at.min(self.elements.len() - 1);
        }

        self.elements.insert(at, element);
        at
    }

    /// Append without sorting, for imports that are already in reading order
    pub fn push_element(&mut self, element: StaffElement) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    pub fn remove_element_at(&mut self, index: usize) -> Option<StaffElement> {
        if index >= self.elements.len() {
            return None;
        }
        let element = self.elements.remove(index);
        self.events.push(ModelEvent::Removed {
            kind: element.kind(),
            id: element.id().map(str::to_string),
        });
        Some(element)
    }

    pub fn remove_element_by_id(&mut self, id: &str) -> Option<StaffElement> {
        let index = self.index_of(id)?;
        self.remove_element_at(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == Some(id))
    }

    pub fn get(&self, index: usize) -> Option<&StaffElement> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut StaffElement> {
        self.elements.get_mut(index)
    }

    pub fn neume(&self, index: usize) -> Result<&Neume> {
        self.elements
            .get(index)
            .and_then(StaffElement::as_neume)
            .ok_or_else(|| ModelError::ElementNotFound(format!("neume at index {}", index)))
    }

    pub fn neume_mut(&mut self, index: usize) -> Result<&mut Neume> {
        self.elements
            .get_mut(index)
            .and_then(StaffElement::as_neume_mut)
            .ok_or_else(|| ModelError::ElementNotFound(format!("neume at index {}", index)))
    }

    pub fn clef(&self, index: usize) -> Result<&Clef> {
        self.elements
            .get(index)
            .and_then(StaffElement::as_clef)
            .ok_or_else(|| ModelError::ElementNotFound(format!("clef at index {}", index)))
    }

    fn clef_mut(&mut self, index: usize) -> Result<&mut Clef> {
        match self.elements.get_mut(index) {
            Some(StaffElement::Clef(c)) => Ok(c),
            _ => Err(ModelError::ElementNotFound(format!("clef at index {}", index))),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Nearest clef at or before `index`
    pub fn acting_clef_index(&self, index: usize) -> Option<usize> {
        let end = index.min(self.elements.len().checked_sub(1)?);
        (0..=end).rev().find(|&i| self.elements[i].is_clef())
    }

    /// Rightmost clef that ends left of `x`
    pub fn acting_clef_at(&self, x: i32) -> Option<usize> {
        self.elements
            .iter()
            .rposition(|e| matches!(e, StaffElement::Clef(c) if x > c.zone.lrx))
    }

    pub fn acting_clef(&self, index: usize) -> Option<&Clef> {
        self.acting_clef_index(index)
            .and_then(|i| self.elements[i].as_clef())
    }

    /// Clef acting just before the clef at `clef_index`
    pub fn previous_clef(&self, clef_index: usize) -> Option<usize> {
        if clef_index == 0 || clef_index >= self.elements.len() {
            return None;
        }
        (0..clef_index).rev().find(|&i| self.elements[i].is_clef())
    }

    fn next_clef(&self, index: usize) -> Option<usize> {
        (index + 1..self.elements.len()).find(|&i| self.elements[i].is_clef())
    }

    /// Indices of pitched elements, either all of them or the run governed
    /// by the clef at `clef`
    pub fn pitched_elements(&self, clef: Option<usize>, neumes: bool, custos: bool) -> Vec<usize> {
        let wanted = |e: &StaffElement| (neumes && e.is_neume()) || (custos && e.is_custos());

        match clef {
            Some(ci) => (ci + 1..self.elements.len())
                .take_while(|&i| !self.elements[i].is_clef())
                .filter(|&i| wanted(&self.elements[i]))
                .collect(),
            None => (0..self.elements.len())
                .filter(|&i| wanted(&self.elements[i]))
                .collect(),
        }
    }

    /// True when some neume or the custos sits before every clef
    pub fn has_unclefed_elements(&self) -> bool {
        self.pitched_elements(None, true, true)
            .into_iter()
            .any(|i| self.acting_clef_index(i).is_none())
    }

    pub fn first_neume_index(&self) -> Option<usize> {
        self.elements.iter().position(StaffElement::is_neume)
    }

    /// Root pitch of the first neume, which the previous staff's custos mirrors
    pub fn first_neume_pitch(&self) -> Option<Pitch> {
        self.first_neume_index()
            .and_then(|i| self.elements[i].as_neume())
            .and_then(Neume::root_pitch)
    }

    pub fn custos_index(&self) -> Option<usize> {
        match self.elements.last() {
            Some(StaffElement::Custos(_)) => Some(self.elements.len() - 1),
            _ => None,
        }
    }

    pub fn custos(&self) -> Option<&Custos> {
        self.elements.last().and_then(StaffElement::as_custos)
    }

    pub fn neumes(&self) -> impl Iterator<Item = &Neume> {
        self.elements.iter().filter_map(StaffElement::as_neume)
    }

    pub fn clefs(&self) -> impl Iterator<Item = &Clef> {
        self.elements.iter().filter_map(StaffElement::as_clef)
    }

    // ------------------------------------------------------------------
    // Mounting
    // ------------------------------------------------------------------

    /// Mount a clef and re-read the pitches it now governs
    pub fn add_clef(&mut self, clef: Clef, just_push: bool) -> usize {
        let index = self.mount(StaffElement::Clef(clef), just_push);
        self.update_pitched_elements(Some(index), true, false);
        index
    }

    /// Mount a neume, computing its root position and offsets under the
    /// acting clef. Staffless neumes need no clef.
    pub fn add_neume(&mut self, mut neume: Neume, just_push: bool) -> Result<usize> {
        if !neume.style.is_staffless() {
            let ci = self.acting_clef_at(neume.ulx()).ok_or(ModelError::NoGoverningClef)?;
            neume.mount_under(self.clef(ci)?)?;
        }
        neume.derive_name(true);

        log::debug!(
            "mounting {} at x={} (root staff pos {:?})",
            neume.typeid.as_deref().unwrap_or("unknown"),
            neume.ulx(),
            neume.root_staff_pos
        );
        Ok(self.mount(StaffElement::Neume(neume), just_push))
    }

    /// Mount an already-positioned neume at a new root staff position,
    /// keeping its offsets and re-reading its pitches
    pub fn place_neume(&mut self, mut neume: Neume, root_staff_pos: i32) -> Result<usize> {
        if !neume.style.is_staffless() {
            let ci = self.acting_clef_at(neume.ulx()).ok_or(ModelError::NoGoverningClef)?;
            let clef = self.clef(ci)?;
            neume.root_staff_pos = None;
            neume.set_root_staff_pos(root_staff_pos, clef);
        }
        neume.derive_name(true);
        Ok(self.mount(StaffElement::Neume(neume), false))
    }

    pub fn add_division(&mut self, division: Division, just_push: bool) -> usize {
        self.mount(StaffElement::Division(division), just_push)
    }

    /// Mount the custos at the end of the staff, replacing any existing one
    pub fn set_custos(&mut self, mut custos: Custos) -> Result<usize> {
        let ci = self.acting_clef_at(custos.zone.ulx).ok_or(ModelError::NoGoverningClef)?;
        custos.root_staff_pos = Some(pitch::pitch_to_position(custos.pitch, self.clef(ci)?));

        let event = ModelEvent::CustosChanged {
            id: custos.id.clone(),
            pitch: custos.pitch,
            staff_pos: custos.root_staff_pos,
        };
        match self.custos_index() {
            Some(last) => self.elements[last] = StaffElement::Custos(custos),
            None => self.elements.push(StaffElement::Custos(custos)),
        }
        self.events.push(event);
        Ok(self.elements.len() - 1)
    }

    pub fn remove_custos(&mut self) -> Option<Custos> {
        let index = self.custos_index()?;
        match self.remove_element_at(index) {
            Some(StaffElement::Custos(custos)) => Some(custos),
            _ => None,
        }
    }

    /// Give the custos a new pitch and place it under its acting clef
    pub fn update_custos_pitch(&mut self, pitch: Pitch) -> Result<()> {
        let index = self
            .custos_index()
            .ok_or_else(|| ModelError::ElementNotFound("custos".to_string()))?;
        let ci = self.acting_clef_index(index).ok_or(ModelError::NoGoverningClef)?;
        let staff_pos = pitch::pitch_to_position(pitch, self.clef(ci)?);

        if let StaffElement::Custos(custos) = &mut self.elements[index] {
            custos.set_root_note(pitch);
            custos.root_staff_pos = Some(staff_pos);
            let event = ModelEvent::CustosChanged {
                id: custos.id.clone(),
                pitch,
                staff_pos: Some(staff_pos),
            };
            self.events.push(event);
        }
        Ok(())
    }

    /// Move the custos to `staff_pos`; its pitch follows the acting clef
    pub fn move_custos(&mut self, staff_pos: i32) -> Result<Pitch> {
        let index = self
            .custos_index()
            .ok_or_else(|| ModelError::ElementNotFound("custos".to_string()))?;
        let ci = self.acting_clef_index(index).ok_or(ModelError::NoGoverningClef)?;
        let clef = self.clef(ci)?.clone();

        match &mut self.elements[index] {
            StaffElement::Custos(custos) => {
                custos.set_root_staff_pos(staff_pos, &clef);
                let event = ModelEvent::CustosChanged {
                    id: custos.id.clone(),
                    pitch: custos.pitch,
                    staff_pos: Some(staff_pos),
                };
                let pitch = custos.pitch;
                self.events.push(event);
                Ok(pitch)
            }
            _ => Err(ModelError::ElementNotFound("custos".to_string())),
        }
    }

    fn mount(&mut self, element: StaffElement, just_push: bool) -> usize {
        let kind = element.kind();
        let id = element.id().map(str::to_string);
        let index = if just_push {
            self.push_element(element)
        } else {
            self.insert_element(element)
        };
        self.events.push(ModelEvent::Mounted { kind, id, index });
        index
    }

    // ------------------------------------------------------------------
    // Clef edits
    // ------------------------------------------------------------------

    /// Retype a clef; returns false when the shape is unchanged
    pub fn set_clef_shape(&mut self, index: usize, shape: ClefShape) -> Result<bool> {
        let clef = self.clef_mut(index)?;
        if clef.shape == shape {
            return Ok(false);
        }
        clef.shape = shape;
        let event = clef_changed(clef);

        self.events.push(event);
        self.update_pitched_elements(Some(index), true, false);
        Ok(true)
    }

    /// Move a clef vertically; returns false when the position is unchanged
    pub fn set_clef_staff_pos(&mut self, index: usize, staff_pos: i32) -> Result<bool> {
        let clef = self.clef_mut(index)?;
        if clef.staff_pos == staff_pos {
            return Ok(false);
        }
        clef.staff_pos = staff_pos;
        let event = clef_changed(clef);

        self.events.push(event);
        self.update_pitched_elements(Some(index), true, false);
        Ok(true)
    }

    /// Remove a clef and hand its region back to the previous clef.
    /// The first clef of a staff cannot be deleted.
    pub fn delete_clef(&mut self, index: usize) -> Result<(Clef, usize)> {
        self.clef(index)?;
        let previous = self.previous_clef(index).ok_or(ModelError::FirstClefDeletion)?;

        let clef = match self.remove_element_at(index) {
            Some(StaffElement::Clef(clef)) => clef,
            _ => return Err(ModelError::ElementNotFound(format!("clef at index {}", index))),
        };
        self.update_pitched_elements(Some(previous), true, false);
        Ok((clef, previous))
    }

    /// Re-sort an element whose zone changed; returns its new index
    pub fn reposition(&mut self, index: usize, zone: BoundingBox) -> Result<usize> {
        let mut element = self
            .elements
            .get(index)
            .cloned()
            .ok_or_else(|| ModelError::ElementNotFound(format!("element at index {}", index)))?;
        if element.zone().ulx == zone.ulx {
            if let Some(e) = self.elements.get_mut(index) {
                e.set_zone(zone);
            }
            return Ok(index);
        }

        self.elements.remove(index);
        element.set_zone(zone);
        Ok(self.insert_element(element))
    }

    // ------------------------------------------------------------------
    // Pitch re-derivation
    // ------------------------------------------------------------------

    /// Re-read pitches from stored positions.
    ///
    /// With a clef index only the run up to the next clef is touched;
    /// otherwise the whole staff is walked, tracking the clef in effect.
    /// With `custos` false the custos keeps its pitch and is moved instead.
    pub fn update_pitched_elements(&mut self, clef: Option<usize>, neumes: bool, custos: bool) {
        match clef {
            Some(ci) => {
                let clef = match self.elements.get(ci) {
                    Some(StaffElement::Clef(c)) => c.clone(),
                    _ => return,
                };
                let end = self.next_clef(ci).unwrap_or(self.elements.len());
                for i in ci + 1..end {
                    self.update_element_pitch(i, &clef, neumes, custos);
                }
            }
            None => {
                let mut current: Option<Clef> = None;
                for i in 0..self.elements.len() {
                    if let StaffElement::Clef(c) = &self.elements[i] {
                        current = Some(c.clone());
                    } else if let Some(clef) = &current {
                        self.update_element_pitch(i, clef, neumes, custos);
                    }
                }
            }
        }
    }

    fn update_element_pitch(&mut self, index: usize, clef: &Clef, neumes: bool, custos: bool) {
        let event = match &mut self.elements[index] {
            StaffElement::Neume(neume) if neumes => {
                if neume.rederive_pitches(clef) {
                    Some(ModelEvent::PitchChanged {
                        id: neume.id.clone(),
                        index,
                        pitches: neume.pitches(),
                    })
                } else {
                    None
                }
            }
            StaffElement::Custos(c) => {
                let changed = if custos {
                    match c.root_staff_pos {
                        Some(pos) => {
                            let pitch = pitch::position_to_pitch(pos, clef);
                            let changed = pitch != c.pitch;
                            c.pitch = pitch;
                            changed
                        }
                        None => false,
                    }
                } else {
                    let pos = Some(pitch::pitch_to_position(c.pitch, clef));
                    let changed = pos != c.root_staff_pos;
                    c.root_staff_pos = pos;
                    changed
                };

                if changed {
                    Some(ModelEvent::CustosChanged {
                        id: c.id.clone(),
                        pitch: c.pitch,
                        staff_pos: c.root_staff_pos,
                    })
                } else {
                    None
                }
            }
            _ => None,
        };

        if let Some(event) = event {
            self.events.push(event);
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn take_events(&mut self) -> Vec<ModelEvent> {
        self.events.take()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn push_event(&mut self, event: ModelEvent) {
        self.events.push(event);
    }
}

fn clef_changed(clef: &Clef) -> ModelEvent {
    ModelEvent::ClefChanged {
        id: clef.id.clone(),
        shape: clef.shape,
        staff_pos: clef.staff_pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::NotationStyle;
    use crate::models::elements::DivisionKind;
    use crate::models::neume::{neume_from_data, NoteData};
    use crate::models::pitch::PitchName;

    fn bb(ulx: i32, lrx: i32) -> BoundingBox {
        BoundingBox::new(f64::from(ulx), 100.0, f64::from(lrx), 120.0).unwrap()
    }

    fn staff() -> Staff {
        Staff::new(BoundingBox::new(0.0, 100.0, 1000.0, 160.0).unwrap(), 4)
    }

    fn clef_at(shape: ClefShape, staff_pos: i32, ulx: i32) -> Clef {
        Clef::new(shape, Some(staff_pos)).with_zone(bb(ulx, ulx + 20))
    }

    fn neume_at(pitches: &[(&str, i32)], ulx: i32) -> Neume {
        let notes: Vec<NoteData> = pitches.iter().map(|(p, o)| NoteData::pitched(p, *o)).collect();
        neume_from_data(NotationStyle::SquareNote, &notes, bb(ulx, ulx + 20), None).unwrap()
    }

    #[test]
    fn test_geometry() {
        let s = staff();
        assert_eq!(s.delta_y, Some(20.0));
        assert_eq!(s.staff_pos_from_y(100.0), Some(0));
        assert_eq!(s.staff_pos_from_y(160.0), Some(-6));
        assert_eq!(s.y_from_staff_pos(-3), Some(130.0));
        assert_eq!(s.staff_pos_from_line(4), 0);
        assert_eq!(s.staff_pos_from_line(2), -4);
        assert_eq!(s.line_from_staff_pos(-4), 2);

        let staffless = Staff::new(BoundingBox::default(), 0);
        assert_eq!(staffless.delta_y, None);
        assert_eq!(staffless.staff_pos_from_y(10.0), None);
    }

    #[test]
    fn test_insert_keeps_reading_order_and_custos_last() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.add_neume(neume_at(&[("c", 4)], 200), false).unwrap();
        s.set_custos(Custos::new(Pitch::new(PitchName::D, 4), bb(900, 910))).unwrap();

        // lands right of everything but must stay before the custos
        let i = s.add_neume(neume_at(&[("e", 4)], 950), false).unwrap();
        assert_eq!(i, 2);
        let i = s.add_neume(neume_at(&[("e", 4)], 100), false).unwrap();
        assert_eq!(i, 1);
        assert!(s.elements.last().unwrap().is_custos());
    }

    #[test]
    fn test_neume_needs_a_clef() {
        let mut s = staff();
        assert_eq!(
            s.add_neume(neume_at(&[("c", 4)], 200), false),
            Err(ModelError::NoGoverningClef)
        );

        // a neume overlapping the clef is not governed by it
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        assert_eq!(
            s.add_neume(neume_at(&[("c", 4)], 25), false),
            Err(ModelError::NoGoverningClef)
        );
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_mount_sets_root_invariant() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        let i = s.add_neume(neume_at(&[("a", 3), ("e", 4), ("c", 4)], 200), false).unwrap();

        let n = s.neume(i).unwrap();
        assert_eq!(n.root_staff_pos, Some(-2));
        assert_eq!(n.components[0].pitch_diff, Some(0));
        assert_eq!(n.differences(), vec![4, 2]);
        assert_eq!(n.typeid.as_deref(), Some("torculus"));
    }

    #[test]
    fn test_clef_shape_change_rereads_pitches() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        let i = s.add_neume(neume_at(&[("a", 3)], 200), false).unwrap();

        assert!(s.set_clef_shape(0, ClefShape::F).unwrap());
        let n = s.neume(i).unwrap();
        assert_eq!(n.root_pitch(), Some(Pitch::new(PitchName::D, 3)));
        assert_eq!(n.root_staff_pos, Some(-2));

        assert!(!s.set_clef_shape(0, ClefShape::F).unwrap());
    }

    #[test]
    fn test_clef_move_only_touches_its_region() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.add_neume(neume_at(&[("c", 4)], 100), false).unwrap();
        s.add_clef(clef_at(ClefShape::C, 0, 300), false);
        let after = s.add_neume(neume_at(&[("c", 4)], 400), false).unwrap();

        assert!(s.set_clef_staff_pos(2, -2).unwrap());
        assert_eq!(s.neume(1).unwrap().root_pitch(), Some(Pitch::new(PitchName::C, 4)));
        assert_eq!(s.neume(after).unwrap().root_pitch(), Some(Pitch::new(PitchName::E, 4)));
    }

    #[test]
    fn test_inserted_clef_takes_over_following_neumes() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        let i = s.add_neume(neume_at(&[("c", 4)], 400), false).unwrap();
        assert_eq!(i, 1);

        s.add_clef(clef_at(ClefShape::F, 0, 300), false);
        assert_eq!(s.neume(2).unwrap().root_pitch(), Some(Pitch::new(PitchName::F, 3)));
    }

    #[test]
    fn test_delete_clef_restores_previous() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.add_clef(clef_at(ClefShape::F, 0, 300), false);
        s.add_neume(neume_at(&[("f", 3)], 400), false).unwrap();

        let (clef, previous) = s.delete_clef(1).unwrap();
        assert_eq!(clef.shape, ClefShape::F);
        assert_eq!(previous, 0);
        // position 0 under the c clef
        assert_eq!(s.neume(1).unwrap().root_pitch(), Some(Pitch::new(PitchName::C, 4)));
    }

    #[test]
    fn test_first_clef_cannot_be_deleted() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.add_neume(neume_at(&[("c", 4)], 100), false).unwrap();
        let before = s.clone();

        assert_eq!(s.delete_clef(0), Err(ModelError::FirstClefDeletion));
        assert_eq!(s.elements, before.elements);
    }

    #[test]
    fn test_acting_clef_lookups() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.add_division(Division::new(DivisionKind::Minor, bb(150, 155)), false);
        s.add_clef(clef_at(ClefShape::F, 2, 300), false);

        assert_eq!(s.acting_clef_index(1), Some(0));
        assert_eq!(s.acting_clef_index(2), Some(2));
        assert_eq!(s.acting_clef_at(200), Some(0));
        assert_eq!(s.acting_clef_at(330), Some(2));
        assert_eq!(s.acting_clef_at(320), Some(0));
        assert_eq!(s.acting_clef_at(5), None);
        assert_eq!(s.previous_clef(2), Some(0));
        assert_eq!(s.previous_clef(0), None);
    }

    #[test]
    fn test_pitched_elements_under_clef() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.add_neume(neume_at(&[("c", 4)], 100), false).unwrap();
        s.add_clef(clef_at(ClefShape::C, 0, 300), false);
        s.add_neume(neume_at(&[("c", 4)], 400), false).unwrap();
        s.set_custos(Custos::new(Pitch::new(PitchName::D, 4), bb(900, 910))).unwrap();

        assert_eq!(s.pitched_elements(Some(0), true, true), vec![1]);
        assert_eq!(s.pitched_elements(Some(2), true, true), vec![3, 4]);
        assert_eq!(s.pitched_elements(Some(2), true, false), vec![3]);
        assert_eq!(s.pitched_elements(None, true, false), vec![1, 3]);
    }

    #[test]
    fn test_custos_keeps_pitch_when_clef_changes() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.set_custos(Custos::new(Pitch::new(PitchName::D, 4), bb(900, 910))).unwrap();
        assert_eq!(s.custos().unwrap().root_staff_pos, Some(1));

        s.set_clef_staff_pos(0, -2).unwrap();
        let custos = s.custos().unwrap();
        assert_eq!(custos.pitch, Pitch::new(PitchName::D, 4));
        assert_eq!(custos.root_staff_pos, Some(-1));
    }

    #[test]
    fn test_set_custos_replaces_existing() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.set_custos(Custos::new(Pitch::new(PitchName::D, 4), bb(900, 910))).unwrap();
        let i = s.set_custos(Custos::new(Pitch::new(PitchName::E, 4), bb(905, 915))).unwrap();

        assert_eq!(i, 1);
        assert_eq!(s.len(), 2);
        assert_eq!(s.custos().unwrap().pitch, Pitch::new(PitchName::E, 4));
    }

    #[test]
    fn test_move_custos_reads_pitch_from_position() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.set_custos(Custos::new(Pitch::new(PitchName::D, 4), bb(900, 910))).unwrap();

        assert_eq!(s.move_custos(-1).unwrap(), Pitch::new(PitchName::B, 3));
        assert_eq!(s.remove_custos().unwrap().pitch, Pitch::new(PitchName::B, 3));
        assert!(s.custos().is_none());
    }

    #[test]
    fn test_events_are_queued() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.add_neume(neume_at(&[("a", 3)], 200), false).unwrap();
        s.take_events();

        s.set_clef_shape(0, ClefShape::F).unwrap();
        let events = s.take_events();
        assert!(matches!(events[0], ModelEvent::ClefChanged { shape: ClefShape::F, .. }));
        assert!(matches!(events[1], ModelEvent::PitchChanged { index: 1, .. }));
        assert_eq!(s.pending_events(), 0);
    }

    #[test]
    fn test_reposition_resorts() {
        let mut s = staff();
        s.add_clef(clef_at(ClefShape::C, 0, 10), false);
        s.add_division(Division::new(DivisionKind::Small, bb(100, 105)), false);
        s.add_division(Division::new(DivisionKind::Major, bb(200, 205)), false);

        let i = s.reposition(1, bb(300, 305)).unwrap();
        assert_eq!(i, 2);
        assert_eq!(s.get(2).unwrap().ulx(), 300);
    }
}
