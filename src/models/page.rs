//! Page model and editing operations
//!
//! A page is the ordered list of staves of one manuscript image. Every edit
//! is applied here synchronously and returns the backend requests that
//! mirror it. Edits that change the first sounding pitch of a staff also
//! retune the custos at the end of the staff before it.

use serde::{Deserialize, Serialize};

use super::clef::{Clef, ClefShape};
use super::elements::{BoundingBox, Custos, Division, DivisionKind, HeadShape, Liquescence, Ornament, OrnamentKind};
use super::events::PageEvent;
use super::neume::Neume;
use super::pitch::Pitch;
use super::staff::{Staff, StaffElement};
use crate::classify::NotationStyle;
use crate::config::EditorConfig;
use crate::errors::{ModelError, Result};
use crate::sync::{PitchInfo, SyncRequest};

/// Result of one page edit
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub staff: usize,
    /// Index of the created or moved element, when there is one
    pub index: Option<usize>,
    pub sync: Vec<SyncRequest>,
}

impl EditOutcome {
    fn new(staff: usize, index: Option<usize>, sync: Vec<SyncRequest>) -> Self {
        Self { staff, index, sync }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: Option<String>,
    pub config: EditorConfig,
    pub staves: Vec<Staff>,
}

impl Page {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            id: None,
            config,
            staves: Vec::new(),
        }
    }

    pub fn style(&self) -> NotationStyle {
        self.config.style
    }

    pub fn add_staff(&mut self, mut staff: Staff) -> usize {
        staff.order_number = Some(self.staves.len() as u32 + 1);
        self.staves.push(staff);
        self.staves.len() - 1
    }

    pub fn staff(&self, index: usize) -> Result<&Staff> {
        self.staves.get(index).ok_or(ModelError::StaffNotFound(index))
    }

    pub fn staff_mut(&mut self, index: usize) -> Result<&mut Staff> {
        self.staves.get_mut(index).ok_or(ModelError::StaffNotFound(index))
    }

    pub fn previous_staff(&self, index: usize) -> Option<usize> {
        index.checked_sub(1).filter(|&i| i < self.staves.len())
    }

    pub fn next_staff(&self, index: usize) -> Option<usize> {
        Some(index + 1).filter(|&i| i < self.staves.len())
    }

    /// Staff whose band contains `y`; bands split halfway between staves
    pub fn closest_staff(&self, y: f64) -> Option<usize> {
        let last = self.staves.len().checked_sub(1)?;
        let found = self.staves.windows(2).position(|pair| {
            let gap = f64::from(pair[1].zone.uly - pair[0].zone.lry);
            y < f64::from(pair[0].zone.lry) + gap / 2.0
        });
        Some(found.unwrap_or(last))
    }

    /// Locate an element by id as `(staff, index)`
    pub fn find_element(&self, id: &str) -> Option<(usize, usize)> {
        self.staves
            .iter()
            .enumerate()
            .find_map(|(s, staff)| staff.index_of(id).map(|i| (s, i)))
    }

    /// Record the id the backend generated for a new element
    pub fn assign_id(&mut self, staff: usize, index: usize, id: impl Into<String>) -> Result<()> {
        let element = self
            .staff_mut(staff)?
            .get_mut(index)
            .ok_or_else(|| ModelError::ElementNotFound(format!("element at index {}", index)))?;
        element.set_id(id.into());
        Ok(())
    }

    /// Drain the queued change notifications of every staff
    pub fn take_events(&mut self) -> Vec<PageEvent> {
        self.staves
            .iter_mut()
            .enumerate()
            .flat_map(|(s, staff)| {
                staff
                    .take_events()
                    .into_iter()
                    .map(move |event| PageEvent { staff: s, event })
            })
            .collect()
    }

    /// Id the backend inserts in front of: the next element, else the next staff
    fn before_id(&self, staff: usize, index: usize) -> Option<String> {
        let next = self
            .staves
            .get(staff)
            .and_then(|s| s.get(index + 1))
            .and_then(|e| e.id().map(str::to_string));
        next.or_else(|| {
            self.next_staff(staff)
                .and_then(|n| self.staves[n].id.clone())
        })
    }

    fn require_staves(&self) -> Result<()> {
        if self.style().is_staffless() {
            return Err(ModelError::InvalidValue {
                what: "operation for staffless notation".to_string(),
                value: "clef".to_string(),
            });
        }
        Ok(())
    }

    fn first_pitch(&self, staff: usize) -> Option<Pitch> {
        self.staves.get(staff).and_then(Staff::first_neume_pitch)
    }

    // ------------------------------------------------------------------
    // Clefs
    // ------------------------------------------------------------------

    pub fn insert_clef(
        &mut self,
        staff: usize,
        shape: ClefShape,
        staff_pos: Option<i32>,
        zone: BoundingBox,
    ) -> Result<EditOutcome> {
        self.require_staves()?;
        let before = self.first_pitch(staff);

        let st = self.staff_mut(staff)?;
        let clef = Clef::new(shape, staff_pos).with_zone(zone);
        let line = st.line_from_staff_pos(clef.staff_pos);
        let index = st.add_clef(clef, false);

        let (pitch_info, custos_moves) = pitch_report(self.staff(staff)?, Some(index));
        let mut sync = vec![SyncRequest::InsertClef {
            shape,
            line,
            zone,
            before_id: self.before_id(staff, index),
            pitch_info,
        }];
        sync.extend(custos_moves);
        self.sync_previous_custos(staff, before, true, &mut sync);

        Ok(EditOutcome::new(staff, Some(index), sync))
    }

    /// Drag a clef to a new staff position and box
    pub fn move_clef(&mut self, staff: usize, index: usize, staff_pos: i32, zone: BoundingBox) -> Result<EditOutcome> {
        self.require_staves()?;
        let before = self.first_pitch(staff);

        let st = self.staff_mut(staff)?;
        st.clef(index)?;
        let mut trial = st.clone();
        trial.reposition(index, zone)?;
        if trial.has_unclefed_elements() {
            return Err(ModelError::NoGoverningClef);
        }
        let moved_to = st.reposition(index, zone)?;
        st.set_clef_staff_pos(moved_to, staff_pos)?;
        let reordered = moved_to != index;
        if reordered {
            st.update_pitched_elements(None, true, false);
        }
        let line = st.line_from_staff_pos(staff_pos);
        let id = st.clef(moved_to)?.id.clone();

        let region = if reordered { None } else { Some(moved_to) };
        let (pitch_info, custos_moves) = pitch_report(self.staff(staff)?, region);
        let mut sync = vec![SyncRequest::MoveClef { id, line, zone, pitch_info }];
        sync.extend(custos_moves);
        self.sync_previous_custos(staff, before, true, &mut sync);

        Ok(EditOutcome::new(staff, Some(moved_to), sync))
    }

    pub fn change_clef_shape(&mut self, staff: usize, index: usize, shape: ClefShape) -> Result<EditOutcome> {
        self.require_staves()?;
        let before = self.first_pitch(staff);

        let st = self.staff_mut(staff)?;
        if !st.set_clef_shape(index, shape)? {
            return Ok(EditOutcome::new(staff, Some(index), Vec::new()));
        }
        let clef = st.clef(index)?;
        let (id, zone) = (clef.id.clone(), clef.zone);

        let (pitch_info, custos_moves) = pitch_report(self.staff(staff)?, Some(index));
        let mut sync = vec![SyncRequest::UpdateClefShape { id, shape, zone, pitch_info }];
        sync.extend(custos_moves);
        self.sync_previous_custos(staff, before, true, &mut sync);

        Ok(EditOutcome::new(staff, Some(index), sync))
    }

    /// Delete a clef; its region is re-read under the clef before it
    pub fn delete_clef(&mut self, staff: usize, index: usize) -> Result<EditOutcome> {
        let before = self.first_pitch(staff);

        let (clef, previous) = self.staff_mut(staff)?.delete_clef(index)?;

        let (pitch_info, custos_moves) = pitch_report(self.staff(staff)?, Some(previous));
        let mut sync = vec![SyncRequest::DeleteClef {
            ids: clef.id.into_iter().collect(),
            pitch_info,
        }];
        sync.extend(custos_moves);
        self.sync_previous_custos(staff, before, true, &mut sync);

        Ok(EditOutcome::new(staff, None, sync))
    }

    // ------------------------------------------------------------------
    // Neumes
    // ------------------------------------------------------------------

    /// Mount and classify a new neume
    pub fn insert_neume(&mut self, staff: usize, neume: Neume) -> Result<EditOutcome> {
        self.check_style(&neume)?;
        let before = self.first_pitch(staff);

        let index = self.staff_mut(staff)?.add_neume(neume, false)?;

        let n = self.staff(staff)?.neume(index)?;
        let dot_form = n
            .components
            .first()
            .and_then(|nc| nc.ornaments.iter().find(|o| o.kind == OrnamentKind::Dot))
            .map(|o| o.form.clone());
        let request = SyncRequest::InsertNeume {
            typeid: n.typeid.clone(),
            pitches: n.pitches().into_iter().flatten().collect(),
            head_shapes: head_shapes(n),
            dot_form,
            zone: n.zone,
            before_id: self.before_id(staff, index),
        };

        let mut sync = vec![request];
        self.sync_previous_custos(staff, before, true, &mut sync);
        Ok(EditOutcome::new(staff, Some(index), sync))
    }

    /// Move a neume to a new box, optionally a new root staff position and
    /// another staff. Offsets between its notes are kept.
    pub fn move_neume(
        &mut self,
        staff: usize,
        index: usize,
        target: usize,
        root_staff_pos: Option<i32>,
        zone: BoundingBox,
    ) -> Result<EditOutcome> {
        let old_root = self.staff(staff)?.neume(index)?.root_staff_pos;
        let target_staff = self.staff(target)?;
        let staffless = self.style().is_staffless();

        let new_root = match root_staff_pos.or(old_root) {
            Some(pos) => Some(pos),
            None if staffless => None,
            None => return Err(ModelError::MissingPitch),
        };
        if !staffless && target_staff.acting_clef_at(zone.ulx).is_none() {
            return Err(ModelError::NoGoverningClef);
        }

        let before_source = self.first_pitch(staff);
        let before_target = self.first_pitch(target);

        let mut neume = match self.staff_mut(staff)?.remove_element_at(index) {
            Some(StaffElement::Neume(neume)) => neume,
            _ => return Err(ModelError::ElementNotFound(format!("neume at index {}", index))),
        };
        neume.zone = zone;

        let new_index = match new_root {
            Some(pos) => self.staff_mut(target)?.place_neume(neume, pos)?,
            None => self.staff_mut(target)?.add_neume(neume, false)?,
        };

        let n = self.staff(target)?.neume(new_index)?;
        let pitch_shift = new_root != old_root || target != staff;
        let request = SyncRequest::MoveNeume {
            id: n.id.clone(),
            pitch_info: if pitch_shift {
                Some(n.pitches().into_iter().flatten().collect())
            } else {
                None
            },
            zone,
            before_id: self.before_id(target, new_index),
        };

        let mut sync = vec![request];
        self.sync_previous_custos(staff, before_source, true, &mut sync);
        if target != staff {
            self.sync_previous_custos(target, before_target, true, &mut sync);
        }
        Ok(EditOutcome::new(target, Some(new_index), sync))
    }

    /// Delete a neume. Removing the only neume of a staff removes the
    /// previous staff's custos; removing the first one retunes it.
    pub fn delete_neume(&mut self, staff: usize, index: usize) -> Result<EditOutcome> {
        self.staff(staff)?.neume(index)?;
        let before = self.first_pitch(staff);

        let removed = self.staff_mut(staff)?.remove_element_at(index);
        let ids = removed
            .as_ref()
            .and_then(|e| e.id().map(str::to_string))
            .into_iter()
            .collect();

        let mut sync = vec![SyncRequest::DeleteNeume { ids }];
        self.sync_previous_custos(staff, before, false, &mut sync);
        Ok(EditOutcome::new(staff, None, sync))
    }

    /// Merge neumes of one staff, in reading order, into a single neume
    pub fn neumify(&mut self, staff: usize, indices: &[usize], modifier: Option<Liquescence>) -> Result<EditOutcome> {
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();
        if indices.len() < 2 {
            return Err(ModelError::NeumifyTooFew(indices.len()));
        }

        let st = self.staff(staff)?;
        let mut neumes = indices
            .iter()
            .map(|&i| st.neume(i).cloned())
            .collect::<Result<Vec<Neume>>>()?;
        neumes.sort_by_key(Neume::ulx);

        let components: Vec<_> = neumes.iter().flat_map(|n| n.components.iter().cloned()).collect();
        let ulx = neumes.iter().map(|n| n.zone.ulx).min().unwrap_or_default();
        let zone = BoundingBox {
            ulx,
            uly: neumes.iter().map(|n| n.zone.uly).min().unwrap_or_default(),
            lrx: ulx + components.len() as i32 * self.config.punct_width,
            lry: neumes.iter().map(|n| n.zone.lry).max().unwrap_or_default(),
        };
        if !self.style().is_staffless() && st.acting_clef_at(ulx).is_none() {
            return Err(ModelError::NoGoverningClef);
        }
        let nids: Vec<String> = neumes.iter().filter_map(|n| n.id.clone()).collect();

        let mut merged = Neume::new(self.style()).with_zone(zone).with_modifier(modifier);
        merged.components = components;
        if let Some(root) = merged.components.first_mut() {
            root.relative_pitch = root.relative_pitch.map(|_| 0);
        }

        let before = self.first_pitch(staff);
        let st = self.staff_mut(staff)?;
        for &i in indices.iter().rev() {
            st.remove_element_at(i);
        }
        let index = st.add_neume(merged, false)?;

        let n = self.staff(staff)?.neume(index)?;
        log::debug!("neumified {} neumes into {:?}", indices.len(), n.typeid);
        let mut sync = vec![SyncRequest::Neumify {
            nids,
            typeid: n.typeid.clone(),
            head_shapes: head_shapes(n),
            zone,
        }];
        self.sync_previous_custos(staff, before, true, &mut sync);
        Ok(EditOutcome::new(staff, Some(index), sync))
    }

    /// Split every multi-note neume among `indices` into single puncta
    pub fn ungroup(&mut self, staff: usize, indices: &[usize]) -> Result<EditOutcome> {
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();

        let st = self.staff(staff)?;
        let mut groups = Vec::new();
        for &i in &indices {
            let neume = st.neume(i)?;
            if neume.components.len() > 1 {
                groups.push((i, neume.clone()));
            }
        }
        if groups.is_empty() {
            return Ok(EditOutcome::new(staff, None, Vec::new()));
        }

        let (pw, ph) = (self.config.punct_width, self.config.punct_height);
        let mut nids = Vec::new();
        let mut bbs = Vec::new();
        let mut puncta = Vec::new();
        for (_, neume) in &groups {
            nids.extend(neume.id.clone());
            let root = neume.root_staff_pos.unwrap_or(0);
            let mut boxes = Vec::new();

            for (i, nc) in neume.components.iter().enumerate() {
                let uly = match st.y_from_staff_pos(root + nc.pitch_diff.unwrap_or(0)) {
                    Some(y) => y.round() as i32 - ph / 2,
                    None => neume.zone.uly,
                };
                let ulx = neume.zone.ulx + i as i32 * pw;
                let zone = BoundingBox { ulx, uly, lrx: ulx + pw, lry: uly + ph };

                let mut component = nc.clone();
                component.relative_pitch = component.relative_pitch.map(|_| 0);
                component.pitch_diff = component.pitch_diff.map(|_| 0);
                let mut punctum = Neume::new(neume.style).with_zone(zone);
                punctum.add_component(component);

                // each punctum keeps the staff position it was notated at
                let staff_pos = neume.root_staff_pos.map(|r| r + nc.pitch_diff.unwrap_or(0));
                boxes.push(zone);
                puncta.push((punctum, staff_pos));
            }
            bbs.push(boxes);
        }

        let before = self.first_pitch(staff);
        let st = self.staff_mut(staff)?;
        for (i, _) in groups.iter().rev() {
            st.remove_element_at(*i);
        }
        let mut first = None;
        for (punctum, staff_pos) in puncta {
            let index = match staff_pos {
                Some(pos) => st.place_neume(punctum, pos)?,
                None => st.add_neume(punctum, false)?,
            };
            first = Some(first.map_or(index, |f: usize| f.min(index)));
        }

        let mut sync = vec![SyncRequest::Ungroup { nids, bbs }];
        self.sync_previous_custos(staff, before, true, &mut sync);
        Ok(EditOutcome::new(staff, first, sync))
    }

    /// Change the head shape of the first note; the name is re-derived
    /// without forcing head shapes on the other notes
    pub fn set_head_shape(&mut self, staff: usize, index: usize, shape: HeadShape) -> Result<EditOutcome> {
        self.style().check_head_shape(shape)?;

        let neume = self.staff_mut(staff)?.neume_mut(index)?;
        let root = neume
            .components
            .first_mut()
            .ok_or_else(|| ModelError::ElementNotFound("neume component".to_string()))?;
        root.head_shape = shape;
        neume.derive_name(false);

        let request = SyncRequest::UpdateHeadShape {
            id: neume.id.clone(),
            shape,
            zone: neume.zone,
        };
        Ok(EditOutcome::new(staff, Some(index), vec![request]))
    }

    /// Add a dot to the first note, or remove the one it has
    pub fn toggle_dot(&mut self, staff: usize, index: usize, form: Option<&str>) -> Result<EditOutcome> {
        let neume = self.staff_mut(staff)?.neume_mut(index)?;
        let (id, zone) = (neume.id.clone(), neume.zone);
        let root = neume
            .components
            .first_mut()
            .ok_or_else(|| ModelError::ElementNotFound("neume component".to_string()))?;

        let request = if root.remove_ornament(OrnamentKind::Dot) {
            SyncRequest::DeleteDot { id, zone }
        } else {
            let dot = Ornament::dot(form);
            let dot_form = dot.form.clone();
            root.add_ornament(dot);
            SyncRequest::InsertDot { id, dot_form, zone }
        };
        Ok(EditOutcome::new(staff, Some(index), vec![request]))
    }

    fn check_style(&self, neume: &Neume) -> Result<()> {
        if neume.style != self.style() {
            return Err(ModelError::InvalidValue {
                what: format!("neume style for a {} page", self.style()),
                value: neume.style.to_string(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Divisions
    // ------------------------------------------------------------------

    pub fn insert_division(&mut self, staff: usize, kind: DivisionKind, zone: BoundingBox) -> Result<EditOutcome> {
        let index = self
            .staff_mut(staff)?
            .add_division(Division::new(kind, zone), false);

        let request = SyncRequest::InsertDivision {
            kind,
            zone,
            before_id: self.before_id(staff, index),
        };
        Ok(EditOutcome::new(staff, Some(index), vec![request]))
    }

    pub fn move_division(&mut self, staff: usize, index: usize, zone: BoundingBox) -> Result<EditOutcome> {
        let st = self.staff_mut(staff)?;
        let id = match st.get(index) {
            Some(StaffElement::Division(d)) => d.id.clone(),
            _ => return Err(ModelError::ElementNotFound(format!("division at index {}", index))),
        };
        let moved_to = st.reposition(index, zone)?;

        let request = SyncRequest::MoveDivision {
            id,
            zone,
            before_id: self.before_id(staff, moved_to),
        };
        Ok(EditOutcome::new(staff, Some(moved_to), vec![request]))
    }

    pub fn delete_division(&mut self, staff: usize, index: usize) -> Result<EditOutcome> {
        let st = self.staff_mut(staff)?;
        if !matches!(st.get(index), Some(StaffElement::Division(_))) {
            return Err(ModelError::ElementNotFound(format!("division at index {}", index)));
        }
        let ids = st
            .remove_element_at(index)
            .and_then(|e| e.id().map(str::to_string))
            .into_iter()
            .collect();
        Ok(EditOutcome::new(staff, None, vec![SyncRequest::DeleteDivision { ids }]))
    }

    // ------------------------------------------------------------------
    // Custos
    // ------------------------------------------------------------------

    pub fn insert_custos(&mut self, staff: usize, pitch: Pitch, zone: BoundingBox) -> Result<EditOutcome> {
        self.require_staves()?;
        let index = self.staff_mut(staff)?.set_custos(Custos::new(pitch, zone))?;
        let request = SyncRequest::InsertCustos {
            pitch,
            zone,
            before_id: self.next_staff(staff).and_then(|n| self.staves[n].id.clone()),
        };
        Ok(EditOutcome::new(staff, Some(index), vec![request]))
    }

    /// Drag the custos to a new staff position; its pitch follows the clef
    pub fn move_custos(&mut self, staff: usize, staff_pos: i32, zone: BoundingBox) -> Result<EditOutcome> {
        self.require_staves()?;
        let st = self.staff_mut(staff)?;
        let index = st
            .custos_index()
            .ok_or_else(|| ModelError::ElementNotFound("custos".to_string()))?;
        let pitch = st.move_custos(staff_pos)?;
        if let Some(e) = st.get_mut(index) {
            e.set_zone(zone);
        }
        let id = st.custos().and_then(|c| c.id.clone());

        Ok(EditOutcome::new(staff, Some(index), vec![SyncRequest::MoveCustos { id, pitch, zone }]))
    }

    pub fn delete_custos(&mut self, staff: usize) -> Result<EditOutcome> {
        let custos = self
            .staff_mut(staff)?
            .remove_custos()
            .ok_or_else(|| ModelError::ElementNotFound("custos".to_string()))?;
        let request = SyncRequest::DeleteCustos {
            ids: custos.id.into_iter().collect(),
        };
        Ok(EditOutcome::new(staff, None, vec![request]))
    }

    /// Point the custos of staff `previous` at `pitch`, inserting one at the
    /// staff's right edge when `insert_missing` is set and none exists
    pub fn update_prev_custos(
        &mut self,
        previous: usize,
        pitch: Pitch,
        insert_missing: bool,
        sync: &mut Vec<SyncRequest>,
    ) -> Result<()> {
        let before_id = self.next_staff(previous).and_then(|n| self.staves[n].id.clone());
        let (pw, ph) = (self.config.punct_width, self.config.punct_height);
        let st = self.staff_mut(previous)?;

        if st.custos().is_some() {
            st.update_custos_pitch(pitch)?;
            if let Some(custos) = st.custos() {
                sync.push(SyncRequest::MoveCustos {
                    id: custos.id.clone(),
                    pitch,
                    zone: custos.zone,
                });
            }
        } else if insert_missing {
            let ulx = st.zone.lrx - pw / 2;
            let uly = st.zone.uly;
            let zone = BoundingBox { ulx, uly, lrx: ulx + pw, lry: uly + ph };
            st.set_custos(Custos::new(pitch, zone))?;
            sync.push(SyncRequest::InsertCustos { pitch, zone, before_id });
        }
        Ok(())
    }

    /// Keep the previous staff's custos in step with this staff's first pitch
    fn sync_previous_custos(
        &mut self,
        staff: usize,
        before: Option<Pitch>,
        insert_missing: bool,
        sync: &mut Vec<SyncRequest>,
    ) {
        let after = self.first_pitch(staff);
        if after == before {
            return;
        }
        let previous = match self.previous_staff(staff) {
            Some(p) => p,
            None => return,
        };

        match after {
            Some(pitch) => {
                if let Err(e) = self.update_prev_custos(previous, pitch, insert_missing, sync) {
                    log::warn!("could not update custos of staff {}: {}", previous, e);
                }
            }
            None => {
                if let Some(custos) = self.staves[previous].remove_custos() {
                    sync.push(SyncRequest::DeleteCustos {
                        ids: custos.id.into_iter().collect(),
                    });
                }
            }
        }
    }
}

fn head_shapes(neume: &Neume) -> Vec<HeadShape> {
    neume.components.iter().map(|nc| nc.head_shape).collect()
}

/// Pitches of the neumes a clef governs, plus custos moves for the backend
fn pitch_report(staff: &Staff, clef: Option<usize>) -> (Vec<PitchInfo>, Vec<SyncRequest>) {
    let mut info = Vec::new();
    let mut moves = Vec::new();

    for i in staff.pitched_elements(clef, true, true) {
        match staff.get(i) {
            Some(StaffElement::Neume(n)) => info.push(PitchInfo {
                id: n.id.clone(),
                note_info: n.pitches().into_iter().flatten().collect(),
            }),
            Some(StaffElement::Custos(c)) => moves.push(SyncRequest::MoveCustos {
                id: c.id.clone(),
                pitch: c.pitch,
                zone: c.zone,
            }),
            _ => {}
        }
    }
    (info, moves)
}
