//! WASM API for page edits
//!
//! Each function applies one edit to the stored page and returns the
//! `EditOutcome` (staff, element index and the backend requests to send).
//! Bounding boxes arrive as `[ulx, uly, lrx, lry]`.

use wasm_bindgen::prelude::*;

use super::core::with_page;
use super::helpers::{deserialize, parse_arg, parse_optional_arg, parse_zone, serialize};
use crate::models::clef::ClefShape;
use crate::models::elements::{DivisionKind, HeadShape, Liquescence};
use crate::models::neume::{neume_from_data, NoteData};
use crate::models::page::EditOutcome;
use crate::models::pitch::Pitch;
use crate::{wasm_info, wasm_log};

fn outcome(result: EditOutcome) -> Result<JsValue, JsValue> {
    wasm_log!(
        "  staff {} index {:?}, {} sync request(s)",
        result.staff,
        result.index,
        result.sync.len()
    );
    serialize(&result, "Edit outcome serialization error")
}

fn indices(values: &[u32]) -> Vec<usize> {
    values.iter().map(|&i| i as usize).collect()
}

// ============================================================================
// Clefs
// ============================================================================

#[wasm_bindgen(js_name = insertClef)]
pub fn insert_clef(staff: usize, shape: &str, staff_pos: Option<i32>, bbox: Vec<f64>) -> Result<JsValue, JsValue> {
    wasm_info!("insertClef: staff {} shape {} pos {:?}", staff, shape, staff_pos);
    let shape: ClefShape = parse_arg(shape)?;
    let zone = parse_zone(&bbox)?;
    outcome(with_page(|page| page.insert_clef(staff, shape, staff_pos, zone))?)
}

#[wasm_bindgen(js_name = moveClef)]
pub fn move_clef(staff: usize, index: usize, staff_pos: i32, bbox: Vec<f64>) -> Result<JsValue, JsValue> {
    wasm_info!("moveClef: staff {} index {} to pos {}", staff, index, staff_pos);
    let zone = parse_zone(&bbox)?;
    outcome(with_page(|page| page.move_clef(staff, index, staff_pos, zone))?)
}

#[wasm_bindgen(js_name = changeClefShape)]
pub fn change_clef_shape(staff: usize, index: usize, shape: &str) -> Result<JsValue, JsValue> {
    wasm_info!("changeClefShape: staff {} index {} to {}", staff, index, shape);
    let shape: ClefShape = parse_arg(shape)?;
    outcome(with_page(|page| page.change_clef_shape(staff, index, shape))?)
}

#[wasm_bindgen(js_name = deleteClef)]
pub fn delete_clef(staff: usize, index: usize) -> Result<JsValue, JsValue> {
    wasm_info!("deleteClef: staff {} index {}", staff, index);
    outcome(with_page(|page| page.delete_clef(staff, index))?)
}

// ============================================================================
// Neumes
// ============================================================================

/// Classify note data in the page's style and mount it on `staff`
#[wasm_bindgen(js_name = insertNeume)]
pub fn insert_neume(
    staff: usize,
    notes_js: JsValue,
    bbox: Vec<f64>,
    modifier: Option<String>,
) -> Result<JsValue, JsValue> {
    let notes: Vec<NoteData> = deserialize(notes_js, "Note data deserialization error")?;
    let zone = parse_zone(&bbox)?;
    let modifier: Option<Liquescence> = parse_optional_arg(modifier)?;
    wasm_info!("insertNeume: staff {} with {} note(s)", staff, notes.len());

    outcome(with_page(|page| {
        let neume = neume_from_data(page.style(), &notes, zone, modifier)?;
        page.insert_neume(staff, neume)
    })?)
}

/// Move a neume, optionally to a new root staff position or another staff
#[wasm_bindgen(js_name = moveNeume)]
pub fn move_neume(
    staff: usize,
    index: usize,
    target: usize,
    root_staff_pos: Option<i32>,
    bbox: Vec<f64>,
) -> Result<JsValue, JsValue> {
    wasm_info!("moveNeume: staff {} index {} to staff {} pos {:?}", staff, index, target, root_staff_pos);
    let zone = parse_zone(&bbox)?;
    outcome(with_page(|page| page.move_neume(staff, index, target, root_staff_pos, zone))?)
}

#[wasm_bindgen(js_name = deleteNeume)]
pub fn delete_neume(staff: usize, index: usize) -> Result<JsValue, JsValue> {
    wasm_info!("deleteNeume: staff {} index {}", staff, index);
    outcome(with_page(|page| page.delete_neume(staff, index))?)
}

/// Merge the neumes at `indices` into one
#[wasm_bindgen(js_name = neumify)]
pub fn neumify(staff: usize, indices_js: Vec<u32>, modifier: Option<String>) -> Result<JsValue, JsValue> {
    let selection = indices(&indices_js);
    let modifier: Option<Liquescence> = parse_optional_arg(modifier)?;
    wasm_info!("neumify: staff {} indices {:?}", staff, selection);
    outcome(with_page(|page| page.neumify(staff, &selection, modifier))?)
}

/// Split the neumes at `indices` into one neume per component
#[wasm_bindgen(js_name = ungroup)]
pub fn ungroup(staff: usize, indices_js: Vec<u32>) -> Result<JsValue, JsValue> {
    let selection = indices(&indices_js);
    wasm_info!("ungroup: staff {} indices {:?}", staff, selection);
    outcome(with_page(|page| page.ungroup(staff, &selection))?)
}

#[wasm_bindgen(js_name = setHeadShape)]
pub fn set_head_shape(staff: usize, index: usize, shape: &str) -> Result<JsValue, JsValue> {
    wasm_info!("setHeadShape: staff {} index {} to {}", staff, index, shape);
    let shape: HeadShape = parse_arg(shape)?;
    outcome(with_page(|page| page.set_head_shape(staff, index, shape))?)
}

/// Add or remove the dot on a neume's first component
#[wasm_bindgen(js_name = toggleDot)]
pub fn toggle_dot(staff: usize, index: usize, form: Option<String>) -> Result<JsValue, JsValue> {
    wasm_info!("toggleDot: staff {} index {}", staff, index);
    outcome(with_page(|page| page.toggle_dot(staff, index, form.as_deref()))?)
}

// ============================================================================
// Divisions
// ============================================================================

#[wasm_bindgen(js_name = insertDivision)]
pub fn insert_division(staff: usize, kind: &str, bbox: Vec<f64>) -> Result<JsValue, JsValue> {
    wasm_info!("insertDivision: staff {} kind {}", staff, kind);
    let kind: DivisionKind = parse_arg(kind)?;
    let zone = parse_zone(&bbox)?;
    outcome(with_page(|page| page.insert_division(staff, kind, zone))?)
}

#[wasm_bindgen(js_name = moveDivision)]
pub fn move_division(staff: usize, index: usize, bbox: Vec<f64>) -> Result<JsValue, JsValue> {
    let zone = parse_zone(&bbox)?;
    outcome(with_page(|page| page.move_division(staff, index, zone))?)
}

#[wasm_bindgen(js_name = deleteDivision)]
pub fn delete_division(staff: usize, index: usize) -> Result<JsValue, JsValue> {
    outcome(with_page(|page| page.delete_division(staff, index))?)
}

// ============================================================================
// Custos
// ============================================================================

#[wasm_bindgen(js_name = insertCustos)]
pub fn insert_custos(staff: usize, pname: &str, oct: i32, bbox: Vec<f64>) -> Result<JsValue, JsValue> {
    wasm_info!("insertCustos: staff {} pitch {}{}", staff, pname, oct);
    let zone = parse_zone(&bbox)?;
    outcome(with_page(|page| {
        let pitch = Pitch::parse(pname, oct)?;
        page.insert_custos(staff, pitch, zone)
    })?)
}

#[wasm_bindgen(js_name = moveCustos)]
pub fn move_custos(staff: usize, staff_pos: i32, bbox: Vec<f64>) -> Result<JsValue, JsValue> {
    wasm_info!("moveCustos: staff {} to pos {}", staff, staff_pos);
    let zone = parse_zone(&bbox)?;
    outcome(with_page(|page| page.move_custos(staff, staff_pos, zone))?)
}

#[wasm_bindgen(js_name = deleteCustos)]
pub fn delete_custos(staff: usize) -> Result<JsValue, JsValue> {
    wasm_info!("deleteCustos: staff {}", staff);
    outcome(with_page(|page| page.delete_custos(staff))?)
}
