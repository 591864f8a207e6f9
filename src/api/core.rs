//! WASM API for page storage and stateless helpers
//!
//! The page lives in WASM memory and is the source of truth for every edit.
//! JavaScript loads it, reads snapshots, drains change events and calls the
//! stateless pitch and classification helpers here.

use std::sync::Mutex;

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, deserialize_or_default, model_error, parse_arg, parse_optional_arg, parse_zone, serialize, validation_error};
use super::types::{ClassifyResult, PageSummary};
use crate::classify::NotationStyle;
use crate::config::EditorConfig;
use crate::converters::mei::parse_mei;
use crate::errors::ModelError;
use crate::models::clef::{Clef, ClefShape};
use crate::models::elements::{BoundingBox, Liquescence};
use crate::models::neume::{neume_from_data, NoteData};
use crate::models::page::Page;
use crate::models::pitch::{self, Pitch};
use crate::models::staff::Staff;
use crate::sync::{self, SyncRequest};
use crate::{wasm_info, wasm_log, wasm_warn};

// WASM-owned page storage (canonical source of truth)
lazy_static! {
    static ref PAGE: Mutex<Option<Page>> = Mutex::new(None);
}

/// Run `f` against the loaded page, mapping model errors for JavaScript
pub(crate) fn with_page<T>(f: impl FnOnce(&mut Page) -> Result<T, ModelError>) -> Result<T, JsValue> {
    let mut guard = PAGE
        .lock()
        .map_err(|_| validation_error("Page storage is poisoned"))?;
    match guard.as_mut() {
        Some(page) => f(page).map_err(model_error),
        None => {
            wasm_warn!("No page loaded");
            Err(JsValue::from_str("No page loaded"))
        }
    }
}

fn store(page: Page) -> Result<(), JsValue> {
    let mut guard = PAGE
        .lock()
        .map_err(|_| validation_error("Page storage is poisoned"))?;
    *guard = Some(page);
    Ok(())
}

/// Create an empty page and store it internally
#[wasm_bindgen(js_name = newPage)]
pub fn new_page(config_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("newPage called");
    let config: EditorConfig = deserialize_or_default(config_js, "Config deserialization error")?;

    let page = Page::new(config);
    let summary = PageSummary::of(&page);
    store(page)?;

    serialize(&summary, "Serialization error")
}

/// Parse an MEI document and store the resulting page
#[wasm_bindgen(js_name = loadMei)]
pub fn load_mei(mei: &str, config_js: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("loadMei called: {} bytes", mei.len());
    let config: EditorConfig = deserialize_or_default(config_js, "Config deserialization error")?;

    let mut page = parse_mei(mei, &config).map_err(model_error)?;
    // the renderer draws the loaded page from the snapshot, not from events
    page.take_events();

    let summary = PageSummary::of(&page);
    wasm_info!(
        "  Loaded {} staves with {} neumes ({})",
        summary.staves,
        summary.neumes,
        summary.style
    );
    store(page)?;

    serialize(&summary, "Serialization error")
}

/// Get the current page from WASM's internal storage
#[wasm_bindgen(js_name = getPageSnapshot)]
pub fn get_page_snapshot() -> Result<JsValue, JsValue> {
    let snapshot = with_page(|page| Ok(page.clone()))?;
    serialize(&snapshot, "Page serialization error")
}

/// Drain pending change events as a JavaScript array
#[wasm_bindgen(js_name = takeEvents)]
pub fn take_events() -> Result<js_sys::Array, JsValue> {
    let events = with_page(|page| Ok(page.take_events()))?;
    wasm_log!("takeEvents: {} event(s)", events.len());

    let result = js_sys::Array::new();
    for event in &events {
        result.push(&serialize(event, "Event serialization error")?);
    }
    Ok(result)
}

/// Append a staff; `numLines` defaults to the page configuration
#[wasm_bindgen(js_name = addStaff)]
pub fn add_staff(bbox: Vec<f64>, num_lines: Option<u32>, id: Option<String>) -> Result<usize, JsValue> {
    let zone = parse_zone(&bbox)?;
    with_page(|page| {
        let mut staff = Staff::new(zone, num_lines.unwrap_or(page.config.num_lines));
        staff.id = id;
        Ok(page.add_staff(staff))
    })
}

#[wasm_bindgen(js_name = closestStaff)]
pub fn closest_staff(y: f64) -> Result<Option<usize>, JsValue> {
    with_page(|page| Ok(page.closest_staff(y)))
}

/// Record the id the backend generated for a new element
#[wasm_bindgen(js_name = assignId)]
pub fn assign_id(staff: usize, index: usize, id: &str) -> Result<(), JsValue> {
    with_page(|page| page.assign_id(staff, index, id))
}

/// Locate an element by id; returns `[staff, index]` or `null`
#[wasm_bindgen(js_name = findElement)]
pub fn find_element(id: &str) -> Result<JsValue, JsValue> {
    let found = with_page(|page| Ok(page.find_element(id)))?;
    serialize(&found, "Serialization error")
}

// ============================================================================
// Stateless helpers
// ============================================================================

/// Name note data without mounting it
#[wasm_bindgen(js_name = classifyNeume)]
pub fn classify_neume(style: &str, notes_js: JsValue, modifier: Option<String>) -> Result<JsValue, JsValue> {
    let style: NotationStyle = parse_arg(style)?;
    let notes: Vec<NoteData> = deserialize(notes_js, "Note data deserialization error")?;
    let modifier: Option<Liquescence> = parse_optional_arg(modifier)?;

    let neume = neume_from_data(style, &notes, BoundingBox::default(), modifier).map_err(model_error)?;
    serialize(&ClassifyResult::of(&neume), "Serialization error")
}

/// Pitch sounding at `staffPos` under a clef
#[wasm_bindgen(js_name = positionToPitch)]
pub fn position_to_pitch(clef_shape: &str, clef_staff_pos: i32, staff_pos: i32) -> Result<JsValue, JsValue> {
    let shape: ClefShape = parse_arg(clef_shape)?;
    let clef = Clef::new(shape, Some(clef_staff_pos));
    serialize(&pitch::position_to_pitch(staff_pos, &clef), "Serialization error")
}

/// Staff position of a pitch under a clef
#[wasm_bindgen(js_name = pitchToPosition)]
pub fn pitch_to_position(clef_shape: &str, clef_staff_pos: i32, pname: &str, oct: i32) -> Result<i32, JsValue> {
    let shape: ClefShape = parse_arg(clef_shape)?;
    let clef = Clef::new(shape, Some(clef_staff_pos));
    let pitch = Pitch::parse(pname, oct).map_err(model_error)?;
    Ok(pitch::pitch_to_position(pitch, &clef))
}

/// Log a failed backend call; returns the warning to show the user
#[wasm_bindgen(js_name = reportSyncFailure)]
pub fn report_sync_failure(request_js: JsValue, reason: &str) -> Result<String, JsValue> {
    let request: SyncRequest = deserialize(request_js, "Sync request deserialization error")?;
    Ok(sync::report_sync_failure(&request, reason))
}
