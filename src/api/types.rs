//! Shared types for the WASM API
//!
//! This module contains common result types used across multiple API modules.

use crate::models::{Neume, Page};

/// Short description of a loaded page
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: Option<String>,
    pub staves: usize,
    pub neumes: usize,
    pub style: String,
}

impl PageSummary {
    pub fn of(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            staves: page.staves.len(),
            neumes: page.staves.iter().map(|s| s.neumes().count()).sum(),
            style: page.style().to_string(),
        }
    }
}

/// Result of classifying note data without touching the page
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResult {
    pub typeid: Option<String>,
    pub name: Option<String>,
    pub neume_prefix: Option<String>,
    /// Head shapes after the neume type forced any
    pub head_shapes: Vec<String>,
}

impl ClassifyResult {
    pub fn of(neume: &Neume) -> Self {
        Self {
            typeid: neume.typeid.clone(),
            name: neume.name.clone(),
            neume_prefix: neume.neume_prefix.clone(),
            head_shapes: neume
                .components
                .iter()
                .map(|nc| nc.head_shape.to_string())
                .collect(),
        }
    }
}
