//! Editor configuration handed over by the JS host

use serde::{Deserialize, Serialize};

use crate::classify::NotationStyle;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub style: NotationStyle,
    /// Staff lines for staves created without an explicit count
    pub num_lines: u32,
    /// Glyph size hints for boxes the core lays out itself
    pub punct_width: i32,
    pub punct_height: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            style: NotationStyle::SquareNote,
            num_lines: 4,
            punct_width: 20,
            punct_height: 20,
        }
    }
}

impl EditorConfig {
    pub fn for_style(style: NotationStyle) -> Self {
        let num_lines = if style.is_staffless() { 0 } else { 4 };
        Self {
            style,
            num_lines,
            ..Self::default()
        }
    }
}
