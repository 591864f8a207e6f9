//! Neume classification
//!
//! A neume is named by walking a prebuilt search tree with one movement label
//! per note after the first. Square-note and cheironomic notation use
//! different trees and different label rules; both are reached through the
//! [`NeumeClassifier`] trait selected by [`NotationStyle`].

pub mod cheironomic;
pub mod square_note;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ModelError;
use crate::models::elements::HeadShape;
use crate::models::neume::{Classification, Neume};

pub use cheironomic::CheironomicClassifier;
pub use square_note::SquareNoteClassifier;
pub use tree::{Payload, SearchResult, SearchTree, TreeNode};

/// Typeid given to sequences that only partially match the tree
pub const COMPOUND_TYPEID: &str = "compound";

/// Notation dialect of a page, chosen once when the page is created
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotationStyle {
    #[default]
    SquareNote,
    Cheironomic,
}

impl NotationStyle {
    pub fn classifier(self) -> &'static dyn NeumeClassifier {
        match self {
            NotationStyle::SquareNote => &SquareNoteClassifier,
            NotationStyle::Cheironomic => &CheironomicClassifier,
        }
    }

    /// Head shapes the dialect can draw
    pub fn head_shapes(self) -> &'static [HeadShape] {
        match self {
            NotationStyle::SquareNote => &[
                HeadShape::Punctum,
                HeadShape::Virga,
                HeadShape::Cavum,
                HeadShape::PunctumInclinatum,
                HeadShape::PunctumInclinatumParvum,
                HeadShape::Quilisma,
            ],
            NotationStyle::Cheironomic => &[
                HeadShape::Punctum,
                HeadShape::Tractulus,
                HeadShape::Virga,
                HeadShape::Gravis,
                HeadShape::Oriscus,
                HeadShape::Stropha,
                HeadShape::Quilisma,
            ],
        }
    }

    pub fn accepts_head_shape(self, shape: HeadShape) -> bool {
        self.head_shapes().contains(&shape)
    }

    /// Reject a head shape the dialect does not define
    pub fn check_head_shape(self, shape: HeadShape) -> Result<(), ModelError> {
        if self.accepts_head_shape(shape) {
            Ok(())
        } else {
            Err(ModelError::HeadShapeNotInStyle {
                shape: shape.to_string(),
                style: self.to_string(),
            })
        }
    }

    /// Staffless pages carry relative pitches instead of absolute ones
    pub fn is_staffless(self) -> bool {
        matches!(self, NotationStyle::Cheironomic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NotationStyle::SquareNote => "square_note",
            NotationStyle::Cheironomic => "cheironomic",
        }
    }
}

impl FromStr for NotationStyle {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "square_note" | "squarenote" | "square" => Ok(NotationStyle::SquareNote),
            "cheironomic" | "staffless" => Ok(NotationStyle::Cheironomic),
            other => Err(ModelError::InvalidValue {
                what: "notation style".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for NotationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy naming a neume from its components
pub trait NeumeClassifier: Sync {
    fn style(&self) -> NotationStyle;

    fn tree(&self) -> &SearchTree;

    /// One edge label per component after the first
    fn edge_labels(&self, neume: &Neume) -> Vec<i32>;

    /// Force derived head shapes onto trailing components
    fn enforce_head_shapes(&self, _neume: &mut Neume) {}

    /// Walk the tree and apply the post-match renames
    fn classify(&self, neume: &Neume) -> Classification {
        if neume.components.is_empty() {
            return Classification::unknown();
        }

        let labels = self.edge_labels(neume);
        let found = self.tree().search(&labels);

        let matched = if found.prefix {
            Classification {
                typeid: Some(COMPOUND_TYPEID.to_string()),
                name: "Compound".to_string(),
                neume_prefix: Some(found.payload.typeid.clone()),
            }
        } else {
            Classification {
                typeid: Some(found.payload.typeid.clone()),
                name: found.payload.name.clone(),
                neume_prefix: None,
            }
        };

        apply_overrides(matched, neume, self.style())
    }
}

/// Renames that depend on the first head shape or the liquescence modifier.
/// The first matching row wins.
fn apply_overrides(matched: Classification, neume: &Neume, style: NotationStyle) -> Classification {
    let typeid = match matched.typeid.as_deref() {
        Some(typeid) => typeid,
        None => return matched,
    };
    let head = neume.components.first().map(|nc| nc.head_shape);
    let liquescent = neume.modifier.is_some();
    let cheironomic = style == NotationStyle::Cheironomic;

    let renamed = match (typeid, head) {
        ("punctum", Some(HeadShape::Virga)) => Some(("virga", "Virga")),
        ("punctum", Some(HeadShape::Tractulus)) if cheironomic => Some(("tractulus", "Tractulus")),
        ("punctum", Some(HeadShape::Gravis)) => Some(("gravis", "Gravis")),
        ("punctum", Some(HeadShape::Oriscus)) => Some(("oriscus", "Oriscus")),
        ("punctum", Some(HeadShape::Stropha)) => Some(("stropha", "Stropha")),
        ("distropha", Some(HeadShape::Virga)) => Some(("bivirga", "Bivirga")),
        ("tristropha", Some(HeadShape::Virga)) => Some(("trivirga", "Trivirga")),
        ("punctum", Some(HeadShape::Cavum)) => Some(("cavum", "Cavum")),
        ("podatus" | "pes", _) if liquescent => Some(("epiphonus", "Epiphonus")),
        ("clivis", _) if liquescent => Some(("cephalicus", "Cephalicus")),
        ("climacus", _) if liquescent && cheironomic => Some(("ancus", "Ancus")),
        _ => None,
    };

    match renamed {
        Some((typeid, name)) => Classification {
            typeid: Some(typeid.to_string()),
            name: name.to_string(),
            neume_prefix: matched.neume_prefix,
        },
        None => matched,
    }
}

/// Parse an embedded tree literal, falling back to a lone punctum
fn load_tree(json: &str, label: &str) -> SearchTree {
    SearchTree::from_json(json).unwrap_or_else(|err| {
        log::error!("failed to parse {} neume tree: {}", label, err);
        SearchTree {
            root_node: TreeNode {
                payload: Payload {
                    typeid: "punctum".to_string(),
                    name: "Punctum".to_string(),
                },
                children: Default::default(),
            },
        }
    })
}
