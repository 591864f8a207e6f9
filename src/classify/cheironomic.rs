//! Cheironomic (staffless) classifier
//!
//! Staffless neumes carry no absolute pitch. Each note stores its movement
//! relative to the previous note as read from the manuscript, and those
//! integers label the tree edges directly.

use once_cell::sync::Lazy;

use super::tree::SearchTree;
use super::{load_tree, NeumeClassifier, NotationStyle};
use crate::models::neume::Neume;

pub(crate) const TREE_JSON: &str = include_str!("data/cheironomic_tree.json");

static TREE: Lazy<SearchTree> = Lazy::new(|| load_tree(TREE_JSON, "cheironomic"));

#[derive(Clone, Copy, Debug, Default)]
pub struct CheironomicClassifier;

impl NeumeClassifier for CheironomicClassifier {
    fn style(&self) -> NotationStyle {
        NotationStyle::Cheironomic
    }

    fn tree(&self) -> &SearchTree {
        &TREE
    }

    fn edge_labels(&self, neume: &Neume) -> Vec<i32> {
        neume
            .components
            .iter()
            .skip(1)
            .map(|nc| nc.relative_pitch.unwrap_or(0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::elements::HeadShape;
    use crate::models::neume::NeumeComponent;

    fn staffless(moves: &[i32]) -> Neume {
        let mut neume = Neume::new(NotationStyle::Cheironomic);
        neume.components.push(NeumeComponent::new(HeadShape::Punctum));
        for &step in moves {
            let mut nc = NeumeComponent::new(HeadShape::Punctum);
            nc.relative_pitch = Some(step);
            neume.components.push(nc);
        }
        neume
    }

    #[test]
    fn test_labels_skip_root() {
        let neume = staffless(&[1, -1]);
        assert_eq!(CheironomicClassifier.edge_labels(&neume), vec![1, -1]);
    }

    #[test]
    fn test_staffless_names() {
        assert_eq!(CheironomicClassifier.classify(&staffless(&[])).name, "Punctum");
        assert_eq!(CheironomicClassifier.classify(&staffless(&[1])).typeid.as_deref(), Some("pes"));
        assert_eq!(CheironomicClassifier.classify(&staffless(&[-1])).typeid.as_deref(), Some("clivis"));
        assert_eq!(CheironomicClassifier.classify(&staffless(&[1, -1])).typeid.as_deref(), Some("torculus"));
        assert_eq!(CheironomicClassifier.classify(&staffless(&[0, 0])).typeid.as_deref(), Some("tristropha"));
    }

    #[test]
    fn test_compound_names_are_spaced() {
        let scandicus = CheironomicClassifier.classify(&staffless(&[1, 1, -1]));
        assert_eq!(scandicus.typeid.as_deref(), Some("scandicus.flexus"));
        assert_eq!(scandicus.name, "Scandicus Flexus");

        let torculus = CheironomicClassifier.classify(&staffless(&[1, -1, 1]));
        assert_eq!(torculus.name, "Torculus Resupinus");
    }

    #[test]
    fn test_raw_steps_are_not_sign_reduced() {
        // a leap of two is its own label and has no edge in the tree
        let c = CheironomicClassifier.classify(&staffless(&[2]));
        assert_eq!(c.typeid.as_deref(), Some("compound"));
        assert_eq!(c.neume_prefix.as_deref(), Some("punctum"));
    }

    #[test]
    fn test_gravis_head_renames_punctum() {
        let mut neume = staffless(&[]);
        neume.components[0].head_shape = HeadShape::Gravis;
        assert_eq!(CheironomicClassifier.classify(&neume).typeid.as_deref(), Some("gravis"));
    }
}
