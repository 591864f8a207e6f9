//! Square-note classifier
//!
//! Edge labels are the direction of each note relative to the previous one,
//! computed from the stored staff-position differences.

use once_cell::sync::Lazy;

use super::tree::SearchTree;
use super::{load_tree, NeumeClassifier, NotationStyle};
use crate::models::elements::HeadShape;
use crate::models::neume::Neume;

pub(crate) const TREE_JSON: &str = include_str!("data/square_note_tree.json");

static TREE: Lazy<SearchTree> = Lazy::new(|| load_tree(TREE_JSON, "square-note"));

/// Reduce raw staff-position differences to up (+1), down (-1) or repeat (0).
///
/// Each difference is compared with the previous raw difference, starting
/// from the root's implicit 0.
pub fn diff_to_melodic_move(diffs: &[i32]) -> Vec<i32> {
    let mut prev = 0;
    diffs
        .iter()
        .map(|&diff| {
            let relation = (diff - prev).signum();
            prev = diff;
            relation
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SquareNoteClassifier;

impl NeumeClassifier for SquareNoteClassifier {
    fn style(&self) -> NotationStyle {
        NotationStyle::SquareNote
    }

    fn tree(&self) -> &SearchTree {
        &TREE
    }

    fn edge_labels(&self, neume: &Neume) -> Vec<i32> {
        diff_to_melodic_move(&neume.differences())
    }

    fn enforce_head_shapes(&self, neume: &mut Neume) {
        let typeid = match neume.typeid.as_deref() {
            Some(typeid) => typeid,
            None => return,
        };

        let len = neume.components.len();
        let range = match typeid {
            "climacus.1" | "climacus.2" | "climacus.3" | "climacus.4" => 1..len,
            t if t.starts_with("climacus.resupinus.") => 1..len.saturating_sub(1),
            t if t.starts_with("podatus.subpunctis.resupinus.") => 2..len.saturating_sub(1),
            t if t.starts_with("podatus.subpunctis.") => 2..len,
            "scandicus.subpunctis.1" | "scandicus.subpunctis.2" => 3..len,
            "porrectus.subpunctis.1" | "porrectus.subpunctis.2" => 3..len,
            t if t.starts_with("porrectus.subpunctis.resupinus.") => 3..len.saturating_sub(1),
            "torculus.resupinus.3" | "torculus.resupinus.4" => 4..len,
            _ => return,
        };

        for nc in neume.components.iter_mut().take(range.end).skip(range.start) {
            nc.head_shape = HeadShape::PunctumInclinatum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::elements::Liquescence;
    use crate::models::neume::{Classification, NeumeComponent};

    fn neume_with_diffs(diffs: &[i32]) -> Neume {
        let mut neume = Neume::new(NotationStyle::SquareNote);
        for &diff in diffs {
            let mut nc = NeumeComponent::new(HeadShape::Punctum);
            nc.pitch_diff = Some(diff);
            neume.components.push(nc);
        }
        neume
    }

    fn classify(neume: &Neume) -> Classification {
        SquareNoteClassifier.classify(neume)
    }

    #[test]
    fn test_melodic_move_compares_raw_differences() {
        assert_eq!(diff_to_melodic_move(&[]), Vec::<i32>::new());
        assert_eq!(diff_to_melodic_move(&[4, 2]), vec![1, -1]);
        // second note repeats the first difference, not the first label
        assert_eq!(diff_to_melodic_move(&[-1, -1, -3]), vec![-1, 0, -1]);
        assert_eq!(diff_to_melodic_move(&[0, 0]), vec![0, 0]);
    }

    #[test]
    fn test_punctum() {
        let c = classify(&neume_with_diffs(&[0]));
        assert_eq!(c.typeid.as_deref(), Some("punctum"));
        assert_eq!(c.name, "Punctum");
        assert_eq!(c.neume_prefix, None);
    }

    #[test]
    fn test_torculus() {
        let c = classify(&neume_with_diffs(&[0, 4, -2]));
        assert_eq!(c.typeid.as_deref(), Some("torculus"));
        assert_eq!(c.name, "Torculus");
    }

    #[test]
    fn test_compound_records_deepest_match() {
        // up, down, repeat, repeat: nothing continues past torculus
        let c = classify(&neume_with_diffs(&[0, 2, 1, 1, 1]));
        assert_eq!(c.typeid.as_deref(), Some("compound"));
        assert_eq!(c.name, "Compound");
        assert_eq!(c.neume_prefix.as_deref(), Some("torculus"));
    }

    #[test]
    fn test_empty_neume_is_unknown() {
        let c = classify(&Neume::new(NotationStyle::SquareNote));
        assert_eq!(c.typeid, None);
        assert_eq!(c.name, "unknown");
    }

    #[test]
    fn test_virga_family_renames() {
        let mut neume = neume_with_diffs(&[0]);
        neume.components[0].head_shape = HeadShape::Virga;
        assert_eq!(classify(&neume).typeid.as_deref(), Some("virga"));

        let mut neume = neume_with_diffs(&[0, 0]);
        neume.components[0].head_shape = HeadShape::Virga;
        assert_eq!(classify(&neume).name, "Bivirga");

        let mut neume = neume_with_diffs(&[0, 0, 0]);
        neume.components[0].head_shape = HeadShape::Virga;
        assert_eq!(classify(&neume).name, "Trivirga");

        let mut neume = neume_with_diffs(&[0]);
        neume.components[0].head_shape = HeadShape::Cavum;
        assert_eq!(classify(&neume).typeid.as_deref(), Some("cavum"));
    }

    #[test]
    fn test_liquescent_renames() {
        let mut podatus = neume_with_diffs(&[0, 1]);
        podatus.modifier = Some(Liquescence::Plain);
        assert_eq!(classify(&podatus).typeid.as_deref(), Some("epiphonus"));

        let mut clivis = neume_with_diffs(&[0, -1]);
        clivis.modifier = Some(Liquescence::Plain);
        assert_eq!(classify(&clivis).typeid.as_deref(), Some("cephalicus"));
    }

    #[test]
    fn test_climacus_enforces_inclinatum() {
        let mut neume = neume_with_diffs(&[0, -1, -2, -3]);
        neume.typeid = classify(&neume).typeid;
        assert_eq!(neume.typeid.as_deref(), Some("climacus.2"));

        SquareNoteClassifier.enforce_head_shapes(&mut neume);
        let shapes: Vec<HeadShape> = neume.components.iter().map(|nc| nc.head_shape).collect();
        assert_eq!(
            shapes,
            vec![
                HeadShape::Punctum,
                HeadShape::PunctumInclinatum,
                HeadShape::PunctumInclinatum,
                HeadShape::PunctumInclinatum,
            ]
        );
    }

    #[test]
    fn test_resupinus_keeps_last_head() {
        let mut neume = neume_with_diffs(&[0, -1, -2, -1]);
        neume.typeid = classify(&neume).typeid;
        assert_eq!(neume.typeid.as_deref(), Some("climacus.resupinus.1"));

        SquareNoteClassifier.enforce_head_shapes(&mut neume);
        assert_eq!(neume.components[1].head_shape, HeadShape::PunctumInclinatum);
        assert_eq!(neume.components[2].head_shape, HeadShape::PunctumInclinatum);
        assert_eq!(neume.components[3].head_shape, HeadShape::Punctum);
    }

    #[test]
    fn test_podatus_subpunctis_starts_at_third_note() {
        let mut neume = neume_with_diffs(&[0, 2, 1, 0, -1]);
        neume.typeid = classify(&neume).typeid;
        assert_eq!(neume.typeid.as_deref(), Some("podatus.subpunctis.2"));

        SquareNoteClassifier.enforce_head_shapes(&mut neume);
        assert_eq!(neume.components[1].head_shape, HeadShape::Punctum);
        assert!(neume.components[2..].iter().all(|nc| nc.head_shape == HeadShape::PunctumInclinatum));
    }

    #[test]
    fn test_torculus_resupinus_3_starts_at_fifth_note() {
        let mut neume = neume_with_diffs(&[0, 2, 1, 3, 2, 1]);
        neume.typeid = classify(&neume).typeid;
        assert_eq!(neume.typeid.as_deref(), Some("torculus.resupinus.3"));

        SquareNoteClassifier.enforce_head_shapes(&mut neume);
        assert!(neume.components[..4].iter().all(|nc| nc.head_shape == HeadShape::Punctum));
        assert!(neume.components[4..].iter().all(|nc| nc.head_shape == HeadShape::PunctumInclinatum));
    }

    #[test]
    fn test_untouched_typeids_keep_heads() {
        let mut neume = neume_with_diffs(&[0, 4, -2]);
        neume.components[2].head_shape = HeadShape::Quilisma;
        neume.typeid = classify(&neume).typeid;
        SquareNoteClassifier.enforce_head_shapes(&mut neume);
        assert_eq!(neume.components[2].head_shape, HeadShape::Quilisma);
    }
}
