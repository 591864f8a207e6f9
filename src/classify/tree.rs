//! Discriminating search tree over melodic-movement sequences
//!
//! Each node carries the neume type reached by the path from the root; edges
//! are labelled with one movement symbol per note after the first. Trees are
//! stored as JSON literals so they never need to be populated at runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Neume type stored at a tree node
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    pub typeid: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub payload: Payload,
    #[serde(default)]
    pub children: BTreeMap<i32, TreeNode>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn count(&self) -> usize {
        1 + self.children.values().map(TreeNode::count).sum::<usize>()
    }
}

/// Outcome of walking the tree along a label sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult<'a> {
    /// Payload of the deepest node reached
    pub payload: &'a Payload,
    /// Number of labels consumed
    pub depth: usize,
    /// True when labels remained after the walk stopped
    pub prefix: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchTree {
    pub root_node: TreeNode,
}

impl SearchTree {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Follow `labels` from the root as far as the tree allows
    pub fn search(&self, labels: &[i32]) -> SearchResult<'_> {
        let mut node = &self.root_node;
        let mut depth = 0;

        for label in labels {
            match node.children.get(label) {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }

        SearchResult {
            payload: &node.payload,
            depth,
            prefix: depth < labels.len(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.root_node.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_TREE: &str = r#"{
        "rootNode": {
            "payload": {"typeid": "punctum", "name": "Punctum"},
            "children": {
                "1": {
                    "payload": {"typeid": "podatus", "name": "Podatus"},
                    "children": {
                        "-1": {"payload": {"typeid": "torculus", "name": "Torculus"}, "children": {}, "numChildren": 0}
                    },
                    "numChildren": 1
                }
            },
            "numChildren": 1
        },
        "numNodes": 1
    }"#;

    #[test]
    fn test_parse_legacy_dump() {
        // bookkeeping fields of older dumps are ignored
        let tree = SearchTree::from_json(SMALL_TREE).unwrap();
        assert_eq!(tree.num_nodes(), 3);
        assert!(tree.root_node.children[&1].children[&-1].is_leaf());
    }

    #[test]
    fn test_exact_and_prefix_search() {
        let tree = SearchTree::from_json(SMALL_TREE).unwrap();

        let root = tree.search(&[]);
        assert_eq!(root.payload.typeid, "punctum");
        assert!(!root.prefix);

        let torculus = tree.search(&[1, -1]);
        assert_eq!(torculus.payload.typeid, "torculus");
        assert_eq!(torculus.depth, 2);
        assert!(!torculus.prefix);

        let partial = tree.search(&[1, -1, -1]);
        assert_eq!(partial.payload.typeid, "torculus");
        assert!(partial.prefix);

        let miss = tree.search(&[0]);
        assert_eq!(miss.payload.typeid, "punctum");
        assert_eq!(miss.depth, 0);
        assert!(miss.prefix);
    }

    #[test]
    fn test_json_round_trip_preserves_tree() {
        let tree = SearchTree::from_json(SMALL_TREE).unwrap();
        let dumped = tree.to_json().unwrap();
        assert_eq!(SearchTree::from_json(&dumped).unwrap(), tree);
    }
}
