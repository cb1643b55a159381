//! Global tree-validity predicate.
//!
//! [`is_valid_tree`] decides whether a [`BlockMap`] is well-formed: every
//! reference resolves, parent/child and sibling links are mutually
//! consistent, each children list forms a connected sibling chain, and the
//! map's iteration order agrees with the tree shape (a parent precedes its
//! children).  The tree core invokes it around composite operations when
//! strict checks are enabled; it is also a handy assertion for tests.

use std::collections::HashMap;

use crate::block::{Block, BlockKey, BlockMap};

/// `true` iff the block map satisfies every structural invariant.
pub fn is_valid_tree(map: &BlockMap) -> bool {
    let positions: HashMap<&BlockKey, usize> =
        map.keys().enumerate().map(|(i, k)| (k, i)).collect();

    for (key, block) in map.iter() {
        if !refs_resolve(map, block) {
            return false;
        }
        if !siblings_symmetric(map, key, block) {
            return false;
        }
        if !parent_lists_block(map, key, block) {
            return false;
        }
        if !children_chain_connected(map, key, block) {
            return false;
        }
        // a parent must precede each of its children in iteration order
        for child in &block.children {
            if positions[child] < positions[key] {
                return false;
            }
        }
    }
    true
}

fn refs_resolve(map: &BlockMap, block: &Block) -> bool {
    block
        .parent
        .iter()
        .chain(block.prev_sibling.iter())
        .chain(block.next_sibling.iter())
        .chain(block.children.iter())
        .all(|key| map.contains_key(key))
}

fn siblings_symmetric(map: &BlockMap, key: &BlockKey, block: &Block) -> bool {
    if let Some(next) = &block.next_sibling {
        match map.get(next) {
            Some(n) if n.prev_sibling.as_ref() == Some(key) => {}
            _ => return false,
        }
    }
    if let Some(prev) = &block.prev_sibling {
        match map.get(prev) {
            Some(p) if p.next_sibling.as_ref() == Some(key) => {}
            _ => return false,
        }
    }
    true
}

fn parent_lists_block(map: &BlockMap, key: &BlockKey, block: &Block) -> bool {
    match &block.parent {
        None => true,
        Some(parent_key) => match map.get(parent_key) {
            Some(parent) => parent.children.iter().filter(|c| *c == key).count() == 1,
            None => false,
        },
    }
}

/// A children list must be a connected sibling chain: the first child has no
/// previous sibling, the last has no next, consecutive children link both
/// ways, and every child points back to this block as its parent.
fn children_chain_connected(map: &BlockMap, key: &BlockKey, block: &Block) -> bool {
    for (i, child_key) in block.children.iter().enumerate() {
        let Some(child) = map.get(child_key) else {
            return false;
        };
        if child.parent.as_ref() != Some(key) {
            return false;
        }
        let expected_prev = if i > 0 { Some(&block.children[i - 1]) } else { None };
        let expected_next = block.children.get(i + 1);
        if child.prev_sibling.as_ref() != expected_prev {
            return false;
        }
        if child.next_sibling.as_ref() != expected_next {
            return false;
        }
    }
    true
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    fn doc() -> BlockMap {
        // P is a container holding [a, b]; c trails at top level.
        BlockMap::new()
            .set(
                "p".to_string(),
                Block {
                    next_sibling: Some("c".to_string()),
                    children: vec!["a".to_string(), "b".to_string()],
                    ..Block::container("p", "unstyled", 0)
                },
            )
            .set(
                "a".to_string(),
                Block {
                    parent: Some("p".to_string()),
                    next_sibling: Some("b".to_string()),
                    ..Block::leaf("a", "unstyled", 0, "alpha")
                },
            )
            .set(
                "b".to_string(),
                Block {
                    parent: Some("p".to_string()),
                    prev_sibling: Some("a".to_string()),
                    ..Block::leaf("b", "unstyled", 0, "beta")
                },
            )
            .set(
                "c".to_string(),
                Block {
                    prev_sibling: Some("p".to_string()),
                    ..Block::leaf("c", "unstyled", 0, "gamma")
                },
            )
    }

    #[test]
    fn well_formed_document_is_valid() {
        assert!(is_valid_tree(&doc()));
    }

    #[test]
    fn empty_map_is_valid() {
        assert!(is_valid_tree(&BlockMap::new()));
    }

    #[test]
    fn broken_sibling_symmetry_is_invalid() {
        let map = doc();
        let a = Block {
            next_sibling: Some("c".to_string()),
            ..map.get("a").unwrap().clone()
        };
        assert!(!is_valid_tree(&map.set("a".to_string(), a)));
    }

    #[test]
    fn dangling_child_reference_is_invalid() {
        let map = doc();
        let p = Block {
            children: vec!["a".to_string(), "ghost".to_string()],
            ..map.get("p").unwrap().clone()
        };
        assert!(!is_valid_tree(&map.set("p".to_string(), p)));
    }

    #[test]
    fn child_missing_parent_backlink_is_invalid() {
        let map = doc();
        let b = Block {
            parent: None,
            ..map.get("b").unwrap().clone()
        };
        assert!(!is_valid_tree(&map.set("b".to_string(), b)));
    }

    #[test]
    fn disconnected_children_chain_is_invalid() {
        let map = doc();
        let a = Block {
            next_sibling: None,
            ..map.get("a").unwrap().clone()
        };
        let b = Block {
            prev_sibling: None,
            ..map.get("b").unwrap().clone()
        };
        assert!(!is_valid_tree(
            &map.set("a".to_string(), a).set("b".to_string(), b)
        ));
    }

    #[test]
    fn child_before_parent_in_order_is_invalid() {
        // same links as doc(), but `a` inserted before its parent
        let src = doc();
        let mut reordered = BlockMap::new();
        for key in ["a", "p", "b", "c"] {
            reordered = reordered.set(key.to_string(), src.get(key).unwrap().clone());
        }
        assert!(!is_valid_tree(&reordered));
    }
}
