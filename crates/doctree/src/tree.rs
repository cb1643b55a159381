//! Structural-mutation primitives for the block tree.
//!
//! [`TreeOps`] exposes five pure entry points, each taking a [`BlockMap`]
//! snapshot and returning a new one:
//!
//! 1. [`link_parent_child`](TreeOps::link_parent_child) — insert a child at
//!    a position and mirror parent/sibling links onto it and its neighbors.
//! 2. [`link_siblings`](TreeOps::link_siblings) — set one bidirectional
//!    next/previous link.
//! 3. [`replace_child`](TreeOps::replace_child) — swap one child slot for
//!    another key.
//! 4. [`wrap_in_new_parent`](TreeOps::wrap_in_new_parent) — synthesize a
//!    container that takes a block's place in the tree and adopts it as its
//!    sole child.
//! 5. [`adopt_by_sibling`](TreeOps::adopt_by_sibling) — detach a block from
//!    its parent and re-attach it under its previous or next sibling.
//!
//! The first three are independent primitives; the last two compose them
//! and additionally splice the backing collection so that iteration order
//! keeps agreeing with the tree shape.  Composite operations assert
//! [`is_valid_tree`] on entry and exit when strict checks are enabled.

use std::fmt;

use crate::block::{Block, BlockMap};
use crate::error::TreeError;
use crate::key::fresh_key;
use crate::validate::is_valid_tree;

// ── Side ───────────────────────────────────────────────────────────────────

/// Which sibling of a block an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Previous,
    Next,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Previous => f.write_str("previous"),
            Side::Next => f.write_str("next"),
        }
    }
}

// ── TreeOps ────────────────────────────────────────────────────────────────

/// The tree-surgery component.
///
/// Carries a single `strict` flag: when set, the two composite operations
/// ([`wrap_in_new_parent`](TreeOps::wrap_in_new_parent),
/// [`adopt_by_sibling`](TreeOps::adopt_by_sibling)) assert global tree
/// validity on their input and output.  The check is always compiled in;
/// the flag only gates invocation.
#[derive(Debug, Clone, Copy)]
pub struct TreeOps {
    strict: bool,
}

impl Default for TreeOps {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeOps {
    /// Strict validity checking in debug builds, skipped in release builds.
    pub fn new() -> Self {
        Self {
            strict: cfg!(debug_assertions),
        }
    }

    /// Explicitly enable or disable strict validity checking.
    pub fn strict(strict: bool) -> Self {
        Self { strict }
    }

    fn check(&self, map: &BlockMap) -> Result<(), TreeError> {
        if self.strict && !is_valid_tree(map) {
            return Err(TreeError::InvalidTree);
        }
        Ok(())
    }

    // ── Primitives ─────────────────────────────────────────────────────

    /// Insert `child_key` into `parent_key`'s children at `position` and
    /// repair the three affected bidirectional links.
    ///
    /// The neighbor previously at `position - 1` (if any) gets its
    /// `next_sibling` re-pointed at the child; the neighbor previously at
    /// `position` (if any) gets its `prev_sibling` re-pointed; and the
    /// child's own `parent`, `prev_sibling`, and `next_sibling` are all set
    /// unconditionally, overwriting any prior values.  The backing
    /// collection's order is untouched — callers needing the order to
    /// follow the new tree shape must splice separately.
    pub fn link_parent_child(
        &self,
        map: &BlockMap,
        parent_key: &str,
        child_key: &str,
        position: usize,
    ) -> Result<BlockMap, TreeError> {
        let parent = lookup(map, parent_key)?;
        let child = lookup(map, child_key)?;

        let existing = &parent.children;
        if position > existing.len() {
            return Err(TreeError::InvalidPosition {
                position,
                count: existing.len(),
            });
        }

        let prev_key = position.checked_sub(1).map(|i| existing[i].clone());
        let next_key = existing.get(position).cloned();

        let mut children = existing.clone();
        children.insert(position, child_key.to_string());

        let mut out = map.set(
            parent_key.to_string(),
            Block {
                children,
                ..parent.clone()
            },
        );
        if let Some(prev) = &prev_key {
            let block = lookup(map, prev)?;
            out = out.set(
                prev.clone(),
                Block {
                    next_sibling: Some(child_key.to_string()),
                    ..block.clone()
                },
            );
        }
        if let Some(next) = &next_key {
            let block = lookup(map, next)?;
            out = out.set(
                next.clone(),
                Block {
                    prev_sibling: Some(child_key.to_string()),
                    ..block.clone()
                },
            );
        }
        out = out.set(
            child_key.to_string(),
            Block {
                parent: Some(parent_key.to_string()),
                prev_sibling: prev_key,
                next_sibling: next_key,
                ..child.clone()
            },
        );
        Ok(out)
    }

    /// Set `prev_key.next_sibling = next_key` and vice versa.
    ///
    /// A pure relink: parent and children fields are untouched, and any
    /// previous neighbor references on either side are simply overwritten —
    /// the caller is responsible for not orphaning them.
    pub fn link_siblings(
        &self,
        map: &BlockMap,
        prev_key: &str,
        next_key: &str,
    ) -> Result<BlockMap, TreeError> {
        let prev = lookup(map, prev_key)?;
        let next = lookup(map, next_key)?;
        Ok(map
            .set(
                prev_key.to_string(),
                Block {
                    next_sibling: Some(next_key.to_string()),
                    ..prev.clone()
                },
            )
            .set(
                next_key.to_string(),
                Block {
                    prev_sibling: Some(prev_key.to_string()),
                    ..next.clone()
                },
            ))
    }

    /// Overwrite `old_child_key`'s slot in `parent_key`'s children with
    /// `new_child_key`, and point the new child's `parent` at the parent.
    ///
    /// Sibling links of both children and the old child's own `parent`
    /// field are left as they are — a caller fully detaching the old child
    /// must handle those separately.
    pub fn replace_child(
        &self,
        map: &BlockMap,
        parent_key: &str,
        old_child_key: &str,
        new_child_key: &str,
    ) -> Result<BlockMap, TreeError> {
        let parent = lookup(map, parent_key)?;
        let new_child = lookup(map, new_child_key)?;

        let slot = parent
            .children
            .iter()
            .position(|k| k == old_child_key)
            .ok_or_else(|| TreeError::MissingBlock {
                key: old_child_key.to_string(),
            })?;
        let mut children = parent.children.clone();
        children[slot] = new_child_key.to_string();

        Ok(map
            .set(
                parent_key.to_string(),
                Block {
                    children,
                    ..parent.clone()
                },
            )
            .set(
                new_child_key.to_string(),
                Block {
                    parent: Some(parent_key.to_string()),
                    ..new_child.clone()
                },
            ))
    }

    // ── Composites ─────────────────────────────────────────────────────

    /// Synthesize a fresh container that takes `key`'s place in the tree
    /// (same parent, same sibling neighbors, same position in the backing
    /// collection) and installs `key` as its sole child.
    ///
    /// This is the only operation that creates a block: one new container
    /// per call, with empty text and `kind`/`depth` copied from `key`'s
    /// block.
    pub fn wrap_in_new_parent(&self, map: &BlockMap, key: &str) -> Result<BlockMap, TreeError> {
        self.check(map)?;
        let block = lookup(map, key)?.clone();

        let new_key = fresh_key(map);
        let new_parent = Block::container(new_key.clone(), block.kind.clone(), block.depth);

        // splice the container into the backing order just before `key`
        let mut out = map
            .take_until(|k, _| k == key)
            .set(new_key.clone(), new_parent)
            .concat(&map.skip_until(|k, _| k == key));

        // adopt first, transplant second: `link_parent_child` must
        // overwrite `key`'s own parent/sibling fields before the old
        // relationships are relinked onto the container
        out = self.link_parent_child(&out, &new_key, key, 0)?;
        if let Some(prev) = &block.prev_sibling {
            out = self.link_siblings(&out, prev, &new_key)?;
        }
        if let Some(next) = &block.next_sibling {
            out = self.link_siblings(&out, &new_key, next)?;
        }
        if let Some(parent) = &block.parent {
            out = self.replace_child(&out, parent, key, &new_key)?;
        }

        self.check(&out)?;
        Ok(out)
    }

    /// Detach `key` from its current parent and re-attach it as a child of
    /// its previous or next sibling.
    ///
    /// The adopting sibling must exist and be a container (empty text).
    /// Adopting towards [`Side::Next`] inserts `key` as the new parent's
    /// first child and reorders the backing collection so the parent
    /// precedes the child; adopting towards [`Side::Previous`] appends
    /// `key` as the last child, where the order is already right.  Either
    /// way `key`'s old sibling chain is repaired and `key` is removed from
    /// its former parent's children.
    pub fn adopt_by_sibling(
        &self,
        map: &BlockMap,
        key: &str,
        side: Side,
    ) -> Result<BlockMap, TreeError> {
        self.check(map)?;
        let block = lookup(map, key)?.clone();

        let new_parent_key = match side {
            Side::Previous => block.prev_sibling.clone(),
            Side::Next => block.next_sibling.clone(),
        }
        .ok_or_else(|| TreeError::MissingSibling {
            key: key.to_string(),
            side,
        })?;
        let new_parent = lookup(map, &new_parent_key)?;
        if !new_parent.is_container() {
            return Err(TreeError::NotAContainer {
                key: new_parent_key.clone(),
            });
        }

        let mut out = match side {
            Side::Next => {
                // become the new parent's first child
                let mut out = self.link_parent_child(map, &new_parent_key, key, 0)?;

                // the new parent's prev_sibling still points at `key`
                match &block.prev_sibling {
                    Some(old_prev) => {
                        out = self.link_siblings(&out, old_prev, &new_parent_key)?;
                    }
                    None => {
                        let parent = lookup(&out, &new_parent_key)?.clone();
                        out = out.set(
                            new_parent_key.clone(),
                            Block {
                                prev_sibling: None,
                                ..parent
                            },
                        );
                    }
                }

                // the new parent sits after `key` in the backing order but
                // is now its parent, so relocate: [..key) ++ [parent, key]
                // ++ (parent's old slot..]
                let parent = lookup(&out, &new_parent_key)?.clone();
                let adopted = lookup(&out, key)?.clone();
                let tail = out
                    .skip_until(|k, _| *k == new_parent_key)
                    .skip(1);
                out.take_until(|k, _| k == key)
                    .set(new_parent_key.clone(), parent)
                    .set(key.to_string(), adopted)
                    .concat(&tail)
            }
            Side::Previous => {
                // become the new parent's last child; order already right
                let count = new_parent.children.len();
                let mut out = self.link_parent_child(map, &new_parent_key, key, count)?;

                // the new parent's next_sibling still points at `key`
                match &block.next_sibling {
                    Some(old_next) => {
                        out = self.link_siblings(&out, &new_parent_key, old_next)?;
                    }
                    None => {
                        let parent = lookup(&out, &new_parent_key)?.clone();
                        out = out.set(
                            new_parent_key.clone(),
                            Block {
                                next_sibling: None,
                                ..parent
                            },
                        );
                    }
                }
                out
            }
        };

        // finally, drop `key` from its former parent's children
        if let Some(old_parent_key) = &block.parent {
            let old_parent = lookup(&out, old_parent_key)?.clone();
            let children = old_parent
                .children
                .iter()
                .filter(|c| c.as_str() != key)
                .cloned()
                .collect();
            out = out.set(
                old_parent_key.clone(),
                Block {
                    children,
                    ..old_parent
                },
            );
        }

        self.check(&out)?;
        Ok(out)
    }
}

fn lookup<'a>(map: &'a BlockMap, key: &str) -> Result<&'a Block, TreeError> {
    map.get(key).ok_or_else(|| TreeError::MissingBlock {
        key: key.to_string(),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────
