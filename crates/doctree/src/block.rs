//! The `Block` record — a single addressable element of the document tree.

use doctree_ordmap::OrdMap;
use serde::{Deserialize, Serialize};

/// Unique string identifier for a block within one document version.
pub type BlockKey = String;

/// The ordered, key-indexed container holding every block of one document
/// version.  Iteration order is the document's linear sequence.
pub type BlockMap = OrdMap<BlockKey, Block>;

// ── Block ──────────────────────────────────────────────────────────────────

/// An immutable tree element.
///
/// A block with empty [`text`](Block::text) is a *container*: a purely
/// structural node that exists to hold children.  All fields are public;
/// copy-with-changes is struct-update syntax over a clone, e.g.
///
/// ```
/// # use doctree::Block;
/// let block = Block::leaf("a", "unstyled", 0, "hello");
/// let moved = Block { parent: Some("p".to_string()), ..block.clone() };
/// assert_eq!(moved.text, block.text);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Unique key, stable for the lifetime of the document version.
    pub key: BlockKey,
    /// Text content; empty marks a structural (container) block.
    #[serde(default)]
    pub text: String,
    /// Open block-type tag (e.g. `"unstyled"`, `"ordered-list-item"`).
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub parent: Option<BlockKey>,
    #[serde(default)]
    pub prev_sibling: Option<BlockKey>,
    #[serde(default)]
    pub next_sibling: Option<BlockKey>,
    /// Ordered child keys, possibly empty.
    #[serde(default)]
    pub children: Vec<BlockKey>,
}

impl Block {
    /// A detached block with the given key and everything else empty.
    pub fn new(key: impl Into<BlockKey>) -> Self {
        Self {
            key: key.into(),
            text: String::new(),
            kind: String::new(),
            depth: 0,
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            children: Vec::new(),
        }
    }

    /// A detached leaf block carrying text.
    pub fn leaf(
        key: impl Into<BlockKey>,
        kind: impl Into<String>,
        depth: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            depth,
            text: text.into(),
            ..Self::new(key)
        }
    }

    /// A detached container block (empty text, no children yet).
    pub fn container(key: impl Into<BlockKey>, kind: impl Into<String>, depth: usize) -> Self {
        Self {
            kind: kind.into(),
            depth,
            ..Self::new(key)
        }
    }

    /// `true` if this block is purely structural (empty text).
    pub fn is_container(&self) -> bool {
        self.text.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
