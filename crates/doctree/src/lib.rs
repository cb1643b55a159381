//! doctree — a persistent block-tree document model.
//!
//! A document is an ordered collection of [`Block`]s keyed by unique string
//! keys.  Each block carries optional parent / previous-sibling /
//! next-sibling references and an ordered list of child keys; the
//! collection's iteration order is the document's linear sequence and must
//! stay consistent with the tree shape those references imply.
//!
//! [`TreeOps`] is the heart of the crate: five pure structural-mutation
//! entry points (map in, map out) that restructure the tree while keeping
//! every bidirectional reference mutually consistent.  Nothing is ever
//! mutated in place — every operation returns a new [`BlockMap`] sharing
//! unchanged substructure with its input.

pub mod block;
pub mod error;
pub mod key;
pub mod tree;
pub mod validate;

pub use block::{Block, BlockKey, BlockMap};
pub use error::TreeError;
pub use key::{fresh_key, generate_key};
pub use tree::{Side, TreeOps};
pub use validate::is_valid_tree;
