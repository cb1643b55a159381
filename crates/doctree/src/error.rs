//! The contract-violation error raised by tree operations.

use thiserror::Error;

use crate::block::BlockKey;
use crate::tree::Side;

/// A precondition violation.
///
/// Every variant signals a logic bug in the caller or a corrupted document,
/// not a recoverable runtime condition.  Operations never catch this
/// internally, and because they are pure the input map is always left
/// untouched by a failed call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A parent, child, sibling, or target lookup named a key absent from
    /// the block map.
    #[error("block `{key}` does not exist in the block map")]
    MissingBlock { key: BlockKey },

    /// Child insertion index outside `[0, child count]`.
    #[error("position {position} is not valid for {count} children")]
    InvalidPosition { position: usize, count: usize },

    /// An adoption was requested towards a sibling the block does not have.
    #[error("block `{key}` has no {side} sibling")]
    MissingSibling { key: BlockKey, side: Side },

    /// An adopting sibling must be a container (empty text).
    #[error("block `{key}` is not a container")]
    NotAContainer { key: BlockKey },

    /// A strict-mode validity assertion failed on the input or output of a
    /// composite operation.
    #[error("block map failed tree validation")]
    InvalidTree,
}
