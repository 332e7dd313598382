#![allow(dead_code)]

use core::fmt;

/// Unified error type for the extent-tree cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtentError {
    /// Inode number is zero or exceeds the inode table.
    BadInodeNum,
    /// Inode does not have the extents flag set.
    NotExtentInode,
    /// A header invariant (magic / entries / max window) failed.
    HeaderBad,
    /// Operation needs a positioned cursor but `curr` is absent.
    NoCurrentNode,
    /// Traversal past the last sibling with no ascent available.
    NoNext,
    /// Traversal before the first sibling with no ascent available.
    NoPrev,
    /// Ascent attempted at the root.
    NoUp,
    /// Descent attempted from a leaf, or from an absent current entry.
    NoDown,
    /// `goto` found no mapping for the requested logical block.
    NotFound,
    /// Unrecognized traversal verb.
    OpNotSupported,
    /// The current node has no free slot for `insert`.
    CantInsert,
    /// A mutation was attempted on a read-only filesystem.
    ReadOnlyFs,
    /// The block-device or inode-store collaborator reported a failure.
    Io,
}

impl fmt::Display for ExtentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ExtentError::BadInodeNum => "inode number is zero or out of range",
            ExtentError::NotExtentInode => "inode does not use an extent tree",
            ExtentError::HeaderBad => "extent header invariant violated",
            ExtentError::NoCurrentNode => "cursor has no current entry",
            ExtentError::NoNext => "no next sibling",
            ExtentError::NoPrev => "no previous sibling",
            ExtentError::NoUp => "already at the root",
            ExtentError::NoDown => "cannot descend from this position",
            ExtentError::NotFound => "no mapping for the requested logical block",
            ExtentError::OpNotSupported => "unsupported traversal verb",
            ExtentError::CantInsert => "node is full",
            ExtentError::ReadOnlyFs => "filesystem is not mounted read-write",
            ExtentError::Io => "I/O collaborator failed",
        };
        f.write_str(msg)
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for ExtentError {}

/// Convenience Result type alias.
pub type Result<T> = ::core::result::Result<T, ExtentError>;
