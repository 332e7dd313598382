#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod error;
pub mod geometry;
pub mod layout;
pub mod traits;

// The module directory is named `core/`, but that name would shadow the
// `core` crate throughout this file tree, so it is mounted under a
// different Rust path.
#[path = "core/mod.rs"]
pub mod tree;

#[cfg(test)]
mod tests;

// Re-exports
pub use crate::tree::{
    CursorInfo, DeleteFlags, ExtentCursor, ExtentFlags, InsertFlags, ObservedExtent, Verb,
};
pub use error::ExtentError;
pub use geometry::Geometry;
pub use layout::extent::{
    EXTENT_HEADER_MAGIC, Extent, ExtentHeader, ExtentIndex, MAX_INIT_LEN, verify_header,
};
pub use traits::block_device::BlockDevice;
pub use traits::inode_store::InodeStore;
