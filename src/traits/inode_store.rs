use crate::error::ExtentError;

/// Inode-table access collaborator, narrowed to whole-record read/write.
///
/// The cursor treats an inode as an opaque `isize`-byte record; it only
/// interprets the flags, size, and `i_block` fields it needs (see
/// `crate::core::cursor`), and leaves every other byte untouched on write.
pub trait InodeStore {
    /// Read the full on-disk inode record for `ino` into `buf`.
    ///
    /// `buf.len()` must equal `isize`.
    fn read_inode_full(
        &self,
        ino: u32,
        buf: &mut [u8],
        isize: usize,
    ) -> ::core::result::Result<(), ExtentError>;

    /// Write the full on-disk inode record for `ino` back from `buf`.
    fn write_inode_full(
        &mut self,
        ino: u32,
        buf: &[u8],
        isize: usize,
    ) -> ::core::result::Result<(), ExtentError>;
}

impl<T: InodeStore + ?Sized> InodeStore for &mut T {
    fn read_inode_full(
        &self,
        ino: u32,
        buf: &mut [u8],
        isize: usize,
    ) -> ::core::result::Result<(), ExtentError> {
        (**self).read_inode_full(ino, buf, isize)
    }

    fn write_inode_full(
        &mut self,
        ino: u32,
        buf: &[u8],
        isize: usize,
    ) -> ::core::result::Result<(), ExtentError> {
        (**self).write_inode_full(ino, buf, isize)
    }
}
