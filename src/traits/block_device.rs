use crate::error::ExtentError;

/// Block-level I/O collaborator. The cursor never allocates or frees blocks;
/// it only reads the node a descent points to and writes back the node it
/// just mutated.
pub trait BlockDevice {
    /// Read `count` consecutive blocks starting at `pblk` into `buf`.
    ///
    /// `buf.len()` must equal `count as usize * block_size()`.
    fn read_block(
        &self,
        pblk: u64,
        count: u32,
        buf: &mut [u8],
    ) -> ::core::result::Result<(), ExtentError>;

    /// Write `buf` to `count` consecutive blocks starting at `pblk`.
    ///
    /// Read-only implementations may return `Err(ReadOnlyFs)`.
    fn write_block(
        &mut self,
        pblk: u64,
        count: u32,
        buf: &[u8],
    ) -> ::core::result::Result<(), ExtentError>;

    /// Block size in bytes (typically 1024 / 2048 / 4096).
    fn block_size(&self) -> usize;

    /// Total number of blocks on the device.
    fn total_blocks(&self) -> u64;
}

impl<T: BlockDevice + ?Sized> BlockDevice for &mut T {
    fn read_block(
        &self,
        pblk: u64,
        count: u32,
        buf: &mut [u8],
    ) -> ::core::result::Result<(), ExtentError> {
        (**self).read_block(pblk, count, buf)
    }

    fn write_block(
        &mut self,
        pblk: u64,
        count: u32,
        buf: &[u8],
    ) -> ::core::result::Result<(), ExtentError> {
        (**self).write_block(pblk, count, buf)
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn total_blocks(&self) -> u64 {
        (**self).total_blocks()
    }
}

impl<T: BlockDevice + ?Sized> BlockDevice for &T {
    fn read_block(
        &self,
        pblk: u64,
        count: u32,
        buf: &mut [u8],
    ) -> ::core::result::Result<(), ExtentError> {
        (**self).read_block(pblk, count, buf)
    }

    fn write_block(
        &mut self,
        _pblk: u64,
        _count: u32,
        _buf: &[u8],
    ) -> ::core::result::Result<(), ExtentError> {
        Err(ExtentError::ReadOnlyFs)
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn total_blocks(&self) -> u64 {
        (**self).total_blocks()
    }
}
