/// Static filesystem geometry the cursor needs but never derives itself.
///
/// Supplied by the caller; the superblock and block-group bookkeeping that
/// would normally produce these values sit outside this crate.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    /// Block size in bytes (1024 / 2048 / 4096).
    pub block_size: usize,
    /// On-disk inode record size in bytes (typically 128 or 256).
    pub inode_size: usize,
    /// Total number of inodes in the filesystem.
    pub inodes_count: u32,
    /// Whether the filesystem is mounted read-write.
    pub read_write: bool,
    /// e2image-style mode: descents read zero-filled blocks instead of
    /// issuing device I/O, since the image may not carry sibling subtrees.
    pub image_mode: bool,
}
