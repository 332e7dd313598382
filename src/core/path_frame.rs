use alloc::vec::Vec;

use crate::error::Result;
use crate::layout::extent::{
    Extent, ExtentHeader, ExtentIndex, HEADER_SIZE, RECORD_SIZE, verify_header,
};

/// One level of the path stack: the raw node buffer plus the cursor's
/// position within it. Frames are addressed by index into `ExtentCursor::frames`
/// rather than by pointer, so ascending never leaves a dangling reference.
#[derive(Debug)]
pub(crate) struct PathFrame {
    /// Raw node bytes: 60 for the root (embedded in `i_block`), `block_size`
    /// for every other level. Empty until the frame is first populated.
    pub buf: Vec<u8>,
    pub entries: u16,
    pub max_entries: u16,
    /// Records strictly to the right of `curr` in this node.
    pub left: i32,
    /// Index of the current record, or `None` if the node is empty.
    pub curr: Option<u16>,
    /// Two-visit marker for interior nodes: 0 = first (pre-order) visit,
    /// 1 = second (post-order) visit.
    pub visit_num: u8,
    /// Exclusive logical-block upper bound of this subtree, inherited from
    /// the parent's next-sibling key or the file's block count.
    pub end_blk: u32,
    /// This node's own `eh_depth`.
    pub depth: u16,
}

impl PathFrame {
    pub fn empty() -> Self {
        PathFrame {
            buf: Vec::new(),
            entries: 0,
            max_entries: 0,
            left: 0,
            curr: None,
            visit_num: 0,
            end_blk: 0,
            depth: 0,
        }
    }

    fn record_offset(idx: usize) -> usize {
        HEADER_SIZE + idx * RECORD_SIZE
    }

    pub fn is_leaf(&self) -> bool {
        self.depth == 0
    }

    pub fn index_at(&self, idx: usize) -> Result<ExtentIndex> {
        let off = Self::record_offset(idx);
        ExtentIndex::parse(&self.buf[off..off + RECORD_SIZE])
    }

    pub fn set_index_at(&mut self, idx: usize, rec: &ExtentIndex) {
        let off = Self::record_offset(idx);
        rec.encode(&mut self.buf[off..off + RECORD_SIZE]);
    }

    pub fn extent_at(&self, idx: usize) -> Result<Extent> {
        let off = Self::record_offset(idx);
        Extent::parse(&self.buf[off..off + RECORD_SIZE])
    }

    pub fn set_extent_at(&mut self, idx: usize, rec: &Extent) {
        let off = Self::record_offset(idx);
        rec.encode(&mut self.buf[off..off + RECORD_SIZE]);
    }

    /// Persist `entries` into the header's `eh_entries` field.
    pub fn write_entries_header(&mut self) {
        self.buf[2..4].copy_from_slice(&self.entries.to_le_bytes());
    }

    /// Load and validate the header, caching `entries`/`max_entries`/`depth`.
    pub fn load_header(&mut self, node_size: usize) -> Result<ExtentHeader> {
        let header = verify_header(&self.buf, node_size)?;
        self.entries = header.eh_entries;
        self.max_entries = header.eh_max;
        self.depth = header.eh_depth;
        Ok(header)
    }

    /// `memmove(ix + 1, ix, n * record_size)`: shift `n` records starting at
    /// `idx` one slot to the right, opening up slot `idx`.
    pub fn shift_right(&mut self, idx: usize, n: usize) {
        if n == 0 {
            return;
        }
        let start = Self::record_offset(idx);
        let len = n * RECORD_SIZE;
        self.buf.copy_within(start..start + len, start + RECORD_SIZE);
    }

    /// `memmove(cp, cp + record_size, n * record_size)`: shift `n` records
    /// starting at `idx + 1` one slot to the left, closing slot `idx`.
    pub fn shift_left(&mut self, idx: usize, n: usize) {
        if n == 0 {
            return;
        }
        let start = Self::record_offset(idx);
        let len = n * RECORD_SIZE;
        self.buf.copy_within(start + RECORD_SIZE..start + RECORD_SIZE + len, start);
    }
}
