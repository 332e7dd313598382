use alloc::vec;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::error::{ExtentError, Result};
use crate::geometry::Geometry;
use crate::layout::extent::{MAX_INIT_LEN, RECORD_SIZE, verify_header};
use crate::layout::read_u32_le;
use crate::traits::block_device::BlockDevice;
use crate::traits::inode_store::InodeStore;

use super::path_frame::PathFrame;

// Offsets into the raw on-disk inode record the cursor reads directly
// (mirrors the fixed base-inode layout; see `crate::layout::inode`).
const I_SIZE_LO_OFFSET: usize = 0x04;
const I_FLAGS_OFFSET: usize = 0x20;
const I_BLOCK_OFFSET: usize = 0x28;
const I_BLOCK_SIZE: usize = 60;
const I_SIZE_HI_OFFSET: usize = 0x6C;
const EXTENTS_FL: u32 = 0x0008_0000;

/// Bits describing an observed record, independent of whether it came from
/// an interior index or a leaf extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtentFlags(u8);

impl ExtentFlags {
    pub const NONE: ExtentFlags = ExtentFlags(0);
    pub const LEAF: ExtentFlags = ExtentFlags(0x1);
    pub const UNINIT: ExtentFlags = ExtentFlags(0x2);
    pub const SECOND_VISIT: ExtentFlags = ExtentFlags(0x4);

    pub fn contains(self, other: ExtentFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for ExtentFlags {
    type Output = ExtentFlags;
    fn bitor(self, rhs: ExtentFlags) -> ExtentFlags {
        ExtentFlags(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for ExtentFlags {
    fn bitor_assign(&mut self, rhs: ExtentFlags) {
        self.0 |= rhs.0;
    }
}

/// A single logical->physical mapping observed at the cursor's current
/// position, whether that position is a leaf extent or an interior index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedExtent {
    pub e_lblk: u32,
    pub e_pblk: u64,
    pub e_len: u32,
    pub flags: ExtentFlags,
}

/// Snapshot of the cursor's position, for diagnostics and capacity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorInfo {
    pub curr_entry_index: u16,
    pub num_entries: u16,
    pub max_entries: u16,
    pub bytes_avail: u32,
    pub curr_level: u16,
    pub max_depth: u16,
    pub max_lblk: u32,
    pub max_pblk: u64,
    pub max_len: u16,
    pub max_uninit_len: u16,
}

/// Stateful handle over one inode's extent tree.
///
/// Holds the path stack (root frame plus one frame per tree level) and the
/// raw inode record it was opened from; every mutation is staged into a
/// frame's buffer and only reaches the collaborators on `persist`.
pub struct ExtentCursor<D, S> {
    pub(crate) device: D,
    pub(crate) store: S,
    pub(crate) geometry: Geometry,
    pub(crate) ino: u32,
    pub(crate) inode_raw: Vec<u8>,
    pub(crate) frames: Vec<PathFrame>,
    pub(crate) level: usize,
    pub(crate) max_depth: u16,
}

impl<D: BlockDevice, S: InodeStore> ExtentCursor<D, S> {
    /// Open a cursor on `ino`'s extent tree.
    pub fn open(device: D, store: S, geometry: Geometry, ino: u32) -> Result<Self> {
        if ino == 0 || ino > geometry.inodes_count {
            debug!("extent cursor open failed: ino={} bad inode number", ino);
            return Err(ExtentError::BadInodeNum);
        }

        let mut inode_raw = vec![0u8; geometry.inode_size];
        store.read_inode_full(ino, &mut inode_raw, geometry.inode_size)?;

        let flags = read_u32_le(&inode_raw, I_FLAGS_OFFSET);
        if flags & EXTENTS_FL == 0 {
            debug!("extent cursor open failed: ino={} not an extent inode", ino);
            return Err(ExtentError::NotExtentInode);
        }

        let i_block = &inode_raw[I_BLOCK_OFFSET..I_BLOCK_OFFSET + I_BLOCK_SIZE];
        let header = match verify_header(i_block, I_BLOCK_SIZE) {
            Ok(header) => header,
            Err(e) => {
                debug!("extent cursor open failed: ino={} header invalid: {}", ino, e);
                return Err(e);
            }
        };
        let max_depth = header.eh_depth;

        let size_lo = read_u32_le(&inode_raw, I_SIZE_LO_OFFSET) as u64;
        let size_hi = read_u32_le(&inode_raw, I_SIZE_HI_OFFSET) as u64;
        let i_size = (size_hi << 32) | size_lo;
        let block_size = geometry.block_size as u64;
        let end_blk = ((i_size + block_size - 1) / block_size) as u32;

        let mut root = PathFrame::empty();
        root.buf = i_block.to_vec();
        root.entries = header.eh_entries;
        root.max_entries = header.eh_max;
        root.depth = header.eh_depth;
        root.end_blk = end_blk;
        root.curr = None;
        root.left = header.eh_entries as i32;
        root.visit_num = 1;

        let mut frames = Vec::with_capacity(max_depth as usize + 1);
        frames.push(root);
        for _ in 0..max_depth {
            frames.push(PathFrame::empty());
        }

        trace!(
            "extent cursor opened: ino={} max_depth={} entries={}",
            ino, max_depth, header.eh_entries
        );

        Ok(ExtentCursor {
            device,
            store,
            geometry,
            ino,
            inode_raw,
            frames,
            level: 0,
            max_depth,
        })
    }

    /// Release the cursor. Any buffered mutation has already reached the
    /// collaborators via `persist`; this only drops in-memory state.
    pub fn free(self) {}

    pub fn get_info(&self) -> CursorInfo {
        let frame = &self.frames[self.level];
        CursorInfo {
            curr_entry_index: frame.curr.unwrap_or(0),
            num_entries: frame.entries,
            max_entries: frame.max_entries,
            bytes_avail: (frame.max_entries.saturating_sub(frame.entries)) as u32 * RECORD_SIZE as u32,
            curr_level: self.level as u16,
            max_depth: self.max_depth,
            max_lblk: u32::MAX,
            max_pblk: (1u64 << 48) - 1,
            max_len: MAX_INIT_LEN,
            max_uninit_len: MAX_INIT_LEN - 1,
        }
    }

    pub(crate) fn observe_current(&self) -> Result<ObservedExtent> {
        let frame = &self.frames[self.level];
        let curr = frame.curr.ok_or(ExtentError::NoCurrentNode)?;

        let mut flags = ExtentFlags::NONE;
        let (e_lblk, e_pblk, e_len);

        if self.level == self.max_depth as usize {
            let ex = frame.extent_at(curr as usize)?;
            e_lblk = ex.ee_block;
            e_pblk = ex.physical_start();
            e_len = ex.block_count() as u32;
            flags |= ExtentFlags::LEAF;
            if ex.is_uninitialized() {
                flags |= ExtentFlags::UNINIT;
            }
        } else {
            let ix = frame.index_at(curr as usize)?;
            e_lblk = ix.ei_block;
            e_pblk = ix.child_block();
            let end = if frame.left > 0 {
                frame.index_at(curr as usize + 1)?.ei_block
            } else {
                frame.end_blk
            };
            e_len = end.saturating_sub(e_lblk);
        }

        if frame.visit_num == 1 {
            flags |= ExtentFlags::SECOND_VISIT;
        }

        Ok(ObservedExtent { e_lblk, e_pblk, e_len, flags })
    }

    /// Write the current frame back to its owning collaborator: the root
    /// frame's bytes are folded back into the inode record and handed to
    /// the inode store, every other frame is written to its own block.
    pub(crate) fn persist(&mut self) -> Result<()> {
        if self.level == 0 {
            let frame = &self.frames[0];
            self.inode_raw[I_BLOCK_OFFSET..I_BLOCK_OFFSET + I_BLOCK_SIZE]
                .copy_from_slice(&frame.buf);
            self.store
                .write_inode_full(self.ino, &self.inode_raw, self.geometry.inode_size)?;
            debug!("extent cursor persisted: ino={} store=inode", self.ino);
        } else {
            let parent_idx = self.level - 1;
            let child_curr = self.frames[parent_idx]
                .curr
                .ok_or(ExtentError::NoCurrentNode)?;
            let ix = self.frames[parent_idx].index_at(child_curr as usize)?;
            let block = ix.child_block();
            let frame = &self.frames[self.level];
            self.device.write_block(block, 1, &frame.buf)?;
            debug!(
                "extent cursor persisted: ino={} store=block block={}",
                self.ino, block
            );
        }
        Ok(())
    }

    /// Read (or zero-fill, in image mode) the child block pointed to by
    /// `child_blk` into the frame at `level + 1`, allocating its buffer on
    /// first use.
    pub(crate) fn load_child(&mut self, level: usize, child_blk: u64) -> Result<()> {
        let block_size = self.geometry.block_size;
        let frame_next = &mut self.frames[level + 1];
        if frame_next.buf.is_empty() {
            frame_next.buf = vec![0u8; block_size];
        }
        if self.geometry.image_mode {
            for b in frame_next.buf.iter_mut() {
                *b = 0;
            }
        } else {
            self.device.read_block(child_blk, 1, &mut frame_next.buf)?;
        }
        Ok(())
    }
}
