use log::debug;

use crate::error::{ExtentError, Result};
use crate::layout::extent::{Extent, ExtentIndex};
use crate::traits::block_device::BlockDevice;
use crate::traits::inode_store::InodeStore;

use super::cursor::{ExtentCursor, ObservedExtent};

/// Flags for [`ExtentCursor::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertFlags(u8);

impl InsertFlags {
    pub const NONE: InsertFlags = InsertFlags(0);
    /// Insert after `curr` instead of at it.
    pub const INSERT_AFTER: InsertFlags = InsertFlags(0x1);

    pub fn contains(self, other: InsertFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Flags for [`ExtentCursor::delete`]. No bits are currently defined; the
/// type exists so the call site reads like the other mutation verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteFlags(u8);

impl DeleteFlags {
    pub const NONE: DeleteFlags = DeleteFlags(0);
}

/// Build the on-disk extent record to write for `replace`/`insert`.
///
/// `e_len` is written verbatim: the uninit encoding (offsetting by
/// `MAX_INIT_LEN`) is the caller's responsibility, mirroring the reference
/// implementation's `replace`, which never re-derives `ee_len` from flags.
fn extent_record_raw(extent: &ObservedExtent) -> Extent {
    Extent {
        ee_block: extent.e_lblk,
        ee_len: extent.e_len as u16,
        ee_start_hi: (extent.e_pblk >> 32) as u16,
        ee_start_lo: extent.e_pblk as u32,
    }
}

impl<D: BlockDevice, S: InodeStore> ExtentCursor<D, S> {
    /// Overwrite the current record in place and persist the owning node.
    pub fn replace(&mut self, extent: ObservedExtent) -> Result<()> {
        if !self.geometry.read_write {
            return Err(ExtentError::ReadOnlyFs);
        }
        let level = self.level;
        let max_depth = self.max_depth as usize;
        let curr = self.frames[level].curr.ok_or(ExtentError::NoCurrentNode)? as usize;

        if level == max_depth {
            self.frames[level].set_extent_at(curr, &extent_record_raw(&extent));
        } else {
            let rec = ExtentIndex::from_parts(extent.e_lblk, extent.e_pblk);
            self.frames[level].set_index_at(curr, &rec);
        }
        self.persist()
    }

    /// Insert a new record at (or after) `curr`, shifting the remainder of
    /// the node to make room. Fails with `CantInsert` if the node is full;
    /// any error past the shift rolls back with a best-effort `delete`.
    pub fn insert(&mut self, flags: InsertFlags, extent: ObservedExtent) -> Result<()> {
        if !self.geometry.read_write {
            return Err(ExtentError::ReadOnlyFs);
        }
        let level = self.level;
        let max_depth = self.max_depth as usize;

        {
            let frame = &self.frames[level];
            if frame.entries >= frame.max_entries {
                return Err(ExtentError::CantInsert);
            }
        }

        let idx = {
            let frame = &mut self.frames[level];
            let mut idx = frame.curr.unwrap_or(0);
            if frame.curr.is_some() && flags.contains(InsertFlags::INSERT_AFTER) {
                idx += 1;
                frame.left -= 1;
            }
            frame.curr = Some(idx);
            idx
        };

        {
            let frame = &mut self.frames[level];
            // Records at/after the insertion point, not `left + 1`: `left`
            // only tracks that count relative to a `curr` set by a prior
            // `get()`. Right after `open`, `curr` is `None` and `left` is
            // seeded to the full entry count, so `left + 1` overshoots by
            // one and walks `shift_right` past the end of the buffer.
            let shift_n = (frame.entries as i32 - idx as i32).max(0) as usize;
            frame.shift_right(idx as usize, shift_n);
            frame.left += 1;
            frame.entries += 1;
            frame.write_entries_header();
        }

        if level == max_depth {
            self.frames[level].set_extent_at(idx as usize, &extent_record_raw(&extent));
        } else {
            let rec = ExtentIndex::from_parts(extent.e_lblk, extent.e_pblk);
            self.frames[level].set_index_at(idx as usize, &rec);
        }

        if let Err(e) = self.persist() {
            debug!("insert failed at ino={} level={}, rolling back", self.ino, level);
            let _ = self.delete(DeleteFlags::NONE);
            return Err(e);
        }
        Ok(())
    }

    /// Remove the current record, shifting the remainder of the node down,
    /// and persist the owning node.
    pub fn delete(&mut self, _flags: DeleteFlags) -> Result<()> {
        if !self.geometry.read_write {
            return Err(ExtentError::ReadOnlyFs);
        }
        let level = self.level;
        let frame = &mut self.frames[level];
        let curr = frame.curr.ok_or(ExtentError::NoCurrentNode)?;

        if frame.left > 0 {
            frame.shift_left(curr as usize, frame.left as usize);
            frame.left -= 1;
        } else {
            frame.curr = curr.checked_sub(1);
        }
        frame.entries -= 1;
        if frame.entries == 0 {
            frame.curr = None;
        }
        frame.write_entries_header();
        self.persist()
    }
}
