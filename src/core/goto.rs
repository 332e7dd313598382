use crate::error::{ExtentError, Result};
use crate::traits::block_device::BlockDevice;
use crate::traits::inode_store::InodeStore;

use super::cursor::ExtentCursor;
use super::traversal::Verb;

impl<D: BlockDevice, S: InodeStore> ExtentCursor<D, S> {
    /// Position the cursor on the leaf extent that covers `lblk`, or on the
    /// interior entry whose subtree would contain it.
    ///
    /// Descends level by level, at each interior node walking forward
    /// through siblings until it finds the one whose range brackets `lblk`,
    /// then stepping down into it. A `lblk` smaller than every entry in the
    /// tree (a hole before the first extent) reports `NotFound` after
    /// stepping the cursor back to the previous sibling as a side effect.
    pub fn goto(&mut self, lblk: u32) -> Result<()> {
        let mut extent = self.get(Verb::Root)?;

        loop {
            if self.level == self.max_depth as usize {
                if lblk >= extent.e_lblk && lblk < extent.e_lblk + extent.e_len {
                    return Ok(());
                }
                if lblk < extent.e_lblk {
                    let _ = self.get(Verb::PrevSib);
                    return Err(ExtentError::NotFound);
                }
                match self.get(Verb::NextSib) {
                    Err(ExtentError::NoNext) => return Err(ExtentError::NotFound),
                    Err(e) => return Err(e),
                    Ok(next) => {
                        extent = next;
                        continue;
                    }
                }
            }

            match self.get(Verb::NextSib) {
                Err(ExtentError::NoNext) => {
                    extent = self.get(Verb::Down)?;
                    continue;
                }
                Err(e) => return Err(e),
                Ok(next) => {
                    if lblk == next.e_lblk {
                        extent = self.get(Verb::Down)?;
                    } else if lblk > next.e_lblk {
                        extent = next;
                    } else {
                        self.get(Verb::PrevSib)?;
                        extent = self.get(Verb::Down)?;
                    }
                    continue;
                }
            }
        }
    }
}
