use log::trace;

use crate::error::{ExtentError, Result};
use crate::traits::block_device::BlockDevice;
use crate::traits::inode_store::InodeStore;

use super::cursor::{ExtentCursor, ObservedExtent};

/// Traversal verbs accepted by [`ExtentCursor::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Current,
    Root,
    FirstSib,
    LastSib,
    NextSib,
    PrevSib,
    Up,
    Down,
    DownAndLast,
    Next,
    Prev,
    NextLeaf,
    PrevLeaf,
    LastLeaf,
}

/// Elementary moves the traversal state machine reduces a [`Verb`] to.
/// `Root` and `FirstSib` fall through into the next move, mirroring the
/// switch-case fallthrough of the original state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Current,
    Root,
    FirstSib,
    NextSib,
    PrevSib,
    LastSib,
    Up,
    Down,
    DownAndLast,
}

impl<D: BlockDevice, S: InodeStore> ExtentCursor<D, S> {
    /// Execute one traversal verb and return the newly observed position.
    ///
    /// `NEXT_LEAF`/`PREV_LEAF`/`LAST_LEAF` may take several elementary moves
    /// internally (descending past interior levels); every other verb takes
    /// exactly one.
    pub fn get(&mut self, verb: Verb) -> Result<ObservedExtent> {
        loop {
            let mv = self.resolve_move(verb)?;
            self.apply_move(mv, verb)?;
            let observed = self.observe_current()?;

            let max_depth = self.max_depth as usize;
            let retry = match verb {
                Verb::NextLeaf | Verb::PrevLeaf => self.level != max_depth,
                Verb::LastLeaf => {
                    self.level != max_depth || self.frames[self.level].left != 0
                }
                _ => false,
            };
            if retry {
                continue;
            }
            trace!("get({:?}) -> lblk={} level={}", verb, observed.e_lblk, self.level);
            return Ok(observed);
        }
    }

    fn resolve_move(&mut self, verb: Verb) -> Result<Move> {
        let level = self.level;
        let max_depth = self.max_depth as usize;

        Ok(match verb {
            Verb::Current => Move::Current,
            Verb::Root => Move::Root,
            Verb::FirstSib => Move::FirstSib,
            Verb::LastSib => Move::LastSib,
            Verb::NextSib => Move::NextSib,
            Verb::PrevSib => Move::PrevSib,
            Verb::Up => Move::Up,
            Verb::Down => Move::Down,
            Verb::DownAndLast => Move::DownAndLast,
            Verb::Next | Verb::NextLeaf => {
                let frame = &mut self.frames[level];
                if level < max_depth {
                    if frame.visit_num == 0 {
                        frame.visit_num = 1;
                        Move::Down
                    } else if frame.left > 0 {
                        Move::NextSib
                    } else if level > 0 {
                        Move::Up
                    } else {
                        return Err(ExtentError::NoNext);
                    }
                } else if frame.left > 0 {
                    Move::NextSib
                } else if level > 0 {
                    Move::Up
                } else {
                    return Err(ExtentError::NoNext);
                }
            }
            Verb::Prev | Verb::PrevLeaf => {
                let frame = &self.frames[level];
                if level < max_depth {
                    if frame.visit_num > 0 {
                        Move::DownAndLast
                    } else if frame.left < frame.entries as i32 - 1 {
                        Move::PrevSib
                    } else if level > 0 {
                        Move::Up
                    } else {
                        return Err(ExtentError::NoPrev);
                    }
                } else if frame.left < frame.entries as i32 - 1 {
                    Move::PrevSib
                } else if level > 0 {
                    Move::Up
                } else {
                    return Err(ExtentError::NoPrev);
                }
            }
            Verb::LastLeaf => {
                let frame = &self.frames[level];
                if level < max_depth && frame.left == 0 {
                    Move::Down
                } else {
                    Move::LastSib
                }
            }
        })
    }

    fn apply_move(&mut self, mv: Move, orig_verb: Verb) -> Result<()> {
        match mv {
            Move::Current => {
                if self.frames[self.level].curr.is_none() {
                    return Err(ExtentError::NoCurrentNode);
                }
                Ok(())
            }
            Move::Root => {
                self.level = 0;
                self.apply_move(Move::FirstSib, orig_verb)
            }
            Move::FirstSib => {
                {
                    let frame = &mut self.frames[self.level];
                    frame.left = frame.entries as i32;
                    frame.curr = None;
                }
                self.apply_move(Move::NextSib, orig_verb)
            }
            Move::NextSib => {
                let frame = &mut self.frames[self.level];
                if frame.left <= 0 {
                    return Err(ExtentError::NoNext);
                }
                frame.curr = Some(frame.curr.map_or(0, |c| c + 1));
                frame.left -= 1;
                frame.visit_num = 0;
                Ok(())
            }
            Move::PrevSib => {
                let frame = &mut self.frames[self.level];
                let curr = frame.curr.ok_or(ExtentError::NoPrev)?;
                if frame.left + 1 >= frame.entries as i32 {
                    return Err(ExtentError::NoPrev);
                }
                frame.curr = Some(curr - 1);
                frame.left += 1;
                if self.level < self.max_depth as usize {
                    frame.visit_num = 1;
                }
                Ok(())
            }
            Move::LastSib => {
                let frame = &mut self.frames[self.level];
                frame.curr = if frame.entries > 0 {
                    Some(frame.entries - 1)
                } else {
                    None
                };
                frame.left = 0;
                frame.visit_num = 0;
                Ok(())
            }
            Move::Up => {
                if self.level == 0 {
                    return Err(ExtentError::NoUp);
                }
                self.level -= 1;
                if matches!(orig_verb, Verb::Prev | Verb::PrevLeaf) {
                    self.frames[self.level].visit_num = 0;
                }
                Ok(())
            }
            Move::Down => self.descend(false),
            Move::DownAndLast => self.descend(true),
        }
    }

    fn descend(&mut self, last: bool) -> Result<()> {
        let level = self.level;
        if level >= self.max_depth as usize {
            return Err(ExtentError::NoDown);
        }
        let cur_idx = self.frames[level].curr.ok_or(ExtentError::NoDown)?;
        let ix = self.frames[level].index_at(cur_idx as usize)?;
        let next_end = if self.frames[level].left > 0 {
            Some(self.frames[level].index_at(cur_idx as usize + 1)?.ei_block)
        } else {
            None
        };
        let parent_end_blk = self.frames[level].end_blk;

        self.load_child(level, ix.child_block())?;

        let node_size = self.geometry.block_size;
        self.frames[level + 1].load_header(node_size)?;

        self.level = level + 1;
        let frame = &mut self.frames[self.level];
        frame.end_blk = next_end.unwrap_or(parent_end_blk);

        if last {
            frame.curr = if frame.entries > 0 {
                Some(frame.entries - 1)
            } else {
                None
            };
            frame.left = 0;
            if self.level < self.max_depth as usize {
                frame.visit_num = 1;
            }
            // else: leave visit_num as whatever the frame previously held,
            // matching the reference descent (it does not reset it here).
        } else {
            frame.curr = if frame.entries > 0 { Some(0) } else { None };
            frame.left = if frame.entries > 0 {
                frame.entries as i32 - 1
            } else {
                0
            };
            frame.visit_num = 0;
        }

        Ok(())
    }
}
