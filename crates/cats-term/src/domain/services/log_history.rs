use std::collections::VecDeque;

use crate::domain::models::DisplayBlock;

#[cfg(test)]
#[path = "log_history_test.rs"]
mod tests;

pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Bounded record of every block written to the log, with a cursor for
/// stepping back and forth through it.
///
/// The cursor is `None` only while the history is empty; otherwise it is a
/// valid index. Blocks are never modified after being written, so
/// [`LogHistory::replay`] always reproduces the same prefix.
#[derive(Debug, Clone)]
pub struct LogHistory {
    buffer: VecDeque<DisplayBlock>,
    capacity: usize,
    cursor: Option<usize>,
}

impl Default for LogHistory {
    fn default() -> LogHistory {
        return LogHistory::new(DEFAULT_HISTORY_CAPACITY);
    }
}

impl LogHistory {
    pub fn new(capacity: usize) -> LogHistory {
        let capacity = capacity.max(1);
        return LogHistory {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            cursor: None,
        };
    }

    /// Appends a block, evicting the oldest one when full, and moves the
    /// cursor to it.
    pub fn write(&mut self, block: DisplayBlock) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(block);
        self.cursor = Some(self.buffer.len() - 1);
    }

    /// Steps the cursor one block back. Returns the block now under the
    /// cursor, or `None` when already at the oldest block.
    pub fn previous(&mut self) -> Option<&DisplayBlock> {
        match self.cursor {
            Some(idx) if idx > 0 => {
                self.cursor = Some(idx - 1);
                return self.buffer.get(idx - 1);
            }
            _ => return None,
        }
    }

    /// Steps the cursor one block forward, bounded by the newest block.
    pub fn next(&mut self) -> Option<&DisplayBlock> {
        match self.cursor {
            Some(idx) if idx + 1 < self.buffer.len() => {
                self.cursor = Some(idx + 1);
                return self.buffer.get(idx + 1);
            }
            _ => return None,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = None;
    }

    /// Blocks `[0..=cursor]` in the order they were written.
    pub fn replay(&self) -> impl Iterator<Item = &DisplayBlock> {
        let end = self.cursor.map(|c| c + 1).unwrap_or(0);
        return self.buffer.iter().take(end);
    }

    pub fn current(&self) -> Option<&DisplayBlock> {
        return self.cursor.and_then(|c| self.buffer.get(c));
    }

    pub fn cursor(&self) -> Option<usize> {
        return self.cursor;
    }

    pub fn len(&self) -> usize {
        return self.buffer.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.buffer.is_empty();
    }

    pub fn capacity(&self) -> usize {
        return self.capacity;
    }
}
