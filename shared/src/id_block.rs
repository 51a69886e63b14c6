use log::warn;
use thiserror::Error;

pub type Id = i32;

/// Start of the global block, half way into the positive `i32` range so that
/// it stays clear of the small, densely used counters of ordinary entity
/// creation.
pub const GLOBAL_ID_BLOCK_START: Id = Id::MAX / 2;
pub const GLOBAL_ID_BLOCK_SIZE: Id = 1_000_000_000;

/// Errors that can occur during IdBlock operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdBlockError {
    /// Every id of the block has been handed out; a new block must be requested
    #[error("IdBlock [{start}, {start} + {size}) is exhausted")]
    Exhausted { start: Id, size: Id },

    /// The requested range is negative or does not fit in the id space
    #[error("Invalid IdBlock range: start {start}, size {size}")]
    InvalidRange { start: Id, size: Id },

    /// A restored cursor lies outside of `0..=size`
    #[error("IdBlock cursor {cursor} out of range for size {size}")]
    CursorOutOfRange { cursor: Id, size: Id },
}

/// A disjoint, independently exhaustible slice `[start, start + size)` of the
/// global id space.
///
/// Blocks never grow and never wrap: once `cursor == size` every further
/// request fails with [`IdBlockError::Exhausted`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdBlock {
    start: Id,
    size: Id,
    cursor: Id,
}

impl IdBlock {
    pub fn new(start: Id, size: Id) -> Result<Self, IdBlockError> {
        Self::from_parts(start, size, 0)
    }

    /// Restores a block whose first `cursor` ids have already been handed out
    pub fn from_parts(start: Id, size: Id, cursor: Id) -> Result<Self, IdBlockError> {
        if start < 0 || size < 0 || start.checked_add(size).is_none() {
            return Err(IdBlockError::InvalidRange { start, size });
        }
        if !(0..=size).contains(&cursor) {
            return Err(IdBlockError::CursorOutOfRange { cursor, size });
        }
        Ok(Self {
            start,
            size,
            cursor,
        })
    }

    /// The block reserved for ids which must never collide with ordinary
    /// sequential entity ids
    pub fn global() -> Self {
        Self {
            start: GLOBAL_ID_BLOCK_START,
            size: GLOBAL_ID_BLOCK_SIZE,
            cursor: 0,
        }
    }

    /// Hands out the next id of the block
    pub fn try_next_id(&mut self) -> Result<Id, IdBlockError> {
        if self.cursor == self.size {
            warn!(
                "IdBlock [{}, {}) exhausted, a new block must be requested",
                self.start,
                self.end()
            );
            return Err(IdBlockError::Exhausted {
                start: self.start,
                size: self.size,
            });
        }
        let id = self.start + self.cursor;
        self.cursor += 1;
        Ok(id)
    }

    /// Hands out the next id of the block.
    ///
    /// # Panics
    ///
    /// Panics if the block is exhausted.
    pub fn next_id(&mut self) -> Id {
        self.try_next_id()
            .expect("IdBlock exhausted, a new block must be requested before minting more ids")
    }

    pub fn start(&self) -> Id {
        self.start
    }

    pub fn size(&self) -> Id {
        self.size
    }

    pub fn cursor(&self) -> Id {
        self.cursor
    }

    /// One past the last id of the block
    pub fn end(&self) -> Id {
        self.start + self.size
    }

    pub fn remaining(&self) -> Id {
        self.size - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.size
    }

    pub fn contains(&self, id: Id) -> bool {
        (self.start..self.end()).contains(&id)
    }

    pub fn overlaps(&self, other: &IdBlock) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Anything that owns an [`IdBlock`] and mints ids from it
pub trait IdBlockProvider {
    fn id_block(&self) -> &IdBlock;
    fn id_block_mut(&mut self) -> &mut IdBlock;

    fn try_next_id(&mut self) -> Result<Id, IdBlockError> {
        self.id_block_mut().try_next_id()
    }
}
