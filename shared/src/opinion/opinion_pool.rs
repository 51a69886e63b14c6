use log::trace;

use crate::{opinion::execution_opinion::ExecutionOpinion, OpinionOrigin, Tick};

/// Free list of cleared opinions.
///
/// Released opinions keep their sequence allocations, so checking one out
/// again does not allocate until it outgrows its previous use.
pub struct OpinionPool {
    free: Vec<ExecutionOpinion>,
    max_pooled: usize,
}

impl OpinionPool {
    pub fn new(max_pooled: usize) -> Self {
        Self {
            free: Vec::new(),
            max_pooled,
        }
    }

    /// Takes a cleared opinion out of the pool, or allocates one if the pool
    /// is empty
    pub fn checkout(&mut self, start_tick: Tick, origin: OpinionOrigin) -> ExecutionOpinion {
        match self.free.pop() {
            Some(mut opinion) => {
                opinion.reset(start_tick, origin);
                opinion
            }
            None => ExecutionOpinion::new(start_tick, origin),
        }
    }

    /// Clears `opinion` and keeps it for reuse. Opinions beyond the pool's
    /// capacity are dropped.
    pub fn release(&mut self, mut opinion: ExecutionOpinion) {
        if self.free.len() >= self.max_pooled {
            trace!("OpinionPool full, dropping opinion for tick {}", opinion.start_tick());
            return;
        }
        opinion.clear();
        self.free.push(opinion);
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

impl Default for OpinionPool {
    fn default() -> Self {
        Self::new(64)
    }
}
