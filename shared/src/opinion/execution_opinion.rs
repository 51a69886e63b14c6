//! # `ExecutionOpinion`: one peer's fingerprint of a tick range
//!
//! An opinion captures every source of non-determinism a peer consumed while
//! executing `[start_tick, end_tick)`:
//!
//! | Sequence | Contents |
//! |----------|----------|
//! | `command_random_states` | truncated RNG states drawn while executing commands |
//! | `world_random_states`   | truncated RNG states drawn by world-level ticking |
//! | `map_random_states`     | one sequence per map id, ordered by id |
//! | `trace_entries`         | rich diagnostic entries (local opinions only) |
//! | `trace_hashes`          | hash projection of the trace log, compared during localisation |
//!
//! Opinions are mutated only by the simulation thread, become read-only once
//! submitted, and are recycled through an [`OpinionPool`](crate::OpinionPool)
//! since one is filled every simulation step.

use std::collections::BTreeMap;

use crate::{
    opinion::{
        divergence::Divergence,
        error::OpinionError,
        random_states::{truncate_random_state, RandomStateCategory},
        trace_entry::TraceEntry,
    },
    MapId, OpinionOrigin, Tick, TraceHash,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionOpinion {
    start_tick: Tick,
    end_tick: Option<Tick>,
    origin: OpinionOrigin,
    simulating: bool,
    command_random_states: Vec<u32>,
    world_random_states: Vec<u32>,
    map_random_states: BTreeMap<MapId, Vec<u32>>,
    trace_entries: Vec<TraceEntry>,
    trace_hashes: Vec<TraceHash>,
}

impl ExecutionOpinion {
    pub fn new(start_tick: Tick, origin: OpinionOrigin) -> Self {
        Self {
            start_tick,
            end_tick: None,
            origin,
            simulating: false,
            command_random_states: Vec::new(),
            world_random_states: Vec::new(),
            map_random_states: BTreeMap::new(),
            trace_entries: Vec::new(),
            trace_hashes: Vec::new(),
        }
    }

    pub fn new_local(start_tick: Tick) -> Self {
        Self::new(start_tick, OpinionOrigin::Local)
    }

    pub fn new_remote(start_tick: Tick) -> Self {
        Self::new(start_tick, OpinionOrigin::Remote)
    }

    // Range & origin

    pub fn start_tick(&self) -> Tick {
        self.start_tick
    }

    /// `None` while the opinion is still collecting
    pub fn end_tick(&self) -> Option<Tick> {
        self.end_tick
    }

    pub fn finish(&mut self, end_tick: Tick) {
        self.end_tick = Some(end_tick);
    }

    pub fn origin(&self) -> OpinionOrigin {
        self.origin
    }

    pub fn is_local(&self) -> bool {
        self.origin.is_local()
    }

    /// Whether a catch-up was in progress while this opinion collected
    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn mark_simulating(&mut self) {
        self.simulating = true;
    }

    /// Whether `other` covers the same tick range. An open end matches any end.
    pub fn covers_same_range(&self, other: &ExecutionOpinion) -> bool {
        if self.start_tick != other.start_tick {
            return false;
        }
        match (self.end_tick, other.end_tick) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => true,
        }
    }

    // Recording

    pub fn record_random_state(&mut self, category: RandomStateCategory, sample: u32) {
        match category {
            RandomStateCategory::Command => self.command_random_states.push(sample),
            RandomStateCategory::World => self.world_random_states.push(sample),
            RandomStateCategory::Map(map_id) => self
                .map_random_states
                .entry(map_id)
                .or_default()
                .push(sample),
        }
    }

    /// Records the upper 32 bits of a full generator state
    pub fn record_full_random_state(&mut self, category: RandomStateCategory, state: u64) {
        self.record_random_state(category, truncate_random_state(state));
    }

    pub fn record_trace_entry(&mut self, entry: impl Into<TraceEntry>) {
        let entry = entry.into();
        self.trace_hashes.push(entry.hash());
        self.trace_entries.push(entry);
    }

    /// Records a bare trace hash, as carried by opinions received over the
    /// network
    pub fn record_trace_hash(&mut self, hash: TraceHash) {
        self.trace_hashes.push(hash);
    }

    // Reading

    pub fn random_states(&self, category: RandomStateCategory) -> &[u32] {
        match category {
            RandomStateCategory::Command => &self.command_random_states,
            RandomStateCategory::World => &self.world_random_states,
            RandomStateCategory::Map(map_id) => self
                .map_random_states
                .get(&map_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    pub fn command_random_states(&self) -> &[u32] {
        &self.command_random_states
    }

    pub fn world_random_states(&self) -> &[u32] {
        &self.world_random_states
    }

    /// Map ids with at least one recorded sample, ascending
    pub fn map_ids(&self) -> impl Iterator<Item = MapId> + '_ {
        self.map_random_states
            .iter()
            .filter(|(_, states)| !states.is_empty())
            .map(|(map_id, _)| *map_id)
    }

    pub fn trace_entries(&self) -> &[TraceEntry] {
        &self.trace_entries
    }

    pub fn trace_hashes(&self) -> &[TraceHash] {
        &self.trace_hashes
    }

    pub fn is_empty(&self) -> bool {
        self.command_random_states.is_empty()
            && self.world_random_states.is_empty()
            && self.map_random_states.values().all(Vec::is_empty)
            && self.trace_entries.is_empty()
            && self.trace_hashes.is_empty()
    }

    // Comparison

    /// Every category in comparison order: command, world, then each map
    /// present on either side by ascending id
    fn categories_with(&self, other: &ExecutionOpinion) -> Vec<RandomStateCategory> {
        let mut map_ids: Vec<MapId> = self.map_ids().chain(other.map_ids()).collect();
        map_ids.sort_unstable();
        map_ids.dedup();

        let mut categories = Vec::with_capacity(map_ids.len() + 2);
        categories.push(RandomStateCategory::Command);
        categories.push(RandomStateCategory::World);
        categories.extend(map_ids.into_iter().map(RandomStateCategory::Map));
        categories
    }

    /// Finds the first random state on which `self` and `other` disagree.
    ///
    /// Returns `Ok(None)` if every category holds element-wise equal
    /// sequences of equal length. Both opinions must cover the same range.
    pub fn compare_against(
        &self,
        other: &ExecutionOpinion,
    ) -> Result<Option<Divergence>, OpinionError> {
        if !self.covers_same_range(other) {
            return Err(OpinionError::TickRangeMismatch {
                ours_start: self.start_tick,
                ours_end: self.end_tick,
                theirs_start: other.start_tick,
                theirs_end: other.end_tick,
            });
        }

        for category in self.categories_with(other) {
            if let Some(divergence) = Divergence::between(
                category,
                self.random_states(category),
                other.random_states(category),
            ) {
                return Ok(Some(divergence));
            }
        }

        Ok(None)
    }

    // Reuse

    /// Empties every sequence while keeping allocations for reuse
    pub fn clear(&mut self) {
        self.end_tick = None;
        self.simulating = false;
        self.command_random_states.clear();
        self.world_random_states.clear();
        for states in self.map_random_states.values_mut() {
            states.clear();
        }
        self.trace_entries.clear();
        self.trace_hashes.clear();
    }

    /// Clears and re-targets the opinion at a new range start
    pub(crate) fn reset(&mut self, start_tick: Tick, origin: OpinionOrigin) {
        self.clear();
        self.start_tick = start_tick;
        self.origin = origin;
    }
}
