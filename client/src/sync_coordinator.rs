//! # `SyncCoordinator`: aligns and compares execution opinions
//!
//! The coordinator owns a bounded backlog of opinions that are waiting for a
//! counterpart from the other side of the session. At any time the backlog
//! holds opinions of a single origin, ordered by `start_tick`:
//!
//! * a same-origin submission is appended, evicting the oldest entry once
//!   the backlog grows past [`SyncConfig::max_backlog`];
//! * an opposite-origin submission first evicts every entry starting before
//!   it, then is compared against the front entry if both start on the same
//!   tick, queued if nothing is left, or dropped as stale otherwise.
//!
//! A mismatch marks the session desynced. That state is terminal: every
//! later submission and recording call is ignored. Localising the divergence
//! is deferred to [`SyncCoordinator::process_pending_desyncs`], which the
//! session runs once per simulation step.

use std::collections::VecDeque;

use log::{debug, info, trace, warn};

use concord_shared::{
    ExecutionOpinion, InfoTraceEntry, MapId, OpinionOrigin, OpinionPool, RandomStateCategory,
    RawTraceEntry, SyncConfig, Tick, TraceHash,
};

use crate::{
    desync_report::{DesyncCause, DesyncReport},
    trace_divergence::find_trace_hashes_diff,
};

/// What happened to a submitted opinion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The session is already desynced
    Ignored,
    /// Stored in the backlog, waiting for a counterpart
    Queued,
    /// Compared equal to its counterpart; the range starting at this tick is
    /// confirmed consistent
    Confirmed(Tick),
    /// Older than everything left in the backlog, dropped
    Discarded,
    /// Compared unequal to its counterpart; the session is now desynced
    Desynced,
}

/// Two conflicting opinions awaiting divergence localisation
pub(crate) struct PendingDesync {
    first: ExecutionOpinion,
    second: ExecutionOpinion,
    cause: DesyncCause,
}

pub struct SyncCoordinator {
    config: SyncConfig,
    known_opinions: VecDeque<ExecutionOpinion>,
    current_opinion: Option<ExecutionOpinion>,
    pool: OpinionPool,
    last_valid_tick: Option<Tick>,
    arbiter_was_playing_on_last_valid_tick: bool,
    arbiter_playing: bool,
    catch_up_target: Option<Tick>,
    desynced: bool,
    pending_desyncs: VecDeque<PendingDesync>,
}

impl SyncCoordinator {
    pub fn new(config: SyncConfig) -> Self {
        let pool = OpinionPool::new(config.max_pooled_opinions);
        Self {
            known_opinions: VecDeque::with_capacity(config.max_backlog + 1),
            config,
            current_opinion: None,
            pool,
            last_valid_tick: None,
            arbiter_was_playing_on_last_valid_tick: false,
            arbiter_playing: false,
            catch_up_target: None,
            desynced: false,
            pending_desyncs: VecDeque::new(),
        }
    }

    // Session state

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn is_desynced(&self) -> bool {
        self.desynced
    }

    /// Start of the most recent range confirmed consistent
    pub fn last_valid_tick(&self) -> Option<Tick> {
        self.last_valid_tick
    }

    pub fn arbiter_was_playing_on_last_valid_tick(&self) -> bool {
        self.arbiter_was_playing_on_last_valid_tick
    }

    pub fn set_arbiter_playing(&mut self, playing: bool) {
        self.arbiter_playing = playing;
    }

    pub fn is_arbiter_playing(&self) -> bool {
        self.arbiter_playing
    }

    /// Marks the simulation as fast-forwarding towards `target`
    pub fn start_catch_up(&mut self, target: Tick) {
        if self.desynced {
            return;
        }
        self.catch_up_target = Some(target);
    }

    pub fn finish_catch_up(&mut self) {
        self.catch_up_target = None;
    }

    pub fn catch_up_target(&self) -> Option<Tick> {
        self.catch_up_target
    }

    pub fn is_catching_up(&self) -> bool {
        self.catch_up_target.is_some()
    }

    /// Number of opinions waiting for a counterpart
    pub fn backlog_len(&self) -> usize {
        self.known_opinions.len()
    }

    pub fn backlog(&self) -> impl Iterator<Item = &ExecutionOpinion> {
        self.known_opinions.iter()
    }

    pub fn pool(&self) -> &OpinionPool {
        &self.pool
    }

    // Local collection

    pub fn should_collect(&self) -> bool {
        !self.config.replay && !self.desynced
    }

    /// The local opinion currently collecting, if any
    pub fn current_opinion(&self) -> Option<&ExecutionOpinion> {
        self.current_opinion.as_ref()
    }

    /// The local opinion is opened by the first recording call and starts at
    /// that call's tick. A range with no recordings produces no opinion, so
    /// its remote counterpart is later evicted as stale without a comparison.
    /// The scheduler must therefore record at least one sample per range.
    fn opinion_in_building(&mut self, tick: Tick) -> &mut ExecutionOpinion {
        let simulating = self.catch_up_target.is_some();
        let pool = &mut self.pool;
        let opinion = self
            .current_opinion
            .get_or_insert_with(|| pool.checkout(tick, OpinionOrigin::Local));
        if simulating {
            opinion.mark_simulating();
        }
        opinion
    }

    pub fn try_add_random_state(&mut self, tick: Tick, category: RandomStateCategory, state: u64) {
        if !self.should_collect() {
            return;
        }
        self.opinion_in_building(tick)
            .record_full_random_state(category, state);
    }

    pub fn try_add_command_random_state(&mut self, tick: Tick, state: u64) {
        self.try_add_random_state(tick, RandomStateCategory::Command, state);
    }

    pub fn try_add_world_random_state(&mut self, tick: Tick, state: u64) {
        self.try_add_random_state(tick, RandomStateCategory::World, state);
    }

    pub fn try_add_map_random_state(&mut self, tick: Tick, map_id: MapId, state: u64) {
        self.try_add_random_state(tick, RandomStateCategory::Map(map_id), state);
    }

    /// Logs a pair of strings to aid desync debugging
    pub fn try_add_info_for_desync_log(&mut self, tick: Tick, info1: &str, info2: &str) {
        if !self.should_collect() {
            return;
        }
        self.opinion_in_building(tick)
            .record_trace_entry(InfoTraceEntry::new(tick, info1, info2));
    }

    /// Logs a call-site trace. Dropped unless
    /// [`SyncConfig::log_desync_traces`] is set.
    pub fn try_add_stack_trace_for_desync_log_raw(
        &mut self,
        tick: Tick,
        mut item: RawTraceEntry,
        depth: u32,
        call_site_hash: TraceHash,
    ) {
        if !self.should_collect() || !self.config.log_desync_traces {
            return;
        }
        item.tick = tick;
        item.seal(depth, call_site_hash);
        self.opinion_in_building(tick).record_trace_entry(item);
    }

    /// Closes the collecting local opinion at `end_tick` and hands it back,
    /// ready to be submitted. `None` if nothing was recorded since the last
    /// call.
    pub fn take_local_opinion(&mut self, end_tick: Tick) -> Option<ExecutionOpinion> {
        let mut opinion = self.current_opinion.take()?;
        if self.desynced {
            self.pool.release(opinion);
            return None;
        }
        opinion.finish(end_tick);
        Some(opinion)
    }

    // Alignment

    /// Adds an opinion to the backlog and compares it against its counterpart
    /// of the opposite origin, if one is waiting
    pub fn submit(&mut self, new_opinion: ExecutionOpinion) -> SubmitOutcome {
        if self.desynced {
            self.pool.release(new_opinion);
            return SubmitOutcome::Ignored;
        }

        let Some(front) = self.known_opinions.front() else {
            self.known_opinions.push_back(new_opinion);
            return SubmitOutcome::Queued;
        };

        if front.origin() == new_opinion.origin() {
            self.known_opinions.push_back(new_opinion);
            if self.known_opinions.len() > self.config.max_backlog {
                self.remove_and_clear_first();
            }
            return SubmitOutcome::Queued;
        }

        // Anything starting before the new opinion can no longer be matched
        while self
            .known_opinions
            .front()
            .is_some_and(|front| front.start_tick() < new_opinion.start_tick())
        {
            self.remove_and_clear_first();
        }

        let Some(front_start_tick) = self.known_opinions.front().map(|front| front.start_tick())
        else {
            self.known_opinions.push_back(new_opinion);
            return SubmitOutcome::Queued;
        };

        if front_start_tick != new_opinion.start_tick() {
            trace!(
                "Discarding stale {:?} opinion for tick {}",
                new_opinion.origin(),
                new_opinion.start_tick()
            );
            self.pool.release(new_opinion);
            return SubmitOutcome::Discarded;
        }

        let Some(old_opinion) = self.known_opinions.pop_front() else {
            return SubmitOutcome::Discarded;
        };
        self.compare(old_opinion, new_opinion)
    }

    fn compare(
        &mut self,
        old_opinion: ExecutionOpinion,
        new_opinion: ExecutionOpinion,
    ) -> SubmitOutcome {
        let cause = match old_opinion.compare_against(&new_opinion) {
            Ok(None) => {
                let tick = old_opinion.start_tick();
                debug!("Confirmed range starting at tick {}", tick);
                self.last_valid_tick = Some(tick);
                self.arbiter_was_playing_on_last_valid_tick = self.arbiter_playing;
                self.pool.release(old_opinion);
                self.pool.release(new_opinion);
                return SubmitOutcome::Confirmed(tick);
            }
            Ok(Some(divergence)) => DesyncCause::Divergence(divergence),
            Err(error) => {
                warn!("Aligned opinions disagree on their range: {}", error);
                DesyncCause::RangeMismatch(error)
            }
        };

        info!(
            "Desynced after last valid tick {:?}: {}",
            self.last_valid_tick, cause
        );
        self.mark_desynced();
        self.pending_desyncs.push_back(PendingDesync {
            first: old_opinion,
            second: new_opinion,
            cause,
        });
        SubmitOutcome::Desynced
    }

    fn remove_and_clear_first(&mut self) {
        if let Some(opinion) = self.known_opinions.pop_front() {
            trace!(
                "Evicting {:?} opinion for tick {}",
                opinion.origin(),
                opinion.start_tick()
            );
            self.pool.release(opinion);
        }
    }

    /// Idempotent; stops collection and cancels any catch-up
    fn mark_desynced(&mut self) {
        self.desynced = true;
        self.catch_up_target = None;
        if let Some(opinion) = self.current_opinion.take() {
            self.pool.release(opinion);
        }
    }

    // Divergence handling

    pub fn has_pending_desyncs(&self) -> bool {
        !self.pending_desyncs.is_empty()
    }

    /// Localises every queued desync and builds its report
    pub fn process_pending_desyncs(&mut self) -> Vec<DesyncReport> {
        let mut reports = Vec::with_capacity(self.pending_desyncs.len());
        while let Some(pending) = self.pending_desyncs.pop_front() {
            reports.push(self.handle_desync(pending));
        }
        reports
    }

    fn handle_desync(&self, pending: PendingDesync) -> DesyncReport {
        let PendingDesync {
            first,
            second,
            cause,
        } = pending;
        let (local, remote) = if first.is_local() {
            (first, second)
        } else {
            (second, first)
        };

        let diff_at = find_trace_hashes_diff(&local, &remote);

        DesyncReport {
            cause,
            local,
            remote,
            diff_at,
            last_valid_tick: self.last_valid_tick,
            arbiter_was_playing_on_last_valid_tick: self.arbiter_was_playing_on_last_valid_tick,
        }
    }
}
