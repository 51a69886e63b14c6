use concord_client::{DesyncEvents, ExecutionOpinion, SyncConfig, SyncSession, Tick};
use concord_shared::MapId;

use crate::helpers::wire::to_wire;

/// A peer running a toy deterministic simulation.
///
/// Every tick draws one command state, one world state and one state per
/// map from a seeded generator, and logs an info trace. Two peers built
/// from the same seed and maps produce identical opinions until one of them
/// is corrupted.
pub struct TestPeer {
    session: SyncSession,
    rng: fastrand::Rng,
    maps: Vec<MapId>,
    tick: Tick,
    range_start: Tick,
    corrupt_world_from: Option<Tick>,
}

impl TestPeer {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SyncConfig::default())
    }

    pub fn with_config(seed: u64, config: SyncConfig) -> Self {
        Self {
            session: SyncSession::new(config),
            rng: fastrand::Rng::with_seed(seed),
            maps: Vec::new(),
            tick: 0,
            range_start: 0,
            corrupt_world_from: None,
        }
    }

    pub fn with_maps(mut self, maps: &[MapId]) -> Self {
        self.maps = maps.to_vec();
        self
    }

    /// From `tick` on, every world draw differs from an uncorrupted peer's
    pub fn corrupt_world_from(&mut self, tick: Tick) {
        self.corrupt_world_from = Some(tick);
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SyncSession {
        &mut self.session
    }

    pub fn step(&mut self) {
        let tick = self.tick;
        let command_state = self.rng.u64(..);
        let mut world_state = self.rng.u64(..);
        if self.corrupt_world_from.is_some_and(|from| tick >= from) {
            world_state ^= 1u64 << 40;
        }
        let map_states: Vec<(MapId, u64)> =
            self.maps.iter().map(|map_id| (*map_id, self.rng.u64(..))).collect();

        let coordinator = self.session.coordinator_mut();
        coordinator.try_add_command_random_state(tick, command_state);
        coordinator.try_add_world_random_state(tick, world_state);
        for (map_id, state) in map_states {
            coordinator.try_add_map_random_state(tick, map_id, state);
        }
        let world_info = format!("{:x}", world_state >> 32);
        coordinator.try_add_info_for_desync_log(tick, "world tick", &world_info);

        self.tick += 1;
    }

    /// Steps `ticks` times, closes the range and returns its wire copy
    pub fn run_range(&mut self, ticks: u32) -> Option<ExecutionOpinion> {
        for _ in 0..ticks {
            self.step();
        }
        let start = self.range_start;
        self.range_start = self.tick;
        let opinion = self.session.finish_local_opinion(self.tick)?;
        debug_assert_eq!(opinion.start_tick(), start);
        Some(to_wire(&opinion))
    }

    /// Hands a wire opinion to this peer's network thread end
    pub fn deliver(&self, opinion: ExecutionOpinion) {
        let sender = self.session.remote_opinion_sender();
        // the session owns a receiver, so the channel cannot be closed here
        let _ = sender.send(opinion);
    }

    pub fn update(&mut self) -> DesyncEvents {
        self.session.update()
    }
}
