use concord_client::{ExecutionOpinion, RandomStateCategory};

/// What a remote peer reconstructs from a transmitted opinion: every random
/// state sequence and the trace hashes, without the rich trace entries
pub fn to_wire(opinion: &ExecutionOpinion) -> ExecutionOpinion {
    let mut remote = ExecutionOpinion::new_remote(opinion.start_tick());

    for state in opinion.command_random_states() {
        remote.record_random_state(RandomStateCategory::Command, *state);
    }
    for state in opinion.world_random_states() {
        remote.record_random_state(RandomStateCategory::World, *state);
    }
    for map_id in opinion.map_ids() {
        let category = RandomStateCategory::Map(map_id);
        for state in opinion.random_states(category) {
            remote.record_random_state(category, *state);
        }
    }
    for hash in opinion.trace_hashes() {
        remote.record_trace_hash(*hash);
    }
    if let Some(end_tick) = opinion.end_tick() {
        remote.finish(end_tick);
    }
    if opinion.is_simulating() {
        remote.mark_simulating();
    }

    remote
}
