use concord_client::{ExecutionOpinion, OpinionOrigin, RandomStateCategory, Tick};

/// Builds opinions with explicit contents for coordinator tests
pub struct OpinionBuilder {
    opinion: ExecutionOpinion,
}

impl OpinionBuilder {
    pub fn local(start_tick: Tick) -> Self {
        Self::new(start_tick, OpinionOrigin::Local)
    }

    pub fn remote(start_tick: Tick) -> Self {
        Self::new(start_tick, OpinionOrigin::Remote)
    }

    pub fn new(start_tick: Tick, origin: OpinionOrigin) -> Self {
        Self {
            opinion: ExecutionOpinion::new(start_tick, origin),
        }
    }

    pub fn states(mut self, category: RandomStateCategory, samples: &[u32]) -> Self {
        for sample in samples {
            self.opinion.record_random_state(category, *sample);
        }
        self
    }

    pub fn trace_hashes(mut self, hashes: &[i32]) -> Self {
        for hash in hashes {
            self.opinion.record_trace_hash(*hash);
        }
        self
    }

    pub fn ends_at(mut self, end_tick: Tick) -> Self {
        self.opinion.finish(end_tick);
        self
    }

    pub fn build(self) -> ExecutionOpinion {
        self.opinion
    }
}
