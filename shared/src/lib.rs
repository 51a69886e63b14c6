//! # Concord Shared
//! Execution opinions, divergence comparison and identifier blocks shared by
//! every concord session.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod hash;
mod id_block;
mod opinion;
mod sync_config;
mod types;

pub use hash::{hash_combine, hash_combine_all, hash_str};
pub use id_block::{
    Id, IdBlock, IdBlockError, IdBlockProvider, GLOBAL_ID_BLOCK_SIZE, GLOBAL_ID_BLOCK_START,
};
pub use opinion::{
    divergence::{Divergence, DivergenceKind},
    error::OpinionError,
    execution_opinion::ExecutionOpinion,
    opinion_pool::OpinionPool,
    random_states::{truncate_random_state, RandomStateCategory},
    trace_entry::{InfoTraceEntry, RawTraceEntry, ThingContext, TraceEntry},
};
pub use sync_config::SyncConfig;
pub use types::{MapId, OpinionOrigin, ThingId, Tick, TraceHash};
