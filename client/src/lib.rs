//! # Concord Client
//! Session-scoped desync detection for lockstep simulations: collects the
//! local peer's execution opinions, aligns them against opinions received
//! from the remote peer, and reports the first point of divergence.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod desync_events;
mod desync_report;
mod remote_opinions;
mod session;
mod sync_coordinator;
mod trace_divergence;

pub use concord_shared::{
    ExecutionOpinion, Id, IdBlock, IdBlockError, IdBlockProvider, InfoTraceEntry, OpinionOrigin,
    RandomStateCategory, RawTraceEntry, SyncConfig, ThingContext, Tick,
};

pub use desync_events::{DesyncEvent, DesyncEvents, DesyncNoticeEvent, DesyncReportEvent};
pub use desync_report::{DesyncCause, DesyncNotice, DesyncReport};
pub use remote_opinions::{
    remote_opinion_channel, HandoffError, RemoteOpinionReceiver, RemoteOpinionSender,
};
pub use session::SyncSession;
pub use sync_coordinator::{SubmitOutcome, SyncCoordinator};
pub use trace_divergence::find_trace_hashes_diff;
