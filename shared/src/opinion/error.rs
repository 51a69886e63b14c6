use thiserror::Error;

use crate::Tick;

/// Errors that can occur when comparing execution opinions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpinionError {
    /// Only opinions covering the same tick range can be compared
    #[error("Cannot compare opinions over different tick ranges: {ours_start}..{ours_end:?} vs {theirs_start}..{theirs_end:?}")]
    TickRangeMismatch {
        ours_start: Tick,
        ours_end: Option<Tick>,
        theirs_start: Tick,
        theirs_end: Option<Tick>,
    },
}
