use std::fmt;

use concord_shared::{Divergence, ExecutionOpinion, OpinionError, Tick};

/// Why two aligned opinions were judged inconsistent
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DesyncCause {
    /// Random states disagree
    Divergence(Divergence),
    /// Opinions starting on the same tick cover different ranges
    RangeMismatch(OpinionError),
}

impl fmt::Display for DesyncCause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DesyncCause::Divergence(divergence) => fmt::Display::fmt(divergence, f),
            DesyncCause::RangeMismatch(error) => fmt::Display::fmt(error, f),
        }
    }
}

/// Compact summary sent to the other peer once a desync is detected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DesyncNotice {
    pub local_start_tick: Tick,
    /// Index into the trace hash log at which the peers diverge, if known
    pub diff_at: Option<usize>,
}

/// Everything known about a detected desync, handed to the notification sink
/// for on-screen display and export
#[derive(Clone, Debug)]
pub struct DesyncReport {
    pub cause: DesyncCause,
    pub local: ExecutionOpinion,
    pub remote: ExecutionOpinion,
    pub diff_at: Option<usize>,
    pub last_valid_tick: Option<Tick>,
    pub arbiter_was_playing_on_last_valid_tick: bool,
}

impl DesyncReport {
    pub fn notice(&self) -> DesyncNotice {
        DesyncNotice {
            local_start_tick: self.local.start_tick(),
            diff_at: self.diff_at,
        }
    }

    /// Trace entries of the local opinion surrounding the divergence point,
    /// at most `radius` on either side
    pub fn local_traces_around_diff(&self, radius: usize) -> Vec<String> {
        let entries = self.local.trace_entries();
        let Some(diff_at) = self.diff_at else {
            return Vec::new();
        };
        let from = diff_at.saturating_sub(radius);
        let to = diff_at.saturating_add(radius + 1).min(entries.len());
        if from >= to {
            return Vec::new();
        }
        entries[from..to].iter().map(|entry| entry.describe()).collect()
    }
}

impl fmt::Display for DesyncReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Desynced on range starting at tick {}", self.local.start_tick())?;
        match self.last_valid_tick {
            Some(tick) => write!(f, " (last valid tick {})", tick)?,
            None => write!(f, " (no tick was ever confirmed)")?,
        }
        write!(f, ": {}", self.cause)?;
        match self.diff_at {
            Some(diff_at) => write!(f, ", traces diverge at {}", diff_at),
            None => write!(f, ", no trace divergence point identifiable"),
        }
    }
}
