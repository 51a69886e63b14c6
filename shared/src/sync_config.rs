/// Contains Config properties which govern how execution opinions are
/// collected and aligned during a session
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Upper bound on the number of same-origin opinions held while waiting
    /// for their counterparts. The oldest is evicted once this is exceeded.
    pub max_backlog: usize,
    /// Upper bound on the number of cleared opinions kept for reuse
    pub max_pooled_opinions: usize,
    /// Whether raw call-site traces are recorded. Info traces are always
    /// recorded.
    pub log_desync_traces: bool,
    /// Replays never collect opinions
    pub replay: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_backlog: 30,
            max_pooled_opinions: 64,
            log_desync_traces: false,
            replay: false,
        }
    }
}
