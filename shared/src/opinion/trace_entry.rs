use crate::{
    hash::{hash_combine, hash_combine_all, hash_str},
    ThingId, Tick, TraceHash,
};

/// The simulated object active when a trace was taken
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThingContext {
    pub def_name: String,
    pub id: ThingId,
}

/// A pair of free-form strings logged explicitly by instrumentation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoTraceEntry {
    pub tick: Tick,
    pub hash: TraceHash,
    pub info1: String,
    pub info2: String,
}

impl InfoTraceEntry {
    pub fn new(tick: Tick, info1: impl Into<String>, info2: impl Into<String>) -> Self {
        let info1 = info1.into();
        let info2 = info2.into();
        let hash = hash_combine(hash_str(&info1), hash_str(&info2));
        Self {
            tick,
            hash,
            info1,
            info2,
        }
    }
}

/// A call-site trace captured by engine instrumentation.
///
/// Context fields are filled by the caller; `depth` and `hash` are filled
/// by [`RawTraceEntry::seal`] when the entry is recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTraceEntry {
    pub tick: Tick,
    pub hash: TraceHash,
    pub depth: u32,
    pub game_ticks: i32,
    pub rng_state: u64,
    pub call_site: String,
    pub faction_name: String,
    pub more_info: Option<String>,
    pub thing: Option<ThingContext>,
}

impl RawTraceEntry {
    pub fn new(call_site: impl Into<String>) -> Self {
        Self {
            call_site: call_site.into(),
            ..Self::default()
        }
    }

    /// Computes the entry's hash from the call-site hash, the depth, the
    /// generator state and, when present, the faction and active thing.
    pub fn seal(&mut self, depth: u32, call_site_hash: TraceHash) -> TraceHash {
        self.depth = depth;

        let mut hash = hash_combine_all(
            call_site_hash,
            &[
                depth as i32,
                (self.rng_state >> 32) as i32,
                self.rng_state as i32,
            ],
        );
        if !self.faction_name.is_empty() {
            hash = hash_combine(hash, hash_str(&self.faction_name));
        }
        if let Some(thing) = &self.thing {
            hash = hash_combine_all(hash, &[hash_str(&thing.def_name), thing.id]);
        }

        self.hash = hash;
        hash
    }
}

/// One diagnostic entry of an opinion's trace log
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEntry {
    Info(InfoTraceEntry),
    Raw(RawTraceEntry),
}

impl TraceEntry {
    pub fn tick(&self) -> Tick {
        match self {
            TraceEntry::Info(entry) => entry.tick,
            TraceEntry::Raw(entry) => entry.tick,
        }
    }

    pub fn hash(&self) -> TraceHash {
        match self {
            TraceEntry::Info(entry) => entry.hash,
            TraceEntry::Raw(entry) => entry.hash,
        }
    }

    /// Human readable one-line summary
    pub fn describe(&self) -> String {
        match self {
            TraceEntry::Info(entry) => {
                format!("[{}] {} | {}", entry.tick, entry.info1, entry.info2)
            }
            TraceEntry::Raw(entry) => {
                let mut line = format!(
                    "[{}] {} (depth {}, game tick {}, rng {:#018x})",
                    entry.tick, entry.call_site, entry.depth, entry.game_ticks, entry.rng_state
                );
                if !entry.faction_name.is_empty() {
                    line.push_str(&format!(" faction {}", entry.faction_name));
                }
                if let Some(thing) = &entry.thing {
                    line.push_str(&format!(" thing {}#{}", thing.def_name, thing.id));
                }
                if let Some(more_info) = &entry.more_info {
                    line.push_str(&format!(" {}", more_info));
                }
                line
            }
        }
    }
}

impl From<InfoTraceEntry> for TraceEntry {
    fn from(entry: InfoTraceEntry) -> Self {
        TraceEntry::Info(entry)
    }
}

impl From<RawTraceEntry> for TraceEntry {
    fn from(entry: RawTraceEntry) -> Self {
        TraceEntry::Raw(entry)
    }
}
