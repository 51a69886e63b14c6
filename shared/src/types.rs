pub type Tick = u32;
pub type MapId = i32;
pub type ThingId = i32;
pub type TraceHash = i32;

/// Which side of the session produced an [`ExecutionOpinion`](crate::ExecutionOpinion)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpinionOrigin {
    Local,
    Remote,
}

impl OpinionOrigin {
    pub fn invert(self) -> Self {
        match self {
            OpinionOrigin::Local => OpinionOrigin::Remote,
            OpinionOrigin::Remote => OpinionOrigin::Local,
        }
    }

    pub fn is_local(&self) -> bool {
        *self == OpinionOrigin::Local
    }
}
