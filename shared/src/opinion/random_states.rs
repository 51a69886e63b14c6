use std::fmt;

use crate::MapId;

/// The stream a random draw was consumed by.
///
/// Variant order is the order in which categories are compared: command
/// execution, then world execution, then each map in ascending id order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RandomStateCategory {
    Command,
    World,
    Map(MapId),
}

impl fmt::Display for RandomStateCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RandomStateCategory::Command => write!(f, "command"),
            RandomStateCategory::World => write!(f, "world"),
            RandomStateCategory::Map(map_id) => write!(f, "map {}", map_id),
        }
    }
}

/// Keeps the upper half of a 64-bit generator state
pub fn truncate_random_state(state: u64) -> u32 {
    (state >> 32) as u32
}
