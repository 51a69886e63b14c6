use std::fmt;

use crate::opinion::random_states::RandomStateCategory;

/// How two random state sequences of the same category disagree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DivergenceKind {
    /// Both sides recorded a sample at the index, with different values
    WrongState { ours: u32, theirs: u32 },
    /// One side is a strict prefix of the other; `index` is the shorter length
    WrongCount { ours: usize, theirs: usize },
}

/// First point at which two opinions over the same tick range disagree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divergence {
    pub category: RandomStateCategory,
    pub index: usize,
    pub kind: DivergenceKind,
}

impl Divergence {
    /// Compares two sample sequences element-wise
    pub fn between(category: RandomStateCategory, ours: &[u32], theirs: &[u32]) -> Option<Self> {
        let mismatch = ours
            .iter()
            .zip(theirs.iter())
            .enumerate()
            .find(|(_, (a, b))| a != b);

        if let Some((index, (ours, theirs))) = mismatch {
            return Some(Self {
                category,
                index,
                kind: DivergenceKind::WrongState {
                    ours: *ours,
                    theirs: *theirs,
                },
            });
        }

        if ours.len() != theirs.len() {
            return Some(Self {
                category,
                index: ours.len().min(theirs.len()),
                kind: DivergenceKind::WrongCount {
                    ours: ours.len(),
                    theirs: theirs.len(),
                },
            });
        }

        None
    }
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            DivergenceKind::WrongState { ours, theirs } => write!(
                f,
                "Wrong {} random state at index {} ({:#010x} vs {:#010x})",
                self.category, self.index, ours, theirs
            ),
            DivergenceKind::WrongCount { ours, theirs } => write!(
                f,
                "Wrong {} random state count ({} vs {}), first missing index {}",
                self.category, ours, theirs, self.index
            ),
        }
    }
}
