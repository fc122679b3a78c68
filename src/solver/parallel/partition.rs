use std::fmt::Display;

use typed_index_collections::TiVec;

/// Index of a worker in the partition table, in `0..2^prefix_length`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct WorkerOrdinal(usize);

impl From<usize> for WorkerOrdinal {
    fn from(index: usize) -> Self {
        WorkerOrdinal(index)
    }
}

impl From<WorkerOrdinal> for usize {
    fn from(index: WorkerOrdinal) -> Self {
        index.0
    }
}

impl Display for WorkerOrdinal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Enumerates every fixed prefix of length `prefix_length` exactly once.
///
/// Bit `i` of the ordinal (least significant bit first) becomes prefix slot
/// `i`, a bijection between ordinals and the boolean cube of that
/// dimension: the prefixes are pairwise distinct and together cover the
/// whole assignment space.
pub(super) fn partition_prefixes(prefix_length: usize) -> TiVec<WorkerOrdinal, Vec<bool>> {
    assert!(prefix_length < usize::BITS as usize);

    let mut prefixes: TiVec<WorkerOrdinal, Vec<bool>> = TiVec::new();
    for ordinal in 0..1usize << prefix_length {
        prefixes.push(
            (0..prefix_length)
                .map(|bit| ordinal >> bit & 1 == 1)
                .collect(),
        );
    }

    prefixes
}
