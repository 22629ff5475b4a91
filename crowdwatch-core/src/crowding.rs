/// Per-person neighbour counts produced by the motion pass.
///
/// Index `i` corresponds to `World::people()[i]`. The buffer carries the
/// frame it was filled for, so a reader can tell a count written this tick
/// from one left over from the previous tick.
#[derive(Debug, Clone, Default)]
pub struct NeighborCounts {
    counts: Vec<u32>,
    /// Frame the counts were completed for, `None` while being filled.
    frame: Option<u64>,
}

impl NeighborCounts {
    /// Creates a zeroed buffer of the given length.
    pub fn with_len(len: usize) -> Self {
        Self {
            counts: vec![0; len],
            frame: None,
        }
    }

    /// Resizes to `len` and clears every entry.
    ///
    /// The buffer is unstamped afterwards, even if the length was already
    /// correct.
    pub fn ensure_len(&mut self, len: usize) {
        if self.counts.len() != len {
            self.counts.resize(len, 0);
        }
        self.clear();
    }

    /// Zeroes all counts and drops the frame stamp.
    pub fn clear(&mut self) {
        for c in &mut self.counts {
            *c = 0;
        }
        self.frame = None;
    }

    /// Stores the count for one person.
    ///
    /// ### Panics
    /// Panics if `idx` is out of bounds.
    #[inline]
    pub fn set(&mut self, idx: usize, count: u32) {
        self.counts[idx] = count;
    }

    /// Count for one person, `0` when out of range.
    #[inline]
    pub fn get(&self, idx: usize) -> u32 {
        self.counts.get(idx).copied().unwrap_or(0)
    }

    /// Marks the buffer as complete for `frame`.
    pub fn stamp(&mut self, frame: u64) {
        self.frame = Some(frame);
    }

    /// True when the buffer was completed for `frame` and covers `len` people.
    pub fn is_current(&self, frame: u64, len: usize) -> bool {
        self.frame == Some(frame) && self.counts.len() == len
    }

    pub fn frame(&self) -> Option<u64> {
        self.frame
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
