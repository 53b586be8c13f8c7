use alloc::vec;
use alloc::vec::Vec;

/// Running mean over the most recent `capacity` values.
///
/// Insertion and reads are O(1); storage is one slot per value in the window.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunningAverage {
    values: Vec<Option<f64>>,
    next_index: usize,
    current_average: f64,
    current_count: usize,
}

impl RunningAverage {
    /// Creates an empty window. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            rwarn!("RunningAverage: capacity 0 coerced to 1");
            1
        } else {
            capacity
        };
        Self {
            values: vec![None; capacity],
            next_index: 0,
            current_average: 0.0,
            current_count: 0,
        }
    }

    /// Creates a window that already holds `seed` as its first value.
    pub fn with_seed(capacity: usize, seed: f64) -> Self {
        let mut avg = Self::new(capacity);
        avg.values[0] = Some(seed);
        avg.current_average = seed;
        avg.current_count = 1;
        avg.next_index = 1 % avg.values.len();
        avg
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Number of populated slots; saturates at the capacity.
    pub fn len(&self) -> usize {
        self.current_count
    }

    pub fn is_empty(&self) -> bool {
        self.current_count == 0
    }

    /// Mean of the populated slots, `0.0` while empty.
    pub fn current_value(&self) -> f64 {
        self.current_average
    }

    /// Overwrites the oldest slot with `value` and updates the mean incrementally.
    pub fn add_value(&mut self, value: f64) {
        let target = self.next_index;
        self.next_index = (self.next_index + 1) % self.values.len();

        let old = self.values[target].replace(value);
        let new_count = if old.is_none() {
            self.current_count + 1
        } else {
            self.current_count
        };

        let old_count = self.current_count as f64;
        let n = new_count as f64;
        self.current_average =
            self.current_average * (old_count / n) + (value - old.unwrap_or(0.0)) / n;
        self.current_count = new_count;
    }

    /// Values currently in the window, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        let (tail, head) = self.values.split_at(self.next_index);
        head.iter().chain(tail.iter()).filter_map(|v| *v)
    }
}
