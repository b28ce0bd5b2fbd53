use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug)]
struct Entry {
    ix: usize,
    err: f64,
}

impl Ord for Entry {
    // Larger error first; equal errors pop the lower box index first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.err
            .total_cmp(&other.err)
            .then_with(|| other.ix.cmp(&self.ix))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Refinement worklist: box indices keyed by fit error, worst first.
///
/// Holds indices only; the boxes stay in their `PdMap`.
#[derive(Clone, Debug, Default)]
pub struct RefineQueue {
    heap: BinaryHeap<Entry>,
}

impl RefineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ix: usize, err: f64) {
        self.heap.push(Entry { ix, err });
    }

    /// Remove the worst entry as `(box_index, error)`.
    pub fn pop(&mut self) -> Option<(usize, f64)> {
        self.heap.pop().map(|e| (e.ix, e.err))
    }

    pub fn peek_err(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.err)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
