//! Min-priority queue shared by the graph searches.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordered by ascending cost, then by insertion order.
#[derive(Debug)]
struct Ranked<T> {
    cost: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Ranked<T> {}

impl<T> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Ranked<T> {
    // Reversed so the std max-heap pops the cheapest, oldest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Lazy-deletion frontier: stale entries stay queued and callers skip them
/// when popped.
#[derive(Debug)]
pub(crate) struct Frontier<T> {
    heap: BinaryHeap<Ranked<T>>,
    next_seq: u64,
}

impl<T> Default for Frontier<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> Frontier<T> {
    pub(crate) fn push(&mut self, cost: f64, item: T) {
        self.heap.push(Ranked {
            cost,
            seq: self.next_seq,
            item,
        });
        self.next_seq = self.next_seq.saturating_add(1);
    }

    pub(crate) fn pop(&mut self) -> Option<(f64, T)> {
        self.heap.pop().map(|entry| (entry.cost, entry.item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pops_cheapest_first() {
        let mut frontier = Frontier::default();
        frontier.push(3.0, 'c');
        frontier.push(1.0, 'a');
        frontier.push(2.0, 'b');
        let order: Vec<_> = std::iter::from_fn(|| frontier.pop().map(|(_, item)| item)).collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
    }

    #[rstest]
    fn equal_costs_pop_in_insertion_order() {
        let mut frontier = Frontier::default();
        for item in [7_u64, 3, 9] {
            frontier.push(5.0, item);
        }
        let order: Vec<_> = std::iter::from_fn(|| frontier.pop().map(|(_, item)| item)).collect();
        assert_eq!(order, vec![7, 3, 9]);
    }
}
