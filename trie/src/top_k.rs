//! Bounded top-K selector.
//!
//! A 1-indexed binary min-heap over [`Candidate`]s that never holds more
//! than `max_size` entries: once full, every insert evicts the lowest
//! ranked candidate. Slot 0 is a placeholder so parent/child arithmetic
//! stays `k / 2`, `2k`, `2k + 1`.

use crate::node::Candidate;

#[derive(Debug)]
pub struct TopK {
    heap: Vec<Candidate>,
    max_size: usize,
}

impl TopK {
    pub fn new(max_size: usize) -> Self {
        TopK {
            heap: vec![Candidate::default()],
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Lowest ranked retained candidate, the next one to be evicted.
    pub fn min(&self) -> Option<&Candidate> {
        self.heap.get(1)
    }

    pub fn insert(&mut self, candidate: Candidate) {
        self.heap.push(candidate);
        let n = self.len();
        self.swim(n);
        if n > self.max_size {
            self.delete_min();
        }
    }

    /// Retained candidates, in heap order.
    pub fn get_top_results(&self) -> &[Candidate] {
        &self.heap[1..]
    }

    pub fn into_top_results(mut self) -> Vec<Candidate> {
        self.heap.remove(0);
        self.heap
    }

    /// Retained candidates, best ranked first.
    pub fn into_sorted_vec(self) -> Vec<Candidate> {
        let mut results = self.into_top_results();
        results.sort_by(|a, b| b.cmp(a));
        results
    }

    fn delete_min(&mut self) -> Option<Candidate> {
        let n = self.len();
        if n == 0 {
            return None;
        }
        self.heap.swap(1, n);
        let min = self.heap.pop();
        self.sink(1);
        min
    }

    fn swim(&mut self, mut k: usize) {
        while k > 1 && self.heap[k / 2] > self.heap[k] {
            self.heap.swap(k / 2, k);
            k /= 2;
        }
    }

    fn sink(&mut self, mut k: usize) {
        let n = self.len();
        while 2 * k <= n {
            let mut j = 2 * k;
            if j < n && self.heap[j] > self.heap[j + 1] {
                j += 1;
            }
            if self.heap[k] <= self.heap[j] {
                break;
            }
            self.heap.swap(k, j);
            k = j;
        }
    }

    #[cfg(test)]
    fn is_min_heap(&self) -> bool {
        let n = self.len();
        (1..=n).all(|k| {
            let left = 2 * k;
            let right = left + 1;
            (left > n || self.heap[k] <= self.heap[left])
                && (right > n || self.heap[k] <= self.heap[right])
        })
    }
}
