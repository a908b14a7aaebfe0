//! In-place stable merge sort over node links.
//!
//! Bottom-up: each pass walks the chain, cuts off adjacent runs of `width`
//! nodes, merges each pair and splices the result back. Widths double until a
//! single run remains. Nodes never move in storage; only `next` indices and the
//! queue's head and tail change.

use tracing::trace;

use crate::{Index, Node, Storage, StrQueue};

impl<S, Idx: Index> StrQueue<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Sorts the queue in ascending byte-wise order.
    ///
    /// Stable: equal values keep their relative order. O(n log n) time,
    /// O(1) auxiliary space; no node or value is allocated, freed or copied.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_strqueue::StrQueue;
    ///
    /// let mut queue = StrQueue::new();
    /// for v in ["banana", "apple", "cherry"] {
    ///     queue.try_push_back(v.as_bytes()).unwrap();
    /// }
    ///
    /// queue.sort();
    ///
    /// assert_eq!(queue.pop_front(None).unwrap(), b"apple");
    /// assert_eq!(queue.pop_front(None).unwrap(), b"banana");
    /// assert_eq!(queue.pop_front(None).unwrap(), b"cherry");
    /// ```
    pub fn sort(&mut self) {
        if self.len < 2 {
            return;
        }

        let mut width = 1usize;
        let mut passes = 0u32;
        loop {
            let mut rest = self.head;
            let mut head = Idx::NONE;
            let mut tail = Idx::NONE;
            let mut merges = 0usize;

            while rest.is_some() {
                let left = rest;
                let right = self.cut_after(left, width);
                rest = self.cut_after(right, width);

                let (run_head, run_tail) = self.merge(left, right);
                if tail.is_none() {
                    head = run_head;
                } else {
                    self.node_mut(tail).next = run_head;
                }
                tail = run_tail;
                merges += 1;
            }

            self.head = head;
            self.tail = tail;
            passes += 1;

            if merges == 1 {
                break;
            }
            width = width.saturating_mul(2);
        }

        trace!(len = self.len, passes, "sorted queue");
    }

    /// Detaches the run of at most `n` nodes starting at `start`.
    ///
    /// Returns the index of the first node after the run, or none.
    fn cut_after(&mut self, start: Idx, n: usize) -> Idx {
        if start.is_none() {
            return Idx::NONE;
        }

        let mut last = start;
        for _ in 1..n {
            let next = self.node(last).next;
            if next.is_none() {
                break;
            }
            last = next;
        }

        let node = self.node_mut(last);
        let rest = node.next;
        node.next = Idx::NONE;
        rest
    }

    /// Merges two detached, sorted runs into one.
    ///
    /// Returns `(head, tail)` of the merged run. On equal values the node
    /// from `left` goes first.
    fn merge(&mut self, mut left: Idx, mut right: Idx) -> (Idx, Idx) {
        let mut head = Idx::NONE;
        let mut tail = Idx::NONE;

        while left.is_some() && right.is_some() {
            let taken = if self.node(left).value <= self.node(right).value {
                let taken = left;
                left = self.node(left).next;
                taken
            } else {
                let taken = right;
                right = self.node(right).next;
                taken
            };

            if tail.is_none() {
                head = taken;
            } else {
                self.node_mut(tail).next = taken;
            }
            tail = taken;
        }

        let mut rest = if left.is_some() { left } else { right };
        if tail.is_none() {
            head = rest;
        } else {
            self.node_mut(tail).next = rest;
        }

        while rest.is_some() {
            tail = rest;
            rest = self.node(rest).next;
        }

        (head, tail)
    }
}

#[cfg(test)]
mod tests {
    use crate::StrQueue;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn queue_of(values: &[&str]) -> StrQueue {
        let mut queue = StrQueue::new();
        for v in values {
            queue.try_push_back(v.as_bytes()).unwrap();
        }
        queue
    }

    fn strings(queue: &StrQueue) -> Vec<String> {
        queue
            .values()
            .into_iter()
            .map(|v| String::from_utf8(v).unwrap())
            .collect()
    }

    #[test]
    fn sort_empty_and_single() {
        let mut queue: StrQueue = StrQueue::new();
        queue.sort();
        queue.assert_invariants();

        queue.try_push_back(b"x").unwrap();
        queue.sort();
        assert_eq!(strings(&queue), ["x"]);
        queue.assert_invariants();
    }

    #[test]
    fn sort_two() {
        let mut queue = queue_of(&["b", "a"]);
        queue.sort();
        assert_eq!(strings(&queue), ["a", "b"]);
        assert_eq!(queue.back(), Some(&b"b"[..]));
        queue.assert_invariants();
    }

    #[test]
    fn sort_fruit() {
        let mut queue = queue_of(&["banana", "apple", "cherry"]);
        queue.sort();
        assert_eq!(strings(&queue), ["apple", "banana", "cherry"]);
        assert_eq!(queue.len(), 3);
        queue.assert_invariants();
    }

    #[test]
    fn sort_odd_length_tail_run() {
        let mut queue = queue_of(&["e", "d", "c", "b", "a", "f", "0"]);
        queue.sort();
        assert_eq!(strings(&queue), ["0", "a", "b", "c", "d", "e", "f"]);
        queue.assert_invariants();
    }

    #[test]
    fn sort_is_bytewise() {
        let mut queue = queue_of(&["b", "B", "ab", "a", "", "aa"]);
        queue.sort();
        assert_eq!(strings(&queue), ["", "B", "a", "aa", "ab", "b"]);
        queue.assert_invariants();
    }

    #[test]
    fn sort_keeps_equal_values_in_node_order() {
        let mut queue = queue_of(&["k", "a", "k", "a", "k", "b", "a"]);
        let before = queue.indices();
        let (a, b, k) = (
            [before[1], before[3], before[6]],
            [before[5]],
            [before[0], before[2], before[4]],
        );

        queue.sort();

        let after = queue.indices();
        assert_eq!(after[..3], a);
        assert_eq!(after[3..4], b);
        assert_eq!(after[4..], k);
        queue.assert_invariants();
    }

    #[test]
    fn sort_relinks_without_moving_nodes() {
        let mut queue = queue_of(&["c", "a", "b"]);
        let mut before = queue.indices();

        queue.sort();

        let mut after = queue.indices();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
        assert_eq!(queue.storage.len(), 3);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut queue = queue_of(&["q", "w", "e", "r", "t", "y"]);
        queue.sort();
        let once = queue.indices();

        queue.sort();
        assert_eq!(queue.indices(), once);
    }

    #[test]
    fn sort_reverse_sorted_input() {
        let values: Vec<String> = (0..100).rev().map(|i| format!("{i:03}")).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let mut queue = queue_of(&refs);

        queue.sort();

        let mut expected = values.clone();
        expected.sort();
        assert_eq!(strings(&queue), expected);
        queue.assert_invariants();
    }

    #[test]
    fn sort_then_push_and_reverse() {
        let mut queue = queue_of(&["c", "a", "b"]);
        queue.sort();
        queue.try_push_back(b"d").unwrap();
        queue.try_push_front(b"0").unwrap();
        queue.reverse();

        assert_eq!(strings(&queue), ["d", "c", "b", "a", "0"]);
        queue.assert_invariants();
    }

    #[test]
    fn sort_matches_reference_on_random_input() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);

        for len in [2usize, 3, 5, 16, 17, 255, 1000] {
            let mut queue = StrQueue::new();
            let mut reference = Vec::with_capacity(len);

            for _ in 0..len {
                let n = rng.random_range(0..6);
                let value: Vec<u8> = (0..n).map(|_| rng.random_range(b'a'..=b'd')).collect();
                queue.try_push_back(&value).unwrap();
                reference.push(value);
            }

            queue.sort();
            reference.sort();

            assert_eq!(queue.values(), reference, "len {len}");
            queue.assert_invariants();
        }
    }
}
