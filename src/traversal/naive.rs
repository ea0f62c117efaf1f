//! Naive triple-loop traversal.
//!
//! Enumerates the iteration space exactly as the textbook loop nest does for
//! the chosen loop order: the outermost listed axis varies slowest, the
//! innermost varies fastest. Total steps are `M·N·K` regardless of order;
//! only the visitation order differs, which is the pedagogical point:
//! different orders imply different locality on `A`, `B` and `C`.

use crate::space::Dims;
use crate::traversal::{LoopOrder, MacStep, Traversal};

/// Loop-nest enumeration of the iteration space in a fixed [`LoopOrder`].
#[derive(Debug, Clone, Copy)]
pub struct NaiveTraversal {
    dims: Dims,
    order: LoopOrder,
}

impl NaiveTraversal {
    pub fn new(dims: Dims, order: LoopOrder) -> Self {
        NaiveTraversal { dims, order }
    }

    pub fn order(&self) -> LoopOrder {
        self.order
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }
}

impl Traversal for NaiveTraversal {
    fn total_steps(&self) -> usize {
        self.dims.total_steps()
    }

    /// Decomposes `t` in mixed radix over the axis lengths in loop order.
    ///
    /// For order `(a0, a1, a2)` with lengths `(l0, l1, l2)`, step `t` of the
    /// loop nest sits at digit positions `t = x0·l1·l2 + x1·l2 + x2`, the
    /// same arithmetic that flattens a row-major 3D array. Scattering the
    /// digits back through the axis permutation yields `(i, j, k)`.
    fn step_at(&self, t: usize) -> MacStep {
        assert!(
            t < self.total_steps(),
            "step index {} out of range (total {})",
            t,
            self.total_steps()
        );

        let [a0, a1, a2] = self.order.axes();
        let l1 = self.dims.len_along(a1);
        let l2 = self.dims.len_along(a2);

        let mut coord = [0usize; 3];
        coord[a0.index()] = t / (l1 * l2);
        coord[a1.index()] = (t / l2) % l1;
        coord[a2.index()] = t % l2;

        MacStep::new(coord[0], coord[1], coord[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Axis;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn sequence(traversal: &NaiveTraversal) -> Vec<(usize, usize, usize)> {
        traversal.steps().map(|s| (s.i, s.j, s.k)).collect()
    }

    /// Loop-nest oracle: enumerate with actual nested loops in the given
    /// order and map the loop variables back through the permutation.
    fn loop_nest_sequence(dims: Dims, order: LoopOrder) -> Vec<(usize, usize, usize)> {
        let [a0, a1, a2] = order.axes();
        let mut expected = Vec::with_capacity(dims.total_steps());
        for x0 in 0..dims.len_along(a0) {
            for x1 in 0..dims.len_along(a1) {
                for x2 in 0..dims.len_along(a2) {
                    let mut coord = [0usize; 3];
                    coord[a0.index()] = x0;
                    coord[a1.index()] = x1;
                    coord[a2.index()] = x2;
                    expected.push((coord[0], coord[1], coord[2]));
                }
            }
        }
        expected
    }

    #[test]
    fn test_ijk_order_2x2x2() {
        let dims = Dims::new(2, 2, 2).unwrap();
        let traversal = NaiveTraversal::new(dims, LoopOrder::Ijk);
        assert_eq!(
            sequence(&traversal),
            vec![
                (0, 0, 0),
                (0, 0, 1),
                (0, 1, 0),
                (0, 1, 1),
                (1, 0, 0),
                (1, 0, 1),
                (1, 1, 0),
                (1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_ikj_order_2x2x2() {
        let dims = Dims::new(2, 2, 2).unwrap();
        let traversal = NaiveTraversal::new(dims, LoopOrder::Ikj);
        assert_eq!(
            sequence(&traversal),
            vec![
                (0, 0, 0),
                (0, 1, 0),
                (0, 0, 1),
                (0, 1, 1),
                (1, 0, 0),
                (1, 1, 0),
                (1, 0, 1),
                (1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_jki_order_2x2x2() {
        let dims = Dims::new(2, 2, 2).unwrap();
        let traversal = NaiveTraversal::new(dims, LoopOrder::Jki);
        assert_eq!(
            sequence(&traversal),
            vec![
                (0, 0, 0),
                (1, 0, 0),
                (0, 0, 1),
                (1, 0, 1),
                (0, 1, 0),
                (1, 1, 0),
                (0, 1, 1),
                (1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_all_orders_match_loop_nest() {
        let dims = Dims::new(2, 3, 4).unwrap();
        for order in LoopOrder::ALL {
            let traversal = NaiveTraversal::new(dims, order);
            assert_eq!(
                sequence(&traversal),
                loop_nest_sequence(dims, order),
                "order {}",
                order
            );
        }
    }

    #[test]
    fn test_fastest_axis_varies_between_adjacent_steps() {
        let dims = Dims::new(3, 4, 5).unwrap();
        for order in LoopOrder::ALL {
            let traversal = NaiveTraversal::new(dims, order);
            let fastest = order.axes()[2];
            let first = traversal.step_at(0);
            let second = traversal.step_at(1);
            let coord = |s: MacStep, axis: Axis| match axis {
                Axis::I => s.i,
                Axis::J => s.j,
                Axis::K => s.k,
            };
            assert_eq!(coord(second, fastest), coord(first, fastest) + 1);
        }
    }

    #[test]
    fn test_step_at_is_deterministic() {
        let dims = Dims::new(5, 4, 3).unwrap();
        let traversal = NaiveTraversal::new(dims, LoopOrder::Kij);
        for t in 0..traversal.total_steps() {
            assert_eq!(traversal.step_at(t), traversal.step_at(t));
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_step_at_past_end_panics() {
        let dims = Dims::new(2, 2, 2).unwrap();
        let traversal = NaiveTraversal::new(dims, LoopOrder::Ijk);
        traversal.step_at(8);
    }

    proptest! {
        /// The multiset of emitted triples equals the full cartesian
        /// product exactly once, for any dimensions and order.
        #[test]
        fn prop_covers_cartesian_product(
            m in 1usize..=8,
            n in 1usize..=8,
            k in 1usize..=8,
            order_idx in 0usize..6,
        ) {
            let dims = Dims::new(m, n, k).unwrap();
            let order = LoopOrder::ALL[order_idx];
            let traversal = NaiveTraversal::new(dims, order);

            let mut seen = HashSet::new();
            for step in traversal.steps() {
                prop_assert!(dims.contains(step.i, step.j, step.k));
                prop_assert!(seen.insert((step.i, step.j, step.k)), "duplicate step {:?}", step);
            }
            prop_assert_eq!(seen.len(), dims.total_steps());
        }
    }
}
