//! Traversal generators.
//!
//! A traversal generator produces the canonical ordered sequence of
//! multiply-accumulate steps for one algorithm configuration. Generators are
//! pure: [`Traversal::step_at`] is a function from step index `t` to
//! [`MacStep`], so the same configuration always yields the same sequence,
//! there is no hidden cursor, and restarting is free. The playback
//! controller alone owns the progress cursor.
//!
//! Two generator families are implemented:
//!
//! - [`NaiveTraversal`]: the classic triple loop nest, in any of the six
//!   loop-order permutations of `{i, j, k}`.
//! - [`TiledTraversal`]: two-level blocked enumeration with independent
//!   outer (tile triple) and inner (within tile) loop orders, including
//!   partial edge tiles.
//!
//! The [`Traversal`] contract deliberately assumes nothing about loop
//! nests, only "step `t` of a well-defined total order over exactly the
//! `M·N·K` MAC events", so a wavefront/systolic scheduler can implement it
//! later without reshaping the controller or accumulation layers.

pub mod naive;
pub mod tiled;

pub use naive::NaiveTraversal;
pub use tiled::{Tile, TiledTraversal};

use std::fmt;
use std::str::FromStr;

use crate::error::{invalid_algorithm_parameter, Result, TraceError};
use crate::space::{Axis, Dims};

/// One multiply-accumulate event: `C[i,j] += A[i,k] * B[k,j]`.
///
/// Immutable value, produced once per logical step. The operand accesses are
/// derived from the coordinates and exposed as `(row, column)` pairs into
/// the respective matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacStep {
    /// Row of `A` and `C`.
    pub i: usize,
    /// Column of `B` and `C`.
    pub j: usize,
    /// Column of `A`, row of `B`.
    pub k: usize,
}

impl MacStep {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        MacStep { i, j, k }
    }

    /// Element of `A` read by this step.
    pub fn a_access(&self) -> (usize, usize) {
        (self.i, self.k)
    }

    /// Element of `B` read by this step.
    pub fn b_access(&self) -> (usize, usize) {
        (self.k, self.j)
    }

    /// Element of `C` read-modified-written by this step.
    pub fn c_access(&self) -> (usize, usize) {
        (self.i, self.j)
    }
}

impl fmt::Display for MacStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "C[{},{}] += A[{},{}] * B[{},{}]",
            self.i, self.j, self.i, self.k, self.k, self.j
        )
    }
}

/// Loop order: a permutation of the axes `{I, J, K}`.
///
/// The first listed axis varies slowest, the last varies fastest, matching
/// standard nested-loop enumeration: `Ikj` is `for i { for k { for j } }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopOrder {
    Ijk,
    Ikj,
    Jik,
    Jki,
    Kij,
    Kji,
}

impl LoopOrder {
    /// All six permutations, in a stable order.
    pub const ALL: [LoopOrder; 6] = [
        LoopOrder::Ijk,
        LoopOrder::Ikj,
        LoopOrder::Jik,
        LoopOrder::Jki,
        LoopOrder::Kij,
        LoopOrder::Kji,
    ];

    /// The axes from slowest-varying to fastest-varying.
    pub fn axes(self) -> [Axis; 3] {
        match self {
            LoopOrder::Ijk => [Axis::I, Axis::J, Axis::K],
            LoopOrder::Ikj => [Axis::I, Axis::K, Axis::J],
            LoopOrder::Jik => [Axis::J, Axis::I, Axis::K],
            LoopOrder::Jki => [Axis::J, Axis::K, Axis::I],
            LoopOrder::Kij => [Axis::K, Axis::I, Axis::J],
            LoopOrder::Kji => [Axis::K, Axis::J, Axis::I],
        }
    }
}

impl fmt::Display for LoopOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.axes() {
            write!(f, "{}", axis.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for LoopOrder {
    type Err = TraceError;

    /// Parses a loop order from its three-letter notation, e.g. `"ikj"`.
    ///
    /// Case-insensitive. Anything that is not a permutation of `ijk` is
    /// rejected at configuration time.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ijk" => Ok(LoopOrder::Ijk),
            "ikj" => Ok(LoopOrder::Ikj),
            "jik" => Ok(LoopOrder::Jik),
            "jki" => Ok(LoopOrder::Jki),
            "kij" => Ok(LoopOrder::Kij),
            "kji" => Ok(LoopOrder::Kji),
            _ => Err(invalid_algorithm_parameter(format!(
                "loop order must be a permutation of 'ijk', got '{}'",
                s
            ))),
        }
    }
}

/// A restartable producer of MAC steps in a well-defined total order.
///
/// Implementations are stateless from the outside: `step_at(t)` must return
/// the same [`MacStep`] for the same `t` and configuration, forever. The
/// multiset of steps over `0..total_steps()` covers the full cartesian
/// product of the iteration space exactly once.
pub trait Traversal {
    /// Number of steps in the sequence, always `M·N·K`.
    fn total_steps(&self) -> usize;

    /// The step at index `t` of the sequence.
    ///
    /// # Panics
    ///
    /// Panics if `t >= total_steps()`; the caller owns the cursor and is
    /// responsible for staying in range.
    fn step_at(&self, t: usize) -> MacStep;

    /// Iterates the whole sequence from the start.
    fn steps(&self) -> Steps<'_>
    where
        Self: Sized,
    {
        Steps::new(self)
    }
}

/// Iterator over a traversal's step sequence.
pub struct Steps<'a> {
    traversal: &'a dyn Traversal,
    next: usize,
    total: usize,
}

impl<'a> Steps<'a> {
    pub fn new(traversal: &'a dyn Traversal) -> Self {
        Steps {
            traversal,
            next: 0,
            total: traversal.total_steps(),
        }
    }
}

impl Iterator for Steps<'_> {
    type Item = MacStep;

    fn next(&mut self) -> Option<MacStep> {
        if self.next == self.total {
            return None;
        }
        let step = self.traversal.step_at(self.next);
        self.next += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Steps<'_> {}

/// Algorithm selection with strongly-typed parameters.
///
/// A closed tagged variant per algorithm family; invalid permutations and
/// tile sizes are rejected when the configuration is turned into a
/// generator, not at step-generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Triple loop nest in the given loop order.
    Naive {
        order: LoopOrder,
    },
    /// Blocked enumeration: tile triples visited in `outer` order, the
    /// coordinates within each tile in `inner` order. Tile sizes that do
    /// not divide their dimension leave a shorter final tile.
    Tiled {
        tile_m: usize,
        tile_n: usize,
        tile_k: usize,
        outer: LoopOrder,
        inner: LoopOrder,
    },
}

impl Algorithm {
    /// Builds the traversal generator for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidAlgorithmParameter`] when a tile size is
    /// zero or exceeds its dimension.
    pub fn build(&self, dims: Dims) -> Result<Box<dyn Traversal>> {
        match *self {
            Algorithm::Naive { order } => Ok(Box::new(NaiveTraversal::new(dims, order))),
            Algorithm::Tiled {
                tile_m,
                tile_n,
                tile_k,
                outer,
                inner,
            } => Ok(Box::new(TiledTraversal::new(
                dims, tile_m, tile_n, tile_k, outer, inner,
            )?)),
        }
    }

    /// Checks the configuration against `dims` without building a generator.
    pub fn validate(&self, dims: Dims) -> Result<()> {
        self.build(dims).map(|_| ())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Algorithm::Naive { order } => write!(f, "naive({})", order),
            Algorithm::Tiled {
                tile_m,
                tile_n,
                tile_k,
                outer,
                inner,
            } => write!(
                f,
                "tiled({}x{}x{}, outer={}, inner={})",
                tile_m, tile_n, tile_k, outer, inner
            ),
        }
    }
}
