//! Iteration space model.
//!
//! Pure data: the validated `(M, N, K)` coordinate domain of one matrix
//! multiplication and the axes spanning it. `A` is `M×K`, `B` is `K×N` and
//! `C` is `M×N`; every multiply-accumulate step lives at one point of
//! `[0,M)×[0,N)×[0,K)`.

use crate::error::{invalid_dimension, Result};
use crate::MAX_DIM;

/// The three axes of the iteration space.
///
/// `I` spans rows of `A`/`C` (length `M`), `J` spans columns of `B`/`C`
/// (length `N`) and `K` spans the shared inner dimension (length `K`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    I,
    J,
    K,
}

impl Axis {
    /// Lowercase letter used in loop-order notation (`i`, `j`, `k`).
    pub fn as_char(self) -> char {
        match self {
            Axis::I => 'i',
            Axis::J => 'j',
            Axis::K => 'k',
        }
    }

    /// Stable position of this axis in `(i, j, k)` coordinate triples.
    pub(crate) fn index(self) -> usize {
        match self {
            Axis::I => 0,
            Axis::J => 1,
            Axis::K => 2,
        }
    }
}

/// Validated matrix dimensions `(M, N, K)`.
///
/// Immutable once a simulation run starts; reconfiguring a run constructs a
/// fresh `Dims`. Construction is the only place dimension errors can arise,
/// every later coordinate is in range by construction of the generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    m: usize,
    n: usize,
    k: usize,
}

impl Dims {
    /// Validates and constructs dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidDimension`](crate::TraceError) when any
    /// value is zero or exceeds [`MAX_DIM`].
    pub fn new(m: usize, n: usize, k: usize) -> Result<Self> {
        for (axis, value) in [('m', m), ('n', n), ('k', k)] {
            if value == 0 {
                return Err(invalid_dimension(axis, value, "dimensions must be positive"));
            }
            if value > MAX_DIM {
                return Err(invalid_dimension(
                    axis,
                    value,
                    format!("dimensions must not exceed {}", MAX_DIM),
                ));
            }
        }
        Ok(Dims { m, n, k })
    }

    /// Rows of `A` and `C`.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Columns of `B` and `C`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Columns of `A`, rows of `B`.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Length of the iteration space along `axis`.
    pub fn len_along(&self, axis: Axis) -> usize {
        match axis {
            Axis::I => self.m,
            Axis::J => self.n,
            Axis::K => self.k,
        }
    }

    /// Total number of MAC steps, `M·N·K`.
    pub fn total_steps(&self) -> usize {
        self.m * self.n * self.k
    }

    /// Whether `(i, j, k)` lies inside the iteration space.
    pub fn contains(&self, i: usize, j: usize, k: usize) -> bool {
        i < self.m && j < self.n && k < self.k
    }
}

impl Default for Dims {
    /// The 12×12×12 scene the visualizer opens with.
    fn default() -> Self {
        Dims {
            m: 12,
            n: 12,
            k: 12,
        }
    }
}
