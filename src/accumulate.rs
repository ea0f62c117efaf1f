//! Accumulation state.
//!
//! Owns the live output matrix `C` plus running access counters for the
//! operand matrices, and mutates them exclusively by applying MAC steps in
//! generator order. After consuming any prefix of a generator's sequence,
//! `C` holds exactly the partial sums of the visited triples; after all
//! `M·N·K` steps, `C == A×B` regardless of traversal order. The counters
//! record how often each `A`/`B` element has been read, the "heat" the
//! visualizer paints on the two operand walls.

use ndarray::Array2;

use crate::error::{invalid_dimension, Result};
use crate::space::Dims;
use crate::traversal::MacStep;

/// The input matrices of one simulation run.
///
/// `A` is `M×K` and `B` is `K×N`; shapes are validated at construction and
/// immutable for the run's duration, so every generator-produced coordinate
/// is in range by construction.
#[derive(Debug, Clone)]
pub struct Operands {
    a: Array2<f32>,
    b: Array2<f32>,
    dims: Dims,
}

impl Operands {
    /// Validates shape agreement and the dimension ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidDimension`](crate::TraceError) when the
    /// inner dimensions of `a` and `b` disagree, or when any resulting
    /// dimension is zero or exceeds [`MAX_DIM`](crate::MAX_DIM).
    pub fn new(a: Array2<f32>, b: Array2<f32>) -> Result<Self> {
        let (m, ka) = a.dim();
        let (kb, n) = b.dim();
        if ka != kb {
            return Err(invalid_dimension(
                'k',
                kb,
                format!("A is {}x{} but B has {} rows", m, ka, kb),
            ));
        }
        let dims = Dims::new(m, n, ka)?;
        Ok(Operands { a, b, dims })
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn a(&self) -> &Array2<f32> {
        &self.a
    }

    pub fn b(&self) -> &Array2<f32> {
        &self.b
    }
}

/// The delta produced by applying one MAC step.
///
/// Everything a renderer needs to repaint incrementally: the touched cells
/// and their values after the step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepUpdate {
    /// The `C` cell written, `(i, j)`.
    pub c_coord: (usize, usize),
    /// Value of that cell after the accumulation.
    pub c_value: f32,
    /// The `A` cell read, `(i, k)`.
    pub a_coord: (usize, usize),
    /// Read count of that `A` cell after the step.
    pub a_count: u32,
    /// The `B` cell read, `(k, j)`.
    pub b_coord: (usize, usize),
    /// Read count of that `B` cell after the step.
    pub b_count: u32,
}

/// Live output matrix and operand access counters for one run.
///
/// Created zeroed at run start and mutated only through [`apply`]. Applying
/// the same step twice double-counts; ordering and uniqueness are the
/// playback controller's contract, not checked here.
///
/// [`apply`]: AccumulationState::apply
#[derive(Debug, Clone)]
pub struct AccumulationState {
    c: Array2<f32>,
    a_counts: Array2<u32>,
    b_counts: Array2<u32>,
}

impl AccumulationState {
    /// Zeroed state for the given dimensions: `C` is `M×N`, the counters
    /// span `A` (`M×K`) and `B` (`K×N`).
    pub fn new(dims: Dims) -> Self {
        AccumulationState {
            c: Array2::zeros((dims.m(), dims.n())),
            a_counts: Array2::zeros((dims.m(), dims.k())),
            b_counts: Array2::zeros((dims.k(), dims.n())),
        }
    }

    /// Applies one step: `C[i,j] += A[i,k] * B[k,j]`, bumping both operand
    /// counters. Has no failure mode for generator-produced steps; the
    /// coordinates are in range by construction.
    pub fn apply(&mut self, step: MacStep, operands: &Operands) -> StepUpdate {
        let (i, k) = step.a_access();
        let (kb, j) = step.b_access();
        debug_assert_eq!(k, kb);

        self.c[[i, j]] += operands.a()[[i, k]] * operands.b()[[k, j]];
        self.a_counts[[i, k]] += 1;
        self.b_counts[[k, j]] += 1;

        StepUpdate {
            c_coord: (i, j),
            c_value: self.c[[i, j]],
            a_coord: (i, k),
            a_count: self.a_counts[[i, k]],
            b_coord: (k, j),
            b_count: self.b_counts[[k, j]],
        }
    }

    /// Zeroes all accumulated sums and counters in place. The only way to
    /// clear accumulation; dimensions stay fixed for the state's lifetime.
    pub fn reset(&mut self) {
        self.c.fill(0.0);
        self.a_counts.fill(0);
        self.b_counts.fill(0);
    }

    /// The output matrix as accumulated so far.
    pub fn c(&self) -> &Array2<f32> {
        &self.c
    }

    /// Per-element read counts of `A`.
    pub fn a_counts(&self) -> &Array2<u32> {
        &self.a_counts
    }

    /// Per-element read counts of `B`.
    pub fn b_counts(&self) -> &Array2<u32> {
        &self.b_counts
    }
}
