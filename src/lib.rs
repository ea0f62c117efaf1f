//! Deterministic traversal simulation engine for matrix-multiplication
//! visualization.
//!
//! Given matrix dimensions and an algorithm selection, this crate produces
//! the exact ordered sequence of multiply-accumulate (MAC) steps the
//! algorithm performs over the `M×N×K` iteration space, applies each step to
//! a live output matrix, and sequences playback (play, pause, single-step,
//! reset, speed control). A rendering front end consumes the emitted step
//! events to highlight the active voxel of the iteration cube and the
//! operand cells it touches; this crate only guarantees the data is correct
//! and delivered in order.
//!
//! ## Usage
//!
//! ```
//! use gemmtrace::{Algorithm, LoopOrder, PlaybackController};
//! use ndarray::array;
//!
//! let a = array![[1.0f32, 2.0], [3.0, 4.0]];
//! let b = array![[5.0f32, 6.0], [7.0, 8.0]];
//!
//! let mut controller = PlaybackController::new();
//! controller
//!     .configure(Algorithm::Naive { order: LoopOrder::Ijk }, a, b)
//!     .unwrap();
//!
//! controller.start().unwrap();
//! let events = controller.tick(8).unwrap();
//! assert_eq!(events.len(), 8);
//!
//! let state = controller.accumulation().unwrap();
//! assert_eq!(state.c()[[1, 1]], 50.0);
//! ```

pub mod accumulate;
pub mod error;
pub mod playback;
pub mod reference;
pub mod space;
pub mod traversal;

/// Upper bound on each of the `M`, `N`, `K` dimensions.
///
/// A practical ceiling for interactive visualization, not a correctness
/// limit: at 512³ the iteration space already holds ~134M MAC steps.
pub const MAX_DIM: usize = 512;

pub use accumulate::{AccumulationState, Operands, StepUpdate};
pub use error::{Result, TraceError};
pub use playback::{PlaybackController, PlaybackState, Progress, StepEvent};
pub use space::{Axis, Dims};
pub use traversal::{Algorithm, LoopOrder, MacStep, Traversal};
