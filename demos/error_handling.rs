//! Error Handling Demonstration
//!
//! This example demonstrates the error handling in gemmtrace, showing how
//! invalid configurations and out-of-order playback commands surface as
//! errors instead of panicking.

use gemmtrace::{error::TraceError, Algorithm, LoopOrder, PlaybackController};
use ndarray::Array2;

fn main() {
    println!("🔧 Gemmtrace Error Handling Demonstration\n");

    // Example 1: Invalid dimension (M = 0)
    println!("❌ Example 1: Invalid dimension (zero-row A)");
    let a = Array2::<f32>::zeros((0, 4));
    let b = Array2::<f32>::zeros((4, 4));
    let mut controller = PlaybackController::new();
    match controller.configure(Algorithm::Naive { order: LoopOrder::Ijk }, a, b) {
        Ok(()) => println!("   Unexpected success"),
        Err(e) => {
            println!("   Error caught: {}", e);
            println!("   Error type: {:?}", e);
        }
    }
    println!();

    // Example 2: Invalid algorithm parameter (oversized tile)
    println!("❌ Example 2: Invalid algorithm parameter (tile exceeds dimension)");
    let a = Array2::<f32>::zeros((4, 4));
    let b = Array2::<f32>::zeros((4, 4));
    let bad_tiling = Algorithm::Tiled {
        tile_m: 8,
        tile_n: 2,
        tile_k: 2,
        outer: LoopOrder::Ijk,
        inner: LoopOrder::Ijk,
    };
    match controller.configure(bad_tiling, a, b) {
        Ok(()) => println!("   Unexpected success"),
        Err(e) => println!("   Error caught: {}", e),
    }
    println!();

    // Example 3: Malformed loop-order string from a UI selector
    println!("❌ Example 3: Malformed loop-order permutation");
    match "ikl".parse::<LoopOrder>() {
        Ok(order) => println!("   Unexpected success: {order}"),
        Err(e) => println!("   Error caught: {}", e),
    }
    println!();

    // Example 4: Invalid state transitions, matched per variant
    println!("❌ Example 4: Out-of-order playback commands");
    let a = Array2::<f32>::ones((2, 2));
    let b = Array2::<f32>::ones((2, 2));
    controller
        .configure(Algorithm::Naive { order: LoopOrder::Ijk }, a, b)
        .expect("valid 2x2x2 configuration");

    match controller.pause() {
        Ok(()) => println!("   Unexpected success"),
        Err(TraceError::InvalidStateTransition {
            operation, state, ..
        }) => {
            println!("   pause rejected: operation '{operation}' in state {state}");
        }
        Err(e) => println!("   Unexpected error kind: {e}"),
    }

    controller.start().expect("start from Idle");
    match controller.single_step() {
        Ok(_) => println!("   Unexpected success"),
        Err(e) => println!("   single_step rejected while Running: {e}"),
    }
    println!();

    // Example 5: Error propagation with `?`
    println!("🔗 Example 5: Chaining configuration with error propagation");

    fn configure_and_prime(
        controller: &mut PlaybackController,
        algorithm: Algorithm,
        a: Array2<f32>,
        b: Array2<f32>,
    ) -> Result<usize, TraceError> {
        controller.configure(algorithm, a, b)?;
        let event = controller.single_step()?;
        Ok(event.index)
    }

    let a = Array2::<f32>::ones((3, 3));
    let b = Array2::<f32>::ones((3, 3));
    let mut fresh = PlaybackController::new();
    match configure_and_prime(
        &mut fresh,
        Algorithm::Naive { order: LoopOrder::Kji },
        a,
        b,
    ) {
        Ok(index) => println!("   Primed run, first step index {index}"),
        Err(e) => println!("   Chained configuration failed: {e}"),
    }
    println!();

    println!("✨ Summary:");
    println!("   - Configuration errors: InvalidDimension, InvalidAlgorithmParameter");
    println!("   - Sequencing errors: InvalidStateTransition");
    println!("   - All are returned to the caller; nothing is silently corrected");
}
