//! Playback Lifecycle Walkthrough
//!
//! Demonstrates the full controller state machine the way a UI drives it:
//! configure, single-step while idle, continuous ticking, pause/resume,
//! finishing, and a reset that reproduces the run exactly.

use gemmtrace::{Algorithm, LoopOrder, PlaybackController, PlaybackState};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = Array2::from_shape_fn((4, 4), |_| rng.random_range(-1.0f32..1.0));
    let b = Array2::from_shape_fn((4, 4), |_| rng.random_range(-1.0f32..1.0));

    let algorithm = Algorithm::Tiled {
        tile_m: 2,
        tile_n: 2,
        tile_k: 2,
        outer: LoopOrder::Ijk,
        inner: LoopOrder::Ijk,
    };

    let mut controller = PlaybackController::new();
    controller
        .configure(algorithm, a, b)
        .expect("4x4x4 with 2x2x2 tiles is a valid configuration");
    println!("configured: {algorithm}, {} total steps", controller.progress().total);

    // Inspect the first few steps one at a time, without starting playback.
    println!("\nsingle stepping while Idle:");
    for _ in 0..3 {
        let event = controller.single_step().expect("idle controller steps");
        println!("  {} (state {})", event.narration(), controller.state());
    }

    // Continuous playback at 8 steps per tick.
    controller.set_speed(8).expect("non-zero speed");
    controller.start().expect("start from Idle");
    println!("\nrunning at speed {}:", controller.speed());

    let mut ticks = 0;
    while controller.state() == PlaybackState::Running {
        let events = controller.advance().expect("running controller advances");
        ticks += 1;

        // Pause once mid-run to show suspend/resume keeps the cursor.
        if ticks == 3 {
            controller.pause().expect("pause while Running");
            let progress = controller.progress();
            println!(
                "  paused at {}/{} ({:.0}%)",
                progress.consumed,
                progress.total,
                progress.fraction() * 100.0
            );
            let event = controller.single_step().expect("single step while Paused");
            println!("  stepped once while paused: {}", event.narration());
            controller.resume().expect("resume from Paused");
        }

        if let Some(last) = events.last() {
            let (i, j) = last.update.c_coord;
            println!(
                "  tick {ticks}: +{} steps, last wrote C[{i},{j}] = {:.3}",
                events.len(),
                last.update.c_value
            );
        }
    }
    println!("finished after {ticks} ticks: state {}", controller.state());

    // Reset and replay: byte-for-byte the same sequence and final C.
    let final_c = controller.accumulation().expect("configured run").c().clone();
    controller.reset().expect("reset from Finished");
    controller.start().expect("start after reset");
    while controller.state() == PlaybackState::Running {
        controller.advance().expect("running controller advances");
    }
    let replay_c = controller.accumulation().expect("configured run").c();
    println!(
        "\nreplay after reset reproduces final C exactly: {}",
        final_c == *replay_c
    );
}
