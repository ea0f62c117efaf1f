// Demo driver for the traversal simulation engine: runs a handful of
// representative configurations, narrates a small one step by step, and
// verifies every final C against the dense reference product.

use gemmtrace::reference::matmul_reference;
use gemmtrace::{Algorithm, LoopOrder, PlaybackController, PlaybackState};
use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn print_matrix(name: &str, matrix: &Array2<f32>) {
    let (rows, cols) = matrix.dim();
    println!("{name} ({rows}x{cols}):");
    for i in 0..rows {
        print!("  [");
        for j in 0..cols {
            print!("{:.2}", matrix[[i, j]]);
            if j < cols - 1 {
                print!(", ");
            }
        }
        println!("]");
    }
}

fn random_matrix(rows: usize, cols: usize, rng: &mut StdRng) -> Array2<f32> {
    Array2::from_shape_fn((rows, cols), |_| rng.random_range(-1.0..1.0))
}

/// Runs one configuration to completion in ticked playback and compares the
/// accumulated C against the dense reference product.
fn run_scenario(name: &str, algorithm: Algorithm, m: usize, n: usize, k: usize, seed: u64) {
    println!("\n--- Running Scenario: {name} ---");

    let mut rng = StdRng::seed_from_u64(seed);
    let a = random_matrix(m, k, &mut rng);
    let b = random_matrix(k, n, &mut rng);
    let expected = matmul_reference(&a, &b);

    let mut controller = PlaybackController::new();
    if let Err(e) = controller.configure(algorithm, a, b) {
        eprintln!("FAILURE: configure returned an error: {e}");
        return;
    }

    let total = controller.progress().total;
    println!("algorithm: {algorithm}");
    println!("iteration space: {m}x{n}x{k} ({total} MAC steps)");

    controller.start().expect("freshly configured controller starts");
    let mut consumed = 0;
    while controller.state() == PlaybackState::Running {
        let events = controller.tick(256).expect("running controller ticks");
        consumed += events.len();
    }
    println!(
        "consumed {consumed} steps, progress {:.0}%",
        controller.progress().fraction() * 100.0
    );

    let c = controller.accumulation().expect("configured run").c();
    let max_diff = c
        .iter()
        .zip(expected.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max);

    if max_diff < 1e-4 {
        println!("SUCCESS: final C matches the reference product (max diff {max_diff:.1e}).");
    } else {
        println!("FAILURE: final C deviates from the reference product (max diff {max_diff:.1e}).");
    }
}

/// Narrates a 2x2x2 multiplication one step at a time, the way the
/// visualizer's status line would show it.
fn narrated_scenario() {
    println!("\n--- Running Scenario: Narrated 2x2x2, naive(ijk) ---");

    let a = array![[1.0f32, 2.0], [3.0, 4.0]];
    let b = array![[5.0f32, 6.0], [7.0, 8.0]];
    print_matrix("Matrix A", &a);
    print_matrix("Matrix B", &b);

    let mut controller = PlaybackController::new();
    controller
        .configure(Algorithm::Naive { order: LoopOrder::Ijk }, a, b)
        .expect("2x2x2 configuration is valid");

    while controller.state() != PlaybackState::Finished {
        let event = controller.single_step().expect("single step while Idle");
        let (i, j) = event.update.c_coord;
        println!(
            "  step {}: {}  ->  C[{i},{j}] = {:.0}",
            event.index,
            event.narration(),
            event.update.c_value
        );
    }

    let state = controller.accumulation().expect("configured run");
    print_matrix("Final C", state.c());
}

fn main() {
    println!("Starting traversal playback demos...");

    narrated_scenario();

    run_scenario(
        "Naive ijk, 8x8x8",
        Algorithm::Naive { order: LoopOrder::Ijk },
        8,
        8,
        8,
        1,
    );
    run_scenario(
        "Naive kij, 8x8x8 (same space, different locality)",
        Algorithm::Naive { order: LoopOrder::Kij },
        8,
        8,
        8,
        1,
    );
    run_scenario(
        "Tiled 4x4x4 on 8x8x8 (even tiling)",
        Algorithm::Tiled {
            tile_m: 4,
            tile_n: 4,
            tile_k: 4,
            outer: LoopOrder::Ijk,
            inner: LoopOrder::Ijk,
        },
        8,
        8,
        8,
        2,
    );
    run_scenario(
        "Tiled 3x3x3 on 8x8x8 (partial edge tiles)",
        Algorithm::Tiled {
            tile_m: 3,
            tile_n: 3,
            tile_k: 3,
            outer: LoopOrder::Ijk,
            inner: LoopOrder::Ikj,
        },
        8,
        8,
        8,
        2,
    );
    run_scenario(
        "Tiled 2x3x4 on 5x7x4, mixed loop orders",
        Algorithm::Tiled {
            tile_m: 2,
            tile_n: 3,
            tile_k: 4,
            outer: LoopOrder::Kij,
            inner: LoopOrder::Jki,
        },
        5,
        7,
        4,
        3,
    );

    println!("\nTraversal playback demos finished.");
}
