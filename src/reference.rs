//! Reference product `C = A×B`.
//!
//! The exact final result of any traversal, computed eagerly. Tests verify
//! every generator against it, and a rendering front end can use it to
//! normalize the color scale of the output wall before playback begins.

use ndarray::Array2;
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Dense serial product, ikj loop order.
///
/// # Panics
///
/// Panics if the inner dimensions of `a` and `b` disagree.
pub fn matmul_reference(a: &Array2<f32>, b: &Array2<f32>) -> Array2<f32> {
    let (m, ka) = a.dim();
    let (kb, n) = b.dim();
    assert_eq!(ka, kb, "A is {}x{} but B is {}x{}", m, ka, kb, n);

    let mut c = Array2::<f32>::zeros((m, n));
    for i in 0..m {
        for p in 0..ka {
            let a_ip = a[[i, p]];
            for j in 0..n {
                c[[i, j]] += a_ip * b[[p, j]];
            }
        }
    }
    c
}

/// Dense product parallelized over rows of `C` with Rayon.
///
/// Each row of `C` depends on one row of `A` and all of `B`, so the row
/// partition needs no synchronization. Matches [`matmul_reference`]
/// bit-for-bit: per row the accumulation order is identical.
///
/// # Panics
///
/// Panics if the inner dimensions of `a` and `b` disagree.
pub fn par_matmul_reference(a: &Array2<f32>, b: &Array2<f32>) -> Array2<f32> {
    let (m, ka) = a.dim();
    let (kb, n) = b.dim();
    assert_eq!(ka, kb, "A is {}x{} but B is {}x{}", m, ka, kb, n);

    let mut c = vec![0.0f32; m * n];
    c.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        for p in 0..ka {
            let a_ip = a[[i, p]];
            for j in 0..n {
                row[j] += a_ip * b[[p, j]];
            }
        }
    });

    Array2::from_shape_vec((m, n), c).expect("row-major buffer matches (m, n)")
}
