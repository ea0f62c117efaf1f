//! Blocked (tiled) traversal.
//!
//! Partitions each axis into tiles of a fixed size (the last tile may be
//! shorter when the size does not divide the dimension). The outer level
//! visits tile-index triples in one loop order; within each visited tile,
//! the inner level visits the actual coordinates of the tile's extent in a
//! second loop order. All MAC steps of one tile are completed before the
//! next tile triple begins: the defining contract of blocked matrix
//! multiplication, and the reason tiling bounds the working set.
//!
//! `step_at` does not walk the loop nest; it locates the enclosing tile and
//! the offset within it by direct index arithmetic, so random access to any
//! step costs O(1) and restarting costs nothing.

use std::cmp::min;

use crate::error::{invalid_algorithm_parameter, Result};
use crate::space::Dims;
use crate::traversal::{LoopOrder, MacStep, Traversal};

/// One axis partitioned into tiles.
#[derive(Debug, Clone, Copy)]
struct AxisGrid {
    /// Full length of the axis.
    len: usize,
    /// Configured tile size along the axis.
    tile: usize,
    /// Number of tiles, `ceil(len / tile)`.
    count: usize,
}

impl AxisGrid {
    fn new(len: usize, tile: usize) -> Self {
        AxisGrid {
            len,
            tile,
            count: len.div_ceil(tile),
        }
    }

    /// First coordinate covered by tile `idx`.
    fn base(&self, idx: usize) -> usize {
        idx * self.tile
    }

    /// Extent of tile `idx`: `tile` everywhere except a shorter final tile.
    fn extent(&self, idx: usize) -> usize {
        min(self.tile, self.len - idx * self.tile)
    }

    /// Number of coordinates covered by tiles `0..idx`.
    fn covered_before(&self, idx: usize) -> usize {
        min(idx * self.tile, self.len)
    }
}

/// The tile enclosing one step of a tiled traversal.
///
/// Lets a consumer highlight the whole active block, not just the active
/// voxel. All triples are ordered `(I, J, K)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Tile indices along each axis.
    pub index: (usize, usize, usize),
    /// Global coordinate of the tile's origin corner.
    pub base: (usize, usize, usize),
    /// Extents along each axis; shorter than the configured tile sizes at
    /// the far edges.
    pub extent: (usize, usize, usize),
}

impl Tile {
    /// Number of MAC steps inside this tile.
    pub fn steps(&self) -> usize {
        self.extent.0 * self.extent.1 * self.extent.2
    }

    /// Whether `(i, j, k)` lies inside this tile.
    pub fn contains(&self, i: usize, j: usize, k: usize) -> bool {
        (self.base.0..self.base.0 + self.extent.0).contains(&i)
            && (self.base.1..self.base.1 + self.extent.1).contains(&j)
            && (self.base.2..self.base.2 + self.extent.2).contains(&k)
    }
}

/// Two-level blocked enumeration of the iteration space.
#[derive(Debug, Clone, Copy)]
pub struct TiledTraversal {
    dims: Dims,
    outer: LoopOrder,
    inner: LoopOrder,
    /// Per-axis grids, indexed in `(I, J, K)` axis position.
    grids: [AxisGrid; 3],
}

impl TiledTraversal {
    /// Validates tile sizes and constructs the traversal.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidAlgorithmParameter`](crate::TraceError)
    /// when a tile size is zero or exceeds its dimension.
    pub fn new(
        dims: Dims,
        tile_m: usize,
        tile_n: usize,
        tile_k: usize,
        outer: LoopOrder,
        inner: LoopOrder,
    ) -> Result<Self> {
        for (name, tile, dim) in [
            ("tile_m", tile_m, dims.m()),
            ("tile_n", tile_n, dims.n()),
            ("tile_k", tile_k, dims.k()),
        ] {
            if tile == 0 {
                return Err(invalid_algorithm_parameter(format!(
                    "{} must be at least 1",
                    name
                )));
            }
            if tile > dim {
                return Err(invalid_algorithm_parameter(format!(
                    "{} ({}) must not exceed its dimension ({})",
                    name, tile, dim
                )));
            }
        }

        Ok(TiledTraversal {
            dims,
            outer,
            inner,
            grids: [
                AxisGrid::new(dims.m(), tile_m),
                AxisGrid::new(dims.n(), tile_n),
                AxisGrid::new(dims.k(), tile_k),
            ],
        })
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Locates the tile containing step `t`: per-axis tile indices plus the
    /// step's offset within the tile's own enumeration.
    ///
    /// Tile triples `(t0, t1, t2)` are visited lexicographically in outer
    /// order, `t0` slowest. The number of steps preceding tile index `t0`
    /// along the slowest axis is `covered_before(t0) · d1 · d2`: each of
    /// its coordinates pairs with every coordinate of the two other axes
    /// exactly once. Every non-final tile spans `tile · d1 · d2` steps, so
    /// dividing by that stride finds `t0` directly, with `min` absorbing
    /// the shorter final tile. The same argument repeats one level down
    /// with everything scaled by the resolved extent `e0`, and again for
    /// the fastest axis.
    fn locate(&self, t: usize) -> ([usize; 3], usize) {
        let [o0, o1, o2] = self.outer.axes();
        let g0 = self.grids[o0.index()];
        let g1 = self.grids[o1.index()];
        let g2 = self.grids[o2.index()];
        let d1 = g1.len;
        let d2 = g2.len;

        let t0 = min(t / (g0.tile * d1 * d2), g0.count - 1);
        let r = t - g0.covered_before(t0) * d1 * d2;
        let e0 = g0.extent(t0);

        let t1 = min(r / (e0 * g1.tile * d2), g1.count - 1);
        let r = r - e0 * g1.covered_before(t1) * d2;
        let e1 = g1.extent(t1);

        let t2 = min(r / (e0 * e1 * g2.tile), g2.count - 1);
        let r = r - e0 * e1 * g2.covered_before(t2);

        let mut tiles = [0usize; 3];
        tiles[o0.index()] = t0;
        tiles[o1.index()] = t1;
        tiles[o2.index()] = t2;
        (tiles, r)
    }

    /// The tile enclosing step `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t >= total_steps()`.
    pub fn tile_at(&self, t: usize) -> Tile {
        assert!(
            t < self.total_steps(),
            "step index {} out of range (total {})",
            t,
            self.total_steps()
        );
        let (tiles, _) = self.locate(t);
        Tile {
            index: (tiles[0], tiles[1], tiles[2]),
            base: (
                self.grids[0].base(tiles[0]),
                self.grids[1].base(tiles[1]),
                self.grids[2].base(tiles[2]),
            ),
            extent: (
                self.grids[0].extent(tiles[0]),
                self.grids[1].extent(tiles[1]),
                self.grids[2].extent(tiles[2]),
            ),
        }
    }
}

impl Traversal for TiledTraversal {
    fn total_steps(&self) -> usize {
        self.dims.total_steps()
    }

    fn step_at(&self, t: usize) -> MacStep {
        assert!(
            t < self.total_steps(),
            "step index {} out of range (total {})",
            t,
            self.total_steps()
        );

        let (tiles, offset) = self.locate(t);
        let base = [
            self.grids[0].base(tiles[0]),
            self.grids[1].base(tiles[1]),
            self.grids[2].base(tiles[2]),
        ];
        let extent = [
            self.grids[0].extent(tiles[0]),
            self.grids[1].extent(tiles[1]),
            self.grids[2].extent(tiles[2]),
        ];

        // Within the tile the offset is a plain mixed-radix number over the
        // tile's extents in inner order, exactly as in the naive traversal
        // restricted to the tile's sub-range.
        let [b0, b1, b2] = self.inner.axes();
        let f1 = extent[b1.index()];
        let f2 = extent[b2.index()];

        let mut coord = base;
        coord[b0.index()] += offset / (f1 * f2);
        coord[b1.index()] += (offset / f2) % f1;
        coord[b2.index()] += offset % f2;

        MacStep::new(coord[0], coord[1], coord[2])
    }
}
