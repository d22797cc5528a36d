//! Dense two-dimensional storage for the render.
//!
//! `Grid<T>` is the ordinary, exclusively-owned container the caller
//! receives and the post-processing pass works on.  While the engine
//! runs, though, several workers write into the same raster at once,
//! and two of them may land on the same border pixel.  They always
//! write the same value there (the evaluator is pure), so those writes
//! need no ordering, only atomicity of the individual cell.
//! `SharedValues` and `SharedMask` hold the raster as relaxed atomics
//! for that phase: on the platforms we care about a relaxed load or
//! store is a plain move, so the redundant writes cost nothing extra.
//! Don't put a lock around them; there is nothing for it to protect.

use planes::Pixel;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Marks a cell the engine has not computed yet.  Step counts are
/// never negative, but a smoothed value can land below zero when an
/// orbit starts far out and escapes at once.  A cell that ends up
/// holding exactly this value is simply evaluated again.
pub const UNSET: f64 = -1.0;

/// A dense, row-major raster.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// A raster of the given size with every cell set to `value`.
    pub fn new(width: usize, height: usize, value: T) -> Grid<T> {
        Grid {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        for cell in self.cells.iter_mut() {
            *cell = value.clone();
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid from a row-major vector of cells.  Returns `None`
    /// if the vector is the wrong size.
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Option<Grid<T>> {
        if cells.len() != width * height {
            return None;
        }
        Some(Grid {
            width,
            height,
            cells,
        })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // Row-major offset of a cell.  A column past the right edge would
    // otherwise wrap into the next row, so this checks both axes.
    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside a {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// The cell at column `x`, row `y`, if it exists.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.offset(x, y)])
        } else {
            None
        }
    }

    /// Replace the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// If the cell lies outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let offset = self.offset(x, y);
        self.cells[offset] = value;
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> ::std::slice::Iter<T> {
        self.cells.iter()
    }

    /// Mutable cells in row-major order.
    pub fn iter_mut(&mut self) -> ::std::slice::IterMut<T> {
        self.cells.iter_mut()
    }

    /// The cells as one row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Give up the grid, keeping its row-major cells.
    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }
}

impl Grid<f64> {
    /// The largest value in the grid, `None` for an empty grid.
    pub fn max_value(&self) -> Option<f64> {
        self.cells.iter().cloned().fold(None, |acc, v| match acc {
            None => Some(v),
            Some(m) => Some(if v > m { v } else { m }),
        })
    }

    /// The smallest and largest values in the grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.cells.iter().cloned().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((if v < lo { v } else { lo }, if v > hi { v } else { hi })),
        })
    }
}

impl<T> Index<Pixel> for Grid<T> {
    type Output = T;

    fn index(&self, pixel: Pixel) -> &T {
        &self.cells[self.offset(pixel.0, pixel.1)]
    }
}

impl<T> IndexMut<Pixel> for Grid<T> {
    fn index_mut(&mut self, pixel: Pixel) -> &mut T {
        let offset = self.offset(pixel.0, pixel.1);
        &mut self.cells[offset]
    }
}

/// Iteration values written by the engine's workers.  Each cell holds
/// the bit pattern of an `f64`.
#[derive(Debug)]
pub struct SharedValues {
    width: usize,
    height: usize,
    cells: Vec<AtomicU64>,
}

impl SharedValues {
    /// A raster with every cell `UNSET`.
    pub fn new(width: usize, height: usize) -> SharedValues {
        SharedValues {
            width,
            height,
            cells: (0..width * height)
                .map(|_| AtomicU64::new(UNSET.to_bits()))
                .collect(),
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read a cell.  May be stale with respect to a concurrent write,
    /// which is fine: any concurrent writer writes the same value.
    #[inline]
    pub fn load(&self, pixel: Pixel) -> f64 {
        f64::from_bits(self.cells[pixel.1 * self.width + pixel.0].load(Ordering::Relaxed))
    }

    /// Write a cell.
    #[inline]
    pub fn store(&self, pixel: Pixel, value: f64) {
        self.cells[pixel.1 * self.width + pixel.0].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Once every worker has been joined, turn the raster back into an
    /// ordinary grid.
    pub fn into_grid(self) -> Grid<f64> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self
                .cells
                .into_iter()
                .map(|cell| f64::from_bits(cell.into_inner()))
                .collect(),
        }
    }
}

/// The fill-anchor overlay written by the engine's workers.
#[derive(Debug)]
pub struct SharedMask {
    width: usize,
    height: usize,
    cells: Vec<AtomicBool>,
}

impl SharedMask {
    /// A mask with nothing marked.
    pub fn new(width: usize, height: usize) -> SharedMask {
        SharedMask {
            width,
            height,
            cells: (0..width * height).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    /// Flag a pixel as an anchor.
    #[inline]
    pub fn mark(&self, pixel: Pixel) {
        self.cells[pixel.1 * self.width + pixel.0].store(true, Ordering::Relaxed);
    }

    /// Turn the mask back into an ordinary grid.
    pub fn into_grid(self) -> Grid<bool> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.into_iter().map(|c| c.into_inner()).collect(),
        }
    }
}
