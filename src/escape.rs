//! The escape-time evaluator: how long does an orbit take to leave?
//!
//! The escape radius is tied to the iteration budget: an orbit has
//! escaped once `|z|² > max_iterations²`.  That is not the textbook
//! radius of 2, and it bends the boundary a little at low budgets,
//! but rendered output depends on it, so it stays.  A step that
//! overflows to infinity counts as escaped like any other.

use num::Complex;
use planes::{Pixel, PlaneMapper};
use polynomial::Polynomial;

/// Iterate `z ← f(z, c)` from `z0`.  Returns the zero-based index of
/// the step at which the orbit escaped, or 0 if it never did.  In
/// smooth mode the index is replaced by a continuous value close to
/// `i`, which removes colour banding.  The escape radius grows with
/// `max_iterations`, so the value stays within `(i, i + 2)` for small
/// budgets but can dip below `i` for large ones.
pub fn escape_time<P: Polynomial + ?Sized>(
    poly: &P,
    z0: Complex<f64>,
    c: Complex<f64>,
    max_iterations: usize,
    smooth: bool,
) -> f64 {
    let cap = (max_iterations as f64) * (max_iterations as f64);
    let mut z = z0;
    for i in 0..max_iterations {
        z = poly.step(z, c);
        let norm = z.norm_sqr();
        if norm > cap {
            if smooth {
                return i as f64 - ((norm + 1.0).log2() + 1.0).log2() + 4.0;
            }
            return i as f64;
        }
    }
    0.0
}

/// Which parameter of the iteration a pixel supplies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mode {
    /// The pixel is `c`; every orbit starts at the origin.
    Mandelbrot,
    /// The pixel is `z0`; `c` is fixed.
    Julia(Complex<f64>),
}

/// Everything needed to turn a pixel into an iteration value.  Shared
/// read-only between all workers for the whole render.
pub struct Evaluator<'a, P: Polynomial + ?Sized + 'a> {
    poly: &'a P,
    mapper: PlaneMapper,
    mode: Mode,
    max_iterations: usize,
    smooth: bool,
    // Half a pixel along each axis, on the complex plane.  Set only
    // when supersampling.
    subsample: Option<(f64, f64)>,
}

impl<'a, P: Polynomial + ?Sized + 'a> Evaluator<'a, P> {
    /// Constructor.  `subsample` carries the half-pixel offsets when
    /// each pixel should be the average of four taps.
    pub fn new(
        poly: &'a P,
        mapper: PlaneMapper,
        mode: Mode,
        max_iterations: usize,
        smooth: bool,
        subsample: Option<(f64, f64)>,
    ) -> Self {
        Evaluator {
            poly,
            mapper,
            mode,
            max_iterations,
            smooth,
            subsample,
        }
    }

    /// The pixel-to-plane mapping in use.
    pub fn mapper(&self) -> &PlaneMapper {
        &self.mapper
    }

    fn at(&self, point: Complex<f64>) -> f64 {
        match self.mode {
            Mode::Mandelbrot => escape_time(
                self.poly,
                Complex::new(0.0, 0.0),
                point,
                self.max_iterations,
                self.smooth,
            ),
            Mode::Julia(c) => escape_time(self.poly, point, c, self.max_iterations, self.smooth),
        }
    }

    /// The value of a point on the complex plane.  With supersampling
    /// this is the mean of four taps half a pixel left, right, below
    /// and above the point.
    pub fn evaluate_point(&self, point: Complex<f64>) -> f64 {
        match self.subsample {
            None => self.at(point),
            Some((wx, wy)) => {
                let left = self.at(point + Complex::new(-wx, 0.0));
                let right = self.at(point + Complex::new(wx, 0.0));
                let below = self.at(point + Complex::new(0.0, -wy));
                let above = self.at(point + Complex::new(0.0, wy));
                ((left + right) + (below + above)) / 4.0
            }
        }
    }

    /// The value of a pixel.
    pub fn evaluate(&self, pixel: Pixel) -> f64 {
        self.evaluate_point(self.mapper.pixel_to_complex(pixel))
    }
}
