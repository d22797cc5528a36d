//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane described by a center point
//! and a zoom factor.
//!
//! Rows on the integral plane grow downward, while the imaginary axis
//! grows upward, so row 0 maps to the top of the complex rectangle.
use num::Complex;
use std::f64::consts::PI;

/// Describes the x, y of a pixel on the integral plane.  Column
/// first, then row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub usize, pub usize);

/// The four edges of the visible region of the complex plane, in the
/// order real-min, real-max, imaginary-min, imaginary-max.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub re_min: f64,
    /// Right edge
    pub re_max: f64,
    /// Bottom edge
    pub im_min: f64,
    /// Top edge
    pub im_max: f64,
}

impl Bounds {
    /// Constructor, in the usual xmin, xmax, ymin, ymax order.
    pub fn new(re_min: f64, re_max: f64, im_min: f64, im_max: f64) -> Bounds {
        Bounds {
            re_min,
            re_max,
            im_min,
            im_max,
        }
    }
}

// Half-extents of the visible region.  At zoom 1 the shorter side of
// the raster spans [-2, 2]; the longer side is stretched so that
// pixels stay square.
fn half_extents(width: usize, height: usize, zoom: f64) -> (f64, f64) {
    let mut dx = 2.0 / zoom;
    let mut dy = 2.0 / zoom;
    if width > height {
        dx *= width as f64 / height as f64;
    } else if height > width {
        dy *= height as f64 / width as f64;
    }
    (dx, dy)
}

/// Derive the visible bounds of the complex plane for a raster of the
/// given size, centred on `center` and magnified by `zoom`.
pub fn compute_bounds(width: usize, height: usize, center: Complex<f64>, zoom: f64) -> Bounds {
    let (dx, dy) = half_extents(width, height, zoom);
    Bounds::new(center.re - dx, center.re + dx, center.im - dy, center.im + dy)
}

/// The point a fraction `t` (0 to 1) of the way counterclockwise round
/// a circle of radius `r` about `center`.  Walking a Julia constant
/// along this produces a smoothly looping animation.
pub fn complex_circle(center: Complex<f64>, r: f64, t: f64) -> Complex<f64> {
    let theta = 2.0 * PI * t;
    center + Complex::new(r * theta.cos(), r * theta.sin())
}

/// Maps pixels on the integral plane onto points of the complex plane.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    bounds: Bounds,
    // The span of the complex plane covered by one pixel, along each
    // axis.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane and the
    /// bounds of the complex region it covers.
    pub fn new(width: usize, height: usize, bounds: Bounds) -> PlaneMapper {
        PlaneMapper {
            width,
            height,
            bounds,
            grid_factors: (
                (bounds.re_max - bounds.re_min) / width as f64,
                (bounds.im_max - bounds.im_min) / height as f64,
            ),
        }
    }

    /// Width of the integral plane
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the integral plane
    pub fn height(&self) -> usize {
        self.height
    }

    /// The complex region this mapper covers.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Half the width and half the height of a single pixel, measured
    /// on the complex plane.  These are the offsets used when
    /// supersampling.
    pub fn half_pixel(&self) -> (f64, f64) {
        (self.grid_factors.0 / 2.0, self.grid_factors.1 / 2.0)
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// corresponding point on the complex plane.  Column 0 lands on
    /// `re_min`, row 0 lands on `im_max`.
    pub fn pixel_to_complex(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(
            self.bounds.re_min + (pixel.0 as f64) * self.grid_factors.0,
            self.bounds.im_max - (pixel.1 as f64) * self.grid_factors.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_raster_at_zoom_one_spans_two_each_way() {
        let b = compute_bounds(4, 4, Complex::new(0.0, 0.0), 1.0);
        assert_eq!(b, Bounds::new(-2.0, 2.0, -2.0, 2.0));
    }

    #[test]
    fn widescreen_stretches_the_real_axis() {
        let b = compute_bounds(800, 400, Complex::new(-0.5, 0.0), 2.0);
        assert_eq!(b, Bounds::new(-2.5, 1.5, -1.0, 1.0));
    }

    #[test]
    fn portrait_stretches_the_imaginary_axis() {
        let b = compute_bounds(100, 300, Complex::new(0.0, 1.0), 1.0);
        assert_eq!(b, Bounds::new(-2.0, 2.0, -5.0, 7.0));
    }

    #[test]
    fn half_pixel_follows_the_bounds() {
        let b = compute_bounds(8, 4, Complex::new(0.0, 0.0), 1.0);
        let pm = PlaneMapper::new(8, 4, b);
        assert_eq!(pm.half_pixel(), (0.5, 0.5));
    }

    #[test]
    fn pixel_to_complex_on_mixed_planes() {
        let pm = PlaneMapper::new(4, 4, Bounds::new(-2.0, 2.0, -2.0, 2.0));
        assert_eq!(pm.pixel_to_complex(Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_complex(Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_complex(Pixel(3, 1)), Complex::new(1.0, 1.0));
        assert_eq!(pm.pixel_to_complex(Pixel(1, 3)), Complex::new(-1.0, -1.0));
    }

    #[test]
    fn pixel_to_complex_on_positive_planes() {
        let pm = PlaneMapper::new(5, 5, Bounds::new(0.0, 5.0, 0.0, 5.0));
        assert_eq!(pm.pixel_to_complex(Pixel(0, 0)), Complex::new(0.0, 5.0));
        assert_eq!(pm.pixel_to_complex(Pixel(4, 4)), Complex::new(4.0, 1.0));
    }

    #[test]
    fn circle_starts_on_the_real_axis() {
        let p = complex_circle(Complex::new(1.0, 1.0), 2.0, 0.0);
        assert_eq!(p, Complex::new(3.0, 1.0));
        let q = complex_circle(Complex::new(0.0, 0.0), 1.0, 0.5);
        assert!((q.re + 1.0).abs() < 1e-12);
        assert!(q.im.abs() < 1e-12);
    }
}
