//! The knobs and dials of a render, gathered in one plain struct.
//! Build one (starting from `Settings::default()` is easiest), hand it
//! to `configure`, and it is checked and frozen from then on.

use errors::{RenderError, Result};
use num::Complex;
use num_cpus;
use polynomial::PolynomialKind;

/// Everything a render needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Raster width in pixels
    pub width: usize,
    /// Raster height in pixels
    pub height: usize,
    /// Iteration budget per point; also sets the escape radius
    pub max_iterations: usize,
    /// Julia mode if true, Mandelbrot otherwise
    pub is_julia: bool,
    /// The fixed constant used in Julia mode
    pub c: Complex<f64>,
    /// Center of the view on the complex plane
    pub center: Complex<f64>,
    /// Magnification; at 1 the shorter side of the raster spans [-2, 2]
    pub zoom: f64,
    /// Registry name of the polynomial family
    pub polynomial: String,
    /// Average four taps per pixel
    pub subsample: bool,
    /// Continuous rather than integer escape values
    pub smooth: bool,
    /// Overlay the subdivision anchors on the output
    pub do_grid: bool,
    /// Run the log and sine transforms over the finished grid
    pub do_sine_transform: bool,
    /// Frequency multiplier for the sine transform
    pub color_multiplier: f64,
    /// Worker threads; 1 runs everything on the calling thread
    pub threads: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: 800,
            height: 600,
            max_iterations: 512,
            is_julia: false,
            c: Complex::new(0.0, 0.0),
            center: Complex::new(0.0, 0.0),
            zoom: 1.0,
            polynomial: PolynomialKind::Standard.name().to_string(),
            subsample: false,
            smooth: false,
            do_grid: false,
            do_sine_transform: true,
            color_multiplier: 1.0,
            threads: num_cpus::get(),
        }
    }
}

impl Settings {
    /// Check the settings, returning the polynomial they name.  Fails
    /// on the first problem found.
    pub fn validate(&self) -> Result<PolynomialKind> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyRaster {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_iterations == 0 {
            return Err(RenderError::NoIterations);
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(RenderError::BadZoom(self.zoom));
        }
        if self.threads == 0 {
            return Err(RenderError::NoThreads);
        }
        self.polynomial.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(PolynomialKind::Standard));
    }

    #[test]
    fn each_problem_is_reported() {
        let mut s = Settings::default();
        s.height = 0;
        assert_eq!(
            s.validate(),
            Err(RenderError::EmptyRaster {
                width: 800,
                height: 0
            })
        );

        let mut s = Settings::default();
        s.max_iterations = 0;
        assert_eq!(s.validate(), Err(RenderError::NoIterations));

        let mut s = Settings::default();
        s.zoom = -2.0;
        assert_eq!(s.validate(), Err(RenderError::BadZoom(-2.0)));

        let mut s = Settings::default();
        s.threads = 0;
        assert_eq!(s.validate(), Err(RenderError::NoThreads));

        let mut s = Settings::default();
        s.polynomial = "sextic".to_string();
        assert_eq!(
            s.validate(),
            Err(RenderError::UnknownPolynomial("sextic".to_string()))
        );
    }

    #[test]
    fn names_pick_the_family() {
        let mut s = Settings::default();
        s.polynomial = "inv-c-parabola".to_string();
        assert_eq!(s.validate(), Ok(PolynomialKind::InvCParabola));
    }
}
