//! The public face of the crate: configure once, render once.

use config::Settings;
use errors::Result;
use escape::{Evaluator, Mode};
use grid::Grid;
use planes::{compute_bounds, Bounds, PlaneMapper};
use polynomial::{Polynomial, PolynomialKind};
use subdivide::{subdivide, Driver, Subdivision};
use transform::{log_transform, overlay_grid, sanity_check, sine_transform};

/// A validated, immutable render job.  Produced by `configure`.
#[derive(Debug, Clone)]
pub struct Renderer {
    settings: Settings,
    polynomial: PolynomialKind,
    bounds: Bounds,
    driver: Driver,
}

/// Check `settings` and freeze them into a `Renderer`.  Nothing is
/// allocated until `render` is called, so a bad configuration costs
/// nothing.
pub fn configure(settings: Settings) -> Result<Renderer> {
    let polynomial = settings.validate()?;
    let driver = Driver::for_threads(settings.threads)?;
    let bounds = compute_bounds(settings.width, settings.height, settings.center, settings.zoom);
    Ok(Renderer {
        settings,
        polynomial,
        bounds,
        driver,
    })
}

impl Renderer {
    /// The settings this renderer was configured with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The region of the complex plane being rendered.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Render against an explicit region of the complex plane rather
    /// than one derived from center and zoom.
    pub fn with_bounds(mut self, bounds: Bounds) -> Renderer {
        self.bounds = bounds;
        self
    }

    fn evaluator<'a, P: Polynomial + ?Sized>(&self, poly: &'a P) -> Evaluator<'a, P> {
        let s = &self.settings;
        let mode = if s.is_julia {
            Mode::Julia(s.c)
        } else {
            Mode::Mandelbrot
        };
        let mapper = PlaneMapper::new(s.width, s.height, self.bounds);
        let subsample = if s.subsample {
            Some(mapper.half_pixel())
        } else {
            None
        };
        Evaluator::new(
            poly,
            mapper,
            mode,
            s.max_iterations,
            s.smooth,
            subsample,
        )
    }

    /// Run the subdivision engine alone with the configured polynomial,
    /// skipping post-processing.
    pub fn subdivide(&self) -> Result<Subdivision> {
        self.subdivide_with(&self.polynomial)
    }

    /// Run the subdivision engine alone with a caller-supplied step
    /// function in place of the configured family.
    pub fn subdivide_with<P: Polynomial + ?Sized>(&self, poly: &P) -> Result<Subdivision> {
        let s = &self.settings;
        info!(
            "rendering {}x{} {} ({}), {} iterations, {:?}",
            s.width,
            s.height,
            if s.is_julia { "julia" } else { "mandelbrot" },
            self.polynomial,
            s.max_iterations,
            self.driver
        );
        let result = subdivide(&self.evaluator(poly), self.driver, s.do_grid)?;
        let stats = &result.stats;
        info!(
            "subdivision done: {} levels, {} rectangles, {} split, {} filled, {} of {} pixels evaluated",
            stats.levels,
            stats.rectangles,
            stats.splits,
            stats.fills,
            stats.evaluations,
            s.width * s.height
        );
        Ok(result)
    }

    /// Produce the finished, post-processed grid.
    pub fn render(&self) -> Result<Grid<f64>> {
        let Subdivision { values, mask, .. } = self.subdivide()?;
        Ok(self.post_process(values, mask.as_ref()))
    }

    /// Apply the post-processing passes, in order, to a resolved grid.
    /// The overlay is drawn only if grid drawing is on and a mask is
    /// supplied.
    pub fn post_process(&self, mut values: Grid<f64>, mask: Option<&Grid<bool>>) -> Grid<f64> {
        let s = &self.settings;
        if s.do_sine_transform {
            log_transform(&mut values, 1.0);
            sine_transform(&mut values, s.color_multiplier, 0.0, true);
        }
        if s.do_grid {
            if let Some(mask) = mask {
                overlay_grid(&mut values, mask);
            }
        }
        sanity_check(&values);
        values
    }
}
