extern crate num;
extern crate subdivbrot;

use num::Complex;
use subdivbrot::escape::{escape_time, Evaluator, Mode};
use subdivbrot::planes::PlaneMapper;
use subdivbrot::{
    configure, Bounds, Grid, Pixel, Polynomial, PolynomialKind, RenderError, Renderer, Settings,
    UNSET,
};

fn plain(width: usize, height: usize, max_iterations: usize) -> Settings {
    Settings {
        width,
        height,
        max_iterations,
        smooth: false,
        subsample: false,
        do_grid: false,
        do_sine_transform: false,
        threads: 1,
        ..Settings::default()
    }
}

// Evaluate every pixel directly, no shortcuts.
fn brute_force<P: Polynomial + ?Sized>(renderer: &Renderer, poly: &P) -> Grid<f64> {
    let s = renderer.settings();
    let mode = if s.is_julia {
        Mode::Julia(s.c)
    } else {
        Mode::Mandelbrot
    };
    let mapper = PlaneMapper::new(s.width, s.height, renderer.bounds());
    let evaluator = Evaluator::new(poly, mapper, mode, s.max_iterations, s.smooth, None);
    let mut grid = Grid::new(s.width, s.height, UNSET);
    for y in 0..s.height {
        for x in 0..s.width {
            grid.set(x, y, evaluator.evaluate(Pixel(x, y)));
        }
    }
    grid
}

fn bits(grid: &Grid<f64>) -> Vec<u64> {
    grid.iter().map(|v| v.to_bits()).collect()
}

#[test]
fn four_by_four_matches_brute_force() {
    let renderer = configure(plain(4, 4, 10)).unwrap();
    assert_eq!(renderer.bounds(), Bounds::new(-2.0, 2.0, -2.0, 2.0));
    let expected = brute_force(&renderer, &PolynomialKind::Standard);
    assert_eq!(renderer.render().unwrap(), expected);

    let threaded = configure(Settings {
        threads: 4,
        ..plain(4, 4, 10)
    })
    .unwrap();
    assert_eq!(threaded.render().unwrap(), expected);
}

#[test]
fn smoothing_lands_between_steps() {
    let rough = configure(plain(4, 4, 10)).unwrap();
    let smooth = configure(Settings {
        smooth: true,
        ..plain(4, 4, 10)
    })
    .unwrap();
    let values = smooth.render().unwrap();
    let mapper = PlaneMapper::new(4, 4, rough.bounds());
    let origin = Complex::new(0.0, 0.0);

    let mut escaped = 0;
    for y in 0..4 {
        for x in 0..4 {
            let point = mapper.pixel_to_complex(Pixel(x, y));
            let step = escape_time(&PolynomialKind::Standard, origin, point, 10, false);
            let v = *values.get(x, y).unwrap();
            if step == 0.0 {
                // Nothing in this view can escape on the very first step,
                // so a zero step count means the orbit stayed bounded.
                assert_eq!(v, 0.0, "pixel {},{}", x, y);
            } else {
                escaped += 1;
                assert!(v > step && v < step + 2.0, "pixel {},{}: {} vs {}", x, y, v, step);
                assert!(v.fract() != 0.0);
            }
        }
    }
    assert!(escaped > 0);
}

#[test]
fn output_is_identical_for_any_pool_size() {
    let base = Settings {
        width: 120,
        height: 90,
        max_iterations: 200,
        center: Complex::new(-0.7, 0.1),
        zoom: 1.6,
        smooth: true,
        subsample: true,
        do_grid: true,
        do_sine_transform: true,
        color_multiplier: 0.15,
        threads: 1,
        ..Settings::default()
    };
    let reference = bits(&configure(base.clone()).unwrap().render().unwrap());
    for &threads in &[2, 3, 8] {
        let other = configure(Settings {
            threads,
            ..base.clone()
        })
        .unwrap()
        .render()
        .unwrap();
        assert_eq!(reference, bits(&other), "{} threads", threads);
    }
}

#[test]
fn every_family_resolves_every_pixel() {
    for name in PolynomialKind::names() {
        for &julia in &[false, true] {
            let settings = Settings {
                polynomial: name.to_string(),
                is_julia: julia,
                c: Complex::new(-0.4, 0.6),
                smooth: true,
                threads: 3,
                ..plain(37, 23, 64)
            };
            let result = configure(settings).unwrap().subdivide().unwrap();
            assert!(
                result.values.iter().all(|v| *v != UNSET),
                "{} julia={}",
                name,
                julia
            );
        }
    }
}

#[test]
fn grid_overlay_marks_the_fills() {
    // Everything in this view escapes on the first step except the
    // origin (never escapes) and the four points at distance 10 from
    // it, so the top-left quadrant splits and three of its quarters
    // are filled.
    let settings = Settings {
        do_grid: true,
        do_sine_transform: true,
        zoom: 0.05,
        ..plain(8, 8, 10)
    };
    let renderer = configure(settings).unwrap();

    let raw = renderer.subdivide().unwrap();
    assert!(raw.stats.splits >= 1);
    let mask = raw.mask.unwrap();
    assert!(mask.iter().any(|m| *m));

    let out = renderer.render().unwrap();
    let top = out.max_value().unwrap();
    assert!(top > 0.0);
    for (v, marked) in out.iter().zip(mask.iter()) {
        if *marked {
            assert_eq!(*v, top);
        }
    }
}

// f(z, c) = c.  An orbit either escapes on the first step or never,
// and the smoothed value outside the disk |c| ≤ max_iterations varies
// with |c|, so a uniform border can only happen inside the disk.
struct Constant;

impl Polynomial for Constant {
    fn step(&self, _z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        c
    }
}

#[test]
fn uniform_borders_fill_correctly() {
    let settings = Settings {
        smooth: true,
        do_grid: true,
        zoom: 0.1,
        ..plain(64, 64, 10)
    };
    let renderer = configure(settings).unwrap();
    let expected = brute_force(&renderer, &Constant);
    for &threads in &[1, 4] {
        let renderer = configure(Settings {
            threads,
            ..renderer.settings().clone()
        })
        .unwrap();
        let result = renderer.subdivide_with(&Constant).unwrap();
        assert!(result.stats.fills > 0);
        assert!(result.stats.evaluations < 64 * 64);
        assert_eq!(result.values, expected);
    }
}

#[test]
fn flat_julia_never_splits() {
    let settings = Settings {
        is_julia: true,
        ..plain(50, 40, 20)
    };
    let result = configure(settings).unwrap().subdivide_with(&Constant).unwrap();
    assert_eq!(result.stats.splits, 0);
    assert_eq!(result.stats.fills, 4);
    assert!(result.values.iter().all(|v| *v == 0.0));
    assert!(result.stats.evaluations < 50 * 40 / 4);
}

// Panics on the bottom-right corner of the default view.
struct Faulty;

impl Polynomial for Faulty {
    fn step(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        if c.re > 1.5 && c.im < -1.5 {
            panic!("bad point {}", c);
        }
        z * z + c
    }
}

#[test]
fn a_panicking_worker_is_reported() {
    let renderer = configure(Settings {
        threads: 4,
        ..plain(16, 16, 10)
    })
    .unwrap();
    assert_eq!(
        renderer.subdivide_with(&Faulty).unwrap_err(),
        RenderError::WorkerPanicked
    );
}

#[test]
fn bad_settings_fail_fast() {
    assert_eq!(
        configure(plain(0, 10, 10)).unwrap_err(),
        RenderError::EmptyRaster {
            width: 0,
            height: 10
        }
    );
    assert_eq!(
        configure(plain(10, 10, 0)).unwrap_err(),
        RenderError::NoIterations
    );
    assert_eq!(
        configure(Settings {
            polynomial: "quartic".to_string(),
            ..plain(10, 10, 10)
        })
        .unwrap_err(),
        RenderError::UnknownPolynomial("quartic".to_string())
    );
}
