extern crate clap;
extern crate env_logger;
extern crate image;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate subdivbrot;

use clap::{App, Arg, ArgMatches};
use image::ColorType;
use num::Complex;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use subdivbrot::planes::complex_circle;
use subdivbrot::transform::{scale_grid, to_gray8};
use subdivbrot::{configure, Grid, PolynomialKind, Settings};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const ITERATIONS: &str = "iterations";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const JULIA: &str = "julia";
const POLYNOMIAL: &str = "polynomial";
const SUBSAMPLE: &str = "subsample";
const SMOOTH: &str = "smooth";
const GRID: &str = "grid";
const NO_SINE: &str = "no-sine";
const MULTIPLIER: &str = "multiplier";
const THREADS: &str = "threads";
const FRAMES: &str = "frames";
const RADIUS: &str = "radius";

fn args<'a>(polynomials: &'a [&'a str]) -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("subdivbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time fractal renderer using rectangle subdivision")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the format follows the extension"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("512")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        10_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 10000000",
                    )
                })
                .help("Maximum iterations per point"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        ::std::f64::MIN_POSITIVE,
                        ::std::f64::MAX,
                        "Could not parse zoom",
                        "Zoom must be positive",
                    )
                })
                .help("Magnification; at 1 the short side spans -2 to 2"),
        )
        .arg(
            Arg::with_name(JULIA)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse julia constant"))
                .help("Render the Julia set for this constant instead of the Mandelbrot"),
        )
        .arg(
            Arg::with_name(POLYNOMIAL)
                .long(POLYNOMIAL)
                .short("p")
                .takes_value(true)
                .default_value("standard")
                .possible_values(polynomials)
                .help("Polynomial family to iterate"),
        )
        .arg(
            Arg::with_name(SUBSAMPLE)
                .long(SUBSAMPLE)
                .help("Average four samples per pixel"),
        )
        .arg(
            Arg::with_name(SMOOTH)
                .long(SMOOTH)
                .help("Use continuous escape values"),
        )
        .arg(
            Arg::with_name(GRID)
                .long(GRID)
                .help("Draw the subdivision grid over the image"),
        )
        .arg(
            Arg::with_name(NO_SINE)
                .long(NO_SINE)
                .help("Skip the log and sine colour transforms"),
        )
        .arg(
            Arg::with_name(MULTIPLIER)
                .long(MULTIPLIER)
                .short("m")
                .takes_value(true)
                .default_value("1")
                .validator(|s| match f64::from_str(&s) {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Could not parse colour multiplier".to_string()),
                })
                .help("Frequency multiplier for the sine transform"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver; defaults to one per CPU"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .takes_value(true)
                .requires(JULIA)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 100000",
                    )
                })
                .help("Write an animation walking the julia constant round a circle"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .long(RADIUS)
                .takes_value(true)
                .default_value("0.1")
                .validator(|s| match f64::from_str(&s) {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Could not parse radius".to_string()),
                })
                .help("Radius of the circle walked by --frames"),
        )
        .get_matches()
}

// All values have passed their validators by the time we get here.
fn settings_from(matches: &ArgMatches) -> Settings {
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap_or(""), 'x')
        .unwrap_or((800, 600));
    let julia = matches.value_of(JULIA).and_then(parse_complex);
    let mut settings = Settings {
        width,
        height,
        max_iterations: matches
            .value_of(ITERATIONS)
            .and_then(|s| usize::from_str(s).ok())
            .unwrap_or(512),
        is_julia: julia.is_some(),
        c: julia.unwrap_or_else(|| Complex::new(0.0, 0.0)),
        center: matches
            .value_of(CENTER)
            .and_then(parse_complex)
            .unwrap_or_else(|| Complex::new(0.0, 0.0)),
        zoom: matches
            .value_of(ZOOM)
            .and_then(|s| f64::from_str(s).ok())
            .unwrap_or(1.0),
        polynomial: matches.value_of(POLYNOMIAL).unwrap_or("standard").to_string(),
        subsample: matches.is_present(SUBSAMPLE),
        smooth: matches.is_present(SMOOTH),
        do_grid: matches.is_present(GRID),
        do_sine_transform: !matches.is_present(NO_SINE),
        color_multiplier: matches
            .value_of(MULTIPLIER)
            .and_then(|s| f64::from_str(s).ok())
            .unwrap_or(1.0),
        ..Settings::default()
    };
    if let Some(threads) = matches.value_of(THREADS).and_then(|s| usize::from_str(s).ok()) {
        settings.threads = threads;
    }
    settings
}

fn write_image(outfile: &Path, grid: Grid<f64>) -> Result<(), String> {
    let mut grid = grid;
    scale_grid(&mut grid);
    let pixels = to_gray8(&grid);
    image::save_buffer(
        outfile,
        &pixels,
        grid.width() as u32,
        grid.height() as u32,
        ColorType::Gray(8),
    )
    .map_err(|e| format!("could not write {}: {}", outfile.display(), e))
}

// foo.png becomes foo-0007.png
fn frame_path(outfile: &Path, frame: usize) -> PathBuf {
    let stem = outfile
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match outfile.extension() {
        Some(ext) => format!("{}-{:04}.{}", stem, frame, ext.to_string_lossy()),
        None => format!("{}-{:04}", stem, frame),
    };
    outfile.with_file_name(name)
}

fn render_one(settings: Settings, outfile: &Path) -> Result<(), String> {
    let renderer = configure(settings).map_err(|e| e.to_string())?;
    let grid = renderer.render().map_err(|e| e.to_string())?;
    write_image(outfile, grid)?;
    info!("wrote {}", outfile.display());
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let settings = settings_from(matches);
    let outfile = Path::new(matches.value_of(OUTPUT).unwrap_or("fractal.png"));

    match matches.value_of(FRAMES).and_then(|s| usize::from_str(s).ok()) {
        None => render_one(settings, outfile),
        Some(frames) => {
            let radius = matches
                .value_of(RADIUS)
                .and_then(|s| f64::from_str(s).ok())
                .unwrap_or(0.1);
            let origin = settings.c;
            for frame in 0..frames {
                let t = frame as f64 / frames as f64;
                let frame_settings = Settings {
                    c: complex_circle(origin, radius, t),
                    ..settings.clone()
                };
                render_one(frame_settings, &frame_path(outfile, frame))?;
            }
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let polynomials = PolynomialKind::names();
    let matches = args(&polynomials);

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        process::exit(1);
    }
}
