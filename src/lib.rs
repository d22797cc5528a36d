#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! Mandelbrot and Julia sets are drawn by iterating a complex
//! polynomial at every pixel and recording how quickly the orbit runs
//! off to infinity.  With a large iteration budget that gets expensive
//! fast, and most of the work is wasted: pixels with the same count
//! clump together into big regions with smooth edges.
//!
//! This crate exploits that.  It evaluates only the border of a
//! rectangle of pixels; if the border is one value all the way round,
//! the inside is filled with it.  If not, the rectangle is quartered
//! and the quarters are tried in turn.  The subdivision can run on a
//! single thread or level by level across a pool of workers, and gives
//! the same grid either way.
//!
//! ```no_run
//! use subdivbrot::{configure, Settings};
//!
//! let settings = Settings {
//!     width: 640,
//!     height: 480,
//!     max_iterations: 2000,
//!     ..Settings::default()
//! };
//! let grid = configure(settings).unwrap().render().unwrap();
//! assert_eq!(grid.width(), 640);
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

#[cfg(test)]
extern crate rand;

pub mod config;
pub mod errors;
pub mod escape;
pub mod grid;
pub mod planes;
pub mod polynomial;
pub mod rectangle;
pub mod renderer;
pub mod subdivide;
pub mod transform;

pub use config::Settings;
pub use errors::{RenderError, Result};
pub use grid::{Grid, UNSET};
pub use planes::{Bounds, Pixel};
pub use polynomial::{Polynomial, PolynomialKind};
pub use renderer::{configure, Renderer};
pub use subdivide::{Driver, Subdivision, SubdivisionStats};
