//! Everything that can stop a render before it produces a grid.  The
//! engine itself cannot fail once it has started: the evaluator is a
//! pure function and the grid is allocated up front.  What remains is
//! bad configuration, and a worker thread dying underneath us.

/// The failure modes of configuring or running a render.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The raster has no pixels along at least one axis.
    #[fail(display = "raster dimensions must be non-zero, got {}x{}", width, height)]
    EmptyRaster {
        /// Requested width in pixels
        width: usize,
        /// Requested height in pixels
        height: usize,
    },

    /// An iteration budget of zero would leave every pixel unescaped.
    #[fail(display = "the iteration budget must be at least 1")]
    NoIterations,

    /// The polynomial name is not in the registry.
    #[fail(display = "unknown polynomial '{}'", _0)]
    UnknownPolynomial(String),

    /// Zoom has to be a positive, finite number.
    #[fail(display = "zoom must be positive and finite, got {}", _0)]
    BadZoom(f64),

    /// The worker pool was asked to run with nobody in it.
    #[fail(display = "at least one worker thread is required")]
    NoThreads,

    /// A render worker panicked before its level was complete.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

/// Shorthand used throughout the crate.
pub type Result<T> = ::std::result::Result<T, RenderError>;
