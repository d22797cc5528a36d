//! The rectangle subdivision engine.
//!
//! Pixels with the same iteration count tend to clump into large
//! regions with smooth edges.  So instead of evaluating every pixel we
//! evaluate only the border of a rectangle.  If every border pixel has
//! the same value, the rectangle is filled with that value without
//! evaluating its interior.  Otherwise it is cut into quarters and each
//! quarter gets the same treatment, until the pieces are too thin to
//! have an interior at all.
//!
//! There are two ways to drive it.  `Driver::Stack` works through a
//! single stack of pending rectangles on the calling thread.
//! `Driver::Frontier` processes a whole level of rectangles at a time
//! across a pool of scoped threads, collecting the quarters into the
//! next level, and only moves on once every worker is done.  Both
//! produce the same grid.
//!
//! Neighbouring rectangles share a border line, so in the frontier
//! driver two workers can evaluate and store the same pixel at the same
//! time.  That race is benign: the evaluator is a pure function of the
//! pixel, so both writes carry identical bits, and a worker that reads
//! a stale `UNSET` just evaluates the pixel itself.  Interiors never
//! overlap, so a fill can't disturb anything another rectangle reads.
//! Keep it that way: if the evaluator ever stops being pure, this
//! engine stops being deterministic.

use crossbeam;
use crossbeam::thread::ScopedJoinHandle;
use errors::{RenderError, Result};
use escape::Evaluator;
use grid::{Grid, SharedMask, SharedValues, UNSET};
use planes::Pixel;
use polynomial::Polynomial;
use rectangle::{seed_quadrants, Rectangle, Split};
use std::sync::Mutex;

/// How the engine schedules its work.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Driver {
    /// One thread, one stack of pending rectangles.
    Stack,
    /// Level-synchronous batches spread over this many threads.
    Frontier(usize),
}

impl Driver {
    /// The stack driver for one thread, the frontier driver for more.
    pub fn for_threads(threads: usize) -> Result<Driver> {
        match threads {
            0 => Err(RenderError::NoThreads),
            1 => Ok(Driver::Stack),
            n => Ok(Driver::Frontier(n)),
        }
    }
}

/// Bookkeeping on how much work the shortcut saved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubdivisionStats {
    /// Rectangles whose border was examined
    pub rectangles: usize,
    /// Rectangles cut into quarters
    pub splits: usize,
    /// Rectangles filled without evaluating their interior
    pub fills: usize,
    /// Calls into the evaluator.  The frontier driver may count a
    /// shared border pixel more than once.
    pub evaluations: usize,
    /// Depth of the deepest rectangle, counting the seeds as level 1
    pub levels: usize,
}

impl SubdivisionStats {
    fn absorb(&mut self, other: &SubdivisionStats) {
        self.rectangles += other.rectangles;
        self.splits += other.splits;
        self.fills += other.fills;
        self.evaluations += other.evaluations;
    }
}

/// The raw result of a subdivision pass.
#[derive(Debug)]
pub struct Subdivision {
    /// Iteration values, every cell resolved
    pub values: Grid<f64>,
    /// Left column and top row of every filled rectangle.  `None`
    /// unless anchors were asked for.
    pub mask: Option<Grid<bool>>,
    /// What the pass did
    pub stats: SubdivisionStats,
}

struct Engine<'a, 'e: 'a, P: Polynomial + ?Sized + 'e> {
    evaluator: &'a Evaluator<'e, P>,
    values: &'a SharedValues,
    mask: Option<&'a SharedMask>,
}

impl<'a, 'e: 'a, P: Polynomial + ?Sized + 'e> Engine<'a, 'e, P> {
    // Return the cell's value, evaluating and storing it first if no
    // one has yet.
    #[inline]
    fn sample(&self, pixel: Pixel, stats: &mut SubdivisionStats) -> f64 {
        let known = self.values.load(pixel);
        if known != UNSET {
            return known;
        }
        let value = self.evaluator.evaluate(pixel);
        self.values.store(pixel, value);
        stats.evaluations += 1;
        value
    }

    fn process_rectangle(&self, r: Rectangle, stats: &mut SubdivisionStats) -> Split {
        stats.rectangles += 1;
        let corner = self.sample(r.corner(), stats);

        // Walk every side in full, even once the border is known to be
        // mixed.  The quarters will need those pixels anyway.
        let mut uniform = true;
        for side in r.sides().iter() {
            for pixel in side.pixels() {
                if self.sample(pixel, stats) != corner {
                    uniform = false;
                }
            }
        }

        if !uniform && r.shortest_edge() > 1 {
            stats.splits += 1;
            return Split::Quarters(r.quarters());
        }

        // A mixed border that can't be split belongs to a rectangle at
        // most two pixels thick, which is all border and already done.
        if uniform {
            stats.fills += 1;
            for pixel in r.pixels() {
                self.values.store(pixel, corner);
            }
            if let Some(mask) = self.mask {
                for y in r.ymin..r.ymax {
                    mask.mark(Pixel(r.xmin, y));
                }
                for x in r.xmin..r.xmax {
                    mask.mark(Pixel(x, r.ymin));
                }
            }
        }
        Split::Resolved
    }

    fn run_stack(&self) -> SubdivisionStats {
        let mut stats = SubdivisionStats::default();
        let seeds = seed_quadrants(self.values.width(), self.values.height());
        let mut stack: Vec<(Rectangle, usize)> = seeds.iter().map(|r| (*r, 1)).collect();

        while let Some((rectangle, level)) = stack.pop() {
            if level > stats.levels {
                stats.levels = level;
            }
            if let Split::Quarters(quarters) = self.process_rectangle(rectangle, &mut stats) {
                stack.extend(quarters.iter().map(|q| (*q, level + 1)));
            }
        }
        stats
    }

    // Process one level on `threads` workers, each returning the
    // quarters it produced along with its own counts.
    fn run_level(
        &self,
        frontier: &[Rectangle],
        threads: usize,
    ) -> Result<Vec<(Vec<Rectangle>, SubdivisionStats)>> {
        let queue = Mutex::new(frontier.iter());
        crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<(Vec<Rectangle>, SubdivisionStats)>> = (0..threads)
                .map(|_| {
                    let queue = &queue;
                    spawner.spawn(move |_| {
                        let mut next: Vec<Rectangle> = vec![];
                        let mut stats = SubdivisionStats::default();
                        loop {
                            // A poisoned queue means a sibling panicked;
                            // stop here and let the join report it.
                            let rectangle = match queue.lock() {
                                Ok(mut q) => q.next().cloned(),
                                Err(_) => None,
                            };
                            match rectangle {
                                Some(rectangle) => {
                                    if let Split::Quarters(quarters) =
                                        self.process_rectangle(rectangle, &mut stats)
                                    {
                                        next.extend_from_slice(&quarters);
                                    }
                                }
                                None => {
                                    break;
                                }
                            }
                        }
                        (next, stats)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<::std::thread::Result<Vec<_>>>()
        })
        .map_err(|_| RenderError::WorkerPanicked)?
        .map_err(|_| RenderError::WorkerPanicked)
    }

    fn run_frontier(&self, threads: usize) -> Result<SubdivisionStats> {
        let mut stats = SubdivisionStats::default();
        let mut frontier: Vec<Rectangle> =
            seed_quadrants(self.values.width(), self.values.height()).to_vec();

        while !frontier.is_empty() {
            stats.levels += 1;
            debug!("subdivision level {}: {} rectangles", stats.levels, frontier.len());
            let mut next = Vec::with_capacity(frontier.len() * 4);
            for (quarters, worker) in self.run_level(&frontier, threads)? {
                next.extend(quarters);
                stats.absorb(&worker);
            }
            frontier = next;
        }
        Ok(stats)
    }
}

/// Resolve every pixel of the evaluator's raster.  With
/// `record_anchors` set, the returned mask flags the left column and
/// top row of every rectangle that was filled rather than evaluated.
pub fn subdivide<P: Polynomial + ?Sized>(
    evaluator: &Evaluator<P>,
    driver: Driver,
    record_anchors: bool,
) -> Result<Subdivision> {
    let (width, height) = (evaluator.mapper().width(), evaluator.mapper().height());
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyRaster { width, height });
    }

    let values = SharedValues::new(width, height);
    let mask = if record_anchors {
        Some(SharedMask::new(width, height))
    } else {
        None
    };
    let stats = {
        let engine = Engine {
            evaluator,
            values: &values,
            mask: mask.as_ref(),
        };
        match driver {
            Driver::Stack => engine.run_stack(),
            Driver::Frontier(0) => return Err(RenderError::NoThreads),
            Driver::Frontier(threads) => engine.run_frontier(threads)?,
        }
    };

    Ok(Subdivision {
        values: values.into_grid(),
        mask: mask.map(SharedMask::into_grid),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::Mode;
    use num::Complex;
    use planes::{compute_bounds, PlaneMapper};
    use polynomial::PolynomialKind;

    const STD: PolynomialKind = PolynomialKind::Standard;

    fn evaluator(width: usize, height: usize, zoom: f64) -> Evaluator<'static, PolynomialKind> {
        let bounds = compute_bounds(width, height, Complex::new(-0.5, 0.0), zoom);
        Evaluator::new(
            &STD,
            PlaneMapper::new(width, height, bounds),
            Mode::Mandelbrot,
            64,
            false,
            None,
        )
    }

    #[test]
    fn every_pixel_is_resolved() {
        for &(w, h) in &[(1, 1), (1, 7), (2, 2), (3, 5), (17, 11), (64, 48)] {
            let ev = evaluator(w, h, 1.0);
            for &driver in &[Driver::Stack, Driver::Frontier(3)] {
                let result = subdivide(&ev, driver, false).unwrap();
                assert!(result.values.iter().all(|v| *v != UNSET), "{}x{} {:?}", w, h, driver);
            }
        }
    }

    #[test]
    fn drivers_agree_bit_for_bit() {
        let ev = evaluator(97, 61, 1.3);
        let reference = subdivide(&ev, Driver::Stack, true).unwrap();
        for &threads in &[1, 2, 4, 7] {
            let other = subdivide(&ev, Driver::Frontier(threads), true).unwrap();
            let a: Vec<u64> = reference.values.iter().map(|v| v.to_bits()).collect();
            let b: Vec<u64> = other.values.iter().map(|v| v.to_bits()).collect();
            assert_eq!(a, b);
            assert_eq!(reference.mask, other.mask);
            assert_eq!(reference.stats.rectangles, other.stats.rectangles);
            assert_eq!(reference.stats.splits, other.stats.splits);
            assert_eq!(reference.stats.fills, other.stats.fills);
            assert_eq!(reference.stats.levels, other.stats.levels);
        }
    }

    #[test]
    fn the_shortcut_skips_work() {
        let ev = evaluator(128, 128, 1.0);
        let result = subdivide(&ev, Driver::Stack, false).unwrap();
        assert!(result.stats.fills > 0);
        assert!(result.stats.evaluations < 128 * 128);
        assert!(result.stats.levels <= 8);
    }

    #[test]
    fn anchors_only_when_asked() {
        let ev = evaluator(64, 64, 1.0);
        let quiet = subdivide(&ev, Driver::Stack, false).unwrap();
        assert!(quiet.mask.is_none());
        let marked = subdivide(&ev, Driver::Stack, true).unwrap();
        assert!(marked.mask.unwrap().iter().any(|m| *m));
        assert_eq!(quiet.values, marked.values);
    }

    #[test]
    fn zero_threads_is_refused() {
        assert_eq!(Driver::for_threads(0), Err(RenderError::NoThreads));
        assert_eq!(Driver::for_threads(1), Ok(Driver::Stack));
        assert_eq!(Driver::for_threads(6), Ok(Driver::Frontier(6)));
        let ev = evaluator(8, 8, 1.0);
        assert_eq!(
            subdivide(&ev, Driver::Frontier(0), false).unwrap_err(),
            RenderError::NoThreads
        );
    }
}
