//! The geometry the subdivision engine works in: rectangles of pixels,
//! the four lines bordering them, and the rule for cutting one into
//! quarters.

use itertools::iproduct;
use planes::Pixel;

/// A rectangle of pixels.  All four bounds are inclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rectangle {
    /// Leftmost column
    pub xmin: usize,
    /// Rightmost column
    pub xmax: usize,
    /// Top row
    pub ymin: usize,
    /// Bottom row
    pub ymax: usize,
}

/// What became of a rectangle once its border was examined.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Split {
    /// Nothing left to do: the rectangle was filled, or it is too thin
    /// to have an interior.
    Resolved,
    /// The border was mixed; these four quarters still need work.
    Quarters([Rectangle; 4]),
}

impl Rectangle {
    /// Constructor, bounds inclusive.
    pub fn new(xmin: usize, xmax: usize, ymin: usize, ymax: usize) -> Rectangle {
        debug_assert!(xmin <= xmax && ymin <= ymax);
        Rectangle {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// The top-left corner.  Every border value is compared against
    /// this one.
    pub fn corner(&self) -> Pixel {
        Pixel(self.xmin, self.ymin)
    }

    /// The distance between the nearer pair of opposite edges.  A
    /// rectangle two pixels wide has a shortest edge of 1.
    pub fn shortest_edge(&self) -> usize {
        let w = self.xmax - self.xmin;
        let h = self.ymax - self.ymin;
        if w < h {
            w
        } else {
            h
        }
    }

    /// Top, left, right, bottom, in that order.
    pub fn sides(&self) -> [Line; 4] {
        [
            Line::new(Pixel(self.xmin, self.ymin), Pixel(self.xmax, self.ymin)),
            Line::new(Pixel(self.xmin, self.ymin), Pixel(self.xmin, self.ymax)),
            Line::new(Pixel(self.xmax, self.ymin), Pixel(self.xmax, self.ymax)),
            Line::new(Pixel(self.xmin, self.ymax), Pixel(self.xmax, self.ymax)),
        ]
    }

    /// Cut at the (floored) midpoint of each axis.  Neighbouring
    /// quarters share the midline, so every pixel of the parent
    /// belongs to at least one child, and only midline pixels belong
    /// to more than one.
    pub fn quarters(&self) -> [Rectangle; 4] {
        let mx = (self.xmin + self.xmax) / 2;
        let my = (self.ymin + self.ymax) / 2;
        [
            Rectangle::new(self.xmin, mx, self.ymin, my),
            Rectangle::new(mx, self.xmax, self.ymin, my),
            Rectangle::new(self.xmin, mx, my, self.ymax),
            Rectangle::new(mx, self.xmax, my, self.ymax),
        ]
    }

    /// True if the pixel lies inside or on the border.
    pub fn contains(&self, pixel: Pixel) -> bool {
        pixel.0 >= self.xmin && pixel.0 <= self.xmax && pixel.1 >= self.ymin && pixel.1 <= self.ymax
    }

    /// Every pixel of the rectangle, column by column.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        iproduct!(self.xmin..=self.xmax, self.ymin..=self.ymax).map(|(x, y)| Pixel(x, y))
    }
}

/// The four quadrants of a whole raster, used to start the engine off
/// with four pieces of work rather than one.
pub fn seed_quadrants(width: usize, height: usize) -> [Rectangle; 4] {
    let (hx, hy) = (width / 2, height / 2);
    let (xmax, ymax) = (width - 1, height - 1);
    [
        Rectangle::new(0, hx, 0, hy),
        Rectangle::new(hx, xmax, 0, hy),
        Rectangle::new(0, hx, hy, ymax),
        Rectangle::new(hx, xmax, hy, ymax),
    ]
}

/// A straight run of pixels from `start` to `end`, both included.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// First pixel
    pub start: Pixel,
    /// Last pixel
    pub end: Pixel,
}

impl Line {
    /// Constructor
    pub fn new(start: Pixel, end: Pixel) -> Line {
        Line { start, end }
    }

    /// Walk the line in unit steps along its dominant axis.  The
    /// borders we walk are all horizontal or vertical, so the minor
    /// axis never moves; a line whose ends coincide yields one pixel.
    pub fn pixels(&self) -> LinePixels {
        let dx = self.end.0 as isize - self.start.0 as isize;
        let dy = self.end.1 as isize - self.start.1 as isize;
        let length = if dx.abs() > dy.abs() { dx.abs() } else { dy.abs() };
        LinePixels {
            x: self.start.0 as isize,
            y: self.start.1 as isize,
            step: (dx.signum(), dy.signum()),
            remaining: length as usize + 1,
        }
    }
}

/// Iterator over the pixels of a `Line`.
#[derive(Debug)]
pub struct LinePixels {
    x: isize,
    y: isize,
    step: (isize, isize),
    remaining: usize,
}

impl Iterator for LinePixels {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        if self.remaining == 0 {
            return None;
        }
        let pixel = Pixel(self.x as usize, self.y as usize);
        self.remaining -= 1;
        self.x += self.step.0;
        self.y += self.step.1;
        Some(pixel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
