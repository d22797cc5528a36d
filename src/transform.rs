//! Passes over a finished grid.  Raw iteration counts have a long tail
//! and make for a dull image; these reshape them before colouring.
//!
//! The render applies them in a fixed order: `log_transform`, then
//! `sine_transform`, then `overlay_grid`.  `scale_grid` and `to_gray8`
//! prepare the result for an image writer.

use grid::Grid;
use num::clamp;

/// Replace every value `v` with `ln(v · multiplier + 1)`.
pub fn log_transform(grid: &mut Grid<f64>, multiplier: f64) {
    for v in grid.iter_mut() {
        *v = (*v * multiplier + 1.0).ln();
    }
}

/// Replace every value `v` with `sin(v · multiplier + phase)`.  With
/// `preserve_zero`, cells that are exactly zero stay zero, so points
/// that never escaped stay flat.
pub fn sine_transform(grid: &mut Grid<f64>, multiplier: f64, phase: f64, preserve_zero: bool) {
    for v in grid.iter_mut() {
        if preserve_zero && *v == 0.0 {
            continue;
        }
        *v = (*v * multiplier + phase).sin();
    }
}

/// Paint every cell flagged in `mask` with the grid's maximum value,
/// making the subdivision visible.
pub fn overlay_grid(grid: &mut Grid<f64>, mask: &Grid<bool>) {
    debug_assert!(grid.width() == mask.width() && grid.height() == mask.height());
    let top = match grid.max_value() {
        Some(top) => top,
        None => return,
    };
    for (v, marked) in grid.iter_mut().zip(mask.iter()) {
        if *marked {
            *v = top;
        }
    }
}

/// Stretch the grid linearly onto [0, 1].  A constant grid becomes all
/// zeros.
pub fn scale_grid(grid: &mut Grid<f64>) {
    let (lo, hi) = match grid.min_max() {
        Some(range) => range,
        None => return,
    };
    let span = hi - lo;
    for v in grid.iter_mut() {
        *v = if span > 0.0 { (*v - lo) / span } else { 0.0 };
    }
}

/// Convert a grid already scaled to [0, 1] into 8-bit grayscale,
/// row-major, clamping anything out of range.
pub fn to_gray8(grid: &Grid<f64>) -> Vec<u8> {
    grid.iter()
        .map(|v| {
            let v = if v.is_nan() { 0.0 } else { *v };
            clamp((v * 255.0).round(), 0.0, 255.0) as u8
        })
        .collect()
}

/// Log anything suspicious about a finished grid: infinities or NaN,
/// nothing but zeros, or a single value everywhere.  Returns true if
/// the grid looked healthy.
pub fn sanity_check(grid: &Grid<f64>) -> bool {
    if grid.iter().any(|v| !v.is_finite()) {
        warn!("grid contains infinite or NaN values");
        return false;
    }
    match grid.min_max() {
        Some((lo, hi)) if lo == 0.0 && hi == 0.0 => {
            warn!("every value in the grid is zero");
            false
        }
        Some((lo, hi)) if lo == hi => {
            warn!("every value in the grid is {}", lo);
            false
        }
        Some((lo, hi)) => {
            debug!("grid values range from {} to {}", lo, hi);
            true
        }
        None => {
            warn!("grid is empty");
            false
        }
    }
}
