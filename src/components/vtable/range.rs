//! Visible Range
//!
//! The half-open index interval currently materialized by a render window.

use std::fmt;
use std::ops::Range;

/// Half-open interval `[start, end)` of materialized row indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub const EMPTY: VisibleRange = VisibleRange { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end,
        }
    }

    /// Rows visible for a scroll offset and viewport over `length` rows
    ///
    /// `start = floor(scroll_top / row_height)`,
    /// `end = min(length, ceil((scroll_top + viewport_height) / row_height))`.
    /// Always satisfies `start <= end <= length`.
    pub fn compute(scroll_top: f64, viewport_height: f64, row_height: f64, length: usize) -> Self {
        if !(row_height.is_finite() && row_height > 0.0) {
            return Self::EMPTY;
        }
        let scroll_top = if scroll_top.is_finite() { scroll_top.max(0.0) } else { 0.0 };
        let viewport_height = if viewport_height.is_finite() {
            viewport_height.max(0.0)
        } else {
            0.0
        };

        // float-to-int casts saturate
        let start = (scroll_top / row_height).floor() as usize;
        let end = (((scroll_top + viewport_height) / row_height).ceil() as usize).min(length);
        Self::new(start, end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for VisibleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_basic() {
        assert_eq!(VisibleRange::compute(0.0, 100.0, 20.0, 1000), VisibleRange::new(0, 5));
        assert_eq!(VisibleRange::compute(30.0, 100.0, 20.0, 1000), VisibleRange::new(1, 7));
        assert_eq!(VisibleRange::compute(0.0, 100.0, 20.0, 3), VisibleRange::new(0, 3));
        assert_eq!(VisibleRange::compute(0.0, 100.0, 20.0, 0), VisibleRange::EMPTY);
    }

    #[test]
    fn test_compute_past_the_end() {
        let range = VisibleRange::compute(10_000.0, 100.0, 20.0, 10);
        assert_eq!(range, VisibleRange::new(10, 10));
        assert!(range.is_empty());
    }

    #[test]
    fn test_compute_degenerate_inputs() {
        assert_eq!(VisibleRange::compute(0.0, 100.0, 0.0, 10), VisibleRange::EMPTY);
        assert_eq!(VisibleRange::compute(f64::NAN, 40.0, 20.0, 10), VisibleRange::new(0, 2));
        assert_eq!(VisibleRange::compute(-50.0, 40.0, 20.0, 10), VisibleRange::new(0, 2));
    }

    #[test]
    fn test_compute_bounds_hold_across_inputs() {
        let row_heights = [1.0, 7.5, 20.0, 33.0];
        let viewports = [0.0, 1.0, 99.0, 600.0, 1234.5];
        let lengths = [0usize, 1, 17, 1_000, 2_000_000];
        for &row_height in &row_heights {
            for &viewport in &viewports {
                for &length in &lengths {
                    for step in 0..40 {
                        let scroll_top = step as f64 * 97.3;
                        let range = VisibleRange::compute(scroll_top, viewport, row_height, length);
                        assert!(range.start <= range.end);
                        assert!(range.end <= length);
                        let max_rows = (viewport / row_height).ceil() as usize + 1;
                        assert!(
                            range.len() <= max_rows,
                            "{range} exceeds {max_rows} rows (scroll {scroll_top}, viewport {viewport}, row {row_height})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(VisibleRange::new(3, 9).to_string(), "3-9");
    }
}
