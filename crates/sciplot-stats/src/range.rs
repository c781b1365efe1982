//! Closed value intervals used for axis limits and clipping bounds

use serde::{Deserialize, Serialize};

/// Fraction by which plotting ranges are widened on each side
pub const DEFAULT_PADDING: f64 = 0.05;

/// A closed interval `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    /// Zero-width range at the origin, returned for samples with no data
    pub const EMPTY: Range = Range {
        low: 0.0,
        high: 0.0,
    };

    /// Create a range; the ends are swapped if given out of order
    pub fn new(low: f64, high: f64) -> Self {
        if low <= high {
            Self { low, high }
        } else {
            Self {
                low: high,
                high: low,
            }
        }
    }

    /// Span of finite values, `None` when there are none
    pub fn of_finite(data: &[f64]) -> Option<Self> {
        let mut finite = data.iter().copied().filter(|x| x.is_finite());
        let first = finite.next()?;
        let (low, high) = finite.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
        Some(Self { low, high })
    }

    /// Width (high - low)
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Midpoint
    pub fn center(&self) -> f64 {
        self.low / 2.0 + self.high / 2.0
    }

    /// Whether `x` lies within the closed interval
    pub fn contains(&self, x: f64) -> bool {
        x >= self.low && x <= self.high
    }

    /// Smallest range covering both
    pub fn union(&self, other: &Range) -> Range {
        Range {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }

    /// Overlap of both ranges, `None` when disjoint
    pub fn intersect(&self, other: &Range) -> Option<Range> {
        let low = self.low.max(other.low);
        let high = self.high.min(other.high);
        (low <= high).then_some(Range { low, high })
    }

    /// Widen each side by `fraction` of the width
    ///
    /// A zero-width range at `v` is widened by `fraction * |v|`, or by 0.5
    /// when `v` is zero, so the result always has positive width. Finite
    /// ends stay finite, saturating at `f64::MIN` and `f64::MAX`.
    pub fn extend(&self, fraction: f64) -> Range {
        let width = self.width();
        let pad = if width > 0.0 && width.is_finite() {
            width * fraction
        } else if width > 0.0 {
            self.high * fraction - self.low * fraction
        } else if self.low != 0.0 {
            self.low.abs() * fraction
        } else {
            0.5
        };
        let low = self.low - pad;
        let high = self.high + pad;
        Range {
            low: if self.low.is_finite() { low.max(f64::MIN) } else { low },
            high: if self.high.is_finite() { high.min(f64::MAX) } else { high },
        }
    }

    /// Evenly spaced points from low to high inclusive
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.low],
            _ => {
                let width = self.width();
                let step = width / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.high
                        } else if width.is_finite() {
                            self.low + step * i as f64
                        } else {
                            lerp(self.low, self.high, i as f64 / (n - 1) as f64)
                        }
                    })
                    .collect()
            }
        }
    }

    /// As a `[low, high]` pair
    pub fn to_array(&self) -> [f64; 2] {
        [self.low, self.high]
    }
}

/// `a + (b - a) * t`, falling back to a weighted sum when `b - a` overflows
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if diff.is_finite() {
        a + diff * t
    } else {
        a * (1.0 - t) + b * t
    }
}

impl From<(f64, f64)> for Range {
    fn from((low, high): (f64, f64)) -> Self {
        Range::new(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_ends() {
        let r = Range::new(5.0, 1.0);
        assert_eq!(r.low, 1.0);
        assert_eq!(r.high, 5.0);
    }

    #[test]
    fn test_of_finite_skips_nan() {
        let r = Range::of_finite(&[f64::NAN, 3.0, -1.0, f64::INFINITY]).unwrap();
        assert_eq!(r, Range::new(-1.0, 3.0));
        assert!(Range::of_finite(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_extend() {
        let r = Range::new(0.0, 10.0).extend(0.05);
        assert_eq!(r, Range::new(-0.5, 10.5));
    }

    #[test]
    fn test_extend_zero_width() {
        let r = Range::new(10.0, 10.0).extend(0.05);
        assert!(r.low < 10.0 && r.high > 10.0);

        let z = Range::new(0.0, 0.0).extend(0.05);
        assert_eq!(z, Range::new(-0.5, 0.5));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Range::new(0.0, 1.0);
        let b = Range::new(2.0, 3.0);
        assert!(a.intersect(&b).is_none());
        assert_eq!(
            a.intersect(&Range::new(0.5, 3.0)),
            Some(Range::new(0.5, 1.0))
        );
    }

    #[test]
    fn test_extend_near_float_limits() {
        let r = Range::new(-1e308, 1e308).extend(DEFAULT_PADDING);
        assert!(r.low.is_finite() && r.high.is_finite());
        assert!(r.low < -1e308 && r.high > 1e308);

        let r = Range::new(-f64::MAX, f64::MAX).extend(DEFAULT_PADDING);
        assert_eq!(r, Range::new(f64::MIN, f64::MAX));

        let r = Range::new(f64::MAX, f64::MAX).extend(DEFAULT_PADDING);
        assert_eq!(r.high, f64::MAX);
        assert!(r.low < f64::MAX);
    }

    #[test]
    fn test_wide_linspace_is_finite() {
        let r = Range::new(f64::MIN, f64::MAX);
        let pts = r.linspace(5);
        assert!(pts.iter().all(|p| p.is_finite()));
        assert!(pts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(pts[2], 0.0);
        assert_eq!(r.center(), 0.0);
    }

    #[test]
    fn test_linspace_hits_ends() {
        let pts = Range::new(0.0, 1.0).linspace(11);
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[0], 0.0);
        assert_eq!(pts[10], 1.0);
        assert!((pts[5] - 0.5).abs() < 1e-12);
    }
}
