//! Running sample statistics.
//!
//! Used to report the spread of Monte Carlo payoffs alongside the price.

use vp_core::Real;

/// Incremental statistics accumulator.
///
/// Accumulates samples and computes mean, variance, standard deviation,
/// standard error of the mean, min, max and count. Accumulators built on
/// disjoint subsets can be [`merge`](Self::merge)d.
#[derive(Debug, Clone)]
pub struct Statistics {
    count: usize,
    sum_x: Real,
    sum_x2: Real,
    min: Real,
    max: Real,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Create a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            sum_x: 0.0,
            sum_x2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a single sample.
    pub fn add(&mut self, x: Real) {
        self.count += 1;
        self.sum_x += x;
        self.sum_x2 += x * x;
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Statistics) {
        self.count += other.count;
        self.sum_x += other.sum_x;
        self.sum_x2 += other.sum_x2;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Number of samples.
    pub fn samples(&self) -> usize {
        self.count
    }

    /// Sample mean.  Returns `None` if no samples have been added.
    pub fn mean(&self) -> Option<Real> {
        (self.count > 0).then(|| self.sum_x / self.count as Real)
    }

    /// Unbiased (Bessel-corrected) variance.  Returns `None` for fewer than
    /// 2 samples.
    pub fn variance(&self) -> Option<Real> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as Real;
        let m = self.sum_x / n;
        let s2 = (self.sum_x2 / n - m * m).max(0.0);
        Some(s2 * n / (n - 1.0))
    }

    /// Standard deviation.  Returns `None` for fewer than 2 samples.
    pub fn std_dev(&self) -> Option<Real> {
        self.variance().map(Real::sqrt)
    }

    /// Standard error of the mean, `σ / √n`.
    pub fn error_estimate(&self) -> Option<Real> {
        self.std_dev().map(|s| s / (self.count as Real).sqrt())
    }

    /// Minimum sample value.  Returns `None` if no samples have been added.
    pub fn minimum(&self) -> Option<Real> {
        (self.count > 0).then_some(self.min)
    }

    /// Maximum sample value.  Returns `None` if no samples have been added.
    pub fn maximum(&self) -> Option<Real> {
        (self.count > 0).then_some(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn basic_statistics() {
        let mut s = Statistics::new();
        for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
            s.add(x);
        }
        assert_eq!(s.samples(), 5);
        assert_abs_diff_eq!(s.mean().unwrap(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.variance().unwrap(), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.std_dev().unwrap(), 2.5_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            s.error_estimate().unwrap(),
            (2.5_f64 / 5.0).sqrt(),
            epsilon = 1e-12
        );
        assert_eq!(s.minimum(), Some(1.0));
        assert_eq!(s.maximum(), Some(5.0));
    }

    #[test]
    fn merge_matches_single_pass() {
        let mut whole = Statistics::new();
        let mut left = Statistics::new();
        let mut right = Statistics::new();
        for i in 0..10 {
            let x = i as Real * 0.7 - 2.0;
            whole.add(x);
            if i < 4 {
                left.add(x);
            } else {
                right.add(x);
            }
        }
        left.merge(&right);
        assert_eq!(left.samples(), whole.samples());
        assert_abs_diff_eq!(left.mean().unwrap(), whole.mean().unwrap(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            left.variance().unwrap(),
            whole.variance().unwrap(),
            epsilon = 1e-12
        );
        assert_eq!(left.minimum(), whole.minimum());
    }

    #[test]
    fn empty_statistics() {
        let s = Statistics::default();
        assert!(s.mean().is_none());
        assert!(s.variance().is_none());
        assert!(s.minimum().is_none());
    }
}
