//! Gaussian order statistics and belief scoring.
//!
//! Fusing two child beliefs into a parent belief needs the mean and variance
//! of `max(X1, X2)` (or `min`) for independent normals. Both follow in closed
//! form from the standard normal CDF and PDF at
//! `alpha = (mean1 - mean2) / sqrt(stddev1^2 + stddev2^2)`.
//!
//! The same `alpha` values recur constantly during a search, so CDF/PDF
//! evaluations are memoized per [`GaussianOps`] instance, keyed by `alpha`
//! rounded to two decimals.

use baymcts_core::STDDEV_EPSILON;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::f64::consts::{PI, SQRT_2};

/// Memo key resolution: alpha is rounded to `1 / ALPHA_SCALE`.
const ALPHA_SCALE: f64 = 100.0;

/// Beyond this |alpha| the CDF is 0 or 1 and the PDF 0 to double precision.
const ALPHA_SATURATION: f64 = 10.0;

/// Standard normal CDF and PDF at one alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
struct NormalTerms {
    cdf: f64,
    pdf: f64,
}

/// Closed-form Gaussian max/min with a memoized CDF/PDF table.
///
/// Each search tree owns its own instance so that independent games never
/// share cache state.
#[derive(Debug, Default)]
pub struct GaussianOps {
    memo: HashMap<i64, NormalTerms>,
    lookups: u64,
    calculations: u64,
}

impl GaussianOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean and stddev of `max(X1, X2)` for independent normals.
    ///
    /// # Panics
    /// Panics if a mean is not finite or a stddev is not finite and positive.
    pub fn max_gaussian(&mut self, mean1: f64, stddev1: f64, mean2: f64, stddev2: f64) -> (f64, f64) {
        check_inputs(mean1, stddev1, mean2, stddev2);
        let (sigma_m, alpha, terms) = self.prepare(mean1, stddev1, mean2, stddev2);
        let (f1, f2) = order_factors(alpha, terms);

        let mean = mean2 + sigma_m * f1;
        let variance = stddev2 * stddev2
            + (stddev1 * stddev1 - stddev2 * stddev2) * terms.cdf
            + sigma_m * sigma_m * f2;
        (mean, clamp_stddev(variance))
    }

    /// Mean and stddev of `min(X1, X2)` for independent normals.
    ///
    /// Mirror of [`max_gaussian`](Self::max_gaussian) through
    /// `min(X1, X2) = -max(-X1, -X2)`: the CDF terms swap to `1 - cdf` and
    /// the PDF term changes sign, so `max.mean + min.mean == mean1 + mean2`.
    ///
    /// # Panics
    /// Panics if a mean is not finite or a stddev is not finite and positive.
    pub fn min_gaussian(&mut self, mean1: f64, stddev1: f64, mean2: f64, stddev2: f64) -> (f64, f64) {
        check_inputs(mean1, stddev1, mean2, stddev2);
        let (sigma_m, alpha, terms) = self.prepare(mean1, stddev1, mean2, stddev2);
        let (_, f2) = order_factors(alpha, terms);
        let f1_min = alpha * (1.0 - terms.cdf) - terms.pdf;

        let mean = mean2 + sigma_m * f1_min;
        let variance = stddev2 * stddev2
            + (stddev1 * stddev1 - stddev2 * stddev2) * (1.0 - terms.cdf)
            + sigma_m * sigma_m * f2;
        (mean, clamp_stddev(variance))
    }

    /// Standard normal CDF, memoized at two-decimal resolution.
    pub fn cdf(&mut self, x: f64) -> f64 {
        self.lookup(x).cdf
    }

    /// Standard normal PDF, memoized at two-decimal resolution.
    pub fn pdf(&mut self, x: f64) -> f64 {
        self.lookup(x).pdf
    }

    /// Number of lookups answered from the memo table.
    pub fn cache_hits(&self) -> u64 {
        self.lookups - self.calculations
    }

    /// Number of CDF/PDF evaluations actually computed.
    pub fn calculations(&self) -> u64 {
        self.calculations
    }

    /// Number of distinct alpha keys held.
    pub fn cached_entries(&self) -> usize {
        self.memo.len()
    }

    /// Drop the memo table and counters.
    pub fn reset(&mut self) {
        self.memo.clear();
        self.lookups = 0;
        self.calculations = 0;
    }

    fn prepare(&mut self, mean1: f64, stddev1: f64, mean2: f64, stddev2: f64) -> (f64, f64, NormalTerms) {
        let sigma_m = (stddev1 * stddev1 + stddev2 * stddev2).sqrt();
        let alpha = (mean1 - mean2) / sigma_m;
        let terms = self.lookup(alpha);
        (sigma_m, alpha, terms)
    }

    fn lookup(&mut self, alpha: f64) -> NormalTerms {
        self.lookups += 1;
        if alpha.abs() > ALPHA_SATURATION {
            self.calculations += 1;
            return NormalTerms {
                cdf: if alpha > 0.0 { 1.0 } else { 0.0 },
                pdf: 0.0,
            };
        }

        let key = (alpha * ALPHA_SCALE).round() as i64;
        match self.memo.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                self.calculations += 1;
                let x = key as f64 / ALPHA_SCALE;
                *entry.insert(NormalTerms {
                    cdf: standard_normal_cdf(x),
                    pdf: standard_normal_pdf(x),
                })
            }
        }
    }
}

/// `f1 = alpha*cdf + pdf` and
/// `f2 = alpha^2*cdf*(1-cdf) + (1-2cdf)*alpha*pdf - pdf^2`.
fn order_factors(alpha: f64, terms: NormalTerms) -> (f64, f64) {
    let NormalTerms { cdf, pdf } = terms;
    let f1 = alpha * cdf + pdf;
    let f2 = alpha * alpha * cdf * (1.0 - cdf) + (1.0 - 2.0 * cdf) * alpha * pdf - pdf * pdf;
    (f1, f2)
}

fn check_inputs(mean1: f64, stddev1: f64, mean2: f64, stddev2: f64) {
    assert!(
        mean1.is_finite() && mean2.is_finite(),
        "BUG: non-finite mean in Gaussian fusion ({}, {})",
        mean1,
        mean2
    );
    assert!(
        stddev1.is_finite() && stddev1 > 0.0 && stddev2.is_finite() && stddev2 > 0.0,
        "BUG: stddev must be finite and positive in Gaussian fusion ({}, {})",
        stddev1,
        stddev2
    );
}

fn clamp_stddev(variance: f64) -> f64 {
    variance.max(0.0).sqrt().max(STDDEV_EPSILON)
}

/// Standard normal CDF via the complementary error function.
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal density.
pub fn standard_normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Complementary error function, Chebyshev fit with fractional error below
/// 1.2e-7 everywhere.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * (-z * z + poly).exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// UCB1-style score for a belief: `mean + sqrt(2 ln(N) * stddev)`.
///
/// `parent_visits` below one is treated as one, which zeroes the bonus.
pub fn gaussian_ucb1(mean: f64, stddev: f64, parent_visits: u32) -> f64 {
    let n = f64::from(parent_visits.max(1));
    mean + (2.0 * n.ln() * stddev).sqrt()
}

/// Mean of a Beta(a, b) distribution, `None` when `a + b == 0`.
pub fn beta_mean(a: f64, b: f64) -> Option<f64> {
    let total = a + b;
    if total == 0.0 {
        return None;
    }
    Some(a / total)
}

/// Spread of a Beta(a, b) belief, `sqrt(ab / ((ab)^2 (a + b + 1)))`.
///
/// Returns `None` when the expression is undefined (`a*b == 0` or
/// `a + b + 1 == 0`) or negative under the root.
pub fn beta_stddev(a: f64, b: f64) -> Option<f64> {
    let ab = a * b;
    let denominator = ab * ab * (a + b + 1.0);
    if ab == 0.0 || denominator == 0.0 {
        return None;
    }
    let ratio = ab / denominator;
    (ratio >= 0.0).then(|| ratio.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_standard_normal_cdf_known_values() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < EPS);
        assert!((standard_normal_cdf(1.0) - 0.841_344_746).abs() < EPS);
        assert!((standard_normal_cdf(-1.96) - 0.024_997_895).abs() < EPS);
        assert!((standard_normal_cdf(3.0) - 0.998_650_102).abs() < EPS);
    }

    #[test]
    fn test_standard_normal_pdf_known_values() {
        assert!((standard_normal_pdf(0.0) - 0.398_942_280).abs() < EPS);
        assert!((standard_normal_pdf(1.0) - 0.241_970_725).abs() < EPS);
        assert!((standard_normal_pdf(-1.0) - standard_normal_pdf(1.0)).abs() < 1e-15);
    }

    #[test]
    fn test_max_of_identical_gaussians() {
        let mut ops = GaussianOps::new();
        let (mean, stddev) = ops.max_gaussian(10.0, 2.0, 10.0, 2.0);

        // E[max] = m + s/sqrt(pi), Var[max] = s^2 (1 - 1/pi)
        assert!(mean > 10.0);
        assert!((mean - (10.0 + 2.0 / PI.sqrt())).abs() < 1e-4);
        assert!(stddev < 2.0 * SQRT_2);
        assert!((stddev - 2.0 * (1.0 - 1.0 / PI).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_min_of_identical_gaussians() {
        let mut ops = GaussianOps::new();
        let (max_mean, max_stddev) = ops.max_gaussian(-4.0, 1.5, -4.0, 1.5);
        let (min_mean, min_stddev) = ops.min_gaussian(-4.0, 1.5, -4.0, 1.5);

        assert!(min_mean < -4.0);
        assert!((max_mean + min_mean - (-8.0)).abs() < 1e-9);
        assert!((max_stddev - min_stddev).abs() < 1e-12);
    }

    #[test]
    fn test_max_dominated_by_far_larger_mean() {
        let mut ops = GaussianOps::new();
        let (mean, stddev) = ops.max_gaussian(100_000.0, 1.0, 0.0, 1.0);
        assert!((mean - 100_000.0).abs() < 1e-6);
        assert!((stddev - 1.0).abs() < 1e-6);

        let (mean, stddev) = ops.min_gaussian(100_000.0, 1.0, 0.0, 3.0);
        assert!(mean.abs() < 1e-6);
        assert!((stddev - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_conservation_of_expectation() {
        let mut ops = GaussianOps::new();
        let cases = [(1.0, 1.0, 0.0, 1.0), (5.0, 0.3, 7.5, 2.0), (-20.0, 4.0, 13.0, 0.01)];
        for (m1, s1, m2, s2) in cases {
            let (max_mean, _) = ops.max_gaussian(m1, s1, m2, s2);
            let (min_mean, _) = ops.min_gaussian(m1, s1, m2, s2);
            assert!(
                (max_mean + min_mean - (m1 + m2)).abs() < 1e-9,
                "max {} + min {} != {}",
                max_mean,
                min_mean,
                m1 + m2
            );
        }
    }

    #[test]
    fn test_max_is_symmetric_in_arguments() {
        let mut ops = GaussianOps::new();
        let (a_mean, a_stddev) = ops.max_gaussian(3.0, 1.0, 1.0, 2.0);
        let (b_mean, b_stddev) = ops.max_gaussian(1.0, 2.0, 3.0, 1.0);
        // Rounding of alpha differs only in sign, so the results agree closely.
        assert!((a_mean - b_mean).abs() < 1e-2);
        assert!((a_stddev - b_stddev).abs() < 1e-2);
    }

    #[test]
    fn test_stddev_never_below_epsilon() {
        let mut ops = GaussianOps::new();
        let (_, stddev) = ops.max_gaussian(0.0, 1e-12, 0.0, 1e-12);
        assert!(stddev >= STDDEV_EPSILON);
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn test_zero_stddev_is_fatal() {
        let mut ops = GaussianOps::new();
        ops.max_gaussian(0.0, 0.0, 1.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn test_nan_mean_is_fatal() {
        let mut ops = GaussianOps::new();
        ops.min_gaussian(f64::NAN, 1.0, 1.0, 1.0);
    }

    #[test]
    fn test_memoization_counts() {
        let mut ops = GaussianOps::new();
        ops.max_gaussian(1.0, 1.0, 0.0, 1.0);
        ops.max_gaussian(1.0, 1.0, 0.0, 1.0);
        ops.min_gaussian(1.001, 1.0, 0.0, 1.0);

        assert_eq!(ops.calculations(), 1);
        assert_eq!(ops.cache_hits(), 2);
        assert_eq!(ops.cached_entries(), 1);

        ops.reset();
        assert_eq!(ops.calculations(), 0);
        assert_eq!(ops.cached_entries(), 0);
    }

    #[test]
    fn test_saturated_alpha_is_not_cached() {
        let mut ops = GaussianOps::new();
        assert_eq!(ops.cdf(50.0), 1.0);
        assert_eq!(ops.cdf(-50.0), 0.0);
        assert_eq!(ops.pdf(50.0), 0.0);
        assert_eq!(ops.cached_entries(), 0);
    }

    #[test]
    fn test_gaussian_ucb1() {
        // ln(1) = 0: no exploration bonus
        assert_eq!(gaussian_ucb1(3.0, 4.0, 1), 3.0);
        assert_eq!(gaussian_ucb1(3.0, 4.0, 0), 3.0);

        let expected = 3.0 + (2.0 * 10f64.ln() * 4.0).sqrt();
        assert!((gaussian_ucb1(3.0, 4.0, 10) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_beta_helpers() {
        assert_eq!(beta_mean(2.0, 6.0), Some(0.25));
        assert_eq!(beta_mean(0.0, 0.0), None);

        let expected = (12.0f64 / (144.0 * 8.0)).sqrt();
        assert!((beta_stddev(3.0, 4.0).unwrap() - expected).abs() < 1e-12);
        assert_eq!(beta_stddev(0.0, 4.0), None);
        assert_eq!(beta_stddev(0.0, 0.0), None);
    }
}
