//! Penalized cubic regression spline (P-spline)
//!
//! Cubic B-splines on equally spaced knots spanning the sample range, with a
//! difference penalty on adjacent coefficients. The smoothing parameter is
//! picked by generalized cross-validation over a log-spaced grid.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::{Smoother, check_inputs};
use crate::error::SmootherError;

const MIN_POINTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenalizedSpline {
    /// Number of equal-width knot intervals over the sample range
    pub segments: usize,
    /// Order of the difference penalty (2 leaves straight lines unpenalized)
    pub penalty_order: usize,
    pub log10_lambda_min: f64,
    pub log10_lambda_max: f64,
    /// Number of grid points searched between the two bounds
    pub lambda_steps: usize,
}

impl Default for PenalizedSpline {
    fn default() -> Self {
        Self {
            segments: 20,
            penalty_order: 2,
            log10_lambda_min: -8.0,
            log10_lambda_max: 4.0,
            lambda_steps: 49,
        }
    }
}

/// Uniform cubic B-spline basis over `[lo, hi]`
struct CubicBasis {
    lo: f64,
    width: f64,
    segments: usize,
}

impl CubicBasis {
    fn len(&self) -> usize {
        self.segments + 3
    }

    /// Index of the first non-zero basis function at `x` and the four weights
    fn eval(&self, x: f64) -> (usize, [f64; 4]) {
        let t = (x - self.lo) / self.width;
        let segment = (t.floor().max(0.0) as usize).min(self.segments - 1);
        let u = t - segment as f64;
        let u2 = u * u;
        let u3 = u2 * u;
        let weights = [
            (1.0 - u).powi(3) / 6.0,
            (3.0 * u3 - 6.0 * u2 + 4.0) / 6.0,
            (-3.0 * u3 + 3.0 * u2 + 3.0 * u + 1.0) / 6.0,
            u3 / 6.0,
        ];
        (segment, weights)
    }
}

/// `D'D` for the `order`-th difference operator on `k` coefficients
fn difference_penalty(k: usize, order: usize) -> DMatrix<f64> {
    let mut d = DMatrix::<f64>::identity(k, k);
    for _ in 0..order.min(k.saturating_sub(1)) {
        let rows = d.nrows() - 1;
        d = DMatrix::from_fn(rows, k, |r, c| d[(r + 1, c)] - d[(r, c)]);
    }
    d.transpose() * d
}

impl Smoother for PenalizedSpline {
    fn fit(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>, SmootherError> {
        check_inputs(x, y, MIN_POINTS)?;
        let n = x.len() as f64;

        let (lo, hi) = x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if hi - lo <= f64::EPSILON * lo.abs().max(hi.abs()) {
            // x carries no information: the best predictor is the overall mean
            let mean = y.iter().sum::<f64>() / n;
            return Ok(vec![mean; x.len()]);
        }

        let segments = self.segments.max(1);
        let basis = CubicBasis {
            lo,
            width: (hi - lo) / segments as f64,
            segments,
        };
        let k = basis.len();
        let rows: Vec<(usize, [f64; 4])> = x.iter().map(|&v| basis.eval(v)).collect();

        // Normal equations scaled by 1/n so the lambda grid does not depend on n
        let mut gram = DMatrix::<f64>::zeros(k, k);
        let mut rhs = DVector::<f64>::zeros(k);
        for ((first, w), &yi) in rows.iter().zip(y) {
            for a in 0..4 {
                rhs[first + a] += w[a] * yi;
                for b in 0..4 {
                    gram[(first + a, first + b)] += w[a] * w[b];
                }
            }
        }
        gram /= n;
        rhs /= n;

        let penalty = difference_penalty(k, self.penalty_order);
        let steps = self.lambda_steps.max(1);
        let mut best: Option<(f64, Vec<f64>)> = None;

        for step in 0..steps {
            let log_lambda = if steps == 1 {
                self.log10_lambda_min
            } else {
                self.log10_lambda_min
                    + (self.log10_lambda_max - self.log10_lambda_min) * step as f64
                        / (steps - 1) as f64
            };
            let lambda = 10f64.powf(log_lambda);

            let system = &gram + &penalty * lambda;
            let Some(chol) = system.cholesky() else {
                continue;
            };
            let coef = chol.solve(&rhs);
            let edf = chol.solve(&gram).trace();

            let fitted: Vec<f64> = rows
                .iter()
                .map(|(first, w)| (0..4).map(|a| w[a] * coef[first + a]).sum::<f64>())
                .collect();
            let rss: f64 = fitted
                .iter()
                .zip(y)
                .map(|(f, yi)| (yi - f) * (yi - f))
                .sum();

            let denom = 1.0 - edf / n;
            if denom <= 0.0 || !rss.is_finite() {
                continue;
            }
            let gcv = rss / n / (denom * denom);
            if best.as_ref().is_none_or(|(best_gcv, _)| gcv < *best_gcv) {
                best = Some((gcv, fitted));
            }
        }

        let (_, fitted) = best.ok_or(SmootherError::SingularSystem)?;
        if fitted.iter().any(|f| !f.is_finite()) {
            return Err(SmootherError::NonFinite);
        }
        Ok(fitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_basis_partition_of_unity() {
        let basis = CubicBasis {
            lo: 0.0,
            width: 0.5,
            segments: 4,
        };
        for x in [0.0, 0.1, 0.5, 1.3, 1.99, 2.0] {
            let (first, w) = basis.eval(x);
            assert!(first + 3 < basis.len());
            assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12, "x={x}");
        }
    }

    #[test]
    fn test_penalty_annihilates_lines() {
        let penalty = difference_penalty(6, 2);
        let line = DVector::from_fn(6, |i, _| 3.0 + 2.0 * i as f64);
        let residual = &penalty * line;
        assert!(residual.amax() < 1e-12);
    }

    #[test]
    fn test_reproduces_straight_line() {
        let x: Vec<f64> = (0..200).map(|i| f64::from(i) / 10.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();

        let fitted = PenalizedSpline::default().fit(&x, &y).unwrap();
        for (f, yi) in fitted.iter().zip(&y) {
            assert!((f - yi).abs() < 1e-4);
        }
    }

    #[test]
    fn test_recovers_nonlinear_mean() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let x: Vec<f64> = (0..2_000).map(|_| rng.random_range(0.0..6.0)).collect();
        let truth: Vec<f64> = x.iter().map(|v| v.sin() * 3.0).collect();
        let y: Vec<f64> = truth
            .iter()
            .map(|t| t + rng.random_range(-0.5..0.5))
            .collect();

        let fitted = PenalizedSpline::default().fit(&x, &y).unwrap();
        let mse: f64 = fitted
            .iter()
            .zip(&truth)
            .map(|(f, t)| (f - t) * (f - t))
            .sum::<f64>()
            / x.len() as f64;
        // Noise variance is 1/12; the fit should be much closer to the truth
        assert!(mse < 0.01, "mse was {mse}");
    }

    #[test]
    fn test_constant_input_predicts_mean() {
        let x = vec![5.0; 10];
        let y: Vec<f64> = (0..10).map(f64::from).collect();
        let fitted = PenalizedSpline::default().fit(&x, &y).unwrap();
        assert!(fitted.iter().all(|f| (f - 4.5).abs() < 1e-12));
    }

    #[test]
    fn test_input_errors() {
        let spline = PenalizedSpline::default();
        assert!(matches!(
            spline.fit(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0]),
            Err(SmootherError::LengthMismatch { x: 4, y: 2 })
        ));
        assert!(matches!(
            spline.fit(&[1.0, 2.0], &[1.0, 2.0]),
            Err(SmootherError::TooFewPoints { .. })
        ));
        assert_eq!(
            spline.fit(&[1.0, f64::NAN, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]),
            Err(SmootherError::NonFinite)
        );
    }
}
