use serde::{Deserialize, Serialize};

use super::{Smoother, check_inputs};
use crate::error::SmootherError;

/// Piecewise-constant regression: sort by `x`, split into equal-count bins,
/// predict each point by the mean `y` of its bin.
///
/// Tied `x` values always share a bin, so bins holding ties grow and the
/// bin count can come out lower than requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinnedMeans {
    pub bins: usize,
}

impl Default for BinnedMeans {
    fn default() -> Self {
        Self { bins: 25 }
    }
}

impl Smoother for BinnedMeans {
    fn fit(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>, SmootherError> {
        check_inputs(x, y, 2)?;
        let n = x.len();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));

        let bins = self.bins.clamp(1, n);
        let base = n / bins;
        let extra = n % bins;

        let mut fitted = vec![0.0; n];
        let mut start = 0;
        let mut bin = 0;
        while start < n {
            // The first `extra` bins take one more point each
            let mut end = (start + base + usize::from(bin < extra)).min(n);
            // A run of equal x never straddles two bins
            while end < n && x[order[end]] == x[order[end - 1]] {
                end += 1;
            }
            let members = &order[start..end];
            let mean = members.iter().map(|&i| y[i]).sum::<f64>() / members.len() as f64;
            for &i in members {
                fitted[i] = mean;
            }
            start = end;
            bin += 1;
        }
        Ok(fitted)
    }
}
