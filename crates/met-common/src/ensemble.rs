//! Ensemble forecast series at a point.

use crate::{ChartError, ChartResult};

/// A 2-D ensemble time series: `n_members` rows of `n_lead_times` values,
/// row-major, with a 1-D lead-time axis in hours.
#[derive(Debug, Clone)]
pub struct EnsembleSeries {
    data: Vec<f32>,
    n_members: usize,
    n_lead_times: usize,
    lead_times: Vec<f32>,
}

impl EnsembleSeries {
    /// Series with a default lead-time axis `0..n_lead_times`.
    pub fn new(data: Vec<f32>, n_members: usize, n_lead_times: usize) -> ChartResult<Self> {
        let lead_times = (0..n_lead_times).map(|t| t as f32).collect();
        Self::with_lead_times(data, n_members, n_lead_times, lead_times)
    }

    /// Series with an explicit lead-time axis.
    pub fn with_lead_times(
        data: Vec<f32>,
        n_members: usize,
        n_lead_times: usize,
        lead_times: Vec<f32>,
    ) -> ChartResult<Self> {
        if n_members == 0 || n_lead_times == 0 {
            return Err(ChartError::EmptyEnsemble);
        }
        if data.len() != n_members * n_lead_times {
            return Err(ChartError::ShapeMismatch(format!(
                "data has {} values, expected {} members x {} lead times",
                data.len(),
                n_members,
                n_lead_times
            )));
        }
        if lead_times.len() != n_lead_times {
            return Err(ChartError::ShapeMismatch(format!(
                "lead-time axis has {} values, expected {}",
                lead_times.len(),
                n_lead_times
            )));
        }
        Ok(Self {
            data,
            n_members,
            n_lead_times,
            lead_times,
        })
    }

    pub fn n_members(&self) -> usize {
        self.n_members
    }

    pub fn n_lead_times(&self) -> usize {
        self.n_lead_times
    }

    pub fn lead_times(&self) -> &[f32] {
        &self.lead_times
    }

    /// One member trajectory.
    pub fn member(&self, m: usize) -> &[f32] {
        let start = m * self.n_lead_times;
        &self.data[start..start + self.n_lead_times]
    }

    /// Minimum and maximum over all members and lead times, ignoring NaN.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.data {
            if v.is_nan() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }

    /// Per-lead-time quantile with linear interpolation between order
    /// statistics. `q` is clamped to [0, 1]. NaN members are excluded.
    pub fn quantile(&self, q: f32) -> Vec<f32> {
        let q = q.clamp(0.0, 1.0) as f64;
        let mut out = Vec::with_capacity(self.n_lead_times);
        let mut column = Vec::with_capacity(self.n_members);

        for t in 0..self.n_lead_times {
            column.clear();
            for m in 0..self.n_members {
                let v = self.data[m * self.n_lead_times + t];
                if !v.is_nan() {
                    column.push(v);
                }
            }
            if column.is_empty() {
                out.push(f32::NAN);
                continue;
            }
            column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let pos = q * (column.len() - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = (pos - lo as f64) as f32;
            out.push(column[lo] * (1.0 - frac) + column[hi] * frac);
        }
        out
    }

    /// Quantile curves for a list of quantile levels.
    pub fn quantiles(&self, qs: &[f32]) -> Vec<Vec<f32>> {
        qs.iter().map(|&q| self.quantile(q)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validation() {
        assert!(matches!(
            EnsembleSeries::new(vec![], 0, 10),
            Err(ChartError::EmptyEnsemble)
        ));
        assert!(EnsembleSeries::new(vec![0.0; 5], 2, 3).is_err());
        assert!(EnsembleSeries::with_lead_times(vec![0.0; 6], 2, 3, vec![0.0; 2]).is_err());
    }

    #[test]
    fn test_member_rows() {
        let e = EnsembleSeries::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        assert_eq!(e.member(0), &[1.0, 2.0, 3.0]);
        assert_eq!(e.member(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_median_odd_members() {
        // Three members, constant in time: 1, 2, 10
        let e = EnsembleSeries::new(vec![1.0, 1.0, 2.0, 2.0, 10.0, 10.0], 3, 2).unwrap();
        assert_eq!(e.quantile(0.5), vec![2.0, 2.0]);
    }

    #[test]
    fn test_quantile_interpolation() {
        // Two members: 0 and 10 at every lead time
        let e = EnsembleSeries::new(vec![0.0, 0.0, 10.0, 10.0], 2, 2).unwrap();
        let q25 = e.quantile(0.25);
        assert!((q25[0] - 2.5).abs() < 1e-6);
        let q50 = e.quantile(0.5);
        assert!((q50[0] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_quantile_extremes() {
        let e = EnsembleSeries::new(vec![3.0, 1.0, 7.0, 5.0], 2, 2).unwrap();
        assert_eq!(e.quantile(0.0), vec![3.0, 1.0]);
        assert_eq!(e.quantile(1.0), vec![7.0, 5.0]);
    }

    #[test]
    fn test_quantile_skips_nan_members() {
        let e = EnsembleSeries::new(vec![f32::NAN, 1.0, 4.0, 3.0], 2, 2).unwrap();
        // First lead time has only one valid member
        assert_eq!(e.quantile(0.5), vec![4.0, 2.0]);
    }
}
