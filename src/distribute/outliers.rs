//! Distance-based outlier isolation for the non-clustering path.
//!
//! Scores each observation by its Euclidean distance from the overall mean
//! point and flags everything past `mean + sigma · stddev` of the score
//! distribution. Values enter the distance computation raw — no rescaling
//! or whitening — so a dimension with a large numeric range dominates the
//! score. That is deliberate: the upstream aggregator owns unit choices,
//! and the shaped response must reflect the data as queried.
//!
//! The score needs coordinates, so datasets holding labels or nulls yield
//! no outliers: there is no principled distance between `"east"` and
//! `"west"`, and inventing one would flag arbitrary groups.

use crate::observation::Observation;

/// Flags atypical observations by distance from the overall mean point.
#[derive(Debug, Clone)]
pub struct OutlierDetector {
    /// Threshold in standard deviations above the mean score.
    sigma: f64,
}

impl OutlierDetector {
    /// Create a detector with the default threshold (`sigma = 3.0`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold in standard deviations above the mean score.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Indices of outlying observations, ascending.
    ///
    /// Observation counts do not influence the score; a group aggregating
    /// many rows is scored by position exactly like a singleton group.
    pub fn detect(&self, observations: &[Observation]) -> Vec<usize> {
        let points: Option<Vec<Vec<f64>>> = observations
            .iter()
            .map(Observation::numeric_values)
            .collect();
        let Some(points) = points else {
            return Vec::new();
        };
        let n = points.len();
        if n < 2 {
            return Vec::new();
        }
        let d = points[0].len();
        if d == 0 {
            return Vec::new();
        }

        let mut mean = vec![0.0f64; d];
        for point in &points {
            for (acc, x) in mean.iter_mut().zip(point.iter()) {
                *acc += x;
            }
        }
        for acc in &mut mean {
            *acc /= n as f64;
        }

        let scores: Vec<f64> = points.iter().map(|p| euclidean(p, &mean)).collect();

        let score_mean = scores.iter().sum::<f64>() / n as f64;
        let var = scores.iter().map(|s| (s - score_mean).powi(2)).sum::<f64>() / n as f64;
        let std = var.sqrt();
        if std == 0.0 {
            return Vec::new();
        }

        let threshold = score_mean + self.sigma * std;
        scores
            .iter()
            .enumerate()
            .filter(|(_, &s)| s > threshold)
            .map(|(i, _)| i)
            .collect()
    }
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self { sigma: 3.0 }
    }
}

#[inline]
fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}
