//! Inverse-distance redistribution of observation counts onto centroids.
//!
//! After a fit, each centroid absorbs the counts of its assigned
//! observations, discounted by how far each observation sits from the
//! centroid:
//!
//! ```text
//! weight_j = (1 − dist_j / dist_sum) · count_j        (dist_sum > 0)
//! weight_j = count_j                                  (dist_sum = 0)
//! weighted_count_i = round(Σ_j weight_j)
//! ```
//!
//! where `dist_sum` is the total distance over the cluster's surviving
//! (non-outlier) points. Mass concentrates on observations near the
//! centroid; the redistributed totals do NOT sum back to the input total.
//! This is a downsampling heuristic for visualization, not a conservation
//! law.

use crate::cluster::Fit;
use crate::observation::{Observation, Value};

/// Build one centroid observation per cluster, sorted by weighted count
/// descending.
///
/// Outlier points flagged by the fit contribute nothing. A cluster left with
/// no surviving points keeps its centroid position and reports a zero count
/// rather than dividing by zero.
pub fn weighted_centroids(fit: &Fit, observations: &[Observation]) -> Vec<Observation> {
    let k = fit.centroids.len();
    let mut rejected = vec![false; observations.len()];
    for &i in &fit.outliers {
        rejected[i] = true;
    }

    let mut dist_sums = vec![0.0f64; k];
    for (i, &cluster) in fit.assignments.iter().enumerate() {
        if !rejected[i] {
            dist_sums[cluster] += fit.distances[i];
        }
    }

    let mut weights = vec![0.0f64; k];
    for (i, &cluster) in fit.assignments.iter().enumerate() {
        if rejected[i] {
            continue;
        }
        let count = observations[i].count as f64;
        if dist_sums[cluster] > 0.0 {
            weights[cluster] += (1.0 - fit.distances[i] / dist_sums[cluster]) * count;
        } else {
            weights[cluster] += count;
        }
    }

    let mut centroids: Vec<Observation> = fit
        .centroids
        .iter()
        .zip(weights.iter())
        .map(|(position, &weight)| {
            Observation::new(
                weight.round() as u64,
                position.iter().copied().map(Value::Number).collect(),
            )
        })
        .collect();
    centroids.sort_by(|a, b| b.count.cmp(&a.count));
    centroids
}
