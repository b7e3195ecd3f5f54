//! K-means: centroid-relocation clustering with k-means++ seeding.
//!
//! # The Algorithm
//!
//! The classic Lloyd iteration: assign each point to its nearest centroid,
//! then move each centroid to the mean of its assigned points. Repeat until
//! the centroids stop moving (or a cap on iterations is hit).
//!
//! ## Seeding (Arthur & Vassilvitskii, 2007)
//!
//! Plain random seeding is fragile: two initial centroids landing in the
//! same blob waste a cluster. k-means++ picks the first centroid uniformly
//! and each subsequent one with probability proportional to the squared
//! distance from the nearest centroid chosen so far.
//!
//! ## Outlier rejection
//!
//! After convergence the fit flags points whose distance to their assigned
//! centroid exceeds `mean + sigma · stddev` of the distance distribution.
//! Flagged points keep their assignment but are reported in
//! [`Fit::outliers`] so callers can exclude them from downstream
//! aggregation. Assignment itself never looks at aggregate counts: every
//! point contributes exactly one unit to its centroid's mean, however many
//! underlying rows it represents.
//!
//! ## Complexity
//!
//! - **Time**: O(n · k · d) per iteration.
//! - **Space**: O(n + k · d).
//!
//! ## References
//!
//! Arthur, D., Vassilvitskii, S. (2007). "k-means++: The Advantages of
//! Careful Seeding." SODA 2007.

use super::traits::{Clusterer, Fit};
use crate::error::{Error, Result};
use rand::prelude::*;

/// K-means clusterer.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Maximum Lloyd iterations per fit.
    max_iter: usize,
    /// Convergence tolerance on centroid movement.
    tol: f64,
    /// Outlier threshold in standard deviations above the mean distance.
    outlier_sigma: f64,
    /// Optional RNG seed for reproducible seeding.
    seed: Option<u64>,
}

impl Kmeans {
    /// Create a k-means clusterer with default parameters.
    ///
    /// Defaults: `max_iter = 300`, `tol = 1e-4`, `outlier_sigma = 3.0`,
    /// unseeded RNG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of Lloyd iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance on centroid movement.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the outlier threshold (standard deviations above the mean
    /// point-to-centroid distance).
    pub fn with_outlier_sigma(mut self, sigma: f64) -> Self {
        self.outlier_sigma = sigma;
        self
    }

    /// Set an RNG seed for reproducible seeding.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// k-means++ seeding: first centroid uniform, the rest D²-weighted.
    fn seed_centroids(
        &self,
        points: &[Vec<f64>],
        k: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Vec<f64>> {
        let n = points.len();
        let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
        centroids.push(points[rng.random_range(0..n)].clone());

        // Squared distance from each point to its nearest chosen centroid.
        let mut d2 = vec![f64::INFINITY; n];
        while centroids.len() < k {
            let latest = centroids.last().expect("at least one centroid");
            for (dist, point) in d2.iter_mut().zip(points.iter()) {
                let candidate = squared_euclidean(point, latest);
                if candidate < *dist {
                    *dist = candidate;
                }
            }

            let total: f64 = d2.iter().sum();
            let next = if total > 0.0 {
                let mut r = rng.random::<f64>() * total;
                let mut pick = n - 1;
                for (i, &w) in d2.iter().enumerate() {
                    if r < w {
                        pick = i;
                        break;
                    }
                    r -= w;
                }
                pick
            } else {
                // Every point coincides with a centroid already; any pick
                // is as good as any other.
                rng.random_range(0..n)
            };
            centroids.push(points[next].clone());
        }
        centroids
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self {
            max_iter: 300,
            tol: 1e-4,
            outlier_sigma: 3.0,
            seed: None,
        }
    }
}

impl Clusterer for Kmeans {
    fn fit(&self, points: &[Vec<f64>], k: usize) -> Result<Fit> {
        let n = points.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if k == 0 || k > n {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: n,
            });
        }

        let d = points[0].len();
        for point in points.iter().skip(1) {
            if point.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: point.len(),
                });
            }
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut centroids = self.seed_centroids(points, k, rng.as_mut());
        let mut assignments = vec![0usize; n];
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;

            for (assignment, point) in assignments.iter_mut().zip(points.iter()) {
                *assignment = nearest(point, &centroids).0;
            }

            // Relocate centroids to the mean of their assigned points.
            let mut sums = vec![vec![0.0f64; d]; k];
            let mut counts = vec![0usize; k];
            for (point, &cluster) in points.iter().zip(assignments.iter()) {
                counts[cluster] += 1;
                for (acc, x) in sums[cluster].iter_mut().zip(point.iter()) {
                    *acc += x;
                }
            }

            let mut max_shift2 = 0.0f64;
            for cluster in 0..k {
                if counts[cluster] == 0 {
                    continue;
                }
                let mean: Vec<f64> = sums[cluster]
                    .iter()
                    .map(|&s| s / counts[cluster] as f64)
                    .collect();
                max_shift2 = max_shift2.max(squared_euclidean(&mean, &centroids[cluster]));
                centroids[cluster] = mean;
            }

            // Heal empty clusters by re-seeding them onto the point
            // currently farthest from its own centroid.
            for cluster in 0..k {
                if counts[cluster] > 0 {
                    continue;
                }
                let farthest = (0..n).max_by(|&a, &b| {
                    let da = squared_euclidean(&points[a], &centroids[assignments[a]]);
                    let db = squared_euclidean(&points[b], &centroids[assignments[b]]);
                    da.total_cmp(&db)
                });
                if let Some(idx) = farthest {
                    if squared_euclidean(&points[idx], &centroids[assignments[idx]]) > 0.0 {
                        centroids[cluster] = points[idx].clone();
                        max_shift2 = f64::INFINITY;
                    }
                }
            }

            if max_shift2 <= self.tol * self.tol {
                break;
            }
        }

        // Final assignment against the converged centroids.
        let mut distances = vec![0.0f64; n];
        let mut inertia = 0.0f64;
        for i in 0..n {
            let (cluster, dist2) = nearest(&points[i], &centroids);
            assignments[i] = cluster;
            distances[i] = dist2.sqrt();
            inertia += dist2;
        }

        log::debug!(
            "kmeans fit: n={} k={} iterations={} inertia={:.4}",
            n,
            k,
            iterations,
            inertia
        );

        let outliers = flag_outliers(&distances, self.outlier_sigma);

        Ok(Fit {
            centroids,
            assignments,
            outliers,
            distances,
            inertia,
            iterations,
        })
    }
}

/// Index and squared distance of the centroid nearest to `point`.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = 0usize;
    let mut best_d2 = f64::INFINITY;
    for (cluster, centroid) in centroids.iter().enumerate() {
        let d2 = squared_euclidean(point, centroid);
        if d2 < best_d2 {
            best_d2 = d2;
            best = cluster;
        }
    }
    (best, best_d2)
}

/// Indices whose distance exceeds `mean + sigma · stddev`, ascending.
fn flag_outliers(distances: &[f64], sigma: f64) -> Vec<usize> {
    let n = distances.len();
    if n == 0 {
        return Vec::new();
    }
    let mean = distances.iter().sum::<f64>() / n as f64;
    let var = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n as f64;
    let std = var.sqrt();
    if std == 0.0 {
        return Vec::new();
    }
    let threshold = mean + sigma * std;
    distances
        .iter()
        .enumerate()
        .filter(|(_, &d)| d > threshold)
        .map(|(i, _)| i)
        .collect()
}

#[inline]
fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
