//! The distribution pipeline: size guard, ordering, cluster decision,
//! outlier isolation or clustering, response shaping.
//!
//! An upstream query layer hands over aggregated `(count, values)` rows —
//! often far more of them than a chart can show. The pipeline shrinks that
//! set to a visually consumable size without discarding statistically
//! meaningful structure:
//!
//! ```text
//! Start → SizeCheck → {Empty | TooLarge | Proceed}
//! Proceed → Order → ClusterDecision → {Cluster | OutlierOnly} → Shape
//! ```
//!
//! - **SizeCheck**: zero rows short-circuit to an empty result; more rows
//!   than the configured maximum fail with
//!   [`Error::DatasetTooLarge`](crate::Error::DatasetTooLarge) before any
//!   O(N·k) work begins.
//! - **Order**: deterministic presentation order (see [`SortMode`]).
//! - **ClusterDecision**: clustering runs only when requested, the dataset
//!   is large enough, and every dimension is purely numeric. Everything
//!   else takes the outlier-only path.
//! - **Cluster**: k-means over the raw coordinate vectors, then observation
//!   counts are redistributed onto the centroids (inverse-distance
//!   weighting). Counts never influence the assignment itself.
//! - **OutlierOnly**: atypical rows are split out by distance from the
//!   overall mean; the rest pass through unchanged.
//!
//! The computation is synchronous, stateless, and pure: no shared state
//! across invocations, no internal concurrency, no retries. Identical input
//! and parameters (and a seeded clusterer) produce identical output, so
//! callers may safely retry the whole call.
//!
//! ## Usage
//!
//! ```rust
//! use condense::{distribute, Dimension, DistributeParams, Observation, Value};
//!
//! let rows = vec![
//!     Observation::new(3, vec![Value::from(15_000)]),
//!     Observation::new(1, vec![Value::from(10_000)]),
//!     Observation::new(1, vec![Value::from(20_000)]),
//!     Observation::new(1, vec![Value::from(200_000)]),
//! ];
//! let dimensions = vec![Dimension::numeric()];
//!
//! let result = distribute(rows, &dimensions, &DistributeParams::default()).unwrap();
//! assert_eq!(result.size, 4);
//! assert!(!result.clustered); // below the clustering threshold
//! assert_eq!(result.data[0].count, 3); // count order, descending
//! ```

mod order;
mod outliers;
mod weighting;

pub use order::SortMode;
pub use outliers::OutlierDetector;

use crate::cluster::{Clusterer, Kmeans};
use crate::error::{Error, Result};
use crate::observation::{Dimension, Observation};
use serde::{Deserialize, Serialize};

/// Request parameters, as decoded from the calling resource's query string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributeParams {
    /// Whether the aggregator already included null-valued groups.
    ///
    /// Carried for wire compatibility; filtering happened upstream, so the
    /// pipeline itself never consults this.
    pub nulls: bool,
    /// Requested sort mode.
    pub sort: SortMode,
    /// Whether clustering may run at all.
    pub cluster: bool,
    /// Explicit cluster count. `None` uses the configured default.
    pub n: Option<usize>,
}

impl Default for DistributeParams {
    fn default() -> Self {
        Self {
            nulls: false,
            sort: SortMode::Dimension,
            cluster: true,
            n: None,
        }
    }
}

/// The shaped result handed back to the calling resource layer.
///
/// Serializes to the wire contract:
/// `{"data": [..], "outliers": [..], "clustered": bool, "size": int}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Ordered observations, or centroid observations when clustered.
    pub data: Vec<Observation>,
    /// Observations excluded from `data` as atypical, original shape.
    pub outliers: Vec<Observation>,
    /// Whether the clustering path was taken.
    pub clustered: bool,
    /// Observation count after the size guard, before any removal.
    pub size: usize,
}

impl Distribution {
    /// The result for an empty dataset.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            outliers: Vec::new(),
            clustered: false,
            size: 0,
        }
    }
}

/// The distribution engine.
///
/// Thresholds are configuration rather than constants so deployments (and
/// tests) can tune them:
///
/// ```rust
/// use condense::Distributor;
///
/// let engine = Distributor::new()
///     .with_min_observations(500)
///     .with_max_observations(50_000)
///     .with_default_clusters(10);
/// # let _ = engine;
/// ```
#[derive(Debug)]
pub struct Distributor {
    /// Below this size, clustering is never attempted.
    min_observations: usize,
    /// Above this size, the request is rejected outright.
    max_observations: usize,
    /// Cluster count when the caller does not pass one.
    default_clusters: usize,
    /// Outlier detector for the non-clustering path.
    detector: OutlierDetector,
    /// Clustering implementation for the clustering path.
    clusterer: Box<dyn Clusterer>,
}

impl Distributor {
    /// Create an engine with default thresholds.
    ///
    /// Defaults: `min_observations = 500`, `max_observations = 50_000`,
    /// `default_clusters = 10`, [`OutlierDetector`] and [`Kmeans`] with
    /// their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum dataset size for clustering to be considered.
    pub fn with_min_observations(mut self, n: usize) -> Self {
        self.min_observations = n;
        self
    }

    /// Set the maximum dataset size accepted at all.
    pub fn with_max_observations(mut self, n: usize) -> Self {
        self.max_observations = n;
        self
    }

    /// Set the cluster count used when the request does not specify one.
    pub fn with_default_clusters(mut self, k: usize) -> Self {
        self.default_clusters = k;
        self
    }

    /// Replace the outlier detector used on the non-clustering path.
    pub fn with_detector(mut self, detector: OutlierDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the clustering implementation.
    pub fn with_clusterer(mut self, clusterer: Box<dyn Clusterer>) -> Self {
        self.clusterer = clusterer;
        self
    }

    /// Shape a dataset of aggregated observations for presentation.
    ///
    /// # Errors
    ///
    /// [`Error::DatasetTooLarge`] when the observation count exceeds the
    /// configured maximum (caller-actionable, see
    /// [`Error::payload`](crate::Error::payload));
    /// [`Error::DimensionMismatch`] when a row's arity disagrees with
    /// `dimensions`; [`Error::InvalidClusterCount`] when an explicit
    /// cluster count is zero or exceeds the dataset size. The latter two
    /// are fatal computation errors with no degraded result.
    pub fn distribute(
        &self,
        mut observations: Vec<Observation>,
        dimensions: &[Dimension],
        params: &DistributeParams,
    ) -> Result<Distribution> {
        let size = observations.len();
        if size == 0 {
            return Ok(Distribution::empty());
        }
        if size > self.max_observations {
            return Err(Error::DatasetTooLarge {
                size,
                limit: self.max_observations,
            });
        }

        for obs in &observations {
            if obs.values.len() != dimensions.len() {
                return Err(Error::DimensionMismatch {
                    expected: dimensions.len(),
                    found: obs.values.len(),
                });
            }
        }

        order::apply(&mut observations, dimensions, params.sort);

        let eligible = params.cluster
            && size >= self.min_observations
            && dimensions.iter().all(|d| !d.enumerable);
        if eligible {
            match numeric_points(&observations) {
                Ok(points) => return self.cluster(&points, &observations, params),
                // A numeric column turned out to hold an uncoercible value;
                // never cluster such data, shape it on the outlier path.
                Err(Error::UnsupportedDimension { index }) => {
                    log::debug!(
                        "dimension {} not coercible to numeric, skipping clustering",
                        index
                    );
                }
                Err(e) => return Err(e),
            }
        } else {
            log::debug!(
                "clustering skipped: requested={} size={} min={}",
                params.cluster,
                size,
                self.min_observations
            );
        }

        let outlier_indices = self.detector.detect(&observations);
        let (data, outliers) = partition(observations, &outlier_indices);
        Ok(Distribution {
            data,
            outliers,
            clustered: false,
            size,
        })
    }

    /// The clustering path: fit, split out fit-rejected outliers, and
    /// redistribute counts onto centroids.
    fn cluster(
        &self,
        points: &[Vec<f64>],
        observations: &[Observation],
        params: &DistributeParams,
    ) -> Result<Distribution> {
        let size = observations.len();
        let k = match params.n {
            // An explicit count is taken at face value; the fit rejects
            // invalid values as a fatal error rather than clamping.
            Some(k) => k,
            None => self.default_clusters.clamp(1, size),
        };
        log::debug!("clustering {} observations into {} clusters", size, k);

        let fit = self.clusterer.fit(points, k)?;
        let data = weighting::weighted_centroids(&fit, observations);
        let outliers = fit
            .outliers
            .iter()
            .map(|&i| observations[i].clone())
            .collect();

        Ok(Distribution {
            data,
            outliers,
            clustered: true,
            size,
        })
    }
}

impl Default for Distributor {
    fn default() -> Self {
        Self {
            min_observations: 500,
            max_observations: 50_000,
            default_clusters: 10,
            detector: OutlierDetector::new(),
            clusterer: Box::new(Kmeans::new()),
        }
    }
}

/// Shape a dataset with the default engine configuration.
///
/// Convenience wrapper over [`Distributor::distribute`]; see the module
/// docs for the pipeline.
pub fn distribute(
    observations: Vec<Observation>,
    dimensions: &[Dimension],
    params: &DistributeParams,
) -> Result<Distribution> {
    Distributor::new().distribute(observations, dimensions, params)
}

/// Extract every observation as a raw `f64` vector.
fn numeric_points(observations: &[Observation]) -> Result<Vec<Vec<f64>>> {
    observations
        .iter()
        .map(|obs| {
            obs.values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    value
                        .as_f64()
                        .ok_or(Error::UnsupportedDimension { index })
                })
                .collect()
        })
        .collect()
}

/// Split observations into (kept, outliers) by ascending outlier indices.
fn partition(
    observations: Vec<Observation>,
    outlier_indices: &[usize],
) -> (Vec<Observation>, Vec<Observation>) {
    let mut rejected = vec![false; observations.len()];
    for &i in outlier_indices {
        rejected[i] = true;
    }

    let mut data = Vec::with_capacity(observations.len() - outlier_indices.len());
    let mut outliers = Vec::with_capacity(outlier_indices.len());
    for (obs, is_outlier) in observations.into_iter().zip(rejected) {
        if is_outlier {
            outliers.push(obs);
        } else {
            data.push(obs);
        }
    }
    (data, outliers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Fit;
    use crate::observation::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Wraps a seeded [`Kmeans`] and counts how often the pipeline calls it.
    #[derive(Debug)]
    struct CountingClusterer {
        calls: Arc<AtomicUsize>,
    }

    impl Clusterer for CountingClusterer {
        fn fit(&self, points: &[Vec<f64>], k: usize) -> Result<Fit> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Kmeans::new().with_seed(42).fit(points, k)
        }
    }

    fn numeric_rows(n: usize) -> Vec<Observation> {
        (0..n)
            .map(|i| Observation::new(1 + (i % 5) as u64, vec![Value::from(i as f64)]))
            .collect()
    }

    fn seeded_engine() -> Distributor {
        Distributor::new().with_clusterer(Box::new(Kmeans::new().with_seed(42)))
    }

    #[test]
    fn test_empty_dataset_short_circuits() {
        let result = distribute(vec![], &[Dimension::numeric()], &DistributeParams::default())
            .unwrap();
        assert_eq!(result, Distribution::empty());

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"data":[],"outliers":[],"clustered":false,"size":0}"#);
    }

    #[test]
    fn test_oversized_dataset_is_rejected_before_any_work() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = Distributor::new()
            .with_max_observations(10)
            .with_min_observations(2)
            .with_clusterer(Box::new(CountingClusterer {
                calls: Arc::clone(&calls),
            }));

        let err = engine
            .distribute(
                numeric_rows(11),
                &[Dimension::numeric()],
                &DistributeParams::default(),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            Error::DatasetTooLarge {
                size: 11,
                limit: 10
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            err.payload().unwrap(),
            serde_json::json!({ "error": "Data too large" })
        );
    }

    #[test]
    fn test_below_threshold_never_clusters() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = Distributor::new().with_clusterer(Box::new(CountingClusterer {
            calls: Arc::clone(&calls),
        }));

        let result = engine
            .distribute(
                numeric_rows(499),
                &[Dimension::numeric()],
                &DistributeParams::default(),
            )
            .unwrap();

        assert!(!result.clustered);
        assert_eq!(result.size, 499);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // Outlier detection still ran; this dataset just has none.
        assert_eq!(result.data.len() + result.outliers.len(), 499);
    }

    #[test]
    fn test_large_numeric_dataset_clusters() {
        let result = seeded_engine()
            .distribute(
                numeric_rows(600),
                &[Dimension::numeric()],
                &DistributeParams::default(),
            )
            .unwrap();

        assert!(result.clustered);
        assert_eq!(result.size, 600);
        assert!(result.data.len() <= 10);
        for obs in &result.outliers {
            assert!(!result.data.contains(obs));
        }
    }

    #[test]
    fn test_explicit_cluster_count_is_honored() {
        let params = DistributeParams {
            n: Some(4),
            ..DistributeParams::default()
        };
        let result = seeded_engine()
            .distribute(numeric_rows(600), &[Dimension::numeric()], &params)
            .unwrap();

        assert!(result.clustered);
        assert!(result.data.len() <= 4);
    }

    #[test]
    fn test_invalid_explicit_cluster_count_is_fatal() {
        let params = DistributeParams {
            n: Some(0),
            ..DistributeParams::default()
        };
        let err = seeded_engine()
            .distribute(numeric_rows(600), &[Dimension::numeric()], &params)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidClusterCount { requested: 0, .. }));
        assert!(err.payload().is_none());
    }

    #[test]
    fn test_cluster_opt_out_is_respected() {
        let params = DistributeParams {
            cluster: false,
            ..DistributeParams::default()
        };
        let result = seeded_engine()
            .distribute(numeric_rows(600), &[Dimension::numeric()], &params)
            .unwrap();

        assert!(!result.clustered);
        assert_eq!(result.data.len() + result.outliers.len(), 600);
    }

    #[test]
    fn test_enumerable_dimension_blocks_clustering() {
        let rows: Vec<Observation> = (0..600)
            .map(|i| {
                Observation::new(
                    1,
                    vec![Value::from(format!("group-{i:04}")), Value::from(i as f64)],
                )
            })
            .collect();

        let result = seeded_engine()
            .distribute(
                rows,
                &[Dimension::enumerable(), Dimension::numeric()],
                &DistributeParams::default(),
            )
            .unwrap();

        assert!(!result.clustered);
        assert_eq!(result.size, 600);
        // Value order: the first group sorts first.
        assert_eq!(result.data[0].values[0], Value::from("group-0000"));
    }

    #[test]
    fn test_null_in_numeric_column_falls_back_to_outlier_path() {
        let mut rows = numeric_rows(600);
        rows[300].values[0] = Value::Null;

        let result = seeded_engine()
            .distribute(rows, &[Dimension::numeric()], &DistributeParams::default())
            .unwrap();

        assert!(!result.clustered);
        assert_eq!(result.size, 600);
        assert_eq!(result.data.len() + result.outliers.len(), 600);
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let rows = vec![Observation::new(1, vec![Value::from(1.0), Value::from(2.0)])];
        let err = distribute(rows, &[Dimension::numeric()], &DistributeParams::default())
            .unwrap_err();

        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn test_end_to_end_small_numeric_dataset() {
        let rows = vec![
            Observation::new(3, vec![Value::from(15_000)]),
            Observation::new(1, vec![Value::from(10_000)]),
            Observation::new(1, vec![Value::from(20_000)]),
            Observation::new(1, vec![Value::from(200_000)]),
        ];

        let result = distribute(rows, &[Dimension::numeric()], &DistributeParams::default())
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": [
                    {"count": 3, "values": [15000]},
                    {"count": 1, "values": [10000]},
                    {"count": 1, "values": [20000]},
                    {"count": 1, "values": [200000]},
                ],
                "outliers": [],
                "clustered": false,
                "size": 4,
            })
        );
    }

    #[test]
    fn test_seeded_pipeline_is_idempotent() {
        let rows = numeric_rows(600);
        let params = DistributeParams::default();
        let dims = [Dimension::numeric()];

        let a = seeded_engine().distribute(rows.clone(), &dims, &params).unwrap();
        let b = seeded_engine().distribute(rows, &dims, &params).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_unseeded_pipeline_keeps_threshold_invariants() {
        let rows = numeric_rows(600);
        let params = DistributeParams::default();
        let dims = [Dimension::numeric()];

        let a = distribute(rows.clone(), &dims, &params).unwrap();
        let b = distribute(rows, &dims, &params).unwrap();

        assert_eq!(a.clustered, b.clustered);
        assert_eq!(a.size, b.size);
        assert!(a.data.len() <= 10 && b.data.len() <= 10);
    }

    #[test]
    fn test_lowered_thresholds_cluster_small_datasets() {
        let engine = seeded_engine()
            .with_min_observations(10)
            .with_default_clusters(3);

        let result = engine
            .distribute(
                numeric_rows(50),
                &[Dimension::numeric()],
                &DistributeParams::default(),
            )
            .unwrap();

        assert!(result.clustered);
        assert!(result.data.len() <= 3);
    }
}
