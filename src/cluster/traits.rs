use crate::error::Result;

/// The outcome of fitting a clustering model to a point set.
///
/// Everything the distribution pipeline needs to redistribute observation
/// counts: where the centroids landed, which cluster each point belongs to,
/// which points the fit rejected as outliers, and how far each point sits
/// from its centroid.
#[derive(Clone, Debug)]
pub struct Fit {
    /// Centroid positions, `k` vectors of the input dimensionality.
    pub centroids: Vec<Vec<f64>>,
    /// Cluster assignment for each input point (`assignments[i] < k`).
    pub assignments: Vec<usize>,
    /// Indices of points the fit rejected as outliers, ascending.
    ///
    /// Outliers keep their entry in `assignments` and `distances`; callers
    /// are expected to exclude them from downstream aggregation.
    pub outliers: Vec<usize>,
    /// Euclidean distance from each point to its assigned centroid.
    pub distances: Vec<f64>,
    /// Within-cluster sum of squared distances at convergence.
    pub inertia: f64,
    /// Number of relocation iterations actually run.
    pub iterations: usize,
}

/// Common interface for centroid-based clustering algorithms.
///
/// The distribution pipeline only ever talks to this trait, so alternative
/// implementations can be substituted without changing the pipeline's
/// external contract.
pub trait Clusterer: std::fmt::Debug {
    /// Partition `points` into `k` clusters.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`](crate::Error::EmptyInput) if `points` is empty,
    /// [`Error::InvalidClusterCount`](crate::Error::InvalidClusterCount) if
    /// `k` is zero or exceeds the number of points, and
    /// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if the
    /// points disagree on dimensionality.
    fn fit(&self, points: &[Vec<f64>], k: usize) -> Result<Fit>;
}
