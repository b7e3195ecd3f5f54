//! Centroid-based clustering behind a narrow, swappable interface.
//!
//! The distribution pipeline needs exactly one thing from this module: a
//! partition of raw coordinate vectors into `k` clusters, with centroid
//! positions, per-point distances, and a set of rejected outliers. That
//! contract is the [`Clusterer`] trait; [`Kmeans`] is the default
//! implementation.
//!
//! ## K-means
//!
//! Assign each point to the nearest centroid, then update centroids to the
//! mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance (here: the requested or configured cluster count)
//!
//! Points enter assignment unweighted: an observation aggregating a million
//! rows pulls on a centroid exactly as hard as one aggregating a single row.
//! Count weighting happens after the fit, when observation counts are
//! redistributed onto centroids (see [`crate::distribute`]).
//!
//! ## Usage
//!
//! ```rust
//! use condense::cluster::{Clusterer, Kmeans};
//!
//! let points = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let fit = Kmeans::new().with_seed(42).fit(&points, 2).unwrap();
//! assert_eq!(fit.centroids.len(), 2);
//! assert_eq!(fit.assignments[0], fit.assignments[1]); // First two together
//! assert_ne!(fit.assignments[0], fit.assignments[2]); // Separate from last two
//! ```

mod kmeans;
mod traits;

pub use kmeans::Kmeans;
pub use traits::{Clusterer, Fit};
