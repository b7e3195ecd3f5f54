//! Distribution shaping for aggregated dataset statistics.
//!
//! `condense` takes the aggregated `(count, dimension-values)` rows a query
//! layer produces and shrinks them to a visually consumable size: a hard
//! size guard, a deterministic ordering policy, outlier isolation, and
//! weighted k-means clustering that redistributes observation counts onto
//! cluster centroids.
//!
//! The primary public API is [`distribute()`] (and [`Distributor`] for tuned
//! thresholds), which shapes a dataset into the
//! `{data, outliers, clustered, size}` structure its HTTP-facing caller
//! serializes. The clustering itself lives under [`cluster`] behind the
//! [`Clusterer`] trait, so alternative implementations can be swapped in.
//!
//! This crate is deliberately framework-free: no querying, no routing, no
//! authentication, no persistence. It is invoked as a pure computation and
//! hands back a serde-serializable result.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod distribute;
pub mod error;
pub mod observation;

pub use cluster::{Clusterer, Fit, Kmeans};
pub use distribute::{
    distribute, DistributeParams, Distribution, Distributor, OutlierDetector, SortMode,
};
pub use error::{Error, Result};
pub use observation::{Dimension, Observation, Value};
