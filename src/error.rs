use thiserror::Error;

/// Errors returned by the distribution pipeline and clustering algorithms.
#[derive(Debug, Error)]
pub enum Error {
    /// Observation count exceeds the configured maximum.
    ///
    /// The one caller-actionable error: callers map it to an
    /// unprocessable-request response via [`Error::payload`]. No computation
    /// is attempted and no partial result is produced.
    #[error("Data too large")]
    DatasetTooLarge {
        /// Number of observations received.
        size: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Observations have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A value in dimension `index` cannot be coerced to a numeric
    /// representation. Raised by point extraction; the pipeline catches it
    /// and routes to the outlier-only path instead of clustering.
    #[error("dimension {index} holds a value that cannot be coerced to a number")]
    UnsupportedDimension {
        /// Index of the offending dimension.
        index: usize,
    },

    /// Input point set is empty.
    #[error("empty input")]
    EmptyInput,
}

impl Error {
    /// The structured error payload for caller-actionable errors.
    ///
    /// Only [`Error::DatasetTooLarge`] is surfaced to callers as a payload
    /// (`{"error": "Data too large"}`); every other variant is a fatal
    /// computation error and yields `None`.
    pub fn payload(&self) -> Option<serde_json::Value> {
        match self {
            Error::DatasetTooLarge { .. } => {
                Some(serde_json::json!({ "error": self.to_string() }))
            }
            _ => None,
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
