//! Deterministic presentation ordering for aggregated observations.
//!
//! Two orderings exist, chosen from the dimension metadata and the requested
//! sort mode:
//!
//! - **Value order**: ascending lexicographic on the dimension-value tuple.
//!   Used when at least one dimension is enumerable and the caller did not
//!   ask for count order — categorical groups read naturally in value order.
//! - **Count order**: descending by aggregate count. Used everywhere else,
//!   including all-numeric datasets regardless of the requested mode.
//!
//! Both orderings are stable sorts, so identical input and parameters always
//! produce identical output.

use crate::observation::{Dimension, Observation, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Requested sort mode for the shaped response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Order by dimension value(s) ascending. The default.
    #[default]
    Dimension,
    /// Order by aggregate count descending.
    Count,
}

/// Sort `observations` in place per the ordering policy.
pub fn apply(observations: &mut [Observation], dimensions: &[Dimension], sort: SortMode) {
    let by_value = sort != SortMode::Count && dimensions.iter().any(|d| d.enumerable);
    if by_value {
        observations.sort_by(|a, b| compare_values(&a.values, &b.values));
    } else {
        observations.sort_by(|a, b| b.count.cmp(&a.count));
    }
}

/// Lexicographic comparison of two value tuples.
fn compare_values(a: &[Value], b: &[Value]) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|&ord| ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(count: u64, label: &str) -> Observation {
        Observation::new(count, vec![Value::from(label)])
    }

    #[test]
    fn test_enumerable_dimension_sorts_by_value() {
        let mut observations = vec![obs(5, "west"), obs(9, "east"), obs(2, "north")];
        let dimensions = vec![Dimension::enumerable()];

        apply(&mut observations, &dimensions, SortMode::Dimension);

        let labels: Vec<_> = observations
            .iter()
            .map(|o| o.values[0].clone())
            .collect();
        assert_eq!(
            labels,
            vec![Value::from("east"), Value::from("north"), Value::from("west")]
        );
    }

    #[test]
    fn test_count_mode_overrides_value_order() {
        let mut observations = vec![obs(5, "west"), obs(9, "east"), obs(2, "north")];
        let dimensions = vec![Dimension::enumerable()];

        apply(&mut observations, &dimensions, SortMode::Count);

        let counts: Vec<_> = observations.iter().map(|o| o.count).collect();
        assert_eq!(counts, vec![9, 5, 2]);
    }

    #[test]
    fn test_numeric_dimensions_sort_by_count_descending() {
        let mut observations = vec![
            Observation::new(1, vec![Value::from(10_000)]),
            Observation::new(3, vec![Value::from(15_000)]),
            Observation::new(1, vec![Value::from(200_000)]),
        ];
        let dimensions = vec![Dimension::numeric()];

        // Dimension mode on an all-numeric dataset still yields count order.
        apply(&mut observations, &dimensions, SortMode::Dimension);

        assert_eq!(observations[0].count, 3);
        assert_eq!(observations[1].values[0], Value::from(10_000));
        assert_eq!(observations[2].values[0], Value::from(200_000));
    }

    #[test]
    fn test_count_ties_keep_input_order() {
        let mut observations = vec![
            Observation::new(1, vec![Value::from("b")]),
            Observation::new(1, vec![Value::from("a")]),
            Observation::new(1, vec![Value::from("c")]),
        ];
        let dimensions = vec![Dimension::enumerable()];

        apply(&mut observations, &dimensions, SortMode::Count);

        let labels: Vec<_> = observations
            .iter()
            .map(|o| o.values[0].clone())
            .collect();
        assert_eq!(
            labels,
            vec![Value::from("b"), Value::from("a"), Value::from("c")]
        );
    }

    #[test]
    fn test_multi_dimension_value_order_is_lexicographic() {
        let mut observations = vec![
            Observation::new(1, vec![Value::from("b"), Value::from(2)]),
            Observation::new(2, vec![Value::from("a"), Value::from(9)]),
            Observation::new(3, vec![Value::from("b"), Value::from(1)]),
        ];
        let dimensions = vec![Dimension::enumerable(), Dimension::numeric()];

        apply(&mut observations, &dimensions, SortMode::Dimension);

        assert_eq!(observations[0].count, 2);
        assert_eq!(observations[1].count, 3);
        assert_eq!(observations[2].count, 1);
    }
}
