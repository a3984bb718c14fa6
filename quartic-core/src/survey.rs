//! Batch infection-number surveys over ranges of circulant graphs.
//!
//! A [`Survey`] computes one [`SurveyRecord`] per valid `C_n(3,a)` and keeps
//! the records ordered by `(n, a)` whether or not the graphs were processed
//! in parallel. [`summarize`] and [`stability`] condense the records for
//! reporting.

use std::{collections::BTreeMap, ops::RangeInclusive, time::Duration, time::Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use tracing::{Span, field, info, instrument};

use crate::{
    Result,
    circulant::{CirculantGraph, enumerate_graphs},
    error::QuarticError,
    search::InfectionSearch,
    seed::SeedSet,
    simulator::Simulator,
    topology::Topology,
};

/// Trailing run of equal `m_2` values that counts as exact stabilisation.
pub const DEFAULT_EXACT_WINDOW: usize = 150;
/// Trailing window whose `m_2` values may differ by at most one.
pub const DEFAULT_APPROXIMATE_WINDOW: usize = 100;

/// Infection number of a single graph, as collected by a [`Survey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyRecord {
    /// Graph order.
    pub n: usize,
    /// Second offset of the graph.
    pub a: usize,
    /// Infection number found for the graph.
    pub m2: usize,
    /// Witness seed of size `m2`.
    pub contagious_set: SeedSet,
    /// Whether `m2` is known to be minimal.
    pub exact: bool,
    /// Wall-clock time spent on the graph.
    #[serde(rename = "computation_time", serialize_with = "as_seconds")]
    pub elapsed: Duration,
}

/// Aggregate statistics over a set of [`SurveyRecord`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveySummary {
    /// Number of graphs surveyed.
    pub total_graphs: usize,
    /// Smallest and largest order seen.
    pub order_range: (usize, usize),
    /// Smallest and largest infection number seen.
    pub m2_range: (usize, usize),
    /// Mean infection number.
    pub mean_m2: f64,
    /// Time spent across every graph.
    #[serde(serialize_with = "as_seconds")]
    pub total_time: Duration,
    /// Mean time per graph.
    #[serde(serialize_with = "as_seconds")]
    pub mean_time: Duration,
    /// Number of graphs per order.
    pub graphs_by_order: BTreeMap<usize, usize>,
}

/// Long-run behaviour of `m_2` for a fixed offset as the order grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stability {
    /// The trailing values are all equal to `value` from order `from_n` on.
    Stable {
        /// The settled infection number.
        value: usize,
        /// First order of the trailing run.
        from_n: usize,
    },
    /// The trailing window stays within `low..=high`, where `high - low <= 1`.
    Approximate {
        /// Smallest value in the window.
        low: usize,
        /// Largest value in the window.
        high: usize,
        /// First order of the window.
        from_n: usize,
    },
    /// Neither condition holds, or there are too few records.
    Unstable,
}

/// Batch driver computing infection numbers over many graphs.
///
/// # Examples
/// ```
/// use quartic_core::{InfectionSearch, Simulator, Survey};
///
/// let records = Survey::new(Simulator::default(), InfectionSearch::new())
///     .run(5..=8)?;
/// assert!(records.iter().all(|record| record.m2 == 2));
/// assert!(records.windows(2).all(|pair| (pair[0].n, pair[0].a) < (pair[1].n, pair[1].a)));
/// # Ok::<(), quartic_core::QuarticError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Survey {
    simulator: Simulator,
    search: InfectionSearch,
    parallel: bool,
}

impl Survey {
    /// Creates a survey that runs graphs in parallel when the `parallel`
    /// feature is enabled.
    #[must_use]
    pub fn new(simulator: Simulator, search: InfectionSearch) -> Self {
        Self {
            simulator,
            search,
            parallel: cfg!(feature = "parallel"),
        }
    }

    /// Enables or disables parallel processing.
    ///
    /// Without the `parallel` feature this flag is ignored.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns whether graphs will be processed in parallel.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }

    /// Surveys every valid graph with an order in `orders`.
    ///
    /// # Errors
    /// Returns [`QuarticError::InvalidOrderRange`] when the range is empty.
    #[instrument(
        name = "core.survey",
        err,
        skip(self),
        fields(parallel = self.is_parallel(), graphs = field::Empty),
    )]
    pub fn run(&self, orders: RangeInclusive<usize>) -> Result<Vec<SurveyRecord>> {
        check_range(&orders)?;
        let graphs: Vec<CirculantGraph> = enumerate_graphs(orders).collect();
        Span::current().record("graphs", graphs.len());
        self.measure_all(&graphs)
    }

    /// Surveys `C_n(3, offset)` for every order in `orders` where that graph
    /// is valid.
    ///
    /// # Errors
    /// Returns [`QuarticError::InvalidOrderRange`] when the range is empty.
    #[instrument(
        name = "core.survey",
        err,
        skip(self),
        fields(parallel = self.is_parallel(), graphs = field::Empty),
    )]
    pub fn run_fixed_offset(
        &self,
        offset: usize,
        orders: RangeInclusive<usize>,
    ) -> Result<Vec<SurveyRecord>> {
        check_range(&orders)?;
        let graphs: Vec<CirculantGraph> = orders
            .filter_map(|order| CirculantGraph::new(order, offset).ok())
            .filter(|graph| graph.offset() == offset)
            .collect();
        Span::current().record("graphs", graphs.len());
        self.measure_all(&graphs)
    }

    fn measure_all(&self, graphs: &[CirculantGraph]) -> Result<Vec<SurveyRecord>> {
        #[cfg(feature = "parallel")]
        if self.parallel {
            let parent = Span::current();
            return graphs
                .par_iter()
                .map(|graph| parent.in_scope(|| self.measure(graph)))
                .collect();
        }
        graphs.iter().map(|graph| self.measure(graph)).collect()
    }

    fn measure(&self, graph: &CirculantGraph) -> Result<SurveyRecord> {
        let started = Instant::now();
        let found = self.search.infection_number(&self.simulator, graph)?;
        let record = SurveyRecord {
            n: graph.order(),
            a: graph.offset(),
            m2: found.value,
            contagious_set: found.witness,
            exact: found.exact,
            elapsed: started.elapsed(),
        };
        info!(
            n = record.n,
            a = record.a,
            m2 = record.m2,
            exact = record.exact,
            elapsed_ms = u64::try_from(record.elapsed.as_millis()).unwrap_or(u64::MAX),
            "graph surveyed"
        );
        Ok(record)
    }
}

fn check_range(orders: &RangeInclusive<usize>) -> Result<()> {
    if orders.is_empty() {
        return Err(QuarticError::InvalidOrderRange {
            min: *orders.start(),
            max: *orders.end(),
        });
    }
    Ok(())
}

/// Condenses survey records into aggregate statistics.
///
/// Returns `None` when `records` is empty.
#[must_use]
pub fn summarize(records: &[SurveyRecord]) -> Option<SurveySummary> {
    let first = records.first()?;
    let mut order_range = (first.n, first.n);
    let mut m2_range = (first.m2, first.m2);
    let mut m2_total = 0_usize;
    let mut total_time = Duration::ZERO;
    let mut graphs_by_order = BTreeMap::new();
    for record in records {
        order_range = (order_range.0.min(record.n), order_range.1.max(record.n));
        m2_range = (m2_range.0.min(record.m2), m2_range.1.max(record.m2));
        m2_total += record.m2;
        total_time += record.elapsed;
        *graphs_by_order.entry(record.n).or_insert(0) += 1;
    }
    let count = records.len();
    Some(SurveySummary {
        total_graphs: count,
        order_range,
        m2_range,
        mean_m2: m2_total as f64 / count as f64,
        total_time,
        mean_time: u32::try_from(count).map_or(Duration::ZERO, |count| total_time / count),
        graphs_by_order,
    })
}

/// Classifies how `m_2` behaves for a fixed `offset` as the order grows.
///
/// Records for other offsets are ignored. With the remaining records sorted
/// by order, a trailing run of at least `exact_window` equal values yields
/// [`Stability::Stable`]; otherwise, if the last `approximate_window` values
/// differ by at most one, [`Stability::Approximate`]; otherwise
/// [`Stability::Unstable`].
///
/// # Examples
/// ```
/// use quartic_core::{Stability, SurveyRecord, SeedSet, stability};
/// use std::time::Duration;
///
/// let records: Vec<SurveyRecord> = (10..20)
///     .map(|n| SurveyRecord {
///         n,
///         a: 4,
///         m2: if n < 14 { 2 } else { 3 },
///         contagious_set: SeedSet::full(n),
///         exact: true,
///         elapsed: Duration::ZERO,
///     })
///     .collect();
/// assert_eq!(
///     stability(&records, 4, 5, 8),
///     Stability::Stable { value: 3, from_n: 14 }
/// );
/// ```
#[must_use]
pub fn stability(
    records: &[SurveyRecord],
    offset: usize,
    exact_window: usize,
    approximate_window: usize,
) -> Stability {
    let mut series: Vec<(usize, usize)> = records
        .iter()
        .filter(|record| record.a == offset)
        .map(|record| (record.n, record.m2))
        .collect();
    series.sort_unstable();
    let Some(&(_, last)) = series.last() else {
        return Stability::Unstable;
    };

    let run = series
        .iter()
        .rev()
        .take_while(|&&(_, m2)| m2 == last)
        .count();
    if run >= exact_window.max(1) {
        return Stability::Stable {
            value: last,
            from_n: series[series.len() - run].0,
        };
    }

    let window = approximate_window.max(1);
    if series.len() >= window {
        let tail = &series[series.len() - window..];
        let low = tail.iter().map(|&(_, m2)| m2).min().unwrap_or(last);
        let high = tail.iter().map(|&(_, m2)| m2).max().unwrap_or(last);
        if high - low <= 1 {
            return Stability::Approximate {
                low,
                high,
                from_n: tail[0].0,
            };
        }
    }
    Stability::Unstable
}

fn as_seconds<S: Serializer>(duration: &Duration, serializer: S) -> core::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn record(n: usize, a: usize, m2: usize) -> SurveyRecord {
        SurveyRecord {
            n,
            a,
            m2,
            contagious_set: SeedSet::full(n),
            exact: true,
            elapsed: Duration::from_millis(10),
        }
    }

    fn survey() -> Survey {
        Survey::new(Simulator::default(), InfectionSearch::new())
    }

    #[rstest]
    fn empty_range_is_rejected() {
        let err = survey().run(9..=8).expect_err("empty range must fail");
        assert_eq!(err, QuarticError::InvalidOrderRange { min: 9, max: 8 });
    }

    #[rstest]
    fn survey_covers_every_valid_graph() {
        let records = survey().with_parallel(false).run(5..=12).expect("survey");
        let expected: Vec<(usize, usize)> = enumerate_graphs(5..=12)
            .map(|graph| (graph.order(), graph.offset()))
            .collect();
        let actual: Vec<(usize, usize)> = records.iter().map(|record| (record.n, record.a)).collect();
        assert_eq!(actual, expected);
        let twelve: Vec<usize> = records
            .iter()
            .filter(|record| record.n == 12)
            .map(|record| record.m2)
            .collect();
        assert_eq!(twelve, [2, 3, 3, 2, 2, 3, 3, 2]);
    }

    #[cfg(feature = "parallel")]
    #[rstest]
    fn parallel_and_sequential_surveys_agree() {
        let strip = |records: Vec<SurveyRecord>| -> Vec<(usize, usize, usize, SeedSet)> {
            records
                .into_iter()
                .map(|record| (record.n, record.a, record.m2, record.contagious_set))
                .collect()
        };
        let sequential = strip(survey().with_parallel(false).run(5..=14).expect("sequential"));
        let parallel = strip(survey().with_parallel(true).run(5..=14).expect("parallel"));
        assert_eq!(sequential, parallel);
    }

    #[rstest]
    fn fixed_offset_survey_skips_invalid_orders() {
        let records = survey()
            .with_parallel(false)
            .run_fixed_offset(2, 5..=12)
            .expect("survey");
        let orders: Vec<usize> = records.iter().map(|record| record.n).collect();
        // Offset 2 is -3 modulo 5, and +3 equals -3 modulo 6.
        assert_eq!(orders, [7, 8, 9, 10, 11, 12]);
        assert!(records.iter().all(|record| record.a == 2));
    }

    #[rstest]
    fn summary_of_no_records_is_none() {
        assert_eq!(summarize(&[]), None);
    }

    #[rstest]
    fn summary_aggregates_records() {
        let records = [record(5, 1, 2), record(5, 2, 2), record(12, 2, 3), record(12, 1, 2)];
        let summary = summarize(&records).expect("non-empty");
        assert_eq!(summary.total_graphs, 4);
        assert_eq!(summary.order_range, (5, 12));
        assert_eq!(summary.m2_range, (2, 3));
        assert!((summary.mean_m2 - 2.25).abs() < f64::EPSILON);
        assert_eq!(summary.total_time, Duration::from_millis(40));
        assert_eq!(summary.mean_time, Duration::from_millis(10));
        assert_eq!(summary.graphs_by_order.get(&12), Some(&2));
    }

    #[rstest]
    #[case::settled(&[3, 2, 4, 4, 4, 4], Stability::Stable { value: 4, from_n: 12 })]
    #[case::near(&[2, 3, 2, 3, 3, 2], Stability::Approximate { low: 2, high: 3, from_n: 12 })]
    #[case::noisy(&[2, 5, 2, 5, 2, 5], Stability::Unstable)]
    fn stability_classification(#[case] values: &[usize], #[case] expected: Stability) {
        let records: Vec<SurveyRecord> = values
            .iter()
            .enumerate()
            .map(|(index, &m2)| record(10 + index, 4, m2))
            .chain([record(30, 5, 9)])
            .collect();
        assert_eq!(stability(&records, 4, 4, 4), expected);
    }

    #[rstest]
    fn stability_without_records_is_unstable() {
        assert_eq!(stability(&[record(10, 1, 2)], 4, 1, 1), Stability::Unstable);
    }

    #[rstest]
    fn record_serializes_elapsed_as_seconds() {
        let json = serde_json::to_value(record(5, 1, 2)).expect("serialize");
        assert_eq!(json["computation_time"], serde_json::json!(0.01));
        assert_eq!(json["contagious_set"]["vertices"], serde_json::json!([0, 1, 2, 3, 4]));
    }
}
