//! Quartic circulant graphs `C_n(3,a)`.
//!
//! Vertex `i` of `C_n(3,a)` is adjacent to `i ± 3` and `i ± a` modulo `n`.
//! Construction validates connectivity (`gcd(3, a, n) = 1`) and, unless
//! relaxed, that all four offsets are distinct so every vertex has degree
//! four.

use std::{fmt, ops::RangeInclusive};

use crate::{error::GraphError, topology::Topology};

/// Fixed first offset of the connection set.
pub const STEP: usize = 3;

/// Smallest order accepted by [`CirculantGraph`] construction.
pub const MIN_ORDER: usize = 4;

/// How strictly [`CirculantGraphBuilder::build`] validates the offsets.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, Regularity, Topology};
///
/// assert!(CirculantGraph::new(6, 1).is_err());
/// let relaxed = CirculantGraph::builder(6, 1)
///     .with_regularity(Regularity::Connected)
///     .build()
///     .expect("C_6(3,1) is connected");
/// assert_eq!(relaxed.degree(0), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Regularity {
    /// Require four distinct neighbours per vertex.
    #[default]
    Quartic,
    /// Only require a connected graph without self-loops; coinciding offsets
    /// collapse into a single neighbour.
    Connected,
}

/// Configures and constructs [`CirculantGraph`] instances.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, Regularity, Topology};
///
/// let builder = CirculantGraph::builder(12, 2);
/// assert_eq!(builder.regularity(), Regularity::Quartic);
/// let graph = builder.build().expect("C_12(3,2) is quartic");
/// assert_eq!(graph.name(), "C_12(3,2)");
/// ```
#[derive(Debug, Clone)]
pub struct CirculantGraphBuilder {
    order: usize,
    offset: usize,
    regularity: Regularity,
}

impl CirculantGraphBuilder {
    /// Creates a builder for `C_order(3,offset)` with quartic validation.
    #[must_use]
    pub fn new(order: usize, offset: usize) -> Self {
        Self {
            order,
            offset,
            regularity: Regularity::default(),
        }
    }

    /// Overrides the validation mode.
    #[must_use]
    pub fn with_regularity(mut self, regularity: Regularity) -> Self {
        self.regularity = regularity;
        self
    }

    /// Returns the configured validation mode.
    #[must_use]
    pub fn regularity(&self) -> Regularity {
        self.regularity
    }

    /// Validates the parameters and builds the adjacency lists.
    ///
    /// # Errors
    /// Returns [`GraphError::OrderTooSmall`] below [`MIN_ORDER`],
    /// [`GraphError::Disconnected`] when `gcd(3, a, n) != 1`, and
    /// [`GraphError::OffsetCollision`] when the offset reduces to zero. Quartic
    /// validation additionally rejects offsets equal to `±3`
    /// ([`GraphError::OffsetCollision`]), offsets equal to `n/2`
    /// ([`GraphError::SelfInverseOffset`]), and orders dividing six
    /// ([`GraphError::SelfInverseStep`]).
    pub fn build(self) -> Result<CirculantGraph, GraphError> {
        let Self {
            order,
            offset,
            regularity,
        } = self;
        if order < MIN_ORDER {
            return Err(GraphError::OrderTooSmall {
                order,
                minimum: MIN_ORDER,
            });
        }

        let common = gcd(gcd(STEP, offset), order);
        if common != 1 {
            return Err(GraphError::Disconnected {
                order,
                offset,
                gcd: common,
            });
        }

        let reduced = offset % order;
        if reduced == 0 {
            return Err(GraphError::OffsetCollision {
                order,
                offset: reduced,
            });
        }

        if regularity == Regularity::Quartic {
            validate_quartic(order, reduced)?;
        }

        Ok(CirculantGraph::from_validated(order, reduced))
    }
}

fn validate_quartic(order: usize, offset: usize) -> Result<(), GraphError> {
    if offset == STEP || offset == order - STEP {
        return Err(GraphError::OffsetCollision { order, offset });
    }
    if (2 * offset) % order == 0 {
        return Err(GraphError::SelfInverseOffset { order, offset });
    }
    if (2 * STEP) % order == 0 {
        return Err(GraphError::SelfInverseStep { order });
    }
    Ok(())
}

/// The circulant graph `C_n(3,a) = Cay(Z_n, {±3, ±a})`.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, Topology};
///
/// let graph = CirculantGraph::new(12, 2).expect("valid parameters");
/// assert_eq!(graph.order(), 12);
/// assert_eq!(graph.neighbours(0), &[2, 3, 9, 10]);
/// assert!(graph.is_quartic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CirculantGraph {
    order: usize,
    offset: usize,
    name: String,
    adjacency: Vec<Vec<usize>>,
}

impl CirculantGraph {
    /// Builds `C_order(3,offset)` with full quartic validation.
    ///
    /// # Errors
    /// See [`CirculantGraphBuilder::build`].
    pub fn new(order: usize, offset: usize) -> Result<Self, GraphError> {
        CirculantGraphBuilder::new(order, offset).build()
    }

    /// Returns a builder for `C_order(3,offset)`.
    #[must_use]
    pub fn builder(order: usize, offset: usize) -> CirculantGraphBuilder {
        CirculantGraphBuilder::new(order, offset)
    }

    fn from_validated(order: usize, offset: usize) -> Self {
        let adjacency = (0..order)
            .map(|vertex| {
                let mut neighbours = vec![
                    (vertex + STEP) % order,
                    (vertex + order - STEP) % order,
                    (vertex + offset) % order,
                    (vertex + order - offset) % order,
                ];
                neighbours.sort_unstable();
                neighbours.dedup();
                neighbours.retain(|&neighbour| neighbour != vertex);
                neighbours
            })
            .collect();
        Self {
            order,
            offset,
            name: format!("C_{order}({STEP},{offset})"),
            adjacency,
        }
    }

    /// Returns the second offset `a`, reduced modulo the order.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns whether every vertex has exactly four distinct neighbours.
    #[must_use]
    pub fn is_quartic(&self) -> bool {
        self.adjacency.iter().all(|neighbours| neighbours.len() == 4)
    }

    /// Iterates over each undirected edge once as `(u, v)` with `u < v`.
    ///
    /// # Examples
    /// ```
    /// use quartic_core::CirculantGraph;
    ///
    /// let graph = CirculantGraph::new(7, 1).expect("valid parameters");
    /// assert_eq!(graph.edges().count(), 14);
    /// assert!(graph.edges().all(|(u, v)| u < v));
    /// ```
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(vertex, neighbours)| {
                neighbours
                    .iter()
                    .copied()
                    .filter(move |&neighbour| vertex < neighbour)
                    .map(move |neighbour| (vertex, neighbour))
            })
    }
}

impl Topology for CirculantGraph {
    fn order(&self) -> usize {
        self.order
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn neighbours(&self, vertex: usize) -> &[usize] {
        self.adjacency.get(vertex).map_or(&[][..], Vec::as_slice)
    }
}

impl fmt::Display for CirculantGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with {} vertices", self.name, self.order)
    }
}

/// Lists every offset `a` in `1..n` for which [`CirculantGraph::new`] succeeds.
///
/// # Examples
/// ```
/// use quartic_core::valid_offsets;
///
/// assert_eq!(valid_offsets(5), vec![1, 4]);
/// assert!(valid_offsets(6).is_empty());
/// assert_eq!(valid_offsets(12), vec![1, 2, 4, 5, 7, 8, 10, 11]);
/// ```
#[must_use]
pub fn valid_offsets(order: usize) -> Vec<usize> {
    if order < MIN_ORDER || (2 * STEP) % order == 0 {
        return Vec::new();
    }
    (1..order)
        .filter(|&offset| {
            gcd(gcd(STEP, offset), order) == 1
                && offset != STEP
                && offset != order - STEP
                && (2 * offset) % order != 0
        })
        .collect()
}

/// Builds every valid quartic `C_n(3,a)` for `n` in `orders`, ordered by `n`
/// then `a`.
///
/// # Examples
/// ```
/// use quartic_core::enumerate_graphs;
///
/// let names: Vec<String> = enumerate_graphs(5..=6)
///     .map(|graph| graph.to_string())
///     .collect();
/// assert_eq!(names, ["C_5(3,1) with 5 vertices", "C_5(3,4) with 5 vertices"]);
/// ```
pub fn enumerate_graphs(orders: RangeInclusive<usize>) -> impl Iterator<Item = CirculantGraph> {
    orders.flat_map(|order| {
        valid_offsets(order)
            .into_iter()
            .map(move |offset| CirculantGraph::from_validated(order, offset))
    })
}

pub(crate) fn gcd(mut left: usize, mut right: usize) -> usize {
    while right != 0 {
        (left, right) = (right, left % right);
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(3, 1, 1)]
    #[case(3, 12, 3)]
    #[case(12, 18, 6)]
    #[case(0, 7, 7)]
    fn gcd_matches_euclid(#[case] left: usize, #[case] right: usize, #[case] expected: usize) {
        assert_eq!(gcd(left, right), expected);
    }

    #[rstest]
    #[case::too_small(3, 1, GraphError::OrderTooSmall { order: 3, minimum: MIN_ORDER })]
    #[case::shares_three(12, 6, GraphError::Disconnected { order: 12, offset: 6, gcd: 3 })]
    #[case::zero_offset(7, 14, GraphError::OffsetCollision { order: 7, offset: 0 })]
    #[case::plus_three(8, 3, GraphError::OffsetCollision { order: 8, offset: 3 })]
    #[case::minus_three(8, 5, GraphError::OffsetCollision { order: 8, offset: 5 })]
    #[case::half_order(10, 5, GraphError::SelfInverseOffset { order: 10, offset: 5 })]
    #[case::order_six(6, 1, GraphError::SelfInverseStep { order: 6 })]
    fn new_rejects_invalid_parameters(
        #[case] order: usize,
        #[case] offset: usize,
        #[case] expected: GraphError,
    ) {
        let err = CirculantGraph::new(order, offset).expect_err("parameters must be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn offsets_are_reduced_modulo_order() {
        let graph = CirculantGraph::new(7, 9).expect("C_7(3,2) is valid");
        assert_eq!(graph.offset(), 2);
        assert_eq!(graph.name(), "C_7(3,2)");
    }

    #[rstest]
    #[case(5, 1)]
    #[case(12, 2)]
    #[case(16, 7)]
    fn neighbours_follow_connection_set(#[case] order: usize, #[case] offset: usize) {
        let graph = CirculantGraph::new(order, offset).expect("valid parameters");
        for vertex in 0..order {
            let mut expected = vec![
                (vertex + 3) % order,
                (vertex + order - 3) % order,
                (vertex + offset) % order,
                (vertex + order - offset) % order,
            ];
            expected.sort_unstable();
            assert_eq!(graph.neighbours(vertex), expected.as_slice());
        }
        assert!(graph.is_quartic());
    }

    #[rstest]
    fn relaxed_graph_collapses_coinciding_offsets() {
        let graph = CirculantGraph::builder(6, 1)
            .with_regularity(Regularity::Connected)
            .build()
            .expect("C_6(3,1) is connected");
        assert_eq!(graph.neighbours(0), &[1, 3, 5]);
        assert_eq!(graph.neighbours(2), &[1, 3, 5]);
        assert!(!graph.is_quartic());
    }

    #[rstest]
    fn relaxed_graph_still_requires_connectivity() {
        let err = CirculantGraph::builder(9, 3)
            .with_regularity(Regularity::Connected)
            .build()
            .expect_err("C_9(3,3) is disconnected");
        assert_eq!(err.code().as_str(), "GRAPH_DISCONNECTED");
    }

    #[rstest]
    fn neighbours_out_of_range_are_empty() {
        let graph = CirculantGraph::new(5, 1).expect("valid parameters");
        assert!(graph.neighbours(5).is_empty());
    }

    #[rstest]
    fn valid_offsets_agree_with_construction() {
        for order in 1..=24 {
            let offsets = valid_offsets(order);
            for offset in 1..order {
                assert_eq!(
                    CirculantGraph::new(order, offset).is_ok(),
                    offsets.contains(&offset),
                    "C_{order}(3,{offset})"
                );
            }
        }
    }

    #[rstest]
    #[case(5..=11, 30)]
    #[case(12..=12, 8)]
    #[case(6..=6, 0)]
    fn enumerate_graphs_counts_valid_pairs(
        #[case] orders: RangeInclusive<usize>,
        #[case] expected: usize,
    ) {
        assert_eq!(enumerate_graphs(orders).count(), expected);
    }

    #[rstest]
    fn every_edge_is_listed_once() {
        let graph = CirculantGraph::new(12, 5).expect("valid parameters");
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges.len(), 24);
        let mut deduped = edges.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), edges.len());
    }
}
