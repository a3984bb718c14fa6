//! Shared test utilities for `quartic-core`.

use proptest::test_runner::Config as ProptestConfig;
use quartic_test_support::ci::property_test_profile::ProptestRunProfile;

use crate::topology::Topology;

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `QUARTIC_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Undirected [`Topology`] assembled from an explicit edge list.
///
/// Lets simulator tests run on shapes that are not circulant, such as paths
/// and stars.
#[derive(Debug, Clone)]
pub(crate) struct EdgeListTopology {
    name: &'static str,
    adjacency: Vec<Vec<usize>>,
}

impl EdgeListTopology {
    /// Builds a topology of `order` vertices joined by `edges`.
    ///
    /// # Panics
    /// Panics when an edge endpoint is out of range.
    #[must_use]
    pub(crate) fn new(name: &'static str, order: usize, edges: &[(usize, usize)]) -> Self {
        let mut adjacency = vec![Vec::new(); order];
        for &(left, right) in edges {
            assert!(left < order && right < order, "edge ({left}, {right}) out of range");
            adjacency[left].push(right);
            adjacency[right].push(left);
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }
        Self { name, adjacency }
    }

    /// Builds the path `0 - 1 - … - (order - 1)`.
    #[must_use]
    pub(crate) fn path(order: usize) -> Self {
        let edges: Vec<(usize, usize)> = (1..order).map(|vertex| (vertex - 1, vertex)).collect();
        Self::new("path", order, &edges)
    }
}

impl Topology for EdgeListTopology {
    fn order(&self) -> usize {
        self.adjacency.len()
    }

    fn name(&self) -> &str {
        self.name
    }

    fn neighbours(&self, vertex: usize) -> &[usize] {
        self.adjacency.get(vertex).map_or(&[][..], Vec::as_slice)
    }
}
