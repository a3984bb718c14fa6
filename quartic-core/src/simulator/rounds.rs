use std::iter::FusedIterator;

use crate::{state::InfectionState, topology::Topology};

use super::Simulator;

/// Lazy iterator over the snapshots of one run.
///
/// Yields the seed state first, then each state that differs from its
/// predecessor, and finishes once the fixpoint snapshot has been returned.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, SeedSet, Simulator};
///
/// let graph = CirculantGraph::new(12, 2)?;
/// let seed = SeedSet::new(12, [0, 1, 2])?;
/// let counts: Vec<usize> = Simulator::default()
///     .rounds(&graph, &seed)?
///     .map(|state| state.infected_count())
///     .collect();
/// assert_eq!(counts, [3, 7, 12]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Rounds<'a, T: Topology + ?Sized> {
    simulator: Simulator,
    topology: &'a T,
    pending: Option<InfectionState>,
}

impl<'a, T: Topology + ?Sized> Rounds<'a, T> {
    pub(super) fn new(simulator: Simulator, topology: &'a T, seed: InfectionState) -> Self {
        Self {
            simulator,
            topology,
            pending: Some(seed),
        }
    }
}

impl<T: Topology + ?Sized> Iterator for Rounds<'_, T> {
    type Item = InfectionState;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.pending.take()?;
        self.pending = self.simulator.step(self.topology, &current);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.pending {
            None => (0, Some(0)),
            // Each further snapshot infects at least one more vertex.
            Some(state) => (1, Some(state.healthy_count() + 1)),
        }
    }
}

impl<T: Topology + ?Sized> FusedIterator for Rounds<'_, T> {}
