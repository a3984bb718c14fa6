//! Per-vertex and whole-graph infection state.

use crate::seed::SeedSet;

/// Infection status of a single vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexState {
    /// The vertex has not been infected.
    Healthy,
    /// The vertex is infected and stays infected.
    Infected,
}

/// Snapshot of every vertex's [`VertexState`] at one round.
///
/// # Examples
/// ```
/// use quartic_core::{InfectionState, SeedSet, VertexState};
///
/// let seed = SeedSet::new(5, [0, 3])?;
/// let state = InfectionState::from_seed(&seed);
/// assert_eq!(state.order(), 5);
/// assert_eq!(state.infected_count(), 2);
/// assert_eq!(state.get(3), Some(VertexState::Infected));
/// assert_eq!(state.healthy_vertices().collect::<Vec<_>>(), [1, 2, 4]);
/// # Ok::<(), quartic_core::SeedError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InfectionState {
    vertices: Vec<VertexState>,
    infected: usize,
}

impl InfectionState {
    /// Builds a state of `order` vertices with none infected.
    #[must_use]
    pub fn healthy(order: usize) -> Self {
        Self {
            vertices: vec![VertexState::Healthy; order],
            infected: 0,
        }
    }

    /// Builds the round-zero state where exactly the seed vertices are infected.
    #[must_use]
    pub fn from_seed(seed: &SeedSet) -> Self {
        let mut state = Self::healthy(seed.order());
        for &vertex in seed.vertices() {
            state.infect(vertex);
        }
        state
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn order(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the state of `vertex`, or `None` when it is out of range.
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<VertexState> {
        self.vertices.get(vertex).copied()
    }

    /// Returns whether `vertex` is infected; out-of-range vertices are not.
    #[must_use]
    pub fn is_infected(&self, vertex: usize) -> bool {
        self.get(vertex) == Some(VertexState::Infected)
    }

    /// Returns how many vertices are infected.
    #[must_use]
    pub fn infected_count(&self) -> usize {
        self.infected
    }

    /// Returns how many vertices are healthy.
    #[must_use]
    pub fn healthy_count(&self) -> usize {
        self.order() - self.infected
    }

    /// Returns whether every vertex is infected.
    ///
    /// A state with no vertices counts as fully infected.
    #[must_use]
    pub fn is_fully_infected(&self) -> bool {
        self.infected == self.order()
    }

    /// Iterates over the infected vertices in ascending order.
    pub fn infected_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertices_in(VertexState::Infected)
    }

    /// Iterates over the healthy vertices in ascending order.
    pub fn healthy_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.vertices_in(VertexState::Healthy)
    }

    /// Returns whether every vertex infected here is also infected in `other`.
    ///
    /// States of different orders are never subsets of one another.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.order() == other.order()
            && self
                .infected_vertices()
                .all(|vertex| other.is_infected(vertex))
    }

    /// Iterates over vertices infected in `self` but healthy in `earlier`.
    ///
    /// Renderers use this to highlight the vertices that changed between two
    /// consecutive rounds.
    pub fn newly_infected_since<'a>(
        &'a self,
        earlier: &'a Self,
    ) -> impl Iterator<Item = usize> + 'a {
        self.infected_vertices()
            .filter(move |&vertex| !earlier.is_infected(vertex))
    }

    /// Marks `vertex` infected, returning whether it changed.
    pub(crate) fn infect(&mut self, vertex: usize) -> bool {
        match self.vertices.get_mut(vertex) {
            Some(slot) if *slot == VertexState::Healthy => {
                *slot = VertexState::Infected;
                self.infected += 1;
                true
            }
            _ => false,
        }
    }

    fn vertices_in(&self, wanted: VertexState) -> impl Iterator<Item = usize> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(move |(_, state)| **state == wanted)
            .map(|(vertex, _)| vertex)
    }
}
