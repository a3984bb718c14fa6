//! Synchronous threshold infection on a [`Topology`].
//!
//! A healthy vertex becomes infected in round `r + 1` when at least
//! `threshold` of its neighbours are infected in round `r`. Every vertex is
//! decided from the round-`r` state alone, infected vertices never recover,
//! and the process stops at the first round that would not change anything.
//! Because infection is monotone the fixpoint is reached within `order`
//! rounds.

mod rounds;

use std::num::NonZeroUsize;

use tracing::{Span, debug, field, instrument};

use crate::{
    Result,
    error::{QuarticError, SeedError},
    seed::SeedSet,
    state::InfectionState,
    topology::Topology,
    trajectory::Trajectory,
};

pub use rounds::Rounds;

/// Infected-neighbour count that infects a healthy vertex unless configured
/// otherwise.
pub const DEFAULT_THRESHOLD: usize = 2;

/// Configures and constructs [`Simulator`] instances.
///
/// # Examples
/// ```
/// use quartic_core::SimulatorBuilder;
///
/// let simulator = SimulatorBuilder::new()
///     .with_threshold(3)
///     .build()
///     .expect("threshold is positive");
/// assert_eq!(simulator.threshold().get(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatorBuilder {
    threshold: usize,
}

impl Default for SimulatorBuilder {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SimulatorBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the infection threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns the configured infection threshold.
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Validates the configuration and constructs a [`Simulator`].
    ///
    /// # Errors
    /// Returns [`QuarticError::InvalidThreshold`] when the threshold is zero.
    ///
    /// # Examples
    /// ```
    /// use quartic_core::{QuarticError, SimulatorBuilder};
    ///
    /// let err = SimulatorBuilder::new().with_threshold(0).build().unwrap_err();
    /// assert_eq!(err, QuarticError::InvalidThreshold { got: 0 });
    /// ```
    pub fn build(self) -> Result<Simulator> {
        let threshold = QuarticError::threshold(self.threshold)?;
        Ok(Simulator { threshold })
    }
}

/// Deterministic stepper for the threshold infection process.
///
/// The simulator holds no state between calls: every operation takes the
/// topology and the current state or seed explicitly.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, SeedSet, Simulator};
///
/// let graph = CirculantGraph::new(12, 2)?;
/// let simulator = Simulator::default();
/// let stalled = SeedSet::new(12, [0, 1])?;
/// let contagious = SeedSet::new(12, [0, 1, 2])?;
/// assert!(!simulator.is_contagious(&graph, &stalled)?);
/// assert!(simulator.is_contagious(&graph, &contagious)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulator {
    threshold: NonZeroUsize,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            threshold: NonZeroUsize::MIN.saturating_add(DEFAULT_THRESHOLD - 1),
        }
    }
}

impl Simulator {
    /// Returns the infected-neighbour count that infects a healthy vertex.
    #[must_use]
    pub fn threshold(&self) -> NonZeroUsize {
        self.threshold
    }

    /// Computes the state one round after `state`.
    ///
    /// At a fixpoint the returned state equals `state`.
    ///
    /// # Errors
    /// Returns [`SeedError::OrderMismatch`] (wrapped in [`QuarticError::Seed`])
    /// when `state` was built for a different number of vertices.
    ///
    /// # Examples
    /// ```
    /// use quartic_core::{CirculantGraph, InfectionState, SeedSet, Simulator};
    ///
    /// let graph = CirculantGraph::new(5, 1)?;
    /// let seed = InfectionState::from_seed(&SeedSet::new(5, [0, 1])?);
    /// let next = Simulator::default().advance(&graph, &seed)?;
    /// assert!(next.is_fully_infected());
    /// assert!(seed.is_subset_of(&next));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn advance<T: Topology + ?Sized>(
        &self,
        topology: &T,
        state: &InfectionState,
    ) -> Result<InfectionState> {
        check_order(state.order(), topology.order())?;
        Ok(self
            .step(topology, state)
            .unwrap_or_else(|| state.clone()))
    }

    /// Returns a lazy iterator over the snapshots of a run from `seed`.
    ///
    /// The iterator yields round zero first and stops after the fixpoint
    /// snapshot. It cannot be restarted; call this method again for a new run.
    ///
    /// # Errors
    /// Returns [`SeedError::OrderMismatch`] when `seed` was validated against a
    /// different order than the topology's.
    pub fn rounds<'a, T: Topology + ?Sized>(
        &self,
        topology: &'a T,
        seed: &SeedSet,
    ) -> Result<Rounds<'a, T>> {
        check_order(seed.order(), topology.order())?;
        Ok(Rounds::new(*self, topology, InfectionState::from_seed(seed)))
    }

    /// Runs the process from `seed` until the state stops changing.
    ///
    /// # Errors
    /// Returns [`SeedError::OrderMismatch`] when `seed` was validated against a
    /// different order than the topology's.
    #[instrument(
        name = "core.simulate",
        err,
        skip(self, topology, seed),
        fields(
            graph = %topology.name(),
            seed_size = seed.len(),
            threshold = %self.threshold,
            rounds = field::Empty,
            verdict = field::Empty,
        ),
    )]
    pub fn run<T: Topology + ?Sized>(&self, topology: &T, seed: &SeedSet) -> Result<Trajectory> {
        let mut snapshots = self.rounds(topology, seed)?;
        let initial = snapshots
            .next()
            .unwrap_or_else(|| InfectionState::from_seed(seed));
        let mut advances = Vec::new();
        for (round, state) in snapshots.enumerate() {
            debug!(
                round = round + 1,
                infected = state.infected_count(),
                "round advanced"
            );
            advances.push(state);
        }
        let trajectory = Trajectory::new(initial, advances);

        let span = Span::current();
        span.record("rounds", trajectory.fixpoint_round());
        span.record("verdict", trajectory.verdict().label());
        Ok(trajectory)
    }

    /// Returns whether a run from `seed` infects every vertex.
    ///
    /// Equivalent to `run(..)?.is_fully_infected()` without retaining the
    /// intermediate snapshots.
    ///
    /// # Errors
    /// Returns [`SeedError::OrderMismatch`] when `seed` was validated against a
    /// different order than the topology's.
    pub fn is_contagious<T: Topology + ?Sized>(
        &self,
        topology: &T,
        seed: &SeedSet,
    ) -> Result<bool> {
        check_order(seed.order(), topology.order())?;
        let mut state = InfectionState::from_seed(seed);
        while let Some(next) = self.step(topology, &state) {
            state = next;
        }
        Ok(state.is_fully_infected())
    }

    /// Applies one synchronous round, returning `None` when nothing changes.
    pub(crate) fn step<T: Topology + ?Sized>(
        &self,
        topology: &T,
        state: &InfectionState,
    ) -> Option<InfectionState> {
        let threshold = self.threshold.get();
        let mut next = state.clone();
        let mut changed = false;
        for vertex in state.healthy_vertices() {
            let infected_neighbours = topology
                .neighbours(vertex)
                .iter()
                .filter(|&&neighbour| state.is_infected(neighbour))
                .count();
            if infected_neighbours >= threshold {
                changed |= next.infect(vertex);
            }
        }
        changed.then_some(next)
    }
}

fn check_order(seed_order: usize, graph_order: usize) -> Result<()> {
    if seed_order == graph_order {
        return Ok(());
    }
    Err(SeedError::OrderMismatch {
        seed_order,
        graph_order,
    }
    .into())
}

#[cfg(test)]
mod property;
