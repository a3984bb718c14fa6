//! Snapshot sequences produced by running the simulator to a fixpoint.

use std::iter;

use serde::Serialize;

use crate::state::InfectionState;

/// Outcome of a run once the fixpoint has been reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    /// Every vertex ended up infected.
    FullyInfected,
    /// The process stopped with healthy vertices left.
    Stalled {
        /// Vertices that were never infected, in ascending order.
        healthy: Vec<usize>,
    },
}

impl Verdict {
    /// Returns whether the run infected every vertex.
    #[must_use]
    pub fn is_fully_infected(&self) -> bool {
        matches!(self, Self::FullyInfected)
    }

    /// Returns a stable label for reports and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullyInfected => "fully_infected",
            Self::Stalled { .. } => "stalled",
        }
    }
}

/// Ordered snapshots from round zero (the seed) to the fixpoint.
///
/// Consecutive snapshots differ: the state that would repeat the last one is
/// not stored, so [`Self::fixpoint_round`] is the index of the final snapshot.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, SeedSet, Simulator, Verdict};
///
/// let graph = CirculantGraph::new(5, 1)?;
/// let seed = SeedSet::new(5, [0, 1])?;
/// let trajectory = Simulator::default().run(&graph, &seed)?;
/// assert_eq!(trajectory.fixpoint_round(), 1);
/// assert_eq!(trajectory.verdict(), Verdict::FullyInfected);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    initial: InfectionState,
    advances: Vec<InfectionState>,
}

impl Trajectory {
    pub(crate) fn new(initial: InfectionState, advances: Vec<InfectionState>) -> Self {
        Self { initial, advances }
    }

    /// Returns the round-zero state.
    #[must_use]
    pub fn initial(&self) -> &InfectionState {
        &self.initial
    }

    /// Returns the fixpoint state.
    #[must_use]
    pub fn final_state(&self) -> &InfectionState {
        self.advances.last().unwrap_or(&self.initial)
    }

    /// Returns the snapshot for `round`, if the run got that far.
    #[must_use]
    pub fn snapshot(&self, round: usize) -> Option<&InfectionState> {
        match round.checked_sub(1) {
            None => Some(&self.initial),
            Some(index) => self.advances.get(index),
        }
    }

    /// Iterates over every snapshot in round order.
    pub fn snapshots(&self) -> impl Iterator<Item = &InfectionState> + '_ {
        iter::once(&self.initial).chain(&self.advances)
    }

    /// Returns the number of stored snapshots, including round zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.advances.len() + 1
    }

    /// Always `false`: a trajectory holds at least the seed snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the round at which the state stopped changing.
    #[must_use]
    pub fn fixpoint_round(&self) -> usize {
        self.advances.len()
    }

    /// Returns whether the fixpoint infects every vertex.
    #[must_use]
    pub fn is_fully_infected(&self) -> bool {
        self.final_state().is_fully_infected()
    }

    /// Returns the vertices left healthy at the fixpoint.
    #[must_use]
    pub fn stalled_vertices(&self) -> Vec<usize> {
        self.final_state().healthy_vertices().collect()
    }

    /// Returns the final verdict.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.is_fully_infected() {
            Verdict::FullyInfected
        } else {
            Verdict::Stalled {
                healthy: self.stalled_vertices(),
            }
        }
    }

    /// Returns the vertices that became infected in `round`.
    ///
    /// Round zero reports the seed itself.
    #[must_use]
    pub fn newly_infected(&self, round: usize) -> Option<Vec<usize>> {
        let current = self.snapshot(round)?;
        let vertices = match round.checked_sub(1).and_then(|previous| self.snapshot(previous)) {
            Some(previous) => current.newly_infected_since(previous).collect(),
            None => current.infected_vertices().collect(),
        };
        Some(vertices)
    }
}
