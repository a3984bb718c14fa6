//! Threshold infection on quartic circulant graphs `C_n(3,a)`.
//!
//! A seed of infected vertices spreads in synchronous rounds: a healthy
//! vertex becomes infected once at least two (by default) of its neighbours
//! are. The crate builds the graphs, runs the process to its fixpoint, and
//! searches for the infection number `m_2`, the smallest seed that infects
//! every vertex.
//!
//! ```
//! use quartic_core::{CirculantGraph, SeedSet, Simulator, Verdict};
//!
//! let graph = CirculantGraph::new(12, 2)?;
//! let trajectory = Simulator::default().run(&graph, &SeedSet::new(12, [0, 1])?)?;
//! assert!(matches!(trajectory.verdict(), Verdict::Stalled { .. }));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod circulant;
mod error;
mod search;
mod seed;
mod simulator;
mod state;
mod survey;
mod topology;
mod trajectory;

pub use crate::{
    circulant::{
        CirculantGraph, CirculantGraphBuilder, MIN_ORDER, Regularity, STEP, enumerate_graphs,
        valid_offsets,
    },
    error::{
        GraphError, GraphErrorCode, QuarticError, QuarticErrorCode, Result, SeedError,
        SeedErrorCode,
    },
    search::{
        DEFAULT_EXHAUSTIVE_BUDGET, DEFAULT_RANDOM_CANDIDATES, DEFAULT_RNG_SEED, InfectionNumber,
        InfectionSearch, SeedCensus, census, contagious_sets, verify_infection_number,
    },
    seed::{Combinations, SeedSampler, SeedSet, UniformSampler, binomial},
    simulator::{DEFAULT_THRESHOLD, Rounds, Simulator, SimulatorBuilder},
    state::{InfectionState, VertexState},
    survey::{
        DEFAULT_APPROXIMATE_WINDOW, DEFAULT_EXACT_WINDOW, Stability, Survey, SurveyRecord,
        SurveySummary, stability, summarize,
    },
    topology::Topology,
    trajectory::{Trajectory, Verdict},
};

#[cfg(test)]
mod test_utils;
