//! Property-based checks for the threshold stepper.
//!
//! Covers monotonicity of successive snapshots, termination within `order`
//! rounds, determinism across repeated runs, and agreement between the
//! eager and lazy entry points on arbitrary valid circulants.

use proptest::prelude::*;

use super::{Simulator, SimulatorBuilder};
use crate::{
    circulant::{CirculantGraph, valid_offsets},
    seed::SeedSet,
    test_utils::suite_proptest_config,
    topology::Topology,
};

const MIN_ORDER: usize = 5;
const MAX_ORDER: usize = 40;

#[derive(Debug, Clone)]
struct Fixture {
    graph: CirculantGraph,
    seed: SeedSet,
    threshold: usize,
}

fn fixture_strategy() -> impl Strategy<Value = Fixture> {
    (MIN_ORDER..=MAX_ORDER)
        .prop_filter("order admits a quartic circulant", |&order| {
            !valid_offsets(order).is_empty()
        })
        .prop_flat_map(|order| {
            (
                prop::sample::select(valid_offsets(order)),
                prop::collection::btree_set(0..order, 0..=order.min(8)),
                1_usize..=4,
            )
                .prop_map(move |(offset, vertices, threshold)| Fixture {
                    graph: CirculantGraph::new(order, offset).expect("offset drawn from valid set"),
                    seed: SeedSet::new(order, vertices).expect("vertices drawn in range"),
                    threshold,
                })
        })
}

fn simulator(threshold: usize) -> Simulator {
    SimulatorBuilder::new()
        .with_threshold(threshold)
        .build()
        .expect("strategy draws positive thresholds")
}

fn run_monotone_property(fixture: &Fixture) -> Result<(), TestCaseError> {
    let trajectory = simulator(fixture.threshold)
        .run(&fixture.graph, &fixture.seed)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let snapshots: Vec<_> = trajectory.snapshots().collect();
    for pair in snapshots.windows(2) {
        prop_assert!(pair[0].is_subset_of(pair[1]));
        prop_assert!(pair[0].infected_count() < pair[1].infected_count());
    }
    prop_assert_eq!(
        trajectory.initial().infected_vertices().collect::<Vec<_>>(),
        fixture.seed.vertices().to_vec()
    );
    Ok(())
}

fn run_termination_property(fixture: &Fixture) -> Result<(), TestCaseError> {
    let simulator = simulator(fixture.threshold);
    let trajectory = simulator
        .run(&fixture.graph, &fixture.seed)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert!(trajectory.fixpoint_round() <= fixture.graph.order());
    let last = trajectory.final_state();
    let next = simulator
        .advance(&fixture.graph, last)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(&next, last);
    Ok(())
}

fn run_determinism_property(fixture: &Fixture) -> Result<(), TestCaseError> {
    let simulator = simulator(fixture.threshold);
    let first = simulator
        .run(&fixture.graph, &fixture.seed)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    let second = simulator
        .run(&fixture.graph, &fixture.seed)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(&first, &second);

    let lazy: Vec<_> = simulator
        .rounds(&fixture.graph, &fixture.seed)
        .map_err(|err| TestCaseError::fail(err.to_string()))?
        .collect();
    let eager: Vec<_> = first.snapshots().cloned().collect();
    prop_assert_eq!(lazy, eager);

    let contagious = simulator
        .is_contagious(&fixture.graph, &fixture.seed)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert_eq!(contagious, first.is_fully_infected());
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn snapshots_grow_monotonically(fixture in fixture_strategy()) {
        run_monotone_property(&fixture)?;
    }

    #[test]
    fn runs_terminate_within_order_rounds(fixture in fixture_strategy()) {
        run_termination_property(&fixture)?;
    }

    #[test]
    fn runs_are_deterministic(fixture in fixture_strategy()) {
        run_determinism_property(&fixture)?;
    }
}
