use quartic_core::{
    CirculantGraph, GraphError, GraphErrorCode, QuarticError, QuarticErrorCode, SeedError,
    SeedErrorCode, SeedSet,
};
use rstest::rstest;

#[rstest]
#[case(GraphError::OrderTooSmall { order: 3, minimum: 4 }, "GRAPH_ORDER_TOO_SMALL")]
#[case(
    GraphError::Disconnected { order: 9, offset: 3, gcd: 3 },
    "GRAPH_DISCONNECTED",
)]
#[case(GraphError::OffsetCollision { order: 10, offset: 7 }, "GRAPH_OFFSET_COLLISION")]
#[case(GraphError::SelfInverseOffset { order: 10, offset: 5 }, "GRAPH_SELF_INVERSE_OFFSET")]
#[case(GraphError::SelfInverseStep { order: 6 }, "GRAPH_SELF_INVERSE_STEP")]
fn graph_codes_are_stable(#[case] error: GraphError, #[case] expected: &str) {
    assert_eq!(error.code().as_str(), expected);
    assert_eq!(error.code().to_string(), expected);
}

#[rstest]
#[case(SeedError::VertexOutOfRange { vertex: 5, order: 5 }, SeedErrorCode::VertexOutOfRange)]
#[case(SeedError::DuplicateVertex { vertex: 1 }, SeedErrorCode::DuplicateVertex)]
#[case(SeedError::Empty, SeedErrorCode::Empty)]
#[case(SeedError::SizeExceedsOrder { size: 6, order: 5 }, SeedErrorCode::SizeExceedsOrder)]
#[case(
    SeedError::OrderMismatch { seed_order: 5, graph_order: 7 },
    SeedErrorCode::OrderMismatch,
)]
fn returns_expected_seed_code(#[case] error: SeedError, #[case] expected: SeedErrorCode) {
    assert_eq!(error.code(), expected);
    assert!(error.code().as_str().starts_with("SEED_"));
}

#[rstest]
#[case(QuarticError::InvalidThreshold { got: 0 }, QuarticErrorCode::InvalidThreshold, None, None)]
#[case(
    QuarticError::InvalidOrderRange { min: 9, max: 5 },
    QuarticErrorCode::InvalidOrderRange,
    None,
    None,
)]
#[case(
    QuarticError::from(GraphError::SelfInverseStep { order: 6 }),
    QuarticErrorCode::GraphFailure,
    Some(GraphErrorCode::SelfInverseStep),
    None,
)]
#[case(
    QuarticError::from(SeedError::Empty),
    QuarticErrorCode::SeedFailure,
    None,
    Some(SeedErrorCode::Empty),
)]
fn returns_expected_quartic_code(
    #[case] error: QuarticError,
    #[case] expected: QuarticErrorCode,
    #[case] graph_code: Option<GraphErrorCode>,
    #[case] seed_code: Option<SeedErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.graph_code(), graph_code);
    assert_eq!(error.seed_code(), seed_code);
}

#[rstest]
fn construction_errors_surface_their_codes() {
    let graph = CirculantGraph::new(10, 5).expect_err("offset 5 is n/2");
    assert_eq!(graph.code(), GraphErrorCode::SelfInverseOffset);

    let seed = SeedSet::new(4, [4]).expect_err("vertex 4 is out of range");
    assert_eq!(seed.code(), SeedErrorCode::VertexOutOfRange);
}

#[rstest]
fn wrapped_errors_expose_their_source() {
    use std::error::Error as _;

    let error = QuarticError::from(SeedError::DuplicateVertex { vertex: 2 });
    let source = error.source().map(ToString::to_string);
    assert_eq!(
        source.as_deref(),
        Some("vertex 2 appears more than once in the seed set")
    );
}
