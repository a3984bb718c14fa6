//! Error types for the quartic core library.
//!
//! Defines error enums exposed by the public API, their stable machine-readable
//! codes, and a convenient result alias.

use std::{fmt, num::NonZeroUsize};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing a [`crate::CirculantGraph`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The graph has fewer vertices than the construction supports.
    #[error("graph order {order} is below the minimum of {minimum}")]
    OrderTooSmall {
        /// Requested vertex count.
        order: usize,
        /// Smallest supported vertex count.
        minimum: usize,
    },
    /// `gcd(3, a, n)` is not one, so the graph splits into several components.
    #[error("C_{order}(3,{offset}) is not connected: gcd(3, {offset}, {order}) = {gcd}")]
    Disconnected {
        /// Requested vertex count.
        order: usize,
        /// Requested second offset.
        offset: usize,
        /// Common divisor that disconnects the graph.
        gcd: usize,
    },
    /// The offset coincides with `0` or `±3` modulo the order.
    #[error("offset {offset} collides with 0 or ±3 modulo {order}")]
    OffsetCollision {
        /// Requested vertex count.
        order: usize,
        /// Offset reduced modulo the order.
        offset: usize,
    },
    /// `+a` and `-a` name the same vertex, leaving vertices with degree three.
    #[error("offset {offset} equals n/2 for n = {order}, so +a and -a coincide")]
    SelfInverseOffset {
        /// Requested vertex count.
        order: usize,
        /// Offset reduced modulo the order.
        offset: usize,
    },
    /// `+3` and `-3` name the same vertex, leaving vertices with degree three.
    #[error("step 3 is self-inverse modulo {order}, so +3 and -3 coincide")]
    SelfInverseStep {
        /// Requested vertex count.
        order: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The graph has fewer vertices than the construction supports.
        OrderTooSmall => OrderTooSmall { .. } => "GRAPH_ORDER_TOO_SMALL",
        /// `gcd(3, a, n)` is not one.
        Disconnected => Disconnected { .. } => "GRAPH_DISCONNECTED",
        /// The offset coincides with `0` or `±3`.
        OffsetCollision => OffsetCollision { .. } => "GRAPH_OFFSET_COLLISION",
        /// `+a` and `-a` coincide.
        SelfInverseOffset => SelfInverseOffset { .. } => "GRAPH_SELF_INVERSE_OFFSET",
        /// `+3` and `-3` coincide.
        SelfInverseStep => SelfInverseStep { .. } => "GRAPH_SELF_INVERSE_STEP",
    }
}

/// An error produced while building or applying a [`crate::SeedSet`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SeedError {
    /// A seed vertex does not exist in the graph.
    #[error("vertex {vertex} is out of range for a graph of order {order}")]
    VertexOutOfRange {
        /// The offending vertex label.
        vertex: usize,
        /// Number of vertices in the graph.
        order: usize,
    },
    /// A seed vertex was listed more than once.
    #[error("vertex {vertex} appears more than once in the seed set")]
    DuplicateVertex {
        /// The repeated vertex label.
        vertex: usize,
    },
    /// The seed set contains no vertices.
    #[error("seed set is empty")]
    Empty,
    /// A sampler was asked for more vertices than the graph has.
    #[error("cannot draw {size} distinct vertices from a graph of order {order}")]
    SizeExceedsOrder {
        /// Requested seed size.
        size: usize,
        /// Number of vertices in the graph.
        order: usize,
    },
    /// A seed or state was built for a graph of a different order.
    #[error("seed was built for order {seed_order} but the graph has order {graph_order}")]
    OrderMismatch {
        /// Order the seed or state was validated against.
        seed_order: usize,
        /// Order of the graph it was applied to.
        graph_order: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SeedError`] variants.
    enum SeedErrorCode for SeedError {
        /// A seed vertex does not exist in the graph.
        VertexOutOfRange => VertexOutOfRange { .. } => "SEED_VERTEX_OUT_OF_RANGE",
        /// A seed vertex was listed more than once.
        DuplicateVertex => DuplicateVertex { .. } => "SEED_DUPLICATE_VERTEX",
        /// The seed set contains no vertices.
        Empty => Empty => "SEED_EMPTY",
        /// A sampler was asked for more vertices than the graph has.
        SizeExceedsOrder => SizeExceedsOrder { .. } => "SEED_SIZE_EXCEEDS_ORDER",
        /// A seed or state was built for a graph of a different order.
        OrderMismatch => OrderMismatch { .. } => "SEED_ORDER_MISMATCH",
    }
}

/// Error type produced by the simulator, search, and survey entry points.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum QuarticError {
    /// The infection threshold must be at least one neighbour.
    #[error("threshold must be at least 1 (got {got})")]
    InvalidThreshold {
        /// The invalid threshold supplied by the caller.
        got: usize,
    },
    /// A survey range was empty.
    #[error("order range {min}..={max} is empty")]
    InvalidOrderRange {
        /// Lower bound supplied by the caller.
        min: usize,
        /// Upper bound supplied by the caller.
        max: usize,
    },
    /// Graph construction failed.
    #[error("graph construction failed: {error}")]
    Graph {
        #[source]
        /// Underlying construction error.
        error: GraphError,
    },
    /// Seed validation failed.
    #[error("seed validation failed: {error}")]
    Seed {
        #[source]
        /// Underlying seed error.
        error: SeedError,
    },
}

define_error_codes! {
    /// Stable codes describing [`QuarticError`] variants.
    enum QuarticErrorCode for QuarticError {
        /// The infection threshold must be at least one neighbour.
        InvalidThreshold => InvalidThreshold { .. } => "QUARTIC_INVALID_THRESHOLD",
        /// A survey range was empty.
        InvalidOrderRange => InvalidOrderRange { .. } => "QUARTIC_INVALID_ORDER_RANGE",
        /// Graph construction failed.
        GraphFailure => Graph { .. } => "QUARTIC_GRAPH_FAILURE",
        /// Seed validation failed.
        SeedFailure => Seed { .. } => "QUARTIC_SEED_FAILURE",
    }
}

impl QuarticError {
    /// Retrieve the inner [`GraphErrorCode`] when the error originated in graph construction.
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph { error } => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`SeedErrorCode`] when the error originated in seed validation.
    pub const fn seed_code(&self) -> Option<SeedErrorCode> {
        match self {
            Self::Seed { error } => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) const fn threshold(got: usize) -> core::result::Result<NonZeroUsize, Self> {
        match NonZeroUsize::new(got) {
            Some(threshold) => Ok(threshold),
            None => Err(Self::InvalidThreshold { got }),
        }
    }
}

impl From<GraphError> for QuarticError {
    fn from(error: GraphError) -> Self {
        Self::Graph { error }
    }
}

impl From<SeedError> for QuarticError {
    fn from(error: SeedError) -> Self {
        Self::Seed { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, QuarticError>;
