//! Infection-number search and seed-size census.
//!
//! The infection number `m_2` of a graph is the smallest seed size that
//! infects every vertex. Small sizes are settled by testing every subset in
//! lexicographic order; once the subset count exceeds the configured budget
//! the search falls back to structured candidates and seeded random samples,
//! and the result is flagged as inexact.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::{Span, debug, field, instrument};

use crate::{
    Result,
    circulant::{CirculantGraph, STEP},
    seed::{Combinations, SeedSampler, SeedSet, UniformSampler, binomial},
    simulator::Simulator,
    topology::Topology,
};

/// Maximum number of subsets tested exhaustively per seed size by default.
pub const DEFAULT_EXHAUSTIVE_BUDGET: u64 = 250_000;
/// Random candidates drawn per seed size once a size is too large to exhaust.
pub const DEFAULT_RANDOM_CANDIDATES: usize = 50;
/// Seed for the random candidate sampler.
pub const DEFAULT_RNG_SEED: u64 = 42;

const EVEN_SPACING_SHIFTS: usize = 3;
const CONSECUTIVE_STARTS: usize = 5;
const WALK_STARTS: usize = 3;
const PATTERN_STARTS: usize = 2;

/// Result of an infection-number search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfectionNumber {
    /// Smallest seed size found to infect the whole graph.
    pub value: usize,
    /// A contagious seed of size [`Self::value`].
    pub witness: SeedSet,
    /// `true` when every smaller size was ruled out exhaustively.
    pub exact: bool,
}

/// Configures how [`InfectionSearch::infection_number`] explores seed sizes.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, InfectionSearch, Simulator};
///
/// let graph = CirculantGraph::new(12, 2)?;
/// let found = InfectionSearch::new().infection_number(&Simulator::default(), &graph)?;
/// assert_eq!(found.value, 3);
/// assert_eq!(found.witness.vertices(), &[0, 1, 2]);
/// assert!(found.exact);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfectionSearch {
    max_size: Option<usize>,
    exhaustive_budget: u64,
    random_candidates: usize,
    rng_seed: u64,
}

impl Default for InfectionSearch {
    fn default() -> Self {
        Self {
            max_size: None,
            exhaustive_budget: DEFAULT_EXHAUSTIVE_BUDGET,
            random_candidates: DEFAULT_RANDOM_CANDIDATES,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl InfectionSearch {
    /// Creates a search with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the largest seed size tried. Defaults to the graph order.
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Sets how many subsets of one size may be tested exhaustively.
    #[must_use]
    pub fn with_exhaustive_budget(mut self, budget: u64) -> Self {
        self.exhaustive_budget = budget;
        self
    }

    /// Sets how many random candidates are drawn for an inexact size.
    #[must_use]
    pub fn with_random_candidates(mut self, count: usize) -> Self {
        self.random_candidates = count;
        self
    }

    /// Sets the seed of the random candidate sampler.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Returns the configured size cap, if any.
    #[must_use]
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Returns the per-size exhaustive budget.
    #[must_use]
    pub fn exhaustive_budget(&self) -> u64 {
        self.exhaustive_budget
    }

    /// Returns the number of random candidates per inexact size.
    #[must_use]
    pub fn random_candidates(&self) -> usize {
        self.random_candidates
    }

    /// Returns the random candidate seed.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Searches for the infection number of `graph`.
    ///
    /// Sizes are tried in increasing order starting at one. If no size up to
    /// the cap yields a contagious seed, the full vertex set is returned with
    /// `value` equal to the order.
    ///
    /// # Errors
    /// Propagates simulator failures; none occur for seeds built against
    /// `graph` itself.
    #[instrument(
        name = "core.infection_number",
        err,
        skip(self, simulator, graph),
        fields(graph = %graph.name(), value = field::Empty, exact = field::Empty),
    )]
    pub fn infection_number(
        &self,
        simulator: &Simulator,
        graph: &CirculantGraph,
    ) -> Result<InfectionNumber> {
        let order = graph.order();
        let max_size = self.max_size.unwrap_or(order).min(order);
        let mut exhausted_below = true;
        let mut found = None;

        for size in 1..=max_size {
            let exhaustive = self.is_exhaustive(order, size);
            debug!(size, exhaustive, "testing seed size");
            let witness = if exhaustive {
                first_contagious(simulator, graph, Combinations::new(order, size))?
            } else {
                let candidates = self.strategic_candidates(graph, size)?;
                first_contagious(simulator, graph, candidates)?
            };
            if let Some(witness) = witness {
                found = Some(InfectionNumber {
                    value: size,
                    witness,
                    exact: exhausted_below,
                });
                break;
            }
            exhausted_below &= exhaustive;
        }

        let result = found.unwrap_or_else(|| InfectionNumber {
            value: order,
            witness: SeedSet::full(order),
            exact: exhausted_below && max_size + 1 >= order,
        });
        let span = Span::current();
        span.record("value", result.value);
        span.record("exact", result.exact);
        Ok(result)
    }

    fn is_exhaustive(&self, order: usize, size: usize) -> bool {
        binomial(order, size).is_some_and(|count| count <= self.exhaustive_budget)
    }

    /// Builds the heuristic candidates tried for a size too large to exhaust.
    ///
    /// Structured shapes come first (evenly spaced vertices, consecutive
    /// runs, walks alternating `+3` and `+a`, and the `{0, a, 3, a + 3}`
    /// pattern), followed by reproducible random samples. Duplicates are
    /// dropped.
    fn strategic_candidates(&self, graph: &CirculantGraph, size: usize) -> Result<Vec<SeedSet>> {
        let order = graph.order();
        let offset = graph.offset();
        let mut shapes: Vec<BTreeSet<usize>> = Vec::new();

        let spacing = order / size.max(1);
        for shift in 0..spacing.min(EVEN_SPACING_SHIFTS) {
            shapes.push((0..size).map(|i| (shift + i * spacing) % order).collect());
        }
        for start in 0..order.min(CONSECUTIVE_STARTS) {
            shapes.push((0..size).map(|i| (start + i) % order).collect());
        }
        for start in 0..order.min(WALK_STARTS) {
            let mut current = start;
            let mut walk = BTreeSet::from([start]);
            for i in 0..size.saturating_sub(1) {
                current = (current + if i % 2 == 0 { STEP } else { offset }) % order;
                walk.insert(current);
            }
            shapes.push(walk);
        }
        for start in 0..order.min(PATTERN_STARTS) {
            let mut pattern = Vec::with_capacity(4);
            for distance in [0, offset, STEP, offset + STEP] {
                let vertex = (start + distance) % order;
                if !pattern.contains(&vertex) {
                    pattern.push(vertex);
                }
            }
            if pattern.len() >= size {
                shapes.push(pattern.into_iter().take(size).collect());
            }
        }

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for shape in shapes.into_iter().filter(|shape| shape.len() == size) {
            let seed = SeedSet::new(order, shape)?;
            if seen.insert(seed.clone()) {
                candidates.push(seed);
            }
        }

        let mut sampler = UniformSampler::seeded(self.rng_seed);
        let mut drawn = 0;
        let attempts = self.random_candidates.saturating_mul(4);
        for _ in 0..attempts {
            if drawn == self.random_candidates {
                break;
            }
            let seed = sampler.sample(order, size)?;
            if seen.insert(seed.clone()) {
                candidates.push(seed);
                drawn += 1;
            }
        }
        Ok(candidates)
    }
}

/// Checks a claimed infection number exhaustively.
///
/// Returns `true` when some seed of size `claimed` is contagious and no seed
/// of size `claimed - 1` is. Both sizes are enumerated in full regardless of
/// any budget, so this is only practical for small graphs.
///
/// # Errors
/// Propagates simulator failures; none occur for seeds built against
/// `topology` itself.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, Simulator, verify_infection_number};
///
/// let graph = CirculantGraph::new(12, 2)?;
/// let simulator = Simulator::default();
/// assert!(verify_infection_number(&simulator, &graph, 3)?);
/// assert!(!verify_infection_number(&simulator, &graph, 2)?);
/// assert!(!verify_infection_number(&simulator, &graph, 4)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn verify_infection_number<T: Topology + ?Sized>(
    simulator: &Simulator,
    topology: &T,
    claimed: usize,
) -> Result<bool> {
    let order = topology.order();
    let Some(below) = claimed.checked_sub(1) else {
        return Ok(order == 0);
    };
    if first_contagious(simulator, topology, Combinations::new(order, claimed))?.is_none() {
        return Ok(false);
    }
    Ok(first_contagious(simulator, topology, Combinations::new(order, below))?.is_none())
}

/// Lists up to `limit` contagious seeds of `size` in lexicographic order.
///
/// # Errors
/// Propagates simulator failures; none occur for seeds built against
/// `topology` itself.
pub fn contagious_sets<T: Topology + ?Sized>(
    simulator: &Simulator,
    topology: &T,
    size: usize,
    limit: usize,
) -> Result<Vec<SeedSet>> {
    let mut found = Vec::new();
    for seed in Combinations::new(topology.order(), size) {
        if found.len() == limit {
            break;
        }
        if simulator.is_contagious(topology, &seed)? {
            found.push(seed);
        }
    }
    Ok(found)
}

/// Success and failure counts over every seed of one size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedCensus {
    /// Seed size that was enumerated.
    pub size: usize,
    /// Number of seeds tested.
    pub tested: u64,
    /// Number of seeds that infected every vertex.
    pub contagious: u64,
}

impl SeedCensus {
    /// Returns the number of seeds that stalled.
    #[must_use]
    pub fn stalled(&self) -> u64 {
        self.tested - self.contagious
    }

    /// Returns the fraction of contagious seeds, or `0.0` when nothing was
    /// tested.
    #[must_use]
    pub fn success_ratio(&self) -> f64 {
        if self.tested == 0 {
            return 0.0;
        }
        self.contagious as f64 / self.tested as f64
    }
}

/// Runs every seed of `size` and counts how many are contagious.
///
/// # Errors
/// Propagates simulator failures; none occur for seeds built against
/// `topology` itself.
///
/// # Examples
/// ```
/// use quartic_core::{CirculantGraph, Simulator, census};
///
/// let graph = CirculantGraph::new(12, 2)?;
/// let pairs = census(&Simulator::default(), &graph, 2)?;
/// assert_eq!((pairs.tested, pairs.contagious), (66, 0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.census",
    err,
    skip(simulator, topology),
    fields(graph = %topology.name(), tested = field::Empty, contagious = field::Empty),
)]
pub fn census<T: Topology + ?Sized>(
    simulator: &Simulator,
    topology: &T,
    size: usize,
) -> Result<SeedCensus> {
    let mut tested = 0;
    let mut contagious = 0;
    for seed in Combinations::new(topology.order(), size) {
        tested += 1;
        if simulator.is_contagious(topology, &seed)? {
            contagious += 1;
        }
    }
    let span = Span::current();
    span.record("tested", tested);
    span.record("contagious", contagious);
    Ok(SeedCensus {
        size,
        tested,
        contagious,
    })
}

fn first_contagious<T: Topology + ?Sized>(
    simulator: &Simulator,
    topology: &T,
    candidates: impl IntoIterator<Item = SeedSet>,
) -> Result<Option<SeedSet>> {
    for seed in candidates {
        if simulator.is_contagious(topology, &seed)? {
            return Ok(Some(seed));
        }
    }
    Ok(None)
}
