//! Seed sets and the strategies that choose them.
//!
//! The simulator itself is deterministic. Randomness only enters through a
//! [`SeedSampler`] that a caller uses to pick the round-zero infections.

use rand::{SeedableRng, rngs::SmallRng, seq::index};
use serde::Serialize;

use crate::error::SeedError;

/// A validated set of initially infected vertices.
///
/// Vertices are stored sorted and without duplicates. The set remembers the
/// graph order it was validated against so it cannot be replayed on a graph
/// of a different size.
///
/// # Examples
/// ```
/// use quartic_core::{SeedError, SeedSet};
///
/// let seed = SeedSet::new(12, [2, 0, 1])?;
/// assert_eq!(seed.vertices(), &[0, 1, 2]);
/// assert_eq!(seed.to_string(), "{0, 1, 2}");
///
/// let err = SeedSet::new(12, [0, 12]).expect_err("12 is out of range");
/// assert_eq!(err, SeedError::VertexOutOfRange { vertex: 12, order: 12 });
/// # Ok::<(), SeedError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SeedSet {
    order: usize,
    vertices: Vec<usize>,
}

impl SeedSet {
    /// Validates `vertices` against a graph with `order` vertices.
    ///
    /// An empty seed is accepted; use [`Self::ensure_non_empty`] where an
    /// empty seed must be rejected.
    ///
    /// # Errors
    /// Returns [`SeedError::VertexOutOfRange`] for vertices `>= order` and
    /// [`SeedError::DuplicateVertex`] when a vertex is listed twice.
    pub fn new(order: usize, vertices: impl IntoIterator<Item = usize>) -> Result<Self, SeedError> {
        let mut vertices: Vec<usize> = vertices.into_iter().collect();
        if let Some(&vertex) = vertices.iter().find(|&&vertex| vertex >= order) {
            return Err(SeedError::VertexOutOfRange { vertex, order });
        }
        vertices.sort_unstable();
        if let Some(pair) = vertices.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(SeedError::DuplicateVertex { vertex: pair[0] });
        }
        Ok(Self { order, vertices })
    }

    /// Returns the empty seed for a graph with `order` vertices.
    #[must_use]
    pub fn empty(order: usize) -> Self {
        Self {
            order,
            vertices: Vec::new(),
        }
    }

    /// Returns the seed containing every vertex.
    #[must_use]
    pub fn full(order: usize) -> Self {
        Self {
            order,
            vertices: (0..order).collect(),
        }
    }

    /// Rejects the empty seed.
    ///
    /// # Errors
    /// Returns [`SeedError::Empty`] when the seed has no vertices.
    pub fn ensure_non_empty(self) -> Result<Self, SeedError> {
        if self.vertices.is_empty() {
            return Err(SeedError::Empty);
        }
        Ok(self)
    }

    /// Returns the order of the graph the seed was validated against.
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the seed vertices in ascending order.
    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Returns the number of seed vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns whether the seed has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl std::fmt::Display for SeedSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (position, vertex) in self.vertices.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{vertex}")?;
        }
        f.write_str("}")
    }
}

/// Strategy for choosing a seed of a given size.
///
/// Callers that explore seeds randomly plug an implementation in here; the
/// simulator never samples on its own.
pub trait SeedSampler {
    /// Draws a seed of `size` distinct vertices from a graph of `order`
    /// vertices.
    ///
    /// # Errors
    /// Returns [`SeedError::SizeExceedsOrder`] when `size > order`.
    fn sample(&mut self, order: usize, size: usize) -> Result<SeedSet, SeedError>;
}

/// Samples seeds uniformly at random among all subsets of the requested size.
///
/// # Examples
/// ```
/// use quartic_core::{SeedSampler, UniformSampler};
///
/// let mut left = UniformSampler::seeded(7);
/// let mut right = UniformSampler::seeded(7);
/// let seed = left.sample(12, 3)?;
/// assert_eq!(seed.len(), 3);
/// assert_eq!(seed, right.sample(12, 3)?);
/// # Ok::<(), quartic_core::SeedError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UniformSampler {
    rng: SmallRng,
}

impl UniformSampler {
    /// Creates a reproducible sampler from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates a sampler seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl SeedSampler for UniformSampler {
    fn sample(&mut self, order: usize, size: usize) -> Result<SeedSet, SeedError> {
        if size > order {
            return Err(SeedError::SizeExceedsOrder { size, order });
        }
        let picked = index::sample(&mut self.rng, order, size).into_vec();
        SeedSet::new(order, picked)
    }
}

/// Lexicographic enumeration of every `size`-subset of `{0, …, order - 1}`.
///
/// # Examples
/// ```
/// use quartic_core::Combinations;
///
/// let subsets: Vec<Vec<usize>> = Combinations::new(4, 2)
///     .map(|seed| seed.vertices().to_vec())
///     .collect();
/// assert_eq!(subsets, [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]]);
/// ```
#[derive(Debug, Clone)]
pub struct Combinations {
    order: usize,
    indices: Vec<usize>,
    exhausted: bool,
}

impl Combinations {
    /// Starts the enumeration at `{0, …, size - 1}`.
    ///
    /// Nothing is yielded when `size > order`; exactly one empty set is
    /// yielded when `size == 0`.
    #[must_use]
    pub fn new(order: usize, size: usize) -> Self {
        Self {
            order,
            indices: (0..size).collect(),
            exhausted: size > order,
        }
    }

    fn step(&mut self) {
        let size = self.indices.len();
        let pivot = (0..size)
            .rev()
            .find(|&position| self.indices[position] < self.order - size + position);
        match pivot {
            Some(position) => {
                self.indices[position] += 1;
                for next in position + 1..size {
                    self.indices[next] = self.indices[next - 1] + 1;
                }
            }
            None => self.exhausted = true,
        }
    }
}

impl Iterator for Combinations {
    type Item = SeedSet;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = SeedSet {
            order: self.order,
            vertices: self.indices.clone(),
        };
        self.step();
        Some(current)
    }
}

impl std::iter::FusedIterator for Combinations {}

/// Returns `C(n, k)`, or `None` when it overflows `u64`.
///
/// # Examples
/// ```
/// use quartic_core::binomial;
///
/// assert_eq!(binomial(12, 2), Some(66));
/// assert_eq!(binomial(12, 3), Some(220));
/// assert_eq!(binomial(3, 5), Some(0));
/// ```
#[must_use]
pub fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for step in 0..k {
        let numerator = u64::try_from(n - step).ok()?;
        let denominator = u64::try_from(step + 1).ok()?;
        result = result.checked_mul(numerator)? / denominator;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn new_sorts_vertices() {
        let seed = SeedSet::new(10, [9, 4, 1]).expect("valid seed");
        assert_eq!(seed.vertices(), &[1, 4, 9]);
        assert_eq!(seed.order(), 10);
    }

    #[rstest]
    fn new_rejects_duplicates() {
        let err = SeedSet::new(10, [3, 1, 3]).expect_err("duplicate must fail");
        assert_eq!(err, SeedError::DuplicateVertex { vertex: 3 });
    }

    #[rstest]
    fn empty_seed_is_accepted_until_required() {
        let seed = SeedSet::new(5, []).expect("empty seed is valid");
        assert!(seed.is_empty());
        assert_eq!(seed.ensure_non_empty(), Err(SeedError::Empty));
    }

    #[rstest]
    fn full_seed_lists_every_vertex() {
        assert_eq!(SeedSet::full(4).vertices(), &[0, 1, 2, 3]);
        assert_eq!(SeedSet::empty(4).to_string(), "{}");
    }

    #[rstest]
    fn sampler_rejects_oversized_requests() {
        let mut sampler = UniformSampler::seeded(1);
        let err = sampler.sample(3, 4).expect_err("size exceeds order");
        assert_eq!(err, SeedError::SizeExceedsOrder { size: 4, order: 3 });
    }

    #[rstest]
    #[case(5, 0)]
    #[case(5, 5)]
    #[case(12, 4)]
    fn sampler_draws_distinct_in_range_vertices(#[case] order: usize, #[case] size: usize) {
        let mut sampler = UniformSampler::seeded(42);
        for _ in 0..32 {
            let seed = sampler.sample(order, size).expect("valid request");
            assert_eq!(seed.len(), size);
            assert!(seed.vertices().iter().all(|&vertex| vertex < order));
        }
    }

    #[rstest]
    #[case(5, 0, 1)]
    #[case(5, 6, 0)]
    #[case(6, 3, 20)]
    #[case(12, 2, 66)]
    #[case(12, 3, 220)]
    fn combinations_match_binomial(#[case] order: usize, #[case] size: usize, #[case] count: u64) {
        let produced = Combinations::new(order, size).count();
        assert_eq!(u64::try_from(produced).ok(), Some(count));
        assert_eq!(binomial(order, size), Some(count));
    }

    #[rstest]
    fn combinations_are_strictly_increasing() {
        let all: Vec<SeedSet> = Combinations::new(7, 3).collect();
        for pair in all.windows(2) {
            assert!(pair[0].vertices() < pair[1].vertices());
        }
        assert_eq!(all.last().map(SeedSet::vertices), Some(&[4, 5, 6][..]));
    }

    #[rstest]
    fn binomial_reports_overflow() {
        assert_eq!(binomial(200, 100), None);
        assert_eq!(binomial(60, 30), Some(118_264_581_564_861_424));
    }
}
