//! Neighbour-relation abstraction consumed by the infection simulator.

/// Abstraction over a finite vertex set `{0, …, order - 1}` with a fixed
/// neighbour relation.
///
/// The simulator only needs the vertex count and each vertex's neighbour
/// list, so alternative graph families can be simulated without touching the
/// stepping logic.
///
/// # Examples
/// ```
/// use quartic_core::Topology;
///
/// struct Path(Vec<Vec<usize>>);
///
/// impl Topology for Path {
///     fn order(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "path" }
///     fn neighbours(&self, vertex: usize) -> &[usize] {
///         self.0.get(vertex).map_or(&[][..], Vec::as_slice)
///     }
/// }
///
/// let path = Path(vec![vec![1], vec![0, 2], vec![1]]);
/// assert_eq!(path.order(), 3);
/// assert_eq!(path.degree(1), 2);
/// assert!(path.neighbours(7).is_empty());
/// ```
pub trait Topology {
    /// Returns the number of vertices.
    fn order(&self) -> usize;

    /// Returns a human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the neighbours of `vertex`.
    ///
    /// Implementations return an empty slice for vertices outside
    /// `0..order()` and must not list a neighbour twice.
    fn neighbours(&self, vertex: usize) -> &[usize];

    /// Returns the number of neighbours of `vertex`.
    #[must_use]
    fn degree(&self, vertex: usize) -> usize {
        self.neighbours(vertex).len()
    }

    /// Returns whether the topology contains no vertices.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.order() == 0
    }
}

impl<T: Topology + ?Sized> Topology for &T {
    fn order(&self) -> usize {
        (**self).order()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn neighbours(&self, vertex: usize) -> &[usize] {
        (**self).neighbours(vertex)
    }
}
