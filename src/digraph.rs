//! Adjacency-list digraphs and their strongly connected components.
//!
//! Vertices are [`Position`]s, the same one-based indices the enumerator in
//! [`crate::semigroup`] assigns to elements, so the right and left Cayley
//! graphs can be decomposed without re-indexing. The SCC pass is Gabow's
//! two-stack algorithm driven by an explicit frame stack: Cayley graphs of
//! large semigroups produce DFS trees far deeper than any call stack.

use std::fmt;

/// A type-safe wrapper around a one-based vertex or element index.
///
/// `Position(0)` is reserved as the distinguished [`Position::UNDEFINED`]
/// value ("no prefix", "no identity found", "unvisited"), which is why the
/// wrapper is one-based while most backing tables are keyed by the zero-based
/// [`Position::offset`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position(u32);

impl Position {
    /// The reserved "no position" value.
    pub const UNDEFINED: Position = Position(0);

    /// Wraps a one-based index.
    pub fn new(index: usize) -> Self {
        debug_assert!(index > 0 && index <= u32::MAX as usize);
        Position(index as u32)
    }

    /// The position of the element stored at a zero-based offset.
    pub fn from_offset(offset: usize) -> Self {
        debug_assert!(offset < u32::MAX as usize);
        Position(offset as u32 + 1)
    }

    pub fn is_defined(self) -> bool {
        self.0 != 0
    }

    /// The one-based index, or `None` when undefined.
    pub fn get(self) -> Option<usize> {
        (self.0 != 0).then_some(self.0 as usize)
    }

    /// The zero-based offset into an element- or vertex-indexed table.
    ///
    /// Must not be called on [`Position::UNDEFINED`].
    pub fn offset(self) -> usize {
        debug_assert!(self.is_defined());
        self.0 as usize - 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed graph on vertices `1..=n`, stored as out-neighbour lists.
///
/// Parallel edges are allowed (the Cayley graphs produced by the enumerator
/// have one edge per generator, and distinct generators may act identically).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Digraph {
    neighbours: Vec<Vec<Position>>,
}

impl Digraph {
    /// A digraph with `vertices` vertices and no edges.
    pub fn new(vertices: usize) -> Self {
        Digraph {
            neighbours: vec![Vec::new(); vertices],
        }
    }

    /// Builds a digraph from one-based out-neighbour lists, so that
    /// `from_rows(vec![vec![2, 3], vec![1], vec![2]])` is the graph with
    /// edges 1→2, 1→3, 2→1 and 3→2.
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Self {
        let neighbours = rows
            .into_iter()
            .map(|row| row.into_iter().map(Position::new).collect())
            .collect();
        Digraph { neighbours }
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    pub fn add_edge(&mut self, from: Position, to: Position) {
        self.neighbours[from.offset()].push(to);
    }

    pub fn neighbours(&self, vertex: Position) -> &[Position] {
        &self.neighbours[vertex.offset()]
    }

    /// The strongly connected components of the digraph, by Gabow's
    /// algorithm.
    ///
    /// Runs in O(V + E) with an explicit stack of `(vertex, cursor)` call
    /// frames instead of recursion, so arbitrarily deep DFS trees are fine.
    /// `id` doubles as the visitation record during the pass: `0` marks an
    /// unvisited vertex, `1..=n` an index on the path stack, and values above
    /// `n` a finished component; the final normalisation shifts the finished
    /// ids down to `1..=#comps`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cayley::digraph::Digraph;
    ///
    /// let graph = Digraph::from_rows(vec![vec![2, 3], vec![1], vec![2]]);
    /// let scc = graph.scc();
    /// assert_eq!(scc.count(), 1);
    /// assert_eq!(scc.id, vec![1, 1, 1]);
    /// ```
    pub fn scc(&self) -> Scc {
        let n = self.vertex_count();
        if n == 0 {
            return Scc::default();
        }

        let mut id = vec![0usize; n];
        let mut comps = Vec::new();
        let mut count = n;

        let mut path: Vec<Position> = Vec::with_capacity(n);
        // Indices into `path` marking the start of each tentative component.
        let mut boundary: Vec<usize> = Vec::with_capacity(n);
        let mut frames: Vec<(usize, usize)> = Vec::new();

        for root in 0..n {
            if id[root] != 0 {
                continue;
            }
            frames.push((root, 0));
            path.push(Position::from_offset(root));
            id[root] = path.len();
            boundary.push(path.len());

            while !frames.is_empty() {
                let top = frames.len() - 1;
                let (v, cursor) = frames[top];
                if let Some(&w) = self.neighbours[v].get(cursor) {
                    frames[top].1 += 1;
                    let w = w.offset();
                    if id[w] == 0 {
                        frames.push((w, 0));
                        path.push(Position::from_offset(w));
                        id[w] = path.len();
                        boundary.push(path.len());
                    } else {
                        // A vertex still on the path merges every tentative
                        // component above it; finished vertices have
                        // id > n and pop nothing.
                        while boundary.last().is_some_and(|&b| b > id[w]) {
                            boundary.pop();
                        }
                    }
                } else {
                    if boundary.last() == Some(&id[v]) {
                        boundary.pop();
                        count += 1;
                        let comp = path.split_off(id[v] - 1);
                        for u in &comp {
                            id[u.offset()] = count;
                        }
                        comps.push(comp);
                    }
                    frames.pop();
                }
            }
        }

        for c in &mut id {
            *c -= n;
        }

        Scc { id, comps }
    }
}

/// The strongly connected components of a [`Digraph`].
///
/// `comps` partitions the vertex set and `id[v.offset()]` is the one-based
/// index in `comps` of the component containing `v`. Neither the components
/// nor their members are in any particular order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scc {
    pub id: Vec<usize>,
    pub comps: Vec<Vec<Position>>,
}

impl Scc {
    /// The number of components.
    pub fn count(&self) -> usize {
        self.comps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// The one-based index of the component containing `vertex`.
    pub fn component_of(&self, vertex: Position) -> usize {
        self.id[vertex.offset()]
    }

    /// The members of the component with a one-based index.
    pub fn component(&self, index: usize) -> &[Position] {
        &self.comps[index - 1]
    }
}
