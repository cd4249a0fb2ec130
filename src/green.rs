//! Green's relations from the Cayley-graph SCCs.
//!
//! The R-, L-, H- and D-classes of a finite semigroup are the strongly
//! connected components of its right Cayley graph, its left Cayley graph,
//! their intersection, and their union, respectively. The intersection and
//! union are computed directly from the two SCC results without revisiting
//! the graphs, both in linear time.

use bitvec::vec::BitVec;

use crate::digraph::{Position, Scc};
use crate::element::Element;
use crate::semigroup::Semigroup;

/// Intersects the right and left SCC partitions into H-classes.
///
/// Vertices are bucket-sorted by R-component; scanning them in that order, an
/// L-component bucket is reopened exactly when a new R-component starts, so
/// every `(R, L)` pair that actually occurs gets its own class.
pub fn h_classes(right: &Scc, left: &Scc) -> Scc {
    let n = right.id.len();
    if n == 0 {
        return Scc::default();
    }

    let mut next = vec![0usize; right.comps.len()];
    let mut offset = 0;
    for (slot, comp) in next.iter_mut().zip(&right.comps) {
        *slot = offset;
        offset += comp.len();
    }
    let mut sorted = vec![0usize; n];
    for v in 0..n {
        let c = right.id[v] - 1;
        sorted[next[c]] = v;
        next[c] += 1;
    }

    let mut id = vec![0usize; n];
    let mut comps: Vec<Vec<Position>> = Vec::new();
    // lookup[l] is the class currently open for L-component l; values at or
    // below `init` are stale leftovers from earlier R-components.
    let mut lookup = vec![0usize; left.comps.len() + 1];
    let mut hindex = 0;
    let mut rindex = 0;
    let mut init = 0;

    for &v in &sorted {
        let rc = right.id[v];
        if rc > rindex {
            rindex = rc;
            init = hindex;
        }
        let lc = left.id[v];
        if lookup[lc] <= init {
            hindex += 1;
            lookup[lc] = hindex;
            comps.push(Vec::new());
        }
        comps[lookup[lc] - 1].push(Position::from_offset(v));
        id[v] = lookup[lc];
    }

    Scc { id, comps }
}

/// Merges the right and left SCC partitions into D-classes.
///
/// Each R-component pulls in every L-component one of its vertices touches,
/// each L-component at most once. A single pass suffices because the R- and
/// L-relations of a semigroup commute, so the D-class of a vertex is exactly
/// the union of the L-classes met by its R-class.
pub fn scc_union(right: &Scc, left: &Scc) -> Scc {
    let n = right.id.len();
    if n == 0 {
        return Scc::default();
    }

    let mut id = vec![0usize; n];
    let mut comps: Vec<Vec<Position>> = Vec::new();
    let mut seen: BitVec = BitVec::repeat(false, left.comps.len());

    for comp in &right.comps {
        if id[comp[0].offset()] != 0 {
            continue;
        }
        let class = comps.len() + 1;
        let mut merged: Vec<Position> = Vec::new();
        for &v in comp {
            let lc = left.id[v.offset()] - 1;
            if !seen[lc] {
                seen.set(lc, true);
                for &w in &left.comps[lc] {
                    id[w.offset()] = class;
                    merged.push(w);
                }
            }
        }
        comps.push(merged);
    }

    Scc { id, comps }
}

impl<E: Element> Semigroup<E> {
    /// R-classes: the SCCs of the right Cayley graph.
    ///
    /// Like the other class accessors, only meaningful once [`Semigroup::run`]
    /// has closed the semigroup; on a partial enumeration the Cayley graphs
    /// are truncated.
    pub fn r_classes(&self) -> Scc {
        self.right_cayley().scc()
    }

    /// L-classes: the SCCs of the left Cayley graph.
    pub fn l_classes(&self) -> Scc {
        self.left_cayley().scc()
    }

    /// H-classes: the meet of the R- and L-partitions.
    pub fn h_classes(&self) -> Scc {
        h_classes(&self.r_classes(), &self.l_classes())
    }

    /// D-classes: the join of the R- and L-partitions.
    pub fn d_classes(&self) -> Scc {
        scc_union(&self.r_classes(), &self.l_classes())
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;

    fn p(index: usize) -> Position {
        Position::new(index)
    }

    fn scc(id: Vec<usize>, comps: Vec<Vec<usize>>) -> Scc {
        Scc {
            id,
            comps: comps
                .into_iter()
                .map(|comp| comp.into_iter().map(Position::new).collect())
                .collect(),
        }
    }

    fn check_partition(result: &Scc, n: usize) {
        let mut seen = vec![false; n];
        for (index, comp) in result.comps.iter().enumerate() {
            assert!(!comp.is_empty());
            for &v in comp {
                assert_eq!(result.id[v.offset()], index + 1);
                assert!(!seen[v.offset()]);
                seen[v.offset()] = true;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn crossed_partitions_give_singletons() {
        let right = scc(vec![1, 1, 2, 2], vec![vec![1, 2], vec![3, 4]]);
        let left = scc(vec![1, 2, 1, 2], vec![vec![1, 3], vec![2, 4]]);
        let h = h_classes(&right, &left);
        assert_eq!(h.count(), 4);
        check_partition(&h, 4);
        for comp in &h.comps {
            assert_eq!(comp.len(), 1);
        }

        let d = scc_union(&right, &left);
        assert_eq!(d.count(), 1);
        assert_eq!(d.comps[0].len(), 4);
        check_partition(&d, 4);
    }

    #[test]
    fn identical_partitions_are_fixed_points() {
        let part = scc(vec![2, 1, 1, 2], vec![vec![2, 3], vec![1, 4]]);
        let h = h_classes(&part, &part);
        check_partition(&h, 4);
        assert_eq!(h.count(), 2);
        let sets: Vec<Vec<Position>> = h
            .comps
            .iter()
            .map(|c| c.iter().copied().sorted().collect())
            .collect();
        assert!(sets.contains(&vec![p(2), p(3)]));
        assert!(sets.contains(&vec![p(1), p(4)]));

        let d = scc_union(&part, &part);
        assert_eq!(d.count(), 2);
        check_partition(&d, 4);
    }

    #[test]
    fn refinement_against_the_trivial_partition() {
        // One side is a single class; the meet is the other side, the join is
        // everything.
        let coarse = scc(vec![1, 1, 1, 1], vec![vec![1, 2, 3, 4]]);
        let fine = scc(vec![1, 2, 2, 3], vec![vec![1], vec![2, 3], vec![4]]);
        let h = h_classes(&coarse, &fine);
        assert_eq!(h.count(), 3);
        check_partition(&h, 4);
        let d = scc_union(&coarse, &fine);
        assert_eq!(d.count(), 1);
        check_partition(&d, 4);
    }

    #[test]
    fn empty_inputs() {
        assert!(h_classes(&Scc::default(), &Scc::default()).is_empty());
        assert!(scc_union(&Scc::default(), &Scc::default()).is_empty());
    }

    #[test]
    fn h_refines_both_inputs() {
        let right = scc(vec![1, 1, 1, 2, 2, 2], vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let left = scc(vec![1, 2, 1, 2, 1, 2], vec![vec![1, 3, 5], vec![2, 4, 6]]);
        let h = h_classes(&right, &left);
        check_partition(&h, 6);
        for comp in &h.comps {
            for pair in comp.windows(2) {
                assert_eq!(
                    right.component_of(pair[0]),
                    right.component_of(pair[1])
                );
                assert_eq!(left.component_of(pair[0]), left.component_of(pair[1]));
            }
        }
        // Expected classes: {1,3} {5} {2} {4,6}.
        assert_eq!(h.count(), 4);
        assert_eq!(h.component_of(p(1)), h.component_of(p(3)));
        assert_eq!(h.component_of(p(4)), h.component_of(p(6)));
        assert_ne!(h.component_of(p(1)), h.component_of(p(5)));
    }
}
