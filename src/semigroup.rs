//! # Froidure–Pin enumeration
//!
//! This module discovers every element of the semigroup generated by a finite
//! list of [`Element`]s, breadth-first by word length, while recording enough
//! structure to answer most questions about the semigroup without further
//! multiplication:
//!
//! - the **elements** themselves, in discovery order, each reachable at a
//!   one-based [`Position`];
//! - the **right and left Cayley graphs**: the positions of `x · g` and
//!   `g · x` for every element `x` and generator `g`;
//! - the **rules**: the defining relations `word · g = known element`
//!   discovered whenever a product collides with an earlier element;
//! - a **Schreier tree** from which the canonical (first-discovered,
//!   shortest) word for every element can be reconstructed.
//!
//! The core trick is that most products are never multiplied out. Every
//! element factors as `first-letter · suffix`; when the suffix times a
//! generator is already known to reduce, the product of the whole word with
//! that generator can be looked up from previously filled Cayley rows using
//! associativity alone. Actual multiplications (and their hash lookups) only
//! happen for reduced words, which is what makes closing large semigroups
//! affordable.
//!
//! Enumeration is resumable: [`Semigroup::enumerate`] stops once a requested
//! number of elements is known and picks up exactly where it left off on the
//! next call, and [`Semigroup::enumerate_until`] additionally stops early
//! when a caller-supplied predicate matches a newly discovered element.

use ahash::AHashMap;
use bitvec::vec::BitVec;
use thiserror::Error;

use crate::digraph::{Digraph, Position};
use crate::element::Element;

mod table;

use table::GenTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SemigroupError {
    #[error("at least one generator is required")]
    EmptyGenerators,
    #[error("generator {index} has degree {found}, expected {expected}")]
    DegreeMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("element count exceeds the position width")]
    Overflow,
}

/// Outcome of a call to [`Semigroup::enumerate`] or
/// [`Semigroup::enumerate_until`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The semigroup is fully enumerated.
    Complete,
    /// Enumeration paused with at least the requested number of elements
    /// discovered.
    LimitReached,
    /// The look predicate matched the element at this position.
    Found(Position),
}

/// A defining relation discovered during enumeration.
///
/// The canonical word at `lhs` followed by the letter `gen` equals the
/// already-known element at `rhs`. A rule with `lhs == Position::UNDEFINED`
/// records a duplicate generator: the `gen`-th generator is the element at
/// `rhs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub lhs: Position,
    /// One-based generator letter.
    pub gen: usize,
    pub rhs: Position,
}

/// A finite semigroup, lazily enumerated from its generators.
///
/// Construction seeds the state with the generators; products are discovered
/// by [`Semigroup::run`] or the finer-grained [`Semigroup::enumerate`]. All
/// positions handed out or accepted by this type are one-based, with
/// [`Position::UNDEFINED`] standing for "not there".
///
/// # Examples
///
/// ```
/// use cayley::element::Transformation;
/// use cayley::semigroup::Semigroup;
///
/// // The full transformation monoid on two points.
/// let mut sg = Semigroup::new(vec![
///     Transformation::from_images(vec![1, 0]).unwrap(),
///     Transformation::from_images(vec![0, 0]).unwrap(),
/// ])
/// .unwrap();
/// sg.run().unwrap();
/// assert_eq!(sg.size(), 4);
/// assert!(sg.is_monoid());
/// ```
#[derive(Debug)]
pub struct Semigroup<E: Element> {
    degree: usize,
    gens: Vec<E>,
    /// Position of each generator; not always `g + 1`, since duplicate
    /// generators share one element slot.
    gens_lookup: Vec<Position>,
    elements: Vec<E>,
    index: AHashMap<E, Position>,
    /// One-based first and last letter of each canonical word.
    first: Vec<usize>,
    last: Vec<usize>,
    /// Canonical word with the last (resp. first) letter removed; undefined
    /// for the generators themselves.
    prefix: Vec<Position>,
    suffix: Vec<Position>,
    schreier_gen: Vec<usize>,
    schreier_pos: Vec<Position>,
    right: GenTable,
    left: GenTable,
    /// One bit per `(element, generator)` pair: set iff appending the
    /// generator to the element's canonical word is again canonical.
    reduced: BitVec,
    rules: Vec<Rule>,
    /// `len_index[l]` is the offset of the first element whose canonical word
    /// has length `l`; entry 0 is a placeholder. Extended only when a level
    /// closes.
    len_index: Vec<usize>,
    one: Position,
    pos: usize,
    word_len: usize,
}

/// `x` is the two-sided identity of the generated semigroup iff it fixes
/// every generator from both sides.
fn probe_identity<E: Element>(x: &E, gens: &[E], scratch: &mut E) -> bool {
    for gen in gens {
        scratch.redefine(x, gen);
        if *scratch != *gen {
            return false;
        }
        scratch.redefine(gen, x);
        if *scratch != *gen {
            return false;
        }
    }
    true
}

impl<E: Element> Semigroup<E> {
    /// Seeds a semigroup from its generators.
    ///
    /// Fails on an empty generating set or on generators of mixed degree.
    /// Duplicate generators are kept (their letters stay valid in words and
    /// rules) but share a single element slot, and each duplicate records a
    /// rule equating its letter with the earlier occurrence.
    pub fn new(gens: Vec<E>) -> Result<Self, SemigroupError> {
        let Some(first_gen) = gens.first() else {
            return Err(SemigroupError::EmptyGenerators);
        };
        let degree = first_gen.degree();
        for (index, gen) in gens.iter().enumerate() {
            if gen.degree() != degree {
                return Err(SemigroupError::DegreeMismatch {
                    index,
                    expected: degree,
                    found: gen.degree(),
                });
            }
        }

        let cols = gens.len();
        let mut sg = Semigroup {
            degree,
            gens,
            gens_lookup: Vec::with_capacity(cols),
            elements: Vec::new(),
            index: AHashMap::new(),
            first: Vec::new(),
            last: Vec::new(),
            prefix: Vec::new(),
            suffix: Vec::new(),
            schreier_gen: Vec::new(),
            schreier_pos: Vec::new(),
            right: GenTable::new(cols),
            left: GenTable::new(cols),
            reduced: BitVec::new(),
            rules: Vec::new(),
            len_index: vec![0, 0],
            one: Position::UNDEFINED,
            pos: 0,
            word_len: 1,
        };

        let mut scratch = sg.gens[0].clone();
        for g in 0..cols {
            if let Some(&existing) = sg.index.get(&sg.gens[g]) {
                sg.gens_lookup.push(existing);
                sg.rules.push(Rule {
                    lhs: Position::UNDEFINED,
                    gen: g + 1,
                    rhs: existing,
                });
            } else {
                let position = Position::from_offset(sg.elements.len());
                sg.index.insert(sg.gens[g].clone(), position);
                sg.elements.push(sg.gens[g].clone());
                sg.gens_lookup.push(position);
                sg.first.push(g + 1);
                sg.last.push(g + 1);
                sg.prefix.push(Position::UNDEFINED);
                sg.suffix.push(Position::UNDEFINED);
                sg.schreier_gen.push(g + 1);
                sg.schreier_pos.push(Position::UNDEFINED);
                sg.right.push_row();
                sg.left.push_row();
                sg.reduced.resize(sg.reduced.len() + cols, false);
                if !sg.one.is_defined() && probe_identity(&sg.gens[g], &sg.gens, &mut scratch) {
                    sg.one = position;
                }
            }
        }
        sg.len_index.push(sg.elements.len());
        Ok(sg)
    }

    /// Runs the enumeration to closure.
    pub fn run(&mut self) -> Result<(), SemigroupError> {
        self.enumerate(usize::MAX).map(|_| ())
    }

    /// Extends the enumeration until the semigroup closes or at least
    /// `limit` elements are known, whichever comes first.
    ///
    /// Idempotent on a closed semigroup, and resumable: a later call with a
    /// larger limit continues exactly where this one stopped.
    pub fn enumerate(&mut self, limit: usize) -> Result<Status, SemigroupError> {
        self.enumerate_until(limit, |_| false)
    }

    /// Like [`Semigroup::enumerate`], but additionally stops as soon as
    /// `look` matches a newly discovered element, reporting its position.
    ///
    /// The generator row in progress is finished before stopping, so the
    /// Cayley rows of processed elements are never left half-filled.
    pub fn enumerate_until<F>(
        &mut self,
        limit: usize,
        mut look: F,
    ) -> Result<Status, SemigroupError>
    where
        F: FnMut(&E) -> bool,
    {
        if self.is_finished() {
            return Ok(Status::Complete);
        }
        if self.elements.len() >= limit {
            return Ok(Status::LimitReached);
        }

        let cols = self.gens.len();
        let mut scratch = self.gens[0].clone();
        let mut stop = false;
        let mut found = Position::UNDEFINED;

        while self.pos < self.elements.len() && !stop {
            while self.pos < self.len_index[self.word_len + 1] && !stop {
                if self.elements.len() + cols > u32::MAX as usize {
                    return Err(SemigroupError::Overflow);
                }
                let i = self.pos;
                let b = self.first[i];
                let s = self.suffix[i];
                for g in 0..cols {
                    if s.is_defined() && !self.reduced[s.offset() * cols + g] {
                        // The suffix times g reduces, so the whole product is
                        // already known somewhere in the tables:
                        // (b · suffix) · g = b · (suffix · g), and the right
                        // hand side refactors through strictly shorter words.
                        let r = self.right.get(s.offset(), g);
                        let target = if self.prefix[r.offset()].is_defined() {
                            let left_of_prefix =
                                self.left.get(self.prefix[r.offset()].offset(), b - 1);
                            self.right
                                .get(left_of_prefix.offset(), self.last[r.offset()] - 1)
                        } else if r == self.one {
                            self.gens_lookup[b - 1]
                        } else {
                            self.right
                                .get(self.gens_lookup[b - 1].offset(), self.last[r.offset()] - 1)
                        };
                        self.right.set(i, g, target);
                    } else {
                        scratch.redefine(&self.elements[i], &self.gens[g]);
                        if let Some(&existing) = self.index.get(&scratch) {
                            self.rules.push(Rule {
                                lhs: Position::from_offset(i),
                                gen: g + 1,
                                rhs: existing,
                            });
                            self.right.set(i, g, existing);
                        } else {
                            let position = Position::from_offset(self.elements.len());
                            self.index.insert(scratch.clone(), position);
                            self.elements.push(scratch.clone());
                            self.first.push(b);
                            self.last.push(g + 1);
                            self.prefix.push(Position::from_offset(i));
                            self.suffix.push(if s.is_defined() {
                                self.right.get(s.offset(), g)
                            } else {
                                self.gens_lookup[g]
                            });
                            self.schreier_gen.push(g + 1);
                            self.schreier_pos.push(Position::from_offset(i));
                            self.right.push_row();
                            self.left.push_row();
                            self.reduced.resize(self.reduced.len() + cols, false);
                            self.reduced.set(i * cols + g, true);
                            self.right.set(i, g, position);

                            let new = position.offset();
                            if !self.one.is_defined()
                                && probe_identity(&self.elements[new], &self.gens, &mut scratch)
                            {
                                self.one = position;
                            }
                            if !found.is_defined() && look(&self.elements[new]) {
                                found = position;
                            }
                            if found.is_defined() || self.elements.len() >= limit {
                                stop = true;
                            }
                        }
                    }
                }
                self.pos += 1;
            }
            if self.pos == self.len_index[self.word_len + 1] {
                self.close_level();
            }
        }

        if found.is_defined() {
            Ok(Status::Found(found))
        } else if self.is_finished() {
            Ok(Status::Complete)
        } else {
            Ok(Status::LimitReached)
        }
    }

    /// Fills the left Cayley rows of the level that just closed and opens the
    /// next word length.
    ///
    /// `g · x` for a word `x = prefix · f` is `(g · prefix) · f`; the prefix
    /// is strictly shorter, so its left row was filled when its own level
    /// closed, and `g · prefix` is never longer than `x`, so its right row is
    /// already processed.
    fn close_level(&mut self) {
        let cols = self.gens.len();
        let level_start = self.len_index[self.word_len];
        if self.word_len > 1 {
            for i in level_start..self.pos {
                let p = self.prefix[i];
                let f = self.last[i];
                for g in 0..cols {
                    let left_of_prefix = self.left.get(p.offset(), g);
                    self.left
                        .set(i, g, self.right.get(left_of_prefix.offset(), f - 1));
                }
            }
        } else {
            for i in level_start..self.pos {
                let f = self.last[i];
                for g in 0..cols {
                    self.left
                        .set(i, g, self.right.get(self.gens_lookup[g].offset(), f - 1));
                }
            }
        }
        self.word_len += 1;
        if self.elements.len() > self.pos {
            self.len_index.push(self.elements.len());
        }
    }

    /// The number of elements discovered so far.
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// `true` once every discovered element has been processed, i.e. the
    /// semigroup is closed under multiplication by the generators.
    pub fn is_finished(&self) -> bool {
        self.pos >= self.elements.len()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn generator_count(&self) -> usize {
        self.gens.len()
    }

    pub fn generators(&self) -> &[E] {
        &self.gens
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// The element at a one-based position.
    pub fn element(&self, pos: Position) -> Option<&E> {
        pos.get().and_then(|p| self.elements.get(p - 1))
    }

    /// The position of an element, if it has been discovered.
    pub fn position(&self, element: &E) -> Option<Position> {
        self.index.get(element).copied()
    }

    /// The position the `gen`-th (one-based) generator landed at.
    pub fn generator_position(&self, gen: usize) -> Position {
        self.gens_lookup[gen - 1]
    }

    /// The position of `x · g` for the element at `pos` and the one-based
    /// generator letter `gen`.
    ///
    /// [`Position::UNDEFINED`] until the enumeration cursor has processed
    /// `pos`.
    pub fn right(&self, pos: Position, gen: usize) -> Position {
        self.right.get(pos.offset(), gen - 1)
    }

    /// The position of `g · x`; filled a level at a time, so defined once the
    /// enumeration has moved past the word length of `pos`.
    pub fn left(&self, pos: Position, gen: usize) -> Position {
        self.left.get(pos.offset(), gen - 1)
    }

    /// Whether appending the letter `gen` to the canonical word of `pos`
    /// yields again a canonical word.
    pub fn is_reduced(&self, pos: Position, gen: usize) -> bool {
        self.reduced[pos.offset() * self.gens.len() + gen - 1]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Position of the two-sided identity, if one has been discovered.
    pub fn identity_position(&self) -> Option<Position> {
        self.one.is_defined().then_some(self.one)
    }

    pub fn is_monoid(&self) -> bool {
        self.one.is_defined()
    }

    /// The canonical word for the element at `pos`, as one-based generator
    /// letters, reconstructed from the Schreier tree.
    pub fn word_of(&self, pos: Position) -> Vec<usize> {
        let mut letters = Vec::new();
        let mut current = pos;
        while current.is_defined() {
            letters.push(self.schreier_gen[current.offset()]);
            current = self.schreier_pos[current.offset()];
        }
        letters.reverse();
        letters
    }

    /// The right Cayley graph discovered so far, as a digraph on element
    /// positions with one edge per generator. Edges whose product has not
    /// been computed yet are omitted.
    pub fn right_cayley(&self) -> Digraph {
        Self::cayley(&self.right, self.elements.len())
    }

    /// The left Cayley graph discovered so far.
    pub fn left_cayley(&self) -> Digraph {
        Self::cayley(&self.left, self.elements.len())
    }

    fn cayley(table: &GenTable, n: usize) -> Digraph {
        let mut graph = Digraph::new(n);
        for i in 0..n {
            for &target in table.row(i) {
                if target.is_defined() {
                    graph.add_edge(Position::from_offset(i), target);
                }
            }
        }
        graph
    }
}
