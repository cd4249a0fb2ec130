//! # Cayley
//!
//! Cayley is a Rust library for enumerating finite semigroups from a set of
//! generators and computing structural decompositions of them.
//!
//! The [`semigroup`] module performs the Froidure–Pin breadth-first closure of
//! a generating set, producing the element list, the right and left Cayley
//! graphs, and the defining relations of the semigroup. The [`digraph`]
//! module decomposes those graphs into strongly connected components, and the
//! [`green`] module combines the right and left decompositions into Green's
//! H- and D-classes.
//!
//! The enumerator is generic over the [`element::Element`] capability, so
//! transformations, Boolean matrices, or any other type with an associative
//! in-place product can be enumerated with the same machinery.

pub mod digraph;
pub mod element;
pub mod green;
pub mod semigroup;
