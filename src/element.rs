//! The element capability and two stock element types.
//!
//! The enumerator in [`crate::semigroup`] is generic over anything that can
//! be multiplied in place, compared and hashed. [`Transformation`] and
//! [`BooleanMat`] cover two classic finite-semigroup element families;
//! partial permutations, tropical matrices and the like only need an
//! [`Element`] impl of their own.

use std::fmt;
use std::hash::Hash;

use bitvec::vec::BitVec;
use itertools::Itertools;
use thiserror::Error;

/// What the enumerator needs from a semigroup element.
///
/// `Clone` is the deep copy taken when a product turns out to be a new
/// element; `Eq` and `Hash` decide element identity, so equal elements must
/// hash equal. The product itself must be associative, otherwise the
/// enumeration is meaningless.
pub trait Element: Clone + Eq + Hash {
    /// Opaque size parameter. All generators of one semigroup must agree on
    /// it; it is otherwise uninterpreted.
    fn degree(&self) -> usize;

    /// Writes `a · b` over `self` without allocating.
    ///
    /// `self` is a scratch value of the same degree as `a` and `b` and
    /// aliases neither of them.
    fn redefine(&mut self, a: &Self, b: &Self);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElementError {
    #[error("image {value} out of range for degree {degree}")]
    ImageOutOfRange { value: usize, degree: usize },
    #[error("expected {expected} entries per row, got {found}")]
    NotSquare { expected: usize, found: usize },
}

/// A full transformation of `{0, .., n - 1}`, stored by its image vector.
///
/// Composition acts on the right, `(a · b)(x) = b(a(x))`, matching the
/// convention in which a Cayley-graph edge appends a letter to the end of a
/// word.
///
/// # Examples
///
/// ```
/// use cayley::element::{Element, Transformation};
///
/// let a = Transformation::from_images(vec![1, 2, 0]).unwrap();
/// let b = Transformation::from_images(vec![1, 0, 2]).unwrap();
/// let mut product = Transformation::identity(3);
/// product.redefine(&a, &b);
/// assert_eq!(product.images(), &[0, 2, 1]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transformation {
    images: Vec<usize>,
}

impl Transformation {
    /// Builds a transformation from the vector of images of `0, 1, ..`.
    pub fn from_images(images: Vec<usize>) -> Result<Self, ElementError> {
        let degree = images.len();
        for &value in &images {
            if value >= degree {
                return Err(ElementError::ImageOutOfRange { value, degree });
            }
        }
        Ok(Transformation { images })
    }

    /// The identity transformation on `n` points.
    pub fn identity(n: usize) -> Self {
        Transformation {
            images: (0..n).collect(),
        }
    }

    /// The transformation sending every point to `value`.
    pub fn constant(n: usize, value: usize) -> Result<Self, ElementError> {
        if value >= n {
            return Err(ElementError::ImageOutOfRange { value, degree: n });
        }
        Ok(Transformation {
            images: vec![value; n],
        })
    }

    pub fn apply(&self, point: usize) -> usize {
        self.images[point]
    }

    pub fn images(&self) -> &[usize] {
        &self.images
    }
}

impl Element for Transformation {
    fn degree(&self) -> usize {
        self.images.len()
    }

    fn redefine(&mut self, a: &Self, b: &Self) {
        for (dst, &mid) in self.images.iter_mut().zip(&a.images) {
            *dst = b.images[mid];
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.images.iter().join(", "))
    }
}

/// A square matrix over the Boolean semiring, rows packed into a bit vector.
///
/// Boolean matrices multiply with `∨` as addition and `∧` as product, which
/// makes them exactly the binary relations on `{0, .., n - 1}` under
/// composition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BooleanMat {
    dim: usize,
    bits: BitVec,
}

impl BooleanMat {
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, ElementError> {
        let dim = rows.len();
        let mut bits = BitVec::repeat(false, dim * dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(ElementError::NotSquare {
                    expected: dim,
                    found: row.len(),
                });
            }
            for (j, &entry) in row.iter().enumerate() {
                bits.set(i * dim + j, entry);
            }
        }
        Ok(BooleanMat { dim, bits })
    }

    /// The identity matrix.
    pub fn identity(dim: usize) -> Self {
        let mut bits = BitVec::repeat(false, dim * dim);
        for i in 0..dim {
            bits.set(i * dim + i, true);
        }
        BooleanMat { dim, bits }
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.bits[row * self.dim + col]
    }
}

impl Element for BooleanMat {
    fn degree(&self) -> usize {
        self.dim
    }

    fn redefine(&mut self, a: &Self, b: &Self) {
        let n = self.dim;
        for i in 0..n {
            for j in 0..n {
                let mut entry = false;
                for k in 0..n {
                    if a.bits[i * n + k] && b.bits[k * n + j] {
                        entry = true;
                        break;
                    }
                }
                self.bits.set(i * n + j, entry);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn transformation_composes_on_the_right() {
        let a = Transformation::from_images(vec![1, 2, 0]).unwrap();
        let b = Transformation::from_images(vec![1, 0, 2]).unwrap();
        let mut ab = Transformation::identity(3);
        ab.redefine(&a, &b);
        for x in 0..3 {
            assert_eq!(ab.apply(x), b.apply(a.apply(x)));
        }
    }

    #[test]
    fn transformation_rejects_bad_images() {
        assert_eq!(
            Transformation::from_images(vec![0, 3]),
            Err(ElementError::ImageOutOfRange { value: 3, degree: 2 })
        );
        assert!(Transformation::constant(2, 2).is_err());
    }

    #[test]
    fn transformation_identity_is_neutral() {
        let id = Transformation::identity(4);
        let a = Transformation::from_images(vec![2, 2, 0, 1]).unwrap();
        let mut out = Transformation::identity(4);
        out.redefine(&id, &a);
        assert_eq!(out, a);
        out.redefine(&a, &id);
        assert_eq!(out, a);
    }

    #[test]
    fn boolean_mat_product() {
        let swap = BooleanMat::from_rows(vec![vec![false, true], vec![true, false]]).unwrap();
        let e11 = BooleanMat::from_rows(vec![vec![true, false], vec![false, false]]).unwrap();
        let mut out = BooleanMat::identity(2);
        // swap · e11 permutes the rows of e11.
        out.redefine(&swap, &e11);
        assert_eq!(
            out,
            BooleanMat::from_rows(vec![vec![false, false], vec![true, false]]).unwrap()
        );
        out.redefine(&e11, &swap);
        assert_eq!(
            out,
            BooleanMat::from_rows(vec![vec![false, true], vec![false, false]]).unwrap()
        );
    }

    #[test]
    fn boolean_mat_rejects_ragged_rows() {
        assert_eq!(
            BooleanMat::from_rows(vec![vec![true], vec![]]),
            Err(ElementError::NotSquare { expected: 2, found: 1 })
        );
    }
}
