// Copyright 2024 knapcarve contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides `Point`, the immutable N-dimensional weight vector
//! used by the N-D solvers. A point hashes and compares by value, caches its
//! hash at construction (points are hashed over and over by the frontier
//! layer maps), and exposes exactly one dominance comparison: the
//! full-dimension non-strict one. Comparisons that would mix dimensions
//! moving in opposite directions are deliberately not a thing; such pairs
//! are simply incomparable.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use fxhash::FxHasher;

use crate::{Measure, Quantity};

/// An immutable N-dimensional weight vector (N >= 1).
///
/// `PartialOrd` is the *dominance* partial order: `a <= b` iff every
/// dimension of `a` is less than or equal to the matching dimension of `b`.
/// Points whose dimensions disagree in direction are incomparable
/// (`partial_cmp` returns `None`). This relation is transitive and
/// antisymmetric, which the dominance-pruning logic relies on.
#[derive(Clone)]
pub struct Point<T> {
    dims: Vec<T>,
    hash: u64,
}

impl<T: Quantity> Point<T> {
    /// Creates a point from its dimensions. The dimension count is fixed for
    /// the lifetime of the point; all points of one problem instance must
    /// share it.
    pub fn new(dims: Vec<T>) -> Self {
        let mut hasher = FxHasher::default();
        dims.hash(&mut hasher);
        Point { hash: hasher.finish(), dims }
    }

    /// Creates a point repeating `value` across `n` dimensions.
    pub fn uniform(n: usize, value: T) -> Self {
        Self::new(vec![value; n])
    }

    /// The dimensions of this point.
    pub fn dims(&self) -> &[T] {
        &self.dims
    }

    /// The number of dimensions.
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// True iff the point has no dimension at all. Points are normally
    /// created with N >= 1; this only exists to keep clippy's is_empty/len
    /// pairing honest.
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.dims.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Point<T> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.dims == other.dims
    }
}
impl<T: Eq> Eq for Point<T> {}

impl<T: Quantity> Hash for Point<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl<T: Quantity> PartialOrd for Point<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        debug_assert_eq!(self.dims.len(), other.dims.len());
        let mut ordering = Ordering::Equal;
        for (a, b) in self.dims.iter().zip(other.dims.iter()) {
            match a.cmp(b) {
                Ordering::Less if ordering == Ordering::Greater => return None,
                Ordering::Greater if ordering == Ordering::Less => return None,
                Ordering::Equal => {}
                direction => ordering = direction,
            }
        }
        Some(ordering)
    }
}

impl<T: Quantity> Measure for Point<T> {
    fn origin(&self) -> Self {
        Point::new(self.dims.iter().map(|_| T::zero()).collect())
    }

    fn plus(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.dims.len(), rhs.dims.len());
        Point::new(
            self.dims
                .iter()
                .zip(rhs.dims.iter())
                .map(|(a, b)| a.clone() + b.clone())
                .collect(),
        )
    }

    fn minus(&self, rhs: &Self) -> Self {
        debug_assert_eq!(self.dims.len(), rhs.dims.len());
        Point::new(
            self.dims
                .iter()
                .zip(rhs.dims.iter())
                .map(|(a, b)| a.clone() - b.clone())
                .collect(),
        )
    }

    fn fits(&self, cap: &Self) -> bool {
        debug_assert_eq!(self.dims.len(), cap.dims.len());
        self.dims.iter().zip(cap.dims.iter()).all(|(a, b)| a <= b)
    }

    fn seq_cmp(&self, other: &Self) -> Ordering {
        self.dims.cmp(&other.dims)
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_point {
    use std::cmp::Ordering;

    use crate::{Measure, Point};

    fn pt(dims: &[i64]) -> Point<i64> {
        Point::new(dims.to_vec())
    }

    #[test]
    fn equality_is_value_based() {
        assert_eq!(pt(&[1, 2, 3]), pt(&[1, 2, 3]));
        assert_ne!(pt(&[1, 2, 3]), pt(&[1, 2, 4]));
    }

    #[test]
    fn solutions_holding_points_compare_by_value() {
        let items = [pt(&[4, 4]), pt(&[6, 6])];
        let values = [7_i64, 9];
        let mut solve = || {
            crate::solve_knapsack_nd(
                &pt(&[10, 10]),
                &items,
                &values,
                &mut crate::Ops::default(),
            )
        };
        assert_eq!(solve(), solve());
    }

    #[test]
    fn plus_and_minus_are_elementwise() {
        let a = pt(&[1, 5]);
        let b = pt(&[2, 3]);
        assert_eq!(pt(&[3, 8]), a.plus(&b));
        assert_eq!(a, a.plus(&b).minus(&b));
    }

    #[test]
    fn origin_has_matching_dimension_count() {
        assert_eq!(pt(&[0, 0, 0]), pt(&[4, 5, 6]).origin());
    }

    #[test]
    fn dominance_requires_every_dimension() {
        assert!(pt(&[1, 2]).fits(&pt(&[1, 2])));
        assert!(pt(&[1, 2]).fits(&pt(&[5, 2])));
        assert!(!pt(&[1, 3]).fits(&pt(&[5, 2])));
    }

    #[test]
    fn mixed_directions_are_incomparable() {
        assert_eq!(None, pt(&[1, 5]).partial_cmp(&pt(&[2, 3])));
        assert_eq!(None, pt(&[2, 3]).partial_cmp(&pt(&[1, 5])));
    }

    #[test]
    fn fully_equal_points_compare_equal() {
        assert_eq!(Some(Ordering::Equal), pt(&[7, 7]).partial_cmp(&pt(&[7, 7])));
    }

    #[test]
    fn dominance_is_antisymmetric() {
        let a = pt(&[1, 2]);
        let b = pt(&[2, 2]);
        assert_eq!(Some(Ordering::Less), a.partial_cmp(&b));
        assert_eq!(Some(Ordering::Greater), b.partial_cmp(&a));
    }

    #[test]
    fn dominance_is_transitive() {
        let a = pt(&[1, 1, 0]);
        let b = pt(&[1, 2, 0]);
        let c = pt(&[3, 2, 1]);
        assert_eq!(Some(Ordering::Less), a.partial_cmp(&b));
        assert_eq!(Some(Ordering::Less), b.partial_cmp(&c));
        assert_eq!(Some(Ordering::Less), a.partial_cmp(&c));
    }

    #[test]
    fn seq_cmp_is_lexicographic() {
        assert_eq!(Ordering::Less, pt(&[1, 9]).seq_cmp(&pt(&[2, 0])));
        assert_eq!(Ordering::Greater, pt(&[2, 1]).seq_cmp(&pt(&[2, 0])));
        assert_eq!(Ordering::Equal, pt(&[2, 0]).seq_cmp(&pt(&[2, 0])));
    }
}
