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

//! This module defines the `Measure` trait, the seam that lets the frontier
//! engine run unchanged on plain scalar weights (the 1-D problems) and on
//! N-dimensional weight points. A measure supports elementwise addition and
//! subtraction, the dominance test used for feasibility and pruning, and a
//! total sequencing order that keeps the frontier ascending so the merge
//! stays linear.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use num_rational::BigRational;
use num_traits::Zero;

/// A weight that can flow through the frontier engine: a scalar for the 1-D
/// problems, a [`Point`](crate::Point) for the N-dimensional ones.
///
/// Two orders coexist on a measure and must not be confused:
/// * `fits` is the *dominance* partial order (every dimension less or
///   equal). It decides feasibility against a capacity and drives the
///   partial-sum pruning. For scalars it coincides with `<=`.
/// * `seq_cmp` is a *total* order (natural for scalars, lexicographic for
///   points) with no feasibility meaning at all: it only sequences the
///   frontier so that merging old and freshly generated points stays linear.
pub trait Measure: Clone + Eq + Hash + Debug {
    /// The empty measure with the same dimensionality as `self`.
    fn origin(&self) -> Self;

    /// Elementwise addition.
    fn plus(&self, rhs: &Self) -> Self;

    /// Elementwise subtraction. The result is only meaningful when `rhs`
    /// fits within `self`, which is the only way the engines use it.
    fn minus(&self, rhs: &Self) -> Self;

    /// The dominance test: true iff every dimension of `self` is less than
    /// or equal to the matching dimension of `cap`.
    fn fits(&self, cap: &Self) -> bool;

    /// The total sequencing order of the frontier.
    fn seq_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! measure_for_scalar {
    ($($t:ty),*) => {
        $(
            impl Measure for $t {
                fn origin(&self) -> Self {
                    <$t as Zero>::zero()
                }
                fn plus(&self, rhs: &Self) -> Self {
                    self.clone() + rhs.clone()
                }
                fn minus(&self, rhs: &Self) -> Self {
                    self.clone() - rhs.clone()
                }
                fn fits(&self, cap: &Self) -> bool {
                    self <= cap
                }
                fn seq_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

measure_for_scalar![i16, i32, i64, i128, isize, u16, u32, u64, u128, usize, BigRational];

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
