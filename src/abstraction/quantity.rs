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

//! This module defines the `Quantity` trait: the single numeric contract all
//! weights, values, capacities and target sizes must satisfy. The engines
//! only ever rely on exact equality, total order, addition, subtraction,
//! multiplication (used for exact ratio comparisons) and division by an
//! integer count; no floating point is involved anywhere, so machine
//! integers and arbitrary-precision rationals behave identically.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, Mul, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

/// The numeric contract shared by every quantity the solvers manipulate.
///
/// The requirements are deliberately minimal: a total order with exact
/// equality, `+`, `-`, `*`, a zero, and division by an integer count (used
/// to compute mean target sizes when partitioning into `k` equal groups).
/// The solvers additionally assume quantities are non-negative; negative
/// weights or values make the bounded-knapsack formulation meaningless.
///
/// Implementations are provided for the primitive integers and for
/// [`num_rational::BigRational`], which covers exact decimals of arbitrary
/// precision.
pub trait Quantity:
    Clone
    + Eq
    + Ord
    + Hash
    + Debug
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    /// Builds the quantity standing for the plain integer `n`. This is how
    /// counting dimensions (e.g. the group-size dimension of a constrained
    /// partition) are expressed in the caller's numeric domain.
    fn from_int(n: usize) -> Self;

    /// Divides this quantity by a non-zero integer count. Rationals divide
    /// exactly; machine integers truncate, in which case an inexact split
    /// simply surfaces as an unsatisfiable target downstream.
    fn div_int(&self, n: usize) -> Self;
}

macro_rules! quantity_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Quantity for $t {
                fn from_int(n: usize) -> Self {
                    n as $t
                }
                fn div_int(&self, n: usize) -> Self {
                    *self / (n as $t)
                }
            }
        )*
    };
}

quantity_for_primitive![i16, i32, i64, i128, isize, u16, u32, u64, u128, usize];

impl Quantity for BigRational {
    fn from_int(n: usize) -> Self {
        BigRational::from_integer(BigInt::from(n))
    }
    fn div_int(&self, n: usize) -> Self {
        self / BigRational::from_integer(BigInt::from(n))
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
