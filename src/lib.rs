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

//! # Knapcarve
//! Knapcarve solves exact and near-exact variants of the bounded knapsack
//! problem (1-D and N-D), the subset-sum problem, and the equal-sum N-way
//! partition problem, over machine integers or arbitrary-precision rationals.
//!
//! All solvers share the same core: a dynamic program whose state is not a
//! dense table but the ordered set of *distinct reachable points* (the
//! "frontier"). Each item considered rebuilds the frontier with a linear
//! double-ended-queue merge, prunes points that provably cannot affect the
//! optimum using partial-sum bounds, and records enough per-layer information
//! to reconstruct the chosen items afterwards. Two specialisations complete
//! the picture: a binary-search fast path for superincreasing sequences, and
//! a Pareto-frontier search that keeps only dominance-optimal
//! (weight, profit) pairs when the input ordering offers no exploitable
//! bound. On top of those sits the partition driver, which repeatedly carves
//! equal-sum (or custom-sum) groups out of a pool and self-corrects with an
//! iterative recombination pass whenever a remainder is left over.
//!
//! ## Quick Example
//! The following solves a tiny 0/1 knapsack instance. The operation counter
//! is an accumulator of elementary solver steps; it is useful for complexity
//! testing and entirely optional for correctness.
//!
//! ```
//! use knapcarve::{solve_knapsack_1d, Ops};
//!
//! let weights = vec![10_i64, 20, 30];
//! let values  = vec![60_i64, 100, 120];
//!
//! let mut ops = Ops::default();
//! let solution = solve_knapsack_1d(&50, &weights, &values, &mut ops);
//!
//! assert_eq!(220, solution.value);
//! assert_eq!(50,  solution.weight);
//! assert_eq!(vec![1, 2], solution.indices);
//! ```
//!
//! ## Exact arithmetic
//! Every quantity flowing through the solvers is generic over the
//! [`Quantity`] trait: total order, exact equality, addition, subtraction and
//! division by an integer count. Machine integers and
//! `num_rational::BigRational` both qualify, so decimal inputs are handled
//! without ever touching floating point.
//!
//! ```
//! use knapcarve::{solve_subset_sum, Ops};
//! use num_rational::BigRational;
//! use num_bigint::BigInt;
//!
//! let r = |n: i64, d: i64| BigRational::new(BigInt::from(n), BigInt::from(d));
//!
//! let items = vec![r(1, 2), r(1, 3), r(1, 6)];
//! let mut ops = Ops::default();
//! let solution = solve_subset_sum(&r(5, 6), &items, &mut ops);
//!
//! assert_eq!(r(5, 6), solution.sum);
//! ```
//!
//! ## Partitioning
//! The partition driver turns the knapsack primitive into an N-way splitter.
//! Callers must inspect the returned remainder: a non-empty remainder is a
//! best-effort partial result, not an error.
//!
//! ```
//! use knapcarve::{solve_partition_n, Ops, PartitionConfig, PartitionTarget};
//!
//! let items = vec![4_i64, 3, 2, 1, 4, 3, 2, 1];
//! let mut ops = Ops::default();
//! let solution = solve_partition_n(
//!     &items,
//!     PartitionTarget::Count(4),
//!     &PartitionConfig::default(),
//!     &mut ops);
//!
//! assert!(solution.remainder_items.is_empty());
//! assert_eq!(4, solution.groups.len());
//! ```

mod common;
mod abstraction;
mod implementation;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
