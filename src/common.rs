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

//! This module defines the most basic data types that are used throughout all
//! the code of our library: the operation counter, the error type, and the
//! solution shapes returned by the various solvers.

use std::fmt;
use std::ops::AddAssign;

use thiserror::Error;

use crate::Point;

// ----------------------------------------------------------------------------
// --- OPERATION COUNTER ------------------------------------------------------
// ----------------------------------------------------------------------------
/// An accumulator of elementary solver operations (points touched, frontier
/// merges, binary search probes, ...). Callers thread one `Ops` through any
/// number of solves to measure how much work was performed. It plays no role
/// in correctness whatsoever.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ops(u64);

impl Ops {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self(0)
    }
    /// Accounts for `n` additional elementary operations.
    #[inline]
    pub fn tick(&mut self, n: u64) {
        self.0 = self.0.saturating_add(n);
    }
    /// The total number of elementary operations accounted so far.
    pub fn count(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AddAssign<u64> for Ops {
    fn add_assign(&mut self, rhs: u64) {
        self.tick(rhs)
    }
}

// ----------------------------------------------------------------------------
// --- ERRORS -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The errors a solver can escalate. Degenerate inputs (empty item lists,
/// zero capacities, unsatisfiable targets) are *not* errors: they resolve to
/// empty solutions or to a non-empty partition remainder. The only hard
/// errors are misuses of the prebuilt Pareto search index, which is sound
/// only at or below the capacity it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// A Pareto search index was queried with a capacity larger than the one
    /// it was built for. Answers beyond the build bound would silently be
    /// wrong, so the misuse is escalated instead.
    #[error("pareto index built for capacity {built} cannot answer a query at {queried}")]
    IndexCapacityExceeded {
        /// The capacity the index was built for, rendered for diagnostics.
        built: String,
        /// The capacity of the offending query.
        queried: String,
    },
    /// A Pareto search index was queried before `solve` was asked to build it.
    #[error("pareto index has not been built, solve with build_index first")]
    IndexNotBuilt,
}

// ----------------------------------------------------------------------------
// --- SOLUTIONS --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The outcome of a subset-sum solve: the best achievable sum that does not
/// exceed the capacity, together with the items realizing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetSumSolution<T> {
    /// The achieved sum (equal to the capacity on an exact fit).
    pub sum: T,
    /// The selected items, in ascending position order.
    pub items: Vec<T>,
    /// The positions of the selected items in the caller's input slice.
    pub indices: Vec<usize>,
}

/// The outcome of a 1-D knapsack solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnapsackSolution<T> {
    /// The best total value found.
    pub value: T,
    /// The total weight of the selection.
    pub weight: T,
    /// The weights of the selected items, in ascending position order.
    pub weights: Vec<T>,
    /// The values of the selected items, parallel to `weights`.
    pub values: Vec<T>,
    /// The positions of the selected items in the caller's input slices.
    pub indices: Vec<usize>,
}

/// The outcome of an N-dimensional knapsack solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdKnapsackSolution<T> {
    /// The best total value found.
    pub value: T,
    /// The achieved point (dimension-wise total weight of the selection).
    pub point: Point<T>,
    /// The weight points of the selected items, in ascending position order.
    pub points: Vec<Point<T>>,
    /// The values of the selected items, parallel to `points`.
    pub values: Vec<T>,
    /// The positions of the selected items in the caller's input slices.
    pub indices: Vec<usize>,
}

// ----------------------------------------------------------------------------
// --- PARTITIONS -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// One realized group of a partition: an ordered list of items together with
/// the target sizes it satisfies. A group normally satisfies exactly one
/// size; it may carry several when the optimization pass merges groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionGroup<T> {
    /// The items assigned to this group.
    pub items: Vec<T>,
    /// The target sizes this group satisfies.
    pub sizes: Vec<T>,
}

/// The outcome of an N-way partition solve. A perfect partition has an empty
/// `remainder_items` and `remainder_sizes`; anything left in either is the
/// best-effort remainder the driver could not place. Callers must check the
/// remainder rather than assume success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSolution<T> {
    /// The fully satisfied groups.
    pub groups: Vec<PartitionGroup<T>>,
    /// The items that could not be placed in any group.
    pub remainder_items: Vec<T>,
    /// The target sizes that could not be satisfied.
    pub remainder_sizes: Vec<T>,
    /// How many recombinations the optimization pass accepted.
    pub optimizations_applied: usize,
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_ops {
    use crate::Ops;

    #[test]
    fn it_starts_at_zero() {
        assert_eq!(0, Ops::new().count());
    }

    #[test]
    fn tick_accumulates() {
        let mut ops = Ops::new();
        ops.tick(3);
        ops.tick(4);
        assert_eq!(7, ops.count());
    }

    #[test]
    fn add_assign_is_a_tick() {
        let mut ops = Ops::new();
        ops += 41;
        ops += 1;
        assert_eq!(42, ops.count());
    }

    #[test]
    fn it_saturates_instead_of_wrapping() {
        let mut ops = Ops::new();
        ops.tick(u64::MAX);
        ops.tick(10);
        assert_eq!(u64::MAX, ops.count());
    }
}
