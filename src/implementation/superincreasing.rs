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

//! This module provides the exact fast path for superincreasing sequences:
//! when every item outweighs the sum of all smaller items (and, for the
//! weighted problem, every value outweighs the sum of all smaller values),
//! the greedy "repeatedly grab the largest item that still fits" strategy is
//! optimal and runs in O(n log n) via binary search. Applicability is
//! decided by the preprocessing profile; this module assumes it holds.

use crate::{Ops, Quantity};

/// One selected item: weight, value and position in the caller's input.
pub(crate) type Taken<T> = (T, T, usize);

/// Solves a superincreasing instance by repeated binary search. `ascending`
/// lists the feasible items in ascending weight order, each carrying its
/// original position. Returns the selection in ascending position order.
///
/// Ties are bit-exact: a probe that lands on a weight equal to the remaining
/// target takes that item immediately.
pub(crate) fn solve_superincreasing<T: Quantity>(
    capacity: &T,
    ascending: &[(T, T, usize)],
    ops: &mut Ops,
) -> Vec<Taken<T>> {
    let mut taken: Vec<Taken<T>> = vec![];
    let mut remaining = capacity.clone();
    // items above this bound were either taken already or are too large
    let mut bound = ascending.len();

    while bound > 0 && !remaining.is_zero() {
        match largest_not_above(&ascending[..bound], &remaining, ops) {
            None => break,
            Some(pos) => {
                let (weight, value, index) = ascending[pos].clone();
                remaining = remaining - weight.clone();
                taken.push((weight, value, index));
                bound = pos;
            }
        }
    }

    taken.sort_by_key(|(_, _, index)| *index);
    taken
}

/// Binary search for the position of the largest weight less than or equal
/// to `target`, or `None` when even the smallest weight exceeds it.
fn largest_not_above<T: Quantity>(
    items: &[(T, T, usize)],
    target: &T,
    ops: &mut Ops,
) -> Option<usize> {
    let mut lo = 0_usize;
    let mut hi = items.len();
    let mut best: Option<usize> = None;
    while lo < hi {
        ops.tick(1);
        let mid = lo + (hi - lo) / 2;
        if &items[mid].0 == target {
            return Some(mid);
        }
        if items[mid].0 < *target {
            best = Some(mid);
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    best
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_superincreasing {
    use super::solve_superincreasing;
    use crate::Ops;

    fn items(weights: &[i64]) -> Vec<(i64, i64, usize)> {
        weights.iter().enumerate().map(|(i, w)| (*w, *w, i)).collect()
    }

    #[test]
    fn greedy_descent_reaches_98_for_capacity_100() {
        let mut ops = Ops::default();
        let taken = solve_superincreasing(&100, &items(&[1, 2, 5, 21, 69]), &mut ops);
        let sum: i64 = taken.iter().map(|(w, _, _)| w).sum();
        assert_eq!(98, sum);
        assert_eq!(vec![0, 1, 2, 3, 4], taken.iter().map(|t| t.2).collect::<Vec<_>>());
    }

    #[test]
    fn exact_tie_is_taken_immediately() {
        let mut ops = Ops::default();
        let taken = solve_superincreasing(&21, &items(&[1, 2, 5, 21, 69]), &mut ops);
        assert_eq!(vec![(21, 21, 3)], taken);
    }

    #[test]
    fn each_item_is_taken_at_most_once() {
        // remaining budget after taking 5 is 5 again, 5 must not repeat
        let mut ops = Ops::default();
        let taken = solve_superincreasing(&10, &items(&[1, 2, 5]), &mut ops);
        let sum: i64 = taken.iter().map(|(w, _, _)| w).sum();
        assert_eq!(8, sum);
        assert_eq!(3, taken.len());
    }

    #[test]
    fn zero_capacity_selects_nothing() {
        let mut ops = Ops::default();
        assert!(solve_superincreasing(&0, &items(&[1, 2, 5]), &mut ops).is_empty());
    }

    #[test]
    fn too_small_items_terminate_the_descent() {
        let mut ops = Ops::default();
        let taken = solve_superincreasing(&3, &items(&[2, 10, 100]), &mut ops);
        assert_eq!(vec![(2, 2, 0)], taken);
    }
}
