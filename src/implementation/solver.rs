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

//! This module provides the public solver entry points and the dispatch
//! policy connecting them to the machinery underneath:
//!
//! * a superincreasing instance goes to the binary-search fast path;
//! * a monotone instance goes to the frontier engine (descending inputs are
//!   iterated in ascending order internally);
//! * an unordered weighted instance goes to the Pareto-frontier search,
//!   where no partial-sum bound is exploitable;
//! * the N-way partition driver sits on top of all of the above.
//!
//! Every function is total: degenerate inputs (zero capacity, nothing
//! feasible, empty slices) resolve to an empty selection, never an error.

use log::debug;

use crate::implementation::frontier::{EngineItem, EngineSolution, FrontierEngine};
use crate::implementation::preprocess::{monotonicity, profile_scalar};
use crate::implementation::superincreasing::solve_superincreasing;
use crate::{
    KnapsackSolution, Measure, NdKnapsackSolution, Ops, ParetoKnapsack, PartitionConfig,
    PartitionSolution, PartitionTarget, Point, Quantity, SubsetSumSolution,
};

/// Finds the subset of `items` whose sum is as close to `capacity` as
/// possible without exceeding it.
pub fn solve_subset_sum<T: Quantity + Measure>(
    capacity: &T,
    items: &[T],
    ops: &mut Ops,
) -> SubsetSumSolution<T> {
    let profile = profile_scalar(capacity, items, items);
    if profile.fast_path_subset_sum() {
        debug!("superincreasing subset-sum instance, taking the fast path");
        let ascending = ascending_feasible(capacity, items, items);
        let taken = solve_superincreasing(capacity, &ascending, ops);
        let sum = taken.iter().fold(T::zero(), |acc, (w, _, _)| acc + w.clone());
        return SubsetSumSolution {
            sum,
            items: taken.iter().map(|(w, _, _)| w.clone()).collect(),
            indices: taken.iter().map(|(_, _, i)| *i).collect(),
        };
    }

    let engine_items = scalar_engine_items(capacity, items, items, profile.all_desc);
    let solution = FrontierEngine::new(capacity.clone(), engine_items, true).solve(ops);
    SubsetSumSolution {
        sum: solution.point,
        items: solution.taken.iter().map(|i| items[*i].clone()).collect(),
        indices: solution.taken,
    }
}

/// Maximizes total value subject to total weight at most `capacity`.
/// `weights` and `values` are parallel slices.
pub fn solve_knapsack_1d<T: Quantity + Measure>(
    capacity: &T,
    weights: &[T],
    values: &[T],
    ops: &mut Ops,
) -> KnapsackSolution<T> {
    let profile = profile_scalar(capacity, weights, values);
    if profile.fast_path_knapsack() {
        debug!("superincreasing knapsack instance, taking the fast path");
        let ascending = ascending_feasible(capacity, weights, values);
        let taken = solve_superincreasing(capacity, &ascending, ops);
        return KnapsackSolution {
            value: taken.iter().fold(T::zero(), |acc, (_, v, _)| acc + v.clone()),
            weight: taken.iter().fold(T::zero(), |acc, (w, _, _)| acc + w.clone()),
            weights: taken.iter().map(|(w, _, _)| w.clone()).collect(),
            values: taken.iter().map(|(_, v, _)| v.clone()).collect(),
            indices: taken.iter().map(|(_, _, i)| *i).collect(),
        };
    }
    if !profile.monotone() {
        debug!("unordered weights, no partial-sum bound: using the Pareto search");
        return ParetoKnapsack::new().solve(capacity, weights, values, false, false, ops);
    }

    let engine_items = scalar_engine_items(capacity, weights, values, profile.all_desc);
    let solution = FrontierEngine::new(capacity.clone(), engine_items, false).solve(ops);
    KnapsackSolution {
        value: solution.value,
        weight: solution.point,
        weights: solution.taken.iter().map(|i| weights[*i].clone()).collect(),
        values: solution.taken.iter().map(|i| values[*i].clone()).collect(),
        indices: solution.taken,
    }
}

/// Maximizes total value subject to a dimension-wise capacity point. Every
/// item point must have the same dimension count as the capacity.
pub fn solve_knapsack_nd<T: Quantity>(
    capacity: &Point<T>,
    item_points: &[Point<T>],
    values: &[T],
    ops: &mut Ops,
) -> NdKnapsackSolution<T> {
    let (_, all_desc) = monotonicity(item_points);
    let order: Vec<usize> = if all_desc {
        (0..item_points.len()).rev().collect()
    } else {
        (0..item_points.len()).collect()
    };
    let engine_items = order
        .into_iter()
        .filter(|i| item_points[*i].fits(capacity))
        .map(|i| EngineItem { weight: item_points[i].clone(), value: values[i].clone(), index: i })
        .collect();

    let solution: EngineSolution<Point<T>, T> =
        FrontierEngine::new(capacity.clone(), engine_items, false).solve(ops);
    NdKnapsackSolution {
        value: solution.value,
        point: solution.point,
        points: solution.taken.iter().map(|i| item_points[*i].clone()).collect(),
        values: solution.taken.iter().map(|i| values[*i].clone()).collect(),
        indices: solution.taken,
    }
}

/// Maximizes total value with the Pareto-frontier search regardless of the
/// input ordering. See [`ParetoKnapsack`] for the reusable-index variant.
pub fn solve_pareto_knapsack<T: Quantity>(
    capacity: &T,
    weights: &[T],
    values: &[T],
    ops: &mut Ops,
    ratio_sort: bool,
) -> KnapsackSolution<T> {
    ParetoKnapsack::new().solve(capacity, weights, values, ratio_sort, false, ops)
}

/// Splits `items` into groups hitting the resolved target sums exactly.
/// Anything left in the returned remainder could not be placed; a non-empty
/// remainder is a partial result, not an error.
pub fn solve_partition_n<T: Quantity + Measure>(
    items: &[T],
    target: PartitionTarget<T>,
    config: &PartitionConfig,
    ops: &mut Ops,
) -> PartitionSolution<T> {
    let sizes = target.resolve(items);
    crate::implementation::partition::partition_multiset(items, sizes, config, ops)
}

/// The feasible items sorted by ascending weight, as the fast path wants
/// them, each keeping its original position.
fn ascending_feasible<T: Quantity>(
    capacity: &T,
    weights: &[T],
    values: &[T],
) -> Vec<(T, T, usize)> {
    let mut items: Vec<(T, T, usize)> = weights
        .iter()
        .zip(values.iter())
        .enumerate()
        .filter(|(_, (w, _))| *w <= capacity)
        .map(|(i, (w, v))| (w.clone(), v.clone(), i))
        .collect();
    items.sort_by(|a, b| a.0.cmp(&b.0));
    items
}

/// The feasible items in the order the engine iterates them: input order,
/// or reversed when the input is descending.
fn scalar_engine_items<T: Quantity>(
    capacity: &T,
    weights: &[T],
    values: &[T],
    reversed: bool,
) -> Vec<EngineItem<T, T>> {
    let order: Vec<usize> = if reversed {
        (0..weights.len()).rev().collect()
    } else {
        (0..weights.len()).collect()
    };
    order
        .into_iter()
        .filter(|i| &weights[*i] <= capacity)
        .map(|i| EngineItem { weight: weights[i].clone(), value: values[i].clone(), index: i })
        .collect()
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_solver {
    use super::{solve_knapsack_1d, solve_knapsack_nd, solve_pareto_knapsack, solve_subset_sum};
    use crate::{Ops, Point};

    #[test]
    fn subset_sum_takes_the_fast_path_on_superincreasing_input() {
        let items = vec![1_i64, 2, 5, 21, 69, 189, 376, 919];
        let mut ops = Ops::default();
        let solution = solve_subset_sum(&100, &items, &mut ops);
        assert_eq!(98, solution.sum);
        assert_eq!(vec![1, 2, 5, 21, 69], solution.items);
        assert_eq!(vec![0, 1, 2, 3, 4], solution.indices);
    }

    #[test]
    fn subset_sum_handles_descending_input() {
        let items = vec![8_i64, 5, 4, 1];
        let solution = solve_subset_sum(&11, &items, &mut Ops::default());
        assert_eq!(10, solution.sum);
        let check: i64 = solution.indices.iter().map(|i| items[*i]).sum();
        assert_eq!(solution.sum, check);
    }

    #[test]
    fn subset_sum_of_nothing_is_zero() {
        let solution = solve_subset_sum(&10, &Vec::<i64>::new(), &mut Ops::default());
        assert_eq!(0, solution.sum);
        assert!(solution.indices.is_empty());
    }

    #[test]
    fn knapsack_on_monotone_weights_uses_the_frontier() {
        let weights = vec![10_i64, 20, 30];
        let values = vec![60_i64, 100, 120];
        let solution = solve_knapsack_1d(&50, &weights, &values, &mut Ops::default());
        assert_eq!(220, solution.value);
        assert_eq!(50, solution.weight);
        assert_eq!(vec![1, 2], solution.indices);
    }

    #[test]
    fn knapsack_on_unordered_weights_uses_the_pareto_search() {
        let weights = vec![56_i64, 59, 80, 64, 75, 17];
        let values = vec![50_i64, 50, 64, 46, 50, 5];
        let solution = solve_knapsack_1d(&190, &weights, &values, &mut Ops::default());
        assert_eq!(150, solution.value);
        assert_eq!(vec![0, 1, 4], solution.indices);
    }

    #[test]
    fn frontier_and_pareto_agree_on_monotone_weights() {
        let weights = vec![2_i64, 4, 7, 9, 11, 13];
        let values = vec![1_i64, 3, 10, 7, 12, 6];
        for capacity in 0..=46 {
            let dispatched = solve_knapsack_1d(&capacity, &weights, &values, &mut Ops::default());
            let pareto =
                solve_pareto_knapsack(&capacity, &weights, &values, &mut Ops::default(), false);
            assert_eq!(pareto.value, dispatched.value, "capacity {capacity}");
        }
    }

    #[test]
    fn nd_knapsack_with_equal_dimensions_matches_1d() {
        let weights = vec![10_i64, 20, 30];
        let values = vec![60_i64, 100, 120];
        let points: Vec<Point<i64>> =
            weights.iter().map(|w| Point::uniform(2, *w)).collect();
        let solution =
            solve_knapsack_nd(&Point::uniform(2, 50), &points, &values, &mut Ops::default());
        assert_eq!(220, solution.value);
        assert_eq!(Point::uniform(2, 50), solution.point);
        assert_eq!(vec![1, 2], solution.indices);
    }

    #[test]
    fn nd_knapsack_handles_descending_points() {
        let points = vec![Point::uniform(2, 30_i64), Point::uniform(2, 20), Point::uniform(2, 10)];
        let values = vec![120_i64, 100, 60];
        let solution =
            solve_knapsack_nd(&Point::uniform(2, 50), &points, &values, &mut Ops::default());
        assert_eq!(220, solution.value);
        assert_eq!(vec![0, 1], solution.indices);
    }

    #[test]
    fn zero_capacity_returns_the_empty_selection() {
        let solution = solve_knapsack_1d(&0, &vec![3_i64, 4], &vec![5_i64, 6], &mut Ops::default());
        assert_eq!(0, solution.value);
        assert!(solution.indices.is_empty());
    }
}
