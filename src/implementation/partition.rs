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

//! This module provides the N-way partition driver: it splits a multiset of
//! items into groups hitting a list of target sums exactly, by repeatedly
//! carving one group per target out of the remaining pool with the frontier
//! engine. Duplicate-heavy inputs get dedicated treatment before the
//! carving starts, and a leftover remainder triggers an iterative
//! recombination pass that merges already-carved groups back with the
//! remainder and re-solves them.
//!
//! The driver is best-effort: a non-empty remainder in the result is a
//! partial solution, not an error, and callers are expected to inspect it.

use std::cmp::Ordering;

use binary_heap_plus::BinaryHeap;
use compare::Compare;
use derive_builder::Builder;
use fxhash::FxHashSet;
use itertools::Itertools;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::implementation::frontier::{EngineItem, FrontierEngine};
use crate::{Measure, Ops, PartitionGroup, PartitionSolution, Point, Quantity};

/// What to split into: a count of equal-sum groups (targets are the total
/// divided by the count), or an explicit list of target sums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionTarget<T> {
    Count(usize),
    Sizes(Vec<T>),
}

impl<T: Quantity> PartitionTarget<T> {
    /// Resolves the target into the concrete list of group sums.
    pub(crate) fn resolve(self, items: &[T]) -> Vec<T> {
        match self {
            PartitionTarget::Sizes(sizes) => sizes,
            PartitionTarget::Count(0) => vec![],
            PartitionTarget::Count(count) => {
                let total = items.iter().fold(T::zero(), |acc, w| acc + w.clone());
                vec![total.div_int(count); count]
            }
        }
    }
}

/// Tuning knobs for the partition driver.
///
/// * `group_size` — when non-zero, every group must hold exactly this many
///   items (solved as a 2-D exact-fit knapsack);
/// * `optimization_limit` — maximum number of recombination passes, `None`
///   meaning half the number of targets, rounded up;
/// * `seed` — seeds the shuffles between recombination passes, so runs are
///   reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct PartitionConfig {
    pub group_size: usize,
    pub optimization_limit: Option<usize>,
    pub seed: u64,
}

/// Pops the largest outstanding target first.
#[derive(Debug, Clone, Copy, Default)]
struct LargestFirst;
impl<T: Ord> Compare<T> for LargestFirst {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// What one carving round produces: the satisfied groups, plus whatever
/// items and target sums could not be placed.
struct Carve<T> {
    groups: Vec<PartitionGroup<T>>,
    remainder_items: Vec<T>,
    remainder_sizes: Vec<T>,
}

/// Entry point used by the facade. `sizes` is already resolved.
pub(crate) fn partition_multiset<T: Quantity + Measure>(
    items: &[T],
    sizes: Vec<T>,
    config: &PartitionConfig,
    ops: &mut Ops,
) -> PartitionSolution<T> {
    if items.is_empty() || sizes.is_empty() {
        return PartitionSolution {
            groups: vec![],
            remainder_items: items.to_vec(),
            remainder_sizes: sizes,
            optimizations_applied: 0,
        };
    }

    let mut sorted = items.to_vec();
    sorted.sort();
    let mut keys: Vec<(T, usize)> = vec![];
    for item in sorted.iter().cloned() {
        match keys.last_mut() {
            Some((key, count)) if *key == item => *count += 1,
            _ => keys.push((item, 1)),
        }
    }

    let size_count = sizes.len();
    let uniform_count = keys[0].1;
    let counts_uniform = keys.iter().all(|(_, count)| *count == uniform_count);
    let sizes_uniform = sizes.windows(2).all(|pair| pair[0] == pair[1]);

    let carve = if keys.len() == 1 {
        debug!("all {} items share one value, using the linear splitter", items.len());
        split_uniform(&keys[0].0, keys[0].1, sizes)
    } else if uniform_count == 1 && counts_uniform {
        debug!("{} distinct items, carving targets directly", items.len());
        divide_set(sorted, sizes, config.group_size, ops)
    } else if counts_uniform
        && uniform_count > 1
        && sizes_uniform
        && size_count % uniform_count == 0
        && config.group_size == 0
    {
        // every key repeats the same number of times and the targets are
        // all equal: solve once on the unique keys, replicate the outcome
        debug!(
            "collapsing {} copies of {} unique keys into a {}-way subproblem",
            uniform_count,
            keys.len(),
            size_count / uniform_count
        );
        let unique: Vec<T> = keys.iter().map(|(key, _)| key.clone()).collect();
        let sub_sizes = vec![sizes[0].clone(); size_count / uniform_count];
        let sub = partition_multiset(&unique, sub_sizes, config, ops);
        return replicate(sub, uniform_count);
    } else {
        debug!("mixed duplicate counts, interleaving {} keys before carving", keys.len());
        divide_set(interleave(&keys), sizes, config.group_size, ops)
    };

    optimize(carve, config, ops)
}

/// All items share one value: a group is just the right number of copies,
/// found by counting, no search involved.
fn split_uniform<T: Quantity>(value: &T, count: usize, sizes: Vec<T>) -> Carve<T> {
    let mut remaining = count;
    let mut groups = vec![];
    let mut remainder_sizes = vec![];
    for target in sizes {
        let mut acc = T::zero();
        let mut copies = 0;
        while acc < target && copies < remaining {
            acc = acc + value.clone();
            copies += 1;
        }
        if acc == target {
            remaining -= copies;
            groups.push(PartitionGroup {
                items: vec![value.clone(); copies],
                sizes: vec![target],
            });
        } else {
            remainder_sizes.push(target);
        }
    }
    Carve {
        groups,
        remainder_items: vec![value.clone(); remaining],
        remainder_sizes,
    }
}

/// Flattens duplicate keys into a carving order that keeps copies of the
/// same key apart: one copy of each key per round, walking the sorted key
/// list forward, with the walk direction flipped every third round.
fn interleave<T: Quantity>(keys: &[(T, usize)]) -> Vec<T> {
    let rounds = keys.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let mut pool = vec![];
    for round in 0..rounds {
        let forward = (round / 3) % 2 == 0;
        let left_over = |(key, count): &(T, usize)| {
            if *count > round {
                Some(key.clone())
            } else {
                None
            }
        };
        if forward {
            pool.extend(keys.iter().filter_map(left_over));
        } else {
            pool.extend(keys.iter().rev().filter_map(left_over));
        }
    }
    pool
}

/// Carves one group per target sum out of the pool, largest target first.
/// A target that cannot be hit exactly is deferred to the remainder and
/// the pool is kept for the smaller targets.
fn divide_set<T: Quantity + Measure>(
    pool: Vec<T>,
    sizes: Vec<T>,
    group_size: usize,
    ops: &mut Ops,
) -> Carve<T> {
    let mut pool = pool;
    let mut groups = vec![];
    let mut remainder_sizes = vec![];
    let mut heap = BinaryHeap::from_vec_cmp(sizes, LargestFirst);

    while let Some(target) = heap.pop() {
        ops.tick(1);
        let pool_sum = pool.iter().fold(T::zero(), |acc, w| acc + w.clone());
        if pool_sum < target {
            remainder_sizes.push(target);
            continue;
        }
        let taken = if group_size == 0 {
            carve_scalar(&pool, &target, ops)
        } else {
            carve_counted(&pool, &target, group_size, ops)
        };
        match taken {
            None => {
                trace!("target {target:?} not exactly reachable, deferring");
                remainder_sizes.push(target);
            }
            Some(taken) => {
                trace!("target {target:?} carved with {} items", taken.len());
                let chosen: FxHashSet<usize> = taken.into_iter().collect();
                let mut group_items = Vec::with_capacity(chosen.len());
                let mut rest = Vec::with_capacity(pool.len());
                for (i, item) in pool.into_iter().enumerate() {
                    if chosen.contains(&i) {
                        group_items.push(item);
                    } else {
                        rest.push(item);
                    }
                }
                pool = rest;
                groups.push(PartitionGroup { items: group_items, sizes: vec![target] });
            }
        }
    }
    Carve { groups, remainder_items: pool, remainder_sizes }
}

/// Exact-sum carve: subset-sum over the pool, accepted only on exact fit.
fn carve_scalar<T: Quantity + Measure>(pool: &[T], target: &T, ops: &mut Ops) -> Option<Vec<usize>> {
    let items = pool
        .iter()
        .enumerate()
        .filter(|(_, w)| *w <= target)
        .map(|(i, w)| EngineItem { weight: w.clone(), value: w.clone(), index: i })
        .collect();
    let solution = FrontierEngine::new(target.clone(), items, true).solve(ops);
    (solution.point == *target).then_some(solution.taken)
}

/// Exact-sum, exact-cardinality carve: 2-D knapsack on (weight, 1) points
/// against (target, group_size), accepted only when both dimensions fit
/// exactly.
fn carve_counted<T: Quantity + Measure>(
    pool: &[T],
    target: &T,
    group_size: usize,
    ops: &mut Ops,
) -> Option<Vec<usize>> {
    let capacity = Point::new(vec![target.clone(), T::from_int(group_size)]);
    let items = pool
        .iter()
        .enumerate()
        .map(|(i, w)| EngineItem {
            weight: Point::new(vec![w.clone(), T::from_int(1)]),
            value: w.clone(),
            index: i,
        })
        .filter(|item| item.weight.fits(&capacity))
        .collect();
    let solution: crate::implementation::frontier::EngineSolution<Point<T>, T> =
        FrontierEngine::new(capacity.clone(), items, true).solve(ops);
    (solution.point == capacity).then_some(solution.taken)
}

/// Scales a sub-solution on unique keys back up to the duplicated input.
fn replicate<T: Quantity>(sub: PartitionSolution<T>, copies: usize) -> PartitionSolution<T> {
    let mut groups = Vec::with_capacity(sub.groups.len() * copies);
    for group in sub.groups {
        for _ in 0..copies {
            groups.push(group.clone());
        }
    }
    let mut remainder_items = vec![];
    let mut remainder_sizes = vec![];
    for _ in 0..copies {
        remainder_items.extend(sub.remainder_items.iter().cloned());
        remainder_sizes.extend(sub.remainder_sizes.iter().cloned());
    }
    PartitionSolution {
        groups,
        remainder_items,
        remainder_sizes,
        optimizations_applied: sub.optimizations_applied,
    }
}

/// The recombination pass. For a growing merge limit `l`, candidate merges
/// of `l` carved groups plus the current remainder are re-solved; a merge
/// is kept when it strictly shrinks the remainder (ties broken by fewer
/// outstanding target sums). Groups claimed by an accepted merge are off
/// limits for the rest of the pass. Groups and remainder are shuffled
/// between passes so repeated failures explore different carving orders.
fn optimize<T: Quantity + Measure>(
    carve: Carve<T>,
    config: &PartitionConfig,
    ops: &mut Ops,
) -> PartitionSolution<T> {
    let Carve { mut groups, mut remainder_items, mut remainder_sizes } = carve;
    let mut applied = 0usize;

    let target_count = groups.len() + remainder_sizes.len();
    let max_limit = target_count.div_ceil(2).max(1);
    let pass_budget = config.optimization_limit.unwrap_or(max_limit);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut passes = 0usize;

    let mut limit = 1usize;
    while passes < pass_budget
        && limit <= max_limit
        && !remainder_items.is_empty()
        && !remainder_sizes.is_empty()
        && !groups.is_empty()
    {
        if limit == 2 {
            // merging exactly two groups rarely frees a usable subset
            limit += 1;
            continue;
        }
        passes += 1;
        let mut claimed: FxHashSet<usize> = FxHashSet::default();
        let mut accepted_groups: Vec<PartitionGroup<T>> = vec![];

        for combo in (0..groups.len()).combinations(limit.min(groups.len())) {
            if combo.iter().any(|i| claimed.contains(i)) {
                continue;
            }
            let mut merged_pool = remainder_items.clone();
            let mut merged_sizes = remainder_sizes.clone();
            for i in &combo {
                merged_pool.extend(groups[*i].items.iter().cloned());
                merged_sizes.extend(groups[*i].sizes.iter().cloned());
            }
            let outcome = divide_set(merged_pool, merged_sizes, config.group_size, ops);

            let better = outcome.remainder_items.len() < remainder_items.len()
                || (outcome.remainder_items.len() == remainder_items.len()
                    && outcome.remainder_sizes.len() < remainder_sizes.len());
            if better {
                debug!(
                    "pass {passes}: merging {} groups with the remainder shrank it to {} items",
                    combo.len(),
                    outcome.remainder_items.len()
                );
                claimed.extend(combo);
                accepted_groups.extend(outcome.groups);
                remainder_items = outcome.remainder_items;
                remainder_sizes = outcome.remainder_sizes;
                applied += 1;
                if remainder_items.is_empty() && remainder_sizes.is_empty() {
                    break;
                }
            }
        }

        let mut kept: Vec<PartitionGroup<T>> = groups
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !claimed.contains(i))
            .map(|(_, group)| group)
            .collect();
        kept.extend(accepted_groups);
        groups = kept;

        groups.shuffle(&mut rng);
        remainder_items.shuffle(&mut rng);
        limit += 1;
    }

    PartitionSolution {
        groups,
        remainder_items,
        remainder_sizes,
        optimizations_applied: applied,
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_partition {
    use super::{divide_set, interleave, partition_multiset, split_uniform};
    use super::{PartitionConfig, PartitionConfigBuilder, PartitionTarget};
    use crate::Ops;

    fn conserved(input: &[i64], solution: &crate::PartitionSolution<i64>) -> bool {
        let mut seen: Vec<i64> = solution
            .groups
            .iter()
            .flat_map(|group| group.items.iter().copied())
            .chain(solution.remainder_items.iter().copied())
            .collect();
        let mut expected = input.to_vec();
        seen.sort_unstable();
        expected.sort_unstable();
        seen == expected
    }

    #[test]
    fn target_count_resolves_to_equal_shares() {
        let items = vec![3_i64, 5, 7, 9];
        assert_eq!(vec![6, 6, 6, 6], PartitionTarget::Count(4).resolve(&items));
        assert_eq!(Vec::<i64>::new(), PartitionTarget::Count(0).resolve(&items));
        assert_eq!(vec![10, 14], PartitionTarget::Sizes(vec![10, 14]).resolve(&items));
    }

    #[test]
    fn config_builder_fills_in_defaults() {
        let config = PartitionConfigBuilder::default().seed(7).build().unwrap();
        assert_eq!(0, config.group_size);
        assert_eq!(None, config.optimization_limit);
        assert_eq!(7, config.seed);
    }

    #[test]
    fn distinct_items_are_carved_per_target() {
        let items = vec![1_i64, 2, 3, 4, 5, 6, 7, 8];
        let solution = partition_multiset(
            &items,
            vec![18, 18],
            &PartitionConfig::default(),
            &mut Ops::default(),
        );
        assert!(solution.remainder_items.is_empty());
        assert!(solution.remainder_sizes.is_empty());
        assert!(conserved(&items, &solution));
        for group in &solution.groups {
            assert_eq!(18_i64, group.items.iter().sum());
        }
    }

    #[test]
    fn single_repeated_value_splits_by_counting() {
        let carve = split_uniform(&5_i64, 6, vec![15, 10, 10]);
        assert_eq!(2, carve.groups.len());
        assert_eq!(vec![5, 5, 5], carve.groups[0].items);
        assert_eq!(vec![5, 5], carve.groups[1].items);
        assert_eq!(vec![10], carve.remainder_sizes);
        assert_eq!(vec![5], carve.remainder_items);
    }

    #[test]
    fn uniform_duplicates_collapse_to_the_unique_keys() {
        let items = vec![4_i64, 3, 2, 1, 4, 3, 2, 1];
        let solution = partition_multiset(
            &items,
            vec![5, 5, 5, 5],
            &PartitionConfig::default(),
            &mut Ops::default(),
        );
        assert!(solution.remainder_items.is_empty());
        assert!(solution.remainder_sizes.is_empty());
        assert!(conserved(&items, &solution));
        for group in &solution.groups {
            assert_eq!(5_i64, group.items.iter().sum());
        }
    }

    #[test]
    fn interleave_keeps_copies_of_a_key_apart() {
        let keys = vec![(1_i64, 2), (2, 1), (3, 2)];
        assert_eq!(vec![1, 2, 3, 1, 3], interleave(&keys));
    }

    #[test]
    fn interleave_flips_direction_every_third_round() {
        let keys = vec![(1_i64, 4), (2, 4)];
        assert_eq!(vec![1, 2, 1, 2, 1, 2, 2, 1], interleave(&keys));
    }

    #[test]
    fn unreachable_targets_are_deferred_not_fatal() {
        let carve = divide_set(vec![2_i64, 4, 6], vec![7, 6], 0, &mut Ops::default());
        assert_eq!(1, carve.groups.len());
        assert_eq!(vec![2, 4], carve.groups[0].items);
        assert_eq!(vec![7], carve.remainder_sizes);
        assert_eq!(vec![6], carve.remainder_items);
    }

    #[test]
    fn group_size_forces_exact_cardinality() {
        // 8 = 2 + 6 = 8 alone; only the two-item split is allowed
        let carve = divide_set(vec![2_i64, 6, 8], vec![8], 2, &mut Ops::default());
        assert_eq!(1, carve.groups.len());
        assert_eq!(vec![2, 6], carve.groups[0].items);
        assert_eq!(vec![8], carve.remainder_items);
    }

    #[test]
    fn group_size_defers_targets_it_cannot_fill() {
        let carve = divide_set(vec![3_i64, 5], vec![8, 3], 1, &mut Ops::default());
        // 8 needs two items, impossible at cardinality 1
        assert_eq!(1, carve.groups.len());
        assert_eq!(vec![3], carve.groups[0].items);
        assert_eq!(vec![8], carve.remainder_sizes);
        assert_eq!(vec![5], carve.remainder_items);
    }

    #[test]
    fn recombination_shrinks_the_remainder() {
        // the first carve takes 8 as {2, 6}, stranding 3 and 5; merging
        // that group back with the remainder re-splits into {3, 5} and {6}
        let items = vec![2_i64, 6, 3, 5];
        let solution = partition_multiset(
            &items,
            vec![8, 6],
            &PartitionConfig::default(),
            &mut Ops::default(),
        );
        assert!(conserved(&items, &solution));
        assert!(solution.remainder_sizes.is_empty());
        assert_eq!(vec![2], solution.remainder_items);
        assert_eq!(1, solution.optimizations_applied);
        let mut sums: Vec<i64> = solution
            .groups
            .iter()
            .map(|group| group.items.iter().sum())
            .collect();
        sums.sort_unstable();
        assert_eq!(vec![6, 8], sums);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let items = vec![9_i64, 8, 7, 6, 5, 4, 3, 2, 1, 10, 11, 12];
        let config = PartitionConfigBuilder::default().seed(42).build().unwrap();
        let a = partition_multiset(&items, vec![22, 22, 22, 12], &config, &mut Ops::default());
        let b = partition_multiset(&items, vec![22, 22, 22, 12], &config, &mut Ops::default());
        assert_eq!(a.groups, b.groups);
        assert_eq!(a.remainder_items, b.remainder_items);
    }

    #[test]
    fn empty_inputs_round_trip_as_remainder() {
        let solution = partition_multiset(
            &Vec::<i64>::new(),
            vec![5],
            &PartitionConfig::default(),
            &mut Ops::default(),
        );
        assert!(solution.groups.is_empty());
        assert_eq!(vec![5], solution.remainder_sizes);
    }
}
