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

//! This module provides the preprocessing every solve performs once before
//! any dynamic programming starts: monotonicity detection (so descending
//! inputs can be iterated in ascending order), backward partial sums (the
//! raw material of the pruning bounds), and the superincreasing analysis
//! that decides whether the binary-search fast path applies.

use std::cmp::Ordering;

use crate::{Measure, Quantity};

/// What a once-over of a scalar instance revealed. Drives the dispatch
/// between the fast path, the frontier engine and the Pareto search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScalarProfile {
    /// Weights never decrease along the input.
    pub all_asc: bool,
    /// Weights never increase along the input.
    pub all_desc: bool,
    /// Scanning feasible items from the small end, every weight is at least
    /// the running sum of the previously scanned feasible weights.
    pub superincreasing_weights: bool,
    /// Same condition on the values, scanned in the same direction. Required
    /// in addition to superincreasing weights for the *weighted* fast path.
    pub superincreasing_values: bool,
}

impl ScalarProfile {
    /// True iff the input is monotone one way or the other.
    pub fn monotone(&self) -> bool {
        self.all_asc || self.all_desc
    }

    /// True iff the subset-sum fast path applies (weights only).
    pub fn fast_path_subset_sum(&self) -> bool {
        self.monotone() && self.superincreasing_weights
    }

    /// True iff the weighted-knapsack fast path applies (weights and values).
    pub fn fast_path_knapsack(&self) -> bool {
        self.fast_path_subset_sum() && self.superincreasing_values
    }
}

/// Profiles a scalar instance against a capacity. Infeasible items (weight
/// above the capacity) are ignored by the superincreasing analysis, exactly
/// like they are filtered out before the DP runs.
pub(crate) fn profile_scalar<T: Quantity + Measure>(
    capacity: &T,
    weights: &[T],
    values: &[T],
) -> ScalarProfile {
    let (all_asc, all_desc) = monotonicity(weights);

    let mut superincreasing_weights = all_asc || all_desc;
    let mut superincreasing_values = superincreasing_weights;
    if superincreasing_weights {
        // scan from the small end
        let indexes: Vec<usize> = if all_asc {
            (0..weights.len()).collect()
        } else {
            (0..weights.len()).rev().collect()
        };
        let mut weight_sum = T::zero();
        let mut value_sum = T::zero();
        for i in indexes {
            if &weights[i] > capacity {
                continue;
            }
            if weights[i] < weight_sum {
                superincreasing_weights = false;
                break;
            }
            if values[i] < value_sum {
                superincreasing_values = false;
            }
            weight_sum = weight_sum + weights[i].clone();
            value_sum = value_sum + values[i].clone();
        }
    }
    superincreasing_values = superincreasing_values && superincreasing_weights;

    ScalarProfile { all_asc, all_desc, superincreasing_weights, superincreasing_values }
}

/// Detects whether a sequence of measures is entirely non-decreasing and/or
/// entirely non-increasing under the frontier sequencing order.
pub(crate) fn monotonicity<M: Measure>(weights: &[M]) -> (bool, bool) {
    let mut all_asc = true;
    let mut all_desc = true;
    for pair in weights.windows(2) {
        match pair[0].seq_cmp(&pair[1]) {
            Ordering::Less => all_desc = false,
            Ordering::Greater => all_asc = false,
            Ordering::Equal => {}
        }
    }
    (all_asc, all_desc)
}

/// Backward partial sums: `suffix[i]` is the sum of `weights[i + 1..]`, so
/// `suffix[n - 1]` is the origin. This is the bound material: a point plus
/// `suffix[i]` is everything it can ever grow into once item `i` has been
/// considered.
pub(crate) fn suffix_sums<M: Measure>(weights: &[M], origin: &M) -> Vec<M> {
    let mut sums = vec![origin.clone(); weights.len()];
    let mut acc = origin.clone();
    for i in (0..weights.len()).rev() {
        sums[i] = acc.clone();
        acc = acc.plus(&weights[i]);
    }
    sums
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_preprocess {
    use super::{monotonicity, profile_scalar, suffix_sums};

    #[test]
    fn monotonicity_flags_both_directions() {
        assert_eq!((true, false), monotonicity(&[1_i64, 2, 3]));
        assert_eq!((false, true), monotonicity(&[3_i64, 2, 1]));
        assert_eq!((false, false), monotonicity(&[1_i64, 3, 2]));
        assert_eq!((true, true), monotonicity(&[5_i64, 5, 5]));
    }

    #[test]
    fn suffix_sums_exclude_the_item_itself() {
        assert_eq!(vec![9, 5, 0], suffix_sums(&[3_i64, 4, 5], &0));
    }

    #[test]
    fn superincreasing_sequence_is_recognized() {
        let weights = [1_i64, 2, 5, 21, 69, 189, 376, 919];
        let profile = profile_scalar(&100, &weights, &weights);
        assert!(profile.all_asc);
        assert!(profile.superincreasing_weights);
        assert!(profile.fast_path_subset_sum());
        assert!(profile.fast_path_knapsack());
    }

    #[test]
    fn infeasible_items_do_not_break_the_analysis() {
        // 919 and 376 exceed the capacity; they are skipped by the scan
        let weights = [919_i64, 376, 69, 21, 5, 2, 1];
        let profile = profile_scalar(&100, &weights, &weights);
        assert!(profile.all_desc);
        assert!(profile.fast_path_subset_sum());
    }

    #[test]
    fn dense_sequences_are_not_superincreasing() {
        let weights = [1_i64, 2, 3, 4, 5];
        let profile = profile_scalar(&100, &weights, &weights);
        assert!(profile.all_asc);
        assert!(!profile.superincreasing_weights);
        assert!(!profile.fast_path_subset_sum());
    }

    #[test]
    fn unordered_sequences_have_no_fast_path() {
        let weights = [5_i64, 1, 9];
        let profile = profile_scalar(&100, &weights, &weights);
        assert!(!profile.monotone());
        assert!(!profile.fast_path_subset_sum());
    }

    #[test]
    fn weights_superincreasing_but_values_not() {
        let weights = [1_i64, 2, 4, 8, 16];
        let values = [10_i64, 1, 1, 1, 1];
        let profile = profile_scalar(&100, &weights, &values);
        assert!(profile.superincreasing_weights);
        assert!(!profile.superincreasing_values);
        assert!(profile.fast_path_subset_sum());
        assert!(!profile.fast_path_knapsack());
    }
}
