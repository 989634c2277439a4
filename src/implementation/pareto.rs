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

//! This module provides the Pareto-frontier knapsack solver, used when the
//! item ordering offers no exploitable partial-sum bound. The state after
//! considering `i` items is the list of strictly Pareto-optimal
//! (weight, profit) pairs in ascending weight and ascending profit. Each
//! item merges two already-sorted streams (the old frontier, and the old
//! frontier shifted by the item) in linear time. Nodes carry a predecessor
//! link and the item position, so the selection behind any frontier point
//! can be rebuilt by walking the chain.
//!
//! The final frontier is itself the answer to every capacity at or below
//! the one it was built for. [`ParetoIndex`] freezes it so repeated queries
//! at decreasing capacities resolve with one binary search each.

use std::rc::Rc;

use crate::{KnapsackSolution, Ops, Quantity, SolveError};

/// One Pareto-optimal point: cumulative weight and profit, the caller
/// position of the item whose addition created the point, and the point it
/// was extended from (`None` for a single-item selection).
#[derive(Debug)]
struct ParetoNode<T> {
    weight: T,
    profit: T,
    item: usize,
    pred: Option<Rc<ParetoNode<T>>>,
}

impl<T: Quantity> ParetoNode<T> {
    /// Rebuilds the selection behind a point, sorted by caller position.
    fn selection(node: &Rc<Self>) -> Vec<(usize, T, T)> {
        let mut picked = vec![];
        let mut node = node.clone();
        loop {
            let (weight, profit) = match &node.pred {
                Some(pred) => (
                    node.weight.clone() - pred.weight.clone(),
                    node.profit.clone() - pred.profit.clone(),
                ),
                None => (node.weight.clone(), node.profit.clone()),
            };
            picked.push((node.item, weight, profit));
            node = match &node.pred {
                Some(pred) => pred.clone(),
                None => break,
            };
        }
        picked.sort_unstable_by_key(|(item, _, _)| *item);
        picked
    }

    fn solution(node: Option<&Rc<Self>>) -> KnapsackSolution<T> {
        match node {
            None => KnapsackSolution {
                value: T::zero(),
                weight: T::zero(),
                weights: vec![],
                values: vec![],
                indices: vec![],
            },
            Some(node) => {
                let picked = Self::selection(node);
                KnapsackSolution {
                    value: node.profit.clone(),
                    weight: node.weight.clone(),
                    weights: picked.iter().map(|(_, w, _)| w.clone()).collect(),
                    values: picked.iter().map(|(_, _, v)| v.clone()).collect(),
                    indices: picked.iter().map(|(item, _, _)| *item).collect(),
                }
            }
        }
    }
}

/// Appends a candidate to a skyline under construction: dominated points
/// are dropped, a strictly better profit at the same weight replaces the
/// previous point. Candidates must arrive in non-decreasing weight order.
fn push_skyline<T: Quantity>(skyline: &mut Vec<Rc<ParetoNode<T>>>, candidate: Rc<ParetoNode<T>>) {
    match skyline.last() {
        None => skyline.push(candidate),
        Some(last) => {
            if candidate.profit > last.profit {
                if candidate.weight == last.weight {
                    skyline.pop();
                }
                skyline.push(candidate);
            }
        }
    }
}

/// The Pareto-frontier solver. Holds nothing but the optional frozen index,
/// so a fresh value is cheap and `solve` can be called repeatedly.
#[derive(Debug, Default)]
pub struct ParetoKnapsack<T> {
    index: Option<ParetoIndex<T>>,
}

impl<T: Quantity> ParetoKnapsack<T> {
    pub fn new() -> Self {
        Self { index: None }
    }

    /// Computes the full Pareto frontier up to `capacity` and returns the
    /// max-profit point on it. With `ratio_sort`, items are considered in
    /// decreasing profit-per-weight order (compared exactly, by
    /// cross-multiplication) which tends to shrink intermediate frontiers;
    /// the result never depends on it. With `build_index`, the frontier is
    /// frozen into a [`ParetoIndex`] for later [`Self::query`] calls.
    pub fn solve(
        &mut self,
        capacity: &T,
        weights: &[T],
        values: &[T],
        ratio_sort: bool,
        build_index: bool,
        ops: &mut Ops,
    ) -> KnapsackSolution<T> {
        let mut order: Vec<usize> = (0..weights.len())
            .filter(|i| &weights[*i] <= capacity)
            .collect();
        if ratio_sort {
            // v1/w1 > v2/w2 <=> v1*w2 > v2*w1, exact even for rationals
            order.sort_by(|a, b| {
                let lhs = values[*a].clone() * weights[*b].clone();
                let rhs = values[*b].clone() * weights[*a].clone();
                rhs.cmp(&lhs).then(a.cmp(b))
            });
        }

        let mut frontier: Vec<Rc<ParetoNode<T>>> = vec![];
        for i in order {
            let weight = &weights[i];
            let value = &values[i];
            let mut shifted: Vec<Rc<ParetoNode<T>>> = Vec::with_capacity(frontier.len() + 1);
            shifted.push(Rc::new(ParetoNode {
                weight: weight.clone(),
                profit: value.clone(),
                item: i,
                pred: None,
            }));
            for node in &frontier {
                let extended = node.weight.clone() + weight.clone();
                if &extended <= capacity {
                    shifted.push(Rc::new(ParetoNode {
                        weight: extended,
                        profit: node.profit.clone() + value.clone(),
                        item: i,
                        pred: Some(node.clone()),
                    }));
                }
            }
            frontier = Self::merge(frontier, shifted, ops);
        }

        if build_index {
            self.index = Some(ParetoIndex { bound: capacity.clone(), entries: frontier.clone() });
        }
        ParetoNode::solution(frontier.last())
    }

    /// Answers a capacity at or below the bound the index was built for.
    pub fn query(&self, capacity: &T, ops: &mut Ops) -> Result<KnapsackSolution<T>, SolveError> {
        match &self.index {
            None => Err(SolveError::IndexNotBuilt),
            Some(index) => index.query(capacity, ops),
        }
    }

    /// The index frozen by the last `solve` with `build_index`, if any.
    pub fn index(&self) -> Option<&ParetoIndex<T>> {
        self.index.as_ref()
    }

    /// Linear merge of two weight-sorted Pareto streams. On a weight tie
    /// the old point goes first, so a new point only displaces it by being
    /// strictly more profitable.
    fn merge(
        old: Vec<Rc<ParetoNode<T>>>,
        new: Vec<Rc<ParetoNode<T>>>,
        ops: &mut Ops,
    ) -> Vec<Rc<ParetoNode<T>>> {
        let mut merged = Vec::with_capacity(old.len() + new.len());
        let mut old = old.into_iter().peekable();
        let mut new = new.into_iter().peekable();
        loop {
            let candidate = match (old.peek(), new.peek()) {
                (Some(o), Some(n)) => {
                    if o.weight <= n.weight {
                        old.next().unwrap()
                    } else {
                        new.next().unwrap()
                    }
                }
                (Some(_), None) => old.next().unwrap(),
                (None, Some(_)) => new.next().unwrap(),
                (None, None) => break,
            };
            ops.tick(1);
            push_skyline(&mut merged, candidate);
        }
        merged
    }
}

/// A frozen Pareto frontier, reusable across queries. Entries are sorted
/// by weight with strictly increasing profit, so the best solution within
/// any capacity is the last entry whose weight fits.
#[derive(Debug, Clone)]
pub struct ParetoIndex<T> {
    bound: T,
    entries: Vec<Rc<ParetoNode<T>>>,
}

impl<T: Quantity> ParetoIndex<T> {
    /// The capacity the index was built for.
    pub fn bound(&self) -> &T {
        &self.bound
    }

    /// The number of Pareto-optimal points on the frozen frontier.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True iff no item fit the build capacity at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn query(&self, capacity: &T, ops: &mut Ops) -> Result<KnapsackSolution<T>, SolveError> {
        if capacity > &self.bound {
            return Err(SolveError::IndexCapacityExceeded {
                built: format!("{:?}", self.bound),
                queried: format!("{:?}", capacity),
            });
        }
        let within = self.entries.partition_point(|node| &node.weight <= capacity);
        ops.tick(1 + self.entries.len().max(1).ilog2() as u64);
        Ok(ParetoNode::solution(self.entries[..within].last()))
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
