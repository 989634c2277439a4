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

//! This module provides the frontier DP engine shared by the subset-sum and
//! the 1-D/N-D knapsack solvers. Instead of a dense table, the working set
//! after considering the first `i` items is the ordered set of *distinct
//! reachable points*. Each item rebuilds that frontier with a linear merge:
//! old points are walked in ascending order, their extensions arrive in
//! ascending order too and wait in an auxiliary "greater" queue until the
//! walk catches up with them.
//!
//! Pruning works through *completion credits*. Once item `i` has been
//! considered, a point that still fits the capacity after adding everything
//! that remains (`point + suffix[i]`) has exactly one best future: take all
//! remaining items. Its completion value is credited to the global best and
//! the point is dropped from the frontier. Values are non-negative, so the
//! credit equals the maximum over that point's completions and the prune
//! never costs optimality; on monotone or superincreasing-adjacent inputs it
//! is what keeps the frontier sub-exponential.
//!
//! One point-to-value map is retained per item index so the selection can be
//! reconstructed afterwards: walking layers downward, an item belongs to the
//! solution iff the current value is not reproducible at the same point one
//! layer earlier.

use std::collections::hash_map::Entry;
use std::collections::VecDeque;

use fxhash::FxHashMap;

use crate::{Measure, Ops, Quantity};

/// One item as the engine sees it: a weight measure, a value and the
/// position of the item in the caller's input slices.
#[derive(Debug, Clone)]
pub(crate) struct EngineItem<M, V> {
    pub weight: M,
    pub value: V,
    pub index: usize,
}

/// What the engine hands back: the best value, the point achieving it, and
/// the caller positions of the selected items in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EngineSolution<M, V> {
    pub value: V,
    pub point: M,
    pub taken: Vec<usize>,
}

/// The best candidate seen so far. `credit` is `None` for a point that
/// lives in a frontier layer, and `Some` for a completion credited while
/// pruning: `base` is the pre-extension point (one layer up), `takes_item`
/// tells whether the extending item itself is part of the completion.
struct Best<M, V> {
    value: V,
    point: M,
    layer: usize,
    credit: Option<(M, bool)>,
}

/// Per-instance bound material, computed once.
struct Bounds<M, V> {
    rem_after: Vec<M>,
    vrem_after: Vec<V>,
    total_value: V,
}

/// The frontier being rebuilt for the current item.
struct PassState<M, V> {
    next_map: FxHashMap<M, V>,
    next_frontier: VecDeque<M>,
    greater: VecDeque<(M, V)>,
}

/// Global program state across items.
struct Tracker<M, V> {
    best: Option<Best<M, V>>,
    done: bool,
}

/// The bounded-knapsack / subset-sum dynamic program over a pruned, ordered
/// set of reachable points.
///
/// Invariants expected from the caller (the facade enforces them):
/// * every item weight fits the capacity on its own;
/// * values are non-negative;
/// * descending inputs have been reversed, so that whatever order remains
///   is either ascending or genuinely unordered.
pub(crate) struct FrontierEngine<M, V> {
    capacity: M,
    items: Vec<EngineItem<M, V>>,
    exact_fit_exit: bool,
}

impl<M: Measure, V: Quantity> FrontierEngine<M, V> {
    pub fn new(capacity: M, items: Vec<EngineItem<M, V>>, exact_fit_exit: bool) -> Self {
        Self { capacity, items, exact_fit_exit }
    }

    pub fn solve(&self, ops: &mut Ops) -> EngineSolution<M, V> {
        let origin = self.capacity.origin();
        if self.items.is_empty() {
            return EngineSolution { value: V::zero(), point: origin, taken: vec![] };
        }

        // corner case: everything fits at once, no DP needed
        let mut total_weight = origin.clone();
        let mut total_value = V::zero();
        for item in &self.items {
            total_weight = total_weight.plus(&item.weight);
            total_value = total_value + item.value.clone();
        }
        if total_weight.fits(&self.capacity) {
            let mut taken: Vec<usize> = self.items.iter().map(|item| item.index).collect();
            taken.sort_unstable();
            return EngineSolution { value: total_value, point: total_weight, taken };
        }

        let weights: Vec<M> = self.items.iter().map(|item| item.weight.clone()).collect();
        let rem_after = crate::suffix_sums(&weights, &origin);
        let mut vrem_after = vec![V::zero(); self.items.len()];
        let mut acc = V::zero();
        for i in (0..self.items.len()).rev() {
            vrem_after[i] = acc.clone();
            acc = acc + self.items[i].value.clone();
        }
        let bounds = Bounds { rem_after, vrem_after, total_value };

        let mut layers: Vec<FxHashMap<M, V>> = Vec::with_capacity(self.items.len());
        let mut frontier: VecDeque<M> = VecDeque::new();
        let mut track = Tracker { best: None, done: false };
        let empty_layer: FxHashMap<M, V> = FxHashMap::default();

        for i in 0..self.items.len() {
            let item = &self.items[i];
            let prev_map = layers.last().unwrap_or(&empty_layer);
            let prev_frontier = std::mem::take(&mut frontier);
            let mut pass = PassState {
                next_map: FxHashMap::default(),
                next_frontier: VecDeque::new(),
                greater: VecDeque::new(),
            };

            // the item on its own, smallest of all extensions
            self.stage(i, item.weight.clone(), item.value.clone(), &origin, true, &bounds, &mut pass, &mut track, ops);

            for point in prev_frontier {
                if track.done {
                    break;
                }
                let value = match prev_map.get(&point) {
                    Some(v) => v.clone(),
                    None => continue,
                };
                // extension of this point by the current item
                let extension = point.plus(&item.weight);
                if extension.fits(&self.capacity) {
                    let ext_value = value.clone() + item.value.clone();
                    self.stage(i, extension, ext_value, &point, true, &bounds, &mut pass, &mut track, ops);
                }
                // release the staged extensions that sort before this point
                while pass
                    .greater
                    .front()
                    .map_or(false, |(g, _)| g.seq_cmp(&point) != std::cmp::Ordering::Greater)
                {
                    let (g_point, g_value) = pass.greater.pop_front().unwrap();
                    self.emit(i, g_point, g_value, &bounds, &mut pass, &mut track, ops);
                }
                // conditionally carry the old point over
                let completion = point.plus(&bounds.rem_after[i]);
                if completion.fits(&self.capacity) {
                    let credit = value + bounds.vrem_after[i].clone();
                    self.consider(i, credit, completion, Some((point, false)), &bounds, &mut track);
                } else {
                    self.emit(i, point, value, &bounds, &mut pass, &mut track, ops);
                }
            }
            while let Some((g_point, g_value)) = pass.greater.pop_front() {
                self.emit(i, g_point, g_value, &bounds, &mut pass, &mut track, ops);
            }

            layers.push(pass.next_map);
            frontier = pass.next_frontier;
            if track.done {
                break;
            }
        }

        match track.best {
            None => EngineSolution { value: V::zero(), point: origin, taken: vec![] },
            Some(best) => {
                let mut taken: Vec<usize> = self
                    .backtrace(&layers, &best, &origin)
                    .into_iter()
                    .map(|pos| self.items[pos].index)
                    .collect();
                taken.sort_unstable();
                EngineSolution { value: best.value, point: best.point, taken }
            }
        }
    }

    /// Screens a freshly generated point (singleton or extension). A point
    /// whose take-all-remaining completion still fits is credited and
    /// dropped; everything else waits in the "greater" queue until the
    /// frontier walk catches up with it.
    #[allow(clippy::too_many_arguments)]
    fn stage(
        &self,
        i: usize,
        point: M,
        value: V,
        base: &M,
        takes_item: bool,
        bounds: &Bounds<M, V>,
        pass: &mut PassState<M, V>,
        track: &mut Tracker<M, V>,
        ops: &mut Ops,
    ) {
        ops.tick(1);
        let completion = point.plus(&bounds.rem_after[i]);
        if completion.fits(&self.capacity) {
            let credit = value + bounds.vrem_after[i].clone();
            self.consider(i, credit, completion, Some((base.clone(), takes_item)), bounds, track);
        } else {
            pass.greater.push_back((point, value));
        }
    }

    /// Inserts a point into the frontier being built, merging duplicate
    /// points with a max on the value, and updates the global best.
    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        i: usize,
        point: M,
        value: V,
        bounds: &Bounds<M, V>,
        pass: &mut PassState<M, V>,
        track: &mut Tracker<M, V>,
        ops: &mut Ops,
    ) {
        ops.tick(1);
        match pass.next_map.entry(point.clone()) {
            Entry::Occupied(mut entry) => {
                if value > *entry.get() {
                    entry.insert(value.clone());
                } else {
                    return;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(value.clone());
                pass.next_frontier.push_back(point.clone());
            }
        }
        self.consider(i, value, point, None, bounds, track);
    }

    /// Updates the global best with a candidate and flips the early-exit
    /// flag when nothing can improve on it anymore.
    fn consider(
        &self,
        layer: usize,
        value: V,
        point: M,
        credit: Option<(M, bool)>,
        bounds: &Bounds<M, V>,
        track: &mut Tracker<M, V>,
    ) {
        let improves = track.best.as_ref().map_or(true, |best| value > best.value);
        if improves {
            if (self.exact_fit_exit && point == self.capacity) || value == bounds.total_value {
                track.done = true;
            }
            track.best = Some(Best { value, point, layer, credit });
        }
    }

    /// Reconstructs the selected item positions from the retained layers.
    fn backtrace(&self, layers: &[FxHashMap<M, V>], best: &Best<M, V>, origin: &M) -> Vec<usize> {
        let mut taken: Vec<usize> = vec![];
        match &best.credit {
            Some((base, takes_item)) => {
                // a credited completion swallows the whole remaining suffix
                taken.extend(best.layer + 1..self.items.len());
                if *takes_item {
                    taken.push(best.layer);
                }
                if base != origin && best.layer > 0 {
                    let layer = best.layer - 1;
                    if let Some(value) = layers[layer].get(base) {
                        self.walk_down(layers, layer, base.clone(), value.clone(), origin, &mut taken);
                    }
                }
            }
            None => {
                self.walk_down(
                    layers,
                    best.layer,
                    best.point.clone(),
                    best.value.clone(),
                    origin,
                    &mut taken,
                );
            }
        }
        taken
    }

    /// Walks item indices downward from a point living in `layers[layer]`.
    /// An item is part of the solution iff the value at the current point is
    /// not reproducible one layer earlier.
    fn walk_down(
        &self,
        layers: &[FxHashMap<M, V>],
        layer: usize,
        point: M,
        value: V,
        origin: &M,
        taken: &mut Vec<usize>,
    ) {
        let mut layer = layer;
        let mut point = point;
        let mut value = value;
        loop {
            if point == *origin && value.is_zero() {
                break;
            }
            if layer == 0 {
                taken.push(0);
                break;
            }
            if layers[layer - 1].get(&point) == Some(&value) {
                layer -= 1;
                continue;
            }
            taken.push(layer);
            point = point.minus(&self.items[layer].weight);
            value = value - self.items[layer].value.clone();
            layer -= 1;
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
