//! Approximate multiple-choice knapsack solver.
//!
//! Given a set of *decisions* (each a short list of [`Item`]s, exactly one
//! of which must be chosen), the solver maximizes net value while keeping
//! net burden acceptable under a capacity.  The algorithm is a
//! value-quantized dynamic program in the FPTAS family (Lawler 1979;
//! Kellerer, Pferschy & Pisinger 2004, ch. 11): each item's value is rounded
//! to an integer *score* in `[0, precision]`, and the DP tracks, per
//! cumulative score, the lightest partial assignment that achieves it.
//!
//! Properties:
//!
//! - **Approximation**: the chosen net value is within
//!   `decisions / value_to_score_scale` of optimal: net value is at least
//!   `(100 − 100/precision)%` of the best feasible assignment.  Raising
//!   `precision` trades runtime for tightness linearly.
//! - **Bounded cost**: time and table size are
//!   `O(decisions × options × precision)`; nothing here depends on input
//!   magnitudes.
//! - **Graceful overload**: when even the lightest assignment is over
//!   capacity the solver reports failure and leaves every decision on its
//!   lightest option, which is the caller's forced-degradation path.
//!
//! The solver is an arena: decisions index into a flat per-cycle item
//! buffer, and quantized scores live in a parallel scratch buffer rebuilt by
//! every solve, so caller-supplied item data stays immutable.

use crate::economy::{Economy, Value};

/// Quantized item value.  Non-negative for every item the DP considers;
/// items quantized below their decision's baseline are dominated and
/// excluded.
pub type Score = i64;

/// Floor applied to `precision` in [`Knapsack::decide`].
pub const MIN_PRECISION: usize = 4;

/// One selectable alternative within a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item<B> {
    /// Cost charged against the capacity when this item is chosen.
    /// Typically positive, though the solver does not require it.
    pub burden: B,
    /// Benefit (or detriment) of choosing this item.
    pub value: Value,
}

/// One decision: a `(first, count)` range into the solver's item arena plus
/// the indices selected by the last solve.
///
/// `choice` is only meaningful after [`Knapsack::decide`] ran; the solver
/// overwrites it every solve.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Decision {
    first: usize,
    count: usize,
    /// The solver's selection.
    pub choice: usize,
    /// Lightest-burden item (feasible or not); first-wins on ties.
    pub choice_easy: usize,
    /// Highest-value item among those with a possible burden; first-wins.
    pub choice_high: usize,
}

impl Decision {
    /// Number of items in this decision.
    pub fn option_count(&self) -> usize {
        self.count
    }
}

/// Net burden/value/score over a set of chosen items.
#[derive(Debug, PartialEq)]
pub struct NetStats<E: Economy> {
    pub net_burden: E::Burden,
    pub net_value: Value,
    pub net_score: Score,
}

// Manual `Clone`/`Copy` avoid the spurious `E: Clone`/`E: Copy` bounds that
// `derive` would add; every field is `Copy` via the `Economy` trait.
impl<E: Economy> Clone for NetStats<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Economy> Copy for NetStats<E> {}

impl<E: Economy> NetStats<E> {
    fn new() -> Self {
        Self {
            net_burden: E::zero(),
            net_value: 0.0,
            net_score: 0,
        }
    }

    fn add(&mut self, item: Item<E::Burden>, score: Score) {
        self.net_burden += item.burden;
        self.net_value += item.value;
        self.net_score += score;
    }
}

/// How the last solve concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveOutcome {
    /// `decide` has not run since the last clear.
    Unsolved,
    /// Even the lightest assignment exceeded capacity; lightest was applied.
    Infeasible,
    /// The highest-value assignment fit outright; no DP was needed.
    TrivialHighest,
    /// The quantized DP ran and produced the chosen assignment.
    Optimized,
}

/// Aggregate statistics describing the last solve.
#[derive(Debug, Clone, Copy)]
pub struct SolveStats<E: Economy> {
    /// Net stats of the chosen assignment.
    pub chosen: NetStats<E>,
    /// Net stats of the per-decision highest-value items.
    pub highest: NetStats<E>,
    /// Net stats of the per-decision lightest items.
    pub lightest: NetStats<E>,
    /// DP inner-loop steps taken (bounded by `precision × decisions × options`).
    pub iterations: usize,
    /// The value → score quantization factor used.
    pub value_to_score_scale: f64,
    /// How the solve concluded.
    pub outcome: SolveOutcome,
}

impl<E: Economy> SolveStats<E> {
    fn new() -> Self {
        Self {
            chosen: NetStats::new(),
            highest: NetStats::new(),
            lightest: NetStats::new(),
            iterations: 0,
            value_to_score_scale: 0.0,
            outcome: SolveOutcome::Unsolved,
        }
    }
}

/// A DP cell: the lightest partial assignment achieving `net_score`.
/// Valid iff `choice` is set.
#[derive(Debug, Clone, Copy)]
struct Minimum<B> {
    net_score: Score,
    net_burden: B,
    choice: Option<usize>,
}

/// Compacted DP rows in a flat store, one `row_end` offset per decision.
/// Rows are sorted by `net_score` by construction.
struct MinimumTable<E: Economy> {
    store: Vec<Minimum<E::Burden>>,
    row_end: Vec<usize>,
}

impl<E: Economy> MinimumTable<E> {
    fn new() -> Self {
        Self {
            store: Vec::new(),
            row_end: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.store.clear();
        self.row_end.clear();
    }

    fn row(&self, row: usize) -> &[Minimum<E::Burden>] {
        let begin = if row == 0 { 0 } else { self.row_end[row - 1] };
        &self.store[begin..self.row_end[row]]
    }

    /// Exact-score lookup within a row.  The score must exist; anything
    /// else means the DP chain is corrupt.
    fn query(&self, row: usize, score: Score) -> Minimum<E::Burden> {
        let entries = self.row(row);
        match entries.binary_search_by_key(&score, |m| m.net_score) {
            Ok(i) => entries[i],
            Err(_) => panic!("burden table has no entry for score {score} in row {row}"),
        }
    }

    /// Highest-scoring acceptable entry of the final row.
    fn best_within(&self, capacity: E::Capacity) -> Option<Minimum<E::Burden>> {
        let last = self.row_end.len().checked_sub(1)?;
        self.row(last)
            .iter()
            .rev()
            .find(|m| E::acceptable(m.net_burden, capacity))
            .copied()
    }
}

/// The multiple-choice knapsack model: an item arena, the decisions over it,
/// and the scratch state of the quantized DP.
///
/// Decisions are registered per solve cycle ([`Knapsack::clear`], then
/// [`Knapsack::add_decision`] for each) and solved together by
/// [`Knapsack::decide`].  Buffers are reused across cycles.
///
/// # Example
///
/// ```rust
/// use budgeteer::{Item, Knapsack, ScalarEconomy};
///
/// let mut knapsack: Knapsack<ScalarEconomy> = Knapsack::new();
/// knapsack.add_decision(&[
///     Item { burden: 0.0, value: 0.0 },
///     Item { burden: 2.0, value: 5.0 },
/// ]);
/// assert!(knapsack.decide(3.0, 50));
/// assert_eq!(knapsack.decision(0).choice, 1);
/// ```
pub struct Knapsack<E: Economy> {
    items: Vec<Item<E::Burden>>,
    /// Solver-owned quantized values, parallel to `items`.
    scores: Vec<Score>,
    decisions: Vec<Decision>,
    /// Solve-order permutation over decisions with at least one item.
    order: Vec<usize>,
    minimums: MinimumTable<E>,
    stats: SolveStats<E>,
}

impl<E: Economy> Default for Knapsack<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Economy> Knapsack<E> {
    /// An empty model.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            scores: Vec::new(),
            decisions: Vec::new(),
            order: Vec::new(),
            minimums: MinimumTable::new(),
            stats: SolveStats::new(),
        }
    }

    /// Drop all decisions and reset solve state, keeping buffer capacity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.scores.clear();
        self.decisions.clear();
        self.order.clear();
        self.minimums.clear();
        self.stats = SolveStats::new();
    }

    /// Register a decision over `items`, copying them into the arena.
    /// Returns the decision's index, stable until the next [`clear`].
    ///
    /// [`clear`]: Knapsack::clear
    pub fn add_decision(&mut self, items: &[Item<E::Burden>]) -> usize {
        let first = self.items.len();
        self.items.extend_from_slice(items);
        self.decisions.push(Decision {
            first,
            count: items.len(),
            choice: 0,
            choice_easy: 0,
            choice_high: 0,
        });
        self.decisions.len() - 1
    }

    /// Number of registered decisions.
    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }

    /// A registered decision by index.
    pub fn decision(&self, index: usize) -> &Decision {
        &self.decisions[index]
    }

    /// All registered decisions, in registration order.
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// The items of a decision, in registration order.
    pub fn items_of(&self, index: usize) -> &[Item<E::Burden>] {
        let d = &self.decisions[index];
        &self.items[d.first..d.first + d.count]
    }

    /// The chosen item of a decision, or `None` for an empty decision.
    pub fn chosen(&self, index: usize) -> Option<Item<E::Burden>> {
        let d = &self.decisions[index];
        (d.count > 0).then(|| self.items[d.first + d.choice])
    }

    /// Statistics from the last solve.
    pub fn stats(&self) -> &SolveStats<E> {
        &self.stats
    }

    /// Select one item per decision, maximizing net value while keeping net
    /// burden acceptable under `capacity`.
    ///
    /// Returns `false` only when even the lightest assignment is over
    /// capacity; every decision is then left on its lightest item.  This is
    /// an expected overload outcome, not an error.
    ///
    /// `precision` governs the accuracy/runtime trade-off and is floored at
    /// [`MIN_PRECISION`].
    pub fn decide(&mut self, capacity: E::Capacity, precision: usize) -> bool {
        let precision = precision.max(MIN_PRECISION);
        self.prepare(precision);

        // Overloaded: no assignment satisfies the constraint.
        if !E::acceptable(self.stats.lightest.net_burden, capacity) {
            for d in &mut self.decisions {
                d.choice = d.choice_easy;
            }
            self.stats.chosen = self.stats.lightest;
            self.stats.outcome = SolveOutcome::Infeasible;
            return false;
        }

        // The unconstrained optimum fits: no DP needed.
        if E::acceptable(self.stats.highest.net_burden, capacity) {
            for d in &mut self.decisions {
                d.choice = d.choice_high;
            }
            self.stats.chosen = self.stats.highest;
            self.stats.outcome = SolveOutcome::TrivialHighest;
            return true;
        }

        // Process decisions in ascending order of their best score.
        self.order.clear();
        self.order
            .extend((0..self.decisions.len()).filter(|&i| self.decisions[i].count > 0));
        let decisions = &self.decisions;
        let scores = &self.scores;
        self.order
            .sort_by_key(|&i| scores[decisions[i].first + decisions[i].choice_high]);

        self.compute_minimums(capacity);

        // Walk the table backward, peeling one choice per decision.
        let mut strategy = self
            .minimums
            .best_within(capacity)
            .expect("burden table has no feasible assignment despite a feasible lightest");
        let mut row = self.order.len();
        loop {
            row -= 1;
            let di = self.order[row];
            let choice = strategy
                .choice
                .expect("burden table row lost the feasible chain");
            let d = &mut self.decisions[di];
            d.choice = choice;
            let next_score = strategy.net_score - self.scores[d.first + choice];
            if row == 0 {
                assert_eq!(next_score, 0, "extraction did not land on score zero");
                break;
            }
            strategy = self.minimums.query(row - 1, next_score);
        }

        let mut chosen = NetStats::new();
        for d in &self.decisions {
            if d.count == 0 {
                continue;
            }
            chosen.add(self.items[d.first + d.choice], self.scores[d.first + d.choice]);
        }
        assert!(
            E::acceptable(chosen.net_burden, capacity),
            "chosen assignment violates capacity"
        );
        self.stats.chosen = chosen;
        self.stats.outcome = SolveOutcome::Optimized;
        true
    }

    /// First pass: per decision, find the lightest item and the highest-value
    /// item with a possible burden; derive the value → score scale.  Second
    /// pass: quantize every item's value against its decision's baseline.
    fn prepare(&mut self, precision: usize) {
        self.stats = SolveStats::new();
        self.scores.clear();
        self.scores.resize(self.items.len(), 0);

        let mut max_value_range: Value = 0.0;

        for di in 0..self.decisions.len() {
            let (first, count) = (self.decisions[di].first, self.decisions[di].count);
            if count == 0 {
                let d = &mut self.decisions[di];
                d.choice = 0;
                d.choice_easy = 0;
                d.choice_high = 0;
                continue;
            }
            let items = &self.items[first..first + count];
            let mut easy = 0usize;
            let mut high: Option<usize> = None;
            for (i, item) in items.iter().enumerate() {
                if E::lesser(item.burden, items[easy].burden) {
                    easy = i;
                }
                if E::is_possible(item.burden) {
                    match high {
                        Some(h) if item.value <= items[h].value => {}
                        _ => high = Some(i),
                    }
                }
            }
            let high = high.unwrap_or(0);
            let easy_item = items[easy];
            if E::is_possible(items[high].burden) {
                max_value_range = max_value_range.max(items[high].value - easy_item.value);
            }

            let d = &mut self.decisions[di];
            d.choice_easy = easy;
            d.choice_high = high;
            self.stats.lightest.add(easy_item, 0);
        }

        // All-equal-value degenerate case: clamp so quantization stays finite.
        if !(max_value_range > 0.0) {
            max_value_range = 1.0;
        }
        let scale = precision as f64 / max_value_range;
        self.stats.value_to_score_scale = scale;

        for di in 0..self.decisions.len() {
            let d = self.decisions[di];
            if d.count == 0 {
                continue;
            }
            let easy_value = self.items[d.first + d.choice_easy].value;
            for i in 0..d.count {
                let idx = d.first + i;
                self.scores[idx] = ((self.items[idx].value - easy_value) * scale).ceil() as Score;
            }
            let h = d.first + d.choice_high;
            self.stats.highest.add(self.items[h], self.scores[h]);
        }
    }

    /// The quantized DP: for each decision in solve order, extend every
    /// lightest-per-score partial assignment by every non-dominated item,
    /// pruning anything already over capacity, then compact the dense row
    /// into the flat table.
    fn compute_minimums(&mut self, capacity: E::Capacity) {
        self.minimums.clear();

        let mut previous: Vec<Minimum<E::Burden>> = Vec::new();
        let mut current: Vec<Minimum<E::Burden>> =
            Vec::with_capacity(self.stats.highest.net_score.max(0) as usize + 1);

        for (row, &di) in self.order.iter().enumerate() {
            let d = self.decisions[di];
            for ci in 0..d.count {
                let idx = d.first + ci;
                let score = self.scores[idx];
                // Quantized below the decision's baseline: dominated.
                if score < 0 {
                    continue;
                }
                let burden = self.items[idx].burden;
                if row == 0 {
                    Self::consider(
                        &mut current,
                        capacity,
                        Minimum {
                            net_score: score,
                            net_burden: burden,
                            choice: Some(ci),
                        },
                    );
                    self.stats.iterations += 1;
                } else {
                    for base in &previous {
                        Self::consider(
                            &mut current,
                            capacity,
                            Minimum {
                                net_score: base.net_score + score,
                                net_burden: base.net_burden + burden,
                                choice: Some(ci),
                            },
                        );
                        self.stats.iterations += 1;
                    }
                }
            }

            previous.clear();
            for min in current.drain(..) {
                if min.choice.is_some() {
                    previous.push(min);
                    self.minimums.store.push(min);
                }
            }
            self.minimums.row_end.push(self.minimums.store.len());
        }
    }

    /// Keep the candidate in its dense score slot if it is the lightest seen
    /// there; first-wins on burden ties.
    fn consider(
        current: &mut Vec<Minimum<E::Burden>>,
        capacity: E::Capacity,
        candidate: Minimum<E::Burden>,
    ) {
        if !E::acceptable(candidate.net_burden, capacity) {
            return;
        }
        let slot = candidate.net_score as usize;
        if slot >= current.len() {
            current.resize(
                slot + 1,
                Minimum {
                    net_score: 0,
                    net_burden: E::infinite(),
                    choice: None,
                },
            );
        }
        let occupant = &mut current[slot];
        if occupant.choice.is_none() || E::lesser(candidate.net_burden, occupant.net_burden) {
            *occupant = candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{NormalBurden, NormalCapacity, NormalEconomy, ScalarEconomy};

    fn item(burden: f64, value: f64) -> Item<f64> {
        Item { burden, value }
    }

    #[test]
    fn empty_problem_solves_trivially() {
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        assert!(ks.decide(1.0, 50));
        assert_eq!(ks.stats().chosen.net_value, 0.0);
        assert_eq!(ks.stats().outcome, SolveOutcome::TrivialHighest);
    }

    #[test]
    fn single_item_decision_is_forced() {
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        ks.add_decision(&[item(1.0, 0.0)]);
        assert!(ks.decide(2.0, 50));
        assert_eq!(ks.decision(0).choice, 0);
        assert_eq!(ks.stats().chosen.net_burden, 1.0);
    }

    #[test]
    fn zero_item_decision_contributes_nothing() {
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        ks.add_decision(&[]);
        ks.add_decision(&[item(0.5, 0.0), item(1.0, 3.0)]);
        assert!(ks.decide(2.0, 50));
        assert_eq!(ks.decision(0).choice, 0);
        assert!(ks.chosen(0).is_none());
        assert_eq!(ks.decision(1).choice, 1);
        assert_eq!(ks.stats().chosen.net_burden, 1.0);
    }

    #[test]
    fn infeasible_problem_falls_back_to_lightest() {
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        ks.add_decision(&[item(5.0, 1.0), item(2.0, 9.0)]);
        ks.add_decision(&[item(4.0, 0.0), item(3.0, 2.0)]);
        assert!(!ks.decide(1.0, 50));
        assert_eq!(ks.stats().outcome, SolveOutcome::Infeasible);
        // Every decision sits on its lightest item.
        assert_eq!(ks.decision(0).choice, ks.decision(0).choice_easy);
        assert_eq!(ks.decision(0).choice, 1);
        assert_eq!(ks.decision(1).choice, 1);
        assert_eq!(ks.stats().chosen.net_burden, 5.0);
    }

    #[test]
    fn trivial_shortcut_matches_highest_stats() {
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        ks.add_decision(&[item(1.0, 1.0), item(2.0, 4.0)]);
        ks.add_decision(&[item(0.5, 0.0), item(1.5, 2.0)]);
        assert!(ks.decide(10.0, 50));
        assert_eq!(ks.stats().outcome, SolveOutcome::TrivialHighest);
        assert_eq!(ks.decision(0).choice, ks.decision(0).choice_high);
        assert_eq!(ks.decision(1).choice, ks.decision(1).choice_high);
        assert_eq!(ks.stats().chosen.net_burden, ks.stats().highest.net_burden);
        assert_eq!(ks.stats().chosen.net_value, ks.stats().highest.net_value);
    }

    #[test]
    fn constrained_problem_picks_the_best_feasible_mix() {
        // Fixed cost, a binary upgrade, and a three-way quality ladder.
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        let a = ks.add_decision(&[item(1.0, 0.0)]);
        let b = ks.add_decision(&[item(0.0, 0.0), item(2.0, 5.0)]);
        let c = ks.add_decision(&[item(0.0, 0.0), item(1.0, 2.0), item(3.0, 3.0)]);

        assert!(ks.decide(3.5, 20));
        assert_eq!(ks.stats().outcome, SolveOutcome::Optimized);
        // Taking both upgrades would cost 4; the burden-3 mix at value 5 wins
        // over the burden-2 mix at value 2.
        assert_eq!(ks.decision(a).choice, 0);
        assert_eq!(ks.decision(b).choice, 1);
        assert_eq!(ks.decision(c).choice, 0);
        assert_eq!(ks.stats().chosen.net_burden, 3.0);
        assert_eq!(ks.stats().chosen.net_value, 5.0);
    }

    #[test]
    fn raising_precision_never_loses_value() {
        let build = |ks: &mut Knapsack<ScalarEconomy>| {
            ks.clear();
            ks.add_decision(&[item(1.0, 0.0)]);
            ks.add_decision(&[item(0.0, 0.0), item(2.0, 5.0)]);
            ks.add_decision(&[item(0.0, 0.0), item(1.0, 2.0), item(3.0, 3.0)]);
            ks.add_decision(&[item(0.2, 0.1), item(0.7, 1.1), item(1.4, 1.9)]);
        };
        let mut ks = Knapsack::new();
        let mut last_value = f64::NEG_INFINITY;
        for precision in [4usize, 8, 16, 32, 64, 128, 256] {
            build(&mut ks);
            assert!(ks.decide(3.5, precision), "precision {precision}");
            let value = ks.stats().chosen.net_value;
            assert!(
                value >= last_value - 1e-12,
                "precision {precision}: value {value} < {last_value}"
            );
            last_value = value;
        }
    }

    #[test]
    fn dominated_items_are_never_chosen() {
        // Item 2 is worth less than the lightest item while costing more:
        // quantized below the baseline, it must never be selected.
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        ks.add_decision(&[item(1.0, 2.0), item(3.0, 6.0), item(2.0, 1.0)]);
        ks.add_decision(&[item(1.0, 0.0)]);
        assert!(ks.decide(3.5, 64));
        assert_ne!(ks.decision(0).choice, 2);
    }

    #[test]
    fn equal_values_tie_break_first_wins() {
        // All values equal: the range clamps to its floor and the
        // highest-value index stays on the first item encountered.
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        ks.add_decision(&[item(2.0, 1.0), item(1.0, 1.0), item(3.0, 1.0)]);
        assert!(ks.decide(10.0, 50));
        assert_eq!(ks.stats().outcome, SolveOutcome::TrivialHighest);
        assert_eq!(ks.decision(0).choice, 0);
        assert_eq!(ks.decision(0).choice_easy, 1, "easy tracks the min burden");
    }

    #[test]
    fn reuse_after_clear_starts_fresh() {
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        ks.add_decision(&[item(1.0, 1.0)]);
        assert!(ks.decide(2.0, 50));
        ks.clear();
        assert_eq!(ks.decision_count(), 0);
        assert_eq!(ks.stats().outcome, SolveOutcome::Unsolved);
        ks.add_decision(&[item(0.5, 0.0), item(0.6, 1.0)]);
        assert!(ks.decide(1.0, 50));
        assert_eq!(ks.decision(0).choice, 1);
    }

    #[test]
    fn chance_constraint_rejects_noisy_options() {
        // Same capacity, two mean-8 upgrades: the tight one fits three
        // sigmas under a limit of 10, the noisy one does not.
        let capacity = NormalCapacity::new(10.0);
        let mut ks: Knapsack<NormalEconomy> = Knapsack::new();
        ks.add_decision(&[
            Item {
                burden: NormalBurden::certain(5.0),
                value: 0.0,
            },
            Item {
                burden: NormalBurden::new(8.0, 4.0),
                value: 5.0,
            },
        ]);
        assert!(ks.decide(capacity, 50));
        assert_eq!(
            ks.decision(0).choice,
            0,
            "9·4 > (10−8)²: the noisy upgrade must be rejected"
        );

        ks.clear();
        ks.add_decision(&[
            Item {
                burden: NormalBurden::certain(5.0),
                value: 0.0,
            },
            Item {
                burden: NormalBurden::new(8.0, 0.1),
                value: 5.0,
            },
        ]);
        assert!(ks.decide(capacity, 50));
        assert_eq!(ks.decision(0).choice, 1, "the tight upgrade fits");
    }

    #[test]
    fn iteration_count_respects_the_documented_bound() {
        let mut ks: Knapsack<ScalarEconomy> = Knapsack::new();
        let decisions = 12;
        let options = 4;
        for d in 0..decisions {
            let items: Vec<Item<f64>> = (0..options)
                .map(|i| item(0.2 + 0.1 * i as f64 + 0.01 * d as f64, i as f64))
                .collect();
            ks.add_decision(&items);
        }
        let precision = 40;
        // Capacity tight enough to force the DP.
        assert!(ks.decide(decisions as f64 * 0.45, precision));
        assert_eq!(ks.stats().outcome, SolveOutcome::Optimized);
        let bound = precision * decisions * decisions * options;
        assert!(
            ks.stats().iterations <= bound,
            "iterations {} over bound {bound}",
            ks.stats().iterations
        );
    }
}
