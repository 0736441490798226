//! The partitioning state machine.

use tracing::{debug, info, trace};

use crate::error::ConfigError;
use crate::{JavaRandom, Layout, Lot, LotId, SplitAxis};

use super::config::{PartitionConfig, SplitCountPolicy, SplitRange};
use super::observer::{NoopObserver, RoundObserver};
use super::selector::{OldestOrOversized, SplitSelector};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The target lot count was reached.
    Converged,
    /// Too many consecutive rounds went by without the lot count changing.
    Stagnant,
    /// The round ceiling was hit.
    Exhausted,
}

/// Current state of a [`PartitionEngine`]. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Rounds can still be run.
    Running,
    /// The run stopped for the given reason.
    Finished(Termination),
}

impl EngineState {
    /// Returns `true` once the run has stopped.
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, EngineState::Finished(_))
    }
}

/// The validation step a candidate child failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The child is narrower than the minimum lot width.
    TooNarrow,
    /// The child is shorter than the minimum lot height.
    TooShort,
    /// Two opposite edges of the child cross.
    Twisted,
    /// Every probe point of the child is covered by a live lot, the parent
    /// included.
    Landlocked,
}

/// Result of one [`PartitionEngine::try_split`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The parent was replaced by these children.
    Committed(Vec<LotId>),
    /// The target lot count is already met; nothing was drawn or changed.
    TargetReached,
    /// A child failed validation; the layout is unchanged.
    Rejected(Rejection),
    /// The id does not name a live lot.
    Missing,
}

/// Summary of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round number; 0 if no round was run.
    pub round: usize,
    pub lots_before: usize,
    pub lots_after: usize,
    /// Engine state after the round.
    pub state: EngineState,
}

impl RoundReport {
    /// Returns `true` if the round changed the number of lots.
    #[inline]
    pub fn changed(&self) -> bool {
        self.lots_before != self.lots_after
    }
}

/// Final result of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// The surviving lots, in insertion order.
    pub lots: Vec<Lot>,
    pub termination: Termination,
    /// Rounds executed.
    pub rounds: usize,
    /// Splits committed.
    pub splits: usize,
    /// Seed the random source was started with.
    pub seed: i64,
}

/// Recursively subdivides an initial lot until a target count is reached or
/// no further progress is possible.
///
/// The engine owns all run-scoped state: the live [`Layout`], the random
/// source and the counters. Each round asks the [`SplitSelector`] for an
/// ordered snapshot of candidate ids and attempts them in that order, so a
/// fixed seed and configuration always yield the same lots.
#[derive(Debug, Clone)]
pub struct PartitionEngine<S: SplitSelector = OldestOrOversized> {
    config: PartitionConfig,
    selector: S,
    layout: Layout,
    random: JavaRandom,
    seed: i64,
    state: EngineState,
    rounds: usize,
    splits: usize,
    stagnant_rounds: usize,
}

impl PartitionEngine<OldestOrOversized> {
    /// Creates an engine with the default eligibility policy.
    pub fn new(initial: Lot, config: PartitionConfig) -> Result<Self, ConfigError> {
        Self::with_selector(initial, config, OldestOrOversized::default())
    }
}

impl<S: SplitSelector> PartitionEngine<S> {
    /// Creates an engine with a custom eligibility policy.
    ///
    /// Fails if the configuration is invalid. Without a configured seed, a
    /// fresh one is drawn and logged.
    pub fn with_selector(initial: Lot, config: PartitionConfig, selector: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<i64>();
                info!(seed, "no seed configured, drew a random one");
                seed
            }
        };

        Ok(Self {
            layout: Layout::new(initial, config.cell_size),
            random: JavaRandom::new(seed),
            seed,
            config,
            selector,
            state: EngineState::Running,
            rounds: 0,
            splits: 0,
            stagnant_rounds: 0,
        })
    }

    /// The live lots.
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Rounds executed so far.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Splits committed so far.
    #[inline]
    pub fn splits(&self) -> usize {
        self.splits
    }

    /// Seed the random source was started with.
    #[inline]
    pub fn seed(&self) -> i64 {
        self.seed
    }

    fn target_met(&self) -> bool {
        self.layout.len() >= self.config.target_lot_count
    }

    fn finish(&mut self, termination: Termination) {
        info!(
            ?termination,
            lots = self.layout.len(),
            rounds = self.rounds,
            splits = self.splits,
            "partitioning finished"
        );
        self.state = EngineState::Finished(termination);
    }

    /// Runs one round.
    ///
    /// Checks convergence and the round ceiling first, then attempts every
    /// selected lot, stopping early once the target is met. A round that
    /// leaves the lot count unchanged counts towards stagnation. Calling
    /// this on a finished engine does nothing.
    pub fn step(&mut self) -> RoundReport {
        let lots_before = self.layout.len();
        let idle = |state| RoundReport {
            round: 0,
            lots_before,
            lots_after: lots_before,
            state,
        };

        if self.state.is_finished() {
            return idle(self.state);
        }
        if self.target_met() {
            self.finish(Termination::Converged);
            return idle(self.state);
        }
        if self.rounds >= self.config.max_rounds {
            self.finish(Termination::Exhausted);
            return idle(self.state);
        }

        self.rounds += 1;
        let candidates = self.selector.select(&self.layout, &self.config);
        trace!(round = self.rounds, candidates = candidates.len(), "round started");

        for id in candidates {
            if self.target_met() {
                break;
            }
            self.try_split(id);
        }

        let lots_after = self.layout.len();
        if lots_after == lots_before {
            self.stagnant_rounds += 1;
        } else {
            self.stagnant_rounds = 0;
        }

        if self.target_met() {
            self.finish(Termination::Converged);
        } else if self.stagnant_rounds >= self.config.stagnation_limit {
            self.finish(Termination::Stagnant);
        }

        debug!(round = self.rounds, lots_before, lots_after, "round done");
        RoundReport {
            round: self.rounds,
            lots_before,
            lots_after,
            state: self.state,
        }
    }

    /// Attempts to split the live lot `id`.
    ///
    /// Draws the axis, then the child count when the policy is
    /// [`SplitCountPolicy::Random`]. All children are validated against the
    /// current layout, which still holds the parent. Since the parent covers
    /// its children, a child only has an exit through a point outside every
    /// live lot. Either every child is committed or nothing is.
    pub fn try_split(&mut self, id: LotId) -> SplitOutcome {
        if self.target_met() {
            return SplitOutcome::TargetReached;
        }
        let Some(parent) = self.layout.get(id).copied() else {
            return SplitOutcome::Missing;
        };

        let axis = if self.random.next_boolean() {
            SplitAxis::Width
        } else {
            SplitAxis::Height
        };
        let count = self.child_count(&parent, axis);
        let children = parent.split(axis, count);

        if let Some(rejection) = children.iter().find_map(|child| self.validate(child)) {
            debug!(lot = id.raw(), ?axis, count, ?rejection, "split rejected");
            return SplitOutcome::Rejected(rejection);
        }

        match self.layout.commit_split(id, children) {
            Some(ids) => {
                self.splits += 1;
                trace!(lot = id.raw(), ?axis, count, "split committed");
                SplitOutcome::Committed(ids)
            }
            None => SplitOutcome::Missing,
        }
    }

    fn child_count(&mut self, lot: &Lot, axis: SplitAxis) -> usize {
        let (range, dimension, minimum) = match axis {
            SplitAxis::Width => (self.config.split_x, lot.width(), self.config.min_lot_width),
            SplitAxis::Height => (self.config.split_y, lot.height(), self.config.min_lot_height),
        };

        match self.config.split_policy {
            SplitCountPolicy::Geometric => geometric_count(dimension, minimum, range),
            SplitCountPolicy::Random => {
                // Validated: 1 <= min <= max <= MAX_SPLIT_LIMIT, so the bound fits.
                let span = (range.max - range.min + 1) as i32;
                range.min as usize + self.random.next_int(span) as usize
            }
        }
    }

    fn validate(&self, child: &Lot) -> Option<Rejection> {
        if child.width() < self.config.min_lot_width {
            Some(Rejection::TooNarrow)
        } else if child.height() < self.config.min_lot_height {
            Some(Rejection::TooShort)
        } else if !child.is_simple() {
            Some(Rejection::Twisted)
        } else if !child.has_exit_to_exterior(&self.layout, None) {
            Some(Rejection::Landlocked)
        } else {
            None
        }
    }

    /// Runs rounds until the engine finishes.
    pub fn run(self) -> Partition {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Runs rounds until the engine finishes, handing a snapshot of the lots
    /// to `observer` after every round that changed the lot count.
    pub fn run_with_observer<O: RoundObserver>(mut self, observer: &mut O) -> Partition {
        info!(
            seed = self.seed,
            target = self.config.target_lot_count,
            policy = ?self.config.split_policy,
            "partitioning started"
        );

        loop {
            let report = self.step();
            if report.changed() {
                observer.on_round(report.round, &self.layout.snapshot());
            }
            if let EngineState::Finished(termination) = report.state {
                return Partition {
                    lots: self.layout.into_lots(),
                    termination,
                    rounds: self.rounds,
                    splits: self.splits,
                    seed: self.seed,
                };
            }
        }
    }
}

/// `floor(dimension / minimum)` clamped to `1..=range.max`.
fn geometric_count(dimension: f64, minimum: f64, range: SplitRange) -> usize {
    let fits = (dimension / minimum).floor();
    if fits.is_finite() && fits >= 1.0 {
        (fits as usize).min(range.max as usize).max(1)
    } else {
        1
    }
}

/// Partitions `initial` with the default eligibility policy.
///
/// Only configuration errors are reported as failures; a run that cannot
/// reach the target still returns its lots with a [`Termination`] explaining
/// why it stopped.
pub fn run(initial: Lot, config: PartitionConfig) -> Result<Partition, ConfigError> {
    Ok(PartitionEngine::new(initial, config)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{CollectingObserver, OldestOnly};
    use crate::Point;

    fn square(size: f64) -> Lot {
        Lot::rectangle(0.0, 0.0, size, size)
    }

    #[test]
    fn geometric_count_is_clamped() {
        let range = SplitRange::new(1, 5);
        assert_eq!(geometric_count(200.0, 50.0, range), 4);
        assert_eq!(geometric_count(1000.0, 50.0, range), 5);
        assert_eq!(geometric_count(49.0, 50.0, range), 1);
        assert_eq!(geometric_count(0.0, 50.0, range), 1);
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = PartitionConfig::default().with_target(0);
        assert!(PartitionEngine::new(square(100.0), config).is_err());
    }

    #[test]
    fn already_converged_runs_no_round() {
        let config = PartitionConfig::default().with_target(1);
        let mut engine = PartitionEngine::new(square(100.0), config).unwrap();

        let report = engine.step();
        assert_eq!(report.round, 0);
        assert_eq!(report.state, EngineState::Finished(Termination::Converged));
        assert_eq!(engine.rounds(), 0);
    }

    #[test]
    fn target_reached_short_circuits_try_split() {
        let config = PartitionConfig::default().with_target(1);
        let mut engine = PartitionEngine::new(square(1000.0), config).unwrap();
        assert_eq!(engine.try_split(LotId::new(0)), SplitOutcome::TargetReached);
        assert_eq!(engine.layout().len(), 1);
    }

    #[test]
    fn unknown_lot_is_missing() {
        let config = PartitionConfig::default();
        let mut engine = PartitionEngine::new(square(1000.0), config).unwrap();
        assert_eq!(engine.try_split(LotId::new(99)), SplitOutcome::Missing);
    }

    #[test]
    fn undersized_children_roll_back() {
        // Any split of a 100×100 lot into 2..=3 children is below the 60 minimum.
        let config = PartitionConfig::default()
            .with_min_size(60.0, 60.0)
            .with_max_size(1000.0, 1000.0)
            .with_splits(SplitRange::new(2, 3), SplitRange::new(2, 3))
            .with_policy(SplitCountPolicy::Random);
        let root = square(100.0);
        let mut engine = PartitionEngine::new(root, config).unwrap();
        let root_id = LotId::new(0);

        let outcome = engine.try_split(root_id);
        assert!(matches!(
            outcome,
            SplitOutcome::Rejected(Rejection::TooNarrow | Rejection::TooShort)
        ));
        assert_eq!(engine.layout().len(), 1);
        assert_eq!(engine.layout().get(root_id), Some(&root));
        assert!(engine.layout().index().contains(root_id));
        assert!(engine.layout().is_consistent());
        assert_eq!(engine.splits(), 0);
    }

    #[test]
    fn committed_split_replaces_parent() {
        let config = PartitionConfig::default().with_min_size(100.0, 100.0);
        let mut engine = PartitionEngine::new(square(400.0), config).unwrap();

        let SplitOutcome::Committed(ids) = engine.try_split(LotId::new(0)) else {
            panic!("expected the split to commit");
        };
        assert_eq!(ids.len(), 4);
        assert_eq!(engine.layout().len(), 4);
        assert!(!engine.layout().contains(LotId::new(0)));
        assert!(ids.iter().all(|id| engine.layout().get(*id).unwrap().priority() == 1));
    }

    #[test]
    fn enclosed_child_is_landlocked() {
        // Three strips of a 300 square. Cutting the middle strip across its
        // length leaves a centre piece with live lots on every side.
        let config = PartitionConfig::default()
            .with_target(100)
            .with_min_size(90.0, 90.0);
        let mut engine = PartitionEngine::new(square(300.0), config).unwrap();
        let SplitOutcome::Committed(strips) = engine.try_split(LotId::new(0)) else {
            panic!("expected the root to split");
        };
        assert_eq!(strips.len(), 3);

        let mut middle = strips[1];
        for _ in 0..32 {
            let before = engine.layout().snapshot();
            let splits = engine.splits();
            match engine.try_split(middle) {
                // Cut along the strip: one renewed child.
                SplitOutcome::Committed(ids) => {
                    assert_eq!(ids.len(), 1);
                    middle = ids[0];
                }
                outcome => {
                    assert_eq!(outcome, SplitOutcome::Rejected(Rejection::Landlocked));
                    assert_eq!(engine.layout().snapshot(), before);
                    assert!(engine.layout().contains(middle));
                    assert!(engine.layout().index().contains(middle));
                    assert!(engine.layout().is_consistent());
                    assert_eq!(engine.splits(), splits);
                    return;
                }
            }
        }
        panic!("the middle strip was never cut across");
    }

    #[test]
    fn crossing_cuts_are_twisted() {
        // Reflex corner at the bottom left: cuts across the width cross each other.
        let dart = Lot::new(
            Point::new(0.0, 0.0),
            Point::new(1000.0, 0.0),
            Point::new(1000.0, 1000.0),
            Point::new(900.0, 100.0),
        );
        assert!(dart.is_simple());
        let config = PartitionConfig::default().with_min_size(10.0, 10.0);
        let mut engine = PartitionEngine::new(dart, config).unwrap();

        // Seed 333 draws `true` first, so the dart is cut into five columns.
        assert_eq!(
            engine.try_split(LotId::new(0)),
            SplitOutcome::Rejected(Rejection::Twisted)
        );
        assert_eq!(engine.layout().snapshot(), vec![dart]);
        assert!(engine.layout().index().contains(LotId::new(0)));
        assert_eq!(engine.splits(), 0);
    }

    #[test]
    fn unreachable_target_terminates() {
        let config = PartitionConfig::default()
            .with_target(100)
            .with_min_size(50.0, 50.0)
            .with_max_size(1000.0, 1000.0);
        let partition = run(square(200.0), config).unwrap();

        assert!(matches!(
            partition.termination,
            Termination::Stagnant | Termination::Exhausted
        ));
        assert!(partition.lots.len() <= 16);
        assert!(partition.rounds <= 2000);
    }

    #[test]
    fn round_ceiling_exhausts() {
        let config = PartitionConfig::default()
            .with_target(100)
            .with_min_size(50.0, 50.0)
            .with_max_rounds(2)
            .with_stagnation_limit(50);
        let partition = run(square(1000.0), config).unwrap();
        assert_eq!(partition.termination, Termination::Exhausted);
        assert_eq!(partition.rounds, 2);
    }

    #[test]
    fn same_seed_same_lots() {
        let config = PartitionConfig::default()
            .with_target(30)
            .with_min_size(40.0, 40.0)
            .with_max_size(300.0, 300.0)
            .with_policy(SplitCountPolicy::Random)
            .with_seed(Some(7));

        let a = run(square(800.0), config.clone()).unwrap();
        let b = run(square(800.0), config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn observer_sees_only_changing_rounds() {
        let config = PartitionConfig::default()
            .with_target(100)
            .with_min_size(50.0, 50.0);
        let engine = PartitionEngine::with_selector(square(200.0), config, OldestOnly).unwrap();
        let mut observer = CollectingObserver::new();
        let partition = engine.run_with_observer(&mut observer);

        let snapshots = observer.snapshots();
        assert!(!snapshots.is_empty());
        assert!(snapshots.windows(2).all(|w| w[0].lots.len() < w[1].lots.len()));
        // Later rounds may still renew lots without changing the count.
        assert_eq!(snapshots.last().unwrap().lots.len(), partition.lots.len());
        assert!(snapshots.iter().all(|s| s.round <= partition.rounds));
    }

    #[test]
    fn finished_engine_stays_finished() {
        let config = PartitionConfig::default().with_target(1);
        let mut engine = PartitionEngine::new(square(100.0), config).unwrap();
        engine.step();
        let report = engine.step();
        assert_eq!(report.state, EngineState::Finished(Termination::Converged));
        assert!(!report.changed());
    }
}
