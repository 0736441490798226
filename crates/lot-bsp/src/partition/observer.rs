//! Observer hook for watching a run progress round by round.
//!
//! Observers receive read-only snapshots, so they can draw or record
//! intermediate layouts without being able to influence the run.

use crate::Lot;

/// Receives the live lots after every round that changed the lot count.
pub trait RoundObserver {
    /// Called with the 1-based round number and the lots after that round.
    fn on_round(&mut self, round: usize, lots: &[Lot]);
}

/// Observer that ignores every round.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RoundObserver for NoopObserver {
    fn on_round(&mut self, _round: usize, _lots: &[Lot]) {}
}

/// A recorded round: its number and the lots it left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSnapshot {
    pub round: usize,
    pub lots: Vec<Lot>,
}

/// Observer that records every snapshot it receives.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    snapshots: Vec<RoundSnapshot>,
}

impl CollectingObserver {
    /// Creates an empty collecting observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded snapshots.
    pub fn snapshots(&self) -> &[RoundSnapshot] {
        &self.snapshots
    }

    /// Returns the recorded snapshots, consuming the observer.
    pub fn into_snapshots(self) -> Vec<RoundSnapshot> {
        self.snapshots
    }
}

impl RoundObserver for CollectingObserver {
    fn on_round(&mut self, round: usize, lots: &[Lot]) {
        self.snapshots.push(RoundSnapshot {
            round,
            lots: lots.to_vec(),
        });
    }
}

/// An observer that calls a closure for each round.
pub struct FnObserver<F>
where
    F: FnMut(usize, &[Lot]),
{
    func: F,
}

impl<F> FnObserver<F>
where
    F: FnMut(usize, &[Lot]),
{
    /// Creates a new observer from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> RoundObserver for FnObserver<F>
where
    F: FnMut(usize, &[Lot]),
{
    fn on_round(&mut self, round: usize, lots: &[Lot]) {
        (self.func)(round, lots);
    }
}
