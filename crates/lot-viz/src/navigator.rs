//! Round-by-round navigation through a recorded partitioning run.

use lot_bsp::partition::RoundSnapshot;
use lot_bsp::Lot;
use macroquad::prelude::*;

use crate::{draw_lot, draw_quad_outline, ViewTransform};

/// Interactive navigator over the snapshots of a run.
///
/// Position 0 shows the initial lot; position `i > 0` shows the layout after
/// the `i`-th recorded round.
pub struct RoundNavigator {
    initial: Lot,
    snapshots: Vec<RoundSnapshot>,
    position: usize,
}

impl RoundNavigator {
    /// Creates a navigator positioned on the final layout.
    pub fn new(initial: Lot, snapshots: Vec<RoundSnapshot>) -> Self {
        let position = snapshots.len();
        Self {
            initial,
            snapshots,
            position,
        }
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the last valid position.
    pub fn last(&self) -> usize {
        self.snapshots.len()
    }

    /// Round number shown at the current position (0 for the initial lot).
    pub fn round(&self) -> usize {
        self.current_snapshot().map_or(0, |s| s.round)
    }

    /// Lots shown at the current position.
    pub fn lots(&self) -> &[Lot] {
        match self.current_snapshot() {
            Some(snapshot) => &snapshot.lots,
            None => std::slice::from_ref(&self.initial),
        }
    }

    fn current_snapshot(&self) -> Option<&RoundSnapshot> {
        self.position.checked_sub(1).and_then(|i| self.snapshots.get(i))
    }

    /// Moves to the next snapshot. Returns true if successful.
    pub fn go_next(&mut self) -> bool {
        if self.position < self.last() {
            self.position += 1;
            return true;
        }
        false
    }

    /// Moves to the previous snapshot. Returns true if successful.
    pub fn go_previous(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            return true;
        }
        false
    }

    /// Jumps to the initial lot. Returns true if the position changed.
    pub fn go_first(&mut self) -> bool {
        let changed = self.position != 0;
        self.position = 0;
        changed
    }

    /// Jumps to the final layout. Returns true if the position changed.
    pub fn go_last(&mut self) -> bool {
        let changed = self.position != self.last();
        self.position = self.last();
        changed
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::N) || is_key_pressed(KeyCode::Right) {
            changed |= self.go_next();
        }
        if is_key_pressed(KeyCode::P) || is_key_pressed(KeyCode::Left) {
            changed |= self.go_previous();
        }
        if is_key_pressed(KeyCode::F) {
            changed |= self.go_first();
        }
        if is_key_pressed(KeyCode::L) {
            changed |= self.go_last();
        }

        changed
    }

    /// Renders the lots at the current position, with the initial lot's
    /// outline on top.
    pub fn render(&self, view: &ViewTransform) {
        for lot in self.lots() {
            draw_lot(lot, view, Color::from_rgba(20, 20, 30, 255));
        }
        let corners = self.initial.vertices().map(|p| view.world_to_screen(p));
        draw_quad_outline(corners, 3.0, Color::from_rgba(200, 100, 100, 255));
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, y_offset: f32) {
        draw_text(
            &format!("Step {}/{} (round {})", self.position, self.last(), self.round()),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Lots: {}", self.lots().len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            "[N]ext | [P]revious | [F]irst | [L]ast | drag to pan, wheel to zoom",
            10.0,
            y_offset + 40.0,
            16.0,
            GRAY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorded() -> RoundNavigator {
        let initial = Lot::rectangle(0.0, 0.0, 100.0, 100.0);
        let halves = initial.split(lot_bsp::SplitAxis::Width, 2);
        let snapshots = vec![
            RoundSnapshot {
                round: 1,
                lots: halves.clone(),
            },
            RoundSnapshot {
                round: 4,
                lots: [halves[0].split(lot_bsp::SplitAxis::Height, 2), vec![halves[1]]].concat(),
            },
        ];
        RoundNavigator::new(initial, snapshots)
    }

    #[test]
    fn starts_on_last_snapshot() {
        let nav = recorded();
        assert_eq!(nav.position(), 2);
        assert_eq!(nav.round(), 4);
        assert_eq!(nav.lots().len(), 3);
    }

    #[test]
    fn steps_back_to_initial_lot() {
        let mut nav = recorded();
        assert!(nav.go_previous());
        assert_eq!(nav.round(), 1);
        assert!(nav.go_previous());
        assert_eq!(nav.round(), 0);
        assert_eq!(nav.lots().len(), 1);
        assert!(!nav.go_previous());
    }

    #[test]
    fn first_and_last_jump() {
        let mut nav = recorded();
        assert!(!nav.go_next());
        assert!(nav.go_first());
        assert!(!nav.go_first());
        assert_eq!(nav.position(), 0);
        assert!(nav.go_last());
        assert_eq!(nav.position(), nav.last());
    }
}
