//! Drag-mode state machine for the reticle
//!
//! Pure state: no X11 calls. The surface layer applies the side effects
//! (input-region toggling, redraws); this module owns the two-state machine
//! (`Locked` = click-through, `Dragging` = pointer capture) and the tracked
//! pixel position that overrides the persisted placement while dragging.

use tracing::debug;

use crate::config::{CrosshairConfig, Placement};
use crate::types::{Position, ScreenSize};

#[derive(Debug)]
pub struct ReticleState {
    config: CrosshairConfig,
    screen: ScreenSize,
    drag_mode: bool,
    dragging: bool,
    /// `None` means "derive from `config.position` every frame"; `Some` is an
    /// explicit pixel position that overrides it until the next config push.
    crosshair_pos: Option<Position>,
    /// Last observed pointer coordinate while a press is held
    drag_anchor: Position,
}

impl ReticleState {
    pub fn new(config: CrosshairConfig, screen: ScreenSize) -> Self {
        Self {
            config,
            screen,
            drag_mode: false,
            dragging: false,
            crosshair_pos: None,
            drag_anchor: Position::default(),
        }
    }

    pub fn config(&self) -> &CrosshairConfig {
        &self.config
    }

    pub fn drag_mode(&self) -> bool {
        self.drag_mode
    }

    /// Replace the configuration wholesale.
    ///
    /// Unconditionally clears the tracked position so the reticle re-derives
    /// its anchor from the fresh config on the next frame. Does not change
    /// the drag mode.
    pub fn update_config(&mut self, config: CrosshairConfig) {
        self.config = config;
        self.crosshair_pos = None;
    }

    /// Toggle between `Locked` and `Dragging`; returns the resulting mode
    /// (true = dragging).
    ///
    /// Entering drag mode seeds the tracked position from the persisted
    /// placement so the reticle does not jump on entry.
    pub fn toggle_drag_mode(&mut self) -> bool {
        self.drag_mode = !self.drag_mode;

        if self.drag_mode {
            if self.crosshair_pos.is_none() {
                self.crosshair_pos = Some(self.config.position.resolve(self.screen));
            }
        } else {
            self.dragging = false;
        }

        debug!(drag_mode = self.drag_mode, "Toggled drag mode");
        self.drag_mode
    }

    /// Pointer button pressed at the given screen coordinate
    pub fn pointer_press(&mut self, pos: Position) {
        if self.drag_mode {
            self.dragging = true;
            self.drag_anchor = pos;
        }
    }

    /// Pointer button released
    pub fn pointer_release(&mut self) {
        if self.drag_mode {
            self.dragging = false;
        }
    }

    /// Pointer moved; returns true if the reticle position changed.
    ///
    /// Tracking is incremental: the delta from the last observed coordinate
    /// is applied and the anchor reset, so missed motion events cannot
    /// accumulate drift.
    pub fn pointer_move(&mut self, pos: Position) -> bool {
        if !self.drag_mode || !self.dragging {
            return false;
        }

        let dx = pos.x - self.drag_anchor.x;
        let dy = pos.y - self.drag_anchor.y;
        self.drag_anchor = pos;

        if let Some(current) = self.crosshair_pos {
            let moved = current.offset(dx, dy);
            self.crosshair_pos = Some(moved);
            self.config.position = Placement::At(moved);
            true
        } else {
            false
        }
    }

    /// Current reticle position, callable in either state
    pub fn crosshair_position(&self) -> Position {
        self.crosshair_pos
            .unwrap_or_else(|| self.config.position.resolve(self.screen))
    }

    /// Set the placement back to the `Centered` sentinel.
    ///
    /// If a pixel position is currently tracked it snaps to the screen
    /// center; the drag mode itself is unchanged.
    pub fn center(&mut self) {
        self.config.position = Placement::Centered;
        if self.crosshair_pos.is_some() {
            self.crosshair_pos = Some(self.screen.center());
        }
    }

    /// Anchor point for the current frame, evaluated fresh every redraw tick
    pub fn anchor(&self) -> Position {
        if self.drag_mode && let Some(pos) = self.crosshair_pos {
            return pos;
        }
        self.config.position.resolve(self.screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: ScreenSize = ScreenSize::new(1920, 1080);

    fn state() -> ReticleState {
        ReticleState::new(CrosshairConfig::default(), SCREEN)
    }

    #[test]
    fn test_initial_state_is_locked() {
        let state = state();
        assert!(!state.drag_mode());
        assert_eq!(state.crosshair_position(), Position::new(960, 540));
    }

    #[test]
    fn test_toggle_from_centered_seeds_screen_center() {
        let mut state = state();
        assert!(state.toggle_drag_mode());
        assert_eq!(state.crosshair_position(), Position::new(960, 540));
    }

    #[test]
    fn test_toggle_seeds_from_explicit_position() {
        let config = CrosshairConfig {
            position: Placement::At(Position::new(300, 200)),
            ..CrosshairConfig::default()
        };
        let mut state = ReticleState::new(config, SCREEN);
        state.toggle_drag_mode();
        assert_eq!(state.crosshair_position(), Position::new(300, 200));
    }

    #[test]
    fn test_drag_applies_incremental_delta() {
        let mut state = state();
        state.toggle_drag_mode();
        let before = state.crosshair_position();

        state.pointer_press(Position::new(100, 100));
        assert!(state.pointer_move(Position::new(140, 160)));

        assert_eq!(state.crosshair_position(), before.offset(40, 60));
        assert_eq!(
            state.config().position,
            Placement::At(before.offset(40, 60))
        );
    }

    #[test]
    fn test_drag_delta_resets_anchor_each_move() {
        let mut state = state();
        state.toggle_drag_mode();
        let before = state.crosshair_position();

        state.pointer_press(Position::new(0, 0));
        state.pointer_move(Position::new(10, 0));
        state.pointer_move(Position::new(10, 25));

        assert_eq!(state.crosshair_position(), before.offset(10, 25));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut state = state();
        state.toggle_drag_mode();
        let before = state.crosshair_position();

        assert!(!state.pointer_move(Position::new(500, 500)));
        assert_eq!(state.crosshair_position(), before);
    }

    #[test]
    fn test_move_outside_drag_mode_is_ignored() {
        let mut state = state();
        state.pointer_press(Position::new(10, 10));
        assert!(!state.pointer_move(Position::new(50, 50)));
        assert_eq!(state.crosshair_position(), Position::new(960, 540));
    }

    #[test]
    fn test_release_stops_tracking() {
        let mut state = state();
        state.toggle_drag_mode();

        state.pointer_press(Position::new(0, 0));
        state.pointer_move(Position::new(5, 5));
        state.pointer_release();
        assert!(!state.pointer_move(Position::new(100, 100)));
    }

    #[test]
    fn test_update_config_resets_tracked_position() {
        let mut state = state();
        state.toggle_drag_mode();
        state.pointer_press(Position::new(0, 0));
        state.pointer_move(Position::new(50, 50));

        let pushed = CrosshairConfig::default();
        state.update_config(pushed);

        // Still dragging mode, but the stale pixel position is gone: the
        // anchor derives from the fresh config again.
        assert!(state.drag_mode());
        assert_eq!(state.anchor(), Position::new(960, 540));
        assert_eq!(state.crosshair_position(), Position::new(960, 540));
    }

    #[test]
    fn test_update_config_does_not_change_mode() {
        let mut state = state();
        state.update_config(CrosshairConfig::default());
        assert!(!state.drag_mode());

        state.toggle_drag_mode();
        state.update_config(CrosshairConfig::default());
        assert!(state.drag_mode());
    }

    #[test]
    fn test_center_during_drag_snaps_to_screen_center() {
        let mut state = state();
        state.toggle_drag_mode();
        state.pointer_press(Position::new(0, 0));
        state.pointer_move(Position::new(300, 300));

        state.center();
        assert!(state.drag_mode());
        assert_eq!(state.config().position, Placement::Centered);
        assert_eq!(state.crosshair_position(), Position::new(960, 540));
    }

    #[test]
    fn test_center_while_locked_sets_sentinel_only() {
        let config = CrosshairConfig {
            position: Placement::At(Position::new(5, 5)),
            ..CrosshairConfig::default()
        };
        let mut state = ReticleState::new(config, SCREEN);

        state.center();
        assert_eq!(state.config().position, Placement::Centered);
        assert_eq!(state.crosshair_position(), Position::new(960, 540));
    }

    #[test]
    fn test_anchor_uses_tracked_position_only_in_drag_mode() {
        let mut state = state();
        state.toggle_drag_mode();
        state.pointer_press(Position::new(0, 0));
        state.pointer_move(Position::new(100, 100));
        let dragged = state.anchor();

        // Leaving drag mode: anchor falls back to config.position, which the
        // drag kept in sync, so there is no visible jump.
        state.toggle_drag_mode();
        assert_eq!(state.anchor(), dragged);
    }

    #[test]
    fn test_toggle_off_clears_pressed_state() {
        let mut state = state();
        state.toggle_drag_mode();
        state.pointer_press(Position::new(0, 0));

        state.toggle_drag_mode();
        state.toggle_drag_mode();
        // No press since re-entry, so motion must not move the reticle
        let before = state.crosshair_position();
        assert!(!state.pointer_move(Position::new(999, 999)));
        assert_eq!(state.crosshair_position(), before);
    }
}
