use std::collections::HashMap;

use aperture_common::{ButtonAction, Event, Key, MouseButton};
use glam::DVec2;
use tracing::trace;

/// Per-button debounce state.
///
/// `JustPress`/`JustRelease` record a one-time edge; the remaining states
/// are levels derived from edges over time. `tick()` advances through the
/// fixed table `None→None, JustPress→Down, JustRelease→Up, Up→None,
/// Down→Press, Press→Press`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    None,
    JustPress,
    JustRelease,
    Up,
    Down,
    Press,
}

impl ButtonState {
    /// The state one tick later, absent new edges.
    pub fn next(self) -> Self {
        match self {
            ButtonState::None => ButtonState::None,
            ButtonState::JustPress => ButtonState::Down,
            ButtonState::JustRelease => ButtonState::Up,
            ButtonState::Up => ButtonState::None,
            ButtonState::Down => ButtonState::Press,
            ButtonState::Press => ButtonState::Press,
        }
    }

    fn edge(action: ButtonAction) -> Self {
        match action {
            ButtonAction::Press => ButtonState::JustPress,
            ButtonAction::Release => ButtonState::JustRelease,
        }
    }
}

/// Tracks every button's state plus the cursor position.
///
/// Driven by the loop driver: `handle_event` during the drain phase,
/// `tick` exactly once afterwards. Entries that settle back to `None`
/// are evicted, which is observationally identical to a dense table of
/// `None` states.
#[derive(Debug, Default)]
pub struct InputTracker {
    keys: HashMap<Key, ButtonState>,
    mouse: HashMap<MouseButton, ButtonState>,
    cursor: DVec2,
    last_cursor: DVec2,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge or cursor move. Non-input events fall through.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key { key, action, .. } => {
                trace!(?key, ?action, "key edge");
                self.keys.insert(key, ButtonState::edge(action));
            }
            Event::MouseButton { button, action, .. } => {
                trace!(?button, ?action, "mouse edge");
                self.mouse.insert(button, ButtonState::edge(action));
            }
            Event::MouseMove { x, y } => {
                self.cursor = DVec2::new(x, y);
            }
            _ => {}
        }
    }

    /// Advance every button one step and latch the cursor position.
    pub fn tick(&mut self) {
        advance(&mut self.keys);
        advance(&mut self.mouse);
        self.last_cursor = self.cursor;
    }

    pub fn key_state(&self, key: Key) -> ButtonState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    pub fn mouse_state(&self, button: MouseButton) -> ButtonState {
        self.mouse.get(&button).copied().unwrap_or_default()
    }

    /// True exactly on the tick a press edge was observed.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.key_state(key) == ButtonState::Down
    }

    /// True from the press edge until the release edge.
    pub fn is_key_held(&self, key: Key) -> bool {
        matches!(self.key_state(key), ButtonState::Down | ButtonState::Press)
    }

    /// True exactly on the tick a release edge was observed.
    pub fn is_key_up(&self, key: Key) -> bool {
        self.key_state(key) == ButtonState::Up
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_state(button) == ButtonState::Down
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        matches!(
            self.mouse_state(button),
            ButtonState::Down | ButtonState::Press
        )
    }

    pub fn is_mouse_up(&self, button: MouseButton) -> bool {
        self.mouse_state(button) == ButtonState::Up
    }

    pub fn cursor_position(&self) -> DVec2 {
        self.cursor
    }

    /// Cursor motion since the previous tick.
    pub fn cursor_delta(&self) -> DVec2 {
        self.cursor - self.last_cursor
    }
}

fn advance<B: std::hash::Hash + Eq>(table: &mut HashMap<B, ButtonState>) {
    for state in table.values_mut() {
        *state = state.next();
    }
    table.retain(|_, state| *state != ButtonState::None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use aperture_common::Modifiers;

    fn press(key: Key) -> Event {
        Event::Key {
            key,
            scancode: 0,
            action: ButtonAction::Press,
            mods: Modifiers::empty(),
        }
    }

    fn release(key: Key) -> Event {
        Event::Key {
            key,
            scancode: 0,
            action: ButtonAction::Release,
            mods: Modifiers::empty(),
        }
    }

    #[test]
    fn quiescent_button_stays_none() {
        let mut input = InputTracker::new();
        for _ in 0..100 {
            input.tick();
        }
        assert_eq!(input.key_state(Key::W), ButtonState::None);
        assert_eq!(input.mouse_state(MouseButton::Left), ButtonState::None);
    }

    #[test]
    fn press_edge_settles_to_press() {
        let mut input = InputTracker::new();
        input.handle_event(&press(Key::W));
        assert_eq!(input.key_state(Key::W), ButtonState::JustPress);

        input.tick();
        assert_eq!(input.key_state(Key::W), ButtonState::Down);
        assert!(input.is_key_down(Key::W));
        assert!(input.is_key_held(Key::W));

        input.tick();
        assert_eq!(input.key_state(Key::W), ButtonState::Press);
        assert!(!input.is_key_down(Key::W));
        assert!(input.is_key_held(Key::W));

        input.tick();
        assert_eq!(input.key_state(Key::W), ButtonState::Press);
    }

    #[test]
    fn release_edge_settles_to_none() {
        let mut input = InputTracker::new();
        input.handle_event(&press(Key::Space));
        input.tick();
        input.tick();
        input.handle_event(&release(Key::Space));
        assert_eq!(input.key_state(Key::Space), ButtonState::JustRelease);

        input.tick();
        assert_eq!(input.key_state(Key::Space), ButtonState::Up);
        assert!(input.is_key_up(Key::Space));
        assert!(!input.is_key_held(Key::Space));

        input.tick();
        assert_eq!(input.key_state(Key::Space), ButtonState::None);

        input.tick();
        assert_eq!(input.key_state(Key::Space), ButtonState::None);
    }

    #[test]
    fn same_tick_double_edge_collapses_to_latest() {
        let mut input = InputTracker::new();
        input.handle_event(&press(Key::E));
        input.handle_event(&release(Key::E));
        assert_eq!(input.key_state(Key::E), ButtonState::JustRelease);

        input.tick();
        assert_eq!(input.key_state(Key::E), ButtonState::Up);
    }

    #[test]
    fn mouse_buttons_follow_the_same_table() {
        let mut input = InputTracker::new();
        input.handle_event(&Event::MouseButton {
            button: MouseButton::Right,
            action: ButtonAction::Press,
            mods: Modifiers::empty(),
        });
        input.tick();
        assert!(input.is_mouse_down(MouseButton::Right));
        input.tick();
        assert!(input.is_mouse_held(MouseButton::Right));
        assert!(!input.is_mouse_down(MouseButton::Right));
    }

    #[test]
    fn cursor_delta_is_per_tick() {
        let mut input = InputTracker::new();
        input.handle_event(&Event::MouseMove { x: 10.0, y: 20.0 });
        input.tick();
        input.handle_event(&Event::MouseMove { x: 13.0, y: 24.0 });
        assert_eq!(input.cursor_delta(), DVec2::new(3.0, 4.0));
        input.tick();
        assert_eq!(input.cursor_delta(), DVec2::ZERO);
        assert_eq!(input.cursor_position(), DVec2::new(13.0, 24.0));
    }

    #[test]
    fn every_event_variant_is_accepted() {
        let mut input = InputTracker::new();
        for event in Event::samples() {
            input.handle_event(&event);
        }
        input.tick();
    }
}
