use crate::codes::{Key, MouseButton};

/// Edge direction of a button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Press,
    Release,
}

bitflags::bitflags! {
    /// Modifier keys held while an event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// A platform event delivered to the loop driver, one per poll.
///
/// Dimensions are signed so degenerate (zero or negative) sizes reported
/// by the platform flow through unmodified; consumers decide the skip
/// policy. Same-tick duplicate edges overwrite, they are never queued.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    WindowResize {
        width: i32,
        height: i32,
    },
    FramebufferResize {
        width: i32,
        height: i32,
    },
    WindowClose,
    Key {
        key: Key,
        scancode: u32,
        action: ButtonAction,
        mods: Modifiers,
    },
    MouseButton {
        button: MouseButton,
        action: ButtonAction,
        mods: Modifiers,
    },
    MouseMove {
        x: f64,
        y: f64,
    },
    Focus {
        focused: bool,
    },
    Quit,
}

impl Event {
    /// One sample of every variant, for dispatcher coverage tests.
    pub fn samples() -> Vec<Event> {
        vec![
            Event::WindowResize {
                width: 640,
                height: 480,
            },
            Event::FramebufferResize {
                width: 640,
                height: 480,
            },
            Event::WindowClose,
            Event::Key {
                key: Key::W,
                scancode: 0,
                action: ButtonAction::Press,
                mods: Modifiers::empty(),
            },
            Event::MouseButton {
                button: MouseButton::Left,
                action: ButtonAction::Release,
                mods: Modifiers::SHIFT,
            },
            Event::MouseMove { x: 12.0, y: 34.0 },
            Event::Focus { focused: true },
            Event::Quit,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_compose() {
        let mods = Modifiers::SHIFT | Modifiers::CONTROL;
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::ALT));
    }

    #[test]
    fn events_are_values() {
        let a = Event::MouseMove { x: 1.0, y: 2.0 };
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn samples_cover_every_variant() {
        // One arm per variant; adding an Event kind without extending
        // samples() fails this match.
        let mut seen = [false; 8];
        for event in Event::samples() {
            let slot = match event {
                Event::WindowResize { .. } => 0,
                Event::FramebufferResize { .. } => 1,
                Event::WindowClose => 2,
                Event::Key { .. } => 3,
                Event::MouseButton { .. } => 4,
                Event::MouseMove { .. } => 5,
                Event::Focus { .. } => 6,
                Event::Quit => 7,
            };
            seen[slot] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
