//! Input events delivered by the engine
//!
//! Only the keys the game reacts to get their own variant; everything else
//! arrives as `KeyCode::Other`.

use serde::{Deserialize, Serialize};

/// Physical key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Escape,
    Enter,
    A,
    D,
    Other(u32),
}

/// What happened to the key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    Pressed,
    Released,
    Repeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Event category a subscription listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Key,
    MouseClick,
}

/// A single input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Key { key: KeyCode, action: KeyAction },
    Click { x: f64, y: f64, button: MouseButton },
}

impl InputEvent {
    pub fn press(key: KeyCode) -> Self {
        InputEvent::Key {
            key,
            action: KeyAction::Pressed,
        }
    }

    pub fn release(key: KeyCode) -> Self {
        InputEvent::Key {
            key,
            action: KeyAction::Released,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Key { .. } => EventKind::Key,
            InputEvent::Click { .. } => EventKind::MouseClick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind() {
        assert_eq!(InputEvent::press(KeyCode::A).kind(), EventKind::Key);
        let click = InputEvent::Click {
            x: 1.0,
            y: 2.0,
            button: MouseButton::Left,
        };
        assert_eq!(click.kind(), EventKind::MouseClick);
    }
}
