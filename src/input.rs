//! Pressed-key tracking.
//!
//! The host's event loop (or per-frame polling glue) flips key states on
//! one side; the game update asks `is_key_pressed` on the other. Both
//! sides go through one mutex, so the host may poll from a different
//! thread than the frame loop.

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Shift,
    W,
    A,
    S,
    D,
    Q,
    E,
}

#[derive(Default)]
pub struct Keyboard {
    pressed: Mutex<HashSet<Key>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pressed(&self, key: Key, pressed: bool) {
        let mut keys = self.pressed.lock().unwrap();
        if pressed {
            keys.insert(key);
        } else {
            keys.remove(&key);
        }
    }

    /// Whether the key is currently held down.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.lock().unwrap().contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let keyboard = Keyboard::new();
        assert!(!keyboard.is_key_pressed(Key::W));

        keyboard.set_pressed(Key::W, true);
        keyboard.set_pressed(Key::Space, true);
        assert!(keyboard.is_key_pressed(Key::W));
        assert!(keyboard.is_key_pressed(Key::Space));
        assert!(!keyboard.is_key_pressed(Key::Shift));

        keyboard.set_pressed(Key::W, false);
        assert!(!keyboard.is_key_pressed(Key::W));
        // Releasing an unpressed key is a no-op.
        keyboard.set_pressed(Key::Q, false);
        assert!(!keyboard.is_key_pressed(Key::Q));
    }
}
