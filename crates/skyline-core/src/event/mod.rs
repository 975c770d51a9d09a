// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Input and system events, and the command queue used to defer work to the
//! main loop.
//!
//! An [`Event`] is produced by a platform surface for every polled occurrence,
//! passed by reference through the responder chain exactly once, and then
//! discarded. It is backend-agnostic: `skyline-infra` translates `winit`
//! events into it.

mod bus;

pub use self::bus::CommandQueue;

/// A backend-agnostic input or window-system occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The surface was resized; dimensions are in physical pixels.
    Resized {
        /// The new width of the drawable area.
        width: u32,
        /// The new height of the drawable area.
        height: u32,
    },
    /// The user asked to close the surface.
    Closed,
    /// A keyboard key was pressed.
    KeyPressed {
        /// The key that was pressed.
        key: Key,
    },
    /// A keyboard key was released.
    KeyReleased {
        /// The key that was released.
        key: Key,
    },
    /// A mouse button was pressed.
    MouseButtonPressed {
        /// The mouse button that was pressed.
        button: MouseButton,
    },
    /// A mouse button was released.
    MouseButtonReleased {
        /// The mouse button that was released.
        button: MouseButton,
    },
    /// The mouse cursor moved.
    MouseMoved {
        /// The new x-coordinate of the cursor.
        x: f32,
        /// The new y-coordinate of the cursor.
        y: f32,
    },
    /// The mouse wheel was scrolled.
    MouseWheelScrolled {
        /// The horizontal scroll delta.
        delta_x: f32,
        /// The vertical scroll delta.
        delta_y: f32,
    },
    /// The surface gained or lost keyboard focus.
    FocusChanged {
        /// `true` when focus was gained.
        focused: bool,
    },
}

impl Event {
    /// Returns `true` if this is a key press of `key`.
    pub fn is_key_press(&self, key: Key) -> bool {
        matches!(self, Event::KeyPressed { key: pressed } if *pressed == key)
    }

    /// A short, stable name for the event kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Resized { .. } => "resized",
            Event::Closed => "closed",
            Event::KeyPressed { .. } => "key-pressed",
            Event::KeyReleased { .. } => "key-released",
            Event::MouseButtonPressed { .. } => "mouse-pressed",
            Event::MouseButtonReleased { .. } => "mouse-released",
            Event::MouseMoved { .. } => "mouse-moved",
            Event::MouseWheelScrolled { .. } => "mouse-wheel",
            Event::FocusChanged { .. } => "focus-changed",
        }
    }
}

/// A keyboard key, identified by its physical position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// The escape key; the application-level cancel key.
    Escape,
    /// Return / Enter.
    Enter,
    /// The space bar.
    Space,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// A letter or digit key, lowercase.
    Character(char),
    /// A function key `F1`..`F24`.
    Function(u8),
    /// Any key the engine has no name for.
    Unidentified,
}

/// An engine-internal representation of a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// The back mouse button (typically on the side).
    Back,
    /// The forward mouse button (typically on the side).
    Forward,
    /// Another mouse button, identified by a numeric code.
    Other(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_matches_only_the_same_key() {
        let event = Event::KeyPressed { key: Key::Escape };
        assert!(event.is_key_press(Key::Escape));
        assert!(!event.is_key_press(Key::Enter));
        assert!(!Event::KeyReleased { key: Key::Escape }.is_key_press(Key::Escape));
        assert!(!Event::Closed.is_key_press(Key::Escape));
    }

    #[test]
    fn kind_names_are_distinct() {
        let events = [
            Event::Resized {
                width: 1,
                height: 1,
            },
            Event::Closed,
            Event::KeyPressed { key: Key::Space },
            Event::KeyReleased { key: Key::Space },
            Event::MouseButtonPressed {
                button: MouseButton::Left,
            },
            Event::MouseButtonReleased {
                button: MouseButton::Left,
            },
            Event::MouseMoved { x: 0.0, y: 0.0 },
            Event::MouseWheelScrolled {
                delta_x: 0.0,
                delta_y: 1.0,
            },
            Event::FocusChanged { focused: true },
        ];
        let mut kinds: Vec<_> = events.iter().map(Event::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), events.len());
    }
}
