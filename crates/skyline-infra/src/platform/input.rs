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

//! Provides translation from a concrete windowing backend (`winit`) to the
//! engine's [`Event`] type.
//!
//! This module is the only place that knows about `winit`'s event format; the
//! responder chain and every state only ever see [`Event`].

use skyline_core::{Event, Key, MouseButton};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

const LETTERS: [(KeyCode, char); 26] = [
    (KeyCode::KeyA, 'a'),
    (KeyCode::KeyB, 'b'),
    (KeyCode::KeyC, 'c'),
    (KeyCode::KeyD, 'd'),
    (KeyCode::KeyE, 'e'),
    (KeyCode::KeyF, 'f'),
    (KeyCode::KeyG, 'g'),
    (KeyCode::KeyH, 'h'),
    (KeyCode::KeyI, 'i'),
    (KeyCode::KeyJ, 'j'),
    (KeyCode::KeyK, 'k'),
    (KeyCode::KeyL, 'l'),
    (KeyCode::KeyM, 'm'),
    (KeyCode::KeyN, 'n'),
    (KeyCode::KeyO, 'o'),
    (KeyCode::KeyP, 'p'),
    (KeyCode::KeyQ, 'q'),
    (KeyCode::KeyR, 'r'),
    (KeyCode::KeyS, 's'),
    (KeyCode::KeyT, 't'),
    (KeyCode::KeyU, 'u'),
    (KeyCode::KeyV, 'v'),
    (KeyCode::KeyW, 'w'),
    (KeyCode::KeyX, 'x'),
    (KeyCode::KeyY, 'y'),
    (KeyCode::KeyZ, 'z'),
];

const DIGITS: [(KeyCode, char); 10] = [
    (KeyCode::Digit0, '0'),
    (KeyCode::Digit1, '1'),
    (KeyCode::Digit2, '2'),
    (KeyCode::Digit3, '3'),
    (KeyCode::Digit4, '4'),
    (KeyCode::Digit5, '5'),
    (KeyCode::Digit6, '6'),
    (KeyCode::Digit7, '7'),
    (KeyCode::Digit8, '8'),
    (KeyCode::Digit9, '9'),
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

/// Translates a `winit::event::WindowEvent` into a Skyline [`Event`].
///
/// Returns `None` for events the engine does not route (redraw requests,
/// key repeats, IME, touch, ...).
pub fn translate_window_event(event: &WindowEvent) -> Option<Event> {
    match event {
        WindowEvent::Resized(size) => Some(Event::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::CloseRequested => Some(Event::Closed),
        WindowEvent::Focused(focused) => Some(Event::FocusChanged { focused: *focused }),
        WindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            let key = match key_event.physical_key {
                PhysicalKey::Code(code) => map_key_code(code),
                PhysicalKey::Unidentified(_) => Key::Unidentified,
            };
            match key_event.state {
                ElementState::Pressed if !key_event.repeat => Some(Event::KeyPressed { key }),
                ElementState::Released => Some(Event::KeyReleased { key }),
                _ => None,
            }
        }
        WindowEvent::CursorMoved { position, .. } => Some(Event::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(*button);
            match state {
                ElementState::Pressed => Some(Event::MouseButtonPressed { button }),
                ElementState::Released => Some(Event::MouseButtonReleased { button }),
            }
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy): (f32, f32) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
            };
            if dx != 0.0 || dy != 0.0 {
                Some(Event::MouseWheelScrolled {
                    delta_x: dx,
                    delta_y: dy,
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Maps a physical key code to a [`Key`].
pub fn map_key_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        other => LETTERS
            .iter()
            .chain(DIGITS.iter())
            .find(|(candidate, _)| *candidate == other)
            .map(|(_, c)| Key::Character(*c))
            .or_else(|| {
                FUNCTION_KEYS
                    .iter()
                    .position(|candidate| *candidate == other)
                    .map(|index| Key::Function(index as u8 + 1))
            })
            .unwrap_or(Key::Unidentified),
    }
}

/// (Internal) Maps a `winit::event::MouseButton` to the engine's [`MouseButton`].
fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};

    #[test]
    fn test_map_named_keys() {
        assert_eq!(map_key_code(KeyCode::Escape), Key::Escape);
        assert_eq!(map_key_code(KeyCode::NumpadEnter), Key::Enter);
        assert_eq!(map_key_code(KeyCode::ArrowLeft), Key::Left);
        assert_eq!(map_key_code(KeyCode::Space), Key::Space);
    }

    #[test]
    fn test_map_character_and_function_keys() {
        assert_eq!(map_key_code(KeyCode::KeyA), Key::Character('a'));
        assert_eq!(map_key_code(KeyCode::KeyZ), Key::Character('z'));
        assert_eq!(map_key_code(KeyCode::Digit7), Key::Character('7'));
        assert_eq!(map_key_code(KeyCode::F1), Key::Function(1));
        assert_eq!(map_key_code(KeyCode::F12), Key::Function(12));
        assert_eq!(map_key_code(KeyCode::CapsLock), Key::Unidentified);
    }

    #[test]
    fn test_map_mouse_button_standard() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(
            map_mouse_button(WinitMouseButton::Right),
            MouseButton::Right
        );
        assert_eq!(
            map_mouse_button(WinitMouseButton::Other(8)),
            MouseButton::Other(8)
        );
    }

    #[test]
    fn test_translate_window_system_events() {
        assert_eq!(
            translate_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 600))),
            Some(Event::Resized {
                width: 800,
                height: 600
            })
        );
        assert_eq!(
            translate_window_event(&WindowEvent::CloseRequested),
            Some(Event::Closed)
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Focused(false)),
            Some(Event::FocusChanged { focused: false })
        );
        assert_eq!(translate_window_event(&WindowEvent::RedrawRequested), None);
    }

    #[test]
    fn test_translate_mouse_events() {
        let pressed = WindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Left,
        };
        assert_eq!(
            translate_window_event(&pressed),
            Some(Event::MouseButtonPressed {
                button: MouseButton::Left
            })
        );

        let moved = WindowEvent::CursorMoved {
            device_id: winit::event::DeviceId::dummy(),
            position: PhysicalPosition::new(100.5, 200.75),
        };
        assert_eq!(
            translate_window_event(&moved),
            Some(Event::MouseMoved { x: 100.5, y: 200.75 })
        );
    }

    #[test]
    fn test_translate_zero_wheel_is_dropped() {
        let still = WindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(0.0, 0.0),
            phase: winit::event::TouchPhase::Moved,
        };
        assert_eq!(translate_window_event(&still), None);

        let pixels = WindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(5.5, -10.0)),
            phase: winit::event::TouchPhase::Moved,
        };
        assert_eq!(
            translate_window_event(&pixels),
            Some(Event::MouseWheelScrolled {
                delta_x: 5.5,
                delta_y: -10.0
            })
        );
    }
}
