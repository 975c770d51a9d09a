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

use skyline_sdk::prelude::*;

const TITLE: &str = "PAUSED";
const HINT: &str = "Space or Enter to resume";
const TITLE_SIZE: f32 = 32.0;
const HINT_SIZE: f32 = 16.0;
/// Approximate glyph advance relative to the point size.
const ADVANCE_RATIO: f32 = 0.6;

/// A modal dialog over the tower.
///
/// Swallows input until Space, Enter or `p` pops it. Window-system events
/// (close, resize, focus) pass through unhandled.
///
/// Only the first resume key queues a pop; later ones in the same frame are
/// swallowed like any other input.
pub struct PauseState {
    handle: AppHandle,
    paused_for: f64,
    resuming: bool,
}

impl PauseState {
    pub fn new(handle: AppHandle) -> Self {
        Self {
            handle,
            paused_for: 0.0,
            resuming: false,
        }
    }
}

impl Responder for PauseState {
    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::KeyPressed {
                key: Key::Space | Key::Enter | Key::Character('p'),
            } => {
                if !self.resuming {
                    self.resuming = true;
                    self.handle.pop_state();
                }
                true
            }
            Event::KeyPressed { .. }
            | Event::KeyReleased { .. }
            | Event::MouseButtonPressed { .. }
            | Event::MouseButtonReleased { .. }
            | Event::MouseMoved { .. }
            | Event::MouseWheelScrolled { .. } => true,
            Event::Closed | Event::Resized { .. } | Event::FocusChanged { .. } => false,
        }
    }
}

impl State for PauseState {
    fn name(&self) -> &str {
        "PauseState"
    }

    fn activate(&mut self) {
        log::info!("simulation paused");
    }

    fn deactivate(&mut self) {
        log::info!("simulation resumed after {:.1}s", self.paused_for);
    }

    fn advance(&mut self, dt: f64, surface: &mut dyn Surface) {
        self.paused_for += dt;

        let view = surface.default_view();
        surface.draw_rect(view, LinearRgba::BLACK.with_alpha(0.6));

        let center_x = view.x + view.width / 2.0;
        let center_y = view.y + view.height / 2.0;
        let title_width = TITLE.len() as f32 * TITLE_SIZE * ADVANCE_RATIO;
        let hint_width = HINT.len() as f32 * HINT_SIZE * ADVANCE_RATIO;
        surface.draw_text(
            TITLE,
            Vec2::new(center_x - title_width / 2.0, center_y - TITLE_SIZE),
            TITLE_SIZE,
            LinearRgba::WHITE,
        );
        surface.draw_text(
            HINT,
            Vec2::new(center_x - hint_width / 2.0, center_y + HINT_SIZE / 2.0),
            HINT_SIZE,
            LinearRgba::WHITE.with_alpha(0.8),
        );
    }
}
