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

/// Simulation speed multipliers, slowest first.
pub const SPEEDS: [u32; 3] = [1, 2, 4];

/// Height of the toolbar strip in pixels.
pub const TOOLBAR_HEIGHT: f32 = 28.0;

const TEXT_SIZE: f32 = 16.0;
const BACKGROUND: LinearRgba = LinearRgba::rgb(0.12, 0.12, 0.14);

/// The strip at the bottom of the tower view: shows the clock and owns the
/// simulation speed.
///
/// Up/Down change the speed; a left click on the strip cycles through it.
#[derive(Debug, Clone)]
pub struct Toolbar {
    speed_index: usize,
    cursor: Vec2,
    bounds: Rect,
}

impl Toolbar {
    pub fn new() -> Self {
        Self {
            speed_index: 0,
            cursor: Vec2::ZERO,
            bounds: Rect::default(),
        }
    }

    /// The current speed multiplier.
    pub fn speed(&self) -> u32 {
        SPEEDS[self.speed_index]
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn faster(&mut self) {
        self.speed_index = (self.speed_index + 1).min(SPEEDS.len() - 1);
    }

    fn slower(&mut self) {
        self.speed_index = self.speed_index.saturating_sub(1);
    }

    fn cycle(&mut self) {
        self.speed_index = (self.speed_index + 1) % SPEEDS.len();
    }

    /// Anchors the strip to the bottom of `view`.
    pub fn layout(&mut self, view: Rect) {
        self.bounds = Rect::new(
            view.x,
            view.bottom() - TOOLBAR_HEIGHT,
            view.width,
            TOOLBAR_HEIGHT,
        );
    }

    pub fn draw(&self, surface: &mut dyn Surface, caption: &str) {
        surface.draw_rect(self.bounds, BACKGROUND);
        let origin = Vec2::new(
            self.bounds.x + 8.0,
            self.bounds.y + (TOOLBAR_HEIGHT - TEXT_SIZE) / 2.0,
        );
        surface.draw_text(caption, origin, TEXT_SIZE, LinearRgba::WHITE);
    }
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder for Toolbar {
    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::KeyPressed { key: Key::Up } => {
                self.faster();
                log::debug!("speed x{}", self.speed());
                true
            }
            Event::KeyPressed { key: Key::Down } => {
                self.slower();
                log::debug!("speed x{}", self.speed());
                true
            }
            Event::MouseMoved { x, y } => {
                self.cursor = Vec2::new(*x, *y);
                false
            }
            Event::MouseButtonPressed {
                button: MouseButton::Left,
            } if self.bounds.contains(self.cursor) => {
                self.cycle();
                log::debug!("speed x{}", self.speed());
                true
            }
            _ => false,
        }
    }
}
