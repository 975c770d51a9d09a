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

//! The frame-rate indicator drawn over every frame.

use skyline_core::math::{LinearRgba, Rect};
use skyline_core::platform::Surface;
use skyline_core::RateReading;
use skyline_infra::{FontMetrics, MonoFont};

/// Text shown before the first reading is available.
pub const PLACEHOLDER: &str = "<not available>";

/// Draws the latest [`RateReading`] on a black backing box at the top-left
/// corner of the default view.
#[derive(Debug, Clone)]
pub struct RateOverlay {
    text: String,
    point_size: f32,
    metrics: FontMetrics,
}

impl RateOverlay {
    /// An overlay using approximate metrics.
    pub fn new(point_size: f32) -> Self {
        Self {
            text: PLACEHOLDER.to_string(),
            point_size,
            metrics: FontMetrics::fallback(point_size),
        }
    }

    /// An overlay laid out with `font`.
    pub fn with_font(font: &MonoFont) -> Self {
        Self {
            metrics: font.metrics(),
            ..Self::new(font.point_size())
        }
    }

    /// Replaces the displayed text with `reading`.
    pub fn update(&mut self, reading: &RateReading) {
        self.text = reading.to_string();
    }

    /// The text currently displayed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The area covered by the overlay when drawn with its top-left corner at
    /// `view`'s origin.
    pub fn bounds(&self, view: Rect) -> Rect {
        let (width, height) = self.metrics.measure(&self.text);
        Rect::new(view.x, view.y, width, height)
    }

    /// Draws the backing box and the text.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let bounds = self.bounds(surface.default_view());
        surface.draw_rect(bounds, LinearRgba::BLACK);
        surface.draw_text(&self.text, bounds.origin(), self.point_size, LinearRgba::WHITE);
    }
}
