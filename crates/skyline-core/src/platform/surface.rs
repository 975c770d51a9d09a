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

use crate::event::Event;
use crate::math::{Extent2D, LinearRgba, Rect, Vec2};

/// The requested properties of a display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMode {
    /// Width of the drawable area in pixels.
    pub width: u32,
    /// Height of the drawable area in pixels.
    pub height: u32,
    /// Colour depth of the surface.
    pub bits_per_pixel: u32,
    /// Title shown by the window system.
    pub title: String,
}

/// A single recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A filled, axis-aligned rectangle.
    Rect {
        /// The area to fill, in default-view coordinates.
        rect: Rect,
        /// The fill colour.
        color: LinearRgba,
    },
    /// A run of text in the surface's fixed-width font.
    Text {
        /// The text to draw.
        text: String,
        /// Top-left corner of the first glyph.
        origin: Vec2,
        /// Font size in points.
        size: f32,
        /// The text colour.
        color: LinearRgba,
    },
}

/// The drawing calls issued during one frame, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    /// The viewport that was current when the frame was presented.
    pub view: Rect,
    /// Every recorded command.
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Returns `true` if the frame contains a text command with exactly `text`.
    pub fn contains_text(&self, text: &str) -> bool {
        self.commands
            .iter()
            .any(|command| matches!(command, DrawCommand::Text { text: t, .. } if t == text))
    }
}

/// A display surface: the window the application draws into and polls input
/// events from.
///
/// Any windowing backend (winit, a scripted headless surface, ...) can
/// implement this trait to host a Skyline application.
pub trait Surface {
    /// Returns `false` once the surface has been closed.
    fn is_open(&self) -> bool;

    /// Returns the current dimensions of the drawable area.
    fn size(&self) -> Extent2D;

    /// Returns the logical viewport used for drawing.
    fn default_view(&self) -> Rect;

    /// Replaces the logical viewport used for drawing.
    fn set_default_view(&mut self, view: Rect);

    /// Removes and returns the next pending event, if any.
    fn poll_event(&mut self) -> Option<Event>;

    /// Fills `rect` with `color`.
    fn draw_rect(&mut self, rect: Rect, color: LinearRgba);

    /// Draws `text` with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Vec2, size: f32, color: LinearRgba);

    /// Presents everything drawn since the previous call.
    fn display(&mut self);

    /// Closes the surface; [`Surface::is_open`] returns `false` afterwards.
    fn close(&mut self);
}

/// A factory for [`Surface`]s.
pub trait SurfaceBackend {
    /// Creates and opens a surface matching `mode`.
    fn create(&mut self, mode: &VideoMode) -> anyhow::Result<Box<dyn Surface>>;
}
