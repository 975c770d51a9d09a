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

//! CPU rasterisation of a [`DisplayList`] into a `0x00RRGGBB` framebuffer.
//!
//! Only [`DrawCommand::Rect`]s are filled. Text commands are skipped: there
//! is no glyph renderer yet.

use skyline_core::math::{LinearRgba, Rect};
use skyline_core::platform::{DisplayList, DrawCommand};

/// Clears `pixels` to black and fills every rectangle of `list`, mapping the
/// list's view onto the whole `width` x `height` buffer.
pub(crate) fn rasterize(list: &DisplayList, width: u32, height: u32, pixels: &mut [u32]) {
    pixels.fill(0);
    if list.view.width <= 0.0 || list.view.height <= 0.0 {
        return;
    }
    let scale_x = width as f32 / list.view.width;
    let scale_y = height as f32 / list.view.height;

    for command in &list.commands {
        let DrawCommand::Rect { rect, color } = command else {
            continue;
        };
        if color.a <= 0.0 {
            continue;
        }
        let Some((x0, y0, x1, y1)) = pixel_span(*rect, list.view, scale_x, scale_y, width, height)
        else {
            continue;
        };
        let source = encode(*color);
        let alpha = color.a.clamp(0.0, 1.0);
        for y in y0..y1 {
            let row = &mut pixels[(y * width) as usize..][..width as usize];
            for pixel in &mut row[x0 as usize..x1 as usize] {
                *pixel = if alpha >= 1.0 {
                    source
                } else {
                    blend(*pixel, source, alpha)
                };
            }
        }
    }
}

/// The clipped pixel bounds `[x0, x1) x [y0, y1)` covered by `rect`.
fn pixel_span(
    rect: Rect,
    view: Rect,
    scale_x: f32,
    scale_y: f32,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let clip = |value: f32, max: u32| value.round().clamp(0.0, max as f32) as u32;
    let x0 = clip((rect.x - view.x) * scale_x, width);
    let x1 = clip((rect.right() - view.x) * scale_x, width);
    let y0 = clip((rect.y - view.y) * scale_y, height);
    let y1 = clip((rect.bottom() - view.y) * scale_y, height);
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

fn to_srgb(linear: f32) -> u32 {
    let linear = linear.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u32
}

fn encode(color: LinearRgba) -> u32 {
    (to_srgb(color.r) << 16) | (to_srgb(color.g) << 8) | to_srgb(color.b)
}

fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
    let channel = |shift: u32| {
        let d = ((dst >> shift) & 0xff) as f32;
        let s = ((src >> shift) & 0xff) as f32;
        ((s * alpha + d * (1.0 - alpha)).round() as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}
