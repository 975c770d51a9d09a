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

//! A `winit`-based implementation of the [`Surface`] trait.
//!
//! The main loop polls a [`Surface`] instead of handing control to `winit`, so
//! the event loop is driven with `pump_app_events`: once per frame, on the
//! first `poll_event` after `display`, pending OS events are pumped, translated
//! and queued.
//!
//! Frames are rasterised on the CPU and presented through `softbuffer`.
//! Rectangles are filled; text is not drawn.

use std::collections::VecDeque;
use std::mem;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use skyline_core::math::{Extent2D, LinearRgba, Rect, Vec2};
use skyline_core::platform::{DisplayList, DrawCommand, Surface, SurfaceBackend, VideoMode};
use skyline_core::Event;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, OwnedDisplayHandle};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::raster;
use crate::platform::input::translate_window_event;

/// The `softbuffer` framebuffer attached to the window.
struct Canvas {
    _context: softbuffer::Context<OwnedDisplayHandle>,
    surface: softbuffer::Surface<OwnedDisplayHandle, Rc<Window>>,
}

impl Canvas {
    fn new(event_loop: &ActiveEventLoop, window: &Rc<Window>) -> anyhow::Result<Self> {
        let context = softbuffer::Context::new(event_loop.owned_display_handle())
            .map_err(|e| anyhow!("unable to create the softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, Rc::clone(window))
            .map_err(|e| anyhow!("unable to create the softbuffer surface: {e}"))?;
        Ok(Self {
            _context: context,
            surface,
        })
    }

    fn present(&mut self, window: &Window, frame: &DisplayList) {
        let size = window.inner_size();
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };
        if let Err(e) = self.surface.resize(width, height) {
            log::warn!("unable to resize the framebuffer: {e}");
            return;
        }
        let mut buffer = match self.surface.buffer_mut() {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("unable to map the framebuffer: {e}");
                return;
            }
        };
        raster::rasterize(frame, size.width, size.height, &mut buffer);
        window.pre_present_notify();
        if let Err(e) = buffer.present() {
            log::warn!("unable to present the framebuffer: {e}");
        }
    }
}

/// The `winit` side of the surface: receives callbacks while events are pumped.
struct WindowHost {
    mode: VideoMode,
    window: Option<Rc<Window>>,
    canvas: Option<Canvas>,
    creation_error: Option<anyhow::Error>,
    pending: VecDeque<Event>,
}

impl ApplicationHandler for WindowHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.creation_error.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        log::info!(
            "Building window with title: '{}' and size: {}x{} ({} bpp)",
            self.mode.title,
            self.mode.width,
            self.mode.height,
            self.mode.bits_per_pixel
        );
        let attributes = Window::default_attributes()
            .with_title(self.mode.title.clone())
            .with_inner_size(LogicalSize::new(self.mode.width, self.mode.height))
            .with_visible(true);

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                self.creation_error = Some(anyhow!("unable to create the window: {e}"));
                return;
            }
        };
        log::info!("Winit window created successfully (id: {:?}).", window.id());
        match Canvas::new(event_loop, &window) {
            Ok(canvas) => {
                self.canvas = Some(canvas);
                self.window = Some(window);
            }
            Err(e) => self.creation_error = Some(e),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|window| window.id()) != Some(id) {
            return;
        }
        if let Some(event) = translate_window_event(&event) {
            self.pending.push_back(event);
        }
    }
}

/// A desktop window surface.
///
/// Draw calls are recorded into a [`DisplayList`]; [`Surface::display`]
/// rasterises the finished list into the window and keeps it (see
/// [`WinitSurface::last_frame`]).
pub struct WinitSurface {
    event_loop: EventLoop<()>,
    host: WindowHost,
    view: Rect,
    frame: Vec<DrawCommand>,
    last_frame: DisplayList,
    needs_pump: bool,
    open: bool,
}

impl WinitSurface {
    /// Creates the event loop and opens a window matching `mode`.
    ///
    /// # Errors
    /// Fails if the event loop cannot be created (at most one may exist per
    /// process) or the window system refuses the window.
    pub fn open(mode: &VideoMode) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("unable to create the winit event loop")?;
        let mut surface = Self {
            event_loop,
            host: WindowHost {
                mode: mode.clone(),
                window: None,
                canvas: None,
                creation_error: None,
                pending: VecDeque::new(),
            },
            view: Extent2D::new(mode.width, mode.height).to_rect(),
            frame: Vec::new(),
            last_frame: DisplayList::default(),
            needs_pump: true,
            open: true,
        };

        surface.pump();
        if let Some(e) = surface.host.creation_error.take() {
            return Err(e);
        }
        if surface.host.window.is_none() {
            return Err(anyhow!("the event loop did not resume; no window was created"));
        }
        surface.view = surface.size().to_rect();
        Ok(surface)
    }

    /// The display list handed over by the most recent [`Surface::display`].
    pub fn last_frame(&self) -> &DisplayList {
        &self.last_frame
    }

    fn pump(&mut self) {
        self.needs_pump = false;
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.host);
        if let PumpStatus::Exit(code) = status {
            log::info!("winit event loop exited with code {code}");
            self.open = false;
        }
    }
}

impl Surface for WinitSurface {
    fn is_open(&self) -> bool {
        self.open && self.host.window.is_some()
    }

    fn size(&self) -> Extent2D {
        self.host
            .window
            .as_ref()
            .map(|window| {
                let size = window.inner_size();
                Extent2D::new(size.width, size.height)
            })
            .unwrap_or_default()
    }

    fn default_view(&self) -> Rect {
        self.view
    }

    fn set_default_view(&mut self, view: Rect) {
        self.view = view;
    }

    fn poll_event(&mut self) -> Option<Event> {
        if self.needs_pump && self.open {
            self.pump();
        }
        self.host.pending.pop_front()
    }

    fn draw_rect(&mut self, rect: Rect, color: LinearRgba) {
        self.frame.push(DrawCommand::Rect { rect, color });
    }

    fn draw_text(&mut self, text: &str, origin: Vec2, size: f32, color: LinearRgba) {
        self.frame.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            size,
            color,
        });
    }

    fn display(&mut self) {
        self.last_frame = DisplayList {
            view: self.view,
            commands: mem::take(&mut self.frame),
        };
        log::trace!(
            "presenting {} draw commands",
            self.last_frame.commands.len()
        );
        if let (Some(window), Some(canvas)) = (&self.host.window, self.host.canvas.as_mut()) {
            canvas.present(window, &self.last_frame);
        }
        self.needs_pump = true;
    }

    fn close(&mut self) {
        self.host.canvas = None;
        if self.host.window.take().is_some() {
            log::info!("window closed");
        }
        self.host.pending.clear();
        self.open = false;
    }
}

/// Creates [`WinitSurface`]s.
#[derive(Debug, Default)]
pub struct WinitBackend;

impl WinitBackend {
    /// Creates a new backend.
    pub fn new() -> Self {
        Self
    }
}

impl SurfaceBackend for WinitBackend {
    fn create(&mut self, mode: &VideoMode) -> anyhow::Result<Box<dyn Surface>> {
        Ok(Box::new(WinitSurface::open(mode)?))
    }
}
