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

//! A windowless surface that replays scripted input and records output.
//!
//! Each scripted frame is a batch of events delivered between two calls to
//! [`Surface::display`]. Everything the application does to the surface is
//! written to a shared [`HeadlessRecord`] that outlives the surface, so a test
//! can inspect it after the application has finished.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;
use std::rc::Rc;

use skyline_core::math::{Extent2D, LinearRgba, Rect, Vec2};
use skyline_core::platform::{DisplayList, DrawCommand, Surface, SurfaceBackend, VideoMode};
use skyline_core::Event;

/// The input side of a headless run: one batch of events per frame.
#[derive(Debug, Clone)]
pub struct HeadlessScript {
    frames: VecDeque<Vec<Event>>,
    close_when_exhausted: bool,
}

impl HeadlessScript {
    /// An empty script; the surface closes after its first presented frame.
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
            close_when_exhausted: true,
        }
    }

    /// Appends a frame delivering `events`.
    pub fn frame(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.frames.push_back(events.into_iter().collect());
        self
    }

    /// Appends `count` frames without input.
    pub fn idle_frames(mut self, count: usize) -> Self {
        self.frames
            .extend(std::iter::repeat_with(Vec::new).take(count));
        self
    }

    /// Keeps the surface open once the script runs out; further frames are
    /// empty.
    pub fn keep_open(mut self) -> Self {
        self.close_when_exhausted = false;
        self
    }

    /// Number of frames still to be delivered.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is left.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for HeadlessScript {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything observed by headless surfaces created from one backend.
#[derive(Debug, Default)]
pub struct HeadlessRecord {
    /// Video modes requested from the backend, in order.
    pub created: Vec<VideoMode>,
    /// Every presented frame.
    pub presented: Vec<DisplayList>,
    /// Every viewport set through [`Surface::set_default_view`].
    pub views: Vec<Rect>,
    /// Whether [`Surface::close`] was called.
    pub closed_by_application: bool,
}

/// A scripted, recording [`Surface`].
pub struct HeadlessSurface {
    size: Extent2D,
    view: Rect,
    open: bool,
    pending: VecDeque<Event>,
    script: HeadlessScript,
    frame: Vec<DrawCommand>,
    record: Rc<RefCell<HeadlessRecord>>,
}

impl HeadlessSurface {
    /// Creates an open surface of `size` that will replay `script`.
    pub fn new(size: Extent2D, script: HeadlessScript, record: Rc<RefCell<HeadlessRecord>>) -> Self {
        let mut surface = Self {
            size,
            view: size.to_rect(),
            open: true,
            pending: VecDeque::new(),
            script,
            frame: Vec::new(),
            record,
        };
        surface.load_next_frame();
        surface
    }

    fn load_next_frame(&mut self) {
        match self.script.frames.pop_front() {
            Some(events) => self.pending.extend(events),
            None if self.script.close_when_exhausted => {
                log::debug!("headless script exhausted; closing surface");
                self.open = false;
            }
            None => {}
        }
    }
}

impl Surface for HeadlessSurface {
    fn is_open(&self) -> bool {
        self.open
    }

    fn size(&self) -> Extent2D {
        self.size
    }

    fn default_view(&self) -> Rect {
        self.view
    }

    fn set_default_view(&mut self, view: Rect) {
        self.view = view;
        self.record.borrow_mut().views.push(view);
    }

    fn poll_event(&mut self) -> Option<Event> {
        let event = self.pending.pop_front()?;
        if let Event::Resized { width, height } = event {
            self.size = Extent2D::new(width, height);
        }
        Some(event)
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
        let list = DisplayList {
            view: self.view,
            commands: mem::take(&mut self.frame),
        };
        self.record.borrow_mut().presented.push(list);
        self.load_next_frame();
    }

    fn close(&mut self) {
        self.open = false;
        self.pending.clear();
        self.record.borrow_mut().closed_by_application = true;
    }
}

/// Creates [`HeadlessSurface`]s sharing one [`HeadlessRecord`].
pub struct HeadlessBackend {
    script: Option<HeadlessScript>,
    failure: Option<String>,
    record: Rc<RefCell<HeadlessRecord>>,
}

impl HeadlessBackend {
    /// A backend whose first surface replays `script`; later surfaces get an
    /// empty script.
    pub fn new(script: HeadlessScript) -> Self {
        Self {
            script: Some(script),
            failure: None,
            record: Rc::default(),
        }
    }

    /// A backend that refuses to create surfaces, failing with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: None,
            failure: Some(message.into()),
            record: Rc::default(),
        }
    }

    /// The shared record of every surface created by this backend.
    pub fn record(&self) -> Rc<RefCell<HeadlessRecord>> {
        Rc::clone(&self.record)
    }
}

impl SurfaceBackend for HeadlessBackend {
    fn create(&mut self, mode: &VideoMode) -> anyhow::Result<Box<dyn Surface>> {
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        self.record.borrow_mut().created.push(mode.clone());
        let script = self.script.take().unwrap_or_default();
        Ok(Box::new(HeadlessSurface::new(
            Extent2D::new(mode.width, mode.height),
            script,
            Rc::clone(&self.record),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_core::Key;

    fn mode() -> VideoMode {
        VideoMode {
            width: 320,
            height: 200,
            bits_per_pixel: 32,
            title: "headless".to_string(),
        }
    }

    #[test]
    fn events_are_delivered_per_frame() {
        let script = HeadlessScript::new()
            .frame([Event::KeyPressed { key: Key::Space }])
            .idle_frames(1)
            .frame([Event::Closed]);
        let mut backend = HeadlessBackend::new(script);
        let mut surface = backend.create(&mode()).expect("headless creation succeeds");

        assert_eq!(
            surface.poll_event(),
            Some(Event::KeyPressed { key: Key::Space })
        );
        assert_eq!(surface.poll_event(), None);
        surface.display();
        assert_eq!(surface.poll_event(), None, "second frame is idle");
        surface.display();
        assert_eq!(surface.poll_event(), Some(Event::Closed));
        assert!(surface.is_open());
        surface.display();
        assert!(!surface.is_open(), "exhausted script closes the surface");
        assert_eq!(backend.record().borrow().presented.len(), 3);
    }

    #[test]
    fn keep_open_survives_exhaustion() {
        let mut backend = HeadlessBackend::new(HeadlessScript::new().keep_open());
        let mut surface = backend.create(&mode()).expect("headless creation succeeds");
        for _ in 0..3 {
            surface.display();
        }
        assert!(surface.is_open());
    }

    #[test]
    fn resize_updates_size_and_draws_are_recorded() {
        let script = HeadlessScript::new().frame([Event::Resized {
            width: 640,
            height: 480,
        }]);
        let mut backend = HeadlessBackend::new(script);
        let record = backend.record();
        let mut surface = backend.create(&mode()).expect("headless creation succeeds");
        assert_eq!(surface.size(), Extent2D::new(320, 200));

        surface.poll_event();
        assert_eq!(surface.size(), Extent2D::new(640, 480));

        surface.set_default_view(Rect::new(0.0, 0.0, 640.0, 480.0));
        surface.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), LinearRgba::BLACK);
        surface.draw_text("hello", Vec2::ZERO, 16.0, LinearRgba::WHITE);
        surface.display();

        let record = record.borrow();
        assert_eq!(record.created, vec![mode()]);
        assert_eq!(record.views, vec![Rect::new(0.0, 0.0, 640.0, 480.0)]);
        assert_eq!(record.presented[0].commands.len(), 2);
        assert!(record.presented[0].contains_text("hello"));
    }

    #[test]
    fn failing_backend_reports_error() {
        let mut backend = HeadlessBackend::failing("no display");
        let err = backend.create(&mode()).err().expect("creation must fail");
        assert_eq!(err.to_string(), "no display");
        assert!(backend.record().borrow().created.is_empty());
    }
}
