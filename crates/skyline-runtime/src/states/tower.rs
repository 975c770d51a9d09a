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

//! The main tower view.
//!
//! Runs a day clock, draws the sky and the floors, and hosts the
//! [`Toolbar`] as its next responder. Space or `p` pushes the pause dialog.
//! A close request is left unhandled so the application's default applies.

use skyline_sdk::prelude::*;

use super::pause::PauseState;
use super::toolbar::Toolbar;

/// Simulated minutes per real second at speed x1.
const GAME_MINUTES_PER_SECOND: f64 = 10.0;
const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const OPENING_TIME: f64 = 7.0 * 60.0;

const FLOOR_COUNT: u32 = 12;
const FLOOR_HEIGHT: f32 = 36.0;
const FLOOR_GAP: f32 = 4.0;

const NIGHT_SKY: LinearRgba = LinearRgba::rgb(0.02, 0.03, 0.10);
const DAY_SKY: LinearRgba = LinearRgba::rgb(0.45, 0.70, 0.95);
const LOBBY: LinearRgba = LinearRgba::rgb(0.55, 0.45, 0.35);
const FLOOR: LinearRgba = LinearRgba::rgb(0.75, 0.75, 0.70);
const LIT_FLOOR: LinearRgba = LinearRgba::rgb(0.95, 0.85, 0.45);

pub struct TowerState {
    handle: AppHandle,
    toolbar: Toolbar,
    day: u32,
    minutes: f64,
    /// Set once the pause dialog is queued, cleared when the tower is active
    /// again.
    pause_requested: bool,
}

impl TowerState {
    pub fn new(handle: AppHandle) -> Self {
        Self {
            handle,
            toolbar: Toolbar::new(),
            day: 1,
            minutes: OPENING_TIME,
            pause_requested: false,
        }
    }

    /// `(day, hour, minute)` of the simulated clock.
    pub fn clock(&self) -> (u32, u32, u32) {
        let total = self.minutes as u32;
        (self.day, total / 60, total % 60)
    }

    pub fn caption(&self) -> String {
        let (day, hour, minute) = self.clock();
        format!("Day {day} {hour:02}:{minute:02}  x{}", self.toolbar.speed())
    }

    fn tick(&mut self, dt: f64) {
        self.minutes += dt * GAME_MINUTES_PER_SECOND * f64::from(self.toolbar.speed());
        while self.minutes >= MINUTES_PER_DAY {
            self.minutes -= MINUTES_PER_DAY;
            self.day += 1;
            log::info!("day {} begins", self.day);
        }
    }

    /// 1 at noon, 0 from 19:00 to 05:00.
    fn daylight(&self) -> f32 {
        let hours = (self.minutes / 60.0) as f32;
        (1.0 - (hours - 12.0).abs() / 7.0).clamp(0.0, 1.0)
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let view = surface.default_view();
        let daylight = self.daylight();
        surface.draw_rect(view, NIGHT_SKY.lerp(DAY_SKY, daylight));

        self.toolbar.layout(view);
        let ground = self.toolbar.bounds().y;
        let width = view.width * 0.4;
        let left = view.x + (view.width - width) / 2.0;
        for floor in 0..FLOOR_COUNT {
            let top = ground - (floor + 1) as f32 * FLOOR_HEIGHT;
            let color = match floor {
                0 => LOBBY,
                _ if daylight < 0.3 => LIT_FLOOR,
                _ => FLOOR,
            };
            surface.draw_rect(Rect::new(left, top, width, FLOOR_HEIGHT - FLOOR_GAP), color);
        }

        let caption = self.caption();
        self.toolbar.draw(surface, &caption);
    }
}

impl Responder for TowerState {
    fn handle_event(&mut self, event: &Event) -> bool {
        if event.is_key_press(Key::Space) || event.is_key_press(Key::Character('p')) {
            if !self.pause_requested {
                self.pause_requested = true;
                self.handle
                    .push_state(Box::new(PauseState::new(self.handle.clone())));
            }
            return true;
        }
        false
    }

    fn send_event_to_next_responders(&mut self, event: &Event) -> bool {
        forward_to_first(event, [&mut self.toolbar as &mut dyn Responder])
    }
}

impl State for TowerState {
    fn name(&self) -> &str {
        "TowerState"
    }

    fn activate(&mut self) {
        self.pause_requested = false;
        let (day, hour, minute) = self.clock();
        log::debug!("tower active at day {day} {hour:02}:{minute:02}");
    }

    fn deactivate(&mut self) {
        log::debug!("tower suspended");
    }

    fn advance(&mut self, dt: f64, surface: &mut dyn Surface) {
        self.tick(dt);
        self.draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_core::platform::DrawCommand;
    use skyline_infra::{HeadlessBackend, HeadlessRecord, HeadlessScript, HeadlessSurface};
    use skyline_sdk::{AppCommand, AppConfig, AppPaths, LaunchArgs, EXIT_NORMAL};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tower() -> (TowerState, flume::Receiver<AppCommand>) {
        let (sender, receiver) = flume::unbounded();
        (TowerState::new(AppHandle::new(sender)), receiver)
    }

    #[test]
    fn clock_advances_and_rolls_over() {
        let (mut tower, _commands) = tower();
        assert_eq!(tower.clock(), (1, 7, 0));

        // 6 real seconds at x1 is one simulated hour.
        tower.tick(6.0);
        assert_eq!(tower.clock(), (1, 8, 0));

        tower.tick(16.0 * 6.0);
        assert_eq!(tower.clock(), (2, 0, 0));
        approx::assert_abs_diff_eq!(tower.minutes, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn speed_keys_reach_the_toolbar() {
        let (mut tower, commands) = tower();
        assert!(tower.send_event(&Event::KeyPressed { key: Key::Up }));
        assert!(tower.caption().ends_with("x2"));
        assert!(commands.is_empty());

        tower.tick(3.0);
        assert_eq!(tower.clock(), (1, 8, 0), "x2 doubles the clock rate");
    }

    #[test]
    fn space_requests_the_pause_dialog() {
        let (mut tower, commands) = tower();
        assert!(tower.send_event(&Event::KeyPressed { key: Key::Space }));
        let queued: Vec<_> = commands.try_iter().collect();
        assert!(matches!(
            queued.as_slice(),
            [AppCommand::PushState(state)] if state.name() == "PauseState"
        ));
    }

    #[test]
    fn one_pause_dialog_per_frame() {
        let (mut tower, commands) = tower();
        assert!(tower.send_event(&Event::KeyPressed { key: Key::Space }));
        assert!(tower.send_event(&Event::KeyPressed {
            key: Key::Character('p')
        }));
        assert_eq!(commands.try_iter().count(), 1);

        // Back on top after the dialog closed.
        tower.deactivate();
        tower.activate();
        assert!(tower.send_event(&Event::KeyPressed { key: Key::Space }));
        assert_eq!(commands.try_iter().count(), 1);
    }

    #[test]
    fn resume_keys_in_one_frame_return_to_the_tower() {
        let backend = HeadlessBackend::new(
            HeadlessScript::new()
                .frame([Event::KeyPressed { key: Key::Space }])
                .frame([
                    Event::KeyPressed { key: Key::Space },
                    Event::KeyPressed { key: Key::Enter },
                    Event::KeyPressed {
                        key: Key::Character('p'),
                    },
                ])
                .idle_frames(1),
        );
        let record = backend.record();

        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("skyline");
        let args = LaunchArgs::parse([exe.to_string_lossy().into_owned()]).unwrap();
        let paths = AppPaths::with_dirs(&exe, &dir.path().join("data"), &dir.path().join("prefs"));
        let mut app = Application::new(args, AppConfig::default(), Box::new(backend)).with_paths(paths);
        let handle = app.handle();
        handle.push_state(Box::new(TowerState::new(handle.clone())));

        assert_eq!(app.run(), EXIT_NORMAL);

        let record = record.borrow();
        assert_eq!(record.presented.len(), 3);
        assert!(record.presented[1].contains_text("PAUSED"));
        let last = &record.presented[2];
        assert!(last.commands.iter().any(
            |command| matches!(command, DrawCommand::Text { text, .. } if text.starts_with("Day 1 "))
        ));
        assert!(!last.contains_text("PAUSED"));
    }

    #[test]
    fn close_is_left_to_the_application() {
        let (mut tower, commands) = tower();
        assert!(!tower.send_event(&Event::Closed));
        assert!(commands.is_empty());
    }

    #[test]
    fn advance_draws_sky_floors_and_toolbar() {
        let (mut tower, _commands) = tower();
        let record = Rc::new(RefCell::new(HeadlessRecord::default()));
        let mut surface = HeadlessSurface::new(
            Extent2D::new(640, 480),
            HeadlessScript::new().keep_open(),
            Rc::clone(&record),
        );

        tower.advance(0.1, &mut surface);
        surface.display();

        let record = record.borrow();
        let frame = &record.presented[0];
        assert_eq!(frame.commands.len(), 1 + FLOOR_COUNT as usize + 2);
        assert!(matches!(
            &frame.commands[0],
            DrawCommand::Rect { rect, .. } if *rect == Rect::new(0.0, 0.0, 640.0, 480.0)
        ));
        assert!(frame.contains_text("Day 1 07:01  x1"));
        assert_eq!(tower.toolbar.bounds(), Rect::new(0.0, 452.0, 640.0, 28.0));
    }
}
