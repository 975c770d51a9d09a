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

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard, PoisonError};

use skyline_core::math::{LinearRgba, Rect};
use skyline_core::platform::{DrawCommand, ResourceArchive, Surface};
use skyline_core::{Event, Key, Responder, State};
use skyline_infra::{HeadlessBackend, HeadlessScript};
use skyline_sdk::{AppConfig, AppHandle, AppPaths, Application, LaunchArgs};
use tempfile::TempDir;

/// Only one application may be alive per process; tests take turns.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

type Journal = Rc<RefCell<Vec<String>>>;

/// What a probe does when it is advanced.
enum Action {
    Push(Box<Probe>),
    Pop,
    Exit(i32),
}

struct Probe {
    label: &'static str,
    journal: Journal,
    handle: AppHandle,
    consume_close: bool,
    consume_keys: bool,
    actions: VecDeque<Action>,
    steps: Rc<RefCell<Vec<f64>>>,
}

impl Probe {
    fn new(label: &'static str, journal: &Journal, handle: AppHandle) -> Self {
        Self {
            label,
            journal: Rc::clone(journal),
            handle,
            consume_close: false,
            consume_keys: false,
            actions: VecDeque::new(),
            steps: Rc::default(),
        }
    }

    fn then(mut self, action: Action) -> Self {
        self.actions.push_back(action);
        self
    }

    fn log(&self, entry: impl Into<String>) {
        self.journal.borrow_mut().push(entry.into());
    }
}

impl Responder for Probe {
    fn handle_event(&mut self, event: &Event) -> bool {
        self.log(format!("event {} {}", self.label, event.kind()));
        match event {
            Event::Closed => self.consume_close,
            Event::KeyPressed { .. } => self.consume_keys,
            _ => false,
        }
    }
}

impl State for Probe {
    fn name(&self) -> &str {
        self.label
    }

    fn activate(&mut self) {
        self.log(format!("activate {}", self.label));
    }

    fn deactivate(&mut self) {
        self.log(format!("deactivate {}", self.label));
    }

    fn advance(&mut self, dt: f64, surface: &mut dyn Surface) {
        self.log(format!("advance {}", self.label));
        self.steps.borrow_mut().push(dt);
        surface.draw_rect(Rect::new(0.0, 0.0, 100.0, 100.0), LinearRgba::rgb(0.2, 0.4, 0.8));
        match self.actions.pop_front() {
            Some(Action::Push(next)) => self.handle.push_state(next),
            Some(Action::Pop) => self.handle.pop_state(),
            Some(Action::Exit(code)) => self.handle.exit(code),
            None => {}
        }
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.log(format!("drop {}", self.label));
    }
}

/// An application rooted in a scratch directory so probes never touch the
/// real installation.
fn application(backend: HeadlessBackend) -> (Application, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("skyline");
    let args = LaunchArgs::parse([exe.to_string_lossy().into_owned()]).unwrap();
    let paths = AppPaths::with_dirs(&exe, &dir.path().join("data"), &dir.path().join("prefs"));
    let app = Application::new(args, AppConfig::default(), Box::new(backend)).with_paths(paths);
    (app, dir)
}

fn journal() -> Journal {
    Rc::default()
}

#[test]
fn test_push_and_pop_through_the_loop() {
    let _serial = serial();
    let backend = HeadlessBackend::new(HeadlessScript::new().keep_open());
    let (mut app, _dir) = application(backend);
    let journal = journal();
    let handle = app.handle();

    let b = Probe::new("B", &journal, handle.clone()).then(Action::Pop);
    let a = Probe::new("A", &journal, handle.clone())
        .then(Action::Push(Box::new(b)))
        .then(Action::Pop);
    handle.push_state(Box::new(a));

    let code = app.run();

    assert_eq!(code, 1, "an empty stack is a normal termination");
    assert!(app.states().is_empty());
    assert_eq!(
        *journal.borrow(),
        [
            "activate A",
            "advance A",
            "deactivate A",
            "activate B",
            "advance B",
            "deactivate B",
            "drop B",
            "activate A",
            "advance A",
            "deactivate A",
            "drop A",
        ]
    );
}

#[test]
fn test_unhandled_close_terminates_with_positive_code() {
    let _serial = serial();
    let backend = HeadlessBackend::new(HeadlessScript::new().frame([Event::Closed]).keep_open());
    let record = backend.record();
    let (mut app, _dir) = application(backend);
    let journal = journal();
    app.handle()
        .push_state(Box::new(Probe::new("A", &journal, app.handle())));

    let code = app.run();

    assert!(code > 0, "close fallback must request a normal exit, got {code}");
    assert!(journal.borrow().contains(&"event A closed".to_string()));
    assert_eq!(record.borrow().presented.len(), 1, "the frame is still presented");
    assert!(record.borrow().closed_by_application);
    assert_eq!(journal.borrow().last().map(String::as_str), Some("drop A"));
}

#[test]
fn test_consumed_close_keeps_running() {
    let _serial = serial();
    let script = HeadlessScript::new().frame([Event::Closed]).idle_frames(2);
    let backend = HeadlessBackend::new(script);
    let record = backend.record();
    let (mut app, _dir) = application(backend);
    let journal = journal();
    let mut probe = Probe::new("A", &journal, app.handle());
    probe.consume_close = true;
    app.handle().push_state(Box::new(probe));

    let code = app.run();

    assert_eq!(code, 1);
    assert_eq!(
        record.borrow().presented.len(),
        3,
        "the loop ran until the surface closed, not on the close event"
    );
}

#[test]
fn test_escape_overrides_state_handling() {
    let _serial = serial();
    let script = HeadlessScript::new()
        .frame([Event::KeyPressed { key: Key::Escape }])
        .keep_open();
    let (mut app, _dir) = application(HeadlessBackend::new(script));
    let journal = journal();
    let mut probe = Probe::new("A", &journal, app.handle());
    probe.consume_keys = true;
    app.handle().push_state(Box::new(probe));

    assert_eq!(app.run(), 1);
    assert!(
        !journal.borrow().iter().any(|entry| entry.starts_with("event")),
        "the cancel key never reaches the state"
    );
}

#[test]
fn test_resize_updates_view_before_state_sees_it() {
    let _serial = serial();
    let script = HeadlessScript::new().frame([Event::Resized {
        width: 800,
        height: 600,
    }]);
    let backend = HeadlessBackend::new(script);
    let record = backend.record();
    let (mut app, _dir) = application(backend);
    let journal = journal();
    app.handle()
        .push_state(Box::new(Probe::new("A", &journal, app.handle())));

    app.run();

    let record = record.borrow();
    assert_eq!(record.views, [Rect::new(0.0, 0.0, 800.0, 600.0)]);
    assert_eq!(record.presented[0].view, Rect::new(0.0, 0.0, 800.0, 600.0));
    assert!(journal.borrow().contains(&"event A resized".to_string()));
}

#[test]
fn test_overlay_is_drawn_over_the_state() {
    let _serial = serial();
    let backend = HeadlessBackend::new(HeadlessScript::new().idle_frames(1));
    let record = backend.record();
    let (mut app, _dir) = application(backend);
    let journal = journal();
    app.handle()
        .push_state(Box::new(Probe::new("A", &journal, app.handle())));

    app.run();

    let record = record.borrow();
    let commands = &record.presented[0].commands;
    assert_eq!(commands.len(), 3, "state rect, overlay box, overlay text");
    assert!(matches!(
        &commands[1],
        DrawCommand::Rect { rect, color } if rect.x == 0.0 && rect.y == 0.0 && *color == LinearRgba::BLACK
    ));
    assert!(matches!(
        &commands[2],
        DrawCommand::Text { text, color, .. } if text == "<not available>" && *color == LinearRgba::WHITE
    ));
}

#[test]
fn test_overlay_shows_the_published_rate() {
    let _serial = serial();
    let backend = HeadlessBackend::new(HeadlessScript::new().idle_frames(3));
    let record = backend.record();
    let (app, _dir) = application(backend);
    let mut app = app.with_frame_time(0.2);
    let journal = journal();
    let probe = Probe::new("A", &journal, app.handle());
    let steps = Rc::clone(&probe.steps);
    app.handle().push_state(Box::new(probe));

    app.run();

    // The refresh timer passes 0.5s on the third frame.
    let record = record.borrow();
    assert_eq!(record.presented.len(), 3);
    assert!(record.presented[0].contains_text("<not available>"));
    assert!(record.presented[1].contains_text("<not available>"));
    assert!(record.presented[2].contains_text("5 Hz [5..5]"));
    assert_eq!(app.overlay().text(), "5 Hz [5..5]");
    assert_eq!(*steps.borrow(), vec![0.2, 0.2, 0.2]);
}

#[test]
fn test_simulation_step_has_a_floor() {
    let _serial = serial();
    let backend = HeadlessBackend::new(HeadlessScript::new().idle_frames(5));
    let (mut app, _dir) = application(backend);
    let journal = journal();
    let probe = Probe::new("A", &journal, app.handle());
    let steps = Rc::clone(&probe.steps);
    app.handle().push_state(Box::new(probe));

    app.run();

    let steps = steps.borrow();
    assert_eq!(steps.len(), 5);
    assert!(steps.iter().all(|dt| *dt >= 0.1), "steps: {steps:?}");
}

#[test]
fn test_exit_request_sets_exit_code() {
    let _serial = serial();
    let backend = HeadlessBackend::new(HeadlessScript::new().keep_open());
    let (mut app, _dir) = application(backend);
    let journal = journal();
    let probe = Probe::new("A", &journal, app.handle())
        .then(Action::Exit(0))
        .then(Action::Exit(-3));
    app.handle().push_state(Box::new(probe));

    assert_eq!(app.run(), -3, "exit(0) is ignored, exit(-3) terminates");
    assert!(!app.is_running());
    assert_eq!(
        journal.borrow().iter().filter(|e| e.starts_with("advance")).count(),
        2
    );
    assert!(app.states().is_empty(), "cleanup pops remaining states");
}

#[test]
fn test_empty_stack_terminates_immediately() {
    let _serial = serial();
    let backend = HeadlessBackend::new(HeadlessScript::new().keep_open());
    let record = backend.record();
    let (mut app, _dir) = application(backend);

    assert_eq!(app.run(), 1);
    assert!(record.borrow().presented.is_empty());
}

#[test]
fn test_surface_failure_is_an_error_exit() {
    let _serial = serial();
    let (mut app, _dir) = application(HeadlessBackend::failing("no display"));
    let journal = journal();
    app.handle()
        .push_state(Box::new(Probe::new("A", &journal, app.handle())));

    assert_eq!(app.run(), -1);
    assert!(
        !journal.borrow().contains(&"activate A".to_string()),
        "queued states are not started without a surface"
    );
}

#[test]
#[should_panic(expected = "Application initialized multiple times")]
fn test_second_application_panics() {
    let _serial = serial();
    let (_first, _dir) = application(HeadlessBackend::new(HeadlessScript::new()));
    let _second = application(HeadlessBackend::new(HeadlessScript::new()));
}

#[test]
fn test_applications_may_run_one_after_another() {
    let _serial = serial();
    for _ in 0..2 {
        let (mut app, _dir) = application(HeadlessBackend::new(HeadlessScript::new()));
        assert_eq!(app.run(), 1);
    }
}

/// Loads any file that exists and records every probe.
struct FakeArchive {
    probes: Rc<RefCell<Vec<PathBuf>>>,
    dumped_to: Rc<RefCell<Option<PathBuf>>>,
    loaded: bool,
}

impl ResourceArchive for FakeArchive {
    fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        self.probes.borrow_mut().push(path.to_path_buf());
        anyhow::ensure!(path.exists(), "{} does not exist", path.display());
        self.loaded = true;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn dump(&self, output_dir: &Path) -> anyhow::Result<usize> {
        *self.dumped_to.borrow_mut() = Some(output_dir.to_path_buf());
        Ok(3)
    }
}

#[test]
fn test_legacy_executable_is_probed_in_order() {
    let _serial = serial();
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("bin").join("skyline");
    let prefs = dir.path().join("prefs");
    fs::create_dir_all(&prefs).unwrap();
    fs::write(prefs.join("SIMTOWER.EXE"), b"MZ").unwrap();

    let probes: Rc<RefCell<Vec<PathBuf>>> = Rc::default();
    let dumped_to: Rc<RefCell<Option<PathBuf>>> = Rc::default();
    let archive = FakeArchive {
        probes: Rc::clone(&probes),
        dumped_to: Rc::clone(&dumped_to),
        loaded: false,
    };
    let args = LaunchArgs::parse([
        exe.to_string_lossy().into_owned(),
        "--dump-resources".to_string(),
        dir.path().join("dump").to_string_lossy().into_owned(),
    ])
    .unwrap();
    let paths = AppPaths::with_dirs(&exe, &dir.path().join("data"), &prefs);
    let mut app = Application::new(
        args,
        AppConfig::default(),
        Box::new(HeadlessBackend::new(HeadlessScript::new())),
    )
    .with_paths(paths)
    .with_archive(Box::new(archive));

    app.run();

    let probes = probes.borrow();
    assert_eq!(probes.first(), Some(&dir.path().join("data").join("SIMTOWER.EXE")));
    assert_eq!(probes.get(1), Some(&dir.path().join("bin").join("SIMTOWER.EXE")));
    assert_eq!(probes.last(), Some(&prefs.join("SIMTOWER.EXE")));
    assert!(app.archive().is_loaded());
    assert_eq!(*dumped_to.borrow(), Some(dir.path().join("dump")));
}

#[test]
fn test_missing_legacy_executable_is_not_fatal() {
    let _serial = serial();
    let probes: Rc<RefCell<Vec<PathBuf>>> = Rc::default();
    let archive = FakeArchive {
        probes: Rc::clone(&probes),
        dumped_to: Rc::default(),
        loaded: false,
    };
    let (app, _dir) = application(HeadlessBackend::new(HeadlessScript::new()));
    let mut app = app.with_archive(Box::new(archive));

    assert_eq!(app.run(), 1);
    assert!(!app.archive().is_loaded());
    assert_eq!(probes.borrow().len(), 4, "every candidate was tried");
}
