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

//! The process-wide application: owns the surface, the state stack and the
//! main loop.
//!
//! [`Application::run`] drives `init → loop → cleanup`:
//!
//! - `init` probes for the legacy executable, loads the overlay font, opens
//!   the surface and applies the commands queued before `run` (usually the
//!   initial state);
//! - each loop iteration paces the frame, dispatches polled events, advances
//!   the top state, draws the rate overlay, presents, and finally applies the
//!   commands queued during the iteration;
//! - `cleanup` pops every state and closes the surface.
//!
//! The exit code is `0` while running. Positive codes mean a normal or
//! requested exit, negative ones an abnormal one. `run` never returns `0`.

mod handle;
mod instance;

pub use self::handle::{AppCommand, AppHandle};

use skyline_core::event::CommandQueue;
use skyline_core::math::Extent2D;
use skyline_core::platform::{ResourceArchive, Surface, SurfaceBackend};
use skyline_core::{Event, FramePacer, Key, Responder, State, StateStack};
use skyline_infra::{MonoFont, NeExecutable};

use self::instance::InstanceGuard;
use crate::config::{AppConfig, LaunchArgs};
use crate::overlay::RateOverlay;
use crate::paths::AppPaths;

/// Exit code of an application whose surface could not be created.
pub const EXIT_INIT_FAILED: i32 = -1;
/// Exit code of a normal termination (closed window, cancel key, no state
/// left).
pub const EXIT_NORMAL: i32 = 1;

/// The Skyline application.
///
/// At most one may exist at a time.
pub struct Application {
    args: LaunchArgs,
    config: AppConfig,
    paths: AppPaths,
    backend: Box<dyn SurfaceBackend>,
    archive: Box<dyn ResourceArchive>,
    surface: Option<Box<dyn Surface>>,
    states: StateStack,
    commands: CommandQueue<AppCommand>,
    overlay: RateOverlay,
    frame_time: Option<f64>,
    running: bool,
    exit_code: i32,
    // Dropped last so the slot is only released once everything is gone.
    _instance: InstanceGuard,
}

impl Application {
    /// Creates the application. Nothing is opened until [`Application::run`].
    ///
    /// # Panics
    /// Panics if another `Application` is alive.
    pub fn new(args: LaunchArgs, config: AppConfig, backend: Box<dyn SurfaceBackend>) -> Self {
        let instance = InstanceGuard::acquire();
        let paths = AppPaths::from_executable(&args.executable);
        log::debug!(
            "constructed\n    path     = {}\n    dataDir  = {}\n    prefsDir = {}",
            paths.executable.display(),
            paths.data_dir.display(),
            paths.prefs_dir.display()
        );
        log::info!("ready");

        Self {
            overlay: RateOverlay::new(config.font.size),
            args,
            config,
            paths,
            backend,
            archive: Box::new(NeExecutable::new()),
            surface: None,
            states: StateStack::new(),
            commands: CommandQueue::new(),
            frame_time: None,
            running: false,
            exit_code: 0,
            _instance: instance,
        }
    }

    /// Replaces the directories derived from `argv[0]`.
    pub fn with_paths(mut self, paths: AppPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Replaces the legacy resource reader.
    pub fn with_archive(mut self, archive: Box<dyn ResourceArchive>) -> Self {
        self.archive = archive;
        self
    }

    /// Paces every frame as if it lasted `seconds`, instead of sampling the
    /// wall clock. Used for deterministic headless runs.
    pub fn with_frame_time(mut self, seconds: f64) -> Self {
        self.frame_time = Some(seconds);
        self
    }

    /// A handle for queueing state transitions and exit requests.
    pub fn handle(&self) -> AppHandle {
        AppHandle::new(self.commands.sender())
    }

    /// The launch arguments.
    pub fn args(&self) -> &LaunchArgs {
        &self.args
    }

    /// The configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The installation and preference directories.
    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// The legacy resource reader.
    pub fn archive(&self) -> &dyn ResourceArchive {
        self.archive.as_ref()
    }

    /// The state stack.
    pub fn states(&self) -> &StateStack {
        &self.states
    }

    /// The rate overlay.
    pub fn overlay(&self) -> &RateOverlay {
        &self.overlay
    }

    /// The current exit code; `0` while the application should keep running.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns `true` while [`Application::run`] is executing.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pushes `state` over the current top and activates it.
    ///
    /// Must not be called from inside a state; states use their
    /// [`AppHandle`].
    pub fn push_state(&mut self, state: Box<dyn State>) {
        self.states.push(state);
    }

    /// Deactivates and destroys the top state, reactivating the one below.
    ///
    /// # Panics
    /// Panics if the stack is empty.
    pub fn pop_state(&mut self) {
        self.states.pop();
    }

    /// Runs the application to completion and returns its exit code.
    pub fn run(&mut self) -> i32 {
        self.running = true;
        self.exit_code = 0;

        self.init();
        if self.exit_code == 0 {
            self.run_loop();
        }
        self.cleanup();

        self.running = false;
        if self.exit_code < 0 {
            log::error!("exitCode = {}", self.exit_code);
        } else {
            log::info!("exitCode = {}", self.exit_code);
        }
        self.exit_code
    }

    fn init(&mut self) {
        self.load_legacy_resources();
        self.load_font();

        let mode = self.config.video_mode();
        match self.backend.create(&mode) {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                log::error!("unable to create the window: {e:#}");
                self.exit_code = EXIT_INIT_FAILED;
                return;
            }
        }

        self.apply_commands();
        if self.states.is_empty() {
            log::warn!("no initial state was queued");
        }
    }

    fn load_legacy_resources(&mut self) {
        let name = self.config.legacy_executable.as_str();
        let archive = &mut self.archive;
        let loaded = self.paths.candidates(name).into_iter().find(|candidate| {
            match archive.load(candidate) {
                Ok(()) => true,
                Err(e) => {
                    log::debug!("{}: {e:#}", candidate.display());
                    false
                }
            }
        });

        let Some(path) = loaded else {
            log::warn!("unable to load {name}");
            return;
        };
        log::info!("using legacy executable {}", path.display());

        if let Some(dir) = &self.args.dump_resources {
            match self.archive.dump(dir) {
                Ok(count) => log::info!("dumped {count} resources to {}", dir.display()),
                Err(e) => log::warn!("unable to dump resources to {}: {e:#}", dir.display()),
            }
        }
    }

    fn load_font(&mut self) {
        let path = self.paths.data_dir.join(&self.config.font.file);
        match MonoFont::load_from_file(&path, self.config.font.size) {
            Ok(font) => self.overlay = RateOverlay::with_font(&font),
            Err(e) => log::warn!("unable to load mono font: {e}"),
        }
    }

    fn should_continue(&self) -> bool {
        self.exit_code == 0
            && !self.states.is_empty()
            && self.surface.as_ref().is_some_and(|surface| surface.is_open())
    }

    fn run_loop(&mut self) {
        let mut pacer = FramePacer::new();
        while self.should_continue() {
            self.frame(&mut pacer);
            self.apply_commands();
        }

        if self.exit_code == 0 {
            if self.states.is_empty() {
                log::info!("state stack is empty");
            } else {
                log::info!("surface was closed");
            }
            self.exit_code = EXIT_NORMAL;
        }
    }

    /// One iteration of the main loop, up to and including presentation.
    fn frame(&mut self, pacer: &mut FramePacer) {
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };

        let step = match self.frame_time {
            Some(seconds) => pacer.advance_by(seconds),
            None => pacer.sample(),
        };
        if let Some(reading) = &step.reading {
            self.overlay.update(reading);
        }

        while let Some(event) = surface.poll_event() {
            if let Event::Resized { width, height } = event {
                log::info!("resized ({width}, {height})");
                surface.set_default_view(Extent2D::new(width, height).to_rect());
            }
            if event.is_key_press(Key::Escape) {
                self.exit_code = EXIT_NORMAL;
                continue;
            }
            if let Some(state) = self.states.top_mut() {
                if state.send_event(&event) {
                    continue;
                }
            }
            if event == Event::Closed {
                log::warn!("current state did not handle the close request");
                self.exit_code = EXIT_NORMAL;
            }
        }

        if let Some(state) = self.states.top_mut() {
            state.advance(step.dt, &mut *surface);
        }

        self.overlay.draw(&mut *surface);
        surface.display();
    }

    fn apply_commands(&mut self) {
        for command in self.commands.drain() {
            match command {
                AppCommand::PushState(state) => self.states.push(state),
                AppCommand::PopState => self.states.pop(),
                AppCommand::Exit(0) => log::warn!("exit requested with code 0; ignored"),
                AppCommand::Exit(code) => {
                    if self.exit_code == 0 {
                        self.exit_code = code;
                    }
                }
            }
        }
    }

    fn cleanup(&mut self) {
        let discarded = self.commands.drain().len();
        if discarded > 0 {
            log::debug!("discarding {discarded} queued commands");
        }
        self.states.clear();
        if let Some(mut surface) = self.surface.take() {
            surface.close();
        }
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("states", &self.states)
            .field("running", &self.running)
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}
