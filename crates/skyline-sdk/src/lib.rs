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

//! The public-facing SDK for Skyline applications.
//!
//! This crate ties the contracts of `skyline-core` to the collaborators of
//! `skyline-infra`: it provides the [`Application`] that runs the main loop,
//! the launch/configuration types it is built from, and logging setup.

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod logging;
pub mod overlay;
pub mod paths;

pub use app::{AppCommand, AppHandle, Application, EXIT_INIT_FAILED, EXIT_NORMAL};
pub use config::{AppConfig, ArgsError, LaunchArgs, LogConfig, Verbosity};
pub use overlay::RateOverlay;
pub use paths::AppPaths;

/// Everything needed to write states for a Skyline application.
pub mod prelude {
    pub use crate::{AppHandle, Application};
    pub use skyline_core::math::{Extent2D, LinearRgba, Rect, Vec2};
    pub use skyline_core::platform::Surface;
    pub use skyline_core::responder::forward_to_first;
    pub use skyline_core::{Event, Key, MouseButton, Responder, State};
}
