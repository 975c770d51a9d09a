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

//! Concrete implementations of the collaborators declared in `skyline-core`:
//! surfaces (winit and headless), the monospace font loader and the legacy
//! executable resource extractor.

#![warn(missing_docs)]

mod binary;
pub mod font;
pub mod platform;
pub mod resources;

pub use font::{FontError, FontMetrics, MonoFont};
pub use platform::headless::{HeadlessBackend, HeadlessRecord, HeadlessScript, HeadlessSurface};
pub use platform::window::{WinitBackend, WinitSurface};
pub use resources::ne_executable::{NeError, NeExecutable, NeResource, ResourceId, ResourceType};
