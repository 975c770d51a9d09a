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

//! # Skyline Core
//!
//! Foundational crate containing the control-flow contracts of a Skyline
//! application: events and the responder chain, application states and the
//! state stack, frame pacing, and the platform traits implemented by
//! `skyline-infra`.

#![warn(missing_docs)]

pub mod event;
pub mod math;
pub mod pacing;
pub mod platform;
pub mod responder;
pub mod state;
pub mod utils;

pub use event::{Event, Key, MouseButton};
pub use pacing::{FramePacer, FrameStep, RateReading};
pub use responder::Responder;
pub use state::{State, StateStack};
pub use utils::timer::Stopwatch;
