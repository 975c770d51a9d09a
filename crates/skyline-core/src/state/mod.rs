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

//! Application states and the stack that sequences them.
//!
//! A [`State`] is one mutually exclusive mode of the application (a menu, the
//! game world, a dialog). The [`StateStack`] owns every state it holds and is
//! the only thing that calls the lifecycle hooks, which guarantees that at
//! most one state is active at any time.

mod stack;

pub use self::stack::StateStack;

use crate::platform::Surface;
use crate::responder::Responder;

/// One mode of the application, driven by the [`StateStack`].
///
/// A state is a [`Responder`]: while it is the stack top, every event polled by
/// the main loop is offered to its chain through [`Responder::send_event`].
///
/// States must not mutate the stack that owns them from inside a hook. A state
/// that wants to push a successor or pop itself enqueues the request through
/// the handle it was constructed with; the loop applies it between frames.
pub trait State: Responder {
    /// A human-readable name used in log lines.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called when the state becomes the top of the stack.
    fn activate(&mut self) {}

    /// Called when the state stops being the top of the stack, either because
    /// another state was pushed over it or because it is about to be popped.
    fn deactivate(&mut self) {}

    /// Advances the state by one frame of `dt` simulated seconds and draws it.
    fn advance(&mut self, dt: f64, surface: &mut dyn Surface);
}
