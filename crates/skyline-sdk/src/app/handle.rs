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

use std::fmt;

use skyline_core::State;

/// A request to the [`Application`](super::Application), applied at the end
/// of the current loop iteration.
pub enum AppCommand {
    /// Push a state over the current one.
    PushState(Box<dyn State>),
    /// Pop the current state.
    PopState,
    /// Terminate with the given exit code.
    Exit(i32),
}

impl fmt::Debug for AppCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppCommand::PushState(state) => f.debug_tuple("PushState").field(&state.name()).finish(),
            AppCommand::PopState => f.write_str("PopState"),
            AppCommand::Exit(code) => f.debug_tuple("Exit").field(code).finish(),
        }
    }
}

/// A cloneable handle through which states and subsystems talk to the
/// application that owns them.
///
/// Every request is deferred: the stack is never mutated while one of its
/// states is running.
#[derive(Clone)]
pub struct AppHandle {
    sender: flume::Sender<AppCommand>,
}

impl AppHandle {
    /// A handle feeding `sender`.
    pub fn new(sender: flume::Sender<AppCommand>) -> Self {
        Self { sender }
    }

    /// Requests that `state` be pushed over the current state.
    pub fn push_state(&self, state: Box<dyn State>) {
        self.send(AppCommand::PushState(state));
    }

    /// Requests that the current state be popped.
    pub fn pop_state(&self) {
        self.send(AppCommand::PopState);
    }

    /// Requests termination with `code`.
    ///
    /// Negative codes denote abnormal termination, positive ones a normal or
    /// requested exit. A zero code means "keep running" and is ignored.
    pub fn exit(&self, code: i32) {
        self.send(AppCommand::Exit(code));
    }

    fn send(&self, command: AppCommand) {
        log::trace!("queueing {command:?}");
        if self.sender.send(command).is_err() {
            log::error!("application is gone; command dropped");
        }
    }
}

impl fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppHandle")
            .field("queued", &self.sender.len())
            .finish()
    }
}
