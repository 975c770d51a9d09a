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

use super::State;

/// A LIFO sequence of owned states; the top is the single active state.
///
/// Ordering guarantees:
/// - on push, the previous top is deactivated before the new state is activated;
/// - on pop, the removed state is deactivated (and dropped) before the state it
///   exposes is activated.
///
/// An empty stack is a valid, terminal condition for the main loop.
#[derive(Default)]
pub struct StateStack {
    states: Vec<Box<dyn State>>,
}

impl StateStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    /// Pushes `state` on top of the stack, making it the sole active state.
    pub fn push(&mut self, mut state: Box<dyn State>) {
        log::info!("pushing state {}", state.name());
        if let Some(top) = self.states.last_mut() {
            top.deactivate();
        }
        state.activate();
        self.states.push(state);
    }

    /// Deactivates and destroys the top state, then activates the state below
    /// it, if any.
    ///
    /// # Panics
    /// Panics if the stack is empty; popping nothing means the caller's
    /// orchestration is broken.
    pub fn pop(&mut self) {
        assert!(
            !self.states.is_empty(),
            "pop() requires at least one state on the state stack"
        );
        if let Some(mut top) = self.states.pop() {
            log::info!("popping state {}", top.name());
            top.deactivate();
            drop(top);
        }
        if let Some(exposed) = self.states.last_mut() {
            exposed.activate();
        }
    }

    /// Pops every state, top first.
    pub fn clear(&mut self) {
        while !self.states.is_empty() {
            self.pop();
        }
    }

    /// The active state, if any.
    pub fn top(&self) -> Option<&dyn State> {
        self.states.last().map(|state| state.as_ref())
    }

    /// The active state, if any.
    pub fn top_mut(&mut self) -> Option<&mut (dyn State + 'static)> {
        self.states.last_mut().map(|state| state.as_mut())
    }

    /// Number of states on the stack.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` when no state is left.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl std::fmt::Debug for StateStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.states.iter().map(|state| state.name()))
            .finish()
    }
}
