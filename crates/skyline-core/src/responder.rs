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

//! The event dispatch chain.
//!
//! A [`Responder`] is a node that may consume an [`Event`] locally or forward
//! it to its successors. Dispatch is always local-before-forward: an event is
//! offered to [`Responder::handle_event`] first, and only when that declines
//! is it passed to [`Responder::send_event_to_next_responders`].
//!
//! Successors form a tree owned by their predecessor (a state owning its UI
//! children, a panel owning its buttons), so forwarding always moves away from
//! the sender and an event never visits the same node twice.

use crate::event::Event;

/// A node in the event dispatch chain.
///
/// Both hooks default to "not handled", so a responder that overrides nothing
/// is inert and simply reports every event as unconsumed.
pub trait Responder {
    /// Offers `event` to this responder and, failing that, to its successors.
    ///
    /// Returns `true` if some node in the chain consumed the event.
    fn send_event(&mut self, event: &Event) -> bool {
        if self.handle_event(event) {
            return true;
        }
        self.send_event_to_next_responders(event)
    }

    /// Forwards an event this responder did not handle.
    ///
    /// The default has no successors and reports the event as unhandled.
    fn send_event_to_next_responders(&mut self, _event: &Event) -> bool {
        false
    }

    /// Attempts to handle `event` locally.
    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}

/// Offers `event` to each successor in turn, stopping at the first one whose
/// chain consumes it.
///
/// This is the usual body of a [`Responder::send_event_to_next_responders`]
/// override.
pub fn forward_to_first<'a, I>(event: &Event, successors: I) -> bool
where
    I: IntoIterator<Item = &'a mut dyn Responder>,
{
    successors
        .into_iter()
        .any(|successor| successor.send_event(event))
}
