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

/// A queue of deferred commands backed by an unbounded channel.
///
/// Producers hold a cloned [`flume::Sender`] and may enqueue at any time,
/// including from inside a responder or a state's `advance`. The owner drains
/// the queue at a well-defined point of the main loop, which keeps mutations
/// of loop-owned structures out of the call stack that traverses them.
///
/// Unlike a broadcast bus, `T` needs no `Clone`, `Send` or `Sync` bound, so a
/// command may carry owned, single-threaded payloads such as boxed states.
#[derive(Debug)]
pub struct CommandQueue<T> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T> CommandQueue<T> {
    /// Creates a new, empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Enqueues a command, logging an error if the receiver is gone.
    pub fn publish(&self, command: T) {
        log::trace!("Publishing a command.");

        if self.sender.send(command).is_err() {
            log::error!("Failed to enqueue command: receiver disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Removes and returns every command enqueued so far, in FIFO order.
    ///
    /// Commands published while the returned vector is being processed stay
    /// queued for the next drain.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Returns `true` if no command is waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T> Default for CommandQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
