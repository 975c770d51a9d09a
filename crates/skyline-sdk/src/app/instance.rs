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

use std::sync::atomic::{AtomicBool, Ordering};

static APPLICATION_ALIVE: AtomicBool = AtomicBool::new(false);

/// Proof that the holder is the only live application in the process.
///
/// Released when dropped, so a process may run applications one after the
/// other but never two at once.
#[derive(Debug)]
pub(crate) struct InstanceGuard(());

impl InstanceGuard {
    /// # Panics
    /// Panics if another guard is alive.
    pub(crate) fn acquire() -> Self {
        let acquired = APPLICATION_ALIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        assert!(acquired, "Application initialized multiple times");
        Self(())
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        APPLICATION_ALIVE.store(false, Ordering::Release);
    }
}
