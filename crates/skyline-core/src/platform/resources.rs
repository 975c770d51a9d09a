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

use std::path::Path;

/// A container of legacy assets that can be opened from disk and unpacked.
pub trait ResourceArchive {
    /// Opens and indexes the archive at `path`, replacing anything loaded
    /// before. On error the archive is left empty.
    fn load(&mut self, path: &Path) -> anyhow::Result<()>;

    /// Returns `true` once a [`ResourceArchive::load`] call has succeeded.
    fn is_loaded(&self) -> bool;

    /// Writes every resource below `output_dir` and returns how many files
    /// were written.
    fn dump(&self, output_dir: &Path) -> anyhow::Result<usize>;
}
