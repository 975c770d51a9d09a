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

//! Installs the process-wide `env_logger` backend.

use std::fs::File;
use std::io;
use std::path::Path;

use env_logger::{Builder, Target};

use crate::config::LogConfig;

/// Installs the global logger described by `config`.
///
/// Returns `false` if a logger was already installed, in which case the
/// existing one is kept. If the output file cannot be created, output stays
/// on stderr and a warning is logged.
pub fn init(config: &LogConfig) -> bool {
    let mut builder = Builder::new();
    builder
        .filter_level(config.verbosity.level_filter())
        .filter_module("winit", log::LevelFilter::Warn)
        .filter_module("calloop", log::LevelFilter::Warn);

    let mut file_error = None;
    if let Some(path) = &config.output_path {
        match open_output(path) {
            Ok(target) => {
                builder.target(target);
            }
            Err(e) => file_error = Some((path, e)),
        }
    }

    if builder.try_init().is_err() {
        log::debug!("a logger is already installed; keeping it");
        return false;
    }

    if let Some((path, e)) = file_error {
        log::warn!("unable to open log file {}: {e}; logging to stderr", path.display());
    }
    log::debug!("logging at {} verbosity", config.verbosity);
    true
}

/// Creates (truncating) the log file at `path`.
pub(crate) fn open_output(path: &Path) -> io::Result<Target> {
    let file = File::create(path)?;
    Ok(Target::Pipe(Box::new(file)))
}
