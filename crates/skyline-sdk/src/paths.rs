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

//! Installation and preference directories derived from `argv[0]`.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "skyline";

/// Where the executable, its data and the user's preferences live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// The executable as given on the command line.
    pub executable: PathBuf,
    /// Bundled data (fonts, configuration).
    pub data_dir: PathBuf,
    /// Per-user settings and copied assets.
    pub prefs_dir: PathBuf,
}

impl AppPaths {
    /// Derives the directories from the executable path.
    ///
    /// On macOS the executable sits inside an application bundle whose
    /// resources are the working directory; elsewhere data lives in a `data`
    /// directory next to the executable.
    pub fn from_executable(executable: &Path) -> Self {
        let prefs_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);
        let data_dir = if cfg!(target_os = "macos") {
            PathBuf::from(".")
        } else {
            executable_dir(executable).join("data")
        };
        Self {
            executable: executable.to_path_buf(),
            data_dir,
            prefs_dir,
        }
    }

    /// Builds paths from explicit directories.
    pub fn with_dirs(executable: &Path, data_dir: &Path, prefs_dir: &Path) -> Self {
        Self {
            executable: executable.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
            prefs_dir: prefs_dir.to_path_buf(),
        }
    }

    /// The directory containing the executable.
    pub fn executable_dir(&self) -> PathBuf {
        executable_dir(&self.executable)
    }

    /// Every location where a file called `name` is looked for, in probe
    /// order: data directory, executable directory, working directory,
    /// preferences directory. Duplicates are removed.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let mut dirs = vec![self.data_dir.clone(), self.executable_dir()];
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        dirs.push(self.prefs_dir.clone());

        let mut candidates: Vec<PathBuf> = Vec::with_capacity(dirs.len());
        for dir in dirs {
            let candidate = dir.join(name);
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }
}

fn executable_dir(executable: &Path) -> PathBuf {
    match executable.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
