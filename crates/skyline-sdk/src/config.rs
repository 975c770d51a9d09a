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

//! Launch arguments, log settings and the application configuration file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skyline_core::platform::VideoMode;

/// Environment variable selecting the log verbosity.
pub const LOG_LEVEL_ENV: &str = "SKYLINE_LOG";
/// Environment variable selecting the log output file.
pub const LOG_FILE_ENV: &str = "SKYLINE_LOG_FILE";
/// Name of the configuration file looked up in the data directory.
pub const CONFIG_FILE_NAME: &str = "skyline.json";

/// Errors in the process arguments.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArgsError {
    /// A flag that takes a value was the last argument.
    #[error("{0} is missing its value")]
    MissingValue(&'static str),
}

/// The parsed process arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchArgs {
    /// `argv[0]`, used to locate the installation.
    pub executable: PathBuf,
    /// `--debug`: raise the log verbosity to debug.
    pub debug: bool,
    /// `--log <path>`: write log output to a file.
    pub log_path: Option<PathBuf>,
    /// `--dump-resources <dir>`: extract the legacy executable's resources.
    pub dump_resources: Option<PathBuf>,
    /// `--config <file>`: use another configuration file.
    pub config_path: Option<PathBuf>,
}

impl LaunchArgs {
    /// Parses the process arguments, `argv[0]` included.
    ///
    /// Unknown arguments are ignored.
    ///
    /// # Panics
    /// Panics if `args` is empty: `argv[0]` is required.
    pub fn parse<I, S>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let executable = args.next();
        assert!(executable.is_some(), "argv[0] is required");

        let mut parsed = Self {
            executable: PathBuf::from(executable.unwrap_or_default()),
            ..Self::default()
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" => parsed.debug = true,
                "--log" => parsed.log_path = Some(value_of(&mut args, "--log")?),
                "--dump-resources" => {
                    parsed.dump_resources = Some(value_of(&mut args, "--dump-resources")?)
                }
                "--config" => parsed.config_path = Some(value_of(&mut args, "--config")?),
                other => log::trace!("ignoring argument {other:?}"),
            }
        }
        Ok(parsed)
    }

    /// Parses the arguments of the current process.
    pub fn from_env() -> Result<Self, ArgsError> {
        Self::parse(std::env::args())
    }
}

fn value_of(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<PathBuf, ArgsError> {
    args.next()
        .map(PathBuf::from)
        .ok_or(ArgsError::MissingValue(flag))
}

/// How much is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warning,
    /// Lifecycle information.
    Info,
    /// Diagnostic detail.
    Debug,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// The matching `log` filter.
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            Verbosity::Error => log::LevelFilter::Error,
            Verbosity::Warning => log::LevelFilter::Warn,
            Verbosity::Info => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
            Verbosity::Trace => log::LevelFilter::Trace,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verbosity::Error => "error",
            Verbosity::Warning => "warning",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        })
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Verbosity::Error),
            "warning" | "warn" => Ok(Verbosity::Warning),
            "info" => Ok(Verbosity::Info),
            "debug" => Ok(Verbosity::Debug),
            "trace" => Ok(Verbosity::Trace),
            other => Err(format!("unknown log verbosity '{other}'")),
        }
    }
}

/// Where log output goes and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// The most detailed level that is emitted.
    pub verbosity: Verbosity,
    /// A file receiving the output instead of stderr.
    pub output_path: Option<PathBuf>,
}

impl LogConfig {
    /// Defaults for the current build: debug verbosity in debug builds,
    /// info otherwise.
    pub fn for_build() -> Self {
        Self::for_build_mode(cfg!(debug_assertions))
    }

    /// Defaults for a debug or release build.
    pub fn for_build_mode(debug_build: bool) -> Self {
        Self {
            verbosity: if debug_build {
                Verbosity::Debug
            } else {
                Verbosity::Info
            },
            output_path: None,
        }
    }

    /// Applies [`LOG_LEVEL_ENV`] and [`LOG_FILE_ENV`] as returned by `lookup`.
    ///
    /// An unparsable level is reported on stderr and ignored; the logger does
    /// not exist yet at this point.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            match level.parse() {
                Ok(verbosity) => self.verbosity = verbosity,
                Err(e) => eprintln!("{LOG_LEVEL_ENV}: {e}"),
            }
        }
        if let Some(path) = lookup(LOG_FILE_ENV).filter(|path| !path.is_empty()) {
            self.output_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Applies `--debug` and `--log`.
    pub fn with_args(mut self, args: &LaunchArgs) -> Self {
        if args.debug {
            self.verbosity = self.verbosity.max(Verbosity::Debug);
        }
        if let Some(path) = &args.log_path {
            self.output_path = Some(path.clone());
        }
        self
    }

    /// Build mode, then the process environment, then `args`.
    pub fn resolve(args: &LaunchArgs) -> Self {
        Self::for_build()
            .with_env(|key| std::env::var(key).ok())
            .with_args(args)
    }
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial width in pixels.
    pub width: u32,
    /// Initial height in pixels.
    pub height: u32,
    /// Colour depth.
    pub bits_per_pixel: u32,
    /// Window title.
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 768,
            bits_per_pixel: 32,
            title: "Skyline".to_string(),
        }
    }
}

/// The fixed-width font used by overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font file, relative to the data directory.
    pub file: PathBuf,
    /// Size in points.
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("fonts").join("UbuntuMono-Regular.ttf"),
            size: 16.0,
        }
    }
}

/// Settings read from `skyline.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window settings.
    pub window: WindowConfig,
    /// Overlay font.
    pub font: FontConfig,
    /// File name of the legacy executable holding the original assets.
    pub legacy_executable: String,
}

impl AppConfig {
    /// Reads the configuration at `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file
    /// yields the defaults and a warning.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no configuration at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("unable to read {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => {
                log::info!("loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("malformed configuration {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The video mode requested for the main window.
    pub fn video_mode(&self) -> VideoMode {
        VideoMode {
            width: self.window.width,
            height: self.window.height,
            bits_per_pixel: self.window.bits_per_pixel,
            title: self.window.title.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            font: FontConfig::default(),
            legacy_executable: "SIMTOWER.EXE".to_string(),
        }
    }
}
