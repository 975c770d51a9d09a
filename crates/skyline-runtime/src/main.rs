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

//! Skyline executable.
//!
//! Parses the process arguments, sets up logging and configuration, and runs
//! the application with the tower state on a desktop window. The process
//! exits with the application's exit code.

mod states;

use anyhow::Context;
use skyline_infra::WinitBackend;
use skyline_sdk::config::CONFIG_FILE_NAME;
use skyline_sdk::{logging, AppConfig, AppPaths, Application, LaunchArgs, LogConfig, EXIT_INIT_FAILED};

use crate::states::TowerState;

fn run() -> anyhow::Result<i32> {
    let args = LaunchArgs::from_env().context("invalid command line")?;
    logging::init(&LogConfig::resolve(&args));

    let paths = AppPaths::from_executable(&args.executable);
    let config_path = args
        .config_path
        .clone()
        .unwrap_or_else(|| paths.data_dir.join(CONFIG_FILE_NAME));
    let config = AppConfig::load(&config_path);

    let mut app = Application::new(args, config, Box::new(WinitBackend::new())).with_paths(paths);
    let handle = app.handle();
    handle.push_state(Box::new(TowerState::new(handle.clone())));
    Ok(app.run())
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            // The logger may not be installed yet.
            eprintln!("skyline: {e:#}");
            EXIT_INIT_FAILED
        }
    };
    std::process::exit(code);
}
