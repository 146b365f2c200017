// Copyright 2025 Fernando Borretti
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

use std::env::current_dir;
use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_file;
use crate::cmd::drill::server::start_server;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::config::Config;
use crate::config::ConfigFile;
use crate::config::Overrides;
use crate::error::Fallible;
use crate::error::fail;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Study the phrases in a directory in the browser.
    Drill {
        /// Path to the study directory. Defaults to the current directory.
        directory: Option<String>,
        /// The port to serve on.
        #[arg(long)]
        port: Option<u16>,
        /// Fetch the dataset from this URL instead of the directory.
        #[arg(long)]
        dataset_url: Option<String>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Check that a CSV file contains usable phrases.
    Check {
        /// Path to the CSV file. Defaults to `sentences.csv`.
        file: Option<String>,
    },
    /// Print progress statistics.
    Stats {
        /// Path to the study directory. Defaults to the current directory.
        directory: Option<String>,
        /// Which format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            directory,
            port,
            dataset_url,
            no_open,
        } => {
            let directory = resolve_directory(directory)?;
            let file = ConfigFile::load(&directory)?;
            let config = Config::resolve(
                file,
                Overrides {
                    port,
                    dataset_url,
                    no_open,
                },
            );
            start_server(directory, config).await
        }
        Command::Check { file } => {
            check_file(file)?;
            Ok(())
        }
        Command::Stats { directory, format } => {
            let directory = resolve_directory(directory)?;
            print_stats(&directory, format)
        }
    }
}

fn resolve_directory(directory: Option<String>) -> Fallible<PathBuf> {
    let directory: PathBuf = match directory {
        Some(dir) => PathBuf::from(dir),
        None => current_dir()?,
    };
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    Ok(directory.canonicalize()?)
}
