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

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Fallible;

pub const CONFIG_FILE: &str = "darija.toml";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATASET: &str = "sentences.csv";
pub const DEFAULT_REBUILD_DELAY_MS: u64 = 1000;

/// The contents of `darija.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub port: Option<u16>,
    pub dataset: Option<String>,
    pub dataset_url: Option<String>,
    pub rebuild_delay_ms: Option<u64>,
    pub open_browser: Option<bool>,
}

impl ConfigFile {
    /// Read the config file from the directory, if there is one.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        log::debug!("Reading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Settings given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub dataset_url: Option<String>,
    pub no_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub dataset: String,
    pub dataset_url: Option<String>,
    pub rebuild_delay: Duration,
    pub open_browser: bool,
}

impl Config {
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Self {
        Self {
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            dataset: file.dataset.unwrap_or_else(|| DEFAULT_DATASET.to_string()),
            dataset_url: overrides.dataset_url.or(file.dataset_url),
            rebuild_delay: Duration::from_millis(
                file.rebuild_delay_ms.unwrap_or(DEFAULT_REBUILD_DELAY_MS),
            ),
            open_browser: !overrides.no_open && file.open_browser.unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(ConfigFile::default(), Overrides::default())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.dataset, "sentences.csv");
        assert_eq!(config.dataset_url, None);
        assert_eq!(config.rebuild_delay, Duration::from_secs(1));
        assert!(config.open_browser);
    }

    #[test]
    fn test_missing_file() -> Fallible<()> {
        let dir = tempdir()?;
        assert_eq!(ConfigFile::load(dir.path())?, ConfigFile::default());
        Ok(())
    }

    #[test]
    fn test_file_and_overrides() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join(CONFIG_FILE),
            "port = 9000\ndataset = \"phrases.csv\"\nrebuild_delay_ms = 250\nopen_browser = false\n",
        )?;
        let file = ConfigFile::load(dir.path())?;
        let config = Config::resolve(
            file,
            Overrides {
                port: Some(9100),
                dataset_url: Some("http://example.com/s.csv".to_string()),
                no_open: false,
            },
        );
        assert_eq!(config.port, 9100);
        assert_eq!(config.dataset, "phrases.csv");
        assert_eq!(
            config.dataset_url.as_deref(),
            Some("http://example.com/s.csv")
        );
        assert_eq!(config.rebuild_delay, Duration::from_millis(250));
        assert!(!config.open_browser);
        Ok(())
    }

    #[test]
    fn test_malformed_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "port = \"eight thousand\"\n")?;
        assert!(ConfigFile::load(dir.path()).is_err());
        write(dir.path().join(CONFIG_FILE), "colour = \"blue\"\n")?;
        assert!(ConfigFile::load(dir.path()).is_err());
        Ok(())
    }
}
