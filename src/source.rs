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

use std::fmt::Display;
use std::fmt::Formatter;
use std::path::PathBuf;

use crate::error::LoadError;

/// Where the full dataset is retrieved from.
#[derive(Clone, Debug, PartialEq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// Retrieve the raw CSV text.
    pub async fn fetch(&self) -> Result<String, LoadError> {
        match self {
            DatasetSource::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| LoadError::Unavailable(format!("{}: {e}", path.display())))?;
                Ok(decode_text(&bytes))
            }
            DatasetSource::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .map_err(|e| LoadError::Fetch(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Unavailable(format!("{url} returned {status}")));
                }
                response
                    .text()
                    .await
                    .map_err(|e| LoadError::Fetch(e.to_string()))
            }
        }
    }
}

impl Display for DatasetSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Decode file contents as UTF-8, replacing invalid sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
