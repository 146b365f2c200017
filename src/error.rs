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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport::new(msg))
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport::new(format!("I/O error: {value}"))
    }
}

impl From<rusqlite::Error> for ErrorReport {
    fn from(value: rusqlite::Error) -> Self {
        ErrorReport::new(format!("database error: {value}"))
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport::new(format!("JSON error: {value}"))
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport::new(format!("invalid config: {value}"))
    }
}

impl From<reqwest::Error> for ErrorReport {
    fn from(value: reqwest::Error) -> Self {
        ErrorReport::new(format!("HTTP error: {value}"))
    }
}

/// Why a dataset could not be turned into a deck.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// An uploaded file could not be read.
    FileRead(String),
    /// The text contained no usable rows.
    Parse,
    /// The dataset could not be reached at all.
    Fetch(String),
    /// The dataset was reached but is not there.
    Unavailable(String),
}

impl LoadError {
    /// The message shown to the learner.
    pub fn notice(&self) -> String {
        match self {
            LoadError::FileRead(_) => "Error reading file. Please try again.".to_string(),
            LoadError::Parse => "No valid sentences found in the CSV file.".to_string(),
            LoadError::Fetch(reason) => format!("Error loading dataset: {reason}"),
            LoadError::Unavailable(_) => {
                "Could not load the dataset. Make sure sentences.csv is in the same folder."
                    .to_string()
            }
        }
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::FileRead(reason) => write!(f, "failed to read file: {reason}"),
            LoadError::Parse => write!(f, "no valid sentences"),
            LoadError::Fetch(reason) => write!(f, "failed to fetch dataset: {reason}"),
            LoadError::Unavailable(reason) => write!(f, "dataset unavailable: {reason}"),
        }
    }
}

impl Error for LoadError {}

impl From<LoadError> for ErrorReport {
    fn from(value: LoadError) -> Self {
        ErrorReport::new(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ErrorReport::new("directory does not exist.");
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_fail() {
        let result: Fallible<()> = fail("nope");
        assert_eq!(result, Err(ErrorReport::new("nope")));
    }

    #[test]
    fn test_parse_error_message() {
        let err: ErrorReport = LoadError::Parse.into();
        assert_eq!(err.to_string(), "error: no valid sentences");
        assert_eq!(
            LoadError::Parse.notice(),
            "No valid sentences found in the CSV file."
        );
    }

    #[test]
    fn test_fetch_notices() {
        assert_eq!(
            LoadError::Fetch("connection refused".to_string()).notice(),
            "Error loading dataset: connection refused"
        );
        assert_eq!(
            LoadError::Unavailable("404 Not Found".to_string()).notice(),
            "Could not load the dataset. Make sure sentences.csv is in the same folder."
        );
    }
}
