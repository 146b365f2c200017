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

use std::fs::write;

use tempfile::TempDir;
use tempfile::tempdir;

use crate::config::DEFAULT_DATASET;
use crate::error::Fallible;

/// Create a temporary study directory, optionally with a default dataset.
pub fn create_tmp_deck_directory(csv: Option<&str>) -> Fallible<TempDir> {
    let directory = tempdir()?;
    if let Some(csv) = csv {
        write(directory.path().join(DEFAULT_DATASET), csv)?;
    }
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_deck_directory() -> Fallible<()> {
        let directory = create_tmp_deck_directory(Some("salam,hello\n"))?;
        assert!(directory.path().join(DEFAULT_DATASET).exists());
        let directory = create_tmp_deck_directory(None)?;
        assert!(!directory.path().join(DEFAULT_DATASET).exists());
        Ok(())
    }
}
