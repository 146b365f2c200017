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

use std::path::PathBuf;

use crate::config::DEFAULT_DATASET;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_cards;
use crate::source::decode_text;

/// Parse a dataset and report how many cards it holds.
pub fn check_file(file: Option<String>) -> Fallible<usize> {
    let path = PathBuf::from(file.unwrap_or_else(|| DEFAULT_DATASET.to_string()));
    if !path.exists() {
        return fail("file does not exist.");
    }
    let bytes = std::fs::read(&path)?;
    let cards = parse_cards(&decode_text(&bytes))?;
    println!("ok: {} cards", cards.len());
    Ok(cards.len())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_non_existent_file() {
        let result = check_file(Some("./derpherp.csv".to_string()));
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: file does not exist.".to_string())
        );
    }

    #[test]
    fn test_valid_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("phrases.csv");
        write(&path, "darija,english\nsalam,hello\nwakha,okay\n")?;
        assert_eq!(check_file(Some(path.display().to_string()))?, 2);
        Ok(())
    }

    #[test]
    fn test_invalid_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("phrases.csv");
        write(&path, "darija,english\n")?;
        let result = check_file(Some(path.display().to_string()));
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("error: no valid sentences".to_string())
        );
        Ok(())
    }
}
