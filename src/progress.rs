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

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::db::Database;
use crate::error::Fallible;
use crate::types::card::CardId;
use crate::types::timestamp::Timestamp;

/// The storage key progress is written under.
pub const PROGRESS_KEY: &str = "darijaLearningProgress";

/// What survives a restart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Progress {
    pub known: HashSet<CardId>,
    pub score: u32,
    pub last_updated: Option<Timestamp>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredProgress<'a> {
    known_ids: Vec<CardId>,
    score: u32,
    last_updated: &'a Timestamp,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadedProgress {
    #[serde(default)]
    known_ids: Option<Vec<CardId>>,
    /// Older documents name the known set `knownSentences`.
    #[serde(default)]
    known_sentences: Option<Vec<CardId>>,
    #[serde(default)]
    score: u32,
    #[serde(default)]
    last_updated: Option<serde_json::Value>,
}

impl LoadedProgress {
    fn into_progress(self) -> Progress {
        let known = self
            .known_ids
            .or(self.known_sentences)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let last_updated = self.last_updated.and_then(|value| {
            match serde_json::from_value::<Timestamp>(value) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    log::warn!("Ignoring unreadable progress timestamp: {e}");
                    None
                }
            }
        });
        Progress {
            known,
            score: self.score,
            last_updated,
        }
    }
}

/// Serializes progress into the key/value store.
#[derive(Clone)]
pub struct ProgressStore {
    db: Database,
}

impl ProgressStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Overwrite the stored progress.
    pub fn save(&self, known: &HashSet<CardId>, score: u32) -> Fallible<Timestamp> {
        let now = Timestamp::now();
        let mut known_ids: Vec<CardId> = known.iter().copied().collect();
        known_ids.sort();
        let stored = StoredProgress {
            known_ids,
            score,
            last_updated: &now,
        };
        let json = serde_json::to_string(&stored)?;
        self.db.set(PROGRESS_KEY, &json)?;
        log::debug!("Saved progress: {} known, score {score}", known.len());
        Ok(now)
    }

    /// Restore progress. Anything missing or unreadable yields the default.
    pub fn load(&self) -> Progress {
        let json = match self.db.get(PROGRESS_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Progress::default(),
            Err(e) => {
                log::warn!("Could not read stored progress: {e}");
                return Progress::default();
            }
        };
        match serde_json::from_str::<LoadedProgress>(&json) {
            Ok(loaded) => loaded.into_progress(),
            Err(e) => {
                log::warn!("Ignoring malformed stored progress: {e}");
                Progress::default()
            }
        }
    }
}
