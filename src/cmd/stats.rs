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
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::cmd::drill::server::DATABASE_FILE;
use crate::config::ConfigFile;
use crate::config::DEFAULT_DATASET;
use crate::db::Database;
use crate::deck::DeckManager;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_cards;
use crate::progress::Progress;
use crate::progress::ProgressStore;
use crate::source::decode_text;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    deck_size: usize,
    known_count: usize,
    score: u32,
    percent_known: u32,
    last_updated: Option<String>,
}

pub fn print_stats(directory: &Path, format: StatsFormat) -> Fallible<()> {
    let stats = collect_stats(directory)?;
    match format {
        StatsFormat::Text => {
            println!("Cards:   {}", stats.deck_size);
            println!("Known:   {} ({}%)", stats.known_count, stats.percent_known);
            println!("Score:   {}", stats.score);
            if let Some(last_updated) = &stats.last_updated {
                println!("Updated: {last_updated}");
            }
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

fn collect_stats(directory: &Path) -> Fallible<Stats> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let config = ConfigFile::load(directory)?;
    let dataset = config
        .dataset
        .unwrap_or_else(|| DEFAULT_DATASET.to_string());

    // Don't create a database just to read it.
    let db_path = directory.join(DATABASE_FILE);
    let progress = if db_path.exists() {
        ProgressStore::new(Database::new(&db_path)?).load()
    } else {
        Progress::default()
    };
    let last_updated = progress.last_updated.map(|ts| ts.to_rfc3339());

    let mut deck = DeckManager::new(progress.known, progress.score);
    let dataset_path = directory.join(dataset);
    if dataset_path.exists() {
        let bytes = std::fs::read(dataset_path)?;
        deck.load_deck(parse_cards(&decode_text(&bytes))?);
    }

    Ok(Stats {
        deck_size: deck.deck().len(),
        known_count: deck.known().len(),
        score: deck.score(),
        percent_known: deck.percent_known(),
        last_updated,
    })
}
