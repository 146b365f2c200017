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

use crate::error::LoadError;
use crate::types::card::CardId;
use crate::types::card::PhraseCard;

/// Parse CSV text into phrase cards.
///
/// Blank lines are dropped before anything else, and a card's id is its
/// index in the remaining lines. The first line is a header if it mentions
/// "darija" or "eng" in any case. Rows with fewer than two fields, or with an
/// empty Darija or English field, are skipped.
pub fn parse_cards(text: &str) -> Result<Vec<PhraseCard>, LoadError> {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    let start = match lines.first() {
        Some(first) if is_header(first) => 1,
        _ => 0,
    };
    let mut cards = Vec::new();
    for (index, line) in lines.iter().enumerate().skip(start) {
        let fields = split_fields(line.trim());
        if fields.len() < 2 {
            continue;
        }
        let darija = fields[0].trim();
        let english = fields[1].trim();
        if !darija.is_empty() && !english.is_empty() {
            cards.push(PhraseCard::new(CardId::new(index), darija, english));
        }
    }
    if cards.is_empty() {
        return Err(LoadError::Parse);
    }
    Ok(cards)
}

fn is_header(line: &str) -> bool {
    let line = line.to_lowercase();
    line.contains("darija") || line.contains("eng")
}

/// Split a line on commas that are outside double quotes. Quote characters
/// toggle the quoted state and are not kept; escaped quotes are not
/// unescaped.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields.into_iter().map(strip_quotes).collect()
}

fn strip_quotes(field: String) -> String {
    let field = field.strip_prefix('"').unwrap_or(&field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.to_string()
}
