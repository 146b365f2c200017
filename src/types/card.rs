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

use serde::Deserialize;
use serde::Serialize;

/// Identifies a card by the index of its line in the source text, counting
/// only non-blank lines. Identical files produce identical ids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(usize);

impl CardId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> usize {
        self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Darija phrase and its English translation.
#[derive(Clone, PartialEq, Debug)]
pub struct PhraseCard {
    id: CardId,
    darija: String,
    english: String,
}

impl PhraseCard {
    pub fn new(id: CardId, darija: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            id,
            darija: darija.into(),
            english: english.into(),
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn darija(&self) -> &str {
        &self.darija
    }

    pub fn english(&self) -> &str {
        &self.english
    }
}
