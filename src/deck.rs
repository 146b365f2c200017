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

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::types::card::CardId;
use crate::types::card::PhraseCard;
use crate::types::filter::FilterMode;

/// Points awarded for marking a card known, and taken back for unmarking it.
pub const POINTS_PER_CARD: u32 = 10;

/// Owns the loaded deck, the set of known cards, and the shuffled view the
/// learner is currently stepping through.
pub struct DeckManager {
    deck: Vec<PhraseCard>,
    known: HashSet<CardId>,
    score: u32,
    filter: FilterMode,
    view: Vec<PhraseCard>,
    position: usize,
    rng: StdRng,
}

/// The result of toggling a card's known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    /// Whether the card is known after the toggle.
    pub known: bool,
    /// The change actually applied to the score.
    pub delta: i64,
}

impl DeckManager {
    pub fn new(known: HashSet<CardId>, score: u32) -> Self {
        Self::with_rng(known, score, StdRng::from_entropy())
    }

    pub fn with_rng(known: HashSet<CardId>, score: u32, rng: StdRng) -> Self {
        Self {
            deck: Vec::new(),
            known,
            score,
            filter: FilterMode::All,
            view: Vec::new(),
            position: 0,
            rng,
        }
    }

    /// Replace the deck wholesale. Known ids that do not belong to the new
    /// deck are dropped; returns how many were dropped.
    pub fn load_deck(&mut self, cards: Vec<PhraseCard>) -> usize {
        let ids: HashSet<CardId> = cards.iter().map(|card| card.id()).collect();
        let before = self.known.len();
        self.known.retain(|id| ids.contains(id));
        self.deck = cards;
        self.position = 0;
        self.rebuild_view();
        before - self.known.len()
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter = mode;
        self.rebuild_view();
    }

    /// Recompute the active view from the deck and the filter, then shuffle
    /// it. The position is kept unless it falls outside the new view.
    pub fn rebuild_view(&mut self) {
        self.view = match self.filter {
            FilterMode::All => self.deck.clone(),
            FilterMode::UnknownOnly => self
                .deck
                .iter()
                .filter(|card| !self.known.contains(&card.id()))
                .cloned()
                .collect(),
        };
        shuffle(&mut self.view, &mut self.rng);
        if self.position >= self.view.len() {
            self.position = 0;
        }
    }

    pub fn current(&self) -> Option<&PhraseCard> {
        self.view.get(self.position)
    }

    pub fn advance(&mut self) {
        if self.view.is_empty() {
            return;
        }
        self.position = (self.position + 1) % self.view.len();
    }

    pub fn retreat(&mut self) {
        if self.view.is_empty() {
            return;
        }
        self.position = if self.position == 0 {
            self.view.len() - 1
        } else {
            self.position - 1
        };
    }

    pub fn toggle_known(&mut self, id: CardId) -> Toggle {
        if self.known.remove(&id) {
            let score = self.score.saturating_sub(POINTS_PER_CARD);
            let delta = score as i64 - self.score as i64;
            self.score = score;
            Toggle {
                known: false,
                delta,
            }
        } else {
            self.known.insert(id);
            let score = self.score.saturating_add(POINTS_PER_CARD);
            let delta = score as i64 - self.score as i64;
            self.score = score;
            Toggle { known: true, delta }
        }
    }

    /// Forget every known card and zero the score.
    pub fn reset(&mut self) {
        self.known.clear();
        self.score = 0;
        self.rebuild_view();
    }

    pub fn is_known(&self, id: CardId) -> bool {
        self.known.contains(&id)
    }

    pub fn known(&self) -> &HashSet<CardId> {
        &self.known
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn deck(&self) -> &[PhraseCard] {
        &self.deck
    }

    pub fn view(&self) -> &[PhraseCard] {
        &self.view
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Percentage of the deck that is known, rounded to the nearest integer.
    pub fn percent_known(&self) -> u32 {
        if self.deck.is_empty() {
            return 0;
        }
        let percent = self.known.len() as f64 / self.deck.len() as f64 * 100.0;
        percent.round() as u32
    }
}

/// Fisher-Yates shuffle.
fn shuffle<T>(items: &mut [T], rng: &mut StdRng) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
