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

use crate::deck::DeckManager;
use crate::error::Fallible;
use crate::error::LoadError;
use crate::parser::parse_cards;
use crate::progress::ProgressStore;
use crate::types::card::PhraseCard;
use crate::types::filter::FilterMode;

/// Where the learner is in the study flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoDeck,
    AtCard,
    /// Every card is known and only unknown cards are shown.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        }
    }
}

/// A message for the learner.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

/// Identifies one scheduled rebuild of the active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildToken(u64);

/// Turns learner actions into changes to the deck and the stored progress.
pub struct Session {
    deck: DeckManager,
    store: ProgressStore,
    loaded: bool,
    flipped: bool,
    confirming_reset: bool,
    notices: Vec<Notice>,
    pending: Option<RebuildToken>,
    generation: u64,
}

impl Session {
    /// Start a session with the stored progress restored.
    pub fn new(store: ProgressStore) -> Self {
        let progress = store.load();
        log::debug!(
            "Restored progress: {} known, score {}",
            progress.known.len(),
            progress.score
        );
        Self::with_deck(store, DeckManager::new(progress.known, progress.score))
    }

    pub fn with_deck(store: ProgressStore, deck: DeckManager) -> Self {
        Self {
            deck,
            store,
            loaded: false,
            flipped: false,
            confirming_reset: false,
            notices: Vec::new(),
            pending: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        if !self.loaded {
            SessionState::NoDeck
        } else if self.deck.view().is_empty() {
            SessionState::Exhausted
        } else {
            SessionState::AtCard
        }
    }

    /// Parse CSV text and, if it holds any cards, replace the deck with them.
    /// On failure the current deck is kept.
    pub fn load_text(&mut self, text: &str) -> Result<usize, LoadError> {
        match parse_cards(text) {
            Ok(cards) => {
                let count = cards.len();
                self.load_deck(cards);
                Ok(count)
            }
            Err(e) => {
                self.notify_load_error(&e);
                Err(e)
            }
        }
    }

    pub fn load_deck(&mut self, cards: Vec<PhraseCard>) {
        self.cancel_pending();
        let count = cards.len();
        let dropped = self.deck.load_deck(cards);
        if dropped > 0 {
            log::warn!("Dropped {dropped} known ids that are not in the new deck.");
            self.persist();
        }
        self.loaded = true;
        self.flipped = false;
        log::debug!("Loaded {count} cards.");
        self.notify(
            format!("Loaded {count} sentences successfully!"),
            NoticeKind::Success,
        );
        self.notify_if_exhausted();
    }

    pub fn notify_load_error(&mut self, error: &LoadError) {
        log::error!("{error}");
        self.notify(error.notice(), NoticeKind::Error);
    }

    pub fn flip(&mut self) {
        if self.state() == SessionState::AtCard {
            self.flipped = !self.flipped;
        }
    }

    pub fn next(&mut self) {
        self.deck.advance();
        self.flipped = false;
    }

    pub fn previous(&mut self) {
        self.deck.retreat();
        self.flipped = false;
    }

    /// Toggle the current card's known state. When a card becomes known while
    /// only unknown cards are shown, returns a token for the rebuild that
    /// will remove it from the view; the caller fires it after a delay.
    pub fn mark_known(&mut self) -> Fallible<Option<RebuildToken>> {
        let id = match self.deck.current() {
            Some(card) => card.id(),
            None => return Ok(None),
        };
        self.cancel_pending();
        let toggle = self.deck.toggle_known(id);
        log::debug!(
            "Card {id} known={} ({:+} points).",
            toggle.known,
            toggle.delta
        );
        if toggle.known {
            self.notify("Great job! +10 points", NoticeKind::Success);
        } else {
            self.notify("Marked as unknown. -10 points", NoticeKind::Info);
        }
        self.flipped = false;
        self.store.save(self.deck.known(), self.deck.score())?;
        if toggle.known && self.deck.filter() == FilterMode::UnknownOnly {
            self.generation += 1;
            let token = RebuildToken(self.generation);
            self.pending = Some(token);
            return Ok(Some(token));
        }
        Ok(None)
    }

    /// Run a scheduled rebuild. Returns false if it was cancelled.
    pub fn fire_rebuild(&mut self, token: RebuildToken) -> bool {
        if self.pending != Some(token) {
            log::debug!("Ignoring cancelled rebuild.");
            return false;
        }
        self.pending = None;
        self.deck.rebuild_view();
        self.flipped = false;
        self.notify_if_exhausted();
        true
    }

    /// Forget any scheduled rebuild. Returns whether one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<RebuildToken> {
        self.pending
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.cancel_pending();
        self.deck.set_filter_mode(mode);
        self.flipped = false;
        self.notify_if_exhausted();
    }

    /// Ask the learner to confirm a reset.
    pub fn request_reset(&mut self) {
        self.confirming_reset = true;
    }

    pub fn cancel_reset(&mut self) {
        self.confirming_reset = false;
    }

    /// Clear all progress. Does nothing unless a reset was requested.
    pub fn confirm_reset(&mut self) -> Fallible<()> {
        if !self.confirming_reset {
            return Ok(());
        }
        self.confirming_reset = false;
        self.cancel_pending();
        self.deck.reset();
        self.flipped = false;
        self.store.save(self.deck.known(), self.deck.score())?;
        self.notify("Progress reset successfully!", NoticeKind::Info);
        Ok(())
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn deck(&self) -> &DeckManager {
        &self.deck
    }

    pub fn flipped(&self) -> bool {
        self.flipped
    }

    pub fn confirming_reset(&self) -> bool {
        self.confirming_reset
    }

    fn notify(&mut self, message: impl Into<String>, kind: NoticeKind) {
        self.notices.push(Notice {
            message: message.into(),
            kind,
        });
    }

    fn notify_if_exhausted(&mut self) {
        if self.state() == SessionState::Exhausted {
            self.notify("You know all the sentences!", NoticeKind::Success);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(self.deck.known(), self.deck.score()) {
            log::error!("Failed to save progress: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::db::Database;
    use crate::types::card::CardId;

    const CSV: &str = "darija,english\nsalam,hello\nshukran,thank you\nbslama,goodbye\n";

    fn session_with(db: &Database, known: &[usize], score: u32) -> Session {
        let known: HashSet<CardId> = known.iter().map(|id| CardId::new(*id)).collect();
        let deck = DeckManager::with_rng(known, score, StdRng::seed_from_u64(7));
        Session::with_deck(ProgressStore::new(db.clone()), deck)
    }

    fn loaded(db: &Database) -> Session {
        let mut session = session_with(db, &[], 0);
        session.load_text(CSV).unwrap();
        session.take_notices();
        session
    }

    fn messages(session: &mut Session) -> Vec<String> {
        session
            .take_notices()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    #[test]
    fn test_starts_without_deck() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = session_with(&db, &[], 0);
        assert_eq!(session.state(), SessionState::NoDeck);
        session.next();
        session.flip();
        assert!(!session.flipped());
        assert_eq!(session.mark_known()?, None);
        Ok(())
    }

    #[test]
    fn test_load_text() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = session_with(&db, &[], 0);
        assert_eq!(session.load_text(CSV), Ok(3));
        assert_eq!(session.state(), SessionState::AtCard);
        assert_eq!(
            session.take_notices(),
            vec![Notice {
                message: "Loaded 3 sentences successfully!".to_string(),
                kind: NoticeKind::Success,
            }]
        );
        Ok(())
    }

    #[test]
    fn test_failed_load_keeps_deck() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        assert_eq!(session.load_text("nothing useful"), Err(LoadError::Parse));
        assert_eq!(session.deck().deck().len(), 3);
        assert_eq!(session.state(), SessionState::AtCard);
        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        Ok(())
    }

    #[test]
    fn test_flip_resets_on_navigation() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        session.flip();
        assert!(session.flipped());
        session.next();
        assert!(!session.flipped());
        session.flip();
        session.previous();
        assert!(!session.flipped());
        session.flip();
        session.flip();
        assert!(!session.flipped());
        Ok(())
    }

    #[test]
    fn test_mark_known_persists() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        let id = session.deck().current().unwrap().id();
        assert_eq!(session.mark_known()?, None);
        assert_eq!(messages(&mut session), vec!["Great job! +10 points"]);
        let progress = ProgressStore::new(db.clone()).load();
        assert!(progress.known.contains(&id));
        assert_eq!(progress.score, 10);

        session.mark_known()?;
        assert_eq!(messages(&mut session), vec!["Marked as unknown. -10 points"]);
        let progress = ProgressStore::new(db).load();
        assert!(progress.known.is_empty());
        assert_eq!(progress.score, 0);
        Ok(())
    }

    #[test]
    fn test_mark_known_under_filter_schedules_rebuild() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        session.set_filter_mode(FilterMode::UnknownOnly);
        let id = session.deck().current().unwrap().id();
        let token = session.mark_known()?.unwrap();
        // The card stays visible until the rebuild fires.
        assert_eq!(session.deck().current().unwrap().id(), id);
        assert_eq!(session.deck().view().len(), 3);
        assert!(session.fire_rebuild(token));
        assert_eq!(session.deck().view().len(), 2);
        assert!(session.deck().view().iter().all(|c| c.id() != id));
        Ok(())
    }

    #[test]
    fn test_unmark_cancels_rebuild() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        session.set_filter_mode(FilterMode::UnknownOnly);
        let token = session.mark_known()?.unwrap();
        assert_eq!(session.mark_known()?, None);
        assert_eq!(session.pending(), None);
        assert!(!session.fire_rebuild(token));
        assert_eq!(session.deck().score(), 0);
        Ok(())
    }

    #[test]
    fn test_marking_last_unknown_exhausts() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = session_with(&db, &[1, 2], 20);
        session.load_text(CSV).unwrap();
        session.set_filter_mode(FilterMode::UnknownOnly);
        session.take_notices();
        assert_eq!(session.deck().current().unwrap().id(), CardId::new(3));
        let token = session.mark_known()?.unwrap();
        assert_eq!(session.state(), SessionState::AtCard);
        assert!(session.fire_rebuild(token));
        assert_eq!(session.state(), SessionState::Exhausted);
        assert_eq!(
            messages(&mut session),
            vec!["Great job! +10 points", "You know all the sentences!"]
        );
        session.set_filter_mode(FilterMode::All);
        assert_eq!(session.state(), SessionState::AtCard);
        Ok(())
    }

    #[test]
    fn test_filter_change_cancels_rebuild() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        session.set_filter_mode(FilterMode::UnknownOnly);
        let token = session.mark_known()?.unwrap();
        session.set_filter_mode(FilterMode::All);
        assert_eq!(session.pending(), None);
        assert!(!session.fire_rebuild(token));
        Ok(())
    }

    #[test]
    fn test_second_mark_supersedes_first() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        session.set_filter_mode(FilterMode::UnknownOnly);
        let first = session.mark_known()?.unwrap();
        session.next();
        let second = session.mark_known()?.unwrap();
        assert_ne!(first, second);
        assert!(!session.fire_rebuild(first));
        assert!(session.fire_rebuild(second));
        assert_eq!(session.deck().view().len(), 1);
        Ok(())
    }

    #[test]
    fn test_navigation_keeps_pending_rebuild() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        session.set_filter_mode(FilterMode::UnknownOnly);
        let token = session.mark_known()?.unwrap();
        session.next();
        session.flip();
        assert_eq!(session.pending(), Some(token));
        Ok(())
    }

    #[test]
    fn test_reset_requires_confirmation() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = loaded(&db);
        session.mark_known()?;
        session.take_notices();
        session.confirm_reset()?;
        assert_eq!(session.deck().score(), 10);
        session.request_reset();
        session.cancel_reset();
        session.confirm_reset()?;
        assert_eq!(session.deck().score(), 10);
        assert!(session.take_notices().is_empty());
        Ok(())
    }

    #[test]
    fn test_reset() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = session_with(&db, &[1, 2, 3], 30);
        session.load_text(CSV).unwrap();
        session.set_filter_mode(FilterMode::UnknownOnly);
        assert_eq!(session.state(), SessionState::Exhausted);
        session.take_notices();
        session.request_reset();
        assert!(session.confirming_reset());
        session.confirm_reset()?;
        assert!(!session.confirming_reset());
        assert_eq!(session.state(), SessionState::AtCard);
        assert_eq!(session.deck().view().len(), 3);
        assert_eq!(messages(&mut session), vec!["Progress reset successfully!"]);
        let progress = ProgressStore::new(db).load();
        assert!(progress.known.is_empty());
        assert_eq!(progress.score, 0);
        Ok(())
    }

    #[test]
    fn test_reload_drops_stale_ids() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut session = session_with(&db, &[1, 40], 20);
        session.load_text(CSV).unwrap();
        assert_eq!(session.deck().known().len(), 1);
        let progress = ProgressStore::new(db).load();
        assert_eq!(progress.known, HashSet::from([CardId::new(1)]));
        assert_eq!(progress.score, 20);
        Ok(())
    }

    #[test]
    fn test_restores_stored_progress() -> Fallible<()> {
        let db = Database::in_memory()?;
        let store = ProgressStore::new(db.clone());
        store.save(&HashSet::from([CardId::new(2)]), 10)?;
        let mut session = Session::new(store);
        session.load_text(CSV).unwrap();
        assert!(session.deck().is_known(CardId::new(2)));
        assert_eq!(session.deck().score(), 10);
        Ok(())
    }
}
