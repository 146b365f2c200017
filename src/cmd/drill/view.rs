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

use maud::Markup;
use maud::html;

use crate::deck::DeckManager;
use crate::session::Notice;
use crate::session::Session;
use crate::session::SessionState;
use crate::types::card::PhraseCard;
use crate::types::filter::FilterMode;

/// Describe the page for the session's current state.
pub fn render(session: &Session, notices: &[Notice]) -> Markup {
    let deck = session.deck();
    let main = match session.state() {
        SessionState::NoDeck => upload_section(),
        SessionState::AtCard => match deck.current() {
            Some(card) => card_section(session, card),
            None => exhausted_section(),
        },
        SessionState::Exhausted => exhausted_section(),
    };
    let loaded = session.state() != SessionState::NoDeck;
    html! {
        div.root {
            @if loaded {
                (progress_section(deck))
                (filter_section(deck.filter()))
            }
            (main)
            @if loaded {
                div.footer {
                    (upload_form())
                }
            }
            @if session.confirming_reset() {
                (reset_dialog())
            }
            @for notice in notices {
                div class=(format!("toast {}", notice.kind.as_str())) {
                    (notice.message)
                }
            }
        }
    }
}

fn upload_section() -> Markup {
    html! {
        div.upload {
            h1 { "Darija Flashcards" }
            p { "Upload a CSV file with Darija phrases in the first column and English in the second." }
            (upload_form())
            form action="/" method="post" {
                button id="load-full" type="submit" name="action" value="LoadFull" {
                    "Load Full Dataset"
                }
            }
        }
    }
}

fn upload_form() -> Markup {
    html! {
        form action="/upload" method="post" enctype="multipart/form-data" {
            input id="csv-file" type="file" name="file" accept=".csv,text/csv";
            button id="upload" type="submit" { "Upload" }
        }
    }
}

fn progress_section(deck: &DeckManager) -> Markup {
    let known = deck.known().len();
    let total = deck.deck().len();
    let percent = deck.percent_known();
    html! {
        div.progress {
            div.stat {
                span.label { "Score" }
                span #score { (deck.score()) }
            }
            div.stat {
                span.label { "Known" }
                span #known-count { (known) }
            }
            div.stat {
                span.label { "Progress" }
                span #progress-percent { (format!("{percent}%")) }
                span #progress-text { (format!("{known} / {total}")) }
            }
            div.bar {
                div.fill style=(format!("width: {percent}%;")) {}
            }
            form action="/" method="post" {
                button id="reset" type="submit" name="action" value="Reset" { "Reset Progress" }
            }
        }
    }
}

fn filter_section(mode: FilterMode) -> Markup {
    html! {
        form.filters action="/" method="post" {
            button.active[mode == FilterMode::UnknownOnly] id="show-unknown" type="submit" name="action" value="ShowUnknown" {
                "Show Unknown Only"
            }
            button.active[mode == FilterMode::All] id="show-all" type="submit" name="action" value="ShowAll" {
                "Show All Cards"
            }
        }
    }
}

fn card_section(session: &Session, card: &PhraseCard) -> Markup {
    let deck = session.deck();
    let flipped = session.flipped();
    let pending = session.pending().is_some();
    let counter = format!("{} / {}", deck.position() + 1, deck.view().len());
    let known = deck.is_known(card.id());
    html! {
        div.card .flipped[flipped] .pending[pending] {
            div.header {
                div.counter { (counter) }
            }
            div.content {
                div.front {
                    p.darija dir="rtl" lang="ar" { (card.darija()) }
                }
                div.back {
                    @if flipped {
                        p.english { (card.english()) }
                    }
                }
            }
            div.controls {
                form action="/" method="post" {
                    button id="previous" type="submit" name="action" value="Previous" { "Previous" }
                    button id="flip" type="submit" name="action" value="Flip" { "Flip" }
                    @if known {
                        button.unknown id="mark" type="submit" name="action" value="MarkKnown" { "Mark Unknown" }
                    } @else {
                        button.known id="mark" type="submit" name="action" value="MarkKnown" { "I Know This" }
                    }
                    button id="next" type="submit" name="action" value="Next" { "Next" }
                }
            }
        }
    }
}

fn exhausted_section() -> Markup {
    html! {
        div.finished {
            h2 { "Congratulations!" }
            p { "You know all the sentences! Click \"Show All Cards\" to review them again." }
            form action="/" method="post" {
                button id="exhausted-show-all" type="submit" name="action" value="ShowAll" { "Show All Cards" }
            }
        }
    }
}

fn reset_dialog() -> Markup {
    html! {
        div.dialog {
            p { "Are you sure you want to reset all progress? This action cannot be undone." }
            form action="/" method="post" {
                button id="confirm-reset" type="submit" name="action" value="ConfirmReset" { "Reset" }
                button id="cancel-reset" type="submit" name="action" value="CancelReset" { "Cancel" }
            }
        }
    }
}
