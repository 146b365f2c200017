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

use maud::DOCTYPE;
use maud::Markup;
use maud::html;

const APP_NAME: &str = "Darija Flashcards";

/// The document title. Once a deck is loaded it carries the known count so
/// the tab shows progress.
pub fn page_title(known: usize, total: usize) -> String {
    if total == 0 {
        APP_NAME.to_string()
    } else {
        format!("{APP_NAME} ({known}/{total})")
    }
}

/// The page chrome is English and left-to-right. Darija phrases inside the
/// body declare their own `lang="ar"` and `dir="rtl"`.
pub fn page_template(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" dir="ltr" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="description" content="Flashcards for learning Moroccan Darija phrases.";
                meta name="color-scheme" content="light";
                title { (title) }
                link rel="stylesheet" href="/style.css";
            }
            body {
                (body)
                script src="/script.js" {};
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_title() {
        assert_eq!(page_title(0, 0), "Darija Flashcards");
        assert_eq!(page_title(3, 120), "Darija Flashcards (3/120)");
    }

    #[test]
    fn test_page_template() {
        let html = page_template("Darija Flashcards (1/2)", html! { p { "body" } }).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="en" dir="ltr">"#));
        assert!(html.contains("<title>Darija Flashcards (1/2)</title>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains(r#"<script src="/script.js"></script>"#));
    }
}
