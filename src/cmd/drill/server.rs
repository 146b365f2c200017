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
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::signal;
use tokio::time::sleep;

use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::post::upload_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::config::Config;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;
use crate::progress::ProgressStore;
use crate::session::Session;
use crate::source::DatasetSource;

/// Minimum horizontal travel, in pixels, for a swipe to change cards.
pub const SWIPE_THRESHOLD: u32 = 50;

/// Uploads can hold the full dataset.
const UPLOAD_LIMIT: usize = 64 * 1024 * 1024;

pub const DATABASE_FILE: &str = "darija.db";

pub async fn start_server(directory: PathBuf, config: Config) -> Fallible<()> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }

    let db = Database::new(&directory.join(DATABASE_FILE))?;
    let mut session = Session::new(ProgressStore::new(db));

    let source = match &config.dataset_url {
        Some(url) => DatasetSource::Url(url.clone()),
        None => DatasetSource::File(directory.join(&config.dataset)),
    };

    // The default dataset is optional: without it, the learner uploads one.
    log::debug!("Loading default dataset from {source}...");
    let start = Instant::now();
    match source.fetch().await {
        Ok(text) => {
            if session.load_text(&text).is_ok() {
                let duration = start.elapsed().as_millis();
                log::debug!("Dataset loaded in {duration}ms.");
            }
        }
        Err(e) => {
            log::debug!("Default dataset unavailable: {e}");
        }
    }

    let state = ServerState {
        source,
        rebuild_delay: config.rebuild_delay,
        mutable: Arc::new(Mutex::new(MutableState::new(session))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler).post(post_handler));
    let app = app.route(
        "/upload",
        post(upload_handler).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
    );
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("127.0.0.1:{}", config.port);

    if config.open_browser {
        let url = format!("http://{bind}/");
        let bind = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&bind).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(&url) {
                log::warn!("Could not open browser: {e}");
            }
        });
    }

    log::debug!("Starting server on {bind}");
    println!("Serving on http://{bind}/");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::debug!("Shutting down.");
}

async fn script(
    State(state): State<ServerState>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let mut content = String::new();
    content.push_str(&format!("const SWIPE_THRESHOLD = {SWIPE_THRESHOLD};\n"));
    content.push_str(&format!(
        "const REBUILD_DELAY_MS = {};\n",
        state.rebuild_delay.as_millis()
    ));
    content.push('\n');
    content.push_str(include_str!("script.js"));
    (StatusCode::OK, [(CONTENT_TYPE, "text/javascript")], content)
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
