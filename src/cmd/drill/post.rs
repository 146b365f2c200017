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

use axum::Form;
use axum::extract::Multipart;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::drill::state::ServerState;
use crate::error::Fallible;
use crate::error::LoadError;
use crate::source::decode_text;
use crate::types::filter::FilterMode;

#[derive(Debug, Deserialize)]
enum Action {
    Flip,
    Next,
    Previous,
    MarkKnown,
    ShowUnknown,
    ShowAll,
    Reset,
    ConfirmReset,
    CancelReset,
    LoadFull,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(state, form.action).await {
        Ok(_) => {}
        Err(e) => {
            log::error!("error: {e}");
        }
    }
    Redirect::to("/")
}

async fn action_handler(state: ServerState, action: Action) -> Fallible<()> {
    if let Action::LoadFull = action {
        log::debug!("Loading dataset from {}", state.source);
        let result = state.source.fetch().await;
        let mut mutable = state.lock();
        match result {
            Ok(text) => {
                if let Err(e) = mutable.session.load_text(&text) {
                    log::debug!("Rejected full dataset: {e}");
                }
            }
            Err(e) => mutable.session.notify_load_error(&e),
        }
        mutable.sync_timer();
        return Ok(());
    }
    let mut mutable = state.lock();
    let session = &mut mutable.session;
    let result = match action {
        Action::Flip => {
            session.flip();
            Ok(())
        }
        Action::Next => {
            session.next();
            Ok(())
        }
        Action::Previous => {
            session.previous();
            Ok(())
        }
        Action::MarkKnown => match session.mark_known() {
            Ok(Some(token)) => {
                state.schedule_rebuild(&mut mutable, token);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        },
        Action::ShowUnknown => {
            session.set_filter_mode(FilterMode::UnknownOnly);
            Ok(())
        }
        Action::ShowAll => {
            session.set_filter_mode(FilterMode::All);
            Ok(())
        }
        Action::Reset => {
            session.request_reset();
            Ok(())
        }
        Action::ConfirmReset => session.confirm_reset(),
        Action::CancelReset => {
            session.cancel_reset();
            Ok(())
        }
        Action::LoadFull => Ok(()),
    };
    mutable.sync_timer();
    result
}

pub async fn upload_handler(State(state): State<ServerState>, multipart: Multipart) -> Redirect {
    let result = read_upload(multipart).await;
    let mut mutable = state.lock();
    match result {
        Ok(text) => {
            if let Err(e) = mutable.session.load_text(&text) {
                log::debug!("Rejected uploaded dataset: {e}");
            }
        }
        Err(e) => mutable.session.notify_load_error(&e),
    }
    mutable.sync_timer();
    Redirect::to("/")
}

/// Read the `file` field of an upload form.
async fn read_upload(mut multipart: Multipart) -> Result<String, LoadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LoadError::FileRead(e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| LoadError::FileRead(e.to_string()))?;
            return Ok(decode_text(&bytes));
        }
    }
    Err(LoadError::FileRead("no file in upload".to_string()))
}
