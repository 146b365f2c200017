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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::session::RebuildToken;
use crate::session::Session;
use crate::source::DatasetSource;

#[derive(Clone)]
pub struct ServerState {
    pub source: DatasetSource,
    pub rebuild_delay: Duration,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub session: Session,
    /// The timer for the session's pending rebuild, if any.
    pub timer: Option<JoinHandle<()>>,
}

impl ServerState {
    pub fn lock(&self) -> MutexGuard<'_, MutableState> {
        match self.mutable.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Start the timer for a rebuild, replacing any earlier one.
    pub fn schedule_rebuild(&self, mutable: &mut MutableState, token: RebuildToken) {
        mutable.cancel_timer();
        let state = self.clone();
        let delay = self.rebuild_delay;
        log::debug!("Rebuilding view in {}ms.", delay.as_millis());
        mutable.timer = Some(tokio::spawn(async move {
            sleep(delay).await;
            let mut mutable = state.lock();
            if mutable.session.fire_rebuild(token) {
                mutable.timer = None;
            }
        }));
    }
}

impl MutableState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            timer: None,
        }
    }

    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Abort the timer if the session no longer has a rebuild pending.
    pub fn sync_timer(&mut self) {
        if self.session.pending().is_none() {
            self.cancel_timer();
        }
    }
}
