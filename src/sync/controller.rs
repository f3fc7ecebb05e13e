// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::scheduler::AutosaveScheduler;
use crate::model::{AnswerStore, SessionId};
use crate::store::{DocumentPatch, RemoteError, RemoteStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Uninitialized,
    AuthPending,
    LoadingInitial,
    Ready,
}

/// Which manual operation, if any, is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BusyState {
    #[default]
    Idle,
    Saving,
    Reloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveOutcome {
    /// No timer armed, or not yet expired.
    NotDue,
    /// Fired before the startup sequence finished; dropped.
    NotReady,
    /// Fired right after an external overwrite; skipped once.
    Suppressed,
    Saved,
    /// The write failed; the error was logged.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded(AnswerStore),
    NothingToReload,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("another save or reload is still running")]
    Busy,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug)]
struct SyncState {
    phase: SyncPhase,
    ready: bool,
    suppress_next_autosave: bool,
    busy: BusyState,
    scheduler: AutosaveScheduler,
}

/// Remote side of one session: startup load, debounced autosave, manual save/reload.
///
/// One controller per session id; a new session gets a new controller, which resets the
/// readiness and suppression flags. Methods take `&self` so an `Arc`-shared controller
/// can run a manual operation while other callers observe [`SyncController::busy`].
/// The internal lock is never held across a remote call.
#[derive(Debug)]
pub struct SyncController<R> {
    session_id: SessionId,
    remote: R,
    state: Mutex<SyncState>,
}

struct BusyGuard<'a> {
    state: &'a Mutex<SyncState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        lock_state(self.state).busy = BusyState::Idle;
    }
}

fn lock_state(state: &Mutex<SyncState>) -> MutexGuard<'_, SyncState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<R: RemoteStore> SyncController<R> {
    pub fn new(session_id: SessionId, remote: R, autosave_delay: Duration) -> Self {
        Self {
            session_id,
            remote,
            state: Mutex::new(SyncState {
                phase: SyncPhase::Uninitialized,
                ready: false,
                suppress_next_autosave: false,
                busy: BusyState::Idle,
                scheduler: AutosaveScheduler::new(autosave_delay),
            }),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn phase(&self) -> SyncPhase {
        self.lock().phase
    }

    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    pub fn is_autosave_suppressed(&self) -> bool {
        self.lock().suppress_next_autosave
    }

    pub fn busy(&self) -> BusyState {
        self.lock().busy
    }

    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.lock().scheduler.deadline()
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        lock_state(&self.state)
    }

    fn set_phase(&self, phase: SyncPhase) {
        debug!(session = %self.session_id, ?phase, "sync phase");
        self.lock().phase = phase;
    }

    /// Confirms an anonymous identity, then reads the session document once.
    ///
    /// Returns the remote answers when the document holds a well-formed mapping; the
    /// suppression flag is set first so the caller's write-through does not echo them
    /// back. Failures are logged and swallowed. Readiness is set on every path. Calls
    /// after the first are no-ops returning `None`.
    pub async fn start(&self) -> Option<AnswerStore> {
        {
            let mut state = self.lock();
            if state.phase != SyncPhase::Uninitialized {
                return None;
            }
            state.phase = SyncPhase::AuthPending;
        }

        let loaded = match self.remote.ensure_identity().await {
            Ok(identity) => {
                debug!(session = %self.session_id, uid = %identity.uid, "remote identity confirmed");
                self.set_phase(SyncPhase::LoadingInitial);
                self.initial_load().await
            }
            Err(err) => {
                warn!(session = %self.session_id, error = %err, "remote sign-in failed; continuing offline");
                None
            }
        };

        let mut state = self.lock();
        if loaded.is_some() {
            state.suppress_next_autosave = true;
        }
        state.phase = SyncPhase::Ready;
        state.ready = true;
        loaded
    }

    async fn initial_load(&self) -> Option<AnswerStore> {
        match self.remote.get(&self.session_id).await {
            Ok(Some(document)) => {
                let answers = document.answer_store();
                if answers.is_none() {
                    warn!(session = %self.session_id, "remote document has no usable answers; keeping local state");
                } else {
                    info!(session = %self.session_id, "loaded answers from remote");
                }
                answers
            }
            Ok(None) => {
                debug!(session = %self.session_id, "no remote document yet");
                None
            }
            Err(err) => {
                warn!(session = %self.session_id, error = %err, "initial remote load failed");
                None
            }
        }
    }

    /// Restarts the debounce timer; returns the new deadline.
    pub fn notify_changed(&self, now: Instant) -> Instant {
        self.lock().scheduler.notify_changed(now)
    }

    /// Makes the next autosave attempt skip its write.
    pub fn suppress_next_autosave(&self) {
        self.lock().suppress_next_autosave = true;
    }

    /// Runs the autosave attempt if the debounce deadline has passed by `now`.
    pub async fn run_autosave_if_due(&self, now: Instant, answers: &AnswerStore) -> AutosaveOutcome {
        let due = self.lock().scheduler.take_due(now);
        if !due {
            return AutosaveOutcome::NotDue;
        }
        self.autosave(answers).await
    }

    /// Runs a pending autosave attempt immediately, whether or not it is due.
    pub async fn flush_autosave(&self, answers: &AnswerStore) -> AutosaveOutcome {
        let pending = self.lock().scheduler.take_pending();
        if !pending {
            return AutosaveOutcome::NotDue;
        }
        self.autosave(answers).await
    }

    async fn autosave(&self, answers: &AnswerStore) -> AutosaveOutcome {
        {
            let mut state = self.lock();
            if !state.ready {
                debug!(session = %self.session_id, "autosave skipped: startup still running");
                return AutosaveOutcome::NotReady;
            }
            if state.suppress_next_autosave {
                state.suppress_next_autosave = false;
                debug!(session = %self.session_id, "autosave skipped once after external load");
                return AutosaveOutcome::Suppressed;
            }
        }

        let patch = DocumentPatch {
            answers: answers.clone(),
            manual_save_at: None,
        };
        match self.remote.merge_set(&self.session_id, &patch).await {
            Ok(()) => {
                debug!(session = %self.session_id, "autosaved");
                AutosaveOutcome::Saved
            }
            Err(err) => {
                warn!(session = %self.session_id, error = %err, "autosave failed");
                AutosaveOutcome::Failed
            }
        }
    }

    fn begin(&self, busy: BusyState) -> Result<BusyGuard<'_>, SyncError> {
        let mut state = self.lock();
        if state.busy != BusyState::Idle {
            return Err(SyncError::Busy);
        }
        state.busy = busy;
        Ok(BusyGuard { state: &self.state })
    }

    /// Immediate write including the client's wall-clock time. Busy is cleared on
    /// every exit path.
    pub async fn manual_save(
        &self,
        answers: &AnswerStore,
        client_time: DateTime<Utc>,
    ) -> Result<(), SyncError> {
        let _busy = self.begin(BusyState::Saving)?;
        let patch = DocumentPatch {
            answers: answers.clone(),
            manual_save_at: Some(client_time),
        };
        self.remote.merge_set(&self.session_id, &patch).await?;
        info!(session = %self.session_id, "manual save complete");
        Ok(())
    }

    /// Fetches the session document. On success the suppression flag is set before the
    /// answers are handed back; a malformed `answers` field reloads as an empty store.
    pub async fn manual_reload(&self) -> Result<ReloadOutcome, SyncError> {
        let _busy = self.begin(BusyState::Reloading)?;
        let Some(document) = self.remote.get(&self.session_id).await? else {
            return Ok(ReloadOutcome::NothingToReload);
        };

        let answers = document.answer_store().unwrap_or_else(|| {
            if document.answers.is_some() {
                warn!(session = %self.session_id, "remote answers malformed; reloading as empty");
            }
            AnswerStore::new()
        });
        self.suppress_next_autosave();
        info!(session = %self.session_id, "manual reload complete");
        Ok(ReloadOutcome::Reloaded(answers))
    }
}
