// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{info, warn};

use super::{CanvasConfig, CanvasError, Export, Notice};
use crate::format::{
    decode_import, encode_json, encode_plain_text, export_file_name, ExportFormat,
};
use crate::model::{AnswerStore, Catalog, SessionId};
use crate::query::{filter_blocks, progress, BlockMatch, Progress};
use crate::session::{resolve_session, Address, ResolvedSession, TabStorage};
use crate::store::{LocalMirror, RemoteStore};
use crate::sync::{AutosaveOutcome, ReloadOutcome, SyncController, SyncError};

pub type SharedMirror = Arc<dyn LocalMirror + Send + Sync>;
pub type SharedRemote = Arc<dyn RemoteStore>;

/// One open session of the questionnaire.
pub struct Canvas {
    catalog: Arc<Catalog>,
    address: Address,
    resolved: ResolvedSession,
    answers: AnswerStore,
    mirror: SharedMirror,
    sync: SyncController<SharedRemote>,
}

impl Canvas {
    /// Resolves the session for `address` and seeds the answers from the local mirror.
    ///
    /// Nothing remote happens until [`Canvas::start`].
    pub fn open(
        config: CanvasConfig,
        mut address: Address,
        tab: &dyn TabStorage,
        mirror: SharedMirror,
        remote: SharedRemote,
    ) -> Self {
        let resolved = resolve_session(&mut address, tab);
        let answers = mirror.load(&resolved.session_id);
        let sync = SyncController::new(resolved.session_id.clone(), remote, config.autosave_delay);
        info!(session = %resolved.session_id, source = ?resolved.source, "canvas opened");
        Self {
            catalog: config.catalog,
            address,
            resolved,
            answers,
            mirror,
            sync,
        }
    }

    /// Runs the remote startup sequence; remote answers, if any, replace the local ones.
    pub async fn start(&mut self) {
        if let Some(remote_answers) = self.sync.start().await {
            self.install(remote_answers, Instant::now());
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session_id(&self) -> &SessionId {
        &self.resolved.session_id
    }

    pub fn resolved_session(&self) -> &ResolvedSession {
        &self.resolved
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn sync(&self) -> &SyncController<SharedRemote> {
        &self.sync
    }

    /// The current address, carrying `sid` in both query and fragment.
    pub fn share_link(&self) -> String {
        self.address.to_string()
    }

    pub fn progress(&self) -> Progress {
        progress(&self.catalog, &self.answers)
    }

    pub fn answered_for_cell(&self, cell_id: &str) -> usize {
        self.answers.count_answered_for_cell(cell_id)
    }

    pub fn search(&self, query: &str) -> Vec<BlockMatch<'_>> {
        filter_blocks(&self.catalog, &self.answers, query)
    }

    /// Stores one answer, writes the mirror and restarts the autosave timer.
    ///
    /// The cell id is not checked against the catalog.
    pub fn set_answer(&mut self, cell_id: &str, question_index: usize, text: impl Into<String>) {
        self.set_answer_at(cell_id, question_index, text, Instant::now());
    }

    pub fn set_answer_at(
        &mut self,
        cell_id: &str,
        question_index: usize,
        text: impl Into<String>,
        now: Instant,
    ) {
        self.answers.set_answer(cell_id, question_index, text);
        self.write_mirror();
        self.sync.notify_changed(now);
    }

    /// Replaces every answer from an external source. The mirror is written, and the
    /// next autosave attempt is skipped.
    pub fn replace_all(&mut self, answers: AnswerStore) {
        self.replace_all_at(answers, Instant::now());
    }

    pub fn replace_all_at(&mut self, answers: AnswerStore, now: Instant) {
        self.sync.suppress_next_autosave();
        self.install(answers, now);
    }

    fn install(&mut self, answers: AnswerStore, now: Instant) {
        self.answers = answers;
        self.write_mirror();
        self.sync.notify_changed(now);
    }

    fn write_mirror(&self) {
        if let Err(err) = self.mirror.save(self.session_id(), &self.answers) {
            warn!(session = %self.session_id(), error = %err, "local mirror write failed");
        }
    }

    /// Clears every answer locally. The remote document is left alone.
    pub fn reset_all(&mut self) {
        if let Err(err) = self.mirror.remove(self.session_id()) {
            warn!(session = %self.session_id(), error = %err, "local mirror entry not removed");
        }
        self.replace_all(AnswerStore::new());
        info!(session = %self.session_id(), "answers reset");
    }

    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.sync.autosave_deadline()
    }

    /// Fires the autosave attempt when its deadline has passed.
    pub async fn tick(&self, now: Instant) -> AutosaveOutcome {
        self.sync.run_autosave_if_due(now, &self.answers).await
    }

    /// Fires a pending autosave attempt now; used before shutting down.
    pub async fn flush_autosave(&self) -> AutosaveOutcome {
        self.sync.flush_autosave(&self.answers).await
    }

    pub async fn manual_save(&self) -> Notice {
        self.manual_save_at(Utc::now()).await
    }

    pub async fn manual_save_at(&self, client_time: DateTime<Utc>) -> Notice {
        match self.sync.manual_save(&self.answers, client_time).await {
            Ok(()) => Notice::Saved,
            Err(SyncError::Busy) => Notice::Busy,
            Err(SyncError::Remote(err)) => {
                warn!(session = %self.session_id(), error = %err, "manual save failed");
                Notice::SaveFailed(err.to_string())
            }
        }
    }

    /// Replaces the answers with the remote copy. Confirmation is the caller's job.
    pub async fn manual_reload(&mut self) -> Notice {
        match self.sync.manual_reload().await {
            Ok(ReloadOutcome::Reloaded(answers)) => {
                self.install(answers, Instant::now());
                Notice::Reloaded
            }
            Ok(ReloadOutcome::NothingToReload) => Notice::NothingToReload,
            Err(SyncError::Busy) => Notice::Busy,
            Err(SyncError::Remote(err)) => {
                warn!(session = %self.session_id(), error = %err, "manual reload failed");
                Notice::ReloadFailed(err.to_string())
            }
        }
    }

    pub fn export(&self, format: ExportFormat, now: DateTime<Utc>) -> Result<Export, CanvasError> {
        let contents = match format {
            ExportFormat::Text => encode_plain_text(&self.catalog, &self.answers, now),
            ExportFormat::Json => encode_json(&self.answers, self.session_id(), now)?,
        };
        Ok(Export {
            format,
            file_name: export_file_name(self.catalog.export_file_stem(), format, now.date_naive()),
            contents,
        })
    }

    /// Writes an export into `dir` under its dated file name.
    pub async fn export_to_dir(
        &self,
        format: ExportFormat,
        dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, CanvasError> {
        let export = self.export(format, now)?;
        let path = dir.join(&export.file_name);
        tokio::fs::write(&path, export.contents.as_bytes())
            .await
            .map_err(|source| CanvasError::WriteExport {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Decodes a backup and, on success, replaces every answer with it.
    ///
    /// On failure the answers are untouched.
    pub fn import(&mut self, file_name: &str, contents: &str) -> Result<(), CanvasError> {
        let answers = decode_import(&self.catalog, file_name, contents)?;
        self.replace_all(answers);
        info!(session = %self.session_id(), file = file_name, "answers imported");
        Ok(())
    }

    pub async fn import_file(&mut self, path: &Path) -> Result<(), CanvasError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CanvasError::ReadImport {
                    path: path.to_path_buf(),
                    source,
                })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.import(&file_name, &contents)
    }
}
