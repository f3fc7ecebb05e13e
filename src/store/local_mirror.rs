// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Synchronous write-through copy of the answer store, one entry per session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use super::fs::{encode_persisted_key, read_if_exists, remove_if_exists, write_atomic};
use super::fs::{StoreError, WriteDurability};
use crate::model::{AnswerStore, SessionId};

/// Prefix of every local mirror key; the session id follows it.
pub const LOCAL_KEY_PREFIX: &str = "canvas_answers_";

pub fn local_key(session_id: &SessionId) -> String {
    format!("{LOCAL_KEY_PREFIX}{session_id}")
}

/// Local persistence of answers keyed by session.
///
/// `load` never fails: a missing or unreadable entry yields an empty store, so a corrupt
/// mirror cannot block startup.
pub trait LocalMirror {
    fn save(&self, session_id: &SessionId, answers: &AnswerStore) -> Result<(), StoreError>;

    fn load(&self, session_id: &SessionId) -> AnswerStore;

    fn remove(&self, session_id: &SessionId) -> Result<(), StoreError>;
}

/// One JSON file per session under a directory.
#[derive(Debug, Clone)]
pub struct FolderMirror {
    root: PathBuf,
    durability: WriteDurability,
}

impl FolderMirror {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, session_id: &SessionId) -> PathBuf {
        let stem = encode_persisted_key(&local_key(session_id));
        self.root.join(format!("{stem}.json"))
    }

    fn try_load(&self, session_id: &SessionId) -> Result<Option<AnswerStore>, StoreError> {
        let path = self.entry_path(session_id);
        let Some(raw) = read_if_exists(&path)? else {
            return Ok(None);
        };
        let answers =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json { path, source })?;
        Ok(Some(answers))
    }
}

impl LocalMirror for FolderMirror {
    fn save(&self, session_id: &SessionId, answers: &AnswerStore) -> Result<(), StoreError> {
        let path = self.entry_path(session_id);
        let raw = serde_json::to_vec(answers).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(&self.root, &path, &raw, self.durability)
    }

    fn load(&self, session_id: &SessionId) -> AnswerStore {
        match self.try_load(session_id) {
            Ok(answers) => answers.unwrap_or_default(),
            Err(err) => {
                warn!(session = %session_id, error = %err, "local mirror unreadable; starting empty");
                AnswerStore::new()
            }
        }
    }

    fn remove(&self, session_id: &SessionId) -> Result<(), StoreError> {
        remove_if_exists(&self.entry_path(session_id))
    }
}

/// In-process mirror holding the raw JSON text per key.
#[derive(Debug, Default)]
pub struct MemoryMirror {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text for a session, as written by `save`.
    pub fn raw(&self, session_id: &SessionId) -> Option<String> {
        self.lock().get(&local_key(session_id)).cloned()
    }

    /// Stores arbitrary text for a session, bypassing serialization.
    pub fn put_raw(&self, session_id: &SessionId, raw: impl Into<String>) {
        self.lock().insert(local_key(session_id), raw.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LocalMirror for MemoryMirror {
    fn save(&self, session_id: &SessionId, answers: &AnswerStore) -> Result<(), StoreError> {
        let raw = serde_json::to_string(answers).map_err(|source| StoreError::Json {
            path: PathBuf::from(local_key(session_id)),
            source,
        })?;
        self.lock().insert(local_key(session_id), raw);
        Ok(())
    }

    fn load(&self, session_id: &SessionId) -> AnswerStore {
        let Some(raw) = self.raw(session_id) else {
            return AnswerStore::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(session = %session_id, error = %err, "local mirror unreadable; starting empty");
            AnswerStore::new()
        })
    }

    fn remove(&self, session_id: &SessionId) -> Result<(), StoreError> {
        self.lock().remove(&local_key(session_id));
        Ok(())
    }
}

impl<M: LocalMirror + ?Sized> LocalMirror for std::sync::Arc<M> {
    fn save(&self, session_id: &SessionId, answers: &AnswerStore) -> Result<(), StoreError> {
        (**self).save(session_id, answers)
    }

    fn load(&self, session_id: &SessionId) -> AnswerStore {
        (**self).load(session_id)
    }

    fn remove(&self, session_id: &SessionId) -> Result<(), StoreError> {
        (**self).remove(session_id)
    }
}
