// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Remote document store, keyed by session id.
//!
//! The sync controller only needs four things from a backend: an anonymous identity,
//! a document read, and a merge-write. Two backends ship here: [`MemoryRemote`]
//! (in-process, with fault injection) and [`FolderRemote`] (one JSON document per
//! session in a directory that several processes can share).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use super::fs::{encode_persisted_key, read_if_exists, write_atomic, StoreError, WriteDurability};
use crate::model::{AnswerStore, SessionId};

/// Collection holding one document per session.
pub const SESSIONS_COLLECTION: &str = "canvasSessions";

const IDENTITY_FILENAME: &str = "identity.json";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An anonymous account on the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIdentity {
    pub uid: String,
}

/// The stored document for one session.
///
/// `answers` is kept as raw JSON: a document written by another client may hold
/// something that is not an answer mapping, and that must not break reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_save_at: Option<String>,
}

/// Fields a client writes; `updatedAt` is always assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPatch {
    pub answers: AnswerStore,
    /// Client wall-clock time, only set by manual saves.
    pub manual_save_at: Option<DateTime<Utc>>,
}

impl RemoteDocument {
    /// The answer mapping, if the document holds a well-formed one.
    pub fn answer_store(&self) -> Option<AnswerStore> {
        let answers = self.answers.as_ref().filter(|value| value.is_object())?;
        serde_json::from_value(answers.clone()).ok()
    }

    /// Merge-write: answer entries are merged per cell and question, `updatedAt` is set
    /// to `server_time`, and `manualSaveAt` only changes when the patch carries one.
    pub fn apply(&mut self, patch: &DocumentPatch, server_time: DateTime<Utc>) {
        let incoming = match serde_json::to_value(&patch.answers) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        match self.answers.as_mut() {
            Some(Value::Object(existing)) => {
                for (cell_id, cell_answers) in incoming {
                    match (existing.get_mut(&cell_id), cell_answers) {
                        (Some(Value::Object(current)), Value::Object(update)) => {
                            current.extend(update);
                        }
                        (_, update) => {
                            existing.insert(cell_id, update);
                        }
                    }
                }
            }
            _ => self.answers = Some(Value::Object(incoming)),
        }

        self.updated_at = Some(server_time);
        if let Some(at) = patch.manual_save_at {
            self.manual_save_at = Some(at.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn current_identity(&self) -> Result<Option<RemoteIdentity>, RemoteError>;

    async fn sign_in_anonymously(&self) -> Result<RemoteIdentity, RemoteError>;

    async fn get(&self, session_id: &SessionId) -> Result<Option<RemoteDocument>, RemoteError>;

    async fn merge_set(
        &self,
        session_id: &SessionId,
        patch: &DocumentPatch,
    ) -> Result<(), RemoteError>;

    /// Returns the current identity, signing in anonymously first if there is none.
    async fn ensure_identity(&self) -> Result<RemoteIdentity, RemoteError> {
        match self.current_identity().await? {
            Some(identity) => Ok(identity),
            None => self.sign_in_anonymously().await,
        }
    }
}

#[async_trait]
impl<R: RemoteStore + ?Sized> RemoteStore for Arc<R> {
    async fn current_identity(&self) -> Result<Option<RemoteIdentity>, RemoteError> {
        (**self).current_identity().await
    }

    async fn sign_in_anonymously(&self) -> Result<RemoteIdentity, RemoteError> {
        (**self).sign_in_anonymously().await
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<RemoteDocument>, RemoteError> {
        (**self).get(session_id).await
    }

    async fn merge_set(
        &self,
        session_id: &SessionId,
        patch: &DocumentPatch,
    ) -> Result<(), RemoteError> {
        (**self).merge_set(session_id, patch).await
    }
}

fn new_identity() -> RemoteIdentity {
    RemoteIdentity {
        uid: Uuid::new_v4().simple().to_string(),
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    identity: Option<RemoteIdentity>,
    documents: BTreeMap<SessionId, RemoteDocument>,
    offline: bool,
}

/// In-process backend.
///
/// `set_offline(true)` makes every call fail with [`RemoteError::Unavailable`];
/// [`MemoryRemote::hold`] parks every call until the returned guard is dropped.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: Mutex<MemoryState>,
    gate: Arc<RwLock<()>>,
    writes: AtomicUsize,
    reads: AtomicUsize,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Blocks remote calls until the guard is dropped.
    pub async fn hold(&self) -> OwnedRwLockWriteGuard<()> {
        self.gate.clone().write_owned().await
    }

    /// Seeds or replaces a document directly.
    pub fn insert_document(&self, session_id: SessionId, document: RemoteDocument) {
        self.lock().documents.insert(session_id, document);
    }

    pub fn document(&self, session_id: &SessionId) -> Option<RemoteDocument> {
        self.lock().documents.get(session_id).cloned()
    }

    /// Number of successful merge-writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of successful document reads.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn online(&self) -> Result<(), RemoteError> {
        drop(self.gate.read().await);
        if self.lock().offline {
            return Err(RemoteError::Unavailable("network offline".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn current_identity(&self) -> Result<Option<RemoteIdentity>, RemoteError> {
        self.online().await?;
        Ok(self.lock().identity.clone())
    }

    async fn sign_in_anonymously(&self) -> Result<RemoteIdentity, RemoteError> {
        self.online().await?;
        Ok(self.lock().identity.get_or_insert_with(new_identity).clone())
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<RemoteDocument>, RemoteError> {
        self.online().await?;
        let document = self.lock().documents.get(session_id).cloned();
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(document)
    }

    async fn merge_set(
        &self,
        session_id: &SessionId,
        patch: &DocumentPatch,
    ) -> Result<(), RemoteError> {
        self.online().await?;
        self.lock()
            .documents
            .entry(session_id.clone())
            .or_default()
            .apply(patch, Utc::now());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Directory backend: `<root>/identity.json` plus `<root>/canvasSessions/<sid>.json`.
#[derive(Debug, Clone)]
pub struct FolderRemote {
    root: PathBuf,
    durability: WriteDurability,
}

impl FolderRemote {
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

    fn collection_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_COLLECTION)
    }

    pub fn document_path(&self, session_id: &SessionId) -> PathBuf {
        let stem = encode_persisted_key(session_id.as_str());
        self.collection_dir().join(format!("{stem}.json"))
    }

    fn identity_path(&self) -> PathBuf {
        self.root.join(IDENTITY_FILENAME)
    }

    fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, StoreError> {
        let Some(raw) = read_if_exists(path)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    fn write_json<T: Serialize>(&self, dir: &Path, path: &Path, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(dir, path, &raw, self.durability)
    }

    /// Runs filesystem work off the async executor.
    async fn blocking<T, F>(&self, work: F) -> Result<T, RemoteError>
    where
        T: Send + 'static,
        F: FnOnce(&FolderRemote) -> Result<T, StoreError> + Send + 'static,
    {
        let this = self.clone();
        let joined = tokio::task::spawn_blocking(move || work(&this)).await;
        match joined {
            Ok(result) => Ok(result?),
            Err(err) => Err(RemoteError::Unavailable(format!("folder store task failed: {err}"))),
        }
    }
}

#[async_trait]
impl RemoteStore for FolderRemote {
    async fn current_identity(&self) -> Result<Option<RemoteIdentity>, RemoteError> {
        self.blocking(|remote| Self::read_json(&remote.identity_path()))
            .await
    }

    async fn sign_in_anonymously(&self) -> Result<RemoteIdentity, RemoteError> {
        self.blocking(|remote| {
            let path = remote.identity_path();
            if let Some(identity) = Self::read_json(&path)? {
                return Ok(identity);
            }
            let identity = new_identity();
            remote.write_json(&remote.root, &path, &identity)?;
            Ok(identity)
        })
        .await
    }

    async fn get(&self, session_id: &SessionId) -> Result<Option<RemoteDocument>, RemoteError> {
        let path = self.document_path(session_id);
        self.blocking(move |_| Self::read_json(&path)).await
    }

    async fn merge_set(
        &self,
        session_id: &SessionId,
        patch: &DocumentPatch,
    ) -> Result<(), RemoteError> {
        let path = self.document_path(session_id);
        let patch = patch.clone();
        self.blocking(move |remote| {
            let mut document: RemoteDocument = Self::read_json(&path)?.unwrap_or_default();
            document.apply(&patch, Utc::now());
            remote.write_json(&remote.collection_dir(), &path, &document)
        })
        .await
    }
}
