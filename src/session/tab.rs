// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-tab scratch storage: small string values that outlive one resolve call but not
//! the tab (or state directory) they belong to.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::store::fs::{encode_persisted_key, read_if_exists, write_atomic};
use crate::store::{StoreError, WriteDurability};

/// Key caching the generated session id for this tab.
pub const TAB_SID_KEY: &str = "tab_sid";

pub trait TabStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryTabStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryTabStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabStorage for MemoryTabStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One small text file per key under `root`.
#[derive(Debug, Clone)]
pub struct FileTabStorage {
    root: PathBuf,
}

impl FileTabStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(encode_persisted_key(key))
    }
}

impl TabStorage for FileTabStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(read_if_exists(&self.path(key))?.map(|raw| raw.trim().to_owned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        write_atomic(
            &self.root,
            &self.path(key),
            value.as_bytes(),
            WriteDurability::BestEffort,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{FileTabStorage, MemoryTabStorage, TabStorage, TAB_SID_KEY};
    use crate::store::fs::test_support::TempDir;

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryTabStorage::new();
        assert_eq!(storage.get(TAB_SID_KEY).unwrap(), None);
        storage.set(TAB_SID_KEY, "abc").unwrap();
        assert_eq!(storage.get(TAB_SID_KEY).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn file_storage_survives_reopen() {
        let tmp = TempDir::new("tab");
        FileTabStorage::new(tmp.path().join("tab")).set(TAB_SID_KEY, "abc").unwrap();
        let reopened = FileTabStorage::new(tmp.path().join("tab"));
        assert_eq!(reopened.get(TAB_SID_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("other").unwrap(), None);
    }
}
