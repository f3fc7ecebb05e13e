// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for answers.
//!
//! Two tiers: a synchronous local mirror written on every change, and a remote document
//! store reached through the sync controller.

pub mod fs;
pub mod local_mirror;
pub mod remote;

pub use fs::{encode_persisted_key, StoreError, WriteDurability};
pub use local_mirror::{local_key, FolderMirror, LocalMirror, MemoryMirror, LOCAL_KEY_PREFIX};
pub use remote::{
    DocumentPatch, FolderRemote, MemoryRemote, RemoteDocument, RemoteError, RemoteIdentity,
    RemoteStore, SESSIONS_COLLECTION,
};
