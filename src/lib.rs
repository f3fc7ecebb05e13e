// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! ffcanvas: a feedforward questionnaire with local mirroring, debounced remote sync and
//! text/JSON backups.
//!
//! Layers, leaf first: `model` (catalog, answers, ids), `format` (backup codecs),
//! `store` (local mirror, remote documents), `session` (session id resolution), `sync`
//! (remote sync controller), `query` (search, progress), `ops` (the [`ops::Canvas`]
//! facade) and `repl` (the command loop used by the binary).

pub mod format;
pub mod model;
pub mod ops;
pub mod query;
pub mod repl;
pub mod session;
pub mod store;
pub mod sync;
