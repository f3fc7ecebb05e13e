// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! User-facing operations on an open canvas.
//!
//! [`Canvas`] owns the answer store for one session and routes every mutation through
//! the local mirror and the sync controller. Manual operations report back with a
//! [`Notice`]; import and export failures come back as [`CanvasError`].

mod canvas;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::format::{ExportFormat, FormatError};
use crate::model::Catalog;
use crate::sync::AUTOSAVE_DELAY;

pub use canvas::{Canvas, SharedMirror, SharedRemote};

#[derive(Debug, Clone)]
pub struct CanvasConfig {
    pub catalog: Arc<Catalog>,
    pub autosave_delay: Duration,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            catalog: Arc::new(Catalog::builtin().clone()),
            autosave_delay: AUTOSAVE_DELAY,
        }
    }
}

/// Outcome of a manual save or reload, phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved,
    SaveFailed(String),
    Reloaded,
    NothingToReload,
    ReloadFailed(String),
    Busy,
}

impl Notice {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::SaveFailed(_) | Self::ReloadFailed(_) | Self::Busy)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved => f.write_str("Saved to the cloud."),
            Self::SaveFailed(reason) => write!(f, "Could not save to the cloud: {reason}"),
            Self::Reloaded => f.write_str("Reloaded answers from the cloud."),
            Self::NothingToReload => {
                f.write_str("Nothing to reload: this session has no cloud copy yet.")
            }
            Self::ReloadFailed(reason) => write!(f, "Could not reload from the cloud: {reason}"),
            Self::Busy => f.write_str("Another save or reload is still running."),
        }
    }
}

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("cannot read {path:?}: {source}")]
    ReadImport { path: PathBuf, source: io::Error },
    #[error("cannot write {path:?}: {source}")]
    WriteExport { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A rendered backup, ready to be written under `file_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub format: ExportFormat,
    pub file_name: String,
    pub contents: String,
}
