// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keeping the answer store loosely in step with the remote document.
//!
//! [`SyncController`] owns the readiness flag, the one-shot autosave suppression flag,
//! the busy flag for manual operations and the debounce [`AutosaveScheduler`].

pub mod controller;
pub mod scheduler;

pub use controller::{
    AutosaveOutcome, BusyState, ReloadOutcome, SyncController, SyncError, SyncPhase,
};
pub use scheduler::{AutosaveScheduler, AUTOSAVE_DELAY};
