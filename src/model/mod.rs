// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A read-only [`Catalog`] of blocks, cells and questions, plus the mutable
//! [`AnswerStore`] keyed by cell id and question index.

pub mod answers;
mod builtin;
pub mod catalog;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;

pub use answers::{is_answered, AnswerStore, CellAnswers};
pub use catalog::{Block, Catalog, CatalogError, Cell};
pub use ids::{BlockId, CellId, Id, IdError, SessionId};
