// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;

/// Answers for one cell, keyed by zero-based question index.
pub type CellAnswers = BTreeMap<usize, String>;

/// Every answer entered in a session: cell id -> question index -> text.
///
/// Cell ids are not checked against the catalog. An unknown id is kept (and persisted)
/// but never rendered or counted. A missing cell entry and an empty inner map both mean
/// "no answers".
///
/// Serializes as a plain JSON object (`{"c1": {"0": "text"}}`), which is the shape used
/// by the local mirror, the remote document and the JSON import envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    cells: BTreeMap<String, CellAnswers>,
}

/// Whether `text` counts as an answer: non-empty after trimming whitespace.
pub fn is_answered(text: &str) -> bool {
    !text.trim().is_empty()
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|answers| answers.is_empty())
    }

    /// Inserts or overwrites one answer, creating the cell's map when needed.
    pub fn set_answer(&mut self, cell_id: &str, question_index: usize, text: impl Into<String>) {
        self.cells
            .entry(cell_id.to_owned())
            .or_default()
            .insert(question_index, text.into());
    }

    pub fn answer(&self, cell_id: &str, question_index: usize) -> Option<&str> {
        self.cells
            .get(cell_id)
            .and_then(|answers| answers.get(&question_index))
            .map(String::as_str)
    }

    pub fn cell(&self, cell_id: &str) -> Option<&CellAnswers> {
        self.cells.get(cell_id)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &CellAnswers)> + '_ {
        self.cells
            .iter()
            .map(|(cell_id, answers)| (cell_id.as_str(), answers))
    }

    /// Answered questions across the catalog's declared questions.
    ///
    /// Answers stored under unknown cells, or under an index past a cell's declared
    /// question count, do not count.
    pub fn count_answered(&self, catalog: &Catalog) -> usize {
        catalog
            .cells()
            .map(|cell| {
                (0..cell.questions().len())
                    .filter(|idx| self.answer(cell.id().as_str(), *idx).is_some_and(is_answered))
                    .count()
            })
            .sum()
    }

    /// Answered entries stored for one cell, whatever their indices.
    ///
    /// Unlike [`AnswerStore::count_answered`] this iterates the stored keys, so an index
    /// left over from an older catalog still counts here.
    pub fn count_answered_for_cell(&self, cell_id: &str) -> usize {
        self.cells
            .get(cell_id)
            .map(|answers| answers.values().filter(|text| is_answered(text)).count())
            .unwrap_or(0)
    }

    /// The entries a text export can carry: catalog cells, declared questions, answered
    /// text, trimmed.
    pub fn exportable(&self, catalog: &Catalog) -> AnswerStore {
        let mut out = AnswerStore::new();
        for cell in catalog.cells() {
            for idx in 0..cell.questions().len() {
                if let Some(text) = self.answer(cell.id().as_str(), idx) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        out.set_answer(cell.id().as_str(), idx, trimmed);
                    }
                }
            }
        }
        out
    }
}
