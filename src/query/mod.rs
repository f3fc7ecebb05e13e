// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only views over the catalog and the answers: search and progress.

use std::fmt;

use crate::format::normalize::fold;
use crate::model::{AnswerStore, Block, Catalog, Cell};

/// A block with the subset of its cells that matched a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch<'a> {
    pub block: &'a Block,
    pub cells: Vec<&'a Cell>,
}

/// Blocks whose cells match `query`, in catalog order.
///
/// A cell matches when the folded query (case and diacritics ignored) is a substring of
/// its title, prompt, any question or any answer stored for it. Blocks with no matching
/// cell are left out; a blank query keeps every block and cell.
pub fn filter_blocks<'a>(
    catalog: &'a Catalog,
    answers: &AnswerStore,
    query: &str,
) -> Vec<BlockMatch<'a>> {
    let needle = fold(query.trim());
    catalog
        .blocks()
        .iter()
        .filter_map(|block| {
            let cells: Vec<&Cell> = block
                .cells()
                .iter()
                .filter(|cell| needle.is_empty() || cell_matches(cell, answers, &needle))
                .collect();
            if cells.is_empty() && !needle.is_empty() {
                return None;
            }
            Some(BlockMatch { block, cells })
        })
        .collect()
}

fn cell_matches(cell: &Cell, answers: &AnswerStore, needle: &str) -> bool {
    let hit = |text: &str| fold(text).contains(needle);
    hit(cell.title())
        || hit(cell.prompt_text())
        || cell.questions().iter().any(|question| hit(question))
        || answers
            .cell(cell.id().as_str())
            .is_some_and(|stored| stored.values().any(|text| hit(text)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Answered share as a whole percentage, rounded half up; 0 for an empty catalog.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.answered * 200 + self.total) / (2 * self.total)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} answered ({}%)", self.answered, self.total, self.percent())
    }
}

pub fn progress(catalog: &Catalog, answers: &AnswerStore) -> Progress {
    Progress {
        answered: answers.count_answered(catalog),
        total: catalog.total_question_count(),
    }
}
