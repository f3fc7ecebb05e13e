// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::catalog::{Block, Catalog, Cell};
use super::ids::{BlockId, CellId};

fn cell(id: &str, title: &str, prompt: &str, questions: &[&str]) -> Cell {
    Cell::new(
        CellId::new(id).expect("cell id"),
        title,
        prompt,
        questions.iter().map(|q| (*q).to_owned()).collect(),
    )
}

/// Two blocks, three cells, five questions. The second cell's title carries accents and
/// an en dash so title matching is exercised.
pub(crate) fn sample_catalog() -> Catalog {
    let first = Block::new(
        BlockId::new("b1").expect("block id"),
        "Block One",
        "cyan",
        vec![
            cell("sample", "Sample Cell", "Tell us about the sample.", &["Q1?", "Q2?"]),
            cell("other", "Café – Ñandú Notes", "Anything else?", &["Why?", "How?"]),
        ],
    );
    let second = Block::new(
        BlockId::new("b2").expect("block id"),
        "Block Two",
        "violet",
        vec![cell("third", "Third Cell", "Last one.", &["Done?"])],
    );

    Catalog::new("Sample Canvas", "Sample-Canvas", vec![first, second]).expect("sample catalog")
}
