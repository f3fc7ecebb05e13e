// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::builtin;
use super::ids::{BlockId, CellId};

/// One question group: a stable id, a title, an introductory prompt and its questions.
///
/// Questions have no identity of their own; they are addressed by their zero-based
/// position in [`Cell::questions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    id: CellId,
    title: String,
    prompt_text: String,
    questions: Vec<String>,
}

impl Cell {
    pub fn new(
        id: CellId,
        title: impl Into<String>,
        prompt_text: impl Into<String>,
        questions: Vec<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            prompt_text: prompt_text.into(),
            questions,
        }
    }

    pub fn id(&self) -> &CellId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    id: BlockId,
    title: String,
    /// Opaque presentation token; never interpreted here.
    #[serde(default)]
    display_color: String,
    cells: Vec<Cell>,
}

impl Block {
    pub fn new(
        id: BlockId,
        title: impl Into<String>,
        display_color: impl Into<String>,
        cells: Vec<Cell>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            display_color: display_color.into(),
            cells,
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn display_color(&self) -> &str {
        &self.display_color
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cell id {0:?} appears more than once in the catalog")]
    DuplicateCellId(String),
}

/// On-disk shape of an alternative questionnaire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogJson {
    title: String,
    #[serde(default)]
    export_file_stem: Option<String>,
    blocks: Vec<Block>,
}

/// The read-only questionnaire: blocks of cells of questions, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    title: String,
    export_file_stem: String,
    blocks: Vec<Block>,
    total_questions: usize,
}

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// Builds a catalog, rejecting cell ids that appear more than once.
    pub fn new(
        title: impl Into<String>,
        export_file_stem: impl Into<String>,
        blocks: Vec<Block>,
    ) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for cell in blocks.iter().flat_map(|block| block.cells()) {
            if !seen.insert(cell.id().as_str()) {
                return Err(CatalogError::DuplicateCellId(cell.id().to_string()));
            }
        }

        let total_questions = blocks
            .iter()
            .flat_map(|block| block.cells())
            .map(|cell| cell.questions().len())
            .sum();

        Ok(Self {
            title: title.into(),
            export_file_stem: export_file_stem.into(),
            blocks,
            total_questions,
        })
    }

    /// The questionnaire shipped with the binary, built on first use.
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(|| builtin::catalog().expect("built-in catalog has unique cell ids"))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let parsed: CatalogJson = serde_json::from_str(raw)?;
        let stem = parsed
            .export_file_stem
            .filter(|stem| !stem.trim().is_empty())
            .unwrap_or_else(|| default_file_stem(&parsed.title));
        Self::new(parsed.title, stem, parsed.blocks)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn export_file_stem(&self) -> &str {
        &self.export_file_stem
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// All cells, flattened in block order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.blocks.iter().flat_map(|block| block.cells())
    }

    pub fn cell(&self, cell_id: &str) -> Option<&Cell> {
        self.cells().find(|cell| cell.id().as_str() == cell_id)
    }

    /// Sum of every cell's question count; computed once at construction.
    pub fn total_question_count(&self) -> usize {
        self.total_questions
    }
}

fn default_file_stem(title: &str) -> String {
    let stem = title
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if stem.is_empty() {
        "canvas".to_owned()
    } else {
        stem
    }
}
