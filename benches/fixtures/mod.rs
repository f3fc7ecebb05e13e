// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic answer stores over the built-in catalog (no RNG).

use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use ffcanvas::model::{AnswerStore, Catalog};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("ffcanvas-bench-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// Every other question, one short line each.
    Sparse,
    /// Every question, a paragraph of `lines` lines each.
    Full { lines: usize },
}

impl Case {
    pub fn id(self) -> String {
        match self {
            Self::Sparse => "sparse".to_owned(),
            Self::Full { lines } => format!("full_{lines}l"),
        }
    }
}

pub fn answers(catalog: &Catalog, case: Case) -> AnswerStore {
    let mut store = AnswerStore::new();
    for (cell_no, cell) in catalog.cells().enumerate() {
        for idx in 0..cell.questions().len() {
            let text = match case {
                Case::Sparse if (cell_no + idx) % 2 == 1 => continue,
                Case::Sparse => format!("short answer {cell_no}.{idx}"),
                Case::Full { lines } => (0..lines)
                    .map(|line| format!("línea {line} de la respuesta {cell_no}.{idx} – acción"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            store.set_answer(cell.id().as_str(), idx, text);
        }
    }
    store
}
