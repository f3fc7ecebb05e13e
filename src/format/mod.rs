// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Backup formats: a line-oriented text report and a JSON envelope.
//!
//! Imports dispatch on the file extension (`.txt` / `.json`); anything else is a
//! [`FormatError`].

pub mod json;
pub mod normalize;
pub mod plain_text;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{AnswerStore, Catalog};

pub use json::{decode_json, encode_json};
pub use plain_text::{decode_plain_text, encode_plain_text, TitleIndex, NO_ANSWERS_PLACEHOLDER};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unsupported file type {file_name:?}: expected a .json or .txt export")]
    UnsupportedExtension { file_name: String },
    #[error("invalid json: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("json backup has no `answers` object")]
    MissingAnswers,
    #[error("json backup has a malformed `answers` mapping: {0}")]
    InvalidAnswers(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }

    /// Picks the format from a file name, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".json") {
            Some(Self::Json)
        } else if lower.ends_with(".txt") {
            Some(Self::Text)
        } else {
            None
        }
    }
}

/// `<stem>-<YYYY-MM-DD>.<ext>`
pub fn export_file_name(stem: &str, format: ExportFormat, date: NaiveDate) -> String {
    format!("{stem}-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Decodes an imported backup, choosing the parser from `file_name`'s extension.
pub fn decode_import(
    catalog: &Catalog,
    file_name: &str,
    contents: &str,
) -> Result<AnswerStore, FormatError> {
    match ExportFormat::from_file_name(file_name) {
        Some(ExportFormat::Json) => decode_json(&plain_text::normalize_line_endings(contents)),
        Some(ExportFormat::Text) => Ok(decode_plain_text(catalog, contents)),
        None => Err(FormatError::UnsupportedExtension {
            file_name: file_name.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{decode_import, export_file_name, ExportFormat, FormatError};
    use crate::model::fixtures::sample_catalog;

    #[test]
    fn dispatches_on_extension_case_insensitively() {
        let catalog = sample_catalog();

        let from_json =
            decode_import(&catalog, "Backup.JSON", r#"{"answers": {"sample": {"0": "a"}}}"#)
                .unwrap();
        assert_eq!(from_json.answer("sample", 0), Some("a"));

        let from_text =
            decode_import(&catalog, "report.Txt", "-- Sample Cell --\nP1: Q1?\nAnswer: b\n")
                .unwrap();
        assert_eq!(from_text.answer("sample", 0), Some("b"));
    }

    #[test]
    fn rejects_other_extensions() {
        let catalog = sample_catalog();
        let err = decode_import(&catalog, "answers.csv", "a,b").unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedExtension { ref file_name } if file_name == "answers.csv"));

        assert!(decode_import(&catalog, "json", "{}").is_err());
    }

    #[test]
    fn export_names_carry_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            export_file_name("Feedforward-Canvas", ExportFormat::Text, date),
            "Feedforward-Canvas-2026-10-19.txt"
        );
        assert_eq!(
            export_file_name("Sample", ExportFormat::Json, date),
            "Sample-2026-10-19.json"
        );
    }
}
