// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Human-readable answer report.
//!
//! ```text
//! Feedforward Canvas
//! Exported: 2026-10-19 09:30:00 UTC
//!
//! === Block title ===
//!
//! -- Cell title --
//! Prompt: cell prompt text
//!
//! P1: first question
//! Answer: first answer,
//! possibly spanning lines
//! ```
//!
//! Decoding is a line state machine keyed on three marker shapes (`=== … ===`,
//! `-- … --`, `P<n>:`) plus the `Answer:` label. Everything between an `Answer:` label and
//! the next marker belongs to that answer.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::normalize::title_key;
use crate::model::{is_answered, AnswerStore, Catalog, Cell};

/// Returned instead of a report when no cell has an answer.
pub const NO_ANSWERS_PLACEHOLDER: &str = "No answers have been filled in yet.";

fn block_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^===\s*.+?\s*===\s*$").expect("valid block header regex"))
}

fn cell_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^--\s*.+?\s*--\s*$").expect("valid cell header regex"))
}

fn cell_header_trim_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^--\s*|\s*--$").expect("valid cell title regex"))
}

fn question_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^P\s*([0-9]+)\s*:").expect("valid question marker regex"))
}

fn answer_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `Respuesta:` is what earlier Spanish-language exports wrote.
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:Answer|Respuesta):\s*(.*)$").expect("valid answer label regex")
    })
}

/// Renders the report for `answers`, walking the catalog in display order.
///
/// Only declared questions with an answered (non-blank) value are written; cells and
/// blocks without any such answer are left out entirely.
pub fn encode_plain_text(
    catalog: &Catalog,
    answers: &AnswerStore,
    exported_at: DateTime<Utc>,
) -> String {
    let mut lines = Vec::<String>::new();
    lines.push(catalog.title().to_owned());
    lines.push(format!("Exported: {}", exported_at.format("%Y-%m-%d %H:%M:%S UTC")));
    lines.push(String::new());

    let mut wrote_any_cell = false;
    for block in catalog.blocks() {
        let sections = block
            .cells()
            .iter()
            .filter_map(|cell| encode_cell(cell, answers))
            .collect::<Vec<_>>();
        if sections.is_empty() {
            continue;
        }
        wrote_any_cell = true;

        lines.push(format!("=== {} ===", block.title()));
        for section in sections {
            lines.extend(section);
        }
        lines.push(String::new());
    }

    if !wrote_any_cell {
        return NO_ANSWERS_PLACEHOLDER.to_owned();
    }

    lines.join("\n")
}

fn encode_cell(cell: &Cell, answers: &AnswerStore) -> Option<Vec<String>> {
    let answered = cell
        .questions()
        .iter()
        .enumerate()
        .filter_map(|(idx, question)| {
            let text = answers.answer(cell.id().as_str(), idx)?;
            is_answered(text).then(|| (idx, question, text.trim()))
        })
        .collect::<Vec<_>>();
    if answered.is_empty() {
        return None;
    }

    let mut lines = vec![
        String::new(),
        format!("-- {} --", cell.title()),
        format!("Prompt: {}", cell.prompt_text()),
    ];
    for (idx, question, text) in answered {
        lines.push(String::new());
        lines.push(format!("P{}: {question}", idx + 1));
        lines.push(format!("Answer: {text}"));
    }
    lines.push(String::new());
    Some(lines)
}

/// Normalized cell title -> cell id, built from the catalog.
#[derive(Debug, Clone)]
pub struct TitleIndex {
    by_title: BTreeMap<String, String>,
}

impl TitleIndex {
    pub fn new(catalog: &Catalog) -> Self {
        let by_title = catalog
            .cells()
            .map(|cell| (title_key(cell.title()), cell.id().to_string()))
            .collect();
        Self { by_title }
    }

    pub fn resolve(&self, title: &str) -> Option<&str> {
        self.by_title.get(&title_key(title)).map(String::as_str)
    }
}

#[derive(Debug, Default)]
struct DecodeState<'a> {
    out: AnswerStore,
    cell_id: Option<&'a str>,
    question_index: Option<usize>,
    buffer: Option<String>,
}

impl DecodeState<'_> {
    fn flush(&mut self) {
        let buffer = self.buffer.take();
        if let (Some(cell_id), Some(idx), Some(text)) = (self.cell_id, self.question_index, buffer)
        {
            self.out.set_answer(cell_id, idx, text.trim());
        }
    }
}

/// Parses a report produced by [`encode_plain_text`] (or a hand-edited copy of one).
///
/// Never fails. Content under a cell header whose title is not in the catalog is
/// dropped until the next recognized cell header, as is anything before the first
/// `Answer:` label.
pub fn decode_plain_text(catalog: &Catalog, text: &str) -> AnswerStore {
    let index = TitleIndex::new(catalog);
    let normalized = normalize_line_endings(text);

    let mut state = DecodeState::default();
    for line in normalized.split('\n') {
        let trimmed = line.trim();

        if block_header_re().is_match(trimmed) {
            state.flush();
            state.question_index = None;
            continue;
        }

        if cell_header_re().is_match(trimmed) {
            state.flush();
            let title = cell_header_trim_re().replace_all(trimmed, "");
            state.cell_id = index.resolve(&title);
            state.question_index = None;
            continue;
        }

        if state.cell_id.is_some() {
            if let Some(caps) = question_marker_re().captures(line) {
                state.flush();
                state.question_index = caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1));
                continue;
            }
        }

        if state.cell_id.is_some() && state.question_index.is_some() {
            if let Some(caps) = answer_label_re().captures(line) {
                state.flush();
                state.buffer = Some(caps[1].to_owned());
                continue;
            }
        }

        if let Some(buffer) = state.buffer.as_mut() {
            buffer.push('\n');
            buffer.push_str(line);
        }
    }
    state.flush();

    state.out
}

pub(crate) fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::{decode_plain_text, encode_plain_text, TitleIndex, NO_ANSWERS_PLACEHOLDER};
    use crate::model::fixtures::sample_catalog;
    use crate::model::{AnswerStore, Catalog};

    fn exported_at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    #[test]
    fn encodes_answered_questions_only() {
        let catalog = sample_catalog();
        let mut store = AnswerStore::new();
        store.set_answer("sample", 0, "alpha");
        store.set_answer("sample", 1, "  ");

        let text = encode_plain_text(&catalog, &store, exported_at());

        assert!(text.contains("-- Sample Cell --"));
        assert!(text.contains("P1: Q1?\nAnswer: alpha"));
        assert!(!text.contains("P2:"));
        assert!(!text.contains("Q2?"));
    }

    #[test]
    fn encode_layout_is_stable() {
        let catalog = sample_catalog();
        let mut store = AnswerStore::new();
        store.set_answer("sample", 1, "two\nlines");

        let text = encode_plain_text(&catalog, &store, exported_at());
        let expected = "\
Sample Canvas
Exported: 2026-10-19 09:30:00 UTC

=== Block One ===

-- Sample Cell --
Prompt: Tell us about the sample.

P2: Q2?
Answer: two
lines

";
        assert_eq!(text, expected);
    }

    #[test]
    fn omits_blocks_and_cells_without_answers() {
        let catalog = sample_catalog();
        let mut store = AnswerStore::new();
        store.set_answer("third", 0, "yes");

        let text = encode_plain_text(&catalog, &store, exported_at());
        assert!(!text.contains("=== Block One ==="));
        assert!(!text.contains("-- Sample Cell --"));
        assert!(text.contains("=== Block Two ==="));
        assert!(text.contains("-- Third Cell --"));
    }

    #[test]
    fn empty_store_encodes_placeholder() {
        let catalog = sample_catalog();
        let mut store = AnswerStore::new();
        store.set_answer("sample", 0, "   ");
        store.set_answer("ghost", 0, "not in catalog");

        assert_eq!(encode_plain_text(&catalog, &store, exported_at()), NO_ANSWERS_PLACEHOLDER);
    }

    #[test]
    fn decode_restores_answered_entries() {
        let catalog = sample_catalog();
        let mut store = AnswerStore::new();
        store.set_answer("sample", 0, "  alpha ");
        store.set_answer("sample", 1, "");
        store.set_answer("other", 1, "first line\n\n  indented second line");
        store.set_answer("third", 0, "done");
        store.set_answer("third", 5, "beyond declared questions");

        let text = encode_plain_text(&catalog, &store, exported_at());
        let decoded = decode_plain_text(&catalog, &text);

        assert_eq!(decoded, store.exportable(&catalog));
        assert_eq!(
            decoded.answer("other", 1),
            Some("first line\n\n  indented second line")
        );
    }

    #[test]
    fn builtin_catalog_round_trips_every_question() {
        let catalog = Catalog::builtin();
        let mut store = AnswerStore::new();
        for cell in catalog.cells() {
            for idx in 0..cell.questions().len() {
                store.set_answer(cell.id().as_str(), idx, format!("{} #{idx}", cell.id()));
            }
        }

        let text = encode_plain_text(catalog, &store, exported_at());
        assert_eq!(decode_plain_text(catalog, &text), store);
    }

    #[test]
    fn unknown_cell_title_drops_its_content() {
        let catalog = sample_catalog();
        let text = "\
=== Block One ===
-- Not A Real Cell --
P1: Q1?
Answer: lost
more lost text
-- Sample Cell --
P2: Q2?
Answer: kept
";
        let decoded = decode_plain_text(&catalog, text);

        let mut expected = AnswerStore::new();
        expected.set_answer("sample", 1, "kept");
        assert_eq!(decoded, expected);
    }

    #[test]
    fn matches_titles_ignoring_accents_case_and_dashes() {
        let catalog = sample_catalog();
        let text = "-- cafe - nandu   notes --\nP1: Why?\nAnswer: because\n";
        let decoded = decode_plain_text(&catalog, text);
        assert_eq!(decoded.answer("other", 0), Some("because"));
    }

    #[test]
    fn accepts_crlf_and_legacy_label() {
        let catalog = sample_catalog();
        let text = "-- Sample Cell --\r\nP1: Q1?\r\nRespuesta: hola\r\nmundo\r\n";
        let decoded = decode_plain_text(&catalog, text);
        assert_eq!(decoded.answer("sample", 0), Some("hola\nmundo"));
    }

    #[test]
    fn question_marker_without_answer_label_stores_nothing() {
        let catalog = sample_catalog();
        let text = "-- Sample Cell --\nP1: Q1?\nstray text\nP2: Q2?\nAnswer: second\n";
        let decoded = decode_plain_text(&catalog, text);

        let mut expected = AnswerStore::new();
        expected.set_answer("sample", 1, "second");
        assert_eq!(decoded, expected);
    }

    #[test]
    fn block_header_ends_the_current_answer() {
        let catalog = sample_catalog();
        let text = "\
-- Sample Cell --
P1: Q1?
Answer: first
=== Block Two ===
this line belongs to nothing
";
        let decoded = decode_plain_text(&catalog, text);
        assert_eq!(decoded.answer("sample", 0), Some("first"));
        assert_eq!(decoded.count_answered_for_cell("sample"), 1);
    }

    #[rstest]
    #[case("first\nAnswer: second", "second")]
    #[case("intro\n-----\noutro", "intro")]
    #[case("a\nP2: more", "a")]
    #[case("x\n=== y ===", "x")]
    fn answer_lines_that_look_like_markers_cut_the_answer(
        #[case] answer: &str,
        #[case] decoded: &str,
    ) {
        let catalog = sample_catalog();
        let mut store = AnswerStore::new();
        store.set_answer("sample", 0, answer);

        let back = decode_plain_text(&catalog, &encode_plain_text(&catalog, &store, exported_at()));
        assert_eq!(back.answer("sample", 0), Some(decoded));
        assert_eq!(back.answer("sample", 1), None);
    }

    #[test]
    fn p0_marker_is_ignored() {
        let catalog = sample_catalog();
        let text = "-- Sample Cell --\nP0: nothing\nAnswer: dropped\n";
        assert!(decode_plain_text(&catalog, text).is_empty());
    }

    #[test]
    fn title_index_resolves_by_normalized_title() {
        let catalog = sample_catalog();
        let index = TitleIndex::new(&catalog);
        assert_eq!(index.resolve("SAMPLE   cell"), Some("sample"));
        assert_eq!(index.resolve("Sample"), None);
    }
}
