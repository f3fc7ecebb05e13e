// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::FormatError;
use crate::model::{AnswerStore, SessionId};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEnvelope<'a> {
    answers: &'a AnswerStore,
    session_id: &'a SessionId,
    exported_at: String,
}

/// Writes the `{ "answers": … }` backup envelope.
pub fn encode_json(
    answers: &AnswerStore,
    session_id: &SessionId,
    exported_at: DateTime<Utc>,
) -> Result<String, FormatError> {
    let envelope = JsonEnvelope {
        answers,
        session_id,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    serde_json::to_string_pretty(&envelope).map_err(FormatError::InvalidJson)
}

/// Reads the `answers` object out of a JSON backup; other fields are ignored.
pub fn decode_json(raw: &str) -> Result<AnswerStore, FormatError> {
    let mut value: serde_json::Value = serde_json::from_str(raw).map_err(FormatError::InvalidJson)?;
    let answers = match value.get_mut("answers") {
        Some(answers) if answers.is_object() => answers.take(),
        _ => return Err(FormatError::MissingAnswers),
    };
    serde_json::from_value(answers).map_err(FormatError::InvalidAnswers)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{decode_json, encode_json};
    use crate::format::FormatError;
    use crate::model::{AnswerStore, SessionId};

    #[test]
    fn decodes_answers_verbatim() {
        let store = decode_json(r#"{"answers": {"c1": {"0": "  keep spacing  ", "3": ""}}}"#)
            .unwrap();
        assert_eq!(store.answer("c1", 0), Some("  keep spacing  "));
        assert_eq!(store.answer("c1", 3), Some(""));
    }

    #[test]
    fn envelope_round_trips_through_decode() {
        let mut store = AnswerStore::new();
        store.set_answer("c2", 1, "hello");
        let sid = SessionId::new("abc").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let raw = encode_json(&store, &sid, at).unwrap();
        assert!(raw.contains("\"sessionId\": \"abc\""));
        assert!(raw.contains("\"exportedAt\": \"2026-01-02T03:04:05.000Z\""));
        assert_eq!(decode_json(&raw).unwrap(), store);
    }

    #[test]
    fn rejects_missing_or_non_object_answers() {
        assert!(matches!(decode_json("{}"), Err(FormatError::MissingAnswers)));
        assert!(matches!(
            decode_json(r#"{"answers": ["a"]}"#),
            Err(FormatError::MissingAnswers)
        ));
        assert!(matches!(
            decode_json(r#"{"answers": null}"#),
            Err(FormatError::MissingAnswers)
        ));
        assert!(matches!(decode_json("[1, 2]"), Err(FormatError::MissingAnswers)));
    }

    #[test]
    fn rejects_malformed_json_and_mappings() {
        assert!(matches!(decode_json("{not json"), Err(FormatError::InvalidJson(_))));
        assert!(matches!(
            decode_json(r#"{"answers": {"c1": {"zero": "x"}}}"#),
            Err(FormatError::InvalidAnswers(_))
        ));
        assert!(matches!(
            decode_json(r#"{"answers": {"c1": {"0": 5}}}"#),
            Err(FormatError::InvalidAnswers(_))
        ));
    }
}
