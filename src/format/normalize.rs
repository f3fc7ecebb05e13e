// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lower-cases `input` and strips diacritics (NFD, then drops combining marks).
pub fn fold(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect()
}

/// Key used to match a cell title read back from a text report.
///
/// On top of [`fold`], en/em dashes become `-` and whitespace runs collapse to one
/// space, so hand-edited reports still resolve to the right cell.
pub fn title_key(input: &str) -> String {
    let folded = fold(input)
        .chars()
        .map(|ch| match ch {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect::<String>();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
