// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use url::{form_urlencoded, Url};

/// Address parameter carrying the session id, in both query and fragment.
pub const SID_PARAM: &str = "sid";

fn fragment_sid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:^|[#&?])sid=([^&]+)").expect("valid fragment sid regex"))
}

/// The page address a session is opened from, and shared through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    url: Url,
}

impl Address {
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(|url| Self { url })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// First non-empty `sid` query parameter, decoded.
    pub fn query_sid(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == SID_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    /// `sid` from the fragment; the key matches case-insensitively.
    pub fn fragment_sid(&self) -> Option<String> {
        let fragment = self.url.fragment()?;
        let raw = fragment_sid_re().captures(fragment)?.get(1)?.as_str();
        form_urlencoded::parse(format!("{SID_PARAM}={raw}").as_bytes())
            .next()
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    /// Writes `sid` into the query and the fragment, replacing earlier values in place.
    ///
    /// Other parameters keep their order. Applying the same id twice is a no-op.
    pub fn set_sid(&mut self, sid: &str) {
        let query = upsert_param(self.url.query_pairs().into_owned().collect(), sid);
        self.url.query_pairs_mut().clear().extend_pairs(query);

        let fragment_pairs = self
            .url
            .fragment()
            .map(|fragment| form_urlencoded::parse(fragment.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        let fragment = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(upsert_param(fragment_pairs, sid))
            .finish();
        self.url.set_fragment(Some(&fragment));
    }

    pub fn with_sid(mut self, sid: &str) -> Self {
        self.set_sid(sid);
        self
    }
}

fn upsert_param(pairs: Vec<(String, String)>, sid: &str) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(pairs.len() + 1);
    let mut placed = false;
    for (key, value) in pairs {
        if key == SID_PARAM {
            if !placed {
                out.push((key, sid.to_owned()));
                placed = true;
            }
        } else {
            out.push((key, value));
        }
    }
    if !placed {
        out.push((SID_PARAM.to_owned(), sid.to_owned()));
    }
    out
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Address {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
