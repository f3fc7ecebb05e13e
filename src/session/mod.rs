// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Session identity: which session id an address (or tab) refers to.
//!
//! Lookup order is query `sid`, then fragment `sid`, then the per-tab cache, then a
//! fresh UUID which is cached for the tab. The resolved id is always written back into
//! both address positions so the address can be shared as is.

pub mod address;
pub mod tab;

use tracing::{debug, warn};

use crate::model::SessionId;

pub use address::{Address, SID_PARAM};
pub use tab::{FileTabStorage, MemoryTabStorage, TabStorage, TAB_SID_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Query,
    Fragment,
    Tab,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub session_id: SessionId,
    pub source: SessionSource,
}

/// Resolves the session id for `address`, updating the address in place.
///
/// Never fails: tab storage errors are logged and the resolver moves on.
pub fn resolve_session(address: &mut Address, tab: &dyn TabStorage) -> ResolvedSession {
    let from_address = address
        .query_sid()
        .and_then(|sid| SessionId::new(sid).ok())
        .map(|sid| (sid, SessionSource::Query))
        .or_else(|| {
            address
                .fragment_sid()
                .and_then(|sid| SessionId::new(sid).ok())
                .map(|sid| (sid, SessionSource::Fragment))
        });
    let (session_id, source) = from_address.unwrap_or_else(|| tab_session(tab));

    address.set_sid(session_id.as_str());
    debug!(session = %session_id, ?source, "session resolved");
    ResolvedSession { session_id, source }
}

fn tab_session(tab: &dyn TabStorage) -> (SessionId, SessionSource) {
    match tab.get(TAB_SID_KEY) {
        Ok(Some(cached)) => {
            if let Ok(sid) = SessionId::new(cached) {
                return (sid, SessionSource::Tab);
            }
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "tab storage unreadable; generating a session id"),
    }

    let generated = SessionId::generate();
    if let Err(err) = tab.set(TAB_SID_KEY, generated.as_str()) {
        warn!(error = %err, "could not cache session id for this tab");
    }
    (generated, SessionSource::Generated)
}

#[cfg(test)]
mod tests {
    use super::{resolve_session, Address, MemoryTabStorage, SessionSource, TabStorage, TAB_SID_KEY};

    fn addr(input: &str) -> Address {
        Address::parse(input).unwrap()
    }

    #[test]
    fn query_wins_over_fragment_and_tab() {
        let tab = MemoryTabStorage::new();
        tab.set(TAB_SID_KEY, "from-tab").unwrap();
        let mut address = addr("https://canvas.example/?sid=from-query#sid=from-fragment");

        let resolved = resolve_session(&mut address, &tab);
        assert_eq!(resolved.session_id.as_str(), "from-query");
        assert_eq!(resolved.source, SessionSource::Query);
        assert_eq!(address.fragment_sid().as_deref(), Some("from-query"));
    }

    #[test]
    fn fragment_is_used_and_decoded() {
        let tab = MemoryTabStorage::new();
        let mut address = addr("https://canvas.example/#sid=team%2F42");
        let resolved = resolve_session(&mut address, &tab);
        assert_eq!(resolved.session_id.as_str(), "team/42");
        assert_eq!(resolved.source, SessionSource::Fragment);
        assert_eq!(address.query_sid().as_deref(), Some("team/42"));
        assert_eq!(tab.get(TAB_SID_KEY).unwrap(), None);
    }

    #[test]
    fn generated_id_is_cached_per_tab() {
        let tab = MemoryTabStorage::new();
        let first = resolve_session(&mut addr("https://canvas.example/"), &tab);
        assert_eq!(first.source, SessionSource::Generated);
        assert_eq!(tab.get(TAB_SID_KEY).unwrap().as_deref(), Some(first.session_id.as_str()));

        let second = resolve_session(&mut addr("https://canvas.example/"), &tab);
        assert_eq!(second.source, SessionSource::Tab);
        assert_eq!(second.session_id, first.session_id);
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let tab = MemoryTabStorage::new();
        let mut address = addr("https://canvas.example/app?lang=es");
        let first = resolve_session(&mut address, &tab);
        let after_first = address.clone();

        let second = resolve_session(&mut address, &tab);
        assert_eq!(first.session_id, second.session_id);
        assert_eq!(second.source, SessionSource::Query);
        assert_eq!(address, after_first);
        assert_eq!(address.query_sid().as_deref(), Some(first.session_id.as_str()));
        assert_eq!(address.fragment_sid().as_deref(), Some(first.session_id.as_str()));
    }
}
