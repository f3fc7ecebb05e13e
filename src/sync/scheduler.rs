// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use tokio::time::Instant;

/// Inactivity window before a change is pushed to the remote store.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(600);

/// Trailing-edge debounce: every change pushes the deadline out to `now + delay`.
///
/// The scheduler never sleeps itself. Callers pass `now` explicitly and poll
/// [`AutosaveScheduler::take_due`], or wait on [`AutosaveScheduler::deadline`].
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(AUTOSAVE_DELAY)
    }
}

impl AutosaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restarts the timer and returns the new deadline.
    pub fn notify_changed(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        deadline
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarms and returns `true` once the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarms and returns `true` if a deadline was armed, due or not.
    pub fn take_pending(&mut self) -> bool {
        let pending = self.is_pending();
        self.cancel();
        pending
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::{AutosaveScheduler, AUTOSAVE_DELAY};

    #[test]
    fn default_delay_is_600ms() {
        assert_eq!(AutosaveScheduler::default().delay(), Duration::from_millis(600));
        assert_eq!(AUTOSAVE_DELAY.as_millis(), 600);
    }

    #[test]
    fn fires_once_after_the_delay() {
        let mut scheduler = AutosaveScheduler::default();
        let t0 = Instant::now();
        scheduler.notify_changed(t0);

        assert!(!scheduler.take_due(t0 + Duration::from_millis(599)));
        assert!(scheduler.take_due(t0 + Duration::from_millis(600)));
        assert!(!scheduler.take_due(t0 + Duration::from_millis(5000)));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn bursts_collapse_into_one_trailing_fire() {
        let mut scheduler = AutosaveScheduler::default();
        let t0 = Instant::now();
        let mut fires = 0;
        for step in 0..10u64 {
            let now = t0 + Duration::from_millis(step * 100);
            if scheduler.take_due(now) {
                fires += 1;
            }
            scheduler.notify_changed(now);
        }
        assert_eq!(fires, 0);

        let last = t0 + Duration::from_millis(900);
        assert_eq!(scheduler.deadline(), Some(last + AUTOSAVE_DELAY));
        assert!(scheduler.take_due(last + AUTOSAVE_DELAY));
    }

    #[test]
    fn cancel_and_take_pending_disarm() {
        let mut scheduler = AutosaveScheduler::new(Duration::from_millis(10));
        let t0 = Instant::now();
        scheduler.notify_changed(t0);
        scheduler.cancel();
        assert!(!scheduler.take_due(t0 + Duration::from_secs(1)));

        scheduler.notify_changed(t0);
        assert!(scheduler.take_pending());
        assert!(!scheduler.take_pending());
    }
}
