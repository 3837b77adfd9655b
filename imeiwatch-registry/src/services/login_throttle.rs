//! Per-origin throttle for admin login attempts.
//!
//! Each origin gets a window that opens on its first attempt. Failed password
//! checks count against the window; once `max_attempts` failures are recorded
//! every further attempt is refused without looking at the password until the
//! window has elapsed. Successful logins do not clear the count.
//!
//! In-memory and best-effort: concurrent requests from one origin may
//! undercount slightly, and the state is per process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct AttemptWindow {
    failures: u32,
    started_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttled {
    pub retry_after: Duration,
}

pub struct LoginThrottle {
    max_attempts: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, AttemptWindow>>,
}

impl LoginThrottle {
    pub fn new(max_attempts: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_attempts,
            window,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Gate one login attempt from `origin`. Opens or resets the origin's window as needed.
    pub fn check(&self, origin: &str) -> Result<(), Throttled> {
        let now = self.clock.now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        // Opportunistic cleanup keeps the map bounded by recently active origins.
        let window = self.window;
        windows.retain(|_, w| now.duration_since(w.started_at) <= window);

        let entry = windows.entry(origin.to_string()).or_insert(AttemptWindow {
            failures: 0,
            started_at: now,
        });

        if entry.failures >= self.max_attempts {
            let elapsed = now.duration_since(entry.started_at);
            return Err(Throttled {
                retry_after: self.window.saturating_sub(elapsed),
            });
        }

        Ok(())
    }

    /// Count a failed password check against `origin`'s current window.
    pub fn record_failure(&self, origin: &str) {
        let now = self.clock.now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = windows.entry(origin.to_string()).or_insert(AttemptWindow {
            failures: 0,
            started_at: now,
        });
        entry.failures = entry.failures.saturating_add(1);
    }

    pub fn failures(&self, origin: &str) -> u32 {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(origin)
            .map(|w| w.failures)
            .unwrap_or(0)
    }
}
