use dashmap::DashMap;
use std::hash::Hash;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate limit window must be longer than 0 ms")]
    ZeroWindow,
    #[error("rate limit must allow at least one request per window")]
    ZeroMaxRequests,
}

// Fixed-window policy shared by every key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    window_ms: u64,
    max_requests: u32,
}

impl Policy {
    pub fn new(window_ms: u64, max_requests: u32) -> Result<Self, ConfigError> {
        if window_ms == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if max_requests == 0 {
            return Err(ConfigError::ZeroMaxRequests);
        }
        Ok(Self {
            window_ms,
            max_requests,
        })
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }
}

// Rate limit entry - tracks requests per IP/key in the current window
#[derive(Debug, Clone, Copy)]
pub struct WindowState {
    pub count: u32,
    pub window_start: u64,
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub admitted: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Milliseconds until the current window ends. Zero when admitted.
    pub retry_after_ms: u64,
}

/// Per-key fixed-window counter.
///
/// Every key gets `max_requests` admissions per window. A window is anchored
/// at the first request seen after the previous one expired, so a client can
/// burst up to twice the limit across a boundary.
///
/// The read-modify-write in [`RateLimiter::check`] runs under the map's shard
/// guard for that key, so concurrent calls on one key are serialized while
/// calls on other keys proceed.
pub struct RateLimiter<K = String> {
    policy: Policy,
    entries: DashMap<K, WindowState>,
    epoch: Instant,
}

impl<K: Eq + Hash> RateLimiter<K> {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            entries: DashMap::new(),
            epoch: Instant::now(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Monotonic milliseconds since this limiter was created.
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn check(&self, key: K, now: u64) -> Decision {
        let Policy {
            window_ms,
            max_requests,
        } = self.policy;

        let mut entry = self.entries.entry(key).or_insert(WindowState {
            count: 0,
            window_start: now,
        });

        // A timestamp behind the anchor counts as "not expired"
        if now.saturating_sub(entry.window_start) >= window_ms {
            entry.window_start = now;
            entry.count = 0;
        }

        entry.count = entry.count.saturating_add(1);

        let admitted = entry.count <= max_requests;
        let retry_after_ms = if admitted {
            0
        } else {
            entry
                .window_start
                .saturating_add(window_ms)
                .saturating_sub(now)
        };

        Decision {
            admitted,
            limit: max_requests,
            remaining: max_requests.saturating_sub(entry.count),
            retry_after_ms,
        }
    }

    /// Drops every entry whose window has expired at `now`.
    ///
    /// Returns how many entries were removed.
    pub fn sweep(&self, now: u64) -> usize {
        let window_ms = self.policy.window_ms;
        let mut removed = 0;
        self.entries.retain(|_, state| {
            let live = now.saturating_sub(state.window_start) < window_ms;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
