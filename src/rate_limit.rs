use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Sliding-window rate limiter - tracks recent request timestamps per client key.
//
// Timestamps are f64 seconds since the limiter's own epoch, so `admit` can be
// driven with synthetic time in tests and with `now()` in production.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

struct Inner {
    window: f64,       // trailing window in seconds
    max_requests: usize,
    epoch: Instant,
    entries: DashMap<String, VecDeque<f64>>, // key -> timestamps, oldest first
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                window: window.as_secs_f64(),
                max_requests: max_requests as usize,
                epoch: Instant::now(),
                entries: DashMap::new(),
            }),
        }
    }

    // Seconds elapsed since this limiter was created
    pub fn now(&self) -> f64 {
        self.inner.epoch.elapsed().as_secs_f64()
    }

    /// Admits or rejects one request for `key` at time `now`.
    ///
    /// Entries at or before `now - window` are dropped first. A rejected request
    /// is not recorded, so it does not eat into the next window's budget.
    pub fn admit(&self, key: &str, now: f64) -> bool {
        self.admit_with(key, || now)
    }

    // Wall-clock variant used by the gate
    pub fn check(&self, key: &str) -> bool {
        self.admit_with(key, || self.now())
    }

    // `clock` is read under the entry lock so appends stay in chronological order
    fn admit_with(&self, key: &str, clock: impl FnOnce() -> f64) -> bool {
        // the entry guard holds the shard lock for the whole prune-check-append
        let mut timestamps = self.inner.entries.entry(key.to_string()).or_default();

        let now = clock();
        let cutoff = now - self.inner.window;

        while let Some(&oldest) = timestamps.front() {
            if oldest <= cutoff {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.inner.max_requests {
            return false;
        }

        timestamps.push_back(now);
        true
    }

    /// Drops every key whose newest timestamp has left the window.
    /// Returns how many keys were removed.
    pub fn sweep(&self, now: f64) -> usize {
        let cutoff = now - self.inner.window;
        let before = self.inner.entries.len();
        self.inner
            .entries
            .retain(|_, timestamps| timestamps.back().is_some_and(|&newest| newest > cutoff));
        before.saturating_sub(self.inner.entries.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.inner.entries.len()
    }
}

// Background sweep - keeps idle keys from piling up forever
pub async fn sweeper(limiter: RateLimiter, every: Duration) {
    // a zero period would panic in tokio
    let every = every.max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(every);

    tracing::info!(interval = ?every, "Rate limit sweeper started");

    loop {
        interval.tick().await;

        let removed = limiter.sweep(limiter.now());
        crate::metrics::TRACKED_KEYS.set(limiter.tracked_keys() as f64);

        if removed > 0 {
            tracing::debug!(removed, remaining = limiter.tracked_keys(), "Swept idle rate limit keys");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(max, Duration::from_secs(window_secs))
    }

    #[test]
    fn admits_up_to_max_at_same_instant() {
        let rl = limiter(30, 60);
        for _ in 0..30 {
            assert!(rl.admit("k", 5.0));
        }
        assert!(!rl.admit("k", 5.0));
    }

    #[test]
    fn entries_expire_after_window() {
        let rl = limiter(5, 60);
        for _ in 0..5 {
            assert!(rl.admit("k", 100.0));
        }
        assert!(!rl.admit("k", 159.9));
        assert!(rl.admit("k", 160.001));
    }

    #[test]
    fn boundary_timestamp_is_expired() {
        // an entry exactly `window` old no longer counts
        let rl = limiter(1, 60);
        assert!(rl.admit("k", 0.0));
        assert!(!rl.admit("k", 59.0));
        assert!(rl.admit("k", 60.0));
    }

    #[test]
    fn keys_have_independent_budgets() {
        let rl = limiter(2, 60);
        assert!(rl.admit("a", 0.0));
        for t in 0..50 {
            rl.admit("b", t as f64);
        }
        assert!(rl.admit("a", 1.0));
        assert!(!rl.admit("a", 2.0));
    }

    #[test]
    fn rejections_are_not_recorded() {
        let rl = limiter(3, 60);
        for _ in 0..3 {
            assert!(rl.admit("k", 0.0));
        }
        assert!(!rl.admit("k", 30.0));
        assert!(!rl.admit("k", 45.0));

        let fresh = (0..4).filter(|_| rl.admit("k", 61.0)).count();
        assert_eq!(fresh, 3);
    }

    #[test]
    fn sliding_window_scenario() {
        let rl = limiter(3, 60);
        assert!(rl.admit("k", 0.0));
        assert!(rl.admit("k", 10.0));
        assert!(rl.admit("k", 20.0));
        assert!(!rl.admit("k", 30.0));
        // only the t=0 entry has left the window
        assert!(rl.admit("k", 61.0));
        assert!(!rl.admit("k", 62.0));
    }

    #[test]
    fn same_history_gives_same_answers() {
        let calls = [("a", 0.0), ("a", 1.0), ("b", 1.0), ("a", 2.0), ("a", 70.0), ("b", 90.0)];
        let run = || {
            let rl = limiter(2, 60);
            calls.iter().map(|(k, t)| rl.admit(k, *t)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
        assert_eq!(run(), vec![true, true, true, false, true, true]);
    }

    #[test]
    fn sweep_drops_only_idle_keys() {
        let rl = limiter(10, 60);
        rl.admit("old", 0.0);
        rl.admit("fresh", 50.0);
        assert_eq!(rl.tracked_keys(), 2);

        assert_eq!(rl.sweep(70.0), 1);
        assert_eq!(rl.tracked_keys(), 1);
        assert!(rl.admit("fresh", 70.0));
    }

    #[test]
    fn concurrent_admits_never_exceed_max() {
        let rl = limiter(50, 60);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rl = rl.clone();
                std::thread::spawn(move || (0..100).filter(|_| rl.admit("shared", 1.0)).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
    }

    #[test]
    fn concurrent_checks_append_in_time_order() {
        let rl = limiter(100_000, 60);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rl = rl.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        assert!(rl.check("shared"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let timestamps = rl.inner.entries.get("shared").unwrap();
        assert_eq!(timestamps.len(), 4000);
        assert!(timestamps.iter().zip(timestamps.iter().skip(1)).all(|(a, b)| a <= b));
    }

    #[tokio::test]
    async fn sweeper_survives_zero_interval() {
        let rl = limiter(1, 60);
        rl.admit("idle", 0.0);

        let handle = tokio::spawn(sweeper(rl.clone(), Duration::ZERO));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!handle.is_finished());
        handle.abort();
    }
}
