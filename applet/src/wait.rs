use std::time::Duration;

use tokio::time::{sleep, Instant};

/// How often to re-check a condition, and for how long before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Calls `observe` every `policy.interval` until `satisfied` accepts the
/// observation or `policy.timeout` has elapsed, and returns the last
/// observation either way. `observe` always runs at least once.
pub async fn poll_until<T>(
    policy: WaitPolicy,
    mut observe: impl FnMut() -> T,
    mut satisfied: impl FnMut(&T) -> bool,
) -> T {
    let deadline = Instant::now() + policy.timeout;
    loop {
        let observed = observe();
        if satisfied(&observed) || Instant::now() >= deadline {
            return observed;
        }
        sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> WaitPolicy {
        WaitPolicy {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
        }
    }

    #[test]
    fn default_policy_is_quarter_second_for_five_seconds() {
        let p = WaitPolicy::default();
        assert_eq!(p.interval, Duration::from_millis(250));
        assert_eq!(p.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn returns_first_satisfying_observation() {
        let mut calls = 0;
        let result = poll_until(
            fast(),
            || {
                calls += 1;
                calls
            },
            |n| *n == 3,
        )
        .await;
        assert_eq!(result, 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn satisfied_immediately_observes_once() {
        let mut calls = 0;
        let result = poll_until(
            fast(),
            || {
                calls += 1;
                true
            },
            |b| *b,
        )
        .await;
        assert!(result);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn timeout_returns_last_observation() {
        let policy = WaitPolicy {
            interval: Duration::from_millis(5),
            timeout: Duration::from_millis(30),
        };
        let started = std::time::Instant::now();
        let mut calls = 0u32;
        let result = poll_until(
            policy,
            || {
                calls += 1;
                calls
            },
            |_| false,
        )
        .await;
        assert_eq!(result, calls);
        assert!(calls >= 2);
        assert!(started.elapsed() >= policy.timeout);
    }

    #[tokio::test]
    async fn zero_timeout_still_observes_once() {
        let policy = WaitPolicy {
            interval: Duration::from_millis(1),
            timeout: Duration::ZERO,
        };
        let result = poll_until(policy, || 7, |_| false).await;
        assert_eq!(result, 7);
    }
}
