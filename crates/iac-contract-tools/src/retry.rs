//! Fixed-delay retry for flaky external queries.

use std::fmt::Display;
use std::time::Duration;

/// How often to retry an external call, and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (0 is treated as 1)
    pub attempts: u32,
    /// Delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Run `operation` until it succeeds or the policy's attempts run out.
///
/// Returns the last error when every attempt fails.
pub fn retry_with_fixed_delay<T, E, F>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    attempts,
                    error = %err,
                    "retrying in {:?}",
                    policy.delay
                );
                std::thread::sleep(policy.delay);
                attempt += 1;
            }
            Err(err) => {
                tracing::error!(
                    operation = operation_name,
                    attempts,
                    error = %err,
                    "giving up"
                );
                return Err(err);
            }
        }
    }
}
