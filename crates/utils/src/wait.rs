//! Deadline-bounded polling.
//!
//! Readiness waits own their timeout; the task engine never cancels them.

use kubeforge_core::{Error, Result, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Timing parameters for [`wait_until`]
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Poll `probe` until it reports `true` or the deadline passes.
///
/// Errors from the probe abort the wait immediately. When the deadline passes
/// a [`Error::Timeout`] naming `operation` is returned.
pub async fn wait_until<F, Fut>(operation: &str, options: WaitOptions, mut probe: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + options.timeout;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        if probe().await? {
            if attempt > 1 {
                tracing::debug!(operation, attempt, "condition met after polling");
            }
            return Ok(());
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::timeout(operation, options.timeout));
        }

        let remaining = deadline - now;
        tracing::trace!(operation, attempt, ?remaining, "condition not met yet");
        sleep(options.interval.min(remaining)).await;
    }
}
