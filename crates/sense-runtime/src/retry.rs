use sense_config::TimingConfig;
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::debug;

use crate::confirm::SETTLE_TICKS;

/// Run `attempt` up to `max_attempts` times, each bounded by
/// `per_attempt_timeout`, until it breaks with a value.
///
/// The attempt number (from 0) is passed in. An attempt that times out counts
/// as a `Continue`. Returns `None` when every attempt is used up.
pub async fn retry<T, F, Fut>(
    max_attempts: u32,
    per_attempt_timeout: Duration,
    mut attempt: F,
) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ControlFlow<T>>,
{
    for n in 0..max_attempts {
        match tokio::time::timeout(per_attempt_timeout, attempt(n)).await {
            Ok(ControlFlow::Break(value)) => return Some(value),
            Ok(ControlFlow::Continue(())) => {}
            Err(_) => debug!(attempt = n, "attempt timed out"),
        }
    }
    debug!(max_attempts, "attempts exhausted");
    None
}

/// Upper bound for one attempt: a tick, every confirmation wait an attempt can
/// chain, and the settle ticks before pickup.
pub fn attempt_budget(timing: &TimingConfig) -> Duration {
    let tick = timing.tick_timeout_ms;
    let ms = tick * (SETTLE_TICKS as u64 + 2)
        + timing.confirm_timeout_ms * 2
        + timing.landing_timeout_ms
        + timing.entity_spawn_timeout_ms;
    Duration::from_millis(ms)
}
