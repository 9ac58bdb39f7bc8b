use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoffBuilder;

/// The reconnection backoff policy from §4.5: initial 1s, cap 30s,
/// retried indefinitely (`max_elapsed_time` unset).
pub fn reconnect_backoff() -> backoff::ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_secs(1))
        .with_max_interval(Duration::from_secs(30))
        .with_max_elapsed_time(None)
        .build()
}

/// Runs `connect` under [`reconnect_backoff`], logging each failed
/// attempt, until it succeeds. Broker disconnects never surface as a
/// fatal error to the orchestrator (§7 `BrokerUnavailable`).
pub async fn connect_with_backoff<T, F, Fut>(mut connect: F) -> T
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = etrap_utils::Result<T>>,
{
    let mut backoff = reconnect_backoff();
    loop {
        match connect().await {
            Ok(value) => return value,
            Err(e) => {
                let delay = backoff.next_backoff().unwrap_or(Duration::from_secs(30));
                tracing::warn!(error = %e, delay_ms = delay.as_millis() as u64, "broker connect failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }
    }
}
