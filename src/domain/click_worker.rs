//! Background worker applying click counter increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Retries after the first failed increment.
const MAX_RETRIES: usize = 3;

/// Hands a click to the worker without delaying the caller.
///
/// When the queue is full a task waits for capacity instead of dropping the
/// click. A closed queue means the worker is gone; the click is logged and lost.
pub fn enqueue_click(sender: &mpsc::Sender<ClickEvent>, event: ClickEvent) {
    match sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            debug!(code = %event.code, "Click queue full, deferring enqueue");
            let sender = sender.clone();
            tokio::spawn(async move {
                if let Err(e) = sender.send(event).await {
                    error!(code = %e.0.code, "Click queue closed, click not recorded");
                    metrics::counter!("shorturl_click_increment_failures_total").increment(1);
                }
            });
        }
        Err(TrySendError::Closed(event)) => {
            error!(code = %event.code, "Click queue closed, click not recorded");
            metrics::counter!("shorturl_click_increment_failures_total").increment(1);
        }
    }
}

/// Drains click events and increments counters in the store.
///
/// At most `concurrency` increments run at once. Transient store failures are
/// retried with jittered exponential backoff; a link that no longer exists is
/// not retried. Returns once every sender is dropped and all in-flight
/// increments have finished.
pub async fn run_click_worker<L>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<L>,
    concurrency: usize,
) where
    L: LinkRepository + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        if in_flight.len() >= concurrency {
            in_flight.join_next().await;
        }

        let repository = repository.clone();
        in_flight.spawn(async move { record_click(repository.as_ref(), &event).await });
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

/// Applies one increment, retrying transient failures.
async fn record_click<L>(repository: &L, event: &ClickEvent) -> Result<(), AppError>
where
    L: LinkRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(10)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::start(
        strategy,
        || repository.increment_click_count(&event.code),
        |e: &AppError| matches!(e, AppError::Internal { .. }),
    )
    .await;

    match &result {
        Ok(()) => {
            debug!(code = %event.code, "Click recorded");
            metrics::counter!("shorturl_clicks_recorded_total").increment(1);
        }
        Err(AppError::NotFound { .. }) => {
            warn!(code = %event.code, "Link removed before its click was recorded");
        }
        Err(e) => {
            error!(code = %event.code, error = %e, "Failed to record click");
            metrics::counter!("shorturl_click_increment_failures_total").increment(1);
        }
    }

    result
}
