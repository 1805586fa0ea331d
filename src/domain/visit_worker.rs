//! Background worker draining the visit queue.

use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::application::services::VisitRecorder;
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::domain::visit_event::VisitEvent;

/// Consumes visit events and records them with bounded concurrency.
///
/// At most `concurrency` recordings run at once. Recording errors are logged
/// and dropped; they never reach the redirect that produced the event.
///
/// Returns once every sender is dropped and all in-flight recordings have
/// finished, which makes it usable as a drain point on shutdown.
pub async fn run_visit_worker<L, V>(
    mut rx: mpsc::Receiver<VisitEvent>,
    recorder: Arc<VisitRecorder<L, V>>,
    concurrency: usize,
) where
    L: LinkRepository + ?Sized + 'static,
    V: VisitRepository + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        while in_flight.try_join_next().is_some() {}

        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let recorder = recorder.clone();
        in_flight.spawn(async move {
            let key = event.key.clone();
            match recorder.record(event).await {
                Ok(Some(visit)) => {
                    debug!("Visit {} recorded for {}", visit.id, key);
                    metrics::counter!("visits_recorded_total").increment(1);
                }
                Ok(None) => {
                    debug!("Link {} vanished before its visit was recorded", key);
                }
                Err(e) => {
                    warn!("Failed to record visit for {}: {}", key, e);
                    metrics::counter!("visits_dropped_total", "reason" => "store_error")
                        .increment(1);
                }
            }
            drop(permit);
        });
    }

    while in_flight.join_next().await.is_some() {}
    info!("Visit worker stopped");
}
