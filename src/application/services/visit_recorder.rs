//! Turns queued visit events into stored visit records.

use std::sync::Arc;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::debug;

use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::infrastructure::geo::GeoLookup;
use crate::utils::user_agent::parse_user_agent;

/// Extra attempts made after a transient store failure.
const RECORD_RETRIES: usize = 2;

/// Records one visit per event: resolves the link, derives browser, OS and
/// country, then appends the visit and bumps the link's click count in a
/// single store transaction.
pub struct VisitRecorder<L: LinkRepository + ?Sized, V: VisitRepository + ?Sized> {
    link_repository: Arc<L>,
    visit_repository: Arc<V>,
    geo: Option<Arc<dyn GeoLookup>>,
}

impl<L: LinkRepository + ?Sized, V: VisitRepository + ?Sized> VisitRecorder<L, V> {
    pub fn new(link_repository: Arc<L>, visit_repository: Arc<V>) -> Self {
        Self {
            link_repository,
            visit_repository,
            geo: None,
        }
    }

    /// Enables country resolution for client addresses.
    pub fn with_geo(mut self, geo: Arc<dyn GeoLookup>) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Records the visit described by `event`.
    ///
    /// Returns `Ok(None)` if the link no longer exists. Store failures are
    /// retried with backoff before being returned.
    pub async fn record(&self, event: VisitEvent) -> Result<Option<Visit>, AppError> {
        let Some(link) = self.link_repository.find_by_key(&event.key).await? else {
            return Ok(None);
        };

        let client = parse_user_agent(event.user_agent.as_deref());

        let country = match (&self.geo, event.ip) {
            (Some(geo), Some(ip)) => geo.country(ip).await,
            _ => None,
        };

        let new_visit = NewVisit {
            link_id: link.id,
            browser: client.browser,
            os: client.os,
            country,
        };

        let strategy = ExponentialBackoff::from_millis(10)
            .max_delay(Duration::from_millis(500))
            .map(jitter)
            .take(RECORD_RETRIES);

        let visit = RetryIf::spawn(
            strategy,
            || self.visit_repository.record_visit(new_visit.clone()),
            |e: &AppError| {
                let transient = matches!(e, AppError::Internal { .. });
                if transient {
                    debug!("Retrying visit for {}: {}", event.key, e);
                }
                transient
            },
        )
        .await;

        match visit {
            Ok(visit) => Ok(Some(visit)),
            // Link removed between lookup and insert.
            Err(AppError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
