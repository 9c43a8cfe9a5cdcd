//! Filter/fetch controller.
//!
//! Holds the current [`FilterState`] and the fetch lifecycle
//! (`idle -> loading -> success | error`). Every filter change or refresh
//! issues a [`FetchTicket`] stamped with a new generation number. When a
//! response comes back it is applied only if its ticket is still the
//! latest one issued; anything older is discarded, so the final state
//! always reflects the most recent request regardless of completion order.

use std::sync::Arc;

use complaint_map_dashboard_models::{FetchStatus, FilterField, FilterState, FilterValue};
use complaint_map_source::{ComplaintSnapshot, ComplaintSource, SourceError};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt as _};

/// A request issued by the controller. Carries the filter snapshot taken
/// at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    filters: FilterState,
}

impl FetchTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }
}

/// A finished fetch, not yet applied.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<ComplaintSnapshot, SourceError>,
}

/// What an applied fetch produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Records arrived.
    Success(Arc<ComplaintSnapshot>),
    /// A valid response with zero records.
    Empty(Arc<ComplaintSnapshot>),
    /// The fetch failed; the reason is user-facing.
    Failure(String),
}

/// Runs `ticket` against `source`.
pub async fn fetch(source: &dyn ComplaintSource, ticket: FetchTicket) -> FetchCompletion {
    log::info!(
        "Fetching complaints from {} (generation {}, {:?})",
        source.name(),
        ticket.generation,
        ticket.filters.query_pairs()
    );
    let result = source.fetch(&ticket.filters).await;
    FetchCompletion { ticket, result }
}

/// Owns the filter selection and the latest accepted snapshot.
#[derive(Debug, Default)]
pub struct FetchController {
    filters: FilterState,
    status: FetchStatus,
    latest_generation: u64,
    snapshot: Option<Arc<ComplaintSnapshot>>,
}

impl FetchController {
    #[must_use]
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub const fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// The snapshot from the last successful fetch, cleared on failure.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Arc<ComplaintSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Generation of the most recently issued ticket (`0` before mount).
    #[must_use]
    pub const fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Issues the initial fetch.
    pub fn mount(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Issues a fetch with unchanged filters.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Updates one filter. Returns a ticket only if the value changed.
    pub fn set_filter(&mut self, field: FilterField, value: FilterValue) -> Option<FetchTicket> {
        self.filters.set(field, value).then(|| self.issue())
    }

    /// Replaces all filters. Returns a ticket only if anything changed.
    pub fn set_filters(&mut self, filters: FilterState) -> Option<FetchTicket> {
        if self.filters == filters {
            return None;
        }
        self.filters = filters;
        Some(self.issue())
    }

    /// Whether `ticket` is the latest one issued.
    #[must_use]
    pub const fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.latest_generation
    }

    /// Applies a completed fetch. Returns `None` when the ticket has been
    /// superseded, leaving all state untouched.
    pub fn apply(&mut self, completion: FetchCompletion) -> Option<FetchOutcome> {
        let FetchCompletion { ticket, result } = completion;

        if !self.is_current(&ticket) {
            log::debug!(
                "Discarding stale response for generation {} (latest is {})",
                ticket.generation,
                self.latest_generation
            );
            return None;
        }

        Some(match result {
            Ok(snapshot) => {
                log::info!(
                    "Generation {} returned {} complaints (total {})",
                    ticket.generation,
                    snapshot.records.len(),
                    snapshot.total
                );
                let snapshot = Arc::new(snapshot);
                self.snapshot = Some(Arc::clone(&snapshot));
                self.status = FetchStatus::Success;
                if snapshot.is_empty() {
                    FetchOutcome::Empty(snapshot)
                } else {
                    FetchOutcome::Success(snapshot)
                }
            }
            Err(e) => {
                let reason = e.to_string();
                log::warn!("Generation {} failed: {reason}", ticket.generation);
                self.snapshot = None;
                self.status = FetchStatus::Error(reason.clone());
                FetchOutcome::Failure(reason)
            }
        })
    }

    fn issue(&mut self) -> FetchTicket {
        self.latest_generation += 1;
        self.status = FetchStatus::Loading;
        FetchTicket {
            generation: self.latest_generation,
            filters: self.filters.clone(),
        }
    }
}

/// Fetches that have been started but not yet applied, yielded in
/// completion order.
#[derive(Default)]
pub struct InFlight {
    pending: FuturesUnordered<BoxFuture<'static, FetchCompletion>>,
}

impl InFlight {
    /// Starts `ticket` against `source`.
    pub fn start(&mut self, source: Arc<dyn ComplaintSource>, ticket: FetchTicket) {
        self.pending
            .push(Box::pin(async move { fetch(source.as_ref(), ticket).await }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Waits for the next fetch to finish. `None` when nothing is in
    /// flight.
    pub async fn next(&mut self) -> Option<FetchCompletion> {
        self.pending.next().await
    }
}

impl std::fmt::Debug for InFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complaint_map_complaint_models::ComplaintRecord;

    fn snapshot(tickets: &[&str]) -> ComplaintSnapshot {
        ComplaintSnapshot {
            total: tickets.len() as u64,
            records: tickets
                .iter()
                .map(|t| ComplaintRecord {
                    ticket_id: (*t).to_string(),
                    ..ComplaintRecord::default()
                })
                .collect(),
            ..ComplaintSnapshot::default()
        }
    }

    fn completion(
        ticket: &FetchTicket,
        result: Result<ComplaintSnapshot, SourceError>,
    ) -> FetchCompletion {
        FetchCompletion {
            ticket: ticket.clone(),
            result,
        }
    }

    #[test]
    fn starts_idle_and_loads_on_mount() {
        let mut controller = FetchController::default();
        assert_eq!(controller.status(), &FetchStatus::Idle);

        let ticket = controller.mount();
        assert_eq!(controller.status(), &FetchStatus::Loading);
        assert_eq!(ticket.generation(), 1);
    }

    #[test]
    fn unchanged_filter_does_not_fetch() {
        let mut controller = FetchController::default();
        controller.mount();

        assert!(
            controller
                .set_filter(FilterField::Category, FilterValue::All)
                .is_none()
        );
        assert!(
            controller
                .set_filter(FilterField::Category, "roads".into())
                .is_some()
        );
        assert!(
            controller
                .set_filters(controller.filters().clone())
                .is_none()
        );
    }

    #[test]
    fn ticket_captures_filters_at_issue_time() {
        let mut controller = FetchController::default();
        let ticket = controller
            .set_filter(FilterField::Priority, "High".into())
            .unwrap();
        controller.set_filter(FilterField::Priority, "Low".into());

        assert_eq!(ticket.filters().priority, FilterValue::Only("High".to_string()));
    }

    #[test]
    fn success_stores_snapshot() {
        let mut controller = FetchController::default();
        let ticket = controller.mount();

        let outcome = controller
            .apply(completion(&ticket, Ok(snapshot(&["A"]))))
            .unwrap();
        assert!(matches!(outcome, FetchOutcome::Success(_)));
        assert_eq!(controller.status(), &FetchStatus::Success);
        assert_eq!(controller.snapshot().map(|s| s.records.len()), Some(1));
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let mut controller = FetchController::default();
        let ticket = controller.mount();

        let outcome = controller
            .apply(completion(&ticket, Ok(snapshot(&[]))))
            .unwrap();
        assert!(matches!(outcome, FetchOutcome::Empty(_)));
        assert_eq!(controller.status(), &FetchStatus::Success);
    }

    #[test]
    fn failure_clears_previous_snapshot() {
        let mut controller = FetchController::default();
        let first = controller.mount();
        controller.apply(completion(&first, Ok(snapshot(&["A", "B"]))));

        let second = controller.refresh();
        let outcome = controller
            .apply(completion(
                &second,
                Err(SourceError::MalformedEnvelope {
                    message: "response has no \"data\" field".to_string(),
                }),
            ))
            .unwrap();

        let FetchOutcome::Failure(reason) = outcome else {
            panic!("expected failure");
        };
        assert!(!reason.is_empty());
        assert!(controller.snapshot().is_none());
        assert!(matches!(controller.status(), FetchStatus::Error(m) if !m.is_empty()));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut controller = FetchController::default();
        let a = controller
            .set_filter(FilterField::Department, "water".into())
            .unwrap();
        let b = controller
            .set_filter(FilterField::Department, "road".into())
            .unwrap();

        assert!(
            controller
                .apply(completion(&b, Ok(snapshot(&["B"]))))
                .is_some()
        );
        assert!(
            controller
                .apply(completion(&a, Ok(snapshot(&["A"]))))
                .is_none()
        );

        let tickets: Vec<&str> = controller
            .snapshot()
            .unwrap()
            .records
            .iter()
            .map(|r| r.ticket_id.as_str())
            .collect();
        assert_eq!(tickets, ["B"]);
        assert_eq!(controller.status(), &FetchStatus::Success);
    }

    #[test]
    fn stale_failure_does_not_clobber_success() {
        let mut controller = FetchController::default();
        let a = controller.mount();
        let b = controller.refresh();

        controller.apply(completion(&b, Ok(snapshot(&["B"]))));
        let stale = controller.apply(completion(
            &a,
            Err(SourceError::Status {
                status: 500,
                message: "boom".to_string(),
            }),
        ));

        assert!(stale.is_none());
        assert_eq!(controller.status(), &FetchStatus::Success);
        assert!(controller.snapshot().is_some());
    }

    #[test]
    fn superseded_request_keeps_loading() {
        let mut controller = FetchController::default();
        let a = controller.mount();
        controller.refresh();

        controller.apply(completion(&a, Ok(snapshot(&["A"]))));
        assert_eq!(controller.status(), &FetchStatus::Loading);
        assert!(controller.snapshot().is_none());
    }
}
