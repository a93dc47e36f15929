//! Bounded worker pool in front of a [`RouteOptimizer`].
//!
//! # Backpressure
//!
//! At most `max_in_flight` requests are accepted at once (queued or
//! running).  [`RouteService::submit`] claims a slot with a single atomic
//! compare-and-swap and answers `Busy` immediately when none is free; it
//! never blocks the caller.  The slot is released before the result is
//! delivered, so a caller that has received its plan may submit again
//! straight away.
//!
//! # Cancellation and timeouts
//!
//! Every accepted request gets its own [`CancelToken`].  Cancelling (or
//! [`RouteTicket::wait_timeout`] expiring) stops the search at its next
//! node expansion.  Searches hold no shared state, so abandoning one never
//! affects other requests.
//!
//! # Panics
//!
//! A panic inside a request (typically a faulty predictor) is caught on the
//! worker and answered as `WorkerPanicked`.  Its slot is released like any
//! other and the pool keeps serving.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, warn};

use rr_cargo::CargoItem;
use rr_core::{CancelToken, TimeContext};
use rr_routing::{DijkstraSearch, PathFinder};

use crate::optimizer::RouteOptimizer;
use crate::plan::{RoutePlan, Shipment};
use crate::{RoutingError, RoutingResult};

// ── RouteService ──────────────────────────────────────────────────────────────

pub struct RouteService<F: PathFinder + 'static = DijkstraSearch> {
    optimizer: Arc<RouteOptimizer<F>>,
    pool:      ThreadPool,
    in_flight: Arc<AtomicUsize>,
    limit:     usize,
}

impl<F: PathFinder + 'static> RouteService<F> {
    /// Start the worker pool sized by the optimizer's configuration.
    pub fn new(optimizer: RouteOptimizer<F>) -> RoutingResult<Self> {
        let config = optimizer.config();
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("route-worker-{i}"));
        if let Some(n) = config.worker_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| RoutingError::Config(format!("cannot start route workers: {e}")))?;
        let limit = config.max_in_flight;
        debug!(threads = pool.current_num_threads(), limit, "route service started");

        Ok(Self {
            optimizer: Arc::new(optimizer),
            pool,
            in_flight: Arc::new(AtomicUsize::new(0)),
            limit,
        })
    }

    pub fn optimizer(&self) -> &RouteOptimizer<F> {
        &self.optimizer
    }

    /// Requests accepted and not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Queue a route request.  Fails with `Busy` when the service is at
    /// capacity.
    pub fn submit(
        &self,
        shipment: Shipment,
        cargo:    Vec<CargoItem>,
        time:     Option<TimeContext>,
    ) -> RoutingResult<RouteTicket> {
        let limit = self.limit;
        if self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < limit).then_some(n + 1))
            .is_err()
        {
            warn!(shipment = %shipment.id, limit, "route service busy, request rejected");
            return Err(RoutingError::Busy { limit });
        }
        let slot = Slot(Arc::clone(&self.in_flight));

        let cancel = CancelToken::new();
        let (tx, rx) = crossbeam_channel::bounded(1);
        let optimizer = Arc::clone(&self.optimizer);
        let token = cancel.clone();

        self.pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                optimizer.optimize_with_cancel(&shipment, &cargo, time, &token)
            }))
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                error!(shipment = %shipment.id, %message, "route worker panicked");
                Err(RoutingError::WorkerPanicked(message))
            });
            drop(slot);
            // The ticket may already be gone; nobody is waiting then.
            let _ = tx.send(result);
        });

        Ok(RouteTicket { rx, cancel })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// One claimed in-flight slot, released on drop.
struct Slot(Arc<AtomicUsize>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

// ── RouteTicket ───────────────────────────────────────────────────────────────

/// Handle to one accepted request.
///
/// Dropping a ticket does not cancel the request; call
/// [`cancel`](Self::cancel) first if the result is no longer wanted.
pub struct RouteTicket {
    rx:     Receiver<RoutingResult<RoutePlan>>,
    cancel: CancelToken,
}

impl RouteTicket {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Block until the request finishes.
    pub fn wait(self) -> RoutingResult<RoutePlan> {
        self.rx.recv().unwrap_or(Err(RoutingError::Cancelled))
    }

    /// Block for at most `timeout`.  On expiry the request is cancelled and
    /// `Cancelled` is returned.
    pub fn wait_timeout(self, timeout: Duration) -> RoutingResult<RoutePlan> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                self.cancel.cancel();
                debug!(?timeout, "route request timed out");
                Err(RoutingError::Cancelled)
            }
            Err(RecvTimeoutError::Disconnected) => Err(RoutingError::Cancelled),
        }
    }

    /// The result if it is already available.
    pub fn try_result(&self) -> Option<RoutingResult<RoutePlan>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(RoutingError::Cancelled)),
        }
    }
}
