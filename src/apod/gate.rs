//! Admission control for upstream calls.
//!
//! # Responsibilities
//! - Cap the number of upstream calls in flight process-wide
//! - Make callers wait (no queue limit) while the cap is reached
//! - Return the slot on every exit path
//!
//! # Design Decisions
//! - Backed by a Tokio semaphore; the permit is an RAII guard so release
//!   happens exactly once, on drop, whatever path the caller takes

use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

use crate::observability::metrics;

/// Fixed-capacity token pool shared by every clone.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyGate {
    /// Create a gate admitting at most `capacity` holders at once.
    ///
    /// A capacity of zero would block forever and is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            tracing::warn!("Concurrency gate capacity of 0 requested, using 1");
            1
        } else {
            capacity
        };

        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    ///
    /// Fails only if the gate was closed, which this crate never does.
    pub async fn acquire(&self) -> Result<GatePermit, AcquireError> {
        let permit = self.permits.clone().acquire_owned().await?;
        let in_flight = self.in_flight();

        tracing::debug!(
            in_flight,
            capacity = self.capacity,
            "Upstream call admitted"
        );
        metrics::record_in_flight(in_flight);

        Ok(GatePermit {
            permit: Some(permit),
            gate: self.clone(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Slots currently held.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }
}

/// A held slot. Dropping it returns the slot to the gate.
#[derive(Debug)]
pub struct GatePermit {
    permit: Option<OwnedSemaphorePermit>,
    gate: ConcurrencyGate,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        drop(self.permit.take());
        metrics::record_in_flight(self.gate.in_flight());
    }
}
