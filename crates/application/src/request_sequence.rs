//! Latest-request-wins bookkeeping for store fetches.
//!
//! Every fetch takes a ticket before it suspends on the network. When the
//! response arrives the store applies it only if no newer ticket was issued
//! in the meantime, so a slow first response can never overwrite a fast
//! second one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Monotonic request counter owned by one store slot.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns whether the ticket is still the latest issued.
    #[must_use]
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Supersedes every in-flight request without issuing a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// What happened to a store fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was applied to the store state.
    Applied,
    /// A newer request was issued while this one was in flight; the response was dropped.
    Superseded,
    /// The request failed; previous data was kept.
    Failed,
    /// Nothing was requested, for example because the id was blank or the value was unchanged.
    Skipped,
}
