//! Stale-response guard shared by the view controllers.
//!
//! A [`RequestGuard`] pairs a [`CancellationToken`], cancelled when the
//! view goes away, with a generation counter bumped by every superseding
//! request. Responses that arrive after either event are dropped and never
//! reach view state.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

/// Identifies one request started with [`RequestGuard::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestGuard {
    cancel: CancellationToken,
    generation: AtomicU64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request that supersedes every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.is_closed() && self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Cancel everything in flight. Irreversible.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Await `fut` unless the guard closes first. The result is discarded
    /// with [`ClientError::Cancelled`] if `ticket` was superseded meanwhile.
    pub async fn run<T, F>(&self, ticket: Ticket, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let result = self.run_until_closed(fut).await?;
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "Discarding superseded response");
            return Err(ClientError::Cancelled);
        }
        Ok(result)
    }

    /// Await `fut` unless the guard closes first. Used for writes, which are
    /// never superseded by later reads.
    pub async fn run_until_closed<T, F>(&self, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ClientError::Cancelled),
            result = fut => {
                if self.is_closed() {
                    return Err(ClientError::Cancelled);
                }
                result
            }
        }
    }
}
