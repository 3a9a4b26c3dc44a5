//! Broadcaster seam.

use async_trait::async_trait;

use crate::OutboundMessage;

/// Fan-out sink for outbound messages.
///
/// Handlers and the dispatcher depend on this trait only; the server
/// implements it over the live listener set. Sends are fire-and-forget:
/// per-listener failures are the implementation's problem (it drops the
/// listener), never the caller's.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn send(&self, message: OutboundMessage);
}
