//! Routing and dispatch core.
//!
//! The router ("traffic cop") decides which agent, if any, should handle a
//! transcript segment; the dispatcher maps the decision to a handler with
//! the right context shape and isolates its failures.

pub mod dispatch;
pub mod traffic;

pub use dispatch::dispatch;
pub use traffic::{Router, RouterConfig};
