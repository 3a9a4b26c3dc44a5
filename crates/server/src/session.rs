//! Per-connection session loop.
//!
//! Owns the rolling context buffer and the routing rate limiter. Work
//! within one session is logically sequential: one finalized segment at a
//! time, routing decisions totally ordered by the rate limiter. Dispatch is
//! fire-and-forget relative to buffer growth, so a slow agent never delays
//! the next segment.

use std::sync::Arc;
use std::time::{Duration, Instant};

use insight_agents::AgentRegistry;
use insight_config::Settings;
use insight_core::{Broadcaster, ContextBuffer, RoutingDecision};
use insight_llm::TextGenerator;
use insight_router::Router;

use crate::metrics::{record_dispatch, record_routing_decision};
use crate::rate_limit::RateLimiter;

/// Shared collaborators a session needs for routing and dispatch.
#[derive(Clone)]
pub struct SessionDeps {
    pub router: Arc<Router>,
    pub registry: Arc<AgentRegistry>,
    pub generator: Arc<dyn TextGenerator>,
    pub broadcaster: Arc<dyn Broadcaster>,
}

/// Mutable state owned by exactly one session task.
pub struct SessionState {
    context: ContextBuffer,
    rate_limiter: RateLimiter,
    min_segment_chars: usize,
}

impl SessionState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            context: ContextBuffer::new(settings.session.context_capacity),
            rate_limiter: RateLimiter::new(Duration::from_secs_f64(
                settings.router.min_interval_secs.max(0.0),
            )),
            min_segment_chars: settings.session.min_segment_chars,
        }
    }

    pub fn context(&self) -> &ContextBuffer {
        &self.context
    }

    /// Fold one finalized segment into the buffer and, if the rate limiter
    /// allows, route and dispatch it.
    pub async fn handle_final_segment(&mut self, text: &str, deps: &SessionDeps) {
        let segment = text.trim();
        if segment.is_empty() {
            return;
        }

        self.context.push(segment);

        if segment.chars().count() < self.min_segment_chars {
            tracing::info!(chars = segment.chars().count(), "Segment too short, skipping routing");
            return;
        }

        if !self.rate_limiter.ready() {
            tracing::info!(
                elapsed_secs = self.rate_limiter.elapsed_secs(),
                min_interval_secs = self.rate_limiter.min_interval().as_secs_f64(),
                "Skipping routing, interval not met"
            );
            record_routing_decision("skipped");
            return;
        }

        tracing::info!(segment = %segment, "Routing segment");
        let decision = deps
            .router
            .route(segment, &deps.registry, deps.generator.as_ref())
            .await;
        self.rate_limiter.stamp();

        match decision {
            RoutingDecision::Agent(name) => {
                record_routing_decision("agent");
                let segment = segment.to_string();
                let context = self.context.clone();
                let deps = deps.clone();
                // Fire-and-forget: the session keeps consuming segments
                // while the agent runs.
                tokio::spawn(async move {
                    let start = Instant::now();
                    insight_router::dispatch(
                        &name,
                        &segment,
                        &context,
                        &deps.registry,
                        deps.generator.as_ref(),
                        deps.broadcaster.as_ref(),
                    )
                    .await;
                    record_dispatch(&name, start.elapsed().as_secs_f64());
                });
            }
            RoutingDecision::None => {
                record_routing_decision("none");
                tracing::info!("Traffic cop decided no agent is needed");
            }
            RoutingDecision::Unavailable => {
                record_routing_decision("unavailable");
                tracing::warn!("Routing backend unavailable, segment not dispatched");
            }
        }
    }
}
