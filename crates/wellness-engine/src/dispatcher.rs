//! Concurrent fan-out of a query to the domain agents.

use std::time::Duration;

use futures::future::join_all;
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};
use wellness_core::{Domain, GenerationError, GeneratorResult, Intent};

use crate::agents::AgentSet;

/// Outcome of one dispatch: successes in invocation order, plus failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub results: Vec<GeneratorResult>,
    pub failed: Vec<(Domain, GenerationError)>,
    pub attempted: usize,
}

impl DispatchReport {
    /// True when at least one agent was called and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.results.is_empty()
    }
}

/// Routes a classified query to one agent, or all four for `General`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    agents: AgentSet,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(agents: AgentSet) -> Self {
        Self { agents, timeout: None }
    }

    /// Sets a deadline shared by every call in a dispatch. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn agents(&self) -> &AgentSet {
        &self.agents
    }

    /// Domains invoked for `intent`, in invocation order.
    pub fn targets(intent: Intent) -> Vec<Domain> {
        match intent.domain() {
            Some(domain) => vec![domain],
            None => Domain::ALL.to_vec(),
        }
    }

    /// Calls the target agents concurrently and waits for all of them to settle.
    ///
    /// Failures are logged and reported, never retried. Unsettled calls at the
    /// deadline count as [`GenerationError::Timeout`].
    pub async fn dispatch(&self, query: &str, intent: Intent, context: &str) -> DispatchReport {
        let targets = Self::targets(intent);
        info!("DISPATCH: {} -> {} agent(s) {:?}", intent, targets.len(), targets);

        let deadline = self.timeout.map(|t| Instant::now() + t);
        let calls = targets.iter().map(|&domain| {
            let agent = self.agents.get(domain);
            async move {
                let call = agent.assess(query, context);
                let outcome = match deadline {
                    Some(deadline) => timeout_at(deadline, call)
                        .await
                        .unwrap_or(Err(GenerationError::Timeout)),
                    None => call.await,
                };
                (domain, outcome)
            }
        });

        let mut report = DispatchReport { attempted: targets.len(), ..DispatchReport::default() };
        for (domain, outcome) in join_all(calls).await {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(e) => {
                    warn!("DISPATCH: {} agent failed: {}", domain, e);
                    report.failed.push((domain, e));
                }
            }
        }

        info!(
            "DISPATCH: {} succeeded, {} failed",
            report.results.len(),
            report.failed.len()
        );
        report
    }
}
