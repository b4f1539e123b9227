//! Compensation orchestration
//!
//! The entity store has no multi-object transactions, so multi-step
//! operations register a reverse step per completed forward step. On the
//! first forward failure the reverse steps run in reverse order;
//! compensation failures are logged and do not stop the unwind.

use crate::utils::error::Result;
use futures::future::BoxFuture;
use tracing::{info, warn};

type Compensation = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

pub(super) struct Saga {
    steps: Vec<(&'static str, Compensation)>,
}

impl Saga {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Register the reverse step for a forward step that just succeeded.
    pub fn push<F, Fut>(&mut self, step: &'static str, compensate: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        let compensation: Compensation = Box::new(move || {
            let fut: BoxFuture<'static, Result<()>> = Box::pin(compensate());
            fut
        });
        self.steps.push((step, compensation));
    }

    /// Drop all reverse steps; the operation completed.
    pub fn commit(mut self) {
        self.steps.clear();
    }

    /// Run every reverse step, newest first.
    pub async fn unwind(mut self) {
        while let Some((step, compensate)) = self.steps.pop() {
            match compensate().await {
                Ok(()) => info!("Rolled back step: {}", step),
                Err(err) => warn!("Rollback of step {} failed: {}", step, err),
            }
        }
    }
}
