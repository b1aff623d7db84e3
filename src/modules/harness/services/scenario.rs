use crate::core::Result;
use crate::modules::fixtures::LifecycleManager;
use futures_util::FutureExt;
use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};
use tracing::{error, info};

/// Setup / action / teardown around one test body
///
/// Before the body the store is cleaned and seeded; afterwards it is cleaned
/// again, including when the body fails or panics. A lifecycle failure aborts
/// the scenario instead of letting it run against an unknown state.
#[derive(Clone)]
pub struct Scenario {
    lifecycle: LifecycleManager,
}

impl Scenario {
    pub fn new(lifecycle: LifecycleManager) -> Self {
        Self { lifecycle }
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub async fn run<F, Fut, T>(&self, name: &str, body: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        info!(scenario = %name, "Starting test");

        if let Err(err) = self.prepare().await {
            error!(scenario = %name, error = %err, "Scenario setup failed");
            self.teardown(name).await.ok();
            return Err(err);
        }

        let outcome = AssertUnwindSafe(body()).catch_unwind().await;
        let cleaned = self.teardown(name).await;

        match outcome {
            Err(panic) => resume_unwind(panic),
            Ok(Err(err)) => {
                error!(scenario = %name, error = %err, "Test failed");
                Err(err)
            }
            Ok(Ok(value)) => {
                cleaned?;
                info!(scenario = %name, "Test passed");
                Ok(value)
            }
        }
    }

    async fn prepare(&self) -> Result<()> {
        self.lifecycle.clean().await?;
        self.lifecycle.seed().await?;
        Ok(())
    }

    async fn teardown(&self, name: &str) -> Result<()> {
        self.lifecycle.clean().await.map(|_| ()).map_err(|err| {
            error!(scenario = %name, error = %err, "Scenario teardown failed");
            err
        })
    }
}
