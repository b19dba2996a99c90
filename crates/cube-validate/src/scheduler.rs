//! Runs cube validations concurrently under an admission limit.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

use cube_client::{ApiClient, Transport};
use cube_model::{CubeDescriptor, DiagnosticMessage, RunResult};

use crate::accumulator::ResultAccumulator;
use crate::error::{EngineError, Result};
use crate::validator::{CubeValidation, validate_cube};

/// Default number of cubes validated at the same time.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Options controlling a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Maximum number of cubes performing network I/O at once.
    pub concurrency_limit: usize,
    /// Cube names to validate; `None` selects the whole catalog.
    pub cube_filter: Option<BTreeSet<String>>,
    /// Stop diagnosing a cube at its first failing dimension.
    pub fail_fast: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY,
            cube_filter: None,
            fail_fast: false,
        }
    }
}

/// Restricts the catalog to the requested cubes, keeping catalog order.
///
/// Names in the filter that the catalog does not contain are dropped.
pub fn select_cubes(
    catalog: Vec<CubeDescriptor>,
    filter: Option<&BTreeSet<String>>,
) -> Vec<CubeDescriptor> {
    let Some(filter) = filter else {
        return catalog;
    };
    for name in filter {
        if !catalog.iter().any(|cube| &cube.name == name) {
            tracing::debug!(cube = %name, "Requested cube not in catalog");
        }
    }
    catalog
        .into_iter()
        .filter(|cube| filter.contains(&cube.name))
        .collect()
}

/// Fetches the catalog and validates the selected cubes.
#[derive(Debug)]
pub struct Scheduler<T> {
    client: Arc<ApiClient<T>>,
    settings: RunSettings,
}

impl<T: Transport + 'static> Scheduler<T> {
    pub fn new(client: ApiClient<T>, settings: RunSettings) -> Result<Self> {
        if settings.concurrency_limit == 0 {
            return Err(EngineError::InvalidConcurrency);
        }
        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Runs every selected cube to completion.
    ///
    /// Only a failed catalog fetch is returned as an error. A cube whose task
    /// dies is recorded as failed so every selected cube has an outcome.
    pub async fn run(&self) -> Result<RunResult> {
        let started_at = Utc::now();
        let start = Instant::now();

        let catalog = self
            .client
            .fetch_catalog()
            .await
            .map_err(EngineError::Catalog)?;
        let catalog_size = catalog.len();
        let selected = select_cubes(catalog, self.settings.cube_filter.as_ref());

        tracing::info!(
            catalog = catalog_size,
            selected = selected.len(),
            concurrency = self.settings.concurrency_limit,
            fail_fast = self.settings.fail_fast,
            "Starting cube validation"
        );

        // Limits beyond what tokio can count behave as unbounded.
        let permits = self.settings.concurrency_limit.min(Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let accumulator = ResultAccumulator::new();
        let mut tasks = JoinSet::new();
        let mut selected_names = Vec::with_capacity(selected.len());

        for cube in selected {
            selected_names.push(cube.name.clone());
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let accumulator = accumulator.clone();
            let fail_fast = self.settings.fail_fast;
            let span = tracing::info_span!("cube", cube = %cube.name);

            tasks.spawn(
                async move {
                    // The semaphore is never closed; the permit lives until the cube is done.
                    let _permit = semaphore.acquire_owned().await.ok();
                    let validation = validate_cube(client.as_ref(), &cube, fail_fast).await;
                    accumulator.record(&cube.name, validation);
                }
                .instrument(span),
            );
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "Cube validation task failed");
            }
        }

        for name in &selected_names {
            if !accumulator.contains(name) {
                accumulator.record(
                    name,
                    CubeValidation::Failed(vec![DiagnosticMessage::new(
                        name,
                        "Validation task did not complete",
                    )]),
                );
            }
        }

        let result = accumulator.finish(started_at, start.elapsed().as_secs_f64());
        tracing::info!(
            passed = result.passed_count(),
            failed = result.failed_count(),
            elapsed_seconds = result.elapsed_seconds,
            "Cube validation finished"
        );
        Ok(result)
    }
}
