//! Shared result state written by cube tasks.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use cube_model::{CubeOutcome, DiagnosticMessage, RunResult};

use crate::validator::CubeValidation;

#[derive(Debug, Default)]
struct Accumulated {
    statuses: BTreeMap<String, CubeOutcome>,
    diagnostics: Vec<DiagnosticMessage>,
}

/// Collects outcomes and diagnostics from concurrent cube tasks.
///
/// A cube's outcome and its diagnostics are recorded under one lock, so a
/// cube's diagnostics stay contiguous in the final sequence.
#[derive(Debug, Clone, Default)]
pub struct ResultAccumulator {
    inner: Arc<Mutex<Accumulated>>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Accumulated> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a cube's validation. The first record for a cube wins.
    ///
    /// Returns `false` if the cube already had an outcome.
    pub fn record(&self, cube_name: &str, validation: CubeValidation) -> bool {
        let mut state = self.lock();
        if state.statuses.contains_key(cube_name) {
            tracing::error!(cube = cube_name, "Outcome already recorded, ignoring");
            return false;
        }
        state
            .statuses
            .insert(cube_name.to_string(), validation.outcome());
        if let CubeValidation::Failed(diagnostics) = validation {
            state.diagnostics.extend(diagnostics);
        }
        true
    }

    pub fn contains(&self, cube_name: &str) -> bool {
        self.lock().statuses.contains_key(cube_name)
    }

    pub fn len(&self) -> usize {
        self.lock().statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains the collected state into a [`RunResult`].
    pub fn finish(&self, started_at: DateTime<Utc>, elapsed_seconds: f64) -> RunResult {
        let state = std::mem::take(&mut *self.lock());
        RunResult {
            started_at,
            statuses: state.statuses,
            diagnostics: state.diagnostics,
            elapsed_seconds,
        }
    }
}
