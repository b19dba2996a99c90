use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::{CubeOutcome, DiagnosticMessage};

/// Aggregated result of one validation run.
///
/// `statuses` holds exactly one entry per selected cube. `diagnostics` only
/// references cubes whose outcome is [`CubeOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// When the run began, before the catalog fetch.
    pub started_at: DateTime<Utc>,
    /// Outcome per cube name.
    pub statuses: BTreeMap<String, CubeOutcome>,
    /// Failure details; a cube's messages are contiguous and in dimension order.
    pub diagnostics: Vec<DiagnosticMessage>,
    /// Wall-clock duration of the run.
    pub elapsed_seconds: f64,
}

impl RunResult {
    /// An empty result stamped with the current time.
    pub fn empty() -> Self {
        Self {
            started_at: Utc::now(),
            statuses: BTreeMap::new(),
            diagnostics: Vec::new(),
            elapsed_seconds: 0.0,
        }
    }

    pub fn cube_count(&self) -> usize {
        self.statuses.len()
    }

    pub fn passed_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|outcome| **outcome == CubeOutcome::Passed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|outcome| outcome.is_failed())
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Diagnostics for one cube, in recorded order.
    pub fn diagnostics_for<'a>(
        &'a self,
        cube_name: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticMessage> + 'a {
        self.diagnostics
            .iter()
            .filter(move |message| message.cube_name == cube_name)
    }
}
