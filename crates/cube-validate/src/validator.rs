//! Whole-cube check followed by dimension-level diagnosis.

use cube_client::{ApiClient, Transport};
use cube_model::{CubeDescriptor, CubeOutcome, DiagnosticMessage};

use crate::prober::{dimension_failure, probe_dimension};

/// Result of validating one cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CubeValidation {
    Passed,
    Failed(Vec<DiagnosticMessage>),
}

impl CubeValidation {
    pub fn outcome(&self) -> CubeOutcome {
        match self {
            Self::Passed => CubeOutcome::Passed,
            Self::Failed(_) => CubeOutcome::Failed,
        }
    }

    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        match self {
            Self::Passed => &[],
            Self::Failed(diagnostics) => diagnostics,
        }
    }
}

/// Validates a cube.
///
/// A rejected whole-cube query triggers one probe per dimension, in declared
/// order, each anchored on the cube's first measure. With `fail_fast` the
/// probing stops at the first failing dimension.
///
/// A request that does not complete is recorded as a failure with a generic
/// message instead of aborting the cube.
pub async fn validate_cube<T: Transport>(
    client: &ApiClient<T>,
    cube: &CubeDescriptor,
    fail_fast: bool,
) -> CubeValidation {
    match client.load(&cube.whole_cube_query()).await {
        Ok(()) => {
            tracing::debug!("Cube passed");
            return CubeValidation::Passed;
        }
        Err(err) if err.is_remote() => {
            tracing::warn!(error = %err, "Cube failed, probing dimensions");
        }
        Err(err) => {
            tracing::warn!(error = %err, "Cube check did not complete");
            return CubeValidation::Failed(vec![DiagnosticMessage::new(
                &cube.name,
                format!("Validation query failed: {err}"),
            )]);
        }
    }

    let measure = cube.primary_measure();
    let mut diagnostics = Vec::new();
    for dimension in &cube.dimensions {
        let diagnostic = match probe_dimension(client, &cube.name, dimension, measure).await {
            Ok(diagnostic) => diagnostic,
            Err(err) => {
                tracing::warn!(dimension = %dimension, error = %err, "Probe did not complete");
                Some(dimension_failure(&cube.name, dimension, &err))
            }
        };
        if let Some(diagnostic) = diagnostic {
            diagnostics.push(diagnostic);
            if fail_fast {
                break;
            }
        }
    }

    CubeValidation::Failed(diagnostics)
}
