//! Single-dimension probes used to localize a failing cube.

use cube_client::{ApiClient, ClientError, Transport};
use cube_model::{DiagnosticMessage, ValidationQuery};

/// Queries one dimension in isolation.
///
/// Returns `Ok(None)` when the query succeeds and a diagnostic when the API
/// rejects it. Errors other than a rejection are returned to the caller.
pub async fn probe_dimension<T: Transport>(
    client: &ApiClient<T>,
    cube_name: &str,
    dimension: &str,
    measure: Option<&str>,
) -> Result<Option<DiagnosticMessage>, ClientError> {
    let query = ValidationQuery::single_dimension(dimension, measure);
    tracing::debug!(dimension, measure = measure.unwrap_or("-"), "Probing dimension");

    match client.load(&query).await {
        Ok(()) => Ok(None),
        Err(err) if err.is_remote() => Ok(Some(dimension_failure(cube_name, dimension, &err))),
        Err(err) => Err(err),
    }
}

/// Diagnostic for a dimension whose probe failed.
pub fn dimension_failure(cube_name: &str, dimension: &str, err: &ClientError) -> DiagnosticMessage {
    DiagnosticMessage::new(cube_name, format!("Dimension {dimension} failed: {err}"))
}
