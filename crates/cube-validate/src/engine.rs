//! Entry point used by the command line.

use std::fmt;

use cube_client::{ApiClient, HttpTransport, Transport};
use cube_model::RunResult;

use crate::error::{EngineError, Result};
use crate::scheduler::{RunSettings, Scheduler};

/// Everything needed to start a run.
#[derive(Clone, Default)]
pub struct RunConfig {
    pub api_url: String,
    pub credential: String,
    pub settings: RunSettings,
}

impl RunConfig {
    pub fn new(api_url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            credential: credential.into(),
            settings: RunSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Rejects configurations the engine refuses to run with.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(EngineError::MissingApiUrl);
        }
        if self.credential.trim().is_empty() {
            return Err(EngineError::MissingCredential);
        }
        if self.settings.concurrency_limit == 0 {
            return Err(EngineError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("api_url", &self.api_url)
            .field("credential", &"<redacted>")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Validates the selected cubes of the API at `config.api_url`.
pub async fn run(config: &RunConfig) -> Result<RunResult> {
    config.validate()?;
    run_with_transport(HttpTransport::new()?, config).await
}

/// Same as [`run`] over a caller-supplied transport.
pub async fn run_with_transport<T: Transport + 'static>(
    transport: T,
    config: &RunConfig,
) -> Result<RunResult> {
    config.validate()?;
    let client = ApiClient::with_transport(transport, &config.api_url, &config.credential)?;
    Scheduler::new(client, config.settings.clone())?.run().await
}
