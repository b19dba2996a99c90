//! Authenticated API client.
//!
//! Every call attaches the bearer credential, performs one round trip through
//! the [`Transport`], and turns any non-200 answer into [`ClientError::Remote`].

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

use cube_model::{CubeDescriptor, ValidationQuery};

use crate::error::{ClientError, Result, UNKNOWN_ERROR};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use crate::types::{ErrorBody, LoadRequest, MetaResponse};

/// Catalog endpoint path.
pub const META_PATH: &str = "/meta";

/// Query endpoint path.
pub const LOAD_PATH: &str = "/load";

/// Status code treated as success.
const SUCCESS_STATUS: u16 = 200;

/// Client for the cube API.
#[derive(Debug, Clone)]
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    base_url: String,
    authorization: HeaderValue,
}

impl ApiClient<HttpTransport> {
    /// Creates a client that talks to `api_url` over HTTP.
    pub fn connect(api_url: &str, credential: &str) -> Result<Self> {
        Self::with_transport(HttpTransport::new()?, api_url, credential)
    }
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client over an arbitrary transport.
    pub fn with_transport(transport: T, api_url: &str, credential: &str) -> Result<Self> {
        let base_url = api_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::InvalidUrl("API URL is empty".to_string()));
        }
        if credential.trim().is_empty() {
            return Err(ClientError::InvalidCredential);
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", credential.trim()))
            .map_err(|_| ClientError::InvalidCredential)?;
        authorization.set_sensitive(true);

        Ok(Self {
            transport,
            base_url,
            authorization,
        })
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issues a request and decodes the successful body as JSON.
    ///
    /// An empty success body decodes to `null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Value>,
    ) -> Result<Value> {
        let response = self.send_checked(method, path, headers, body).await?;
        if response.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Fetches the cube catalog.
    pub async fn fetch_catalog(&self) -> Result<Vec<CubeDescriptor>> {
        let value = self
            .request(Method::GET, META_PATH, HeaderMap::new(), None)
            .await?;
        let meta: MetaResponse =
            serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))?;

        tracing::debug!(cubes = meta.cubes.len(), "Fetched cube catalog");

        Ok(meta.cubes.into_iter().map(CubeDescriptor::from).collect())
    }

    /// Submits a query; the success body is ignored.
    pub async fn load(&self, query: &ValidationQuery) -> Result<()> {
        let body = serde_json::to_value(LoadRequest { query })
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        self.send_checked(Method::POST, LOAD_PATH, HeaderMap::new(), Some(body))
            .await?;
        Ok(())
    }

    async fn send_checked(
        &self,
        method: Method,
        path: &str,
        mut headers: HeaderMap,
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        headers.insert(AUTHORIZATION, self.authorization.clone());
        let request = ApiRequest {
            method,
            url: self.url(path),
            headers,
            body,
        };

        tracing::trace!(method = %request.method, url = %request.url, "Sending request");

        let response = self.transport.execute(request).await?;
        if response.status != SUCCESS_STATUS {
            return Err(remote_error(&response));
        }
        Ok(response)
    }
}

/// Builds a [`ClientError::Remote`] from a failing response.
fn remote_error(response: &ApiResponse) -> ClientError {
    let detail = serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.detail())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

    tracing::debug!(status = response.status, %detail, "Request rejected");

    ClientError::Remote {
        status: response.status,
        detail,
    }
}
