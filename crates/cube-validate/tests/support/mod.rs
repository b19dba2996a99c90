//! In-memory stand-in for the cube API.

#![allow(dead_code)]

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};

use cube_client::{ApiRequest, ApiResponse, ClientError, META_PATH, Result, Transport};
use cube_model::ValidationQuery;

/// How the fake answers a load query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Reject(String),
    Drop,
}

impl Reply {
    pub fn reject(detail: &str) -> Self {
        Self::Reject(detail.to_string())
    }

    fn into_response(self) -> Result<ApiResponse> {
        match self {
            Self::Ok => Ok(ApiResponse {
                status: 200,
                body: br#"{"data": []}"#.to_vec(),
            }),
            Self::Reject(detail) => Ok(ApiResponse {
                status: 400,
                body: json!({ "error": detail }).to_string().into_bytes(),
            }),
            Self::Drop => Err(ClientError::Transport("connection reset".to_string())),
        }
    }
}

type Responder = Box<dyn Fn(&ValidationQuery) -> Reply + Send + Sync>;

/// Fake API answering `/meta` with a fixed catalog and `/load` through a responder.
///
/// Counts requests in flight so tests can check the admission limit.
pub struct FakeApi {
    catalog: Reply,
    catalog_body: Value,
    responder: Responder,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    loads: Mutex<Vec<ValidationQuery>>,
}

impl FakeApi {
    pub fn new(
        catalog_body: Value,
        responder: impl Fn(&ValidationQuery) -> Reply + Send + Sync + 'static,
    ) -> Self {
        Self {
            catalog: Reply::Ok,
            catalog_body,
            responder: Box::new(responder),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            loads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_catalog_reply(mut self, reply: Reply) -> Self {
        self.catalog = reply;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> Vec<ValidationQuery> {
        self.loads.lock().unwrap().clone()
    }
}

impl fmt::Debug for FakeApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeApi")
            .field("delay", &self.delay)
            .field("max_in_flight", &self.max_in_flight())
            .finish_non_exhaustive()
    }
}

impl Transport for FakeApi {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        let reply = if request.url.ends_with(META_PATH) {
            match &self.catalog {
                Reply::Ok => Ok(ApiResponse {
                    status: 200,
                    body: self.catalog_body.to_string().into_bytes(),
                }),
                other => other.clone().into_response(),
            }
        } else {
            let body = request.body.unwrap_or(Value::Null);
            let query: ValidationQuery =
                serde_json::from_value(body["query"].clone()).expect("load body carries a query");
            self.loads.lock().unwrap().push(query.clone());
            (self.responder)(&query).into_response()
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }
}

/// Catalog JSON in the shape the `/meta` endpoint returns.
pub fn catalog(cubes: &[(&str, &[&str], &[&str])]) -> Value {
    let cubes: Vec<Value> = cubes
        .iter()
        .map(|(name, measures, dimensions)| {
            json!({
                "name": name,
                "measures": measures.iter().map(|m| json!({ "name": m })).collect::<Vec<_>>(),
                "dimensions": dimensions.iter().map(|d| json!({ "name": d })).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "cubes": cubes })
}
