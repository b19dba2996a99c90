//! Client for the cube query API.
//!
//! Two endpoints are used:
//!
//! - `GET {api_url}/meta` returns the catalog of cubes with their measures and dimensions.
//! - `POST {api_url}/load` runs a query; only the success or failure signal matters here.
//!
//! Requests go through the [`Transport`] trait so the network layer can be
//! replaced in tests. [`HttpTransport`] is the `reqwest`-backed default.
//!
//! # Example
//!
//! ```no_run
//! use cube_client::ApiClient;
//!
//! async fn list_cubes() -> cube_client::Result<()> {
//!     let client = ApiClient::connect("https://analytics.example.com/cubejs-api/v1", "token")?;
//!     for cube in client.fetch_catalog().await? {
//!         println!("{} ({} dimensions)", cube.name, cube.dimensions.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{ApiClient, LOAD_PATH, META_PATH};
pub use error::{ClientError, Result, UNKNOWN_ERROR};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
