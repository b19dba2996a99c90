//! Wire types for the cube API endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cube_model::{CubeDescriptor, ValidationQuery};

/// Body of a `GET /meta` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaResponse {
    /// Every cube exposed by the API.
    pub cubes: Vec<MetaCube>,
}

/// One cube entry in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaCube {
    /// Cube name.
    pub name: String,

    /// Declared measures.
    #[serde(default)]
    pub measures: Vec<MetaMember>,

    /// Declared dimensions.
    #[serde(default)]
    pub dimensions: Vec<MetaMember>,
}

/// A measure or dimension entry. Only the name is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaMember {
    /// Fully qualified field name.
    pub name: String,
}

impl From<MetaCube> for CubeDescriptor {
    fn from(cube: MetaCube) -> Self {
        CubeDescriptor::new(
            cube.name,
            cube.measures.into_iter().map(|m| m.name).collect(),
            cube.dimensions.into_iter().map(|d| d.name).collect(),
        )
    }
}

/// Body of a `POST /load` request.
#[derive(Debug, Clone, Serialize)]
pub struct LoadRequest<'a> {
    /// The query to run.
    pub query: &'a ValidationQuery,
}

/// Body of a failing response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Error detail; usually a string.
    #[serde(default)]
    pub error: Option<Value>,
}

impl ErrorBody {
    /// Returns the error detail as text, if present.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}
