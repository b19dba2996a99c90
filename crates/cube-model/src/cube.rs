use serde::{Deserialize, Serialize};

/// Row limit sent with every validation query.
pub const QUERY_LIMIT: u32 = 1;

/// A cube as listed by the catalog endpoint.
///
/// Only field names are kept, in the order the catalog declares them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeDescriptor {
    /// Cube name, unique within the catalog.
    pub name: String,
    /// Measure identifiers in declared order.
    #[serde(default)]
    pub measures: Vec<String>,
    /// Dimension identifiers in declared order.
    #[serde(default)]
    pub dimensions: Vec<String>,
}

impl CubeDescriptor {
    pub fn new(name: impl Into<String>, measures: Vec<String>, dimensions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            measures,
            dimensions,
        }
    }

    /// First declared measure, used to anchor single-dimension probes.
    pub fn primary_measure(&self) -> Option<&str> {
        self.measures.first().map(String::as_str)
    }

    /// Query exercising every measure and dimension of the cube.
    pub fn whole_cube_query(&self) -> ValidationQuery {
        ValidationQuery::new(self.measures.clone(), self.dimensions.clone())
    }
}

/// Minimal query submitted to the load endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationQuery {
    pub measures: Vec<String>,
    pub dimensions: Vec<String>,
    /// Always [`QUERY_LIMIT`]; the rows themselves are never read.
    pub limit: u32,
}

impl ValidationQuery {
    pub fn new(measures: Vec<String>, dimensions: Vec<String>) -> Self {
        Self {
            measures,
            dimensions,
            limit: QUERY_LIMIT,
        }
    }

    /// Query isolating one dimension, optionally anchored on a measure.
    pub fn single_dimension(dimension: &str, measure: Option<&str>) -> Self {
        Self::new(
            measure.map(str::to_string).into_iter().collect(),
            vec![dimension.to_string()],
        )
    }
}
