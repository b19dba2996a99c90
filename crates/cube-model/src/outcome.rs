use std::fmt;

use serde::{Deserialize, Serialize};

/// Final status of a cube's validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeOutcome {
    Passed,
    Failed,
}

impl CubeOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
        }
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for CubeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A diagnostic line attached to a failed cube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(rename = "cube")]
    pub cube_name: String,
    pub text: String,
}

impl DiagnosticMessage {
    pub fn new(cube_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            cube_name: cube_name.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cube {}: {}", self.cube_name, self.text)
    }
}
