//! Data model for cube validation runs.
//!
//! - [`CubeDescriptor`] and [`ValidationQuery`] describe what is sent to the API.
//! - [`CubeOutcome`] and [`DiagnosticMessage`] describe what a cube check found.
//! - [`RunResult`] collects both for the whole run and is what reports render.
//!
//! ```
//! use cube_model::{CubeDescriptor, QUERY_LIMIT};
//!
//! let cube = CubeDescriptor::new(
//!     "Orders",
//!     vec!["Orders.count".into(), "Orders.total".into()],
//!     vec!["Orders.status".into()],
//! );
//! let query = cube.whole_cube_query();
//! assert_eq!(query.limit, QUERY_LIMIT);
//! assert_eq!(cube.primary_measure(), Some("Orders.count"));
//! ```

pub mod cube;
pub mod outcome;
pub mod run;

pub use cube::{CubeDescriptor, QUERY_LIMIT, ValidationQuery};
pub use outcome::{CubeOutcome, DiagnosticMessage};
pub use run::RunResult;
