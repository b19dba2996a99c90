//! Validation engine for cube catalogs.
//!
//! A run fetches the catalog once, then validates each selected cube in its
//! own task. At most `concurrency_limit` cubes hold an admission permit at a
//! time, and a cube keeps its permit for the whole validation.
//!
//! Validating a cube sends one query over all its measures and dimensions.
//! If the API rejects it, each dimension is queried on its own, in declared
//! order, and every rejected dimension becomes a diagnostic.

pub mod accumulator;
pub mod engine;
pub mod error;
pub mod prober;
pub mod scheduler;
pub mod validator;

pub use accumulator::ResultAccumulator;
pub use engine::{RunConfig, run, run_with_transport};
pub use error::{EngineError, Result};
pub use prober::probe_dimension;
pub use scheduler::{DEFAULT_CONCURRENCY, RunSettings, Scheduler, select_cubes};
pub use validator::{CubeValidation, validate_cube};
