//! Library components of the cube-guardian command line.

pub mod config;
pub mod logging;
pub mod report;
