//! Core types for liftlog
//!
//! Domain types shared by the repository client, the job tracker and the CLI.

pub mod constants;
mod env_config;
mod error;
mod exercise;
mod job;

pub use env_config::{env_parse_with_default, parse_with_default};
pub use error::{CoreError, Result};
pub use exercise::{Exercise, ExerciseSummary, with_unit};
pub use job::{Job, JobData, JobId, JobStatus};
