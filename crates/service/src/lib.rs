//! Service layer for liftlog
//!
//! Keeps the client-side view of in-flight jobs in step with the backend and
//! wraps exercise lookups with the same loading/error bookkeeping.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod exercise_service;
mod job_tracker;
mod outcome;
mod poller;
mod settings;

#[cfg(test)]
mod exercise_service_tests;
#[cfg(test)]
mod test_support;

pub use exercise_service::{ExerciseService, ExerciseView};
pub use job_tracker::{JobTracker, JobView};
pub use outcome::{CallState, Outcome};
pub use poller::PollHandle;
pub use settings::{ReconcileMode, TrackerSettings};
