//! Repository traits consumed by the service layer.

mod exercise;
mod job;

pub use exercise::ExerciseRepository;
pub use job::JobRepository;
