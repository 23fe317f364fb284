use async_trait::async_trait;
use liftlog_core::{Exercise, ExerciseSummary};

use crate::error::RequestError;

/// Remote operations on processed exercises.
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    /// All exercises, newest first.
    async fn list_summaries(&self) -> Result<Vec<ExerciseSummary>, RequestError>;

    /// One exercise with its full detail.
    async fn get_exercise(&self, id: &str) -> Result<Exercise, RequestError>;

    /// Validate and store edits to an exercise, returning the stored row.
    async fn update_exercise(&self, exercise: &Exercise) -> Result<Exercise, RequestError>;
}
