use async_trait::async_trait;
use liftlog_core::constants::{EXERCISE_DETAIL_COLUMNS, EXERCISE_SUMMARY_COLUMNS, EXERCISES_TABLE};
use liftlog_core::{Exercise, ExerciseSummary};
use reqwest::Method;
use serde::Serialize;

use crate::client::{RETURN_REPRESENTATION, SupabaseClient};
use crate::error::RequestError;
use crate::traits::ExerciseRepository;

/// Editable columns, under their table names.
#[derive(Serialize)]
struct ExercisePatch<'a> {
    exercise_name: Option<&'a str>,
    summary: Option<&'a str>,
    attributes: &'a [String],
    sets: Option<i64>,
    work: Option<f64>,
    work_unit: Option<&'a str>,
    resistance: Option<f64>,
    resistance_units: Option<&'a str>,
    duration: Option<&'a str>,
}

impl<'a> From<&'a Exercise> for ExercisePatch<'a> {
    fn from(exercise: &'a Exercise) -> Self {
        Self {
            exercise_name: exercise.summary.exercise.as_deref().map(str::trim),
            summary: exercise.summary.summary.as_deref(),
            attributes: &exercise.summary.attributes,
            sets: exercise.sets,
            work: exercise.work,
            work_unit: exercise.work_unit.as_deref(),
            resistance: exercise.resistance,
            resistance_units: exercise.resistance_units.as_deref(),
            duration: exercise.duration.as_deref(),
        }
    }
}

#[async_trait]
impl ExerciseRepository for SupabaseClient {
    async fn list_summaries(&self) -> Result<Vec<ExerciseSummary>, RequestError> {
        let request = self
            .table(Method::GET, EXERCISES_TABLE)
            .query(&[("select", EXERCISE_SUMMARY_COLUMNS), ("order", "created_ts.desc")]);
        self.fetch_rows(request, "exercise summaries").await
    }

    async fn get_exercise(&self, id: &str) -> Result<Exercise, RequestError> {
        let id_filter = format!("eq.{id}");
        let request = self
            .table(Method::GET, EXERCISES_TABLE)
            .query(&[("select", EXERCISE_DETAIL_COLUMNS), ("id", id_filter.as_str())]);
        self.fetch_one(request, "exercise", id).await
    }

    async fn update_exercise(&self, exercise: &Exercise) -> Result<Exercise, RequestError> {
        exercise.validate()?;
        let id_filter = format!("eq.{}", exercise.id());
        let request = self
            .table(Method::PATCH, EXERCISES_TABLE)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&[("id", id_filter.as_str()), ("select", EXERCISE_DETAIL_COLUMNS)])
            .json(&ExercisePatch::from(exercise));

        let updated: Exercise = self.fetch_one(request, "exercise", exercise.id()).await?;
        tracing::info!(exercise_id = %updated.id(), "updated exercise");
        Ok(updated)
    }
}
