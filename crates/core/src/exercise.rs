//! Processed exercise records produced by the backend from job messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, Result};

/// One row of the exercise list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub exercise: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub attributes: Vec<String>,
}

/// Full exercise detail.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(flatten)]
    pub summary: ExerciseSummary,
    #[serde(default)]
    pub sets: Option<i64>,
    #[serde(default)]
    pub work: Option<f64>,
    #[serde(default)]
    pub work_unit: Option<String>,
    #[serde(default)]
    pub resistance: Option<f64>,
    #[serde(default)]
    pub resistance_units: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub created_ts: Option<DateTime<Utc>>,
}

impl Exercise {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    /// Checks the edit rules for an exercise, reporting every violation.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidExercise`] listing all failed rules.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let name = self.summary.exercise.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            problems.push("exercise name is required".to_owned());
        }
        if self.sets.is_some_and(|sets| sets < 1) {
            problems.push("sets must be at least 1".to_owned());
        }
        if self.work.is_some_and(|work| work < 0.0 || work.is_nan()) {
            problems.push("work must be positive".to_owned());
        }
        if self.resistance.is_some_and(|resistance| resistance < 0.0 || resistance.is_nan()) {
            problems.push("resistance must be positive".to_owned());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidExercise(problems))
        }
    }

    /// Work amount with its unit, e.g. `12 reps`.
    #[must_use]
    pub fn work_display(&self) -> Option<String> {
        self.work.map(|work| with_unit(work, self.work_unit.as_deref()))
    }

    /// Resistance with its unit, e.g. `40 kg`.
    #[must_use]
    pub fn resistance_display(&self) -> Option<String> {
        self.resistance.map(|resistance| with_unit(resistance, self.resistance_units.as_deref()))
    }
}

/// Formats `value` followed by `unit` when a non-blank unit is present.
#[must_use]
pub fn with_unit(value: f64, unit: Option<&str>) -> String {
    match unit.map(str::trim).filter(|u| !u.is_empty()) {
        Some(unit) => format!("{value} {unit}"),
        None => value.to_string(),
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Int(n) => n.to_string(),
    })
}

fn deserialize_null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
