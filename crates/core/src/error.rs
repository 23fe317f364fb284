use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by liftlog domain types.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid exercise: {}", .0.join("; "))]
    InvalidExercise(Vec<String>),

    #[error("invalid {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

pub type Result<T> = StdResult<T, CoreError>;
