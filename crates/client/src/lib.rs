//! Repository client for the liftlog backend.
//!
//! The backend is a Supabase project: jobs and exercises live in PostgREST
//! tables. [`SupabaseClient`] implements the [`JobRepository`] and
//! [`ExerciseRepository`] traits over HTTP; anything else implementing them
//! (an in-memory fake, another backend) can be handed to the job tracker.

mod client;
mod config;
mod error;
mod exercises;
mod jobs;
pub mod traits;

#[cfg(test)]
mod exercises_tests;

pub use client::{SupabaseClient, pending_since, truncate};
pub use config::ClientConfig;
pub use error::RequestError;
pub use traits::{ExerciseRepository, JobRepository};
