use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use liftlog_core::constants::{JOB_COLUMNS, JOBS_TABLE, MAX_BATCH_MESSAGES, TIMED_OUT_ERROR};
use liftlog_core::{Job, JobId, JobStatus};
use reqwest::Method;
use serde::Serialize;

use crate::client::{RETURN_REPRESENTATION, SupabaseClient};
use crate::error::RequestError;
use crate::traits::JobRepository;

#[derive(Serialize)]
struct NewJob<'a> {
    data: NewJobData<'a>,
}

#[derive(Serialize)]
struct NewJobData<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct TimeoutPatch {
    status: JobStatus,
    error: &'static str,
    updated_at: DateTime<Utc>,
}

fn validate_batch(messages: &[String]) -> Result<(), RequestError> {
    if messages.is_empty() {
        return Err(RequestError::InvalidInput("no messages to submit".to_owned()));
    }
    if messages.len() > MAX_BATCH_MESSAGES {
        return Err(RequestError::InvalidInput(format!(
            "batch of {} messages exceeds the limit of {MAX_BATCH_MESSAGES}",
            messages.len()
        )));
    }
    if messages.iter().any(|m| m.trim().is_empty()) {
        return Err(RequestError::InvalidInput("messages must not be blank".to_owned()));
    }
    Ok(())
}

#[async_trait]
impl JobRepository for SupabaseClient {
    async fn list_pending_jobs(&self) -> Result<Vec<Job>, RequestError> {
        let since =
            self.pending_cutoff(Utc::now()).to_rfc3339_opts(SecondsFormat::Millis, true);
        let updated_after = format!("gte.{since}");
        let request = self.table(Method::GET, JOBS_TABLE).query(&[
            ("select", JOB_COLUMNS),
            ("updated_at", updated_after.as_str()),
            ("status", "neq.completed"),
            ("status", "neq.failed"),
        ]);

        let mut jobs: Vec<Job> = self.fetch_rows(request, "pending jobs").await?;
        let before = jobs.len();
        jobs.retain(|job| !job.is_terminal());
        if jobs.len() != before {
            tracing::debug!(
                dropped = before - jobs.len(),
                "store returned settled jobs in pending listing"
            );
        }
        Ok(jobs)
    }

    async fn create_jobs(&self, messages: &[String]) -> Result<Vec<Job>, RequestError> {
        validate_batch(messages)?;
        let body: Vec<NewJob<'_>> =
            messages.iter().map(|m| NewJob { data: NewJobData { message: m } }).collect();
        let request = self
            .table(Method::POST, JOBS_TABLE)
            .header("Prefer", format!("{RETURN_REPRESENTATION},resolution=merge-duplicates"))
            .query(&[("select", JOB_COLUMNS)])
            .json(&body);

        let jobs: Vec<Job> = self.fetch_rows(request, "created jobs").await?;
        tracing::info!(submitted = messages.len(), created = jobs.len(), "created jobs");
        Ok(jobs)
    }

    async fn mark_timed_out(&self, job_id: &JobId) -> Result<Job, RequestError> {
        let patch = TimeoutPatch {
            status: JobStatus::Failed,
            error: TIMED_OUT_ERROR,
            updated_at: Utc::now(),
        };
        let id_filter = format!("eq.{job_id}");
        let request = self
            .table(Method::PATCH, JOBS_TABLE)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&[("id", id_filter.as_str()), ("select", JOB_COLUMNS)])
            .json(&patch);

        let job: Job = self.fetch_one(request, "job", job_id.as_str()).await?;
        tracing::info!(job_id = %job_id, "marked job timed out");
        Ok(job)
    }
}
