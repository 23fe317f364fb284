//! Shared constants for liftlog.

/// PostgREST table holding asynchronous processing jobs.
pub const JOBS_TABLE: &str = "jobs";

/// PostgREST table holding processed exercises.
pub const EXERCISES_TABLE: &str = "exercises";

/// Columns selected when listing jobs.
pub const JOB_COLUMNS: &str = "id,status,data,error,created_at,updated_at,retry_count,user_id";

/// Columns selected for the exercise list, with the name column aliased.
pub const EXERCISE_SUMMARY_COLUMNS: &str = "id,exercise:exercise_name,summary,type,attributes";

/// Columns selected for a single exercise.
pub const EXERCISE_DETAIL_COLUMNS: &str = concat!(
    "id,exercise:exercise_name,summary,type,attributes,",
    "sets,work,work_unit,resistance,resistance_units,duration,created_ts"
);

/// Error text written on a job the client gave up waiting for.
pub const TIMED_OUT_ERROR: &str = "Timed Out";

/// Trailing window, in seconds, within which a job still counts as pending.
pub const DEFAULT_PENDING_WINDOW_SECS: u64 = 300;

/// Delay between the end of one poll and the start of the next.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// How long an unconfirmed optimistic job survives refreshes in merge mode.
pub const DEFAULT_OPTIMISTIC_GRACE_SECS: u64 = 10;

/// HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of messages accepted in one submission batch.
pub const MAX_BATCH_MESSAGES: usize = 100;
