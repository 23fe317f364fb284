use std::sync::Arc;

use anyhow::Result;
use liftlog_client::SupabaseClient;
use liftlog_service::ExerciseService;

use super::print_json;

pub(crate) async fn run_list(client: Arc<SupabaseClient>) -> Result<()> {
    let summaries = ExerciseService::new(client).list_summaries().await?;
    print_json(&summaries)
}

pub(crate) async fn run_get(client: Arc<SupabaseClient>, id: &str) -> Result<()> {
    let exercise = ExerciseService::new(client).get_exercise(id).await?;
    print_json(&exercise)
}
