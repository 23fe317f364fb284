use std::sync::Arc;

use liftlog_client::{ExerciseRepository, RequestError};
use liftlog_core::{Exercise, ExerciseSummary};
use tokio::sync::watch;

use crate::outcome::{CallGuard, CallState, Outcome, Settle, tracked};

/// Loading and error state of exercise lookups.
#[derive(Debug, Clone, Default)]
pub struct ExerciseView {
    calls: CallState,
    detail_in_flight: u32,
}

impl ExerciseView {
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.calls.is_loading()
    }

    /// True while a single-exercise fetch is running.
    #[must_use]
    pub const fn detail_loading(&self) -> bool {
        self.detail_in_flight > 0
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&Arc<RequestError>> {
        self.calls.last_error()
    }

    fn begin_detail(&mut self) {
        self.detail_in_flight = self.detail_in_flight.saturating_add(1);
    }

    fn end_detail(&mut self) {
        self.detail_in_flight = self.detail_in_flight.saturating_sub(1);
    }
}

fn exercise_calls(view: &mut ExerciseView) -> &mut CallState {
    &mut view.calls
}

pub struct ExerciseService {
    repo: Arc<dyn ExerciseRepository>,
    view: watch::Sender<ExerciseView>,
}

impl ExerciseService {
    #[must_use]
    pub fn new(repo: Arc<dyn ExerciseRepository>) -> Self {
        let (view, _) = watch::channel(ExerciseView::default());
        Self { repo, view }
    }

    #[must_use]
    pub fn snapshot(&self) -> ExerciseView {
        self.view.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ExerciseView> {
        self.view.subscribe()
    }

    pub async fn list_summaries(&self) -> Outcome<Vec<ExerciseSummary>> {
        tracked(
            &self.view,
            "list_summaries",
            exercise_calls,
            self.repo.list_summaries(),
            |_, _| Settle::Record,
        )
        .await
    }

    pub async fn get_exercise(&self, id: &str) -> Outcome<Exercise> {
        self.view.send_modify(ExerciseView::begin_detail);
        let mut detail = CallGuard::new(&self.view, ExerciseView::end_detail);
        tracked(
            &self.view,
            "get_exercise",
            exercise_calls,
            self.repo.get_exercise(id),
            |view, _| {
                detail.disarm();
                view.end_detail();
                Settle::Record
            },
        )
        .await
    }

    pub async fn update_exercise(&self, exercise: &Exercise) -> Outcome<Exercise> {
        tracked(
            &self.view,
            "update_exercise",
            exercise_calls,
            self.repo.update_exercise(exercise),
            |_, _| Settle::Record,
        )
        .await
    }
}
