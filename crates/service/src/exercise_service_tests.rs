use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use liftlog_core::{Exercise, ExerciseSummary};

use crate::ExerciseService;
use crate::test_support::FakeExercises;

fn exercise(id: &str, name: &str) -> Exercise {
    Exercise {
        summary: ExerciseSummary {
            id: id.to_owned(),
            exercise: Some(name.to_owned()),
            ..ExerciseSummary::default()
        },
        sets: Some(3),
        ..Exercise::default()
    }
}

fn service_with(rows: Vec<Exercise>) -> (Arc<FakeExercises>, ExerciseService) {
    let fake = Arc::new(FakeExercises::default());
    *fake.rows.lock().unwrap() = rows;
    let service = ExerciseService::new(fake.clone());
    (fake, service)
}

#[tokio::test]
async fn test_list_summaries_newest_first() {
    let (_, service) = service_with(vec![exercise("1", "Squat"), exercise("2", "Row")]);

    let summaries = service.list_summaries().await.unwrap();

    let names: Vec<_> = summaries.iter().filter_map(|s| s.exercise.as_deref()).collect();
    assert_eq!(names, ["Row", "Squat"]);
    assert!(!service.snapshot().loading());
}

#[tokio::test]
async fn test_list_failure_is_published() {
    let (fake, service) = service_with(Vec::new());
    fake.fail.store(true, Ordering::SeqCst);

    assert!(service.list_summaries().await.is_err());

    let view = service.snapshot();
    assert!(!view.loading());
    assert!(view.last_error().is_some_and(|e| e.is_transient()));
}

#[tokio::test]
async fn test_detail_loading_tracks_fetch() {
    let (_, service) = service_with(vec![exercise("1", "Squat")]);
    let service = Arc::new(service);
    let mut rx = service.subscribe();

    let fetch = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.get_exercise("1").await }
    });

    rx.wait_for(|view| view.detail_loading()).await.unwrap();
    let found = fetch.await.unwrap().unwrap();

    assert_eq!(found.id(), "1");
    let view = service.snapshot();
    assert!(!view.detail_loading());
    assert!(!view.loading());
}

#[tokio::test]
async fn test_missing_exercise_is_not_found() {
    let (_, service) = service_with(Vec::new());

    let err = service.get_exercise("404").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(!service.snapshot().detail_loading());
    assert!(service.snapshot().last_error().is_some());
}

#[tokio::test]
async fn test_update_saves_valid_exercise() {
    let (fake, service) = service_with(vec![exercise("1", "Squat")]);
    let mut edited = exercise("1", "Back squat");
    edited.work = Some(5.0);

    let saved = service.update_exercise(&edited).await.unwrap();

    assert_eq!(saved.summary.exercise.as_deref(), Some("Back squat"));
    assert_eq!(fake.rows.lock().unwrap()[0].work, Some(5.0));
}

#[tokio::test]
async fn test_update_rejects_invalid_exercise() {
    let (fake, service) = service_with(vec![exercise("1", "Squat")]);
    let mut edited = exercise("1", "");
    edited.sets = Some(0);

    let err = service.update_exercise(&edited).await.unwrap_err();

    assert!(err.to_string().contains("exercise name is required"));
    assert_eq!(fake.rows.lock().unwrap()[0].summary.exercise.as_deref(), Some("Squat"));
    assert!(service.snapshot().last_error().is_some());
}

#[tokio::test]
async fn test_abandoned_detail_fetch_clears_loading() {
    let (_, service) = service_with(vec![exercise("1", "Squat")]);

    let abandoned = tokio::time::timeout(Duration::ZERO, service.get_exercise("1")).await;
    assert!(abandoned.is_err());

    let view = service.snapshot();
    assert!(!view.detail_loading());
    assert!(!view.loading());

    service.get_exercise("1").await.unwrap();
    assert!(!service.snapshot().detail_loading());
}
