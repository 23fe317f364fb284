use liftlog_core::{Exercise, ExerciseSummary};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{ClientConfig, ExerciseRepository, RequestError, SupabaseClient};

fn client_for(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(&ClientConfig::new(server.uri(), "anon-key")).unwrap()
}

#[tokio::test]
async fn test_list_summaries_newest_first() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/exercises"))
        .and(query_param("order", "created_ts.desc"))
        .and(query_param("select", "id,exercise:exercise_name,summary,type,attributes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": "2",
                "exercise": "Squat",
                "summary": "5x5",
                "type": "strength",
                "attributes": ["legs"]
            },
            {
                "id": "1",
                "exercise": "Run",
                "summary": "5k easy",
                "type": "cardio",
                "attributes": null
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client.list_summaries().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].exercise.as_deref(), Some("Squat"));
    assert_eq!(rows[0].attributes, ["legs"]);
    assert!(rows[1].attributes.is_empty());
}

#[tokio::test]
async fn test_get_exercise_by_id() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/exercises"))
        .and(query_param("id", "eq.ex-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": "ex-9",
            "exercise": "Row",
            "sets": 4,
            "work": 500,
            "work_unit": "m",
            "created_ts": "2026-10-18T06:30:00+00:00"
        }])))
        .mount(&server)
        .await;

    let exercise = client.get_exercise("ex-9").await.unwrap();
    assert_eq!(exercise.id(), "ex-9");
    assert_eq!(exercise.sets, Some(4));
    assert_eq!(exercise.work_display().as_deref(), Some("500 m"));
}

#[tokio::test]
async fn test_get_exercise_missing() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/exercises"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let err = client.get_exercise("nope").await.unwrap_err();
    assert!(matches!(err, RequestError::NotFound { entity: "exercise", .. }));
}

#[tokio::test]
async fn test_update_exercise_rejects_invalid_without_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let exercise = Exercise {
        summary: ExerciseSummary { id: "ex-1".to_owned(), ..ExerciseSummary::default() },
        sets: Some(0),
        ..Exercise::default()
    };
    let err = client.update_exercise(&exercise).await.unwrap_err();
    assert!(matches!(err, RequestError::InvalidInput(_)));
}

#[tokio::test]
async fn test_update_exercise_sends_table_columns() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/exercises"))
        .and(query_param("id", "eq.ex-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": "ex-1",
            "exercise": "Pull-up",
            "sets": 3
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let exercise = Exercise {
        summary: ExerciseSummary {
            id: "ex-1".to_owned(),
            exercise: Some(" Pull-up ".to_owned()),
            ..ExerciseSummary::default()
        },
        sets: Some(3),
        ..Exercise::default()
    };
    let updated = client.update_exercise(&exercise).await.unwrap();
    assert_eq!(updated.summary.exercise.as_deref(), Some("Pull-up"));

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["exercise_name"], "Pull-up");
    assert_eq!(sent["sets"], 3);
    assert!(sent.get("exercise").is_none());
}
