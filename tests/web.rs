mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{Call, RecordingBackend};
use nlp_genie::dispatcher::Dispatcher;
use nlp_genie::web::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(backend: Arc<RecordingBackend>) -> Router {
    router(AppState {
        dispatcher: Dispatcher::new(backend, 50),
    })
}

async fn body_text(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), 1_000_000).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn form(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn landing_page() {
    let response = app(RecordingBackend::new())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome to NLP Genie"));
    assert!(html.contains("Choose What you want to do!!"));
    assert!(html.contains("This is a Natural Language Processing Based Web App"));
    assert!(!html.contains("<textarea"));
}

#[tokio::test]
async fn page_shows_the_fields_of_the_selection() {
    let cases = [
        ("summarizer", vec!["text", "num_words"]),
        ("ner", vec!["text"]),
        ("sentiment", vec!["text"]),
        ("question_answering", vec!["context", "question"]),
        ("text_completion", vec!["text"]),
    ];
    for (slug, fields) in cases {
        let response = app(RecordingBackend::new())
            .oneshot(
                Request::builder()
                    .uri(format!("/?task={slug}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains(&format!("<option value=\"{slug}\" selected>")));
        for name in ["text", "num_words", "context", "question"] {
            assert_eq!(
                html.contains(&format!("name=\"{name}\"")),
                fields.contains(&name),
                "field {name} for {slug}"
            );
        }
    }
}

#[tokio::test]
async fn unknown_task_renders_landing() {
    let response = app(RecordingBackend::new())
        .oneshot(
            Request::builder()
                .uri("/?task=translation")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("<option value=\"none\" selected>"));
}

#[tokio::test]
async fn form_submission_renders_result() {
    let backend = RecordingBackend::new();
    let response = app(backend.clone())
        .oneshot(form(
            "task=question_answering&context=Paris+is+the+capital+of+France.\
             &question=What+is+the+capital+of+France%3F",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Here&#39;s your Answer:\nParis"));
    assert!(html.contains("Paris is the capital of France.</textarea>"));
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn untouched_form_invokes_nothing() {
    let backend = RecordingBackend::new();
    let response = app(backend.clone())
        .oneshot(form("task=summarizer&text=&num_words="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(!html.contains("class=\"result"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn summarizer_default_form_runs_with_zero_words() {
    let backend = RecordingBackend::new();
    let page = app(backend.clone())
        .oneshot(
            Request::builder()
                .uri("/?task=summarizer")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let html = body_text(page).await;
    assert!(html.contains("name=\"num_words\" min=\"0\" step=\"1\" value=\"0\">"));

    // Submitted with the word count left at its default
    let response = app(backend.clone())
        .oneshot(form("task=summarizer&text=The+planet+has+water.&num_words=0"))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("class=\"result"));

    // Cleared word count
    let response = app(backend.clone())
        .oneshot(form("task=summarizer&text=The+planet+has+water.&num_words="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let expected = Call::Summarize {
        text: "The planet has water.".to_string(),
        min_length: 0,
        max_length: 50,
    };
    assert_eq!(backend.calls(), vec![expected.clone(), expected]);
}

#[tokio::test]
async fn ner_page_highlights_entities() {
    let response = app(RecordingBackend::new())
        .oneshot(form("task=ner&text=Amy+lives+in+Paris"))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("Please wait a bit. The model is fetching the results!!"));
    assert!(html.contains("<mark class=\"entity\">Paris<span class=\"label\">LOC</span></mark>"));
    assert!(html.contains("<li>Amy (PER)</li>"));
}

#[tokio::test]
async fn failure_still_renders_the_page() {
    let response = app(RecordingBackend::failing("connection refused"))
        .oneshot(form("task=text_completion&text=The+dog"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("role=\"alert\""));
    assert!(html.contains("connection refused"));
}

#[tokio::test]
async fn health_reports_backend() {
    let response = app(RecordingBackend::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(value, json!({ "status": "ok", "backend": "recording" }));
}

#[tokio::test]
async fn tasks_endpoint_lists_the_menu() {
    let response = app(RecordingBackend::new())
        .oneshot(
            Request::builder()
                .uri("/api/tasks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let tasks = value.as_array().unwrap();
    assert_eq!(tasks.len(), 5);
    assert_eq!(tasks[0]["slug"], "summarizer");
    assert_eq!(tasks[0]["fields"], json!(["text", "num_words"]));
    assert_eq!(tasks[2]["placeholders"]["text"], "Enter Text Here");
}

#[tokio::test]
async fn dispatch_api_returns_outcome() {
    let backend = RecordingBackend::new();
    let response = app(backend.clone())
        .oneshot(json_request(
            "/api/dispatch",
            json!({
                "selection": "sentiment",
                "inputs": { "text": "I love this movie" }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(value["state"], "completed");
    assert_eq!(value["output"]["kind"], "sentiment");
    assert_eq!(value["output"]["label"], "POSITIVE");
    assert_eq!(
        backend.calls(),
        [Call::ClassifySentiment("I love this movie".to_string())]
    );
}

#[tokio::test]
async fn dispatch_api_awaiting_input() {
    let response = app(RecordingBackend::new())
        .oneshot(json_request("/api/dispatch", json!({ "selection": "ner" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(value, json!({ "state": "awaiting_input", "selection": "ner" }));
}

#[tokio::test]
async fn dispatch_api_rejects_unknown_selection() {
    let backend = RecordingBackend::new();
    let response = app(backend.clone())
        .oneshot(json_request(
            "/api/dispatch",
            json!({ "selection": "translation", "inputs": { "text": "Bonjour" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(value["error"], "unknown_selection");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn dispatch_api_maps_failures_to_bad_gateway() {
    let response = app(RecordingBackend::failing("model is loading"))
        .oneshot(json_request(
            "/api/dispatch",
            json!({ "selection": "text_completion", "inputs": { "text": "The dog" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(value["error"], "inference_error");
    assert_eq!(value["selection"], "text_completion");
    assert!(value["message"]
        .as_str()
        .unwrap()
        .contains("model is loading"));
}
