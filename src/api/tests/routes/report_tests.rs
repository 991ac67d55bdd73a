use crate::api::{AppState, create_router};
use crate::test_utils::FakeCloudController;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

async fn get(fake: FakeCloudController, uri: &str) -> (StatusCode, Option<String>, String) {
    let app = create_router(AppState::new(fake));

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

fn single_app() -> FakeCloudController {
    FakeCloudController::builder()
        .with_app("g1", "svc-a", &[("FOO", "bar")])
        .with_env_payload(
            "g1",
            r#"{"staging_env_json":{},"running_env_json":{},"environment_json":{"FOO":"bar"},"system_env_json":{"VCAP_SERVICES":{}}}"#,
        )
        .build()
}

#[tokio::test]
async fn test_report_for_existing_app() {
    let fake = single_app();
    let (status, content_type, body) = get(fake.clone(), "/svc-a").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));

    let looking = body.find(r#"looking for "svc-a""#).unwrap();
    let pair = body.find(r#""FOO" : "bar""#).unwrap();
    let payload = body
        .find(r#""system_env_json":{"VCAP_SERVICES":{}}"#)
        .unwrap();
    assert!(looking < pair && pair < payload);
    assert_eq!(fake.calls(), ["/v2/apps", "/v2/apps/g1/env"]);
}

#[tokio::test]
async fn test_report_for_missing_app() {
    let fake = single_app();
    let (status, _, body) = get(fake.clone(), "/svc-missing").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "looking for \"svc-missing\" ...\n\nError: Could not find app with name \"svc-missing\"\n"
    );
    assert_eq!(fake.calls(), ["/v2/apps"]);
}

#[tokio::test]
async fn test_name_differing_in_case_is_not_found() {
    let (_, _, body) = get(single_app(), "/SVC-A").await;

    assert!(body.contains("Could not find app with name \"SVC-A\""));
    assert!(!body.contains("FOO"));
}

#[tokio::test]
async fn test_listing_failure_is_reported_distinctly() {
    let fake = FakeCloudController::builder()
        .with_app("g1", "svc-a", &[])
        .with_failing_listing()
        .build();

    let (status, _, body) = get(fake, "/svc-a").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Error: Could not list apps"));
    assert!(!body.contains("Could not find app"));
}

#[tokio::test]
async fn test_env_request_failure_reported_without_payload() {
    let fake = FakeCloudController::builder()
        .with_app("g1", "svc-a", &[("FOO", "bar")])
        .with_env_request_failure("g1")
        .build();

    let (status, _, body) = get(fake, "/svc-a").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""FOO" : "bar""#));
    assert!(body.contains("Error requesting environment of app g1"));
    assert!(!body.contains("environment_json"));
}

#[tokio::test]
async fn test_env_read_failure_truncates_response() {
    let fake = FakeCloudController::builder()
        .with_app("g1", "svc-a", &[("FOO", "bar")])
        .with_env_read_failure("g1")
        .build();

    let (status, _, body) = get(fake, "/svc-a").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ends_with("Additional environment variables:\n\n"));
    assert!(!body.contains("staging_env_json"));
}

#[tokio::test]
async fn test_percent_encoded_name() {
    let fake = FakeCloudController::builder()
        .with_app("g7", "my app", &[("K", "v")])
        .build();

    let (_, _, body) = get(fake, "/my%20app").await;

    assert!(body.contains(r#"looking for "my app""#));
    assert!(body.contains(r#""K" : "v""#));
}

#[tokio::test]
async fn test_root_path_reports_missing_name() {
    let fake = single_app();
    let (status, _, body) = get(fake.clone(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Error: No app name given"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_any_method_is_handled() {
    let app = create_router(AppState::new(single_app()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/svc-a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains(r#""FOO" : "bar""#));
}
