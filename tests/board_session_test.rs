use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use pipeline_board::{
    board::{BoardSession, DndOutcome, LoadState, Point, RevertPolicy, ToastKind},
    client::{ApplicationsApi, HttpApplicationsApi},
    config::Config,
    error::Error,
    models::application::{Application, ApplicationStatus},
    services::application_service::ApplicationService,
    AppState,
};
use serde_json::json;
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

fn seed() -> Vec<Application> {
    serde_json::from_value(json!([
        {
            "id": "1",
            "status": "new",
            "rating": 0,
            "applicant": { "name": "Ada", "email": "ada@example.com" },
            "appliedAt": "2024-03-01T09:00:00Z",
            "jobPosition": { "id": "pos-1", "title": "Backend Engineer" }
        },
        {
            "id": "2",
            "status": "new",
            "rating": 3,
            "applicant": { "name": "Grace", "email": "grace@example.com" },
            "appliedAt": "2024-02-01T09:00:00Z",
            "jobPosition": { "id": "pos-1", "title": "Backend Engineer" }
        }
    ]))
    .expect("seed json")
}

async fn service_url() -> (String, ApplicationService) {
    let service = ApplicationService::new();
    service.seed(seed()).await;
    let url = serve(pipeline_board::routes::router(AppState::with_service(service.clone()))).await;
    (url, service)
}

fn config(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        http_timeout_secs: 5,
        ..Config::default()
    }
}

#[tokio::test]
async fn drag_to_interview_persists_on_the_server() {
    let (url, service) = service_url().await;
    let mut session = BoardSession::connect(&config(&url), Some("pos-1")).expect("session");

    assert!(session.load().await.success);
    assert_eq!(session.load_state(), LoadState::Loaded);
    assert_eq!(session.board().column(ApplicationStatus::New).ids(), vec!["2", "1"]);

    let dnd = session.dnd();
    dnd.pointer_down("1", Point::new(0.0, 0.0));
    dnd.pointer_move(Point::new(120.0, 0.0));
    let DndOutcome::Transition(transition) = dnd.pointer_up(Some("interview")) else {
        panic!("expected a status transition");
    };

    assert_eq!(
        session.board().column(ApplicationStatus::Interview).ids(),
        vec!["1"]
    );
    assert!(transition.wait().await.success);
    assert!(session
        .store()
        .get("1")
        .unwrap()
        .status
        .is(ApplicationStatus::Interview));

    let persisted = service.get_by_id("1").await.unwrap();
    assert!(persisted.status.is(ApplicationStatus::Interview));

    let stats = session.stats().await.unwrap();
    assert_eq!((stats.new, stats.interview), (1, 1));
}

#[tokio::test]
async fn server_failure_reverts_and_shows_message() {
    let seeded = seed();
    let app = Router::new()
        .route(
            "/applications",
            get(move || {
                let seeded = seeded.clone();
                async move { Json(seeded) }
            }),
        )
        .route(
            "/applications/:id/status",
            patch(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "db down" })),
                )
                    .into_response()
            }),
        );
    let url = serve(app).await;

    let mut session = BoardSession::connect(&config(&url), None).expect("session");
    assert!(session.load().await.success);

    let DndOutcome::Transition(transition) = session.dnd().drag_end("1", Some("interview")) else {
        panic!("expected a status transition");
    };
    assert!(session
        .store()
        .get("1")
        .unwrap()
        .status
        .is(ApplicationStatus::Interview));

    let result = transition.wait().await;
    assert_eq!(result.error.as_deref(), Some("db down"));
    assert!(session.store().get("1").unwrap().status.is(ApplicationStatus::New));

    let toasts = session.toasts().drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, "db down");
}

#[tokio::test]
async fn records_with_null_fields_still_load() {
    let app = Router::new().route(
        "/applications",
        get(|| async {
            Json(json!([
                { "_id": "1", "status": "new", "applicant": { "name": "Ada", "email": "ada@example.com" } },
                {
                    "_id": "2",
                    "status": "screening",
                    "applicant": { "name": "Bo", "email": null },
                    "answers": null,
                    "rating": 4.5
                }
            ]))
        }),
    );
    let url = serve(app).await;

    let session = BoardSession::connect(&config(&url), None).expect("session");
    assert!(session.load().await.success);
    assert_eq!(session.load_state(), LoadState::Loaded);
    assert_eq!(session.store().len(), 2);

    let bo = session.store().get("2").unwrap();
    assert_eq!(bo.applicant.email, "");
    assert!(bo.answers.is_empty());
    assert_eq!(
        session.board().column(ApplicationStatus::Screening).ids(),
        vec!["2"]
    );
}

#[tokio::test]
async fn whole_snapshot_policy_is_selectable() {
    let (url, _service) = service_url().await;
    let config = Config {
        revert_policy: RevertPolicy::WholeSnapshot,
        ..config(&url)
    };
    let session = BoardSession::connect(&config, Some("pos-1")).expect("session");
    assert_eq!(session.controller().policy(), RevertPolicy::WholeSnapshot);
}

#[tokio::test]
async fn delete_after_confirmation_only() {
    let (url, service) = service_url().await;
    let session = BoardSession::connect(&config(&url), Some("pos-1")).expect("session");
    assert!(session.load().await.success);

    let declined = session.controller().delete("2", &|_: &str| false).await;
    assert!(declined.is_cancelled());
    assert_eq!(session.store().len(), 2);
    assert_eq!(service.count().await, 2);

    let confirmed = session.controller().delete("2", &|_: &str| true).await;
    assert!(confirmed.success);
    let ids: Vec<String> = session.store().snapshot().iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec!["1".to_string()]);
    assert_eq!(service.count().await, 1);
}

#[tokio::test]
async fn unreachable_api_surfaces_fetch_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    drop(listener);

    let session = BoardSession::connect(&config(&url), None).expect("session");
    let result = session.load().await;

    assert!(!result.success);
    assert!(matches!(session.load_state(), LoadState::Failed(_)));
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn http_client_maps_error_bodies() {
    let (url, _service) = service_url().await;
    let api = Arc::new(HttpApplicationsApi::new(&url, std::time::Duration::from_secs(5)).unwrap());

    let detail = api.get("1").await.unwrap();
    assert_eq!(detail.applicant.name, "Ada");
    assert_eq!(detail.position_id(), Some("pos-1"));

    match api.get("missing").await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("missing"));
        }
        other => panic!("expected API error, got {:?}", other.map(|a| a.id)),
    }
}
