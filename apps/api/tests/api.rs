//! Router-level tests: requests go through the real axum `Router` with an in-memory
//! namespace and a temporary export directory.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use docugen::config::{Config, NamespaceBackend};
use docugen::export::OverflowPolicy;
use docugen::notify::{Action, Phase, RecordingNotifier};
use docugen::routes::build_router;
use docugen::session::LogoutPolicy;
use docugen::state::AppState;
use docugen::store::MemoryNamespace;

struct TestApp {
    router: Router,
    notifier: Arc<RecordingNotifier>,
}

fn app(export_dir: &Path, logout_policy: LogoutPolicy) -> TestApp {
    let config = Config {
        port: 0,
        rust_log: "debug".to_string(),
        namespace: NamespaceBackend::Memory,
        export_dir: export_dir.to_path_buf(),
        export_scale: 2,
        overflow: OverflowPolicy::Crop,
        logout_policy,
    };
    let notifier = Arc::new(RecordingNotifier::new());
    let state = AppState::new(config, Arc::new(MemoryNamespace::new()), notifier.clone()).unwrap();
    TestApp {
        router: build_router(state),
        notifier,
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &TestApp) {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/v1/session/register",
        Some(json!({"first_name": "Jean", "last_name": "Dupont", "email": "jean@dupont.fr"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn create_resume(app: &TestApp) -> String {
    let (status, doc) = send(
        app,
        Method::POST,
        "/api/v1/resumes",
        Some(json!({
            "personal_info": {"first_name": "Jean", "last_name": "Dupont", "email": "jean@dupont.fr"},
            "theme": "green"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{doc}");
    doc["id"].as_str().unwrap().to_string()
}

fn preview_tree() -> Value {
    json!({
        "width": 794,
        "height": 1123,
        "background": "#ffffff",
        "padding": 32,
        "children": [
            {"width": 730, "height": 96, "background": "#059669"},
            {"width": 730, "height": 400, "background": "#f3f4f6"}
        ]
    })
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["export_busy"], false);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);

    let (status, _) = send(&app, Method::GET, "/api/v1/session", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/session/login",
        Some(json!({"email": "marie@exemple.fr", "password": "ignored"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "marie Utilisateur");

    let (status, body) = send(&app, Method::GET, "/api/v1/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["email"], "marie@exemple.fr");

    let (status, body) = send(&app, Method::DELETE, "/api/v1/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents_cleared"], false);

    let (status, _) = send(&app, Method::GET, "/api/v1/session", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_bad_email_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/session/login",
        Some(json!({"email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_resume_entries_are_validated() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    login(&app).await;
    let id = create_resume(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/resumes/{id}/experiences"),
        Some(json!({"title": "Chef de projet", "company": "Acme", "start_date": "2020"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entry_id = body["entry_id"].as_str().unwrap().to_string();
    assert_eq!(body["document"]["content"]["experiences"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/resumes/{id}/experiences"),
        Some(json!({"title": "", "company": "Acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/resumes/{id}/skills"),
        Some(json!({"name": "Rust", "level": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, doc) = send(&app, Method::GET, &format!("/api/v1/documents/cv/{id}"), None).await;
    assert_eq!(doc["content"]["experiences"].as_array().unwrap().len(), 1);
    assert!(doc["content"]["skills"].as_array().unwrap().is_empty());

    let uri = format!("/api/v1/resumes/{id}/experiences/{entry_id}");
    let (_, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(body["removed"], true);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], false);
}

#[tokio::test]
async fn test_entry_removal_is_notified() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    let id = create_resume(&app).await;
    let (_, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/resumes/{id}/skills"),
        Some(json!({"name": "Rust", "level": 4})),
    )
    .await;
    let entry_id = body["entry_id"].as_str().unwrap().to_string();

    let before = app.notifier.events().len();
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/resumes/{id}/skills/{entry_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/resumes/cv-missing/skills/{entry_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let events: Vec<(Action, Phase)> = app.notifier.events()[before..]
        .iter()
        .map(|n| (n.action, n.phase))
        .collect();
    assert_eq!(
        events,
        vec![
            (Action::RemoveEntry, Phase::Started),
            (Action::RemoveEntry, Phase::Succeeded),
            (Action::RemoveEntry, Phase::Started),
            (Action::RemoveEntry, Phase::Failed),
        ]
    );
}

#[tokio::test]
async fn test_resume_without_identity_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/resumes",
        Some(json!({"personal_info": {"first_name": "Jean", "last_name": "", "email": "jean@x.fr"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(&app, Method::GET, "/api/v1/documents/cv", None).await;
    assert!(list.as_array().unwrap().is_empty());

    let events = app.notifier.events();
    assert_eq!(events.last().unwrap().phase, Phase::Failed);
}

#[tokio::test]
async fn test_cover_letter_generation_is_saved_for_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    let facts = json!({
        "first_name": "Jean",
        "last_name": "Dupont",
        "role": "Analyste",
        "company": "Acme",
        "experience": "Trois ans d'analyse financière.",
        "formation": "Master finance"
    });

    let (status, body) = send(&app, Method::POST, "/api/v1/letters/cover/generate", Some(facts.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["document"].is_null());
    let anonymous_body = body["body"].as_str().unwrap().to_string();

    login(&app).await;
    let (_, body) = send(&app, Method::POST, "/api/v1/letters/cover/generate", Some(facts)).await;
    assert_eq!(body["backend"], "rule_based");
    assert_eq!(body["body"].as_str().unwrap(), anonymous_body);
    assert!(anonymous_body.contains("compétences en analyse, finance"));
    assert_eq!(body["document"]["name"], "Lettre - Acme - Analyste");

    let events = app.notifier.events();
    let generated: Vec<_> = events
        .iter()
        .filter(|n| n.action == Action::GenerateLetter)
        .map(|n| n.phase)
        .collect();
    assert_eq!(
        generated,
        vec![Phase::Started, Phase::Succeeded, Phase::Started, Phase::Succeeded]
    );
}

#[tokio::test]
async fn test_category_overwrites_body() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    let (status, doc) = send(
        &app,
        Method::POST,
        "/api/v1/letters/cancellation",
        Some(json!({
            "sender": {"first_name": "Jean", "last_name": "Dupont"},
            "recipient": {"name": "Immo Gestion"},
            "reference": "BAIL-42",
            "category": "bail"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{doc}");
    let id = doc["id"].as_str().unwrap().to_string();
    assert!(doc["content"]["body"].as_str().unwrap().contains("préavis de 3 mois"));

    let (_, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/letters/cancellation/{id}"),
        Some(json!({"body": "Texte libre"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/letters/cancellation/{id}/category"),
        Some(json!({"category": "salle_sport"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transition"]["discarded_manual_edits"], true);
    assert_eq!(body["transition"]["to"], "gym");
    let text = body["document"]["content"]["body"].as_str().unwrap();
    assert!(text.contains("salle de sport"));
    assert!(!text.contains("préavis"));
}

#[tokio::test]
async fn test_dashboard_lists_newest_first_with_kind() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    login(&app).await;
    let resume_id = create_resume(&app).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let (_, letter) = send(
        &app,
        Method::POST,
        "/api/v1/letters/cancellation",
        Some(json!({
            "sender": {"first_name": "Jean", "last_name": "Dupont"},
            "recipient": {"name": "FitClub"},
            "category": "gym"
        })),
    )
    .await;

    let (status, list) = send(&app, Method::GET, "/api/v1/documents", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], letter["id"]);
    assert_eq!(list[0]["kind"], "cancellation_letter");
    assert_eq!(list[1]["id"].as_str().unwrap(), resume_id);
    assert_eq!(list[1]["kind"], "resume");

    let (_, body) = send(&app, Method::DELETE, &format!("/api/v1/documents/cv/{resume_id}"), None).await;
    assert_eq!(body["removed"], true);
    let (status, _) = send(&app, Method::GET, &format!("/api/v1/documents/cv/{resume_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_with_clear_policy_drops_documents() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Clear);
    login(&app).await;
    create_resume(&app).await;

    let (_, body) = send(&app, Method::DELETE, "/api/v1/session", None).await;
    assert_eq!(body["documents_cleared"], true);
    let (_, list) = send(&app, Method::GET, "/api/v1/documents", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_export_writes_named_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    login(&app).await;
    let id = create_resume(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/documents/cv/{id}/export"),
        Some(preview_tree()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["file_name"], "Jean_Dupont_CV.pdf");
    assert_eq!(body["pages"], 1);

    let written = std::fs::read(dir.path().join("Jean_Dupont_CV.pdf")).unwrap();
    assert!(written.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_export_without_surface_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    login(&app).await;
    let id = create_resume(&app).await;

    let (status, body) = send(&app, Method::POST, &format!("/api/v1/documents/cv/{id}/export"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "Un problème est survenu lors du téléchargement.");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let last = app.notifier.events().pop().unwrap();
    assert_eq!((last.action, last.phase), (Action::Export, Phase::Failed));
}

#[tokio::test]
async fn test_snapshot_export_returns_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), LogoutPolicy::Keep);
    login(&app).await;
    let id = create_resume(&app).await;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        400,
        300,
        image::Rgba([255, 255, 255, 255]),
    ))
    .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/documents/cv/{id}/export/snapshot?device_scale=2"))
        .header(header::CONTENT_TYPE, "image/png")
        .body(Body::from(png))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Jean_Dupont_CV.pdf\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
