use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use reqwest::Url;
use serde_json::{Value, json};

use tunehub::{
    config::AppConfig,
    http::{ApiError, ApiService, PasswordForm, Restore, Session, SessionHandle},
    model::{Source, Track},
};

/// In-process stand-in for the TuneHub backend.
#[derive(Default)]
struct Backend {
    users: Mutex<HashMap<String, String>>,
    tokens: Mutex<HashMap<String, String>>,
    favorites: Mutex<Vec<Value>>,
    searches: AtomicUsize,
    password_changes: AtomicUsize,
}

type Shared = Arc<Backend>;
type Reply = (StatusCode, Json<Value>);

fn ok(data: Value, message: &str) -> Reply {
    (
        StatusCode::OK,
        Json(json!({ "code": 200, "message": message, "data": data })),
    )
}

fn fail(status: StatusCode, message: &str) -> Reply {
    (
        status,
        Json(json!({ "code": status.as_u16(), "message": message })),
    )
}

fn token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn user_for(state: &Backend, headers: &HeaderMap) -> Option<String> {
    let token = token(headers)?;
    state.tokens.lock().unwrap().get(&token).cloned()
}

fn credentials(body: &Value) -> (String, String) {
    (
        body["username"].as_str().unwrap_or_default().to_string(),
        body["password"].as_str().unwrap_or_default().to_string(),
    )
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let (username, password) = credentials(&body);
    let mut users = state.users.lock().unwrap();
    if users.contains_key(&username) {
        return fail(StatusCode::BAD_REQUEST, "Username already exists");
    }
    users.insert(username.clone(), password);
    ok(json!({ "username": username }), "Registered")
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let (username, password) = credentials(&body);
    if state.users.lock().unwrap().get(&username) != Some(&password) {
        return fail(StatusCode::UNAUTHORIZED, "Invalid username or password");
    }
    let mut tokens = state.tokens.lock().unwrap();
    let token = format!("token-{username}-{}", tokens.len());
    tokens.insert(token.clone(), username.clone());
    ok(json!({ "username": username, "token": token }), "Login successful")
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    match user_for(&state, &headers) {
        Some(username) => ok(json!({ "username": username }), "ok"),
        None => fail(StatusCode::UNAUTHORIZED, "Invalid token"),
    }
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    if let Some(token) = token(&headers) {
        state.tokens.lock().unwrap().remove(&token);
    }
    ok(Value::Null, "Logged out")
}

async fn change_password(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Reply {
    state.password_changes.fetch_add(1, Ordering::SeqCst);
    match user_for(&state, &headers) {
        Some(_) => ok(Value::Null, "Password updated"),
        None => fail(StatusCode::UNAUTHORIZED, "Invalid token"),
    }
}

async fn list_favorites(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    if user_for(&state, &headers).is_none() {
        return fail(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let list = state.favorites.lock().unwrap().clone();
    ok(json!({ "list": list }), "ok")
}

async fn add_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(track): Json<Value>,
) -> Reply {
    if user_for(&state, &headers).is_none() {
        return fail(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    state.favorites.lock().unwrap().push(track);
    ok(Value::Null, "Added")
}

async fn remove_favorite(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    if user_for(&state, &headers).is_none() {
        return fail(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let id = query.get("id").map(String::as_str);
    let source = query.get("source").map(String::as_str);
    state
        .favorites
        .lock()
        .unwrap()
        .retain(|f| !(f["id"].as_str() == id && f["source"].as_str() == source));
    ok(Value::Null, "Removed")
}

async fn catalog(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    match query.get("type").map(String::as_str) {
        Some("search") => {
            state.searches.fetch_add(1, Ordering::SeqCst);
            let keyword = query.get("keyword").cloned().unwrap_or_default();
            ok(
                json!({
                    "results": [
                        { "id": 101, "name": "First", "artist": "A", "platform": "kuwo" },
                        { "id": "qq-7", "name": "Second", "source": "qq", "platform": "kuwo" },
                        { "id": 3, "name": format!("{keyword} live") },
                    ]
                }),
                "ok",
            )
        }
        Some("toplists") => ok(
            json!({
                "list": [
                    { "id": 19723756, "name": "Soaring", "updateFrequency": "Daily" },
                    { "id": "hot", "name": "Hot" },
                ]
            }),
            "ok",
        ),
        _ => fail(StatusCode::BAD_REQUEST, "Unknown request type"),
    }
}

async fn spawn_backend() -> (String, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .route("/auth/password", post(change_password))
        .route(
            "/favorites",
            get(list_favorites)
                .post(add_favorite)
                .delete(remove_favorite),
        )
        .route("/api/", get(catalog))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn service(base: &str, session: SessionHandle) -> ApiService {
    let config = AppConfig::for_base(Url::parse(base).unwrap());
    ApiService::with_session(&config, session).unwrap()
}

fn add_user(state: &Backend, username: &str, password: &str) {
    state
        .users
        .lock()
        .unwrap()
        .insert(username.to_string(), password.to_string());
}

#[tokio::test]
async fn login_opens_a_session_that_survives_revalidation() {
    let (base, state) = spawn_backend().await;
    add_user(&state, "alice", "secret");
    let session = SessionHandle::in_memory();
    let api = service(&base, session.clone());

    let message = api.auth.login("  alice ", "secret").await.unwrap();
    assert_eq!(message, "Login successful");
    assert_eq!(session.username().as_deref(), Some("alice"));

    // A second process reading the same session.
    let restored = service(&base, session.clone());
    assert_eq!(
        restored.auth.restore().await,
        Restore::Valid("alice".to_string())
    );
}

#[tokio::test]
async fn wrong_password_reports_the_server_message() {
    let (base, state) = spawn_backend().await;
    add_user(&state, "alice", "secret");
    let api = service(&base, SessionHandle::in_memory());

    let err = api.auth.login("alice", "nope").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(
        err.user_message("Login failed"),
        "Invalid username or password"
    );
    assert!(!api.session().is_logged_in());
}

#[tokio::test]
async fn missing_credentials_never_reach_the_server() {
    let (base, _state) = spawn_backend().await;
    let api = service(&base, SessionHandle::in_memory());

    let err = api.auth.login("   ", "secret").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn register_signs_in_afterwards() {
    let (base, state) = spawn_backend().await;
    let api = service(&base, SessionHandle::in_memory());

    api.auth.register("bob", "hunter2").await.unwrap();
    assert_eq!(api.session().username().as_deref(), Some("bob"));
    assert_eq!(state.tokens.lock().unwrap().len(), 1);

    api.auth.logout().await;
    let err = api.auth.register("bob", "again").await.unwrap_err();
    assert_eq!(
        err.user_message("Registration failed"),
        "Username already exists"
    );
}

#[tokio::test]
async fn revoked_token_is_dropped_on_restore() {
    let (base, _state) = spawn_backend().await;
    let session = SessionHandle::in_memory();
    session.establish(Session {
        token: "stale".into(),
        username: "carol".into(),
    });
    let api = service(&base, session.clone());

    assert_eq!(api.auth.restore().await, Restore::Rejected);
    assert!(!session.is_logged_in());
    assert_eq!(api.auth.restore().await, Restore::NoSession);
}

#[tokio::test]
async fn unreachable_server_keeps_the_session() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let session = SessionHandle::in_memory();
    session.establish(Session {
        token: "kept".into(),
        username: "dave".into(),
    });
    let api = service(&base, session.clone());

    assert_eq!(api.auth.restore().await, Restore::Unreachable);
    assert_eq!(session.token().as_deref(), Some("kept"));
}

#[tokio::test]
async fn blank_search_sends_nothing() {
    let (base, state) = spawn_backend().await;
    let api = service(&base, SessionHandle::in_memory());

    let err = api.catalog.search(" \t ", Source::Netease).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(state.searches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn search_results_carry_a_resolved_source() {
    let (base, state) = spawn_backend().await;
    let api = service(&base, SessionHandle::in_memory());

    let tracks = api.catalog.search("rain", Source::Qq).await.unwrap();
    assert_eq!(state.searches.load(Ordering::SeqCst), 1);

    let sources: Vec<_> = tracks.iter().map(|t| (t.id.as_str(), t.source)).collect();
    assert_eq!(
        sources,
        vec![
            ("101", Source::Kuwo),
            ("qq-7", Source::Qq),
            ("3", Source::Qq),
        ]
    );
    assert_eq!(tracks[2].name, "rain live");
}

#[tokio::test]
async fn charts_parse_numeric_ids() {
    let (base, _state) = spawn_backend().await;
    let api = service(&base, SessionHandle::in_memory());

    let charts = api.catalog.toplists(Source::Netease).await.unwrap();
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[0].id, "19723756");
    assert_eq!(charts[0].frequency_label(), "Daily");
    assert_eq!(charts[1].frequency_label(), "Updated regularly");
}

#[tokio::test]
async fn favorites_toggle_returns_the_server_list() {
    let (base, state) = spawn_backend().await;
    add_user(&state, "erin", "pw");
    let api = service(&base, SessionHandle::in_memory());

    let song = Track {
        id: "55".into(),
        name: "Tide".into(),
        artist: "Sea".into(),
        source: Source::Kuwo,
    };

    let err = api.favorites.toggle(&song, false).await.unwrap_err();
    assert!(matches!(err, ApiError::NotLoggedIn));

    api.auth.login("erin", "pw").await.unwrap();
    let list = api.favorites.toggle(&song, false).await.unwrap();
    assert_eq!(list.len(), 1);
    assert!(list[0].same_as(&song));

    let list = api.favorites.toggle(&song, true).await.unwrap();
    assert!(list.is_empty());
    assert!(state.favorites.lock().unwrap().is_empty());
}

#[tokio::test]
async fn password_form_is_checked_before_sending() {
    let (base, state) = spawn_backend().await;
    add_user(&state, "frank", "old");
    let api = service(&base, SessionHandle::in_memory());
    api.auth.login("frank", "old").await.unwrap();

    let mismatch = PasswordForm {
        current: "old".into(),
        new: "new".into(),
        confirm: "newer".into(),
    };
    let err = api.auth.change_password(&mismatch).await.unwrap_err();
    assert_eq!(err.to_string(), "The new passwords do not match");
    assert_eq!(state.password_changes.load(Ordering::SeqCst), 0);

    let form = PasswordForm {
        confirm: "new".into(),
        ..mismatch
    };
    assert_eq!(
        api.auth.change_password(&form).await.unwrap(),
        "Password updated"
    );
    assert_eq!(state.password_changes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn logout_revokes_the_token_and_clears_the_session() {
    let (base, state) = spawn_backend().await;
    add_user(&state, "gina", "pw");
    let api = service(&base, SessionHandle::in_memory());
    api.auth.login("gina", "pw").await.unwrap();
    assert_eq!(state.tokens.lock().unwrap().len(), 1);

    api.auth.logout().await;
    assert!(!api.session().is_logged_in());
    assert!(state.tokens.lock().unwrap().is_empty());

    let err = api.favorites.list().await.unwrap_err();
    assert!(matches!(err, ApiError::NotLoggedIn));
}
