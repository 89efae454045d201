use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::{Activity, Directory},
    error::ErrorBody,
    protocol::SignupResponse,
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    alert::RecordingAlerts,
    api::ActivitiesApi,
    context::{AppContext, ClientSettings},
    error::ClientError,
};

pub(crate) fn chess_club() -> Activity {
    Activity {
        description: "Play chess".into(),
        schedule: "Fridays 3-4pm".into(),
        max_participants: 10,
        participants: vec!["a@x.com".into()],
    }
}

pub(crate) fn sample_directory() -> Directory {
    let mut directory = Directory::new();
    directory.insert("Chess Club", chess_club());
    directory.insert(
        "Art Studio",
        Activity {
            description: "Paint and draw".into(),
            schedule: "Mondays 4-5pm".into(),
            max_participants: 2,
            participants: Vec::new(),
        },
    );
    directory
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    Fetch,
    Signup(String, String),
    Unregister(String, String),
}

/// Scripted outcome for one endpoint of [`FakeApi`].
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Ok,
    Rejected(Option<String>),
    Malformed,
}

impl Scripted {
    fn into_error(self) -> Option<ClientError> {
        match self {
            Scripted::Ok => None,
            Scripted::Rejected(detail) => Some(ClientError::Application {
                status: 400,
                detail,
            }),
            Scripted::Malformed => Some(ClientError::Malformed("scripted".into())),
        }
    }
}

/// In-memory backend that behaves like the real one unless told otherwise.
pub(crate) struct FakeApi {
    pub directory: Mutex<Directory>,
    pub fetch: Mutex<Scripted>,
    pub signup: Mutex<Scripted>,
    pub unregister: Mutex<Scripted>,
    pub calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn new(directory: Directory) -> Arc<Self> {
        Arc::new(Self {
            directory: Mutex::new(directory),
            fetch: Mutex::new(Scripted::Ok),
            signup: Mutex::new(Scripted::Ok),
            unregister: Mutex::new(Scripted::Ok),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub async fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| **call == ApiCall::Fetch)
            .count()
    }
}

#[async_trait]
impl ActivitiesApi for FakeApi {
    async fn fetch_activities(&self) -> Result<Directory, ClientError> {
        self.calls.lock().await.push(ApiCall::Fetch);
        if let Some(error) = self.fetch.lock().await.clone().into_error() {
            return Err(error);
        }
        Ok(self.directory.lock().await.clone())
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<SignupResponse, ClientError> {
        self.calls
            .lock()
            .await
            .push(ApiCall::Signup(activity.into(), email.into()));
        if let Some(error) = self.signup.lock().await.clone().into_error() {
            return Err(error);
        }
        if let Some(entry) = self.directory.lock().await.get_mut(activity) {
            entry.participants.push(email.to_string());
        }
        Ok(SignupResponse {
            message: format!("Signed up {email} for {activity}"),
        })
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<(), ClientError> {
        self.calls
            .lock()
            .await
            .push(ApiCall::Unregister(activity.into(), email.into()));
        if let Some(error) = self.unregister.lock().await.clone().into_error() {
            return Err(error);
        }
        if let Some(entry) = self.directory.lock().await.get_mut(activity) {
            entry.participants.retain(|p| p != email);
        }
        Ok(())
    }
}

pub(crate) fn fake_context(api: Arc<FakeApi>) -> (AppContext, Arc<RecordingAlerts>) {
    let alerts = Arc::new(RecordingAlerts::new());
    let settings = ClientSettings {
        server_url: "http://fake.invalid".into(),
        message_hide_delay: Duration::from_secs(5),
    };
    let ctx = AppContext::new(settings, api, alerts.clone());
    (ctx, alerts)
}

#[derive(Clone)]
pub(crate) struct BackendState {
    pub directory: Arc<Mutex<Directory>>,
    pub fetches: Arc<Mutex<u32>>,
    pub raw_queries: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: String,
}

async fn list_activities(State(state): State<BackendState>) -> Json<Directory> {
    *state.fetches.lock().await += 1;
    Json(state.directory.lock().await.clone())
}

async fn signup_handler(
    State(state): State<BackendState>,
    Path(name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<SignupResponse>, (StatusCode, Json<ErrorBody>)> {
    let mut directory = state.directory.lock().await;
    let Some(activity) = directory.get_mut(&name) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new("Activity not found")),
        ));
    };
    if activity.participants.contains(&query.email) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("Already signed up")),
        ));
    }
    activity.participants.push(query.email.clone());
    Ok(Json(SignupResponse {
        message: format!("Signed up {} for {name}", query.email),
    }))
}

async fn unregister_handler(
    State(state): State<BackendState>,
    Path(name): Path<String>,
    Query(query): Query<EmailQuery>,
    uri: axum::http::Uri,
) -> impl IntoResponse {
    state.raw_queries.lock().await.push(uri.to_string());
    let mut directory = state.directory.lock().await;
    let Some(activity) = directory.get_mut(&name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new("Activity not found")),
        )
            .into_response();
    };
    let before = activity.participants.len();
    activity.participants.retain(|p| *p != query.email);
    if activity.participants.len() == before {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("Student is not signed up for this activity")),
        )
            .into_response();
    }
    StatusCode::OK.into_response()
}

/// Binds an in-process backend on an ephemeral port and returns its base url.
pub(crate) async fn spawn_backend(directory: Directory) -> Result<(String, BackendState)> {
    let state = BackendState {
        directory: Arc::new(Mutex::new(directory)),
        fetches: Arc::new(Mutex::new(0)),
        raw_queries: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/activities", get(list_activities))
        .route("/activities/:name/signup", post(signup_handler))
        .route("/activities/:name/unregister", post(unregister_handler))
        .with_state(state.clone());
    let url = spawn_router(app).await?;
    Ok((url, state))
}

pub(crate) async fn spawn_router(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

/// A base url nothing listens on.
pub(crate) async fn closed_port_url() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
