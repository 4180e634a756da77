//! In-memory emulation of the PreviewMyEmail API.
//!
//! Every endpoint lives under `/api/{endpoint}` and accepts its parameters
//! either as a query string (GET) or a form-encoded body (POST). Calls without
//! the configured `apikey` get `401`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// Client codes and display names offered by `RetrieveEmailClients`.
pub const EMAIL_CLIENTS: &[(&str, &str)] = &[
    ("OL2016", "Outlook 2016"),
    ("GMAILW", "Gmail (Web)"),
    ("IPHONE15", "iPhone 15 Mail"),
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preview {
    pub jobid: String,
    pub subject: String,
    /// Decoded `emailbody`.
    pub body: String,
    pub clients: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thumbnail {
    #[serde(rename = "RequestID")]
    pub request_id: String,
    #[serde(rename = "ContentType")]
    pub content_type: String,
    #[serde(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Default)]
pub struct Store {
    previews: Vec<Preview>,
    thumbnails: HashMap<String, Thumbnail>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    apikey: Arc<str>,
    db: Db,
}

pub fn app(apikey: &str) -> Router {
    let state = AppState {
        apikey: Arc::from(apikey),
        db: Db::default(),
    };
    Router::new()
        .route("/api/{endpoint}", get(handle_get).post(handle_post))
        .with_state(state)
}

pub async fn run(listener: TcpListener, apikey: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(apikey)).await
}

async fn handle_get(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    respond(&state, &endpoint, Params(params)).await
}

async fn handle_post(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    Form(params): Form<Vec<(String, String)>>,
) -> Response {
    respond(&state, &endpoint, Params(params)).await
}

/// Received request parameters in arrival order.
pub struct Params(pub Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Values sent as `name[0]`, `name[1]`, ...
    pub fn list(&self, name: &str) -> Vec<String> {
        let prefix = format!("{name}[");
        self.0
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix) && key.ends_with(']'))
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(key, _)| key.as_str()).collect()
    }

    fn require(&self, name: &str) -> Result<&str, Response> {
        self.get(name)
            .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("missing parameter {name}")).into_response())
    }
}

async fn respond(state: &AppState, endpoint: &str, params: Params) -> Response {
    if params.get("apikey") != Some(&*state.apikey) {
        info!(endpoint, "rejected call with invalid api key");
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    info!(endpoint, params = ?params.names(), "handling call");
    route(&state.db, endpoint, &params)
        .await
        .unwrap_or_else(|rejection| rejection)
}

async fn route(db: &Db, endpoint: &str, params: &Params) -> Result<Response, Response> {
    let response = match endpoint {
        "RetrieveEmailClients" => {
            let clients: Vec<Value> = EMAIL_CLIENTS
                .iter()
                .map(|(code, name)| json!({"code": code, "name": name}))
                .collect();
            Json(clients).into_response()
        }
        "SystemStatus" => Json(json!({"status": "operational"})).into_response(),
        "CreatePreview" => create_preview(db, params).await?,
        "FetchPreview" => {
            let job = params.require("job")?;
            let store = db.read().await;
            let preview = find_preview(&store, job)?;
            Json(preview.clone()).into_response()
        }
        "GetPreviewList" => {
            let store = db.read().await;
            if store.previews.is_empty() {
                Json(Value::Null).into_response()
            } else {
                let list: Vec<Value> = store
                    .previews
                    .iter()
                    .map(|p| json!({"jobid": p.jobid, "subject": p.subject}))
                    .collect();
                Json(list).into_response()
            }
        }
        "DeletePreview" => {
            let job = params.require("job")?;
            let mut store = db.write().await;
            find_preview(&store, job)?;
            store.previews.retain(|p| p.jobid != job);
            Json(true).into_response()
        }
        "RetryEmailClient" => {
            let job = params.require("job")?;
            let code = params.require("clientcode")?;
            let store = db.read().await;
            let preview = find_preview(&store, job)?;
            if !preview.clients.iter().any(|c| c == code) {
                return Err((StatusCode::BAD_REQUEST, "client not part of job").into_response());
            }
            Json(true).into_response()
        }
        "CreateEmailAnalyticsCode" => {
            let tag = params.require("tag")?;
            let snippet = format!(
                r#"<img src="https://previewmyemail.com/analytics/{tag}.gif" width="1" height="1" alt="" />"#
            );
            ([(header::CONTENT_TYPE, "text/html")], snippet).into_response()
        }
        "GetEmailAnalyticsCounts" => {
            let tag = params.require("tag")?;
            Json(json!({"tag": tag, "opens": 0, "unique_opens": 0})).into_response()
        }
        "GetEmailAnalyticsTopClients" | "GetEmailAnalyticsTopLocations" => {
            params.require("tag")?;
            Json(json!([])).into_response()
        }
        "GetEmailAnalyticsFeed" => {
            let tag = params.require("tag")?;
            Json(json!({"tag": tag, "received": params.names()})).into_response()
        }
        "NewThumbnail" => {
            let content_type = params.require("ContentType")?;
            params.require("Content")?;
            let thumbnail = Thumbnail {
                request_id: Uuid::new_v4().to_string(),
                content_type: content_type.to_string(),
                status: "queued".to_string(),
            };
            let id = thumbnail.request_id.clone();
            db.write().await.thumbnails.insert(id.clone(), thumbnail);
            Json(json!({"RequestID": id})).into_response()
        }
        "GetThumbnail" => {
            let id = params.require("RequestID")?;
            let store = db.read().await;
            let thumbnail = store
                .thumbnails
                .get(id)
                .ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;
            Json(thumbnail.clone()).into_response()
        }
        "GetInboxMonitoringResults" => Json(json!([])).into_response(),
        _ => (StatusCode::NOT_FOUND, "unknown endpoint").into_response(),
    };
    Ok(response)
}

async fn create_preview(db: &Db, params: &Params) -> Result<Response, Response> {
    let encoded = params.require("emailbody")?;
    let subject = params.require("emailsubject")?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| (StatusCode::BAD_REQUEST, "emailbody is not base64").into_response())?;
    let body = String::from_utf8_lossy(&bytes).into_owned();

    let mut clients = params.list("targetemailapps");
    if clients.is_empty() {
        clients = EMAIL_CLIENTS.iter().map(|(code, _)| code.to_string()).collect();
    }

    let preview = Preview {
        jobid: Uuid::new_v4().to_string(),
        subject: subject.to_string(),
        body,
        clients,
    };
    let jobid = preview.jobid.clone();
    db.write().await.previews.push(preview);
    Ok(Json(json!({"jobid": jobid})).into_response())
}

fn find_preview<'a>(store: &'a Store, job: &str) -> Result<&'a Preview, Response> {
    store
        .previews
        .iter()
        .find(|p| p.jobid == job)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "unknown job").into_response())
}
