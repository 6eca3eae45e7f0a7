//! Typed calls to the task API, one HTTP request each.
//!
//! Failures come back to the caller as they happened; nothing here retries.

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    CreateTaskRequest, DeleteTaskResponse, ErrorResponse, Task, TaskQuery, TaskStats, TaskStatus,
    UpdateStatusRequest, UpdateTaskRequest,
};
use thiserror::Error;
use uuid::Uuid;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

const API_BASE_URL: &str = "/api";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Failed to parse JSON: {0}")]
    Decode(String),
}

pub fn tasks_url(query: &TaskQuery) -> String {
    format!("{API_BASE_URL}/tasks?{}", query.to_query_string())
}

pub fn task_url(id: Uuid) -> String {
    format!("{API_BASE_URL}/tasks/{id}")
}

/// Picks the server's own message out of an error body, falling back to a
/// generic one naming the status.
pub fn server_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|error| error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {status}"))
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

fn encode<T: Serialize>(body: &T) -> Result<String, ApiError> {
    serde_json::to_string(body)
        .map_err(|_| ApiError::Transport("Failed to serialize request".into()))
}

async fn send(method: &str, url: &str, body: Option<String>) -> Result<String, ApiError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| ApiError::Transport("Failed to create request".into()))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|_| ApiError::Transport("Failed to set header".into()))?;
    }

    let window =
        web_sys::window().ok_or_else(|| ApiError::Transport("No window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| ApiError::Transport("Network Error".into()))?
        .into();

    let text_promise = response
        .text()
        .map_err(|_| ApiError::Transport("Failed to read response".into()))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|_| ApiError::Transport("Failed to get text".into()))?
        .as_string()
        .ok_or_else(|| ApiError::Transport("Failed to convert to string".into()))?;

    if response.ok() {
        Ok(text)
    } else {
        let status = response.status();
        Err(ApiError::Server {
            status,
            message: server_message(status, &text),
        })
    }
}

pub async fn fetch_tasks(query: TaskQuery) -> Result<Vec<Task>, ApiError> {
    decode(&send("GET", &tasks_url(&query), None).await?)
}

pub async fn fetch_task(id: Uuid) -> Result<Task, ApiError> {
    decode(&send("GET", &task_url(id), None).await?)
}

pub async fn create_task(request: CreateTaskRequest) -> Result<Task, ApiError> {
    let body = encode(&request)?;
    decode(&send("POST", &format!("{API_BASE_URL}/tasks"), Some(body)).await?)
}

pub async fn update_task(id: Uuid, request: UpdateTaskRequest) -> Result<Task, ApiError> {
    let body = encode(&request)?;
    decode(&send("PUT", &task_url(id), Some(body)).await?)
}

pub async fn update_task_status(id: Uuid, status: TaskStatus) -> Result<Task, ApiError> {
    let body = encode(&UpdateStatusRequest { status })?;
    decode(&send("PATCH", &format!("{}/status", task_url(id)), Some(body)).await?)
}

/// Resolves to the id the server confirmed as deleted.
pub async fn delete_task(id: Uuid) -> Result<Uuid, ApiError> {
    let response: DeleteTaskResponse = decode(&send("DELETE", &task_url(id), None).await?)?;
    Ok(response.id)
}

pub async fn fetch_stats() -> Result<TaskStats, ApiError> {
    decode(&send("GET", &format!("{API_BASE_URL}/tasks/stats"), None).await?)
}
