use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateTaskPayload, UpdateTaskPayload};
use super::service;
use crate::respond;
use crate::store::Store;

/// GET /tasks - all tasks for the caller, date ascending
pub async fn list_tasks(store: &Store, user_id: &str) -> Result<Response<Body>, Error> {
    let tasks = service::list_tasks(store, user_id).await?;
    respond::json(StatusCode::OK, &tasks)
}

/// POST /tasks - create a task; the week bucket is computed server-side
pub async fn create_task(
    store: &Store,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateTaskPayload = match respond::parse_json(body) {
        Ok(payload) => payload,
        Err(resp) => return Ok(resp),
    };
    let task = service::create_task(store, user_id, payload).await?;
    respond::json(StatusCode::CREATED, &task)
}

/// PUT /tasks/{id} - typed partial update
pub async fn update_task(
    store: &Store,
    user_id: &str,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateTaskPayload = match respond::parse_json(body) {
        Ok(payload) => payload,
        Err(resp) => return Ok(resp),
    };
    match service::update_task(store, user_id, task_id, payload).await? {
        Some(task) => respond::json(StatusCode::OK, &task),
        None => Ok(respond::error(StatusCode::NOT_FOUND, "Task not found")),
    }
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    store: &Store,
    user_id: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    if service::delete_task(store, user_id, task_id).await? {
        respond::json(
            StatusCode::OK,
            &serde_json::json!({ "message": "Task deleted successfully" }),
        )
    } else {
        Ok(respond::error(StatusCode::NOT_FOUND, "Task not found"))
    }
}
