use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateGoalPayload, UpdateGoalPayload};
use super::service;
use crate::respond;
use crate::store::Store;

/// GET /goals - newest first
pub async fn list_goals(store: &Store, user_id: &str) -> Result<Response<Body>, Error> {
    let goals = service::list_goals(store, user_id).await?;
    respond::json(StatusCode::OK, &goals)
}

/// POST /goals
pub async fn create_goal(
    store: &Store,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateGoalPayload = match respond::parse_json(body) {
        Ok(payload) => payload,
        Err(resp) => return Ok(resp),
    };
    let goal = service::create_goal(store, user_id, payload).await?;
    respond::json(StatusCode::CREATED, &goal)
}

/// PUT /goals/{id}
pub async fn update_goal(
    store: &Store,
    user_id: &str,
    goal_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateGoalPayload = match respond::parse_json(body) {
        Ok(payload) => payload,
        Err(resp) => return Ok(resp),
    };
    match service::update_goal(store, user_id, goal_id, payload).await? {
        Some(goal) => respond::json(StatusCode::OK, &goal),
        None => Ok(respond::error(StatusCode::NOT_FOUND, "Goal not found")),
    }
}

/// DELETE /goals/{id}
pub async fn delete_goal(
    store: &Store,
    user_id: &str,
    goal_id: &str,
) -> Result<Response<Body>, Error> {
    if service::delete_goal(store, user_id, goal_id).await? {
        respond::json(
            StatusCode::OK,
            &serde_json::json!({ "message": "Goal deleted successfully" }),
        )
    } else {
        Ok(respond::error(StatusCode::NOT_FOUND, "Goal not found"))
    }
}
