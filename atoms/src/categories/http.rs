use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::CreateCategoryPayload;
use super::service::{self, CategoryCreated, CategoryDeleted};
use crate::respond;
use crate::store::Store;

/// GET /categories
pub async fn list_categories(store: &Store, user_id: &str) -> Result<Response<Body>, Error> {
    let categories = service::list_categories(store, user_id).await?;
    respond::json(StatusCode::OK, &categories)
}

/// POST /categories
pub async fn create_category(
    store: &Store,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateCategoryPayload = match respond::parse_json(body) {
        Ok(payload) => payload,
        Err(resp) => return Ok(resp),
    };
    match service::create_category(store, user_id, &payload.name).await? {
        CategoryCreated::Created(category) => respond::json(StatusCode::CREATED, &category),
        CategoryCreated::Duplicate => Ok(respond::error(
            StatusCode::BAD_REQUEST,
            "Category already exists",
        )),
    }
}

/// DELETE /categories/{id}
pub async fn delete_category(
    store: &Store,
    user_id: &str,
    category_id: &str,
) -> Result<Response<Body>, Error> {
    match service::delete_category(store, user_id, category_id).await? {
        CategoryDeleted::Deleted => respond::json(
            StatusCode::OK,
            &serde_json::json!({ "message": "Category deleted successfully" }),
        ),
        CategoryDeleted::NotFound => {
            Ok(respond::error(StatusCode::NOT_FOUND, "Category not found"))
        }
        CategoryDeleted::Protected => Ok(respond::error(
            StatusCode::BAD_REQUEST,
            "Cannot delete default categories",
        )),
    }
}
