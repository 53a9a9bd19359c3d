use std::sync::Arc;

use lambda_http::http::header::HeaderValue;
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};

use reports_block::{analytics, export_csv, export_pdf, overview};
use weekdo_atoms as atoms;
use weekdo_atoms::respond;
use weekdo_shared::{auth, AppState};

fn with_cors_headers(mut resp: Response<Body>) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    resp
}

/// Main Lambda handler - routes requests to auth or entity endpoints
pub async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    let body = event.body();
    tracing::info!("API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp));
    }

    let store = &state.store;

    // Public auth routes (no token)
    if path == "/auth/register" {
        let resp = match method {
            Method::POST => auth::register(store, &state.token_secret, body).await,
            _ => Ok(method_not_allowed()),
        };
        return finalize(resp);
    }

    if path == "/auth/login" {
        let resp = match method {
            Method::POST => auth::login(store, &state.token_secret, body).await,
            _ => Ok(method_not_allowed()),
        };
        return finalize(resp);
    }

    // Everything else requires a valid bearer token
    let claims = match auth::authenticate(&event, &state.token_secret) {
        Ok(claims) => claims,
        Err(resp) => return Ok(with_cors_headers(resp)),
    };
    let user_id = claims.user_id;

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let resp = match (&method, parts.as_slice()) {
        // --- AUTH ---
        // GET /auth/me - current user
        (&Method::GET, ["auth", "me"]) => auth::me(store, &user_id).await,

        // --- TASKS ---
        // GET /tasks - list tasks, date ascending
        (&Method::GET, ["tasks"]) => atoms::tasks::http::list_tasks(store, &user_id).await,
        // POST /tasks - create task
        (&Method::POST, ["tasks"]) => {
            atoms::tasks::http::create_task(store, &user_id, body).await
        }
        // PUT /tasks/{id} - partial update
        (&Method::PUT, ["tasks", task_id]) => {
            atoms::tasks::http::update_task(store, &user_id, task_id, body).await
        }
        // DELETE /tasks/{id}
        (&Method::DELETE, ["tasks", task_id]) => {
            atoms::tasks::http::delete_task(store, &user_id, task_id).await
        }

        // --- CATEGORIES ---
        // GET /categories - list categories
        (&Method::GET, ["categories"]) => {
            atoms::categories::http::list_categories(store, &user_id).await
        }
        // POST /categories - create category
        (&Method::POST, ["categories"]) => {
            atoms::categories::http::create_category(store, &user_id, body).await
        }
        // DELETE /categories/{id} - delete + reassign orphaned tasks
        (&Method::DELETE, ["categories", category_id]) => {
            atoms::categories::http::delete_category(store, &user_id, category_id).await
        }

        // --- GOALS ---
        // GET /goals - list goals, newest first
        (&Method::GET, ["goals"]) => atoms::goals::http::list_goals(store, &user_id).await,
        // POST /goals - create goal
        (&Method::POST, ["goals"]) => {
            atoms::goals::http::create_goal(store, &user_id, body).await
        }
        // PUT /goals/{id} - partial update
        (&Method::PUT, ["goals", goal_id]) => {
            atoms::goals::http::update_goal(store, &user_id, goal_id, body).await
        }
        // DELETE /goals/{id}
        (&Method::DELETE, ["goals", goal_id]) => {
            atoms::goals::http::delete_goal(store, &user_id, goal_id).await
        }

        // --- REPORTS ---
        // GET /analytics - aggregate stats
        (&Method::GET, ["analytics"]) => analytics::get_analytics(store, &user_id).await,
        // GET /export/csv - csv attachment
        (&Method::GET, ["export", "csv"]) => export_csv::export_csv(store, &user_id).await,
        // GET /export/pdf - pdf attachment
        (&Method::GET, ["export", "pdf"]) => export_pdf::export_pdf(store, &user_id).await,
        // GET /data - dashboard aggregate
        (&Method::GET, ["data"]) => overview::get_overview(store, &user_id).await,

        _ => {
            tracing::warn!("No route matched - Method: {} Path: {}", method, path);
            Ok(not_found())
        }
    };

    finalize(resp)
}

/// Unhandled errors become a 500 with the message passed through - a
/// diagnostic convenience for a personal tool, not a hardened surface.
fn finalize(resp: Result<Response<Body>, Error>) -> Result<Response<Body>, Error> {
    let resp = match resp {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!("request failed: {}", e);
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    };
    Ok(with_cors_headers(resp))
}

fn not_found() -> Response<Body> {
    respond::error(StatusCode::NOT_FOUND, "Not found")
}

fn method_not_allowed() -> Response<Body> {
    respond::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
