use lambda_http::{http::StatusCode, Body, Error, Response};

use weekdo_atoms::goals::service as goals;
use weekdo_atoms::respond;
use weekdo_atoms::store::Store;
use weekdo_atoms::tasks::service as tasks;

use crate::types::Overview;

/// GET /data - everything the dashboard needs for its initial render,
/// fetched concurrently
pub async fn get_overview(store: &Store, user_id: &str) -> Result<Response<Body>, Error> {
    let (tasks, categories, goals) = tokio::join!(
        tasks::list_tasks(store, user_id),
        store.list_categories(user_id),
        goals::list_goals(store, user_id),
    );

    let overview = Overview {
        tasks: tasks?,
        categories: categories?,
        next_goals: goals?,
    };
    respond::json(StatusCode::OK, &overview)
}
