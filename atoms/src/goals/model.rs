use serde::{Deserialize, Serialize};

/// Longer-horizon objective - same shape as a task minus the scheduling
/// fields (date, priority, tags, week).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub completed: bool,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalPayload {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGoalPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub completed: Option<bool>,
}
