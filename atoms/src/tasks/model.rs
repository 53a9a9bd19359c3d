use serde::{Deserialize, Serialize};

/// Task domain model - a dated to-do item on the dashboard
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,

    /// Calendar day the task is scheduled for, `YYYY-MM-DD`
    pub date: Option<String>,

    /// Category reference by name, not by id - see the category module
    pub category: Option<String>,

    pub completed: bool,

    /// Week bucket derived from `date`; recomputed whenever the date moves
    pub week: Option<u32>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: String,
    pub completed_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(value: &str) -> Priority {
        match value {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskPayload {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

/// Permitted fields for a partial update. `week` is intentionally absent:
/// it is derived from `date` and never client-settable.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}
