use std::collections::BTreeMap;

use serde::Serialize;

use weekdo_atoms::categories::model::Category;
use weekdo_atoms::goals::model::Goal;
use weekdo_atoms::tasks::model::Task;

/// Aggregate payload for `GET /analytics`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,

    /// Number `0` when there are no tasks, otherwise a one-decimal
    /// percentage string like `"33.3"` - the dashboard renders both.
    pub completion_rate: serde_json::Value,

    pub priority_breakdown: PriorityBreakdown,
    pub category_breakdown: BTreeMap<String, usize>,
    pub weekly_data: Vec<DailyActivity>,
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// One day of the trailing 7-day series, oldest first.
#[derive(Debug, Serialize)]
pub struct DailyActivity {
    /// UTC calendar day, `YYYY-MM-DD`
    pub date: String,
    pub created: usize,
    pub completed: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub tasks_created: usize,
    pub tasks_completed: usize,
}

/// Initial-load aggregate for the dashboard (`GET /data`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub tasks: Vec<Task>,
    pub categories: Vec<Category>,
    pub next_goals: Vec<Goal>,
}
