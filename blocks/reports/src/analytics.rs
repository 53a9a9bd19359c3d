use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use lambda_http::{http::StatusCode, Body, Error, Response};

use weekdo_atoms::respond;
use weekdo_atoms::store::Store;
use weekdo_atoms::tasks::model::{Priority, Task};

use crate::types::{Analytics, DailyActivity, PriorityBreakdown, RecentActivity};

/// GET /analytics - aggregate stats over every task the caller owns
pub async fn get_analytics(store: &Store, user_id: &str) -> Result<Response<Body>, Error> {
    let tasks = store.list_tasks(user_id).await?;
    let analytics = build_analytics(&tasks, Utc::now());
    respond::json(StatusCode::OK, &analytics)
}

/// Linear scans over the full task list. Fine at personal-tracker scale;
/// nothing here is maintained incrementally.
pub fn build_analytics(tasks: &[Task], now: DateTime<Utc>) -> Analytics {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();
    let pending_tasks = total_tasks - completed_tasks;

    let completion_rate = if total_tasks > 0 {
        let rate = completed_tasks as f64 / total_tasks as f64 * 100.0;
        serde_json::Value::from(format!("{:.1}", rate))
    } else {
        serde_json::Value::from(0)
    };

    let priority_breakdown = PriorityBreakdown {
        high: tasks.iter().filter(|t| t.priority == Priority::High).count(),
        medium: tasks
            .iter()
            .filter(|t| t.priority == Priority::Medium)
            .count(),
        low: tasks.iter().filter(|t| t.priority == Priority::Low).count(),
    };

    let mut category_breakdown = BTreeMap::new();
    for task in tasks {
        if let Some(name) = task.category.as_deref().filter(|name| !name.is_empty()) {
            *category_breakdown.entry(name.to_string()).or_insert(0) += 1;
        }
    }

    // Trailing 7x24h window for the recent-activity summary. The
    // completed count stays within the created-in-window cohort.
    let window_start = now - Duration::days(7);
    let recent: Vec<&Task> = tasks
        .iter()
        .filter(|t| created_at(t).map_or(false, |stamp| stamp >= window_start))
        .collect();
    let recent_activity = RecentActivity {
        tasks_created: recent.len(),
        tasks_completed: recent.iter().filter(|t| t.completed).count(),
    };

    // Last 7 UTC calendar days, oldest first, today last. Each bucket
    // counts the tasks created that day and how many of those are done.
    let today = now.date_naive();
    let mut weekly_data = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let day = today - Duration::days(offset as i64);
        let day_tasks: Vec<&Task> = tasks
            .iter()
            .filter(|t| created_at(t).map_or(false, |stamp| stamp.date_naive() == day))
            .collect();
        weekly_data.push(DailyActivity {
            date: day.to_string(),
            created: day_tasks.len(),
            completed: day_tasks.iter().filter(|t| t.completed).count(),
        });
    }

    Analytics {
        total_tasks,
        completed_tasks,
        pending_tasks,
        completion_rate,
        priority_breakdown,
        category_breakdown,
        weekly_data,
        recent_activity,
    }
}

fn created_at(task: &Task) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&task.created_at)
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn task(
        created_days_ago: i64,
        completed: bool,
        priority: Priority,
        category: Option<&str>,
    ) -> Task {
        let created = fixed_now() - Duration::days(created_days_ago);
        Task {
            id: format!("t-{}-{}", created_days_ago, completed),
            user_id: "u1".to_string(),
            title: "task".to_string(),
            description: None,
            date: None,
            category: category.map(str::to_string),
            completed,
            week: None,
            priority,
            tags: Vec::new(),
            created_at: created.to_rfc3339(),
            completed_at: None,
        }
    }

    #[test]
    fn empty_list_reports_zero_rate_as_number() {
        let analytics = build_analytics(&[], fixed_now());
        assert_eq!(analytics.total_tasks, 0);
        assert_eq!(analytics.completion_rate, serde_json::Value::from(0));
        assert_eq!(analytics.weekly_data.len(), 7);
        assert!(analytics.weekly_data.iter().all(|d| d.created == 0));
    }

    #[test]
    fn one_of_three_completed_is_a_one_decimal_string() {
        let tasks = vec![
            task(0, true, Priority::High, Some("Job")),
            task(0, false, Priority::Medium, Some("Job")),
            task(0, false, Priority::Low, None),
        ];
        let analytics = build_analytics(&tasks, fixed_now());
        assert_eq!(analytics.total_tasks, 3);
        assert_eq!(analytics.completed_tasks, 1);
        assert_eq!(analytics.pending_tasks, 2);
        assert_eq!(
            analytics.completion_rate,
            serde_json::Value::from("33.3".to_string())
        );
        assert_eq!(analytics.priority_breakdown.high, 1);
        assert_eq!(analytics.priority_breakdown.medium, 1);
        assert_eq!(analytics.priority_breakdown.low, 1);
        assert_eq!(analytics.category_breakdown.get("Job"), Some(&2));
        assert_eq!(analytics.category_breakdown.len(), 1);
    }

    #[test]
    fn weekly_series_buckets_by_creation_day() {
        let tasks = vec![
            task(0, true, Priority::Medium, None),
            task(0, false, Priority::Medium, None),
            task(2, false, Priority::Medium, None),
            // outside the 7-day series entirely
            task(10, true, Priority::Medium, None),
        ];
        let analytics = build_analytics(&tasks, fixed_now());

        assert_eq!(analytics.weekly_data.len(), 7);
        let today = analytics.weekly_data.last().unwrap();
        assert_eq!(today.date, "2024-03-10");
        assert_eq!(today.created, 2);
        assert_eq!(today.completed, 1);

        let two_days_ago = &analytics.weekly_data[4];
        assert_eq!(two_days_ago.date, "2024-03-08");
        assert_eq!(two_days_ago.created, 1);
        assert_eq!(two_days_ago.completed, 0);

        assert_eq!(analytics.recent_activity.tasks_created, 3);
        assert_eq!(analytics.recent_activity.tasks_completed, 1);
    }

    #[test]
    fn unparseable_created_at_is_skipped_by_the_series() {
        let mut broken = task(0, false, Priority::Medium, None);
        broken.created_at = "yesterday-ish".to_string();
        let analytics = build_analytics(&[broken], fixed_now());
        assert_eq!(analytics.total_tasks, 1);
        assert!(analytics.weekly_data.iter().all(|d| d.created == 0));
        assert_eq!(analytics.recent_activity.tasks_created, 0);
    }
}
