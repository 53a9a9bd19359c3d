use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

use super::model::{CreateTaskPayload, Task, UpdateTaskPayload};
use crate::store::{Store, StoreError};

/// Parse the day part of a date string, tolerating a trailing time
/// component (`2024-03-04` and `2024-03-04T00:00:00Z` both work).
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let day = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Week bucket for a date: ceil(days since Jan 1 / 7). Jan 1 lands in
/// week 0, and the scheme disagrees with ISO-8601 near year boundaries.
/// The dashboard only uses it for grouping.
pub fn week_number(date: &str) -> Option<u32> {
    let day = parse_day(date)?;
    let jan_first = NaiveDate::from_ymd_opt(day.year(), 1, 1)?;
    let days = (day - jan_first).num_days();
    Some(((days + 6) / 7) as u32)
}

/// All tasks for a user, date ascending (dateless tasks first)
pub async fn list_tasks(store: &Store, user_id: &str) -> Result<Vec<Task>, StoreError> {
    let mut tasks = store.list_tasks(user_id).await?;
    tasks.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(tasks)
}

pub async fn create_task(
    store: &Store,
    user_id: &str,
    payload: CreateTaskPayload,
) -> Result<Task, StoreError> {
    let week = payload.date.as_deref().and_then(week_number);
    let task = Task {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: payload.title,
        description: payload.description,
        date: payload.date,
        category: payload.category,
        completed: false,
        week,
        priority: payload.priority.unwrap_or_default(),
        tags: payload.tags.unwrap_or_default(),
        created_at: Utc::now().to_rfc3339(),
        completed_at: None,
    };
    store.put_task(&task).await?;
    Ok(task)
}

/// Partial update. Recomputes the week bucket when the date moves and
/// stamps/clears `completed_at` when the completed flag flips; a payload
/// that omits the flag leaves the stamp untouched.
pub async fn update_task(
    store: &Store,
    user_id: &str,
    task_id: &str,
    payload: UpdateTaskPayload,
) -> Result<Option<Task>, StoreError> {
    let Some(mut task) = store.get_task(user_id, task_id).await? else {
        return Ok(None);
    };

    if let Some(title) = payload.title {
        task.title = title;
    }
    if let Some(description) = payload.description {
        task.description = Some(description);
    }
    if let Some(date) = payload.date {
        task.week = week_number(&date);
        task.date = Some(date);
    }
    if let Some(category) = payload.category {
        task.category = Some(category);
    }
    if let Some(priority) = payload.priority {
        task.priority = priority;
    }
    if let Some(tags) = payload.tags {
        task.tags = tags;
    }
    if let Some(completed) = payload.completed {
        if completed && task.completed_at.is_none() {
            task.completed_at = Some(Utc::now().to_rfc3339());
        }
        if !completed {
            task.completed_at = None;
        }
        task.completed = completed;
    }

    store.put_task(&task).await?;
    Ok(Some(task))
}

pub async fn delete_task(
    store: &Store,
    user_id: &str,
    task_id: &str,
) -> Result<bool, StoreError> {
    store.delete_task(user_id, task_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Store};

    fn create_payload(title: &str, date: Option<&str>) -> CreateTaskPayload {
        CreateTaskPayload {
            title: title.to_string(),
            description: None,
            date: date.map(str::to_string),
            category: None,
            priority: None,
            tags: None,
        }
    }

    fn empty_update() -> UpdateTaskPayload {
        UpdateTaskPayload {
            title: None,
            description: None,
            date: None,
            category: None,
            completed: None,
            priority: None,
            tags: None,
        }
    }

    #[test]
    fn week_number_uses_day_count_buckets() {
        assert_eq!(week_number("2024-01-01"), Some(0));
        assert_eq!(week_number("2024-01-08"), Some(1));
        assert_eq!(week_number("2024-01-10"), Some(2));
        assert_eq!(week_number("2024-03-04"), Some(9));
    }

    #[test]
    fn week_number_rejects_garbage() {
        assert_eq!(week_number("not-a-date"), None);
        assert_eq!(week_number(""), None);
    }

    #[test]
    fn parse_day_tolerates_timestamps() {
        assert_eq!(
            parse_day("2024-03-04T00:00:00Z"),
            parse_day("2024-03-04")
        );
    }

    #[tokio::test]
    async fn toggling_completed_stamps_and_clears() {
        let store = Store::Memory(MemoryStore::new());
        let created = create_task(&store, "u1", create_payload("Run", Some("2024-03-04")))
            .await
            .unwrap();
        assert_eq!(created.week, Some(9));
        assert!(created.completed_at.is_none());

        let done = update_task(
            &store,
            "u1",
            &created.id,
            UpdateTaskPayload {
                completed: Some(true),
                ..empty_update()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        // A payload without the flag leaves the stamp alone.
        let retitled = update_task(
            &store,
            "u1",
            &created.id,
            UpdateTaskPayload {
                title: Some("Jog".to_string()),
                ..empty_update()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(retitled.title, "Jog");
        assert!(retitled.completed_at.is_some());

        let undone = update_task(
            &store,
            "u1",
            &created.id,
            UpdateTaskPayload {
                completed: Some(false),
                ..empty_update()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(!undone.completed);
        assert!(undone.completed_at.is_none());
    }

    #[tokio::test]
    async fn date_change_recomputes_week() {
        let store = Store::Memory(MemoryStore::new());
        let created = create_task(&store, "u1", create_payload("Plan", Some("2024-01-10")))
            .await
            .unwrap();
        assert_eq!(created.week, Some(2));

        let moved = update_task(
            &store,
            "u1",
            &created.id,
            UpdateTaskPayload {
                date: Some("2024-03-04".to_string()),
                ..empty_update()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(moved.week, Some(9));
    }

    #[tokio::test]
    async fn update_is_scoped_by_owner() {
        let store = Store::Memory(MemoryStore::new());
        let created = create_task(&store, "u1", create_payload("Mine", None))
            .await
            .unwrap();

        let stranger = update_task(&store, "u2", &created.id, empty_update())
            .await
            .unwrap();
        assert!(stranger.is_none());
    }

    #[tokio::test]
    async fn list_sorts_by_date_with_dateless_first() {
        let store = Store::Memory(MemoryStore::new());
        create_task(&store, "u1", create_payload("b", Some("2024-02-01")))
            .await
            .unwrap();
        create_task(&store, "u1", create_payload("c", None)).await.unwrap();
        create_task(&store, "u1", create_payload("a", Some("2024-01-15")))
            .await
            .unwrap();

        let tasks = list_tasks(&store, "u1").await.unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }
}
