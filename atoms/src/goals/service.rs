use chrono::Utc;
use uuid::Uuid;

use super::model::{CreateGoalPayload, Goal, UpdateGoalPayload};
use crate::store::{Store, StoreError};

/// All goals for a user, newest first
pub async fn list_goals(store: &Store, user_id: &str) -> Result<Vec<Goal>, StoreError> {
    let mut goals = store.list_goals(user_id).await?;
    goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(goals)
}

pub async fn create_goal(
    store: &Store,
    user_id: &str,
    payload: CreateGoalPayload,
) -> Result<Goal, StoreError> {
    let goal = Goal {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: payload.title,
        description: payload.description,
        category: payload.category,
        completed: false,
        created_at: Utc::now().to_rfc3339(),
    };
    store.put_goal(&goal).await?;
    Ok(goal)
}

pub async fn update_goal(
    store: &Store,
    user_id: &str,
    goal_id: &str,
    payload: UpdateGoalPayload,
) -> Result<Option<Goal>, StoreError> {
    let Some(mut goal) = store.get_goal(user_id, goal_id).await? else {
        return Ok(None);
    };

    if let Some(title) = payload.title {
        goal.title = title;
    }
    if let Some(description) = payload.description {
        goal.description = Some(description);
    }
    if let Some(category) = payload.category {
        goal.category = Some(category);
    }
    if let Some(completed) = payload.completed {
        goal.completed = completed;
    }

    store.put_goal(&goal).await?;
    Ok(Some(goal))
}

pub async fn delete_goal(
    store: &Store,
    user_id: &str,
    goal_id: &str,
) -> Result<bool, StoreError> {
    store.delete_goal(user_id, goal_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Store};

    #[tokio::test]
    async fn goals_list_newest_first() {
        let store = Store::Memory(MemoryStore::new());
        let stamps = [
            ("first", "2024-01-01T08:00:00+00:00"),
            ("second", "2024-02-01T08:00:00+00:00"),
            ("third", "2024-03-01T08:00:00+00:00"),
        ];
        for (title, created_at) in stamps {
            store
                .put_goal(&Goal {
                    id: uuid::Uuid::new_v4().to_string(),
                    user_id: "u1".to_string(),
                    title: title.to_string(),
                    description: None,
                    category: None,
                    completed: false,
                    created_at: created_at.to_string(),
                })
                .await
                .unwrap();
        }

        let goals = list_goals(&store, "u1").await.unwrap();
        let titles: Vec<&str> = goals.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn update_and_delete_are_owner_scoped() {
        let store = Store::Memory(MemoryStore::new());
        let goal = create_goal(
            &store,
            "u1",
            CreateGoalPayload {
                title: "Publish".to_string(),
                description: None,
                category: None,
            },
        )
        .await
        .unwrap();

        let updated = update_goal(
            &store,
            "u2",
            &goal.id,
            UpdateGoalPayload {
                title: None,
                description: None,
                category: None,
                completed: Some(true),
            },
        )
        .await
        .unwrap();
        assert!(updated.is_none());

        assert!(!delete_goal(&store, "u2", &goal.id).await.unwrap());
        assert!(delete_goal(&store, "u1", &goal.id).await.unwrap());
    }
}
