use chrono::Utc;
use uuid::Uuid;

use super::model::Category;
use crate::store::{Store, StoreError};

/// Categories every new account starts with. They are also protected
/// from deletion so the reassignment fallback below always exists.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Self", "Job", "PhD"];

/// Category that adopts tasks orphaned by a deletion.
pub const FALLBACK_CATEGORY: &str = "Self";

pub enum CategoryCreated {
    Created(Category),
    Duplicate,
}

pub enum CategoryDeleted {
    Deleted,
    NotFound,
    Protected,
}

/// Seed the default categories for a freshly registered user.
pub async fn create_defaults(store: &Store, user_id: &str) -> Result<(), StoreError> {
    for name in DEFAULT_CATEGORIES {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        store.put_category(&category).await?;
    }
    Ok(())
}

pub async fn list_categories(store: &Store, user_id: &str) -> Result<Vec<Category>, StoreError> {
    store.list_categories(user_id).await
}

pub async fn create_category(
    store: &Store,
    user_id: &str,
    name: &str,
) -> Result<CategoryCreated, StoreError> {
    let existing = store.list_categories(user_id).await?;
    if existing.iter().any(|c| c.name == name) {
        return Ok(CategoryCreated::Duplicate);
    }

    let category = Category {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        created_at: Utc::now().to_rfc3339(),
    };
    store.put_category(&category).await?;
    Ok(CategoryCreated::Created(category))
}

/// Delete a category. Defaults are refused; otherwise tasks still
/// carrying the deleted name are reassigned to the fallback category so
/// no task is left pointing at a name that no longer exists.
pub async fn delete_category(
    store: &Store,
    user_id: &str,
    category_id: &str,
) -> Result<CategoryDeleted, StoreError> {
    let Some(category) = store.get_category(user_id, category_id).await? else {
        return Ok(CategoryDeleted::NotFound);
    };
    if DEFAULT_CATEGORIES.contains(&category.name.as_str()) {
        return Ok(CategoryDeleted::Protected);
    }

    store.delete_category(user_id, category_id).await?;

    let mut reassigned = 0;
    for mut task in store.list_tasks(user_id).await? {
        if task.category.as_deref() == Some(category.name.as_str()) {
            task.category = Some(FALLBACK_CATEGORY.to_string());
            store.put_task(&task).await?;
            reassigned += 1;
        }
    }
    if reassigned > 0 {
        tracing::info!(
            "reassigned {} task(s) from deleted category '{}' to '{}'",
            reassigned,
            category.name,
            FALLBACK_CATEGORY
        );
    }

    Ok(CategoryDeleted::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Store};
    use crate::tasks::model::CreateTaskPayload;
    use crate::tasks::service::create_task;

    #[tokio::test]
    async fn duplicate_names_are_rejected_per_user() {
        let store = Store::Memory(MemoryStore::new());
        assert!(matches!(
            create_category(&store, "u1", "Gym").await.unwrap(),
            CategoryCreated::Created(_)
        ));
        assert!(matches!(
            create_category(&store, "u1", "Gym").await.unwrap(),
            CategoryCreated::Duplicate
        ));
        // another user may reuse the name
        assert!(matches!(
            create_category(&store, "u2", "Gym").await.unwrap(),
            CategoryCreated::Created(_)
        ));
    }

    #[tokio::test]
    async fn deleting_reassigns_tasks_to_fallback() {
        let store = Store::Memory(MemoryStore::new());
        let gym = match create_category(&store, "u1", "Gym").await.unwrap() {
            CategoryCreated::Created(category) => category,
            CategoryCreated::Duplicate => unreachable!(),
        };
        create_task(
            &store,
            "u1",
            CreateTaskPayload {
                title: "Run".to_string(),
                description: None,
                date: None,
                category: Some("Gym".to_string()),
                priority: None,
                tags: None,
            },
        )
        .await
        .unwrap();

        assert!(matches!(
            delete_category(&store, "u1", &gym.id).await.unwrap(),
            CategoryDeleted::Deleted
        ));
        let tasks = store.list_tasks("u1").await.unwrap();
        assert_eq!(tasks[0].category.as_deref(), Some(FALLBACK_CATEGORY));
    }

    #[tokio::test]
    async fn defaults_cannot_be_deleted() {
        let store = Store::Memory(MemoryStore::new());
        create_defaults(&store, "u1").await.unwrap();
        let categories = store.list_categories("u1").await.unwrap();
        assert_eq!(categories.len(), 3);

        let self_category = categories.iter().find(|c| c.name == "Self").unwrap();
        assert!(matches!(
            delete_category(&store, "u1", &self_category.id).await.unwrap(),
            CategoryDeleted::Protected
        ));
    }
}
