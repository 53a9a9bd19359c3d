pub mod dynamo;
pub mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

use crate::categories::model::Category;
use crate::goals::model::Goal;
use crate::tasks::model::Task;
use crate::users::model::UserRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("DynamoDB {op} error: {message}")]
    Dynamo { op: &'static str, message: String },

    #[error("memory store mutex poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn dynamo(op: &'static str, err: impl std::fmt::Display) -> Self {
        StoreError::Dynamo {
            op,
            message: err.to_string(),
        }
    }
}

/// Document-store client handed to every request handler. The Dynamo
/// backend is the deployed one; the in-memory backend serves local runs
/// (`STORE_BACKEND=memory`) and the test suites.
pub enum Store {
    Dynamo(DynamoStore),
    Memory(MemoryStore),
}

impl Store {
    // ---- users ----

    pub async fn create_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        match self {
            Store::Dynamo(store) => store.create_user(user).await,
            Store::Memory(store) => store.create_user(user),
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        match self {
            Store::Dynamo(store) => store.get_user(user_id).await,
            Store::Memory(store) => store.get_user(user_id),
        }
    }

    pub async fn find_user_id_by_email(&self, email: &str) -> Result<Option<String>, StoreError> {
        match self {
            Store::Dynamo(store) => store.find_user_id_by_email(email).await,
            Store::Memory(store) => store.find_user_id_by_email(email),
        }
    }

    pub async fn find_user_id_by_username(
        &self,
        username: &str,
    ) -> Result<Option<String>, StoreError> {
        match self {
            Store::Dynamo(store) => store.find_user_id_by_username(username).await,
            Store::Memory(store) => store.find_user_id_by_username(username),
        }
    }

    // ---- tasks ----

    pub async fn put_task(&self, task: &Task) -> Result<(), StoreError> {
        match self {
            Store::Dynamo(store) => store.put_task(task).await,
            Store::Memory(store) => store.put_task(task),
        }
    }

    pub async fn get_task(
        &self,
        user_id: &str,
        task_id: &str,
    ) -> Result<Option<Task>, StoreError> {
        match self {
            Store::Dynamo(store) => store.get_task(user_id, task_id).await,
            Store::Memory(store) => store.get_task(user_id, task_id),
        }
    }

    pub async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        match self {
            Store::Dynamo(store) => store.list_tasks(user_id).await,
            Store::Memory(store) => store.list_tasks(user_id),
        }
    }

    /// Returns false when no task with that id exists under the owner.
    pub async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool, StoreError> {
        match self {
            Store::Dynamo(store) => store.delete_task(user_id, task_id).await,
            Store::Memory(store) => store.delete_task(user_id, task_id),
        }
    }

    // ---- categories ----

    pub async fn put_category(&self, category: &Category) -> Result<(), StoreError> {
        match self {
            Store::Dynamo(store) => store.put_category(category).await,
            Store::Memory(store) => store.put_category(category),
        }
    }

    pub async fn get_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Option<Category>, StoreError> {
        match self {
            Store::Dynamo(store) => store.get_category(user_id, category_id).await,
            Store::Memory(store) => store.get_category(user_id, category_id),
        }
    }

    pub async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>, StoreError> {
        match self {
            Store::Dynamo(store) => store.list_categories(user_id).await,
            Store::Memory(store) => store.list_categories(user_id),
        }
    }

    pub async fn delete_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<bool, StoreError> {
        match self {
            Store::Dynamo(store) => store.delete_category(user_id, category_id).await,
            Store::Memory(store) => store.delete_category(user_id, category_id),
        }
    }

    // ---- goals ----

    pub async fn put_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        match self {
            Store::Dynamo(store) => store.put_goal(goal).await,
            Store::Memory(store) => store.put_goal(goal),
        }
    }

    pub async fn get_goal(
        &self,
        user_id: &str,
        goal_id: &str,
    ) -> Result<Option<Goal>, StoreError> {
        match self {
            Store::Dynamo(store) => store.get_goal(user_id, goal_id).await,
            Store::Memory(store) => store.get_goal(user_id, goal_id),
        }
    }

    pub async fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>, StoreError> {
        match self {
            Store::Dynamo(store) => store.list_goals(user_id).await,
            Store::Memory(store) => store.list_goals(user_id),
        }
    }

    pub async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<bool, StoreError> {
        match self {
            Store::Dynamo(store) => store.delete_goal(user_id, goal_id).await,
            Store::Memory(store) => store.delete_goal(user_id, goal_id),
        }
    }
}
