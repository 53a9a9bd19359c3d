use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::StoreError;
use crate::categories::model::Category;
use crate::goals::model::Goal;
use crate::tasks::model::Task;
use crate::users::model::UserRecord;

/// In-memory document store backing the test suites and
/// `STORE_BACKEND=memory` local runs. Everything lives behind one mutex;
/// the data set is a single user's personal tracker, so contention is
/// not a concern here.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    emails: HashMap<String, String>,
    usernames: HashMap<String, String>,
    tasks: HashMap<String, Vec<Task>>,
    categories: HashMap<String, Vec<Category>>,
    goals: HashMap<String, Vec<Goal>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }

    // ---- users ----

    pub fn create_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.emails.insert(user.email.clone(), user.id.clone());
        inner.usernames.insert(user.username.clone(), user.id.clone());
        inner.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.lock()?.users.get(user_id).cloned())
    }

    pub fn find_user_id_by_email(&self, email: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.emails.get(email).cloned())
    }

    pub fn find_user_id_by_username(&self, username: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.usernames.get(username).cloned())
    }

    // ---- tasks ----

    pub fn put_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let tasks = inner.tasks.entry(task.user_id.clone()).or_default();
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        Ok(())
    }

    pub fn get_task(&self, user_id: &str, task_id: &str) -> Result<Option<Task>, StoreError> {
        Ok(self
            .lock()?
            .tasks
            .get(user_id)
            .and_then(|tasks| tasks.iter().find(|t| t.id == task_id))
            .cloned())
    }

    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self.lock()?.tasks.get(user_id).cloned().unwrap_or_default())
    }

    pub fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let Some(tasks) = inner.tasks.get_mut(user_id) else {
            return Ok(false);
        };
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);
        Ok(tasks.len() != before)
    }

    // ---- categories ----

    pub fn put_category(&self, category: &Category) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let categories = inner.categories.entry(category.user_id.clone()).or_default();
        match categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category.clone(),
            None => categories.push(category.clone()),
        }
        Ok(())
    }

    pub fn get_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Option<Category>, StoreError> {
        Ok(self
            .lock()?
            .categories
            .get(user_id)
            .and_then(|categories| categories.iter().find(|c| c.id == category_id))
            .cloned())
    }

    pub fn list_categories(&self, user_id: &str) -> Result<Vec<Category>, StoreError> {
        Ok(self
            .lock()?
            .categories
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    pub fn delete_category(&self, user_id: &str, category_id: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let Some(categories) = inner.categories.get_mut(user_id) else {
            return Ok(false);
        };
        let before = categories.len();
        categories.retain(|c| c.id != category_id);
        Ok(categories.len() != before)
    }

    // ---- goals ----

    pub fn put_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let goals = inner.goals.entry(goal.user_id.clone()).or_default();
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal.clone(),
            None => goals.push(goal.clone()),
        }
        Ok(())
    }

    pub fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Option<Goal>, StoreError> {
        Ok(self
            .lock()?
            .goals
            .get(user_id)
            .and_then(|goals| goals.iter().find(|g| g.id == goal_id))
            .cloned())
    }

    pub fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>, StoreError> {
        Ok(self.lock()?.goals.get(user_id).cloned().unwrap_or_default())
    }

    pub fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let Some(goals) = inner.goals.get_mut(user_id) else {
            return Ok(false);
        };
        let before = goals.len();
        goals.retain(|g| g.id != goal_id);
        Ok(goals.len() != before)
    }
}
