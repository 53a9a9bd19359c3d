use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoClient;

use super::StoreError;
use crate::categories::model::Category;
use crate::goals::model::Goal;
use crate::tasks::model::{Priority, Task};
use crate::users::model::UserRecord;

/// DynamoDB-backed document store. Single table, composite string keys:
///
///   PK = "USER#{user_id}"       SK = "USER#{user_id}"        user profile
///   PK = "EMAIL#{email}"        SK = "EMAIL#{email}"         login + uniqueness lookup
///   PK = "USERNAME#{username}"  SK = "USERNAME#{username}"   uniqueness lookup
///   PK = "USER#{user_id}"       SK = "TASK#{task_id}"        task
///   PK = "USER#{user_id}"       SK = "CATEGORY#{id}"         category
///   PK = "USER#{user_id}"       SK = "GOAL#{goal_id}"        goal
///
/// Every owned entity hangs off the owner's partition, so per-user reads
/// are a single query and ownership scoping falls out of the key itself.
#[derive(Clone)]
pub struct DynamoStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: DynamoClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    // ---- users ----

    pub async fn create_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let pk = format!("USER#{}", user.id);
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(pk.clone()))
            .item("SK", AttributeValue::S(pk))
            .item("username", AttributeValue::S(user.username.clone()))
            .item("email", AttributeValue::S(user.email.clone()))
            .item("password_salt", AttributeValue::S(user.password_salt.clone()))
            .item("password_hash", AttributeValue::S(user.password_hash.clone()))
            .item("created_at", AttributeValue::S(user.created_at.clone()))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("put_item", e))?;

        self.put_lookup("EMAIL", &user.email, &user.id).await?;
        self.put_lookup("USERNAME", &user.username, &user.id).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let pk = format!("USER#{}", user_id);
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk.clone()))
            .key("SK", AttributeValue::S(pk))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("get_item", e))?;

        Ok(result.item().map(|item| UserRecord {
            id: user_id.to_string(),
            username: string_attr(item, "username"),
            email: string_attr(item, "email"),
            password_salt: string_attr(item, "password_salt"),
            password_hash: string_attr(item, "password_hash"),
            created_at: string_attr(item, "created_at"),
        }))
    }

    pub async fn find_user_id_by_email(&self, email: &str) -> Result<Option<String>, StoreError> {
        self.get_lookup("EMAIL", email).await
    }

    pub async fn find_user_id_by_username(
        &self,
        username: &str,
    ) -> Result<Option<String>, StoreError> {
        self.get_lookup("USERNAME", username).await
    }

    async fn put_lookup(
        &self,
        prefix: &str,
        value: &str,
        user_id: &str,
    ) -> Result<(), StoreError> {
        let key = format!("{}#{}", prefix, value);
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(key.clone()))
            .item("SK", AttributeValue::S(key))
            .item("user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("put_item", e))?;
        Ok(())
    }

    async fn get_lookup(&self, prefix: &str, value: &str) -> Result<Option<String>, StoreError> {
        let key = format!("{}#{}", prefix, value);
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(key.clone()))
            .key("SK", AttributeValue::S(key))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("get_item", e))?;

        Ok(result
            .item()
            .and_then(|item| item.get("user_id"))
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string()))
    }

    // ---- tasks ----

    pub async fn put_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(format!("USER#{}", task.user_id)))
            .item("SK", AttributeValue::S(format!("TASK#{}", task.id)))
            .item("title", AttributeValue::S(task.title.clone()))
            .item("completed", AttributeValue::Bool(task.completed))
            .item(
                "priority",
                AttributeValue::S(task.priority.as_str().to_string()),
            )
            .item(
                "tags",
                AttributeValue::L(
                    task.tags
                        .iter()
                        .map(|tag| AttributeValue::S(tag.clone()))
                        .collect(),
                ),
            )
            .item("created_at", AttributeValue::S(task.created_at.clone()));

        if let Some(description) = &task.description {
            request = request.item("description", AttributeValue::S(description.clone()));
        }
        if let Some(date) = &task.date {
            request = request.item("date", AttributeValue::S(date.clone()));
        }
        if let Some(category) = &task.category {
            request = request.item("category", AttributeValue::S(category.clone()));
        }
        if let Some(week) = task.week {
            request = request.item("week", AttributeValue::N(week.to_string()));
        }
        if let Some(completed_at) = &task.completed_at {
            request = request.item("completed_at", AttributeValue::S(completed_at.clone()));
        }

        request
            .send()
            .await
            .map_err(|e| StoreError::dynamo("put_item", e))?;
        Ok(())
    }

    pub async fn get_task(
        &self,
        user_id: &str,
        task_id: &str,
    ) -> Result<Option<Task>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(format!("USER#{}", user_id)))
            .key("SK", AttributeValue::S(format!("TASK#{}", task_id)))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("get_item", e))?;

        Ok(result.item().map(|item| item_to_task(user_id, task_id, item)))
    }

    pub async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(format!("USER#{}", user_id)))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("TASK#".to_string()))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("query", e))?;

        let mut tasks = Vec::new();
        for item in result.items() {
            if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
                if let Some(task_id) = sk.strip_prefix("TASK#") {
                    tasks.push(item_to_task(user_id, task_id, item));
                }
            }
        }
        Ok(tasks)
    }

    pub async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool, StoreError> {
        self.delete_owned(user_id, &format!("TASK#{}", task_id)).await
    }

    // ---- categories ----

    pub async fn put_category(&self, category: &Category) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(format!("USER#{}", category.user_id)))
            .item("SK", AttributeValue::S(format!("CATEGORY#{}", category.id)))
            .item("name", AttributeValue::S(category.name.clone()))
            .item("created_at", AttributeValue::S(category.created_at.clone()))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("put_item", e))?;
        Ok(())
    }

    pub async fn get_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Option<Category>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(format!("USER#{}", user_id)))
            .key("SK", AttributeValue::S(format!("CATEGORY#{}", category_id)))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("get_item", e))?;

        Ok(result
            .item()
            .map(|item| item_to_category(user_id, category_id, item)))
    }

    pub async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>, StoreError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(format!("USER#{}", user_id)))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("CATEGORY#".to_string()))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("query", e))?;

        let mut categories = Vec::new();
        for item in result.items() {
            if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
                if let Some(category_id) = sk.strip_prefix("CATEGORY#") {
                    categories.push(item_to_category(user_id, category_id, item));
                }
            }
        }
        Ok(categories)
    }

    pub async fn delete_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<bool, StoreError> {
        self.delete_owned(user_id, &format!("CATEGORY#{}", category_id))
            .await
    }

    // ---- goals ----

    pub async fn put_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(format!("USER#{}", goal.user_id)))
            .item("SK", AttributeValue::S(format!("GOAL#{}", goal.id)))
            .item("title", AttributeValue::S(goal.title.clone()))
            .item("completed", AttributeValue::Bool(goal.completed))
            .item("created_at", AttributeValue::S(goal.created_at.clone()));

        if let Some(description) = &goal.description {
            request = request.item("description", AttributeValue::S(description.clone()));
        }
        if let Some(category) = &goal.category {
            request = request.item("category", AttributeValue::S(category.clone()));
        }

        request
            .send()
            .await
            .map_err(|e| StoreError::dynamo("put_item", e))?;
        Ok(())
    }

    pub async fn get_goal(
        &self,
        user_id: &str,
        goal_id: &str,
    ) -> Result<Option<Goal>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(format!("USER#{}", user_id)))
            .key("SK", AttributeValue::S(format!("GOAL#{}", goal_id)))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("get_item", e))?;

        Ok(result.item().map(|item| item_to_goal(user_id, goal_id, item)))
    }

    pub async fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>, StoreError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(format!("USER#{}", user_id)))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("GOAL#".to_string()))
            .send()
            .await
            .map_err(|e| StoreError::dynamo("query", e))?;

        let mut goals = Vec::new();
        for item in result.items() {
            if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
                if let Some(goal_id) = sk.strip_prefix("GOAL#") {
                    goals.push(item_to_goal(user_id, goal_id, item));
                }
            }
        }
        Ok(goals)
    }

    pub async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<bool, StoreError> {
        self.delete_owned(user_id, &format!("GOAL#{}", goal_id)).await
    }

    /// Delete one owned item, reporting whether it existed. ALL_OLD stands
    /// in for Mongo's deletedCount so handlers can answer 404.
    async fn delete_owned(&self, user_id: &str, sk: &str) -> Result<bool, StoreError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(format!("USER#{}", user_id)))
            .key("SK", AttributeValue::S(sk.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| StoreError::dynamo("delete_item", e))?;

        Ok(result.attributes().map_or(false, |attrs| !attrs.is_empty()))
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, key: &str) -> String {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn opt_string_attr(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

fn item_to_task(user_id: &str, task_id: &str, item: &HashMap<String, AttributeValue>) -> Task {
    Task {
        id: task_id.to_string(),
        user_id: user_id.to_string(),
        title: string_attr(item, "title"),
        description: opt_string_attr(item, "description"),
        date: opt_string_attr(item, "date"),
        category: opt_string_attr(item, "category"),
        completed: item
            .get("completed")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        week: item
            .get("week")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok()),
        priority: item
            .get("priority")
            .and_then(|v| v.as_s().ok())
            .map(|s| Priority::parse(s))
            .unwrap_or_default(),
        tags: item
            .get("tags")
            .and_then(|v| v.as_l().ok())
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_s().ok().cloned())
                    .collect()
            })
            .unwrap_or_default(),
        created_at: string_attr(item, "created_at"),
        completed_at: opt_string_attr(item, "completed_at"),
    }
}

fn item_to_category(
    user_id: &str,
    category_id: &str,
    item: &HashMap<String, AttributeValue>,
) -> Category {
    Category {
        id: category_id.to_string(),
        user_id: user_id.to_string(),
        name: string_attr(item, "name"),
        created_at: string_attr(item, "created_at"),
    }
}

fn item_to_goal(user_id: &str, goal_id: &str, item: &HashMap<String, AttributeValue>) -> Goal {
    Goal {
        id: goal_id.to_string(),
        user_id: user_id.to_string(),
        title: string_attr(item, "title"),
        description: opt_string_attr(item, "description"),
        category: opt_string_attr(item, "category"),
        completed: item
            .get("completed")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        created_at: string_attr(item, "created_at"),
    }
}
