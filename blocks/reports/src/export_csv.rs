use lambda_http::{Body, Error, Response};
use serde::Serialize;

use weekdo_atoms::respond;
use weekdo_atoms::store::Store;
use weekdo_atoms::tasks::model::Task;
use weekdo_atoms::tasks::service::{self, parse_day};

const HEADERS: [&str; 8] = [
    "Title",
    "Description",
    "Date",
    "Category",
    "Priority",
    "Tags",
    "Status",
    "Week",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Priority")]
    priority: &'a str,
    #[serde(rename = "Tags")]
    tags: String,
    #[serde(rename = "Status")]
    status: &'a str,
    #[serde(rename = "Week")]
    week: String,
}

/// GET /export/csv - the caller's tasks as a csv attachment
pub async fn export_csv(store: &Store, user_id: &str) -> Result<Response<Body>, Error> {
    let tasks = service::list_tasks(store, user_id).await?;
    let bytes = tasks_to_csv(&tasks)?;
    respond::attachment("text/csv", "tasks.csv", bytes)
}

/// One header row, then one row per task. Tags are joined with ", ";
/// the date is rendered human-style (`3/4/2024`).
pub fn tasks_to_csv(tasks: &[Task]) -> Result<Vec<u8>, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if tasks.is_empty() {
        writer
            .write_record(HEADERS)
            .map_err(|e| format!("CSV write error: {}", e))?;
    }

    for task in tasks {
        writer
            .serialize(CsvRow {
                title: &task.title,
                description: task.description.as_deref().unwrap_or(""),
                date: human_date(task.date.as_deref()),
                category: task.category.as_deref().unwrap_or(""),
                priority: task.priority.as_str(),
                tags: task.tags.join(", "),
                status: if task.completed { "Completed" } else { "Pending" },
                week: task.week.map(|w| w.to_string()).unwrap_or_default(),
            })
            .map_err(|e| format!("CSV write error: {}", e))?;
    }

    writer
        .into_inner()
        .map_err(|e| format!("CSV write error: {}", e))
}

fn human_date(date: Option<&str>) -> String {
    date.and_then(parse_day)
        .map(|day| day.format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekdo_atoms::tasks::model::Priority;

    fn task(title: &str, tags: &[&str], completed: bool) -> Task {
        Task {
            id: title.to_string(),
            user_id: "u1".to_string(),
            title: title.to_string(),
            description: Some("desc".to_string()),
            date: Some("2024-03-04".to_string()),
            category: Some("Gym".to_string()),
            completed,
            week: Some(9),
            priority: Priority::Medium,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: "2024-03-01T08:00:00+00:00".to_string(),
            completed_at: None,
        }
    }

    #[test]
    fn row_count_matches_task_count() {
        let tasks = vec![task("a", &[], false), task("b", &["x"], true)];
        let bytes = tasks_to_csv(&tasks).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADERS.join(","));
    }

    #[test]
    fn formats_date_tags_and_status() {
        let bytes = tasks_to_csv(&[task("Run", &["fitness", "morning"], true)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("3/4/2024"));
        assert!(row.contains("\"fitness, morning\""));
        assert!(row.contains("Completed"));
        assert!(row.ends_with(",9"));
    }

    #[test]
    fn empty_export_still_has_a_header() {
        let bytes = tasks_to_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.trim_end(), HEADERS.join(","));
    }
}
