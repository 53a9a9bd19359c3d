use chrono::Utc;
use lambda_http::{Body, Error, Response};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use weekdo_atoms::respond;
use weekdo_atoms::store::Store;
use weekdo_atoms::tasks::model::Task;
use weekdo_atoms::tasks::service;

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 20.0;
const PT_TO_MM: f64 = 0.352_778;

/// GET /export/pdf - the caller's tasks as a paginated report
pub async fn export_pdf(store: &Store, user_id: &str) -> Result<Response<Body>, Error> {
    let tasks = service::list_tasks(store, user_id).await?;
    let username = store
        .get_user(user_id)
        .await?
        .map(|user| user.username)
        .unwrap_or_else(|| "User".to_string());
    let generated_on = Utc::now().date_naive().format("%-m/%-d/%Y").to_string();

    let bytes = render_pdf(&username, &generated_on, &tasks)?;
    respond::attachment("application/pdf", "tasks.pdf", bytes)
}

/// A4 report: centered header, summary counts, then one block per task.
/// A fresh page is started whenever the cursor runs off the bottom
/// margin. Everything is positioned procedurally; there is no reusable
/// layout engine behind this.
pub fn render_pdf(username: &str, generated_on: &str, tasks: &[Task]) -> Result<Vec<u8>, String> {
    let (doc, first_page, first_layer) =
        PdfDocument::new("Task Report", mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| e.to_string())?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| e.to_string())?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT - 25.0;

    layer.use_text(
        "Task Report",
        24.0,
        mm(centered("Task Report", 24.0)),
        mm(y),
        &bold,
    );
    y -= 10.0;

    let generated_for = format!("Generated for: {}", username);
    layer.use_text(
        generated_for.as_str(),
        12.0,
        mm(centered(&generated_for, 12.0)),
        mm(y),
        &regular,
    );
    y -= 6.0;

    let date_line = format!("Date: {}", generated_on);
    layer.use_text(
        date_line.as_str(),
        10.0,
        mm(centered(&date_line, 10.0)),
        mm(y),
        &regular,
    );
    y -= 16.0;

    let completed = tasks.iter().filter(|t| t.completed).count();
    layer.use_text("Summary", 14.0, mm(MARGIN), mm(y), &bold);
    y -= 7.0;
    let summary_lines = [
        format!("Total Tasks: {}", tasks.len()),
        format!("Completed: {}", completed),
        format!("Pending: {}", tasks.len() - completed),
    ];
    for line in &summary_lines {
        layer.use_text(line.as_str(), 10.0, mm(MARGIN), mm(y), &regular);
        y -= 5.0;
    }
    y -= 10.0;

    layer.use_text("Tasks", 14.0, mm(MARGIN), mm(y), &bold);
    y -= 8.0;

    for (index, task) in tasks.iter().enumerate() {
        if y < MARGIN + 24.0 {
            let (next_page, next_layer) =
                doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - 25.0;
        }

        let heading = format!("{}. {}", index + 1, task.title);
        layer.use_text(heading.as_str(), 12.0, mm(MARGIN), mm(y), &bold);
        y -= 5.0;

        if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
            layer.use_text(description, 9.0, mm(MARGIN + 5.0), mm(y), &regular);
            y -= 4.0;
        }

        let meta = format!(
            "Category: {} | Priority: {} | Status: {}",
            task.category.as_deref().unwrap_or("-"),
            task.priority.as_str(),
            if task.completed { "Completed" } else { "Pending" }
        );
        layer.use_text(meta.as_str(), 8.0, mm(MARGIN + 5.0), mm(y), &regular);
        y -= 4.0;

        if !task.tags.is_empty() {
            let tags = format!("Tags: {}", task.tags.join(", "));
            layer.use_text(tags.as_str(), 8.0, mm(MARGIN + 5.0), mm(y), &regular);
            y -= 4.0;
        }

        y -= 2.0;
    }

    doc.save_to_bytes().map_err(|e| e.to_string())
}

fn mm(value: f64) -> Mm {
    Mm(value as _)
}

/// Rough centering for the builtin Helvetica: average glyph width is
/// close enough to half the font size for a report header.
fn centered(text: &str, font_size: f64) -> f64 {
    let width = text.chars().count() as f64 * font_size * 0.5 * PT_TO_MM;
    ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekdo_atoms::tasks::model::Priority;

    fn task(index: usize) -> Task {
        Task {
            id: format!("t{}", index),
            user_id: "u1".to_string(),
            title: format!("Task {}", index),
            description: Some("a description".to_string()),
            date: Some("2024-03-04".to_string()),
            category: Some("Job".to_string()),
            completed: index % 2 == 0,
            week: Some(9),
            priority: Priority::Medium,
            tags: vec!["one".to_string(), "two".to_string()],
            created_at: "2024-03-01T08:00:00+00:00".to_string(),
            completed_at: None,
        }
    }

    #[test]
    fn produces_a_pdf_header() {
        let bytes = render_pdf("kawtar", "3/10/2024", &[task(1)]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_reports_paginate_without_panicking() {
        let tasks: Vec<Task> = (0..60).map(task).collect();
        let bytes = render_pdf("kawtar", "3/10/2024", &tasks).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 2_000);
    }

    #[test]
    fn empty_report_is_still_valid() {
        let bytes = render_pdf("kawtar", "3/10/2024", &[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
