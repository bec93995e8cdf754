//! Plain-text tables for the terminal.

use campus_erp_models::dashboard::{Activity, DashboardStats};
use serde_json::Value;

use crate::client::resources::{Resource, ResourcePage};

/// Longest cell rendered before truncation.
const MAX_CELL_WIDTH: usize = 40;

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut output = vec![line(&header), line(&rule)];
    output.extend(rows.iter().map(|row| line(row)));
    output.join("\n")
}

pub fn render_stats(stats: &DashboardStats) -> String {
    let occupancy = &stats.housing_occupancy;
    let occupancy_pct = if occupancy.total_capacity > 0 {
        format!(
            " ({:.0}%)",
            occupancy.total_occupied as f64 * 100.0 / occupancy.total_capacity as f64
        )
    } else {
        String::new()
    };

    let rows = vec![
        vec!["Students".to_string(), stats.total_students.to_string()],
        vec!["Faculty".to_string(), stats.total_faculty.to_string()],
        vec!["Departments".to_string(), stats.total_departments.to_string()],
        vec!["Active courses".to_string(), stats.active_courses.to_string()],
        vec!["Library resources".to_string(), stats.library_resources.to_string()],
        vec![
            "Housing occupancy".to_string(),
            format!(
                "{}/{}{}",
                occupancy.total_occupied, occupancy.total_capacity, occupancy_pct
            ),
        ],
        vec!["Research projects".to_string(), stats.research_projects.to_string()],
        vec!["Approved reports".to_string(), stats.compliance_score.to_string()],
    ];
    render_table(&["metric", "value"], &rows)
}

pub fn render_activities(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return "No recent activity.".to_string();
    }
    let rows: Vec<Vec<String>> = activities
        .iter()
        .map(|a| {
            let kind = serde_json::to_value(a.kind)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            // Timestamps are shown to the date.
            let date: String = a.date.chars().take(10).collect();
            vec![date, kind, a.description.clone()]
        })
        .collect();
    render_table(&["date", "type", "description"], &rows)
}

pub fn render_page(resource: &Resource, page: &ResourcePage) -> String {
    if page.data.is_empty() {
        return format!("No {} found.", resource.name.replace('-', " "));
    }

    let rows: Vec<Vec<String>> = page
        .data
        .iter()
        .map(|item| resource.columns.iter().map(|c| cell(item, c)).collect())
        .collect();

    let shown_from = page.meta.offset.unwrap_or(0) + 1;
    let shown_to = page.meta.offset.unwrap_or(0) + page.data.len() as i64;
    let mut output = render_table(resource.columns, &rows);
    output.push_str(&format!(
        "\n\n{} {}-{} of {}{}",
        resource.name,
        shown_from,
        shown_to,
        page.meta.total,
        if page.meta.has_more { " (more available)" } else { "" }
    ));
    output
}

/// Text for a dotted `path` into `item`. Missing and null values are blank.
pub fn cell(item: &Value, path: &str) -> String {
    let value = path
        .split('.')
        .try_fold(item, |current, key| current.get(key));
    truncate(&value.map(value_text).unwrap_or_default())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut short: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    short.push_str("...");
    short
}
