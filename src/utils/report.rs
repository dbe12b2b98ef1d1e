// src/utils/report.rs

//! Banner and summary formatting for run reports.
//!
//! Everything goes through the `log` facade at INFO level, so the output
//! follows whatever logger the binary installed.

use crate::models::{BookTerm, CrawlResult};

const RULE_WIDTH: usize = 60;

/// Log a separator line
pub fn separator() {
    log::info!("{}", "─".repeat(RULE_WIDTH));
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    log::info!("{border}");
    log::info!("  {title}");
    log::info!("{border}");
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {message}");
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {title}");
    for (key, value) in items {
        log::info!("    {key}: {value}");
    }
}

/// Summary rows for a crawl result.
pub fn result_rows(result: &CrawlResult) -> Vec<(&'static str, String)> {
    let elapsed = result.finished_at - result.started_at;
    vec![
        ("Found", format!("{}/{}", result.successes.len(), result.total)),
        ("Failed", result.failures.len().to_string()),
        ("Not attempted", (result.total - result.attempted()).to_string()),
        ("Status", format!("{:?}", result.status)),
        ("Elapsed", format!("{}s", elapsed.num_seconds())),
    ]
}

/// Log a full crawl report: totals followed by the failed terms.
pub fn crawl_report(title: &str, result: &CrawlResult) {
    summary(title, &result_rows(result));
    if !result.failures.is_empty() {
        separator();
        log::warn!("Terms without a valid document:");
        for term in &result.failures {
            sub_item(&format!("- {}", term));
        }
    }
}

/// Short label for a term in progress lines.
pub fn short_label(term: &BookTerm) -> String {
    const MAX: usize = 60;
    let text = term.as_str();
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{head}...")
    }
}
