//! Output formatting for search results (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::ecs::{Item, ResultSet};

/// Formats result sets for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a full result set, including envelope errors.
    pub fn format_results(&self, results: &ResultSet<Item>) -> String {
        match self.format {
            OutputFormat::Json => self.json_results(results),
            OutputFormat::Table => self.table_results(results),
            OutputFormat::Markdown => self.markdown_results(results),
            OutputFormat::Csv => self.csv_items(results.items()),
        }
    }

    // JSON formatting

    fn json_results(&self, results: &ResultSet<Item>) -> String {
        serde_json::to_string_pretty(results).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table_results(&self, results: &ResultSet<Item>) -> String {
        let mut lines = Vec::new();

        for err in &results.errors {
            lines.push(format!("Error: {} - {}", err.code, err.message));
        }

        if results.is_empty() {
            lines.push("No items found.".to_string());
            return lines.join("\n");
        }

        let asin_width = 10;
        let group_width = 12;
        let byline_width = 24;
        let title_width = 50;

        lines.push(format!(
            "{:<asin_width$}  {:<group_width$}  {:<byline_width$}  {}",
            "ASIN", "Group", "By", "Title"
        ));
        lines.push(format!(
            "{:-<asin_width$}  {:-<group_width$}  {:-<byline_width$}  {:-<title_width$}",
            "", "", "", ""
        ));

        for item in results {
            lines.push(format!(
                "{:<asin_width$}  {:<group_width$}  {:<byline_width$}  {}",
                item.asin.as_deref().unwrap_or("N/A"),
                truncate(item.product_group().unwrap_or("-"), group_width),
                truncate(item.byline().as_deref().unwrap_or("-"), byline_width),
                truncate(item.title().unwrap_or("Unknown"), title_width),
            ));
        }

        lines.push(String::new());
        lines.push(self.summary(results));

        lines.join("\n")
    }

    fn summary(&self, results: &ResultSet<Item>) -> String {
        match (results.total_results, results.total_pages) {
            (Some(total), Some(pages)) => {
                format!("Showing {} of {} items ({} pages)", results.len(), total, pages)
            }
            (Some(total), None) => format!("Showing {} of {} items", results.len(), total),
            _ => format!("Total: {} items", results.len()),
        }
    }

    // Markdown formatting

    fn markdown_results(&self, results: &ResultSet<Item>) -> String {
        let mut lines = Vec::new();

        for err in &results.errors {
            lines.push(format!("> **{}**: {}", err.code, err.message));
        }

        if results.is_empty() {
            lines.push("No items found.".to_string());
            return lines.join("\n");
        }

        lines.push("| ASIN | Group | By | Title |".to_string());
        lines.push("|------|-------|----|-------|".to_string());

        for item in results {
            let title = truncate(item.title().unwrap_or("Unknown"), 40);
            let title = match &item.detail_page_url {
                Some(url) => format!("[{}]({})", title, url),
                None => title,
            };

            lines.push(format!(
                "| {} | {} | {} | {} |",
                item.asin.as_deref().unwrap_or(""),
                item.product_group().unwrap_or(""),
                item.byline().unwrap_or_default(),
                title
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{}*", self.summary(results)));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "asin,parent_asin,title,by,manufacturer,product_group,url".to_string()
    }

    fn csv_items(&self, items: &[Item]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for item in items {
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                item.asin.as_deref().unwrap_or_default(),
                item.parent_asin.as_deref().unwrap_or_default(),
                Self::csv_escape(item.title().unwrap_or_default()),
                Self::csv_escape(&item.byline().unwrap_or_default()),
                Self::csv_escape(item.manufacturer().unwrap_or_default()),
                Self::csv_escape(item.product_group().unwrap_or_default()),
                item.detail_page_url.as_deref().unwrap_or_default(),
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Shortens `s` to at most `width` characters, marking the cut with `...`.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
