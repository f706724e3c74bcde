//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a finished
//! crawl: run information, totals, and one table row per page.

use crate::output::stats::{summarize, PageStats};
use crate::output::traits::OutputResult;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Run-level details shown at the top of the report
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub scraper_id: i32,
    pub website: String,
    pub max_depth: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Writes a markdown report to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to create or write the file
pub fn generate_markdown_report(
    run: &RunInfo,
    stats: &[PageStats],
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(run, stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(run: &RunInfo, stats: &[PageStats]) -> String {
    let totals = summarize(stats);
    let mut md = String::new();

    md.push_str("# Sitescope Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Scraper**: #{}\n", run.scraper_id));
    md.push_str(&format!("- **Website**: {}\n", run.website));
    md.push_str(&format!("- **Max Depth**: {}\n", run.max_depth));
    md.push_str(&format!("- **Started**: {}\n", run.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", run.finished_at.to_rfc3339()));
    let elapsed = run.finished_at - run.started_at;
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n\n",
        elapsed.num_milliseconds() as f64 / 1000.0
    ));

    md.push_str("## Totals\n\n");
    md.push_str(&format!("- **Pages**: {}\n", totals.pages));
    md.push_str(&format!("- **Responses**: {}\n", totals.hits));
    md.push_str(&format!("- **Bytes**: {}\n", totals.total_bytes));
    md.push_str(&format!("- **Deepest Page**: {}\n", totals.max_depth));
    md.push_str(&format!(
        "- **Average Fetch Time**: {} ms\n\n",
        totals.average_duration.as_millis()
    ));

    if stats.is_empty() {
        md.push_str("_No pages were fetched._\n");
        return md;
    }

    let mut pages: Vec<&PageStats> = stats.iter().collect();
    pages.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.url.cmp(&b.url)));

    md.push_str("## Pages\n\n");
    md.push_str("| URL | Status | Depth | Hits | Bytes | Avg ms | Content-Type |\n");
    md.push_str("|-----|--------|-------|------|-------|--------|--------------|\n");
    for page in pages {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            escape_cell(&page.url),
            page.status_code,
            page.depth,
            page.hits,
            page.total_bytes,
            page.average_duration().as_millis(),
            escape_cell(page.content_type.as_deref().unwrap_or("-")),
        ));
    }

    md
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn run_info() -> RunInfo {
        let started_at = Utc::now();
        RunInfo {
            scraper_id: 3,
            website: "https://example.com/".to_string(),
            max_depth: 2,
            started_at,
            finished_at: started_at + chrono::Duration::milliseconds(1500),
        }
    }

    fn page(url: &str, depth: u32) -> PageStats {
        let now = Utc::now();
        PageStats {
            url: url.to_string(),
            status_code: 200,
            depth,
            hits: 2,
            total_duration: Duration::from_millis(80),
            max_duration: Duration::from_millis(50),
            total_bytes: 2048,
            content_type: Some("text/html".to_string()),
            first_seen: now,
            last_seen: now,
        }
    }

    #[test]
    fn test_report_lists_pages_by_depth() {
        let stats = vec![
            page("https://example.com/b", 1),
            page("https://example.com/", 0),
        ];
        let md = format_markdown_report(&run_info(), &stats);

        assert!(md.contains("- **Scraper**: #3"));
        assert!(md.contains("- **Duration**: 1.50 seconds"));
        assert!(md.contains("- **Pages**: 2"));
        let root = md.find("| https://example.com/ |").unwrap();
        let child = md.find("| https://example.com/b |").unwrap();
        assert!(root < child);
        assert!(md.contains("| 200 | 0 | 2 | 2048 | 40 | text/html |"));
    }

    #[test]
    fn test_report_without_pages() {
        let md = format_markdown_report(&run_info(), &[]);
        assert!(md.contains("_No pages were fetched._"));
        assert!(!md.contains("## Pages"));
    }

    #[test]
    fn test_pipes_are_escaped() {
        let stats = vec![page("https://example.com/?q=a|b", 0)];
        let md = format_markdown_report(&run_info(), &stats);
        assert!(md.contains("q=a\\|b"));
    }

    #[test]
    fn test_generate_writes_file() {
        let file = NamedTempFile::new().unwrap();
        generate_markdown_report(&run_info(), &[page("https://example.com/", 0)], file.path())
            .unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert!(written.starts_with("# Sitescope Crawl Report"));
    }
}
