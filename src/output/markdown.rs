//! Markdown run report generation

use crate::output::{CrawlReport, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report of a crawl run
///
/// # Arguments
///
/// * `report` - The finished run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Writes the markdown report for a finished run, logging where it went
pub fn write_report(report: &CrawlReport, output_path: &Path) -> crate::Result<()> {
    generate_markdown_report(report, output_path)?;
    tracing::info!("Report written to {}", output_path.display());
    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Sitemap-Mirror Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root Sitemap**: {}\n", report.root_sitemap));
    md.push_str(&format!(
        "- **Output Directory**: {}\n",
        report.output_root.display()
    ));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        report.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n\n",
        report.duration().num_seconds()
    ));

    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Sitemaps Read | {} |\n", report.sitemaps_visited));
    md.push_str(&format!(
        "| Sitemaps Skipped | {} |\n",
        report.sitemap_failures.len()
    ));
    md.push_str(&format!("| Pages Listed | {} |\n", report.pages.len()));
    md.push_str(&format!("| Pages Saved | {} |\n", report.pages_saved()));
    md.push_str(&format!(
        "| Saved Without Main | {} |\n",
        report.pages_without_main()
    ));
    md.push_str(&format!("| Pages Failed | {} |\n\n", report.pages_failed()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    if report.pages_failed() > 0 {
        md.push_str("## Failed Pages\n\n");
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");
        for (url, failure) in report.failures() {
            md.push_str(&format!("| {} | {} |\n", url, escape_cell(&failure.to_string())));
        }
        md.push('\n');
    }

    if !report.sitemap_failures.is_empty() {
        md.push_str("## Skipped Sitemaps\n\n");
        md.push_str("| Sitemap | Reason |\n");
        md.push_str("|---------|--------|\n");
        for failure in &report.sitemap_failures {
            md.push_str(&format!(
                "| {} | {} |\n",
                failure.url,
                escape_cell(&failure.error.to_string())
            ));
        }
        md.push('\n');
    }

    md
}

/// Keeps pipes and line breaks in error messages from breaking table rows
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
