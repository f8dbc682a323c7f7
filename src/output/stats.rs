//! Terminal statistics for a finished run

use crate::output::CrawlReport;

/// Prints run statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report of the finished run
pub fn print_statistics(report: &CrawlReport) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Root sitemap: {}", report.root_sitemap);
    println!("  Output directory: {}", report.output_root.display());
    println!("  Sitemaps read: {}", report.sitemaps_visited);
    println!("  Pages listed: {}", report.pages.len());
    println!("  Duration: {}s", report.duration().num_seconds());
    println!();

    println!("Pages:");
    println!("  Saved: {}", report.pages_saved());
    println!("    without <main>: {}", report.pages_without_main());
    println!("  Failed: {}", report.pages_failed());
    println!();

    if report.pages_failed() > 0 {
        println!("Failed Pages:");
        for (url, failure) in report.failures() {
            println!("  - {}: {}", url, failure);
        }
        println!();
    }

    if !report.sitemap_failures.is_empty() {
        println!("Skipped Sitemaps ({}):", report.sitemap_failures.len());
        for failure in &report.sitemap_failures {
            println!("  - {}: {}", failure.url, failure.error);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages saved)",
        report.success_rate(),
        report.pages_saved(),
        report.pages.len()
    );
}
