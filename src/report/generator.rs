//! Markdown and JSON report generation.
//!
//! This module renders a `Summary` as a human-readable Markdown report or
//! as pretty-printed JSON for downstream chart and export tooling.

use crate::config::ReportConfig;
use crate::models::{Emotions, RadarChart, Ranking, Summary};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about how a report was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Input path or job the results came from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of result files read successfully.
    pub files_loaded: usize,
    /// Number of result files that could not be read.
    pub files_failed: usize,
    /// Number of per-URL scrape errors discarded before aggregation.
    pub scrape_failures: usize,
    /// Number of entries that were neither results nor errors.
    pub invalid_entries: usize,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

/// A summary together with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub summary: Summary,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ReportDocument, options: &ReportConfig) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str("# Web Exploration Summary\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(summary, options));
    output.push_str(&generate_overview_section(summary, options));
    output.push_str(&generate_industry_section(summary, options));
    output.push_str(&generate_reviews_section(summary));
    output.push_str(&generate_social_section(summary));
    output.push_str(&generate_news_section(summary));

    if options.include_emotions {
        output.push_str(&generate_emotions_section(summary));
    }

    if options.include_radar {
        output.push_str(&generate_radar_section("Metadata Radar", &summary.meta_radar));
        output.push_str(&generate_radar_section("Domain Radar", &summary.domain_radar));
    }

    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if metadata.files_loaded > 0 || metadata.files_failed > 0 {
        section.push_str(&format!("- **Files Loaded:** {}\n", metadata.files_loaded));
    }
    if metadata.files_failed > 0 {
        section.push_str(&format!("- **Files Failed:** {}\n", metadata.files_failed));
    }
    if metadata.scrape_failures > 0 {
        section.push_str(&format!(
            "- **Failed Scrapes (excluded):** {}\n",
            metadata.scrape_failures
        ));
    }
    if metadata.invalid_entries > 0 {
        section.push_str(&format!(
            "- **Unrecognized Entries:** {}\n",
            metadata.invalid_entries
        ));
    }
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_table_of_contents(summary: &Summary, options: &ReportConfig) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Overview](#overview)\n");
    toc.push_str("- [Industry Classification](#industry-classification)\n");
    toc.push_str("- [Reviews](#reviews)\n");

    if !summary.social_metrics.urls.is_empty() {
        toc.push_str("- [Social Metrics](#social-metrics)\n");
    }
    if !summary.news_sentiment.urls.is_empty() {
        toc.push_str("- [News Sentiment](#news-sentiment)\n");
    }
    if options.include_emotions && !summary.emotions_area.series.is_empty() {
        toc.push_str("- [Emotions](#emotions)\n");
    }
    if options.include_radar {
        toc.push_str("- [Metadata Radar](#metadata-radar)\n");
        toc.push_str("- [Domain Radar](#domain-radar)\n");
    }

    toc.push('\n');
    toc
}

fn generate_overview_section(summary: &Summary, options: &ReportConfig) -> String {
    let mut section = String::new();
    let [live, parked] = summary.domain_status;

    section.push_str("## Overview\n\n");
    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|:---:|\n");
    section.push_str(&format!("| URLs | {} |\n", summary.total_urls));
    section.push_str(&format!("| Live | {} |\n", live));
    section.push_str(&format!("| Parked | {} |\n", parked));
    section.push_str(&format!("| Errors | {} |\n", summary.domain_error_status));
    section.push_str(&format!("| Scrapable | {} |\n", summary.scrapable_urls));
    section.push_str(&format!(
        "| Metadata/Domain Match | {:.2}% |\n",
        summary.percentage_match
    ));
    section.push_str(&format!("| Average Scrape Time | {:.2}s |\n\n", summary.avg_time));

    if !summary.parked_urls.is_empty() {
        section.push_str("### Parked URLs\n\n");
        section.push_str(&url_list(&summary.parked_urls, options.max_list_items));
    }

    section
}

fn generate_industry_section(summary: &Summary, options: &ReportConfig) -> String {
    let mut section = String::new();
    let industries = &summary.industry_percentages;

    section.push_str("## Industry Classification\n\n");

    if industries.industries.is_empty() {
        section.push_str("No classification data.\n\n");
        return section;
    }

    section.push_str("| Industry | Share |\n");
    section.push_str("|:---|:---:|\n");
    for (industry, pct) in industries.industries.iter().zip(&industries.percentages) {
        section.push_str(&format!("| {} | {:.2}% |\n", cell(industry), pct));
    }
    section.push('\n');

    if !summary.unclassified_urls.is_empty() {
        section.push_str("### Unclassified URLs\n\n");
        section.push_str(&url_list(&summary.unclassified_urls, options.max_list_items));
    }

    if !summary.weak_classification.is_empty() {
        section.push_str("### Weak Classifications\n\n");
        section.push_str("| URL | Metadata Class | Score |\n");
        section.push_str("|:---|:---|:---:|\n");
        for weak in summary.weak_classification.iter().take(options.max_list_items) {
            section.push_str(&format!(
                "| {} | {} | {:.2} |\n",
                cell(&weak.url),
                cell(&weak.metadata_class),
                weak.score
            ));
        }
        section.push_str(&more_line(
            summary.weak_classification.len(),
            options.max_list_items,
        ));
        section.push('\n');
    }

    if !summary.mismatched_urls.is_empty() {
        section.push_str("### Metadata/Domain Mismatches\n\n");
        section.push_str("| URL | Metadata Class | Domain Class |\n");
        section.push_str("|:---|:---|:---|\n");
        for mismatch in summary.mismatched_urls.iter().take(options.max_list_items) {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&mismatch.url),
                cell(&mismatch.metadata_class),
                cell(&mismatch.domain_class)
            ));
        }
        section.push_str(&more_line(
            summary.mismatched_urls.len(),
            options.max_list_items,
        ));
        section.push('\n');
    }

    section
}

fn generate_reviews_section(summary: &Summary) -> String {
    let mut section = String::new();

    section.push_str("## Reviews\n\n");

    if summary.top_nps.urls.is_empty() {
        section.push_str("No complete review data.\n\n");
        return section;
    }

    section.push_str(&ranking_table("Top NPS", &summary.top_nps));
    section.push_str(&ranking_table("Top Trust Index", &summary.top_trust_index));
    section.push_str(&ranking_table("Top Rating", &summary.top_rating));

    section.push_str("### Average Star Distribution\n\n");
    section.push_str("| ★1 | ★2 | ★3 | ★4 | ★5 |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    let cells: Vec<String> = summary
        .average_star_rating
        .iter()
        .map(|avg| format!("{:.2}", avg))
        .collect();
    section.push_str(&format!("| {} |\n\n", cells.join(" | ")));

    section
}

fn ranking_table(title: &str, ranking: &Ranking) -> String {
    let mut table = String::new();

    table.push_str(&format!("### {}\n\n", title));
    table.push_str("| # | URL | Score |\n");
    table.push_str("|:---:|:---|:---:|\n");
    for (i, (url, score)) in ranking.urls.iter().zip(&ranking.scores).enumerate() {
        table.push_str(&format!("| {} | {} | {:.2} |\n", i + 1, cell(url), score));
    }
    table.push('\n');

    table
}

fn generate_social_section(summary: &Summary) -> String {
    let social = &summary.social_metrics;
    if social.urls.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Social Metrics\n\n");
    section.push_str("| URL | Shares | Comments | Reactions |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");
    for i in 0..social.urls.len() {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            cell(&social.urls[i]),
            social.share_counts[i],
            social.comment_counts[i],
            social.reaction_counts[i]
        ));
    }
    section.push('\n');

    section
}

fn generate_news_section(summary: &Summary) -> String {
    let news = &summary.news_sentiment;
    if news.urls.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## News Sentiment\n\n");
    section.push_str("| URL | Positive | Neutral | Negative |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");
    for i in 0..news.urls.len() {
        section.push_str(&format!(
            "| {} | {}% | {}% | {}% |\n",
            cell(&news.urls[i]),
            news.positive[i],
            news.neutral[i],
            news.negative[i]
        ));
    }
    section.push('\n');

    section
}

fn generate_emotions_section(summary: &Summary) -> String {
    let series = &summary.emotions_area.series;
    if series.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Emotions\n\n");
    section.push_str(&format!("| URL | {} |\n", Emotions::NAMES.join(" | ")));
    section.push_str(&format!("|:---|{}\n", ":---:|".repeat(Emotions::NAMES.len())));
    for entry in series {
        let cells: Vec<String> = entry.data.iter().map(|v| format!("{}%", v)).collect();
        section.push_str(&format!("| {} | {} |\n", cell(&entry.name), cells.join(" | ")));
    }
    section.push('\n');

    section
}

fn generate_radar_section(title: &str, radar: &RadarChart) -> String {
    let mut section = String::new();
    section.push_str(&format!("## {}\n\n", title));

    if radar.categories.is_empty() {
        section.push_str("No categories.\n\n");
        return section;
    }

    let headers: Vec<String> = radar.categories.iter().map(|c| cell(c)).collect();
    section.push_str(&format!("| URL | {} |\n", headers.join(" | ")));
    section.push_str(&format!("|:---|{}\n", ":---:|".repeat(radar.categories.len())));
    for series in &radar.series {
        let cells: Vec<String> = series.data.iter().map(|v| format!("{:.2}", v)).collect();
        section.push_str(&format!("| {} | {} |\n", cell(&series.name), cells.join(" | ")));
    }
    section.push('\n');

    section
}

/// Escape a value for use inside a Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn url_list(urls: &[String], limit: usize) -> String {
    let mut list = String::new();
    for url in urls.iter().take(limit) {
        list.push_str(&format!("- {}\n", url));
    }
    list.push_str(&more_line(urls.len(), limit));
    list.push('\n');
    list
}

fn more_line(total: usize, limit: usize) -> String {
    if total > limit {
        format!("\n*…and {} more*\n", total - limit)
    } else {
        String::new()
    }
}

fn generate_footer() -> String {
    "---\n\n*Report generated by wee-summary*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ReportDocument) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EmotionSeries, EmotionsArea, IndustryPercentages, MismatchedUrl, RadarSeries,
        WeakClassification,
    };

    fn create_test_report() -> ReportDocument {
        let metadata = ReportMetadata {
            source: "results/".to_string(),
            generated_at: Utc::now(),
            files_loaded: 2,
            files_failed: 1,
            scrape_failures: 3,
            invalid_entries: 0,
            duration_seconds: 0.4,
        };

        let summary = Summary {
            total_urls: 4,
            domain_status: [3, 1],
            domain_error_status: 0,
            parked_urls: vec!["https://parked.com".to_string()],
            scrapable_urls: 4,
            industry_percentages: IndustryPercentages {
                industries: vec!["Tech".to_string(), "Retail".to_string()],
                percentages: vec![75.0, 25.0],
            },
            weak_classification: vec![WeakClassification {
                url: "https://weak.com".to_string(),
                metadata_class: "Retail".to_string(),
                score: 0.4,
            }],
            percentage_match: 75.0,
            mismatched_urls: vec![MismatchedUrl {
                url: "https://mismatch.com".to_string(),
                metadata_class: "Tech".to_string(),
                domain_class: "Retail".to_string(),
            }],
            meta_radar: RadarChart {
                categories: vec!["Tech".to_string(), "Retail".to_string()],
                series: vec![RadarSeries {
                    name: "https://a.com".to_string(),
                    data: vec![90.0, 10.0],
                }],
            },
            emotions_area: EmotionsArea {
                series: vec![EmotionSeries {
                    name: "https://a.com".to_string(),
                    data: [1, 0, 0, 46, 50, 3, 0],
                }],
            },
            top_nps: Ranking {
                urls: vec!["https://a.com".to_string()],
                scores: vec![42.0],
            },
            top_trust_index: Ranking {
                urls: vec!["https://a.com".to_string()],
                scores: vec![4.1],
            },
            top_rating: Ranking {
                urls: vec!["https://a.com".to_string()],
                scores: vec![4.5],
            },
            average_star_rating: [1.0, 0.0, 2.5, 4.0, 10.0],
            avg_time: 2.44,
            ..Summary::default()
        };

        ReportDocument { metadata, summary }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Web Exploration Summary"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Overview"));
        assert!(markdown.contains("| Metadata/Domain Match | 75.00% |"));
        assert!(markdown.contains("| Tech | 75.00% |"));
        assert!(markdown.contains("https://mismatch.com"));
        assert!(markdown.contains("### Top NPS"));
        assert!(markdown.contains("| 1.00 | 0.00 | 2.50 | 4.00 | 10.00 |"));
        assert!(markdown.contains("## Emotions"));
        assert!(markdown.contains("46%"));
        assert!(!markdown.contains("## Metadata Radar"));
        assert!(!markdown.contains("## Social Metrics"));
    }

    #[test]
    fn test_radar_section_opt_in() {
        let report = create_test_report();
        let options = ReportConfig {
            include_radar: true,
            ..ReportConfig::default()
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(markdown.contains("## Metadata Radar"));
        assert!(markdown.contains("| https://a.com | 90.00 | 10.00 |"));
        assert!(markdown.contains("## Domain Radar"));
    }

    #[test]
    fn test_table_cells_escape_pipes() {
        let mut report = create_test_report();
        report.summary.mismatched_urls[0].url = "https://a.com/?q=x|y".to_string();
        report.summary.industry_percentages.industries[1] = "Food | Drink".to_string();
        report.summary.top_nps.scores = vec![42.123];

        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("| https://a.com/?q=x\\|y | Tech | Retail |"));
        assert!(markdown.contains("| Food \\| Drink | 25.00% |"));
        assert!(markdown.contains("| 1 | https://a.com | 42.12 |"));
    }

    #[test]
    fn test_metadata_section() {
        let section = generate_metadata_section(&create_test_report().metadata);

        assert!(section.contains("results/"));
        assert!(section.contains("Files Failed:** 1"));
        assert!(section.contains("Failed Scrapes (excluded):** 3"));
        assert!(!section.contains("Unrecognized Entries"));
    }

    #[test]
    fn test_url_list_is_capped() {
        let urls: Vec<String> = (0..5).map(|i| format!("https://{i}.com")).collect();
        let list = url_list(&urls, 3);

        assert!(list.contains("https://2.com"));
        assert!(!list.contains("https://3.com"));
        assert!(list.contains("…and 2 more"));
    }

    #[test]
    fn test_empty_summary_renders() {
        let report = ReportDocument {
            metadata: create_test_report().metadata,
            summary: Summary::default(),
        };
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("No classification data."));
        assert!(markdown.contains("No complete review data."));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"industryPercentages\""));
        assert!(json.contains("\"topNPS\""));
    }
}
