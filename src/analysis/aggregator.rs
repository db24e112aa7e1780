//! Summary aggregation over a batch of scrape results.
//!
//! Every sub-aggregate is an independent scan over the input in index order,
//! so output arrays follow input order and ties in rankings keep it too.
//! Missing optional sections only exclude a result from the sub-aggregate
//! that needs them.

use crate::models::{
    Classification, DomainStatus, EmotionSeries, EmotionsArea, IndustryPercentages,
    MismatchedUrl, NewsSentiment, RadarChart, RadarSeries, Ranking, Reviews, ScraperResult,
    SocialMetrics, Summary, WeakClassification, UNKNOWN_LABEL,
};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Tunables for `generate_summary`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryOptions {
    /// Top metadata scores below this (on the [0, 1] scale) are weak.
    pub weak_threshold: f64,
    /// Length of the NPS / trust index / rating rankings.
    pub top_n: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            weak_threshold: 0.5,
            top_n: 3,
        }
    }
}

#[cfg(test)]
impl Summary {
    /// Summarize `results` with default options.
    pub fn from_results(results: &[ScraperResult]) -> Self {
        generate_summary(results, &SummaryOptions::default())
    }
}

/// Build the summary for a batch. Empty input yields `Summary::default()`.
pub fn generate_summary(results: &[ScraperResult], options: &SummaryOptions) -> Summary {
    if results.is_empty() {
        warn!("No scrape results to summarize, returning an empty summary");
        return Summary::default();
    }

    let num_results = results.len() as f64;
    debug!("Summarizing {} scrape results", results.len());

    let (domain_status, domain_error_status, parked_urls) = tally_domain_status(results);
    let (industry_percentages, unclassified_urls) = industry_percentages(results);
    let (num_matched, mismatched_urls) = match_classifications(results);
    let reviewed: Vec<(&ScraperResult, &Reviews)> = results
        .iter()
        .filter_map(|r| r.complete_reviews().map(|reviews| (r, reviews)))
        .collect();

    let total_time: f64 = results.iter().map(|r| r.time).sum();

    Summary {
        total_urls: results.len(),
        domain_status,
        domain_error_status,
        parked_urls,
        scrapable_urls: results.iter().filter(|r| r.is_scrapable()).count(),
        industry_percentages,
        unclassified_urls,
        weak_classification: weak_classifications(results, options.weak_threshold),
        percentage_match: round2(num_matched as f64 / num_results * 100.0),
        mismatched_urls,
        meta_radar: radar_chart(results, metadata_labels),
        domain_radar: radar_chart(results, domain_labels),
        emotions_area: emotions_area(results),
        top_nps: top_ranking(&reviewed, options.top_n, |r| r.nps),
        top_trust_index: top_ranking(&reviewed, options.top_n, |r| r.trust_index),
        top_rating: top_ranking(&reviewed, options.top_n, |r| r.rating),
        average_star_rating: average_star_rating(&reviewed),
        social_metrics: social_metrics(results),
        news_sentiment: news_sentiment(results),
        avg_time: round2(total_time / num_results),
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a [0, 1] fraction into a whole-number percentage.
fn whole_percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Returns `([live, parked], errors, parked_urls)`.
///
/// A result is counted as an error once for a non-live, non-parked status
/// and once more if robots.txt does not allow scraping.
fn tally_domain_status(results: &[ScraperResult]) -> ([usize; 2], usize, Vec<String>) {
    let mut live = 0;
    let mut parked = 0;
    let mut errors = 0;
    let mut parked_urls = Vec::new();

    for result in results {
        match result.domain_status {
            DomainStatus::Live => live += 1,
            DomainStatus::Parked => {
                parked += 1;
                parked_urls.push(result.url.clone());
            }
            _ => errors += 1,
        }

        if !result.is_scrapable() {
            errors += 1;
        }
    }

    ([live, parked], errors, parked_urls)
}

fn top_metadata_label(result: &ScraperResult) -> Option<&str> {
    result
        .top_metadata()
        .map(|c| c.label.as_str())
        .filter(|label| *label != UNKNOWN_LABEL)
}

fn industry_percentages(results: &[ScraperResult]) -> (IndustryPercentages, Vec<String>) {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut unclassified_urls = Vec::new();

    for result in results {
        let label = match top_metadata_label(result) {
            Some(label) => label,
            None => {
                unclassified_urls.push(result.url.clone());
                UNKNOWN_LABEL
            }
        };

        match counts.iter().position(|(l, _)| l == label) {
            Some(idx) => counts[idx].1 += 1,
            None => counts.push((label.to_string(), 1)),
        }
    }

    let total = results.len() as f64;
    let (industries, percentages) = counts
        .into_iter()
        .map(|(label, count)| (label, round2(count as f64 / total * 100.0)))
        .unzip();

    (
        IndustryPercentages {
            industries,
            percentages,
        },
        unclassified_urls,
    )
}

fn weak_classifications(results: &[ScraperResult], threshold: f64) -> Vec<WeakClassification> {
    results
        .iter()
        .filter_map(|result| {
            let top = result.top_metadata()?;
            (top.score < threshold).then(|| WeakClassification {
                url: result.url.clone(),
                metadata_class: top.label.clone(),
                score: top.score,
            })
        })
        .collect()
}

/// Returns the number of matching results and the list of mismatches.
fn match_classifications(results: &[ScraperResult]) -> (usize, Vec<MismatchedUrl>) {
    let mut matched = 0;
    let mut mismatched = Vec::new();

    for result in results {
        let meta = result.top_metadata().map(|c| c.label.as_str());
        let domain = result.top_domain().map(|c| c.label.as_str());

        match (meta, domain) {
            (Some(m), Some(d)) if m == d => matched += 1,
            _ => mismatched.push(MismatchedUrl {
                url: result.url.clone(),
                metadata_class: meta.unwrap_or(UNKNOWN_LABEL).to_string(),
                domain_class: domain.unwrap_or(UNKNOWN_LABEL).to_string(),
            }),
        }
    }

    (matched, mismatched)
}

fn metadata_labels(result: &ScraperResult) -> &[Classification] {
    result
        .industry_classification
        .as_ref()
        .map(|ic| ic.metadata.as_slice())
        .unwrap_or_default()
}

fn domain_labels(result: &ScraperResult) -> &[Classification] {
    result
        .industry_classification
        .as_ref()
        .map(|ic| ic.domain.as_slice())
        .unwrap_or_default()
}

/// Build a radar chart from the classification array `select` picks out.
fn radar_chart<F>(results: &[ScraperResult], select: F) -> RadarChart
where
    F: for<'a> Fn(&'a ScraperResult) -> &'a [Classification],
{
    let mut categories: Vec<String> = Vec::new();
    for result in results {
        for entry in select(result) {
            if !categories.contains(&entry.label) {
                categories.push(entry.label.clone());
            }
        }
    }

    let series = results
        .iter()
        .map(|result| {
            let mut data = vec![0.0; categories.len()];
            for entry in select(result) {
                if let Some(idx) = categories.iter().position(|c| *c == entry.label) {
                    data[idx] = round2(entry.score * 100.0);
                }
            }
            RadarSeries {
                name: result.url.clone(),
                data,
            }
        })
        .collect();

    RadarChart { categories, series }
}

fn emotions_area(results: &[ScraperResult]) -> EmotionsArea {
    let series = results
        .iter()
        .filter_map(|result| {
            let emotions = result.emotions()?;
            Some(EmotionSeries {
                name: result.url.clone(),
                data: emotions.as_array().map(whole_percent),
            })
        })
        .collect();

    EmotionsArea { series }
}

/// Highest `n` scores for one review metric, descending.
fn top_ranking<F>(reviewed: &[(&ScraperResult, &Reviews)], n: usize, metric: F) -> Ranking
where
    F: Fn(&Reviews) -> Option<f64>,
{
    let mut scored: Vec<(&str, f64)> = reviewed
        .iter()
        .filter_map(|(result, reviews)| metric(reviews).map(|score| (result.url.as_str(), score)))
        .collect();

    // sort_by is stable, ties keep input order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(n);

    let (urls, scores) = scored
        .into_iter()
        .map(|(url, score)| (url.to_string(), score))
        .unzip();

    Ranking { urls, scores }
}

/// Mean review count per star level over the results that report it.
fn average_star_rating(reviewed: &[(&ScraperResult, &Reviews)]) -> [f64; 5] {
    let mut sums = [0.0; 5];
    let mut contributors = [0usize; 5];

    for (_, reviews) in reviewed {
        for rating in &reviews.star_ratings {
            if (1..=5).contains(&rating.stars) {
                let slot = usize::from(rating.stars - 1);
                sums[slot] += rating.num_reviews;
                contributors[slot] += 1;
            }
        }
    }

    let mut averages = [0.0; 5];
    for slot in 0..5 {
        if contributors[slot] > 0 {
            averages[slot] = round2(sums[slot] / contributors[slot] as f64);
        }
    }
    averages
}

fn social_metrics(results: &[ScraperResult]) -> SocialMetrics {
    let mut metrics = SocialMetrics::default();

    for result in results {
        let Some(facebook) = result
            .share_count_data
            .as_ref()
            .and_then(|s| s.facebook.as_ref())
        else {
            continue;
        };

        metrics.urls.push(result.url.clone());
        metrics.share_counts.push(facebook.share_count);
        metrics.comment_counts.push(facebook.comment_count);
        metrics.reaction_counts.push(facebook.reaction_count);
    }

    metrics
}

fn news_sentiment(results: &[ScraperResult]) -> NewsSentiment {
    let mut sentiment = NewsSentiment::default();

    for result in results {
        let Some(news) = result.news() else {
            continue;
        };

        let count = news.len() as f64;
        let (positive, neutral, negative) =
            news.iter().fold((0.0, 0.0, 0.0), |(p, n, g), item| {
                let s = &item.sentiment_scores;
                (p + s.positive, n + s.neutral, g + s.negative)
            });

        sentiment.urls.push(result.url.clone());
        sentiment.positive.push(whole_percent(positive / count));
        sentiment.neutral.push(whole_percent(neutral / count));
        sentiment.negative.push(whole_percent(negative / count));
    }

    sentiment
}
