//! Data models for scrape results and summaries.
//!
//! Input shapes mirror the JSON produced by the scraping API (camelCase),
//! output shapes are the chart-ready `Summary` consumed by report renderers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Label used for results without a usable industry classification.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Availability classification of a scraped domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DomainStatus {
    Live,
    Parked,
    Error,
    Other(String),
}

impl Default for DomainStatus {
    fn default() -> Self {
        DomainStatus::Other(String::new())
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Live => write!(f, "live"),
            DomainStatus::Parked => write!(f, "parked"),
            DomainStatus::Error => write!(f, "error"),
            DomainStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for DomainStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "live" => DomainStatus::Live,
            "parked" => DomainStatus::Parked,
            "error" => DomainStatus::Error,
            _ => DomainStatus::Other(s.to_string()),
        }
    }
}

impl From<String> for DomainStatus {
    fn from(s: String) -> Self {
        DomainStatus::from(s.as_str())
    }
}

impl From<DomainStatus> for String {
    fn from(status: DomainStatus) -> Self {
        status.to_string()
    }
}

/// Error shape the scraping API returns in place of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub error_status: u16,
    pub error_code: String,
    pub error_message: String,
}

/// One entry of a scrape batch: either a result or a per-URL failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeOutcome {
    Failure(ErrorResponse),
    Success(Box<ScraperResult>),
}

/// robots.txt verdict for a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Robots {
    Report {
        #[serde(rename = "isUrlScrapable")]
        is_url_scrapable: bool,
    },
    Failed(ErrorResponse),
    Unrecognized(Value),
}

/// A single zero-shot label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryClassification {
    /// Ranked guesses derived from page metadata.
    #[serde(rename = "zeroShotMetaDataClassify", default, deserialize_with = "lenient_list")]
    pub metadata: Vec<Classification>,
    /// Ranked guesses derived from the domain name.
    #[serde(rename = "zeroShotDomainClassify", default, deserialize_with = "lenient_list")]
    pub domain: Vec<Classification>,
}

impl IndustryClassification {
    /// Rescale scores to [0, 1] according to `scale`.
    ///
    /// Under `ScoreScale::Auto` each array is judged on its own: any score
    /// above 1.0 marks the whole array as percent-scaled.
    pub fn normalize_scores(&mut self, scale: ScoreScale) {
        normalize_array(&mut self.metadata, scale);
        normalize_array(&mut self.domain, scale);
    }
}

fn normalize_array(entries: &mut [Classification], scale: ScoreScale) {
    let percent = match scale {
        ScoreScale::Unit => false,
        ScoreScale::Percent => true,
        ScoreScale::Auto => entries.iter().any(|c| c.score > 1.0),
    };

    if percent {
        for entry in entries.iter_mut() {
            entry.score /= 100.0;
        }
    }
}

/// Scale that incoming classification scores are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoreScale {
    /// Detect per result: scores above 1.0 mean percent.
    #[default]
    Auto,
    /// Scores are already in [0, 1].
    Unit,
    /// Scores are in [0, 100].
    Percent,
}

/// Emotion probabilities, each in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Emotions {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub anger: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub disgust: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fear: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub joy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub neutral: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sadness: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub surprise: Option<f64>,
}

impl Emotions {
    /// Column order used by the emotions chart.
    pub const NAMES: [&'static str; 7] = [
        "anger", "disgust", "fear", "joy", "neutral", "sadness", "surprise",
    ];

    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }

    fn values(&self) -> [Option<f64>; 7] {
        [
            self.anger,
            self.disgust,
            self.fear,
            self.joy,
            self.neutral,
            self.sadness,
            self.surprise,
        ]
    }

    /// Values in `NAMES` order, missing entries as 0.
    pub fn as_array(&self) -> [f64; 7] {
        self.values().map(|v| v.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(default, deserialize_with = "lenient_section")]
    pub emotions: Option<Emotions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRating {
    /// Star level; anything outside 1..=5 is ignored by the aggregator.
    #[serde(default, deserialize_with = "lenient_stars")]
    pub stars: u8,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub num_reviews: f64,
}

/// Third-party review data for a site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviews {
    #[serde(rename = "NPS", default, deserialize_with = "lenient_f64")]
    pub nps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub trust_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub star_ratings: Vec<StarRating>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub number_of_reviews: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recommendation_status: Option<String>,
}

impl Reviews {
    /// True when every ranked metric and the star distribution are present.
    pub fn is_complete(&self) -> bool {
        self.nps.is_some()
            && self.trust_index.is_some()
            && self.rating.is_some()
            && !self.star_ratings.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacebookCounts {
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub share_count: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub comment_count: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub reaction_count: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareCountData {
    #[serde(rename = "Facebook", default, deserialize_with = "lenient_section")]
    pub facebook: Option<FacebookCounts>,
    #[serde(rename = "Pinterest", default, deserialize_with = "lenient_f64")]
    pub pinterest: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub positive: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub neutral: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub negative: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default, deserialize_with = "lenient_string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string_or_empty")]
    pub link: String,
    #[serde(default, deserialize_with = "lenient_string_or_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient_string_or_empty")]
    pub pub_date: String,
    #[serde(default, deserialize_with = "lenient_section_or_default")]
    pub sentiment_scores: SentimentScores,
}

/// Everything the scraper found for one URL.
///
/// Only `url` is required. A malformed optional section (wrong type, or an
/// error object in place of data) is read as absent, so the result still
/// counts everywhere except the sub-aggregate that needs that section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperResult {
    pub url: String,
    #[serde(default, deserialize_with = "lenient_domain_status")]
    pub domain_status: DomainStatus,
    #[serde(default)]
    pub robots: Option<Robots>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub industry_classification: Option<IndustryClassification>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub reviews: Option<Reviews>,
    #[serde(rename = "shareCountdata", default, deserialize_with = "lenient_section")]
    pub share_count_data: Option<ShareCountData>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub scrape_news: Option<Vec<NewsItem>>,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub time: f64,
}

#[cfg(test)]
impl ScraperResult {
    /// Creates a bare result for `url` with every optional section absent.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl ScraperResult {
    pub fn is_scrapable(&self) -> bool {
        matches!(
            self.robots,
            Some(Robots::Report {
                is_url_scrapable: true
            })
        )
    }

    /// Highest-ranked metadata classification, if any.
    pub fn top_metadata(&self) -> Option<&Classification> {
        self.industry_classification
            .as_ref()
            .and_then(|ic| ic.metadata.first())
    }

    /// Highest-ranked domain classification, if any.
    pub fn top_domain(&self) -> Option<&Classification> {
        self.industry_classification
            .as_ref()
            .and_then(|ic| ic.domain.first())
    }

    /// Emotions, only when at least one value is present.
    pub fn emotions(&self) -> Option<&Emotions> {
        self.sentiment
            .as_ref()
            .and_then(|s| s.emotions.as_ref())
            .filter(|e| !e.is_empty())
    }

    /// Reviews, only when complete enough to rank.
    pub fn complete_reviews(&self) -> Option<&Reviews> {
        self.reviews.as_ref().filter(|r| r.is_complete())
    }

    /// News items, only when there is at least one.
    pub fn news(&self) -> Option<&[NewsItem]> {
        self.scrape_news
            .as_deref()
            .filter(|items| !items.is_empty())
    }

    pub fn normalize_scores(&mut self, scale: ScoreScale) {
        if let Some(ic) = self.industry_classification.as_mut() {
            ic.normalize_scores(scale);
        }
    }
}

fn number_from_value(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Accepts numbers and numeric strings; anything else (e.g. "N/A") is `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(value).filter(|n| n.is_finite()))
}

fn lenient_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or(0.0))
}

fn lenient_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Star levels may arrive as numbers or numeric strings; non-integral or
/// out-of-range values become 0.
fn lenient_stars<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(n))
        .map(|n| n as u8)
        .unwrap_or(0))
}

/// `null` or a non-string status reads as the unrecognized empty status.
fn lenient_domain_status<'de, D>(deserializer: D) -> Result<DomainStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => DomainStatus::from(s),
        _ => DomainStatus::default(),
    })
}

/// Parses an optional section, reading `null` or a malformed value as `None`.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(section) => Ok(Some(section)),
        Err(e) => {
            debug!("Ignoring malformed section: {}", e);
            Ok(None)
        }
    }
}

fn lenient_section_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_section(deserializer)?.unwrap_or_default())
}

/// Lists keep their well-formed entries; a non-array reads as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(entries) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Dropping malformed list entry: {}", e);
                None
            }
        })
        .collect())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Share of results per top metadata label, as parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryPercentages {
    pub industries: Vec<String>,
    pub percentages: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakClassification {
    pub url: String,
    pub metadata_class: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchedUrl {
    pub url: String,
    pub metadata_class: String,
    pub domain_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarSeries {
    pub name: String,
    pub data: Vec<f64>,
}

/// Per-URL score vectors over a shared category axis.
///
/// Values are `score * 100` rounded to 2 decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    pub categories: Vec<String>,
    pub series: Vec<RadarSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSeries {
    pub name: String,
    /// Integer percentages in `Emotions::NAMES` order.
    pub data: [i64; 7],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionsArea {
    pub series: Vec<EmotionSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub urls: Vec<String>,
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMetrics {
    pub urls: Vec<String>,
    pub share_counts: Vec<f64>,
    pub comment_counts: Vec<f64>,
    pub reaction_counts: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSentiment {
    pub urls: Vec<String>,
    pub positive: Vec<i64>,
    pub neutral: Vec<i64>,
    pub negative: Vec<i64>,
}

/// Aggregate view over a batch of scrape results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_urls: usize,
    /// `[live, parked]`.
    pub domain_status: [usize; 2],
    pub domain_error_status: usize,
    pub parked_urls: Vec<String>,
    pub scrapable_urls: usize,
    pub industry_percentages: IndustryPercentages,
    pub unclassified_urls: Vec<String>,
    pub weak_classification: Vec<WeakClassification>,
    pub percentage_match: f64,
    pub mismatched_urls: Vec<MismatchedUrl>,
    pub meta_radar: RadarChart,
    pub domain_radar: RadarChart,
    pub emotions_area: EmotionsArea,
    #[serde(rename = "topNPS")]
    pub top_nps: Ranking,
    pub top_trust_index: Ranking,
    pub top_rating: Ranking,
    /// Index 0 is the 1-star level.
    pub average_star_rating: [f64; 5],
    pub social_metrics: SocialMetrics,
    pub news_sentiment: NewsSentiment,
    pub avg_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_status_from_str() {
        assert_eq!(DomainStatus::from("live"), DomainStatus::Live);
        assert_eq!(DomainStatus::from("PARKED"), DomainStatus::Parked);
        assert_eq!(DomainStatus::from("error"), DomainStatus::Error);
        assert_eq!(
            DomainStatus::from("redirect"),
            DomainStatus::Other("redirect".to_string())
        );
    }

    #[test]
    fn test_deserialize_full_result() {
        let value = json!({
            "url": "https://example.com",
            "domainStatus": "live",
            "robots": { "isUrlScrapable": true },
            "industryClassification": {
                "zeroShotMetaDataClassify": [{ "label": "Tech", "score": 0.9 }],
                "zeroShotDomainClassify": [{ "label": "Tech", "score": 0.7 }]
            },
            "sentiment": { "emotions": { "joy": 0.8, "neutral": 0.2 } },
            "reviews": {
                "NPS": 42,
                "trustIndex": "4.1",
                "rating": 4.5,
                "starRatings": [{ "stars": 5, "numReviews": 10 }],
                "numberOfReviews": 10,
                "recommendationStatus": "recommended"
            },
            "shareCountdata": {
                "Facebook": { "share_count": 1, "comment_count": 2, "reaction_count": 3 },
                "Pinterest": 4
            },
            "scrapeNews": [{
                "title": "Headline",
                "link": "https://news.example.com/a",
                "source": "Example News",
                "pubDate": "2024-05-01",
                "sentimentScores": { "positive": 0.5, "neutral": 0.3, "negative": 0.2 }
            }],
            "time": 3.5,
            "unknownField": "ignored"
        });

        let result: ScraperResult = serde_json::from_value(value).unwrap();
        assert_eq!(result.domain_status, DomainStatus::Live);
        assert!(result.is_scrapable());
        assert_eq!(result.top_metadata().map(|c| c.label.as_str()), Some("Tech"));
        assert_eq!(result.emotions().and_then(|e| e.joy), Some(0.8));

        let reviews = result.complete_reviews().unwrap();
        assert_eq!(reviews.nps, Some(42.0));
        assert_eq!(reviews.trust_index, Some(4.1));

        let share = result.share_count_data.as_ref().unwrap();
        assert_eq!(share.facebook.as_ref().map(|f| f.reaction_count), Some(3.0));
        assert_eq!(share.pinterest, Some(4.0));
        assert_eq!(result.news().map(|n| n.len()), Some(1));
        assert_eq!(result.time, 3.5);
    }

    #[test]
    fn test_robots_error_shape_is_not_scrapable() {
        let value = json!({
            "url": "https://blocked.example",
            "robots": {
                "errorStatus": 500,
                "errorCode": "500 Internal Error",
                "errorMessage": "failed to fetch robots.txt"
            }
        });

        let result: ScraperResult = serde_json::from_value(value).unwrap();
        assert!(matches!(result.robots, Some(Robots::Failed(_))));
        assert!(!result.is_scrapable());
        assert!(!ScraperResult::new("https://none.example").is_scrapable());
    }

    #[test]
    fn test_outcome_distinguishes_failures() {
        let failure: ScrapeOutcome = serde_json::from_value(json!({
            "url": "https://down.example",
            "errorStatus": 404,
            "errorCode": "404 Not Found",
            "errorMessage": "page not found"
        }))
        .unwrap();
        assert!(matches!(failure, ScrapeOutcome::Failure(_)));

        let success: ScrapeOutcome =
            serde_json::from_value(json!({ "url": "https://up.example", "domainStatus": "live" }))
                .unwrap();
        assert!(matches!(success, ScrapeOutcome::Success(_)));
    }

    #[test]
    fn test_lenient_review_numbers() {
        let reviews: Reviews = serde_json::from_value(json!({
            "NPS": "N/A",
            "trustIndex": 3.2,
            "rating": null,
            "starRatings": []
        }))
        .unwrap();

        assert_eq!(reviews.nps, None);
        assert_eq!(reviews.trust_index, Some(3.2));
        assert!(!reviews.is_complete());
    }

    #[test]
    fn test_malformed_sections_read_as_absent() {
        let error_object = json!({
            "errorStatus": 500,
            "errorCode": "500 Internal Server Error",
            "errorMessage": "news lookup failed"
        });
        let result: ScraperResult = serde_json::from_value(json!({
            "url": "https://partial.example",
            "domainStatus": null,
            "robots": { "isUrlScrapable": true },
            "industryClassification": {
                "zeroShotMetaDataClassify": [{ "label": "Tech", "score": "0.8" }],
                "zeroShotDomainClassify": { "oops": true }
            },
            "sentiment": "unavailable",
            "reviews": {
                "NPS": 10,
                "trustIndex": 4,
                "rating": 4.5,
                "starRatings": [{ "stars": "5", "numReviews": "12" }, "bad", { "stars": 2.5 }]
            },
            "shareCountdata": [1, 2, 3],
            "scrapeNews": error_object,
            "time": "2.5"
        }))
        .unwrap();

        assert_eq!(result.domain_status, DomainStatus::default());
        assert!(result.is_scrapable());
        assert_eq!(result.top_metadata().map(|c| c.score), Some(0.8));
        assert!(result.top_domain().is_none());
        assert!(result.sentiment.is_none());
        assert!(result.share_count_data.is_none());
        assert!(result.scrape_news.is_none());
        assert_eq!(result.time, 2.5);

        let reviews = result.complete_reviews().unwrap();
        assert_eq!(reviews.star_ratings.len(), 2);
        assert_eq!(reviews.star_ratings[0].stars, 5);
        assert_eq!(reviews.star_ratings[0].num_reviews, 12.0);
        assert_eq!(reviews.star_ratings[1].stars, 0);
    }

    #[test]
    fn test_null_classification_score_is_zero() {
        let ic: IndustryClassification = serde_json::from_value(json!({
            "zeroShotDomainClassify": [{ "label": "Retail", "score": null }]
        }))
        .unwrap();
        assert!(ic.metadata.is_empty());
        assert_eq!(ic.domain[0].label, "Retail");
        assert_eq!(ic.domain[0].score, 0.0);
    }

    #[test]
    fn test_unrecognized_robots_is_not_scrapable() {
        let result: ScraperResult = serde_json::from_value(json!({
            "url": "https://odd.example",
            "robots": "allowed"
        }))
        .unwrap();
        assert!(matches!(result.robots, Some(Robots::Unrecognized(_))));
        assert!(!result.is_scrapable());
    }

    #[test]
    fn test_empty_emotions_are_no_data() {
        let result: ScraperResult = serde_json::from_value(json!({
            "url": "https://quiet.example",
            "sentiment": { "emotions": {} }
        }))
        .unwrap();
        assert!(result.emotions().is_none());
    }

    #[test]
    fn test_normalize_scores() {
        let mut ic = IndustryClassification {
            metadata: vec![Classification {
                label: "Tech".to_string(),
                score: 85.0,
            }],
            domain: vec![Classification {
                label: "Tech".to_string(),
                score: 0.85,
            }],
        };

        ic.normalize_scores(ScoreScale::Auto);
        assert!((ic.metadata[0].score - 0.85).abs() < 1e-9);
        assert!((ic.domain[0].score - 0.85).abs() < 1e-9);

        ic.normalize_scores(ScoreScale::Unit);
        assert!((ic.metadata[0].score - 0.85).abs() < 1e-9);

        ic.normalize_scores(ScoreScale::Percent);
        assert!((ic.metadata[0].score - 0.0085).abs() < 1e-9);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_string(&Summary::default()).unwrap();
        assert!(json.contains("\"domainErrorStatus\""));
        assert!(json.contains("\"topNPS\""));
        assert!(json.contains("\"topTrustIndex\""));
        assert!(json.contains("\"averageStarRating\""));
    }
}
