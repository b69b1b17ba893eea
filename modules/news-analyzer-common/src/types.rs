use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Trust score given to articles submitted without one.
pub const DEFAULT_TRUST_SCORE: f64 = 85.0;

/// Attribution for the paragraph synthesized when a submission has none.
pub const DEFAULT_PARAGRAPH_SOURCE: &str = "Original Source";

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

// --- Key-presence aware fields ---

/// A payload field that distinguishes "key absent" from "key present".
///
/// Use with `#[serde(default)]`: an absent key deserializes to `Missing`,
/// an explicit `null` to `Null`, anything else to `Value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<T> Patch<T> {
    pub fn is_present(&self) -> bool {
        !matches!(self, Patch::Missing)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// For nullable columns: `Some(None)` clears, `Some(Some(v))` sets, `None` leaves alone.
    pub fn as_nullable(&self) -> Option<Option<&T>> {
        match self {
            Patch::Missing => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

// --- Submission payloads ---

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlternativeViewInput {
    pub content: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParagraphInput {
    pub content: String,
    pub source: Option<String>,
    pub order: i32,
    #[serde(default)]
    pub alternative_views: Vec<AlternativeViewInput>,
}

/// Body of `POST /api/news/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewsCreate {
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    /// Absent means the default score; `null` is rejected.
    #[serde(default)]
    pub trust_score: Patch<f64>,
    pub published_date: Option<DateTime<Utc>>,
    /// Absent means one paragraph is synthesized; `null` is rejected.
    #[serde(default)]
    pub paragraphs: Patch<Vec<ParagraphInput>>,
}

impl NewsCreate {
    /// Reject `null` on keys whose absence already carries a meaning.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if matches!(self.trust_score, Patch::Null) {
            return Err(ValidationError::NullField("trust_score"));
        }
        if matches!(self.paragraphs, Patch::Null) {
            return Err(ValidationError::NullField("paragraphs"));
        }
        Ok(())
    }

    pub fn trust_score_or_default(&self) -> f64 {
        self.trust_score
            .as_value()
            .copied()
            .unwrap_or(DEFAULT_TRUST_SCORE)
    }

    /// The paragraphs to persist. A submission without a `paragraphs` key gets
    /// a single paragraph mirroring its own content and source.
    pub fn paragraphs_or_synthesized(&self) -> Vec<ParagraphInput> {
        match &self.paragraphs {
            Patch::Value(paragraphs) => paragraphs.clone(),
            Patch::Missing | Patch::Null => vec![ParagraphInput {
                content: self.content.clone(),
                source: Some(
                    self.source
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PARAGRAPH_SOURCE.to_string()),
                ),
                order: 1,
                alternative_views: Vec::new(),
            }],
        }
    }
}

/// Body of `PATCH /api/news/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NewsUpdate {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    pub url: Patch<String>,
    #[serde(default)]
    pub source: Patch<String>,
    #[serde(default)]
    pub category: Patch<String>,
    #[serde(default)]
    pub author: Patch<String>,
    #[serde(default)]
    pub image_url: Patch<String>,
    #[serde(default)]
    pub trust_score: Patch<f64>,
    #[serde(default)]
    pub published_date: Patch<DateTime<Utc>>,
    /// Present (even empty) means replace every existing paragraph.
    #[serde(default)]
    pub paragraphs: Patch<Vec<ParagraphInput>>,
}

impl NewsUpdate {
    /// Reject `null` on columns that cannot hold it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let non_nullable = [
            ("title", matches!(self.title, Patch::Null)),
            ("content", matches!(self.content, Patch::Null)),
            ("trust_score", matches!(self.trust_score, Patch::Null)),
            ("published_date", matches!(self.published_date, Patch::Null)),
            ("paragraphs", matches!(self.paragraphs, Patch::Null)),
        ];
        match non_nullable.into_iter().find(|(_, is_null)| *is_null) {
            Some((field, _)) => Err(ValidationError::NullField(field)),
            None => Ok(()),
        }
    }

    pub fn has_scalar_changes(&self) -> bool {
        self.title.is_present()
            || self.content.is_present()
            || self.url.is_present()
            || self.source.is_present()
            || self.category.is_present()
            || self.author.is_present()
            || self.image_url.is_present()
            || self.trust_score.is_present()
            || self.published_date.is_present()
    }
}

// --- Listing ---

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsFilter {
    pub category: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Result<Self, ValidationError> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if skip < 0 {
            return Err(ValidationError::Negative("skip"));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ValidationError::OutOfRange {
                field: "limit",
                min: 1,
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(Self { skip, limit })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

// --- Analysis wire types ---

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleData {
    pub title: String,
    pub content: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub met: bool,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub trust_score: f64,
    pub confidence: f64,
    pub sentiment: Sentiment,
    pub criteria: Vec<Criterion>,
    pub analysis_id: String,
    pub article_url: String,
}

/// Body of `POST /analyses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// A stored word-count analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub title: String,
    pub rating: f64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}
