use news_analyzer_common::{
    AnalysisRecord, AnalysisRequest, AnalysisResult, ArticleData, Criterion, ScoringRule,
    Sentiment, DEFAULT_TRUST_SCORE,
};
use uuid::Uuid;

pub const PLACEHOLDER_CONFIDENCE: f64 = 0.92;
pub const PLACEHOLDER_SENTIMENT: f64 = 0.75;

const SENTIMENT_NEUTRAL_BAND: f64 = 0.1;
const UNKNOWN_URL: &str = "unknown";

/// Stand-in analysis. Produces deterministic scores so clients can be built
/// against a stable response shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    rule: ScoringRule,
}

impl Analyzer {
    pub fn new(rule: ScoringRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> ScoringRule {
        self.rule
    }

    pub fn analyze(&self, article: &ArticleData) -> AnalysisResult {
        let trust = match self.rule {
            ScoringRule::Placeholder => DEFAULT_TRUST_SCORE,
            ScoringRule::WordCount => word_count_rating(&article.content),
        };
        let confidence = PLACEHOLDER_CONFIDENCE;
        let sentiment = PLACEHOLDER_SENTIMENT;

        AnalysisResult {
            trust_score: trust,
            confidence,
            sentiment: Sentiment {
                score: sentiment,
                label: sentiment_label(sentiment).to_string(),
            },
            criteria: criteria(trust, confidence, sentiment),
            analysis_id: Uuid::new_v4().to_string(),
            article_url: article
                .url
                .clone()
                .unwrap_or_else(|| UNKNOWN_URL.to_string()),
        }
    }

    /// Rating used by the `/analyses` collection. Always word-count based.
    pub fn rate(&self, request: &AnalysisRequest) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4().to_string(),
            title: request.title.clone(),
            rating: word_count_rating(&request.content),
            summary: format!("Analyzed content from {}", request.url),
        }
    }
}

/// `min(100, words / 10)`, words split on whitespace.
pub fn word_count_rating(content: &str) -> f64 {
    let words = content.split_whitespace().count() as f64;
    (words / 10.0).min(100.0)
}

pub fn sentiment_label(score: f64) -> &'static str {
    if score > SENTIMENT_NEUTRAL_BAND {
        "positive"
    } else if score < -SENTIMENT_NEUTRAL_BAND {
        "negative"
    } else {
        "neutral"
    }
}

fn criteria(trust: f64, confidence: f64, sentiment: f64) -> Vec<Criterion> {
    let criterion = |name: &str, met: bool, score: f64| Criterion {
        name: name.to_string(),
        met,
        score,
    };

    vec![
        criterion("Content Trust Level", trust >= 70.0, trust),
        criterion("Accuracy and Fairness", trust >= 75.0, trust * 0.95),
        criterion("Independence", confidence >= 0.68, confidence * 100.0),
        criterion(
            "Impartiality",
            sentiment.abs() <= 0.3,
            (1.0 - sentiment.abs()) * 100.0,
        ),
        criterion(
            "Accountability",
            trust >= 80.0 && confidence >= 0.85,
            (trust + confidence * 100.0) / 2.0,
        ),
    ]
}
