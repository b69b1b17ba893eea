use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row from the `news` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub trust_score: f64,
    pub published_date: DateTime<Utc>,
}

/// A row from the `paragraphs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Paragraph {
    pub id: i64,
    pub content: String,
    pub source: Option<String>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub news_id: i64,
}

/// A row from the `alternative_views` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AlternativeView {
    pub id: i64,
    pub content: String,
    pub source: Option<String>,
    pub paragraph_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphDetail {
    #[serde(flatten)]
    pub paragraph: Paragraph,
    pub alternative_views: Vec<AlternativeView>,
}

/// An article with its paragraphs (by `order`, then `id`) and their alternative views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDetail {
    #[serde(flatten)]
    pub news: News,
    pub paragraphs: Vec<ParagraphDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_serializes_flat_with_nested_children() {
        let published = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let detail = NewsDetail {
            news: News {
                id: 7,
                title: "T".into(),
                content: "C".into(),
                url: Some("https://example.com".into()),
                source: Some("Wire".into()),
                category: None,
                author: None,
                image_url: None,
                trust_score: 85.0,
                published_date: published,
            },
            paragraphs: vec![ParagraphDetail {
                paragraph: Paragraph {
                    id: 1,
                    content: "P".into(),
                    source: None,
                    order: 1,
                    news_id: 7,
                },
                alternative_views: vec![AlternativeView {
                    id: 3,
                    content: "A".into(),
                    source: Some("Other".into()),
                    paragraph_id: 1,
                }],
            }],
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["trust_score"], 85.0);
        assert_eq!(value["paragraphs"][0]["order"], 1);
        assert_eq!(
            value["paragraphs"][0]["alternative_views"][0],
            json!({"id": 3, "content": "A", "source": "Other", "paragraph_id": 1})
        );
    }
}
