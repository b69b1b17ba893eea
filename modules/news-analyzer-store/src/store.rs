// Postgres persistence for articles, paragraphs and alternative views.

use std::collections::HashMap;

use news_analyzer_common::{NewsCreate, NewsFilter, NewsUpdate, Pagination, ParagraphInput, Patch};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::models::{AlternativeView, News, NewsDetail, Paragraph, ParagraphDetail};

#[derive(Clone)]
pub struct NewsStore {
    pool: PgPool,
}

impl NewsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Newest first. An empty page is not an error.
    pub async fn list(&self, filter: &NewsFilter, page: Pagination) -> Result<Vec<NewsDetail>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM news WHERE TRUE");
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(source) = &filter.source {
            qb.push(" AND source = ").push_bind(source.clone());
        }
        qb.push(" ORDER BY published_date DESC, id DESC OFFSET ")
            .push_bind(page.skip)
            .push(" LIMIT ")
            .push_bind(page.limit);

        let mut conn = self.pool.acquire().await?;
        let rows = qb.build_query_as::<News>().fetch_all(&mut *conn).await?;
        attach_children(&mut *conn, rows).await
    }

    pub async fn get(&self, id: i64) -> Result<NewsDetail> {
        let mut conn = self.pool.acquire().await?;
        fetch_detail(&mut *conn, id).await
    }

    /// Insert the article and every nested paragraph and alternative view in one
    /// transaction. Nothing is visible unless all of it lands.
    pub async fn create(&self, payload: &NewsCreate) -> Result<NewsDetail> {
        payload.validate()?;
        let paragraphs = payload.paragraphs_or_synthesized();
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO news
                (title, content, url, source, category, author, image_url,
                 trust_score, published_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, now()))
            RETURNING id
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.content)
        .bind(&payload.url)
        .bind(&payload.source)
        .bind(&payload.category)
        .bind(&payload.author)
        .bind(&payload.image_url)
        .bind(payload.trust_score_or_default())
        .bind(payload.published_date)
        .fetch_one(&mut *tx)
        .await?;

        insert_paragraphs(&mut *tx, id, &paragraphs).await?;
        let detail = fetch_detail(&mut *tx, id).await?;
        tx.commit().await?;

        info!(news_id = id, paragraphs = paragraphs.len(), "Created news article");
        Ok(detail)
    }

    /// Apply the fields present in `patch`. A present `paragraphs` key replaces
    /// every existing paragraph, cascading to their alternative views.
    pub async fn update(&self, id: i64, patch: &NewsUpdate) -> Result<NewsDetail> {
        patch.validate()?;
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM news WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(StoreError::NotFound(id));
        }

        if patch.has_scalar_changes() {
            build_update(id, patch).build().execute(&mut *tx).await?;
        }

        if let Patch::Value(paragraphs) = &patch.paragraphs {
            let removed = sqlx::query("DELETE FROM paragraphs WHERE news_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            insert_paragraphs(&mut *tx, id, paragraphs).await?;
            debug!(news_id = id, removed, inserted = paragraphs.len(), "Replaced paragraphs");
        }

        let detail = fetch_detail(&mut *tx, id).await?;
        tx.commit().await?;

        info!(news_id = id, "Updated news article");
        Ok(detail)
    }

    /// Remove the article; paragraphs and alternative views go with it.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!(news_id = id, "Deleted news article");
        Ok(())
    }
}

fn build_update(id: i64, patch: &NewsUpdate) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE news SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(title) = patch.title.as_value() {
            set.push("title = ").push_bind_unseparated(title.clone());
        }
        if let Some(content) = patch.content.as_value() {
            set.push("content = ").push_bind_unseparated(content.clone());
        }
        if let Some(trust_score) = patch.trust_score.as_value() {
            set.push("trust_score = ").push_bind_unseparated(*trust_score);
        }
        if let Some(published_date) = patch.published_date.as_value() {
            set.push("published_date = ").push_bind_unseparated(*published_date);
        }
        let nullable = [
            ("url", &patch.url),
            ("source", &patch.source),
            ("category", &patch.category),
            ("author", &patch.author),
            ("image_url", &patch.image_url),
        ];
        for (column, field) in nullable {
            if let Some(value) = field.as_nullable() {
                set.push(format!("{column} = "))
                    .push_bind_unseparated(value.cloned());
            }
        }
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb
}

async fn insert_paragraphs(
    conn: &mut PgConnection,
    news_id: i64,
    paragraphs: &[ParagraphInput],
) -> Result<()> {
    for paragraph in paragraphs {
        let paragraph_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO paragraphs (news_id, content, source, sort_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(news_id)
        .bind(&paragraph.content)
        .bind(&paragraph.source)
        .bind(paragraph.order)
        .fetch_one(&mut *conn)
        .await?;

        for view in &paragraph.alternative_views {
            sqlx::query(
                "INSERT INTO alternative_views (paragraph_id, content, source) VALUES ($1, $2, $3)",
            )
            .bind(paragraph_id)
            .bind(&view.content)
            .bind(&view.source)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

async fn fetch_detail(conn: &mut PgConnection, id: i64) -> Result<NewsDetail> {
    let news = sqlx::query_as::<_, News>("SELECT * FROM news WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::NotFound(id))?;

    attach_children(conn, vec![news])
        .await?
        .pop()
        .ok_or(StoreError::NotFound(id))
}

/// Two batched queries regardless of how many articles are in `news`.
async fn attach_children(conn: &mut PgConnection, news: Vec<News>) -> Result<Vec<NewsDetail>> {
    if news.is_empty() {
        return Ok(Vec::new());
    }

    let news_ids: Vec<i64> = news.iter().map(|n| n.id).collect();
    let paragraphs = sqlx::query_as::<_, Paragraph>(
        "SELECT * FROM paragraphs WHERE news_id = ANY($1) ORDER BY sort_order, id",
    )
    .bind(&news_ids)
    .fetch_all(&mut *conn)
    .await?;

    let paragraph_ids: Vec<i64> = paragraphs.iter().map(|p| p.id).collect();
    let views = if paragraph_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as::<_, AlternativeView>(
            "SELECT * FROM alternative_views WHERE paragraph_id = ANY($1) ORDER BY id",
        )
        .bind(&paragraph_ids)
        .fetch_all(&mut *conn)
        .await?
    };

    let mut views_by_paragraph: HashMap<i64, Vec<AlternativeView>> = HashMap::new();
    for view in views {
        views_by_paragraph
            .entry(view.paragraph_id)
            .or_default()
            .push(view);
    }

    let mut paragraphs_by_news: HashMap<i64, Vec<ParagraphDetail>> = HashMap::new();
    for paragraph in paragraphs {
        let alternative_views = views_by_paragraph.remove(&paragraph.id).unwrap_or_default();
        paragraphs_by_news
            .entry(paragraph.news_id)
            .or_default()
            .push(ParagraphDetail {
                paragraph,
                alternative_views,
            });
    }

    Ok(news
        .into_iter()
        .map(|news| {
            let paragraphs = paragraphs_by_news.remove(&news.id).unwrap_or_default();
            NewsDetail { news, paragraphs }
        })
        .collect())
}
