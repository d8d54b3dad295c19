//! PostgreSQL implementation of CatalogRepository
//!
//! Embeddings live in a pgvector `vector` column; nearest-neighbor
//! ordering and threshold filtering are delegated to pgvector operators.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;

use marquee::{
    CatalogItem, CatalogRepository, CatalogStats, DistanceMetric, DomainError, ItemMutation,
    ScoredItem, VectorQuery, WriteBatch,
};

/// PostgreSQL implementation of CatalogRepository
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct CatalogItemRow {
    id: String,
    title: String,
    genres: Vec<String>,
    summary: String,
    cast_members: Vec<String>,
    embedding: Option<Vector>,
    embedded: bool,
}

impl From<CatalogItemRow> for CatalogItem {
    fn from(row: CatalogItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            genres: row.genres,
            summary: row.summary,
            cast: row.cast_members,
            embedding: row.embedding.map(|v| v.to_vec()),
            embedded: row.embedded,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ScoredRow {
    id: String,
    title: String,
    genres: Vec<String>,
    summary: String,
    cast_members: Vec<String>,
    vector_distance: f64,
}

impl From<ScoredRow> for ScoredItem {
    fn from(row: ScoredRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            genres: row.genres,
            summary: row.summary,
            cast: row.cast_members,
            vector_distance: row.vector_distance as f32,
        }
    }
}

const ITEM_COLUMNS: &str = "id, title, genres, summary, cast_members, embedding, embedded";

/// (score expression, ranking expression, threshold comparison) per metric
fn metric_sql(metric: DistanceMetric) -> (&'static str, &'static str, &'static str) {
    match metric {
        DistanceMetric::Euclidean => (
            "embedding <-> $1",
            "embedding <-> $1",
            "<=",
        ),
        DistanceMetric::Cosine => (
            "embedding <=> $1",
            "embedding <=> $1",
            "<=",
        ),
        // <#> yields the negative inner product
        DistanceMetric::DotProduct => (
            "(embedding <#> $1) * -1",
            "embedding <#> $1",
            ">=",
        ),
    }
}

fn nearest_sql(metric: DistanceMetric) -> String {
    let (score, rank, cmp) = metric_sql(metric);
    format!(
        r#"
        SELECT id, title, genres, summary, cast_members, {score} AS vector_distance
        FROM catalog_items
        WHERE embedded
          AND vector_dims(embedding) = $2
          AND ($3::float8 IS NULL OR {score} {cmp} $3::float8)
        ORDER BY {rank} ASC, id ASC
        LIMIT $4
        "#
    )
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn get(&self, id: &str) -> Result<Option<CatalogItem>, DomainError> {
        let row = sqlx::query_as::<_, CatalogItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM catalog_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_unembedded(&self, limit: usize) -> Result<Vec<CatalogItem>, DomainError> {
        let rows = sqlx::query_as::<_, CatalogItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM catalog_items WHERE NOT embedded ORDER BY id LIMIT $1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn commit(&self, batch: &WriteBatch) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        let mut written = 0;
        for mutation in batch.mutations() {
            let result = match mutation {
                ItemMutation::Upsert(attributes) => {
                    sqlx::query(
                        r#"
                        INSERT INTO catalog_items (id, title, genres, summary, cast_members)
                        VALUES ($1, $2, $3, $4, $5)
                        ON CONFLICT (id) DO UPDATE
                        SET title = EXCLUDED.title, genres = EXCLUDED.genres,
                            summary = EXCLUDED.summary, cast_members = EXCLUDED.cast_members,
                            updated_at = NOW()
                        "#,
                    )
                    .bind(&attributes.id)
                    .bind(&attributes.title)
                    .bind(&attributes.genres)
                    .bind(&attributes.summary)
                    .bind(&attributes.cast)
                    .execute(&mut *tx)
                    .await
                }
                ItemMutation::SetEmbedding { id, embedding } => {
                    sqlx::query(
                        r#"
                        UPDATE catalog_items
                        SET embedding = $2, embedded = TRUE, updated_at = NOW()
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .bind(Vector::from(embedding.clone()))
                    .execute(&mut *tx)
                    .await
                }
            }
            .map_err(|e| DomainError::StoreWrite(format!("{} ({})", e, mutation.id())))?;

            if result.rows_affected() > 0 {
                written += 1;
            }
        }

        // Dropping `tx` on an early return rolls the whole batch back
        tx.commit()
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        Ok(written)
    }

    async fn find_nearest(&self, query: &VectorQuery) -> Result<Vec<ScoredItem>, DomainError> {
        let rows = sqlx::query_as::<_, ScoredRow>(&nearest_sql(query.metric))
            .bind(Vector::from(query.vector.clone()))
            .bind(query.vector.len() as i32)
            .bind(query.threshold.map(f64::from))
            .bind(query.limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn stats(&self) -> Result<CatalogStats, DomainError> {
        let (total, embedded) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE embedded) FROM catalog_items",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(CatalogStats {
            total: total as u64,
            embedded: embedded as u64,
        })
    }
}
