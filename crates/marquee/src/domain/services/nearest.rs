//! Linear-scan nearest-neighbor search
//!
//! Used by stores without a native vector index. Cost is O(n·d) to score
//! every embedded item plus O(n log n) to sort, versus sub-linear lookups
//! when the store can delegate to an index.

use std::cmp::Ordering;

use crate::domain::entities::{CatalogItem, ScoredItem, VectorQuery};

/// Rank `items` against `query`.
///
/// Only embedded items are candidates; items whose embedding cannot be
/// compared (dimension mismatch) are skipped. Results are ordered best
/// first, ties broken by ascending id, and truncated to `query.limit`.
pub fn nearest<'a, I>(items: I, query: &VectorQuery) -> Vec<ScoredItem>
where
    I: IntoIterator<Item = &'a CatalogItem>,
{
    let metric = query.metric;

    let mut scored: Vec<(&CatalogItem, f32)> = items
        .into_iter()
        .filter(|item| item.embedded)
        .filter_map(|item| {
            let embedding = item.embedding.as_deref()?;
            let score = metric.score(&query.vector, embedding)?;
            Some((item, score))
        })
        .filter(|(_, score)| !score.is_nan())
        .filter(|(_, score)| {
            query
                .threshold
                .map_or(true, |threshold| metric.within_threshold(*score, threshold))
        })
        .collect();

    scored.sort_by(|(a, a_score), (b, b_score)| {
        metric
            .rank_key(*a_score)
            .partial_cmp(&metric.rank_key(*b_score))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    scored
        .into_iter()
        .take(query.limit)
        .map(|(item, score)| ScoredItem::from_item(item, score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ItemAttributes;
    use crate::domain::value_objects::DistanceMetric;

    fn item(id: &str, embedding: Option<Vec<f32>>) -> CatalogItem {
        let base = CatalogItem::new(ItemAttributes {
            id: id.to_string(),
            title: format!("Title {}", id),
            genres: vec![],
            summary: String::new(),
            cast: vec![],
        });
        match embedding {
            Some(e) => base.with_embedding(e).unwrap(),
            None => base,
        }
    }

    fn query(metric: DistanceMetric, threshold: Option<f32>, limit: usize) -> VectorQuery {
        VectorQuery {
            vector: vec![1.0, 0.0],
            metric,
            threshold,
            limit,
        }
    }

    #[test]
    fn test_skips_unembedded_items() {
        let items = vec![item("a", None), item("b", Some(vec![1.0, 0.0]))];
        let results = nearest(&items, &query(DistanceMetric::Cosine, None, 10));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "b");
    }

    #[test]
    fn test_orders_by_ascending_distance() {
        let items = vec![
            item("far", Some(vec![0.0, 1.0])),
            item("near", Some(vec![1.0, 0.1])),
            item("mid", Some(vec![1.0, 1.0])),
        ];
        let results = nearest(&items, &query(DistanceMetric::Euclidean, None, 10));
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(results
            .windows(2)
            .all(|w| w[0].vector_distance <= w[1].vector_distance));
    }

    #[test]
    fn test_ties_break_by_id() {
        let items = vec![
            item("c", Some(vec![2.0, 0.0])),
            item("a", Some(vec![3.0, 0.0])),
            item("b", Some(vec![1.0, 0.0])),
        ];
        // All point the same way: cosine distance 0 for each
        let results = nearest(&items, &query(DistanceMetric::Cosine, None, 10));
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_threshold_filters_weaker_matches() {
        let items = vec![
            item("near", Some(vec![1.0, 0.0])),
            item("far", Some(vec![-1.0, 0.0])),
        ];
        let results = nearest(&items, &query(DistanceMetric::Cosine, Some(0.5), 10));
        assert_eq!(results.len(), 1);
        assert!(results.iter().all(|r| r.vector_distance <= 0.5));
    }

    #[test]
    fn test_dot_product_threshold_keeps_stronger_scores() {
        let items = vec![
            item("strong", Some(vec![3.0, 0.0])),
            item("weak", Some(vec![0.5, 0.0])),
        ];
        let results = nearest(&items, &query(DistanceMetric::DotProduct, Some(1.0), 10));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "strong");
        assert!(results.iter().all(|r| r.vector_distance >= 1.0));
    }

    #[test]
    fn test_limit_and_dimension_mismatch() {
        let items = vec![
            item("a", Some(vec![1.0, 0.0])),
            item("b", Some(vec![0.9, 0.1])),
            item("wrong-dim", Some(vec![1.0, 0.0, 0.0])),
        ];
        let results = nearest(&items, &query(DistanceMetric::Euclidean, None, 1));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "a");
    }
}
