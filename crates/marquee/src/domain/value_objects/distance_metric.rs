//! DistanceMetric - How two embeddings are compared

use serde::{Deserialize, Serialize};

/// Vector comparison used for nearest-neighbor search.
///
/// `EUCLIDEAN` and `COSINE` report a distance where smaller is closer.
/// `DOT_PRODUCT` reports the raw dot product where larger is closer, so its
/// ranking key is the negated score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistanceMetric {
    Euclidean,
    Cosine,
    DotProduct,
}

impl DistanceMetric {
    /// Score `candidate` against `query`. Returns `None` when the vectors
    /// cannot be compared (dimension mismatch or empty).
    pub fn score(&self, query: &[f32], candidate: &[f32]) -> Option<f32> {
        if query.is_empty() || query.len() != candidate.len() {
            return None;
        }

        match self {
            DistanceMetric::Euclidean => Some(
                query
                    .iter()
                    .zip(candidate)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f32>()
                    .sqrt(),
            ),
            DistanceMetric::Cosine => {
                let dot = dot(query, candidate);
                let norms = norm(query) * norm(candidate);
                if norms == 0.0 {
                    // Zero vectors have no direction; treat as maximally distant
                    Some(1.0)
                } else {
                    Some(1.0 - dot / norms)
                }
            }
            DistanceMetric::DotProduct => Some(dot(query, candidate)),
        }
    }

    /// Key that sorts ascending from best to worst match.
    pub fn rank_key(&self, score: f32) -> f32 {
        match self {
            DistanceMetric::DotProduct => -score,
            _ => score,
        }
    }

    /// Whether `score` is at least as strong as `threshold`.
    pub fn within_threshold(&self, score: f32, threshold: f32) -> bool {
        match self {
            DistanceMetric::DotProduct => score >= threshold,
            _ => score <= threshold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "EUCLIDEAN",
            DistanceMetric::Cosine => "COSINE",
            DistanceMetric::DotProduct => "DOT_PRODUCT",
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUCLIDEAN" => Ok(DistanceMetric::Euclidean),
            "COSINE" => Ok(DistanceMetric::Cosine),
            "DOT_PRODUCT" => Ok(DistanceMetric::DotProduct),
            _ => Err(format!(
                "Unknown distance metric: {} (expected EUCLIDEAN, COSINE or DOT_PRODUCT)",
                s
            )),
        }
    }
}
