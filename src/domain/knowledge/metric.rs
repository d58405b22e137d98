//! Distance metrics for nearest-neighbour search

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::embedding::{cosine_similarity, dot_product, euclidean_distance};
use crate::domain::DomainError;

/// Distance metric for vector similarity. Every metric is expressed as a
/// distance, so ascending order is always nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine distance (1 - cosine similarity)
    #[default]
    Cosine,
    /// Euclidean (L2) distance
    Euclidean,
    /// Negated dot product
    DotProduct,
}

impl DistanceMetric {
    /// Distance between two vectors under this metric
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => 1.0 - cosine_similarity(a, b),
            Self::Euclidean => euclidean_distance(a, b),
            Self::DotProduct => -dot_product(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::DotProduct => "dot_product",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "dot_product" | "inner_product" => Ok(Self::DotProduct),
            other => Err(DomainError::configuration(format!(
                "Unknown distance metric: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_distance() {
        let metric = DistanceMetric::Cosine;

        assert!(metric.distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
        assert!((metric.distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_product_prefers_larger_products() {
        let metric = DistanceMetric::DotProduct;

        let near = metric.distance(&[1.0, 1.0], &[2.0, 2.0]);
        let far = metric.distance(&[1.0, 1.0], &[0.1, 0.1]);

        assert!(near < far);
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!("COSINE".parse::<DistanceMetric>().unwrap(), DistanceMetric::Cosine);
        assert_eq!("l2".parse::<DistanceMetric>().unwrap(), DistanceMetric::Euclidean);
        assert_eq!(
            "inner_product".parse::<DistanceMetric>().unwrap(),
            DistanceMetric::DotProduct
        );
        assert!("manhattan".parse::<DistanceMetric>().is_err());
    }
}
