//! @ai:module:intent Declarative table of published performance claims
//! @ai:module:layer domain
//! @ai:module:public_api ClaimThreshold, Metric, Comparison, default_claims
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Aggregate metric a claim reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SemanticSuccessRate,
    SemanticDetectionRate,
    DetectionRatio,
    MeanEfficiencyImprovement,
    MeanContextReduction,
    OverallEfficiency,
    MeanSemanticSeconds,
    PeakSemanticMemoryMb,
}

impl Metric {
    /// @ai:intent Convert metric to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::SemanticSuccessRate => "semantic_success_rate",
            Metric::SemanticDetectionRate => "semantic_detection_rate",
            Metric::DetectionRatio => "detection_ratio",
            Metric::MeanEfficiencyImprovement => "mean_efficiency_improvement",
            Metric::MeanContextReduction => "mean_context_reduction",
            Metric::OverallEfficiency => "overall_efficiency",
            Metric::MeanSemanticSeconds => "mean_semantic_seconds",
            Metric::PeakSemanticMemoryMb => "peak_semantic_memory_mb",
        }
    }

    /// @ai:intent Whether the metric compares against a naive measurement
    /// @ai:effects pure
    pub fn needs_baseline(&self) -> bool {
        matches!(
            self,
            Metric::DetectionRatio
                | Metric::MeanEfficiencyImprovement
                | Metric::MeanContextReduction
                | Metric::OverallEfficiency
        )
    }

    /// @ai:intent Whether the metric is a rate over seeded defects
    /// @ai:effects pure
    pub fn needs_defects(&self) -> bool {
        matches!(self, Metric::SemanticDetectionRate | Metric::DetectionRatio)
    }
}

/// @ai:intent Comparison operator between observed and target values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
}

impl Comparison {
    /// @ai:intent Operator symbol
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
            Comparison::Eq => "==",
        }
    }

    /// @ai:intent Apply the operator; tolerance only applies to Eq
    /// @ai:example (Ge, 97.0, 95.0, 0.0) -> true
    /// @ai:example (Eq, 4.05, 4.0, 0.1) -> true
    /// @ai:effects pure
    pub fn holds(&self, observed: f64, target: f64, tolerance: f64) -> bool {
        match self {
            Comparison::Ge => observed >= target,
            Comparison::Le => observed <= target,
            Comparison::Eq => (observed - target).abs() <= tolerance.abs(),
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent A named published claim: metric, operator and target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimThreshold {
    pub id: String,
    pub description: String,
    pub metric: Metric,
    pub op: Comparison,
    pub target: f64,
    #[serde(default)]
    pub tolerance: f64,
}

impl ClaimThreshold {
    /// @ai:intent Create a claim with zero tolerance
    /// @ai:effects pure
    pub fn new(id: &str, description: &str, metric: Metric, op: Comparison, target: f64) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            metric,
            op,
            target,
            tolerance: 0.0,
        }
    }
}

/// @ai:intent The published claim table
/// @ai:effects pure
pub fn default_claims() -> Vec<ClaimThreshold> {
    vec![
        ClaimThreshold::new(
            "quality.semantic_success_rate",
            "Semantic operations succeed at least 95% of the time",
            Metric::SemanticSuccessRate,
            Comparison::Ge,
            95.0,
        ),
        ClaimThreshold::new(
            "confidence.detection_ratio",
            "Semantic mode detects at least 4x more defects than naive reading",
            Metric::DetectionRatio,
            Comparison::Ge,
            4.0,
        ),
        ClaimThreshold::new(
            "confidence.semantic_detection_rate",
            "Semantic mode detects at least 60% of seeded defects",
            Metric::SemanticDetectionRate,
            Comparison::Ge,
            60.0,
        ),
        ClaimThreshold::new(
            "tokens.mean_efficiency_improvement",
            "Semantic queries use at least 95% fewer tokens",
            Metric::MeanEfficiencyImprovement,
            Comparison::Ge,
            95.0,
        ),
        ClaimThreshold::new(
            "tokens.mean_context_reduction",
            "Semantic queries send at least 90% less input context",
            Metric::MeanContextReduction,
            Comparison::Ge,
            90.0,
        ),
        ClaimThreshold::new(
            "cost.mean_semantic_seconds",
            "Semantic operations complete in under 0.5s on average",
            Metric::MeanSemanticSeconds,
            Comparison::Le,
            0.5,
        ),
        ClaimThreshold::new(
            "cost.peak_memory_mb",
            "Semantic operations grow resident memory by at most 100MB",
            Metric::PeakSemanticMemoryMb,
            Comparison::Le,
            100.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_claim_ids_are_unique() {
        let claims = default_claims();
        let mut ids: Vec<&str> = claims.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), claims.len());
    }

    #[test]
    fn test_comparison_holds() {
        assert!(Comparison::Ge.holds(95.0, 95.0, 0.0));
        assert!(!Comparison::Ge.holds(94.9, 95.0, 0.0));
        assert!(Comparison::Le.holds(0.2, 0.5, 0.0));
        assert!(Comparison::Eq.holds(4.05, 4.0, 0.1));
        assert!(!Comparison::Eq.holds(4.5, 4.0, 0.1));
    }

    #[test]
    fn test_claim_serializes_operator_symbol() {
        let json = serde_json::to_string(&default_claims()[0]).unwrap();
        assert!(json.contains(r#""op":">=""#));
        assert!(json.contains(r#""metric":"semantic_success_rate""#));
    }
}
