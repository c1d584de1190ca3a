//! @ai:module:intent Turn aggregated metrics into verdicts against claim thresholds
//! @ai:module:layer application
//! @ai:module:public_api ClaimsValidator, ClaimsValidatorTrait, Verdict, VerdictState
//! @ai:module:depends_on claims::threshold, metrics
//! @ai:module:stateless true

use crate::claims::threshold::{ClaimThreshold, Comparison, Metric};
use crate::metrics::{ComparisonRecord, MetricsAggregator, MetricsAggregatorTrait, Summary};
use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// @ai:intent Outcome of one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictState {
    Met,
    NotMet,
    NeedsBaseline,
    InsufficientData,
}

impl VerdictState {
    /// @ai:intent Convert state to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictState::Met => "met",
            VerdictState::NotMet => "not_met",
            VerdictState::NeedsBaseline => "needs_baseline",
            VerdictState::InsufficientData => "insufficient_data",
        }
    }
}

impl std::fmt::Display for VerdictState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Verdict of one claim against observed data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub claim_id: String,
    pub description: String,
    pub metric: Metric,
    pub observed: Option<f64>,
    pub op: Comparison,
    pub target: f64,
    pub state: VerdictState,
    pub met: bool,
    /// Some scenarios failed, so the observed value rests on partial data
    pub partial_data: bool,
}

/// @ai:intent Trait for claim validation
pub trait ClaimsValidatorTrait: Send + Sync {
    /// @ai:intent One verdict per threshold, in threshold order
    /// @ai:post records are not modified
    fn validate(&self, records: &[ComparisonRecord], thresholds: &[ClaimThreshold]) -> Vec<Verdict>;
}

/// @ai:intent Validates claims by reading metrics from the run summary
pub struct ClaimsValidator;

impl ClaimsValidator {
    /// @ai:intent Create a new validator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Validate against an already computed summary
    /// @ai:effects pure
    pub fn validate_summary(&self, summary: &Summary, thresholds: &[ClaimThreshold]) -> Vec<Verdict> {
        thresholds
            .iter()
            .map(|claim| {
                let (observed, state) = match observe(claim.metric, summary) {
                    Ok(value) if claim.op.holds(value, claim.target, claim.tolerance) => {
                        (Some(value), VerdictState::Met)
                    }
                    Ok(value) => (Some(value), VerdictState::NotMet),
                    Err(state) => (None, state),
                };

                Verdict {
                    claim_id: claim.id.clone(),
                    description: claim.description.clone(),
                    metric: claim.metric,
                    observed,
                    op: claim.op,
                    target: claim.target,
                    state,
                    met: state == VerdictState::Met,
                    partial_data: summary.partial_data,
                }
            })
            .collect()
    }
}

impl Default for ClaimsValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimsValidatorTrait for ClaimsValidator {
    /// @ai:effects pure
    fn validate(&self, records: &[ComparisonRecord], thresholds: &[ClaimThreshold]) -> Vec<Verdict> {
        let summary = MetricsAggregator::new().summarize(records);
        self.validate_summary(&summary, thresholds)
    }
}

/// @ai:intent Read a metric from the summary
/// @ai:post Err(NeedsBaseline) when the metric needs naive data and none exists
/// @ai:post Err(InsufficientData) when nothing ran, or a detection metric has no seeded defects
/// @ai:effects pure
fn observe(metric: Metric, summary: &Summary) -> Result<f64, VerdictState> {
    if summary.semantic.runs == 0 {
        return Err(VerdictState::InsufficientData);
    }
    if metric.needs_baseline() && summary.naive.is_none() {
        return Err(VerdictState::NeedsBaseline);
    }
    if metric.needs_defects() && summary.semantic.expected == 0 {
        return Err(VerdictState::InsufficientData);
    }

    let value = match metric {
        Metric::SemanticSuccessRate => Some(summary.semantic.success_rate),
        Metric::SemanticDetectionRate => Some(summary.semantic.detection_rate),
        Metric::DetectionRatio => summary.detection_ratio,
        Metric::MeanEfficiencyImprovement => summary.mean_efficiency_improvement,
        Metric::MeanContextReduction => summary.mean_context_reduction,
        Metric::OverallEfficiency => summary.overall_efficiency,
        Metric::MeanSemanticSeconds => Some(summary.semantic.mean_elapsed_ms / 1000.0),
        Metric::PeakSemanticMemoryMb => {
            Some(summary.semantic.peak_memory_delta_bytes as f64 / BYTES_PER_MB)
        }
    };

    value.ok_or(VerdictState::InsufficientData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::default_claims;
    use crate::metrics::ModeStats;

    fn summary(mean_efficiency: Option<f64>, with_naive: bool) -> Summary {
        Summary {
            scenario_count: 1,
            semantic: ModeStats {
                runs: 1,
                successes: 1,
                success_rate: 100.0,
                mean_elapsed_ms: 120.0,
                peak_memory_delta_bytes: 3 * 1024 * 1024,
                ..Default::default()
            },
            naive: with_naive.then(ModeStats::default),
            total_token_savings: None,
            overall_efficiency: None,
            mean_efficiency_improvement: mean_efficiency,
            mean_context_reduction: None,
            detection_ratio: None,
            best_scenario: None,
            worst_scenario: None,
            failures: Vec::new(),
            partial_data: false,
        }
    }

    fn efficiency_claim() -> Vec<ClaimThreshold> {
        vec![ClaimThreshold::new(
            "tokens.mean_efficiency_improvement",
            "95% fewer tokens",
            Metric::MeanEfficiencyImprovement,
            Comparison::Ge,
            95.0,
        )]
    }

    #[test]
    fn test_efficiency_claim_met_and_not_met() {
        let validator = ClaimsValidator::new();

        let verdicts = validator.validate_summary(&summary(Some(97.0), true), &efficiency_claim());
        assert!(verdicts[0].met);
        assert_eq!(verdicts[0].state, VerdictState::Met);
        assert_eq!(verdicts[0].observed, Some(97.0));

        let verdicts = validator.validate_summary(&summary(Some(40.0), true), &efficiency_claim());
        assert!(!verdicts[0].met);
        assert_eq!(verdicts[0].state, VerdictState::NotMet);
    }

    #[test]
    fn test_missing_baseline_needs_baseline() {
        let verdicts =
            ClaimsValidator::new().validate_summary(&summary(Some(97.0), false), &efficiency_claim());
        assert_eq!(verdicts[0].state, VerdictState::NeedsBaseline);
        assert!(!verdicts[0].met);
        assert!(verdicts[0].observed.is_none());
    }

    #[test]
    fn test_semantic_only_claims_still_judged() {
        let verdicts =
            ClaimsValidator::new().validate_summary(&summary(None, false), &default_claims());

        let state = |id: &str| verdicts.iter().find(|v| v.claim_id == id).unwrap().state;
        assert_eq!(state("quality.semantic_success_rate"), VerdictState::Met);
        assert_eq!(state("cost.mean_semantic_seconds"), VerdictState::Met);
        assert_eq!(state("cost.peak_memory_mb"), VerdictState::Met);
        assert_eq!(state("confidence.detection_ratio"), VerdictState::NeedsBaseline);
        assert_eq!(state("tokens.mean_context_reduction"), VerdictState::NeedsBaseline);
    }

    #[test]
    fn test_partial_data_propagates() {
        let mut partial = summary(Some(97.0), true);
        partial.partial_data = true;
        let verdicts = ClaimsValidator::new().validate_summary(&partial, &efficiency_claim());
        assert!(verdicts[0].partial_data);
        assert!(verdicts[0].met);
    }

    #[test]
    fn test_empty_batch_is_insufficient_data() {
        let records: Vec<ComparisonRecord> = Vec::new();
        let verdicts = ClaimsValidator::new().validate(&records, &default_claims());

        assert_eq!(verdicts.len(), default_claims().len());
        for verdict in &verdicts {
            assert_eq!(verdict.state, VerdictState::InsufficientData, "{}", verdict.claim_id);
            assert!(!verdict.met);
            assert!(verdict.observed.is_none());
        }
    }

    #[test]
    fn test_detection_claims_without_seeded_defects() {
        let mut exploration_only = summary(Some(97.0), true);
        exploration_only.detection_ratio = Some(0.0);

        let verdicts = ClaimsValidator::new().validate_summary(&exploration_only, &default_claims());
        let state = |id: &str| verdicts.iter().find(|v| v.claim_id == id).unwrap().state;
        assert_eq!(state("confidence.semantic_detection_rate"), VerdictState::InsufficientData);
        assert_eq!(state("confidence.detection_ratio"), VerdictState::InsufficientData);
        assert_eq!(state("tokens.mean_efficiency_improvement"), VerdictState::Met);
        assert_eq!(state("quality.semantic_success_rate"), VerdictState::Met);
    }
}
