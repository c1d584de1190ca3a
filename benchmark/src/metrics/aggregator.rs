//! @ai:module:intent Reduce dual-mode results into comparison records and a summary
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait
//! @ai:module:stateless true

use crate::config::PricingConfig;
use crate::error::AggregationError;
use crate::metrics::types::{
    ComparisonRecord, CostAnalysis, FailedOperation, ModeStats, ScenarioHighlight, Summary,
};
use crate::runner::{Mode, ModePair, OperationResult};

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Pair up per-mode results into comparison records
    /// @ai:post Err on mismatched scenario ids or modes; nothing is coerced
    fn combine(&self, pairs: Vec<ModePair>) -> Result<Vec<ComparisonRecord>, AggregationError>;

    /// @ai:intent Run-level statistics over comparison records
    fn summarize(&self, records: &[ComparisonRecord]) -> Summary;

    /// @ai:intent Dollar cost of each mode under the given pricing
    fn cost_analysis(&self, records: &[ComparisonRecord], pricing: &PricingConfig) -> CostAnalysis;
}

/// @ai:intent Aggregates operation results into comparative metrics
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Build one comparison record from a validated pair
    /// @ai:effects pure
    fn compare(pair: ModePair) -> Result<ComparisonRecord, AggregationError> {
        let ModePair { semantic, naive } = pair;

        expect_mode(&semantic, Mode::Semantic)?;
        if let Some(naive) = &naive {
            expect_mode(naive, Mode::Naive)?;
            if naive.scenario_id != semantic.scenario_id {
                return Err(AggregationError::ScenarioMismatch {
                    semantic: semantic.scenario_id.clone(),
                    naive: naive.scenario_id.clone(),
                });
            }
        }

        let semantic_detection_rate = semantic.detection_rate();
        let naive_detection_rate = naive.as_ref().map(OperationResult::detection_rate);

        let token_savings = naive
            .as_ref()
            .map(|n| n.total_tokens as i64 - semantic.total_tokens as i64);
        let efficiency_improvement = naive
            .as_ref()
            .map(|n| percent_saved(semantic.total_tokens, n.total_tokens));
        let context_reduction = naive
            .as_ref()
            .map(|n| percent_saved(semantic.input_tokens, n.input_tokens));
        let detection_ratio = naive_detection_rate.map(|n| semantic_detection_rate / n.max(1.0));

        Ok(ComparisonRecord {
            scenario_id: semantic.scenario_id.clone(),
            category: semantic.category,
            semantic,
            naive,
            token_savings,
            efficiency_improvement,
            context_reduction,
            semantic_detection_rate,
            naive_detection_rate,
            detection_ratio,
        })
    }

    /// @ai:intent Aggregate statistics of a set of results of one mode
    /// @ai:effects pure
    fn mode_stats<'a, I: Iterator<Item = &'a OperationResult>>(results: I) -> ModeStats {
        let results: Vec<&OperationResult> = results.collect();
        if results.is_empty() {
            return ModeStats::default();
        }

        let runs = results.len();
        let successes = results.iter().filter(|r| r.success).count();
        let detected: usize = results.iter().map(|r| r.detected).sum();
        let expected: usize = results.iter().map(|r| r.expected).sum();

        ModeStats {
            runs,
            successes,
            success_rate: successes as f64 / runs as f64 * 100.0,
            detected,
            expected,
            detection_rate: detected as f64 / expected.max(1) as f64 * 100.0,
            total_input_tokens: results.iter().map(|r| r.input_tokens).sum(),
            total_output_tokens: results.iter().map(|r| r.output_tokens).sum(),
            total_tokens: results.iter().map(|r| r.total_tokens).sum(),
            mean_elapsed_ms: average(results.iter().map(|r| r.elapsed_ms)),
            peak_memory_delta_bytes: results
                .iter()
                .map(|r| r.memory_delta_bytes)
                .max()
                .unwrap_or(0),
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Reject a result recorded under the wrong mode
/// @ai:effects pure
fn expect_mode(result: &OperationResult, expected: Mode) -> Result<(), AggregationError> {
    if result.mode == expected {
        Ok(())
    } else {
        Err(AggregationError::ModeMismatch {
            scenario: result.scenario_id.clone(),
            expected,
            actual: result.mode,
        })
    }
}

/// @ai:intent Share of the baseline saved by the candidate, in percent
/// @ai:example (5, 100) -> 95.0
/// @ai:example (10, 0) -> -1000.0
/// @ai:effects pure
fn percent_saved(candidate: u64, baseline: u64) -> f64 {
    (baseline as f64 - candidate as f64) / baseline.max(1) as f64 * 100.0
}

/// @ai:intent Dollar cost of one result
/// @ai:effects pure
fn result_cost(result: &OperationResult, pricing: &PricingConfig) -> f64 {
    result.input_tokens as f64 / 1000.0 * pricing.input_per_1k
        + result.output_tokens as f64 / 1000.0 * pricing.output_per_1k
}

/// @ai:intent Calculate average of an iterator of f64
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:effects pure
    fn combine(&self, pairs: Vec<ModePair>) -> Result<Vec<ComparisonRecord>, AggregationError> {
        pairs.into_iter().map(Self::compare).collect()
    }

    /// @ai:effects pure
    fn summarize(&self, records: &[ComparisonRecord]) -> Summary {
        let semantic = Self::mode_stats(records.iter().map(|r| &r.semantic));
        let naive = records
            .iter()
            .any(|r| r.naive.is_some())
            .then(|| Self::mode_stats(records.iter().filter_map(|r| r.naive.as_ref())));

        let compared: Vec<&ComparisonRecord> =
            records.iter().filter(|r| r.naive.is_some()).collect();

        let total_token_savings = (!compared.is_empty())
            .then(|| compared.iter().filter_map(|r| r.token_savings).sum::<i64>());
        let overall_efficiency = naive.as_ref().and(total_token_savings).map(|savings| {
            let naive_total: u64 = compared
                .iter()
                .filter_map(|r| r.naive.as_ref())
                .map(|n| n.total_tokens)
                .sum();
            savings as f64 / naive_total.max(1) as f64 * 100.0
        });

        let efficiencies: Vec<(&str, f64)> = records
            .iter()
            .filter_map(|r| r.efficiency_improvement.map(|e| (r.scenario_id.as_str(), e)))
            .collect();
        let mean_efficiency_improvement = (!efficiencies.is_empty())
            .then(|| average(efficiencies.iter().map(|(_, e)| *e)));

        let reductions: Vec<f64> = records.iter().filter_map(|r| r.context_reduction).collect();
        let mean_context_reduction =
            (!reductions.is_empty()).then(|| average(reductions.iter().copied()));

        let detection_ratio = naive
            .as_ref()
            .map(|n| semantic.detection_rate / n.detection_rate.max(1.0));

        let highlight = |(id, e): &(&str, f64)| ScenarioHighlight {
            scenario_id: id.to_string(),
            efficiency_improvement: *e,
        };
        let best_scenario = efficiencies
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(highlight);
        let worst_scenario = efficiencies
            .iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(highlight);

        let failures: Vec<FailedOperation> = records
            .iter()
            .flat_map(|r| r.results())
            .filter(|r| !r.success)
            .map(|r| FailedOperation {
                scenario_id: r.scenario_id.clone(),
                mode: r.mode,
                error: r
                    .error
                    .clone()
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "unknown error".to_string()),
            })
            .collect();

        Summary {
            scenario_count: records.len(),
            semantic,
            naive,
            total_token_savings,
            overall_efficiency,
            mean_efficiency_improvement,
            mean_context_reduction,
            detection_ratio,
            best_scenario,
            worst_scenario,
            partial_data: !failures.is_empty(),
            failures,
        }
    }

    /// @ai:effects pure
    fn cost_analysis(&self, records: &[ComparisonRecord], pricing: &PricingConfig) -> CostAnalysis {
        let semantic_cost: f64 = records.iter().map(|r| result_cost(&r.semantic, pricing)).sum();

        let naive_cost = records.iter().any(|r| r.naive.is_some()).then(|| {
            records
                .iter()
                .filter_map(|r| r.naive.as_ref())
                .map(|n| result_cost(n, pricing))
                .sum::<f64>()
        });

        let savings = naive_cost.map(|n| n - semantic_cost);
        let cost_efficiency = naive_cost
            .zip(savings)
            .map(|(n, s)| s / n.max(0.01) * 100.0);

        CostAnalysis {
            semantic_cost,
            naive_cost,
            savings,
            cost_efficiency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Category;
    use pretty_assertions::assert_eq;

    fn result(id: &str, mode: Mode, input: u64, output: u64, detected: usize, expected: usize) -> OperationResult {
        OperationResult {
            scenario_id: id.to_string(),
            category: Category::DanglingReference,
            mode,
            success: true,
            error: None,
            elapsed_ms: 2.0,
            memory_delta_bytes: 0,
            output: String::new(),
            hits: detected,
            detected,
            expected,
            input_tokens: input,
            output_tokens: output,
            total_tokens: input + output,
        }
    }

    fn pair(id: &str, semantic: (u64, u64, usize), naive: (u64, u64, usize), expected: usize) -> ModePair {
        ModePair {
            semantic: result(id, Mode::Semantic, semantic.0, semantic.1, semantic.2, expected),
            naive: Some(result(id, Mode::Naive, naive.0, naive.1, naive.2, expected)),
        }
    }

    #[test]
    fn test_token_savings_is_exact_difference() {
        let records = MetricsAggregator::new()
            .combine(vec![pair("a", (30, 20, 1), (900, 100, 0), 1)])
            .unwrap();

        let record = &records[0];
        assert_eq!(record.token_savings, Some(1000 - 50));
        assert_eq!(record.efficiency_improvement, Some(95.0));
        assert_eq!(record.context_reduction, Some((900.0 - 30.0) / 900.0 * 100.0));
        assert_eq!(record.semantic_detection_rate, 100.0);
        assert_eq!(record.naive_detection_rate, Some(0.0));
        assert_eq!(record.detection_ratio, Some(100.0));
    }

    #[test]
    fn test_savings_can_be_negative() {
        let records = MetricsAggregator::new()
            .combine(vec![pair("a", (200, 0, 0), (100, 0, 0), 0)])
            .unwrap();
        assert_eq!(records[0].token_savings, Some(-100));
        assert_eq!(records[0].efficiency_improvement, Some(-100.0));
    }

    #[test]
    fn test_zero_expected_defects_rate_is_zero() {
        let records = MetricsAggregator::new()
            .combine(vec![pair("explore", (10, 10, 0), (0, 0, 0), 0)])
            .unwrap();

        assert_eq!(records[0].semantic_detection_rate, 0.0);
        assert_eq!(records[0].naive_detection_rate, Some(0.0));
        // empty baseline saturates the denominator at 1
        assert_eq!(records[0].token_savings, Some(-20));
        assert_eq!(records[0].efficiency_improvement, Some(-2000.0));
    }

    #[test]
    fn test_scenario_mismatch_fails_fast() {
        let mut bad = pair("a", (1, 1, 0), (1, 1, 0), 0);
        if let Some(naive) = bad.naive.as_mut() {
            naive.scenario_id = "b".to_string();
        }

        let err = MetricsAggregator::new().combine(vec![bad]).unwrap_err();
        assert_eq!(
            err,
            AggregationError::ScenarioMismatch {
                semantic: "a".to_string(),
                naive: "b".to_string()
            }
        );
    }

    #[test]
    fn test_mode_mismatch_fails_fast() {
        let bad = ModePair {
            semantic: result("a", Mode::Naive, 1, 1, 0, 0),
            naive: None,
        };
        let err = MetricsAggregator::new().combine(vec![bad]).unwrap_err();
        assert!(matches!(err, AggregationError::ModeMismatch { expected: Mode::Semantic, .. }));
    }

    #[test]
    fn test_summary_aggregates() {
        let aggregator = MetricsAggregator::new();
        let records = aggregator
            .combine(vec![
                pair("a", (10, 0, 1), (100, 0, 1), 1),
                pair("b", (50, 0, 1), (100, 0, 0), 1),
                pair("c", (5, 5, 0), (200, 0, 0), 0),
            ])
            .unwrap();

        let summary = aggregator.summarize(&records);
        let naive = summary.naive.clone().unwrap();

        assert_eq!(summary.scenario_count, 3);
        assert_eq!(summary.semantic.detected, 2);
        assert_eq!(summary.semantic.expected, 2);
        assert_eq!(summary.semantic.detection_rate, 100.0);
        assert_eq!(naive.detection_rate, 50.0);
        assert_eq!(summary.detection_ratio, Some(2.0));
        assert_eq!(summary.total_token_savings, Some(90 + 50 + 190));
        assert_eq!(summary.overall_efficiency, Some(330.0 / 400.0 * 100.0));
        assert_eq!(summary.mean_efficiency_improvement, Some((90.0 + 50.0 + 95.0) / 3.0));
        assert_eq!(summary.best_scenario.unwrap().scenario_id, "c");
        assert_eq!(summary.worst_scenario.unwrap().scenario_id, "b");
        assert!(!summary.partial_data);
        assert_eq!(summary.semantic.success_rate, 100.0);
    }

    #[test]
    fn test_summary_lists_failures() {
        let aggregator = MetricsAggregator::new();
        let mut failed = pair("a", (1, 1, 0), (1, 1, 0), 1);
        failed.semantic.success = false;
        failed.semantic.error = Some("semantic service unavailable: offline".to_string());

        let records = aggregator.combine(vec![failed, pair("b", (1, 1, 1), (9, 1, 1), 1)]).unwrap();
        let summary = aggregator.summarize(&records);

        assert!(summary.partial_data);
        assert_eq!(
            summary.failures,
            vec![FailedOperation {
                scenario_id: "a".to_string(),
                mode: Mode::Semantic,
                error: "semantic service unavailable: offline".to_string(),
            }]
        );
        assert_eq!(summary.semantic.success_rate, 50.0);
    }

    #[test]
    fn test_semantic_only_summary_has_no_baseline_figures() {
        let aggregator = MetricsAggregator::new();
        let records = aggregator
            .combine(vec![ModePair {
                semantic: result("a", Mode::Semantic, 10, 10, 1, 1),
                naive: None,
            }])
            .unwrap();
        let summary = aggregator.summarize(&records);

        assert!(records[0].token_savings.is_none());
        assert!(summary.naive.is_none());
        assert!(summary.detection_ratio.is_none());
        assert!(summary.mean_efficiency_improvement.is_none());
        assert!(summary.overall_efficiency.is_none());

        let cost = aggregator.cost_analysis(&records, &PricingConfig::default());
        assert!(cost.naive_cost.is_none());
        assert!((cost.semantic_cost - 0.0009).abs() < 1e-12);
    }

    #[test]
    fn test_cost_analysis() {
        let aggregator = MetricsAggregator::new();
        let records = aggregator
            .combine(vec![pair("a", (1000, 0, 0), (10_000, 1000, 0), 0)])
            .unwrap();

        let cost = aggregator.cost_analysis(&records, &PricingConfig::default());
        assert!((cost.semantic_cost - 0.03).abs() < 1e-9);
        assert!((cost.naive_cost.unwrap() - 0.36).abs() < 1e-9);
        assert!((cost.savings.unwrap() - 0.33).abs() < 1e-9);
        assert!((cost.cost_efficiency.unwrap() - 0.33 / 0.36 * 100.0).abs() < 1e-6);
    }
}
