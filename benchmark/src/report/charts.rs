//! @ai:module:intent Chart generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, token_series, rate_series
//! @ai:module:stateless true

use crate::metrics::BenchmarkResults;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from results
    fn generate_all(&self, results: &BenchmarkResults, output_dir: &Path) -> Result<Vec<String>>;
}

/// (label, semantic, naive) bars of one chart group
pub type BarGroup = (String, f64, Option<f64>);

/// @ai:intent Total tokens per scenario and mode
/// @ai:effects pure
pub fn token_series(results: &BenchmarkResults) -> Vec<BarGroup> {
    results
        .records
        .iter()
        .map(|r| {
            (
                r.scenario_id.clone(),
                r.semantic.total_tokens as f64,
                r.naive.as_ref().map(|n| n.total_tokens as f64),
            )
        })
        .collect()
}

/// @ai:intent Success and detection rate per mode
/// @ai:effects pure
pub fn rate_series(results: &BenchmarkResults) -> Vec<BarGroup> {
    let summary = &results.summary;
    vec![
        (
            "Success".to_string(),
            summary.semantic.success_rate,
            summary.naive.as_ref().map(|n| n.success_rate),
        ),
        (
            "Detection".to_string(),
            summary.semantic.detection_rate,
            summary.naive.as_ref().map(|n| n.detection_rate),
        ),
    ]
}

/// @ai:intent Generates charts from benchmark results
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Draw a grouped semantic/naive bar chart
    /// @ai:pre data is non-empty
    /// @ai:effects fs:write
    fn draw_grouped_bars(
        &self,
        data: &[BarGroup],
        caption: &str,
        y_desc: &str,
        size: (u32, u32),
        output_path: &Path,
    ) -> Result<()> {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = data
            .iter()
            .map(|(_, s, n)| s.max(n.unwrap_or(0.0)))
            .fold(1.0f64, f64::max)
            * 1.1;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..data.len() as f64, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.len())
            .y_desc(y_desc)
            .x_label_formatter(&|x| {
                data.get(x.floor() as usize)
                    .map(|(name, _, _)| name.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        chart
            .draw_series(data.iter().enumerate().map(|(i, (_, semantic, _))| {
                let x = i as f64;
                Rectangle::new([(x + 0.1, 0.0), (x + 0.45, *semantic)], BLUE.mix(0.7).filled())
            }))?
            .label("Semantic")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.mix(0.7).filled()));

        if data.iter().any(|(_, _, naive)| naive.is_some()) {
            chart
                .draw_series(data.iter().enumerate().filter_map(|(i, (_, _, naive))| {
                    let x = i as f64;
                    naive.map(|n| {
                        Rectangle::new([(x + 0.55, 0.0), (x + 0.9, n)], GREEN.mix(0.7).filled())
                    })
                }))?
                .label("Naive")
                .legend(|(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], GREEN.mix(0.7).filled())
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts
    /// @ai:post returns file names of the charts written; empty results produce none
    /// @ai:effects fs:write
    fn generate_all(&self, results: &BenchmarkResults, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();
        if results.records.is_empty() {
            return Ok(generated);
        }

        let width = (120 * results.records.len() as u32).clamp(800, 2400);
        self.draw_grouped_bars(
            &token_series(results),
            "Token Usage by Scenario",
            "Tokens",
            (width, 600),
            &output_dir.join("token_usage.png"),
        )?;
        generated.push("token_usage.png".to_string());

        self.draw_grouped_bars(
            &rate_series(results),
            "Success and Detection Rate by Mode",
            "Rate (%)",
            (800, 500),
            &output_dir.join("detection_rates.png"),
        )?;
        generated.push("detection_rates.png".to_string());

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_results;
    use tempfile::TempDir;

    #[test]
    fn test_token_series_follows_records() {
        let series = token_series(&sample_results());

        assert_eq!(series.len(), 3);
        assert_eq!(series[0], ("explore-vpc".to_string(), 50.0, Some(2100.0)));
    }

    #[test]
    fn test_rate_series() {
        let mut results = sample_results();
        let series = rate_series(&results);
        assert_eq!(series[1].0, "Detection");
        assert_eq!(series[1].1, 50.0);
        assert_eq!(series[1].2, Some(50.0));

        results.summary.naive = None;
        assert!(rate_series(&results).iter().all(|(_, _, naive)| naive.is_none()));
    }

    #[test]
    fn test_empty_results_draw_nothing() {
        let mut results = sample_results();
        results.records.clear();
        let temp = TempDir::new().unwrap();

        let files = ChartGenerator::new().generate_all(&results, temp.path()).unwrap();
        assert!(files.is_empty());
    }
}
