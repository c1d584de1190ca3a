//! @ai:module:intent CLI for the semantic vs naive Terraform benchmark
//! @ai:module:layer presentation

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tflsp_bench::{
    config::{Backend, BenchmarkConfig, FilterConfig},
    metrics::{BenchmarkResults, MetricsAggregator, MetricsAggregatorTrait, ModeStats},
    report::{JsonReporter, JsonReporterTrait, ReportGenerator},
    runner::{DualModeExecutor, ModePair},
    scenario::{Category, Scenario, ScenarioCatalog, ScenarioCatalogTrait},
    service::{LocalSymbolService, ProcessSymbolService, SemanticService},
    ClaimsValidator, VerdictState,
};

#[derive(Parser)]
#[command(name = "tflsp-bench")]
#[command(about = "Benchmark semantic symbol queries against naive file reading on Terraform projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark
    Run {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter by categories (comma-separated)
        #[arg(long)]
        categories: Option<String>,

        /// Filter by scenario IDs (comma-separated)
        #[arg(long)]
        scenarios: Option<String>,

        /// Run the semantic mode only
        #[arg(long)]
        skip_naive: bool,

        /// Semantic service backend (local or process)
        #[arg(long)]
        backend: Option<Backend>,

        /// Path to the tfsym binary used by the process backend
        #[arg(long)]
        binary: Option<PathBuf>,

        /// Per-operation timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output directory for results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate reports from existing results
    Report {
        /// Path to results JSON file
        #[arg(short, long)]
        results: PathBuf,

        /// Output directory for reports
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },

    /// List available scenarios
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },

    /// Validate the scenario catalog
    Validate,

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "benchmark.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tflsp_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            categories,
            scenarios,
            skip_naive,
            backend,
            binary,
            timeout,
            output,
        } => {
            run_benchmark(RunArgs {
                config,
                categories,
                scenarios,
                skip_naive,
                backend,
                binary,
                timeout,
                output,
            })
            .await
        }
        Commands::Report { results, output } => generate_reports(results, output),
        Commands::List { category } => list_scenarios(category),
        Commands::Validate => validate(),
        Commands::Init { output } => init_config(output),
    }
}

struct RunArgs {
    config: Option<PathBuf>,
    categories: Option<String>,
    scenarios: Option<String>,
    skip_naive: bool,
    backend: Option<Backend>,
    binary: Option<PathBuf>,
    timeout: Option<u64>,
    output: Option<PathBuf>,
}

/// @ai:intent Run the benchmark and write reports
/// @ai:post an aggregation error aborts with a non-zero exit
/// @ai:effects fs:write, io
async fn run_benchmark(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    config.run.skip_naive |= args.skip_naive;
    if args.categories.is_some() || args.scenarios.is_some() {
        config.run.filter = build_filter(args.categories, args.scenarios);
    }
    if let Some(backend) = args.backend {
        config.service.backend = backend;
    }
    if let Some(binary) = args.binary {
        config.service.binary = binary;
    }
    if let Some(secs) = args.timeout {
        config.run.operation_timeout_secs = secs;
    }

    let scenarios = ScenarioCatalog::new().filtered(&config.run.filter);
    if scenarios.is_empty() {
        tracing::warn!("No scenarios match the filter criteria");
        return Ok(());
    }

    tracing::info!(
        "Found {} scenarios, backend: {}, naive mode: {}",
        scenarios.len(),
        config.service.backend.as_str(),
        if config.run.skip_naive { "skipped" } else { "enabled" }
    );

    let (service_name, pairs) = match config.service.backend {
        Backend::Local => {
            let service = LocalSymbolService::new().with_max_answer_chars(config.service.max_answer_chars);
            execute(Arc::new(service), &config, &scenarios).await
        }
        Backend::Process => {
            let service = ProcessSymbolService::new(config.service.binary.clone());
            execute(Arc::new(service), &config, &scenarios).await
        }
    };

    let aggregator = MetricsAggregator::new();
    let records = aggregator
        .combine(pairs)
        .context("Failed to pair semantic and naive results")?;
    let summary = aggregator.summarize(&records);
    let cost = aggregator.cost_analysis(&records, &config.pricing);
    let verdicts = ClaimsValidator::new().validate_summary(&summary, &config.claims);

    let results = BenchmarkResults {
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: service_name,
        skip_naive: config.run.skip_naive,
        records,
        summary,
        cost,
        verdicts,
    };

    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let output_dir = args
        .output
        .unwrap_or_else(|| config.paths.results_dir.clone())
        .join(timestamp.to_string());

    ReportGenerator::new()
        .generate_all(&results, &output_dir)
        .context("Failed to write reports")?;

    print_summary(&results);
    println!("Results written to {}", output_dir.display());

    Ok(())
}

/// @ai:intent Run all scenarios against one service implementation
/// @ai:effects fs:write, io
async fn execute<S: SemanticService>(
    service: Arc<S>,
    config: &BenchmarkConfig,
    scenarios: &[Scenario],
) -> (String, Vec<ModePair>) {
    let name = service.name().to_string();
    let executor = DualModeExecutor::from_config(service, config);
    (name, executor.run_all(scenarios).await)
}

/// @ai:intent Re-render reports from a results JSON file
/// @ai:effects fs:read, fs:write
fn generate_reports(results_path: PathBuf, output_dir: PathBuf) -> Result<()> {
    let results = JsonReporter::new().load(&results_path)?;

    let reporter = ReportGenerator::new();
    reporter.generate_all(&results, &output_dir)?;

    println!("Reports generated in {}", output_dir.display());
    Ok(())
}

/// @ai:intent List catalog scenarios
/// @ai:effects io
fn list_scenarios(category: Option<String>) -> Result<()> {
    if let Some(name) = &category {
        name.parse::<Category>()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid --category")?;
    }

    let filter = FilterConfig {
        categories: category.map(|c| vec![c]),
        ..Default::default()
    };
    let scenarios = ScenarioCatalog::new().filtered(&filter);

    println!("Available scenarios ({}):", scenarios.len());
    println!();
    println!("{:<36} {:<20} {:>8} {:>8}", "ID", "Category", "Files", "Defects");
    println!("{}", "-".repeat(75));

    for scenario in &scenarios {
        println!(
            "{:<36} {:<20} {:>8} {:>8}",
            scenario.id,
            scenario.category.as_str(),
            scenario.fixtures.len(),
            scenario.expected_defects()
        );
    }

    Ok(())
}

/// @ai:intent Validate the built-in scenario catalog
/// @ai:effects io
fn validate() -> Result<()> {
    let catalog = ScenarioCatalog::new();
    let problems = catalog.validate();

    if !problems.is_empty() {
        for problem in &problems {
            println!("  - {}", problem);
        }
        bail!("Catalog validation failed with {} problem(s)", problems.len());
    }

    let scenarios = catalog.scenarios();
    println!("Catalog validation passed!");
    println!("Total scenarios: {}", scenarios.len());

    for scenario in &scenarios {
        println!("  - {} ({})", scenario.id, scenario.category);
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchmarkConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchmarkConfig> {
    match path {
        Some(p) => BenchmarkConfig::load(&p),
        None => {
            let default_path = PathBuf::from("benchmark.toml");

            if default_path.exists() {
                BenchmarkConfig::load(&default_path)
            } else {
                Ok(BenchmarkConfig::default())
            }
        }
    }
}

/// @ai:intent Build filter from CLI arguments
/// @ai:effects pure
fn build_filter(categories: Option<String>, scenarios: Option<String>) -> FilterConfig {
    FilterConfig {
        categories: categories.map(|s| s.split(',').map(|c| c.trim().to_string()).collect()),
        scenario_ids: scenarios.map(|s| s.split(',').map(|t| t.trim().to_string()).collect()),
    }
}

/// @ai:intent Print summary to console
/// @ai:effects io
fn print_summary(results: &BenchmarkResults) {
    let summary = &results.summary;

    println!();
    println!("Terraform Semantic Benchmark Results");
    println!("====================================");
    println!();

    let naive = summary.naive.as_ref();
    let naive_percent = |f: fn(&ModeStats) -> f64| match naive {
        Some(stats) => format!("{:>9.1}%", f(stats)),
        None => format!("{:>10}", "-"),
    };

    println!("{:<25} {:>10} {:>10}", "", "Semantic", "Naive");
    println!("{}", "-".repeat(60));
    println!(
        "{:<25} {:>9.1}% {}",
        "Success rate:",
        summary.semantic.success_rate,
        naive_percent(|s| s.success_rate)
    );
    println!(
        "{:<25} {:>9.1}% {}",
        "Detection rate:",
        summary.semantic.detection_rate,
        naive_percent(|s| s.detection_rate)
    );
    println!(
        "{:<25} {:>10} {:>10}",
        "Total tokens:",
        summary.semantic.total_tokens,
        naive.map(|s| s.total_tokens.to_string()).unwrap_or_else(|| "-".to_string())
    );
    println!(
        "{:<25} {:>8.2}ms {:>10}",
        "Mean elapsed:",
        summary.semantic.mean_elapsed_ms,
        naive
            .map(|s| format!("{:.2}ms", s.mean_elapsed_ms))
            .unwrap_or_else(|| "-".to_string())
    );
    println!();

    if let (Some(savings), Some(efficiency)) = (summary.total_token_savings, summary.overall_efficiency) {
        println!("Token savings: {} ({:.1}% overall)", savings, efficiency);
    }
    if let Some(ratio) = summary.detection_ratio {
        println!("Detection ratio: {:.2}x", ratio);
    }
    if let Some(savings) = results.cost.savings {
        println!("Estimated cost savings: ${:.4}", savings);
    }
    println!();

    println!("Claims:");
    for verdict in &results.verdicts {
        let marker = match verdict.state {
            VerdictState::Met => "MET",
            VerdictState::NotMet => "NOT MET",
            VerdictState::NeedsBaseline => "NEEDS BASELINE",
            VerdictState::InsufficientData => "INSUFFICIENT DATA",
        };
        println!("  {:<40} {}", verdict.claim_id, marker);
    }

    if !summary.failures.is_empty() {
        println!();
        println!("Failures (metrics based on partial data):");
        for failure in &summary.failures {
            println!("  {} ({}): {}", failure.scenario_id, failure.mode, failure.error);
        }
    }
    println!();
}
