mod api;
mod llm;
mod orchestrator;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ai_visibility::analysis::{ResponseEvaluator, ScoreComponents, ScoreInputs, VisibilityTier};
use ai_visibility::config::VisibilityConfig;
use ai_visibility::content::ContentSource;
use ai_visibility::diagnostics::TracingObserver;
use ai_visibility::{
    aggregate_record_inputs, format_float, format_percent, format_position, BrandMetrics,
    RecordInput, ResponseRecord,
};

use crate::llm::QueryEngine;
use crate::orchestrator::{prepare_keywords, prepare_prompts, run_analysis, AnalysisPlan};

#[derive(Parser)]
#[command(name = "ai-visibility", about = "Brand visibility in AI assistant answers")]
struct Cli {
    /// TOML config file (defaults to $VISIBILITY_CONFIG_PATH or config/visibility.toml)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score one prompt's answers for a brand
    Evaluate(EvaluateArgs),
    /// Aggregate a JSON file of response records
    Report(ReportArgs),
    /// Query the assistant and report brand visibility
    Analyze(AnalyzeArgs),
    /// Manage the config file
    #[command(subcommand)]
    Config(ConfigCommand),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct EvaluateArgs {
    #[arg(long)]
    brand: String,
    #[arg(long, default_value = "")]
    prompt: String,
    #[arg(long, default_value = "chatgpt")]
    platform: String,
    /// One answer per run; reads a single answer from stdin when omitted
    #[arg(long = "answer")]
    answers: Vec<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct ReportArgs {
    #[arg(long)]
    brand: String,
    #[arg(long)]
    records: PathBuf,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    brand: String,
    /// Site used to derive keywords when no prompts are given
    #[arg(long)]
    domain: Option<String>,
    #[arg(long = "prompt")]
    prompts: Vec<String>,
    #[arg(long = "platform")]
    platforms: Vec<String>,
    #[arg(long)]
    runs: Option<usize>,
    #[arg(long)]
    details: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Write the default config
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8000)]
    port: u16,
    #[arg(long, default_value = "frontend")]
    web_root: String,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) =
        VisibilityConfig::load(cli.config_path).map_err(|err| err.to_string())?;

    match cli.command {
        Command::Evaluate(args) => run_evaluate(args, &config),
        Command::Report(args) => run_report(args),
        Command::Analyze(args) => run_analyze(args, &config).await,
        Command::Config(ConfigCommand::Init { force }) => {
            let path = config_path.unwrap_or_else(|| PathBuf::from("config/visibility.toml"));
            run_config_init(&path, force)
        }
        Command::Serve(args) => server::serve(args, config).await,
    }
}

fn run_evaluate(args: EvaluateArgs, config: &VisibilityConfig) -> Result<(), String> {
    let answers = if args.answers.is_empty() {
        vec![read_stdin()?]
    } else {
        args.answers
    };

    let evaluator = ResponseEvaluator::new(config.analysis.preview_chars);
    let record = evaluator.evaluate(&args.prompt, &args.brand, &args.platform, &answers);

    if args.json {
        return print_json(&record);
    }
    print_record(&record, true);
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<(), String> {
    let contents = std::fs::read_to_string(&args.records)
        .map_err(|err| format!("failed to read records: {}", err))?;
    let inputs: Vec<RecordInput> = serde_json::from_str(&contents)
        .map_err(|err| format!("failed to parse records: {}", err))?;
    let metrics =
        aggregate_record_inputs(&args.brand, inputs, &TracingObserver).map_err(|err| err.to_string())?;

    if args.json {
        return print_json(&metrics.rounded());
    }
    print_metrics(&metrics);
    Ok(())
}

async fn run_analyze(args: AnalyzeArgs, config: &VisibilityConfig) -> Result<(), String> {
    let engine = QueryEngine::from_env(&config.query_engine)
        .ok_or_else(|| "OPENAI_API_KEY is not set".to_string())?;

    let mut prompts = args.prompts;
    if prompts.is_empty() {
        let domain = args
            .domain
            .ok_or_else(|| "pass --prompt or --domain".to_string())?;
        let content = ContentSource::new(config.content.clone()).map_err(|err| err.to_string())?;
        let keywords = prepare_keywords(
            Some(&engine),
            &content,
            &args.brand,
            &domain,
            config.analysis.max_keywords,
        )
        .await;
        println!("Keywords: {}", keywords.join(", "));
        prompts = prepare_prompts(&engine, &args.brand, &keywords, config).await;
    }
    prompts.truncate(config.analysis.max_prompts);

    let platforms = if args.platforms.is_empty() {
        config.analysis.platforms.clone()
    } else {
        args.platforms
    };
    let plan = AnalysisPlan {
        brand: args.brand,
        prompts,
        platforms,
        runs: args.runs.unwrap_or(config.analysis.runs_per_prompt).max(1),
    };

    let evaluator = ResponseEvaluator::new(config.analysis.preview_chars);
    let report = run_analysis(&engine, &evaluator, &plan, None).await;

    if args.json {
        return print_json(&report.metrics.rounded());
    }
    if args.details {
        for record in &report.records {
            print_record(record, false);
            println!();
        }
    }
    print_metrics(&report.metrics);
    Ok(())
}

fn run_config_init(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    VisibilityConfig::default()
        .write(path)
        .map_err(|err| err.to_string())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn print_record(record: &ResponseRecord, with_components: bool) {
    println!("{} | {}", record.platform, record.prompt);
    if let Some(error) = record.error() {
        println!("  No data: {}", error);
        return;
    }
    println!(
        "  Visibility score: {} ({})",
        format_float(record.visibility_score, 1),
        VisibilityTier::from_score(record.visibility_score).label()
    );
    println!(
        "  Mentioned: {} | mentions {} | position {} | citations {} | sentiment {} | runs {}",
        record.brand_mentioned,
        record.mention_count,
        record
            .position
            .map(|position| format!("#{}", position))
            .unwrap_or_else(|| "unranked".to_string()),
        record.citation_count,
        record.sentiment.label(),
        record.runs_completed
    );

    if with_components {
        let components = ScoreComponents::from_inputs(&ScoreInputs {
            mentioned: record.brand_mentioned,
            position: record.position,
            mention_count: record.mention_count,
            citation_count: record.citation_count,
            sentiment: record.sentiment,
            runs_completed: record.runs_completed,
        });
        println!(
            "  Components: presence {} | position {} | mentions {} | citations {} | sentiment {} | reliability {}",
            format_float(components.presence, 1),
            format_float(components.position, 1),
            format_float(components.mentions, 1),
            format_float(components.citations, 1),
            format_float(components.sentiment, 1),
            format_float(components.reliability, 1)
        );
    }
}

fn print_metrics(metrics: &BrandMetrics) {
    println!(
        "Visibility for {}: {} ({})",
        metrics.brand_name,
        format_percent(metrics.visibility_percentage),
        VisibilityTier::from_score(metrics.visibility_percentage).label()
    );
    println!(
        "Mentioned in {} of {} responses | average position {} | sentiment {}",
        metrics.mentions,
        metrics.total_prompts,
        format_position(metrics.average_position),
        format_float(metrics.sentiment_score, 2)
    );
    if metrics.no_data_records > 0 {
        println!("No data for {} responses", metrics.no_data_records);
    }
    println!(
        "Positions: top 3 {} | 4-10 {} | beyond 10 {}",
        metrics.position_distribution.top_3,
        metrics.position_distribution.top_10,
        metrics.position_distribution.beyond_10
    );
    println!(
        "Scores: min {} | max {} | variance {}",
        format_float(metrics.score_breakdown.min_score, 1),
        format_float(metrics.score_breakdown.max_score, 1),
        format_float(metrics.score_breakdown.score_variance, 2)
    );

    if !metrics.platform_breakdown.is_empty() {
        println!("\nPlatforms:");
        for (platform, breakdown) in &metrics.platform_breakdown {
            println!(
                "  {}: score {} | visibility {} ({}/{}) | position {}",
                platform,
                format_float(breakdown.avg_score, 1),
                format_percent(breakdown.visibility_rate),
                breakdown.mentions,
                breakdown.total_queries,
                format_position(breakdown.avg_position)
            );
        }
    }

    if !metrics.recommendations.is_empty() {
        println!("\nRecommendations:");
        for recommendation in &metrics.recommendations {
            println!("- {}", recommendation);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn read_stdin() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("missing answer text: pass --answer or pipe stdin".to_string());
    }
    Ok(trimmed.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
