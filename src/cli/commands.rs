//! CLI command definitions for question-forge.
//!
//! `validate` checks a bank and sets the exit status from the verdict,
//! `clean` removes placeholder questions and refreshes metadata, `stats`
//! prints the bank distribution.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use crate::bank::{BankDistribution, QuestionBank};
use crate::config::BankConfig;
use crate::maintenance::{BankCleaner, CleanSummary};
use crate::validation::{QuestionBankValidator, ValidationReport};

/// Default location of the question bank document.
const DEFAULT_INPUT: &str = "data/questions.json";

/// Validator and maintenance tool for quiz question banks.
#[derive(Parser, Debug)]
#[command(name = "question-forge")]
#[command(about = "Validate and maintain JSON quiz question banks")]
#[command(version)]
#[command(
    long_about = "question-forge checks a question bank (course → chapters → questions) against the per-type schema and reports errors and quality warnings.\n\nExample usage:\n  question-forge validate --input data/questions.json\n  question-forge clean --dry-run"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// YAML configuration file.
    #[arg(short, long, global = true, env = "QBANK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Validate every question and print the report.
    ///
    /// Exits with status 1 when any error is found. Warnings never change
    /// the exit status.
    #[command(alias = "check")]
    Validate(ValidateArgs),

    /// Remove placeholder questions and recompute counts and metadata.
    Clean(CleanArgs),

    /// Show chapter, difficulty and type distribution.
    Stats(StatsArgs),
}

/// Arguments for `question-forge validate`.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Question bank to validate.
    #[arg(short = 'i', long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Only accept the five core question types.
    #[arg(long)]
    pub strict_types: bool,

    /// Minimum prompt length, in characters, before a warning is issued.
    #[arg(long)]
    pub min_prompt_length: Option<usize>,

    /// Maximum errors and warnings listed in the text report.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output the report as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `question-forge clean`.
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Question bank to clean.
    #[arg(short = 'i', long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Write the cleaned bank here instead of rewriting the input.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Also remove `points` from flashcards.
    #[arg(long)]
    pub strip_flashcard_points: bool,

    /// Report what would change without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Output the summary as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `question-forge stats`.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Question bank to inspect.
    #[arg(short = 'i', long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Output the distribution as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
///
/// For control over logging initialization, use `parse_cli()` and
/// `run_with_cli()`.
pub fn run() -> anyhow::Result<ExitCode> {
    run_with_cli(parse_cli())
}

/// Run the CLI with the parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = BankConfig::load(cli.config.as_deref())?;

    let success = match cli.command {
        Commands::Validate(args) => run_validate_command(args, config)?,
        Commands::Clean(args) => run_clean_command(args, config)?,
        Commands::Stats(args) => run_stats_command(args)?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[derive(Debug, Serialize)]
struct ValidateOutput<'a> {
    status: &'static str,
    input: String,
    report: &'a ValidationReport,
}

fn run_validate_command(args: ValidateArgs, config: BankConfig) -> anyhow::Result<bool> {
    let mut config = config;
    if args.strict_types {
        config = config.with_extended_types(false);
    }
    if let Some(length) = args.min_prompt_length {
        config = config.with_min_prompt_length(length);
    }
    if let Some(limit) = args.limit {
        config = config.with_report_limit(limit);
    }
    config.validate()?;

    let bank = QuestionBank::load(&args.input)?;
    let report = validate_bank(&bank, &config);

    if args.json {
        let output = ValidateOutput {
            status: if report.passed() { "passed" } else { "failed" },
            input: args.input.display().to_string(),
            report: &report,
        };
        let json_output = serde_json::to_string_pretty(&output)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
    } else {
        print!("{}", report.render(config.validation.report_limit));
    }

    Ok(report.passed())
}

/// Validates a loaded bank with the given configuration.
pub fn validate_bank(bank: &QuestionBank, config: &BankConfig) -> ValidationReport {
    QuestionBankValidator::new(&config.validation).validate(bank)
}

#[derive(Debug, Serialize)]
struct CleanOutput<'a> {
    status: &'static str,
    input: String,
    output: Option<String>,
    dry_run: bool,
    summary: &'a CleanSummary,
}

fn run_clean_command(args: CleanArgs, config: BankConfig) -> anyhow::Result<bool> {
    let mut config = config;
    if args.strip_flashcard_points {
        config = config.with_strip_flashcard_points(true);
    }
    config.validate()?;

    let mut bank = QuestionBank::load(&args.input)?;
    let cleaner = BankCleaner::from_settings(&config.maintenance)?;
    let summary = cleaner.clean(&mut bank, chrono::Local::now().naive_local());

    let destination = args.output.as_deref().unwrap_or(&args.input);
    let written = if args.dry_run {
        info!("Dry run, not writing {}", destination.display());
        None
    } else {
        bank.save(destination)?;
        info!(path = %destination.display(), "Wrote cleaned question bank");
        Some(destination.display().to_string())
    };

    if args.json {
        let output = CleanOutput {
            status: if summary.changed() { "cleaned" } else { "unchanged" },
            input: args.input.display().to_string(),
            output: written,
            dry_run: args.dry_run,
            summary: &summary,
        };
        let json_output = serde_json::to_string_pretty(&output)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
        return Ok(true);
    }

    print_clean_summary(&summary, written.as_deref(), args.dry_run);
    Ok(true)
}

fn print_clean_summary(summary: &CleanSummary, written: Option<&str>, dry_run: bool) {
    println!("\n🧹 Question Bank Cleanup");
    println!("========================");
    for chapter in summary.chapters.iter().filter(|c| c.removed() > 0) {
        println!(
            "  Chapter {}: {} → {} questions ({} removed)",
            chapter.chapter_id,
            chapter.before,
            chapter.after,
            chapter.removed()
        );
    }
    println!("Placeholder questions removed: {}", summary.removed);
    if summary.flashcard_points_stripped > 0 {
        println!(
            "Flashcards without points:     {}",
            summary.flashcard_points_stripped
        );
    }
    println!("Total questions:               {}", summary.total_questions);

    match written {
        Some(path) => println!("\n✓ Saved to {}", path),
        None if dry_run => println!("\n(dry run, nothing written)"),
        None => {}
    }
}

fn run_stats_command(args: StatsArgs) -> anyhow::Result<bool> {
    let bank = QuestionBank::load(&args.input)?;
    let distribution = BankDistribution::from_bank(&bank);

    if distribution.total == 0 {
        warn!("Question bank {} holds no questions", args.input.display());
    }

    if args.json {
        let json_output = serde_json::to_string_pretty(&distribution)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
        return Ok(true);
    }

    print_distribution(&args.input, &distribution);
    Ok(true)
}

fn print_distribution(input: &Path, distribution: &BankDistribution) {
    println!("\n📚 {}", input.display());
    println!("Total questions: {}", distribution.total);

    println!("\nBy chapter:");
    for chapter in &distribution.chapters {
        println!(
            "  {:>2}. {:<40} {}",
            chapter.chapter_id, chapter.title, chapter.questions
        );
    }

    println!("\nBy difficulty:");
    for (level, count) in &distribution.difficulties {
        println!(
            "  {:<15} {:>4} ({:.1}%)",
            level,
            count,
            distribution.percentage(*count)
        );
    }

    println!("\nBy type:");
    for (kind, count) in &distribution.types {
        println!(
            "  {:<15} {:>4} ({:.1}%)",
            kind,
            count,
            distribution.percentage(*count)
        );
    }
}
