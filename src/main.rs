use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use healthage::config::AppConfig;
use healthage::export::{self, ExportFormat};
use healthage::logging::{init_logging, LogLevel};
use healthage::{
    compute_health_age, evaluate_batch, Gender, HealthAgeInput, HealthAgeResult, ImportManager,
};

/// healthage - Body-composition health age calculator
///
/// Estimates a health age from a body-composition scan (body fat, visceral fat and lean
/// mass) and reports it relative to chronological age.
#[derive(Parser)]
#[command(name = "healthage")]
#[command(version)]
#[command(about = "Body-composition health age calculator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the health age for a single measurement
    Compute {
        /// Chronological age in years (10-99)
        #[arg(short, long)]
        age: f64,

        /// Gender (male/female)
        #[arg(short, long)]
        gender: Gender,

        /// Body fat percentage
        #[arg(short, long = "body-fat")]
        body_fat: f64,

        /// Visceral fat level
        #[arg(long = "visceral-fat")]
        visceral_fat: f64,

        /// Height in cm
        #[arg(long)]
        height: Option<f64>,

        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Measured fat-free mass in kg
        #[arg(long)]
        ffm: Option<f64>,

        /// Skeletal muscle mass in kg
        #[arg(long)]
        smm: Option<f64>,

        /// Skeletal muscle index
        #[arg(long)]
        smi: Option<f64>,

        /// Override muscle classification (true/false)
        #[arg(long = "muscle-above-standard")]
        muscle_above_standard: Option<bool>,

        /// Print the full result, including diagnostics, as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute health ages for every record in a JSON/CSV file or directory
    Batch {
        /// Input file or directory
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, csv, text)
        #[arg(short = 'f', long)]
        format: Option<ExportFormat>,

        /// Worker threads
        #[arg(short, long)]
        threads: Option<usize>,

        /// Abort on the first invalid record
        #[arg(long)]
        fail_fast: bool,
    },

    /// Manage configuration
    Config {
        /// Print the active configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(short, long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Compute {
            age,
            gender,
            body_fat,
            visceral_fat,
            height,
            weight,
            ffm,
            smm,
            smi,
            muscle_above_standard,
            json,
        } => {
            let input = HealthAgeInput {
                actual_age: age,
                gender,
                height_cm: height,
                weight_kg: weight,
                body_fat_percent: body_fat,
                visceral_fat_level: visceral_fat,
                ffm_kg: ffm,
                smm_kg: smm,
                smi,
                muscle_above_standard,
            };

            let result = match compute_health_age(&input) {
                Ok(result) => result,
                Err(e) => {
                    e.log("Health age computation failed");
                    eprintln!("{} {}", "✗".red().bold(), e.user_message().red());
                    return Err(e.into());
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&input, &result);
            }
        }

        Commands::Batch {
            input,
            output,
            format,
            threads,
            fail_fast,
        } => {
            let manager = ImportManager::new();
            let records = if input.is_dir() {
                manager.import_directory(&input)
            } else {
                manager.import_file(&input)
            }
            .map_err(|e| {
                e.log("Measurement import failed");
                e
            })?;

            let mut batch_config = config.batch.clone();
            if threads.is_some() {
                batch_config.num_threads = threads;
            }
            if fail_fast {
                batch_config.continue_on_error = false;
            }

            let summary = evaluate_batch(&records, &batch_config).map_err(|e| {
                e.log("Batch evaluation aborted");
                e
            })?;

            let format = format
                .or_else(|| output.as_deref().and_then(ExportFormat::from_path))
                .unwrap_or(config.output.default_format);

            match output {
                Some(path) => {
                    export::export_summary(&summary, format, &path)?;
                    println!(
                        "{} {} records written to {}",
                        "✓".green().bold(),
                        summary.total,
                        path.display()
                    );
                    if summary.failed > 0 {
                        println!(
                            "  {}",
                            format!("{} records rejected", summary.failed).yellow()
                        );
                    }
                }
                None => print!("{}", export::render(&summary, format)?),
            }
        }

        Commands::Config { show, init } => {
            if init {
                config.save_to_file(&config_path)?;
                println!(
                    "{} Configuration written to {}",
                    "✓".green().bold(),
                    config_path.display()
                );
            }
            if show || !init {
                let toml = toml::to_string_pretty(&config)
                    .context("Failed to serialize configuration")?;
                println!("{}", format!("# {}", config_path.display()).dimmed());
                println!("{}", toml);
            }
        }
    }

    Ok(())
}

fn print_result(input: &HealthAgeInput, result: &HealthAgeResult) {
    let delta = result.health_age - input.actual_age.round() as i32;
    let delta_text = format!("{:+} years", delta);
    let delta_colored = if delta < 0 {
        delta_text.green()
    } else if delta > 0 {
        delta_text.red()
    } else {
        delta_text.normal()
    };

    println!("{}", "Health age".bold());
    println!("  Actual age:  {}", input.actual_age);
    println!("  Health age:  {}", result.health_age.to_string().bold());
    println!("  Difference:  {}", delta_colored);
    println!(
        "  Athletic:    {}",
        if result.is_athletic { "yes".cyan() } else { "no".normal() }
    );
    println!("  Score:       {:.2}", result.debug.athletic_score);

    if result.debug.is_degraded() {
        println!(
            "  {}",
            "No weight or lean-mass data: reported chronological age".dimmed()
        );
    }
}
