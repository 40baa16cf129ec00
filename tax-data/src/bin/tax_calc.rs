use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tax_core::{AssessmentYear, CalculationError, PolicyBook, calculate_from_book};
use tax_data::{AppConfig, OutputFormat, PolicyLoader, income_loader, logging};
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income-tax calculator.
///
/// Loads year-keyed tax policies and a taxpayer's income entries, then
/// prints the itemized tax for the requested assessment year. Flags
/// override values from the config file.
#[derive(Debug, Parser)]
#[command(name = "tax-calc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Policy file (.json or .csv)
    #[arg(short, long)]
    policies: Option<PathBuf>,

    /// Income entries CSV file
    #[arg(short, long)]
    income: Option<PathBuf>,

    /// Assessment year, e.g. 2024/2025
    #[arg(short, long)]
    year: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Log filter, e.g. `debug` or `tax_core=trace`
    #[arg(long)]
    log_level: Option<String>,

    /// Append log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// List the assessment years in the policy file and exit
    #[arg(long, default_value_t = false)]
    list_years: bool,
}

impl Cli {
    fn overrides(&self) -> AppConfig {
        AppConfig {
            policy_file: self.policies.clone(),
            income_file: self.income.clone(),
            assessment_year: self.year.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
            output: self.output,
        }
    }
}

fn available_years(book: &PolicyBook) -> String {
    let years: Vec<_> = book.years().iter().map(|y| y.as_str()).collect();
    if years.is_empty() {
        "none".to_string()
    } else {
        years.join(", ")
    }
}

fn load_book(config: &AppConfig) -> Result<PolicyBook> {
    let Some(path) = config.policy_file.as_deref() else {
        bail!("Policy file is required.");
    };
    PolicyLoader::from_path(path)
        .with_context(|| format!("Failed to load policies: {}", path.display()))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init_logging(tax_data::config::DEFAULT_LOG_LEVEL);

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AppConfig::default(),
    };
    let config = file_config.with_overrides(cli.overrides());

    if config.log_level.is_some() {
        logging::set_log_level(config.log_level())?;
    }
    if let Some(log_file) = &config.log_file {
        logging::enable_file_logging(log_file)?;
    }
    debug!("effective config:\n{}", config);

    if cli.list_years {
        let book = load_book(&config)?;
        for year in book.years() {
            println!("{year}");
        }
        return Ok(());
    }

    if let Err(errors) = config.validate_for_run() {
        bail!(errors.join("\n"));
    }

    let book = load_book(&config)?;

    let income_path = config
        .income_file
        .as_deref()
        .context("Income file is required.")?;
    let entries = income_loader::load_from_file(income_path)
        .with_context(|| format!("Failed to load income: {}", income_path.display()))?;

    let year = AssessmentYear::parse(config.assessment_year.as_deref().unwrap_or_default())?;

    let result = match calculate_from_book(&year, &entries, &book) {
        Ok(result) => result,
        Err(e @ CalculationError::PolicyNotFound(_)) => {
            bail!("{e} (available: {})", available_years(&book));
        }
    };

    match config.output_format() {
        OutputFormat::Text => println!("{result}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        ),
    }

    Ok(())
}
