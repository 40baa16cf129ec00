//! Run configuration for the `tax-calc` binary.
//!
//! Values come from an optional TOML file and are overridden by
//! command-line flags:
//!
//! ```toml
//! policy_file = "policies.json"
//! income_file = "income.csv"
//! assessment_year = "2024/2025"
//! log_level = "debug"
//! log_file = "tax-calc.log"
//! output = "json"
//! ```

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tax_core::AssessmentYear;
use thiserror::Error;

/// Log level used when neither the file nor the command line sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How a calculation result is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub policy_file: Option<PathBuf>,
    pub income_file: Option<PathBuf>,
    pub assessment_year: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub output: Option<OutputFormat>,
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Returns this config with every value set in `overrides` replacing
    /// the corresponding value here.
    pub fn with_overrides(
        self,
        overrides: AppConfig,
    ) -> Self {
        Self {
            policy_file: overrides.policy_file.or(self.policy_file),
            income_file: overrides.income_file.or(self.income_file),
            assessment_year: overrides.assessment_year.or(self.assessment_year),
            log_level: overrides.log_level.or(self.log_level),
            log_file: overrides.log_file.or(self.log_file),
            output: overrides.output.or(self.output),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    /// Validates that the config has everything a calculation needs.
    ///
    /// Rules:
    /// - policy file is required
    /// - income file is required
    /// - assessment year is required and must be `YYYY/YYYY`
    pub fn validate_for_run(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.policy_file.is_none() {
            errors.push("Policy file is required.".to_string());
        }

        if self.income_file.is_none() {
            errors.push("Income file is required.".to_string());
        }

        match self.assessment_year.as_deref() {
            None => errors.push("Assessment year is required.".to_string()),
            Some(year) => {
                if let Err(e) = AssessmentYear::parse(year) {
                    errors.push(format!("{e}."));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "—".to_string())
}

impl fmt::Display for AppConfig {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Policy file:     {}", display_path(&self.policy_file))?;
        writeln!(f, "Income file:     {}", display_path(&self.income_file))?;
        writeln!(
            f,
            "Assessment year: {}",
            self.assessment_year.as_deref().unwrap_or("—")
        )?;
        writeln!(f, "Log level:       {}", self.log_level())?;
        writeln!(f, "Log file:        {}", display_path(&self.log_file))?;
        write!(f, "Output:          {:?}", self.output_format())
    }
}
