//! Lending policy and configuration loading.
//!
//! Values are layered from built-in defaults, an optional `library.yaml` in
//! the working directory, an explicit file, and finally `LIBRARY__*`
//! environment variables.

use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    error::{LibraryError, LibraryResult},
    money::Money,
};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "library.yaml";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "LIBRARY";
/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "LIBRARY_LOG";

/// Standard loan period in days.
pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;
/// Standard fine per day overdue, in cents.
pub const DEFAULT_DAILY_FINE_CENTS: u64 = 50;

/// Loan period and fine rate applied by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LendingPolicy {
    /// Days between checkout and due date
    pub loan_period_days: u32,
    /// Fine charged per full day past the due date, in cents
    pub daily_fine_cents: u64,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            daily_fine_cents: DEFAULT_DAILY_FINE_CENTS,
        }
    }
}

impl LendingPolicy {
    /// The daily fine as money
    #[must_use]
    pub const fn daily_fine(&self) -> Money {
        Money::from_cents(self.daily_fine_cents)
    }

    /// Due date for a loan starting on `checkout_date`.
    ///
    /// Saturates at the last representable date.
    #[must_use]
    pub fn due_date(&self, checkout_date: NaiveDate) -> NaiveDate {
        checkout_date
            .checked_add_days(Days::new(u64::from(self.loan_period_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Fine owed for `days` full days past the due date
    #[must_use]
    pub const fn fine_for_days(&self, days: u64) -> Money {
        self.daily_fine().times(days)
    }

    /// Reject policies the ledger cannot work with
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Config` if the loan period is zero.
    pub fn validate(&self) -> LibraryResult<()> {
        if self.loan_period_days == 0 {
            return Err(LibraryError::Config("loan_period_days must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Rules for loans and fines
    pub lending: LendingPolicy,
    /// Fixture file used to seed the stores; the built-in sample when unset
    pub fixtures: Option<PathBuf>,
}

impl LibraryConfig {
    /// Load configuration from the default file, an optional explicit file
    /// and the environment.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Config` if an explicit file is missing, a source
    /// cannot be parsed, or the resulting policy is invalid.
    pub fn load(path: Option<&Path>) -> LibraryResult<Self> {
        use ::config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::from(config_path).required(true));
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX).separator("__").try_parsing(true),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| LibraryError::Config(e.to_string()))?;

        config.lending.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[allow(clippy::expect_used)]
    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_default_policy() {
        let policy = LendingPolicy::default();
        assert_eq!(policy.loan_period_days, 14);
        assert_eq!(policy.daily_fine(), Money::from_cents(50));
        assert_eq!(policy.due_date(date(2024, 1, 10)), date(2024, 1, 24));
        assert_eq!(policy.fine_for_days(7), Money::from_cents(350));
    }

    #[test]
    fn test_zero_loan_period_is_rejected() {
        let policy = LendingPolicy { loan_period_days: 0, ..LendingPolicy::default() };
        assert!(matches!(policy.validate(), Err(LibraryError::Config(_))));
    }

    #[test]
    fn test_load_from_explicit_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        writeln!(file, "lending:\n  loan_period_days: 21\n  daily_fine_cents: 25")?;

        let config = LibraryConfig::load(Some(file.path()))?;
        assert_eq!(config.lending.loan_period_days, 21);
        assert_eq!(config.lending.daily_fine_cents, 25);
        assert_eq!(config.fixtures, None);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = LibraryConfig::load(Some(Path::new("/nonexistent/library.yaml")));
        assert!(matches!(result, Err(LibraryError::Config(_))));
    }
}
