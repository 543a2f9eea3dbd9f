//! Moneta Core - money and time value objects for business services
//!
//! This crate provides exact monetary arithmetic and safe time values:
//!
//! - **domain**: Value types (Currency, Money, Time, Timezone) and the error taxonomy
//! - **config**: Settings for extra currencies and default rendering
//!
//! Money is always stored as integer minor units; Time is always stored as
//! UTC epoch seconds. Zones and decimal views exist only at the edges.

pub mod config;
pub mod domain;

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use config::Config;

// Re-export commonly used types at crate root
pub use domain::result::{Error, ErrorKind, OperationResult};
pub use domain::{
    Currency, CurrencyRegistry, CurrencyRegistryBuilder, Layout, Money, Time, Timezone,
};

/// Main context for collaborators that want configured lookups
///
/// Holds the loaded configuration, the frozen currency registry built from
/// it, and the resolved default timezone.
#[derive(Debug, Clone)]
pub struct MonetaContext {
    pub config: Config,
    pub registry: CurrencyRegistry,
    pub timezone: Option<Timezone>,
}

impl MonetaContext {
    /// Create a new context from the settings in `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        let config = Config::load(dir)?;
        let registry = config.registry()?;
        let timezone = config.timezone()?;

        debug!(
            currencies = registry.len(),
            timezone = timezone.map(|tz| tz.id()).unwrap_or("UTC"),
            "moneta context ready"
        );

        Ok(Self {
            config,
            registry,
            timezone,
        })
    }

    /// Look up a currency in the configured registry
    pub fn currency(&self, code: &str) -> domain::result::Result<Currency> {
        self.registry.lookup(code)
    }

    /// Build money from minor units in a configured currency
    pub fn money(&self, minor_units: i64, code: &str) -> domain::result::Result<Money> {
        Money::from_integer(minor_units, self.currency(code)?)
    }

    /// Render a time with the configured layout and default timezone
    pub fn format_time(&self, time: &Time) -> domain::result::Result<String> {
        let layout = self
            .config
            .time_layout
            .as_deref()
            .map(Layout::Strftime)
            .unwrap_or_default();
        time.format(layout, self.timezone.as_ref())
    }
}
