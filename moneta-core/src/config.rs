//! Configuration management
//!
//! Settings live in `settings.json` inside the application directory:
//! ```json
//! {
//!   "money": { "currencies": [ { "code": "PTS", "symbol": "pts ", "name": "Points", "decimalPlaces": 0 } ] },
//!   "time": { "defaultTimezone": "Europe/Berlin", "layout": "%Y-%m-%d %H:%M" }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Currency, CurrencyRegistry, Timezone};

/// Environment variable that overrides `time.defaultTimezone`
pub const TIMEZONE_ENV: &str = "MONETA_TIMEZONE";

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    money: MoneySettings,
    #[serde(default)]
    time: TimeSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneySettings {
    #[serde(default)]
    currencies: Vec<CurrencySettings>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layout: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// A currency declared in settings, on top of the canonical table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySettings {
    pub code: String,
    pub symbol: String,
    pub name: String,
    pub decimal_places: u32,
}

impl From<&Currency> for CurrencySettings {
    fn from(currency: &Currency) -> Self {
        Self {
            code: currency.code().to_string(),
            symbol: currency.symbol().to_string(),
            name: currency.name().to_string(),
            decimal_places: currency.decimal_places(),
        }
    }
}

/// Moneta configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub currencies: Vec<CurrencySettings>,
    pub default_timezone: Option<String>,
    pub time_layout: Option<String>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the application directory
    ///
    /// The default timezone can be set via:
    /// 1. Settings file (`time.defaultTimezone`)
    /// 2. Environment variable MONETA_TIMEZONE, which wins over the file
    pub fn load(dir: &Path) -> Result<Self> {
        let settings_path = dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            debug!(path = %settings_path.display(), "loading settings");
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %settings_path.display(), error = %e, "ignoring unparsable settings");
                SettingsFile::default()
            })
        } else {
            SettingsFile::default()
        };

        let default_timezone = match std::env::var(TIMEZONE_ENV).ok() {
            Some(id) if !id.trim().is_empty() => {
                debug!(timezone = %id, "timezone overridden by {}", TIMEZONE_ENV);
                Some(id.trim().to_string())
            }
            _ => raw.time.default_timezone.clone(),
        };

        Ok(Self {
            currencies: raw.money.currencies.clone(),
            default_timezone,
            time_layout: raw.time.layout.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the application directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, dir: &Path) -> Result<()> {
        let settings_path = dir.join(SETTINGS_FILE);

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        // Update only the fields we manage
        settings.money.currencies = self.currencies.clone();
        settings.time.default_timezone = self.default_timezone.clone();
        settings.time.layout = self.time_layout.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("failed to write {}", settings_path.display()))?;
        Ok(())
    }

    /// Declare an extra currency
    pub fn add_currency(&mut self, currency: &Currency) {
        self.currencies
            .retain(|existing| !existing.code.eq_ignore_ascii_case(currency.code()));
        self.currencies.push(CurrencySettings::from(currency));
    }

    /// Canonical currencies plus those declared in settings
    pub fn registry(&self) -> Result<CurrencyRegistry> {
        let mut builder = CurrencyRegistry::with_canonical();
        for entry in &self.currencies {
            let currency = Currency::new(
                entry.code.as_str(),
                entry.symbol.as_str(),
                entry.name.as_str(),
                entry.decimal_places,
            )
            .with_context(|| format!("invalid currency '{}' in settings", entry.code))?;
            debug!(code = %currency.code(), places = currency.decimal_places(), "registering configured currency");
            builder = builder.register(currency)?;
        }
        Ok(builder.build())
    }

    /// Resolve the configured default timezone, if any
    pub fn timezone(&self) -> Result<Option<Timezone>> {
        self.default_timezone
            .as_deref()
            .map(|id| Timezone::from_id(id).context("invalid default timezone in settings"))
            .transpose()
    }
}
