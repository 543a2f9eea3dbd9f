//! Time domain model
//!
//! A `Time` is whole seconds since the Unix epoch, limited to
//! `[1970-01-01T00:00:00Z, 2100-01-01T00:00:00Z)`. Zones are applied only
//! when rendering; stored state is always UTC.

use std::fmt::{self, Display, Formatter, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, Local, SecondsFormat, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::result::{Error, Result};
use super::timezone::Timezone;

/// Earliest supported epoch (inclusive)
pub const MIN_EPOCH: i64 = 0;

/// 2100-01-01T00:00:00Z (exclusive)
pub const MAX_EPOCH: i64 = 4_102_444_800;

/// Output layout for [`Time::format`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Layout<'a> {
    /// `2022-01-01T00:00:00Z`, or `+09:00` style offsets outside UTC
    #[default]
    Rfc3339,
    /// `Sat, 1 Jan 2022 00:00:00 +0000`
    Rfc2822,
    /// A strftime pattern such as `%Y-%m-%d %H:%M %Z`
    Strftime(&'a str),
}

impl<'a> From<&'a str> for Layout<'a> {
    fn from(pattern: &'a str) -> Self {
        Layout::Strftime(pattern)
    }
}

/// Epoch-seconds timestamp within the supported window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    epoch: i64,
}

impl Time {
    pub fn new(epoch: i64) -> Result<Self> {
        let time = Self { epoch };
        time.validate()?;
        Ok(time)
    }

    pub fn now() -> Result<Self> {
        Self::from_datetime(&Utc::now())
    }

    /// Convert a native date-time; sub-second precision is dropped
    pub fn from_datetime<Z: TimeZone>(value: &DateTime<Z>) -> Result<Self> {
        Self::new(value.timestamp())
    }

    /// Parse an RFC 3339 string such as `2022-01-01T09:00:00+09:00`
    pub fn parse_rfc3339(input: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(input)
            .map_err(|e| Error::decode(format!("invalid RFC 3339 time '{input}': {e}")))?;
        Self::from_datetime(&parsed)
    }

    /// Native date-time in UTC
    pub fn to_datetime(&self) -> DateTime<Utc> {
        // always representable inside the supported window
        DateTime::from_timestamp(self.epoch, 0).unwrap_or_default()
    }

    pub fn epoch(&self) -> i64 {
        self.epoch
    }

    pub fn to_primitive(&self) -> i64 {
        self.epoch
    }

    pub fn from_primitive(epoch: i64) -> Result<Self> {
        Self::new(epoch)
    }

    pub fn validate(&self) -> Result<()> {
        if self.epoch < MIN_EPOCH {
            return Err(Error::validation(format!(
                "epoch time too early: {}",
                self.epoch
            )));
        }
        if self.epoch >= MAX_EPOCH {
            return Err(Error::validation(format!(
                "epoch time too late: {}",
                self.epoch
            )));
        }
        Ok(())
    }

    /// Render in `timezone`, or in UTC when no zone is given
    pub fn format<'a>(
        &self,
        layout: impl Into<Layout<'a>>,
        timezone: Option<&Timezone>,
    ) -> Result<String> {
        let utc = self.to_datetime();
        match timezone {
            Some(zone) => render(&utc.with_timezone(&zone.rules()), layout.into()),
            None => render(&utc, layout.into()),
        }
    }

    pub fn format_utc<'a>(&self, layout: impl Into<Layout<'a>>) -> Result<String> {
        self.format(layout, None)
    }

    /// Render in the process's local zone
    pub fn format_local<'a>(&self, layout: impl Into<Layout<'a>>) -> Result<String> {
        render(&self.to_datetime().with_timezone(&Local), layout.into())
    }

    pub fn is_zero(&self) -> bool {
        self.epoch == 0
    }

    /// Absent comparands are never equal
    pub fn equal(&self, other: Option<&Time>) -> bool {
        other.is_some_and(|other| other.epoch == self.epoch)
    }

    /// Equality where either side may be absent; `None` never equals anything,
    /// including another `None`.
    pub fn equal_opt(lhs: Option<&Time>, rhs: Option<&Time>) -> bool {
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => lhs.epoch == rhs.epoch,
            _ => false,
        }
    }

    pub fn before(&self, other: &Time) -> bool {
        self.epoch < other.epoch
    }

    pub fn after(&self, other: &Time) -> bool {
        self.epoch > other.epoch
    }

    /// Shift by the duration's whole seconds (truncated toward zero)
    pub fn add(&self, duration: Duration) -> Result<Time> {
        let shift = duration.num_seconds();
        let epoch = self.epoch.checked_add(shift).ok_or_else(|| {
            Error::validation(format!(
                "epoch time too {}: {} + {}s",
                if shift < 0 { "early" } else { "late" },
                self.epoch,
                shift
            ))
        })?;
        Time::new(epoch)
    }

    /// Signed distance `self - other`
    pub fn sub(&self, other: &Time) -> Duration {
        Duration::seconds(self.epoch - other.epoch)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_datetime().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

fn render<Z>(value: &DateTime<Z>, layout: Layout<'_>) -> Result<String>
where
    Z: TimeZone,
    Z::Offset: Display,
{
    match layout {
        Layout::Rfc3339 => Ok(value.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Layout::Rfc2822 => Ok(value.to_rfc2822()),
        Layout::Strftime(pattern) => {
            let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
            if items.iter().any(|item| matches!(item, Item::Error)) {
                return Err(Error::validation(format!("invalid time layout: {pattern}")));
            }
            let mut out = String::new();
            write!(out, "{}", value.format_with_items(items.iter()))
                .map_err(|_| Error::validation(format!("invalid time layout: {pattern}")))?;
            Ok(out)
        }
    }
}

// ============================================================================
// Wire format: a bare epoch number, or the same digits in quotes
// ============================================================================

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.epoch)
    }
}

struct EpochVisitor;

impl<'de> Visitor<'de> for EpochVisitor {
    type Value = Time;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("an epoch in whole seconds, as a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Time, E> {
        Time::new(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Time, E> {
        let epoch = i64::try_from(value)
            .map_err(|_| E::custom(format!("epoch time too late: {value}")))?;
        self.visit_i64(epoch)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Time, E> {
        if value.fract() != 0.0 || !value.is_finite() {
            return Err(E::custom(format!(
                "epoch must be a whole number of seconds, got {value}"
            )));
        }
        if value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return Err(E::custom(format!("epoch out of range: {value}")));
        }
        self.visit_i64(value as i64)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Time, E> {
        // `i64::from_str` also takes a leading `+`
        if !value.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(E::custom(format!("epoch must be numeric, got '{value}'")));
        }
        let epoch = value
            .parse::<i64>()
            .map_err(|_| E::custom(format!("epoch must be numeric, got '{value}'")))?;
        self.visit_i64(epoch)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EpochVisitor)
    }
}
