//! Timezone resolver

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Offset, TimeZone};
use chrono_tz::Tz;

use super::result::{Error, Result};
use super::time::Time;

/// IANA zone rules resolved from an identifier such as `America/New_York`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timezone {
    tz: Tz,
}

impl Timezone {
    pub fn from_id(id: &str) -> Result<Self> {
        id.trim()
            .parse::<Tz>()
            .map(|tz| Self { tz })
            .map_err(|_| Error::UnknownTimezone(id.to_string()))
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    pub fn id(&self) -> &'static str {
        self.tz.name()
    }

    /// Seconds east of UTC in effect at `time`
    pub fn offset_seconds_at(&self, time: Time) -> i32 {
        self.tz
            .offset_from_utc_datetime(&time.to_datetime().naive_utc())
            .fix()
            .local_minus_utc()
    }

    pub(crate) fn rules(&self) -> Tz {
        self.tz
    }
}

impl FromStr for Timezone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_id(s)
    }
}

impl Display for Timezone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
