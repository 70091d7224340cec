use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::{PipenetError, PipenetResult};

/// Microseconds since the unix epoch, UTC.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as i64;
        Self(micros)
    }

    /// Accepts RFC 3339 date-times and bare `YYYY-MM-DD` dates (midnight UTC).
    pub fn parse(value: &str) -> PipenetResult<Self> {
        let trimmed = value.trim();
        if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self::from_offset(parsed));
        }
        let date = Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
            .map_err(|err| PipenetError::invalid_value(format!("invalid date '{value}': {err}")))?;
        Ok(Self::from_offset(
            PrimitiveDateTime::new(date, time::Time::MIDNIGHT).assume_utc(),
        ))
    }

    pub fn from_offset(value: OffsetDateTime) -> Self {
        Self((value.unix_timestamp_nanos() / 1_000) as i64)
    }

    pub fn to_rfc3339(self) -> PipenetResult<String> {
        let odt = OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * 1_000)
            .map_err(|err| PipenetError::invalid_value(err.to_string()))?;
        odt.format(&Rfc3339)
            .map_err(|err| PipenetError::invalid_value(err.to_string()))
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }
}
