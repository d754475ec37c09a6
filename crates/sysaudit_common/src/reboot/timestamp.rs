//! Year-less syslog timestamps
//!
//! Classic syslog lines start with "Mar  3 04:05:06" and carry no year. The
//! year is guessed against a reference "now": the newest year that does not put
//! the line more than `skew` past now.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AuditError, Result};

static PREFIX_RE: OnceLock<Regex> = OnceLock::new();

fn prefix_re() -> &'static Regex {
    PREFIX_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{3})\s+([0-9]+)\s+([0-9]+):([0-9]+):([0-9]+)")
            .expect("syslog prefix regex is valid")
    })
}

/// Month, day and time of day as written in the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyslogStamp {
    pub month: u32,
    pub day: u32,
    pub time: NaiveTime,
}

fn month_number(abbrev: &str) -> Option<u32> {
    let month = match abbrev.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn malformed(line: &str, reason: impl Into<String>) -> AuditError {
    AuditError::MalformedTimestamp {
        line: line.to_string(),
        reason: reason.into(),
    }
}

/// Parse the timestamp prefix of a syslog line.
///
/// The day must exist in that month in some year (Feb 29 is accepted), and the
/// time of day must be a real wall-clock time.
pub fn parse_prefix(line: &str) -> Result<SyslogStamp> {
    let caps = prefix_re()
        .captures(line)
        .ok_or_else(|| malformed(line, "no 'Mon DD HH:MM:SS' prefix"))?;

    let month = month_number(&caps[1])
        .ok_or_else(|| malformed(line, format!("unknown month '{}'", &caps[1])))?;

    let number = |idx: usize| -> Result<u32> {
        caps[idx]
            .parse::<u32>()
            .map_err(|_| malformed(line, format!("field '{}' out of range", &caps[idx])))
    };
    let day = number(2)?;
    let (hour, minute, second) = (number(3)?, number(4)?, number(5)?);

    // 2000 is a leap year, so this accepts every day that exists in any year
    if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
        return Err(malformed(line, format!("day {} does not exist in month {}", day, month)));
    }
    let time = NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| malformed(line, format!("invalid time {}:{}:{}", hour, minute, second)))?;

    Ok(SyslogStamp { month, day, time })
}

/// Largest accepted clock skew: one leap year
pub const MAX_CLOCK_SKEW_HOURS: i64 = 24 * 366;

/// Resolves year-less stamps against a fixed reference instant
#[derive(Debug, Clone, Copy)]
pub struct TimestampResolver {
    now: NaiveDateTime,
    limit: NaiveDateTime,
}

impl TimestampResolver {
    /// `skew_hours` must lie in `0..=MAX_CLOCK_SKEW_HOURS`
    pub fn new(now: NaiveDateTime, skew_hours: i64) -> Result<Self> {
        if !(0..=MAX_CLOCK_SKEW_HOURS).contains(&skew_hours) {
            return Err(AuditError::Config(format!(
                "clock_skew_hours must be between 0 and {}, got {}",
                MAX_CLOCK_SKEW_HOURS, skew_hours
            )));
        }
        let limit = Duration::try_hours(skew_hours)
            .and_then(|skew| now.checked_add_signed(skew))
            .ok_or_else(|| {
                AuditError::Config(format!("{} + {}h is out of range", now, skew_hours))
            })?;
        Ok(Self { now, limit })
    }

    /// Latest instant a resolved stamp may have
    pub fn limit(&self) -> NaiveDateTime {
        self.limit
    }

    /// Resolve the timestamp at the start of `line` to a full instant
    pub fn resolve(&self, line: &str) -> Result<NaiveDateTime> {
        let stamp = parse_prefix(line)?;
        Ok(self.resolve_stamp(stamp))
    }

    /// Walk back from now's year until the candidate is not in the future.
    /// Years where the date does not exist (Feb 29) are skipped.
    pub fn resolve_stamp(&self, stamp: SyslogStamp) -> NaiveDateTime {
        let mut year = self.now.year();
        loop {
            if let Some(date) = NaiveDate::from_ymd_opt(year, stamp.month, stamp.day) {
                let candidate = date.and_time(stamp.time);
                if candidate <= self.limit {
                    return candidate;
                }
            }
            year -= 1;
        }
    }
}
