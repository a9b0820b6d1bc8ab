//! Request quotas written as `"N/unit"`.

use crate::{RateLimitError, RateLimitErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const UNITS: &[(&str, u64)] = &[("d", 86_400_000), ("h", 3_600_000), ("m", 60_000), ("s", 1_000)];

/// A number of requests allowed per fixed window.
///
/// Parsed from strings such as `"6/minute"`, `"60/m"`, `"1000/day"` or `"10/5m"`
/// (ten per five minutes). Recognized units are `ms`, `s`/`sec`/`second`,
/// `m`/`min`/`minute`, `h`/`hour` and `d`/`day`, singular or plural.
///
/// # Examples
///
/// ```
/// use parley_rate_limit::Quota;
/// use std::time::Duration;
///
/// let quota: Quota = "6/minute".parse().unwrap();
/// assert_eq!(*quota.count(), 6);
/// assert_eq!(*quota.period(), Duration::from_secs(60));
/// assert_eq!(quota.to_string(), "6/m");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(try_from = "String", into = "String")]
pub struct Quota {
    /// Requests allowed per window
    count: u32,
    /// Window length
    period: Duration,
}

impl Quota {
    /// Creates a quota of `count` requests per `period`.
    ///
    /// # Errors
    ///
    /// Rejects a zero count or a zero-length period.
    #[track_caller]
    pub fn new(count: u32, period: Duration) -> Result<Self, RateLimitError> {
        if count == 0 || period.is_zero() {
            return Err(RateLimitError::new(RateLimitErrorKind::InvalidSpec(format!(
                "{count} per {period:?}"
            ))));
        }
        Ok(Self { count, period })
    }

    /// `count` requests per minute.
    pub fn per_minute(count: u32) -> Result<Self, RateLimitError> {
        Self::new(count, Duration::from_secs(60))
    }
}

fn unit_millis(unit: &str) -> Option<u64> {
    let millis = match unit {
        "ms" | "millis" | "millisecond" | "milliseconds" => 1,
        "s" | "sec" | "secs" | "second" | "seconds" => 1_000,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000,
        "h" | "hr" | "hour" | "hours" => 3_600_000,
        "d" | "day" | "days" => 86_400_000,
        _ => return None,
    };
    Some(millis)
}

impl FromStr for Quota {
    type Err = RateLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RateLimitError::new(RateLimitErrorKind::InvalidSpec(s.to_string()));

        let (count, per) = s.split_once('/').ok_or_else(invalid)?;
        let count: u32 = count.trim().parse().map_err(|_| invalid())?;

        let per = per.trim().to_ascii_lowercase();
        let digits = per.chars().take_while(char::is_ascii_digit).count();
        let (amount, unit) = per.split_at(digits);
        let amount: u64 = if amount.is_empty() {
            1
        } else {
            amount.parse().map_err(|_| invalid())?
        };
        let millis = unit_millis(unit.trim()).ok_or_else(invalid)?;
        let period = amount
            .checked_mul(millis)
            .map(Duration::from_millis)
            .ok_or_else(invalid)?;

        Self::new(count, period).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Quota {
    type Error = RateLimitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quota> for String {
    fn from(quota: Quota) -> Self {
        quota.to_string()
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.period.as_millis();
        let (unit, size) = UNITS
            .iter()
            .find(|(_, size)| millis % u128::from(*size) == 0)
            .map(|(unit, size)| (*unit, u128::from(*size)))
            .unwrap_or(("ms", 1));
        match millis / size {
            1 => write!(f, "{}/{}", self.count, unit),
            amount => write!(f, "{}/{}{}", self.count, amount, unit),
        }
    }
}
