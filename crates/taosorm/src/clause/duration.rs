//! Durations in TDengine's `<value><unit>` notation (`10m`, `300000000u`).

use crate::error::{OrmError, OrmResult};
use std::fmt;
use std::str::FromStr;

/// Time unit, written as a one-character suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    /// Natural month.
    Month,
    /// Natural year.
    Year,
}

impl Unit {
    pub const ALL: [Unit; 9] = [
        Unit::Microsecond,
        Unit::Millisecond,
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::Week,
        Unit::Month,
        Unit::Year,
    ];

    pub fn suffix(self) -> char {
        match self {
            Unit::Microsecond => 'u',
            Unit::Millisecond => 'a',
            Unit::Second => 's',
            Unit::Minute => 'm',
            Unit::Hour => 'h',
            Unit::Day => 'd',
            Unit::Week => 'w',
            Unit::Month => 'n',
            Unit::Year => 'y',
        }
    }

    pub fn from_suffix(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.suffix() == c)
    }
}

/// A magnitude and a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    pub value: u64,
    pub unit: Unit,
}

impl Duration {
    pub const fn new(value: u64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn micros(value: u64) -> Self {
        Self::new(value, Unit::Microsecond)
    }

    pub const fn millis(value: u64) -> Self {
        Self::new(value, Unit::Millisecond)
    }

    pub const fn seconds(value: u64) -> Self {
        Self::new(value, Unit::Second)
    }

    pub const fn minutes(value: u64) -> Self {
        Self::new(value, Unit::Minute)
    }

    pub const fn hours(value: u64) -> Self {
        Self::new(value, Unit::Hour)
    }

    pub const fn days(value: u64) -> Self {
        Self::new(value, Unit::Day)
    }

    /// Parse `<digits><unit>`, e.g. `5m`.
    ///
    /// Rejects strings shorter than two characters, unknown unit suffixes and
    /// non-numeric magnitudes.
    pub fn parse(s: &str) -> OrmResult<Self> {
        let mut chars = s.chars();
        let (Some(last), true) = (chars.next_back(), s.chars().count() >= 2) else {
            return Err(OrmError::invalid_duration(format!(
                "'{s}' is too short, expected <value><unit>"
            )));
        };
        let unit = Unit::from_suffix(last)
            .ok_or_else(|| OrmError::invalid_duration(format!("unit '{last}' not valid")))?;
        let digits = chars.as_str();
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrmError::invalid_duration(format!(
                "'{digits}' is not an unsigned integer"
            )));
        }
        let value = digits.parse::<u64>()?;
        Ok(Self { value, unit })
    }

    /// Microsecond duration from a `std::time::Duration`; zero is rejected.
    pub fn from_std(duration: std::time::Duration) -> OrmResult<Self> {
        if duration.is_zero() {
            return Err(OrmError::invalid_duration("duration must be positive"));
        }
        let micros = u64::try_from(duration.as_micros())
            .map_err(|_| OrmError::invalid_duration("duration overflows u64 microseconds"))?;
        Ok(Self::micros(micros))
    }

    /// Microsecond duration from a `chrono::Duration`; zero and negative
    /// durations are rejected.
    pub fn from_chrono(duration: chrono::Duration) -> OrmResult<Self> {
        if duration <= chrono::Duration::zero() {
            return Err(OrmError::invalid_duration(
                "duration does not allow negative numbers",
            ));
        }
        let micros = duration
            .num_microseconds()
            .ok_or_else(|| OrmError::invalid_duration("duration overflows i64 microseconds"))?;
        Ok(Self::micros(micros as u64))
    }

    pub(crate) fn write_to(&self, out: &mut dyn super::Builder) {
        out.write_str(&self.value.to_string());
        out.write_char(self.unit.suffix());
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for Duration {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<std::time::Duration> for Duration {
    type Error = OrmError;

    fn try_from(value: std::time::Duration) -> Result<Self, Self::Error> {
        Self::from_std(value)
    }
}

impl TryFrom<chrono::Duration> for Duration {
    type Error = OrmError;

    fn try_from(value: chrono::Duration) -> Result<Self, Self::Error> {
        Self::from_chrono(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_unit() {
        for unit in Unit::ALL {
            let s = format!("7{}", unit.suffix());
            assert_eq!(Duration::parse(&s).unwrap(), Duration::new(7, unit));
        }
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(Duration::parse("").is_err());
        assert!(Duration::parse("1").is_err());
        assert!(Duration::parse("1K").is_err());
        assert!(Duration::parse("mm").is_err());
        assert!(Duration::parse("-1m").is_err());
        assert!(Duration::parse("+5m").is_err());
        assert!(Duration::parse(" 5m").is_err());
        assert!(matches!(
            Duration::parse("1K"),
            Err(OrmError::InvalidDuration(_))
        ));
    }

    #[test]
    fn parse_multibyte_suffix_is_rejected() {
        assert!(Duration::parse("5分").is_err());
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let d: Duration = "15s".parse().unwrap();
        assert_eq!(d, Duration::seconds(15));
        assert_eq!(d.to_string(), "15s");
    }

    #[test]
    fn std_duration_becomes_microseconds() {
        let d = Duration::from_std(std::time::Duration::from_secs(300)).unwrap();
        assert_eq!(d.to_string(), "300000000u");
        assert!(Duration::from_std(std::time::Duration::ZERO).is_err());
    }

    #[test]
    fn chrono_duration_rejects_non_positive() {
        let d = Duration::try_from(chrono::Duration::minutes(5)).unwrap();
        assert_eq!(d, Duration::micros(300_000_000));
        assert!(Duration::try_from(chrono::Duration::seconds(-1)).is_err());
        assert!(Duration::try_from(chrono::Duration::zero()).is_err());
    }
}
