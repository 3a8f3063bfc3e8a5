use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

/// How much of an ISO-8601 timestamp was actually written.
///
/// Precision participates in rendering only; comparison is always by
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Year,
    Month,
    Day,
    Minute,
    Second,
    /// Seconds with the given number of fractional digits.
    Fraction(u8),
}

/// An ISO-8601 timestamp with known precision and offset.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    precision: Precision,
}

impl Timestamp {
    pub fn new(instant: DateTime<FixedOffset>, precision: Precision) -> Self {
        Self { instant, precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn offset_minutes(&self) -> i32 {
        self.instant.offset().local_minus_utc() / 60
    }

    /// The point on the UTC timeline this timestamp denotes.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant.with_timezone(&Utc)
    }

    /// Parse an ISO-8601 timestamp, accepting every precision the text
    /// form can carry: `2007T`, `2007-06T`, `2007-06-05`, and full
    /// date-time forms with minute, second, or fractional-second precision
    /// and a `Z` or `±hh:mm` offset.
    pub fn parse(text: &str) -> Result<Self, String> {
        let bad = || format!("invalid timestamp: {text:?}");

        // Year precision: `2007T`
        if let Some(year) = text.strip_suffix('T') {
            if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
                let y: i32 = year.parse().map_err(|_| bad())?;
                return Self::from_date(y, 1, 1, Precision::Year).ok_or_else(bad);
            }
            // Month precision: `2007-06T`
            if year.len() == 7 && &year[4..5] == "-" {
                let y: i32 = year[..4].parse().map_err(|_| bad())?;
                let m: u32 = year[5..7].parse().map_err(|_| bad())?;
                return Self::from_date(y, m, 1, Precision::Month).ok_or_else(bad);
            }
        }

        // Day precision: `2007-06-05`
        if text.len() == 10 {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| bad())?;
            let dt = date
                .and_hms_opt(0, 0, 0)
                .and_then(|naive| FixedOffset::east_opt(0)?.from_local_datetime(&naive).single())
                .ok_or_else(bad)?;
            return Ok(Self::new(dt, Precision::Day));
        }

        // Minute precision has no seconds field; normalize by inserting
        // `:00` before the offset so one RFC 3339 parse handles the rest.
        let (body, precision) = match Self::split_offset(text) {
            Some((clock, offset)) => {
                // clock looks like `YYYY-MM-DDTHH:MM[:SS[.fff]]`
                match clock.len() {
                    16 => (format!("{clock}:00{offset}"), Precision::Minute),
                    19 => (text.to_string(), Precision::Second),
                    n if n > 20 && clock.as_bytes().get(19) == Some(&b'.') => {
                        let digits = (n - 20).min(u8::MAX as usize) as u8;
                        (text.to_string(), Precision::Fraction(digits))
                    }
                    _ => return Err(bad()),
                }
            }
            None => return Err(bad()),
        };

        let instant = DateTime::parse_from_rfc3339(&body).map_err(|_| bad())?;
        Ok(Self::new(instant, precision))
    }

    /// Split `text` into (clock, offset) where offset is `Z` or `±hh:mm`.
    fn split_offset(text: &str) -> Option<(&str, &str)> {
        if let Some(clock) = text.strip_suffix('Z') {
            return Some((clock, "Z"));
        }
        // The offset sign is a `+` or `-` after the `T`.
        let t = text.find('T')?;
        let sign = text[t..].rfind(['+', '-'])?;
        if sign == 0 {
            return None;
        }
        Some((&text[..t + sign], &text[t + sign..]))
    }

    fn from_date(year: i32, month: u32, day: u32, precision: Precision) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let dt = FixedOffset::east_opt(0)?
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .single()?;
        Some(Self::new(dt, precision))
    }

    fn write_offset(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.offset_minutes();
        if minutes == 0 {
            return f.write_str("Z");
        }
        let sign = if minutes < 0 { '-' } else { '+' };
        let abs = minutes.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = &self.instant;
        match self.precision {
            Precision::Year => write!(f, "{}T", dt.format("%Y")),
            Precision::Month => write!(f, "{}T", dt.format("%Y-%m")),
            Precision::Day => write!(f, "{}", dt.format("%Y-%m-%d")),
            Precision::Minute => {
                write!(f, "{}", dt.format("%Y-%m-%dT%H:%M"))?;
                self.write_offset(f)
            }
            Precision::Second => {
                write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S"))?;
                self.write_offset(f)
            }
            Precision::Fraction(digits) => {
                write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S"))?;
                let nanos = dt.timestamp_subsec_nanos();
                let digits = digits.clamp(1, 9) as usize;
                let frac = format!("{nanos:09}");
                write!(f, ".{}", &frac[..digits])?;
                self.write_offset(f)
            }
        }
    }
}

/// Instant comparison; precision and offset do not participate.
impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant() == other.instant()
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.instant().cmp(&other.instant()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_precision() {
        let ts = Timestamp::parse("2007T").unwrap();
        assert_eq!(ts.precision(), Precision::Year);
        assert_eq!(ts.to_string(), "2007T");
    }

    #[test]
    fn parses_month_precision() {
        let ts = Timestamp::parse("2007-06T").unwrap();
        assert_eq!(ts.precision(), Precision::Month);
        assert_eq!(ts.to_string(), "2007-06T");
    }

    #[test]
    fn parses_day_precision() {
        let ts = Timestamp::parse("2007-06-05").unwrap();
        assert_eq!(ts.precision(), Precision::Day);
        assert_eq!(ts.to_string(), "2007-06-05");
    }

    #[test]
    fn parses_minute_precision() {
        let ts = Timestamp::parse("2007-06-05T10:30Z").unwrap();
        assert_eq!(ts.precision(), Precision::Minute);
        assert_eq!(ts.to_string(), "2007-06-05T10:30Z");
    }

    #[test]
    fn parses_second_precision_with_offset() {
        let ts = Timestamp::parse("2007-06-05T10:30:15+05:00").unwrap();
        assert_eq!(ts.precision(), Precision::Second);
        assert_eq!(ts.to_string(), "2007-06-05T10:30:15+05:00");
    }

    #[test]
    fn parses_fractional_seconds() {
        let ts = Timestamp::parse("2007-06-05T10:30:15.250Z").unwrap();
        assert_eq!(ts.precision(), Precision::Fraction(3));
        assert_eq!(ts.to_string(), "2007-06-05T10:30:15.250Z");
    }

    #[test]
    fn equality_is_by_instant_not_text() {
        let utc = Timestamp::parse("2007-06-05T10:30:00Z").unwrap();
        let offset = Timestamp::parse("2007-06-05T12:30:00+02:00").unwrap();
        assert_eq!(utc, offset);
    }

    #[test]
    fn ordering_is_by_instant() {
        let a = Timestamp::parse("2007-06-05T10:30Z").unwrap();
        let b = Timestamp::parse("2007-06-05T10:31Z").unwrap();
        assert!(a < b);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Timestamp::parse("not-a-timestamp").is_err());
        assert!(Timestamp::parse("2007-13-01").is_err());
        assert!(Timestamp::parse("2007-06-05T10").is_err());
    }
}
