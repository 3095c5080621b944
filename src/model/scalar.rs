use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, WcsError};

/// A single value read from a WCS document: an axis bound, a coefficient, or
/// a nil value.
///
/// Temporal values are always UTC instants; naive timestamps in the document
/// are taken to be UTC.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Time(DateTime<Utc>),
    Text(String),
}

impl Scalar {
    /// Parses a lexical bound as written in WCS documents.
    ///
    /// A value in double quotes is a timestamp or, failing that, text. An
    /// unquoted value is a timestamp, an integer or a float, in that order.
    ///
    /// ```
    /// use wcs_client::Scalar;
    ///
    /// assert_eq!(Scalar::parse("42").unwrap(), Scalar::Int(42));
    /// assert_eq!(Scalar::parse("-0.1").unwrap(), Scalar::Float(-0.1));
    /// assert!(Scalar::parse("\"2000-02-01T00:00:00.000Z\"").unwrap().is_time());
    /// assert_eq!(Scalar::parse("\"hello\"").unwrap(), Scalar::Text("hello".into()));
    /// ```
    pub fn parse(raw: &str) -> Result<Scalar> {
        let raw = raw.trim();
        let quoted = raw.starts_with('"');
        let value = raw.trim_matches('"');

        if let Some(time) = parse_time(value) {
            return Ok(Scalar::Time(time));
        }
        if quoted {
            return Ok(Scalar::Text(value.to_string()));
        }
        if let Ok(i) = value.parse::<i64>() {
            return Ok(Scalar::Int(i));
        }
        if let Ok(f) = value.parse::<f64>() {
            return Ok(Scalar::Float(f));
        }
        Err(WcsError::invalid("bound", raw))
    }

    /// Parses a whitespace separated list of bounds, e.g. a `LowerCorner`.
    pub fn parse_list(raw: &str) -> Result<Vec<Scalar>> {
        raw.split_whitespace().map(Scalar::parse).collect()
    }

    /// Parses a number, keeping the text as-is if it is not one.
    pub fn parse_numeric_or_text(raw: &str) -> Scalar {
        let raw = raw.trim();
        if let Ok(i) = raw.parse::<i64>() {
            Scalar::Int(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            Scalar::Float(f)
        } else {
            Scalar::Text(raw.to_string())
        }
    }

    pub fn is_time(&self) -> bool {
        matches!(self, Scalar::Time(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Scalar::Time(t) => Some(t),
            _ => None,
        }
    }
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    None
}

/// Numbers compare with numbers, instants with instants, text with text.
impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => a.partial_cmp(b),
            (Scalar::Time(a), Scalar::Time(b)) => a.partial_cmp(b),
            (Scalar::Text(a), Scalar::Text(b)) => a.partial_cmp(b),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::Time(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// Instants are quoted, and shortened to the date when they fall on midnight.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Time(t) => {
                if t.num_seconds_from_midnight() == 0 && t.nanosecond() == 0 {
                    write!(f, "\"{}\"", t.format("%Y-%m-%d"))
                } else {
                    write!(f, "\"{}\"", t.to_rfc3339_opts(SecondsFormat::AutoSi, false))
                }
            }
            Scalar::Text(s) => f.write_str(s),
        }
    }
}
