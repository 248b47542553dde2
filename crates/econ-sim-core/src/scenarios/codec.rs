//! Query-string codec for shareable scenario links.
//!
//! Every parameter set encodes to `key=value` pairs joined by `&`, using
//! fixed three-letter keys. Numbers are written rounded to
//! [`DECIMAL_PLACES`], so a decode reproduces each field to within half a
//! unit in that place. Decoding is all-or-nothing: a query either yields a
//! fully validated value or an explicit [`DecodedScenario::Invalid`].

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::primitives::round_to;
use crate::{EconSimError, EconSimResult};

/// Fractional digits kept when a number is encoded.
pub const DECIMAL_PLACES: u32 = 6;

/// Largest round-trip error of an encoded number, ignoring f64 spacing.
pub const ROUND_TRIP_TOLERANCE: f64 = 0.5e-6;

/// Outcome of decoding a query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum DecodedScenario<T> {
    /// None of the codec's keys appear in the query.
    Absent,
    Valid(T),
    /// At least one key appears but the set does not validate.
    Invalid(String),
}

impl<T> DecodedScenario<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, DecodedScenario::Valid(_))
    }

    pub fn valid(self) -> Option<T> {
        match self {
            DecodedScenario::Valid(value) => Some(value),
            _ => None,
        }
    }
}

/// Format a number the way the codec writes it.
pub fn format_number(value: f64) -> String {
    format!("{}", round_to(value, DECIMAL_PLACES))
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

/// Raw values of the known keys found in a query. Later duplicates win.
#[derive(Debug, Default)]
pub struct QueryFields {
    values: HashMap<&'static str, String>,
}

impl QueryFields {
    fn parse(query: &str, keys: &[&'static str]) -> Self {
        let mut values = HashMap::new();
        let query = query.trim().trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if let Some(known) = keys.iter().find(|k| **k == key) {
                values.insert(*known, value.to_string());
            }
        }
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn raw(&self, key: &str) -> EconSimResult<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| EconSimError::InvalidScenario(format!("missing key '{key}'")))
    }

    /// A required finite number.
    pub fn number(&self, key: &str) -> EconSimResult<f64> {
        let raw = self.raw(key)?;
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(EconSimError::InvalidScenario(format!(
                "'{key}' is not a finite number: '{raw}'"
            ))),
        }
    }

    pub fn whole_number(&self, key: &str) -> EconSimResult<u32> {
        let raw = self.raw(key)?;
        raw.parse::<u32>().map_err(|_| {
            EconSimError::InvalidScenario(format!("'{key}' is not a whole number: '{raw}'"))
        })
    }

    /// One of the literals accepted by `T::from_str`.
    pub fn literal<T: FromStr>(&self, key: &str) -> EconSimResult<T> {
        let raw = self.raw(key)?;
        raw.parse::<T>()
            .map_err(|_| EconSimError::InvalidScenario(format!("'{key}' has unknown value '{raw}'")))
    }
}

// ---------------------------------------------------------------------------
// Codec trait
// ---------------------------------------------------------------------------

/// A parameter set that can travel in a URL query string.
pub trait QueryCodec: Sized {
    /// Every key this parameter set reads or writes.
    const KEYS: &'static [&'static str];

    /// Key/value pairs in encoding order.
    fn to_pairs(&self) -> Vec<(&'static str, String)>;

    /// Build and validate a value from the known keys of a query.
    fn from_fields(fields: &QueryFields) -> EconSimResult<Self>;

    fn encode_query(&self) -> String {
        self.to_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn decode_query(query: &str) -> DecodedScenario<Self> {
        let fields = QueryFields::parse(query, Self::KEYS);
        if fields.is_empty() {
            return DecodedScenario::Absent;
        }
        match Self::from_fields(&fields) {
            Ok(value) => DecodedScenario::Valid(value),
            Err(e) => {
                log::debug!("rejected scenario query: {e}");
                DecodedScenario::Invalid(e.to_string())
            }
        }
    }
}
