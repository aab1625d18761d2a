//! Score normalization.
//!
//! The scoring engine emits scores on an inconsistent scale: a fraction
//! (`0.885`), a fraction accidentally multiplied by ten (`8.85`), or a
//! percentage (`88.5`). Every screen that shows a score goes through
//! [`normalize`] so that all of them agree on the same integer.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Converts a raw score of ambiguous scale into an integer percentage in `0..=100`.
///
/// - `raw <= 1`: fraction, multiplied by 100
/// - `1 < raw <= 10`: fraction scaled by ten, multiplied by 10
/// - `10 < raw <= 100`: already a percentage
/// - `raw > 100`: left as is and clamped below
///
/// NaN degrades to 0. The result is clamped to `[0, 100]` and rounded half up.
#[allow(clippy::if_same_then_else)]
pub fn normalize(raw: f64) -> u8 {
    let s = if raw.is_nan() { 0.0 } else { raw };

    let percent = if s <= 1.0 {
        s * 100.0
    } else if s <= 10.0 {
        s * 10.0
    } else if s <= 100.0 {
        s
    } else {
        // Out-of-range scores pass through untouched; the clamp caps them at 100.
        s
    };

    let clamped = percent.clamp(0.0, 100.0);
    (clamped + 0.5).floor() as u8
}

/// A raw score as received from the API.
///
/// Decoding never fails: numbers are taken as is, numeric strings are parsed,
/// booleans map to 0/1, and `null`, missing fields or anything else become 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct ScoreValue(pub f64);

impl ScoreValue {
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Display percentage, see [`normalize`].
    pub fn percent(self) -> u8 {
        normalize(self.0)
    }
}

impl From<f64> for ScoreValue {
    fn from(raw: f64) -> Self {
        ScoreValue(raw)
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl Serialize for ScoreValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for ScoreValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScoreVisitor)
    }
}

struct ScoreVisitor;

impl<'de> Visitor<'de> for ScoreVisitor {
    type Value = ScoreValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a score value")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ScoreValue, E> {
        Ok(ScoreValue(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ScoreValue, E> {
        Ok(ScoreValue(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ScoreValue, E> {
        Ok(ScoreValue(v as f64))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ScoreValue, E> {
        Ok(ScoreValue(if v { 1.0 } else { 0.0 }))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ScoreValue, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(ScoreValue(0.0));
        }
        Ok(ScoreValue(trimmed.parse::<f64>().unwrap_or(0.0)))
    }

    fn visit_none<E: de::Error>(self) -> Result<ScoreValue, E> {
        Ok(ScoreValue(0.0))
    }

    fn visit_unit<E: de::Error>(self) -> Result<ScoreValue, E> {
        Ok(ScoreValue(0.0))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ScoreValue, D::Error> {
        deserializer.deserialize_any(ScoreVisitor)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<ScoreValue, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(ScoreValue(0.0))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<ScoreValue, A::Error> {
        while map
            .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
            .is_some()
        {}
        Ok(ScoreValue(0.0))
    }
}
