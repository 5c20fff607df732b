use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A price cell as it arrives from an export: a JSON number, a numeric string,
/// or nothing at all. Booleans keep their text and objects or lists become
/// `Invalid`, so bad cells surface as record errors from the normalizer rather
/// than decode errors.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
    Invalid(String),
    #[default]
    Missing,
}

impl RawPrice {
    pub fn to_f64(&self) -> Option<f64> {
        let v = match self {
            RawPrice::Number(n) => *n,
            RawPrice::Text(s) => s.trim().parse::<f64>().ok()?,
            RawPrice::Invalid(_) | RawPrice::Missing => return None,
        };
        v.is_finite().then_some(v)
    }
}

struct RawPriceVisitor;

impl<'de> Visitor<'de> for RawPriceVisitor {
    type Value = RawPrice;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a price cell")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawPrice, E> {
        Ok(RawPrice::Number(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawPrice, E> {
        Ok(RawPrice::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawPrice, E> {
        Ok(RawPrice::Number(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawPrice, E> {
        Ok(RawPrice::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawPrice, E> {
        Ok(RawPrice::Text(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<RawPrice, E> {
        Ok(RawPrice::Text(String::from_utf8_lossy(v).into_owned()))
    }

    // csv infers `true`/`false` cells as booleans.
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawPrice, E> {
        Ok(RawPrice::Text(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawPrice, E> {
        Ok(RawPrice::Missing)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawPrice, E> {
        Ok(RawPrice::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawPrice, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawPrice, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawPrice::Invalid("a list".to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawPrice, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(RawPrice::Invalid("an object".to_string()))
    }
}

impl<'de> Deserialize<'de> for RawPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawPriceVisitor)
    }
}

impl From<f64> for RawPrice {
    fn from(value: f64) -> Self {
        RawPrice::Number(value)
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        RawPrice::Text(value.to_string())
    }
}

/// One row of a MetaTrader-style history export (`<DATE>`, `<TIME>`, `<OPEN>`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "<DATE>", alias = "date", alias = "DATE", default)]
    pub date: String,
    #[serde(rename = "<TIME>", alias = "time", alias = "TIME", default)]
    pub time: String,
    #[serde(rename = "<OPEN>", alias = "open", alias = "OPEN", default)]
    pub open: RawPrice,
    #[serde(rename = "<HIGH>", alias = "high", alias = "HIGH", default)]
    pub high: RawPrice,
    #[serde(rename = "<LOW>", alias = "low", alias = "LOW", default)]
    pub low: RawPrice,
    #[serde(rename = "<CLOSE>", alias = "close", alias = "CLOSE", default)]
    pub close: RawPrice,
}

impl RawRecord {
    pub fn new(
        date: &str,
        time: &str,
        open: impl Into<RawPrice>,
        high: impl Into<RawPrice>,
        low: impl Into<RawPrice>,
        close: impl Into<RawPrice>,
    ) -> Self {
        Self {
            date: date.to_string(),
            time: time.to_string(),
            open: open.into(),
            high: high.into(),
            low: low.into(),
            close: close.into(),
        }
    }
}
