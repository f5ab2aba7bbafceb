//! Wire types for the stats service and their display formatting.
//!
//! Everything here is decoded once at the deserialization boundary:
//! category mappings keep their source order and record payloads are
//! resolved into an explicit [`RecordList`] sum type, so rendering never
//! has to inspect raw JSON shapes.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date/time layout used for record timestamps and the last-updated stamp
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shown for timestamps that cannot be interpreted
pub const INVALID_DATE: &str = "Invalid Date";

/// Ordered category -> count pairs (`ByType`, `ByLocation`).
///
/// Entries keep the order they had in the JSON object. A duplicate key
/// keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts(Vec<(String, u64)>);

impl CategoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a category count
    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = count,
            None => self.0.push((name, count)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut counts = CategoryCounts::new();
        for (name, count) in iter {
            counts.insert(name, count);
        }
        counts
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = CategoryCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of category name to count")
            }

            // Go encodes a nil map as null
            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(CategoryCounts::new())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(CategoryCounts::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut counts = CategoryCounts::new();
                while let Some((name, count)) = map.next_entry::<String, u64>()? {
                    counts.insert(name, count);
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_any(CountsVisitor)
    }
}

/// Aggregate statistics returned by `/api/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsSnapshot {
    pub total_globals: u64,
    pub total_hofs: u64,
    pub total_value: f64,
    pub highest_value: f64,
    /// Target that produced the highest value, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_value_item: Option<String>,
    #[serde(default)]
    pub by_type: CategoryCounts,
    #[serde(default)]
    pub by_location: CategoryCounts,
}

/// Record timestamp: epoch milliseconds or a date string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Text(String),
}

impl Timestamp {
    /// Resolve the timestamp into the given zone.
    ///
    /// Strings are tried as RFC 3339, then as a zone-less date/time read in
    /// `tz`, then as a bare date read as UTC midnight.
    pub fn to_datetime<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        match self {
            Timestamp::Millis(ms) => {
                if !ms.is_finite() {
                    return None;
                }
                DateTime::from_timestamp_millis(ms.trunc() as i64).map(|dt| dt.with_timezone(tz))
            }
            Timestamp::Text(text) => {
                let text = text.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Some(dt.with_timezone(tz));
                }
                for layout in [DISPLAY_FORMAT, "%Y-%m-%dT%H:%M:%S"] {
                    if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
                        return tz.from_local_datetime(&naive).earliest();
                    }
                }
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|naive| naive.and_utc().with_timezone(tz))
            }
        }
    }

    /// Format for display in the given zone
    pub fn display_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self.to_datetime(tz) {
            Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
            None => INVALID_DATE.to_string(),
        }
    }
}

/// A single Global or HOF observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Record {
    /// Timestamp cell text in the given zone
    pub fn timestamp_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.timestamp
            .as_ref()
            .map(|ts| ts.display_in(tz))
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }

    /// Value cell text
    pub fn value_text(&self) -> String {
        use serde_json::Value;

        match &self.value {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            Value::Bool(flag) => flag.to_string(),
            Value::Number(n) if n.is_f64() => n
                .as_f64()
                .map(|f| f.to_string())
                .unwrap_or_else(|| n.to_string()),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        }
    }
}

/// Payload of `/api/globals` and `/api/hofs`.
///
/// The service may send either a JSON array or a JSON object keyed by an
/// arbitrary id. `null` decodes as an empty sequence; any other scalar is
/// rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordList {
    Sequence(Vec<Record>),
    Mapping(Vec<(String, Record)>),
}

impl Default for RecordList {
    fn default() -> Self {
        RecordList::Sequence(Vec::new())
    }
}

impl RecordList {
    pub fn len(&self) -> usize {
        match self {
            RecordList::Sequence(records) => records.len(),
            RecordList::Mapping(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into records, keeping source order
    pub fn into_records(self) -> Vec<Record> {
        match self {
            RecordList::Sequence(records) => records,
            RecordList::Mapping(entries) => entries.into_iter().map(|(_, record)| record).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for RecordList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListVisitor;

        impl<'de> Visitor<'de> for ListVisitor {
            type Value = RecordList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array or object of records")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(RecordList::default())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(RecordList::default())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(record) = seq.next_element::<Record>()? {
                    records.push(record);
                }
                Ok(RecordList::Sequence(records))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Record>()? {
                    entries.push(entry);
                }
                Ok(RecordList::Mapping(entries))
            }
        }

        deserializer.deserialize_any(ListVisitor)
    }
}

/// Format with exactly two fractional digits.
///
/// Rounds the exact binary value of the f64 to the nearest hundredth, so
/// `2.675` (stored as 2.67499...) gives `"2.67"`. Exact ties go to the larger
/// magnitude. Negative inputs always keep their sign, even when the result
/// is zero. Magnitudes from `1e21` up print in exponent form.
pub fn format_fixed2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    if magnitude.is_infinite() {
        return format!("{}Infinity", sign);
    }
    if magnitude >= 1e21 {
        return format!("{}{}", sign, format!("{:e}", magnitude).replacen('e', "e+", 1));
    }

    // Exact hundredth ties are the odd multiples of 1/8
    let eighths = magnitude * 8.0;
    let digits = if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        round_tie_up(&format!("{:.3}", magnitude))
    } else {
        format!("{:.2}", magnitude)
    };

    format!("{}{}", sign, digits)
}

/// Drop the trailing `5` of an exact three-digit tie and round up
fn round_tie_up(tie: &str) -> String {
    let mut digits: Vec<u8> = tie[..tie.len() - 1].bytes().collect();
    for i in (0..digits.len()).rev() {
        match digits[i] {
            b'.' => continue,
            b'9' => digits[i] = b'0',
            _ => {
                digits[i] += 1;
                return String::from_utf8_lossy(&digits).into_owned();
            }
        }
    }
    format!("1{}", String::from_utf8_lossy(&digits))
}

/// Current local time for the last-updated stamp
pub fn local_now() -> String {
    Local::now().format(DISPLAY_FORMAT).to_string()
}
