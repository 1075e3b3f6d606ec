use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::MetricRecord;

/// URL to repetition-ordered records, in the order the URLs were received.
///
/// Serializes as a JSON object. A repeated key keeps its first position and
/// takes the last value, matching JSON object semantics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    entries: Vec<(String, Vec<MetricRecord>)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, records: Vec<MetricRecord>) {
        let url = url.into();
        match self.entries.iter_mut().find(|(key, _)| *key == url) {
            Some((_, existing)) => *existing = records,
            None => self.entries.push((url, records)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MetricRecord])> {
        self.entries
            .iter()
            .map(|(url, records)| (url.as_str(), records.as_slice()))
    }

    /// Every record across every URL, flattened in order.
    pub fn records(&self) -> impl Iterator<Item = &MetricRecord> {
        self.entries.iter().flat_map(|(_, records)| records.iter())
    }

    pub fn url_count(&self) -> usize {
        self.entries.len()
    }

    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<MetricRecord>)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (String, Vec<MetricRecord>)>>(iter: I) -> Self {
        let mut set = ResultSet::new();
        for (url, records) in iter {
            set.insert(url, records);
        }
        set
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (url, records) in &self.entries {
            map.serialize_entry(url, records)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResultSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ResultSetVisitor)
    }
}

struct ResultSetVisitor;

impl<'de> Visitor<'de> for ResultSetVisitor {
    type Value = ResultSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of URL to a list of metric records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = ResultSet::new();
        while let Some((url, records)) = access.next_entry::<String, Vec<MetricRecord>>()? {
            set.insert(url, records);
        }
        Ok(set)
    }
}
