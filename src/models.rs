use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Variation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

/// Visit and conversion counts for one day, or for one week once grouped.
///
/// A variation missing from `visits` or `conversions` means "no data" for
/// that record, which is not the same thing as a count of zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DailyRecord {
    pub date: String,
    #[serde(default)]
    pub visits: BTreeMap<String, u64>,
    #[serde(default)]
    pub conversions: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Dataset {
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub data: Vec<DailyRecord>,
}

/// One x-axis sample: a conversion rate (percent) per requested variation.
///
/// Serializes as a flat object, `{"date": "...", "1": 10.0, "2": null}`,
/// keeping the requested variation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: String,
    pub values: Vec<(String, Option<f64>)>,
}

impl ChartPoint {
    pub fn value(&self, variation_id: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(id, _)| id == variation_id)
            .and_then(|(_, value)| *value)
    }

    pub fn has_field(&self, variation_id: &str) -> bool {
        self.values.iter().any(|(id, _)| id == variation_id)
    }
}

impl Serialize for ChartPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("date", &self.date)?;
        for (id, value) in &self.values {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VisibleRange {
    pub min: f64,
    pub max: f64,
}

impl Default for VisibleRange {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Line,
    Smooth,
    Area,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesStyle {
    pub id: String,
    pub name: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VariationControl {
    pub id: String,
    pub name: String,
    pub color: &'static str,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub granularity: Granularity,
    pub line_style: LineStyle,
    pub selected: Vec<String>,
    pub series: Vec<SeriesStyle>,
    pub points: Vec<ChartPoint>,
    pub labels: Vec<String>,
    pub range: VisibleRange,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DetailEntry {
    pub id: String,
    pub name: String,
    pub color: &'static str,
    pub visits: u64,
    pub conversions: u64,
    pub rate: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DetailResponse {
    pub date: String,
    pub label: String,
    pub entries: Vec<DetailEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub variation_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GranularityRequest {
    pub granularity: Granularity,
}

#[derive(Debug, Deserialize)]
pub struct LineStyleRequest {
    pub line_style: LineStyle,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub date: String,
}
