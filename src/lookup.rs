use crate::identity::variation_id;
use crate::models::{DailyRecord, Variation};

/// Display name for a derived id, or the id itself when nothing matches.
pub fn name_of(variations: &[Variation], id: &str) -> String {
    variations
        .iter()
        .find(|variation| variation_id(variation) == id)
        .map(|variation| variation.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(id)
        .to_string()
}

pub fn record_for<'a>(records: &'a [DailyRecord], date_key: &str) -> Option<&'a DailyRecord> {
    records.iter().find(|record| record.date == date_key)
}
