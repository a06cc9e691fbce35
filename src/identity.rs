use crate::models::Variation;

pub const PALETTE: [&str; 4] = ["#FF6B35", "#4A90E2", "#5A5A5A", "#9B59B6"];

/// Derived identifier used as the key into the daily count maps.
///
/// Zero and a missing id both map to `"0"`, so such variations share counts.
pub fn variation_id(variation: &Variation) -> String {
    match variation.id {
        Some(id) if id != 0 => id.to_string(),
        _ => "0".to_string(),
    }
}

/// Color for the series drawn at `position`. The id does not take part.
pub fn variation_color(_variation_id: &str, position: usize) -> &'static str {
    PALETTE[position % PALETTE.len()]
}
