use crate::aggregation::{conversion_rate, group_by_week, to_chart_points};
use crate::dates::{display_label, DateFormat};
use crate::identity::{variation_color, variation_id};
use crate::lookup::{name_of, record_for};
use crate::models::{
    ChartPoint, DailyRecord, Dataset, DetailEntry, DetailResponse, Granularity, LineStyle,
    SeriesStyle, VariationControl, ViewResponse, VisibleRange,
};
use crate::range::visible_range;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

const CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct ViewKey {
    selected: Vec<String>,
    granularity: Granularity,
}

/// Chart-ready output for one selection and granularity.
#[derive(Debug)]
pub struct DerivedView {
    pub points: Vec<ChartPoint>,
    pub range: VisibleRange,
}

/// Dashboard selection state plus a memo of the derived chart data.
pub struct ViewState {
    dataset: Arc<Dataset>,
    weekly: Vec<DailyRecord>,
    known_ids: Vec<String>,
    selected: Vec<String>,
    granularity: Granularity,
    line_style: LineStyle,
    cache: LruCache<ViewKey, Arc<DerivedView>>,
}

impl ViewState {
    /// Starts with every variation selected, daily granularity and plain lines.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let mut known_ids: Vec<String> = Vec::with_capacity(dataset.variations.len());
        for id in dataset.variations.iter().map(variation_id) {
            if !known_ids.contains(&id) {
                known_ids.push(id);
            }
        }
        let weekly = group_by_week(&dataset.data);

        Self {
            selected: known_ids.clone(),
            known_ids,
            weekly,
            dataset,
            granularity: Granularity::default(),
            line_style: LineStyle::default(),
            cache: LruCache::new(CACHE_CAPACITY),
        }
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.known_ids.iter().any(|known| known == id)
    }

    /// Adds an unselected variation at the end or removes a selected one.
    ///
    /// Returns `false` when nothing changed: the id is unknown, or it is the
    /// last remaining selection.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.is_known(id) {
            return false;
        }
        match self.selected.iter().position(|selected| selected == id) {
            Some(_) if self.selected.len() == 1 => false,
            Some(index) => {
                self.selected.remove(index);
                true
            }
            None => {
                self.selected.push(id.to_string());
                true
            }
        }
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    pub fn set_line_style(&mut self, line_style: LineStyle) {
        self.line_style = line_style;
    }

    /// Daily records or their weekly totals, per the current granularity.
    pub fn records(&self) -> &[DailyRecord] {
        match self.granularity {
            Granularity::Day => &self.dataset.data,
            Granularity::Week => &self.weekly,
        }
    }

    pub fn derived(&mut self) -> Arc<DerivedView> {
        let key = ViewKey {
            selected: self.selected.clone(),
            granularity: self.granularity,
        };
        if let Some(view) = self.cache.get(&key) {
            return Arc::clone(view);
        }

        debug!(
            selected = ?key.selected,
            granularity = ?key.granularity,
            "recomputing chart data"
        );
        let points = to_chart_points(self.records(), &self.selected);
        let range = visible_range(&points, &self.selected);
        let view = Arc::new(DerivedView { points, range });
        self.cache.put(key, Arc::clone(&view));
        view
    }

    /// Name and color per selected series; colors follow selection order.
    pub fn series(&self) -> Vec<SeriesStyle> {
        self.selected
            .iter()
            .enumerate()
            .map(|(position, id)| SeriesStyle {
                id: id.clone(),
                name: name_of(&self.dataset.variations, id),
                color: variation_color(id, position),
            })
            .collect()
    }

    /// One checkbox entry per configured variation, colored by list position.
    pub fn controls(&self) -> Vec<VariationControl> {
        self.dataset
            .variations
            .iter()
            .enumerate()
            .map(|(position, variation)| {
                let id = variation_id(variation);
                VariationControl {
                    selected: self.selected.contains(&id),
                    color: variation_color(&id, position),
                    name: variation.name.clone(),
                    id,
                }
            })
            .collect()
    }

    pub fn snapshot(&mut self) -> ViewResponse {
        let view = self.derived();
        ViewResponse {
            granularity: self.granularity,
            line_style: self.line_style,
            selected: self.selected.clone(),
            series: self.series(),
            labels: view
                .points
                .iter()
                .map(|point| display_label(&point.date, DateFormat::Short))
                .collect(),
            points: view.points.clone(),
            range: view.range,
        }
    }

    /// Raw counts behind the rates shown for `date_key`.
    pub fn detail(&self, date_key: &str) -> Option<DetailResponse> {
        let record = record_for(self.records(), date_key)?;
        let entries = self
            .selected
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                let visits = *record.visits.get(id)?;
                let conversions = *record.conversions.get(id)?;
                Some(DetailEntry {
                    id: id.clone(),
                    name: name_of(&self.dataset.variations, id),
                    color: variation_color(id, position),
                    visits,
                    conversions,
                    rate: conversion_rate(conversions, visits),
                })
            })
            .collect();

        Some(DetailResponse {
            date: record.date.clone(),
            label: display_label(&record.date, DateFormat::Long),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::PALETTE;
    use crate::models::Variation;
    use pretty_assertions::assert_eq;

    fn dataset() -> Arc<Dataset> {
        let data = (1..=14)
            .map(|n| DailyRecord {
                date: format!("2024-01-{n:02}"),
                visits: [("1".to_string(), 100), ("2".to_string(), 100)].into(),
                conversions: [("1".to_string(), 10), ("2".to_string(), 20)].into(),
            })
            .collect();
        Arc::new(Dataset {
            variations: vec![
                Variation { id: Some(1), name: "A".to_string() },
                Variation { id: Some(2), name: "B".to_string() },
                Variation { id: Some(3), name: "C".to_string() },
            ],
            data,
        })
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn starts_with_all_variations_selected() {
        let state = ViewState::new(dataset());
        assert_eq!(state.selected(), ids(&["1", "2", "3"]).as_slice());
        assert_eq!(state.granularity(), Granularity::Day);
        assert_eq!(state.line_style(), LineStyle::Line);
    }

    #[test]
    fn colliding_ids_are_selected_once() {
        let dataset = Arc::new(Dataset {
            variations: vec![
                Variation { id: None, name: "Original".to_string() },
                Variation { id: Some(0), name: "Zero".to_string() },
            ],
            data: vec![DailyRecord::default()],
        });
        let state = ViewState::new(dataset);
        assert_eq!(state.selected(), ids(&["0"]).as_slice());
        assert_eq!(state.controls().len(), 2);
    }

    #[test]
    fn toggle_appends_and_removes() {
        let mut state = ViewState::new(dataset());
        assert!(state.toggle("1"));
        assert_eq!(state.selected(), ids(&["2", "3"]).as_slice());
        assert!(state.toggle("1"));
        assert_eq!(state.selected(), ids(&["2", "3", "1"]).as_slice());
    }

    #[test]
    fn toggling_last_selection_is_ignored() {
        let mut state = ViewState::new(dataset());
        state.toggle("1");
        state.toggle("2");
        assert_eq!(state.selected(), ids(&["3"]).as_slice());
        assert!(!state.toggle("3"));
        assert_eq!(state.selected(), ids(&["3"]).as_slice());
    }

    #[test]
    fn unknown_ids_do_not_change_selection() {
        let mut state = ViewState::new(dataset());
        assert!(!state.toggle("42"));
        assert_eq!(state.selected().len(), 3);
    }

    #[test]
    fn first_series_always_gets_first_color() {
        let mut state = ViewState::new(dataset());
        assert_eq!(state.series()[0].id, "1");
        assert_eq!(state.series()[0].color, PALETTE[0]);

        state.toggle("1");
        let series = state.series();
        assert_eq!(series[0].id, "2");
        assert_eq!(series[0].color, PALETTE[0]);
        assert_eq!(series[0].name, "B");

        state.toggle("1");
        assert_eq!(state.series()[2].color, PALETTE[2]);
    }

    #[test]
    fn controls_use_dataset_position_colors() {
        let mut state = ViewState::new(dataset());
        state.toggle("2");
        let controls = state.controls();
        assert_eq!(controls[1].id, "2");
        assert!(!controls[1].selected);
        assert_eq!(controls[1].color, PALETTE[1]);
        assert_eq!(controls[2].color, PALETTE[2]);
    }

    #[test]
    fn derived_view_is_memoized_per_selection_and_granularity() {
        let mut state = ViewState::new(dataset());
        let first = state.derived();
        assert!(Arc::ptr_eq(&first, &state.derived()));

        state.set_line_style(LineStyle::Area);
        assert!(Arc::ptr_eq(&first, &state.derived()));

        state.set_granularity(Granularity::Week);
        let weekly = state.derived();
        assert!(!Arc::ptr_eq(&first, &weekly));
        assert_eq!(weekly.points.len(), 2);

        state.set_granularity(Granularity::Day);
        assert!(Arc::ptr_eq(&first, &state.derived()));

        state.toggle("3");
        let without_c = state.derived();
        assert!(!Arc::ptr_eq(&first, &without_c));
        assert!(!without_c.points[0].has_field("3"));
    }

    #[test]
    fn snapshot_carries_points_labels_and_range() {
        let mut state = ViewState::new(dataset());
        state.toggle("3");
        let view = state.snapshot();
        assert_eq!(view.points.len(), 14);
        assert_eq!(view.labels[0], "Jan 1");
        assert_eq!(view.points[0].value("1"), Some(10.0));
        assert_eq!(view.points[0].value("2"), Some(20.0));
        assert_eq!(view.range, VisibleRange { min: 9.0, max: 21.0 });
        assert_eq!(view.series.len(), 2);
    }

    #[test]
    fn detail_reuses_rate_formula_for_current_granularity() {
        let mut state = ViewState::new(dataset());
        let detail = state.detail("2024-01-03").unwrap();
        assert_eq!(detail.label, "Jan 3, 2024");
        // Variation 3 has no counts, so it is left out.
        assert_eq!(detail.entries.len(), 2);
        assert_eq!(detail.entries[1].rate, 20.0);
        assert_eq!(detail.entries[1].visits, 100);

        assert!(state.detail("2024-01-01 - 2024-01-07").is_none());
        state.set_granularity(Granularity::Week);
        let week = state.detail("2024-01-01 - 2024-01-07").unwrap();
        assert_eq!(week.entries[0].visits, 700);
        assert_eq!(week.entries[0].conversions, 70);
        assert_eq!(week.entries[0].rate, 10.0);
    }
}
