use crate::models::{ChartPoint, DailyRecord};
use std::collections::{BTreeMap, BTreeSet};

const DAYS_PER_WEEK: usize = 7;

/// Conversion rate in percent. Zero visits give a rate of zero.
pub fn conversion_rate(conversions: u64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    conversions as f64 / visits as f64 * 100.0
}

/// Sums consecutive 7-record windows into one record each.
///
/// The last window may be shorter. Every variation seen in any day of the
/// window gets a total, with missing days counted as zero.
pub fn group_by_week(daily: &[DailyRecord]) -> Vec<DailyRecord> {
    let mut weeks = Vec::with_capacity(daily.len().div_ceil(DAYS_PER_WEEK));

    for chunk in daily.chunks(DAYS_PER_WEEK) {
        let (Some(first), Some(last)) = (chunk.first(), chunk.last()) else {
            continue;
        };

        let ids: BTreeSet<&String> = chunk
            .iter()
            .flat_map(|day| day.visits.keys().chain(day.conversions.keys()))
            .collect();

        let mut visits = BTreeMap::new();
        let mut conversions = BTreeMap::new();
        for id in ids {
            let visit_sum = chunk.iter().fold(0u64, |sum, day| {
                sum.saturating_add(day.visits.get(id).copied().unwrap_or(0))
            });
            let conversion_sum = chunk.iter().fold(0u64, |sum, day| {
                sum.saturating_add(day.conversions.get(id).copied().unwrap_or(0))
            });
            visits.insert(id.clone(), visit_sum);
            conversions.insert(id.clone(), conversion_sum);
        }

        weeks.push(DailyRecord {
            date: format!("{} - {}", first.date, last.date),
            visits,
            conversions,
        });
    }

    weeks
}

/// Turns records into chart points holding one rate per requested variation.
pub fn to_chart_points(records: &[DailyRecord], selected: &[String]) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|record| ChartPoint {
            date: record.date.clone(),
            values: selected
                .iter()
                .map(|id| (id.clone(), rate_for(record, id)))
                .collect(),
        })
        .collect()
}

fn rate_for(record: &DailyRecord, id: &str) -> Option<f64> {
    let visits = *record.visits.get(id)?;
    let conversions = *record.conversions.get(id)?;
    Some(conversion_rate(conversions, visits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(date: &str, visits: &[(&str, u64)], conversions: &[(&str, u64)]) -> DailyRecord {
        DailyRecord {
            date: date.to_string(),
            visits: visits.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            conversions: conversions.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn fortnight() -> Vec<DailyRecord> {
        (1..=14)
            .map(|n| {
                day(
                    &format!("2024-01-{n:02}"),
                    &[("1", 100 + n), ("2", 100)],
                    &[("1", 10), ("2", 20)],
                )
            })
            .collect()
    }

    #[test]
    fn rate_handles_zero_visits() {
        assert_eq!(conversion_rate(0, 0), 0.0);
        assert_eq!(conversion_rate(5, 0), 0.0);
        assert_eq!(conversion_rate(1, 4), 25.0);
    }

    #[test]
    fn week_count_is_ceiling_of_days_over_seven() {
        let days = fortnight();
        for n in [1, 6, 7, 8, 13, 14] {
            assert_eq!(group_by_week(&days[..n]).len(), n.div_ceil(7), "n = {n}");
        }
        assert!(group_by_week(&[]).is_empty());
    }

    #[test]
    fn week_sums_match_daily_sums() {
        let days = fortnight();
        let weeks = group_by_week(&days);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].date, "2024-01-01 - 2024-01-07");
        assert_eq!(weeks[1].date, "2024-01-08 - 2024-01-14");

        let expected: u64 = days[..7].iter().map(|d| d.visits["1"]).sum();
        assert_eq!(weeks[0].visits["1"], expected);
        assert_eq!(weeks[0].visits["2"], 700);
        assert_eq!(weeks[1].conversions["2"], 140);
    }

    #[test]
    fn week_keys_are_union_with_missing_days_as_zero() {
        let days = vec![
            day("2024-01-01", &[("1", 10)], &[("1", 1)]),
            day("2024-01-02", &[("3", 4)], &[]),
            day("2024-01-03", &[("1", 5)], &[("1", 2), ("9", 1)]),
        ];
        let weeks = group_by_week(&days);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].date, "2024-01-01 - 2024-01-03");
        assert_eq!(weeks[0].visits["1"], 15);
        assert_eq!(weeks[0].visits["3"], 4);
        assert_eq!(weeks[0].conversions["3"], 0);
        assert_eq!(weeks[0].visits["9"], 0);
        assert_eq!(weeks[0].conversions["9"], 1);
    }

    #[test]
    fn single_day_week_repeats_its_date() {
        let weeks = group_by_week(&fortnight()[..8]);
        assert_eq!(weeks[1].date, "2024-01-08 - 2024-01-08");
    }

    #[test]
    fn chart_points_compute_rates_for_requested_ids() {
        let days = vec![day("2024-01-01", &[("1", 100), ("2", 100)], &[("1", 10), ("2", 20)])];
        let points = to_chart_points(&days, &["1".to_string(), "2".to_string()]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, "2024-01-01");
        assert_eq!(points[0].value("1"), Some(10.0));
        assert_eq!(points[0].value("2"), Some(20.0));
    }

    #[test]
    fn zero_visits_is_zero_and_missing_entry_is_null() {
        let days = vec![
            day("2024-01-01", &[("1", 0)], &[("1", 0)]),
            day("2024-01-02", &[("1", 10)], &[]),
            day("2024-01-03", &[], &[]),
        ];
        let points = to_chart_points(&days, &["1".to_string()]);
        assert_eq!(points[0].values, vec![("1".to_string(), Some(0.0))]);
        assert_eq!(points[1].values, vec![("1".to_string(), None)]);
        assert_eq!(points[2].values, vec![("1".to_string(), None)]);
    }

    #[test]
    fn chart_points_only_carry_requested_ids_in_order() {
        let days = vec![day("2024-01-01", &[("1", 10), ("2", 10), ("3", 10)], &[("1", 1), ("2", 2), ("3", 3)])];
        let points = to_chart_points(&days, &["3".to_string(), "1".to_string()]);
        let ids: Vec<&str> = points[0].values.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert!(!points[0].has_field("2"));
    }

    #[test]
    fn rates_are_not_rounded() {
        let days = vec![day("2024-01-01", &[("1", 3)], &[("1", 1)])];
        let points = to_chart_points(&days, &["1".to_string()]);
        assert_eq!(points[0].value("1"), Some(1.0 / 3.0 * 100.0));
    }
}
