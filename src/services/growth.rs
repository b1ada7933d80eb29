//! Growth arithmetic and row reshaping shared by the Postgres and mock paths.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Datelike, Month, NaiveDate};

use crate::models::{Factor, FactorGrowth, FactorPoint, PrefectureRecord, TrafficRecord};

pub const TOP_N: usize = 5;

/// `(current - previous) / previous * 100`, `None` when there is no usable
/// previous value.
pub fn growth_percentage(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

pub fn growth_or_zero(previous: f64, current: f64) -> f64 {
    growth_percentage(previous, current).unwrap_or(0.0)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next.pred_opt()?;
    debug_assert_eq!(first.month(), last.month());
    Some(last.day())
}

/// Daily average of a monthly total.
pub fn normalize_daily(total: f64, year: i32, month: u32) -> f64 {
    match days_in_month(year, month) {
        Some(days) => total / f64::from(days),
        None => 0.0,
    }
}

pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Sorts by (year, month) and fills `delta_percentage` from consecutive
/// totals. The first record always carries `None`.
pub fn with_month_over_month_delta(mut records: Vec<TrafficRecord>) -> Vec<TrafficRecord> {
    records.sort_by_key(|r| (r.year, r.month));

    let mut previous_total: Option<f64> = None;
    for record in records.iter_mut() {
        record.delta_percentage =
            previous_total.and_then(|prev| growth_percentage(prev, record.total_traffic));
        previous_total = Some(record.total_traffic);
    }

    records
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Previous,
    Current,
}

impl Period {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "previous" => Some(Self::Previous),
            "current" => Some(Self::Current),
            _ => None,
        }
    }
}

/// One entity's volume in one of the two compared periods (long format).
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodVolume {
    pub name: String,
    pub period: Period,
    pub volume: Option<f64>,
}

/// Both periods of one entity after merging long rows back together.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumePair {
    pub name: String,
    pub previous: Option<f64>,
    pub current: Option<f64>,
}

impl VolumePair {
    pub fn growth(&self) -> Option<f64> {
        match (self.previous, self.current) {
            (Some(prev), Some(curr)) => growth_percentage(prev, curr),
            _ => None,
        }
    }
}

/// Merges long-format rows by entity name. Output keeps first-seen order;
/// a later row for the same name and period overwrites the earlier one.
pub fn merge_periods<I>(rows: I) -> Vec<VolumePair>
where
    I: IntoIterator<Item = PeriodVolume>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut pairs: Vec<VolumePair> = Vec::new();

    for row in rows {
        let name = row.name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        let slot = *index.entry(name.clone()).or_insert_with(|| {
            pairs.push(VolumePair {
                name,
                previous: None,
                current: None,
            });
            pairs.len() - 1
        });
        match row.period {
            Period::Previous => pairs[slot].previous = row.volume,
            Period::Current => pairs[slot].current = row.volume,
        }
    }

    pairs
}

/// Descending by growth with `None` last; ties keep their input order.
pub fn sort_by_growth_desc<T, F>(items: &mut [T], growth: F)
where
    F: Fn(&T) -> Option<f64>,
{
    items.sort_by(|a, b| match (growth(a), growth(b)) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn top_by_growth<T, F>(mut items: Vec<T>, growth: F, limit: usize) -> Vec<T>
where
    F: Fn(&T) -> Option<f64>,
{
    sort_by_growth_desc(&mut items, growth);
    items.truncate(limit);
    items
}

pub fn scale_factor_value(factor: Factor, raw: f64) -> f64 {
    raw / factor.divisor()
}

/// Explodes a wide factor row (`values[0]` is January) into one point per
/// month, scaled for charting. Missing, zero and negative values are dropped.
pub fn explode_factor_row(factor: Factor, year: i32, values: &[Option<f64>; 12]) -> Vec<FactorPoint> {
    values
        .iter()
        .zip(1u32..)
        .filter_map(|(value, month)| {
            let raw = (*value)?;
            let scaled = scale_factor_value(factor, raw);
            if !(scaled > 0.0) {
                return None;
            }
            Some(FactorPoint {
                month: month_name(month)?.to_string(),
                year,
                value: scaled,
                factor,
            })
        })
        .collect()
}

pub fn factor_growth(factor: Factor, june: f64, july: f64) -> FactorGrowth {
    FactorGrowth {
        factor,
        june_data: june,
        july_data: july,
        growth_percentage: growth_percentage(june, july),
    }
}

pub fn top_by_volume(mut records: Vec<PrefectureRecord>, limit: usize) -> Vec<PrefectureRecord> {
    records.sort_by(|a, b| {
        b.data_volume
            .partial_cmp(&a.data_volume)
            .unwrap_or(Ordering::Equal)
    });
    records.truncate(limit);
    records
}

/// Rescales volumes to percentage shares of their sum.
pub fn renormalize_to_percent(records: Vec<PrefectureRecord>) -> Vec<PrefectureRecord> {
    let total: f64 = records.iter().map(|r| r.data_volume).sum();
    if !(total > 0.0) {
        return records
            .into_iter()
            .map(|r| PrefectureRecord {
                data_volume: 0.0,
                ..r
            })
            .collect();
    }

    records
        .into_iter()
        .map(|r| PrefectureRecord {
            data_volume: r.data_volume / total * 100.0,
            ..r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traffic(month: u32, total: f64) -> TrafficRecord {
        TrafficRecord {
            year: 2025,
            month,
            total_traffic: total,
            normalized_traffic: normalize_daily(total, 2025, month),
            delta_percentage: Some(99.0),
            total_dl_vol: None,
            total_ul_vol: None,
            dl_ul_ratio: None,
        }
    }

    #[test]
    fn test_growth_percentage_basic() {
        let g = growth_percentage(200.0, 250.0).unwrap();
        assert!((g - 25.0).abs() < 1e-9);
        assert_eq!(growth_percentage(0.0, 10.0), None);
        assert_eq!(growth_or_zero(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 5), Some(31));
        assert_eq!(days_in_month(2025, 6), Some(30));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn test_normalize_daily_matches_reported_figures() {
        let july = normalize_daily(257_859_685.773_651, 2025, 7);
        assert!((july - 8_318_054.379_795).abs() < 1e-3);
        let june = normalize_daily(234_641_470.823_634, 2025, 6);
        assert!((june - 7_821_382.360_788).abs() < 1e-3);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(5), Some("May"));
        assert_eq!(month_name(7), Some("July"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_month_over_month_delta_sorts_and_recomputes() {
        let records = with_month_over_month_delta(vec![
            traffic(7, 110.0),
            traffic(5, 100.0),
            traffic(6, 0.0),
        ]);
        assert_eq!(
            records.iter().map(|r| r.month).collect::<Vec<_>>(),
            vec![5, 6, 7]
        );
        assert_eq!(records[0].delta_percentage, None);
        assert!((records[1].delta_percentage.unwrap() + 100.0).abs() < 1e-9);
        assert_eq!(records[2].delta_percentage, None);
    }

    #[test]
    fn test_merge_periods_by_name() {
        let pairs = merge_periods(vec![
            PeriodVolume { name: "YouTube".into(), period: Period::Previous, volume: Some(10.0) },
            PeriodVolume { name: "Tik Tok".into(), period: Period::Previous, volume: Some(5.0) },
            PeriodVolume { name: "YouTube ".into(), period: Period::Current, volume: Some(12.0) },
            PeriodVolume { name: "  ".into(), period: Period::Current, volume: Some(1.0) },
        ]);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].name, "YouTube");
        assert_eq!(pairs[0].previous, Some(10.0));
        assert_eq!(pairs[0].current, Some(12.0));
        assert!((pairs[0].growth().unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(pairs[1].current, None);
        assert_eq!(pairs[1].growth(), None);
    }

    #[test]
    fn test_top_by_growth_nulls_last_and_truncated() {
        let items = vec![
            ("a", None),
            ("b", Some(1.0)),
            ("c", Some(-4.0)),
            ("d", Some(9.0)),
            ("e", None),
            ("f", Some(3.0)),
            ("g", Some(0.5)),
        ];
        let top = top_by_growth(items, |(_, g)| *g, TOP_N);
        let names: Vec<_> = top.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["d", "f", "b", "g", "c"]);

        let with_nulls = top_by_growth(vec![("x", None), ("y", Some(-1.0))], |(_, g)| *g, TOP_N);
        assert_eq!(with_nulls[0].0, "y");
        assert_eq!(with_nulls[1].0, "x");
    }

    #[test]
    fn test_factor_scaling() {
        assert_eq!(scale_factor_value(Factor::FiveGDaily, 1_000_000.0), 1.0);
        assert_eq!(scale_factor_value(Factor::FourGDaily, 2_000_000.0), 2.0);
        assert_eq!(scale_factor_value(Factor::IrRoaming, 1_000.0), 1.0);
        assert_eq!(scale_factor_value(Factor::KddiRoaming, 500.0), 0.5);
    }

    #[test]
    fn test_explode_factor_row_drops_non_positive() {
        let mut values = [None; 12];
        values[4] = Some(1_000_000.0);
        values[5] = Some(0.0);
        values[6] = Some(-5.0);
        values[7] = Some(3_000_000.0);
        let points = explode_factor_row(Factor::FiveGDaily, 2025, &values);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].month, "May");
        assert_eq!(points[0].value, 1.0);
        assert_eq!(points[1].month, "August");
        assert_eq!(points[1].value, 3.0);
        assert!(points.iter().all(|p| p.factor == Factor::FiveGDaily && p.year == 2025));
    }

    #[test]
    fn test_factor_growth_zero_june() {
        let growth = factor_growth(Factor::FourGDaily, 0.0, 5.0);
        assert_eq!(growth.growth_percentage, None);
        let growth = factor_growth(Factor::FourGDaily, 4.0, 5.0);
        assert!((growth.growth_percentage.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_renormalize_to_percent() {
        let records = vec![
            PrefectureRecord { prefecture: "Tokyo".into(), data_volume: 30.0 },
            PrefectureRecord { prefecture: "Osaka".into(), data_volume: 10.0 },
        ];
        let normalized = renormalize_to_percent(records);
        assert_eq!(normalized[0].data_volume, 75.0);
        assert_eq!(normalized[1].data_volume, 25.0);

        let zeros = renormalize_to_percent(vec![PrefectureRecord {
            prefecture: "Nowhere".into(),
            data_volume: 0.0,
        }]);
        assert_eq!(zeros[0].data_volume, 0.0);
    }

    #[test]
    fn test_top_by_volume() {
        let records = (1..=7)
            .map(|i| PrefectureRecord {
                prefecture: format!("P{i}"),
                data_volume: f64::from(i),
            })
            .collect();
        let top = top_by_volume(records, TOP_N);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].prefecture, "P7");
        assert_eq!(top[4].prefecture, "P3");
    }
}
