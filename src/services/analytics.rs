//! One operation per reporting category. Each reads from whichever data
//! source the process was started with and returns the JSON-ready shape.

use futures::future::try_join_all;
use thiserror::Error;

use crate::config::AnalyticsOptions;
use crate::db::operations::{cell_types, factors, prefectures, rankings, traffic};
use crate::db::operations::factors::FactorRow;
use crate::models::{
    AllGrowth, ApplicationGrowth, CellTypeGrowth, DeviceGrowth, Factor, FactorGrowth,
    FactorPoint, NetworkGrowth, NetworkMetricRecord, PrefectureRecord, RoamingData,
    TrafficRecord, TrafficSummary, JULY, JUNE, MAY, REPORT_MONTHS,
};
use crate::seed;
use crate::services::growth::{
    explode_factor_row, factor_growth, growth_or_zero, merge_periods, renormalize_to_percent,
    sort_by_growth_desc, top_by_growth, top_by_volume, with_month_over_month_delta, Period,
    PeriodVolume, TOP_N,
};
use crate::state::DataSource;
use crate::storage::MemStorage;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Database not connected")]
    DatabaseNotConnected,
    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

pub async fn get_traffic_growth_data(
    source: &DataSource,
) -> Result<Vec<TrafficRecord>, AnalyticsError> {
    let records = match source {
        DataSource::Postgres(proxy) => traffic::fetch_traffic_rows(proxy).await?,
        DataSource::Mock(storage) => storage.traffic_records(),
        DataSource::Unavailable => return Err(AnalyticsError::DatabaseNotConnected),
    };
    Ok(with_month_over_month_delta(records))
}

/// Number of July applications and devices listed in the summary.
pub const SUMMARY_TOP_N: usize = 3;

pub async fn get_traffic_summary(source: &DataSource) -> Result<TrafficSummary, AnalyticsError> {
    let (row, top_applications, top_devices, five_g_metrics) = match source {
        DataSource::Postgres(proxy) => {
            let (row, applications, devices, factor_rows) = tokio::try_join!(
                traffic::fetch_summary_row(proxy),
                rankings::fetch_top_july_applications(proxy, SUMMARY_TOP_N),
                rankings::fetch_top_july_devices(proxy, SUMMARY_TOP_N),
                factors::fetch_all_factor_rows(proxy),
            )?;
            (row, applications, devices, july_five_g(window_metrics(&factor_rows)))
        }
        DataSource::Mock(storage) => (
            mock_summary_row(storage),
            latest_july(storage.application_records(), |r| (r.year, r.month)),
            latest_july(storage.device_records(), |r| (r.year, r.month)),
            july_five_g(storage.network_metric_records()),
        ),
        DataSource::Unavailable => return Err(AnalyticsError::DatabaseNotConnected),
    };

    Ok(TrafficSummary {
        top_applications,
        top_devices,
        five_g_metrics,
        ..summarize(row)
    })
}

/// First `SUMMARY_TOP_N` July records of the latest year. Input is sorted by
/// (year, month, rank).
fn latest_july<T, F>(records: Vec<T>, period: F) -> Vec<T>
where
    F: Fn(&T) -> (i32, u32),
{
    let Some(year) = records
        .iter()
        .map(&period)
        .filter(|(_, month)| *month == JULY)
        .map(|(year, _)| year)
        .max()
    else {
        return Vec::new();
    };

    records
        .into_iter()
        .filter(|r| period(r) == (year, JULY))
        .take(SUMMARY_TOP_N)
        .collect()
}

fn july_five_g(metrics: Vec<NetworkMetricRecord>) -> Vec<NetworkMetricRecord> {
    metrics
        .into_iter()
        .filter(|m| m.month == JULY && m.factor.is_five_g())
        .collect()
}

/// July-over-June growth is measured on daily-average traffic so the 30-day
/// June does not read as a dip. A zero June total yields a zero rate.
pub fn summarize(row: traffic::SummaryRow) -> TrafficSummary {
    let (growth_rate, total_growth_rate) = if row.june_traffic == 0.0 {
        (0.0, 0.0)
    } else {
        (
            growth_or_zero(row.june_normalized, row.july_normalized),
            growth_or_zero(row.june_traffic, row.july_traffic),
        )
    };

    TrafficSummary {
        total_traffic_july: row.july_traffic,
        normalized_traffic_july: row.july_normalized,
        growth_rate,
        total_growth_rate,
        top_applications: Vec::new(),
        top_devices: Vec::new(),
        five_g_metrics: Vec::new(),
    }
}

fn mock_summary_row(storage: &MemStorage) -> traffic::SummaryRow {
    let mut row = traffic::SummaryRow::default();
    for record in storage.traffic_records() {
        match record.month {
            JULY => {
                row.july_traffic += record.total_traffic;
                row.july_normalized += record.normalized_traffic;
            }
            JUNE => {
                row.june_traffic += record.total_traffic;
                row.june_normalized += record.normalized_traffic;
            }
            _ => {}
        }
    }
    row
}

pub async fn get_application_data(
    source: &DataSource,
    options: &AnalyticsOptions,
) -> Result<Vec<ApplicationGrowth>, AnalyticsError> {
    let volumes = match source {
        DataSource::Postgres(proxy) => rankings::fetch_application_volumes(proxy).await?,
        DataSource::Mock(storage) => long_volumes(
            storage
                .application_records()
                .into_iter()
                .map(|r| (r.application, r.month, r.data_volume)),
            JUNE,
            JULY,
        ),
        DataSource::Unavailable => return Err(AnalyticsError::DatabaseNotConnected),
    };

    let rows: Vec<ApplicationGrowth> = merge_periods(volumes)
        .into_iter()
        .filter(|pair| !options.is_denied_application(&pair.name))
        .map(|pair| ApplicationGrowth {
            growth_percentage: pair.growth(),
            application: pair.name,
            data_june: pair.previous,
            data_july: pair.current,
        })
        .collect();

    Ok(top_by_growth(rows, |r| r.growth_percentage, TOP_N))
}

pub async fn get_device_data(source: &DataSource) -> Result<Vec<DeviceGrowth>, AnalyticsError> {
    let volumes = match source {
        DataSource::Postgres(proxy) => rankings::fetch_device_volumes(proxy).await?,
        DataSource::Mock(storage) => long_volumes(
            storage
                .device_records()
                .into_iter()
                .map(|r| (r.device, r.month, r.data_volume)),
            MAY,
            JUNE,
        ),
        DataSource::Unavailable => return Err(AnalyticsError::DatabaseNotConnected),
    };

    let rows: Vec<DeviceGrowth> = merge_periods(volumes)
        .into_iter()
        .map(|pair| DeviceGrowth {
            growth_percentage: pair.growth(),
            device: pair.name,
            data_may: pair.previous,
            data_june: pair.current,
        })
        .collect();

    Ok(top_by_growth(rows, |r| r.growth_percentage, TOP_N))
}

/// Converts monthly records to long rows for the two compared months,
/// dropping every other month.
fn long_volumes<I>(records: I, previous_month: u32, current_month: u32) -> Vec<PeriodVolume>
where
    I: IntoIterator<Item = (String, u32, f64)>,
{
    records
        .into_iter()
        .filter_map(|(name, month, volume)| {
            let period = if month == previous_month {
                Period::Previous
            } else if month == current_month {
                Period::Current
            } else {
                return None;
            };
            Some(PeriodVolume {
                name,
                period,
                volume: Some(volume),
            })
        })
        .collect()
}

pub async fn get_roaming_data(source: &DataSource) -> Result<RoamingData, AnalyticsError> {
    let wanted = [
        Factor::IrRoaming,
        Factor::KddiRoaming,
        Factor::FiveGDaily,
        Factor::FourGDaily,
    ];
    let mut rows = factor_rows(source, &wanted).await?.into_iter();
    let mut next_points = || -> Vec<FactorPoint> {
        rows.next()
            .flatten()
            .map(|row| explode_factor_row(row.factor, row.year, &row.months))
            .unwrap_or_default()
    };

    Ok(RoamingData {
        ir_roaming: next_points(),
        kddi_roaming: next_points(),
        five_g_data: next_points(),
        four_g_data: next_points(),
    })
}

pub async fn get_5g_4g_growth(source: &DataSource) -> Result<NetworkGrowth, AnalyticsError> {
    let rows = factor_rows(source, &[Factor::FiveGDaily, Factor::FourGDaily]).await?;
    let mut growth = rows.iter().map(june_july_growth);

    Ok(NetworkGrowth {
        five_g: growth.next().flatten(),
        four_g: growth.next().flatten(),
    })
}

pub async fn get_all_growth_data(source: &DataSource) -> Result<AllGrowth, AnalyticsError> {
    let rows = factor_rows(
        source,
        &[
            Factor::FiveGDaily,
            Factor::FourGDaily,
            Factor::IrRoaming,
            Factor::KddiRoaming,
        ],
    )
    .await?;
    let mut growth = rows.iter().map(june_july_growth);

    Ok(AllGrowth {
        five_g: growth.next().flatten(),
        four_g: growth.next().flatten(),
        ir_roaming: growth.next().flatten(),
        kddi_roaming: growth.next().flatten(),
    })
}

fn june_july_growth(row: &Option<FactorRow>) -> Option<FactorGrowth> {
    row.as_ref()
        .map(|r| factor_growth(r.factor, r.month_value(JUNE), r.month_value(JULY)))
}

/// Fetches one wide row per requested factor, in request order. Database
/// lookups run concurrently.
async fn factor_rows(
    source: &DataSource,
    wanted: &[Factor],
) -> Result<Vec<Option<FactorRow>>, AnalyticsError> {
    match source {
        DataSource::Postgres(proxy) => {
            let rows = try_join_all(
                wanted
                    .iter()
                    .map(|factor| factors::fetch_factor_row(proxy, *factor)),
            )
            .await?;
            Ok(rows)
        }
        DataSource::Mock(storage) => {
            let metrics = storage.network_metric_records();
            Ok(wanted
                .iter()
                .map(|factor| mock_factor_row(&metrics, *factor))
                .collect())
        }
        DataSource::Unavailable => Err(AnalyticsError::DatabaseNotConnected),
    }
}

fn mock_factor_row(metrics: &[NetworkMetricRecord], factor: Factor) -> Option<FactorRow> {
    let year = metrics
        .iter()
        .filter(|m| m.factor == factor)
        .map(|m| m.year)
        .max()?;

    let mut months = [None; 12];
    for metric in metrics
        .iter()
        .filter(|m| m.factor == factor && m.year == year)
    {
        if let Some(slot) = metric
            .month
            .checked_sub(1)
            .and_then(|idx| months.get_mut(idx as usize))
        {
            *slot = Some(metric.value);
        }
    }

    Some(FactorRow {
        factor,
        year,
        months,
    })
}

pub async fn get_prefecture_data(
    source: &DataSource,
    options: &AnalyticsOptions,
) -> Result<Vec<PrefectureRecord>, AnalyticsError> {
    let result = match source {
        DataSource::Postgres(proxy) => prefectures::fetch_top_prefectures(proxy, TOP_N)
            .await
            .map_err(AnalyticsError::from),
        DataSource::Mock(storage) => Ok(top_by_volume(storage.prefecture_records(), TOP_N)),
        DataSource::Unavailable => Err(AnalyticsError::DatabaseNotConnected),
    };
    resolve_prefectures(result, options.prefecture_fallback)
}

/// Passes query results through untouched. On failure, either substitutes the
/// built-in list as percentage shares or propagates the error.
pub fn resolve_prefectures(
    result: Result<Vec<PrefectureRecord>, AnalyticsError>,
    fallback_enabled: bool,
) -> Result<Vec<PrefectureRecord>, AnalyticsError> {
    match result {
        Ok(records) => Ok(records),
        Err(err) if fallback_enabled => {
            tracing::warn!(error = %err, "prefecture query failed, serving fallback shares");
            Ok(renormalize_to_percent(top_by_volume(
                seed::fallback_prefectures(),
                TOP_N,
            )))
        }
        Err(err) => Err(err),
    }
}

pub async fn get_cell_type_growth(
    source: &DataSource,
) -> Result<Vec<CellTypeGrowth>, AnalyticsError> {
    let records = match source {
        DataSource::Postgres(proxy) => cell_types::fetch_cell_types(proxy).await?,
        DataSource::Mock(storage) => storage.cell_type_records(),
        DataSource::Unavailable => return Err(AnalyticsError::DatabaseNotConnected),
    };

    let mut rows: Vec<CellTypeGrowth> = records
        .into_iter()
        .map(|r| CellTypeGrowth {
            growth_percentage: growth_or_zero(r.previous, r.current),
            cell_type: r.cell_type,
        })
        .collect();
    sort_by_growth_desc(&mut rows, |r| Some(r.growth_percentage));
    Ok(rows)
}

pub async fn get_network_metrics(
    source: &DataSource,
) -> Result<Vec<NetworkMetricRecord>, AnalyticsError> {
    match source {
        DataSource::Postgres(proxy) => {
            let rows = factors::fetch_all_factor_rows(proxy).await?;
            Ok(window_metrics(&rows))
        }
        DataSource::Mock(storage) => Ok(storage.network_metric_records()),
        DataSource::Unavailable => Err(AnalyticsError::DatabaseNotConnected),
    }
}

/// Long-format records for the reporting window months, raw values.
fn window_metrics(rows: &[FactorRow]) -> Vec<NetworkMetricRecord> {
    let mut records: Vec<NetworkMetricRecord> = rows
        .iter()
        .flat_map(|row| {
            REPORT_MONTHS.into_iter().filter_map(move |month| {
                let value = row.months[(month - 1) as usize]?;
                Some(NetworkMetricRecord {
                    year: row.year,
                    month,
                    factor: row.factor,
                    value,
                })
            })
        })
        .collect();
    records.sort_by(|a, b| (a.year, a.month, a.factor).cmp(&(b.year, b.month, b.factor)));
    records
}
