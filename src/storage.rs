use std::cmp::Ordering;
use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{
    ApplicationRecord, CellTypeRecord, DeviceRecord, NetworkMetricRecord, PrefectureRecord,
    TrafficRecord, REPORT_MONTHS, REPORT_YEAR,
};
use crate::seed;
use crate::services::growth::normalize_daily;

/// In-memory record store used when no database is configured.
///
/// Filled once at startup and only read afterwards. Readers return sorted
/// snapshots so callers never hold a lock.
#[derive(Debug, Default)]
pub struct MemStorage {
    traffic: RwLock<HashMap<Uuid, TrafficRecord>>,
    applications: RwLock<HashMap<Uuid, ApplicationRecord>>,
    devices: RwLock<HashMap<Uuid, DeviceRecord>>,
    network_metrics: RwLock<HashMap<Uuid, NetworkMetricRecord>>,
    prefectures: RwLock<Vec<PrefectureRecord>>,
    cell_types: RwLock<Vec<CellTypeRecord>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let storage = Self::new();
        storage.load_seed();
        storage
    }

    pub fn insert_traffic(&self, record: TrafficRecord) -> Uuid {
        let id = Uuid::new_v4();
        self.traffic.write().insert(id, record);
        id
    }

    pub fn insert_application(&self, record: ApplicationRecord) -> Uuid {
        let id = Uuid::new_v4();
        self.applications.write().insert(id, record);
        id
    }

    pub fn insert_device(&self, record: DeviceRecord) -> Uuid {
        let id = Uuid::new_v4();
        self.devices.write().insert(id, record);
        id
    }

    pub fn insert_network_metric(&self, record: NetworkMetricRecord) -> Uuid {
        let id = Uuid::new_v4();
        self.network_metrics.write().insert(id, record);
        id
    }

    pub fn set_prefectures(&self, records: Vec<PrefectureRecord>) {
        *self.prefectures.write() = records;
    }

    pub fn set_cell_types(&self, records: Vec<CellTypeRecord>) {
        *self.cell_types.write() = records;
    }

    pub fn traffic_records(&self) -> Vec<TrafficRecord> {
        let mut records: Vec<_> = self.traffic.read().values().cloned().collect();
        records.sort_by_key(|r| (r.year, r.month));
        records
    }

    pub fn application_records(&self) -> Vec<ApplicationRecord> {
        let mut records: Vec<_> = self.applications.read().values().cloned().collect();
        records.sort_by(|a, b| (a.year, a.month, a.rank).cmp(&(b.year, b.month, b.rank)));
        records
    }

    pub fn device_records(&self) -> Vec<DeviceRecord> {
        let mut records: Vec<_> = self.devices.read().values().cloned().collect();
        records.sort_by(|a, b| (a.year, a.month, a.rank).cmp(&(b.year, b.month, b.rank)));
        records
    }

    pub fn network_metric_records(&self) -> Vec<NetworkMetricRecord> {
        let mut records: Vec<_> = self.network_metrics.read().values().cloned().collect();
        records.sort_by(|a, b| (a.year, a.month, a.factor).cmp(&(b.year, b.month, b.factor)));
        records
    }

    pub fn prefecture_records(&self) -> Vec<PrefectureRecord> {
        self.prefectures.read().clone()
    }

    pub fn cell_type_records(&self) -> Vec<CellTypeRecord> {
        self.cell_types.read().clone()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.traffic.read().is_empty()
            && self.applications.read().is_empty()
            && self.devices.read().is_empty()
            && self.network_metrics.read().is_empty()
    }

    fn load_seed(&self) {
        for row in seed::TRAFFIC {
            self.insert_traffic(TrafficRecord {
                year: REPORT_YEAR,
                month: row.month,
                total_traffic: row.total_traffic,
                normalized_traffic: normalize_daily(row.total_traffic, REPORT_YEAR, row.month),
                delta_percentage: None,
                total_dl_vol: Some(row.total_dl_vol),
                total_ul_vol: Some(row.total_ul_vol),
                dl_ul_ratio: Some(row.dl_ul_ratio),
            });
        }

        for (idx, month) in REPORT_MONTHS.into_iter().enumerate() {
            let app_ranks = dense_ranks(seed::APPLICATIONS.iter().map(|(_, _, v)| v[idx]));
            for ((name, app_type, volumes), rank) in seed::APPLICATIONS.iter().zip(app_ranks) {
                self.insert_application(ApplicationRecord {
                    year: REPORT_YEAR,
                    month,
                    rank,
                    application: name.to_string(),
                    application_type: app_type.to_string(),
                    data_volume: volumes[idx],
                });
            }

            let device_ranks = dense_ranks(seed::DEVICES.iter().map(|(_, v)| v[idx]));
            for ((name, volumes), rank) in seed::DEVICES.iter().zip(device_ranks) {
                self.insert_device(DeviceRecord {
                    year: REPORT_YEAR,
                    month,
                    rank,
                    device: name.to_string(),
                    data_volume: volumes[idx],
                });
            }

            for (factor, values) in seed::FACTORS {
                self.insert_network_metric(NetworkMetricRecord {
                    year: REPORT_YEAR,
                    month,
                    factor: *factor,
                    value: values[idx],
                });
            }
        }

        self.set_prefectures(seed::prefectures());
        self.set_cell_types(seed::cell_types());

        tracing::debug!(
            traffic = self.traffic.read().len(),
            applications = self.applications.read().len(),
            devices = self.devices.read().len(),
            network_metrics = self.network_metrics.read().len(),
            "mock storage seeded"
        );
    }
}

/// Rank of each input position when ordered by volume descending (1-based).
fn dense_ranks<I>(volumes: I) -> Vec<u32>
where
    I: IntoIterator<Item = f64>,
{
    let volumes: Vec<f64> = volumes.into_iter().collect();
    let mut order: Vec<usize> = (0..volumes.len()).collect();
    order.sort_by(|&a, &b| {
        volumes[b]
            .partial_cmp(&volumes[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0u32; volumes.len()];
    for (position, idx) in order.into_iter().enumerate() {
        ranks[idx] = position as u32 + 1;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Factor;

    #[test]
    fn test_dense_ranks() {
        assert_eq!(dense_ranks(vec![3.0, 9.0, 1.0, 5.0]), vec![3, 1, 4, 2]);
        assert!(dense_ranks(Vec::<f64>::new()).is_empty());
    }

    #[test]
    fn test_empty_storage() {
        let storage = MemStorage::new();
        assert!(storage.is_empty());
        assert!(storage.traffic_records().is_empty());
        assert!(storage.prefecture_records().is_empty());
    }

    #[test]
    fn test_seeded_traffic_is_sorted_and_normalized() {
        let storage = MemStorage::seeded();
        let traffic = storage.traffic_records();
        assert_eq!(traffic.iter().map(|r| r.month).collect::<Vec<_>>(), vec![5, 6, 7]);
        let july = &traffic[2];
        assert!((july.normalized_traffic - july.total_traffic / 31.0).abs() < 1e-6);
        assert!(traffic.iter().all(|r| r.delta_percentage.is_none()));
    }

    #[test]
    fn test_seeded_ranks_are_dense_per_month() {
        let storage = MemStorage::seeded();
        for month in REPORT_MONTHS {
            let mut ranks: Vec<u32> = storage
                .device_records()
                .into_iter()
                .filter(|d| d.month == month)
                .map(|d| d.rank)
                .collect();
            ranks.sort_unstable();
            assert_eq!(ranks, (1..=seed::DEVICES.len() as u32).collect::<Vec<_>>());
        }

        let july_leader = storage
            .device_records()
            .into_iter()
            .find(|d| d.month == 7 && d.rank == 1)
            .unwrap();
        assert_eq!(july_leader.device, "Apple iPhone 15 (A3089)");
    }

    #[test]
    fn test_seeded_network_metrics_cover_every_factor() {
        let storage = MemStorage::seeded();
        let metrics = storage.network_metric_records();
        assert_eq!(metrics.len(), Factor::ALL.len() * REPORT_MONTHS.len());
        for factor in Factor::ALL {
            assert_eq!(metrics.iter().filter(|m| m.factor == factor).count(), 3);
        }
    }

    #[test]
    fn test_insert_returns_distinct_ids() {
        let storage = MemStorage::new();
        let record = PrefectureRecord {
            prefecture: "Tokyo".into(),
            data_volume: 1.0,
        };
        storage.set_prefectures(vec![record.clone()]);
        let a = storage.insert_network_metric(NetworkMetricRecord {
            year: 2025,
            month: 5,
            factor: Factor::B2b,
            value: 0.5,
        });
        let b = storage.insert_network_metric(NetworkMetricRecord {
            year: 2025,
            month: 6,
            factor: Factor::B2b,
            value: 0.6,
        });
        assert_ne!(a, b);
        assert_eq!(storage.prefecture_records(), vec![record]);
        assert!(!storage.is_empty());
    }
}
