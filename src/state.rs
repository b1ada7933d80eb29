use std::sync::Arc;
use std::time::Instant;

use crate::config::AnalyticsOptions;
use crate::db::DatabaseProxy;
use crate::storage::MemStorage;

/// Where reporting reads come from, fixed at startup.
#[derive(Clone)]
pub enum DataSource {
    Postgres(Arc<DatabaseProxy>),
    /// `DATABASE_URL` was set but the pool could not be opened.
    Unavailable,
    Mock(Arc<MemStorage>),
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Postgres(_) | DataSource::Unavailable => "postgres",
            DataSource::Mock(_) => "mock",
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    source: DataSource,
    options: Arc<AnalyticsOptions>,
}

impl AppState {
    pub fn new(source: DataSource, options: AnalyticsOptions) -> Self {
        Self {
            started_at: Instant::now(),
            source,
            options: Arc::new(options),
        }
    }

    /// State backed by the seeded in-memory store.
    pub fn mock(options: AnalyticsOptions) -> Self {
        Self::new(DataSource::Mock(Arc::new(MemStorage::seeded())), options)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn options(&self) -> &AnalyticsOptions {
        &self.options
    }
}
