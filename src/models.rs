use serde::{Deserialize, Serialize};

pub const REPORT_YEAR: i32 = 2025;
pub const MAY: u32 = 5;
pub const JUNE: u32 = 6;
pub const JULY: u32 = 7;
pub const REPORT_MONTHS: [u32; 3] = [MAY, JUNE, JULY];

/// Categorical label of a network-metric series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Factor {
    #[serde(rename = "Holiday")]
    Holiday,
    #[serde(rename = "Working Day")]
    WorkingDay,
    #[serde(rename = "total_4g_data_daily")]
    FourGDaily,
    #[serde(rename = "total_5g_data_daily")]
    FiveGDaily,
    #[serde(rename = "B2B")]
    B2b,
    #[serde(rename = "B2C")]
    B2c,
    #[serde(rename = "KDDI_Roaming")]
    KddiRoaming,
    #[serde(rename = "IR_Roaming")]
    IrRoaming,
    #[serde(rename = "CPE_and_others")]
    CpeAndOthers,
}

impl Factor {
    pub const ALL: [Factor; 9] = [
        Factor::Holiday,
        Factor::WorkingDay,
        Factor::FourGDaily,
        Factor::FiveGDaily,
        Factor::B2b,
        Factor::B2c,
        Factor::KddiRoaming,
        Factor::IrRoaming,
        Factor::CpeAndOthers,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Factor::Holiday => "Holiday",
            Factor::WorkingDay => "Working Day",
            Factor::FourGDaily => "total_4g_data_daily",
            Factor::FiveGDaily => "total_5g_data_daily",
            Factor::B2b => "B2B",
            Factor::B2c => "B2C",
            Factor::KddiRoaming => "KDDI_Roaming",
            Factor::IrRoaming => "IR_Roaming",
            Factor::CpeAndOthers => "CPE_and_others",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }

    /// 5G-tagged series, the ones highlighted in the analytics summary.
    pub fn is_five_g(self) -> bool {
        self.as_str().contains("5g")
    }

    /// Divisor applied before charting: daily 4G/5G volumes are reported in
    /// millions, everything else in thousands.
    pub const fn divisor(self) -> f64 {
        match self {
            Factor::FourGDaily | Factor::FiveGDaily => 1_000_000.0,
            _ => 1_000.0,
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRecord {
    pub year: i32,
    pub month: u32,
    pub total_traffic: f64,
    pub normalized_traffic: f64,
    pub delta_percentage: Option<f64>,
    pub total_dl_vol: Option<f64>,
    pub total_ul_vol: Option<f64>,
    pub dl_ul_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub year: i32,
    pub month: u32,
    pub rank: u32,
    pub application: String,
    pub application_type: String,
    pub data_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub year: i32,
    pub month: u32,
    pub rank: u32,
    pub device: String,
    pub data_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetricRecord {
    pub year: i32,
    pub month: u32,
    pub factor: Factor,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefectureRecord {
    pub prefecture: String,
    pub data_volume: f64,
}

/// June/July volumes of one cell type.
#[derive(Debug, Clone, PartialEq)]
pub struct CellTypeRecord {
    pub cell_type: String,
    pub previous: f64,
    pub current: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGrowth {
    pub application: String,
    pub data_june: Option<f64>,
    pub data_july: Option<f64>,
    pub growth_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceGrowth {
    pub device: String,
    pub data_may: Option<f64>,
    pub data_june: Option<f64>,
    pub growth_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellTypeGrowth {
    #[serde(rename = "type")]
    pub cell_type: String,
    pub growth_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorPoint {
    pub month: String,
    pub year: i32,
    pub value: f64,
    pub factor: Factor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoamingData {
    pub ir_roaming: Vec<FactorPoint>,
    pub kddi_roaming: Vec<FactorPoint>,
    pub five_g_data: Vec<FactorPoint>,
    pub four_g_data: Vec<FactorPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorGrowth {
    pub factor: Factor,
    pub june_data: f64,
    pub july_data: f64,
    pub growth_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkGrowth {
    pub five_g: Option<FactorGrowth>,
    pub four_g: Option<FactorGrowth>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllGrowth {
    pub five_g: Option<FactorGrowth>,
    pub four_g: Option<FactorGrowth>,
    pub ir_roaming: Option<FactorGrowth>,
    pub kddi_roaming: Option<FactorGrowth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSummary {
    pub total_traffic_july: f64,
    pub normalized_traffic_july: f64,
    pub growth_rate: f64,
    pub total_growth_rate: f64,
    pub top_applications: Vec<ApplicationRecord>,
    pub top_devices: Vec<DeviceRecord>,
    pub five_g_metrics: Vec<NetworkMetricRecord>,
}
