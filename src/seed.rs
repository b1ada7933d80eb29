//! Literal records loaded into the mock store when no database is configured.

use crate::models::{CellTypeRecord, Factor, PrefectureRecord};

pub struct SeedTraffic {
    pub month: u32,
    pub total_traffic: f64,
    pub total_dl_vol: f64,
    pub total_ul_vol: f64,
    pub dl_ul_ratio: f64,
}

pub const TRAFFIC: &[SeedTraffic] = &[
    SeedTraffic {
        month: 5,
        total_traffic: 242_164_818.689_318_66,
        total_dl_vol: 220_863_318.0,
        total_ul_vol: 21_301_500.66,
        dl_ul_ratio: 10.368_439_37,
    },
    SeedTraffic {
        month: 6,
        total_traffic: 234_641_470.823_633_97,
        total_dl_vol: 214_189_757.2,
        total_ul_vol: 20_451_713.66,
        dl_ul_ratio: 10.472_949_15,
    },
    SeedTraffic {
        month: 7,
        total_traffic: 257_859_685.773_651_03,
        total_dl_vol: 235_187_074.5,
        total_ul_vol: 22_672_611.24,
        dl_ul_ratio: 10.373_179_87,
    },
];

/// Name, type, then May/June/July volumes.
pub const APPLICATIONS: &[(&str, &str, [f64; 3])] = &[
    ("YouTube", "Streaming Applications", [1_147_365.697_419_355_2, 1_016_596.978_333_333_5, 1_304_984.082_903_226]),
    ("Tik Tok", "Streaming Applications", [621_290.067_096_774_1, 563_143.131_999_999_9, 755_711.497_419_354_7]),
    ("Instagram", "Social Media Applications", [465_110.003_870_967_8, 419_735.649_333_333_36, 557_585.947_741_935_3]),
    ("HTTPS", "Web Applications", [347_953.890_322_580_64, 310_209.057_999_999_96, 398_643.287_096_774_1]),
    ("Quic Obfuscated", "Web Applications", [279_123.743_548_387_1, 253_275.109_333_333_36, 294_571.772_580_645_16]),
];

/// Device name, then May/June/July volumes.
pub const DEVICES: &[(&str, [f64; 3])] = &[
    ("Rakuten WiFi Pocket 2C", [12_406_904.008_808_6, 11_297_424.756_015_6, 10_434_558.360_742_2]),
    ("Apple iPhone 15 (A3089)", [11_570_559.826_484_4, 11_756_415.065_537_1, 12_114_490.002_763_7]),
    ("R2314M-JP", [11_417_169.084_433_6, 10_720_116.522_216_8, 10_208_660.320_527_3]),
    ("Apple iPhone 14 (A2881)", [9_190_232.254_296_86, 9_086_200.585_546_89, 9_146_504.576_396_5]),
    ("Rakuten WiFi Pocket Platinum", [8_882_967.278_613_29, 9_084_269.301_123_05, 9_363_400.151_630_83]),
    ("Apple iPhone 12 (A2402)", [7_460_332.262_666_02, 7_019_186.264_013_65, 6_927_646.243_710_93]),
    ("iPhone 13 (A2631)", [7_445_766.598_261_73, 7_234_009.198_173_82, 7_079_016.037_441_39]),
    ("Apple iPhone 16 (A3286)", [5_917_832.145_332_02, 6_322_306.898_310_52, 6_848_501.284_443_36]),
    ("Apple iPhone 15 Pro (A3101)", [5_337_911.872_666_02, 5_268_826.159_189_45, 5_280_197.662_070_32]),
    ("Apple iPhone 16 Pro (A3292)", [4_571_603.998_925_78, 4_836_999.509_707_02, 5_115_297.732_363_28]),
];

/// Factor, then May/June/July values.
pub const FACTORS: &[(Factor, [f64; 3])] = &[
    (Factor::WorkingDay, [6_539_428.66, 5_826_808.57, 7_573_382.26]),
    (Factor::Holiday, [7_391_175.58, 6_677_040.48, 8_295_456.8]),
    (Factor::FourGDaily, [6_583_912.65, 6_078_405.99, 6_662_765.7]),
    (Factor::FiveGDaily, [928_843.44, 950_295.53, 1_053_260.84]),
    (Factor::B2b, [0.48, 0.58, 0.52]),
    (Factor::B2c, [0.92, 1.11, 1.04]),
    (Factor::KddiRoaming, [466_308.3, 507_334.67, 495_385.3]),
    (Factor::IrRoaming, [5_084.35, 4_588.63, 4_951.24]),
    (Factor::CpeAndOthers, [6.75, 6.59, 6.16]),
];

const PREFECTURES: &[(&str, f64)] = &[
    ("Tokyo", 61_254_120.4),
    ("Osaka", 24_870_315.9),
    ("Kanagawa", 22_105_648.2),
    ("Aichi", 15_402_977.6),
    ("Saitama", 13_988_204.1),
    ("Chiba", 11_760_532.8),
    ("Fukuoka", 10_245_119.3),
];

/// Served when the prefecture query fails; volumes are relative weights.
const FALLBACK_PREFECTURES: &[(&str, f64)] = &[
    ("Tokyo", 45.0),
    ("Osaka", 20.0),
    ("Kanagawa", 15.0),
    ("Aichi", 12.0),
    ("Fukuoka", 8.0),
];

/// Cell type, then June/July volumes.
const CELL_TYPES: &[(&str, f64, f64)] = &[
    ("Macro", 182_406_551.2, 199_873_204.6),
    ("Small Cell", 31_228_904.7, 35_102_118.3),
    ("Indoor", 15_876_330.1, 16_402_871.9),
    ("FWA", 5_309_684.8, 6_481_490.9),
];

pub fn prefectures() -> Vec<PrefectureRecord> {
    to_prefecture_records(PREFECTURES)
}

pub fn fallback_prefectures() -> Vec<PrefectureRecord> {
    to_prefecture_records(FALLBACK_PREFECTURES)
}

pub fn cell_types() -> Vec<CellTypeRecord> {
    CELL_TYPES
        .iter()
        .map(|(name, previous, current)| CellTypeRecord {
            cell_type: name.to_string(),
            previous: *previous,
            current: *current,
        })
        .collect()
}

fn to_prefecture_records(rows: &[(&str, f64)]) -> Vec<PrefectureRecord> {
    rows.iter()
        .map(|(name, volume)| PrefectureRecord {
            prefecture: name.to_string(),
            data_volume: *volume,
        })
        .collect()
}
