use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub node_env: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(5000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let node_env = std::env::var("NODE_ENV")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "development".to_string());

        Self {
            host,
            port,
            log_level,
            node_env,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Knobs for the reporting queries that are fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct AnalyticsOptions {
    pub application_denylist: Vec<String>,
    pub prefecture_fallback: bool,
}

pub const DEFAULT_APPLICATION_DENYLIST: &[&str] = &[
    "HTTPS",
    "HTTP",
    "Quic Obfuscated",
    "QUIC",
    "SSL",
    "Unknown",
    "Others",
];

impl AnalyticsOptions {
    pub fn from_env() -> Self {
        let application_denylist = std::env::var("APPLICATION_DENYLIST")
            .ok()
            .map(|raw| parse_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(default_denylist);

        let prefecture_fallback = env_bool("PREFECTURE_FALLBACK").unwrap_or(true);

        Self {
            application_denylist,
            prefecture_fallback,
        }
    }

    pub fn is_denied_application(&self, name: &str) -> bool {
        self.application_denylist
            .iter()
            .any(|denied| denied.eq_ignore_ascii_case(name.trim()))
    }
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            application_denylist: default_denylist(),
            prefecture_fallback: true,
        }
    }
}

fn default_denylist() -> Vec<String> {
    DEFAULT_APPLICATION_DENYLIST
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    parse_bool(&value)
}

fn parse_bool(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
