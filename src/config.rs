use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Namespace root of every browse URI handed to the host (e.g. "tidal").
    #[serde(default = "default_service_prefix")]
    pub service_prefix: String,
    /// Display name used for the browse source, search sections and toasts.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    // Account
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,

    // Catalog API
    #[serde(default = "default_api_token")]
    pub api_token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_image_base")]
    pub image_base: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_sound_quality")]
    pub sound_quality: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    // Playback daemon
    #[serde(default = "default_mpd_host")]
    pub mpd_host: String,
    #[serde(default = "default_mpd_port")]
    pub mpd_port: u16,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_service_prefix() -> String { "tidal".into() }
fn default_service_name() -> String { "Tidal".into() }
fn default_api_token() -> String { "wdgaB1CilGA-S_s2".into() }
fn default_api_base() -> String { "https://api.tidal.com/v1".into() }
fn default_image_base() -> String { "https://resources.tidal.com/images".into() }
fn default_country_code() -> String { "US".into() }
fn default_sound_quality() -> String { "HI_RES".into() }
fn default_search_limit() -> u32 { 999 }
fn default_mpd_host() -> String { "127.0.0.1".into() }
fn default_mpd_port() -> u16 { 6600 }
fn default_log_dir() -> PathBuf { "/var/log/tidal-browse".into() }

impl Default for Config {
    fn default() -> Self {
        Self {
            service_prefix: default_service_prefix(),
            service_name: default_service_name(),
            username: None,
            password: None,
            api_token: default_api_token(),
            api_base: default_api_base(),
            image_base: default_image_base(),
            country_code: default_country_code(),
            sound_quality: default_sound_quality(),
            search_limit: default_search_limit(),
            mpd_host: default_mpd_host(),
            mpd_port: default_mpd_port(),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        if cfg.service_prefix.is_empty() || cfg.service_prefix.contains('/') {
            anyhow::bail!("service_prefix must be a single non-empty path segment");
        }
        Ok(cfg)
    }

    /// Username and password, if both are configured and non-empty.
    /// Without them the service stays disabled rather than failing.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }

    /// API base URL; `TIDAL_API_BASE` wins so tests can point at a mock server.
    pub fn effective_api_base(&self) -> String {
        std::env::var("TIDAL_API_BASE").unwrap_or_else(|_| self.api_base.clone())
    }

    pub fn mpd_address(&self) -> String {
        format!("{}:{}", self.mpd_host, self.mpd_port)
    }
}
