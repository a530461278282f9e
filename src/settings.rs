use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub radar: RadarSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct RadarSettings {
    pub api_token: Option<String>,   // Cloudflare Radar bearer token
    pub refresh_secs: Option<u64>,   // Poll interval, default 10
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("latglobe")
            .join("config.toml")
    }
}
