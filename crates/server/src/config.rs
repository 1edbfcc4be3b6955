use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

pub const CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub data_path: PathBuf,
    pub page_title: String,
    pub company_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            data_path: PathBuf::from("./data/saida.json"),
            page_title: "DASHBOARD OPERACIONAL".into(),
            company_name: "ENERGILÉTRICA".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("data_path") {
                settings.data_path = normalize_data_path(v);
            }
            if let Some(v) = file_cfg.get("page_title") {
                settings.page_title = v.clone();
            }
            if let Some(v) = file_cfg.get("company_name") {
                settings.company_name = v.clone();
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("DASHBOARD_DATA_PATH") {
        settings.data_path = normalize_data_path(&v);
    }
    if let Some(v) = env("APP__DATA_PATH") {
        settings.data_path = normalize_data_path(&v);
    }

    if let Some(v) = env("APP__PAGE_TITLE") {
        settings.page_title = v;
    }
    if let Some(v) = env("APP__COMPANY_NAME") {
        settings.company_name = v;
    }

    settings
}

/// Trims whitespace and the quotes Windows "copy as path" adds. A blank value
/// falls back to the default export location.
pub fn normalize_data_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();

    if unquoted.is_empty() {
        return Settings::default().data_path;
    }

    PathBuf::from(unquoted)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
