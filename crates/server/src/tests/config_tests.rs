use super::{load_settings_from, normalize_data_path, Settings};

use std::{collections::HashMap, fs, path::PathBuf};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("dashboard.toml"), no_env);

    let defaults = Settings::default();
    assert_eq!(settings.server_bind, defaults.server_bind);
    assert_eq!(settings.data_path, defaults.data_path);
    assert_eq!(settings.page_title, "DASHBOARD OPERACIONAL");
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("dashboard.toml");
    fs::write(
        &config_path,
        r#"
bind_addr = "0.0.0.0:9000"
data_path = "/srv/exports/saida.json"
company_name = "ACME"
"#,
    )
    .expect("write config");

    let settings = load_settings_from(&config_path, no_env);
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.data_path, PathBuf::from("/srv/exports/saida.json"));
    assert_eq!(settings.company_name, "ACME");
    assert_eq!(settings.page_title, "DASHBOARD OPERACIONAL");
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("dashboard.toml");
    fs::write(&config_path, "data_path = \"from-file.json\"\n").expect("write config");

    let env: HashMap<&str, &str> = HashMap::from([
        ("DASHBOARD_DATA_PATH", "plain-env.json"),
        ("APP__DATA_PATH", "app-env.json"),
        ("SERVER_BIND", "127.0.0.1:7000"),
        ("APP__PAGE_TITLE", "PAINEL"),
    ]);
    let settings = load_settings_from(&config_path, |key| {
        env.get(key).map(|value| value.to_string())
    });

    assert_eq!(settings.data_path, PathBuf::from("app-env.json"));
    assert_eq!(settings.server_bind, "127.0.0.1:7000");
    assert_eq!(settings.page_title, "PAINEL");
}

#[test]
fn malformed_config_file_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("dashboard.toml");
    fs::write(&config_path, "bind_addr = [").expect("write config");

    let settings = load_settings_from(&config_path, no_env);
    assert_eq!(settings.server_bind, Settings::default().server_bind);
}

#[test]
fn strips_quotes_from_copied_windows_path() {
    assert_eq!(
        normalize_data_path(r#" "C:\Users\User\OneDrive\saida.json" "#),
        PathBuf::from(r"C:\Users\User\OneDrive\saida.json")
    );
}

#[test]
fn blank_data_path_falls_back_to_default() {
    assert_eq!(normalize_data_path("   "), Settings::default().data_path);
    assert_eq!(normalize_data_path("\"\""), Settings::default().data_path);
}
