use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    assert_eq!(load_settings_from(None, no_env), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let settings = load_settings_from(
        Some(
            r#"
bind_addr = "0.0.0.0:9000"
catalog_path = "/etc/cockpit/catalog.toml"
session_idle_seconds = 90
"#,
        ),
        no_env,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(
        settings.catalog_path,
        PathBuf::from("/etc/cockpit/catalog.toml")
    );
    assert_eq!(settings.session_idle_timeout(), Duration::from_secs(90));
}

#[test]
fn app_prefixed_env_wins_over_short_names_and_file() {
    let settings = load_settings_from(Some("bind_addr = \"0.0.0.0:9000\""), |key| match key {
        "SHELL_BIND" => Some("127.0.0.1:1".into()),
        "APP__BIND_ADDR" => Some("127.0.0.1:2".into()),
        "SHELL_CATALOG" => Some("short.toml".into()),
        "APP__SESSION_IDLE_SECONDS" => Some("5".into()),
        _ => None,
    });
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.catalog_path, PathBuf::from("short.toml"));
    assert_eq!(settings.session_idle_seconds, 5);
}

#[test]
fn malformed_inputs_fall_back_to_defaults() {
    let settings = load_settings_from(Some("this is = = not toml"), |key| {
        (key == "APP__SESSION_IDLE_SECONDS").then(|| "soon".to_string())
    });
    assert_eq!(settings, Settings::default());
}
