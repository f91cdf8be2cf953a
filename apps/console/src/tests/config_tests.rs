use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_the_terminal_network() {
    let settings = Settings::default();
    assert_eq!(settings.bind_addr, "0.0.0.0:1234");
    assert_eq!(settings.device_port, 1234);
    assert_eq!(settings.presence_timeout_secs, 0);
    assert_eq!(settings.tick_interval_ms, 50);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "bind_addr = \"127.0.0.1:4000\"\ndevice_port = 4001\nlog_level = \"debug\"\n",
    )
    .expect("valid toml");
    assert_eq!(settings.bind_addr, "127.0.0.1:4000");
    assert_eq!(settings.device_port, 4001);
    assert_eq!(settings.log_level, "debug");
    assert_eq!(settings.tick_interval_ms, 50);
}

#[test]
fn app_prefixed_env_wins_over_console_prefix() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("CONSOLE_BIND_ADDR", "10.0.0.1:1234"),
            ("APP__BIND_ADDR", "10.0.0.2:1234"),
            ("CONSOLE_PRESENCE_TIMEOUT_SECS", "15"),
        ]),
    );
    assert_eq!(settings.bind_addr, "10.0.0.2:1234");
    assert_eq!(settings.presence_timeout_secs, 15);
}

#[test]
fn malformed_env_numbers_keep_defaults() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("CONSOLE_DEVICE_PORT", "abc"),
            ("CONSOLE_TICK_INTERVAL_MS", "0"),
        ]),
    );
    assert_eq!(settings.device_port, 1234);
    assert_eq!(settings.tick_interval_ms, 50);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("field_console_missing_{suffix}.toml"));
    let settings = load_settings(&path).expect("defaults");
    assert_eq!(settings.device_port, Settings::default().device_port);
}

#[test]
fn broken_file_is_reported() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("field_console_broken_{suffix}.toml"));
    fs::write(&path, "device_port = \"not a port\"").expect("write");

    let err = load_settings(&path).unwrap_err();
    assert!(err.to_string().contains("invalid config file"));

    fs::remove_file(path).expect("cleanup");
}
