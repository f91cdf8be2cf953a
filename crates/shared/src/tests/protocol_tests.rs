use super::*;
use crate::domain::DeviceStatus;

#[test]
fn formats_milliseconds_and_seconds_as_clock() {
    assert_eq!(format_milliseconds(125_000), "02:05");
    assert_eq!(format_clock(75), "01:15");
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_milliseconds(999), "00:00");
}

#[test]
fn status_line_splits_on_first_colon_and_skips_bare_clauses() {
    let fields = parse_status_line("event:device_online;status:ready;version:1.2:rc;junk;");
    assert_eq!(fields.get("event").map(String::as_str), Some("device_online"));
    assert_eq!(fields.get("version").map(String::as_str), Some("1.2:rc"));
    assert!(!fields.contains_key("junk"));
    assert_eq!(fields.len(), 3);
}

#[test]
fn decodes_domination_events_from_status_lines() {
    let device = DeviceId::new("10.0.0.7");

    let event = GameEvent::from_status_line(device.clone(), "event:mode_enter;mode:domination;");
    assert_eq!(
        event.kind,
        EventKind::ModeEnter {
            mode: "domination".into()
        }
    );

    let event = GameEvent::from_status_line(device.clone(), "event:capture_start;team:1;");
    assert_eq!(event.kind, EventKind::CaptureStart { team: Team::Red });

    let event = GameEvent::from_status_line(
        device.clone(),
        "event:score_update;team1_score:125000;team2_score:4000;",
    );
    assert_eq!(
        event.kind,
        EventKind::ScoreUpdate {
            team1_ms: 125_000,
            team2_ms: 4_000
        }
    );

    // The firmware omits the trailing semicolon on some messages.
    let event = GameEvent::from_status_line(device, "event:time_update;time:42");
    assert_eq!(event.kind, EventKind::TimeUpdate { seconds: 42 });
}

#[test]
fn settings_update_keeps_presence_and_zeroes_malformed_numbers() {
    let event = GameEvent::from_status_line(
        DeviceId::new("T1"),
        "event:settings_update;bomb_time:abc;arm_pin:1234;disarm_pin:0000;arm_time:5;defuse_time:10;use_arm_pin:1;use_disarm_pin:0;",
    );
    let EventKind::SettingsUpdate(report) = event.kind else {
        panic!("expected settings update");
    };
    assert!(report.is_search_destroy());
    assert!(!report.is_domination());
    assert_eq!(report.bomb_time, Some(0));
    assert_eq!(report.arm_time, Some(5));
    assert_eq!(report.use_arm_pin, Some(true));
    assert_eq!(report.use_disarm_pin, Some(false));
    assert_eq!(report.disarm_pin.as_deref(), Some("0000"));
}

#[test]
fn unknown_event_names_are_preserved_not_rejected() {
    let event = GameEvent::from_status_line(
        DeviceId::new("T1"),
        "event:status_update;current_screen:main_menu;",
    );
    assert_eq!(
        event.kind,
        EventKind::Unknown {
            event: "status_update".into()
        }
    );
}

#[test]
fn decodes_relay_json_events_with_numeric_values() {
    let value = serde_json::json!({
        "deviceId": "T1",
        "event": "settings_update",
        "duration": "300",
        "capture": 10,
    });
    let event = GameEvent::from_json(&value).expect("decode");
    assert_eq!(event.device_id, DeviceId::new("T1"));
    let EventKind::SettingsUpdate(report) = event.kind else {
        panic!("expected settings update");
    };
    assert_eq!(report.duration, Some(300));
    assert_eq!(report.capture, Some(10));
}

#[test]
fn relay_json_without_device_id_is_rejected() {
    let value = serde_json::json!({ "event": "game_start" });
    assert_eq!(
        GameEvent::from_json(&value),
        Err(ProtocolError::MissingField("deviceId"))
    );
}

#[test]
fn presence_snapshot_decodes_full_device_list() {
    let devices = decode_presence_snapshot(
        r#"[{"id":"T1","status":"ONLINE","mode":"terminal"},{"id":"T2","status":"OFFLINE","mode":null}]"#,
    )
    .expect("snapshot");
    assert_eq!(devices.len(), 2);
    assert!(devices[0].is_ready());
    assert_eq!(devices[1].status, DeviceStatus::Offline);
    assert!(!devices[1].is_ready());
}

#[test]
fn commands_follow_terminal_grammar_exactly() {
    let target = DeviceId::new("T1");
    let dom = DeviceCommand::SetDominationSettings(DominationSettings {
        duration_secs: 300,
        capture_secs: 10,
    });
    assert_eq!(
        Command::new(&dom, target.clone()).text,
        "CMD:SET_DOM_SETTINGS;DURATION:300;CAPTURE:10;"
    );

    let sd = DeviceCommand::SetSearchDestroySettings(SearchDestroySettings {
        bomb_secs: 40,
        arm_secs: 5,
        defuse_secs: 10,
        use_arm_pin: true,
        arm_pin: "1234".into(),
        use_defuse_pin: false,
        defuse_pin: "0000".into(),
        round_minutes: Some(3),
    });
    assert_eq!(
        sd.to_string(),
        "CMD:SET_SD_SETTINGS;BOMB_TIME:40;ARM_TIME:5;DEFUSE_TIME:10;USE_ARM_PIN:1;ARM_PIN:1234;USE_DEFUSE_PIN:0;DEFUSE_PIN:0000;"
    );
    assert_eq!(DeviceCommand::StartDomination.to_string(), "CMD:START_DOM_GAME;");
    assert_eq!(DeviceCommand::StartSearchDestroy.to_string(), "CMD:START_SD_GAME;");
    assert_eq!(DeviceCommand::ForceEndGame.to_string(), "CMD:FORCE_END_GAME");
}

#[test]
fn log_line_carries_device_and_raw_fields() {
    let event = GameEvent::from_status_line(DeviceId::new("T1"), "event:arm_start;");
    let line = event.log_line();
    assert!(line.contains(r#""deviceId":"T1""#));
    assert!(line.contains(r#""event":"arm_start""#));
}
