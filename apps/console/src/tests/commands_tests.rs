use super::*;

#[test]
fn parses_navigation_commands() {
    assert_eq!(
        parse("mode dom"),
        Ok(OperatorCommand::Mode(GameMode::Domination))
    );
    assert_eq!(
        parse("  MODE SD "),
        Ok(OperatorCommand::Mode(GameMode::SearchDestroy))
    );
    assert_eq!(
        parse("pick 192.168.4.2"),
        Ok(OperatorCommand::Pick(DeviceId::new("192.168.4.2")))
    );
    assert_eq!(parse("back"), Ok(OperatorCommand::Back));
    assert_eq!(parse("quit"), Ok(OperatorCommand::Quit));
}

#[test]
fn domination_settings_are_lenient_about_numbers() {
    assert_eq!(
        parse("dom-settings 300 ten"),
        Ok(OperatorCommand::DominationSettings(DominationSettings {
            duration_secs: 300,
            capture_secs: 0,
        }))
    );
    assert_eq!(
        parse("dom-settings 300"),
        Err(ParseError::Missing {
            command: "dom-settings",
            argument: "capture"
        })
    );
}

#[test]
fn search_destroy_settings_handle_disabled_pins_and_round() {
    let Ok(OperatorCommand::SearchDestroySettings(settings)) =
        parse("sd-settings 40 5 10 1234 - 3")
    else {
        panic!("expected sd settings");
    };
    assert_eq!(settings.bomb_secs, 40);
    assert!(settings.use_arm_pin);
    assert_eq!(settings.arm_pin, "1234");
    assert!(!settings.use_defuse_pin);
    assert_eq!(settings.defuse_pin, "0000");
    assert_eq!(settings.round_minutes, Some(3));

    let Ok(OperatorCommand::SearchDestroySettings(settings)) = parse("sd-settings 40 5 10 - -")
    else {
        panic!("expected sd settings");
    };
    assert_eq!(settings.round_minutes, None);
}

#[test]
fn malformed_round_minutes_become_zero() {
    assert_eq!(parse("round abc"), Ok(OperatorCommand::RoundTimer(0)));
}

#[test]
fn rejects_unknown_input() {
    assert_eq!(parse("   "), Err(ParseError::Empty));
    assert_eq!(
        parse("launch"),
        Err(ParseError::Unknown("launch".into()))
    );
    assert_eq!(
        parse("mode ctf"),
        Err(ParseError::UnknownMode("ctf".into()))
    );
}
