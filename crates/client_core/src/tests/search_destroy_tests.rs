use super::*;
use shared::protocol::SettingsReport;

#[test]
fn arm_and_defuse_use_cached_durations() {
    let mut view = SearchDestroyView::new();
    view.apply(&EventKind::SettingsUpdate(SettingsReport {
        bomb_time: Some(40),
        arm_time: Some(3),
        defuse_time: Some(8),
        use_arm_pin: Some(true),
        arm_pin: Some("1234".into()),
        use_disarm_pin: Some(false),
        disarm_pin: Some("0000".into()),
        ..SettingsReport::default()
    }));

    let out = view.apply(&EventKind::ArmStart);
    assert_eq!(
        out[1],
        Directive::StartAction {
            element: Element::ArmProgress,
            seconds: 3
        }
    );
    let out = view.apply(&EventKind::BombArmed);
    assert_eq!(out[0], Directive::StopAction);
    assert_eq!(view.bomb_state(), BOMB_ARMED);

    let out = view.apply(&EventKind::DefuseStart);
    assert_eq!(
        out[1],
        Directive::StartAction {
            element: Element::DefuseProgress,
            seconds: 8
        }
    );
    view.apply(&EventKind::DefuseCancel);
    assert_eq!(view.bomb_state(), BOMB_ARMED);
}

#[test]
fn settings_echo_renders_pin_flags() {
    let mut view = SearchDestroyView::new();
    let out = view.apply(&EventKind::SettingsUpdate(SettingsReport {
        use_arm_pin: Some(true),
        use_disarm_pin: Some(false),
        ..SettingsReport::default()
    }));
    assert_eq!(
        out,
        vec![
            Directive::Text(Element::SettingUseArmPin, "Sì".into()),
            Directive::Text(Element::SettingUseDefusePin, "No".into()),
        ]
    );
}

#[test]
fn wrong_pin_only_changes_text() {
    let mut view = SearchDestroyView::new();
    let out = view.apply(&EventKind::ArmPinWrong);
    assert_eq!(out, vec![Directive::Text(Element::SdBombState, ARM_PIN_WRONG.into())]);
    let out = view.apply(&EventKind::DefusePinWrong);
    assert_eq!(
        out,
        vec![Directive::Text(Element::SdBombState, DEFUSE_PIN_WRONG.into())]
    );
}

#[test]
fn game_start_unlocks_round_timer_once() {
    let mut view = SearchDestroyView::new();
    assert!(view.take_round_timer().is_none());

    let out = view.apply(&EventKind::GameStart);
    assert!(out.contains(&Directive::Control(Control::StartRoundTimer, true)));
    assert!(view.round_timer_available());

    assert_eq!(
        view.take_round_timer(),
        Some(Directive::Control(Control::StartRoundTimer, false))
    );
    assert!(view.take_round_timer().is_none());
}

#[test]
fn game_end_maps_winner_side() {
    let mut view = SearchDestroyView::new();
    let out = view.apply(&EventKind::GameEnd {
        winner: "terrorists".into(),
    });
    assert_eq!(out[0], Directive::StopAllTimers);
    assert_eq!(view.bomb_state(), "Partita finita! Vince la squadra T");

    view.apply(&EventKind::GameEnd {
        winner: "counter-terrorists".into(),
    });
    assert_eq!(view.bomb_state(), "Partita finita! Vince la squadra CT");
}

#[test]
fn round_reset_returns_to_waiting_without_leaving_mode() {
    let mut view = SearchDestroyView::new();
    view.apply(&EventKind::GameStart);
    view.apply(&EventKind::BombArmed);

    let out = view.apply(&EventKind::RoundReset);
    assert_eq!(out[0], Directive::StopAllTimers);
    assert_eq!(view.bomb_state(), WAITING_FOR_START);
    assert!(!view.round_timer_available());
}

#[test]
fn bomb_timer_follows_authoritative_time() {
    let mut view = SearchDestroyView::new();
    let out = view.apply(&EventKind::TimeUpdate { seconds: 40 });
    assert_eq!(out, vec![Directive::Clock(Element::SdBombTimer, "00:40".into())]);
}

#[test]
fn round_reset_stops_a_running_arm_estimate() {
    let mut view = SearchDestroyView::new();
    view.apply(&EventKind::GameStart);
    view.apply(&EventKind::ArmStart);

    let out = view.apply(&EventKind::RoundReset);
    assert!(out.contains(&Directive::StopAllTimers));
    assert_eq!(view.bomb_state(), WAITING_FOR_START);
}
