use super::*;
use crate::clock::ManualClock;

fn mode_enter(mode: &str) -> EventKind {
    EventKind::ModeEnter { mode: mode.into() }
}

#[test]
fn first_traffic_adds_an_online_device() {
    let mut tracker = PresenceTracker::new(ManualClock::new(), Duration::ZERO);
    let snapshot = tracker
        .observe(&DeviceId::new("10.0.0.5"), &mode_enter("terminal"))
        .expect("new device");
    assert_eq!(snapshot, vec![Device::online("10.0.0.5", "terminal")]);
    assert!(snapshot[0].is_ready());
}

#[test]
fn repeated_traffic_without_change_yields_nothing() {
    let mut tracker = PresenceTracker::new(ManualClock::new(), Duration::ZERO);
    let id = DeviceId::new("10.0.0.5");
    tracker.observe(&id, &mode_enter("terminal"));
    assert!(tracker.observe(&id, &EventKind::GameStart).is_none());
    assert!(tracker.observe(&id, &mode_enter("terminal")).is_none());
}

#[test]
fn mode_changes_update_the_snapshot() {
    let mut tracker = PresenceTracker::new(ManualClock::new(), Duration::ZERO);
    let id = DeviceId::new("10.0.0.5");
    tracker.observe(&id, &mode_enter("terminal"));

    let snapshot = tracker.observe(&id, &mode_enter("domination")).unwrap();
    assert_eq!(snapshot[0].mode.as_deref(), Some("domination"));

    let snapshot = tracker
        .observe(&id, &EventKind::ModeExit { mode: None })
        .unwrap();
    assert_eq!(snapshot[0].mode.as_deref(), Some(MAIN_MENU));
}

#[test]
fn silent_devices_expire_and_come_back() {
    let clock = ManualClock::new();
    let mut tracker = PresenceTracker::new(clock.clone(), Duration::from_secs(10));
    let id = DeviceId::new("10.0.0.5");
    tracker.observe(&id, &mode_enter("terminal"));

    clock.advance_secs(5);
    assert!(tracker.expire().is_none());

    clock.advance_secs(6);
    let snapshot = tracker.expire().expect("expired");
    assert_eq!(snapshot[0].status, DeviceStatus::Offline);
    assert!(tracker.expire().is_none());

    let snapshot = tracker.observe(&id, &EventKind::GameStart).unwrap();
    assert!(snapshot[0].is_online());
    assert_eq!(snapshot[0].mode.as_deref(), Some("terminal"));
}

#[test]
fn zero_timeout_never_expires() {
    let clock = ManualClock::new();
    let mut tracker = PresenceTracker::new(clock.clone(), Duration::ZERO);
    tracker.observe(&DeviceId::new("10.0.0.5"), &mode_enter("terminal"));
    clock.advance_secs(3600);
    assert!(tracker.expire().is_none());
}
