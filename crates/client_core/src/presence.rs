//! Presence derived from direct terminal traffic.
//!
//! Terminals on a plain UDP link never send a presence list; the tracker
//! builds full-replacement snapshots from what each sender last reported.

use std::time::{Duration, Instant};

use shared::{
    domain::{Device, DeviceId, DeviceStatus},
    protocol::EventKind,
};
use tracing::info;

use crate::clock::Clock;

/// Mode a terminal reports after boot or after leaving a game mode.
pub const MAIN_MENU: &str = "main_menu";

#[derive(Debug)]
struct Seen {
    device: Device,
    last_seen: Instant,
}

pub struct PresenceTracker<C: Clock> {
    clock: C,
    /// Zero disables expiry.
    timeout: Duration,
    seen: Vec<Seen>,
}

impl<C: Clock> PresenceTracker<C> {
    pub fn new(clock: C, timeout: Duration) -> Self {
        Self {
            clock,
            timeout,
            seen: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Vec<Device> {
        self.seen.iter().map(|s| s.device.clone()).collect()
    }

    /// Records traffic from `device_id`; returns a new snapshot when presence changed.
    pub fn observe(&mut self, device_id: &DeviceId, kind: &EventKind) -> Option<Vec<Device>> {
        let now = self.clock.now();
        let reported = match kind {
            EventKind::ModeEnter { mode } => Some(mode.clone()),
            EventKind::ModeExit { .. } | EventKind::DeviceOnline { .. } => {
                Some(MAIN_MENU.to_string())
            }
            _ => None,
        };

        let changed = match self.seen.iter_mut().find(|s| &s.device.id == device_id) {
            Some(seen) => {
                seen.last_seen = now;
                let before = seen.device.clone();
                seen.device.status = DeviceStatus::Online;
                if reported.is_some() {
                    seen.device.mode = reported;
                }
                seen.device != before
            }
            None => {
                info!(device_id = %device_id, "new terminal seen");
                self.seen.push(Seen {
                    device: Device {
                        id: device_id.clone(),
                        status: DeviceStatus::Online,
                        mode: reported,
                    },
                    last_seen: now,
                });
                true
            }
        };

        changed.then(|| self.snapshot())
    }

    /// Marks silent terminals offline; returns a new snapshot when any changed.
    pub fn expire(&mut self) -> Option<Vec<Device>> {
        if self.timeout.is_zero() {
            return None;
        }
        let now = self.clock.now();
        let mut changed = false;
        for seen in &mut self.seen {
            if seen.device.is_online() && now.saturating_duration_since(seen.last_seen) > self.timeout
            {
                info!(device_id = %seen.device.id, "terminal went silent");
                seen.device.status = DeviceStatus::Offline;
                changed = true;
            }
        }
        changed.then(|| self.snapshot())
    }
}

#[cfg(test)]
#[path = "tests/presence_tests.rs"]
mod tests;
