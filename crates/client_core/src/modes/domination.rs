//! Domination: one capturable zone, two teams scoring time while they hold it.

use std::time::Duration;

use shared::{
    domain::Team,
    protocol::{format_clock, format_milliseconds, EventKind},
};

use super::{Directive, EMPTY_CLOCK, WAITING_FOR_START};
use crate::view::{Control, Element};

pub const NEUTRAL_ZONE: &str = "ZONA NEUTRA";
pub const CAPTURE_CANCELLED: &str = "Conquista annullata!";
pub const GAME_OVER: &str = "Partita Terminata!";
pub const TIME_EXPIRED: &str = "TEMPO SCADUTO!";
pub const DEFAULT_CAPTURE_SECS: u64 = 10;
/// How long "capture cancelled" stays up before the previous state returns.
pub const CANCEL_NOTICE: Duration = Duration::from_secs(2);

fn progress_element(team: Team) -> Element {
    match team {
        Team::Red => Element::Team1Progress,
        Team::Green => Element::Team2Progress,
    }
}

fn winner_text(winner: &str) -> String {
    match winner.trim() {
        "1" => format!("SQUADRA {}", Team::Red.label().to_uppercase()),
        "2" => format!("SQUADRA {}", Team::Green.label().to_uppercase()),
        _ => "PAREGGIO".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct DominationView {
    state_text: String,
    /// State to fall back to when a capture is cancelled.
    last_state_text: String,
    capture_secs: u64,
}

impl Default for DominationView {
    fn default() -> Self {
        Self {
            state_text: WAITING_FOR_START.to_string(),
            last_state_text: WAITING_FOR_START.to_string(),
            capture_secs: DEFAULT_CAPTURE_SECS,
        }
    }
}

impl DominationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_text(&self) -> &str {
        &self.state_text
    }

    pub fn last_state_text(&self) -> &str {
        &self.last_state_text
    }

    pub fn capture_secs(&self) -> u64 {
        self.capture_secs
    }

    pub fn set_capture_secs(&mut self, secs: u64) {
        self.capture_secs = secs;
    }

    /// Back to the pre-match display. The cached capture time survives.
    pub fn reset(&mut self) -> Vec<Directive> {
        self.state_text = WAITING_FOR_START.to_string();
        self.last_state_text = WAITING_FOR_START.to_string();
        vec![
            Directive::text(Element::DominationState, WAITING_FOR_START),
            Directive::clock(Element::DominationTimer, EMPTY_CLOCK),
            Directive::text(Element::Winner, "--"),
            Directive::clock(Element::Team1Score, "00:00"),
            Directive::clock(Element::Team2Score, "00:00"),
            Directive::Control(Control::ForceEnd, true),
        ]
    }

    pub fn apply(&mut self, event: &EventKind) -> Vec<Directive> {
        match event {
            EventKind::SettingsUpdate(report) => {
                let mut out = Vec::new();
                if let Some(duration) = report.duration {
                    out.push(Directive::text(Element::SettingDuration, duration.to_string()));
                }
                if let Some(capture) = report.capture {
                    self.capture_secs = capture;
                    out.push(Directive::text(Element::SettingCapture, capture.to_string()));
                }
                if let Some(countdown) = report.countdown {
                    out.push(Directive::text(Element::SettingCountdown, countdown.to_string()));
                }
                out
            }
            EventKind::CountdownStart { seconds } | EventKind::CountdownUpdate { seconds } => {
                vec![self.settle(format!("Partita inizia in {seconds}s..."))]
            }
            EventKind::GameStart => vec![self.settle(NEUTRAL_ZONE.to_string())],
            EventKind::TimeUpdate { seconds } => vec![
                Directive::clock(Element::DominationTimer, format_clock(*seconds)),
                Directive::SyncGameTimer { seconds: *seconds },
            ],
            EventKind::CaptureStart { team } => {
                self.state_text = format!("Squadra {} sta conquistando...", team.label());
                vec![
                    Directive::text(Element::DominationState, self.state_text.clone()),
                    Directive::StartAction {
                        element: progress_element(*team),
                        seconds: self.capture_secs,
                    },
                ]
            }
            EventKind::CaptureCancel { .. } => {
                self.state_text = CAPTURE_CANCELLED.to_string();
                vec![
                    Directive::StopAction,
                    Directive::text(Element::DominationState, CAPTURE_CANCELLED),
                    Directive::RestoreStateAfter(CANCEL_NOTICE),
                ]
            }
            EventKind::ZoneCaptured { team } => {
                let owned = format!("ZONA SQUADRA {}!", team.label().to_uppercase());
                vec![Directive::StopAction, self.settle(owned)]
            }
            EventKind::ScoreUpdate { team1_ms, team2_ms } => vec![
                Directive::clock(Element::Team1Score, format_milliseconds(*team1_ms)),
                Directive::clock(Element::Team2Score, format_milliseconds(*team2_ms)),
            ],
            EventKind::GameEnd { winner } => {
                self.state_text = GAME_OVER.to_string();
                vec![
                    Directive::StopAllTimers,
                    Directive::clock(Element::DominationTimer, "00:00"),
                    Directive::text(Element::DominationState, GAME_OVER),
                    Directive::text(Element::Winner, winner_text(winner)),
                    Directive::Control(Control::ForceEnd, false),
                ]
            }
            _ => Vec::new(),
        }
    }

    /// Local game countdown ran out before the terminal reported the end.
    pub fn timeout(&mut self) -> Vec<Directive> {
        self.state_text = TIME_EXPIRED.to_string();
        vec![
            Directive::clock(Element::DominationTimer, "00:00"),
            Directive::text(Element::DominationState, TIME_EXPIRED),
        ]
    }

    /// Puts the remembered state back after a cancellation notice.
    pub fn restore(&mut self) -> Directive {
        self.state_text = self.last_state_text.clone();
        Directive::text(Element::DominationState, self.state_text.clone())
    }

    fn settle(&mut self, text: String) -> Directive {
        self.state_text = text.clone();
        self.last_state_text = text.clone();
        Directive::Text(Element::DominationState, text)
    }
}

#[cfg(test)]
#[path = "../tests/domination_tests.rs"]
mod tests;
