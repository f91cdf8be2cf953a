//! Search & destroy: a bomb that terrorists arm and counter-terrorists defuse.

use shared::protocol::{format_clock, EventKind};

use super::{yes_no, Directive, EMPTY_CLOCK, WAITING_FOR_START};
use crate::view::{Control, Element};

pub const AWAITING_ARM: &str = "In attesa di innesco...";
pub const ARMING: &str = "Innesco in corso...";
pub const ARM_CANCELLED: &str = "Innesco annullato. In attesa...";
pub const ARM_PIN_WRONG: &str = "PIN innesco errato!";
pub const BOMB_ARMED: &str = "BOMBA INNESCATA!";
pub const DEFUSING: &str = "Disinnesco in corso...";
pub const DEFUSE_PIN_WRONG: &str = "PIN disinnesco errato!";
pub const ROUND_TIMEOUT: &str = "TEMPO SCADUTO! Vince CT";
pub const DEFAULT_ARM_SECS: u64 = 5;
pub const DEFAULT_DEFUSE_SECS: u64 = 10;

fn winner_text(winner: &str) -> String {
    let side = if winner.trim() == "terrorists" {
        "T"
    } else {
        "CT"
    };
    format!("Partita finita! Vince la squadra {side}")
}

#[derive(Debug, Clone)]
pub struct SearchDestroyView {
    bomb_state: String,
    arm_secs: u64,
    defuse_secs: u64,
    round_timer_available: bool,
}

impl Default for SearchDestroyView {
    fn default() -> Self {
        Self {
            bomb_state: WAITING_FOR_START.to_string(),
            arm_secs: DEFAULT_ARM_SECS,
            defuse_secs: DEFAULT_DEFUSE_SECS,
            round_timer_available: false,
        }
    }
}

impl SearchDestroyView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bomb_state(&self) -> &str {
        &self.bomb_state
    }

    pub fn arm_secs(&self) -> u64 {
        self.arm_secs
    }

    pub fn defuse_secs(&self) -> u64 {
        self.defuse_secs
    }

    /// Whether the operator may start the local round timer.
    pub fn round_timer_available(&self) -> bool {
        self.round_timer_available
    }

    /// Marks the local round timer as started; it cannot be started twice.
    pub fn take_round_timer(&mut self) -> Option<Directive> {
        if !self.round_timer_available {
            return None;
        }
        self.round_timer_available = false;
        Some(Directive::Control(Control::StartRoundTimer, false))
    }

    pub fn reset(&mut self) -> Vec<Directive> {
        self.bomb_state = WAITING_FOR_START.to_string();
        self.round_timer_available = false;
        vec![
            Directive::StopAllTimers,
            Directive::text(Element::SdBombState, WAITING_FOR_START),
            Directive::clock(Element::SdBombTimer, EMPTY_CLOCK),
            Directive::clock(Element::SdGameTimer, EMPTY_CLOCK),
            Directive::Control(Control::StartRoundTimer, false),
            Directive::Control(Control::ForceEnd, true),
        ]
    }

    pub fn apply(&mut self, event: &EventKind) -> Vec<Directive> {
        match event {
            EventKind::SettingsUpdate(report) => {
                let mut out = Vec::new();
                if let Some(bomb) = report.bomb_time {
                    out.push(Directive::text(Element::SettingBombTime, bomb.to_string()));
                }
                if let Some(arm) = report.arm_time {
                    self.arm_secs = arm;
                    out.push(Directive::text(Element::SettingArmTime, arm.to_string()));
                }
                if let Some(defuse) = report.defuse_time {
                    self.defuse_secs = defuse;
                    out.push(Directive::text(Element::SettingDefuseTime, defuse.to_string()));
                }
                if let Some(flag) = report.use_arm_pin {
                    out.push(Directive::text(Element::SettingUseArmPin, yes_no(flag)));
                }
                if let Some(pin) = &report.arm_pin {
                    out.push(Directive::text(Element::SettingArmPin, pin.clone()));
                }
                if let Some(flag) = report.use_disarm_pin {
                    out.push(Directive::text(Element::SettingUseDefusePin, yes_no(flag)));
                }
                if let Some(pin) = &report.disarm_pin {
                    out.push(Directive::text(Element::SettingDefusePin, pin.clone()));
                }
                out
            }
            EventKind::GameStart => {
                self.round_timer_available = true;
                vec![
                    self.state(AWAITING_ARM),
                    Directive::Control(Control::StartRoundTimer, true),
                ]
            }
            EventKind::ArmStart => vec![
                self.state(ARMING),
                Directive::StartAction {
                    element: Element::ArmProgress,
                    seconds: self.arm_secs,
                },
            ],
            EventKind::ArmCancel => vec![Directive::StopAction, self.state(ARM_CANCELLED)],
            EventKind::ArmPinWrong => vec![self.state(ARM_PIN_WRONG)],
            EventKind::BombArmed => vec![Directive::StopAction, self.state(BOMB_ARMED)],
            EventKind::TimeUpdate { seconds } => {
                vec![Directive::clock(Element::SdBombTimer, format_clock(*seconds))]
            }
            EventKind::DefuseStart => vec![
                self.state(DEFUSING),
                Directive::StartAction {
                    element: Element::DefuseProgress,
                    seconds: self.defuse_secs,
                },
            ],
            EventKind::DefuseCancel => vec![Directive::StopAction, self.state(BOMB_ARMED)],
            EventKind::DefusePinWrong => vec![self.state(DEFUSE_PIN_WRONG)],
            EventKind::GameEnd { winner } => {
                self.round_timer_available = false;
                vec![
                    Directive::StopAllTimers,
                    self.state(&winner_text(winner)),
                    Directive::Control(Control::StartRoundTimer, false),
                    Directive::Control(Control::ForceEnd, false),
                ]
            }
            EventKind::RoundReset => self.reset(),
            _ => Vec::new(),
        }
    }

    /// Local round limit reached: counter-terrorists win by time.
    pub fn timeout(&mut self) -> Vec<Directive> {
        self.round_timer_available = false;
        vec![
            Directive::clock(Element::SdGameTimer, "00:00"),
            self.state(ROUND_TIMEOUT),
        ]
    }

    fn state(&mut self, text: &str) -> Directive {
        self.bomb_state = text.to_string();
        Directive::text(Element::SdBombState, text)
    }
}

#[cfg(test)]
#[path = "../tests/search_destroy_tests.rs"]
mod tests;
