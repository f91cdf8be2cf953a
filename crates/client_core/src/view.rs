//! Presentation seam: the core pushes into a [`Presenter`] and never reads back.

use shared::domain::{Device, Screen};

/// Display elements addressable by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    DominationTimer,
    DominationState,
    Winner,
    Team1Score,
    Team2Score,
    Team1Progress,
    Team2Progress,
    SettingDuration,
    SettingCapture,
    SettingCountdown,
    SdGameTimer,
    SdBombTimer,
    SdBombState,
    ArmProgress,
    DefuseProgress,
    SettingBombTime,
    SettingArmTime,
    SettingDefuseTime,
    SettingUseArmPin,
    SettingArmPin,
    SettingUseDefusePin,
    SettingDefusePin,
}

impl Element {
    pub fn key(self) -> &'static str {
        match self {
            Element::DominationTimer => "domination-timer",
            Element::DominationState => "domination-game-state",
            Element::Winner => "status-winner",
            Element::Team1Score => "score-team1",
            Element::Team2Score => "score-team2",
            Element::Team1Progress => "team1-progress",
            Element::Team2Progress => "team2-progress",
            Element::SettingDuration => "setting-duration",
            Element::SettingCapture => "setting-capture",
            Element::SettingCountdown => "setting-countdown",
            Element::SdGameTimer => "sd-game-timer",
            Element::SdBombTimer => "sd-bomb-timer",
            Element::SdBombState => "sd-bomb-state",
            Element::ArmProgress => "arm-progress",
            Element::DefuseProgress => "defuse-progress",
            Element::SettingBombTime => "setting-bomb-time",
            Element::SettingArmTime => "setting-arm-time",
            Element::SettingDefuseTime => "setting-defuse-time",
            Element::SettingUseArmPin => "setting-use-arm-pin",
            Element::SettingArmPin => "setting-arm-pin",
            Element::SettingUseDefusePin => "setting-use-defuse-pin",
            Element::SettingDefusePin => "setting-disarm-pin",
        }
    }
}

/// Operator actions whose availability the core drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    StartDomination,
    StartSearchDestroy,
    StartRoundTimer,
    ForceEnd,
}

/// One row of the terminal picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    pub device: Device,
    pub selectable: bool,
    pub label: String,
}

impl DeviceEntry {
    pub fn from_device(device: &Device) -> Self {
        let selectable = device.is_ready();
        let label = if selectable {
            format!("Terminale ({})", device.id)
        } else {
            format!(
                "{} [{}]",
                device.id,
                device.mode.as_deref().unwrap_or("N/A")
            )
        };
        Self {
            device: device.clone(),
            selectable,
            label,
        }
    }
}

pub trait Presenter {
    fn render_screen(&mut self, screen: Screen);
    fn render_log_entry(&mut self, raw: &str);
    fn render_timer(&mut self, element: Element, clock: &str);
    /// `percent` is within `0.0..=100.0`; `0.0` clears the bar.
    fn render_progress(&mut self, element: Element, percent: f64);
    fn render_text(&mut self, element: Element, text: &str);
    fn render_devices(&mut self, _devices: &[DeviceEntry]) {}
    fn render_control(&mut self, _control: Control, _enabled: bool) {}
}

/// Keeps exactly one screen visible.
pub struct ViewRouter<P: Presenter> {
    presenter: P,
    current: Screen,
}

impl<P: Presenter> ViewRouter<P> {
    pub fn new(mut presenter: P, initial: Screen) -> Self {
        presenter.render_screen(initial);
        Self {
            presenter,
            current: initial,
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn is_visible(&self, screen: Screen) -> bool {
        self.current == screen
    }

    /// Returns `true` when the visible screen actually changed.
    pub fn show(&mut self, screen: Screen) -> bool {
        if self.current == screen {
            return false;
        }
        self.current = screen;
        self.presenter.render_screen(screen);
        true
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
