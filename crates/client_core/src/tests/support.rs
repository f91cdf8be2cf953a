use shared::domain::Screen;

use crate::view::{Control, DeviceEntry, Element, Presenter};

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Screen(Screen),
    Log(String),
    Timer(Element, String),
    Progress(Element, f64),
    Text(Element, String),
    Devices(Vec<DeviceEntry>),
    Control(Control, bool),
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<Rendered>,
}

impl RecordingPresenter {
    pub fn text(&self, element: Element) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            Rendered::Text(e, text) if *e == element => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn timer(&self, element: Element) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            Rendered::Timer(e, text) if *e == element => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn progress(&self, element: Element) -> Option<f64> {
        self.calls.iter().rev().find_map(|call| match call {
            Rendered::Progress(e, percent) if *e == element => Some(*percent),
            _ => None,
        })
    }

    pub fn progress_calls(&self, element: Element) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Rendered::Progress(e, percent) if *e == element => Some(*percent),
                _ => None,
            })
            .collect()
    }

    pub fn control(&self, control: Control) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            Rendered::Control(c, enabled) if *c == control => Some(*enabled),
            _ => None,
        })
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Rendered::Screen(screen) => Some(*screen),
                _ => None,
            })
            .collect()
    }

    pub fn last_devices(&self) -> Option<&[DeviceEntry]> {
        self.calls.iter().rev().find_map(|call| match call {
            Rendered::Devices(devices) => Some(devices.as_slice()),
            _ => None,
        })
    }

    pub fn logs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Rendered::Log(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn render_screen(&mut self, screen: Screen) {
        self.calls.push(Rendered::Screen(screen));
    }

    fn render_log_entry(&mut self, raw: &str) {
        self.calls.push(Rendered::Log(raw.to_string()));
    }

    fn render_timer(&mut self, element: Element, clock: &str) {
        self.calls.push(Rendered::Timer(element, clock.to_string()));
    }

    fn render_progress(&mut self, element: Element, percent: f64) {
        self.calls.push(Rendered::Progress(element, percent));
    }

    fn render_text(&mut self, element: Element, text: &str) {
        self.calls.push(Rendered::Text(element, text.to_string()));
    }

    fn render_devices(&mut self, devices: &[DeviceEntry]) {
        self.calls.push(Rendered::Devices(devices.to_vec()));
    }

    fn render_control(&mut self, control: Control, enabled: bool) {
        self.calls.push(Rendered::Control(control, enabled));
    }
}
