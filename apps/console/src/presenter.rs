//! Line-oriented presenter: every render becomes one timestamped line.

use std::{collections::HashMap, io::Write};

use chrono::Local;
use client_core::view::{Control, DeviceEntry, Element, Presenter};
use shared::domain::Screen;
use tracing::warn;

/// Progress is printed in steps of this many percent.
const PROGRESS_STEP: f64 = 10.0;

pub struct TerminalPresenter<W: Write> {
    out: W,
    progress: HashMap<Element, u8>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            progress: HashMap::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Free-form operator feedback (warnings, help, listings).
    pub fn notice(&mut self, text: &str) {
        self.line(text);
    }

    fn line(&mut self, text: &str) {
        let stamp = Local::now().format("%H:%M:%S");
        if let Err(err) = writeln!(self.out, "[{stamp}] {text}") {
            warn!(%err, "failed to write to the console");
        }
    }
}

fn screen_title(screen: Screen) -> &'static str {
    match screen {
        Screen::Waiting => "In attesa di terminali...",
        Screen::ModeSelect => "Seleziona modalità (mode dom | mode sd)",
        Screen::TerminalSelect => "Seleziona terminale (pick <id>)",
        Screen::Config => "Configurazione",
        Screen::Domination => "Dominazione",
        Screen::SearchDestroy => "Cerca e Distruggi",
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render_screen(&mut self, screen: Screen) {
        self.progress.clear();
        self.line(&format!("== {} ==", screen_title(screen)));
    }

    fn render_log_entry(&mut self, raw: &str) {
        self.line(&format!("<< {raw}"));
    }

    fn render_timer(&mut self, element: Element, clock: &str) {
        self.line(&format!("{}: {clock}", element.key()));
    }

    fn render_progress(&mut self, element: Element, percent: f64) {
        let step = (percent / PROGRESS_STEP).floor().clamp(0.0, 10.0) as u8;
        if self.progress.get(&element) == Some(&step) {
            return;
        }
        if step == 0 && !self.progress.contains_key(&element) {
            self.progress.insert(element, 0);
            return;
        }
        self.progress.insert(element, step);
        let filled = usize::from(step);
        self.line(&format!(
            "{}: [{}{}] {:>3.0}%",
            element.key(),
            "#".repeat(filled),
            ".".repeat(10 - filled),
            percent
        ));
    }

    fn render_text(&mut self, element: Element, text: &str) {
        self.line(&format!("{}: {text}", element.key()));
    }

    fn render_devices(&mut self, devices: &[DeviceEntry]) {
        if devices.is_empty() {
            self.line("nessun terminale");
            return;
        }
        for entry in devices {
            let marker = if entry.selectable { "*" } else { " " };
            self.line(&format!("{marker} {}", entry.label));
        }
    }

    fn render_control(&mut self, control: Control, enabled: bool) {
        let state = if enabled { "abilitato" } else { "disabilitato" };
        self.line(&format!("{control:?}: {state}"));
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
