//! Session state machine: the single owner of screen, selected mode and active terminal.
//!
//! Every inbound presence snapshot, terminal event, operator action and timer tick
//! goes through one [`SessionController`]. Transitions never overlap; side effects
//! on the view router, the timer service and the command sink happen inline.

use std::time::Instant;

use shared::{
    domain::{Device, DeviceId, GameMode, Screen},
    error::ControlError,
    protocol::{
        format_clock, Command, DeviceCommand, DominationSettings, EventKind, GameEvent,
        SearchDestroySettings, SettingsReport,
    },
};
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    modes::{Directive, DominationView, SearchDestroyView},
    registry::DeviceRegistry,
    timer::{TimerEvent, TimerKind, TimerService},
    transport::CommandSink,
    view::{Control, Element, Presenter, ViewRouter},
};

/// The controller's own state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub screen: Screen,
    pub selected_mode: GameMode,
    pub active_device: Option<DeviceId>,
}

/// Per-binding configuration progress; cleared whenever a terminal is (re)selected.
#[derive(Debug, Default)]
struct ConfigProgress {
    domination_start_enabled: bool,
    search_destroy_start_enabled: bool,
    confirmed: Option<SettingsReport>,
}

pub struct SessionController<P: Presenter, C: Clock, S: CommandSink> {
    session: Session,
    registry: DeviceRegistry,
    router: ViewRouter<P>,
    timers: TimerService<C>,
    sink: S,
    domination: DominationView,
    search_destroy: SearchDestroyView,
    progress: ConfigProgress,
    domination_settings: Option<DominationSettings>,
    search_destroy_settings: Option<SearchDestroySettings>,
    pending_restore: Option<Instant>,
}

impl<P: Presenter, C: Clock, S: CommandSink> SessionController<P, C, S> {
    pub fn new(presenter: P, clock: C, sink: S) -> Self {
        let session = Session::default();
        Self {
            router: ViewRouter::new(presenter, session.screen),
            session,
            registry: DeviceRegistry::new(),
            timers: TimerService::new(clock),
            sink,
            domination: DominationView::new(),
            search_destroy: SearchDestroyView::new(),
            progress: ConfigProgress::default(),
            domination_settings: None,
            search_destroy_settings: None,
            pending_restore: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.session.screen
    }

    pub fn selected_mode(&self) -> GameMode {
        self.session.selected_mode
    }

    pub fn active_device(&self) -> Option<&DeviceId> {
        self.session.active_device.as_ref()
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn timers(&self) -> &TimerService<C> {
        &self.timers
    }

    pub fn presenter(&self) -> &P {
        self.router.presenter()
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        self.router.presenter_mut()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn domination(&self) -> &DominationView {
        &self.domination
    }

    pub fn search_destroy(&self) -> &SearchDestroyView {
        &self.search_destroy
    }

    pub fn start_enabled(&self, mode: GameMode) -> bool {
        match mode {
            GameMode::None => false,
            GameMode::Domination => self.progress.domination_start_enabled,
            GameMode::SearchDestroy => self.progress.search_destroy_start_enabled,
        }
    }

    // ---- inbound ---------------------------------------------------------

    /// Applies a full-replacement presence snapshot.
    pub fn apply_presence(&mut self, snapshot: Vec<Device>) {
        self.registry.replace(snapshot);
        let online = self.registry.online_count();
        debug!(
            devices = self.registry.devices().len(),
            online, "presence snapshot"
        );

        if self.session.screen.holds_device() {
            if online == 0 {
                info!(
                    screen = %self.session.screen,
                    device_id = ?self.session.active_device,
                    "no terminal online; keeping session until it reconnects"
                );
            }
            return;
        }

        if online == 0 {
            self.session.active_device = None;
            self.show(Screen::Waiting);
            return;
        }

        match self.session.screen {
            Screen::Waiting => self.show(Screen::ModeSelect),
            Screen::TerminalSelect => self.render_devices(),
            _ => {}
        }
    }

    /// Routes one terminal event. Anything not from the active terminal is dropped.
    pub fn handle_event(&mut self, event: GameEvent) {
        let Some(active) = self.session.active_device.clone() else {
            debug!(device_id = %event.device_id, kind = ?event.kind, "no active terminal; dropping event");
            return;
        };
        if event.device_id != active {
            let err = ControlError::Misrouted {
                received: event.device_id.clone(),
                active,
            };
            debug!(%err, kind = ?event.kind, "dropping event");
            return;
        }

        self.router
            .presenter_mut()
            .render_log_entry(&event.log_line());

        match &event.kind {
            EventKind::ModeEnter { mode } => self.on_mode_enter(mode),
            EventKind::ModeExit { mode } => self.on_mode_exit(mode.as_deref()),
            EventKind::DeviceOnline { version } => {
                info!(device_id = %event.device_id, ?version, "active terminal restarted");
                self.full_reset();
            }
            EventKind::Unknown { event: name } => {
                debug!(event = %name, "ignoring unknown event kind");
            }
            kind => match self.session.screen {
                Screen::Config => self.on_config_event(kind),
                Screen::Domination => {
                    let directives = self.domination.apply(kind);
                    self.execute(directives);
                }
                Screen::SearchDestroy => {
                    let directives = self.search_destroy.apply(kind);
                    self.execute(directives);
                }
                screen => debug!(%screen, ?kind, "event outside a bound screen"),
            },
        }
    }

    /// Advances local timers; call at the ACTION cadence.
    pub fn tick(&mut self) {
        for event in self.timers.tick() {
            match event {
                TimerEvent::GameTick { remaining } => {
                    if let Some(element) = self.game_timer_element() {
                        self.router
                            .presenter_mut()
                            .render_timer(element, &format_clock(remaining));
                    }
                }
                TimerEvent::GameExpired => self.on_game_expired(),
                TimerEvent::ActionProgress { element, percent } => {
                    self.router
                        .presenter_mut()
                        .render_progress(element, percent);
                }
                TimerEvent::ActionCompleted { element } => {
                    debug!(element = element.key(), "action estimate reached 100%");
                }
            }
        }

        if let Some(deadline) = self.pending_restore {
            if self.timers.now() >= deadline {
                self.pending_restore = None;
                if self.session.screen == Screen::Domination {
                    let directive = self.domination.restore();
                    self.execute(vec![directive]);
                }
            }
        }
    }

    // ---- operator actions ------------------------------------------------

    pub fn select_mode(&mut self, mode: GameMode) -> Result<(), ControlError> {
        self.require_screen("select a mode", &[Screen::ModeSelect])?;
        if mode == GameMode::None {
            return Err(ControlError::NoGameMode);
        }
        self.session.selected_mode = mode;
        self.show(Screen::TerminalSelect);
        self.render_devices();
        Ok(())
    }

    pub fn select_terminal(&mut self, device_id: &DeviceId) -> Result<(), ControlError> {
        self.require_screen("select a terminal", &[Screen::TerminalSelect])?;
        if self.session.selected_mode == GameMode::None {
            return Err(ControlError::NoGameMode);
        }
        let device = self
            .registry
            .get(device_id)
            .ok_or_else(|| ControlError::UnknownDevice(device_id.clone()))?;
        if !device.is_ready() {
            let mode = if device.is_online() {
                device.mode.clone().unwrap_or_else(|| "N/A".to_string())
            } else {
                "offline".to_string()
            };
            return Err(ControlError::DeviceNotReady {
                device_id: device_id.clone(),
                mode,
            });
        }

        self.session.active_device = Some(device_id.clone());
        self.progress = ConfigProgress::default();
        {
            let presenter = self.router.presenter_mut();
            presenter.render_control(Control::StartDomination, false);
            presenter.render_control(Control::StartSearchDestroy, false);
        }
        info!(device_id = %device_id, mode = ?self.session.selected_mode, "terminal bound");
        self.show(Screen::Config);
        Ok(())
    }

    /// CONFIG returns to the picker keeping the bound terminal; the picker returns to mode selection.
    pub fn back(&mut self) -> Result<(), ControlError> {
        match self.session.screen {
            Screen::Config => {
                self.show(Screen::TerminalSelect);
                self.render_devices();
                Ok(())
            }
            Screen::TerminalSelect => {
                self.session.active_device = None;
                self.session.selected_mode = GameMode::None;
                self.show(Screen::ModeSelect);
                Ok(())
            }
            screen => Err(ControlError::WrongScreen {
                action: "go back",
                screen,
            }),
        }
    }

    pub fn send_domination_settings(
        &mut self,
        settings: DominationSettings,
    ) -> Result<(), ControlError> {
        self.require_config("send domination settings", GameMode::Domination)?;
        self.emit(
            "send domination settings",
            DeviceCommand::SetDominationSettings(settings.clone()),
        )?;
        self.progress.domination_start_enabled = false;
        self.router
            .presenter_mut()
            .render_control(Control::StartDomination, false);
        self.domination_settings = Some(settings);
        Ok(())
    }

    pub fn start_domination(&mut self) -> Result<(), ControlError> {
        self.require_config("start domination", GameMode::Domination)?;
        if !self.progress.domination_start_enabled {
            return Err(ControlError::StartLocked);
        }
        self.emit("start domination", DeviceCommand::StartDomination)
    }

    pub fn send_search_destroy_settings(
        &mut self,
        settings: SearchDestroySettings,
    ) -> Result<(), ControlError> {
        self.require_config("send search & destroy settings", GameMode::SearchDestroy)?;
        validate_pin("arm pin", &settings.arm_pin)?;
        validate_pin("defuse pin", &settings.defuse_pin)?;
        self.emit(
            "send search & destroy settings",
            DeviceCommand::SetSearchDestroySettings(settings.clone()),
        )?;
        self.progress.search_destroy_start_enabled = false;
        self.router
            .presenter_mut()
            .render_control(Control::StartSearchDestroy, false);
        self.search_destroy_settings = Some(settings);
        Ok(())
    }

    pub fn start_search_destroy(&mut self) -> Result<(), ControlError> {
        self.require_config("start search & destroy", GameMode::SearchDestroy)?;
        if !self.progress.search_destroy_start_enabled {
            return Err(ControlError::StartLocked);
        }
        self.emit("start search & destroy", DeviceCommand::StartSearchDestroy)
    }

    /// Starts the local round limit. Zero minutes skips the start without error.
    pub fn start_round_timer(&mut self, minutes: u64) -> Result<(), ControlError> {
        self.require_screen("start the round timer", &[Screen::SearchDestroy])?;
        if !self.search_destroy.round_timer_available() {
            return Err(ControlError::NotAvailable {
                action: "start the round timer",
            });
        }
        if minutes == 0 {
            warn!("round timer duration is zero; not starting");
            return Ok(());
        }
        if let Some(directive) = self.search_destroy.take_round_timer() {
            self.execute(vec![directive]);
        }
        self.start_game_timer(minutes.saturating_mul(60));
        Ok(())
    }

    pub fn force_end(&mut self) -> Result<(), ControlError> {
        if self.session.active_device.is_none() {
            return Err(ControlError::MissingActiveDevice {
                action: "force the game to end",
            });
        }
        self.require_screen(
            "force the game to end",
            &[Screen::Domination, Screen::SearchDestroy],
        )?;
        self.emit("force the game to end", DeviceCommand::ForceEndGame)
    }

    /// Operator-initiated full reset back to mode selection.
    pub fn reset(&mut self) {
        info!("operator reset");
        self.full_reset();
    }

    // ---- transitions -----------------------------------------------------

    fn on_mode_enter(&mut self, mode: &str) {
        let entered = GameMode::from_wire(mode);
        match self.session.screen {
            Screen::Config => {
                if entered != GameMode::None && entered == self.session.selected_mode {
                    self.enter_match(entered);
                } else {
                    info!(mode, selected = ?self.session.selected_mode, "terminal entered an unrelated mode");
                    self.full_reset();
                }
            }
            screen if screen.is_match() => {
                if entered.match_screen() == Some(screen) {
                    debug!(mode, "terminal re-announced the current mode");
                } else {
                    info!(mode, %screen, "terminal left the match for another mode");
                    self.full_reset();
                }
            }
            screen => debug!(mode, %screen, "mode_enter outside configuration"),
        }
    }

    fn on_mode_exit(&mut self, mode: Option<&str>) {
        if self.session.screen.is_match() {
            info!(?mode, "active terminal exited its game mode");
            self.full_reset();
        } else {
            // Leaving terminal mode is part of the terminal's own path into a match.
            debug!(?mode, screen = %self.session.screen, "ignoring mode_exit");
        }
    }

    fn on_config_event(&mut self, kind: &EventKind) {
        let EventKind::SettingsUpdate(report) = kind else {
            debug!(?kind, "event ignored during configuration");
            return;
        };

        let directives = match self.session.selected_mode {
            GameMode::Domination => self.domination.apply(kind),
            GameMode::SearchDestroy => self.search_destroy.apply(kind),
            GameMode::None => Vec::new(),
        };
        self.execute(directives);

        if report.is_domination() && self.session.selected_mode == GameMode::Domination {
            self.progress.domination_start_enabled = true;
            self.router
                .presenter_mut()
                .render_control(Control::StartDomination, true);
        }
        if report.is_search_destroy() && self.session.selected_mode == GameMode::SearchDestroy {
            self.progress.search_destroy_start_enabled = true;
            self.router
                .presenter_mut()
                .render_control(Control::StartSearchDestroy, true);
        }
        info!(?report, "terminal confirmed settings");
        self.progress.confirmed = Some(report.clone());
    }

    fn enter_match(&mut self, mode: GameMode) {
        let Some(screen) = mode.match_screen() else {
            return;
        };
        self.stop_all_timers();
        self.show(screen);

        let directives = match mode {
            GameMode::Domination => self.domination.reset(),
            GameMode::SearchDestroy => self.search_destroy.reset(),
            GameMode::None => Vec::new(),
        };
        self.execute(directives);

        if let Some(seconds) = self.configured_game_secs(mode) {
            self.start_game_timer(seconds);
        }
        info!(%screen, device_id = ?self.session.active_device, "match started");
    }

    fn configured_game_secs(&self, mode: GameMode) -> Option<u64> {
        let seconds = match mode {
            // Seconds, the unit of SET_DOM_SETTINGS. Firmware that reports minutes
            // shows an early local timeout until its next time_update resyncs.
            GameMode::Domination => self
                .progress
                .confirmed
                .as_ref()
                .and_then(|report| report.duration)
                .or_else(|| self.domination_settings.as_ref().map(|s| s.duration_secs)),
            GameMode::SearchDestroy => self
                .search_destroy_settings
                .as_ref()
                .and_then(|s| s.round_minutes)
                .map(|minutes| minutes.saturating_mul(60)),
            GameMode::None => None,
        };
        seconds.filter(|secs| *secs > 0)
    }

    fn on_game_expired(&mut self) {
        match self.session.screen {
            Screen::SearchDestroy => {
                let directives = self.search_destroy.timeout();
                self.execute(directives);
                if let Err(err) = self.emit("end the round on timeout", DeviceCommand::ForceEndGame)
                {
                    warn!(%err, "round timer expired without a bound terminal");
                }
            }
            Screen::Domination => {
                let directives = self.domination.timeout();
                self.execute(directives);
            }
            screen => debug!(%screen, "game timer expired off-screen"),
        }
    }

    fn full_reset(&mut self) {
        self.stop_all_timers();
        self.session.active_device = None;
        self.session.selected_mode = GameMode::None;
        self.progress = ConfigProgress::default();
        self.show(Screen::ModeSelect);
    }

    /// Switches the visible screen. Leaving a screen that holds a terminal stops every timer.
    fn show(&mut self, screen: Screen) {
        let previous = self.session.screen;
        if previous == screen {
            return;
        }
        if previous.holds_device() {
            self.stop_all_timers();
        }
        self.session.screen = screen;
        self.router.show(screen);
        info!(from = %previous, to = %screen, "screen transition");
    }

    // ---- side effects ----------------------------------------------------

    fn execute(&mut self, directives: Vec<Directive>) {
        for directive in directives {
            match directive {
                Directive::Text(element, text) => {
                    if element == Element::DominationState {
                        self.pending_restore = None;
                    }
                    self.router.presenter_mut().render_text(element, &text);
                }
                Directive::Clock(element, text) => {
                    self.router.presenter_mut().render_timer(element, &text);
                }
                Directive::Control(control, enabled) => {
                    self.router
                        .presenter_mut()
                        .render_control(control, enabled);
                }
                Directive::StartAction { element, seconds } => {
                    if let Some(replaced) = self.timers.start_action(element, seconds) {
                        self.router.presenter_mut().render_progress(replaced, 0.0);
                    }
                }
                Directive::StopAction => self.stop_action(),
                Directive::SyncGameTimer { seconds } => self.timers.sync_game(seconds),
                Directive::StopGameTimer => {
                    self.timers.cancel(TimerKind::Game);
                }
                Directive::StopAllTimers => self.stop_all_timers(),
                Directive::RestoreStateAfter(delay) => {
                    self.pending_restore = Some(self.timers.now() + delay);
                }
            }
        }
    }

    fn start_game_timer(&mut self, seconds: u64) {
        let Some(element) = self.game_timer_element() else {
            return;
        };
        if let Some(seconds) = self.timers.start_game(seconds) {
            self.router
                .presenter_mut()
                .render_timer(element, &format_clock(seconds));
        }
    }

    fn stop_action(&mut self) {
        if let Some(element) = self.timers.cancel_action() {
            self.router.presenter_mut().render_progress(element, 0.0);
        }
    }

    fn stop_all_timers(&mut self) {
        self.timers.cancel(TimerKind::Game);
        self.stop_action();
        self.pending_restore = None;
    }

    fn game_timer_element(&self) -> Option<Element> {
        match self.session.screen {
            Screen::Domination => Some(Element::DominationTimer),
            Screen::SearchDestroy => Some(Element::SdGameTimer),
            _ => None,
        }
    }

    fn render_devices(&mut self) {
        let entries = self.registry.entries();
        self.router.presenter_mut().render_devices(&entries);
    }

    fn emit(&mut self, action: &'static str, command: DeviceCommand) -> Result<(), ControlError> {
        let target = self
            .session
            .active_device
            .clone()
            .ok_or(ControlError::MissingActiveDevice { action })?;
        info!(device_id = %target, command = command.name(), "sending command");
        self.sink.dispatch(Command::new(&command, target));
        Ok(())
    }

    fn require_screen(
        &self,
        action: &'static str,
        allowed: &[Screen],
    ) -> Result<(), ControlError> {
        if allowed.contains(&self.session.screen) {
            Ok(())
        } else {
            Err(ControlError::WrongScreen {
                action,
                screen: self.session.screen,
            })
        }
    }

    /// Preconditions shared by every configuration action, in the order the operator sees them.
    fn require_config(&self, action: &'static str, mode: GameMode) -> Result<(), ControlError> {
        if self.session.active_device.is_none() {
            return Err(ControlError::MissingActiveDevice { action });
        }
        self.require_screen(action, &[Screen::Config])?;
        if self.session.selected_mode != mode {
            return Err(ControlError::WrongMode {
                action,
                selected: self.session.selected_mode,
            });
        }
        Ok(())
    }
}

fn validate_pin(field: &'static str, pin: &str) -> Result<(), ControlError> {
    if pin.is_empty() || pin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ControlError::InvalidInput {
            field,
            reason: format!("'{pin}' must contain digits only"),
        })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
