//! Local countdown and progress estimation between authoritative terminal updates.
//!
//! The service holds at most one GAME countdown and one ACTION progress estimate.
//! Starting either kind replaces the running instance of that kind, so repeated
//! starts never stack. Nothing here schedules itself: the owner calls [`TimerService::tick`]
//! (≈20 Hz in the console) and the service derives state from the injected [`Clock`].

use std::time::{Duration, Instant};

use crate::{clock::Clock, view::Element};

/// Nominal cadence of the ACTION estimator.
pub const ACTION_TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Game,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpec {
    pub kind: TimerKind,
    pub duration: Duration,
    pub started_at: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    GameTick { remaining: u64 },
    GameExpired,
    ActionProgress { element: Element, percent: f64 },
    ActionCompleted { element: Element },
}

#[derive(Debug)]
struct GameCountdown {
    spec: TimerSpec,
    last_reported: u64,
}

#[derive(Debug)]
enum ActionState {
    Running { spec: TimerSpec, element: Element },
    /// Reached 100%; holds the full bar until an authoritative event clears it.
    Completed { element: Element },
}

impl ActionState {
    fn element(&self) -> Element {
        match self {
            ActionState::Running { element, .. } | ActionState::Completed { element } => *element,
        }
    }
}

pub struct TimerService<C: Clock> {
    clock: C,
    game: Option<GameCountdown>,
    action: Option<ActionState>,
}

impl<C: Clock> TimerService<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            game: None,
            action: None,
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Starts the GAME countdown, replacing any running one.
    ///
    /// Returns `None` (and leaves no countdown running) when `seconds` is zero.
    pub fn start_game(&mut self, seconds: u64) -> Option<u64> {
        self.game = None;
        if seconds == 0 {
            return None;
        }
        self.game = Some(GameCountdown {
            spec: TimerSpec {
                kind: TimerKind::Game,
                duration: Duration::from_secs(seconds),
                started_at: self.clock.now(),
            },
            last_reported: seconds,
        });
        Some(seconds)
    }

    /// Replaces the local estimate with an authoritative remaining time.
    pub fn sync_game(&mut self, remaining: u64) {
        if remaining == 0 {
            self.game = None;
            return;
        }
        self.start_game(remaining);
    }

    /// Starts an ACTION estimate on `element`.
    ///
    /// Returns the element of the replaced action, if any, so its bar can be cleared.
    pub fn start_action(&mut self, element: Element, seconds: u64) -> Option<Element> {
        let replaced = self.action.take().map(|state| state.element());
        self.action = Some(ActionState::Running {
            spec: TimerSpec {
                kind: TimerKind::Action,
                duration: Duration::from_secs(seconds),
                started_at: self.clock.now(),
            },
            element,
        });
        replaced
    }

    fn cancel_game(&mut self) -> bool {
        self.game.take().is_some()
    }

    /// Stops the ACTION estimate; returns the element whose bar must be cleared.
    pub fn cancel_action(&mut self) -> Option<Element> {
        self.action.take().map(|state| state.element())
    }

    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Game => self.cancel_game(),
            TimerKind::Action => self.cancel_action().is_some(),
        }
    }

    pub fn is_running(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Game => self.game.is_some(),
            TimerKind::Action => matches!(self.action, Some(ActionState::Running { .. })),
        }
    }

    pub fn spec(&self, kind: TimerKind) -> Option<TimerSpec> {
        match kind {
            TimerKind::Game => self.game.as_ref().map(|g| g.spec),
            TimerKind::Action => match &self.action {
                Some(ActionState::Running { spec, .. }) => Some(*spec),
                _ => None,
            },
        }
    }

    pub fn game_remaining(&self) -> Option<u64> {
        self.game.as_ref().map(|g| g.last_reported)
    }

    pub fn action_percent(&self) -> Option<f64> {
        match &self.action {
            Some(ActionState::Running { spec, .. }) => Some(progress(spec, self.clock.now())),
            Some(ActionState::Completed { .. }) => Some(100.0),
            None => None,
        }
    }

    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let now = self.clock.now();
        let mut events = Vec::new();

        if let Some(game) = self.game.as_mut() {
            let total = game.spec.duration.as_secs();
            let elapsed = now.saturating_duration_since(game.spec.started_at).as_secs();
            let remaining = total.saturating_sub(elapsed);
            if remaining < game.last_reported {
                game.last_reported = remaining;
                events.push(TimerEvent::GameTick { remaining });
            }
            if remaining == 0 {
                self.game = None;
                events.push(TimerEvent::GameExpired);
            }
        }

        if let Some(ActionState::Running { spec, element }) = &self.action {
            let element = *element;
            let percent = progress(spec, now);
            events.push(TimerEvent::ActionProgress { element, percent });
            if percent >= 100.0 {
                self.action = Some(ActionState::Completed { element });
                events.push(TimerEvent::ActionCompleted { element });
            }
        }

        events
    }
}

fn progress(spec: &TimerSpec, now: Instant) -> f64 {
    let total = spec.duration.as_secs_f64();
    if total <= 0.0 {
        return 100.0;
    }
    let elapsed = now.saturating_duration_since(spec.started_at).as_secs_f64();
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
