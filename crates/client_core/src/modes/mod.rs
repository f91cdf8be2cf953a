//! Pure translators from terminal events to display and timer directives.
//!
//! An interpreter owns the display state of its mode and never touches the
//! presenter or the timers directly; the session executes the returned
//! [`Directive`]s in order.

use std::time::Duration;

use crate::view::{Control, Element};

pub mod domination;
pub mod search_destroy;

pub use domination::DominationView;
pub use search_destroy::SearchDestroyView;

/// Placeholder shown by timer elements with nothing to count.
pub const EMPTY_CLOCK: &str = "--:--";
pub const WAITING_FOR_START: &str = "In attesa di inizio...";

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Text(Element, String),
    /// Preformatted `mm:ss` (or [`EMPTY_CLOCK`]) for a timer element.
    Clock(Element, String),
    Control(Control, bool),
    StartAction { element: Element, seconds: u64 },
    StopAction,
    SyncGameTimer { seconds: u64 },
    StopGameTimer,
    StopAllTimers,
    /// Re-render the mode's remembered state text once `after` has elapsed.
    RestoreStateAfter(Duration),
}

impl Directive {
    pub(crate) fn text(element: Element, text: impl Into<String>) -> Self {
        Directive::Text(element, text.into())
    }

    pub(crate) fn clock(element: Element, text: impl Into<String>) -> Self {
        Directive::Clock(element, text.into())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Sì"
    } else {
        "No"
    }
}
