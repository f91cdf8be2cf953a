//! Headless core of the field-terminal control console.
//!
//! [`session::SessionController`] owns the session and is the only mutator;
//! presentation and delivery are injected through [`view::Presenter`] and
//! [`transport::CommandSink`].

pub mod clock;
pub mod modes;
pub mod presence;
pub mod registry;
pub mod session;
pub mod timer;
pub mod transport;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use presence::PresenceTracker;
pub use registry::DeviceRegistry;
pub use session::{Session, SessionController};
pub use timer::{TimerEvent, TimerKind, TimerService};
pub use transport::{CommandSink, Datagram, DeviceLink, TransportError, UdpLink};
pub use view::{Control, DeviceEntry, Element, Presenter, ViewRouter};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
