//! Outbound command plumbing and the UDP link to the terminals.
//!
//! The controller only knows [`CommandSink`]; it never waits on delivery. The
//! console drains a channel sink into a [`DeviceLink`] on its own task.

use std::{io, net::SocketAddr};

use async_trait::async_trait;
use shared::{domain::DeviceId, protocol::Command};
use thiserror::Error;
use tokio::{
    net::UdpSocket,
    sync::mpsc::{error::TrySendError, Sender},
};
use tracing::{debug, warn};

/// Largest datagram accepted from a terminal.
pub const MAX_DATAGRAM: usize = 1024;

/// Fire-and-forget outbound queue.
pub trait CommandSink {
    fn dispatch(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn dispatch(&mut self, command: Command) {
        self.push(command);
    }
}

impl CommandSink for Sender<Command> {
    fn dispatch(&mut self, command: Command) {
        let target = command.target_device_id.clone();
        match self.try_send(command) {
            Ok(()) => debug!(device_id = %target, "queued command"),
            Err(TrySendError::Full(command)) => {
                warn!(device_id = %target, text = %command.text, "command queue is full; dropping");
            }
            Err(TrySendError::Closed(command)) => {
                warn!(device_id = %target, text = %command.text, "command queue is closed; dropping");
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("terminal id {0} is not an address")]
    BadAddress(DeviceId),
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// One datagram as received, attributed to its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub device_id: DeviceId,
    pub text: String,
}

#[async_trait]
pub trait DeviceLink: Send + Sync {
    async fn send(&self, command: &Command) -> Result<(), TransportError>;
    async fn recv(&self) -> Result<Datagram, TransportError>;
}

/// Terminals are addressed by IP; every terminal listens on the same port.
pub struct UdpLink {
    socket: UdpSocket,
    device_port: u16,
}

impl UdpLink {
    pub async fn bind(addr: &str, device_port: u16) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self {
            socket,
            device_port,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }

    fn target(&self, device_id: &DeviceId) -> Result<SocketAddr, TransportError> {
        let ip = device_id
            .as_str()
            .parse()
            .map_err(|_| TransportError::BadAddress(device_id.clone()))?;
        Ok(SocketAddr::new(ip, self.device_port))
    }
}

#[async_trait]
impl DeviceLink for UdpLink {
    async fn send(&self, command: &Command) -> Result<(), TransportError> {
        let target = self.target(&command.target_device_id)?;
        self.socket.send_to(command.text.as_bytes(), target).await?;
        debug!(%target, text = %command.text, "sent command");
        Ok(())
    }

    async fn recv(&self) -> Result<Datagram, TransportError> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let (len, from) = self.socket.recv_from(&mut buf).await?;
        Ok(Datagram {
            device_id: DeviceId::new(from.ip().to_string()),
            text: String::from_utf8_lossy(&buf[..len]).into_owned(),
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
