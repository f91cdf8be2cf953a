use std::{io::Stdout, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    transport::{Datagram, DeviceLink, UdpLink},
    view::Presenter,
    PresenceTracker, SessionController, SystemClock,
};
use shared::{
    error::ErrorCategory,
    protocol::{decode_presence_snapshot, Command, GameEvent},
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod presenter;

use commands::{OperatorCommand, HELP};
use config::{load_settings, Settings};
use presenter::TerminalPresenter;

type Controller = SessionController<TerminalPresenter<Stdout>, SystemClock, mpsc::Sender<Command>>;

/// Outbound commands waiting for the socket.
const COMMAND_QUEUE: usize = 64;

#[derive(Parser, Debug)]
#[command(about = "Operator console for field game terminals")]
struct Args {
    #[arg(long, default_value = "console.toml")]
    config: PathBuf,
    #[arg(long)]
    bind: Option<String>,
    #[arg(long)]
    device_port: Option<u16>,
    #[arg(long)]
    presence_timeout: Option<u64>,
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.bind {
            settings.bind_addr = v.clone();
        }
        if let Some(v) = self.device_port {
            settings.device_port = v;
        }
        if let Some(v) = self.presence_timeout {
            settings.presence_timeout_secs = v;
        }
        if let Some(v) = &self.log_level {
            settings.log_level = v.clone();
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env("CONSOLE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    args.apply(&mut settings);
    init_tracing(&settings.log_level);

    let link = Arc::new(
        UdpLink::bind(&settings.bind_addr, settings.device_port)
            .await
            .context("failed to open the terminal socket")?,
    );
    info!(
        bind = %settings.bind_addr,
        device_port = settings.device_port,
        "console listening"
    );

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(COMMAND_QUEUE);
    let sender = Arc::clone(&link);
    tokio::spawn(async move {
        while let Some(command) = cmd_rx.recv().await {
            if let Err(err) = sender.send(&command).await {
                warn!(device_id = %command.target_device_id, %err, "failed to send command");
            }
        }
    });

    let mut controller =
        SessionController::new(TerminalPresenter::new(std::io::stdout()), SystemClock, cmd_tx);
    let mut presence = PresenceTracker::new(
        SystemClock,
        Duration::from_secs(settings.presence_timeout_secs),
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_millis(settings.tick_interval_ms.max(1)));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            datagram = link.recv() => match datagram {
                Ok(datagram) => on_datagram(&mut controller, &mut presence, datagram),
                Err(err) => warn!(%err, "failed to receive from terminals"),
            },
            line = lines.next_line() => match line.context("failed to read operator input")? {
                Some(line) => {
                    if !on_operator_line(&mut controller, &line) {
                        break;
                    }
                }
                None => break,
            },
            _ = tick.tick() => {
                controller.tick();
                if let Some(snapshot) = presence.expire() {
                    controller.apply_presence(snapshot);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("console stopped");
    Ok(())
}

/// A datagram is a presence list, a relay-shaped JSON event or a terminal status line.
fn on_datagram(
    controller: &mut Controller,
    presence: &mut PresenceTracker<SystemClock>,
    datagram: Datagram,
) {
    let text = datagram.text.trim();
    if text.starts_with('[') {
        match decode_presence_snapshot(text) {
            Ok(snapshot) => controller.apply_presence(snapshot),
            Err(err) => debug!(from = %datagram.device_id, %err, "bad presence snapshot"),
        }
        return;
    }

    let event = if text.starts_with('{') {
        let decoded = serde_json::from_str::<serde_json::Value>(text)
            .map_err(|err| err.to_string())
            .and_then(|value| GameEvent::from_json(&value).map_err(|err| err.to_string()));
        match decoded {
            Ok(event) => event,
            Err(err) => {
                debug!(from = %datagram.device_id, %err, "bad event");
                return;
            }
        }
    } else {
        GameEvent::from_status_line(datagram.device_id, text)
    };

    if let Some(snapshot) = presence.observe(&event.device_id, &event.kind) {
        controller.apply_presence(snapshot);
    }
    controller.handle_event(event);
}

/// Returns `false` when the operator asked to quit.
fn on_operator_line(controller: &mut Controller, line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    let command = match commands::parse(line) {
        Ok(command) => command,
        Err(err) => {
            controller.presenter_mut().notice(&err.to_string());
            return true;
        }
    };

    let result = match command {
        OperatorCommand::Quit => return false,
        OperatorCommand::Help => {
            controller.presenter_mut().notice(HELP);
            Ok(())
        }
        OperatorCommand::Devices => {
            let entries = controller.registry().entries();
            controller.presenter_mut().render_devices(&entries);
            Ok(())
        }
        OperatorCommand::Mode(mode) => controller.select_mode(mode),
        OperatorCommand::Pick(device_id) => controller.select_terminal(&device_id),
        OperatorCommand::Back => controller.back(),
        OperatorCommand::DominationSettings(settings) => {
            controller.send_domination_settings(settings)
        }
        OperatorCommand::DominationStart => controller.start_domination(),
        OperatorCommand::SearchDestroySettings(settings) => {
            controller.send_search_destroy_settings(settings)
        }
        OperatorCommand::SearchDestroyStart => controller.start_search_destroy(),
        OperatorCommand::RoundTimer(minutes) => controller.start_round_timer(minutes),
        OperatorCommand::ForceEnd => controller.force_end(),
        OperatorCommand::Reset => {
            controller.reset();
            Ok(())
        }
    };

    if let Err(err) = result {
        match err.category() {
            ErrorCategory::MissingPrecondition | ErrorCategory::InvalidInput => {
                warn!(%err, "operator action rejected")
            }
            ErrorCategory::RoutingMismatch => debug!(%err, "operator action rejected"),
        }
        controller.presenter_mut().notice(&format!("! {err}"));
    }
    true
}
