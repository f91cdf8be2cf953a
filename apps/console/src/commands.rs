//! Operator input: one command per line.

use shared::{
    domain::{DeviceId, GameMode},
    protocol::{lenient_u64, DominationSettings, SearchDestroySettings},
};
use thiserror::Error;

/// Placeholder sent when a PIN is disabled.
const UNUSED_PIN: &str = "0000";

pub const HELP: &str = "\
commands:
  mode dom|sd                 choose the game mode
  pick <terminal>             bind a ready terminal
  back                        previous screen
  dom-settings <duration> <capture>
  dom-start
  sd-settings <bomb> <arm> <defuse> <arm-pin|-> <defuse-pin|-> [round-minutes]
  sd-start
  round <minutes>             start the local round timer
  end                         force the current game to end
  reset                       back to mode selection
  devices                     list known terminals
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Mode(GameMode),
    Pick(DeviceId),
    Back,
    DominationSettings(DominationSettings),
    DominationStart,
    SearchDestroySettings(SearchDestroySettings),
    SearchDestroyStart,
    RoundTimer(u64),
    ForceEnd,
    Reset,
    Devices,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("{command}: missing <{argument}>")]
    Missing {
        command: &'static str,
        argument: &'static str,
    },
    #[error("unknown mode '{0}' (dom or sd)")]
    UnknownMode(String),
}

/// Numbers are lenient: anything unparsable counts as zero.
pub fn parse(line: &str) -> Result<OperatorCommand, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::Empty);
    };
    let args: Vec<&str> = words.collect();
    let arg = |index: usize, command: &'static str, argument: &'static str| {
        args.get(index)
            .copied()
            .ok_or(ParseError::Missing { command, argument })
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "mode" => {
            let mode = arg(0, "mode", "dom|sd")?;
            match GameMode::from_wire(&mode.to_ascii_lowercase()) {
                GameMode::None => return Err(ParseError::UnknownMode(mode.to_string())),
                mode => OperatorCommand::Mode(mode),
            }
        }
        "pick" => OperatorCommand::Pick(DeviceId::new(arg(0, "pick", "terminal")?)),
        "back" => OperatorCommand::Back,
        "dom-settings" => OperatorCommand::DominationSettings(DominationSettings {
            duration_secs: lenient_u64(arg(0, "dom-settings", "duration")?),
            capture_secs: lenient_u64(arg(1, "dom-settings", "capture")?),
        }),
        "dom-start" => OperatorCommand::DominationStart,
        "sd-settings" => {
            let (use_arm_pin, arm_pin) = pin(arg(3, "sd-settings", "arm-pin")?);
            let (use_defuse_pin, defuse_pin) = pin(arg(4, "sd-settings", "defuse-pin")?);
            OperatorCommand::SearchDestroySettings(SearchDestroySettings {
                bomb_secs: lenient_u64(arg(0, "sd-settings", "bomb")?),
                arm_secs: lenient_u64(arg(1, "sd-settings", "arm")?),
                defuse_secs: lenient_u64(arg(2, "sd-settings", "defuse")?),
                use_arm_pin,
                arm_pin,
                use_defuse_pin,
                defuse_pin,
                round_minutes: args.get(5).map(|v| lenient_u64(v)).filter(|m| *m > 0),
            })
        }
        "sd-start" => OperatorCommand::SearchDestroyStart,
        "round" => OperatorCommand::RoundTimer(lenient_u64(arg(0, "round", "minutes")?)),
        "end" => OperatorCommand::ForceEnd,
        "reset" => OperatorCommand::Reset,
        "devices" => OperatorCommand::Devices,
        "help" | "?" => OperatorCommand::Help,
        "quit" | "exit" => OperatorCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn pin(raw: &str) -> (bool, String) {
    if raw == "-" {
        (false, UNUSED_PIN.to_string())
    } else {
        (true, raw.to_string())
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
