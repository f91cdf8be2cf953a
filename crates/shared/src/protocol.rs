use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Device, DeviceId, Team},
    error::ProtocolError,
};

/// Flat `key -> value` view of one inbound message, as the terminal sent it.
pub type RawFields = BTreeMap<String, String>;

/// Splits a terminal status line (`event:mode_enter;mode:sd;`) into fields.
///
/// Clauses without a `:` are skipped; only the first `:` separates key from value.
pub fn parse_status_line(line: &str) -> RawFields {
    line.trim()
        .split(';')
        .filter_map(|clause| clause.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Numeric fields never fail: anything unparsable counts as zero.
pub fn lenient_u64(raw: &str) -> u64 {
    raw.trim().parse::<u64>().unwrap_or(0)
}

fn lenient_flag(raw: &str) -> bool {
    raw.trim() == "1"
}

/// `75` -> `01:15`.
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// `125000` -> `02:05`.
pub fn format_milliseconds(ms: u64) -> String {
    format_clock(ms / 1000)
}

/// Settings echoed by a terminal. Absent keys stay `None`, malformed numbers become `Some(0)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsReport {
    pub duration: Option<u64>,
    pub capture: Option<u64>,
    pub countdown: Option<u64>,
    pub bomb_time: Option<u64>,
    pub arm_time: Option<u64>,
    pub defuse_time: Option<u64>,
    pub use_arm_pin: Option<bool>,
    pub arm_pin: Option<String>,
    pub use_disarm_pin: Option<bool>,
    pub disarm_pin: Option<String>,
}

impl SettingsReport {
    fn from_fields(fields: &RawFields) -> Self {
        let number = |key: &str| fields.get(key).map(|v| lenient_u64(v));
        let flag = |key: &str| fields.get(key).map(|v| lenient_flag(v));
        Self {
            duration: number("duration"),
            capture: number("capture"),
            countdown: number("countdown"),
            bomb_time: number("bomb_time"),
            arm_time: number("arm_time"),
            defuse_time: number("defuse_time"),
            use_arm_pin: flag("use_arm_pin"),
            arm_pin: fields.get("arm_pin").cloned(),
            use_disarm_pin: flag("use_disarm_pin").or_else(|| flag("use_defuse_pin")),
            disarm_pin: fields
                .get("disarm_pin")
                .or_else(|| fields.get("defuse_pin"))
                .cloned(),
        }
    }

    pub fn is_domination(&self) -> bool {
        self.duration.is_some()
    }

    pub fn is_search_destroy(&self) -> bool {
        self.bomb_time.is_some()
    }
}

/// Inbound event kinds. Unrecognised names land in [`EventKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    DeviceOnline { version: Option<String> },
    ModeEnter { mode: String },
    ModeExit { mode: Option<String> },
    SettingsUpdate(SettingsReport),
    CountdownStart { seconds: u64 },
    CountdownUpdate { seconds: u64 },
    GameStart,
    TimeUpdate { seconds: u64 },
    CaptureStart { team: Team },
    CaptureCancel { team: Team },
    ZoneCaptured { team: Team },
    ScoreUpdate { team1_ms: u64, team2_ms: u64 },
    GameEnd { winner: String },
    ArmStart,
    ArmCancel,
    ArmPinWrong,
    BombArmed,
    DefuseStart,
    DefuseCancel,
    DefusePinWrong,
    RoundReset,
    Unknown { event: String },
}

impl EventKind {
    pub fn from_fields(fields: &RawFields) -> Self {
        let text = |key: &str| fields.get(key).map(String::as_str).unwrap_or_default();
        let number = |key: &str| lenient_u64(text(key));
        let team = |key: &str| Team::from_wire(text(key));

        match text("event") {
            "device_online" => EventKind::DeviceOnline {
                version: fields.get("version").cloned(),
            },
            "mode_enter" => EventKind::ModeEnter {
                mode: text("mode").to_string(),
            },
            "mode_exit" => EventKind::ModeExit {
                mode: fields.get("mode").cloned(),
            },
            "settings_update" => EventKind::SettingsUpdate(SettingsReport::from_fields(fields)),
            "countdown_start" => EventKind::CountdownStart {
                seconds: number("duration"),
            },
            "countdown_update" => EventKind::CountdownUpdate {
                seconds: number("time"),
            },
            "game_start" => EventKind::GameStart,
            "time_update" => EventKind::TimeUpdate {
                seconds: number("time"),
            },
            "capture_start" => EventKind::CaptureStart { team: team("team") },
            "capture_cancel" => EventKind::CaptureCancel { team: team("team") },
            "zone_captured" => EventKind::ZoneCaptured { team: team("team") },
            "score_update" => EventKind::ScoreUpdate {
                team1_ms: number("team1_score"),
                team2_ms: number("team2_score"),
            },
            "game_end" => EventKind::GameEnd {
                winner: text("winner").to_string(),
            },
            "arm_start" => EventKind::ArmStart,
            "arm_cancel" => EventKind::ArmCancel,
            "arm_pin_wrong" => EventKind::ArmPinWrong,
            "bomb_armed" => EventKind::BombArmed,
            "defuse_start" => EventKind::DefuseStart,
            "defuse_cancel" => EventKind::DefuseCancel,
            "defuse_pin_wrong" => EventKind::DefusePinWrong,
            "round_reset" => EventKind::RoundReset,
            other => EventKind::Unknown {
                event: other.to_string(),
            },
        }
    }
}

/// One inbound message attributed to the terminal that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub device_id: DeviceId,
    pub kind: EventKind,
    pub raw: RawFields,
}

impl GameEvent {
    pub fn from_fields(device_id: DeviceId, raw: RawFields) -> Self {
        let kind = EventKind::from_fields(&raw);
        Self {
            device_id,
            kind,
            raw,
        }
    }

    /// Decodes a terminal status line received from `device_id`.
    pub fn from_status_line(device_id: DeviceId, line: &str) -> Self {
        Self::from_fields(device_id, parse_status_line(line))
    }

    /// Decodes a relay-shaped JSON object: `{"deviceId": "T1", "event": "...", ...}`.
    pub fn from_json(value: &Value) -> Result<Self, ProtocolError> {
        let Value::Object(map) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        let mut raw = RawFields::new();
        let mut device_id = None;
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => continue,
                other => other.to_string(),
            };
            if key == "deviceId" || key == "device_id" {
                device_id = Some(DeviceId::new(text));
            } else {
                raw.insert(key.clone(), text);
            }
        }

        let device_id = device_id.ok_or(ProtocolError::MissingField("deviceId"))?;
        Ok(Self::from_fields(device_id, raw))
    }

    /// Compact JSON rendering of the raw fields for the event log.
    pub fn log_line(&self) -> String {
        let mut entry = serde_json::Map::new();
        entry.insert(
            "deviceId".to_string(),
            Value::String(self.device_id.to_string()),
        );
        for (key, value) in &self.raw {
            entry.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(entry).to_string()
    }
}

/// Decodes a full-replacement presence snapshot (`[{"id":..,"status":..,"mode":..}]`).
pub fn decode_presence_snapshot(json: &str) -> Result<Vec<Device>, ProtocolError> {
    serde_json::from_str(json).map_err(|err| ProtocolError::InvalidJson(err.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominationSettings {
    pub duration_secs: u64,
    pub capture_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDestroySettings {
    pub bomb_secs: u64,
    pub arm_secs: u64,
    pub defuse_secs: u64,
    pub use_arm_pin: bool,
    pub arm_pin: String,
    pub use_defuse_pin: bool,
    pub defuse_pin: String,
    /// Local round limit in minutes; never sent to the terminal.
    #[serde(default)]
    pub round_minutes: Option<u64>,
}

/// Commands understood by the terminal firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    SetDominationSettings(DominationSettings),
    StartDomination,
    SetSearchDestroySettings(SearchDestroySettings),
    StartSearchDestroy,
    ForceEndGame,
}

impl DeviceCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceCommand::SetDominationSettings(_) => "set_dom_settings",
            DeviceCommand::StartDomination => "start_dom_game",
            DeviceCommand::SetSearchDestroySettings(_) => "set_sd_settings",
            DeviceCommand::StartSearchDestroy => "start_sd_game",
            DeviceCommand::ForceEndGame => "force_end_game",
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCommand::SetDominationSettings(s) => write!(
                f,
                "CMD:SET_DOM_SETTINGS;DURATION:{};CAPTURE:{};",
                s.duration_secs, s.capture_secs
            ),
            DeviceCommand::StartDomination => f.write_str("CMD:START_DOM_GAME;"),
            DeviceCommand::SetSearchDestroySettings(s) => write!(
                f,
                "CMD:SET_SD_SETTINGS;BOMB_TIME:{};ARM_TIME:{};DEFUSE_TIME:{};USE_ARM_PIN:{};ARM_PIN:{};USE_DEFUSE_PIN:{};DEFUSE_PIN:{};",
                s.bomb_secs,
                s.arm_secs,
                s.defuse_secs,
                u8::from(s.use_arm_pin),
                s.arm_pin,
                u8::from(s.use_defuse_pin),
                s.defuse_pin
            ),
            DeviceCommand::StartSearchDestroy => f.write_str("CMD:START_SD_GAME;"),
            DeviceCommand::ForceEndGame => f.write_str("CMD:FORCE_END_GAME"),
        }
    }
}

/// Outbound, fire-and-forget command addressed to one terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub text: String,
    pub target_device_id: DeviceId,
}

impl Command {
    pub fn new(command: &DeviceCommand, target_device_id: DeviceId) -> Self {
        Self {
            text: command.to_string(),
            target_device_id,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
