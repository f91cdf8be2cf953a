use std::fmt;

use serde::{Deserialize, Serialize};

/// Mode a terminal reports while it sits idle waiting for console commands.
pub const READY_MODE: &str = "terminal";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(DeviceId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceStatus {
    Online,
    Offline,
}

/// Last-known presence of one physical terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub status: DeviceStatus,
    #[serde(default)]
    pub mode: Option<String>,
}

impl Device {
    pub fn online(id: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(id),
            status: DeviceStatus::Online,
            mode: Some(mode.into()),
        }
    }

    pub fn offline(id: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(id),
            status: DeviceStatus::Offline,
            mode: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }

    /// A terminal can be bound for configuration only while online and idle.
    pub fn is_ready(&self) -> bool {
        self.is_online() && self.mode.as_deref() == Some(READY_MODE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    None,
    Domination,
    SearchDestroy,
}

impl GameMode {
    pub fn from_wire(mode: &str) -> Self {
        match mode {
            "domination" | "dom" => GameMode::Domination,
            "sd" | "search_destroy" => GameMode::SearchDestroy,
            _ => GameMode::None,
        }
    }

    pub fn match_screen(self) -> Option<Screen> {
        match self {
            GameMode::None => None,
            GameMode::Domination => Some(Screen::Domination),
            GameMode::SearchDestroy => Some(Screen::SearchDestroy),
        }
    }
}

/// Mutually exclusive console views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Waiting,
    ModeSelect,
    TerminalSelect,
    Config,
    Domination,
    SearchDestroy,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Waiting,
        Screen::ModeSelect,
        Screen::TerminalSelect,
        Screen::Config,
        Screen::Domination,
        Screen::SearchDestroy,
    ];

    /// Screens that own a bound terminal and survive presence loss.
    pub fn holds_device(self) -> bool {
        matches!(
            self,
            Screen::Config | Screen::Domination | Screen::SearchDestroy
        )
    }

    pub fn is_match(self) -> bool {
        matches!(self, Screen::Domination | Screen::SearchDestroy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Waiting => "waiting",
            Screen::ModeSelect => "mode_select",
            Screen::TerminalSelect => "terminal_select",
            Screen::Config => "config",
            Screen::Domination => "domination",
            Screen::SearchDestroy => "search_destroy",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Red,
    Green,
}

impl Team {
    /// Terminals number teams `1` (red) and `2` (green).
    pub fn from_wire(value: &str) -> Self {
        if value.trim() == "1" {
            Team::Red
        } else {
            Team::Green
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Team::Red => "Rossa",
            Team::Green => "Verde",
        }
    }
}
