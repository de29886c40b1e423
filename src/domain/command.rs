//! Commands relayed to devices and their wire representation.
//!
//! A [`Command`] serializes directly into the outbound device message:
//!
//! ```json
//! {"command": "qsy_with_mode", "params": {"frequency": 14200, "mode": "USB"}}
//! ```

use serde::Serialize;

/// One-shot command delivered to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", content = "params", rename_all = "snake_case")]
pub enum Command {
    /// Change operating frequency.
    Qsy {
        /// Target frequency.
        frequency: u64,
    },
    /// Change operating frequency and mode.
    QsyWithMode {
        /// Target frequency.
        frequency: u64,
        /// Resolved mode. `None` when no range of the table matched.
        mode: Option<String>,
    },
}

impl Command {
    /// Target frequency of the command.
    #[must_use]
    pub const fn frequency(&self) -> u64 {
        match self {
            Self::Qsy { frequency } | Self::QsyWithMode { frequency, .. } => *frequency,
        }
    }

    /// Resolved mode, if the command carries one.
    #[must_use]
    pub fn mode(&self) -> Option<&str> {
        match self {
            Self::Qsy { .. } => None,
            Self::QsyWithMode { mode, .. } => mode.as_deref(),
        }
    }

    /// Wire name of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Qsy { .. } => "qsy",
            Self::QsyWithMode { .. } => "qsy_with_mode",
        }
    }
}
