use thiserror::Error;

use crate::shared::constants::{COMMAND_START, COMMAND_START_NAMED, COMMAND_STOP};

/// Remote control for the recorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    StartNamed(String),
    Stop,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' requires a base name")]
    MissingArgument(&'static str),
}

impl Command {
    /// Builds a command from its transport name and optional argument.
    pub fn parse(name: &str, argument: Option<&str>) -> Result<Self, CommandParseError> {
        match name {
            COMMAND_START => Ok(Self::Start),
            COMMAND_STOP => Ok(Self::Stop),
            COMMAND_START_NAMED => match argument.map(str::trim) {
                Some(base) if !base.is_empty() => Ok(Self::StartNamed(base.to_string())),
                _ => Err(CommandParseError::MissingArgument(COMMAND_START_NAMED)),
            },
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => COMMAND_START,
            Self::StartNamed(_) => COMMAND_START_NAMED,
            Self::Stop => COMMAND_STOP,
        }
    }
}
