use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Position;

/// The single action emitted for the controlled chef each turn.
///
/// `note` is a free-text diagnostic shown by the referee; it never affects play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move { target: Position },
    Use { target: Position, note: Option<String> },
    Wait { note: Option<String> },
}

impl Command {
    pub fn move_to(target: Position) -> Self {
        Command::Move { target }
    }

    pub fn use_at(target: Position, note: impl Into<String>) -> Self {
        Command::Use {
            target,
            note: Some(note.into()),
        }
    }

    pub fn wait(note: impl Into<String>) -> Self {
        Command::Wait {
            note: Some(note.into()),
        }
    }

    /// Cell the command targets, if any.
    pub fn target(&self) -> Option<Position> {
        match self {
            Command::Move { target } | Command::Use { target, .. } => Some(*target),
            Command::Wait { .. } => None,
        }
    }

    /// Drops the diagnostic note.
    pub fn without_note(self) -> Self {
        match self {
            Command::Use { target, .. } => Command::Use { target, note: None },
            Command::Wait { .. } => Command::Wait { note: None },
            other => other,
        }
    }
}

/// Renders the command as one line of the referee protocol.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { target } => write!(f, "MOVE {target}"),
            Command::Use { target, note } => {
                write!(f, "USE {target}")?;
                if let Some(note) = note {
                    write!(f, " {note}")?;
                }
                Ok(())
            }
            Command::Wait { note } => {
                f.write_str("WAIT")?;
                if let Some(note) = note {
                    write!(f, " {note}")?;
                }
                Ok(())
            }
        }
    }
}
