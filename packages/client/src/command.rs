//! Terminal input parsing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join(String),
    Leave,
    Typing,
    StopTyping,
    Quit,
    Help,
    /// Anything that is not a command is a chat message
    Say(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("usage: /join <room>")]
    MissingRoom,

    #[error("unknown command '{0}', try /help")]
    Unknown(String),
}

pub const HELP: &str = "\
/join <room>  join (or switch to) a room
/leave        leave the current room
/typing       show others that you are typing
/stop         stop the typing indicator
/quit         exit
anything else is sent as a message";

/// Parse one input line. The line is expected to be trimmed and non-empty.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    match name {
        "join" if argument.is_empty() => Err(CommandError::MissingRoom),
        "join" => Ok(Command::Join(argument.to_string())),
        "leave" => Ok(Command::Leave),
        "typing" => Ok(Command::Typing),
        "stop" => Ok(Command::StopTyping),
        "quit" | "exit" => Ok(Command::Quit),
        "help" => Ok(Command::Help),
        _ => Err(CommandError::Unknown(format!("/{}", name))),
    }
}
