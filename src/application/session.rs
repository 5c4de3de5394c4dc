//! Line commands for the interactive session

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    TokenIn(String),
    TokenOut(String),
    /// Empty text clears the amount
    Amount(String),
    Flip,
    Connect,
    Disconnect,
    Submit,
    Status,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` expects a token symbol")]
    MissingToken(String),

    #[error("Too many arguments for `{0}`")]
    UnexpectedArgument(String),
}

pub const HELP: &[&str] = &[
    "in <token>       select the token to sell",
    "out <token>      select the token to buy",
    "amount [value]   set the input amount (no value clears it)",
    "flip             swap the direction",
    "connect          connect the wallet",
    "disconnect       disconnect the wallet",
    "submit           send the simulated swap",
    "status           show the widget",
    "help             show this list",
    "quit             leave the session",
];

impl FromStr for SessionCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or(ParseCommandError::Empty)?.to_lowercase();
        let arg = parts.next().map(str::to_string);

        let max_args = match verb.as_str() {
            "in" | "out" | "amount" => 1,
            _ => 0,
        };
        if parts.next().is_some() || (max_args == 0 && arg.is_some()) {
            return Err(ParseCommandError::UnexpectedArgument(verb));
        }

        let command = match verb.as_str() {
            "in" => SessionCommand::TokenIn(arg.ok_or(ParseCommandError::MissingToken(verb.clone()))?),
            "out" => SessionCommand::TokenOut(arg.ok_or(ParseCommandError::MissingToken(verb.clone()))?),
            "amount" => SessionCommand::Amount(arg.unwrap_or_default()),
            "flip" => SessionCommand::Flip,
            "connect" => SessionCommand::Connect,
            "disconnect" => SessionCommand::Disconnect,
            "submit" => SessionCommand::Submit,
            "status" => SessionCommand::Status,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            _ => return Err(ParseCommandError::Unknown(verb.clone())),
        };
        Ok(command)
    }
}
