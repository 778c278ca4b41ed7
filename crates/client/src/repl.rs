//! Line commands understood by the agent console.

use serde_json::Value;

pub const HELP: &str = "\
Commands:
  <action_id> [json]   run an action, e.g. chat {\"message\": \"hi\"}
  :prompt              show the tool prompt for the current state
  :actions             list registered action ids
  :interrupt [reason]  interrupt every running action
  :resume              allow actions to run again after :interrupt
  :help                show this help
  :quit                exit";

#[derive(Debug, PartialEq)]
pub enum Command {
    Execute { id: String, params: Value },
    Prompt,
    Actions,
    Interrupt(String),
    Resume,
    Help,
    Quit,
    Empty,
}

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    if let Some(rest) = line.strip_prefix(':') {
        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(name, arg)| (name, arg.trim()));
        return match name {
            "prompt" => Ok(Command::Prompt),
            "actions" => Ok(Command::Actions),
            "interrupt" => Ok(Command::Interrupt(if arg.is_empty() {
                "interrupted from console".to_string()
            } else {
                arg.to_string()
            })),
            "resume" => Ok(Command::Resume),
            "help" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command :{other}")),
        };
    }

    let (id, raw) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(id, raw)| (id, raw.trim()));
    let params = if raw.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON parameters: {e}"))?
    };

    Ok(Command::Execute {
        id: id.to_string(),
        params,
    })
}
