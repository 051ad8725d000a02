use panel_core::Msg;

pub const HELP_TEXT: &str = "\
Commands:
  state [name]   filter by state (no name: all states)
  city [name]    filter by city of the selected state (no name: all cities)
  start          process the next batch
  stop           stop processing
  results        fetch the latest results
  show           redraw the panel
  help           show this help
  quit           exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
    Unknown(String),
}

/// Parses one line of operator input. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "state" => Command::Dispatch(Msg::StateSelected(rest.to_string())),
        "city" => Command::Dispatch(Msg::CitySelected(rest.to_string())),
        "start" => Command::Dispatch(Msg::StartClicked),
        "stop" => Command::Dispatch(Msg::StopClicked),
        "results" => Command::Dispatch(Msg::RefreshResultsClicked),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}
