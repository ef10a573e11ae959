/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: the new content of the query line.
    Edit(String),
    /// Enter without modifier.
    Submit,
    /// Shift+Enter: continue the query on a new line.
    Newline,
    SetDocumentType(String),
    SetDocumentInfo(String),
    SetUploadPath(String),
    AcceptTerms,
    Load,
    Regenerate,
    Report,
    Reset,
    Ping,
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Type a question and pause: it is sent after the quiet period.
Commands:
  :send              send the current question now
  :newline           continue the question on the next line
  :type <text>       document type (e.g. Zoning By-law)
  :info <text>       document information
  :path <path>       upload path
  :terms             accept the terms and conditions
  :load              load the document
  :regen             regenerate the last answer
  :report            report an issue
  :reset             clear the question and the last query
  :ping              check the backend connection
  :status            show the current state
  :help              show this help
  :quit              exit";

pub fn parse_line(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.trim_start().strip_prefix(':') else {
        return Command::Edit(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "send" => Command::Submit,
        "newline" => Command::Newline,
        "type" => Command::SetDocumentType(arg.to_string()),
        "info" => Command::SetDocumentInfo(arg.to_string()),
        "path" => Command::SetUploadPath(arg.to_string()),
        "terms" => Command::AcceptTerms,
        "load" => Command::Load,
        "regen" | "regenerate" => Command::Regenerate,
        "report" => Command::Report,
        "reset" => Command::Reset,
        "ping" => Command::Ping,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_an_edit() {
        assert_eq!(
            parse_line("what are the setback rules?\n"),
            Command::Edit("what are the setback rules?".to_string())
        );
        assert_eq!(parse_line(""), Command::Edit(String::new()));
    }

    #[test]
    fn commands_take_trimmed_arguments() {
        assert_eq!(
            parse_line(":type   Zoning By-law  "),
            Command::SetDocumentType("Zoning By-law".to_string())
        );
        assert_eq!(parse_line(":info"), Command::SetDocumentInfo(String::new()));
        assert_eq!(parse_line("  :send"), Command::Submit);
        assert_eq!(parse_line(":q"), Command::Quit);
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(parse_line(":frobnicate x"), Command::Unknown("frobnicate".to_string()));
    }
}
