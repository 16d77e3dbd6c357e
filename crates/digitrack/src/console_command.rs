/// Commands read from the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Start tracking a scanned or typed order identifier.
    Start {
        /// Trimmed order identifier.
        production_order: String,
    },
    /// Stop and record the current session.
    Stop,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        if line.is_empty() {
            None
        } else if line.eq_ignore_ascii_case("stop") {
            Some(ConsoleCommand::Stop)
        } else {
            Some(ConsoleCommand::Start {
                production_order: line.to_string(),
            })
        }
    }
}
