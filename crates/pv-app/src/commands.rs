//! Line commands typed at the prompt

use pv_core::ItemId;

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// Replace the search query; an empty query clears the filter
    Search(String),
    Show(ItemId),
    Stats,
    Reload,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  n, l, next        next page
  p, h, prev        previous page
  /text             filter by title (`/` alone clears)
  search <text>     same as /text
  show <id>         photo details
  stats             photos per album
  r, reload         load the photos again
  help              this text
  q, quit           exit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Some(query) = line.strip_prefix('/') {
            return Command::Search(query.to_string());
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word.to_lowercase().as_str(), rest) {
            ("", _) => Command::Empty,
            ("n" | "l" | "next", "") => Command::Next,
            ("p" | "h" | "prev" | "previous", "") => Command::Previous,
            ("search", query) => Command::Search(query.to_string()),
            ("show", id) => match id.parse() {
                Ok(id) => Command::Show(id),
                Err(_) => Command::Unknown(line.to_string()),
            },
            ("stats", "") => Command::Stats,
            ("r" | "reload", "") => Command::Reload,
            ("help" | "?", "") => Command::Help,
            ("q" | "quit" | "exit", "") => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}
