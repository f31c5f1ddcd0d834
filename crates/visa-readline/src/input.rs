use std::path::PathBuf;

use crate::helper::{ATTACH_COMMAND, DETACH_COMMAND, QUIT_COMMAND};

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    Attach(PathBuf),
    Detach,
    /// Anything else; may be blank.
    Message(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed == QUIT_COMMAND || trimmed == "quit" || trimmed == "exit" {
            return Self::Quit;
        }
        if trimmed == DETACH_COMMAND {
            return Self::Detach;
        }
        let argument = trimmed
            .strip_prefix(ATTACH_COMMAND)
            .filter(|rest| rest.starts_with(char::is_whitespace));
        if let Some(rest) = argument {
            let path = rest.trim();
            if !path.is_empty() {
                return Self::Attach(PathBuf::from(path));
            }
        }

        Self::Message(line.to_string())
    }
}

/// A turn may be sent when it has text or a file.
pub fn can_submit(content: &str, has_file: bool) -> bool {
    !content.trim().is_empty() || has_file
}
