use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub const ATTACH_COMMAND: &str = "/attach";
pub const DETACH_COMMAND: &str = "/detach";
pub const QUIT_COMMAND: &str = "/quit";

/// CLI helper for rustyline that provides completion, highlighting, and hints.
///
/// Slash commands are completed by prefix; the argument of `/attach` is
/// completed as a file path.
pub struct CliHelper {
    commands: Vec<String>,
    files: FilenameCompleter,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: vec![
                ATTACH_COMMAND.to_string(),
                DETACH_COMMAND.to_string(),
                QUIT_COMMAND.to_string(),
            ],
            files: FilenameCompleter::new(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];

        if prefix.starts_with(&format!("{ATTACH_COMMAND} ")) {
            return self.files.complete(line, pos, ctx);
        }

        if prefix.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(prefix))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl CliHelper {
    fn is_command(&self, word: &str) -> bool {
        self.commands.iter().any(|cmd| cmd == word)
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }

        let (word, rest) = line.split_at(line.find(char::is_whitespace).unwrap_or(line.len()));
        if self.is_command(word) {
            Owned(format!("{}{}", word.bright_cyan(), rest))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    /// Suggests the rest of a partially typed command, or the missing
    /// argument of `/attach`.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line == format!("{ATTACH_COMMAND} ") {
            return Some("<passport.png|.jpg|.pdf>".bright_black().to_string());
        }
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }

        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}
