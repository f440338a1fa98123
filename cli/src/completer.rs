//! TAB completion for shell commands and page ids
//!
//! The first word completes against the command names; the argument of
//! `open` completes against the pages the user may open.

use colored::*;
use rustyline::completion::{Completer, Pair};

/// Command words offered at the start of a line.
pub(crate) const COMMANDS: &[&str] = &[
    "help", "menu", "open", "list", "show", "retry", "approve", "reject", "lift", "store-in",
    "tally", "pay", "indent", "master", "history", "stats", "format", "whoami", "logout", "quit",
];

const FORMATS: &[&str] = &["table", "json", "csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletionContext {
    Command,
    Page,
    Format,
    None,
}

pub struct AutoCompleter {
    pages: Vec<String>,
    color: bool,
}

impl AutoCompleter {
    pub fn new(color: bool) -> Self {
        Self {
            pages: Vec::new(),
            color,
        }
    }

    /// Page ids offered after `open`.
    pub fn set_pages(&mut self, pages: Vec<String>) {
        self.pages = pages;
    }

    /// Remainder of the single command that matches the current word, if any.
    pub fn completion_hint(&self, line: &str, pos: usize) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, candidates) = self.candidates(line, pos);
        let word = &line[start..pos];
        if word.is_empty() {
            return None;
        }
        match candidates.as_slice() {
            [only] if only.len() > word.len() => Some(only[word.len()..].to_string()),
            _ => None,
        }
    }

    fn detect_context(line: &str, pos: usize) -> CompletionContext {
        let before = &line[..pos];
        let mut words = before.split_whitespace();
        let first = words.next();
        let ends_in_space = before.ends_with(char::is_whitespace);
        let typed_args = words.count();

        match (first, typed_args, ends_in_space) {
            (None, _, _) | (Some(_), 0, false) => CompletionContext::Command,
            (Some(cmd), 0, true) | (Some(cmd), 1, false) => {
                match cmd.to_ascii_lowercase().as_str() {
                    "open" | "goto" | "cd" => CompletionContext::Page,
                    "format" => CompletionContext::Format,
                    _ => CompletionContext::None,
                }
            }
            _ => CompletionContext::None,
        }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = line[start..pos].to_ascii_lowercase();

        let pool: Vec<&str> = match Self::detect_context(line, pos) {
            CompletionContext::Command => COMMANDS.to_vec(),
            CompletionContext::Page => self.pages.iter().map(String::as_str).collect(),
            CompletionContext::Format => FORMATS.to_vec(),
            CompletionContext::None => Vec::new(),
        };

        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.starts_with(&word))
            .map(str::to_string)
            .collect();
        (start, matches)
    }
}

impl Completer for AutoCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(line, pos);
        let pairs = candidates
            .into_iter()
            .map(|text| Pair {
                display: if self.color {
                    text.cyan().to_string()
                } else {
                    text.clone()
                },
                replacement: text,
            })
            .collect();
        Ok((start, pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(completer: &AutoCompleter, line: &str) -> Vec<String> {
        completer.candidates(line, line.len()).1
    }

    #[test]
    fn test_command_completion() {
        let completer = AutoCompleter::new(false);
        assert_eq!(words(&completer, "ap"), vec!["approve"]);
        assert!(words(&completer, "").contains(&"store-in".to_string()));
        assert_eq!(completer.completion_hint("sta", 3).as_deref(), Some("ts"));
        assert_eq!(completer.completion_hint("s", 1), None);
    }

    #[test]
    fn test_page_completion_uses_allowed_pages() {
        let mut completer = AutoCompleter::new(false);
        completer.set_pages(vec!["dashboard".into(), "lifting".into(), "license".into()]);

        assert_eq!(words(&completer, "open li"), vec!["lifting", "license"]);
        assert_eq!(words(&completer, "open "), vec!["dashboard", "lifting", "license"]);
        assert!(words(&completer, "open lifting x").is_empty());
        assert!(words(&completer, "approve 4").is_empty());
    }

    #[test]
    fn test_format_completion() {
        let completer = AutoCompleter::new(false);
        assert_eq!(words(&completer, "format j"), vec!["json"]);
    }
}
