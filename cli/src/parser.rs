//! Command parser for the `fms` shell
//!
//! Splits a line into words (single and double quotes group words), then maps
//! the first word to a [`Command`]. Form commands take `key=value` pairs;
//! a value starting with `@` names a file to attach.

use fms_link::Attachment;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CLIError, Result};

/// Parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Menu,
    Open(String),
    List(Option<String>),
    Show(u64),
    Retry,
    Approve(u64),
    Reject(u64),
    Lift { row: u64, fields: FormFields },
    StoreIn { row: u64, fields: FormFields },
    Tally { row: u64, fields: FormFields },
    Pay(u64),
    Indent(FormFields),
    Master,
    History(Option<String>),
    Stats,
    SetFormat(String),
    WhoAmI,
    Logout,
    Quit,
    Unknown(String),
}

/// `key=value` arguments of a form command.
///
/// Keys match loosely: case, `_`, `-` are ignored, so `bill_no`, `bill-no`
/// and `billNo` are the same field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    values: BTreeMap<String, String>,
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FormFields {
    pub fn parse(words: &[String]) -> Result<Self> {
        let mut values = BTreeMap::new();
        for word in words {
            let Some((key, value)) = word.split_once('=') else {
                return Err(CLIError::ParseError(format!(
                    "Expected key=value, got '{}'",
                    word
                )));
            };
            if key.trim().is_empty() {
                return Err(CLIError::ParseError(format!("Missing field name in '{}'", word)));
            }
            values.insert(normalize_key(key), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&normalize_key(key))
    }

    /// Raw text of a field; empty when absent.
    pub fn text(&self, key: &str) -> String {
        self.values
            .get(&normalize_key(key))
            .cloned()
            .unwrap_or_default()
    }

    /// Decimal field. Absent or blank reads as 0 so form validation reports it.
    pub fn number(&self, key: &str) -> Result<f64> {
        let raw = self.text(key);
        if raw.trim().is_empty() {
            return Ok(0.0);
        }
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| CLIError::ParseError(format!("{} must be a number, got '{}'", key, raw)))
    }

    /// Whole-number field. Absent or blank reads as 0.
    pub fn integer(&self, key: &str) -> Result<i64> {
        let raw = self.text(key);
        if raw.trim().is_empty() {
            return Ok(0);
        }
        raw.trim().parse::<i64>().map_err(|_| {
            CLIError::ParseError(format!("{} must be a whole number, got '{}'", key, raw))
        })
    }

    /// File named by an `@path` value.
    pub fn attachment(&self, key: &str) -> Result<Option<Attachment>> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(None);
        }
        let Some(path) = raw.strip_prefix('@') else {
            return Err(CLIError::ParseError(format!(
                "{} expects @<path>, got '{}'",
                key, raw
            )));
        };
        Ok(Some(Attachment::from_path(Path::new(path))?))
    }
}

/// Command parser
pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, line: &str) -> Result<Command> {
        let words = split_words(line)?;
        let Some((command, args)) = words.split_first() else {
            return Err(CLIError::ParseError("Empty command".into()));
        };

        match command.to_ascii_lowercase().as_str() {
            "help" | "?" | "\\help" | "\\?" => Ok(Command::Help),
            "menu" | "pages" => Ok(Command::Menu),
            "open" | "goto" | "cd" => match args.first() {
                Some(page) => Ok(Command::Open(page.clone())),
                None => Err(CLIError::ParseError("open requires a page id".into())),
            },
            "list" | "ls" => Ok(Command::List(search_term(args))),
            "show" => Ok(Command::Show(row_arg("show", args)?)),
            "retry" | "refresh" => Ok(Command::Retry),
            "approve" => Ok(Command::Approve(row_arg("approve", args)?)),
            "reject" => Ok(Command::Reject(row_arg("reject", args)?)),
            "lift" => Ok(Command::Lift {
                row: row_arg("lift", args)?,
                fields: FormFields::parse(&args[1..])?,
            }),
            "store-in" | "storein" => Ok(Command::StoreIn {
                row: row_arg("store-in", args)?,
                fields: FormFields::parse(&args[1..])?,
            }),
            "tally" => Ok(Command::Tally {
                row: row_arg("tally", args)?,
                fields: FormFields::parse(&args[1..])?,
            }),
            "pay" => Ok(Command::Pay(row_arg("pay", args)?)),
            "indent" => Ok(Command::Indent(FormFields::parse(args)?)),
            "master" => Ok(Command::Master),
            "history" => Ok(Command::History(search_term(args))),
            "stats" => Ok(Command::Stats),
            "format" => match args.first() {
                Some(format) => Ok(Command::SetFormat(format.to_ascii_lowercase())),
                None => Err(CLIError::ParseError(
                    "format requires: table, json, or csv".into(),
                )),
            },
            "whoami" => Ok(Command::WhoAmI),
            "logout" => Ok(Command::Logout),
            "quit" | "exit" | "q" | "\\q" | "\\quit" => Ok(Command::Quit),
            _ => Ok(Command::Unknown(command.clone())),
        }
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

fn search_term(args: &[String]) -> Option<String> {
    let term = args.join(" ");
    if term.trim().is_empty() {
        None
    } else {
        Some(term.trim().to_string())
    }
}

/// Row handle argument; `21` and `#21` are both accepted.
fn row_arg(command: &str, args: &[String]) -> Result<u64> {
    let raw = args
        .first()
        .ok_or_else(|| CLIError::ParseError(format!("{} requires a row number", command)))?;
    raw.trim_start_matches('#')
        .parse::<u64>()
        .map_err(|_| CLIError::ParseError(format!("Invalid row number '{}'", raw)))
}

/// Split a line into words, honouring single and double quotes.
pub fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            },
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(CLIError::ParseError(format!("Unterminated {} quote", q)));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
