//! Matching an invocation against a declaration.

use crate::bindings::{Bindings, Value};
use crate::spec::{normalize_name, ArgSpec};
use crate::table::{DeclarationTable, OptionKind};
use thiserror::Error;

/// Errors that can occur during argument parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized option: --{0}")]
    UnrecognizedOption(String),

    #[error("unrecognized flag: --{0}")]
    UnrecognizedFlag(String),

    #[error("unexpected token '{token}'\n{usage}")]
    UnexpectedPositional { token: String, usage: String },

    #[error("missing required argument: {name}\n{usage}")]
    MissingRequired { name: String, usage: String },

    #[error("missing value for option: --{0}")]
    MissingValue(String),

    #[error("invalid value '{value}' for flag --{name}: expected true or false")]
    InvalidFlagValue { name: String, value: String },
}

/// Outcome of parsing arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every declared name bound.
    Success(Bindings),
    /// User requested help (-h or --help).
    Help,
}

/// Parse `args` against `spec`, pre-seeding keyword options from the
/// process environment.
///
/// Returns `ParseOutcome::Help` if -h/--help is found anywhere in args.
pub fn parse_args(spec: &ArgSpec, args: &[String]) -> Result<ParseOutcome, ParseError> {
    parse_args_with(spec, args, |name| std::env::var(name).ok())
}

/// Parse `args` against `spec`, pre-seeding keyword options through `lookup`.
pub fn parse_args_with<F>(
    spec: &ArgSpec,
    args: &[String],
    lookup: F,
) -> Result<ParseOutcome, ParseError>
where
    F: Fn(&str) -> Option<String>,
{
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        tracing::debug!("help requested");
        return Ok(ParseOutcome::Help);
    }

    let table = DeclarationTable::build(spec, lookup);
    let mut matcher = Matcher::new(spec, table);
    for arg in args {
        matcher.consume(arg)?;
    }
    matcher.finish().map(ParseOutcome::Success)
}

/// Classification of one invocation argument.
#[derive(Debug, PartialEq, Eq)]
enum Arg<'a> {
    Keyword(&'a str, &'a str),
    Flag(&'a str),
    Positional(&'a str),
}

impl<'a> Arg<'a> {
    fn classify(arg: &'a str) -> Arg<'a> {
        match arg.strip_prefix("--") {
            Some(body) => match body.split_once('=') {
                Some((name, value)) if !name.is_empty() => Arg::Keyword(name, value),
                None if !body.is_empty() => Arg::Flag(body),
                _ => Arg::Positional(arg),
            },
            None => Arg::Positional(arg),
        }
    }
}

/// Internal parser state.
struct Matcher<'a> {
    spec: &'a ArgSpec,
    table: DeclarationTable,
    positionals: Vec<String>,
}

impl<'a> Matcher<'a> {
    fn new(spec: &'a ArgSpec, table: DeclarationTable) -> Self {
        Self {
            spec,
            table,
            positionals: Vec::new(),
        }
    }

    fn consume(&mut self, arg: &str) -> Result<(), ParseError> {
        let class = Arg::classify(arg);
        tracing::trace!(?class, "classified argument");

        match class {
            Arg::Keyword(name, value) => self.set_keyword(name, value),
            Arg::Flag(name) => self.set_flag(name),
            Arg::Positional(value) => self.push_positional(value),
        }
    }

    fn set_keyword(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        let slot = self
            .table
            .option_mut(&normalize_name(name))
            .ok_or_else(|| ParseError::UnrecognizedOption(name.to_string()))?;

        slot.value = match slot.kind {
            OptionKind::Keyword => Value::Text(value.to_string()),
            OptionKind::Flag => match value {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => {
                    return Err(ParseError::InvalidFlagValue {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                }
            },
        };
        Ok(())
    }

    fn set_flag(&mut self, name: &str) -> Result<(), ParseError> {
        let slot = self
            .table
            .option_mut(&normalize_name(name))
            .ok_or_else(|| ParseError::UnrecognizedFlag(name.to_string()))?;

        match slot.kind {
            OptionKind::Flag => {
                slot.value = Value::Bool(true);
                Ok(())
            }
            OptionKind::Keyword => Err(ParseError::MissingValue(name.to_string())),
        }
    }

    fn push_positional(&mut self, value: &str) -> Result<(), ParseError> {
        if self.positionals.len() >= self.table.positionals().len() {
            return Err(ParseError::UnexpectedPositional {
                token: value.to_string(),
                usage: self.spec.usage(None),
            });
        }
        self.positionals.push(value.to_string());
        Ok(())
    }

    /// Check required positionals and bind everything.
    fn finish(self) -> Result<Bindings, ParseError> {
        let declared = self.table.positionals();
        if let Some(missing) = declared.get(self.positionals.len()) {
            // Only the first unbound positional is reported.
            let name = self
                .spec
                .positionals()
                .nth(self.positionals.len())
                .unwrap_or(missing.as_str())
                .to_string();
            return Err(ParseError::MissingRequired {
                name,
                usage: self.spec.usage(None),
            });
        }

        let mut bindings = Bindings::default();
        for (name, value) in declared.iter().zip(self.positionals) {
            bindings.insert(name.clone(), Value::Text(value));
        }
        for (key, slot) in self.table.into_options() {
            bindings.insert(key, slot.value);
        }
        Ok(bindings)
    }
}
