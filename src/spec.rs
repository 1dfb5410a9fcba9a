//! Declaration string parsing.
//!
//! A declaration is a whitespace-separated list of tokens:
//!
//! - `name` declares a required positional argument.
//! - `[--name]` declares an optional boolean flag.
//! - `[--name=PLACEHOLDER]` declares an optional keyword option.
//!
//! Brackets are a readability hint only and are stripped before a token is
//! classified.

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while parsing a declaration string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("malformed option declaration: {0}")]
    MalformedOption(String),

    #[error("invalid argument name '{0}': must be letters, digits, '-' or '_'")]
    InvalidName(String),

    #[error("duplicate argument name: {0}")]
    DuplicateName(String),

    #[error("invalid variable prefix '{0}': must be letters, digits or '_', not starting with a digit")]
    InvalidPrefix(String),
}

/// A single declared argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A required positional argument (e.g. `infile`)
    Positional(String),
    /// An optional option taking a value (e.g. `[--outfile=<path>]`)
    Keyword { name: String, placeholder: String },
    /// An optional boolean switch (e.g. `[--force]`)
    Flag(String),
}

impl Token {
    /// The name as written in the declaration.
    pub fn name(&self) -> &str {
        match self {
            Token::Positional(name) | Token::Flag(name) => name.as_str(),
            Token::Keyword { name, .. } => name.as_str(),
        }
    }

    /// The name used as the binding key.
    pub fn key(&self) -> String {
        normalize_name(self.name())
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Token::Positional(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Positional(name) => write!(f, "{}", name),
            Token::Keyword { name, placeholder } => write!(f, "[--{}={}]", name, placeholder),
            Token::Flag(name) => write!(f, "[--{}]", name),
        }
    }
}

/// A parsed declaration string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSpec {
    tokens: Vec<Token>,
}

impl ArgSpec {
    /// Parse a declaration string such as `"infile [--outfile=<path>] [--force]"`.
    pub fn parse(spec: &str) -> Result<ArgSpec, SpecError> {
        let mut tokens = Vec::new();
        let mut seen = HashSet::new();

        for raw in tokenize(spec) {
            let token = classify(raw)?;
            if !seen.insert(token.key()) {
                return Err(SpecError::DuplicateName(token.name().to_string()));
            }
            tokens.push(token);
        }

        tracing::trace!(count = tokens.len(), "parsed declaration");
        Ok(ArgSpec { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Declared positional names, in order.
    pub fn positionals(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter(|t| t.is_positional())
            .map(Token::name)
    }

    /// Usage line for a program, e.g. `usage: copy src dst [--force]`.
    pub fn usage(&self, program: Option<&str>) -> String {
        match (program, self.tokens.is_empty()) {
            (Some(program), true) => format!("usage: {}", program),
            (Some(program), false) => format!("usage: {} {}", program, self),
            (None, _) => format!("usage: {}", self),
        }
    }
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ArgSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArgSpec::parse(s)
    }
}

/// Convert a declared name into a binding key.
///
/// Hyphens are not valid in shell variable names, so they become underscores.
pub fn normalize_name(name: &str) -> String {
    name.replace('-', "_")
}

/// Split a declaration into raw tokens with optional-brackets removed.
fn tokenize(spec: &str) -> impl Iterator<Item = &str> {
    spec.split_whitespace().map(|token| {
        let token = token.strip_prefix('[').unwrap_or(token);
        token.strip_suffix(']').unwrap_or(token)
    })
}

fn classify(raw: &str) -> Result<Token, SpecError> {
    let Some(body) = raw.strip_prefix("--") else {
        validate_name(raw)?;
        return Ok(Token::Positional(raw.to_string()));
    };

    match body.split_once('=') {
        Some((name, placeholder)) => {
            if name.is_empty() || placeholder.is_empty() || placeholder.contains('=') {
                return Err(SpecError::MalformedOption(raw.to_string()));
            }
            validate_name(name)?;
            Ok(Token::Keyword {
                name: name.to_string(),
                placeholder: placeholder.to_string(),
            })
        }
        None => {
            if body.is_empty() {
                return Err(SpecError::MalformedOption(raw.to_string()));
            }
            validate_name(body)?;
            Ok(Token::Flag(body.to_string()))
        }
    }
}

/// Check a prefix prepended to every binding key in shell output.
///
/// Keys are already identifiers, so an empty prefix or one that is itself an
/// identifier keeps every variable name valid.
pub fn validate_prefix(prefix: &str) -> Result<(), SpecError> {
    let mut chars = prefix.chars();
    let valid_start = match chars.next() {
        None => return Ok(()),
        Some(c) => c.is_ascii_alphabetic() || c == '_',
    };
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(SpecError::InvalidPrefix(prefix.to_string()))
    }
}

fn validate_name(name: &str) -> Result<(), SpecError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        Ok(())
    } else {
        Err(SpecError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_token_kinds() {
        let spec = ArgSpec::parse("infile [--outfile=<path>] [--force]").unwrap();
        assert_eq!(
            spec.tokens(),
            &[
                Token::Positional("infile".to_string()),
                Token::Keyword {
                    name: "outfile".to_string(),
                    placeholder: "<path>".to_string(),
                },
                Token::Flag("force".to_string()),
            ]
        );
    }

    #[test]
    fn test_brackets_are_optional() {
        let bracketed = ArgSpec::parse("[--force] [--mode=M]").unwrap();
        let bare = ArgSpec::parse("--force --mode=M").unwrap();
        assert_eq!(bracketed, bare);
    }

    #[test]
    fn test_any_whitespace_separates() {
        let spec = ArgSpec::parse("  a\tb\n\n [--c]  ").unwrap();
        let names: Vec<&str> = spec.tokens().iter().map(Token::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_declaration() {
        let spec = ArgSpec::parse("").unwrap();
        assert!(spec.tokens().is_empty());
        assert_eq!(spec.usage(Some("tool")), "usage: tool");
    }

    #[test]
    fn test_positionals_in_order() {
        let spec = ArgSpec::parse("src [--force] dst").unwrap();
        let positionals: Vec<&str> = spec.positionals().collect();
        assert_eq!(positionals, vec!["src", "dst"]);
    }

    #[test]
    fn test_hyphenated_key_normalized() {
        let spec = ArgSpec::parse("var-1 [--var-2=<path>]").unwrap();
        let keys: Vec<String> = spec.tokens().iter().map(Token::key).collect();
        assert_eq!(keys, vec!["var_1", "var_2"]);
    }

    #[test]
    fn test_error_on_duplicate_names() {
        let result = ArgSpec::parse("a [--a]");
        assert_eq!(result, Err(SpecError::DuplicateName("a".to_string())));
    }

    #[test]
    fn test_error_on_duplicate_after_normalization() {
        let result = ArgSpec::parse("dry-run [--dry_run]");
        assert!(matches!(result, Err(SpecError::DuplicateName(_))));
    }

    #[test]
    fn test_error_on_empty_placeholder() {
        let result = ArgSpec::parse("[--mode=]");
        assert_eq!(result, Err(SpecError::MalformedOption("--mode=".to_string())));
    }

    #[test]
    fn test_error_on_double_equals() {
        let result = ArgSpec::parse("[--mode=a=b]");
        assert!(matches!(result, Err(SpecError::MalformedOption(_))));
    }

    #[test]
    fn test_error_on_empty_option_name() {
        assert!(matches!(
            ArgSpec::parse("[--]"),
            Err(SpecError::MalformedOption(_))
        ));
        assert!(matches!(
            ArgSpec::parse("[--=x]"),
            Err(SpecError::MalformedOption(_))
        ));
    }

    #[test]
    fn test_error_on_invalid_name() {
        assert!(matches!(
            ArgSpec::parse("1st"),
            Err(SpecError::InvalidName(_))
        ));
        assert!(matches!(
            ArgSpec::parse("[--bad$name]"),
            Err(SpecError::InvalidName(_))
        ));
    }

    #[test]
    fn test_display_reconstructs_declaration() {
        let spec = ArgSpec::parse("infile --outfile=<path> [--force]").unwrap();
        assert_eq!(spec.to_string(), "infile [--outfile=<path>] [--force]");
    }

    #[test]
    fn test_usage_line() {
        let spec = ArgSpec::parse("a b").unwrap();
        assert_eq!(spec.usage(Some("copy")), "usage: copy a b");
        assert_eq!(spec.usage(None), "usage: a b");
    }

    #[test]
    fn test_validate_prefix() {
        assert_eq!(validate_prefix(""), Ok(()));
        assert_eq!(validate_prefix("ARG_"), Ok(()));
        assert_eq!(validate_prefix("_x1"), Ok(()));
        for bad in ["x;", "1A_", "my-", "a b", "$(id)"] {
            assert_eq!(
                validate_prefix(bad),
                Err(SpecError::InvalidPrefix(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_from_str() {
        let spec: ArgSpec = "a [--b]".parse().unwrap();
        assert_eq!(spec.tokens().len(), 2);
    }
}
