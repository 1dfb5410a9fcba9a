//! Declaration table: positional slots and option defaults resolved from a spec.

use crate::bindings::Value;
use crate::spec::{normalize_name, ArgSpec, Token};
use indexmap::IndexMap;

/// How a declared option consumes its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    /// `--name=value`
    Keyword,
    /// `--name`
    Flag,
}

/// An option entry with its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSlot {
    /// Name as declared, used in messages.
    pub name: String,
    pub kind: OptionKind,
    pub value: Value,
}

/// Resolved declarations for a single parse.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationTable {
    positionals: Vec<String>,
    options: IndexMap<String, OptionSlot>,
}

impl DeclarationTable {
    /// Build the table, resolving keyword defaults through `lookup`.
    ///
    /// `lookup` receives the normalized option name. A non-empty result
    /// pre-seeds the option; anything else leaves it unset.
    pub fn build<F>(spec: &ArgSpec, lookup: F) -> DeclarationTable
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut positionals = Vec::new();
        let mut options = IndexMap::new();

        for token in spec.tokens() {
            match token {
                Token::Positional(name) => positionals.push(normalize_name(name)),
                Token::Flag(name) => {
                    options.insert(
                        normalize_name(name),
                        OptionSlot {
                            name: name.clone(),
                            kind: OptionKind::Flag,
                            value: Value::Bool(false),
                        },
                    );
                }
                Token::Keyword { name, .. } => {
                    let key = normalize_name(name);
                    let value = match lookup(&key) {
                        Some(existing) if !existing.is_empty() => {
                            tracing::debug!(option = %key, "pre-seeded from environment");
                            Value::Text(existing)
                        }
                        _ => Value::Unset,
                    };
                    options.insert(
                        key,
                        OptionSlot {
                            name: name.clone(),
                            kind: OptionKind::Keyword,
                            value,
                        },
                    );
                }
            }
        }

        DeclarationTable {
            positionals,
            options,
        }
    }

    /// Normalized positional names, in declaration order.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn option(&self, key: &str) -> Option<&OptionSlot> {
        self.options.get(key)
    }

    pub(crate) fn option_mut(&mut self, key: &str) -> Option<&mut OptionSlot> {
        self.options.get_mut(key)
    }

    pub(crate) fn into_options(self) -> IndexMap<String, OptionSlot> {
        self.options
    }
}
