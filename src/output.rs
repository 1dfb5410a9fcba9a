//! Temporary file generation with shell assignments and special outputs.

use crate::bindings::{Bindings, Value};
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// How parsed bindings are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `name='value'` lines to be sourced by a shell
    #[default]
    Shell,
    /// A JSON object of name to string, bool or null
    Json,
}

/// Quote a string for a POSIX shell.
///
/// Single quotes make everything literal; an embedded `'` closes the quote,
/// emits an escaped quote and reopens.
fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// Render bindings in the requested format.
pub fn render_bindings(bindings: &Bindings, prefix: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Shell => Ok(generate_output_string(bindings, prefix)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(bindings)? + "\n"),
    }
}

/// Generate the shell assignments as a string.
///
/// Binding keys are already valid variable names. An unset option keeps a
/// non-empty value the sourcing shell already holds; shell-local variables
/// pre-seed options but never reach this process's environment.
pub fn generate_output_string(bindings: &Bindings, prefix: &str) -> String {
    let mut output = String::new();

    for (name, value) in bindings.iter() {
        let var_name = format!("{}{}", prefix, name);
        match value {
            Value::Text(text) => {
                output.push_str(&format!("{}={}\n", var_name, shell_quote(text)));
            }
            Value::Bool(flag) => {
                output.push_str(&format!("{}={}\n", var_name, flag));
            }
            Value::Unset => {
                output.push_str(&format!(
                    "[ -n \"${{{var}-}}\" ] || unset {var}\n",
                    var = var_name
                ));
            }
        }
    }

    output
}

/// Generate a temporary file with the rendered bindings.
///
/// Returns the path to the temporary file. The file persists
/// until it's manually deleted.
pub fn generate_output(bindings: &Bindings, prefix: &str) -> Result<PathBuf> {
    let content = generate_output_string(bindings, prefix);
    write_temp_file(&content)
}

/// Generate an error output file.
///
/// When sourced, the file will print the error message to stderr and exit 1.
pub fn generate_error_output(program: &str, message: &str) -> Result<PathBuf> {
    let content = generate_error_string(program, message);
    write_temp_file(&content)
}

/// Generate an error output as a string.
pub fn generate_error_string(program: &str, message: &str) -> String {
    let text = format!("{}: {}", program, message);
    format!("printf '%s\\n' {} >&2\nexit 1\n", shell_quote(&text))
}

/// Generate a help output file.
///
/// When sourced, the file will print the help text and exit 1, since
/// help ends the script without doing its work.
pub fn generate_help_output(help_text: &str) -> Result<PathBuf> {
    let content = generate_help_output_string(help_text);
    write_temp_file(&content)
}

/// Generate a help output as a string.
///
/// The text is quoted as a single word, so nothing in a docstring can end
/// the literal early.
pub fn generate_help_output_string(help_text: &str) -> String {
    format!("printf '%s' {}\nexit 1\n", shell_quote(help_text))
}

/// Write content to a temporary file and return its path.
fn write_temp_file(content: &str) -> Result<PathBuf> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    let path = file.into_temp_path().keep()?;
    tracing::debug!(path = %path.display(), "wrote output file");
    Ok(path)
}
