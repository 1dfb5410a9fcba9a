//! Help text for target scripts: leading docstring under a boxed heading.

use crate::spec::ArgSpec;
use std::path::Path;

/// Extract the leading comment block of a script.
///
/// A `#!` line is skipped. Collection stops at the first blank or
/// non-comment line. `#` and one following space are stripped from each line.
pub fn extract_docstring(source: &str) -> String {
    let mut lines = source.lines().peekable();
    if lines.peek().is_some_and(|line| line.starts_with("#!")) {
        lines.next();
    }

    let mut doc = String::new();
    for line in lines {
        let Some(text) = line.trim_start().strip_prefix('#') else {
            break;
        };
        if text.trim().is_empty() && doc.is_empty() {
            continue;
        }
        doc.push_str(text.strip_prefix(' ').unwrap_or(text).trim_end());
        doc.push('\n');
    }

    // Trailing empty comment lines don't belong to the text.
    let trimmed = doc.trim_end_matches('\n').len();
    doc.truncate(trimmed);
    if !doc.is_empty() {
        doc.push('\n');
    }
    doc
}

/// Base name of a script path, used as the program name.
pub fn script_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Frame a single line of text in a box.
pub fn boxed(text: &str) -> String {
    let width = text.chars().count() + 2;
    let bar = "─".repeat(width);
    format!("┌{bar}┐\n│ {text} │\n└{bar}┘\n")
}

/// Generate the full help text for a script.
pub fn generate_help(spec: &ArgSpec, program: &str, docstring: &str) -> String {
    let mut help = boxed(program);
    if !docstring.is_empty() {
        help.push_str(docstring);
        help.push('\n');
    }
    help.push_str(&spec.usage(Some(program)));
    help.push('\n');
    help
}

/// Read a script and generate its help text under `program`.
pub fn generate_script_help(
    spec: &ArgSpec,
    script: &Path,
    program: &str,
) -> std::io::Result<String> {
    let source = std::fs::read_to_string(script)?;
    let doc = extract_docstring(&source);
    Ok(generate_help(spec, program, &doc))
}
