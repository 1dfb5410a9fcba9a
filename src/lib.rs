//! shargs - declaration-string argument parsing for shell scripts.
//!
//! A script declares its interface as a single string, e.g.
//! `"infile [--outfile=<path>] [--force]"`. This library parses the
//! declaration, matches an invocation against it and returns typed
//! bindings. Help requests and usage errors come back as values; deciding
//! to exit is left to the caller.

pub mod bindings;
pub mod help;
pub mod output;
pub mod parser;
pub mod spec;
pub mod table;

pub use bindings::{Bindings, Value};
pub use help::{extract_docstring, generate_help, generate_script_help};
pub use output::{generate_output, render_bindings, OutputFormat};
pub use parser::{parse_args, parse_args_with, ParseError, ParseOutcome};
pub use spec::{ArgSpec, SpecError, Token};
