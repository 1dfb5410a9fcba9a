//! shargs - declaration-string argument parsing for shell scripts.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shargs::help::script_name;
use shargs::output::{generate_error_output, generate_help_output};
use shargs::spec::validate_prefix;
use shargs::{
    generate_help, generate_output, generate_script_help, parse_args, render_bindings, ArgSpec,
    OutputFormat, ParseOutcome, SpecError,
};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Declaration-string argument parsing for shell scripts.
#[derive(Parser, Debug)]
#[command(name = "shargs", version, about, disable_help_subcommand = true)]
struct Cli {
    /// 0: errors only, 1: warnings, 2: messages, 3: everything with source locations
    #[arg(long, global = true, env = "SHARGS_VERBOSITY", default_value_t = 0)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

/// The script being described.
#[derive(Args, Debug)]
struct Target {
    /// Argument declaration, e.g. "infile [--outfile=<path>] [--force]"
    #[arg(long)]
    spec: String,

    /// Path of the calling script (its leading comment block is the help text)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Program name for messages (defaults to the script's base name)
    #[arg(long)]
    name: Option<String>,
}

impl Target {
    fn program(&self) -> String {
        match (&self.name, &self.script) {
            (Some(name), _) => name.clone(),
            (None, Some(script)) => script_name(script),
            (None, None) => "script".to_string(),
        }
    }

    fn help(&self, spec: &ArgSpec) -> Result<String> {
        match &self.script {
            Some(script) => generate_script_help(spec, script, &self.program())
                .with_context(|| format!("failed to read script {}", script.display())),
            None => Ok(generate_help(spec, &self.program(), "")),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse script arguments and output a file of assignments to source
    Parse {
        #[command(flatten)]
        target: Target,

        /// Variable name prefix
        #[arg(long, default_value = "", value_parser = parse_prefix)]
        prefix: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Shell)]
        format: OutputFormat,

        /// Arguments to parse for the target script
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print help text for the target script
    Help {
        #[command(flatten)]
        target: Target,
    },

    /// Print the usage line for the target script
    Usage {
        #[command(flatten)]
        target: Target,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Parse {
            target,
            prefix,
            format,
            args,
        } => match format {
            OutputFormat::Shell => {
                let path = parse_to_file(&target, &prefix, &args)?;
                println!("{}", path.display());
            }
            OutputFormat::Json => parse_to_stdout(&target, &args)?,
        },
        Commands::Help { target } => {
            let spec = ArgSpec::parse(&target.spec).context("invalid argument declaration")?;
            print!("{}", target.help(&spec)?);
        }
        Commands::Usage { target } => {
            let spec = ArgSpec::parse(&target.spec).context("invalid argument declaration")?;
            println!("{}", spec.usage(Some(&target.program())));
        }
    }

    Ok(())
}

/// Parse into a sourceable file. Usage errors and help become files that
/// print and exit, so the calling script can always source the result.
fn parse_to_file(target: &Target, prefix: &str, args: &[String]) -> Result<PathBuf> {
    let program = target.program();
    let spec = match ArgSpec::parse(&target.spec) {
        Ok(spec) => spec,
        Err(err) => {
            tracing::error!(%err, "invalid argument declaration");
            return generate_error_output(&program, &format!("invalid argument declaration: {err}"));
        }
    };

    match parse_args(&spec, args) {
        Ok(ParseOutcome::Success(bindings)) => {
            tracing::info!(count = bindings.len(), "parsed arguments");
            generate_output(&bindings, prefix)
                .context("failed to generate output file")
        }
        Ok(ParseOutcome::Help) => generate_help_output(&target.help(&spec)?),
        Err(err) => {
            tracing::warn!(%err, "usage error");
            generate_error_output(&program, &err.to_string())
        }
    }
}

/// Parse and print JSON. Help and usage errors exit non-zero here, at the
/// entry point.
fn parse_to_stdout(target: &Target, args: &[String]) -> Result<()> {
    let spec = ArgSpec::parse(&target.spec).context("invalid argument declaration")?;

    match parse_args(&spec, args) {
        Ok(ParseOutcome::Success(bindings)) => {
            print!("{}", render_bindings(&bindings, "", OutputFormat::Json)?);
            Ok(())
        }
        Ok(ParseOutcome::Help) => {
            print!("{}", target.help(&spec)?);
            std::io::stdout().flush()?;
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{}: {}", target.program(), err);
            std::process::exit(1);
        }
    }
}

fn parse_prefix(prefix: &str) -> Result<String, SpecError> {
    validate_prefix(prefix).map(|()| prefix.to_string())
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("SHARGS_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if verbosity >= 3 {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.compact().init();
    }
}
