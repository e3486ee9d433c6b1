// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Escalier command-line interface.
//!
//! This is the main entry point for the `escalier` command.

use clap::{ArgAction, Args, Parser, Subcommand};
use miette::Result;

mod commands;
mod config;
mod diagnostic;

use config::ParseMode;

/// Escalier: a TypeScript-like language that compiles to JavaScript
#[derive(Debug, Parser)]
#[command(name = "escalier")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); `RUST_LOG` overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one file and print its syntax tree
    Parse {
        /// Source file to parse
        #[arg(required_unless_present = "type_ann")]
        path: Option<String>,

        /// Parse this type annotation text instead of a file
        #[arg(long, value_name = "TEXT", conflicts_with = "path")]
        type_ann: Option<String>,

        #[command(flatten)]
        parser: ParserArgs,
    },

    /// Parse source files and report diagnostics only
    Check {
        /// Source file or directory to check
        #[arg(default_value = ".")]
        path: String,

        #[command(flatten)]
        parser: ParserArgs,
    },
}

/// Flags shared by every parsing command.
#[derive(Debug, Args)]
struct ParserArgs {
    /// Deadline for each parse in milliseconds (default: `ESCALIER_PARSE_TIMEOUT_MS`,
    /// then escalier.toml, then 1000)
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Parse as a module: top level must be declarations
    #[arg(long, conflicts_with = "script")]
    module: bool,

    /// Parse as a script: any statements at top level
    #[arg(long)]
    script: bool,
}

impl ParserArgs {
    fn mode(&self) -> Option<ParseMode> {
        if self.module {
            Some(ParseMode::Module)
        } else if self.script {
            Some(ParseMode::Script)
        } else {
            None
        }
    }
}

/// Initialize logging to stderr.
fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default_directive = match verbose {
        0 => "warn",
        1 => "escalier_core=debug,escalier=debug",
        _ => "escalier_core=trace,escalier=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Parse {
            path,
            type_ann,
            parser,
        } => commands::parse::run(&commands::parse::ParseOptions {
            path: path.as_deref(),
            type_ann: type_ann.as_deref(),
            timeout_ms: parser.timeout_ms,
            mode: parser.mode(),
        }),
        Command::Check { path, parser } => {
            commands::check::run(path, parser.timeout_ms, parser.mode())
        }
    };

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}
