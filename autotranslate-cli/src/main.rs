use std::{path::PathBuf, process};

use autotranslate_cli::{ConfigArgs, plan::run_plan_command, translate::run_translate_command};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate every missing string and metadata file.
    ///
    /// Interrupting the process stops it immediately, possibly between two files of one
    /// locale. Stopping cleanly between locales is only available to library callers
    /// through `autotranslate::CancelToken`.
    Translate {
        #[command(flatten)]
        options: ConfigArgs,

        /// Also write the per-locale report as JSON to this file
        #[arg(long)]
        report_json: Option<PathBuf>,
    },

    /// List the files a translation run would create or modify, without translating.
    Plan {
        #[command(flatten)]
        options: ConfigArgs,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.commands {
        Commands::Translate {
            options,
            report_json,
        } => run_translate_command(&options, report_json.as_deref()).and_then(|report| {
            if report.has_failures() {
                Err(format!("{} locale(s) failed", report.summary().failed))
            } else {
                Ok(())
            }
        }),
        Commands::Plan { options } => run_plan_command(&options),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
