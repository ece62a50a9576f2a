//! picovm command-line runner.
//!
//! Commands:
//! - `picovm run <program>` - Run a built-in program
//! - `picovm run --code 1,5,1,6,4,2,8` - Run an inline bytecode stream
//! - `picovm list` - List the built-in programs
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=picovm_vm=trace`) to see interpreter logs.

mod demos;
mod output;

use std::io;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context as _};
use clap::{Args, Parser, Subcommand, ValueEnum};
use picovm_vm::{interpret_with, step, Context, Observer, Outcome, Tracer};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::output::{format_ihalt, format_limit, format_state, TAG_OK};

#[derive(Parser)]
#[command(name = "picovm")]
#[command(about = "picovm bytecode interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a built-in program or an inline bytecode stream
    Run(RunArgs),

    /// List the built-in programs
    List,
}

#[derive(Args)]
struct RunArgs {
    /// Built-in program name (see `picovm list`)
    #[arg(conflicts_with = "code")]
    program: Option<String>,

    /// Comma-separated bytecode stream (e.g. 1,5,1,6,4,2,8)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    code: Option<Vec<i32>>,

    /// Print every executed instruction to stderr
    #[arg(long)]
    trace: bool,

    /// Give up after this many cycles (0 = no limit)
    #[arg(long, default_value_t = 0)]
    max_steps: u64,

    /// How to print the final state
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::List => cmd_list(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log filter comes from `RUST_LOG`; default is warnings only.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Run a program and print its final state.
///
/// # Output Tags (for script parsing)
/// * `[VM:OK]` - The program executed HALT
/// * `[VM:IHALT:reason]` - The program was malformed
/// * `[VM:LIMIT:steps]` - `--max-steps` ran out first
fn cmd_run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let program = match (args.code, args.program.as_deref()) {
        (Some(code), _) => code,
        (None, Some(name)) => demos::find(name)
            .ok_or_else(|| anyhow!("unknown program '{}' (see `picovm list`)", name))?
            .program
            .to_vec(),
        (None, None) => bail!("a program name or --code is required"),
    };
    debug!(len = program.len(), max_steps = args.max_steps, "program loaded");

    let mut ctx = Context::new(&program);
    let outcome = if args.trace {
        let mut tracer = Tracer::new(io::stderr().lock());
        let outcome = drive(&mut ctx, &mut tracer, args.max_steps);
        drop(tracer.finish().context("failed to write trace")?);
        outcome
    } else {
        drive(&mut ctx, &mut (), args.max_steps)
    };

    match args.format {
        Format::Text => println!("{}", format_state(&ctx)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&ctx.snapshot())?),
    }

    Ok(match outcome.as_ref().map(Outcome::reason) {
        Some(None) => {
            println!("{}", TAG_OK);
            ExitCode::SUCCESS
        }
        Some(Some(reason)) => {
            println!("{}", format_ihalt(reason));
            ExitCode::FAILURE
        }
        None => {
            println!("{}", format_limit(args.max_steps));
            ExitCode::FAILURE
        }
    })
}

/// Interpret to completion, or for at most `max_steps` cycles when non-zero.
/// `None` means the budget ran out first.
fn drive<O: Observer>(ctx: &mut Context<'_>, observer: &mut O, max_steps: u64) -> Option<Outcome> {
    if max_steps == 0 {
        return Some(interpret_with(ctx, observer));
    }
    for _ in 0..max_steps {
        if !step(ctx, observer) {
            break;
        }
    }
    ctx.outcome()
}

fn cmd_list() -> anyhow::Result<ExitCode> {
    for demo in demos::DEMOS {
        println!("{:<12} {}", demo.name, demo.about);
    }
    Ok(ExitCode::SUCCESS)
}
