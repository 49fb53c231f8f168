use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use timekeep::format::pretty_print_with;
use timekeep::{DurationFormatter, TimerConfig, TimerEntry, TimerStore, UnitNames};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "timekeep", about = "Named timers, duration text and timer dump tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a number of seconds as duration text.
    Human {
        /// Elapsed seconds (fractions round up to the next second).
        seconds: f64,
        /// Keep only the most significant units.
        #[arg(long)]
        limit: Option<usize>,
        /// Locale of the unit nouns (ro, en).
        #[arg(long, default_value = "ro")]
        locale: String,
    },
    /// Re-indent compact object text, e.g. a timer dump.
    Pretty {
        /// Input file (stdin when omitted).
        file: Option<PathBuf>,
        /// Indent unit (default: tab).
        #[arg(long, default_value = "\t")]
        indent: String,
    },
    /// Time a child process and append the report to the daily log.
    Run {
        /// Timer name.
        #[arg(long, default_value = "command")]
        name: String,
        /// Directory for timer-<date>.log (default: TIMEKEEP_LOG_DIR or ./logs).
        #[arg(long)]
        log_dir: Option<PathBuf>,
        /// Also append the indented dump.
        #[arg(long)]
        dump: bool,
        /// Command and arguments to run.
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Human {
            seconds,
            limit,
            locale,
        } => run_human(seconds, limit, &locale)?,
        Commands::Pretty { file, indent } => run_pretty(file, &indent)?,
        Commands::Run {
            name,
            log_dir,
            dump,
            command,
        } => {
            let code = run_command(&name, log_dir, dump, &command)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}

fn run_human(seconds: f64, limit: Option<usize>, locale: &str) -> Result<()> {
    let units = UnitNames::for_locale(locale)
        .with_context(|| format!("unsupported locale '{}'", locale))?;
    let formatter = DurationFormatter::new(units);
    println!("{}", formatter.seconds_to_human(seconds, limit));
    Ok(())
}

fn run_pretty(file: Option<PathBuf>, indent: &str) -> Result<()> {
    let compact = match file {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    println!("{}", pretty_print_with(compact.trim_end(), indent));
    Ok(())
}

fn run_command(
    name: &str,
    log_dir: Option<PathBuf>,
    dump: bool,
    command: &[String],
) -> Result<i32> {
    let Some((program, args)) = command.split_first() else {
        bail!("no command given");
    };

    let mut config = TimerConfig::from_env();
    if let Some(dir) = log_dir {
        config.log_dir = dir;
    }
    let log_dir = config.log_dir.clone();

    // the command line asked for timing, so ignore the environment switch
    let mut timers = TimerStore::builder(config).switch(true).build();

    timers.start(name, Some(&command.join(" ")));
    let mut child = Command::new(program)
        .args(args)
        .spawn()
        .with_context(|| format!("failed to spawn '{}'", program))?;
    timers.checkpoint(name, Some("spawned"));

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for '{}'", program))?;
    timers.checkpoint(name, Some("exited"));

    if let Some(entry) = timers.stop(name) {
        print_summary(name, &entry);
    }

    if dump {
        timers.dump(true).context("failed to append timer dump")?;
    }
    timers.log().context("failed to append timer report")?;
    tracing::info!(dir = %log_dir.display(), "timer report written");

    Ok(status.code().unwrap_or(1))
}

fn print_summary(name: &str, entry: &TimerEntry) {
    eprintln!(
        "{}: took {} ({:.3}s), memory usage: {}",
        name,
        entry.time.human.as_deref().unwrap_or_default(),
        entry.time.diff.unwrap_or_default(),
        entry.memory.human.as_deref().unwrap_or_default(),
    );
    for checkpoint in &entry.checkpoints {
        eprintln!(
            "  {}: +{:.3}s ({:.3}s since start)",
            checkpoint.description.as_deref().unwrap_or_default(),
            checkpoint.reported_time_diff(),
            checkpoint.time.diff_from_start,
        );
    }
}
