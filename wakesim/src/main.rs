// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

mod script;
mod simulation;

use crate::{script::parse_script, simulation::Simulation};
use clap::{Parser, ValueEnum};
use eyre::{Report, eyre};
use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use std::{
    fs::{File, read_to_string},
    io::BufReader,
    path::PathBuf,
    sync::LazyLock,
};
use wakelock::{Config, LockStatus, ReacquirePolicy};

fn main() -> Result<(), Report> {
    pretty_env_logger::init();

    match Args::parse() {
        Args::Run {
            path,
            no_native,
            no_fallback,
            policy,
            config,
            json,
        } => {
            let mut config: Config = if let Some(config) = config {
                info!("Loading configuration from {}", config.display());
                serde_json::from_reader(BufReader::new(File::open(config)?))?
            } else {
                Config::default()
            };
            if let Some(policy) = policy {
                config.reacquire = policy.into();
            }

            let script = read_to_string(&path)?;
            let events = parse_script(&script)
                .map_err(|(line, e)| eyre!("{}:{line}: {e}", path.display()))?;

            let mut simulation = Simulation::new(config, !no_native, !no_fallback);
            for (line, event) in events {
                info!("{}:{line}: {event:?}", path.display());
                let changes = simulation.apply(&event);
                if changes.is_empty() {
                    debug!("Status unchanged.");
                }
                for status in &changes {
                    if json {
                        println!(
                            "{}",
                            serde_json::to_string(&Record {
                                line,
                                event: format!("{event:?}"),
                                status,
                            })?
                        );
                    } else {
                        print_status(line, status);
                    }
                }
            }
        }
    }

    Ok(())
}

#[derive(Clone, Debug, Parser)]
enum Args {
    /// Replay the events in the given script file, printing every status change.
    Run {
        path: PathBuf,
        /// Pretend the platform has no native wake lock.
        #[arg(long)]
        no_native: bool,
        /// Pretend the fallback video can't be played.
        #[arg(long)]
        no_fallback: bool,
        #[arg(long)]
        policy: Option<Policy>,
        /// JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print one JSON object per status change.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    WhileActive,
    RememberIntent,
}

impl From<Policy> for ReacquirePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::WhileActive => Self::WhileActive,
            Policy::RememberIntent => Self::RememberIntent,
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    line: usize,
    event: String,
    #[serde(flatten)]
    status: &'a LockStatus,
}

fn print_status(line: usize, status: &LockStatus) {
    let pending = if status.pending { " (pending)" } else { "" };
    println!(
        "{line:>4}: {:?}{pending}: {}",
        status.backend,
        strip_markup(&status.message)
    );
}

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").unwrap());

/// Replaces tags with spaces and collapses whitespace.
///
/// A `<` which doesn't start a tag is kept.
fn strip_markup(message: &str) -> String {
    TAG.replace_all(message, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_activated_markup() {
        assert_eq!(
            strip_markup("Wake Lock Activated: <br><br>Your device will <em>remain</em> awake."),
            "Wake Lock Activated: Your device will remain awake."
        );
    }

    #[test]
    fn strip_keeps_stray_brackets() {
        assert_eq!(strip_markup("Keep x < 3 and y > 2."), "Keep x < 3 and y > 2.");
        assert_eq!(strip_markup("a <3 b<br/>c"), "a <3 b c");
    }
}
