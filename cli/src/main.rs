//! Line-oriented front end: each stdin line is one chat message, optionally prefixed with
//! `nick:` to speak as someone other than `--user`.

use anyhow::{Context, Result, bail};
use clap::Parser;
use commands::{Command, Dispatcher};
use dungeonbot_core::types::AppConfig;
use dungeonbot_core::{CampaignStore, PasteCache, TcpPasteService};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "dungeonbot", version, about = "Shared campaign notebooks")]
struct Args {
    /// Path to dungeonbot.toml
    #[arg(short, long, default_value = "dungeonbot.toml")]
    config: PathBuf,

    /// Nick used for messages without a `nick:` prefix
    #[arg(short, long, default_value = "dungeonbot")]
    user: String,
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// Splits `nick: message`; falls back to `default_nick` when there is no prefix.
fn split_sender<'a>(line: &'a str, default_nick: &'a str) -> (&'a str, &'a str) {
    match line.split_once(':') {
        Some((nick, message))
            if !nick.is_empty() && !nick.contains(char::is_whitespace) && !nick.starts_with('!') =>
        {
            (nick, message.trim_start())
        }
        _ => (default_nick, line),
    }
}

/// Writes one command's replies as a contiguous block.
fn write_replies(out: &mut impl Write, replies: &[String]) -> io::Result<()> {
    for reply in replies {
        writeln!(out, "{reply}")?;
    }
    out.flush()
}

fn join_worker(worker: JoinHandle<()>) {
    if let Err(panic) = worker.join() {
        let reason = panic
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("unknown panic");
        error!(reason, "command worker panicked");
    }
}

/// Joins workers that have already finished and keeps the rest.
fn reap_finished(workers: &mut Vec<JoinHandle<()>>) {
    let (finished, running): (Vec<_>, Vec<_>) =
        workers.drain(..).partition(|worker| worker.is_finished());
    *workers = running;
    finished.into_iter().for_each(join_worker);
}

fn main() -> Result<()> {
    setup_logging();
    let args = Args::parse();

    let config = AppConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let problems = config.validate();
    if !problems.is_empty() {
        bail!("invalid configuration: {}", problems.join("; "));
    }

    let store = Arc::new(CampaignStore::open(config.core_config())?);
    let cache = Arc::new(PasteCache::new(TcpPasteService::new(
        config.paste.address.clone(),
    )));
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), cache));
    info!(data_dir = %config.storage.data_dir.display(), paste = %config.paste.address, "dungeonbot ready");

    let mut workers = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        reap_finished(&mut workers);
        let (nick, message) = split_sender(&line, &args.user);

        match Command::parse(message) {
            Ok(None) => {}
            Err(usage) => println!("{usage}"),
            Ok(Some(command)) => {
                let dispatcher = Arc::clone(&dispatcher);
                let nick = nick.to_string();
                workers.push(thread::spawn(move || {
                    let replies = dispatcher.handle(&nick, command);
                    if let Err(err) = write_replies(&mut io::stdout().lock(), &replies) {
                        error!(%err, "writing replies failed");
                    }
                }));
            }
        }
    }

    workers.into_iter().for_each(join_worker);
    store.close();
    info!("dungeonbot stopped");
    Ok(())
}
