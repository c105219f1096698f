mod render;

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};
use upnext_core::Agenda;
use upnext_core::config::AgendaConfig;

#[derive(Parser)]
#[command(name = "upnext")]
#[command(about = "Render an upcoming-events agenda fed by a calendar fetcher")]
struct Cli {
    /// Path to the agenda configuration file
    #[arg(short, long, default_value = "upnext.toml")]
    config: PathBuf,

    /// Fetcher command to spawn; speaks JSON lines over stdin/stdout
    #[arg(short, long)]
    fetcher: Option<String>,

    /// Read notifications from stdin until EOF and print the agenda once
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AgendaConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration: {}", cli.config.display()))?;
    let mut agenda = Agenda::new(config)?;

    if cli.once {
        return run_once(&mut agenda).await;
    }
    match cli.fetcher {
        Some(fetcher) => run_with_fetcher(&mut agenda, &fetcher).await,
        None => anyhow::bail!(
            "No fetcher given.\n\n\
            Spawn a fetch collaborator with:\n  \
            upnext --fetcher <command>\n\n\
            Or pipe notifications in once:\n  \
            upnext --once < notifications.jsonl"
        ),
    }
}

/// Reads notifications from stdin until EOF, then prints the agenda.
async fn run_once(agenda: &mut Agenda) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        apply_line(agenda, &line);
    }
    println!("{}", render::render_agenda(agenda, &Utc::now()));
    Ok(())
}

/// Spawns the fetcher subprocess, registers the sources and re-renders
/// the agenda after every notification that changes it.
///
/// Registration is re-sent every `fetch_interval_ms` tick; the fetcher
/// treats repeated registration as the signal to poll again.
async fn run_with_fetcher(agenda: &mut Agenda, fetcher: &str) -> Result<()> {
    let mut child = Command::new(fetcher)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("Failed to spawn fetcher: {fetcher}"))?;

    let mut stdin = child
        .stdin
        .take()
        .context("Failed to get fetcher stdin handle")?;
    let stdout = child
        .stdout
        .take()
        .context("Failed to get fetcher stdout handle")?;
    let mut lines = BufReader::new(stdout).lines();

    let mut ticker =
        tokio::time::interval(Duration::from_millis(agenda.config().fetch_interval_ms.max(1)));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                register_sources(agenda, &mut stdin).await?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from fetcher")? else {
                    warn!("fetcher closed its output, exiting");
                    break;
                };
                if apply_line(agenda, &line) {
                    println!("{}", render::render_agenda(agenda, &Utc::now()));
                    if agenda.config().broadcast_events {
                        debug!(count = agenda.broadcast_list().len(), "broadcast list refreshed");
                    }
                }
            }
        }
    }

    let status = child.wait().await.context("Failed to wait for fetcher")?;
    if !status.success() {
        anyhow::bail!("Fetcher exited with status: {}", status.code().unwrap_or(-1));
    }
    Ok(())
}

/// Writes one `REGISTER_SOURCE` line per configured source.
async fn register_sources(
    agenda: &Agenda,
    stdin: &mut tokio::process::ChildStdin,
) -> Result<()> {
    for message in agenda.register_messages() {
        let json = message
            .to_wire_line()
            .context("Failed to serialize registration")?;
        stdin
            .write_all(json.as_bytes())
            .await
            .context("Failed to write to fetcher stdin")?;
        stdin
            .write_all(b"\n")
            .await
            .context("Failed to write to fetcher stdin")?;
    }
    stdin.flush().await.context("Failed to flush fetcher stdin")?;
    Ok(())
}

/// Parses one notification line and feeds it to the agenda. Returns
/// whether the display should refresh; malformed lines are logged and
/// dropped.
fn apply_line(agenda: &mut Agenda, line: &str) -> bool {
    if line.trim().is_empty() {
        return false;
    }
    match serde_json::from_str::<serde_json::Value>(line) {
        Ok(value) => agenda.apply_json(&value),
        Err(e) => {
            warn!(error = %e, "fetcher sent a line that is not JSON");
            false
        }
    }
}
