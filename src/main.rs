use clap::Parser;
use epgp_audit::error::AuditError;
use epgp_audit::orchestration::{discover, AuditSession, SessionError};
use epgp_audit::report::{ConsoleReport, JsonReport, Mode, ReportSink};
use epgp_audit::{AuditConfig, TrafficLog};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::BufReader;

#[derive(Parser)]
#[command(name = "epgp-audit")]
#[command(
    about = "Audit weekly EP/GP standings exports against the addon's traffic log",
    long_about = None
)]
struct Cli {
    /// What to print per reconciled week
    #[arg(long, value_enum, default_value = "analyze")]
    mode: Mode,

    /// Only audit players whose sanitized name starts with this prefix
    /// (case-sensitive)
    #[arg(long)]
    player: Option<String>,

    /// Directory containing the weekly standings exports
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Addon traffic log; enables transaction-level reconciliation
    #[arg(long)]
    traffic_log: Option<PathBuf>,

    /// JSON configuration file (documented defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Filename token that identifies standings exports
    #[arg(long, default_value = "CCEPGP")]
    marker: String,

    /// Emit one JSON line per reconciliation instead of text
    #[arg(long)]
    json: bool,

    /// Flat EP adjustment added to the weekly obtainable cap
    #[arg(long)]
    ep_modifier: Option<i64>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("epgp-audit failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AuditError> {
    let mut config = match &cli.config {
        Some(path) => AuditConfig::from_file(path)?,
        None => AuditConfig::default(),
    };
    if let Some(modifier) = cli.ep_modifier {
        config.ep_modifier = modifier;
    }

    let traffic = match &cli.traffic_log {
        Some(path) => {
            let file = File::open(path).await?;
            let log = TrafficLog::parse(BufReader::new(file)).await?;
            tracing::info!(
                players = log.player_count(),
                records = log.record_count(),
                skipped = log.skipped.len(),
                "parsed traffic log"
            );
            log
        }
        None => {
            tracing::info!("no traffic log supplied; transaction checks disabled");
            TrafficLog::default()
        }
    };

    let files = discover(&cli.dir, &cli.marker)?;
    if files.is_empty() {
        tracing::warn!(dir = %cli.dir.display(), marker = %cli.marker, "no standings files found");
        return Ok(());
    }

    let mut sink: Box<dyn ReportSink> = if cli.json {
        Box::new(JsonReport)
    } else {
        Box::new(ConsoleReport::new(cli.mode))
    };

    let mut session = AuditSession::new(config, traffic, cli.player.clone());
    for file in &files {
        if cli.json {
            tracing::info!(file = %file.path.display(), "processing standings file");
        } else {
            println!("\nProcessing File: {}\n", file.path.display());
        }

        let reader = match File::open(&file.path).await {
            Ok(f) => BufReader::new(f),
            Err(e) => {
                tracing::warn!(file = %file.path.display(), error = %e, "cannot open standings file, skipping");
                continue;
            }
        };

        match session.process_file(reader, file.date).await {
            Ok(recs) => {
                for rec in &recs {
                    sink.emit(rec);
                }
            }
            // A broken embedded override leaves the active configuration
            // indeterminate for everything after it; stop the run.
            Err(e @ SessionError::ConfigOverride(_)) => return Err(e.into()),
            Err(SessionError::Io(e)) => {
                tracing::warn!(file = %file.path.display(), error = %e, "standings file aborted mid-read");
            }
        }
    }

    Ok(())
}
