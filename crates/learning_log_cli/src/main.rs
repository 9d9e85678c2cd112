//! Learning Log server entry point.
//!
//! # Responsibility
//! - Turn flags and `LEARNING_LOG_*` environment variables into config.
//! - Initialize logging and the database, then serve until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use learning_log_core::db::open_db;
use learning_log_core::{
    default_log_level, init_logging, parse_level, AccessPolicy, JournalConfig, LogOptions,
};
use learning_log_web::{router, AppState, WebConfig};
use log::{error, info};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Learning Log: a per-user journal of topics and dated entries.
#[derive(Parser, Debug)]
#[command(name = "learning-log", version, about, long_about = None)]
struct Args {
    /// SQLite database file; created and migrated on first start.
    #[arg(long, env = "LEARNING_LOG_DB", default_value = "learning_log.sqlite3")]
    db: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "LEARNING_LOG_LISTEN", default_value = "127.0.0.1:8000")]
    listen: SocketAddr,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, env = "LEARNING_LOG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files. Defaults to `./logs`.
    #[arg(long, env = "LEARNING_LOG_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Upper bound for topic labels, in characters.
    #[arg(
        long,
        env = "LEARNING_LOG_MAX_TOPIC_LABEL_CHARS",
        default_value_t = learning_log_core::DEFAULT_MAX_TOPIC_LABEL_CHARS
    )]
    max_topic_label_chars: usize,

    /// Only let a topic's owner delete its entries.
    #[arg(long, env = "LEARNING_LOG_ENFORCE_OWNER_ON_DELETE")]
    enforce_owner_on_delete: bool,

    /// Skip the owner re-check performed right before an entry insert.
    #[arg(long, env = "LEARNING_LOG_NO_ENTRY_WRITE_RECHECK")]
    no_entry_write_recheck: bool,

    /// Header carrying the authenticated username.
    #[arg(
        long,
        env = "LEARNING_LOG_IDENTITY_HEADER",
        default_value = learning_log_web::config::DEFAULT_IDENTITY_HEADER
    )]
    identity_header: String,

    /// Where unauthenticated requests are redirected.
    #[arg(
        long,
        env = "LEARNING_LOG_LOGIN_URL",
        default_value = learning_log_web::config::DEFAULT_LOGIN_URL
    )]
    login_url: String,
}

impl Args {
    fn journal_config(&self) -> JournalConfig {
        JournalConfig {
            max_topic_label_chars: self.max_topic_label_chars,
            access: AccessPolicy {
                recheck_owner_before_entry_write: !self.no_entry_write_recheck,
                enforce_owner_on_delete: self.enforce_owner_on_delete,
            },
        }
    }

    fn web_config(&self) -> WebConfig {
        WebConfig {
            identity_header: self.identity_header.clone(),
            login_url: self.login_url.clone(),
        }
    }

    /// Log files need an absolute directory.
    fn resolved_log_dir(&self) -> Result<PathBuf> {
        let dir = self.log_dir.clone().unwrap_or_else(|| PathBuf::from("logs"));
        if dir.is_absolute() {
            return Ok(dir);
        }
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        Ok(cwd.join(dir))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.as_deref() {
        Some(raw) => parse_level(raw)?,
        None => default_log_level(),
    };
    init_logging(&LogOptions {
        level,
        log_dir: args.resolved_log_dir()?,
        echo_to_stderr: true,
    })?;

    let journal = args.journal_config();
    journal.validate()?;
    let web = args.web_config();
    web.validate()?;

    let conn = open_db(&args.db)
        .with_context(|| format!("failed to open database `{}`", args.db.display()))?;
    let app = router(AppState::new(conn, journal.clone(), web));

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!(
        "event=server_start module=cli status=ok version={} listen={} max_topic_label_chars={} recheck_owner_before_entry_write={} enforce_owner_on_delete={}",
        learning_log_core::core_version(),
        args.listen,
        journal.max_topic_label_chars,
        journal.access.recheck_owner_before_entry_write,
        journal.access.enforce_owner_on_delete
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_stop module=cli status=error error={err}");
    }
}
