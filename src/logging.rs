//! Logging setup.
//!
//! Under systemd on Linux, events go to the journal. Otherwise they are
//! printed to stderr and, when a log directory is configured, also written to
//! a daily rolling file.
//!
//! Log level is controlled via the `SIDETAG_LOG` environment variable
//! (`debug`, `info`, `warn`, `error`, or any `EnvFilter` directive). The
//! default is `info`.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(log_dir: Option<PathBuf>) -> Result<()> {
    let env_filter = EnvFilter::try_from_env("SIDETAG_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    #[cfg(target_os = "linux")]
    {
        // systemd sets JOURNAL_STREAM for services whose output goes to the journal
        if std::env::var_os("JOURNAL_STREAM").is_some() {
            if let Ok(journald_layer) = tracing_journald::layer() {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(journald_layer)
                    .init();

                tracing::info!("Logging initialized with journald backend");
                return Ok(());
            }
        }
    }

    let file_layer = match log_dir {
        Some(ref dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "sidetag.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard flushes on drop, so it has to outlive the subscriber
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    match log_dir {
        Some(dir) => tracing::info!("Logging initialized, also writing to {:?}", dir),
        None => tracing::debug!("Logging initialized on stderr"),
    }
    Ok(())
}
