//! Console and optional rolling-file log setup.

use crate::cli::FILE_GUARD;
use std::path::Path;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// Filter precedence: `RUST_LOG`, then `--log-level`, then `[logging] level`,
/// then `info`. Console output goes to stderr so stdout only carries results.
pub fn init(json: bool, cli_level: Option<&str>, cfg: &tracker_config::Logging) -> eyre::Result<()> {
    let level = cli_level
        .or(cfg.level.as_deref())
        .unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match cfg.file.as_deref() {
        Some(path) => {
            let writer = file_writer(Path::new(path), cfg.rotation.as_deref())?;
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    let base = tracing_subscriber::registry().with(filter).with(file_layer);
    let res = if json {
        base.with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        base.with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    res.map_err(|e| eyre::eyre!("install log subscriber: {e}"))
}

fn file_writer(
    path: &Path,
    rotation: Option<&str>,
) -> eyre::Result<tracing_appender::non_blocking::NonBlocking> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let Some(name) = path.file_name() else {
        eyre::bail!("logging.file {:?} has no file name", path);
    };
    std::fs::create_dir_all(dir).map_err(|e| eyre::eyre!("create log dir {:?}: {}", dir, e))?;

    let appender = match rotation.unwrap_or("never") {
        "daily" => tracing_appender::rolling::daily(dir, name),
        "hourly" => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // First init wins; the guard must outlive main
    let _ = FILE_GUARD.set(guard);
    Ok(writer)
}
