//! tracing subscriber setup: console layer plus optional JSON file layer.

use eyre::WrapErr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. The returned guard flushes the file
/// writer on drop and must outlive all logging.
///
/// Console level comes from `RUST_LOG` when set, else `console_level`. The
/// file layer (if any) always writes JSON lines at `[logging].level` or `info`.
pub fn init(
    json: bool,
    console_level: &str,
    file: Option<&Path>,
    cfg: &shot_config::Logging,
) -> eyre::Result<Option<WorkerGuard>> {
    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(console_level)
            .wrap_err_with(|| format!("invalid log level '{console_level}'"))?,
    };
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_path = file
        .map(Path::to_path_buf)
        .or_else(|| cfg.file.as_deref().map(Into::into));
    let mut guard = None;
    let file_layer = match file_path {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("log file path {} has no file name", path.display()))?
                .to_owned();
            let appender = match cfg.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(&dir, &name),
                Some("hourly") => tracing_appender::rolling::hourly(&dir, &name),
                _ => tracing_appender::rolling::never(&dir, &name),
            };
            let (writer, worker) = tracing_appender::non_blocking(appender);
            guard = Some(worker);
            let level = cfg.level.as_deref().unwrap_or("info");
            let file_filter = EnvFilter::try_new(level)
                .wrap_err_with(|| format!("invalid logging.level '{level}'"))?;
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(file_filter),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console.with_filter(console_filter))
        .with(file_layer)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(guard)
}
