use tracing_appender::{non_blocking::WorkerGuard, rolling::Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{CommonError, LoggingConfig};

const CRATES: &[&str] = &["beacon_client", "codec", "common", "types"];

/// Installs the global subscriber. The returned guard must be held for as long as logs should be
/// flushed.
pub fn init_tracing_log(config: &LoggingConfig) -> Result<WorkerGuard, CommonError> {
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_thread_ids(false)
        .with_target(true)
        .compact();

    let log_level = crates_level(std::env::var("RUST_LOG").ok().as_deref());

    match config {
        LoggingConfig::Console => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            let layer = tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(writer)
                .with_filter(get_crate_filter(log_level)?);

            tracing_subscriber::registry().with(layer).try_init()?;
            Ok(guard)
        }

        LoggingConfig::File { dir_path, file_name } => {
            let file_appender = tracing_appender::rolling::Builder::new()
                .filename_prefix(file_name)
                .max_log_files(14)
                .rotation(Rotation::DAILY)
                .build(dir_path)?;

            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(get_crate_filter(log_level)?);

            tracing_subscriber::registry().with(layer).try_init()?;
            Ok(guard)
        }
    }
}

/// Level for the workspace crates. An unset or unparseable `RUST_LOG` falls back to info.
fn crates_level(rust_log: Option<&str>) -> tracing::Level {
    rust_log.and_then(|level| level.parse().ok()).unwrap_or(tracing::Level::INFO)
}

fn get_crate_filter(crates_level: tracing::Level) -> Result<EnvFilter, CommonError> {
    let mut env_filter = EnvFilter::new("info");

    for crate_name in CRATES {
        env_filter = env_filter.add_directive(format!("pon_{crate_name}={crates_level}").parse()?);
    }

    Ok(env_filter)
}
