use log::LevelFilter;
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use thiserror::Error;

use crate::config::LogConfig;

const LOG_SIZE_LIMIT: u64 = 10 * 1024 * 1024; // 10 MB

const LOG_FILE_COUNT: u32 = 3;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid log archive pattern: {0}")]
    Archive(String),
    #[error("failed to open log file: {0}")]
    File(#[from] std::io::Error),
    #[error("invalid logger configuration: {0}")]
    Config(String),
    #[error("logger already installed: {0}")]
    Install(#[from] log::SetLoggerError),
}

/// Installs the global logger. Stderr always receives `Info` and above; when
/// a log file is configured it additionally receives `Debug` and above and is
/// rolled by size.
pub fn init_logger(log_config: &LogConfig) -> Result<(), LogError> {
    let stderr_level = LevelFilter::Info;
    let file_level = LevelFilter::Debug;

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(stderr_level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(file_path) = &log_config.file_path {
        let archive_pattern = log_config
            .archive_pattern
            .clone()
            .unwrap_or_else(|| format!("{}.{{}}.gz", file_path));

        let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
        let roller = FixedWindowRoller::builder()
            .build(&archive_pattern, LOG_FILE_COUNT)
            .map_err(|e| LogError::Archive(e.to_string()))?;
        let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

        let logfile = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(file_path, Box::new(policy))?;

        builder = builder.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(file_level)))
                .build("logfile", Box::new(logfile)),
        );
        root = root.appender("logfile");
    }

    let config = builder
        .build(root.build(LevelFilter::Debug))
        .map_err(|e| LogError::Config(e.to_string()))?;

    let _handle = log4rs::init_config(config)?;
    Ok(())
}
