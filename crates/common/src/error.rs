#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid log directive: {0}")]
    LogDirective(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to create log appender: {0}")]
    LogAppender(#[from] tracing_appender::rolling::InitError),

    #[error("failed to install tracing subscriber: {0}")]
    TracingInit(#[from] tracing_subscriber::util::TryInitError),
}
