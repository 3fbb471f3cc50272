use crate::infrastructure::container::ContainerError;
use crate::logger::LogLevel;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Logging error: {0}")]
    Log(#[from] LogError),
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
    /// 当前运行环境没有可用的内核或请求实现
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse JSON from file '{0}': {1}")]
    JsonParse(String, #[source] serde_json::Error),
    #[error("Configuration file '{0}' does not contain a JSON object")]
    NotAnObject(String),
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log level \"{0}\"")]
    InvalidLevel(String),
    /// 日志目标不处理该级别，分发器会忽略此错误
    #[error("Log level \"{0}\" is not supported by this logger")]
    UnsupportedLevel(LogLevel),
}

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Unsupported response type: {0}")]
    UnsupportedResponseType(String),
    #[error("Unsupported request type: {0}")]
    UnsupportedRequestType(String),
    #[error("Request handler failed: {0}")]
    Handler(String),
}

impl From<ConfigError> for ContainerError {
    fn from(err: ConfigError) -> Self {
        ContainerError::creation_failed("config", err)
    }
}

impl From<LogError> for ContainerError {
    fn from(err: LogError) -> Self {
        ContainerError::creation_failed("logger", err)
    }
}
