use crate::errors::LogError;

use super::{interpolate, Context, Log, LogLevel};

/// 把日志记录转发为 `tracing` 事件
///
/// emergency/alert/critical 映射为 `ERROR`，notice 映射为 `INFO`。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Log for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, context: &Context) -> Result<(), LogError> {
        let message = if context.is_empty() {
            message.to_string()
        } else {
            interpolate(message, context)
        };

        match level {
            LogLevel::Emergency | LogLevel::Alert | LogLevel::Critical | LogLevel::Error => {
                tracing::error!(log_level = %level, "{}", message)
            }
            LogLevel::Warning => tracing::warn!(log_level = %level, "{}", message),
            LogLevel::Notice | LogLevel::Info => tracing::info!(log_level = %level, "{}", message),
            LogLevel::Debug => tracing::debug!(log_level = %level, "{}", message),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_logger_accepts_every_level() {
        let logger = TracingLogger;
        for level in LogLevel::ALL {
            assert!(logger.log(level, "message {n}", &Context::new()).is_ok());
        }
    }
}
