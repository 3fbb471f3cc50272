use chrono::Local;
use colored::Colorize;

use super::LogLevel;

/// 日志消息格式化器
pub trait Formatter: Send + Sync {
    fn format(&self, level: LogLevel, message: &str) -> String;
}

/// 终端输出：带颜色的箭头前缀
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter;

impl Formatter for ConsoleFormatter {
    fn format(&self, level: LogLevel, message: &str) -> String {
        let arrow = match level {
            LogLevel::Emergency | LogLevel::Alert | LogLevel::Critical | LogLevel::Error => "→".red(),
            LogLevel::Warning | LogLevel::Notice => "→".yellow(),
            LogLevel::Info | LogLevel::Debug => "→".blue(),
        };
        format!("{} {}\n", arrow, message)
    }
}

/// 单行文本：`[时间戳] LEVEL: message`
#[derive(Debug, Clone)]
pub struct LineFormatter {
    timestamp_format: String,
}

impl LineFormatter {
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new("%Y-%m-%d %H:%M:%S")
    }
}

impl Formatter for LineFormatter {
    fn format(&self, level: LogLevel, message: &str) -> String {
        format!(
            "[{}] {}: {}\n",
            Local::now().format(&self.timestamp_format),
            level.as_str().to_uppercase(),
            message
        )
    }
}
