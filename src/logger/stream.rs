use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::errors::LogError;

use super::{interpolate, Context, Formatter, Log, LogLevel};

/// 内存缓冲区，可在多个日志目标之间共享
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入的内容
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    fn append(&self, bytes: &[u8]) {
        self.inner.lock().extend_from_slice(bytes);
    }
}

/// 日志输出目标
#[derive(Debug, Clone, Default)]
pub enum Stream {
    #[default]
    Stdout,
    Stderr,
    /// 以追加方式写入的文件，不存在时创建
    File(PathBuf),
    Buffer(LogBuffer),
}

impl Stream {
    pub(crate) fn write(&self, message: &str) -> io::Result<()> {
        match self {
            Stream::Stdout => io::stdout().lock().write_all(message.as_bytes()),
            Stream::Stderr => io::stderr().lock().write_all(message.as_bytes()),
            Stream::File(path) => OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?
                .write_all(message.as_bytes()),
            Stream::Buffer(buffer) => {
                buffer.append(message.as_bytes());
                Ok(())
            }
        }
    }
}

/// `stdout`、`stderr`，其余任何值都视为文件路径
impl FromStr for Stream {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "stdout" => Stream::Stdout,
            "stderr" => Stream::Stderr,
            path => Stream::File(PathBuf::from(path)),
        })
    }
}

impl From<&str> for Stream {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(stream) => stream,
            Err(never) => match never {},
        }
    }
}

/// 把日志写入流的日志目标
///
/// 流不可写时静默丢弃消息。
#[derive(Default)]
pub struct StreamLogger {
    stream: RwLock<Stream>,
    formatter: RwLock<Option<Box<dyn Formatter>>>,
    levels: Option<Vec<LogLevel>>,
}

impl StreamLogger {
    pub fn new(stream: impl Into<Stream>) -> Self {
        Self {
            stream: RwLock::new(stream.into()),
            formatter: RwLock::new(None),
            levels: None,
        }
    }

    pub fn with_formatter(self, formatter: impl Formatter + 'static) -> Self {
        self.set_formatter(formatter);
        self
    }

    /// 只处理给定的级别，其他级别返回 [`LogError::UnsupportedLevel`]
    pub fn with_levels(mut self, levels: &[LogLevel]) -> Self {
        self.levels = Some(levels.to_vec());
        self
    }

    pub fn set_stream(&self, stream: impl Into<Stream>) {
        *self.stream.write() = stream.into();
    }

    pub fn stream(&self) -> Stream {
        self.stream.read().clone()
    }

    pub fn set_formatter(&self, formatter: impl Formatter + 'static) {
        *self.formatter.write() = Some(Box::new(formatter));
    }

    pub fn has_formatter(&self) -> bool {
        self.formatter.read().is_some()
    }

    pub fn supports(&self, level: LogLevel) -> bool {
        self.levels.as_ref().map_or(true, |levels| levels.contains(&level))
    }
}

impl fmt::Debug for StreamLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamLogger")
            .field("stream", &*self.stream.read())
            .field("has_formatter", &self.has_formatter())
            .field("levels", &self.levels)
            .finish()
    }
}

impl Log for StreamLogger {
    fn log(&self, level: LogLevel, message: &str, context: &Context) -> Result<(), LogError> {
        if !self.supports(level) {
            return Err(LogError::UnsupportedLevel(level));
        }

        let mut message = if context.is_empty() {
            message.to_string()
        } else {
            interpolate(message, context)
        };

        if let Some(formatter) = self.formatter.read().as_ref() {
            message = formatter.format(level, &message);
        }

        if let Err(e) = self.stream.read().write(&message) {
            tracing::trace!("日志流不可写，已丢弃消息: {}", e);
        }

        Ok(())
    }
}
