//! 服务提供者实现
//!
//! 为各种服务提供具体的注册逻辑

use std::any::type_name;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value as Json;

use super::container::{ClassDefinition, Container, ContainerError, Factory, Identifier, Injectable, Parameter};
use crate::config::{load_config, Config, Settings};
use crate::errors::LogError;
use crate::kernel::{CliKernel, CliRequest};
use crate::logger::{ConsoleFormatter, LineFormatter, Logger, SharedLog, StreamLogger, TracingLogger};

/// 写入流的日志目标
pub const STREAM_LOGGER: &str = "logger.stream";
/// 转发到 tracing 的日志目标
pub const TRACING_LOGGER: &str = "logger.tracing";

/// 服务提供者：向容器注册一组绑定和类定义
pub trait ServiceProvider {
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    fn register(&self, container: &Container) -> Result<(), ContainerError>;
}

impl<F> ServiceProvider for F
where
    F: Fn(&Container) -> Result<(), ContainerError>,
{
    fn register(&self, container: &Container) -> Result<(), ContainerError> {
        self(container)
    }
}

impl Injectable for Config {
    fn definition() -> ClassDefinition {
        ClassDefinition::without_constructor::<Config>(Identifier::of::<Config>())
    }
}

/// 配置提供者
///
/// 共享的 [`Config`]（别名 `config`），并载入应用目录下的配置文件。
pub struct ConfigProvider {
    directory: PathBuf,
}

impl ConfigProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl ServiceProvider for ConfigProvider {
    fn register(&self, container: &Container) -> Result<(), ContainerError> {
        container.register::<Config>();
        container.bind(Identifier::of::<Config>(), None, true);
        container.alias(Identifier::of::<Config>(), "config")?;

        if let Some(settings) = load_config(&self.directory) {
            let config = container.make::<Config>("config", &[])?;
            config.set(settings);
        }

        Ok(())
    }
}

/// 日志提供者
///
/// 内置日志目标 `logger.stream` 与 `logger.tracing`，
/// 共享的 [`Logger`]（别名 `logger`）按 `log.loggers` 配置装配：
/// 键为日志目标标识符，值为级别名称列表或 `null`（全部级别）。
pub struct LoggerProvider;

impl LoggerProvider {
    fn stream_logger() -> ClassDefinition {
        ClassDefinition::new(STREAM_LOGGER, |args| {
            let stream = args.get::<String>(0)?;
            let formatter = args.get::<String>(1)?;

            let logger = StreamLogger::new(stream.as_str());
            match formatter.as_str() {
                "console" => logger.set_formatter(ConsoleFormatter),
                "line" => logger.set_formatter(LineFormatter::default()),
                "none" => {}
                other => {
                    return Err(ContainerError::creation_failed(
                        STREAM_LOGGER,
                        format!("unknown formatter \"{}\"", other),
                    ))
                }
            }

            Ok(Arc::new(logger) as SharedLog)
        })
        .parameter(Parameter::builtin("stream", "String").with_default("stdout"))
        .parameter(Parameter::builtin("formatter", "String").with_default("console"))
    }

    fn tracing_logger() -> ClassDefinition {
        ClassDefinition::new(TRACING_LOGGER, |_| Ok(Arc::new(TracingLogger) as SharedLog))
    }

    fn build_logger(container: &Container) -> Result<Logger, ContainerError> {
        let logger = Logger::new();
        let config = container.make::<Config>("config", &[])?;

        let loggers = match config.get("log.loggers") {
            Some(Json::Object(loggers)) => loggers,
            Some(_) => {
                return Err(ContainerError::creation_failed(
                    "logger",
                    "log.loggers must be an object",
                ))
            }
            None => return Ok(logger),
        };

        for (identifier, levels) in loggers {
            let destination = container.make::<SharedLog>(identifier.as_str(), &[])?;
            let destination = SharedLog::clone(&destination);

            match levels {
                Json::Null => logger.add_logger(destination, None),
                Json::Array(names) => {
                    let names = names
                        .iter()
                        .map(|name| name.as_str().ok_or_else(|| LogError::InvalidLevel(name.to_string())))
                        .collect::<Result<Vec<_>, _>>()?;
                    logger.add_logger_for(destination, &names)?;
                }
                other => return Err(LogError::InvalidLevel(other.to_string()).into()),
            }

            tracing::debug!(destination = %identifier, "log destination registered");
        }

        Ok(logger)
    }
}

impl ServiceProvider for LoggerProvider {
    fn register(&self, container: &Container) -> Result<(), ContainerError> {
        container.define(Self::stream_logger());
        container.define(Self::tracing_logger());

        container.bind(Identifier::of::<Logger>(), Some(Factory::new(|container, _| Self::build_logger(container))), true);
        container.alias(Identifier::of::<Logger>(), "logger")?;

        Ok(())
    }
}

/// 内置内核提供者：命令行内核与请求
pub struct KernelProvider;

impl ServiceProvider for KernelProvider {
    fn register(&self, container: &Container) -> Result<(), ContainerError> {
        container.define(CliKernel::definition());
        container.define(CliRequest::definition());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogLevel;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn config_container(settings: Json) -> Container {
        let container = Container::new();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), settings.to_string()).unwrap();
        ConfigProvider::new(dir.path()).register(&container).unwrap();
        LoggerProvider.register(&container).unwrap();
        container
    }

    #[test]
    fn test_config_provider_loads_file() {
        let container = config_container(json!({ "app": { "name": "solid" } }));

        let config = container.make::<Config>("config", &[]).unwrap();
        assert_eq!(config.get("app.name"), Some(json!("solid")));
        assert!(container.is_shared("config"));

        let again = container.make::<Config>(Identifier::of::<Config>(), &[]).unwrap();
        assert!(Arc::ptr_eq(&config, &again));
    }

    #[test]
    fn test_logger_from_configuration() {
        let container = config_container(json!({
            "log": { "loggers": { "logger.tracing": ["error", "debug"], "logger.stream": null } }
        }));

        let logger = container.make::<Logger>("logger", &[]).unwrap();
        assert_eq!(logger.destination_count(LogLevel::Error), 2);
        assert_eq!(logger.destination_count(LogLevel::Info), 1);
    }

    #[test]
    fn test_logger_rejects_invalid_levels() {
        let container = config_container(json!({ "log": { "loggers": { "logger.tracing": ["loud"] } } }));

        let err = container.resolve("logger", &[]).unwrap_err();
        assert!(matches!(err, ContainerError::ServiceCreationFailed { .. }));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_logger_without_configuration() {
        let container = Container::new();
        ConfigProvider::new("/nonexistent/solid").register(&container).unwrap();
        LoggerProvider.register(&container).unwrap();

        let logger = container.make::<Logger>("logger", &[]).unwrap();
        assert_eq!(logger.destination_count(LogLevel::Emergency), 0);
    }

    #[test]
    fn test_stream_logger_definition_parameters() {
        let container = Container::new();
        LoggerProvider.register(&container).unwrap();

        let destination = container.make::<SharedLog>(STREAM_LOGGER, &crate::params!["stderr", "line"]);
        assert!(destination.is_ok());

        match container.make::<SharedLog>(STREAM_LOGGER, &crate::params!["stderr", "fancy"]) {
            Err(err) => assert!(err.to_string().contains("fancy")),
            Ok(_) => panic!("unknown formatter should be rejected"),
        }
    }

    #[test]
    fn test_closure_provider() {
        let container = Container::new();
        let provider = |container: &Container| -> Result<(), ContainerError> {
            container.instance("answer", Arc::new(42i64));
            Ok(())
        };

        provider.register(&container).unwrap();
        assert!(container.is_bound("answer"));
        assert!(!provider.name().is_empty());
    }
}
