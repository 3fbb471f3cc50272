//! 应用程序引导
//!
//! 启动顺序：配置、日志、内置内核定义、用户提供者、`app.startup`，最后绑定当前运行环境的内核。

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::infrastructure::container::{Container, ContainerError};
use crate::infrastructure::provider::{ConfigProvider, KernelProvider, LoggerProvider, ServiceProvider};
use crate::kernel::{Request, Sapi, SharedKernel};
use crate::logger::Logger;
use crate::logging::OperationTimer;
use crate::params;

/// 启动钩子的标识符
pub const STARTUP: &str = "app.startup";

/// 可运行的服务，例如启动钩子
pub trait Runnable: Send + Sync {
    fn run(&self, container: &Container) -> Result<(), AppError>;
}

/// 在容器中共享的可运行服务
pub type SharedRunnable = Arc<dyn Runnable>;

/// 应用构建器
pub struct ApplicationBuilder {
    directory: PathBuf,
    sapi: Option<Sapi>,
    providers: Vec<Box<dyn ServiceProvider>>,
}

impl ApplicationBuilder {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            sapi: None,
            providers: Vec::new(),
        }
    }

    /// 指定运行环境；默认根据进程环境判断
    pub fn sapi(mut self, sapi: Sapi) -> Self {
        self.sapi = Some(sapi);
        self
    }

    /// 在内置服务之后、启动钩子之前注册
    pub fn provider(mut self, provider: impl ServiceProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn build(self) -> Result<Application, AppError> {
        let sapi = self.sapi.unwrap_or_else(Sapi::detect);
        let container = Container::new();

        ConfigProvider::new(&self.directory).register(&container)?;
        LoggerProvider.register(&container)?;
        KernelProvider.register(&container)?;

        for provider in &self.providers {
            tracing::debug!(provider = provider.name(), "registering service provider");
            provider.register(&container)?;
        }

        if container.is_bound(STARTUP) || container.is_defined(STARTUP) {
            match container.make::<SharedRunnable>(STARTUP, &[]) {
                Ok(startup) => startup.run(&container)?,
                Err(ContainerError::TypeCastFailed { .. }) => {
                    tracing::warn!("{} is not runnable, skipping", STARTUP);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let kernel = sapi.kernel_identifier();
        if !container.is_bound(&kernel) {
            container.bind(&kernel, None, true);
        }
        container.alias(&kernel, "kernel")?;

        tracing::info!(
            directory = %self.directory.display(),
            sapi = %sapi,
            "application booted"
        );

        Ok(Application {
            container,
            directory: self.directory,
            sapi,
        })
    }
}

impl fmt::Debug for ApplicationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationBuilder")
            .field("directory", &self.directory)
            .field("sapi", &self.sapi)
            .field("providers", &self.providers.len())
            .finish()
    }
}

/// 已启动的应用
pub struct Application {
    container: Container,
    directory: PathBuf,
    sapi: Sapi,
}

impl Application {
    pub fn builder(directory: impl Into<PathBuf>) -> ApplicationBuilder {
        ApplicationBuilder::new(directory)
    }

    /// 使用默认设置启动
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, AppError> {
        Self::builder(directory).build()
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn sapi(&self) -> &Sapi {
        &self.sapi
    }

    pub fn config(&self) -> Result<Arc<Config>, AppError> {
        Ok(self.container.make::<Config>("config", &[])?)
    }

    pub fn logger(&self) -> Result<Arc<Logger>, AppError> {
        Ok(self.container.make::<Logger>("logger", &[])?)
    }

    /// 使用从进程环境采集的请求运行
    pub fn run(&self) -> Result<(), AppError> {
        self.run_with(Request::capture())
    }

    /// 解析内核与当前运行环境的请求，处理请求并发送响应
    pub fn run_with(&self, request: Request) -> Result<(), AppError> {
        let timer = OperationTimer::new("application.run").with_metadata("sapi", self.sapi.namespace());

        let kernel = self
            .container
            .make::<SharedKernel>("kernel", &[])
            .map_err(|e| self.unsupported(e))?;
        let request = self
            .container
            .resolve(self.sapi.request_identifier(), &params![Arc::new(request)])
            .map_err(|e| self.unsupported(e))?;

        let response = kernel.handle_request(request)?;
        kernel.dispatch_response(response)?;

        timer.finish();
        Ok(())
    }

    fn unsupported(&self, err: ContainerError) -> AppError {
        tracing::error!(sapi = %self.sapi, error = %err, "no kernel for the current environment");
        AppError::UnsupportedEnvironment(format!("{} ({})", self.sapi, err))
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("directory", &self.directory)
            .field("sapi", &self.sapi)
            .field("container", &self.container.stats())
            .finish()
    }
}
