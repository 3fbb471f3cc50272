//! 基础设施层
//!
//! 提供应用运行所需的技术实现，包括：
//! - 依赖注入容器
//! - 服务提供者（配置、日志、内置内核）

pub mod container;
pub mod provider;

pub use container::{Container, ContainerError, ContainerStats, Identifier, Value};
pub use provider::{ConfigProvider, KernelProvider, LoggerProvider, ServiceProvider};
