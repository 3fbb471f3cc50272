//! 应用内核
//!
//! 每种运行环境（SAPI）提供一对服务：`<ns>.kernel` 处理请求，
//! `<ns>.request` 把进程级 [`Request`] 转换为该内核理解的请求类型。

pub mod cli;
pub mod request;
pub mod response;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::KernelError;
use crate::infrastructure::container::{Identifier, Value};

pub use cli::{CliKernel, CliRequest};
pub use request::{headers_from_server, Parameters, Request, RequestBuilder};
pub use response::{Response, TextResponse};

/// 请求处理内核
pub trait Kernel: Send + Sync {
    /// `request` 是 `<ns>.request` 解析出的值，类型不符时返回 [`KernelError::UnsupportedRequestType`]
    fn handle_request(&self, request: Value) -> Result<Box<dyn Response>, KernelError>;

    fn dispatch_response(&self, response: Box<dyn Response>) -> Result<(), KernelError>;
}

/// 在容器中共享的内核
pub type SharedKernel = Arc<dyn Kernel>;

/// 运行环境
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sapi {
    Cli,
    Http,
    Named(String),
}

impl Sapi {
    /// 根据进程环境判断
    pub fn detect() -> Self {
        let server: Parameters = std::env::vars_os()
            .map(|(key, value)| (key.to_string_lossy().into_owned(), value.to_string_lossy().into_owned()))
            .collect();
        Self::from_server(&server)
    }

    /// 存在 CGI 变量时为 HTTP，否则为命令行
    pub fn from_server(server: &Parameters) -> Self {
        if server.contains_key("GATEWAY_INTERFACE") || server.contains_key("REQUEST_METHOD") {
            Sapi::Http
        } else {
            Sapi::Cli
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Sapi::Cli => "cli",
            Sapi::Http => "http",
            Sapi::Named(name) => name.as_str(),
        }
    }

    pub fn kernel_identifier(&self) -> Identifier {
        format!("{}.kernel", self.namespace()).into()
    }

    pub fn request_identifier(&self) -> Identifier {
        format!("{}.request", self.namespace()).into()
    }
}

impl fmt::Display for Sapi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

impl FromStr for Sapi {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "cli" => Sapi::Cli,
            "http" => Sapi::Http,
            name => Sapi::Named(name.to_string()),
        })
    }
}
