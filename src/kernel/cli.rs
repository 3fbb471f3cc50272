//! 命令行内核：把命令行参数原样回显

use std::sync::Arc;

use crate::errors::KernelError;
use crate::infrastructure::container::{ClassDefinition, Parameter, Value};
use crate::logger::Stream;

use super::{Kernel, Parameters, Request, Response, Sapi, SharedKernel, TextResponse};

/// 命令行请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliRequest {
    arguments: Vec<String>,
    env: Parameters,
}

impl CliRequest {
    pub fn from_kernel_request(request: &Request) -> Self {
        Self {
            arguments: request.arguments().to_vec(),
            env: request.env().clone(),
        }
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn env(&self) -> &Parameters {
        &self.env
    }

    /// `cli.request`：由调用方传入的内核请求构造
    pub fn definition() -> ClassDefinition {
        ClassDefinition::new(Sapi::Cli.request_identifier(), |args| {
            let request = args.get::<Request>(0)?;
            Ok(CliRequest::from_kernel_request(&request))
        })
        .parameter(Parameter::of::<Request>("request"))
    }
}

/// 命令行内核
#[derive(Debug, Clone, Default)]
pub struct CliKernel {
    output: Stream,
}

impl CliKernel {
    pub fn new(output: Stream) -> Self {
        Self { output }
    }

    /// `cli.kernel`：输出到标准输出
    pub fn definition() -> ClassDefinition {
        ClassDefinition::new(Sapi::Cli.kernel_identifier(), |_| {
            Ok(Arc::new(CliKernel::default()) as SharedKernel)
        })
    }
}

impl Kernel for CliKernel {
    fn handle_request(&self, request: Value) -> Result<Box<dyn Response>, KernelError> {
        let request = request
            .downcast_ref::<CliRequest>()
            .ok_or_else(|| KernelError::UnsupportedRequestType("expected a command line request".to_string()))?;

        Ok(Box::new(TextResponse::new(request.arguments().join(" "))))
    }

    fn dispatch_response(&self, response: Box<dyn Response>) -> Result<(), KernelError> {
        let text = response
            .downcast_ref::<TextResponse>()
            .ok_or_else(|| KernelError::UnsupportedResponseType(response.type_name().to_string()))?;

        if text.body().is_empty() {
            return Ok(());
        }

        self.output
            .write(&format!("{}\n", text.body()))
            .map_err(|e| KernelError::Handler(format!("failed to write response: {}", e)))
    }
}
