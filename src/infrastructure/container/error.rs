//! 容器错误类型

use super::Identifier;
use thiserror::Error;

/// 依赖注入容器错误
#[derive(Debug, Error)]
pub enum ContainerError {
    /// 循环依赖检测 - 包含出错时的解析栈
    #[error("The dependency \"{identifier}\" is circular (resolution stack: {})", join(.resolution_stack))]
    CircularDependency {
        identifier: Identifier,
        resolution_stack: Vec<Identifier>,
    },

    /// 别名已被占用
    #[error("Alias \"{alias}\" already exists (points to \"{existing}\")")]
    AliasConflict { alias: String, existing: Identifier },

    /// 没有对应的类定义
    #[error("Class {0} does not exist")]
    ClassNotFound(Identifier),

    /// 抽象类或接口无法直接构造
    #[error("\"{0}\" is not instantiable")]
    NotInstantiable(Identifier),

    /// 构造参数既没有传入值、默认值，也没有可解析的类型
    #[error("Unresolved dependency: ${parameter} in {class}::new")]
    UnresolvedDependency { parameter: String, class: Identifier },

    /// 类型转换失败
    #[error("Type cast failed for \"{identifier}\": expected {expected}")]
    TypeCastFailed {
        identifier: String,
        expected: &'static str,
    },

    /// 工厂函数返回的错误
    #[error("Failed to create service \"{identifier}\": {reason}")]
    ServiceCreationFailed { identifier: Identifier, reason: String },
}

impl ContainerError {
    /// 包装工厂内部的任意错误
    pub fn creation_failed(identifier: impl Into<Identifier>, reason: impl ToString) -> Self {
        ContainerError::ServiceCreationFailed {
            identifier: identifier.into(),
            reason: reason.to_string(),
        }
    }
}

fn join(stack: &[Identifier]) -> String {
    stack
        .iter()
        .map(Identifier::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
