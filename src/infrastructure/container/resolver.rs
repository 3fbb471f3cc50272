//! 依赖注入容器实现
//!
//! 支持：
//! - 工厂绑定与自构造绑定
//! - 共享（单例）实例缓存
//! - 单跳别名
//! - 基于构造函数声明的递归解析
//! - 循环依赖检测

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use super::alias::AliasTable;
use super::binding::{BindingRegistry, Concrete, Factory};
use super::reflection::{Arguments, ClassDefinition, ClassRegistry, Injectable, ParameterType};
use super::stack::{DependencyStack, StackFrame};
use super::{ContainerError, Identifier, Value};

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 总解析次数（包括嵌套解析）
    pub total_resolutions: u64,
    /// 实例缓存命中次数
    pub cache_hits: u64,
    /// 工厂调用次数
    pub factory_invocations: u64,
    /// 通过类定义构造的次数
    pub constructions: u64,
    /// 检测到循环依赖的次数
    pub circular_dependency_failures: u64,
    /// 绑定数量
    pub registered_bindings: usize,
    /// 已缓存实例数量
    pub cached_instances: usize,
    /// 别名数量
    pub registered_aliases: usize,
    /// 类定义数量
    pub class_definitions: usize,
}

impl ContainerStats {
    /// 获取缓存命中率（百分比）
    pub fn cache_hit_rate(&self) -> f64 {
        if self.total_resolutions == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / self.total_resolutions as f64) * 100.0
        }
    }

    /// 获取性能指标摘要
    pub fn performance_summary(&self) -> String {
        format!(
            "Container Performance: {} total resolutions, {:.1}% cache hit rate, {} registered bindings, {} cached instances",
            self.total_resolutions,
            self.cache_hit_rate(),
            self.registered_bindings,
            self.cached_instances
        )
    }
}

/// 依赖注入容器
///
/// 单线程使用：所有状态保存在 `RefCell` 中，工厂和构造函数执行期间不持有任何借用，
/// 因此它们可以重入 `resolve`、`bind` 和 `instance`。
#[derive(Default)]
pub struct Container {
    bindings: RefCell<BindingRegistry>,
    instances: RefCell<HashMap<Identifier, Value>>,
    aliases: RefCell<AliasTable>,
    classes: RefCell<ClassRegistry>,
    resolution_stack: RefCell<DependencyStack>,
    stats: RefCell<ContainerStats>,
}

impl Container {
    /// 创建新的容器实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册绑定：有工厂时使用工厂，`None` 时自构造
    ///
    /// 同一标识符的后一次绑定覆盖前一次。
    pub fn bind(&self, abstract_: impl Into<Identifier>, factory: Option<Factory>, shared: bool) {
        let abstract_ = abstract_.into();
        let concrete = match factory {
            Some(factory) => Concrete::Factory(factory),
            None => Concrete::Class(abstract_.clone()),
        };
        tracing::trace!(identifier = %abstract_, shared, "binding registered");
        self.bindings.borrow_mut().insert(abstract_, concrete, shared);
    }

    /// 将抽象标识符绑定到另一个实现标识符，解析时转发
    pub fn bind_to(&self, abstract_: impl Into<Identifier>, concrete: impl Into<Identifier>, shared: bool) {
        let abstract_ = abstract_.into();
        let concrete = concrete.into();
        tracing::trace!(identifier = %abstract_, concrete = %concrete, shared, "indirect binding registered");
        self.bindings
            .borrow_mut()
            .insert(abstract_, Concrete::Class(concrete), shared);
    }

    /// 注册共享工厂 - 便捷方法
    pub fn singleton<T, F>(&self, abstract_: impl Into<Identifier>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Container, &[Value]) -> Result<T, ContainerError> + 'static,
    {
        self.bind(abstract_, Some(Factory::new(factory)), true);
    }

    /// 直接保存实例，优先于同一标识符的任何绑定
    pub fn instance(&self, abstract_: impl Into<Identifier>, value: Value) {
        self.instances.borrow_mut().insert(abstract_.into(), value);
    }

    /// 为 `abstract_` 注册别名
    pub fn alias(&self, abstract_: impl Into<Identifier>, alias: impl Into<Identifier>) -> Result<(), ContainerError> {
        self.aliases.borrow_mut().insert(abstract_.into(), alias.into())
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.borrow().contains(name)
    }

    pub fn is_bound(&self, abstract_: impl Into<Identifier>) -> bool {
        let abstract_ = self.resolve_alias(&abstract_.into());
        self.instances.borrow().contains_key(&abstract_) || self.bindings.borrow().contains(abstract_.as_str())
    }

    pub fn is_shared(&self, abstract_: impl Into<Identifier>) -> bool {
        let abstract_ = self.resolve_alias(&abstract_.into());
        self.is_shared_canonical(&abstract_)
    }

    /// 注册类定义（构造函数签名）
    pub fn define(&self, definition: ClassDefinition) {
        tracing::trace!(identifier = %definition.identifier(), kind = ?definition.kind(), "class defined");
        self.classes.borrow_mut().insert(definition);
    }

    /// 注册可自描述的类型
    pub fn register<T: Injectable>(&self) {
        self.define(T::definition());
    }

    pub fn is_defined(&self, identifier: impl Into<Identifier>) -> bool {
        let identifier = self.resolve_alias(&identifier.into());
        self.classes.borrow().contains(identifier.as_str())
    }

    /// 解析服务
    pub fn resolve(&self, abstract_: impl Into<Identifier>, parameters: &[Value]) -> Result<Value, ContainerError> {
        let abstract_ = self.resolve_alias(&abstract_.into());
        self.stats.borrow_mut().total_resolutions += 1;

        // 循环检测必须先于缓存查找
        if let Err(err) = self.resolution_stack.borrow().check(&abstract_) {
            self.stats.borrow_mut().circular_dependency_failures += 1;
            tracing::warn!(identifier = %abstract_, "circular dependency detected");
            return Err(err);
        }

        let cached = self.instances.borrow().get(&abstract_).cloned();
        if let Some(instance) = cached {
            self.stats.borrow_mut().cache_hits += 1;
            return Ok(instance);
        }

        let frame = StackFrame::push(&self.resolution_stack, abstract_.clone());
        tracing::debug!(identifier = %abstract_, parameters = parameters.len(), "resolving");

        let concrete = self
            .bindings
            .borrow()
            .get(abstract_.as_str())
            .map(|binding| binding.concrete.clone())
            .unwrap_or_else(|| Concrete::Class(abstract_.clone()));

        let result = match concrete {
            Concrete::Factory(factory) => {
                self.stats.borrow_mut().factory_invocations += 1;
                factory.invoke(self, parameters)
            }
            Concrete::Class(concrete) if concrete != abstract_ => self.resolve(concrete, parameters),
            Concrete::Class(_) => self.construct(&abstract_, parameters),
        };
        drop(frame);
        let result = result?;

        if self.is_shared_canonical(&abstract_) {
            self.instance(abstract_, result.clone());
        }

        Ok(result)
    }

    /// 解析并向下转型为具体类型
    pub fn make<T: Any + Send + Sync>(
        &self,
        abstract_: impl Into<Identifier>,
        parameters: &[Value],
    ) -> Result<Arc<T>, ContainerError> {
        let abstract_ = abstract_.into();
        self.resolve(&abstract_, parameters)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeCastFailed {
                identifier: abstract_.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        let mut stats = self.stats.borrow().clone();
        stats.registered_bindings = self.bindings.borrow().len();
        stats.cached_instances = self.instances.borrow().len();
        stats.registered_aliases = self.aliases.borrow().len();
        stats.class_definitions = self.classes.borrow().len();
        stats
    }

    /// 当前解析深度；完整的顶层解析结束后为 0
    pub fn resolution_depth(&self) -> usize {
        self.resolution_stack.borrow().depth()
    }

    fn resolve_alias(&self, name: &Identifier) -> Identifier {
        self.aliases.borrow().resolve(name)
    }

    fn is_shared_canonical(&self, abstract_: &Identifier) -> bool {
        self.instances.borrow().contains_key(abstract_) || self.bindings.borrow().is_shared(abstract_.as_str())
    }

    fn construct(&self, concrete: &Identifier, parameters: &[Value]) -> Result<Value, ContainerError> {
        let definition = self
            .classes
            .borrow()
            .get(concrete.as_str())
            .cloned()
            .ok_or_else(|| ContainerError::ClassNotFound(concrete.clone()))?;

        if !definition.is_instantiable() {
            return Err(ContainerError::NotInstantiable(concrete.clone()));
        }

        self.stats.borrow_mut().constructions += 1;

        let arguments = match definition.constructor() {
            None => Arguments::empty(concrete.clone()),
            Some(declared) => {
                let mut names = Vec::with_capacity(declared.len());
                let mut values = Vec::with_capacity(declared.len());

                for (position, parameter) in declared.iter().enumerate() {
                    let value = if let Some(passed) = parameters.get(position) {
                        passed.clone()
                    } else if let Some(default) = parameter.default_value() {
                        default.clone()
                    } else if let ParameterType::Class(dependency) = parameter.ty() {
                        // 调用方传入的参数只作用于顶层构造函数
                        self.resolve(dependency, &[])?
                    } else {
                        return Err(ContainerError::UnresolvedDependency {
                            parameter: parameter.name().to_string(),
                            class: concrete.clone(),
                        });
                    };
                    names.push(parameter.name().to_string());
                    values.push(value);
                }

                Arguments::new(concrete.clone(), names, values)
            }
        };

        definition.instantiate(arguments)
    }
}

/// 服务解析宏
#[macro_export]
macro_rules! resolve {
    ($container:expr, $abstract:expr $(, $param:expr)* $(,)?) => {
        $container.resolve($abstract, &$crate::params![$($param),*])
    };
}
