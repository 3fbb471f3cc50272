//! 类定义注册表
//!
//! Rust 没有运行时反射，构造函数签名在注册时通过 [`ClassDefinition`] 显式声明：
//! 参数名、参数类型（可解析的类标识符或内置类型）和默认值。
//! 容器据此完成与反射等价的递归构造。

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::{ContainerError, Identifier, IntoParameter, Value};

type BuildFn = dyn Fn(Arguments) -> Result<Value, ContainerError>;

/// 类的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Concrete,
    Abstract,
    Interface,
}

/// 构造参数的声明类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    /// 可由容器解析的类或接口
    Class(Identifier),
    /// 标量等内置类型，只能由调用方传入或使用默认值
    Builtin(&'static str),
    Untyped,
}

/// 构造函数参数声明
#[derive(Clone)]
pub struct Parameter {
    name: String,
    ty: ParameterType,
    default: Option<Value>,
}

impl Parameter {
    /// 类型为可解析标识符的参数
    pub fn class(name: impl Into<String>, identifier: impl Into<Identifier>) -> Self {
        Self {
            name: name.into(),
            ty: ParameterType::Class(identifier.into()),
            default: None,
        }
    }

    /// 类型为 `T` 的参数，通过 `Identifier::of::<T>()` 解析
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::class(name, Identifier::of::<T>())
    }

    pub fn builtin(name: impl Into<String>, ty: &'static str) -> Self {
        Self {
            name: name.into(),
            ty: ParameterType::Builtin(ty),
            default: None,
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ParameterType::Untyped,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl IntoParameter) -> Self {
        self.default = Some(default.into_parameter());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ParameterType {
        &self.ty
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

/// 传给构造函数的实参列表，按参数声明顺序排列
pub struct Arguments {
    class: Identifier,
    names: Vec<String>,
    values: Vec<Value>,
}

impl Arguments {
    pub(crate) fn new(class: Identifier, names: Vec<String>, values: Vec<Value>) -> Self {
        Self { class, names, values }
    }

    pub(crate) fn empty(class: Identifier) -> Self {
        Self::new(class, Vec::new(), Vec::new())
    }

    /// 指定位置的原始值
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// 按位置取出并向下转型
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ContainerError> {
        let value = self.values.get(index).cloned().ok_or_else(|| self.cast_error::<T>(index))?;
        value.downcast::<T>().map_err(|_| self.cast_error::<T>(index))
    }

    pub fn cloned<T: Any + Send + Sync + Clone>(&self, index: usize) -> Result<T, ContainerError> {
        self.get::<T>(index).map(|value| (*value).clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn cast_error<T>(&self, index: usize) -> ContainerError {
        let parameter = self
            .names
            .get(index)
            .map(String::as_str)
            .unwrap_or("<missing>");
        ContainerError::TypeCastFailed {
            identifier: format!("{}::${}", self.class, parameter),
            expected: type_name::<T>(),
        }
    }
}

/// 注册时声明的类：种类、构造函数签名和构造函数本身
#[derive(Clone)]
pub struct ClassDefinition {
    identifier: Identifier,
    kind: ClassKind,
    constructor: Option<Vec<Parameter>>,
    build: Rc<BuildFn>,
}

impl ClassDefinition {
    /// 带构造函数的具体类；参数通过 [`Self::parameter`] 声明
    pub fn new<T, F>(identifier: impl Into<Identifier>, build: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Arguments) -> Result<T, ContainerError> + 'static,
    {
        Self {
            identifier: identifier.into(),
            kind: ClassKind::Concrete,
            constructor: Some(Vec::new()),
            build: Rc::new(move |arguments| build(arguments).map(|service| Arc::new(service) as Value)),
        }
    }

    /// 以 `Identifier::of::<T>()` 为标识符的 `new`
    pub fn of<T, F>(build: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Arguments) -> Result<T, ContainerError> + 'static,
    {
        Self::new(Identifier::of::<T>(), build)
    }

    /// 没有构造函数的类，构造时不解析任何参数
    pub fn without_constructor<T: Any + Send + Sync + Default>(identifier: impl Into<Identifier>) -> Self {
        Self {
            identifier: identifier.into(),
            kind: ClassKind::Concrete,
            constructor: None,
            build: Rc::new(|_| Ok(Arc::new(T::default()) as Value)),
        }
    }

    pub fn interface(identifier: impl Into<Identifier>) -> Self {
        Self::non_instantiable(identifier.into(), ClassKind::Interface)
    }

    pub fn abstract_class(identifier: impl Into<Identifier>) -> Self {
        Self::non_instantiable(identifier.into(), ClassKind::Abstract)
    }

    fn non_instantiable(identifier: Identifier, kind: ClassKind) -> Self {
        let target = identifier.clone();
        Self {
            identifier,
            kind,
            constructor: None,
            build: Rc::new(move |_| Err(ContainerError::NotInstantiable(target.clone()))),
        }
    }

    /// 追加一个构造函数参数
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.constructor.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_instantiable(&self) -> bool {
        self.kind == ClassKind::Concrete
    }

    pub fn constructor(&self) -> Option<&[Parameter]> {
        self.constructor.as_deref()
    }

    pub(crate) fn instantiate(&self, arguments: Arguments) -> Result<Value, ContainerError> {
        (self.build)(arguments)
    }
}

impl fmt::Debug for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDefinition")
            .field("identifier", &self.identifier)
            .field("kind", &self.kind)
            .field("constructor", &self.constructor)
            .finish()
    }
}

/// 可自描述构造方式的类型
pub trait Injectable: Any + Send + Sync + Sized {
    fn definition() -> ClassDefinition;
}

#[derive(Debug, Default)]
pub(crate) struct ClassRegistry {
    classes: HashMap<Identifier, ClassDefinition>,
}

impl ClassRegistry {
    pub(crate) fn insert(&mut self, definition: ClassDefinition) {
        self.classes.insert(definition.identifier.clone(), definition);
    }

    pub(crate) fn get(&self, identifier: &str) -> Option<&ClassDefinition> {
        self.classes.get(identifier)
    }

    pub(crate) fn contains(&self, identifier: &str) -> bool {
        self.classes.contains_key(identifier)
    }

    pub(crate) fn len(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Plain;

    #[test]
    fn test_parameter_declarations() {
        let definition = ClassDefinition::new("F", |_| Ok(Plain))
            .parameter(Parameter::class("a", "A"))
            .parameter(Parameter::builtin("string", "String"))
            .parameter(Parameter::builtin("number", "i64").with_default(0i64));

        let parameters = definition.constructor().unwrap();
        assert_eq!(parameters.len(), 3);
        assert_eq!(parameters[0].ty(), &ParameterType::Class("A".into()));
        assert!(parameters[1].default_value().is_none());
        let default = parameters[2].default_value().unwrap();
        assert_eq!(default.downcast_ref::<i64>(), Some(&0));
    }

    #[test]
    fn test_interface_is_not_instantiable() {
        let definition = ClassDefinition::interface("Service");
        assert_eq!(definition.kind(), ClassKind::Interface);
        assert!(!definition.is_instantiable());
        assert!(ClassDefinition::abstract_class("Base").constructor().is_none());
    }

    #[test]
    fn test_without_constructor_builds_default() {
        let definition = ClassDefinition::without_constructor::<Plain>("Plain");
        assert!(definition.constructor().is_none());
        let value = definition.instantiate(Arguments::empty("Plain".into())).unwrap();
        assert!(value.downcast_ref::<Plain>().is_some());
    }

    #[test]
    fn test_argument_type_mismatch() {
        let arguments = Arguments::new(
            "F".into(),
            vec!["number".to_string()],
            vec![Arc::new("text".to_string()) as Value],
        );
        match arguments.get::<i64>(0) {
            Err(ContainerError::TypeCastFailed { identifier, .. }) => {
                assert_eq!(identifier, "F::$number");
            }
            other => panic!("expected TypeCastFailed, got {:?}", other.map(|_| ())),
        }
        assert_eq!(arguments.cloned::<String>(0).unwrap(), "text");
    }
}
