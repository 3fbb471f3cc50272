//! 容器解析行为测试
//!
//! 夹具：A 依赖 B，B 依赖 C，C 没有构造函数；Circular1 与 Circular2 互相依赖；
//! F 需要一个 A、一个字符串和一个带默认值的整数。

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use solid::infrastructure::container::{
    ClassDefinition, Container, ContainerError, Factory, Identifier, Injectable, Parameter, Value,
};
use solid::{params, resolve};

#[derive(Debug, Default)]
struct C;

#[derive(Debug)]
struct B {
    c: Arc<C>,
}

#[derive(Debug)]
struct A {
    b: Arc<B>,
}

impl Injectable for A {
    fn definition() -> ClassDefinition {
        ClassDefinition::of(|args| Ok(A { b: args.get::<B>(0)? })).parameter(Parameter::of::<B>("b"))
    }
}

impl Injectable for B {
    fn definition() -> ClassDefinition {
        ClassDefinition::of(|args| Ok(B { c: args.get::<C>(0)? })).parameter(Parameter::of::<C>("c"))
    }
}

impl Injectable for C {
    fn definition() -> ClassDefinition {
        ClassDefinition::without_constructor::<C>(Identifier::of::<C>())
    }
}

struct Circular1;
struct Circular2;

#[derive(Debug)]
struct F {
    a: Arc<A>,
    string: String,
    number: i64,
}

impl Injectable for F {
    fn definition() -> ClassDefinition {
        ClassDefinition::of(|args| {
            Ok(F {
                a: args.get::<A>(0)?,
                string: args.cloned::<String>(1)?,
                number: args.cloned::<i64>(2)?,
            })
        })
        .parameter(Parameter::of::<A>("a"))
        .parameter(Parameter::builtin("string", "String"))
        .parameter(Parameter::builtin("number", "i64").with_default(0i64))
    }
}

#[derive(Debug)]
struct H {
    name: String,
}

impl Injectable for H {
    fn definition() -> ClassDefinition {
        ClassDefinition::of(|args| Ok(H { name: args.cloned::<String>(0)? }))
            .parameter(Parameter::builtin("name", "String"))
    }
}

#[derive(Debug)]
struct G {
    label: String,
    h: Arc<H>,
}

impl Injectable for G {
    fn definition() -> ClassDefinition {
        ClassDefinition::of(|args| {
            Ok(G {
                label: args.cloned::<String>(0)?,
                h: args.get::<H>(1)?,
            })
        })
        .parameter(Parameter::builtin("label", "String"))
        .parameter(Parameter::of::<H>("h"))
    }
}

fn container() -> Container {
    let container = Container::new();
    container.register::<A>();
    container.register::<B>();
    container.register::<C>();
    container.register::<F>();
    container.register::<G>();
    container.register::<H>();
    container.define(
        ClassDefinition::of(|args| args.get::<Circular2>(0).map(|_| Circular1))
            .parameter(Parameter::of::<Circular2>("circular2")),
    );
    container.define(
        ClassDefinition::of(|args| args.get::<Circular1>(0).map(|_| Circular2))
            .parameter(Parameter::of::<Circular1>("circular1")),
    );
    container
}

#[test]
fn test_bind_shared_returns_same_instance() {
    let container = container();
    container.bind(Identifier::of::<A>(), None, true);

    let first = container.make::<A>(Identifier::of::<A>(), &[]).unwrap();
    let second = container.make::<A>(Identifier::of::<A>(), &[]).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(container.is_shared(Identifier::of::<A>()));
}

#[test]
fn test_bind_unshared_returns_new_instances() {
    let container = container();
    container.bind(Identifier::of::<A>(), None, false);

    let first = container.make::<A>(Identifier::of::<A>(), &[]).unwrap();
    let second = container.make::<A>(Identifier::of::<A>(), &[]).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first.b, &second.b));
}

#[test]
fn test_instance_overrides_binding() {
    let container = Container::new();
    let invoked = Rc::new(Cell::new(false));
    let flag = invoked.clone();
    container.bind(
        "service",
        Some(Factory::new(move |_, _| {
            flag.set(true);
            Ok("from factory".to_string())
        })),
        false,
    );

    let value: Value = Arc::new("from instance".to_string());
    container.instance("service", value.clone());

    assert!(Arc::ptr_eq(&container.resolve("service", &[]).unwrap(), &value));
    assert!(!invoked.get());
}

#[test]
fn test_circular_dependency_then_recovery() {
    let container = container();

    let err = container.resolve(Identifier::of::<Circular1>(), &[]).unwrap_err();
    match &err {
        ContainerError::CircularDependency { identifier, resolution_stack } => {
            assert_eq!(identifier, &Identifier::of::<Circular1>());
            assert_eq!(resolution_stack.len(), 2);
        }
        other => panic!("expected CircularDependency, got {other}"),
    }
    assert_eq!(container.resolution_depth(), 0);
    assert_eq!(container.stats().circular_dependency_failures, 1);

    let a = container.make::<A>(Identifier::of::<A>(), &[]).unwrap();
    let _: &C = &a.b.c;
}

#[test]
fn test_alias_conflict_keeps_first_target() {
    let container = Container::new();
    container.instance("x", Arc::new(1i64));
    container.instance("y", Arc::new(2i64));

    container.alias("x", "a").unwrap();
    let err = container.alias("y", "a").unwrap_err();
    assert!(matches!(err, ContainerError::AliasConflict { ref alias, .. } if alias == "a"));

    assert!(container.is_alias("a"));
    let value = container.make::<i64>("a", &[]).unwrap();
    assert_eq!(*value, 1);
}

#[test]
fn test_alias_is_single_hop() {
    let container = Container::new();
    container.instance("target", Arc::new("value".to_string()));
    container.alias("target", "b").unwrap();
    container.alias("b", "a").unwrap();

    assert_eq!(*container.make::<String>("b", &[]).unwrap(), "value");
    assert!(matches!(
        container.resolve("a", &[]),
        Err(ContainerError::ClassNotFound(ref id)) if id.as_str() == "b"
    ));
}

#[test]
fn test_factory_receives_container_and_parameters() {
    let container = container();
    container.bind(
        "factory",
        Some(Factory::new(|container: &Container, parameters: &[Value]| {
            let c = container.make::<C>(Identifier::of::<C>(), &[])?;
            let received: Vec<String> = parameters
                .iter()
                .filter_map(|p| p.downcast_ref::<String>().cloned())
                .collect();
            Ok((c, received))
        })),
        false,
    );

    let value = resolve!(container, "factory", "p0", "p1").unwrap();
    let (_, received) = value.downcast_ref::<(Arc<C>, Vec<String>)>().unwrap();
    assert_eq!(received, &vec!["p0".to_string(), "p1".to_string()]);
}

#[test]
fn test_factory_can_register_services() {
    let container = Container::new();
    container.bind(
        "registrar",
        Some(Factory::new(|container: &Container, _: &[Value]| {
            container.instance("registered", Arc::new(7u32));
            container.bind("late", Some(Factory::new(|_, _| Ok(8u32))), true);
            Ok(())
        })),
        false,
    );

    container.resolve("registrar", &[]).unwrap();
    assert!(container.is_bound("registered"));
    assert_eq!(*container.make::<u32>("late", &[]).unwrap(), 8);
}

#[test]
fn test_supplied_parameters_and_defaults() {
    let container = container();
    let a = container.make::<A>(Identifier::of::<A>(), &[]).unwrap();

    let f = container
        .make::<F>(Identifier::of::<F>(), &params![a.clone(), "x"])
        .unwrap();
    assert!(Arc::ptr_eq(&f.a, &a));
    assert_eq!(f.string, "x");
    assert_eq!(f.number, 0);

    let f = container
        .make::<F>(Identifier::of::<F>(), &params![a, "y", 5i64])
        .unwrap();
    assert_eq!(f.number, 5);
}

#[test]
fn test_unresolvable_builtin_parameter() {
    let container = container();

    let err = container.resolve(Identifier::of::<F>(), &[]).unwrap_err();
    match err {
        ContainerError::UnresolvedDependency { parameter, class } => {
            assert_eq!(parameter, "string");
            assert_eq!(class, Identifier::of::<F>());
        }
        other => panic!("expected UnresolvedDependency, got {other}"),
    }
}

#[test]
fn test_queries_are_pure() {
    let container = container();
    container.bind("bound", None, true);
    container.alias("bound", "alias").unwrap();
    let before = container.stats();

    assert!(container.is_bound("bound"));
    assert!(container.is_bound("alias"));
    assert!(container.is_shared("alias"));
    assert!(container.is_alias("alias"));
    assert!(!container.is_alias("bound"));
    assert!(!container.is_bound("missing"));

    assert_eq!(container.stats(), before);
}

#[test]
fn test_class_without_constructor() {
    let container = container();

    let first = container.resolve(Identifier::of::<C>(), &params!["ignored"]).unwrap();
    let second = container.resolve(Identifier::of::<C>(), &[]).unwrap();

    assert!(first.downcast_ref::<C>().is_some());
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_failed_resolution_leaves_state_untouched() {
    let container = container();
    container.bind(Identifier::of::<F>(), None, true);
    let before = container.stats();

    assert!(container.resolve(Identifier::of::<F>(), &[]).is_err());

    let after = container.stats();
    assert_eq!(after.cached_instances, before.cached_instances);
    assert_eq!(after.registered_bindings, before.registered_bindings);
    assert_eq!(container.resolution_depth(), 0);
}

#[test]
fn test_factory_error_propagates() {
    let container = Container::new();
    container.bind(
        "broken",
        Some(Factory::new(|_, _| -> Result<(), ContainerError> {
            Err(ContainerError::creation_failed("broken", "database unreachable"))
        })),
        true,
    );

    let err = container.resolve("broken", &[]).unwrap_err();
    assert!(err.to_string().contains("database unreachable"));
    assert_eq!(container.stats().cached_instances, 0);
}

#[test]
fn test_make_reports_type_mismatch() {
    let container = Container::new();
    container.instance("number", Arc::new(1i64));

    let err = container.make::<String>("number", &[]).unwrap_err();
    assert!(matches!(err, ContainerError::TypeCastFailed { ref identifier, .. } if identifier == "number"));
}

#[test]
fn test_parameters_apply_only_to_top_level_constructor() {
    let container = container();

    // "outer" 只填充 G 的 label，不会传给嵌套解析的 H
    let err = container
        .resolve(Identifier::of::<G>(), &params!["outer"])
        .unwrap_err();
    match err {
        ContainerError::UnresolvedDependency { parameter, class } => {
            assert_eq!(parameter, "name");
            assert_eq!(class, Identifier::of::<H>());
        }
        other => panic!("expected UnresolvedDependency, got {other}"),
    }

    let h = container.make::<H>(Identifier::of::<H>(), &params!["inner"]).unwrap();
    assert_eq!(h.name, "inner");
    let g = container
        .make::<G>(Identifier::of::<G>(), &params!["outer", h.clone()])
        .unwrap();
    assert_eq!(g.label, "outer");
    assert!(Arc::ptr_eq(&g.h, &h));
}

#[test]
fn test_last_bind_wins_including_shared_flag() {
    let container = container();
    container.bind(Identifier::of::<A>(), None, true);
    container.bind(Identifier::of::<A>(), None, false);

    assert!(!container.is_shared(Identifier::of::<A>()));
    let first = container.make::<A>(Identifier::of::<A>(), &[]).unwrap();
    let second = container.make::<A>(Identifier::of::<A>(), &[]).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));

    container.bind("number", Some(Factory::new(|_, _| Ok(1i64))), false);
    container.bind("number", Some(Factory::new(|_, _| Ok(2i64))), true);

    assert!(container.is_shared("number"));
    let first = container.make::<i64>("number", &[]).unwrap();
    let second = container.make::<i64>("number", &[]).unwrap();
    assert_eq!(*first, 2);
    assert!(Arc::ptr_eq(&first, &second));
}
