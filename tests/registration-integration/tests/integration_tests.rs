//! 注册管线集成测试（宏 → 扫描 → 分类 → 注册 → 解析）

use sentry_common::DependencyError;
use sentry_di::{
    name_contains, Injectable, ModuleRegistry, ModuleScanner, Registrar, ServiceCollection,
    ServiceProvider, ServiceScope, TypeClassifier,
};
use sentry_macros::component;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_SERIAL: AtomicUsize = AtomicUsize::new(0);

fn next_serial() -> usize {
    NEXT_SERIAL.fetch_add(1, Ordering::SeqCst)
}

pub trait Greeter: Send + Sync {
    fn serial(&self) -> usize;
}

pub trait Audited: Send + Sync {
    fn serial(&self) -> usize;
}

pub trait Clock: Send + Sync {
    fn serial(&self) -> usize;
}

pub trait Token: Send + Sync {
    fn serial(&self) -> usize;
}

pub trait Banner: Send + Sync {
    fn label(&self) -> &'static str;
}

/// 作用域组件：一个实现暴露两个接口
#[component(scoped, provides(Greeter, Audited))]
#[derive(Debug)]
pub struct ScopedGreeter {
    serial: usize,
}

impl Injectable for ScopedGreeter {
    fn construct(_scope: &ServiceScope) -> Result<Self, DependencyError> {
        Ok(Self {
            serial: next_serial(),
        })
    }
}

impl Greeter for ScopedGreeter {
    fn serial(&self) -> usize {
        self.serial
    }
}

impl Audited for ScopedGreeter {
    fn serial(&self) -> usize {
        self.serial
    }
}

/// 单例组件
#[component(singleton, provides(Clock))]
#[derive(Debug)]
pub struct SingletonClock {
    serial: usize,
}

impl Injectable for SingletonClock {
    fn construct(_scope: &ServiceScope) -> Result<Self, DependencyError> {
        Ok(Self {
            serial: next_serial(),
        })
    }
}

impl Clock for SingletonClock {
    fn serial(&self) -> usize {
        self.serial
    }
}

/// 瞬时组件
#[component(transient, provides(Token))]
#[derive(Debug)]
pub struct TransientToken {
    serial: usize,
}

impl Injectable for TransientToken {
    fn construct(_scope: &ServiceScope) -> Result<Self, DependencyError> {
        Ok(Self {
            serial: next_serial(),
        })
    }
}

impl Token for TransientToken {
    fn serial(&self) -> usize {
        self.serial
    }
}

/// 同一接口的两个实现，按类型名排序后 ZetaBanner 最后注册
#[component(transient, provides(Banner))]
#[derive(Debug)]
pub struct AlphaBanner;

impl Injectable for AlphaBanner {
    fn construct(_scope: &ServiceScope) -> Result<Self, DependencyError> {
        Ok(Self)
    }
}

impl Banner for AlphaBanner {
    fn label(&self) -> &'static str {
        "alpha"
    }
}

#[component(transient, provides(Banner))]
#[derive(Debug)]
pub struct ZetaBanner;

impl Injectable for ZetaBanner {
    fn construct(_scope: &ServiceScope) -> Result<Self, DependencyError> {
        Ok(Self)
    }
}

impl Banner for ZetaBanner {
    fn label(&self) -> &'static str {
        "zeta"
    }
}

/// 有标记但没有接口的组件：分类通过，不产生注册
#[component(scoped)]
#[derive(Debug)]
pub struct InertComponent;

impl Injectable for InertComponent {
    fn construct(_scope: &ServiceScope) -> Result<Self, DependencyError> {
        Ok(Self)
    }
}

/// 禁用的组件：被分类器排除
#[component(transient, disabled, provides(Banner))]
#[derive(Debug)]
pub struct DisabledBanner;

impl Injectable for DisabledBanner {
    fn construct(_scope: &ServiceScope) -> Result<Self, DependencyError> {
        Ok(Self)
    }
}

impl Banner for DisabledBanner {
    fn label(&self) -> &'static str {
        "disabled"
    }
}

/// 执行一次完整的发现-分类-注册，构建服务提供者
fn build_provider() -> Arc<ServiceProvider> {
    let report = ModuleScanner::new().discover(ModuleRegistry::global(), name_contains("sentry"));
    assert!(report
        .modules
        .iter()
        .any(|module| module.name == "sentry-registration-tests"));

    let mut services = ServiceCollection::new();
    let classifier = TypeClassifier::new();
    let registrar = Registrar::new();
    for candidate in report.extract_types() {
        if let Some(descriptor) = classifier.classify(&candidate).unwrap() {
            registrar.register(&descriptor, &mut services);
        }
    }
    services.build_provider()
}

#[test]
fn marker_exclusivity_shares_one_instance_per_scope() {
    let provider = build_provider();

    let scope = provider.create_scope();
    let greeter = scope.resolve::<dyn Greeter>().unwrap();
    let audited = scope.resolve::<dyn Audited>().unwrap();
    assert_eq!(greeter.serial(), audited.serial());

    let other_scope = provider.create_scope();
    let other_greeter = other_scope.resolve::<dyn Greeter>().unwrap();
    assert_ne!(greeter.serial(), other_greeter.serial());
}

#[test]
fn singleton_component_is_shared_across_scopes() {
    let provider = build_provider();

    let first = provider.create_scope().resolve::<dyn Clock>().unwrap();
    let second = provider.create_scope().resolve::<dyn Clock>().unwrap();

    assert_eq!(first.serial(), second.serial());
}

#[test]
fn transient_component_is_fresh_on_every_resolution() {
    let provider = build_provider();
    let scope = provider.create_scope();

    let first = scope.resolve::<dyn Token>().unwrap();
    let second = scope.resolve::<dyn Token>().unwrap();

    assert_ne!(first.serial(), second.serial());
}

#[test]
fn last_registration_wins_on_conflicting_interface() {
    let provider = build_provider();
    let scope = provider.create_scope();

    // 注册顺序由类型全名排序决定，ZetaBanner 最后注册
    let winner = scope.resolve::<dyn Banner>().unwrap();
    assert_eq!(winner.label(), "zeta");

    let all = scope.resolve_all::<dyn Banner>().unwrap();
    let labels: Vec<&str> = all.iter().map(|banner| banner.label()).collect();
    assert_eq!(labels, vec!["alpha", "zeta"]);
}

#[test]
fn inert_and_disabled_components_produce_no_registration() {
    let provider = build_provider();

    let implementations: Vec<String> = provider
        .registrations()
        .iter()
        .map(|registration| registration.implementation.full_name.clone())
        .collect();

    assert!(!implementations
        .iter()
        .any(|name| name.contains("InertComponent")));
    assert!(!implementations
        .iter()
        .any(|name| name.contains("DisabledBanner")));
}

#[test]
fn generated_component_metadata_uses_the_struct_name() {
    use sentry_common::Component;

    let greeter = ScopedGreeter { serial: 0 };
    assert_eq!(greeter.name(), "ScopedGreeter");
    assert!(greeter.is_enabled());

    let disabled = DisabledBanner;
    assert!(!disabled.is_enabled());
}
