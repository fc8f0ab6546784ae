//! 依赖解析容器
//!
//! [`ServiceCollection`] 在注册阶段收集注册表项；`build_provider` 之后
//! 注册表只读，不支持运行期重新注册。实例缓存以实现类型为键：同一实现
//! 绑定多个接口时，在相应生命周期范围内共享同一个实例。
//!
//! 同一接口的多次注册共存；单个解析时最后注册者胜出，调用方不能假设
//! 首次注册优先。

use crate::descriptor::{InstanceFactory, ServiceAdapter, SharedInstance, SharedService, TypeKey};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use sentry_common::{DependencyError, Lifetime, TypeInfo};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// 注册表项
///
/// (接口, 实现类型, 生命周期) 三元组加上构建与适配函数。
#[derive(Clone)]
pub struct ServiceRegistration {
    /// 被绑定的接口
    pub interface: TypeKey,
    /// 实现类型
    pub implementation: TypeInfo,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 实例构建函数
    pub construct: InstanceFactory,
    /// 接口适配函数
    pub adapt: ServiceAdapter,
}

impl std::fmt::Debug for ServiceRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistration")
            .field("interface", &self.interface)
            .field("implementation", &self.implementation)
            .field("lifetime", &self.lifetime)
            .field("construct", &"<function>")
            .field("adapt", &"<function>")
            .finish()
    }
}

/// 可注入组件 trait
///
/// 组件通过它从解析作用域获取自己的依赖并完成构建。
/// 配置缺失等构建期失败在这里传播，终止启动。
pub trait Injectable: Sized {
    /// 使用作用域内的依赖构建组件实例
    fn construct(scope: &ServiceScope) -> Result<Self, DependencyError>;
}

/// 服务集合（注册阶段，可变）
#[derive(Debug, Default)]
pub struct ServiceCollection {
    registrations: HashMap<TypeId, Vec<ServiceRegistration>>,
    count: usize,
}

impl ServiceCollection {
    /// 创建新的服务集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个注册表项
    pub fn add(&mut self, registration: ServiceRegistration) {
        self.registrations
            .entry(registration.interface.id)
            .or_default()
            .push(registration);
        self.count += 1;
    }

    /// 注册一个预先构建的单例实例，绑定到其具体类型
    pub fn register_instance<T: Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        debug!("注册单例实例: {}", std::any::type_name::<T>());
        let shared = instance;
        let construct: InstanceFactory =
            Arc::new(move |_scope: &ServiceScope| Ok(shared.clone() as SharedInstance));
        let adapt: ServiceAdapter = Arc::new(|shared: SharedInstance| {
            let concrete = shared.downcast::<T>().map_err(|_| DependencyError::TypeMismatch {
                type_name: std::any::type_name::<T>().to_string(),
            })?;
            Ok(Box::new(concrete) as SharedService)
        });
        self.add(ServiceRegistration {
            interface: TypeKey::of::<T>(),
            implementation: TypeInfo::of::<T>(),
            lifetime: Lifetime::Singleton,
            construct,
            adapt,
        });
    }

    /// 注册表项总数
    pub fn len(&self) -> usize {
        self.count
    }

    /// 服务集合是否为空
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 冻结注册表，构建服务提供者
    pub fn build_provider(self) -> Arc<ServiceProvider> {
        info!("构建服务提供者完成，共 {} 项注册", self.count);
        Arc::new(ServiceProvider {
            registrations: self.registrations,
            singletons: RwLock::new(HashMap::new()),
        })
    }
}

/// 服务提供者
///
/// 独占持有所有单例实例直到进程结束。单例在首次解析时惰性创建，
/// 此后被所有解析方共享，因此单例组件必须可安全并发读取。
pub struct ServiceProvider {
    registrations: HashMap<TypeId, Vec<ServiceRegistration>>,
    singletons: RwLock<HashMap<TypeId, SharedInstance>>,
}

impl ServiceProvider {
    /// 创建新的解析作用域
    pub fn create_scope(self: &Arc<Self>) -> ServiceScope {
        let scope = ServiceScope {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            provider: Arc::clone(self),
            instances: RwLock::new(HashMap::new()),
            resolution_chain: Mutex::new(Vec::new()),
        };
        debug!("创建解析作用域: {}", scope.id);
        scope
    }

    /// 检查接口是否已注册
    pub fn is_registered<I: ?Sized + 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<I>())
    }

    /// 所有注册表项的快照
    pub fn registrations(&self) -> Vec<ServiceRegistration> {
        self.registrations.values().flatten().cloned().collect()
    }

    fn registration_for(&self, interface: TypeId) -> Option<&ServiceRegistration> {
        // 最后注册者胜出
        self.registrations.get(&interface).and_then(|list| list.last())
    }

    fn registrations_for(&self, interface: TypeId) -> &[ServiceRegistration] {
        self.registrations
            .get(&interface)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("interfaces", &self.registrations.len())
            .field("singletons", &self.singletons.read().len())
            .finish()
    }
}

/// 解析作用域
///
/// 作用域内的作用域生命周期实例由作用域独占持有，作用域被丢弃时一并
/// 释放。一个作用域对应一次逻辑请求，作用域内的解析按顺序进行。
pub struct ServiceScope {
    id: Uuid,
    created_at: DateTime<Utc>,
    provider: Arc<ServiceProvider>,
    instances: RwLock<HashMap<TypeId, SharedInstance>>,
    resolution_chain: Mutex<Vec<TypeInfo>>,
}

impl ServiceScope {
    /// 作用域标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 作用域创建时间
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 所属的服务提供者
    pub fn provider(&self) -> &Arc<ServiceProvider> {
        &self.provider
    }

    /// 解析接口 `I` 的实例
    ///
    /// `I` 可以是 trait 对象（`dyn Notificator`）或具体类型。
    pub fn resolve<I: ?Sized + 'static>(&self) -> Result<Arc<I>, DependencyError> {
        let registration = self
            .provider
            .registration_for(TypeId::of::<I>())
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: std::any::type_name::<I>().to_string(),
            })?;
        let service = self.materialize(registration)?;
        Self::unwrap_service::<I>(service)
    }

    /// 解析接口 `I` 的全部实现，按注册顺序返回
    pub fn resolve_all<I: ?Sized + 'static>(&self) -> Result<Vec<Arc<I>>, DependencyError> {
        self.provider
            .registrations_for(TypeId::of::<I>())
            .iter()
            .map(|registration| {
                let service = self.materialize(registration)?;
                Self::unwrap_service::<I>(service)
            })
            .collect()
    }

    fn materialize(
        &self,
        registration: &ServiceRegistration,
    ) -> Result<SharedService, DependencyError> {
        let instance = self.instance_for(registration)?;
        (registration.adapt)(instance)
    }

    fn unwrap_service<I: ?Sized + 'static>(
        service: SharedService,
    ) -> Result<Arc<I>, DependencyError> {
        service
            .downcast::<Arc<I>>()
            .map(|boxed| *boxed)
            .map_err(|_| DependencyError::TypeMismatch {
                type_name: std::any::type_name::<I>().to_string(),
            })
    }

    fn instance_for(
        &self,
        registration: &ServiceRegistration,
    ) -> Result<SharedInstance, DependencyError> {
        self.enter(registration)?;
        let result = match registration.lifetime {
            Lifetime::Singleton => {
                self.cached_or_construct(&self.provider.singletons, registration)
            }
            Lifetime::Scoped => self.cached_or_construct(&self.instances, registration),
            Lifetime::Transient => (registration.construct)(self),
        };
        self.exit();
        result
    }

    fn cached_or_construct(
        &self,
        cache: &RwLock<HashMap<TypeId, SharedInstance>>,
        registration: &ServiceRegistration,
    ) -> Result<SharedInstance, DependencyError> {
        if let Some(existing) = cache.read().get(&registration.implementation.id) {
            return Ok(existing.clone());
        }
        // 先构建后加锁：构建过程中组件可以继续在本作用域内解析依赖
        let created = (registration.construct)(self)?;
        let mut guard = cache.write();
        Ok(guard
            .entry(registration.implementation.id)
            .or_insert(created)
            .clone())
    }

    fn enter(&self, registration: &ServiceRegistration) -> Result<(), DependencyError> {
        let mut chain = self.resolution_chain.lock();
        if chain.iter().any(|info| info.id == registration.implementation.id) {
            let mut names: Vec<&str> = chain.iter().map(|info| info.full_name.as_str()).collect();
            names.push(registration.implementation.full_name.as_str());
            return Err(DependencyError::CircularDependency {
                dependency_chain: names.join(" -> "),
            });
        }
        chain.push(registration.implementation.clone());
        Ok(())
    }

    fn exit(&self) {
        self.resolution_chain.lock().pop();
    }
}

impl std::fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceScope")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish()
    }
}
