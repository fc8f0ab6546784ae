//! 注册器
//!
//! 把分类产生的类型描述符写入服务集合。每个进程启动只执行一次。
//! 同一接口被多个实现绑定不是错误：发现顺序不影响正确性，只决定
//! 冲突时哪个实现胜出（见容器的最后注册者胜出语义）。

use crate::container::{ServiceCollection, ServiceRegistration};
use crate::descriptor::TypeDescriptor;
use tracing::{debug, info};

/// 注册器
#[derive(Debug, Default)]
pub struct Registrar;

impl Registrar {
    /// 创建新的注册器
    pub fn new() -> Self {
        Self
    }

    /// 注册单个描述符的全部接口绑定
    ///
    /// 惰性描述符（接口集合为空）不产生任何注册，这不是错误。
    pub fn register(&self, descriptor: &TypeDescriptor, services: &mut ServiceCollection) {
        if descriptor.registrations.is_empty() {
            debug!(
                "类型 {} 分类完成但没有接口绑定，跳过注册",
                descriptor.type_info
            );
            return;
        }

        for binding in &descriptor.registrations {
            info!(
                "注册组件: {} -> {} ({})",
                binding.interface.name, descriptor.type_info, descriptor.lifetime
            );
            services.add(ServiceRegistration {
                interface: binding.interface.clone(),
                implementation: descriptor.type_info.clone(),
                lifetime: descriptor.lifetime,
                construct: descriptor.construct.clone(),
                adapt: binding.adapt.clone(),
            });
        }
    }

    /// 注册一组描述符
    pub fn register_all(&self, descriptors: &[TypeDescriptor], services: &mut ServiceCollection) {
        for descriptor in descriptors {
            self.register(descriptor, services);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{InstanceFactory, SharedInstance, TypeDescriptor};
    use sentry_common::{Lifetime, TypeInfo};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Inert;

    #[test]
    fn inert_descriptor_produces_no_registration() {
        let construct: InstanceFactory = Arc::new(|_| Ok(Arc::new(Inert) as SharedInstance));
        let descriptor = TypeDescriptor {
            type_info: TypeInfo::of::<Inert>(),
            lifetime: Lifetime::Scoped,
            construct,
            registrations: Vec::new(),
        };

        let mut services = ServiceCollection::new();
        Registrar::new().register(&descriptor, &mut services);

        assert!(services.is_empty());
    }
}
