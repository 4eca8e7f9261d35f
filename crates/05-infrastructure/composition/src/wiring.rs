//! 装配上下文

use hexwire_abstractions::{Argument, Value};
use hexwire_common::{find_interface, Interface, ResolutionResult, WiringError, WiringResult};
use hexwire_config::PortsMapping;
use hexwire_resolver::{BoundArguments, Resolver};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// 应用持有的装配上下文
///
/// 组合解析器与启动时确定的端口配置。
#[derive(Debug, Clone)]
pub struct Wiring {
    resolver: Resolver,
    ports: PortsMapping,
}

impl Wiring {
    /// 创建装配上下文
    pub fn new(resolver: Resolver, ports: PortsMapping) -> Self {
        Self { resolver, ports }
    }

    /// 解析器
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// 端口配置
    pub fn ports(&self) -> &PortsMapping {
        &self.ports
    }

    /// 解析接口
    pub fn resolve<I: Interface + ?Sized>(&self) -> ResolutionResult<Arc<I>> {
        self.resolver.resolve::<I>(&self.ports)
    }

    /// 解析接口的所有适配器
    pub fn resolve_all<I: Interface + ?Sized>(&self) -> ResolutionResult<Vec<Arc<I>>> {
        self.resolver.resolve_all::<I>(&self.ports)
    }

    /// 按注册名解析接口，名称可以是 `Name` 或 `port.Name`
    pub fn resolve_named(&self, name: &str) -> WiringResult<Value> {
        let info = find_interface(name).ok_or_else(|| WiringError::InterfaceNotRegistered {
            name: name.to_string(),
        })?;
        debug!("按名称解析接口: {} -> {}", name, info.qualified_name());
        Ok(self.resolver.resolve_value(&info, &self.ports)?)
    }

    /// 按参数声明准备实参
    pub fn bind(
        &self,
        parameters: &[Argument],
        kwargs: &BTreeMap<String, JsonValue>,
    ) -> ResolutionResult<BoundArguments> {
        self.resolver.bind(parameters, kwargs, &self.ports)
    }

    /// 以额外的端口配置覆盖当前配置，得到新的上下文
    ///
    /// 新上下文与当前上下文共享根命名空间缓存。
    pub fn with_overrides(&self, overrides: &PortsMapping) -> Self {
        Self {
            resolver: self.resolver.clone(),
            ports: self.ports.merge(overrides),
        }
    }

    /// 清空根命名空间缓存
    pub fn reset(&self) {
        self.resolver.reset();
    }
}
