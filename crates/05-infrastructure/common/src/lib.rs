//! # hexwire Common
//!
//! 这个 crate 提供了端口/适配器装配引擎的公共类型和工具。
//!
//! ## 核心组件
//!
//! - [`Interface`] - 接口标记 trait，静态关联到所属端口
//! - [`InterfaceInfo`] - 接口元数据
//! - [`Port`] - 端口（能力分组）标识
//! - [`ResolutionError`] - 解析错误分类
//! - [`naming`] - 命名约定（类名 → 函数名）
//!
//! ## 设计原则
//!
//! - 接口通过显式标记声明，而不是运行时探测
//! - 端口与接口的关联是静态的，与配置无关
//! - 全局状态必须显式加锁

pub mod errors;
pub mod metadata;
pub mod naming;

pub use errors::*;
pub use metadata::*;

use dashmap::DashMap;
use tracing::debug;

/// 全局接口注册表
///
/// 键为限定名 `port.Name`
static GLOBAL_INTERFACE_REGISTRY: once_cell::sync::Lazy<DashMap<String, InterfaceInfo>> =
    once_cell::sync::Lazy::new(DashMap::new);

/// 注册接口
///
/// 通常由 `#[interface]` 宏在程序启动时自动调用。重复注册同一接口是幂等的。
pub fn register_interface(info: InterfaceInfo) {
    debug!("注册接口: {}", info.qualified_name());
    GLOBAL_INTERFACE_REGISTRY.insert(info.qualified_name(), info);
}

/// 按名称查找已注册的接口
///
/// 既接受限定名 `port.Name`，也接受短名称 `Name`；短名称在多个端口下重名时返回 `None`。
pub fn find_interface(name: &str) -> Option<InterfaceInfo> {
    if let Some(info) = GLOBAL_INTERFACE_REGISTRY.get(name) {
        return Some(*info);
    }

    let mut matches = GLOBAL_INTERFACE_REGISTRY
        .iter()
        .filter(|entry| entry.value().name == name)
        .map(|entry| *entry.value());
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(first)
}

/// 获取所有已注册的接口，按限定名排序
pub fn registered_interfaces() -> Vec<InterfaceInfo> {
    let mut interfaces: Vec<InterfaceInfo> = GLOBAL_INTERFACE_REGISTRY
        .iter()
        .map(|entry| *entry.value())
        .collect();
    interfaces.sort_by_key(InterfaceInfo::qualified_name);
    interfaces
}
