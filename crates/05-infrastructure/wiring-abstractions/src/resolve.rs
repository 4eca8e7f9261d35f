//! 引擎自身的接口
//!
//! 适配器可以声明一个 `dyn Resolve` 参数，以便在构造之后继续按当前配置解析其他接口

use crate::value::Value;
use hexwire_common::{Interface, InterfaceInfo, ResolutionError, ResolutionResult};
use std::sync::Arc;

/// 引擎接口所属的端口
pub const RESOLVER_PORT: &str = "hexwire.resolver";

/// 绑定了一份端口配置的解析能力
pub trait Resolve: Send + Sync {
    /// 解析接口，返回动态取值
    fn resolve_interface(&self, interface: &InterfaceInfo) -> ResolutionResult<Value>;
}

impl Interface for dyn Resolve {
    fn info() -> InterfaceInfo {
        InterfaceInfo::new::<dyn Resolve>("Resolve", RESOLVER_PORT)
            .with_description("按当前端口配置继续解析其他接口")
    }
}

impl dyn Resolve {
    /// 解析接口并还原为 `Arc<I>`
    pub fn resolve<I: Interface + ?Sized>(&self) -> ResolutionResult<Arc<I>> {
        let info = I::info();
        let value = self.resolve_interface(&info)?;
        value.downcast::<I>().ok_or_else(|| {
            ResolutionError::type_mismatch(info.name, info.type_name, value.describe())
        })
    }
}
