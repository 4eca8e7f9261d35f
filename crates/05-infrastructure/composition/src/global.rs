//! 进程级装配上下文
//!
//! 应用通常直接持有 [`Wiring`]；只有无法传递上下文的场景才需要全局槽位。

use crate::wiring::Wiring;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

static GLOBAL_WIRING: Lazy<RwLock<Option<Arc<Wiring>>>> = Lazy::new(|| RwLock::new(None));

/// 安装全局装配上下文，返回之前安装的上下文
pub fn install_global(wiring: Wiring) -> Option<Arc<Wiring>> {
    info!("安装全局装配上下文: {} 个端口", wiring.ports().len());
    GLOBAL_WIRING.write().replace(Arc::new(wiring))
}

/// 获取全局装配上下文
pub fn global_wiring() -> Option<Arc<Wiring>> {
    GLOBAL_WIRING.read().clone()
}

/// 移除全局装配上下文，同时清空其根命名空间缓存
pub fn clear_global() -> Option<Arc<Wiring>> {
    let previous = GLOBAL_WIRING.write().take();
    if let Some(wiring) = &previous {
        wiring.reset();
    }
    previous
}
