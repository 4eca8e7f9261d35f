//! # 装配组合层
//!
//! 把命名空间树、端口配置和解析器组合成应用持有的装配上下文。
//!
//! ## 主要功能
//!
//! - **装配构建器**: 使用构建者模式组合根命名空间、配置文件、环境变量和代码中的端口配置
//! - **日志初始化**: 按需初始化 tracing 订阅者
//! - **装配上下文**: 按接口类型或注册名解析适配器
//! - **全局槽位**: 可选的进程级装配上下文
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use hexwire_abstractions::{MemoryNamespace, MemoryRoot};
//! use hexwire_composition::WiringBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let root = MemoryRoot::new(MemoryNamespace::new("app"));
//!
//!     let wiring = WiringBuilder::new()
//!         .with_root(root.into_shared())
//!         .add_config_file("config/ports.toml")
//!         .with_env_prefix("HEXWIRE")
//!         .build()?;
//!
//!     println!("已配置 {} 个端口", wiring.ports().len());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod global;
pub mod wiring;

// 重新导出主要类型
pub use builder::{LoggingConfig, WiringBuilder, RESOLVER_OPTIONS_SECTION};
pub use global::{clear_global, global_wiring, install_global};
pub use wiring::Wiring;
