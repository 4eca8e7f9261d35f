//! # hexwire Config
//!
//! 端口配置模型与加载。
//!
//! ## 配置形态
//!
//! 每个端口对应一项 [`PortConfiguration`]：
//!
//! - 字符串：适配器所在的命名空间路径
//! - 表：`adapter`（路径或接口映射）、`kwargs`、`ports`、`root`
//! - 数组：扇出，每一项各解析出一个适配器
//!
//! ```toml
//! [ports]
//! "app.shapes" = { adapter = "adapters", kwargs = { radius = 2.0 } }
//! "app.storage" = ["adapters.memory", "adapters.disk"]
//! ```

pub mod model;
pub mod parse;
pub mod providers;

pub use model::*;
pub use providers::*;
