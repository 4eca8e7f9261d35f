//! # hexwire Resolver
//!
//! 给定接口与端口配置，定位、构造并返回具体的适配器，递归满足其构造参数。
//!
//! ## 解析流程
//!
//! 1. 由接口元数据得到所属端口，从端口映射中取出配置
//! 2. [`path`] 沿适配器路径和端口名最后一段找到命名空间
//! 3. [`finder`] 在命名空间中按类名或函数名找到适配器
//! 4. [`binder`] 按参数声明为构造函数准备实参，接口类参数递归解析
//! 5. 调用构造函数，得到实例

pub mod binder;
pub mod engine;
pub mod finder;
pub mod options;
pub mod path;

pub use binder::BoundArguments;
pub use engine::Resolver;
pub use finder::{find_adapter, FoundAdapter};
pub use options::ResolverOptions;
pub use path::{resolve_adapter_namespace, AdapterNamespace, RootCache};
