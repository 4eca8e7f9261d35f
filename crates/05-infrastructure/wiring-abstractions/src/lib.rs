//! # Wiring Abstractions
//!
//! 装配抽象层，定义引擎消费的命名空间树契约以及参数、取值模型。
//!
//! ## 核心接口
//!
//! - [`NamespaceRoot`] / [`Namespace`] - 只读的层级命名空间
//! - [`Constructible`] - 可构造类型（带参数列表）
//! - [`Callable`] - 可调用对象，找到后原样返回
//! - [`Argument`] / [`Signature`] - 参数声明及调用时校验
//! - [`Value`] / [`Instance`] - 绑定过程中流转的动态取值
//! - [`Resolve`] - 引擎自身的接口，供适配器继续解析其他接口
//!
//! ## 内存实现
//!
//! [`MemoryRoot`] 与 [`MemoryNamespace`] 提供基于静态注册的命名空间树。

pub mod adapter;
pub mod argument;
pub mod memory;
pub mod namespace;
pub mod resolve;
pub mod signature;
pub mod value;

pub use adapter::*;
pub use argument::*;
pub use memory::*;
pub use namespace::*;
pub use resolve::*;
pub use signature::*;
pub use value::*;
