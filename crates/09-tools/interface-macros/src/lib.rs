//! # Interface Macros
//!
//! 这个 crate 提供了声明接口并把它静态关联到端口的过程宏。
//!
//! ## 核心宏
//!
//! - [`interface`] - 标注在 trait 或类型上的接口声明宏
//! - [`Interface`](derive@Interface) - 为类型派生接口实现
//!
//! 生成的代码引用 `hexwire_common` 和 `ctor`，使用方需要依赖这两个 crate。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use hexwire_macros::interface;
//!
//! #[interface(port = "app.shapes", description = "可绘制的图形")]
//! pub trait Drawable: Send + Sync {
//!     fn area(&self) -> f64;
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod interface;
mod utils;

/// 接口声明宏
///
/// 标注在 trait 上时为 `dyn Trait` 实现 `Interface`；标注在结构体或枚举上时为该类型实现。
/// 同时在程序启动时把接口登记到全局接口注册表。
///
/// # 参数
///
/// - `port = "a.b"` - 所属端口（必需）
/// - `name = "Name"` - 接口名称（默认为标识符）
/// - `description = "..."` - 描述
///
/// # 示例
///
/// ```rust,ignore
/// #[interface(port = "app.storage", name = "Store")]
/// pub trait KeyValueStore: Send + Sync {
///     fn get(&self, key: &str) -> Option<String>;
/// }
/// ```
#[proc_macro_attribute]
pub fn interface(args: TokenStream, input: TokenStream) -> TokenStream {
    interface::interface_impl(args, input)
}

/// 接口派生宏
///
/// 参数通过 `#[hexwire(...)]` 辅助属性提供，与 [`interface`] 相同。
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Interface)]
/// #[hexwire(port = "app.shapes")]
/// pub struct Circle {
///     radius: f64,
/// }
/// ```
#[proc_macro_derive(Interface, attributes(hexwire))]
pub fn derive_interface(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    interface::derive_interface_impl(input)
}
