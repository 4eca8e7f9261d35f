//! 接口声明宏的集成测试
//!
//! 验证宏生成的 `Interface` 实现以及启动时的自动注册

use hexwire_common::{find_interface, registered_interfaces, Interface, InterfaceInfo};
use hexwire_macros::{interface, Interface};

#[interface(port = "itest.shapes", description = "可绘制的图形")]
pub trait Drawable: Send + Sync {
    fn area(&self) -> f64;
}

#[interface(port = "itest.colors", name = "Palette")]
pub trait ColorSource: Send + Sync {
    fn colors(&self) -> Vec<String>;
}

#[derive(Debug, Interface)]
#[hexwire(port = "itest.storage.blobs")]
pub struct BlobStore {
    bucket: String,
}

#[test]
fn test_trait_interface_info() {
    let info = <dyn Drawable as Interface>::info();

    assert_eq!(info.name, "Drawable");
    assert_eq!(info.port, "itest.shapes");
    assert_eq!(info.description, Some("可绘制的图形"));
    assert_eq!(info.snake_name(), "drawable");
    assert!(info.is::<dyn Drawable>());
}

#[test]
fn test_custom_name() {
    let info = InterfaceInfo::of::<dyn ColorSource>();

    assert_eq!(info.name, "Palette");
    assert_eq!(info.qualified_name(), "itest.colors.Palette");
    assert_eq!(info.description, None);
}

#[test]
fn test_derive_on_struct() {
    let info = BlobStore::info();
    let store = BlobStore {
        bucket: "images".to_string(),
    };

    assert_eq!(store.bucket, "images");
    assert_eq!(info.name, "BlobStore");
    assert_eq!(info.port().leaf(), "blobs");
    assert!(info.is::<BlobStore>());
}

#[test]
fn test_interfaces_registered_at_startup() {
    let drawable = find_interface("itest.shapes.Drawable").expect("限定名应已注册");
    assert_eq!(drawable, <dyn Drawable as Interface>::info());

    // 短名称唯一时也能找到
    let palette = find_interface("Palette").expect("短名称应已注册");
    assert_eq!(palette.port, "itest.colors");

    let names: Vec<String> = registered_interfaces()
        .iter()
        .map(InterfaceInfo::qualified_name)
        .collect();
    assert!(names.contains(&"itest.storage.blobs.BlobStore".to_string()));
}
