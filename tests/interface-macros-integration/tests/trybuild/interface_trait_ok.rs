use hexwire_common::{Interface, InterfaceInfo};
use hexwire_macros::interface;

#[interface(port = "app.shapes", description = "可绘制的图形")]
pub trait Drawable: Send + Sync {
    fn area(&self) -> f64;
}

#[interface(port = "app.colors", name = "Palette")]
pub struct ColorPalette {
    pub colors: Vec<String>,
}

fn main() {
    let info: InterfaceInfo = <dyn Drawable as Interface>::info();
    assert_eq!(info.name, "Drawable");
    assert_eq!(info.port, "app.shapes");

    let palette = ColorPalette::info();
    assert_eq!(palette.name, "Palette");
    assert!(palette.is::<ColorPalette>());
}
