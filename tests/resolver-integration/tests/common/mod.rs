//! 集成测试共用的接口与适配器树
//!
//! 适配器树结构：
//!
//! ```text
//! app
//! ├── adapters
//! │   ├── shapes    { Drawable(radius, color?), Circle(radius) }
//! │   ├── colors    { Color(hex = "#000000") }
//! │   ├── textures  { Texture(pattern) }
//! │   ├── canvas    { Canvas(surface: Texture | Color) }
//! │   ├── gallery   { Gallery(shapes: map<Drawable>) }
//! │   ├── studio    { Studio(resolver: Resolve) }
//! │   ├── greeting  { Greeter(name) }
//! │   ├── brushes   { Brush() 构造总是失败 }
//! │   ├── formatters { formatter(text) }
//! │   ├── ping      { Ping(pong: Pong) }
//! │   └── pong      { Pong(ping: Ping) }
//! ├── palette
//! │   └── colors    { Color(hex = "#ff0000") }
//! └── blank
//!     └── textures  {}
//! ```
//!
//! 备用根 `fixture` 中只有 `fixtures.shapes.Drawable`（边长默认为 3 的正方形）。

#![allow(dead_code)]

use hexwire_abstractions::{
    Annotation, Argument, Callable, ConstructibleType, Instance, MemoryNamespace, MemoryRoot,
    NamespaceRoot, Resolve, Value,
};
use hexwire_common::{Interface, InterfaceInfo, ResolutionResult};
use hexwire_macros::{interface, Interface};
use hexwire_resolver::Resolver;
use serde_json::json;
use std::sync::Arc;

#[interface(port = "app.shapes", description = "可绘制的图形")]
pub trait Drawable: Send + Sync {
    fn area(&self) -> f64;
    fn color(&self) -> Option<String>;
}

#[interface(port = "app.colors")]
pub trait Color: Send + Sync {
    fn hex(&self) -> String;
}

#[interface(port = "app.textures")]
pub trait Texture: Send + Sync {
    fn pattern(&self) -> String;
}

#[interface(port = "app.canvas")]
pub trait Canvas: Send + Sync {
    fn surface(&self) -> &str;
}

#[interface(port = "app.gallery")]
pub trait Gallery: Send + Sync {
    fn areas(&self) -> Vec<(String, f64)>;
}

#[interface(port = "app.studio")]
pub trait Studio: Send + Sync {
    fn sketch(&self) -> ResolutionResult<f64>;
}

#[interface(port = "app.greeting")]
pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

#[interface(port = "app.brushes")]
pub trait Brush: Send + Sync {}

#[interface(port = "app.formatters")]
pub trait Formatter: Send + Sync {}

#[interface(port = "app.ping")]
pub trait Ping: Send + Sync {}

#[interface(port = "app.pong")]
pub trait Pong: Send + Sync {}

/// 以具体类型作为接口，按类名直接查找
#[derive(Debug, Interface)]
#[hexwire(port = "app.shapes")]
pub struct Circle {
    pub radius: f64,
}

struct Round {
    radius: f64,
    color: Option<Arc<dyn Color>>,
}

impl Drawable for Round {
    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    fn color(&self) -> Option<String> {
        self.color.as_ref().map(|color| color.hex())
    }
}

struct Square {
    side: f64,
}

impl Drawable for Square {
    fn area(&self) -> f64 {
        self.side * self.side
    }

    fn color(&self) -> Option<String> {
        None
    }
}

struct Solid(String);

impl Color for Solid {
    fn hex(&self) -> String {
        self.0.clone()
    }
}

struct Striped(String);

impl Texture for Striped {
    fn pattern(&self) -> String {
        self.0.clone()
    }
}

struct PlainCanvas {
    surface: &'static str,
}

impl Canvas for PlainCanvas {
    fn surface(&self) -> &str {
        self.surface
    }
}

struct Wall {
    shapes: std::collections::BTreeMap<String, Arc<dyn Drawable>>,
}

impl Gallery for Wall {
    fn areas(&self) -> Vec<(String, f64)> {
        self.shapes
            .iter()
            .map(|(key, shape)| (key.clone(), shape.area()))
            .collect()
    }
}

struct Sketchbook {
    resolver: Arc<dyn Resolve>,
}

impl Studio for Sketchbook {
    fn sketch(&self) -> ResolutionResult<f64> {
        Ok(self.resolver.resolve::<dyn Drawable>()?.area())
    }
}

struct Polite(String);

impl Greeter for Polite {
    fn greet(&self) -> String {
        format!("Hello, {}", self.0)
    }
}

struct Echo;

impl Ping for Echo {}
impl Pong for Echo {}

fn drawable() -> ConstructibleType {
    ConstructibleType::new(
        "Drawable",
        vec![
            Argument::new("radius", Annotation::Float).with_default(json!(1.0)),
            Argument::new("color", Annotation::optional(Annotation::interface::<dyn Color>())),
        ],
        |args| {
            let shape: Arc<dyn Drawable> = Arc::new(Round {
                radius: args.get("radius")?,
                color: args.get("color")?,
            });
            Ok(Instance::new(shape))
        },
    )
    .expect("Drawable 签名有效")
}

fn circle() -> ConstructibleType {
    ConstructibleType::new(
        "Circle",
        vec![Argument::new("radius", Annotation::Float)],
        |args| {
            Ok(Instance::of(Circle {
                radius: args.get("radius")?,
            }))
        },
    )
    .expect("Circle 签名有效")
}

fn color(default_hex: &str) -> ConstructibleType {
    ConstructibleType::new(
        "Color",
        vec![Argument::new("hex", Annotation::Str).with_default(json!(default_hex))],
        |args| {
            let color: Arc<dyn Color> = Arc::new(Solid(args.get("hex")?));
            Ok(Instance::new(color))
        },
    )
    .expect("Color 签名有效")
}

fn texture() -> ConstructibleType {
    ConstructibleType::new(
        "Texture",
        vec![Argument::new("pattern", Annotation::Str).with_default(json!("stripes"))],
        |args| {
            let texture: Arc<dyn Texture> = Arc::new(Striped(args.get("pattern")?));
            Ok(Instance::new(texture))
        },
    )
    .expect("Texture 签名有效")
}

fn canvas() -> ConstructibleType {
    ConstructibleType::new(
        "Canvas",
        vec![Argument::new(
            "surface",
            Annotation::InterfaceUnion(vec![
                <dyn Texture as Interface>::info(),
                <dyn Color as Interface>::info(),
            ]),
        )],
        |args| {
            let (_, interface): (Value, InterfaceInfo) = args.get("surface")?;
            let canvas: Arc<dyn Canvas> = Arc::new(PlainCanvas {
                surface: interface.name,
            });
            Ok(Instance::new(canvas))
        },
    )
    .expect("Canvas 签名有效")
}

fn gallery() -> ConstructibleType {
    ConstructibleType::new(
        "Gallery",
        vec![Argument::new(
            "shapes",
            Annotation::interface_map::<dyn Drawable>(),
        )],
        |args| {
            let gallery: Arc<dyn Gallery> = Arc::new(Wall {
                shapes: args.get("shapes")?,
            });
            Ok(Instance::new(gallery))
        },
    )
    .expect("Gallery 签名有效")
}

fn studio() -> ConstructibleType {
    ConstructibleType::new(
        "Studio",
        vec![Argument::new(
            "resolver",
            Annotation::interface::<dyn Resolve>(),
        )],
        |args| {
            let studio: Arc<dyn Studio> = Arc::new(Sketchbook {
                resolver: args.get("resolver")?,
            });
            Ok(Instance::new(studio))
        },
    )
    .expect("Studio 签名有效")
}

fn greeter() -> ConstructibleType {
    ConstructibleType::new(
        "Greeter",
        vec![Argument::new("name", Annotation::Str)],
        |args| {
            let greeter: Arc<dyn Greeter> = Arc::new(Polite(args.get("name")?));
            Ok(Instance::new(greeter))
        },
    )
    .expect("Greeter 签名有效")
}

fn brush() -> ConstructibleType {
    ConstructibleType::new("Brush", Vec::new(), |_| Err("墨水用完了".into()))
        .expect("Brush 签名有效")
}

fn formatter() -> Callable {
    Callable::new(
        "formatter",
        vec![Argument::new("text", Annotation::Str)],
        |args| {
            let text: String = args.get("text")?;
            Ok(Value::literal(format!("<{text}>")))
        },
    )
    .expect("formatter 签名有效")
}

fn ping() -> ConstructibleType {
    ConstructibleType::new(
        "Ping",
        vec![Argument::new("pong", Annotation::interface::<dyn Pong>())],
        |_| {
            let ping: Arc<dyn Ping> = Arc::new(Echo);
            Ok(Instance::new(ping))
        },
    )
    .expect("Ping 签名有效")
}

fn pong(with_default: bool) -> ConstructibleType {
    let mut argument = Argument::new("ping", Annotation::interface::<dyn Ping>());
    if with_default {
        argument = argument.with_default(json!(null));
    }
    ConstructibleType::new("Pong", vec![argument], |_| {
        let pong: Arc<dyn Pong> = Arc::new(Echo);
        Ok(Instance::new(pong))
    })
    .expect("Pong 签名有效")
}

fn square() -> ConstructibleType {
    ConstructibleType::new(
        "Drawable",
        vec![Argument::new("side", Annotation::Float).with_default(json!(3.0))],
        |args| {
            let shape: Arc<dyn Drawable> = Arc::new(Square {
                side: args.get("side")?,
            });
            Ok(Instance::new(shape))
        },
    )
    .expect("Square 签名有效")
}

fn namespace(name: &str, items: Vec<ConstructibleType>) -> MemoryNamespace {
    items
        .into_iter()
        .fold(MemoryNamespace::new(name), MemoryNamespace::with_constructible)
}

/// 构建应用的适配器树
///
/// `pong_has_default` 为 `true` 时 `Pong` 的 `ping` 参数带默认值。
pub fn app_tree(pong_has_default: bool) -> MemoryNamespace {
    let adapters = MemoryNamespace::new("adapters")
        .with_namespace(namespace("shapes", vec![drawable(), circle()]))
        .with_namespace(namespace("colors", vec![color("#000000")]))
        .with_namespace(namespace("textures", vec![texture()]))
        .with_namespace(namespace("canvas", vec![canvas()]))
        .with_namespace(namespace("gallery", vec![gallery()]))
        .with_namespace(namespace("studio", vec![studio()]))
        .with_namespace(namespace("greeting", vec![greeter()]))
        .with_namespace(namespace("brushes", vec![brush()]))
        .with_namespace(MemoryNamespace::new("formatters").with_callable(formatter()))
        .with_namespace(namespace("ping", vec![ping()]))
        .with_namespace(namespace("pong", vec![pong(pong_has_default)]));

    MemoryNamespace::new("app")
        .with_namespace(adapters)
        .with_namespace(
            MemoryNamespace::new("palette").with_namespace(namespace("colors", vec![color("#ff0000")])),
        )
        .with_namespace(MemoryNamespace::new("blank").with_namespace(MemoryNamespace::new("textures")))
}

/// 应用根，登记了备用根 `fixture`
pub fn app_root() -> Arc<dyn NamespaceRoot> {
    let fixture = MemoryNamespace::new("fixture")
        .with_path("fixtures.shapes.Drawable", square().into_node())
        .expect("备用树路径有效");

    MemoryRoot::new(app_tree(false))
        .with_alternate("fixture", MemoryRoot::new(fixture))
        .into_shared()
}

/// 以应用根创建解析器
pub fn resolver() -> Resolver {
    Resolver::new(app_root())
}
