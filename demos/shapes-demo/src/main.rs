//! # 图形演示程序
//!
//! 演示如何声明接口、在内存中搭建适配器树，并按配置文件装配和解析接口

use anyhow::{Context, Result};
use clap::Parser;
use hexwire_abstractions::{
    Annotation, Argument, ConstructibleType, Instance, MemoryNamespace, MemoryRoot, NamespaceRoot,
};
use hexwire_composition::{LoggingConfig, WiringBuilder};
use hexwire_macros::interface;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "shapes-demo")]
#[command(about = "hexwire 图形装配演示")]
struct Args {
    /// 端口配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 按名称额外解析一个接口，例如 `Color` 或 `demo.colors.Color`
    #[arg(short, long)]
    interface: Option<String>,

    /// 输出调试日志
    #[arg(long)]
    verbose: bool,
}

/// 可绘制的图形
#[interface(port = "demo.shapes", description = "可绘制的图形")]
pub trait Drawable: Send + Sync {
    /// 名称
    fn name(&self) -> String;
    /// 面积
    fn area(&self) -> f64;
}

/// 颜色
#[interface(port = "demo.colors")]
pub trait Color: Send + Sync {
    /// 十六进制颜色值
    fn hex(&self) -> String;
}

/// 画布
#[interface(port = "demo.canvas")]
pub trait Canvas: Send + Sync {
    /// 渲染所有图形
    fn render(&self) -> Vec<String>;
}

struct Circle {
    radius: f64,
    color: Option<Arc<dyn Color>>,
}

impl Drawable for Circle {
    fn name(&self) -> String {
        match &self.color {
            Some(color) => format!("circle({})", color.hex()),
            None => "circle".to_string(),
        }
    }

    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

struct Square {
    side: f64,
}

impl Drawable for Square {
    fn name(&self) -> String {
        "square".to_string()
    }

    fn area(&self) -> f64 {
        self.side * self.side
    }
}

struct Solid(String);

impl Color for Solid {
    fn hex(&self) -> String {
        self.0.clone()
    }
}

struct Sheet {
    title: String,
    shapes: Vec<Arc<dyn Drawable>>,
}

impl Canvas for Sheet {
    fn render(&self) -> Vec<String> {
        self.shapes
            .iter()
            .map(|shape| format!("[{}] {} 面积 {:.2}", self.title, shape.name(), shape.area()))
            .collect()
    }
}

/// 搭建适配器树
///
/// ```text
/// demo.adapters
/// ├── shapes.Drawable            圆形
/// ├── extra.shapes.drawable.Drawable  正方形（位于同名子命名空间）
/// ├── colors.Color
/// └── canvas.Canvas
/// ```
fn build_root() -> Result<Arc<dyn NamespaceRoot>> {
    let circle = ConstructibleType::new(
        "Drawable",
        vec![
            Argument::new("radius", Annotation::Float).with_default(json!(1.0)),
            Argument::new("color", Annotation::optional(Annotation::interface::<dyn Color>())),
        ],
        |args| {
            let shape: Arc<dyn Drawable> = Arc::new(Circle {
                radius: args.get("radius")?,
                color: args.get("color")?,
            });
            Ok(Instance::new(shape))
        },
    )?
    .with_description("圆形");

    let square = ConstructibleType::new(
        "Drawable",
        vec![Argument::new("side", Annotation::Float)],
        |args| {
            let shape: Arc<dyn Drawable> = Arc::new(Square {
                side: args.get("side")?,
            });
            Ok(Instance::new(shape))
        },
    )?
    .with_description("正方形");

    let color = ConstructibleType::new(
        "Color",
        vec![Argument::new("hex", Annotation::Str).with_default(json!("#000000"))],
        |args| {
            let color: Arc<dyn Color> = Arc::new(Solid(args.get("hex")?));
            Ok(Instance::new(color))
        },
    )?;

    let canvas = ConstructibleType::new(
        "Canvas",
        vec![
            Argument::new("title", Annotation::Str),
            Argument::new("shapes", Annotation::interface::<dyn Drawable>()),
        ],
        |args| {
            let canvas: Arc<dyn Canvas> = Arc::new(Sheet {
                title: args.get("title")?,
                shapes: args.get("shapes")?,
            });
            Ok(Instance::new(canvas))
        },
    )?;

    let tree = MemoryNamespace::new("demo")
        .with_path("adapters.shapes.Drawable", circle.into_node())?
        .with_path("adapters.extra.shapes.drawable.Drawable", square.into_node())?
        .with_path("adapters.colors.Color", color.into_node())?
        .with_path("adapters.canvas.Canvas", canvas.into_node())?;

    Ok(MemoryRoot::new(tree).into_shared())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = args
        .config
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/config/ports.toml")));
    let logging = if args.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::default()
    };

    let wiring = WiringBuilder::new()
        .with_root(build_root()?)
        .add_config_file(&config)
        .with_env_prefix("SHAPES_DEMO")
        .with_logging(logging)
        .build()
        .with_context(|| format!("无法按配置文件装配: {}", config.display()))?;

    info!("已加载 {} 个端口", wiring.ports().len());

    let canvas = wiring.resolve::<dyn Canvas>()?;
    for line in canvas.render() {
        println!("{line}");
    }

    let total: f64 = wiring
        .resolve_all::<dyn Drawable>()?
        .iter()
        .map(|shape| shape.area())
        .sum();
    println!("总面积 {total:.2}");

    if let Some(name) = args.interface {
        let value = wiring.resolve_named(&name)?;
        println!("{name} -> {}", value.describe());
    }

    Ok(())
}
