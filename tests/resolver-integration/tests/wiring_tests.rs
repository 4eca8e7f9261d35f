//! 从配置文件装配并解析的端到端测试

mod common;

use anyhow::Result;
use common::{app_root, Canvas, Drawable, Greeter};
use hexwire_abstractions::{Annotation, Argument, Value};
use hexwire_common::{ResolutionError, WiringError};
use hexwire_composition::{clear_global, global_wiring, install_global, WiringBuilder};
use hexwire_config::{PortConfiguration, PortsMapping, StructuredConfig};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Write;

fn config_file(suffix: &str, content: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_toml_configuration_end_to_end() -> Result<()> {
    let file = config_file(
        ".toml",
        r##"
[ports]
"app.canvas" = "adapters"
"app.colors" = { adapter = "adapters", kwargs = { hex = "#00ff00" } }
"app.greeting" = { adapter = "adapters", kwargs = { name = "Ada" } }

[ports."app.shapes"]
adapter = "adapters"
kwargs = { radius = 2.0 }
ports = { "app.colors" = "palette" }
"##,
    )?;

    let wiring = WiringBuilder::new()
        .with_root(app_root())
        .add_config_file(file.path())
        .build()?;

    let shape = wiring.resolve::<dyn Drawable>()?;
    assert!((shape.area() - 4.0 * std::f64::consts::PI).abs() < 1e-9);
    assert_eq!(shape.color().as_deref(), Some("#ff0000"));

    assert_eq!(wiring.resolve::<dyn Greeter>()?.greet(), "Hello, Ada");
    assert_eq!(wiring.resolve::<dyn Canvas>()?.surface(), "Color");
    Ok(())
}

#[test]
fn test_yaml_fanout_and_code_override() -> Result<()> {
    let file = config_file(
        ".yaml",
        r"
ports:
  app.shapes:
    - adapters
    - adapter: fixtures
      root: fixture
      kwargs:
        side: 5
",
    )?;

    let wiring = WiringBuilder::new()
        .with_root(app_root())
        .add_config_file(file.path())
        .build()?;
    let areas: Vec<f64> = wiring
        .resolve_all::<dyn Drawable>()?
        .iter()
        .map(|shape| shape.area())
        .collect();
    assert_eq!(areas.len(), 2);
    assert!((areas[1] - 25.0).abs() < f64::EPSILON);

    // 代码中添加的端口覆盖文件中的同名端口
    let wiring = WiringBuilder::new()
        .with_root(app_root())
        .add_config_file(file.path())
        .with_port(
            "app.shapes",
            StructuredConfig::new("adapters").with_kwarg("radius", 1.0),
        )
        .build()?;
    assert_eq!(wiring.resolve_all::<dyn Drawable>()?.len(), 1);
    Ok(())
}

#[test]
fn test_invalid_shape_in_file_is_a_config_error() -> Result<()> {
    let file = config_file(".json", r#"{ "ports": { "app.shapes": 42 } }"#)?;

    let error = WiringBuilder::new()
        .with_root(app_root())
        .add_config_file(file.path())
        .build()
        .unwrap_err();
    assert!(matches!(error, WiringError::ConfigError { .. }));
    Ok(())
}

#[test]
fn test_resolve_named_and_overrides() -> Result<()> {
    let wiring = WiringBuilder::new()
        .with_root(app_root())
        .with_port("app.greeting", StructuredConfig::new("adapters").with_kwarg("name", "Lin"))
        .build()?;

    let value = wiring.resolve_named("app.greeting.Greeter")?;
    let greeter = value.downcast::<dyn Greeter>().expect("应为 Greeter 实例");
    assert_eq!(greeter.greet(), "Hello, Lin");

    let overridden = wiring.with_overrides(
        &PortsMapping::new().with("app.greeting", PortConfiguration::path("adapters")),
    );
    let error = overridden.resolve::<dyn Greeter>().err().unwrap();
    assert!(matches!(error, ResolutionError::MissingRequiredParameter { .. }));

    // 原上下文不受影响
    assert!(wiring.resolve::<dyn Greeter>().is_ok());
    Ok(())
}

#[test]
fn test_bind_through_wiring() -> Result<()> {
    let wiring = WiringBuilder::new()
        .with_root(app_root())
        .with_port("app.colors", "adapters")
        .build()?;

    let parameters = vec![
        Argument::new("title", Annotation::Str),
        Argument::new("color", Annotation::interface::<dyn common::Color>()).keyword_only(),
        Argument::new("extra", Annotation::Any).var_keyword(),
    ];
    let mut kwargs = BTreeMap::new();
    kwargs.insert("title".to_string(), json!("sunset"));
    kwargs.insert("extra".to_string(), json!({ "dpi": 300 }));

    let bound = wiring.bind(&parameters, &kwargs)?;
    assert_eq!(bound.positional, vec![Value::literal("sunset")]);
    let color = bound.keyword["color"]
        .downcast::<dyn common::Color>()
        .expect("应为 Color 实例");
    assert_eq!(color.hex(), "#000000");
    assert_eq!(bound.keyword.get("dpi"), Some(&Value::literal(300)));
    Ok(())
}

#[test]
fn test_global_wiring_slot() -> Result<()> {
    let wiring = WiringBuilder::new()
        .with_root(app_root())
        .with_port("app.shapes", "adapters")
        .build()?;

    install_global(wiring);
    let installed = global_wiring().expect("应已安装全局装配上下文");
    assert!(installed.resolve::<dyn Drawable>().is_ok());

    clear_global();
    assert!(global_wiring().is_none());
    Ok(())
}
