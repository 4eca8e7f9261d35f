//! 解析引擎的端到端测试

mod common;

use common::{resolver, Brush, Circle, Drawable, Formatter, Greeter, Studio, Texture};
use hexwire_abstractions::Value;
use hexwire_common::{Interface, ResolutionError};
use hexwire_config::{PortConfiguration, PortsMapping, StructuredConfig};
use std::collections::BTreeMap;
use std::sync::Arc;

#[test]
fn test_concrete_type_resolved_by_class_name() {
    let mapping = PortsMapping::new().with(
        "app.shapes",
        StructuredConfig::new("adapters").with_kwarg("radius", 2.0),
    );

    let circle = resolver().resolve::<Circle>(&mapping).unwrap();
    assert!((circle.radius - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_missing_required_parameter_names_it() {
    let mapping = PortsMapping::new().with("app.greeting", "adapters");

    let error = resolver().resolve::<dyn Greeter>(&mapping).err().unwrap();
    assert!(matches!(
        error,
        ResolutionError::MissingRequiredParameter { ref parameter, ref adapter }
            if parameter == "name" && adapter == "adapters.greeting.Greeter"
    ));
    assert!(error.to_string().contains("name"));
}

#[test]
fn test_plain_path_uses_defaults() {
    let mapping = PortsMapping::new().with("app.shapes", "adapters");

    let shape = resolver().resolve::<dyn Drawable>(&mapping).unwrap();
    assert!((shape.area() - std::f64::consts::PI).abs() < 1e-9);
    // 颜色端口未配置，可空的接口参数取 null
    assert_eq!(shape.color(), None);
}

#[test]
fn test_fanout_yields_one_instance_per_entry() {
    let mapping = PortsMapping::new().with(
        "app.shapes",
        PortConfiguration::fanout(vec![
            PortConfiguration::from(StructuredConfig::new("adapters").with_kwarg("radius", 1.0)),
            PortConfiguration::from(StructuredConfig::new("adapters").with_kwarg("radius", 2.0)),
            PortConfiguration::from(StructuredConfig::new("fixtures").with_root("fixture")),
        ]),
    );

    let shapes = resolver().resolve_all::<dyn Drawable>(&mapping).unwrap();
    let areas: Vec<f64> = shapes.iter().map(|shape| shape.area()).collect();

    assert_eq!(areas.len(), 3);
    assert!((areas[0] - std::f64::consts::PI).abs() < 1e-9);
    assert!((areas[1] - 4.0 * std::f64::consts::PI).abs() < 1e-9);
    assert!((areas[2] - 9.0).abs() < f64::EPSILON);
}

#[test]
fn test_resolving_twice_is_equivalent() {
    let resolver = resolver();
    let mapping = PortsMapping::new().with(
        "app.shapes",
        StructuredConfig::new("adapters").with_kwarg("radius", 1.5),
    );

    let first = resolver.resolve::<dyn Drawable>(&mapping).unwrap();
    let second = resolver.resolve::<dyn Drawable>(&mapping).unwrap();

    assert!((first.area() - second.area()).abs() < f64::EPSILON);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_nested_ports_win_over_outer_mapping() {
    let mapping = PortsMapping::new()
        .with("app.colors", "adapters")
        .with(
            "app.shapes",
            StructuredConfig::new("adapters").with_nested_port("app.colors", "palette"),
        );

    let shape = resolver().resolve::<dyn Drawable>(&mapping).unwrap();
    assert_eq!(shape.color().as_deref(), Some("#ff0000"));

    // 没有嵌套配置时使用外层配置
    let outer_only = PortsMapping::new()
        .with("app.colors", "adapters")
        .with("app.shapes", "adapters");
    let shape = resolver().resolve::<dyn Drawable>(&outer_only).unwrap();
    assert_eq!(shape.color().as_deref(), Some("#000000"));
}

#[test]
fn test_adapter_resolves_further_through_injected_resolver() {
    let mapping = PortsMapping::new()
        .with("app.studio", "adapters")
        .with(
            "app.shapes",
            StructuredConfig::new("adapters").with_kwarg("radius", 1.0),
        );

    let studio = resolver().resolve::<dyn Studio>(&mapping).unwrap();
    let area = studio.sketch().unwrap();
    assert!((area - std::f64::consts::PI).abs() < 1e-9);
}

#[test]
fn test_injected_resolver_sees_only_its_mapping() {
    let mapping = PortsMapping::new().with("app.studio", "adapters");

    let studio = resolver().resolve::<dyn Studio>(&mapping).unwrap();
    assert!(matches!(
        studio.sketch().unwrap_err(),
        ResolutionError::PortNotConfigured { ref port, .. } if port == "app.shapes"
    ));
}

#[test]
fn test_root_override_is_cached_until_reset() {
    let resolver = resolver();
    let mapping = PortsMapping::new().with(
        "app.shapes",
        StructuredConfig::new("fixtures")
            .with_root("fixture")
            .with_kwarg("side", 2.0),
    );

    let shape = resolver.resolve::<dyn Drawable>(&mapping).unwrap();
    assert!((shape.area() - 4.0).abs() < f64::EPSILON);
    assert_eq!(resolver.cached_roots(), vec!["fixture".to_string()]);

    resolver.reset();
    assert!(resolver.cached_roots().is_empty());

    // 清空后仍可再次切换
    assert!(resolver.resolve::<dyn Drawable>(&mapping).is_ok());
}

#[test]
fn test_unknown_root_token() {
    let mapping = PortsMapping::new().with(
        "app.shapes",
        StructuredConfig::new("fixtures").with_root("missing"),
    );

    let error = resolver().resolve::<dyn Drawable>(&mapping).err().unwrap();
    assert!(matches!(error, ResolutionError::AdapterPath { ref path, .. } if path == "missing"));
}

#[test]
fn test_missing_path_segment() {
    let mapping = PortsMapping::new().with("app.shapes", "adapters.nowhere");

    let error = resolver().resolve::<dyn Drawable>(&mapping).err().unwrap();
    assert!(matches!(
        error,
        ResolutionError::AdapterPath { ref path, .. } if path == "adapters.nowhere"
    ));
}

#[test]
fn test_leaf_in_path_is_not_navigable() {
    let mapping = PortsMapping::new().with("app.shapes", "adapters.shapes.Circle");

    let error = resolver().resolve::<dyn Drawable>(&mapping).err().unwrap();
    assert!(matches!(
        error,
        ResolutionError::AdapterPath { ref path, .. } if path == "adapters.shapes.Circle"
    ));
}

#[test]
fn test_adapter_not_found_names_both_candidates() {
    let mapping = PortsMapping::new().with("app.textures", "blank");

    let error = resolver().resolve::<dyn Texture>(&mapping).err().unwrap();
    assert!(matches!(
        error,
        ResolutionError::AdapterNotFound { ref namespace, ref class_name, ref function_name }
            if namespace == "textures" && class_name == "Texture" && function_name == "texture"
    ));
}

#[test]
fn test_mapping_adapter_cannot_select_port_directly() {
    let mapping = PortsMapping::new().with(
        "app.shapes",
        StructuredConfig::mapping([("small".to_string(), PortConfiguration::path("adapters"))]),
    );

    let error = resolver().resolve::<dyn Drawable>(&mapping).err().unwrap();
    assert!(matches!(error, ResolutionError::Configuration { ref port, .. } if port == "app.shapes"));
}

#[test]
fn test_instantiation_failure_is_propagated() {
    let mapping = PortsMapping::new().with("app.brushes", "adapters");

    let error = resolver().resolve::<dyn Brush>(&mapping).err().unwrap();
    match error {
        ResolutionError::Instantiation { adapter, source } => {
            assert_eq!(adapter, "adapters.brushes.Brush");
            assert_eq!(source.to_string(), "墨水用完了");
        }
        other => panic!("期望实例化错误，实际: {other}"),
    }
}

#[test]
fn test_callable_is_returned_without_construction() {
    let mapping = PortsMapping::new().with("app.formatters", "adapters");

    let value = resolver()
        .resolve_value(&<dyn Formatter as Interface>::info(), &mapping)
        .unwrap();
    let callable = value.as_callable().expect("应返回可调用对象");

    assert_eq!(callable.name(), "formatter");
    let output = callable
        .call(vec![Value::literal("hex")], BTreeMap::new())
        .unwrap();
    assert_eq!(output, Value::literal("<hex>"));

    // 可调用对象不能还原为接口实例
    assert!(matches!(
        resolver().resolve::<dyn Formatter>(&mapping).err().unwrap(),
        ResolutionError::TypeMismatch { .. }
    ));
}

#[test]
fn test_literal_type_mismatch_reports_expected_and_actual() {
    let mapping = PortsMapping::new().with(
        "app.shapes",
        StructuredConfig::new("adapters").with_kwarg("radius", "large"),
    );

    let error = resolver().resolve::<Circle>(&mapping).unwrap_err();
    assert!(matches!(
        error,
        ResolutionError::TypeMismatch { ref parameter, ref expected, ref actual }
            if parameter == "radius" && expected == "float" && actual == "string"
    ));
}
