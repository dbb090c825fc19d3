use super::*;
use crate::foundation::core::Size;
use crate::foundation::error::ErrorKind;
use crate::layout::config::FitMode;
use crate::render::surface::Surface;

const JSON: &str = r#"{
  "resize": {"fit": "cover", "width": 8, "height": 8},
  "ops": [{"blur": {"sigma": 2}}, {"filter": {"brightness": 1.2}}]
}"#;

#[test]
fn parses_resize_then_ops() {
    let r = Recipe::from_json_str(JSON).unwrap();
    assert_eq!(r.resize.as_ref().map(ResizeConfig::mode), Some(FitMode::Cover));
    let ops = r.operations();
    assert_eq!(ops.len(), 3);
    assert!(matches!(ops[0], Operation::Resize(_)));
    assert_eq!(ops[1], Operation::Blur(BlurOpts::new(2.0)));
}

#[test]
fn empty_recipe_is_valid() {
    let r = Recipe::from_json_str("{}").unwrap();
    assert_eq!(r, Recipe::default());
    assert!(r.operations().is_empty());
}

#[test]
fn invalid_recipes_are_config_errors() {
    for bad in [
        r#"{"resize": {"fit": "cover", "width": 0, "height": 8}}"#,
        r#"{"ops": [{"sharpen": {}}]}"#,
        r#"{"extra": 1}"#,
        "not json",
    ] {
        let err = Recipe::from_json_str(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "{bad}");
    }
}

#[test]
fn from_path_reports_missing_file() {
    let err = Recipe::from_path("/definitely/missing/recipe.json").unwrap_err();
    assert!(err.to_string().contains("recipe.json"));
}

#[test]
fn recipe_builds_realizable_pipeline() {
    let r = Recipe::from_json_str(JSON).unwrap();
    let mut p = r.pipeline(Surface::new(16, 4).unwrap()).unwrap();
    let out = p.realize().unwrap();
    assert_eq!(out.surface.size(), Size::new(8, 8));
    assert_eq!(out.filter, "blur(2px) brightness(1.2)");
}

#[test]
fn applying_twice_hits_resize_guard() {
    let r = Recipe::from_json_str(JSON).unwrap();
    let mut p = r.pipeline(Surface::new(4, 4).unwrap()).unwrap();
    let err = r.apply_to(&mut p).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[test]
fn serializes_back_to_equivalent_json() {
    let r = Recipe::from_json_str(JSON).unwrap();
    let text = serde_json::to_string(&r).unwrap();
    assert_eq!(Recipe::from_json_str(&text).unwrap(), r);
}
