//! Loading themes from layered JSON documents.

#![cfg(feature = "serde")]

use xkit_style::{ComponentKind, Theme, ThemeColor};

#[test]
fn empty_document_is_stock_theme() {
    assert_eq!(Theme::from_json("{}").unwrap(), Theme::default());
}

#[test]
fn camel_case_keys_override_stock_values() {
    let theme = Theme::from_json(
        r##"{"input": {"caretColor": "#ff0000", "borderRadius": "2px"}, "global": {"color": "#00ff00"}}"##,
    )
    .unwrap();
    assert_eq!(theme.caret_color(ComponentKind::Input), ThemeColor::rgb(255, 0, 0));
    assert_eq!(theme.border_radius(ComponentKind::Input), "2px");
    // Stock values survive the merge.
    assert_eq!(theme.caret(ComponentKind::Input), "_");
    assert_eq!(theme.color(ComponentKind::Button), ThemeColor::rgb(0, 255, 0));
}

#[test]
fn later_layers_win() {
    let theme = Theme::from_json_layers(&[
        r#"{"input": {"caret": "|", "space": "·"}}"#,
        r#"{"input": {"caret": "▏"}}"#,
    ])
    .unwrap();
    assert_eq!(theme.caret(ComponentKind::Input), "▏");
    assert_eq!(theme.space(ComponentKind::Input), "·");
}

#[test]
fn bad_color_is_reported() {
    let err = Theme::from_json(r#"{"input": {"color": "blue-ish"}}"#).unwrap_err();
    assert_eq!(err.layer(), 0);
    assert!(err.to_string().contains("blue-ish"));
}

#[test]
fn malformed_layer_is_identified() {
    let err = Theme::from_json_layers(&["{}", "{not json"]).unwrap_err();
    assert_eq!(err.layer(), 1);
}
