//! Layout descriptions and options loaded from JSON.
#![cfg(feature = "serde")]

use std::num::NonZeroUsize;

use gridline_layout::{
    compute_layout, LayoutDescription, LayoutOptions, SectionDescription, SectionMetrics, SectionStyle, Size,
    SupplementaryItem,
};

#[test]
fn test_options_fill_missing_fields_with_defaults() {
    let options: LayoutOptions = serde_json::from_str(r#"{ "hairline": 0.5 }"#).unwrap();
    assert_eq!(options.hairline, 0.5);
    assert_eq!(options.theme, LayoutOptions::default().theme);
}

#[test]
fn test_description_survives_json() {
    let metrics = SectionMetrics::default()
        .with_number_of_columns(NonZeroUsize::new(2).unwrap())
        .with_row_height(Some(40.0))
        .with_shows_row_separator(true);
    let description = LayoutDescription::new(Size::new(320.0, 480.0))
        .with_section(
            SectionDescription::new(0, metrics.clone())
                .with_items(5)
                .with_supplementary_item(SupplementaryItem::header().with_height(30.0).pinned()),
        )
        .with_section(SectionDescription::new(1, metrics).with_style(SectionStyle::Table).with_items(2));

    let json = serde_json::to_string(&description).unwrap();
    let decoded: LayoutDescription = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, description);

    let options = LayoutOptions::default();
    let original = compute_layout(&description, &options, None).unwrap();
    let reloaded = compute_layout(&decoded, &options, None).unwrap();
    assert_eq!(original.content_size(), reloaded.content_size());
}

#[test]
fn test_metrics_keep_undefined_values_undefined() {
    let metrics = SectionMetrics::default().with_row_spacing(8.0);
    let json = serde_json::to_value(&metrics).unwrap();
    let decoded: SectionMetrics = serde_json::from_value(json).unwrap();

    assert!(decoded.defines_metric(gridline_layout::Metric::RowSpacing));
    assert!(!decoded.defines_metric(gridline_layout::Metric::RowHeight));
    assert_eq!(decoded.row_spacing(), 8.0);
}

#[test]
fn test_automatic_row_height_stays_defined() {
    let metrics = SectionMetrics::default().with_row_height(None);
    let json = serde_json::to_string(&metrics).unwrap();
    let decoded: SectionMetrics = serde_json::from_str(&json).unwrap();

    assert!(decoded.defines_metric(gridline_layout::Metric::RowHeight));
    assert_eq!(decoded.row_height(), None);

    // A defined automatic height still wins over the parent's fixed one.
    let mut child = decoded;
    child.inherit_from(&SectionMetrics::default().with_row_height(Some(44.0)));
    assert_eq!(child.row_height(), None);
}

#[test]
fn test_missing_metrics_load_as_undefined() {
    let decoded: SectionMetrics = serde_json::from_str(r#"{ "row_spacing": 4.0, "separator_color": null }"#).unwrap();

    assert_eq!(decoded.row_spacing(), 4.0);
    assert!(decoded.defines_metric(gridline_layout::Metric::SeparatorColor));
    assert!(!decoded.defines_metric(gridline_layout::Metric::Padding));
    assert_eq!(decoded.separator_insets, gridline_layout::EdgeInsets::ZERO);
}
