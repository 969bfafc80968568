//! Sectioned layout for scrolling collections.
//!
//! This crate computes the geometry of a vertically scrolling collection
//! split into sections. Each section stacks headers, a grid or table of
//! cells with optional auxiliary columns, and footers.
//!
//! # Architecture
//!
//! 1. **Description**: a `LayoutDescription` lists sections, item counts,
//!    metrics and supplementary items, validated up front
//! 2. **Build**: each section is laid out by the builder of its
//!    `SectionStyle`, then `LayoutInfo::finalize_layout` settles separators
//! 3. **Incremental updates**: measured sizes are applied with `set_size_*`,
//!    scroll offsets with `update_pinning`
//!
//! # Example
//!
//! ```ignore
//! use gridline_layout::{compute_layout, LayoutDescription, LayoutOptions, SectionDescription, SectionMetrics};
//!
//! let description = LayoutDescription::new(Size::new(320.0, 480.0))
//!     .with_section(SectionDescription::new(0, SectionMetrics::default()).with_items(10));
//! let layout = compute_layout(&description, &LayoutOptions::default(), None)?;
//!
//! for attributes in layout.layout_attributes_in_rect(Rect::new(0.0, 0.0, 320.0, 480.0)) {
//!     println!("{:?}: {:?}", attributes.index_path, attributes.frame);
//! }
//! ```

mod attributes;
mod builder;
mod compose;
mod container;
mod description;
mod measure;
mod metrics;
mod options;
mod pinning;
mod placement;
mod resize;
mod section;

pub use attributes::{ElementCategory, LayoutAttributes};
pub use builder::{
    compute_layout, GridSectionBuilder, LayoutBuilder, SectionBuilder, SectionStyle, SectionedLayoutBuilder,
    TableSectionBuilder,
};
pub use compose::{
    ComposedMetrics, DataSourceSectionMetrics, SectionList, SectionMapping, SectionMetricsSource, SectionRangeMapping,
};
pub use container::LayoutInfo;
pub use description::{LayoutBounds, LayoutDescription, LayoutPlaceholder, SectionDescription, SupplementaryItem};
pub use measure::{LayoutMeasuring, Sizing};
pub use metrics::{BackgroundAttributes, Metric, SectionMetrics, SupplementaryKind, SupplementaryOrdering};
pub use options::{LayoutOptions, Theme};
pub use placement::ColumnGrid;
pub use section::{
    LayoutDecoration, LayoutItem, LayoutRow, LayoutSection, LayoutSupplementaryItem, SECTION_SEPARATOR_BOTTOM,
    SECTION_SEPARATOR_TOP,
};

pub use gridline_core::{
    kinds, z_index, Color, ConfigError, EdgeInsets, IndexPath, ItemLayoutOrder, LayoutError, Point, Rect,
    SectionIndex, Size,
};
