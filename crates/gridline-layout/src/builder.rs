//! Section and layout builders.
//!
//! A section is built top to bottom in one pass: headers, then either the
//! placeholder or the rows of cells, then footers. Grid sections add
//! auxiliary columns beside the cells. `SectionedLayoutBuilder` stacks the
//! sections into a `LayoutInfo` and finalizes it.

use gridline_core::{LayoutError, Point, Rect};

use crate::container::LayoutInfo;
use crate::description::{LayoutBounds, LayoutDescription, SectionDescription};
use crate::measure::{LayoutMeasuring, Sizing};
use crate::metrics::{SectionMetrics, SupplementaryKind};
use crate::options::LayoutOptions;
use crate::placement::{ColumnGrid, RowPlacement};
use crate::section::{LayoutSection, LayoutSupplementaryItem};

/// How a section arranges its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionStyle {
    /// Columns with interitem spacing, row spacing and auxiliary columns
    #[default]
    Grid,
    /// Evenly divided columns, no spacing
    Table,
}

impl SectionStyle {
    pub fn builder(self) -> &'static dyn SectionBuilder {
        match self {
            SectionStyle::Grid => &GridSectionBuilder,
            SectionStyle::Table => &TableSectionBuilder,
        }
    }
}

/// Builds the geometry of one section.
pub trait SectionBuilder {
    fn make_section(
        &self,
        description: &SectionDescription,
        bounds: LayoutBounds,
        options: &LayoutOptions,
        sizing: &mut Sizing<'_>,
    ) -> LayoutSection;
}

/// Builds a complete layout from a description.
pub trait LayoutBuilder {
    fn make_layout_info(
        &self,
        description: &LayoutDescription,
        origin: Point,
        sizing: &mut Sizing<'_>,
    ) -> Result<LayoutInfo, LayoutError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GridSectionBuilder;

#[derive(Debug, Clone, Copy, Default)]
pub struct TableSectionBuilder;

impl SectionBuilder for GridSectionBuilder {
    fn make_section(
        &self,
        description: &SectionDescription,
        bounds: LayoutBounds,
        options: &LayoutOptions,
        sizing: &mut Sizing<'_>,
    ) -> LayoutSection {
        let Some(metrics) = resolved_metrics(description, options) else {
            return empty_section(description, bounds, options);
        };

        let origin = bounds.origin;
        let width = bounds.width;
        let padding = metrics.padding();
        let left_width = metrics.left_auxiliary_column_width();
        let right_width = metrics.right_auxiliary_column_width();
        let aux_spacing = metrics.auxiliary_column_spacing();

        let mut section = LayoutSection::new(
            description.section_index,
            SectionStyle::Grid,
            metrics,
            bounds,
            options.hairline,
        );
        section.number_of_items = description.number_of_items;

        let header_stack = SupplementaryStack::new(origin.x, width);
        let content_top =
            header_stack.place(&mut section, description, SupplementaryKind::Header, origin.y, sizing);

        let cell_x = origin.x + left_width + padding.left;
        let cell_width = (width - left_width - right_width - padding.horizontal()).max(0.0);
        section.grid = ColumnGrid::new(cell_x, cell_width, &section.metrics);

        let placement = RowPlacement::new(section.section_index, section.grid, &section.metrics, options.hairline)
            .with_phantom_cell(
                description
                    .phantom_cell_index
                    .map(|index| (index, description.phantom_cell_size)),
            )
            .with_dragged_item(description.dragged_item_index);
        let cells_bottom = place_content(&mut section, description, &placement, content_top, sizing);

        let left_bottom = SupplementaryStack::new(origin.x, left_width)
            .with_spacing(aux_spacing)
            .place(&mut section, description, SupplementaryKind::LeftAuxiliary, content_top, sizing);
        let right_bottom = SupplementaryStack::new(origin.x + width - right_width, right_width)
            .with_spacing(aux_spacing)
            .place(&mut section, description, SupplementaryKind::RightAuxiliary, content_top, sizing);

        let content_bottom = cells_bottom.max(left_bottom).max(right_bottom);
        section.content_frame = Rect::new(origin.x, content_top, width, content_bottom - content_top);

        let bottom = header_stack.place(&mut section, description, SupplementaryKind::Footer, content_bottom, sizing);
        section.frame.height = bottom - origin.y;

        section.update_column_separators();
        section.update_backgrounds();

        log::debug!(
            "grid section {}: {} items in {} rows, height {}",
            section.section_index,
            section.number_of_items,
            section.rows.len(),
            section.frame.height
        );
        section
    }
}

impl SectionBuilder for TableSectionBuilder {
    fn make_section(
        &self,
        description: &SectionDescription,
        bounds: LayoutBounds,
        options: &LayoutOptions,
        sizing: &mut Sizing<'_>,
    ) -> LayoutSection {
        let Some(metrics) = resolved_metrics(description, options) else {
            return empty_section(description, bounds, options);
        };

        let origin = bounds.origin;
        let width = bounds.width;
        let padding = metrics.padding();

        let mut section = LayoutSection::new(
            description.section_index,
            SectionStyle::Table,
            metrics,
            bounds,
            options.hairline,
        );
        section.number_of_items = description.number_of_items;

        let stack = SupplementaryStack::new(origin.x, width);
        let content_top = stack.place(&mut section, description, SupplementaryKind::Header, origin.y, sizing);

        section.grid = ColumnGrid::even(
            origin.x + padding.left,
            (width - padding.horizontal()).max(0.0),
            section.metrics.column_count(),
            section.metrics.cell_layout_order(),
        );
        let placement = RowPlacement::new(section.section_index, section.grid, &section.metrics, options.hairline)
            .with_row_spacing(0.0)
            .with_phantom_cell(
                description
                    .phantom_cell_index
                    .map(|index| (index, description.phantom_cell_size)),
            )
            .with_dragged_item(description.dragged_item_index);
        let content_bottom = place_content(&mut section, description, &placement, content_top, sizing);
        section.content_frame = Rect::new(origin.x, content_top, width, content_bottom - content_top);

        let bottom = stack.place(&mut section, description, SupplementaryKind::Footer, content_bottom, sizing);
        section.frame.height = bottom - origin.y;
        section.update_backgrounds();

        log::debug!(
            "table section {}: {} items in {} rows, height {}",
            section.section_index,
            section.number_of_items,
            section.rows.len(),
            section.frame.height
        );
        section
    }
}

fn resolved_metrics(description: &SectionDescription, options: &LayoutOptions) -> Option<SectionMetrics> {
    let mut metrics = description.metrics.clone()?;
    metrics.resolve_missing_values_from_theme(&options.theme);
    Some(metrics)
}

fn empty_section(description: &SectionDescription, bounds: LayoutBounds, options: &LayoutOptions) -> LayoutSection {
    log::warn!(
        "section {}: no metrics, laying out an empty section",
        description.section_index
    );
    LayoutSection::new(
        description.section_index,
        description.style,
        SectionMetrics::default(),
        bounds,
        options.hairline,
    )
}

/// Fill the content region with the placeholder or the cells; returns its bottom.
fn place_content(
    section: &mut LayoutSection,
    description: &SectionDescription,
    placement: &RowPlacement,
    top: f64,
    sizing: &mut Sizing<'_>,
) -> f64 {
    let index = section.section_index;
    let frame_x = section.frame.x;
    let width = section.frame.width;
    let padding = section.metrics.padding();

    match description.placeholder.as_ref().filter(|p| p.covers(index)) {
        Some(placeholder) if placeholder.starts_at(index) => {
            let mut placeholder = placeholder.clone();
            placeholder.frame = Rect::new(frame_x, top, width, placeholder.height);
            if placeholder.has_estimated_height {
                if let Some(size) = sizing.placeholder(&placeholder) {
                    placeholder.height = size.height;
                    placeholder.frame.height = size.height;
                    placeholder.has_estimated_height = false;
                }
            }
            let bottom = placeholder.frame.max_y();
            section.placeholder = Some(placeholder);
            bottom
        }
        Some(placeholder) => {
            // Covered sections show nothing; the starting section holds the height.
            let mut placeholder = placeholder.clone();
            placeholder.frame = Rect::new(frame_x, top, width, 0.0);
            section.placeholder = Some(placeholder);
            top
        }
        None if description.number_of_items > 0 => {
            let rows_top = top + padding.top;
            let rows = placement.place(description.number_of_items, rows_top, sizing);
            let rows_bottom = rows.last().map_or(rows_top, |row| row.frame.max_y());
            section.set_rows(rows);
            rows_bottom + padding.bottom
        }
        None => top,
    }
}

/// Stacks the supplementary items of one kind in a vertical column.
#[derive(Debug, Clone, Copy)]
struct SupplementaryStack {
    x: f64,
    width: f64,
    spacing: f64,
}

impl SupplementaryStack {
    fn new(x: f64, width: f64) -> Self {
        Self { x, width, spacing: 0.0 }
    }

    fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Place every item of `kind` from `top` down; returns the bottom of the
    /// last item that takes space.
    fn place(
        &self,
        section: &mut LayoutSection,
        description: &SectionDescription,
        kind: SupplementaryKind,
        top: f64,
        sizing: &mut Sizing<'_>,
    ) -> f64 {
        let z_index = gridline_core::z_index::SUPPLEMENTARY
            + section.metrics.supplementary_ordering().rank_of(kind) as i32;
        let mut next_y = top;
        let mut bottom = top;

        for (index, item) in description
            .supplementary_items_of_kind(kind.element_kind())
            .iter()
            .enumerate()
        {
            let frame = Rect::new(self.x, next_y, self.width, item.fixed_height());
            let mut placed =
                LayoutSupplementaryItem::from_description(item, section.section_index, index, frame, z_index);

            if placed.has_estimated_height {
                if let Some(size) = sizing.supplementary_item(&placed) {
                    placed.frame.height = size.height;
                    placed.has_estimated_height = false;
                }
            }

            if placed.takes_space() {
                bottom = placed.frame.max_y();
                next_y = bottom + self.spacing;
            }
            section.push_supplementary_item(placed);
        }

        bottom
    }
}

/// The standard builder: an optional global section followed by the regular
/// sections, each starting where the previous one ended.
#[derive(Debug, Clone, Default)]
pub struct SectionedLayoutBuilder {
    pub options: LayoutOptions,
}

impl SectionedLayoutBuilder {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }
}

impl LayoutBuilder for SectionedLayoutBuilder {
    fn make_layout_info(
        &self,
        description: &LayoutDescription,
        origin: Point,
        sizing: &mut Sizing<'_>,
    ) -> Result<LayoutInfo, LayoutError> {
        if let Err(error) = description.validate() {
            log::warn!("rejected layout description: {error}");
            return Err(error.into());
        }

        let width = description.layout_width();
        let mut info = LayoutInfo::new(origin, width, self.options.clone());
        info.size = description.size;
        info.bounds = description.bounds;
        info.content_inset = description.content_inset;

        let mut y = origin.y;
        if let Some(global) = &description.global_section {
            let bounds = LayoutBounds::new(Point::new(origin.x, y), width);
            let section = global.style.builder().make_section(global, bounds, &self.options, sizing);
            y = section.frame.max_y();
            info.set_global_section(section);
        }

        for section_description in &description.sections {
            let bounds = LayoutBounds::new(Point::new(origin.x, y), width);
            let section = section_description
                .style
                .builder()
                .make_section(section_description, bounds, &self.options, sizing);
            y = section.frame.max_y();
            info.push_section(section);
        }

        info.finalize_layout();
        info.update_pinning(description.content_offset);

        log::debug!(
            "layout built: {} sections, content size {}x{}",
            info.number_of_sections(),
            info.width,
            info.height
        );
        Ok(info)
    }
}

/// Build a layout at the origin, measuring estimated elements with `measurer`.
pub fn compute_layout(
    description: &LayoutDescription,
    options: &LayoutOptions,
    measurer: Option<&mut dyn LayoutMeasuring>,
) -> Result<LayoutInfo, LayoutError> {
    let mut sizing = Sizing::new(measurer);
    SectionedLayoutBuilder::new(options.clone()).make_layout_info(description, Point::ZERO, &mut sizing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{LayoutPlaceholder, SupplementaryItem};
    use gridline_core::{kinds, EdgeInsets, SectionIndex, Size};
    use std::num::NonZeroUsize;

    fn bounds() -> LayoutBounds {
        LayoutBounds::new(Point::ZERO, 320.0)
    }

    fn build(description: &SectionDescription) -> LayoutSection {
        description
            .style
            .builder()
            .make_section(description, bounds(), &LayoutOptions::default(), &mut Sizing::none())
    }

    #[test]
    fn test_grid_section_stacks_headers_cells_footers() {
        let metrics = SectionMetrics::default()
            .with_number_of_columns(NonZeroUsize::new(2).unwrap())
            .with_row_height(Some(40.0))
            .with_padding(EdgeInsets::new(5.0, 10.0, 5.0, 10.0));
        let description = SectionDescription::new(0, metrics)
            .with_items(3)
            .with_supplementary_item(SupplementaryItem::header().with_height(30.0))
            .with_supplementary_item(SupplementaryItem::footer().with_height(20.0));

        let section = build(&description);

        assert_eq!(section.rows().len(), 2);
        assert_eq!(section.rows()[0].frame.y, 35.0);
        assert_eq!(section.rows()[0].frame.x, 10.0);
        assert_eq!(section.rows()[0].items[0].frame.width, 150.0);
        assert_eq!(section.content_frame.y, 30.0);
        assert_eq!(section.content_frame.height, 90.0);
        assert_eq!(section.footers()[0].frame.y, 120.0);
        assert_eq!(section.frame.height, 140.0);
    }

    #[test]
    fn test_auxiliary_columns_extend_content() {
        let metrics = SectionMetrics::default()
            .with_row_height(Some(20.0))
            .with_left_auxiliary_column_width(40.0)
            .with_auxiliary_column_spacing(4.0);
        let description = SectionDescription::new(0, metrics)
            .with_items(1)
            .with_supplementary_item(SupplementaryItem::new(kinds::LEFT_AUXILIARY_ITEM).with_height(30.0))
            .with_supplementary_item(SupplementaryItem::new(kinds::LEFT_AUXILIARY_ITEM).with_height(30.0));

        let section = build(&description);

        let aux = section.supplementary_items(kinds::LEFT_AUXILIARY_ITEM);
        assert_eq!(aux[1].frame.y, 34.0);
        assert_eq!(aux[1].frame.width, 40.0);
        assert_eq!(section.rows()[0].items[0].frame.x, 40.0);
        assert_eq!(section.rows()[0].items[0].frame.width, 280.0);
        assert_eq!(section.frame.height, 64.0);
    }

    #[test]
    fn test_placeholder_replaces_cells() {
        let description = SectionDescription::new(1, SectionMetrics::default())
            .with_items(4)
            .with_supplementary_item(SupplementaryItem::header().with_height(10.0))
            .with_placeholder(LayoutPlaceholder::new(1).with_height(120.0).spanning(2));

        let section = build(&description);
        assert!(section.rows().is_empty());
        assert!(section.placeholder_starts_here());
        assert_eq!(section.frame.height, 130.0);
        let attributes = section
            .layout_attributes_for_supplementary_element(kinds::PLACEHOLDER, 0)
            .unwrap();
        assert_eq!(attributes.frame.y, 10.0);

        let mut covered = description.clone();
        covered.section_index = SectionIndex::At(2);
        let section = build(&covered);
        assert!(section.placeholder().is_some());
        assert!(!section.placeholder_starts_here());
        assert_eq!(section.frame.height, 10.0);
    }

    #[test]
    fn test_missing_metrics_builds_empty_section() {
        let description = SectionDescription::without_metrics(0).with_items(5);
        let section = build(&description);
        assert_eq!(section.frame.height, 0.0);
        assert!(section.rows().is_empty());
        assert!(section.layout_attributes_for_cell(0).is_none());
    }

    #[test]
    fn test_table_section_divides_evenly() {
        let metrics = SectionMetrics::default()
            .with_number_of_columns(NonZeroUsize::new(4).unwrap())
            .with_row_height(Some(44.0))
            .with_row_spacing(10.0)
            .with_minimum_interitem_spacing(10.0);
        let description = SectionDescription::new(0, metrics)
            .with_style(SectionStyle::Table)
            .with_items(8);

        let section = build(&description);

        assert_eq!(section.rows().len(), 2);
        assert_eq!(section.rows()[0].items[1].frame.x, 80.0);
        assert_eq!(section.rows()[1].frame.y, 44.0);
        assert_eq!(section.frame.height, 88.0);
        assert!(section.column_separators().is_empty());
    }

    #[test]
    fn test_theme_colors_applied() {
        let description = SectionDescription::new(0, SectionMetrics::default()).with_items(1);
        let section = build(&description);
        let theme = LayoutOptions::default().theme;
        assert_eq!(section.metrics.separator_color(), Some(theme.separator_color));
    }

    #[test]
    fn test_compute_layout_reports_errors() {
        let metrics = SectionMetrics::default().with_row_spacing(-1.0);
        let description = LayoutDescription::new(Size::new(320.0, 480.0))
            .with_section(SectionDescription::new(0, metrics));
        let result = compute_layout(&description, &LayoutOptions::default(), None);
        assert!(matches!(result, Err(LayoutError::Config(_))));
    }
}
