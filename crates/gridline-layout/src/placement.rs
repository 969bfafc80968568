//! Row and column placement of cells.
//!
//! Items are walked in index order and dropped into column slots. A row
//! closes when its last slot is taken or the items run out; its height is
//! the tallest item it holds, plus the separator when row separators show.

use gridline_core::{kinds, z_index, Color, EdgeInsets, ItemLayoutOrder, Rect, SectionIndex, Size};

use crate::measure::Sizing;
use crate::metrics::SectionMetrics;
use crate::section::{LayoutDecoration, LayoutItem, LayoutRow};

/// Horizontal geometry of the cell columns of a section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGrid {
    /// Left edge of the cell area
    pub origin_x: f64,
    /// Width of the cell area
    pub width: f64,
    pub column_width: f64,
    pub spacing: f64,
    pub columns: usize,
    pub order: ItemLayoutOrder,
}

impl Default for ColumnGrid {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            width: 0.0,
            column_width: 0.0,
            spacing: 0.0,
            columns: 1,
            order: ItemLayoutOrder::LeadingToTrailing,
        }
    }
}

impl ColumnGrid {
    /// Columns dividing `width` evenly after interitem spacing, unless the
    /// metrics fix the column width.
    pub fn new(origin_x: f64, width: f64, metrics: &SectionMetrics) -> Self {
        let columns = metrics.column_count();
        let spacing = metrics.minimum_interitem_spacing();
        let column_width = match metrics.fixed_column_width() {
            Some(fixed) => fixed,
            None => ((width - spacing * (columns - 1) as f64) / columns as f64).max(0.0),
        };
        Self {
            origin_x,
            width,
            column_width,
            spacing,
            columns,
            order: metrics.cell_layout_order(),
        }
    }

    /// Evenly divided columns with no spacing.
    pub fn even(origin_x: f64, width: f64, columns: usize, order: ItemLayoutOrder) -> Self {
        let columns = columns.max(1);
        Self {
            origin_x,
            width,
            column_width: (width / columns as f64).max(0.0),
            spacing: 0.0,
            columns,
            order,
        }
    }

    /// Left edge of a column slot.
    pub fn column_x(&self, column: usize) -> f64 {
        let step = column as f64 * (self.column_width + self.spacing);
        match self.order {
            ItemLayoutOrder::LeadingToTrailing => self.origin_x + step,
            ItemLayoutOrder::TrailingToLeading => self.origin_x + self.width - self.column_width - step,
        }
    }

    /// Center of the gap between column `boundary - 1` and column `boundary`.
    pub fn boundary_x(&self, boundary: usize) -> f64 {
        let before = self.column_x(boundary.saturating_sub(1));
        let after = self.column_x(boundary);
        before.max(after) - self.spacing / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RowSeparatorStyle {
    pub insets: EdgeInsets,
    pub color: Option<Color>,
    pub thickness: f64,
}

/// Everything row placement needs from a section description.
#[derive(Debug, Clone)]
pub(crate) struct RowPlacement {
    pub section_index: SectionIndex,
    pub grid: ColumnGrid,
    pub row_spacing: f64,
    pub row_height: Option<f64>,
    pub estimated_row_height: f64,
    pub separator: Option<RowSeparatorStyle>,
    pub phantom_cell: Option<(usize, Size)>,
    pub dragged_item_index: Option<usize>,
}

impl RowPlacement {
    pub(crate) fn new(section_index: SectionIndex, grid: ColumnGrid, metrics: &SectionMetrics, hairline: f64) -> Self {
        let separator = metrics.shows_row_separator().then(|| RowSeparatorStyle {
            insets: metrics.separator_insets,
            color: metrics.separator_color(),
            thickness: hairline,
        });
        Self {
            section_index,
            grid,
            row_spacing: metrics.row_spacing(),
            row_height: metrics.row_height(),
            estimated_row_height: metrics.estimated_row_height(),
            separator,
            phantom_cell: None,
            dragged_item_index: None,
        }
    }

    pub(crate) fn with_phantom_cell(mut self, phantom_cell: Option<(usize, Size)>) -> Self {
        self.phantom_cell = phantom_cell;
        self
    }

    pub(crate) fn with_dragged_item(mut self, dragged_item_index: Option<usize>) -> Self {
        self.dragged_item_index = dragged_item_index;
        self
    }

    pub(crate) fn with_row_spacing(mut self, row_spacing: f64) -> Self {
        self.row_spacing = row_spacing;
        self
    }

    /// Place `number_of_items` cells starting at `top`.
    pub(crate) fn place(&self, number_of_items: usize, top: f64, sizing: &mut Sizing<'_>) -> Vec<LayoutRow> {
        let mut rows: Vec<LayoutRow> = Vec::new();
        let mut cursor = RowCursor {
            y: top,
            column: 0,
            row: self.empty_row(0, top),
        };

        for item_index in 0..number_of_items {
            self.reserve_phantom_before(item_index, &mut cursor, &mut rows);

            let mut item = LayoutItem {
                section_index: self.section_index,
                item_index,
                row_index: rows.len(),
                column_index: cursor.column,
                frame: Rect::new(
                    self.grid.column_x(cursor.column),
                    cursor.y,
                    self.grid.column_width,
                    self.row_height.unwrap_or(self.estimated_row_height),
                ),
                has_estimated_height: self.row_height.is_none(),
                is_dragged: false,
            };

            if self.dragged_item_index == Some(item_index) {
                item.is_dragged = true;
                cursor.row.items.push(item);
                continue;
            }

            if item.has_estimated_height {
                if let Some(size) = sizing.item(&item) {
                    item.frame.height = size.height;
                    item.has_estimated_height = false;
                }
            }

            cursor.row.items.push(item);
            self.advance(&mut cursor, &mut rows);
        }

        self.reserve_phantom_before(number_of_items, &mut cursor, &mut rows);
        if !cursor.row.is_vacant() {
            self.close_row(&mut cursor, &mut rows);
        }

        rows
    }

    /// Reserve the phantom slot if it sits before `item_index`. A phantom
    /// index equal to the item count trails the last item.
    fn reserve_phantom_before(&self, item_index: usize, cursor: &mut RowCursor, rows: &mut Vec<LayoutRow>) {
        let Some((_, size)) = self.phantom_cell.filter(|(index, _)| *index == item_index) else {
            return;
        };
        log::trace!("section {}: phantom slot before item {item_index}", self.section_index);
        cursor.row.phantom_cell = Some(Rect::new(
            self.grid.column_x(cursor.column),
            cursor.y,
            size.width,
            size.height,
        ));
        self.advance(cursor, rows);
    }

    fn empty_row(&self, row_index: usize, y: f64) -> LayoutRow {
        LayoutRow::new(row_index, Rect::new(self.grid.origin_x, y, self.grid.width, 0.0))
    }

    /// Move to the next slot, closing the row when it is full.
    fn advance(&self, cursor: &mut RowCursor, rows: &mut Vec<LayoutRow>) {
        cursor.column += 1;
        if cursor.column < self.grid.columns {
            return;
        }
        cursor.column = 0;
        if !cursor.row.is_vacant() {
            self.close_row(cursor, rows);
        }
    }

    fn close_row(&self, cursor: &mut RowCursor, rows: &mut Vec<LayoutRow>) {
        let row_index = rows.len();
        let mut row = std::mem::replace(&mut cursor.row, self.empty_row(row_index + 1, cursor.y));
        row.row_index = row_index;
        row.frame.height = row.content_height();

        if let Some(style) = &self.separator {
            let frame = Rect::new(
                row.frame.x + style.insets.left,
                row.frame.max_y(),
                (row.frame.width - style.insets.horizontal()).max(0.0),
                style.thickness,
            );
            row.separator = Some(LayoutDecoration::new(
                kinds::ROW_SEPARATOR,
                row_index,
                frame,
                style.color,
                z_index::SEPARATOR,
            ));
            row.frame.height += style.thickness;
        }

        cursor.y = row.frame.max_y() + self.row_spacing;
        cursor.column = 0;
        cursor.row.frame.y = cursor.y;
        rows.push(row);
    }
}

struct RowCursor {
    y: f64,
    column: usize,
    row: LayoutRow,
}
