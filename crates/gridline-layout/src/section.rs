//! Computed geometry of one section.
//!
//! A `LayoutSection` owns its rows, supplementary items, placeholder and
//! decorations. Frames are stored unpinned; pinning only records an override
//! for the vertical position of headers and the global background.

use gridline_core::{kinds, z_index, Color, IndexPath, Rect, SectionIndex};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::attributes::LayoutAttributes;
use crate::builder::SectionStyle;
use crate::description::{LayoutBounds, LayoutPlaceholder, SupplementaryItem};
use crate::metrics::{SectionMetrics, SupplementaryKind};
use crate::placement::ColumnGrid;

/// Index of the top section separator decoration.
pub const SECTION_SEPARATOR_TOP: usize = 0;
/// Index of the bottom section separator decoration.
pub const SECTION_SEPARATOR_BOTTOM: usize = 1;

/// A placed cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub section_index: SectionIndex,
    pub item_index: usize,
    pub row_index: usize,
    pub column_index: usize,
    pub frame: Rect,
    pub has_estimated_height: bool,
    /// Dragged items keep a frame but take no slot and no row height.
    pub is_dragged: bool,
}

impl LayoutItem {
    pub fn index_path(&self) -> IndexPath {
        IndexPath::new(self.section_index, self.item_index)
    }

    fn attributes(&self, metrics: &SectionMetrics) -> LayoutAttributes {
        let mut attributes = LayoutAttributes::cell(self.index_path(), self.frame, z_index::DEFAULT);
        attributes.column_index = Some(self.column_index);
        attributes.has_estimated_height = self.has_estimated_height;
        attributes.background_color = metrics.background_color();
        attributes.selected_background_color = metrics.selected_background_color();
        attributes
    }
}

/// A separator line or background drawn by the engine itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDecoration {
    pub element_kind: &'static str,
    pub index: usize,
    pub frame: Rect,
    pub pinned_y: Option<f64>,
    pub color: Option<Color>,
    pub corner_radius: f64,
    pub z_index: i32,
    pub is_hidden: bool,
}

impl LayoutDecoration {
    pub fn new(element_kind: &'static str, index: usize, frame: Rect, color: Option<Color>, z_index: i32) -> Self {
        Self {
            element_kind,
            index,
            frame,
            pinned_y: None,
            color,
            corner_radius: 0.0,
            z_index,
            is_hidden: false,
        }
    }

    pub fn effective_frame(&self) -> Rect {
        match self.pinned_y {
            Some(y) => self.frame.with_y(y),
            None => self.frame,
        }
    }

    fn attributes(&self, section: SectionIndex) -> LayoutAttributes {
        let mut attributes = LayoutAttributes::decoration(
            self.element_kind,
            IndexPath::new(section, self.index),
            self.effective_frame(),
            self.z_index,
        );
        attributes.unpinned_origin = self.frame.origin();
        attributes.is_pinned = self.pinned_y.is_some();
        attributes.is_hidden = self.is_hidden;
        attributes.background_color = self.color;
        attributes.corner_radius = self.corner_radius;
        attributes
    }
}

/// A horizontal band of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub row_index: usize,
    /// Spans the cell area; height includes the separator.
    pub frame: Rect,
    pub items: SmallVec<[LayoutItem; 4]>,
    pub separator: Option<LayoutDecoration>,
    /// Slot reserved for the phantom cell, sized by the caller.
    pub phantom_cell: Option<Rect>,
}

impl LayoutRow {
    pub(crate) fn new(row_index: usize, frame: Rect) -> Self {
        Self {
            row_index,
            frame,
            items: SmallVec::new(),
            separator: None,
            phantom_cell: None,
        }
    }

    /// Holds neither items nor the phantom slot.
    pub(crate) fn is_vacant(&self) -> bool {
        self.items.is_empty() && self.phantom_cell.is_none()
    }

    /// Height of the tallest item that takes part in the row.
    pub fn content_height(&self) -> f64 {
        self.items
            .iter()
            .filter(|item| !item.is_dragged)
            .map(|item| item.frame.height)
            .fold(0.0, f64::max)
    }

    pub fn separator_thickness(&self) -> f64 {
        self.separator.as_ref().map_or(0.0, |separator| separator.frame.height)
    }

    pub(crate) fn offset_y(&mut self, dy: f64) {
        self.frame = self.frame.offset_y(dy);
        for item in &mut self.items {
            item.frame = item.frame.offset_y(dy);
        }
        if let Some(separator) = &mut self.separator {
            separator.frame = separator.frame.offset_y(dy);
        }
        if let Some(phantom) = &mut self.phantom_cell {
            *phantom = phantom.offset_y(dy);
        }
    }
}

/// A placed header, footer, or auxiliary item.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSupplementaryItem {
    pub element_kind: String,
    pub section_index: SectionIndex,
    pub item_index: usize,
    /// Unpinned frame.
    pub frame: Rect,
    pub pinned_y: Option<f64>,
    pub has_estimated_height: bool,
    pub is_hidden: bool,
    pub is_visible_while_showing_placeholder: bool,
    pub should_pin: bool,
    pub z_index: i32,
    pub background_color: Option<Color>,
}

impl LayoutSupplementaryItem {
    pub(crate) fn from_description(
        item: &SupplementaryItem,
        section_index: SectionIndex,
        item_index: usize,
        frame: Rect,
        z_index: i32,
    ) -> Self {
        Self {
            element_kind: item.element_kind.clone(),
            section_index,
            item_index,
            frame,
            pinned_y: None,
            has_estimated_height: item.has_estimated_height() && !item.is_hidden,
            is_hidden: item.is_hidden,
            is_visible_while_showing_placeholder: item.is_visible_while_showing_placeholder,
            should_pin: item.should_pin,
            z_index,
            background_color: item.background_color,
        }
    }

    pub fn index_path(&self) -> IndexPath {
        IndexPath::new(self.section_index, self.item_index)
    }

    /// Frame after pinning.
    pub fn effective_frame(&self) -> Rect {
        match self.pinned_y {
            Some(y) => self.frame.with_y(y),
            None => self.frame,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_y.is_some()
    }

    /// Hidden and zero-height items are laid out but never enumerated.
    pub fn takes_space(&self) -> bool {
        !self.is_hidden && self.frame.height > 0.0
    }

    pub(crate) fn pin_to(&mut self, y: f64) {
        self.pinned_y = if y != self.frame.y { Some(y) } else { None };
    }

    pub(crate) fn offset_y(&mut self, dy: f64) {
        self.frame.y += dy;
        self.pinned_y = None;
    }

    fn attributes(&self) -> LayoutAttributes {
        let mut attributes = LayoutAttributes::supplementary(
            &self.element_kind,
            self.index_path(),
            self.effective_frame(),
            if self.is_pinned() {
                z_index::PINNED_HEADER
            } else {
                self.z_index
            },
        );
        attributes.unpinned_origin = self.frame.origin();
        attributes.is_pinned = self.is_pinned();
        attributes.is_hidden = self.is_hidden;
        attributes.has_estimated_height = self.has_estimated_height;
        attributes.background_color = self.background_color;
        attributes
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ItemLocation {
    pub row: usize,
    pub slot: usize,
}

/// Geometry of one section.
#[derive(Debug, Clone)]
pub struct LayoutSection {
    pub section_index: SectionIndex,
    pub style: SectionStyle,
    pub frame: Rect,
    /// Region between the headers and the footers: cells, placeholder and
    /// auxiliary columns.
    pub content_frame: Rect,
    pub metrics: SectionMetrics,
    pub number_of_items: usize,
    pub(crate) hairline: f64,
    pub(crate) grid: ColumnGrid,
    pub(crate) rows: Vec<LayoutRow>,
    pub(crate) item_locations: Vec<ItemLocation>,
    pub(crate) supplementary_items_by_kind: IndexMap<String, Vec<LayoutSupplementaryItem>>,
    pub(crate) placeholder: Option<LayoutPlaceholder>,
    pub(crate) column_separators: Vec<LayoutDecoration>,
    pub(crate) section_separators: [Option<LayoutDecoration>; 2],
    pub(crate) background: Option<LayoutDecoration>,
    pub(crate) content_background: Option<LayoutDecoration>,
}

impl LayoutSection {
    pub(crate) fn new(
        section_index: SectionIndex,
        style: SectionStyle,
        metrics: SectionMetrics,
        bounds: LayoutBounds,
        hairline: f64,
    ) -> Self {
        let frame = Rect::new(bounds.origin.x, bounds.origin.y, bounds.width, 0.0);
        Self {
            section_index,
            style,
            frame,
            content_frame: frame,
            metrics,
            number_of_items: 0,
            hairline,
            grid: ColumnGrid::default(),
            rows: Vec::new(),
            item_locations: Vec::new(),
            supplementary_items_by_kind: IndexMap::new(),
            placeholder: None,
            column_separators: Vec::new(),
            section_separators: [None, None],
            background: None,
            content_background: None,
        }
    }

    pub fn is_global(&self) -> bool {
        self.section_index.is_global()
    }

    pub fn rows(&self) -> &[LayoutRow] {
        &self.rows
    }

    pub fn items(&self) -> impl Iterator<Item = &LayoutItem> {
        self.rows.iter().flat_map(|row| row.items.iter())
    }

    pub fn item(&self, item_index: usize) -> Option<&LayoutItem> {
        let location = self.item_locations.get(item_index)?;
        self.rows.get(location.row)?.items.get(location.slot)
    }

    pub fn supplementary_items(&self, kind: &str) -> &[LayoutSupplementaryItem] {
        self.supplementary_items_by_kind
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn headers(&self) -> &[LayoutSupplementaryItem] {
        self.supplementary_items(kinds::SECTION_HEADER)
    }

    pub fn footers(&self) -> &[LayoutSupplementaryItem] {
        self.supplementary_items(kinds::SECTION_FOOTER)
    }

    /// Headers that stay visible while the section scrolls.
    pub fn pinnable_headers(&self) -> impl Iterator<Item = &LayoutSupplementaryItem> {
        self.headers().iter().filter(|header| header.should_pin && !header.is_hidden)
    }

    pub fn non_pinnable_headers(&self) -> impl Iterator<Item = &LayoutSupplementaryItem> {
        self.headers().iter().filter(|header| !header.should_pin || header.is_hidden)
    }

    /// Placeholder covering this section, if any.
    pub fn placeholder(&self) -> Option<&LayoutPlaceholder> {
        self.placeholder.as_ref()
    }

    /// Whether this section is where the placeholder reserves its height.
    pub fn placeholder_starts_here(&self) -> bool {
        self.placeholder
            .as_ref()
            .is_some_and(|placeholder| placeholder.starts_at(self.section_index))
    }

    /// Frame of the slot reserved for the phantom cell, if any.
    pub fn phantom_cell_frame(&self) -> Option<Rect> {
        self.rows.iter().find_map(|row| row.phantom_cell)
    }

    pub fn column_separators(&self) -> &[LayoutDecoration] {
        &self.column_separators
    }

    pub fn top_section_separator(&self) -> Option<&LayoutDecoration> {
        self.section_separators[SECTION_SEPARATOR_TOP].as_ref()
    }

    pub fn bottom_section_separator(&self) -> Option<&LayoutDecoration> {
        self.section_separators[SECTION_SEPARATOR_BOTTOM].as_ref()
    }

    pub fn background(&self) -> Option<&LayoutDecoration> {
        self.background.as_ref()
    }

    pub fn content_background(&self) -> Option<&LayoutDecoration> {
        self.content_background.as_ref()
    }

    pub fn has_content(&self) -> bool {
        self.number_of_items > 0
    }

    pub fn should_show_column_separator(&self) -> bool {
        self.style == SectionStyle::Grid
            && self.metrics.column_count() > 1
            && self.metrics.separator_color().is_some()
            && self.metrics.shows_column_separator()
            && self.number_of_items > 0
    }

    /// Non-global sections hide supplementary items while they have no items,
    /// unless the item asks to stay visible.
    fn shows_supplementary_item(&self, item: &LayoutSupplementaryItem) -> bool {
        self.is_global() || self.number_of_items > 0 || item.is_visible_while_showing_placeholder
    }

    pub(crate) fn set_rows(&mut self, rows: Vec<LayoutRow>) {
        self.item_locations = vec![ItemLocation::default(); self.number_of_items];
        for (row_position, row) in rows.iter().enumerate() {
            for (slot, item) in row.items.iter().enumerate() {
                if let Some(location) = self.item_locations.get_mut(item.item_index) {
                    *location = ItemLocation { row: row_position, slot };
                }
            }
        }
        self.rows = rows;
    }

    pub(crate) fn push_supplementary_item(&mut self, item: LayoutSupplementaryItem) {
        self.supplementary_items_by_kind
            .entry(item.element_kind.clone())
            .or_default()
            .push(item);
    }

    /// Renumber the section after it moved within the container.
    pub(crate) fn set_section_index(&mut self, section_index: SectionIndex) {
        // The placeholder start keeps its distance to this section.
        if let (Some(old), Some(new), Some(placeholder)) =
            (self.section_index.position(), section_index.position(), &mut self.placeholder)
        {
            placeholder.starting_section_index = (placeholder.starting_section_index + new).saturating_sub(old);
        }
        self.section_index = section_index;
        for row in &mut self.rows {
            for item in &mut row.items {
                item.section_index = section_index;
            }
        }
        for items in self.supplementary_items_by_kind.values_mut() {
            for item in items {
                item.section_index = section_index;
            }
        }
    }

    /// Move the whole section vertically.
    pub(crate) fn offset_by(&mut self, dy: f64) {
        if dy == 0.0 {
            return;
        }
        self.frame.y += dy;
        self.content_frame.y += dy;
        for row in &mut self.rows {
            row.offset_y(dy);
        }
        for items in self.supplementary_items_by_kind.values_mut() {
            for item in items {
                item.offset_y(dy);
            }
        }
        if let Some(placeholder) = &mut self.placeholder {
            placeholder.frame.y += dy;
        }
        let decorations = self
            .column_separators
            .iter_mut()
            .chain(self.section_separators.iter_mut().flatten())
            .chain(self.background.iter_mut())
            .chain(self.content_background.iter_mut());
        for decoration in decorations {
            decoration.frame.y += dy;
            decoration.pinned_y = None;
        }
    }

    /// Place one separator line at each column boundary, spanning the rows.
    pub(crate) fn update_column_separators(&mut self) {
        self.column_separators.clear();
        if !self.should_show_column_separator() {
            return;
        }
        let (Some(first), Some(last)) = (self.rows.first(), self.rows.last()) else {
            return;
        };

        let insets = self.metrics.separator_insets;
        let top = first.frame.y + insets.top;
        let height = (last.frame.max_y() - top - insets.bottom).max(0.0);
        let color = self.metrics.separator_color();

        for boundary in 1..self.grid.columns {
            let x = self.grid.boundary_x(boundary) - self.hairline / 2.0;
            let frame = Rect::new(x, top, self.hairline, height);
            self.column_separators.push(LayoutDecoration::new(
                kinds::COLUMN_SEPARATOR,
                boundary - 1,
                frame,
                color,
                z_index::SEPARATOR,
            ));
        }
    }

    /// Every row separator shows except the last.
    pub(crate) fn update_row_separators(&mut self) {
        let last = self.rows.len().saturating_sub(1);
        for (position, row) in self.rows.iter_mut().enumerate() {
            if let Some(separator) = &mut row.separator {
                separator.is_hidden = position == last;
            }
        }
    }

    pub(crate) fn update_section_separators(&mut self, top: bool, bottom: bool) {
        let insets = self.metrics.section_separator_insets;
        let color = self.metrics.section_separator_color();
        let x = self.frame.x + insets.left;
        let width = (self.frame.width - insets.horizontal()).max(0.0);
        let make = |index: usize, y: f64| {
            LayoutDecoration::new(
                kinds::SECTION_SEPARATOR,
                index,
                Rect::new(x, y, width, self.hairline),
                color,
                z_index::SECTION_SEPARATOR,
            )
        };
        self.section_separators = [
            top.then(|| make(SECTION_SEPARATOR_TOP, self.frame.y)),
            bottom.then(|| make(SECTION_SEPARATOR_BOTTOM, self.frame.max_y())),
        ];
    }

    /// Refit the global background and the content background to the
    /// current frames.
    pub(crate) fn update_backgrounds(&mut self) {
        self.background = match (self.is_global(), self.metrics.background_color()) {
            (true, Some(color)) => {
                let mut background =
                    LayoutDecoration::new(kinds::GLOBAL_HEADER_BACKGROUND, 0, self.frame, Some(color), 0);
                background.corner_radius = self.metrics.corner_radius();
                Some(background)
            }
            _ => None,
        };

        let content_background = self.metrics.content_background();
        self.content_background = content_background.color.map(|color| {
            let frame = self.content_frame.inset_by(self.metrics.content_inset());
            let mut background = LayoutDecoration::new(kinds::CONTENT_BACKGROUND, 0, frame, Some(color), 0);
            background.corner_radius = content_background.corner_radius;
            background
        });
    }

    pub(crate) fn reset_pinning(&mut self) {
        for header in self
            .supplementary_items_by_kind
            .get_mut(kinds::SECTION_HEADER)
            .into_iter()
            .flatten()
        {
            header.pinned_y = None;
        }
        if let Some(background) = &mut self.background {
            background.pinned_y = None;
        }
    }

    /// Supplementary kinds in draw order: known kinds by the section's
    /// ordering, then any custom kinds in insertion order.
    fn ordered_supplementary_kinds(&self) -> Vec<&str> {
        let ordering = self.metrics.supplementary_ordering();
        let mut ordered: Vec<&str> = ordering
            .ordered_kinds()
            .iter()
            .map(|kind| kind.element_kind())
            .collect();
        ordered.extend(
            self.supplementary_items_by_kind
                .keys()
                .map(String::as_str)
                .filter(|kind| SupplementaryKind::from_element_kind(kind).is_none()),
        );
        ordered
    }

    /// Attributes for every element that should be drawn.
    pub fn layout_attributes(&self) -> Vec<LayoutAttributes> {
        let mut attributes = Vec::new();
        let section = self.section_index;

        attributes.extend(self.background.iter().map(|d| d.attributes(section)));
        attributes.extend(self.content_background.iter().map(|d| d.attributes(section)));
        attributes.extend(
            self.section_separators
                .iter()
                .flatten()
                .map(|d| d.attributes(section)),
        );
        attributes.extend(self.column_separators.iter().map(|d| d.attributes(section)));

        for kind in self.ordered_supplementary_kinds() {
            for item in self.supplementary_items(kind) {
                if item.takes_space() && self.shows_supplementary_item(item) {
                    attributes.push(item.attributes());
                }
            }
        }

        if let Some(placeholder) = self.placeholder_attributes() {
            attributes.push(placeholder);
        }

        for row in &self.rows {
            if let Some(separator) = &row.separator {
                if !separator.is_hidden {
                    attributes.push(separator.attributes(section));
                }
            }
            attributes.extend(row.items.iter().map(|item| item.attributes(&self.metrics)));
        }

        attributes
    }

    pub fn layout_attributes_for_cell(&self, item_index: usize) -> Option<LayoutAttributes> {
        self.item(item_index).map(|item| item.attributes(&self.metrics))
    }

    pub fn layout_attributes_for_supplementary_element(
        &self,
        kind: &str,
        item_index: usize,
    ) -> Option<LayoutAttributes> {
        if kind == kinds::PLACEHOLDER {
            return self.placeholder_attributes();
        }
        let item = self.supplementary_items(kind).get(item_index)?;
        if !self.shows_supplementary_item(item) {
            return None;
        }
        Some(item.attributes())
    }

    pub fn layout_attributes_for_decoration(&self, kind: &str, index: usize) -> Option<LayoutAttributes> {
        let decoration = match kind {
            kinds::COLUMN_SEPARATOR => self.column_separators.get(index),
            kinds::SECTION_SEPARATOR => self.section_separators.get(index)?.as_ref(),
            kinds::ROW_SEPARATOR => self.rows.get(index)?.separator.as_ref(),
            kinds::GLOBAL_HEADER_BACKGROUND if index == 0 => self.background.as_ref(),
            kinds::CONTENT_BACKGROUND if index == 0 => self.content_background.as_ref(),
            _ => None,
        }?;
        Some(decoration.attributes(self.section_index))
    }

    fn placeholder_attributes(&self) -> Option<LayoutAttributes> {
        let placeholder = self.placeholder.as_ref()?;
        if !placeholder.starts_at(self.section_index) {
            return None;
        }
        let mut attributes = LayoutAttributes::supplementary(
            kinds::PLACEHOLDER,
            IndexPath::new(self.section_index, 0),
            placeholder.frame,
            z_index::DEFAULT,
        );
        attributes.has_estimated_height = placeholder.has_estimated_height;
        Some(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline_core::Point;

    fn section_with_headers() -> LayoutSection {
        let bounds = LayoutBounds::new(Point::ZERO, 320.0);
        let mut section = LayoutSection::new(
            SectionIndex::At(0),
            SectionStyle::Grid,
            SectionMetrics::default(),
            bounds,
            1.0,
        );
        let pinned = SupplementaryItem::header().with_height(30.0).pinned();
        let plain = SupplementaryItem::header().with_height(20.0);
        section.push_supplementary_item(LayoutSupplementaryItem::from_description(
            &pinned,
            SectionIndex::At(0),
            0,
            Rect::new(0.0, 0.0, 320.0, 30.0),
            z_index::SUPPLEMENTARY,
        ));
        section.push_supplementary_item(LayoutSupplementaryItem::from_description(
            &plain,
            SectionIndex::At(0),
            1,
            Rect::new(0.0, 30.0, 320.0, 20.0),
            z_index::SUPPLEMENTARY,
        ));
        section.frame.height = 50.0;
        section
    }

    #[test]
    fn test_header_partition() {
        let section = section_with_headers();
        assert_eq!(section.pinnable_headers().count(), 1);
        assert_eq!(section.non_pinnable_headers().count(), 1);
    }

    #[test]
    fn test_headers_hidden_without_items() {
        let mut section = section_with_headers();
        assert!(section
            .layout_attributes_for_supplementary_element(kinds::SECTION_HEADER, 0)
            .is_none());
        assert!(section.layout_attributes().is_empty());

        section.number_of_items = 1;
        let attributes = section
            .layout_attributes_for_supplementary_element(kinds::SECTION_HEADER, 1)
            .unwrap();
        assert_eq!(attributes.frame.y, 30.0);
        assert_eq!(attributes.element_kind(), Some(kinds::SECTION_HEADER));
    }

    #[test]
    fn test_offset_moves_everything() {
        let mut section = section_with_headers();
        section.offset_by(15.0);
        assert_eq!(section.frame.y, 15.0);
        assert_eq!(section.headers()[1].frame.y, 45.0);
    }

    #[test]
    fn test_section_index_renumbering() {
        let mut section = section_with_headers();
        section.set_section_index(SectionIndex::At(3));
        assert_eq!(section.headers()[0].index_path(), IndexPath::new(3, 0));
    }

    #[test]
    fn test_section_separators() {
        let mut section = section_with_headers();
        section.update_section_separators(false, true);
        assert!(section.top_section_separator().is_none());
        let bottom = section.bottom_section_separator().unwrap();
        assert_eq!(bottom.frame.y, 50.0);
        assert_eq!(bottom.frame.height, 1.0);
        assert_eq!(bottom.z_index, z_index::SECTION_SEPARATOR);
    }
}
