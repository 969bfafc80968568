//! The complete layout: an optional global section followed by the regular
//! sections, stacked vertically.

use std::ops::ControlFlow;

use gridline_core::{EdgeInsets, IndexPath, Point, Rect, SectionIndex, Size};

use crate::attributes::LayoutAttributes;
use crate::options::LayoutOptions;
use crate::pinning;
use crate::section::LayoutSection;

/// Computed geometry of every section, plus the viewport state it was
/// pinned for.
#[derive(Debug, Clone)]
pub struct LayoutInfo {
    pub(crate) sections: Vec<LayoutSection>,
    pub(crate) global_section: Option<LayoutSection>,
    /// Top-left corner of the content
    pub origin: Point,
    /// Width sections are laid out in
    pub width: f64,
    /// Height of all sections together
    pub height: f64,
    /// Viewport size
    pub size: Size,
    pub bounds: Rect,
    pub content_offset: Point,
    pub content_inset: EdgeInsets,
    pub options: LayoutOptions,
}

impl LayoutInfo {
    pub fn new(origin: Point, width: f64, options: LayoutOptions) -> Self {
        Self {
            sections: Vec::new(),
            global_section: None,
            origin,
            width,
            height: 0.0,
            size: Size::ZERO,
            bounds: Rect::ZERO,
            content_offset: Point::ZERO,
            content_inset: EdgeInsets::ZERO,
            options,
        }
    }

    pub fn sections(&self) -> &[LayoutSection] {
        &self.sections
    }

    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn global_section(&self) -> Option<&LayoutSection> {
        self.global_section.as_ref()
    }

    pub fn has_global_section(&self) -> bool {
        self.global_section.is_some()
    }

    pub fn section(&self, index: SectionIndex) -> Option<&LayoutSection> {
        match index {
            SectionIndex::Global => self.global_section.as_ref(),
            SectionIndex::At(position) => self.sections.get(position),
        }
    }

    pub fn section_mut(&mut self, index: SectionIndex) -> Option<&mut LayoutSection> {
        match index {
            SectionIndex::Global => self.global_section.as_mut(),
            SectionIndex::At(position) => self.sections.get_mut(position),
        }
    }

    /// Size of the scrollable content.
    pub fn content_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Visit the global section, then the regular sections in order, until
    /// `visit` breaks.
    pub fn enumerate_sections<F>(&self, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&LayoutSection) -> ControlFlow<()>,
    {
        for section in self.global_section.iter().chain(self.sections.iter()) {
            visit(section)?;
        }
        ControlFlow::Continue(())
    }

    /// Bottom edge of the regular sections, or of the global section when
    /// there are none.
    fn end_y(&self, before: usize) -> f64 {
        match before.checked_sub(1).and_then(|previous| self.sections.get(previous)) {
            Some(section) => section.frame.max_y(),
            None => self
                .global_section
                .as_ref()
                .map_or(self.origin.y, |global| global.frame.max_y()),
        }
    }

    fn refresh_height(&mut self) {
        self.height = self.end_y(self.sections.len()) - self.origin.y;
    }

    /// Move every regular section after `index` by `delta`. The global
    /// section is followed by all regular sections.
    fn shift_sections_after(&mut self, index: SectionIndex, delta: f64) {
        if delta == 0.0 {
            return;
        }
        let start = match index {
            SectionIndex::Global => 0,
            SectionIndex::At(position) => position + 1,
        };
        for section in self.sections.iter_mut().skip(start) {
            section.offset_by(delta);
        }
    }

    /// Install the global section at the origin, moving the regular sections
    /// to make room. Returns the section it replaced.
    pub fn set_global_section(&mut self, mut section: LayoutSection) -> Option<LayoutSection> {
        section.offset_by(self.origin.y - section.frame.y);
        section.set_section_index(SectionIndex::Global);
        let old_height = self.global_section.as_ref().map_or(0.0, |global| global.frame.height);
        let delta = section.frame.height - old_height;

        let replaced = self.global_section.replace(section);
        self.shift_sections_after(SectionIndex::Global, delta);
        self.refresh_height();
        replaced
    }

    /// Append a section below the last one.
    pub fn push_section(&mut self, mut section: LayoutSection) {
        let position = self.sections.len();
        section.offset_by(self.end_y(position) - section.frame.y);
        section.set_section_index(SectionIndex::At(position));
        self.sections.push(section);
        self.refresh_height();
    }

    /// Replace the section at `position`, moving later sections by the change
    /// in height. A position past the end appends.
    pub fn set_section(&mut self, position: usize, mut section: LayoutSection) -> Option<LayoutSection> {
        if position >= self.sections.len() {
            self.push_section(section);
            return None;
        }
        section.offset_by(self.end_y(position) - section.frame.y);
        section.set_section_index(SectionIndex::At(position));
        let delta = section.frame.height - self.sections[position].frame.height;

        let replaced = std::mem::replace(&mut self.sections[position], section);
        self.shift_sections_after(SectionIndex::At(position), delta);
        self.refresh_height();
        Some(replaced)
    }

    /// Insert a section at `position`, renumbering and moving the sections
    /// after it.
    pub fn insert_section(&mut self, position: usize, mut section: LayoutSection) {
        let position = position.min(self.sections.len());
        section.offset_by(self.end_y(position) - section.frame.y);
        let delta = section.frame.height;

        self.sections.insert(position, section);
        for (index, section) in self.sections.iter_mut().enumerate().skip(position) {
            section.set_section_index(SectionIndex::At(index));
        }
        self.shift_sections_after(SectionIndex::At(position), delta);
        self.refresh_height();
    }

    pub fn layout_attributes_for_cell(&self, index_path: IndexPath) -> Option<LayoutAttributes> {
        self.section(index_path.section)?
            .layout_attributes_for_cell(index_path.item)
    }

    pub fn layout_attributes_for_supplementary_element(
        &self,
        kind: &str,
        index_path: IndexPath,
    ) -> Option<LayoutAttributes> {
        self.section(index_path.section)?
            .layout_attributes_for_supplementary_element(kind, index_path.item)
    }

    pub fn layout_attributes_for_decoration(&self, kind: &str, index_path: IndexPath) -> Option<LayoutAttributes> {
        self.section(index_path.section)?
            .layout_attributes_for_decoration(kind, index_path.item)
    }

    /// Attributes of every element whose effective frame meets `rect`.
    pub fn layout_attributes_in_rect(&self, rect: Rect) -> Vec<LayoutAttributes> {
        let hairline = self.options.hairline;
        let mut result = Vec::new();
        let _ = self.enumerate_sections(|section| {
            // Bottom separators sit just below the frame.
            let reach = section.frame.max_y() + hairline;
            if section.is_global() || (section.frame.y <= rect.max_y() && reach >= rect.y) {
                result.extend(
                    section
                        .layout_attributes()
                        .into_iter()
                        .filter(|attributes| attributes.frame.intersects(&rect)),
                );
            }
            ControlFlow::Continue(())
        });
        result
    }

    /// Apply a measured size to a cell and move the sections below.
    ///
    /// Returns `None` for an unknown index path, otherwise the displacement.
    pub fn set_size_for_item(&mut self, index_path: IndexPath, size: Size) -> Option<f64> {
        let delta = self
            .section_mut(index_path.section)?
            .set_size_for_item(index_path.item, size)?;
        self.after_resize(index_path.section, delta);
        Some(delta)
    }

    /// Apply a measured size to a supplementary element or the placeholder
    /// and move the sections below.
    pub fn set_size_for_supplementary_element(
        &mut self,
        kind: &str,
        index_path: IndexPath,
        size: Size,
    ) -> Option<f64> {
        let delta = self
            .section_mut(index_path.section)?
            .set_size_for_supplementary_element(kind, index_path.item, size)?;
        self.after_resize(index_path.section, delta);
        Some(delta)
    }

    fn after_resize(&mut self, index: SectionIndex, delta: f64) {
        if delta == 0.0 {
            return;
        }
        self.shift_sections_after(index, delta);
        self.refresh_height();
        self.update_pinning(self.content_offset);
    }

    /// Recompute pinned header positions for a scroll offset.
    pub fn update_pinning(&mut self, content_offset: Point) {
        self.content_offset = content_offset;
        let pinned_top = content_offset.y + self.content_inset.top;
        pinning::pin_headers(self.global_section.as_mut(), &mut self.sections, pinned_top);
    }

    /// Settle cross-section decorations once every section is placed.
    ///
    /// Hides the last row separator of each section, places section
    /// separators between sections with content, and grows a filling
    /// placeholder to the available height.
    pub fn finalize_layout(&mut self) {
        for section in self.global_section.iter_mut().chain(self.sections.iter_mut()) {
            section.update_row_separators();
            section.update_column_separators();
            section.update_section_separators(false, false);
            section.update_backgrounds();
        }

        let with_content: Vec<usize> = self
            .sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.has_content())
            .map(|(position, _)| position)
            .collect();

        // Bottom separator of the previous section with content, if any.
        let mut previous_bottom: Option<bool> = None;
        for (rank, &position) in with_content.iter().enumerate() {
            let has_next = rank + 1 < with_content.len();
            let section = &mut self.sections[position];
            let shows = section.metrics.shows_section_separator();
            let bottom = shows && (has_next || section.metrics.shows_section_separator_when_last_section());
            let top = shows && previous_bottom == Some(false);
            section.update_section_separators(top, bottom);
            previous_bottom = Some(bottom);
        }

        self.fill_available_height();
    }

    fn fill_available_height(&mut self) {
        let available = self.size.height - self.content_inset.vertical();
        let extra = available - self.height;
        if extra <= 0.0 {
            return;
        }
        let filling = self.sections.iter().position(|section| {
            section.placeholder_starts_here()
                && section
                    .placeholder()
                    .is_some_and(|placeholder| placeholder.should_fill_available_height)
        });
        let Some(position) = filling else {
            return;
        };

        let delta = self.sections[position].grow_placeholder(extra);
        log::debug!("placeholder in section {position} grew by {delta} to fill the viewport");
        self.shift_sections_after(SectionIndex::At(position), delta);
        self.refresh_height();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{LayoutBuilder, SectionStyle, SectionedLayoutBuilder};
    use crate::description::{LayoutBounds, LayoutDescription, LayoutPlaceholder, SectionDescription, SupplementaryItem};
    use crate::measure::Sizing;
    use crate::metrics::SectionMetrics;
    use gridline_core::kinds;

    fn rows_metrics(row_height: f64) -> SectionMetrics {
        SectionMetrics::default().with_row_height(Some(row_height))
    }

    fn build(description: &LayoutDescription) -> LayoutInfo {
        SectionedLayoutBuilder::default()
            .make_layout_info(description, Point::ZERO, &mut Sizing::none())
            .unwrap()
    }

    fn standalone_section(items: usize) -> LayoutSection {
        let description = SectionDescription::new(0, rows_metrics(10.0)).with_items(items);
        SectionStyle::Grid.builder().make_section(
            &description,
            LayoutBounds::new(Point::new(0.0, 500.0), 100.0),
            &LayoutOptions::default(),
            &mut Sizing::none(),
        )
    }

    #[test]
    fn test_sections_stack_vertically() {
        let description = LayoutDescription::new(Size::new(100.0, 50.0))
            .with_global_section(
                SectionDescription::global(SectionMetrics::default())
                    .with_supplementary_item(SupplementaryItem::header().with_height(30.0)),
            )
            .with_section(SectionDescription::new(0, rows_metrics(10.0)).with_items(2))
            .with_section(SectionDescription::new(1, rows_metrics(20.0)).with_items(1));

        let info = build(&description);

        assert_eq!(info.section(SectionIndex::Global).unwrap().frame.height, 30.0);
        assert_eq!(info.sections()[0].frame.y, 30.0);
        assert_eq!(info.sections()[1].frame.y, 50.0);
        assert_eq!(info.content_size(), Size::new(100.0, 70.0));
        assert!(info.section(SectionIndex::At(2)).is_none());
    }

    #[test]
    fn test_resize_moves_later_sections() {
        let description = LayoutDescription::new(Size::new(100.0, 50.0))
            .with_section(SectionDescription::new(0, rows_metrics(10.0)).with_items(2))
            .with_section(SectionDescription::new(1, rows_metrics(10.0)).with_items(2));
        let mut info = build(&description);

        let delta = info.set_size_for_item(IndexPath::new(0, 0), Size::new(100.0, 25.0));

        assert_eq!(delta, Some(15.0));
        assert_eq!(info.sections()[1].frame.y, 35.0);
        assert_eq!(info.height, 55.0);
        assert_eq!(info.set_size_for_item(IndexPath::new(4, 0), Size::ZERO), None);
        assert_eq!(
            info.set_size_for_supplementary_element(kinds::SECTION_HEADER, IndexPath::new(0, 0), Size::ZERO),
            None
        );
    }

    #[test]
    fn test_section_separators_between_content_sections() {
        let metrics = rows_metrics(10.0).with_shows_section_separator(true);
        let description = LayoutDescription::new(Size::new(100.0, 50.0))
            .with_section(SectionDescription::new(0, metrics.clone()).with_items(1))
            .with_section(SectionDescription::new(1, metrics.clone()))
            .with_section(SectionDescription::new(2, metrics.clone()).with_items(1));
        let info = build(&description);

        assert!(info.sections()[0].bottom_section_separator().is_some());
        assert!(info.sections()[1].bottom_section_separator().is_none());
        assert!(info.sections()[2].top_section_separator().is_none());
        assert!(info.sections()[2].bottom_section_separator().is_none());

        let last = metrics.with_shows_section_separator_when_last_section(true);
        let description = description.with_section(SectionDescription::new(3, last).with_items(1));
        let info = build(&description);
        assert!(info.sections()[3].bottom_section_separator().is_some());
    }

    #[test]
    fn test_top_separator_when_previous_has_none() {
        let description = LayoutDescription::new(Size::new(100.0, 50.0))
            .with_section(SectionDescription::new(0, rows_metrics(10.0)).with_items(1))
            .with_section(
                SectionDescription::new(1, rows_metrics(10.0).with_shows_section_separator(true)).with_items(1),
            );
        let info = build(&description);

        let top = info.sections()[1].top_section_separator().unwrap();
        assert_eq!(top.frame.y, 10.0);
        assert!(info
            .layout_attributes_for_decoration(kinds::SECTION_SEPARATOR, IndexPath::new(1, 0))
            .is_some());
    }

    #[test]
    fn test_last_row_separator_hidden() {
        let metrics = rows_metrics(10.0).with_shows_row_separator(true);
        let description = LayoutDescription::new(Size::new(100.0, 50.0))
            .with_section(SectionDescription::new(0, metrics).with_items(3));
        let info = build(&description);

        let section = &info.sections()[0];
        assert!(!section.rows()[0].separator.as_ref().unwrap().is_hidden);
        assert!(section.rows()[2].separator.as_ref().unwrap().is_hidden);
        let separators = info
            .layout_attributes_in_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
            .into_iter()
            .filter(|attributes| attributes.element_kind() == Some(kinds::ROW_SEPARATOR))
            .count();
        assert_eq!(separators, 2);
    }

    #[test]
    fn test_placeholder_fills_available_height() {
        let description = LayoutDescription::new(Size::new(100.0, 400.0))
            .with_content_inset(EdgeInsets::new(20.0, 0.0, 0.0, 0.0))
            .with_section(
                SectionDescription::new(0, SectionMetrics::default())
                    .with_supplementary_item(SupplementaryItem::header().with_height(30.0))
                    .with_placeholder(LayoutPlaceholder::new(0)),
            )
            .with_section(SectionDescription::new(1, rows_metrics(10.0)).with_items(1));
        let mut info = build(&description);

        assert_eq!(info.height, 380.0);
        assert_eq!(info.sections()[0].placeholder().unwrap().frame.height, 340.0);
        assert_eq!(info.sections()[1].frame.y, 370.0);

        info.finalize_layout();
        assert_eq!(info.height, 380.0);
    }

    #[test]
    fn test_insert_and_replace_sections() {
        let description = LayoutDescription::new(Size::new(100.0, 50.0))
            .with_section(SectionDescription::new(0, rows_metrics(10.0)).with_items(1))
            .with_section(SectionDescription::new(1, rows_metrics(10.0)).with_items(1));
        let mut info = build(&description);

        info.insert_section(1, standalone_section(3));
        assert_eq!(info.number_of_sections(), 3);
        assert_eq!(info.sections()[1].frame.y, 10.0);
        assert_eq!(info.sections()[2].frame.y, 40.0);
        assert_eq!(info.sections()[2].section_index, SectionIndex::At(2));
        assert_eq!(info.height, 50.0);

        let replaced = info.set_section(1, standalone_section(1));
        assert_eq!(replaced.map(|section| section.frame.height), Some(30.0));
        assert_eq!(info.sections()[2].frame.y, 20.0);
        assert_eq!(info.height, 30.0);
        assert!(info
            .layout_attributes_for_cell(IndexPath::new(2, 0))
            .is_some_and(|attributes| attributes.frame.y == 20.0));
    }

    #[test]
    fn test_insert_before_placeholder_section() {
        let description = LayoutDescription::new(Size::new(100.0, 0.0))
            .with_section(SectionDescription::new(0, rows_metrics(10.0)).with_items(1))
            .with_section(
                SectionDescription::new(1, SectionMetrics::default())
                    .with_placeholder(LayoutPlaceholder::new(1).with_height(50.0).spanning(2)),
            )
            .with_section(
                SectionDescription::new(2, SectionMetrics::default())
                    .with_placeholder(LayoutPlaceholder::new(1).with_height(50.0).spanning(2)),
            );
        let mut info = build(&description);
        let placeholder_at = |info: &LayoutInfo, section: usize| {
            info.layout_attributes_for_supplementary_element(kinds::PLACEHOLDER, IndexPath::new(section, 0))
        };
        assert_eq!(
            placeholder_at(&info, 1).map(|attributes| attributes.frame),
            Some(Rect::new(0.0, 10.0, 100.0, 50.0))
        );

        info.insert_section(0, standalone_section(1));

        let moved = &info.sections()[2];
        assert!(moved.placeholder_starts_here());
        assert!(!info.sections()[3].placeholder_starts_here());
        assert!(info.sections()[3]
            .placeholder()
            .is_some_and(|placeholder| placeholder.covers(SectionIndex::At(3))));
        assert_eq!(
            placeholder_at(&info, 2).map(|attributes| attributes.frame),
            Some(Rect::new(0.0, 20.0, 100.0, 50.0))
        );

        let delta =
            info.set_size_for_supplementary_element(kinds::PLACEHOLDER, IndexPath::new(2, 0), Size::new(100.0, 80.0));
        assert_eq!(delta, Some(30.0));
        assert_eq!(info.height, 100.0);
    }

    #[test]
    fn test_enumerate_sections_stops_early() {
        let description = LayoutDescription::new(Size::new(100.0, 50.0))
            .with_section(SectionDescription::new(0, rows_metrics(10.0)).with_items(1))
            .with_section(SectionDescription::new(1, rows_metrics(10.0)).with_items(1));
        let info = build(&description);

        let mut visited = 0;
        let flow = info.enumerate_sections(|_| {
            visited += 1;
            ControlFlow::Break(())
        });
        assert!(flow.is_break());
        assert_eq!(visited, 1);
    }
}
