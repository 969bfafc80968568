//! Incremental re-layout after a measured size changes.
//!
//! Resizing never rebuilds a section. The changed element gets its new
//! frame, then everything that starts at or below the old bottom edge moves
//! by the height difference, which is returned to the caller so later
//! sections can follow.

use gridline_core::{kinds, Size};

use crate::metrics::SupplementaryKind;
use crate::section::LayoutSection;

/// Elements left in place by a shift.
#[derive(Debug, Clone, Copy)]
enum Exempt<'a> {
    /// The resized supplementary item itself.
    Supplementary(&'a str, usize),
    /// Rows, placeholder and auxiliary columns; the caller refits the
    /// content region.
    Content,
}

impl LayoutSection {
    /// Apply a measured size to a cell.
    ///
    /// Returns `None` if the item does not exist, otherwise the vertical
    /// displacement of everything below the content region.
    pub fn set_size_for_item(&mut self, item_index: usize, size: Size) -> Option<f64> {
        let location = *self.item_locations.get(item_index)?;
        let row = self.rows.get_mut(location.row)?;
        let item = row.items.get_mut(location.slot)?;

        item.frame.width = size.width;
        item.has_estimated_height = false;
        if item.frame.height == size.height {
            return Some(0.0);
        }
        item.frame.height = size.height;
        if item.is_dragged {
            return Some(0.0);
        }

        let thickness = row.separator_thickness();
        let content_height = row.content_height();
        let delta = content_height + thickness - row.frame.height;
        if delta == 0.0 {
            return Some(0.0);
        }

        let threshold = row.frame.max_y();
        row.frame.height += delta;
        let separator_y = row.frame.y + content_height;
        if let Some(separator) = &mut row.separator {
            separator.frame.y = separator_y;
        }
        for row in self.rows.iter_mut().skip(location.row + 1) {
            if row.frame.y >= threshold {
                row.offset_y(delta);
            }
        }

        log::trace!(
            "section {}: item {item_index} resized, row {} grew by {delta}",
            self.section_index,
            location.row
        );
        Some(self.refit_content())
    }

    /// Apply a measured size to a header, footer, auxiliary item, or the
    /// placeholder (`kinds::PLACEHOLDER`).
    pub fn set_size_for_supplementary_element(&mut self, kind: &str, item_index: usize, size: Size) -> Option<f64> {
        if kind == kinds::PLACEHOLDER {
            return self.set_placeholder_size(size);
        }

        let item = self
            .supplementary_items_by_kind
            .get_mut(kind)?
            .get_mut(item_index)?;

        item.frame.width = size.width;
        item.has_estimated_height = false;
        // Hidden items keep taking no space.
        if item.is_hidden || item.frame.height == size.height {
            return Some(0.0);
        }

        let threshold = item.frame.max_y();
        let delta = size.height - item.frame.height;
        item.frame.height = size.height;

        let is_auxiliary = SupplementaryKind::from_element_kind(kind).is_some_and(SupplementaryKind::is_auxiliary);
        if is_auxiliary {
            return Some(self.resize_auxiliary_column(kind, item_index, delta));
        }

        self.shift_content_below(threshold, delta, Exempt::Supplementary(kind, item_index));
        Some(delta)
    }

    /// Resize the placeholder starting in this section.
    pub(crate) fn set_placeholder_size(&mut self, size: Size) -> Option<f64> {
        if !self.placeholder_starts_here() {
            return None;
        }
        let placeholder = self.placeholder.as_mut()?;
        placeholder.has_estimated_height = false;
        let delta = size.height - placeholder.frame.height;
        if delta == 0.0 {
            return Some(0.0);
        }

        placeholder.height = size.height;
        placeholder.frame.height = size.height;
        Some(self.refit_content())
    }

    /// Grow the placeholder by `extra`; returns the displacement.
    pub(crate) fn grow_placeholder(&mut self, extra: f64) -> f64 {
        let Some(placeholder) = &self.placeholder else {
            return 0.0;
        };
        let size = Size::new(placeholder.frame.width, placeholder.frame.height + extra);
        self.set_placeholder_size(size).unwrap_or(0.0)
    }

    /// Items after the resized one move within their column, then the content
    /// region is refit to the tallest of the cells and both columns.
    fn resize_auxiliary_column(&mut self, kind: &str, item_index: usize, delta: f64) -> f64 {
        if let Some(items) = self.supplementary_items_by_kind.get_mut(kind) {
            for item in items.iter_mut().skip(item_index + 1) {
                item.offset_y(delta);
            }
        }

        self.refit_content()
    }

    /// Fit the content region to the tallest of its cells or placeholder and
    /// both auxiliary columns, moving the footers by the change. Returns the
    /// displacement of everything below the content region.
    fn refit_content(&mut self) -> f64 {
        let old_bottom = self.content_frame.max_y();
        let content_delta = self.required_content_bottom() - old_bottom;
        if content_delta == 0.0 {
            self.update_column_separators();
            self.update_backgrounds();
            return 0.0;
        }

        self.content_frame.height += content_delta;
        self.shift_content_below(old_bottom, content_delta, Exempt::Content);
        content_delta
    }

    /// Bottom edge the content region needs to hold its cells or placeholder
    /// and both auxiliary columns.
    fn required_content_bottom(&self) -> f64 {
        let top = self.content_frame.y;
        let cells_bottom = match (&self.placeholder, self.rows.last()) {
            (Some(placeholder), _) if self.placeholder_starts_here() => placeholder.frame.max_y(),
            (_, Some(row)) => row.frame.max_y() + self.metrics.padding().bottom,
            _ => top,
        };

        [kinds::LEFT_AUXILIARY_ITEM, kinds::RIGHT_AUXILIARY_ITEM]
            .into_iter()
            .flat_map(|kind| self.supplementary_items(kind))
            .filter(|item| item.takes_space())
            .map(|item| item.frame.max_y())
            .fold(cells_bottom, f64::max)
    }

    /// Move everything starting at or below `threshold` by `delta` and grow
    /// the section by the same amount.
    fn shift_content_below(&mut self, threshold: f64, delta: f64, exempt: Exempt<'_>) {
        let moves_content = !matches!(exempt, Exempt::Content);
        if moves_content {
            for row in &mut self.rows {
                if row.frame.y >= threshold {
                    row.offset_y(delta);
                }
            }
        }

        for (kind, items) in &mut self.supplementary_items_by_kind {
            let is_auxiliary = SupplementaryKind::from_element_kind(kind).is_some_and(SupplementaryKind::is_auxiliary);
            if is_auxiliary && !moves_content {
                continue;
            }
            for item in items.iter_mut() {
                if let Exempt::Supplementary(exempt_kind, exempt_index) = exempt {
                    if exempt_kind == kind.as_str() && exempt_index == item.item_index {
                        continue;
                    }
                }
                if item.frame.y >= threshold {
                    item.offset_y(delta);
                }
            }
        }

        if moves_content {
            if let Some(placeholder) = &mut self.placeholder {
                if placeholder.frame.y >= threshold {
                    placeholder.frame.y += delta;
                }
            }
            if self.content_frame.y >= threshold {
                self.content_frame.y += delta;
            }
        }

        for separator in self.section_separators.iter_mut().flatten() {
            if separator.frame.y >= threshold {
                separator.frame.y += delta;
            }
        }

        self.frame.height += delta;
        self.update_column_separators();
        self.update_backgrounds();
    }
}
